//! Router bridge for the core's `Navigator` seam.
//!
//! SYSTEM CONTEXT
//! ==============
//! The core asks to navigate from places that have no router handle (the
//! session manager's sign-out, the access gate's denial). `SignalNavigator`
//! parks each request in a signal; `NavigationBridge`, mounted inside the
//! `<Router>`, performs it with `use_navigate` and publishes the attached
//! `NavigationState` for the destination page to read.

#[cfg(test)]
#[path = "navigation_test.rs"]
mod navigation_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;
use memberhub::{NavigationState, Navigator};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingNavigation {
    pub to: String,
    pub state: Option<NavigationState>,
}

/// Rebuild the visited location from router parts so a return trip through
/// sign-in keeps the query and fragment. Either part may arrive with or
/// without its leading `?` / `#`.
pub fn location_path(pathname: &str, search: &str, hash: &str) -> String {
    let mut path = pathname.to_owned();
    let search = search.trim_start_matches('?');
    if !search.is_empty() {
        path.push('?');
        path.push_str(search);
    }
    let hash = hash.trim_start_matches('#');
    if !hash.is_empty() {
        path.push('#');
        path.push_str(hash);
    }
    path
}

/// In-memory navigation state of the current route.
pub type RouteState = RwSignal<Option<NavigationState>>;

#[derive(Clone, Copy)]
pub struct SignalNavigator {
    pending: RwSignal<Option<PendingNavigation>>,
}

impl SignalNavigator {
    pub fn new() -> Self {
        Self { pending: RwSignal::new(None) }
    }
}

impl Default for SignalNavigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator for SignalNavigator {
    fn navigate(&self, to: &str, state: Option<NavigationState>) {
        self.pending.set(Some(PendingNavigation { to: to.to_owned(), state }));
    }
}

/// Performs navigations requested through a `SignalNavigator`.
#[component]
pub fn NavigationBridge(navigator: SignalNavigator, route_state: RouteState) -> impl IntoView {
    let navigate = use_navigate();
    Effect::new(move || {
        let Some(next) = navigator.pending.get() else {
            return;
        };
        navigator.pending.set(None);
        route_state.set(next.state);
        navigate(&next.to, NavigateOptions::default());
    });
}
