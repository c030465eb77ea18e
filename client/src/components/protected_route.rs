//! Route wrapper that runs one access-gate attempt per navigation.
//!
//! SYSTEM CONTEXT
//! ==============
//! While the session is loading the wrapper shows a neutral placeholder.
//! Once it settles the attempt is either granted (children render) or
//! denied (the gate records the path and redirects to sign-in). Later auth
//! changes do not re-run a settled attempt; the next navigation mounts a new
//! wrapper and with it a new attempt.

use leptos::prelude::*;
use leptos_router::hooks::use_location;
use memberhub::{AuthState, GateDecision};

use crate::app::Services;
use crate::util::navigation::location_path;

#[component]
pub fn ProtectedRoute(route_id: &'static str, children: ChildrenFn) -> impl IntoView {
    let gate = expect_context::<Services>().gate;
    let auth = expect_context::<RwSignal<AuthState>>();
    let location = use_location();
    let path = location_path(
        &location.pathname.get_untracked(),
        &location.search.get_untracked(),
        &location.hash.get_untracked(),
    );

    let attempt = StoredValue::new(gate.attempt(route_id, &path));
    let decision = RwSignal::new(GateDecision::Pending);

    Effect::new(move || {
        let state = auth.get();
        let Some(next) = attempt.try_update_value(|a| a.observe(&gate, &state).clone()) else {
            return;
        };
        if decision.get_untracked() != next {
            decision.set(next);
        }
    });

    move || match decision.get() {
        GateDecision::Pending => view! { <div class="gate-pending">"Checking your membership..."</div> }.into_any(),
        GateDecision::Granted => children().into_any(),
        GateDecision::Denied(_) => ().into_any(),
    }
}
