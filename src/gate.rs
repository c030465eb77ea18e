//! Access gate for protected destinations.
//!
//! DESIGN
//! ======
//! Each navigation to a protected route is one `GateAttempt`. The attempt
//! starts `Pending` while the session is still loading, and settles once as
//! either `Granted` or `Denied`. A denied attempt runs its side effects
//! exactly once: it remembers the path in the `RedirectStore` and navigates to
//! sign-in with a `NavigationState` carrying the reason and the original path.
//!
//! Reasons come from a `RouteTable` keyed by route id. The table is filled
//! in explicitly when routes are declared, so nothing is inferred from the
//! shape of the URL.

#[cfg(test)]
#[path = "gate_test.rs"]
mod gate_test;

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::SiteRoutes;
use crate::navigation::{NavigationState, Navigator};
use crate::redirect::RedirectStore;
use crate::session::AuthState;

pub const GENERIC_REASON: &str = "Please sign in to continue.";

// =============================================================================
// ROUTE TABLE
// =============================================================================

/// Route id → denial reason template. `{path}` in a template is replaced with
/// the requested path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    reasons: HashMap<String, Option<String>>,
    generic: String,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::empty()
            .protect_with("videos", "Please sign in to view this video.")
            .protect_with("subscription", "Please sign in to access subscription content.")
            .protect_with("account", "Please sign in to manage your account.")
    }
}

impl RouteTable {
    /// Table with no protected routes.
    #[must_use]
    pub fn empty() -> Self {
        Self { reasons: HashMap::new(), generic: GENERIC_REASON.to_owned() }
    }

    /// Protect `route_id` with the generic reason.
    #[must_use]
    pub fn protect(mut self, route_id: &str) -> Self {
        self.reasons.insert(route_id.to_owned(), None);
        self
    }

    /// Protect `route_id` with its own reason template.
    #[must_use]
    pub fn protect_with(mut self, route_id: &str, template: &str) -> Self {
        self.reasons.insert(route_id.to_owned(), Some(template.to_owned()));
        self
    }

    /// Replace the fallback reason.
    #[must_use]
    pub fn with_generic(mut self, template: &str) -> Self {
        template.clone_into(&mut self.generic);
        self
    }

    #[must_use]
    pub fn is_protected(&self, route_id: &str) -> bool {
        self.reasons.contains_key(route_id)
    }

    /// Human-readable reason shown on the sign-in page.
    #[must_use]
    pub fn reason_for(&self, route_id: &str, path: &str) -> String {
        let template = match self.reasons.get(route_id) {
            Some(Some(template)) => template,
            Some(None) => &self.generic,
            None => {
                tracing::warn!(%route_id, %path, "gated route has no registered reason");
                &self.generic
            }
        };
        template.replace("{path}", path)
    }
}

// =============================================================================
// DECISIONS
// =============================================================================

/// Where a denied visitor is sent, and what travels with them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInRedirect {
    pub to: String,
    pub state: NavigationState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Session still loading; show a neutral waiting indicator.
    Pending,
    Granted,
    Denied(SignInRedirect),
}

impl GateDecision {
    #[must_use]
    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

// =============================================================================
// ACCESS GATE
// =============================================================================

#[derive(Clone)]
pub struct AccessGate {
    routes: Arc<RouteTable>,
    redirects: RedirectStore,
    navigator: Arc<dyn Navigator>,
    site: SiteRoutes,
}

impl AccessGate {
    #[must_use]
    pub fn new(routes: RouteTable, redirects: RedirectStore, navigator: Arc<dyn Navigator>, site: SiteRoutes) -> Self {
        Self { routes: Arc::new(routes), redirects, navigator, site }
    }

    #[must_use]
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    #[must_use]
    pub fn redirects(&self) -> &RedirectStore {
        &self.redirects
    }

    /// Decide without side effects.
    #[must_use]
    pub fn check(&self, auth: &AuthState, route_id: &str, path: &str) -> GateDecision {
        if auth.is_loading() {
            return GateDecision::Pending;
        }
        if auth.user().is_some() {
            return GateDecision::Granted;
        }
        GateDecision::Denied(SignInRedirect {
            to: self.site.sign_in_path.clone(),
            state: NavigationState {
                auth_required: true,
                auth_message: self.routes.reason_for(route_id, path),
                from: path.to_owned(),
            },
        })
    }

    /// Start a new attempt for one navigation.
    #[must_use]
    pub fn attempt(&self, route_id: &str, path: &str) -> GateAttempt {
        GateAttempt { route_id: route_id.to_owned(), path: path.to_owned(), decision: GateDecision::Pending }
    }

    /// Decide and, when denying, remember the path and redirect.
    pub fn enforce(&self, auth: &AuthState, route_id: &str, path: &str) -> GateDecision {
        let decision = self.check(auth, route_id, path);
        match &decision {
            GateDecision::Denied(redirect) => {
                tracing::info!(%route_id, %path, "access denied; redirecting to sign in");
                self.redirects.remember(path);
                self.navigator.navigate(&redirect.to, Some(redirect.state.clone()));
            }
            GateDecision::Granted => tracing::debug!(%route_id, %path, "access granted"),
            GateDecision::Pending => {}
        }
        decision
    }

    /// Resolve where a successful sign-in should land and clear the
    /// redirect record.
    ///
    /// Order: navigation-state `from`, then the redirect record, then home.
    /// Candidates that are not same-site paths, or that point back at the
    /// sign-in page, are skipped.
    #[must_use]
    pub fn complete_sign_in(&self, state: Option<&NavigationState>) -> String {
        let recorded = self.redirects.take();
        let from_state = state.map(|s| s.from.as_str());
        from_state
            .into_iter()
            .chain(recorded.as_deref())
            .find(|path| self.is_safe_return(path))
            .map_or_else(|| self.site.home_path.clone(), ToOwned::to_owned)
    }

    /// `complete_sign_in` followed by the navigation.
    pub fn return_after_sign_in(&self, state: Option<&NavigationState>) -> String {
        let target = self.complete_sign_in(state);
        tracing::info!(%target, "returning after sign in");
        self.navigator.navigate(&target, None);
        target
    }

    fn is_safe_return(&self, path: &str) -> bool {
        if !path.starts_with('/') || path.starts_with("//") || path.starts_with("/\\") {
            tracing::warn!(%path, "ignoring off-site return path");
            return false;
        }
        let bare = path.split(['?', '#']).next().unwrap_or(path);
        bare != self.site.sign_in_path
    }
}

// =============================================================================
// ATTEMPT
// =============================================================================

/// One navigation through the gate. Settles once; later observations return
/// the settled decision without repeating side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateAttempt {
    route_id: String,
    path: String,
    decision: GateDecision,
}

impl GateAttempt {
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn decision(&self) -> &GateDecision {
        &self.decision
    }

    /// Feed the latest auth state into the attempt.
    pub fn observe(&mut self, gate: &AccessGate, auth: &AuthState) -> &GateDecision {
        if !self.decision.is_settled() {
            self.decision = gate.enforce(auth, &self.route_id, &self.path);
        }
        &self.decision
    }
}
