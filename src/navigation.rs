//! Routing seam: the core only ever needs "go here, optionally with state".

use serde::{Deserialize, Serialize};

/// In-memory state attached to a redirect toward the sign-in page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationState {
    pub auth_required: bool,
    /// Why the visitor was interrupted, ready to render.
    pub auth_message: String,
    /// Path the visitor asked for.
    pub from: String,
}

/// Navigation primitive supplied by the routing layer.
pub trait Navigator: Send + Sync {
    fn navigate(&self, to: &str, state: Option<NavigationState>);
}
