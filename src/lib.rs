//! # memberhub
//!
//! Client-side session and access-control core for the membership site.
//!
//! The crate owns who-is-signed-in state (`session`), the route guard that
//! turns anonymous visitors back toward sign-in (`gate`), the persisted
//! return-path record (`redirect`), and the optimistic like/comment
//! mutations that roll back when the backend refuses them (`optimistic`,
//! `widgets`). Page rendering lives in the `client` crate, which consumes
//! these modules through Leptos context.

pub mod backend;
pub mod clock;
pub mod config;
pub mod error;
pub mod gate;
pub mod navigation;
pub mod optimistic;
pub mod redirect;
pub mod session;
pub mod storage;
pub mod types;
pub mod widgets;

#[cfg(test)]
pub mod test_helpers;

pub use config::{BackendConfig, SiteRoutes};
pub use error::{AuthError, ContentError, ErrorCode, StorageError};
pub use gate::{AccessGate, GateAttempt, GateDecision, RouteTable, SignInRedirect};
pub use navigation::{NavigationState, Navigator};
pub use optimistic::{InFlightGuard, Liveness, MutationOutcome, Optimistic};
pub use redirect::RedirectStore;
pub use session::{AuthState, SessionManager, ShellGuard};
pub use storage::{KeyValueStore, MemoryStore};
pub use types::{AuthResponse, Comment, NewComment, Session, User};
pub use widgets::{CommentThread, LikeState, LikeToggle};
