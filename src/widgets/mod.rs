//! Controllers behind the two interactive widgets on a video page.
//!
//! Both hold their displayed state, mutate it through
//! [`crate::optimistic::Optimistic`], and report every change to an optional
//! observer so a UI layer can mirror it into reactive signals.

pub mod comments;
pub mod like;

use std::sync::Arc;

pub use comments::CommentThread;
pub use like::{LikeState, LikeToggle};

/// Callback fired with the new state after every change.
pub type Observer<T> = Arc<dyn Fn(&T) + Send + Sync>;
