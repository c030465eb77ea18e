//! Comment thread for one video, newest first.

#[cfg(test)]
#[path = "comments_test.rs"]
mod comments_test;

use std::sync::{Arc, Mutex, PoisonError};

use crate::backend::ContentBackend;
use crate::error::ContentError;
use crate::optimistic::{InFlightGuard, Liveness, MutationOutcome, Optimistic};
use crate::types::{Comment, NewComment, TEMP_COMMENT_PREFIX, User};

use super::Observer;

pub struct CommentThread {
    video_id: String,
    backend: Arc<dyn ContentBackend>,
    guard: InFlightGuard,
    liveness: Liveness,
    comments: Mutex<Vec<Comment>>,
    observer: Option<Observer<Vec<Comment>>>,
}

impl CommentThread {
    #[must_use]
    pub fn new(video_id: &str, backend: Arc<dyn ContentBackend>, guard: InFlightGuard) -> Self {
        Self {
            video_id: video_id.to_owned(),
            backend,
            guard,
            liveness: Liveness::new(),
            comments: Mutex::new(Vec::new()),
            observer: None,
        }
    }

    #[must_use]
    pub fn with_observer(mut self, observer: Observer<Vec<Comment>>) -> Self {
        self.observer = Some(observer);
        self
    }

    #[must_use]
    pub fn comments(&self) -> Vec<Comment> {
        self.comments.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    #[must_use]
    pub fn is_posting(&self) -> bool {
        self.guard.is_in_flight(&self.guard_key())
    }

    pub fn unmount(&self) {
        self.liveness.end();
    }

    /// Replace the thread with the backend's list.
    ///
    /// # Errors
    ///
    /// Returns the backend's [`ContentError`]; the displayed list is kept.
    pub async fn load(&self) -> Result<Vec<Comment>, ContentError> {
        let comments = self.backend.list_comments(&self.video_id).await?;
        tracing::debug!(video_id = %self.video_id, count = comments.len(), "comments loaded");
        if self.liveness.is_alive() {
            self.set(comments.clone());
        }
        Ok(comments)
    }

    /// Post `content` as `author`. The comment shows at the head of the
    /// thread under a temporary id until the backend returns the stored row.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::EmptyComment`] for blank input, before any
    /// state changes. Backend failures are reported through the outcome.
    pub async fn post(&self, author: &User, content: &str) -> Result<MutationOutcome<ContentError>, ContentError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(ContentError::EmptyComment);
        }

        let draft = NewComment {
            video_id: self.video_id.clone(),
            user_id: author.id.clone(),
            author_name: author.display_name(),
            content: content.to_owned(),
        };
        let temp_id = format!("{TEMP_COMMENT_PREFIX}{}", uuid::Uuid::new_v4());
        let key = self.guard_key();

        let outcome = Optimistic::new(&self.guard, &key)
            .while_alive(&self.liveness)
            .run(
                || {
                    let previous = self.comments();
                    let placeholder = Comment {
                        id: temp_id.clone(),
                        video_id: draft.video_id.clone(),
                        user_id: Some(draft.user_id.clone()),
                        author_name: draft.author_name.clone(),
                        content: draft.content.clone(),
                        created_at: String::new(),
                    };
                    let mut next = Vec::with_capacity(previous.len() + 1);
                    next.push(placeholder);
                    next.extend(previous.iter().cloned());
                    self.set(next);
                    previous
                },
                || self.backend.insert_comment(&draft),
                |stored: Comment| {
                    tracing::debug!(video_id = %self.video_id, id = %stored.id, "comment stored");
                    let mut next = self.comments();
                    match next.iter().position(|c| c.id == temp_id) {
                        Some(index) => next[index] = stored,
                        None => next.insert(0, stored),
                    }
                    self.set(next);
                },
                |previous| self.set(previous),
            )
            .await;
        Ok(outcome)
    }

    fn guard_key(&self) -> String {
        format!("comment:{}", self.video_id)
    }

    fn set(&self, next: Vec<Comment>) {
        *self.comments.lock().unwrap_or_else(PoisonError::into_inner) = next;
        if let Some(observer) = &self.observer {
            observer(&self.comments());
        }
    }
}
