//! Comment thread with an optimistic post form.

use std::sync::Arc;

use leptos::prelude::*;
use memberhub::{AuthState, Comment, CommentThread, ContentError};

use crate::app::Services;
use crate::state::notice::{NoticeState, NoticeTone, outcome_notice};

use super::notice_bar::flash;

/// Caption under a comment: its timestamp, or a marker while it is pending.
pub fn comment_caption(comment: &Comment) -> String {
    if comment.is_pending() {
        "Posting...".to_owned()
    } else {
        comment.created_at.get(..10).unwrap_or(&comment.created_at).to_owned()
    }
}

#[component]
pub fn CommentList(video_id: String) -> impl IntoView {
    let services = expect_context::<Services>();
    let auth = expect_context::<RwSignal<AuthState>>();
    let notice = expect_context::<RwSignal<NoticeState>>();
    let comments = RwSignal::new(Vec::<Comment>::new());
    let draft = RwSignal::new(String::new());
    let posting = RwSignal::new(false);

    let thread = CommentThread::new(&video_id, services.content, services.mutations)
        .with_observer(Arc::new(move |next: &Vec<Comment>| {
            let _ = comments.try_set(next.clone());
        }));
    let thread = StoredValue::new(Arc::new(thread));

    #[cfg(feature = "csr")]
    {
        let loader = thread.get_value();
        leptos::task::spawn_local(async move {
            if let Err(e) = loader.load().await {
                leptos::logging::warn!("comments unavailable: {e}");
            }
        });
    }
    on_cleanup(move || {
        if let Some(thread) = thread.try_get_value() {
            thread.unmount();
        }
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if posting.get_untracked() {
            return;
        }
        let Some(author) = auth.get_untracked().user().cloned() else {
            flash(notice, "Sign in to comment.", NoticeTone::Info);
            return;
        };
        let content = draft.get_untracked();
        posting.set(true);
        #[cfg(feature = "csr")]
        {
            let thread = thread.get_value();
            leptos::task::spawn_local(async move {
                match thread.post(&author, &content).await {
                    Ok(outcome) => {
                        if outcome.is_committed() {
                            let _ = draft.try_set(String::new());
                        }
                        if let Some(message) = outcome_notice("post your comment", &outcome) {
                            flash(notice, message, NoticeTone::Error);
                        }
                    }
                    Err(ContentError::EmptyComment) => flash(notice, "Write something first.", NoticeTone::Info),
                    Err(e) => flash(notice, e.message(), NoticeTone::Error),
                }
                let _ = posting.try_set(false);
            });
        }
        #[cfg(not(feature = "csr"))]
        let _ = (author, content, thread);
    };

    view! {
        <section class="comments">
            <form class="comments__form" on:submit=on_submit>
                <textarea
                    class="comments__input"
                    placeholder="Add a comment"
                    prop:value=move || draft.get()
                    on:input=move |ev| draft.set(event_target_value(&ev))
                ></textarea>
                <button class="comments__submit" type="submit" disabled=move || posting.get()>
                    "Post"
                </button>
            </form>
            <ul class="comments__list">
                <For
                    each=move || comments.get()
                    key=|c: &Comment| c.id.clone()
                    children=move |c: Comment| {
                        let class = if c.is_pending() { "comment comment--pending" } else { "comment" };
                        let caption = comment_caption(&c);
                        view! {
                            <li class=class>
                                <strong class="comment__author">{c.author_name}</strong>
                                <p class="comment__body">{c.content}</p>
                                <small class="comment__time">{caption}</small>
                            </li>
                        }
                    }
                />
            </ul>
        </section>
    }
}
