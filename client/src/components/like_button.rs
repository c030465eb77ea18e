//! Like button bound to one video.

use std::sync::Arc;

use leptos::prelude::*;
use memberhub::{LikeState, LikeToggle};

use crate::app::Services;
use crate::state::notice::{NoticeState, NoticeTone, outcome_notice};

use super::notice_bar::flash;

#[component]
pub fn LikeButton(video_id: String) -> impl IntoView {
    let services = expect_context::<Services>();
    let notice = expect_context::<RwSignal<NoticeState>>();
    let state = RwSignal::new(LikeState::default());
    let busy = RwSignal::new(false);

    let toggle = LikeToggle::new(&video_id, services.content, services.store, services.mutations)
        .with_observer(Arc::new(move |next: &LikeState| {
            let _ = state.try_set(*next);
        }));
    state.set(toggle.state());
    let toggle = StoredValue::new(Arc::new(toggle));

    #[cfg(feature = "csr")]
    {
        let loader = toggle.get_value();
        leptos::task::spawn_local(async move {
            if let Err(e) = loader.load().await {
                leptos::logging::warn!("like count unavailable: {e}");
            }
        });
    }
    on_cleanup(move || {
        if let Some(toggle) = toggle.try_get_value() {
            toggle.unmount();
        }
    });

    let on_click = move |_| {
        if busy.get_untracked() {
            return;
        }
        busy.set(true);
        #[cfg(feature = "csr")]
        {
            let toggle = toggle.get_value();
            leptos::task::spawn_local(async move {
                let outcome = toggle.toggle().await;
                if let Some(message) = outcome_notice("save your like", &outcome) {
                    flash(notice, message, NoticeTone::Error);
                }
                let _ = busy.try_set(false);
            });
        }
        #[cfg(not(feature = "csr"))]
        let _ = (notice, toggle);
    };

    let class = move || if state.get().liked { "like-button like-button--liked" } else { "like-button" };

    view! {
        <button class=class on:click=on_click disabled=move || busy.get() aria-pressed=move || state.get().liked.to_string()>
            <span class="like-button__icon">{move || if state.get().liked { "♥" } else { "♡" }}</span>
            <span class="like-button__count">{move || state.get().count}</span>
        </button>
    }
}
