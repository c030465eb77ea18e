//! Dismissible notice strip under the header.

use leptos::prelude::*;

use crate::state::notice::{NOTICE_TTL_MS, NoticeState, NoticeTone};

/// Show `message` and schedule it to dismiss itself.
pub fn flash(notice: RwSignal<NoticeState>, message: impl Into<String>, tone: NoticeTone) {
    let Some(seq) = notice.try_update(|n| n.show(message, tone)) else {
        return;
    };
    #[cfg(feature = "csr")]
    leptos::task::spawn_local(async move {
        gloo_timers::future::TimeoutFuture::new(NOTICE_TTL_MS).await;
        let _ = notice.try_update(|n| n.expire(seq));
    });
    #[cfg(not(feature = "csr"))]
    let _ = (seq, NOTICE_TTL_MS);
}

#[component]
pub fn NoticeBar() -> impl IntoView {
    let notice = expect_context::<RwSignal<NoticeState>>();
    let class = move || match notice.get().tone {
        NoticeTone::Info => "notice notice--info",
        NoticeTone::Error => "notice notice--error",
    };

    view! {
        <Show when=move || notice.get().message.is_some()>
            <div class=class role="status">
                <span>{move || notice.get().message.unwrap_or_default()}</span>
                <button class="notice__close" on:click=move |_| notice.update(NoticeState::dismiss)>
                    "Dismiss"
                </button>
            </div>
        </Show>
    }
}
