//! Video library. Each card carries its own like button and comment thread.

use leptos::prelude::*;

use crate::components::comment_list::CommentList;
use crate::components::like_button::LikeButton;

/// Published catalog: (row id, title, summary).
pub const CATALOG: &[(&str, &str, &str)] = &[
    ("1", "Getting started", "A tour of the membership and how lessons are organised."),
    ("2", "Building habits", "Short daily practices that compound over a month."),
    ("3", "Going further", "Where to go once the core lessons feel easy."),
];

#[component]
pub fn VideosPage() -> impl IntoView {
    let selected = RwSignal::new(CATALOG[0].0);

    view! {
        <section class="videos">
            <h1>"Videos"</h1>
            <nav class="videos__tabs">
                {CATALOG
                    .iter()
                    .map(|&(id, title, _)| {
                        view! {
                            <button
                                class="videos__tab"
                                class:videos__tab--active=move || selected.get() == id
                                on:click=move |_| selected.set(id)
                            >
                                {title}
                            </button>
                        }
                    })
                    .collect_view()}
            </nav>
            {move || {
                let id = selected.get();
                let (_, title, summary) = CATALOG.iter().copied().find(|&(v, _, _)| v == id).unwrap_or(CATALOG[0]);
                view! {
                    <article class="video">
                        <h2>{title}</h2>
                        <p>{summary}</p>
                        <LikeButton video_id=id.to_owned()/>
                        <CommentList video_id=id.to_owned()/>
                    </article>
                }
            }}
        </section>
    }
}
