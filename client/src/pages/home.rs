//! Public landing page.

use leptos::prelude::*;
use memberhub::AuthState;

#[component]
pub fn HomePage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();

    view! {
        <section class="home">
            <h1>"Welcome to Memberhub"</h1>
            <p>"Video lessons and members-only material in one place."</p>
            <div class="home__actions">
                <a class="button" href="/videos">"Browse videos"</a>
                <Show
                    when=move || auth.get().is_authenticated()
                    fallback=|| view! { <a class="button button--secondary" href="/signin">"Sign in"</a> }
                >
                    <a class="button button--secondary" href="/subscription">"Members area"</a>
                </Show>
            </div>
        </section>
    }
}
