//! Site header with navigation and the account area.

use leptos::prelude::*;
use memberhub::AuthState;

use crate::app::Services;
use crate::state::auth::{account_label, offers_sign_in};

#[component]
pub fn NavBar() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let session = StoredValue::new(expect_context::<Services>().session);
    let signing_out = RwSignal::new(false);

    let on_sign_out = move |_| {
        if signing_out.get_untracked() {
            return;
        }
        signing_out.set(true);
        #[cfg(feature = "csr")]
        {
            let session = session.get_value();
            leptos::task::spawn_local(async move {
                session.sign_out().await;
                let _ = signing_out.try_set(false);
            });
        }
        #[cfg(not(feature = "csr"))]
        let _ = session;
    };

    view! {
        <header class="nav-bar">
            <a class="nav-bar__brand" href="/">"Memberhub"</a>
            <nav class="nav-bar__links">
                <a href="/videos">"Videos"</a>
                <a href="/subscription">"Members"</a>
            </nav>
            <div class="nav-bar__account">
                <Show when=move || offers_sign_in(&auth.get())>
                    <a class="nav-bar__sign-in" href="/signin">"Sign in"</a>
                </Show>
                <Show when=move || account_label(&auth.get()).is_some()>
                    <a href="/account">{move || account_label(&auth.get()).unwrap_or_default()}</a>
                    <button class="nav-bar__sign-out" on:click=on_sign_out disabled=move || signing_out.get()>
                        "Sign out"
                    </button>
                </Show>
            </div>
        </header>
    }
}
