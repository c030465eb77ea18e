//! Account page: who is signed in, password change, sign out.

use leptos::prelude::*;
use memberhub::AuthState;

use crate::app::Services;
use crate::components::password_form::PasswordForm;

#[component]
pub fn AccountPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let session = StoredValue::new(expect_context::<Services>().session);
    let email = move || auth.get().user().and_then(|u| u.email.clone()).unwrap_or_default();

    let on_sign_out = move |_| {
        #[cfg(feature = "csr")]
        {
            let session = session.get_value();
            leptos::task::spawn_local(async move { session.sign_out().await });
        }
        #[cfg(not(feature = "csr"))]
        let _ = session;
    };

    view! {
        <section class="account">
            <h1>"Your account"</h1>
            <p class="account__email">"Signed in as " <strong>{email}</strong></p>
            <h2>"Change password"</h2>
            <PasswordForm/>
            <button class="button button--secondary" on:click=on_sign_out>"Sign out"</button>
        </section>
    }
}
