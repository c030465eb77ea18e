//! Members-only subscription content.

use leptos::prelude::*;
use memberhub::AuthState;

use crate::state::auth::account_label;

#[component]
pub fn SubscriptionPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let greeting = move || format!("Welcome back, {}.", account_label(&auth.get()).unwrap_or_default());

    view! {
        <section class="subscription">
            <h1>"Members area"</h1>
            <p class="subscription__greeting">{greeting}</p>
            <ul class="subscription__perks">
                <li>"Full video library with downloadable notes"</li>
                <li>"Monthly live Q&A sessions"</li>
                <li>"Early access to new courses"</li>
            </ul>
        </section>
    }
}
