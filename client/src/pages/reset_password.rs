//! Landing page of password-reset emails.
//!
//! The link carries a recovery session in the URL fragment. Adopting it
//! signs the visitor in through the usual session events; the form then
//! sets the new password.

use leptos::prelude::*;
use memberhub::Navigator;

use crate::app::Services;
use crate::components::password_form::PasswordForm;
use crate::util::navigation::SignalNavigator;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkStatus {
    Checking,
    Ready,
    Invalid,
}

/// Status once the fragment has been processed.
pub fn link_status(adopted: bool, signed_in: bool) -> LinkStatus {
    if adopted || signed_in { LinkStatus::Ready } else { LinkStatus::Invalid }
}

#[component]
pub fn ResetPasswordPage() -> impl IntoView {
    let session = StoredValue::new(expect_context::<Services>().session);
    let navigator = expect_context::<SignalNavigator>();
    let status = RwSignal::new(LinkStatus::Checking);

    #[cfg(feature = "csr")]
    {
        let fragment = web_sys::window().and_then(|w| w.location().hash().ok()).unwrap_or_default();
        let manager = session.get_value();
        leptos::task::spawn_local(async move {
            let adopted = match manager.complete_email_link(&fragment).await {
                Ok(found) => found.is_some(),
                Err(e) => {
                    leptos::logging::warn!("reset link rejected: {e}");
                    false
                }
            };
            let signed_in = manager.ready().await.is_authenticated();
            let _ = status.try_set(link_status(adopted, signed_in));
        });
    }
    #[cfg(not(feature = "csr"))]
    let _ = session;

    let on_updated = Callback::new(move |()| navigator.navigate("/account", None));

    move || match status.get() {
        LinkStatus::Checking => view! { <p class="reset__status">"Checking your reset link..."</p> }.into_any(),
        LinkStatus::Invalid => view! {
            <section class="reset">
                <h1>"Link expired"</h1>
                <p>"This reset link is invalid or has expired. Request a new one from the sign-in page."</p>
                <a href="/signin">"Back to sign in"</a>
            </section>
        }
        .into_any(),
        LinkStatus::Ready => view! {
            <section class="reset">
                <h1>"Choose a new password"</h1>
                <PasswordForm on_updated/>
            </section>
        }
        .into_any(),
    }
}
