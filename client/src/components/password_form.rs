//! New-password form shared by the account and reset-password pages.

use leptos::prelude::*;

use crate::app::Services;
use crate::state::notice::{NoticeState, NoticeTone};
use crate::util::auth::validate_new_password;

use super::notice_bar::flash;

#[component]
pub fn PasswordForm(#[prop(optional)] on_updated: Option<Callback<()>>) -> impl IntoView {
    let session = StoredValue::new(expect_context::<Services>().session);
    let notice = expect_context::<RwSignal<NoticeState>>();
    let password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let error = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let new_password = match validate_new_password(&password.get_untracked(), &confirm.get_untracked()) {
            Ok(value) => value,
            Err(message) => {
                error.set(message.to_owned());
                return;
            }
        };
        error.set(String::new());
        busy.set(true);

        #[cfg(feature = "csr")]
        {
            let session = session.get_value();
            leptos::task::spawn_local(async move {
                match session.update_password(&new_password).await {
                    Ok(_) => {
                        let _ = password.try_set(String::new());
                        let _ = confirm.try_set(String::new());
                        flash(notice, "Password updated.", NoticeTone::Info);
                        if let Some(callback) = on_updated {
                            callback.run(());
                        }
                    }
                    Err(e) => {
                        let _ = error.try_set(e.message());
                    }
                }
                let _ = busy.try_set(false);
            });
        }
        #[cfg(not(feature = "csr"))]
        let _ = (new_password, session, notice, on_updated);
    };

    view! {
        <form class="password-form" on:submit=on_submit>
            <input
                class="auth-input"
                type="password"
                placeholder="New password"
                prop:value=move || password.get()
                on:input=move |ev| password.set(event_target_value(&ev))
            />
            <input
                class="auth-input"
                type="password"
                placeholder="Confirm new password"
                prop:value=move || confirm.get()
                on:input=move |ev| confirm.set(event_target_value(&ev))
            />
            <button class="auth-button" type="submit" disabled=move || busy.get()>
                "Update password"
            </button>
            <Show when=move || !error.get().is_empty()>
                <p class="auth-message auth-message--error">{move || error.get()}</p>
            </Show>
        </form>
    }
}
