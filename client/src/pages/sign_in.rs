//! Sign-in page with sign-up and forgot-password modes.
//!
//! SYSTEM CONTEXT
//! ==============
//! Visitors arrive here on their own or sent by the access gate. In the
//! second case the route's `NavigationState` says why, and once the session
//! arrives the gate returns them to the page they asked for.

#[cfg(test)]
#[path = "sign_in_test.rs"]
mod sign_in_test;

use leptos::prelude::*;
use memberhub::AuthState;

use crate::app::Services;
use crate::util::auth::{interruption_message, validate_credentials, validate_reset_email, validate_sign_up};
use crate::util::navigation::RouteState;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormMode {
    #[default]
    SignIn,
    SignUp,
    ForgotPassword,
}

impl FormMode {
    pub fn title(self) -> &'static str {
        match self {
            Self::SignIn => "Sign in",
            Self::SignUp => "Create an account",
            Self::ForgotPassword => "Reset your password",
        }
    }

    pub fn submit_label(self) -> &'static str {
        match self {
            Self::SignIn => "Sign in",
            Self::SignUp => "Sign up",
            Self::ForgotPassword => "Send reset link",
        }
    }

    pub fn wants_password(self) -> bool {
        !matches!(self, Self::ForgotPassword)
    }
}

/// Validated form submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthRequest {
    SignIn { email: String, password: String },
    SignUp { email: String, password: String },
    Reset { email: String },
}

/// Validate the form for `mode`.
pub fn prepare(mode: FormMode, email: &str, password: &str) -> Result<AuthRequest, &'static str> {
    match mode {
        FormMode::SignIn => validate_credentials(email, password).map(|(email, password)| AuthRequest::SignIn { email, password }),
        FormMode::SignUp => validate_sign_up(email, password).map(|(email, password)| AuthRequest::SignUp { email, password }),
        FormMode::ForgotPassword => validate_reset_email(email).map(|email| AuthRequest::Reset { email }),
    }
}

/// Message after a successful sign-up.
pub fn sign_up_message(verified: bool) -> &'static str {
    if verified { "Account created. Signing you in..." } else { "Check your email to confirm your account." }
}

pub const RESET_SENT: &str = "Check your email for a password reset link.";

#[component]
pub fn SignInPage() -> impl IntoView {
    let services = expect_context::<Services>();
    let auth = expect_context::<RwSignal<AuthState>>();
    let route_state = expect_context::<RouteState>();

    let mode = RwSignal::new(FormMode::SignIn);
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let session = StoredValue::new(services.session.clone());
    let gate = StoredValue::new(services.gate);

    // Leave as soon as the session lands, wherever it came from.
    Effect::new(move || {
        if !auth.get().is_authenticated() {
            return;
        }
        let state = route_state.get_untracked();
        route_state.set(None);
        gate.with_value(|gate| {
            gate.return_after_sign_in(state.as_ref());
        });
    });

    let interruption = move || interruption_message(route_state.get().as_ref());

    let switch_to = move |next: FormMode| {
        mode.set(next);
        info.set(String::new());
    };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let request = match prepare(mode.get_untracked(), &email.get_untracked(), &password.get_untracked()) {
            Ok(request) => request,
            Err(message) => {
                info.set(message.to_owned());
                return;
            }
        };
        busy.set(true);
        info.set("Working...".to_owned());

        #[cfg(feature = "csr")]
        {
            let session = session.get_value();
            leptos::task::spawn_local(async move {
                let message = match request {
                    AuthRequest::SignIn { email, password } => match session.sign_in(&email, &password).await {
                        Ok(_) => "Signed in.".to_owned(),
                        Err(e) => e.message(),
                    },
                    AuthRequest::SignUp { email, password } => match session.sign_up(&email, &password).await {
                        Ok(response) => sign_up_message(response.session.is_some()).to_owned(),
                        Err(e) => e.message(),
                    },
                    AuthRequest::Reset { email } => match session.reset_password(&email).await {
                        Ok(()) => RESET_SENT.to_owned(),
                        Err(e) => e.message(),
                    },
                };
                let _ = info.try_set(message);
                let _ = password.try_set(String::new());
                let _ = busy.try_set(false);
            });
        }
        #[cfg(not(feature = "csr"))]
        let _ = (request, session);
    };

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>{move || mode.get().title()}</h1>
                <Show when=move || interruption().is_some()>
                    <p class="auth-card__reason">{move || interruption().unwrap_or_default()}</p>
                </Show>
                <form class="auth-form" on:submit=on_submit>
                    <input
                        class="auth-input"
                        type="email"
                        placeholder="you@example.com"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <Show when=move || mode.get().wants_password()>
                        <input
                            class="auth-input"
                            type="password"
                            placeholder="Password"
                            prop:value=move || password.get()
                            on:input=move |ev| password.set(event_target_value(&ev))
                        />
                    </Show>
                    <button class="auth-button" type="submit" disabled=move || busy.get()>
                        {move || mode.get().submit_label()}
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="auth-message">{move || info.get()}</p>
                </Show>
                <div class="auth-card__modes">
                    <Show when=move || mode.get() != FormMode::SignIn>
                        <button class="link-button" on:click=move |_| switch_to(FormMode::SignIn)>
                            "Have an account? Sign in"
                        </button>
                    </Show>
                    <Show when=move || mode.get() != FormMode::SignUp>
                        <button class="link-button" on:click=move |_| switch_to(FormMode::SignUp)>
                            "New here? Create an account"
                        </button>
                    </Show>
                    <Show when=move || mode.get() == FormMode::SignIn>
                        <button class="link-button" on:click=move |_| switch_to(FormMode::ForgotPassword)>
                            "Forgot your password?"
                        </button>
                    </Show>
                </div>
            </div>
        </div>
    }
}
