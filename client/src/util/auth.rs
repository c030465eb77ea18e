//! Shared auth form helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Sign-in, sign-up, reset and change-password forms apply identical input
//! rules before anything reaches the backend.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use memberhub::NavigationState;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Trim the email and require both fields.
pub fn validate_credentials(email: &str, password: &str) -> Result<(String, String), &'static str> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err("Enter your email and password.");
    }
    if !email.contains('@') {
        return Err("Enter a valid email address.");
    }
    Ok((email.to_owned(), password.to_owned()))
}

/// Sign-up additionally enforces the minimum password length.
pub fn validate_sign_up(email: &str, password: &str) -> Result<(String, String), &'static str> {
    let (email, password) = validate_credentials(email, password)?;
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err("Password must be at least 6 characters.");
    }
    Ok((email, password))
}

pub fn validate_reset_email(email: &str) -> Result<String, &'static str> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err("Enter the email address of your account.");
    }
    Ok(email.to_owned())
}

/// New password plus its confirmation.
pub fn validate_new_password(password: &str, confirm: &str) -> Result<String, &'static str> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err("Password must be at least 6 characters.");
    }
    if password != confirm {
        return Err("Passwords do not match.");
    }
    Ok(password.to_owned())
}

/// Reason to show above the sign-in form when a protected page sent the
/// visitor here.
pub fn interruption_message(state: Option<&NavigationState>) -> Option<String> {
    state.filter(|s| s.auth_required).map(|s| s.auth_message.clone()).filter(|m| !m.is_empty())
}
