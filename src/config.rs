//! Backend and site configuration.
//!
//! Values come from `MEMBERHUB_*` variables. Native callers read the process
//! environment; the browser shell passes a lookup built from values baked in
//! at compile time.

use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_SITE_URL: &str = "http://localhost:8080";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_VIDEOS_TABLE: &str = "videos";
pub const DEFAULT_LIKES_COLUMN: &str = "likes";
pub const DEFAULT_COMMENTS_TABLE: &str = "comments";

/// Connection settings for the hosted auth + database backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub url: String,
    pub anon_key: String,
    pub site_url: String,
    pub request_timeout: Duration,
    pub videos_table: String,
    pub likes_column: String,
    pub comments_table: String,
}

impl BackendConfig {
    /// Build config from the process environment.
    ///
    /// Required:
    /// - `MEMBERHUB_SUPABASE_URL`
    /// - `MEMBERHUB_SUPABASE_ANON_KEY`
    ///
    /// Optional:
    /// - `MEMBERHUB_SITE_URL`: default `http://localhost:8080`
    /// - `MEMBERHUB_REQUEST_TIMEOUT_SECS`: default 30
    /// - `MEMBERHUB_VIDEOS_TABLE`, `MEMBERHUB_LIKES_COLUMN`, `MEMBERHUB_COMMENTS_TABLE`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required value is missing or a value
    /// does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`BackendConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

        let url = get("MEMBERHUB_SUPABASE_URL")
            .ok_or(ConfigError::Missing { var: "MEMBERHUB_SUPABASE_URL" })?
            .trim_end_matches('/')
            .to_owned();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::Invalid { var: "MEMBERHUB_SUPABASE_URL", value: url });
        }
        let anon_key = get("MEMBERHUB_SUPABASE_ANON_KEY").ok_or(ConfigError::Missing { var: "MEMBERHUB_SUPABASE_ANON_KEY" })?;

        let site_url = get("MEMBERHUB_SITE_URL")
            .unwrap_or_else(|| DEFAULT_SITE_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();

        let timeout_secs = match get("MEMBERHUB_REQUEST_TIMEOUT_SECS") {
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::Invalid { var: "MEMBERHUB_REQUEST_TIMEOUT_SECS", value: raw })?,
        };

        Ok(Self {
            url,
            anon_key,
            site_url,
            request_timeout: Duration::from_secs(timeout_secs),
            videos_table: get("MEMBERHUB_VIDEOS_TABLE").unwrap_or_else(|| DEFAULT_VIDEOS_TABLE.to_owned()),
            likes_column: get("MEMBERHUB_LIKES_COLUMN").unwrap_or_else(|| DEFAULT_LIKES_COLUMN.to_owned()),
            comments_table: get("MEMBERHUB_COMMENTS_TABLE").unwrap_or_else(|| DEFAULT_COMMENTS_TABLE.to_owned()),
        })
    }
}

/// Fixed site destinations the core navigates to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteRoutes {
    /// Public landing page; sign-out always ends here.
    pub home_path: String,
    /// Where denied visitors are sent.
    pub sign_in_path: String,
    /// Target of password-reset emails.
    pub reset_password_path: String,
}

impl Default for SiteRoutes {
    fn default() -> Self {
        Self {
            home_path: "/".to_owned(),
            sign_in_path: "/signin".to_owned(),
            reset_password_path: "/reset-password".to_owned(),
        }
    }
}

impl SiteRoutes {
    /// Absolute URL the backend should link to from verification emails.
    #[must_use]
    pub fn email_callback_url(&self, site_url: &str) -> String {
        format!("{site_url}{}", self.sign_in_path)
    }

    /// Absolute URL the backend should link to from password-reset emails.
    #[must_use]
    pub fn reset_callback_url(&self, site_url: &str) -> String {
        format!("{site_url}{}", self.reset_password_path)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
