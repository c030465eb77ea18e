//! Backend settings baked in at build time.
//!
//! The browser has no process environment, so `MEMBERHUB_*` values are read
//! with `option_env!` when the WASM bundle is compiled and fed to
//! `BackendConfig::from_lookup`.

use memberhub::BackendConfig;
use memberhub::error::ConfigError;

fn baked(key: &str) -> Option<&'static str> {
    match key {
        "MEMBERHUB_SUPABASE_URL" => option_env!("MEMBERHUB_SUPABASE_URL"),
        "MEMBERHUB_SUPABASE_ANON_KEY" => option_env!("MEMBERHUB_SUPABASE_ANON_KEY"),
        "MEMBERHUB_SITE_URL" => option_env!("MEMBERHUB_SITE_URL"),
        "MEMBERHUB_REQUEST_TIMEOUT_SECS" => option_env!("MEMBERHUB_REQUEST_TIMEOUT_SECS"),
        "MEMBERHUB_VIDEOS_TABLE" => option_env!("MEMBERHUB_VIDEOS_TABLE"),
        "MEMBERHUB_LIKES_COLUMN" => option_env!("MEMBERHUB_LIKES_COLUMN"),
        "MEMBERHUB_COMMENTS_TABLE" => option_env!("MEMBERHUB_COMMENTS_TABLE"),
        _ => None,
    }
}

/// Config from build-time values. The site URL falls back to the page's
/// own origin when it was not baked in.
pub fn load() -> Result<BackendConfig, ConfigError> {
    let origin = page_origin();
    BackendConfig::from_lookup(|key| match (key, baked(key)) {
        ("MEMBERHUB_SITE_URL", None) => origin.clone(),
        (_, value) => value.map(str::to_owned),
    })
}

fn page_origin() -> Option<String> {
    #[cfg(feature = "csr")]
    {
        web_sys::window().and_then(|w| w.location().origin().ok())
    }
    #[cfg(not(feature = "csr"))]
    {
        None
    }
}
