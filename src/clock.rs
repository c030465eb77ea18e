//! Wall-clock source that works on native targets and in the browser.

/// Current time as whole seconds since the Unix epoch.
#[cfg(not(target_arch = "wasm32"))]
#[must_use]
pub fn now_unix() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_secs()).unwrap_or(0)
}

/// Current time as whole seconds since the Unix epoch.
#[cfg(target_arch = "wasm32")]
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn now_unix() -> i64 {
    (js_sys::Date::now() / 1000.0) as i64
}
