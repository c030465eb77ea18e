//! # memberhub-client
//!
//! Leptos + WASM frontend for the membership site. Pages and components
//! render on top of the `memberhub` core: session state, the access gate,
//! and the like/comment widget controllers all come in through context.

pub mod app;
pub mod components;
pub mod pages;
pub mod state;
pub mod util;

/// Browser entry point: install panic and log hooks, then mount the app.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount::mount_to_body(app::App);
}
