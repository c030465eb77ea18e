//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render site chrome and the interactive widgets while reading
//! shared state from Leptos context providers.

pub mod comment_list;
pub mod like_button;
pub mod nav_bar;
pub mod notice_bar;
pub mod password_form;
pub mod protected_route;
