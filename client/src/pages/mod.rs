//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration and delegates rendering details
//! to `components`. Pages behind the access gate are wrapped in
//! `ProtectedRoute` by the router, not by the page itself.

pub mod account;
pub mod home;
pub mod reset_password;
pub mod sign_in;
pub mod subscription;
pub mod videos;
