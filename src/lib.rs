//! CampusConnect - Student, Professor and Admin Portal
//!
//! Local and federated sign-in, two-step student registration and role
//! dashboards, built with Leptos and axum.

#![recursion_limit = "512"]

pub mod app;
pub mod core;
pub mod ui;

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    use crate::app::*;
    console_error_panic_hook::set_once();
    leptos::mount::hydrate_body(App);
}
