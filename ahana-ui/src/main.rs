//! Ahana Portal
//!
//! School nurse portal built with Leptos (WASM).
//!
//! # Features
//!
//! - Student roster with add/edit and PIN code lookup
//! - Health assessments and infirmary visits per student
//! - Medicine inventory with stock status
//! - Infirmary reports with CSV export
//!
//! # Architecture
//!
//! Client-side rendered Leptos app. Every backend call goes through the
//! shared `ahana` client with a `gloo-net` transport and `localStorage`
//! session store (see [`api`]).

use leptos::*;

mod api;
mod app;
mod components;
mod pages;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    mount_to_body(|| view! { <app::App /> });
}
