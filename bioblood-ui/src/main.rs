//! BioBlood Web
//!
//! Blood group detection front-end built with Leptos (WASM).
//!
//! # Features
//!
//! - Login and signup modals with a session kept in `localStorage`
//! - Fingerprint upload with preview, prediction and feedback
//! - Prediction history and profile tabs
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application that compiles to
//! WebAssembly. All behavior lives in the `bioblood` core; this crate binds
//! it to the DOM and supplies the browser transport and storage.

use leptos::*;

mod api;
mod app;
mod components;
mod pages;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    // Mount the app to the document body
    mount_to_body(|| view! { <app::App /> });
}
