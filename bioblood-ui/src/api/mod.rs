//! Browser backends for the core
//!
//! - [`GlooTransport`]: HTTP through `fetch` via gloo-net
//! - [`LocalStorage`]: session persistence in `window.localStorage`

pub mod storage;
pub mod transport;

pub use storage::LocalStorage;
pub use transport::GlooTransport;

use bioblood::gateway::{ApiGateway, ApiRoutes, GatewayMode};
use std::sync::Arc;
use std::time::Duration;

/// localStorage key overriding the backend mode (demo, live, offline)
pub const MODE_KEY: &str = "bioblood_api_mode";

/// Artificial latency of canned responses
pub const STUB_DELAY: Duration = Duration::from_millis(500);

/// Host the page was served from
pub fn current_host() -> String {
    web_sys::window()
        .and_then(|w| w.location().hostname().ok())
        .unwrap_or_else(|| "localhost".to_string())
}

/// Backend mode from localStorage, demo when unset or unreadable
pub fn configured_mode() -> GatewayMode {
    web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .and_then(|s| s.get_item(MODE_KEY).ok().flatten())
        .and_then(|mode| match mode.parse() {
            Ok(mode) => Some(mode),
            Err(e) => {
                web_sys::console::warn_1(&format!("Ignoring {}: {}", MODE_KEY, e).into());
                None
            }
        })
        .unwrap_or_default()
}

/// Gateway wired for the current page
pub fn build_gateway() -> ApiGateway {
    let routes = ApiRoutes::for_host(current_host());
    let mode = configured_mode();
    web_sys::console::log_1(&format!("API mode: {}, host: {}", mode, routes.host).into());

    ApiGateway::for_mode_with(routes, mode, STUB_DELAY, Arc::new(GlooTransport))
}
