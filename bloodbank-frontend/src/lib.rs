pub mod config;
pub mod error;
pub mod flash;
pub mod handlers;
pub mod middleware;
pub mod panels;
pub mod services;
pub mod session;
pub mod startup;
pub mod views;

use bloodbank_core::BackendClient;
use config::SessionSettings;
use panels::PanelRegistry;
use std::sync::Arc;
use std::time::Duration;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub backend: BackendClient,
    pub panels: Arc<PanelRegistry>,
    pub session: SessionSettings,
}

impl AppState {
    pub fn new(backend: BackendClient, session: SessionSettings) -> Self {
        let idle = Duration::from_secs(session.inactivity_hours.max(1) as u64 * 3600);
        Self {
            backend,
            panels: Arc::new(PanelRegistry::new(idle)),
            session,
        }
    }
}
