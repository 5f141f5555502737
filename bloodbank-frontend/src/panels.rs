use std::sync::Arc;
use std::time::{Duration, Instant};

use bloodbank_core::api::BackendClient;
use bloodbank_core::donors::SharedDonorController;
use dashmap::DashMap;
use tower_sessions::Session;
use uuid::Uuid;

use crate::error::AppError;

pub const PANEL_KEY: &str = "donorPanel";

pub type DonorPanel = SharedDonorController<BackendClient>;

struct Entry {
    panel: DonorPanel,
    last_used: Instant,
}

/// Donor panels of all visitors, keyed by the panel id kept in each
/// visitor's session. Panels idle for longer than `idle` are dropped.
pub struct PanelRegistry {
    panels: DashMap<String, Entry>,
    idle: Duration,
}

impl PanelRegistry {
    pub fn new(idle: Duration) -> Self {
        Self {
            panels: DashMap::new(),
            idle,
        }
    }

    /// The visitor's panel, created around `backend` on first use.
    pub async fn for_visitor(
        &self,
        session: &Session,
        backend: BackendClient,
    ) -> Result<DonorPanel, AppError> {
        let id = match session
            .get::<String>(PANEL_KEY)
            .await
            .map_err(|e| AppError::InternalError(e.into()))?
        {
            Some(id) => id,
            None => {
                let id = Uuid::new_v4().to_string();
                session
                    .insert(PANEL_KEY, &id)
                    .await
                    .map_err(|e| AppError::InternalError(e.into()))?;
                id
            }
        };

        self.prune();
        let mut entry = self.panels.entry(id).or_insert_with(|| {
            tracing::debug!("Opening donor panel");
            Entry {
                panel: SharedDonorController::new(Arc::new(backend)),
                last_used: Instant::now(),
            }
        });
        entry.last_used = Instant::now();
        Ok(entry.panel.clone())
    }

    pub async fn discard(&self, session: &Session) {
        if let Ok(Some(id)) = session.get::<String>(PANEL_KEY).await {
            self.panels.remove(&id);
        }
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    fn prune(&self) {
        let idle = self.idle;
        self.panels.retain(|_, entry| entry.last_used.elapsed() < idle);
    }
}
