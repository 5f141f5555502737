use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
};
use bloodbank_core::api::BackendClient;
use bloodbank_core::observability::REQUEST_ID_HEADER;
use bloodbank_core::session::SessionStorage;
use bloodbank_core::{SessionStore, StorageError};
use tower_sessions::Session;

use crate::AppState;

/// `SessionStorage` over the visitor's cookie-identified server session.
#[derive(Clone)]
pub struct TowerSessionStorage {
    session: Session,
}

impl TowerSessionStorage {
    pub fn new(session: Session) -> Self {
        Self { session }
    }
}

fn storage_error(err: tower_sessions::session::Error) -> StorageError {
    StorageError(err.to_string())
}

#[async_trait]
impl SessionStorage for TowerSessionStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.session.get::<String>(key).await.map_err(storage_error)
    }

    async fn set_item(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.session.insert(key, value).await.map_err(storage_error)
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.session
            .remove_value(key)
            .await
            .map(|_| ())
            .map_err(storage_error)
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.session.clear().await;
        Ok(())
    }
}

/// Per-request view of the visitor: their session store plus what is needed
/// to call the backend on their behalf.
pub struct Visitor {
    pub session: Session,
    pub store: SessionStore<TowerSessionStorage>,
    pub request_id: Option<String>,
}

impl Visitor {
    /// Backend client carrying this visitor's bearer token, if any.
    pub async fn backend(&self, state: &AppState) -> BackendClient {
        state
            .backend
            .authorized(self.store.token().await)
            .with_request_id(self.request_id.clone())
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Visitor {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|_| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to extract session",
                )
                    .into_response()
            })?;

        let request_id = parts
            .headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let store = SessionStore::new(TowerSessionStorage::new(session.clone()))
            .with_token_expiry(state.session.enforce_token_expiry);

        Ok(Visitor {
            session,
            store,
            request_id,
        })
    }
}
