use chrono::Utc;
use serde::Serialize;

use super::storage::SessionStorage;
use super::token;
use crate::error::StorageError;
use crate::models::{Profile, Role};

pub const AUTHENTICATED_KEY: &str = "isAuthenticated";
pub const TOKEN_KEY: &str = "token";
pub const PROFILE_KEY: &str = "profileData";
pub const CURRENT_ROLE_KEY: &str = "currentRole";

/// Everything the front end knows about the signed-in visitor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    pub authenticated: bool,
    pub token: Option<String>,
    pub profile: Option<Profile>,
    pub current_role: Option<String>,
}

/// Result of a successful sign-in, written in one step by `establish`.
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub token: String,
    pub profile: Profile,
    pub role: Role,
}

/// Typed access to the visitor's session storage.
///
/// Lifecycle: `snapshot` when a page is rendered, `establish` after sign-in,
/// `teardown` on sign-out. Nothing expires on its own unless token expiry
/// enforcement is on and the stored token is a JWT past its `exp`.
pub struct SessionStore<S> {
    storage: S,
    enforce_token_expiry: bool,
}

impl<S: SessionStorage> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            enforce_token_expiry: true,
        }
    }

    pub fn with_token_expiry(mut self, enforce: bool) -> Self {
        self.enforce_token_expiry = enforce;
        self
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub async fn set_authenticated(&self, flag: bool) -> Result<(), StorageError> {
        let value = if flag { "true" } else { "false" };
        self.storage
            .set_item(AUTHENTICATED_KEY, value.to_string())
            .await
    }

    /// Fails closed: an unreadable flag counts as signed out.
    pub async fn is_authenticated(&self) -> bool {
        let flag = match self.storage.get_item(AUTHENTICATED_KEY).await {
            Ok(value) => value.as_deref() == Some("true"),
            Err(e) => {
                tracing::warn!(error = %e, "Could not read authentication flag");
                false
            }
        };
        if !flag {
            return false;
        }

        if self.enforce_token_expiry {
            if let Some(token) = self.token().await {
                if token::is_expired(&token, Utc::now().timestamp()) {
                    tracing::info!("Session token has expired");
                    return false;
                }
            }
        }
        true
    }

    pub async fn set_token(&self, token: &str) -> Result<(), StorageError> {
        self.storage.set_item(TOKEN_KEY, token.to_string()).await
    }

    pub async fn token(&self) -> Option<String> {
        self.storage
            .get_item(TOKEN_KEY)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Could not read session token");
                None
            })
            .filter(|t| !t.is_empty())
    }

    pub async fn set_profile(&self, profile: &Profile) -> Result<(), StorageError> {
        let blob = serde_json::to_string(profile)?;
        self.storage.set_item(PROFILE_KEY, blob).await
    }

    /// Never fails: a missing, unreadable or malformed entry is `None`.
    pub async fn get_profile(&self) -> Option<Profile> {
        let blob = match self.storage.get_item(PROFILE_KEY).await {
            Ok(Some(blob)) => blob,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "Could not read cached profile");
                return None;
            }
        };

        match serde_json::from_str::<Profile>(&blob) {
            Ok(profile) => Some(profile),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring malformed cached profile");
                None
            }
        }
    }

    pub async fn set_current_role(&self, role: Role) -> Result<(), StorageError> {
        self.storage
            .set_item(CURRENT_ROLE_KEY, role.label().to_string())
            .await
    }

    /// Raw cached role label; interpretation is left to the role router.
    pub async fn current_role(&self) -> Option<String> {
        self.storage
            .get_item(CURRENT_ROLE_KEY)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Could not read cached role");
                None
            })
    }

    pub async fn establish(&self, signed_in: &SignedIn) -> Result<(), StorageError> {
        self.set_token(&signed_in.token).await?;
        self.set_profile(&signed_in.profile).await?;
        self.set_current_role(signed_in.role).await?;
        // flag last, so a half-written session never reads as signed in
        self.set_authenticated(true).await?;
        tracing::info!(role = %signed_in.role, "Session established");
        Ok(())
    }

    pub async fn snapshot(&self) -> Session {
        Session {
            authenticated: self.is_authenticated().await,
            token: self.token().await,
            profile: self.get_profile().await,
            current_role: self.current_role().await,
        }
    }

    pub async fn teardown(&self) -> Result<(), StorageError> {
        self.storage.clear().await?;
        tracing::info!("Session cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AdminProfile, DonorProfile};
    use crate::session::storage::MemoryStorage;

    fn store() -> SessionStore<MemoryStorage> {
        SessionStore::new(MemoryStorage::new())
    }

    fn admin() -> SignedIn {
        SignedIn {
            token: "opaque-token".into(),
            profile: Profile::Admin(AdminProfile {
                full_name: "Michael Chen".into(),
                email: "m.chen@bloodbank.admin".into(),
                phone: String::new(),
            }),
            role: Role::Admin,
        }
    }

    #[tokio::test]
    async fn starts_signed_out() {
        let store = store();
        assert!(!store.is_authenticated().await);
        assert_eq!(store.snapshot().await, Session::default());
    }

    #[tokio::test]
    async fn flag_round_trips() {
        let store = store();
        store.set_authenticated(true).await.unwrap();
        assert!(store.is_authenticated().await);
        store.set_authenticated(false).await.unwrap();
        assert!(!store.is_authenticated().await);
    }

    #[tokio::test]
    async fn establish_writes_everything() {
        let store = store();
        store.establish(&admin()).await.unwrap();

        let session = store.snapshot().await;
        assert!(session.authenticated);
        assert_eq!(session.token.as_deref(), Some("opaque-token"));
        assert_eq!(session.current_role.as_deref(), Some("Admin"));
        assert_eq!(session.profile.map(|p| p.role()), Some(Role::Admin));

        let blob = store.storage().get_item(PROFILE_KEY).await.unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&blob).unwrap();
        assert_eq!(value["role"], "ADMIN");
    }

    #[tokio::test]
    async fn malformed_profiles_read_as_absent() {
        let store = store();
        for blob in ["", "not json", "{", "[1,2]", r#"{"role":"SURGEON"}"#, "null", "42"] {
            store
                .storage()
                .set_item(PROFILE_KEY, blob.to_string())
                .await
                .unwrap();
            assert_eq!(store.get_profile().await, None, "blob {:?}", blob);
        }
    }

    #[tokio::test]
    async fn profile_round_trips() {
        let store = store();
        let profile = Profile::Donor(DonorProfile {
            full_name: "Jane Doe".into(),
            blood_group: "O+".into(),
            ..Default::default()
        });
        store.set_profile(&profile).await.unwrap();
        assert_eq!(store.get_profile().await, Some(profile));
    }

    #[tokio::test]
    async fn expired_jwt_ends_the_session() {
        let store = store();
        store
            .set_token(&token::jwt_with_exp(Utc::now().timestamp() - 60))
            .await
            .unwrap();
        store.set_authenticated(true).await.unwrap();
        assert!(!store.is_authenticated().await);

        let lenient = SessionStore::new(MemoryStorage::new()).with_token_expiry(false);
        lenient
            .set_token(&token::jwt_with_exp(Utc::now().timestamp() - 60))
            .await
            .unwrap();
        lenient.set_authenticated(true).await.unwrap();
        assert!(lenient.is_authenticated().await);
    }

    #[tokio::test]
    async fn live_jwt_keeps_the_session() {
        let store = store();
        store
            .set_token(&token::jwt_with_exp(Utc::now().timestamp() + 3600))
            .await
            .unwrap();
        store.set_authenticated(true).await.unwrap();
        assert!(store.is_authenticated().await);
    }

    #[tokio::test]
    async fn teardown_clears_the_area() {
        let store = store();
        store.establish(&admin()).await.unwrap();
        store.teardown().await.unwrap();
        assert!(!store.is_authenticated().await);
        assert_eq!(store.get_profile().await, None);
        assert_eq!(store.token().await, None);
    }
}
