//! Backend REST API: one trait per concern so each page's dependencies can be
//! faked in isolation.

mod client;
#[cfg(any(test, feature = "test-util"))]
mod mock;

use async_trait::async_trait;

use crate::error::ApiError;
use crate::models::{
    BloodRequest, BloodRequestRecord, Credentials, DonorForm, DonorId, DonorRecord, DonorSignUp,
    Role, SignInResponse, StaffAccount,
};

pub use client::{BackendClient, BackendSettings};
#[cfg(any(test, feature = "test-util"))]
pub use mock::{MockBackend, MockOp};

#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn sign_in(&self, role: Role, credentials: &Credentials)
        -> Result<SignInResponse, ApiError>;
    async fn sign_up(&self, donor: &DonorSignUp) -> Result<(), ApiError>;
}

#[async_trait]
pub trait DonorApi: Send + Sync {
    async fn list_donors(&self) -> Result<Vec<DonorRecord>, ApiError>;
    async fn create_donor(&self, form: &DonorForm) -> Result<(), ApiError>;
    async fn update_donor(&self, id: DonorId, form: &DonorForm) -> Result<(), ApiError>;
    async fn delete_donor(&self, id: DonorId) -> Result<(), ApiError>;
}

#[async_trait]
pub trait BloodRequestApi: Send + Sync {
    async fn submit_request(&self, request: &BloodRequest) -> Result<(), ApiError>;
    async fn list_requests(&self) -> Result<Vec<BloodRequestRecord>, ApiError>;
}

#[async_trait]
pub trait StaffApi: Send + Sync {
    /// Returns the backend's acknowledgement text.
    async fn add_staff(&self, staff: &StaffAccount) -> Result<String, ApiError>;
}
