//! bloodbank-core: session state, role routing and donor management for the
//! blood bank web front end. Nothing here knows about HTTP serving.
pub mod api;
pub mod donors;
pub mod error;
pub mod gate;
pub mod models;
pub mod observability;
pub mod routing;
pub mod session;

pub use api::{BackendClient, BackendSettings};
pub use error::{ApiError, StorageError};
pub use gate::{Decision, RoleGate, View};
pub use models::Role;
pub use routing::RoleRouter;
pub use session::{SessionStore, SignedIn};
