//! Per-visitor session state: authentication flag, bearer token, cached
//! profile and last-selected role.

mod storage;
mod store;
pub mod token;

pub use storage::{MemoryStorage, SessionStorage};
pub use store::{
    Session, SessionStore, SignedIn, AUTHENTICATED_KEY, CURRENT_ROLE_KEY, PROFILE_KEY, TOKEN_KEY,
};
