pub mod activity;
pub mod blood_request;
pub mod donor;
pub mod profile;
pub mod role;

use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

pub use activity::{activity_feed, ActivityEvent};
pub use blood_request::{BloodRequest, BloodRequestRecord};
pub use donor::{DonorForm, DonorId, DonorRecord, BLOOD_GROUPS};
pub use profile::{AdminProfile, BackendUser, DonorProfile, Profile, StaffProfile};
pub use role::Role;

/// Reads an explicit JSON `null` the same as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Body of a successful sign-in.
#[derive(Debug, Clone, Deserialize)]
pub struct SignInResponse {
    pub token: String,
    #[serde(default)]
    pub user: Option<BackendUser>,
}

/// Self-service donor registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonorSignUp {
    pub full_name: String,
    pub age: u32,
    pub gender: String,
    pub blood_group: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub password: String,
}

/// Hospital staff login created by an administrator.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StaffAccount {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Email address is not valid"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl StaffAccount {
    pub fn check(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Name is required".to_string());
        }
        self.validate().map_err(|errors| {
            errors
                .field_errors()
                .values()
                .flat_map(|errs| errs.iter())
                .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
                .unwrap_or_else(|| "Invalid staff details".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staff() -> StaffAccount {
        StaffAccount {
            name: "Sam Carter".into(),
            email: "sam@hospital.org".into(),
            password: "pw".into(),
        }
    }

    #[test]
    fn complete_staff_account_passes() {
        assert!(staff().check().is_ok());
    }

    #[test]
    fn staff_account_needs_name_and_valid_email() {
        let blank = StaffAccount {
            name: "  ".into(),
            ..staff()
        };
        assert_eq!(blank.check().unwrap_err(), "Name is required");

        let bad_email = StaffAccount {
            email: "sam-at-hospital".into(),
            ..staff()
        };
        assert_eq!(bad_email.check().unwrap_err(), "Email address is not valid");
    }
}
