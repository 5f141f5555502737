use serde::{Deserialize, Serialize};
use validator::Validate;

pub type DonorId = i64;

pub const BLOOD_GROUPS: [&str; 8] = ["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"];

/// Donor row as returned by the admin API. Passwords are write-only and are
/// never read back into a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonorRecord {
    pub id: DonorId,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub full_name: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub age: u32,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub gender: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub blood_group: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub phone: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub location: String,
}

/// Composer buffer for creating or editing a donor. Absent fields are left
/// out of the request body, so an update only touches what was filled in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DonorForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 18, max = 65, message = "Age must be between 18 and 65"))]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blood_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "Email address is not valid"))]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl DonorForm {
    /// Snapshot of an existing record. The password stays empty.
    pub fn from_record(record: &DonorRecord) -> Self {
        Self {
            full_name: Some(record.full_name.clone()),
            age: Some(record.age),
            gender: Some(record.gender.clone()),
            blood_group: Some(record.blood_group.clone()),
            email: Some(record.email.clone()),
            phone: Some(record.phone.clone()),
            location: Some(record.location.clone()),
            password: None,
        }
    }

    /// Field checks shared by create and update. Returns the first message.
    pub fn check(&self) -> Result<(), String> {
        if let Err(errors) = self.validate() {
            let message = errors
                .field_errors()
                .values()
                .flat_map(|errs| errs.iter())
                .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
                .unwrap_or_else(|| "Invalid donor details".to_string());
            return Err(message);
        }
        if let Some(group) = self.blood_group.as_deref() {
            if !group.is_empty() && !is_blood_group(group) {
                return Err(format!("Unknown blood group: {}", group));
            }
        }
        Ok(())
    }

    /// Create needs a name and an email on top of the shared checks.
    pub fn check_for_create(&self) -> Result<(), String> {
        if blank(&self.full_name) {
            return Err("Full name is required".to_string());
        }
        if blank(&self.email) {
            return Err("Email is required".to_string());
        }
        self.check()
    }
}

fn blank(field: &Option<String>) -> bool {
    field.as_deref().map(str::trim).unwrap_or_default().is_empty()
}

pub fn is_blood_group(value: &str) -> bool {
    BLOOD_GROUPS.contains(&value.trim())
}
