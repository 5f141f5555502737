use serde::{Deserialize, Serialize};

use super::role::Role;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonorProfile {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub blood_group: String,
    #[serde(default)]
    pub location: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffProfile {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub location: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

/// Cached profile of the signed-in account, one shape per role.
///
/// Stored with a `role` tag (`DONOR`, `HOSPITAL`, `ADMIN`) next to the fields,
/// which keeps entries written by older front ends readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role")]
pub enum Profile {
    #[serde(rename = "DONOR")]
    Donor(DonorProfile),
    #[serde(rename = "HOSPITAL")]
    HospitalStaff(StaffProfile),
    #[serde(rename = "ADMIN")]
    Admin(AdminProfile),
}

/// `user` object of a sign-in response. Every field is optional because the
/// three login endpoints return different subsets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendUser {
    #[serde(default, alias = "fullName")]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub blood_group: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

impl Profile {
    pub fn from_backend_user(role: Role, user: &BackendUser) -> Self {
        let text = |field: &Option<String>| field.clone().unwrap_or_default();
        match role {
            Role::Donor => Profile::Donor(DonorProfile {
                full_name: text(&user.name),
                email: text(&user.email),
                phone: text(&user.phone),
                blood_group: text(&user.blood_group),
                location: text(&user.location),
            }),
            Role::HospitalStaff => Profile::HospitalStaff(StaffProfile {
                full_name: text(&user.name),
                email: text(&user.email),
                phone: text(&user.phone),
                location: text(&user.location),
            }),
            Role::Admin => Profile::Admin(AdminProfile {
                full_name: text(&user.name),
                email: text(&user.email),
                phone: text(&user.phone),
            }),
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Profile::Donor(_) => Role::Donor,
            Profile::HospitalStaff(_) => Role::HospitalStaff,
            Profile::Admin(_) => Role::Admin,
        }
    }

    pub fn full_name(&self) -> &str {
        match self {
            Profile::Donor(p) => &p.full_name,
            Profile::HospitalStaff(p) => &p.full_name,
            Profile::Admin(p) => &p.full_name,
        }
    }

    pub fn email(&self) -> &str {
        match self {
            Profile::Donor(p) => &p.email,
            Profile::HospitalStaff(p) => &p.email,
            Profile::Admin(p) => &p.email,
        }
    }

    pub fn phone(&self) -> &str {
        match self {
            Profile::Donor(p) => &p.phone,
            Profile::HospitalStaff(p) => &p.phone,
            Profile::Admin(p) => &p.phone,
        }
    }

    pub fn blood_group(&self) -> Option<&str> {
        match self {
            Profile::Donor(p) => Some(&p.blood_group),
            _ => None,
        }
    }

    pub fn location(&self) -> Option<&str> {
        match self {
            Profile::Donor(p) => Some(&p.location),
            Profile::HospitalStaff(p) => Some(&p.location),
            Profile::Admin(_) => None,
        }
    }

    /// Name for greetings, falling back to the role's display name.
    pub fn greeting_name(&self) -> &str {
        let name = self.full_name().trim();
        if name.is_empty() {
            self.role().display_name()
        } else {
            name
        }
    }

    pub fn initials(&self) -> String {
        let initials: String = self
            .full_name()
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .take(2)
            .collect::<String>()
            .to_uppercase();
        if initials.is_empty() {
            "U".to_string()
        } else {
            initials
        }
    }
}
