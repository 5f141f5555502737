use serde::{Deserialize, Serialize};
use std::fmt;

pub const DONOR_DASHBOARD: &str = "/donor-dashboard";
pub const HOSPITAL_DASHBOARD: &str = "/hospital-dashboard";
pub const ADMIN_DASHBOARD: &str = "/admin-dashboard";

/// Account role. Decides the landing dashboard, the navigation on offer and
/// the shape of the cached profile. It is not an authorization grant; the
/// backend checks the bearer token on every privileged call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "DONOR")]
    Donor,
    #[serde(rename = "HOSPITAL")]
    HospitalStaff,
    #[serde(rename = "ADMIN")]
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Donor, Role::HospitalStaff, Role::Admin];

    /// Accepts the sign-in selector values (`donor`, `hospital`, `admin`), the
    /// query-parameter labels (`Donor`, `Hospital Staff`, `Admin`) and the
    /// stored tags (`DONOR`, `HOSPITAL`, `ADMIN`).
    pub fn parse(value: &str) -> Option<Role> {
        let normalized = value.trim().to_ascii_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "donor" => Some(Role::Donor),
            "hospital" | "hospital staff" | "staff" => Some(Role::HospitalStaff),
            "admin" | "administrator" => Some(Role::Admin),
            _ => None,
        }
    }

    /// Upper-case tag kept in the cached profile.
    pub fn storage_tag(self) -> &'static str {
        match self {
            Role::Donor => "DONOR",
            Role::HospitalStaff => "HOSPITAL",
            Role::Admin => "ADMIN",
        }
    }

    /// Value used in `?role=` links and the cached current role.
    pub fn label(self) -> &'static str {
        match self {
            Role::Donor => "Donor",
            Role::HospitalStaff => "Hospital Staff",
            Role::Admin => "Admin",
        }
    }

    /// Value posted by the sign-in role selector.
    pub fn selector_value(self) -> &'static str {
        match self {
            Role::Donor => "donor",
            Role::HospitalStaff => "hospital",
            Role::Admin => "admin",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Role::Donor => "Donor",
            Role::HospitalStaff => "Hospital Staff",
            Role::Admin => "Administrator",
        }
    }

    pub fn dashboard_path(self) -> &'static str {
        match self {
            Role::Donor => DONOR_DASHBOARD,
            Role::HospitalStaff => HOSPITAL_DASHBOARD,
            Role::Admin => ADMIN_DASHBOARD,
        }
    }

    /// Backend endpoint that signs this role in.
    pub fn login_path(self) -> &'static str {
        match self {
            Role::Donor => "/api/donors/login",
            Role::HospitalStaff => "/api/hospitals/login",
            Role::Admin => "/api/auth/login",
        }
    }

    pub fn activity_title(self) -> &'static str {
        match self {
            Role::Donor => "Donation History",
            Role::HospitalStaff => "Request History",
            Role::Admin => "System Activity",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
