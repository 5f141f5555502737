use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::donor::is_blood_group;

/// Blood request submitted from the donor dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BloodRequest {
    pub blood_group: String,
    pub units: u32,
    pub hospital: String,
    pub date: String,
    #[serde(default)]
    pub notes: String,
    pub donor_email: String,
}

impl BloodRequest {
    pub fn check(&self) -> Result<(), String> {
        if !is_blood_group(&self.blood_group) {
            return Err("Please choose a valid blood group".to_string());
        }
        if self.units == 0 {
            return Err("Units must be at least 1".to_string());
        }
        if self.hospital.trim().is_empty() {
            return Err("Hospital or location is required".to_string());
        }
        if self.date.trim().is_empty() {
            return Err("Date is required".to_string());
        }
        Ok(())
    }
}

/// Blood request as listed by `GET /api/blood-requests/admin/all`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BloodRequestRecord {
    pub id: i64,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub blood_group: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub units: u32,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub hospital: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub date: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub donor_email: Option<String>,
}

impl BloodRequestRecord {
    /// Human readable form of `date`; unknown formats are shown verbatim.
    pub fn display_time(&self) -> String {
        let raw = self.date.trim();
        if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
            return at.format("%Y-%m-%d %H:%M").to_string();
        }
        if let Ok(at) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return at.format("%Y-%m-%d %H:%M").to_string();
        }
        if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return day.format("%b %e, %Y").to_string();
        }
        raw.to_string()
    }
}
