use serde::Serialize;

use super::blood_request::BloodRequestRecord;

pub const BLOOD_REQUEST_EVENT: &str = "Blood Request";

/// Read-only entry of the admin "Recent System Activity" feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityEvent {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub time: String,
}

impl ActivityEvent {
    pub fn from_request(request: &BloodRequestRecord) -> Self {
        let requester = request.donor_email.as_deref().unwrap_or("Unknown donor");
        Self {
            id: request.id,
            kind: BLOOD_REQUEST_EVENT.to_string(),
            description: format!(
                "{} requested {} units of {} at {}",
                requester, request.units, request.blood_group, request.hospital
            ),
            time: request.display_time(),
        }
    }
}

/// Most recent first. The backend lists requests in creation order, so the
/// feed is the arrival order reversed.
pub fn activity_feed(requests: &[BloodRequestRecord]) -> Vec<ActivityEvent> {
    requests.iter().rev().map(ActivityEvent::from_request).collect()
}
