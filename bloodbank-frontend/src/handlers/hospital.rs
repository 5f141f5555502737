use askama::Template;
use axum::{extract::State, response::Response};
use bloodbank_core::api::BloodRequestApi;
use bloodbank_core::models::{activity_feed, ActivityEvent, Profile, Role};

use crate::error::AppError;
use crate::session::Visitor;
use crate::views::{render, Page};
use crate::AppState;

#[derive(Template)]
#[template(path = "hospital_dashboard.html")]
pub struct HospitalDashboardTemplate {
    pub page: Page,
    pub greeting: String,
    pub location: String,
    pub activity_title: String,
    pub events: Vec<ActivityEvent>,
    pub load_error: Option<String>,
}

pub async fn hospital_dashboard(
    State(state): State<AppState>,
    visitor: Visitor,
) -> Result<Response, AppError> {
    let profile = visitor.store.get_profile().await;
    let backend = visitor.backend(&state).await;

    let (events, load_error) = match backend.list_requests().await {
        Ok(requests) => (activity_feed(&requests), None),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load blood requests");
            (
                Vec::new(),
                Some(e.operator_message("Failed to load recent requests")),
            )
        }
    };

    let page = Page::load(&visitor, Some(Role::HospitalStaff.label())).await;
    render(&HospitalDashboardTemplate {
        page,
        greeting: profile
            .as_ref()
            .map(Profile::greeting_name)
            .unwrap_or(Role::HospitalStaff.display_name())
            .to_string(),
        location: profile
            .as_ref()
            .and_then(Profile::location)
            .unwrap_or_default()
            .to_string(),
        activity_title: Role::HospitalStaff.activity_title().to_string(),
        events,
        load_error,
    })
}
