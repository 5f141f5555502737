use askama::Template;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use bloodbank_core::api::BloodRequestApi;
use bloodbank_core::models::{BloodRequest, Profile, Role, BLOOD_GROUPS};
use serde::Deserialize;

use crate::error::AppError;
use crate::flash::{self, Flash};
use crate::session::Visitor;
use crate::views::{options, render, render_rejected, Page, SelectOption};
use crate::AppState;

/// Blood request form as posted from the donor dashboard.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct BloodRequestForm {
    #[serde(default)]
    pub blood_group: String,
    #[serde(default)]
    pub units: String,
    #[serde(default)]
    pub hospital: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub notes: String,
}

impl BloodRequestForm {
    pub fn to_request(&self, donor_email: &str) -> Result<BloodRequest, String> {
        let units: u32 = self
            .units
            .trim()
            .parse()
            .map_err(|_| "Units must be at least 1".to_string())?;
        let request = BloodRequest {
            blood_group: self.blood_group.trim().to_string(),
            units,
            hospital: self.hospital.trim().to_string(),
            date: self.date.trim().to_string(),
            notes: self.notes.trim().to_string(),
            donor_email: donor_email.to_string(),
        };
        request.check()?;
        Ok(request)
    }
}

#[derive(Template)]
#[template(path = "donor_dashboard.html")]
pub struct DonorDashboardTemplate {
    pub page: Page,
    pub greeting: String,
    pub email: String,
    pub blood_group: String,
    pub location: String,
    pub activity_title: String,
    pub request: BloodRequestForm,
    pub blood_groups: Vec<SelectOption>,
}

fn dashboard(
    page: Page,
    profile: Option<&Profile>,
    request: BloodRequestForm,
) -> DonorDashboardTemplate {
    let blood_group = profile
        .and_then(Profile::blood_group)
        .unwrap_or_default()
        .to_string();
    let selected = if request.blood_group.is_empty() {
        blood_group.clone()
    } else {
        request.blood_group.clone()
    };

    DonorDashboardTemplate {
        page,
        greeting: profile
            .map(Profile::greeting_name)
            .unwrap_or(Role::Donor.display_name())
            .to_string(),
        email: profile.map(Profile::email).unwrap_or_default().to_string(),
        blood_group,
        location: profile
            .and_then(Profile::location)
            .unwrap_or_default()
            .to_string(),
        activity_title: Role::Donor.activity_title().to_string(),
        blood_groups: options(&BLOOD_GROUPS, &selected),
        request,
    }
}

pub async fn donor_dashboard(visitor: Visitor) -> Result<Response, AppError> {
    let profile = visitor.store.get_profile().await;
    let page = Page::load(&visitor, Some(Role::Donor.label())).await;
    render(&dashboard(page, profile.as_ref(), BloodRequestForm::default()))
}

pub async fn submit_blood_request(
    State(state): State<AppState>,
    visitor: Visitor,
    Form(form): Form<BloodRequestForm>,
) -> Result<Response, AppError> {
    let profile = visitor.store.get_profile().await;
    let donor_email = profile.as_ref().map(Profile::email).unwrap_or_default();

    let request = match form.to_request(donor_email) {
        Ok(request) => request,
        Err(message) => {
            let page = Page::load(&visitor, Some(Role::Donor.label()))
                .await
                .with_error(message);
            return render_rejected(&dashboard(page, profile.as_ref(), form));
        }
    };

    let backend = visitor.backend(&state).await;
    match backend.submit_request(&request).await {
        Ok(()) => {
            tracing::info!(
                blood_group = %request.blood_group,
                units = request.units,
                "Blood request submitted"
            );
            flash::push(
                &visitor.session,
                Flash::success("Blood request submitted successfully"),
            )
            .await;
            Ok(Redirect::to(Role::Donor.dashboard_path()).into_response())
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to submit blood request");
            let page = Page::load(&visitor, Some(Role::Donor.label()))
                .await
                .with_error(e.operator_message("Failed to submit request"));
            render_rejected(&dashboard(page, profile.as_ref(), form))
        }
    }
}
