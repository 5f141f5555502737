use askama::Template;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use bloodbank_core::api::{BloodRequestApi, StaffApi};
use bloodbank_core::donors::{Composer, Confirmation, ControllerError, Mutation, RemoveOutcome};
use bloodbank_core::models::{
    activity_feed, ActivityEvent, DonorForm, DonorId, DonorRecord, Profile, Role, StaffAccount,
    BLOOD_GROUPS,
};
use serde::Deserialize;

use crate::error::AppError;
use crate::flash::{self, Flash};
use crate::panels::DonorPanel;
use crate::session::Visitor;
use crate::views::{options, render, Page, SelectOption, GENDERS};
use crate::AppState;

/// Open add/edit form, flattened for the template.
pub struct ComposerView {
    pub title: &'static str,
    pub submit_label: &'static str,
    pub full_name: String,
    pub age: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub genders: Vec<SelectOption>,
    pub blood_groups: Vec<SelectOption>,
}

impl ComposerView {
    fn from_composer(composer: &Composer) -> Self {
        let buffer = &composer.buffer;
        let text = |field: &Option<String>| field.clone().unwrap_or_default();
        let (title, submit_label) = if composer.is_edit() {
            ("Edit Donor", "Update Donor")
        } else {
            ("Add New Donor", "Add Donor")
        };

        Self {
            title,
            submit_label,
            full_name: text(&buffer.full_name),
            age: buffer.age.map(|a| a.to_string()).unwrap_or_default(),
            email: text(&buffer.email),
            phone: text(&buffer.phone),
            location: text(&buffer.location),
            genders: options(&GENDERS, buffer.gender.as_deref().unwrap_or_default()),
            blood_groups: options(
                &BLOOD_GROUPS,
                buffer.blood_group.as_deref().unwrap_or_default(),
            ),
        }
    }
}

#[derive(Template)]
#[template(path = "admin_dashboard.html")]
pub struct AdminDashboardTemplate {
    pub page: Page,
    pub greeting: String,
    pub donors: Vec<DonorRecord>,
    /// False until a list fetch has succeeded, so a failed first fetch is
    /// not shown as an empty registry.
    pub donors_loaded: bool,
    pub load_error: Option<String>,
    pub composer: Option<ComposerView>,
    pub activity_title: String,
    pub events: Vec<ActivityEvent>,
    pub activity_error: Option<String>,
}

#[derive(Template)]
#[template(path = "confirm_delete.html")]
pub struct ConfirmDeleteTemplate {
    pub page: Page,
    pub donor: DonorRecord,
}

/// Donor composer fields as posted. Blank inputs are left out of the
/// request so an edit only sends what the form holds.
#[derive(Debug, Default, Deserialize)]
pub struct DonorInput {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub blood_group: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub password: String,
}

impl DonorInput {
    /// The form buffer, plus a message when the age is not a number.
    pub fn into_form(self) -> (DonorForm, Option<String>) {
        let present = |value: String| {
            let value = value.trim().to_string();
            (!value.is_empty()).then_some(value)
        };

        let age_text = self.age.trim().to_string();
        let (age, age_error) = if age_text.is_empty() {
            (None, None)
        } else {
            match age_text.parse::<u32>() {
                Ok(age) => (Some(age), None),
                Err(_) => (None, Some("Age must be a number".to_string())),
            }
        };

        let form = DonorForm {
            full_name: present(self.full_name),
            age,
            gender: present(self.gender),
            blood_group: present(self.blood_group),
            email: present(self.email),
            phone: present(self.phone),
            location: present(self.location),
            password: (!self.password.is_empty()).then_some(self.password),
        };
        (form, age_error)
    }
}

#[derive(Debug, Deserialize)]
pub struct DeleteDecision {
    #[serde(default)]
    pub decision: String,
}

impl DeleteDecision {
    pub fn confirmation(&self) -> Confirmation {
        if self.decision == "confirm" {
            Confirmation::Confirmed
        } else {
            Confirmation::Declined
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StaffInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

async fn visitor_panel(state: &AppState, visitor: &Visitor) -> Result<DonorPanel, AppError> {
    let backend = visitor.backend(state).await;
    state.panels.for_visitor(&visitor.session, backend).await
}

async fn back_to_dashboard(visitor: &Visitor, flash: Option<Flash>) -> Response {
    if let Some(flash) = flash {
        flash::push(&visitor.session, flash).await;
    }
    Redirect::to(Role::Admin.dashboard_path()).into_response()
}

fn failure(error: &ControllerError) -> Flash {
    Flash::error(error.to_string())
}

pub async fn admin_dashboard(
    State(state): State<AppState>,
    visitor: Visitor,
) -> Result<Response, AppError> {
    let panel = visitor_panel(&state, &visitor).await?;
    let (donors, donors_loaded, load_error, composer) = {
        let mut controller = panel.read().await;
        let load_error = controller.load().await.err().map(|e| e.to_string());
        (
            controller.donors().to_vec(),
            controller.has_loaded(),
            load_error,
            controller.composer().map(ComposerView::from_composer),
        )
    };

    let backend = visitor.backend(&state).await;
    let (events, activity_error) = match backend.list_requests().await {
        Ok(requests) => (activity_feed(&requests), None),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load system activity");
            (
                Vec::new(),
                Some(e.operator_message("Failed to load recent activity")),
            )
        }
    };

    let profile = visitor.store.get_profile().await;
    let page = Page::load(&visitor, Some(Role::Admin.label())).await;
    render(&AdminDashboardTemplate {
        page,
        greeting: profile
            .as_ref()
            .map(Profile::greeting_name)
            .unwrap_or(Role::Admin.display_name())
            .to_string(),
        donors,
        donors_loaded,
        load_error,
        composer,
        activity_title: Role::Admin.activity_title().to_string(),
        events,
        activity_error,
    })
}

pub async fn begin_create(
    State(state): State<AppState>,
    visitor: Visitor,
) -> Result<Response, AppError> {
    let panel = visitor_panel(&state, &visitor).await?;
    let flash = match panel.try_mutate() {
        Ok(mut controller) => {
            controller.begin_create();
            None
        }
        Err(e) => Some(failure(&e)),
    };
    Ok(back_to_dashboard(&visitor, flash).await)
}

pub async fn begin_edit(
    State(state): State<AppState>,
    visitor: Visitor,
    Path(id): Path<DonorId>,
) -> Result<Response, AppError> {
    let panel = visitor_panel(&state, &visitor).await?;
    let flash = match panel.try_mutate() {
        Ok(mut controller) => {
            // a fresh panel has nothing to copy from yet
            let loaded = if controller.has_loaded() {
                Ok(())
            } else {
                controller.load().await.map(|_| ())
            };
            loaded
                .and_then(|()| controller.begin_edit(id))
                .err()
                .map(|e| failure(&e))
        }
        Err(e) => Some(failure(&e)),
    };
    Ok(back_to_dashboard(&visitor, flash).await)
}

pub async fn cancel_composer(
    State(state): State<AppState>,
    visitor: Visitor,
) -> Result<Response, AppError> {
    let panel = visitor_panel(&state, &visitor).await?;
    let flash = match panel.try_mutate() {
        Ok(mut controller) => {
            controller.cancel();
            None
        }
        Err(e) => Some(failure(&e)),
    };
    Ok(back_to_dashboard(&visitor, flash).await)
}

pub async fn submit_donor(
    State(state): State<AppState>,
    visitor: Visitor,
    Form(input): Form<DonorInput>,
) -> Result<Response, AppError> {
    let panel = visitor_panel(&state, &visitor).await?;
    let (buffer, age_error) = input.into_form();

    let flash = match panel.try_mutate() {
        Err(e) => failure(&e),
        Ok(mut controller) => match age_error {
            Some(message) => match controller.stage(buffer) {
                Ok(()) => Flash::error(message),
                Err(e) => failure(&e),
            },
            None => match controller.submit(buffer).await {
                Ok(Mutation::Created) => Flash::success("Donor added successfully"),
                Ok(Mutation::Updated(_)) => Flash::success("Donor updated successfully"),
                Ok(Mutation::Deleted(_)) => Flash::success("Donor deleted successfully"),
                Err(e) => failure(&e),
            },
        },
    };
    Ok(back_to_dashboard(&visitor, Some(flash)).await)
}

pub async fn confirm_delete(
    State(state): State<AppState>,
    visitor: Visitor,
    Path(id): Path<DonorId>,
) -> Result<Response, AppError> {
    let panel = visitor_panel(&state, &visitor).await?;
    let donor = {
        let mut controller = panel.read().await;
        let loaded = if controller.has_loaded() {
            Ok(())
        } else {
            controller.load().await.map(|_| ())
        };
        loaded.and_then(|()| {
            controller
                .donors()
                .iter()
                .find(|d| d.id == id)
                .cloned()
                .ok_or(ControllerError::UnknownDonor(id))
        })
    };

    let donor = match donor {
        Ok(donor) => donor,
        Err(e) => return Ok(back_to_dashboard(&visitor, Some(failure(&e))).await),
    };

    let page = Page::load(&visitor, Some(Role::Admin.label())).await;
    render(&ConfirmDeleteTemplate { page, donor })
}

pub async fn delete_donor(
    State(state): State<AppState>,
    visitor: Visitor,
    Path(id): Path<DonorId>,
    Form(decision): Form<DeleteDecision>,
) -> Result<Response, AppError> {
    let panel = visitor_panel(&state, &visitor).await?;
    let flash = match panel.try_mutate() {
        Err(e) => Some(failure(&e)),
        Ok(mut controller) => match controller.remove(id, decision.confirmation()).await {
            Ok(RemoveOutcome::Deleted) => Some(Flash::success("Donor deleted successfully")),
            Ok(RemoveOutcome::Declined) => None,
            Err(e) => Some(failure(&e)),
        },
    };
    Ok(back_to_dashboard(&visitor, flash).await)
}

pub async fn add_staff(
    State(state): State<AppState>,
    visitor: Visitor,
    Form(input): Form<StaffInput>,
) -> Result<Response, AppError> {
    let staff = StaffAccount {
        name: input.name.trim().to_string(),
        email: input.email.trim().to_string(),
        password: input.password,
    };
    if let Err(message) = staff.check() {
        return Ok(back_to_dashboard(&visitor, Some(Flash::error(message))).await);
    }

    let backend = visitor.backend(&state).await;
    let flash = match backend.add_staff(&staff).await {
        Ok(ack) => {
            tracing::info!("Staff member added");
            Flash::success(ack)
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to add staff");
            Flash::error(format!(
                "Failed to add staff: {}",
                e.operator_message("Something went wrong")
            ))
        }
    };
    Ok(back_to_dashboard(&visitor, Some(flash)).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_inputs_are_left_out() {
        let input = DonorInput {
            full_name: " Jane Doe ".into(),
            age: "".into(),
            phone: "555-0100".into(),
            ..DonorInput::default()
        };
        let (form, age_error) = input.into_form();
        assert_eq!(age_error, None);
        assert_eq!(form.full_name.as_deref(), Some("Jane Doe"));
        assert_eq!(form.age, None);
        assert_eq!(form.email, None);
        assert_eq!(form.password, None);
    }

    #[test]
    fn non_numeric_age_is_reported() {
        let input = DonorInput {
            age: "thirty".into(),
            ..DonorInput::default()
        };
        let (form, age_error) = input.into_form();
        assert_eq!(form.age, None);
        assert_eq!(age_error.as_deref(), Some("Age must be a number"));
    }

    #[test]
    fn only_an_explicit_confirm_deletes() {
        let decide = |d: &str| {
            DeleteDecision {
                decision: d.to_string(),
            }
            .confirmation()
        };
        assert_eq!(decide("confirm"), Confirmation::Confirmed);
        assert_eq!(decide("decline"), Confirmation::Declined);
        assert_eq!(decide(""), Confirmation::Declined);
    }

    #[test]
    fn composer_view_titles_follow_the_target() {
        let create = Composer {
            target: None,
            buffer: DonorForm::default(),
        };
        assert_eq!(ComposerView::from_composer(&create).submit_label, "Add Donor");

        let edit = Composer {
            target: Some(4),
            buffer: DonorForm {
                age: Some(41),
                blood_group: Some("AB+".into()),
                ..DonorForm::default()
            },
        };
        let view = ComposerView::from_composer(&edit);
        assert_eq!(view.title, "Edit Donor");
        assert_eq!(view.age, "41");
        assert!(view
            .blood_groups
            .iter()
            .any(|o| o.value == "AB+" && o.selected));
    }
}
