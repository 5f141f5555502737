use askama::Template;
use axum::{extract::Query, response::Response};
use bloodbank_core::models::{Profile, Role};
use bloodbank_core::RoleRouter;
use serde::Deserialize;

use crate::error::AppError;
use crate::session::Visitor;
use crate::views::{render, Page};

#[derive(Debug, Default, Deserialize)]
pub struct RoleQuery {
    pub role: Option<String>,
}

pub struct ProfileField {
    pub label: &'static str,
    pub value: String,
}

#[derive(Template)]
#[template(path = "profile.html")]
pub struct ProfileTemplate {
    pub page: Page,
    pub role_name: String,
    pub fields: Vec<ProfileField>,
    pub activity_title: String,
    pub back_link: String,
}

#[derive(Template)]
#[template(path = "settings.html")]
pub struct SettingsTemplate {
    pub page: Page,
    pub role_name: String,
    pub full_name: String,
    pub email: String,
    pub back_link: String,
}

fn or_missing(value: &str) -> String {
    if value.trim().is_empty() {
        "Not provided".to_string()
    } else {
        value.to_string()
    }
}

/// Fields shown for `role`. The cached profile fills them in when present;
/// blood group only exists for donors and location not for admins.
pub fn profile_fields(role: Role, profile: Option<&Profile>) -> Vec<ProfileField> {
    let read = |get: fn(&Profile) -> Option<&str>| {
        or_missing(profile.and_then(get).unwrap_or_default())
    };

    let mut fields = vec![
        ProfileField {
            label: "Full Name",
            value: read(|p| Some(p.full_name())),
        },
        ProfileField {
            label: "Email Address",
            value: read(|p| Some(p.email())),
        },
        ProfileField {
            label: "Phone Number",
            value: read(|p| Some(p.phone())),
        },
    ];
    if role == Role::Donor {
        fields.push(ProfileField {
            label: "Blood Group",
            value: read(Profile::blood_group),
        });
    }
    if role != Role::Admin {
        fields.push(ProfileField {
            label: "Location",
            value: read(Profile::location),
        });
    }
    fields
}

pub async fn profile_page(
    visitor: Visitor,
    Query(query): Query<RoleQuery>,
) -> Result<Response, AppError> {
    let cached = visitor.store.current_role().await;
    let role = RoleRouter::resolve_role(query.role.as_deref(), cached.as_deref());
    let profile = visitor.store.get_profile().await;
    let page = Page::load(&visitor, Some(role.label())).await;

    render(&ProfileTemplate {
        page,
        role_name: role.display_name().to_string(),
        fields: profile_fields(role, profile.as_ref()),
        activity_title: role.activity_title().to_string(),
        back_link: RoleRouter::dashboard_path_for(role.label()).to_string(),
    })
}

pub async fn settings_page(
    visitor: Visitor,
    Query(query): Query<RoleQuery>,
) -> Result<Response, AppError> {
    let cached = visitor.store.current_role().await;
    let role = RoleRouter::resolve_role(query.role.as_deref(), cached.as_deref());
    let profile = visitor.store.get_profile().await;
    let page = Page::load(&visitor, Some(role.label())).await;

    render(&SettingsTemplate {
        page,
        role_name: role.display_name().to_string(),
        full_name: or_missing(profile.as_ref().map(Profile::full_name).unwrap_or_default()),
        email: or_missing(profile.as_ref().map(Profile::email).unwrap_or_default()),
        back_link: RoleRouter::dashboard_path_for(role.label()).to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bloodbank_core::models::{AdminProfile, DonorProfile};

    fn labels(fields: &[ProfileField]) -> Vec<&str> {
        fields.iter().map(|f| f.label).collect()
    }

    #[test]
    fn donor_sees_blood_group_and_location() {
        let profile = Profile::Donor(DonorProfile {
            full_name: "Jane Doe".into(),
            blood_group: "O+".into(),
            ..DonorProfile::default()
        });
        let fields = profile_fields(Role::Donor, Some(&profile));
        assert_eq!(
            labels(&fields),
            ["Full Name", "Email Address", "Phone Number", "Blood Group", "Location"]
        );
        assert_eq!(fields[0].value, "Jane Doe");
        assert_eq!(fields[1].value, "Not provided");
        assert_eq!(fields[3].value, "O+");
    }

    #[test]
    fn admin_fields_skip_donor_only_data() {
        let profile = Profile::Admin(AdminProfile {
            full_name: "Michael Chen".into(),
            ..AdminProfile::default()
        });
        let fields = profile_fields(Role::Admin, Some(&profile));
        assert_eq!(labels(&fields), ["Full Name", "Email Address", "Phone Number"]);
    }

    #[test]
    fn missing_profile_renders_placeholders() {
        let fields = profile_fields(Role::HospitalStaff, None);
        assert!(fields.iter().all(|f| f.value == "Not provided"));
        assert_eq!(fields.len(), 4);
    }
}
