use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use bloodbank_core::models::Role;
use bloodbank_core::RoleRouter;

use crate::error::AppError;
use crate::flash::{self, Flash};
use crate::session::Visitor;

pub fn render<T: Template>(template: &T) -> Result<Response, AppError> {
    Ok(Html(template.render()?).into_response())
}

/// Renders a form page again after a failed submit.
pub fn render_rejected<T: Template>(template: &T) -> Result<Response, AppError> {
    Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(template.render()?)).into_response())
}

/// Header bar state.
#[derive(Debug, Clone, Default)]
pub struct Nav {
    pub authenticated: bool,
    pub name: String,
    pub initials: String,
    pub role_label: String,
    pub dashboard: String,
    pub profile_link: String,
    pub settings_link: String,
}

/// What every page template needs besides its own content.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub nav: Nav,
    pub flash: Option<Flash>,
}

impl Page {
    /// Reads the session once and consumes the pending flash message.
    /// `role_param` is the page's `?role=` value, when it takes one.
    pub async fn load(visitor: &Visitor, role_param: Option<&str>) -> Self {
        let session = visitor.store.snapshot().await;
        let flash = flash::take(&visitor.session).await;

        if !session.authenticated {
            return Self {
                nav: Nav::default(),
                flash,
            };
        }

        let role = RoleRouter::resolve_role(role_param, session.current_role.as_deref());
        let (name, initials) = match &session.profile {
            Some(profile) => (profile.greeting_name().to_string(), profile.initials()),
            None => (role.label().to_string(), "?".to_string()),
        };

        Self {
            nav: Nav {
                authenticated: true,
                name,
                initials,
                role_label: role.label().to_string(),
                dashboard: role.dashboard_path().to_string(),
                profile_link: RoleRouter::link_with_role("/profile", role),
                settings_link: RoleRouter::link_with_role("/settings", role),
            },
            flash,
        }
    }

    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.flash = Some(Flash::error(message));
        self
    }
}

#[derive(Debug, Clone)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

pub fn options(values: &[&str], current: &str) -> Vec<SelectOption> {
    values
        .iter()
        .map(|value| SelectOption {
            value: value.to_string(),
            label: value.to_string(),
            selected: *value == current,
        })
        .collect()
}

pub fn role_options(current: &str) -> Vec<SelectOption> {
    let current = Role::parse(current);
    Role::ALL
        .iter()
        .map(|role| SelectOption {
            value: role.selector_value().to_string(),
            label: role.label().to_string(),
            selected: current == Some(*role),
        })
        .collect()
}

pub const GENDERS: [&str; 3] = ["male", "female", "other"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marks_the_current_option() {
        let groups = options(&["A+", "O-"], "O-");
        assert!(!groups[0].selected);
        assert!(groups[1].selected);
    }

    #[test]
    fn role_options_follow_selector_values() {
        let roles = role_options("hospital");
        let values: Vec<&str> = roles.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, ["donor", "hospital", "admin"]);
        assert!(roles[1].selected);
        assert!(role_options("").iter().all(|o| !o.selected));
    }
}
