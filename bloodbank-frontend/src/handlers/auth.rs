use askama::Template;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use bloodbank_core::api::AuthApi;
use bloodbank_core::models::{
    donor::is_blood_group, BackendUser, Credentials, DonorSignUp, Profile, Role, BLOOD_GROUPS,
};
use bloodbank_core::SignedIn;
use serde::Deserialize;

use crate::error::AppError;
use crate::flash::{self, Flash};
use crate::session::Visitor;
use crate::views::{options, render, render_rejected, role_options, Page, SelectOption, GENDERS};
use crate::AppState;

#[derive(Template)]
#[template(path = "signin.html")]
pub struct SignInTemplate {
    pub page: Page,
    pub email: String,
    pub roles: Vec<SelectOption>,
}

#[derive(Template)]
#[template(path = "signup.html")]
pub struct SignUpTemplate {
    pub page: Page,
    pub form: SignUpForm,
    pub genders: Vec<SelectOption>,
    pub blood_groups: Vec<SelectOption>,
}

#[derive(Debug, Deserialize)]
pub struct SignInForm {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Registration form as posted. Passwords are never echoed back.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct SignUpForm {
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
    #[serde(default)]
    pub confirm_password: String,
}

impl SignUpForm {
    pub fn to_request(&self) -> Result<DonorSignUp, String> {
        if self.password != self.confirm_password {
            return Err("Please ensure both passwords match".to_string());
        }
        if self.full_name.trim().is_empty() {
            return Err("Full name is required".to_string());
        }
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err("Email and password are required".to_string());
        }
        let age: u32 = self
            .age
            .trim()
            .parse()
            .map_err(|_| "Age must be a number".to_string())?;
        if !(18..=65).contains(&age) {
            return Err("Age must be between 18 and 65".to_string());
        }
        if !is_blood_group(&self.blood_group) {
            return Err("Please choose a valid blood group".to_string());
        }

        Ok(DonorSignUp {
            full_name: self.full_name.trim().to_string(),
            age,
            gender: self.gender.clone(),
            blood_group: self.blood_group.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            location: self.location.trim().to_string(),
            password: self.password.clone(),
        })
    }

    fn without_passwords(mut self) -> Self {
        self.password.clear();
        self.confirm_password.clear();
        self
    }
}

fn signin_template(page: Page, email: &str, role: &str) -> SignInTemplate {
    SignInTemplate {
        page,
        email: email.to_string(),
        roles: role_options(role),
    }
}

fn signup_template(page: Page, form: SignUpForm) -> SignUpTemplate {
    SignUpTemplate {
        page,
        genders: options(&GENDERS, &form.gender),
        blood_groups: options(&BLOOD_GROUPS, &form.blood_group),
        form,
    }
}

pub async fn signin_page(visitor: Visitor) -> Result<Response, AppError> {
    let page = Page::load(&visitor, None).await;
    render(&signin_template(page, "", ""))
}

pub async fn signin_handler(
    State(state): State<AppState>,
    visitor: Visitor,
    Form(form): Form<SignInForm>,
) -> Result<Response, AppError> {
    let reject = |page: Page, message: &str| {
        render_rejected(&signin_template(
            page.with_error(message),
            &form.email,
            &form.role,
        ))
    };

    let Some(role) = Role::parse(&form.role) else {
        return reject(Page::load(&visitor, None).await, "Please select your role");
    };
    if form.email.trim().is_empty() || form.password.is_empty() {
        return reject(
            Page::load(&visitor, None).await,
            "Email and password are required",
        );
    }

    let credentials = Credentials {
        email: form.email.trim().to_string(),
        password: form.password.clone(),
    };
    let backend = state
        .backend
        .clone()
        .with_request_id(visitor.request_id.clone());

    match backend.sign_in(role, &credentials).await {
        Ok(response) => {
            let user = response.user.unwrap_or_else(|| BackendUser {
                email: Some(credentials.email.clone()),
                ..BackendUser::default()
            });
            let profile = Profile::from_backend_user(role, &user);

            state.panels.discard(&visitor.session).await;
            if let Err(e) = visitor.session.cycle_id().await {
                tracing::warn!(error = %e, "Could not rotate session id");
            }
            visitor
                .store
                .establish(&SignedIn {
                    token: response.token,
                    profile,
                    role,
                })
                .await?;
            flash::push(&visitor.session, Flash::success("Login successful")).await;

            tracing::info!(role = %role, "Visitor signed in");
            Ok(Redirect::to(role.dashboard_path()).into_response())
        }
        Err(e) => {
            tracing::warn!(error = %e, role = %role, "Sign-in rejected");
            reject(
                Page::load(&visitor, None).await,
                &e.operator_message("Invalid credentials"),
            )
        }
    }
}

pub async fn signup_page(visitor: Visitor) -> Result<Response, AppError> {
    let page = Page::load(&visitor, None).await;
    render(&signup_template(page, SignUpForm::default()))
}

pub async fn signup_handler(
    State(state): State<AppState>,
    visitor: Visitor,
    Form(form): Form<SignUpForm>,
) -> Result<Response, AppError> {
    let donor = match form.to_request() {
        Ok(donor) => donor,
        Err(message) => {
            let page = Page::load(&visitor, None).await.with_error(message);
            return render_rejected(&signup_template(page, form.without_passwords()));
        }
    };

    let backend = state
        .backend
        .clone()
        .with_request_id(visitor.request_id.clone());

    match backend.sign_up(&donor).await {
        Ok(()) => {
            tracing::info!("Donor registered");
            flash::push(
                &visitor.session,
                Flash::success("Registration successful! Welcome to the Blood Banking System"),
            )
            .await;
            Ok(Redirect::to("/signin").into_response())
        }
        Err(e) => {
            tracing::warn!(error = %e, "Registration rejected");
            let page = Page::load(&visitor, None)
                .await
                .with_error(e.operator_message("Something went wrong"));
            render_rejected(&signup_template(page, form.without_passwords()))
        }
    }
}

pub async fn signout_handler(
    State(state): State<AppState>,
    visitor: Visitor,
) -> Result<Response, AppError> {
    state.panels.discard(&visitor.session).await;
    visitor.store.teardown().await?;
    tracing::info!("Visitor signed out");
    Ok(Redirect::to("/").into_response())
}
