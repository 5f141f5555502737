use crate::models::role::{ADMIN_DASHBOARD, DONOR_DASHBOARD, HOSPITAL_DASHBOARD};
use crate::session::{SessionStorage, SessionStore};

pub const SIGN_IN_PATH: &str = "/signin";

/// Pages the front end can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Home,
    SignIn,
    SignUp,
    DonorDashboard,
    HospitalDashboard,
    AdminDashboard,
    Profile,
    Settings,
}

impl View {
    pub const PROTECTED: [View; 5] = [
        View::DonorDashboard,
        View::HospitalDashboard,
        View::AdminDashboard,
        View::Profile,
        View::Settings,
    ];

    pub fn is_protected(self) -> bool {
        !matches!(self, View::Home | View::SignIn | View::SignUp)
    }

    /// Maps a request path onto the view that renders it. Nested routes
    /// (`/admin/donors/..`) belong to the admin dashboard.
    pub fn for_path(path: &str) -> Option<View> {
        match path {
            "/" => Some(View::Home),
            SIGN_IN_PATH => Some(View::SignIn),
            "/signup" => Some(View::SignUp),
            DONOR_DASHBOARD => Some(View::DonorDashboard),
            HOSPITAL_DASHBOARD => Some(View::HospitalDashboard),
            ADMIN_DASHBOARD => Some(View::AdminDashboard),
            "/profile" => Some(View::Profile),
            "/settings" => Some(View::Settings),
            p if p.starts_with("/donor-dashboard/") => Some(View::DonorDashboard),
            p if p.starts_with("/admin/") => Some(View::AdminDashboard),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Redirect(&'static str),
}

/// Decides whether a view may be rendered.
///
/// Only "is anyone signed in" is checked; any authenticated session may open
/// any role's dashboard. The backend re-checks the token on every call, this
/// gate only keeps signed-out visitors away from pages that would fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleGate;

impl RoleGate {
    pub fn decide(authenticated: bool, view: View) -> Decision {
        if !view.is_protected() || authenticated {
            Decision::Allow
        } else {
            Decision::Redirect(SIGN_IN_PATH)
        }
    }

    pub async fn can_enter<S: SessionStorage>(
        &self,
        session: &SessionStore<S>,
        view: View,
    ) -> Decision {
        if !view.is_protected() {
            return Decision::Allow;
        }
        let decision = Self::decide(session.is_authenticated().await, view);
        if decision != Decision::Allow {
            tracing::debug!(?view, "Signed-out visitor redirected to sign-in");
        }
        decision
    }
}
