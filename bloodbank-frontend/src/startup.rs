use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use time::Duration;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::handlers::{
    account::{profile_page, settings_page},
    admin::{
        add_staff, admin_dashboard, begin_create, begin_edit, cancel_composer, confirm_delete,
        delete_donor, submit_donor,
    },
    app::{health_check, index},
    auth::{signin_handler, signin_page, signout_handler, signup_handler, signup_page},
    donor::{donor_dashboard, submit_blood_request},
    hospital::hospital_dashboard,
    metrics::metrics,
};
use crate::middleware::{
    auth::auth_middleware, metrics::metrics_middleware,
    security_headers::security_headers_middleware, tracing::request_id_middleware,
};
use crate::AppState;

pub fn build_router(state: AppState) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(state.session.secure_cookie)
        .with_expiry(Expiry::OnInactivity(Duration::hours(
            state.session.inactivity_hours,
        )));

    let protected = Router::new()
        .route("/donor-dashboard", get(donor_dashboard))
        .route("/donor-dashboard/blood-requests", post(submit_blood_request))
        .route("/hospital-dashboard", get(hospital_dashboard))
        .route("/admin-dashboard", get(admin_dashboard))
        .route("/admin/donors/new", post(begin_create))
        .route("/admin/donors/cancel", post(cancel_composer))
        .route("/admin/donors/submit", post(submit_donor))
        .route("/admin/donors/:id/edit", post(begin_edit))
        .route(
            "/admin/donors/:id/delete",
            get(confirm_delete).post(delete_donor),
        )
        .route("/admin/staff", post(add_staff))
        .route("/profile", get(profile_page))
        .route("/settings", get(settings_page))
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/signin", get(signin_page).post(signin_handler))
        .route("/signup", get(signup_page).post(signup_handler))
        .route("/signout", post(signout_handler))
        .merge(protected)
        .layer(session_layer)
        .layer(from_fn(metrics_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}
