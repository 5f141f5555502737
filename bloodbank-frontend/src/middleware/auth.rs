use axum::{
    body::Body,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use bloodbank_core::{Decision, RoleGate, View};

use crate::session::Visitor;

/// Keeps signed-out visitors off protected pages. Any signed-in visitor may
/// open any dashboard; the backend decides what their token may do.
pub async fn auth_middleware(visitor: Visitor, request: Request<Body>, next: Next) -> Response {
    let path = request.uri().path();
    let Some(view) = View::for_path(path) else {
        return next.run(request).await;
    };

    match RoleGate.can_enter(&visitor.store, view).await {
        Decision::Allow => next.run(request).await,
        Decision::Redirect(target) => {
            tracing::info!(%path, "Redirecting signed-out visitor");
            Redirect::to(target).into_response()
        }
    }
}
