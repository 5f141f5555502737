#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use bloodbank_core::{BackendClient, BackendSettings};
use bloodbank_frontend::config::SessionSettings;
use bloodbank_frontend::startup::build_router;
use bloodbank_frontend::AppState;
use http_body_util::BodyExt;
use serde_json::json;
use tower::util::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Router wired to a wiremock backend. Carries the session cookie between
/// requests the way a browser would.
pub struct TestApp {
    pub backend: MockServer,
    router: Router,
    cookie: Option<String>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let backend = MockServer::start().await;
        let client = BackendClient::new(&BackendSettings {
            url: backend.uri(),
        });
        let router = build_router(AppState::new(client, SessionSettings::default()));
        Self {
            backend,
            router,
            cookie: None,
        }
    }

    pub async fn send(&mut self, request: Request<Body>) -> Response<Body> {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        if let Some(set_cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
        {
            let pair = set_cookie.split(';').next().unwrap_or_default();
            self.cookie = Some(pair.to_string());
        }
        response
    }

    pub async fn get(&mut self, uri: &str) -> Response<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post_form(&mut self, uri: &str, form: &str) -> Response<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(form.to_string())).unwrap())
            .await
    }

    /// Signs in as an admin against a mocked `/api/auth/login`.
    pub async fn sign_in_admin(&mut self) -> Response<Body> {
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token": "admin-token",
                "user": {"name": "Michael Chen", "email": "admin@bloodbank.org"}
            })))
            .mount(&self.backend)
            .await;

        self.post_form(
            "/signin",
            "role=admin&email=admin%40bloodbank.org&password=secret",
        )
        .await
    }
}

pub fn location(response: &Response<Body>) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}
