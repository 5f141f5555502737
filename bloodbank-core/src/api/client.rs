use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{AuthApi, BloodRequestApi, DonorApi, StaffApi};
use crate::error::ApiError;
use crate::models::{
    BloodRequest, BloodRequestRecord, Credentials, DonorForm, DonorId, DonorRecord, DonorSignUp,
    Role, SignInResponse, StaffAccount,
};
use crate::observability::inject_trace_headers;

const MAX_PLAIN_TEXT_MESSAGE: usize = 300;

#[derive(Debug, Deserialize, Clone)]
pub struct BackendSettings {
    /// Base URL of the blood bank REST backend, e.g. `http://localhost:8080`.
    pub url: String,
}

/// HTTP client for the blood bank backend.
///
/// Cheap to clone. `authorized` returns a copy that sends the visitor's
/// bearer token with every call.
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
    token: Option<String>,
    request_id: Option<String>,
}

impl BackendClient {
    pub fn new(settings: &BackendSettings) -> Self {
        Self {
            client: Client::new(),
            base_url: settings.url.trim_end_matches('/').to_string(),
            token: None,
            request_id: None,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn authorized(&self, token: Option<String>) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token,
            request_id: self.request_id.clone(),
        }
    }

    /// Forwards the browser request's correlation id to the backend.
    pub fn with_request_id(mut self, request_id: Option<String>) -> Self {
        self.request_id = request_id;
        self
    }

    fn request(&self, method: Method, path: &str) -> (RequestBuilder, String) {
        let url = format!("{}{}", self.base_url, path);
        let mut headers = HeaderMap::new();
        inject_trace_headers(&mut headers, self.request_id.as_deref());
        let mut builder = self.client.request(method, &url).headers(headers);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        (builder, url)
    }

    /// Sends the request and turns non-2xx answers into `ApiError::Backend`
    /// carrying whatever message the backend put in the body.
    async fn send(&self, builder: RequestBuilder, url: String) -> Result<Response, ApiError> {
        let response = builder.send().await.map_err(|e| {
            tracing::error!("Failed to send request to {}: {}", url, e);
            ApiError::Transport {
                url: url.clone(),
                source: e,
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = body_message(&body);
        tracing::warn!(%url, %status, message = ?message, "Backend rejected request");
        Err(ApiError::Backend { status, message })
    }

    async fn json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Pulls a human readable message out of an error body: `{"error": ..}`,
/// `{"message": ..}`, a bare JSON string, or short plain text.
pub(crate) fn body_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(map)) => ["error", "message", "detail"]
            .iter()
            .find_map(|key| map.get(*key).and_then(|v| v.as_str()))
            .map(str::to_string),
        Ok(serde_json::Value::String(text)) => Some(text),
        Ok(_) => None,
        Err(_) if body.len() <= MAX_PLAIN_TEXT_MESSAGE && !body.starts_with('<') => {
            Some(body.to_string())
        }
        Err(_) => None,
    }
}

#[async_trait]
impl AuthApi for BackendClient {
    async fn sign_in(
        &self,
        role: Role,
        credentials: &Credentials,
    ) -> Result<SignInResponse, ApiError> {
        let (builder, url) = self.request(Method::POST, role.login_path());
        let response = self.send(builder.json(credentials), url).await?;
        Self::json(response).await
    }

    async fn sign_up(&self, donor: &DonorSignUp) -> Result<(), ApiError> {
        let (builder, url) = self.request(Method::POST, "/api/donors");
        self.send(builder.json(donor), url).await?;
        Ok(())
    }
}

#[async_trait]
impl DonorApi for BackendClient {
    async fn list_donors(&self) -> Result<Vec<DonorRecord>, ApiError> {
        let (builder, url) = self.request(Method::GET, "/api/admin/donors");
        let response = self.send(builder, url).await?;
        Self::json(response).await
    }

    async fn create_donor(&self, form: &DonorForm) -> Result<(), ApiError> {
        let (builder, url) = self.request(Method::POST, "/api/admin/donors");
        self.send(builder.json(form), url).await?;
        Ok(())
    }

    async fn update_donor(&self, id: DonorId, form: &DonorForm) -> Result<(), ApiError> {
        let (builder, url) = self.request(Method::PUT, &format!("/api/admin/donors/{}", id));
        self.send(builder.json(form), url).await?;
        Ok(())
    }

    async fn delete_donor(&self, id: DonorId) -> Result<(), ApiError> {
        let (builder, url) = self.request(Method::DELETE, &format!("/api/admin/donors/{}", id));
        self.send(builder, url).await?;
        Ok(())
    }
}

#[async_trait]
impl BloodRequestApi for BackendClient {
    async fn submit_request(&self, request: &BloodRequest) -> Result<(), ApiError> {
        let (builder, url) = self.request(Method::POST, "/api/blood-requests");
        self.send(builder.json(request), url).await?;
        Ok(())
    }

    async fn list_requests(&self) -> Result<Vec<BloodRequestRecord>, ApiError> {
        let (builder, url) = self.request(Method::GET, "/api/blood-requests/admin/all");
        let response = self.send(builder, url).await?;
        Self::json(response).await
    }
}

#[async_trait]
impl StaffApi for BackendClient {
    async fn add_staff(&self, staff: &StaffAccount) -> Result<String, ApiError> {
        let (builder, url) = self.request(Method::POST, "/api/admin/add-staff");
        let response = self.send(builder.json(staff), url).await?;
        let ack = response.text().await.unwrap_or_default();
        Ok(body_message(&ack).unwrap_or_else(|| "Staff member added".to_string()))
    }
}
