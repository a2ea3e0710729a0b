//! HTTP client for the workflow backend (`{base_url}/api/v1`).
//!
//! One client is shared by every service wrapper so the bearer token and
//! trace headers are attached the same way on every call.

use crate::config::ApiSettings;
use crate::services::metrics::record_backend_call;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::{de::DeserializeOwned, Serialize};
use spends_core::error::AppError;
use spends_core::observability::{TracedClientExt, TracedRequest};
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Backend unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Backend returned {status}: {detail}")]
    Status { status: u16, detail: String },

    #[error("Unexpected backend response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Status { status: 404, detail } => AppError::NotFound(anyhow::anyhow!(detail)),
            ApiError::Status {
                status: 400 | 422,
                detail,
            } => AppError::BadRequest(anyhow::anyhow!(detail)),
            ApiError::Status {
                status: 401 | 403,
                detail,
            } => AppError::Unauthorized(anyhow::anyhow!(detail)),
            ApiError::Status {
                status: 409,
                detail,
            } => AppError::Conflict(anyhow::anyhow!(detail)),
            other => AppError::BadGateway(other.to_string()),
        }
    }
}

pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<Secret<String>>,
}

impl ApiClient {
    pub fn new(settings: &ApiSettings) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: format!("{}/api/v1", settings.base_url.trim_end_matches('/')),
            token: settings.auth_token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: TracedRequest) -> TracedRequest {
        match &self.token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        let request = self.authorize(self.client.traced_get(&url));
        self.execute("GET", &url, request).await
    }

    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let url = self.url(path);
        let request = self.authorize(self.client.traced_get(&url).query(query));
        self.execute("GET", &url, request).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let request = self.authorize(self.client.traced_post(&url).json(body));
        self.execute("POST", &url, request).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let request = self.authorize(self.client.traced_put(&url).json(body));
        self.execute("PUT", &url, request).await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let request = self.authorize(self.client.traced_patch(&url).json(body));
        self.execute("PATCH", &url, request).await
    }

    /// POST whose response body is ignored.
    pub async fn post_discard<B>(&self, path: &str, body: &B) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url(path);
        let request = self.authorize(self.client.traced_post(&url).json(body));
        self.send("POST", &url, request).await?;
        Ok(())
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let url = self.url(path);
        let request = self.authorize(self.client.traced_delete(&url));
        self.send("DELETE", &url, request).await?;
        Ok(())
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: &str,
        url: &str,
        request: TracedRequest,
    ) -> Result<T, ApiError> {
        let response = self.send(method, url, request).await?;

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            tracing::error!(method = %method, url = %url, error = %e, "Failed to decode backend response");
            ApiError::Decode(e.to_string())
        })
    }

    async fn send(
        &self,
        method: &str,
        url: &str,
        request: TracedRequest,
    ) -> Result<reqwest::Response, ApiError> {
        let start = Instant::now();
        let sent = request.send().await;
        metrics::histogram!("backend_request_duration_seconds", "method" => method.to_string())
            .record(start.elapsed().as_secs_f64());

        let response = sent.map_err(|e| {
            tracing::error!(method = %method, url = %url, error = %e, "Backend request failed");
            record_backend_call(method, "transport_error");
            ApiError::Transport(e)
        })?;

        let status = response.status();
        if status.is_success() {
            record_backend_call(method, "ok");
            return Ok(response);
        }

        record_backend_call(method, status.as_str());
        let body = response.text().await.unwrap_or_default();
        let detail = error_detail(status, &body);
        tracing::warn!(
            method = %method,
            url = %url,
            status = status.as_u16(),
            detail = %detail,
            "Backend returned an error"
        );

        Err(ApiError::Status {
            status: status.as_u16(),
            detail,
        })
    }
}

/// Prefer the backend's `detail` field, falling back to the status text.
fn error_detail(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| match value.get("detail") {
            Some(serde_json::Value::String(detail)) => Some(detail.clone()),
            Some(other) => Some(other.to_string()),
            None => None,
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode as HttpStatus;
    use axum::response::IntoResponse;

    #[test]
    fn test_error_detail_prefers_backend_message() {
        assert_eq!(
            error_detail(StatusCode::BAD_REQUEST, r#"{"detail": "Invalid status transition"}"#),
            "Invalid status transition"
        );
        assert_eq!(error_detail(StatusCode::NOT_FOUND, "<html>"), "Not Found");
    }

    #[test]
    fn test_not_found_passes_through() {
        let err = ApiError::Status {
            status: 404,
            detail: "Request not found".to_string(),
        };
        assert!(err.is_not_found());
        let response = AppError::from(err).into_response();
        assert_eq!(response.status(), HttpStatus::NOT_FOUND);
    }

    #[test]
    fn test_server_errors_map_to_bad_gateway() {
        let err = ApiError::Status {
            status: 500,
            detail: "boom".to_string(),
        };
        let response = AppError::from(err).into_response();
        assert_eq!(response.status(), HttpStatus::BAD_GATEWAY);
    }

    #[test]
    fn test_base_url_appends_api_prefix() {
        let client = ApiClient::new(&ApiSettings {
            base_url: "http://backend:8000/".to_string(),
            auth_token: None,
            timeout_seconds: 5,
        })
        .unwrap();
        assert_eq!(client.base_url(), "http://backend:8000/api/v1");
    }
}
