//! Remote processing service client
//!
//! Uploads one document as `multipart/form-data` to a hosted function
//! (`POST {service_url}/functions/v1/{function_name}`) and decodes the
//! artifact bundle it returns. Single attempt, no retry.

use crate::models::{ArtifactBundle, SelectedFile};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use studybuddy_common::config::ServiceSettings;
use thiserror::Error;

/// Multipart field name carrying the document
pub const UPLOAD_FIELD_NAME: &str = "file";

const USER_AGENT: &str = concat!("StudyBuddy/", env!("CARGO_PKG_VERSION"));

/// Processing service errors
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Service returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("{0}")]
    Remote(String),

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// The remote side of a processing run
#[async_trait]
pub trait ProcessingService: Send + Sync {
    /// Turn one document into an artifact bundle
    ///
    /// # Returns
    /// * `Ok(ArtifactBundle)` - Decoded bundle (validation is the caller's job)
    /// * `Err(ServiceError)` - Network, service or decoding failure
    async fn process(&self, file: &SelectedFile) -> Result<ArtifactBundle, ServiceError>;
}

/// Body shapes the service may answer with on 2xx
#[derive(Deserialize)]
#[serde(untagged)]
enum ServiceResponse {
    Failure { error: String },
    Success(ArtifactBundle),
}

/// HTTP implementation of [`ProcessingService`]
pub struct HttpProcessingService {
    http_client: reqwest::Client,
    endpoint: reqwest::Url,
    api_key: Option<String>,
}

impl HttpProcessingService {
    pub fn new(settings: &ServiceSettings) -> Result<Self, ServiceError> {
        let service_url = settings
            .require_service_url()
            .map_err(|e| ServiceError::Config(e.to_string()))?;

        let endpoint = reqwest::Url::parse(&format!(
            "{}/functions/v1/{}",
            service_url.trim_end_matches('/'),
            settings.function_name
        ))
        .map_err(|e| ServiceError::Config(format!("Invalid service URL '{}': {}", service_url, e)))?;

        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint,
            api_key: settings.api_key.clone(),
        })
    }

    pub fn endpoint(&self) -> &reqwest::Url {
        &self.endpoint
    }
}

#[async_trait]
impl ProcessingService for HttpProcessingService {
    async fn process(&self, file: &SelectedFile) -> Result<ArtifactBundle, ServiceError> {
        let part = Part::bytes(file.bytes().to_vec())
            .file_name(file.name().to_string())
            .mime_str(file.mime_type())
            .map_err(|e| ServiceError::Network(e.to_string()))?;
        let form = Form::new().part(UPLOAD_FIELD_NAME, part);

        let mut request = self.http_client.post(self.endpoint.clone()).multipart(form);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key).header("apikey", key);
        }

        tracing::debug!(
            endpoint = %self.endpoint,
            file = %file.name(),
            bytes = file.len(),
            "Invoking processing service"
        );

        let response = request
            .send()
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        decode_response(status, &body)
    }
}

/// Map a status + body to a bundle or an error
fn decode_response(status: StatusCode, body: &str) -> Result<ArtifactBundle, ServiceError> {
    if !status.is_success() {
        let message = error_message_from_body(body).unwrap_or_else(|| {
            let text = body.trim();
            if text.is_empty() {
                status.canonical_reason().unwrap_or("Unknown error").to_string()
            } else {
                text.to_string()
            }
        });
        return Err(ServiceError::Api {
            status: status.as_u16(),
            message,
        });
    }

    match serde_json::from_str::<ServiceResponse>(body) {
        Ok(ServiceResponse::Success(bundle)) => Ok(bundle),
        Ok(ServiceResponse::Failure { error }) => Err(ServiceError::Remote(error)),
        Err(_) => {
            // Untagged errors are uninformative; decode again for the real reason
            let reason = serde_json::from_str::<ArtifactBundle>(body)
                .err()
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unrecognized response body".to_string());
            Err(ServiceError::Malformed(reason))
        }
    }
}

/// Pull `error` / `error.message` / `message` out of a JSON error body
fn error_message_from_body(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let error = value.get("error");
    error
        .and_then(|e| e.as_str())
        .or_else(|| error.and_then(|e| e.get("message")).and_then(|m| m.as_str()))
        .or_else(|| value.get("message").and_then(|m| m.as_str()))
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::artifact_bundle::tests::{sample_bundle, SAMPLE_BUNDLE_JSON};

    fn settings(url: Option<&str>) -> ServiceSettings {
        ServiceSettings {
            service_url: url.map(|u| u.to_string()),
            api_key: None,
            function_name: "process-files".to_string(),
            request_timeout_secs: 5,
            log_level: "info".to_string(),
            log_file: None,
        }
    }

    #[test]
    fn test_endpoint_is_built_from_settings() {
        let service = HttpProcessingService::new(&settings(Some("https://abc.supabase.co/"))).unwrap();
        assert_eq!(
            service.endpoint().as_str(),
            "https://abc.supabase.co/functions/v1/process-files"
        );
    }

    #[test]
    fn test_missing_url_is_config_error() {
        let result = HttpProcessingService::new(&settings(None));
        assert!(matches!(result, Err(ServiceError::Config(_))));

        let result = HttpProcessingService::new(&settings(Some("not a url")));
        assert!(matches!(result, Err(ServiceError::Config(_))));
    }

    #[test]
    fn test_decode_success_body() {
        let bundle = decode_response(StatusCode::OK, SAMPLE_BUNDLE_JSON).unwrap();
        assert_eq!(bundle, sample_bundle());
    }

    #[test]
    fn test_decode_error_field_on_success_status() {
        let err = decode_response(StatusCode::OK, r#"{"error": "Unsupported file type"}"#)
            .unwrap_err();
        assert!(matches!(err, ServiceError::Remote(ref m) if m == "Unsupported file type"));
    }

    #[test]
    fn test_decode_non_success_status() {
        let err = decode_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"error": {"message": "model overloaded"}}"#,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Service returned 500: model overloaded");

        let err = decode_response(StatusCode::BAD_GATEWAY, "").unwrap_err();
        assert_eq!(err.to_string(), "Service returned 502: Bad Gateway");

        let err = decode_response(StatusCode::NOT_FOUND, "Function not found").unwrap_err();
        assert_eq!(err.to_string(), "Service returned 404: Function not found");
    }

    #[test]
    fn test_decode_partial_bundle_is_malformed() {
        let err = decode_response(
            StatusCode::OK,
            r#"{"studyGuide": {"title": "t", "content": []}, "flashcards": {"title": "f", "cards": []}}"#,
        )
        .unwrap_err();
        match err {
            ServiceError::Malformed(reason) => assert!(reason.contains("quiz")),
            other => panic!("expected Malformed, got {:?}", other),
        }
    }
}
