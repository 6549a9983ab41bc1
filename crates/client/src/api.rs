//! Typed HTTP client for the cropping backend.
//!
//! Wraps the backend REST surface (`/api/hello`, `/api/upload`,
//! `/api/status/{task_id}`, `/api/clear`, output downloads) using
//! [`reqwest`]. The upload and status endpoints return structured JSON
//! bodies even on non-2xx responses (e.g. `{"error": ...}` with a 400),
//! so those two are parsed leniently: a parseable body wins over the
//! HTTP status code.

use serde::Deserialize;

use fotokadr_core::{DocumentType, TaskStatus};

/// HTTP client for a single backend instance.
pub struct BackendApi {
    client: reqwest::Client,
    base_url: String,
}

/// Response from `GET /api/hello`.
#[derive(Debug, Deserialize)]
pub struct HelloResponse {
    /// Greeting text shown by the presentation layer.
    pub message: String,
}

/// Response from `POST /api/upload`.
///
/// Three shapes exist across backend revisions; deserialization tries
/// them in order of specificity.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum UploadResponse {
    /// The file was accepted and queued for asynchronous processing.
    Accepted {
        session_id: String,
        task_id: String,
        message: String,
    },

    /// Legacy synchronous mode: processing already finished during the
    /// upload call and the result URL is returned inline.
    Processed {
        session_id: String,
        message: String,
        cropped_file_url: String,
    },

    /// The backend rejected the upload outright.
    Rejected { error: String },
}

/// Response from `GET /api/status/{task_id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    pub status: TaskStatus,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub cropped_file_url: Option<String>,
    #[serde(default)]
    pub biometric_warnings: Vec<String>,
    #[serde(default)]
    pub biometric_errors: Vec<String>,
}

/// Errors from the backend REST layer.
#[derive(Debug, thiserror::Error)]
pub enum BackendApiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend returned a non-2xx status with an unparseable body.
    #[error("Backend API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// A 2xx response carried a body this client could not decode.
    #[error("Failed to decode backend response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl BackendApi {
    /// Create a new API client for a backend instance.
    ///
    /// * `base_url` - Base HTTP URL, e.g. `http://localhost:5000`.
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Create an API client reusing an existing [`reqwest::Client`]
    /// (useful for connection pooling, or for injecting timeouts).
    pub fn with_client(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// Base HTTP URL of the backend.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Health/greeting probe: `GET /api/hello`.
    pub async fn hello(&self) -> Result<HelloResponse, BackendApiError> {
        let response = self
            .client
            .get(format!("{}/api/hello", self.base_url))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Submit a file for processing: `POST /api/upload` (multipart).
    ///
    /// Sends `file`, `document_type`, and `session_id` when one is
    /// already held. The body is parsed regardless of HTTP status so
    /// that backend-side rejections surface as
    /// [`UploadResponse::Rejected`] rather than a transport error.
    pub async fn upload(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        document_type: DocumentType,
        session_id: Option<&str>,
    ) -> Result<UploadResponse, BackendApiError> {
        let file_part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let mut form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("document_type", document_type.as_str());
        if let Some(session_id) = session_id {
            form = form.text("session_id", session_id.to_string());
        }

        let response = self
            .client
            .post(format!("{}/api/upload", self.base_url))
            .multipart(form)
            .send()
            .await?;

        Self::parse_lenient(response).await
    }

    /// Query task status: `GET /api/status/{task_id}`.
    ///
    /// Parsed leniently for the same reason as [`upload`](Self::upload):
    /// an unknown task id comes back as a 404 whose body still carries
    /// `{"status": "error", ...}`.
    pub async fn status(&self, task_id: &str) -> Result<StatusResponse, BackendApiError> {
        let response = self
            .client
            .get(format!("{}/api/status/{}", self.base_url, task_id))
            .send()
            .await?;

        Self::parse_lenient(response).await
    }

    /// Ask the backend to release all resources held for a session:
    /// `POST /api/clear`. Callers on the teardown path ignore the result.
    pub async fn clear(&self, session_id: &str) -> Result<(), BackendApiError> {
        let body = serde_json::json!({ "session_id": session_id });

        let response = self
            .client
            .post(format!("{}/api/clear", self.base_url))
            .json(&body)
            .send()
            .await?;

        Self::check_status(response).await
    }

    /// Download a produced image from an absolute output URL.
    pub async fn fetch_output(&self, url: &str) -> Result<Vec<u8>, BackendApiError> {
        let response = self.client.get(url).send().await?;
        let response = Self::ensure_success(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`BackendApiError::ApiError`]
    /// containing the status and body text on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, BackendApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(BackendApiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, BackendApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    /// Parse the body into `T` whatever the HTTP status; fall back to
    /// [`BackendApiError::ApiError`] when a non-2xx body does not parse.
    async fn parse_lenient<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, BackendApiError> {
        let status = response.status();
        let body = response.text().await?;

        match serde_json::from_str::<T>(&body) {
            Ok(parsed) => Ok(parsed),
            Err(e) if status.is_success() => Err(BackendApiError::Decode(e)),
            Err(_) => Err(BackendApiError::ApiError {
                status: status.as_u16(),
                body,
            }),
        }
    }

    /// Assert the response has a success status code, discarding the body.
    async fn check_status(response: reqwest::Response) -> Result<(), BackendApiError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn upload_response_shapes_disambiguate() {
        let accepted: UploadResponse = serde_json::from_str(
            r#"{"session_id":"s1","task_id":"t1","message":"Rozpoczęto przetwarzanie"}"#,
        )
        .unwrap();
        assert_matches!(accepted, UploadResponse::Accepted { task_id, .. } if task_id == "t1");

        let processed: UploadResponse = serde_json::from_str(
            r#"{"session_id":"s1","message":"ok","cropped_file_url":"/api/output/s1/r.jpg"}"#,
        )
        .unwrap();
        assert_matches!(processed, UploadResponse::Processed { .. });

        let rejected: UploadResponse =
            serde_json::from_str(r#"{"error":"No file part"}"#).unwrap();
        assert_matches!(rejected, UploadResponse::Rejected { error } if error == "No file part");
    }

    #[test]
    fn status_response_defaults_empty_lists() {
        let status: StatusResponse =
            serde_json::from_str(r#"{"status":"processing"}"#).unwrap();
        assert_eq!(status.status, TaskStatus::Processing);
        assert!(status.biometric_warnings.is_empty());
        assert!(status.biometric_errors.is_empty());
        assert!(status.cropped_file_url.is_none());
    }
}
