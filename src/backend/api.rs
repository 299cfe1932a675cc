//! REST client for the policy backend. One client instance lives in the
//! backend task; every network call in the app goes through here.

use serde::Deserialize;
use thiserror::Error;

use crate::backend::moderation::StatusView;
use crate::backend::policy::{CountrySubmission, FileAttachment, PolicyStatus};
use crate::backend::submit::SubmissionPayload;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Wall-clock cap on moderation list fetches. Timeout surfaces as an
/// ordinary network failure. The submission POST carries no timeout.
#[cfg(not(target_arch = "wasm32"))]
const FETCH_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned HTTP {0}")]
    Status(u16),
    #[error("{0}")]
    Backend(String),
}

#[derive(Debug, Deserialize)]
struct Ack {
    success: Option<bool>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    file_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionsPage {
    #[serde(default)]
    pub submissions: Vec<CountrySubmission>,
    #[serde(default)]
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub total_pages: usize,
}

/// Result of a best-effort file upload. `success` stays true even when the
/// upload endpoint is down: a degraded upload path must never block the
/// policy-metadata submission itself, the attachment just stays local-only.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadOutcome {
    pub success: bool,
    pub file_path: Option<String>,
    pub message: String,
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new() -> Self {
        Self::with_base_url(default_base_url())
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub async fn submit_policies(&self, payload: &SubmissionPayload) -> Result<String, ApiError> {
        let resp = self
            .http
            .post(format!("{}/submit-policy", self.base_url))
            .json(payload)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }
        let ack: Ack = resp.json().await?;
        if ack.success == Some(false) {
            return Err(ApiError::Backend(
                ack.message.unwrap_or_else(|| "Submission rejected by server".to_string()),
            ));
        }
        Ok(ack
            .message
            .unwrap_or_else(|| "Submission received".to_string()))
    }

    /// Best-effort multipart upload of one attached document. Fails soft:
    /// any transport or server problem yields a local-only outcome instead
    /// of an error.
    pub async fn upload_policy_file(
        &self,
        country: &str,
        policy_index: usize,
        file: &FileAttachment,
    ) -> UploadOutcome {
        let part = reqwest::multipart::Part::bytes(file.bytes.clone())
            .file_name(file.name.clone());
        let part = match part.mime_str(&file.mime) {
            Ok(p) => p,
            Err(_) => {
                return UploadOutcome {
                    success: true,
                    file_path: None,
                    message: format!("Unrecognized file type {:?}, kept local-only", file.mime),
                }
            }
        };
        let form = reqwest::multipart::Form::new()
            .text("country", country.to_string())
            .text("policy_index", policy_index.to_string())
            .part("file", part);

        let sent = self
            .http
            .post(format!("{}/upload-policy-file", self.base_url))
            .multipart(form)
            .send()
            .await;

        match sent {
            Ok(resp) if resp.status().is_success() => match resp.json::<UploadResponse>().await {
                Ok(body) => UploadOutcome {
                    success: true,
                    file_path: Some(body.file_path),
                    message: format!("Uploaded {}", file.name),
                },
                Err(e) => {
                    tracing::warn!("upload response unreadable: {e}");
                    UploadOutcome {
                        success: true,
                        file_path: None,
                        message: "Upload response unreadable, file kept local-only".to_string(),
                    }
                }
            },
            Ok(resp) => {
                tracing::warn!("upload endpoint returned HTTP {}", resp.status());
                UploadOutcome {
                    success: true,
                    file_path: None,
                    message: format!(
                        "Upload unavailable (HTTP {}), file kept local-only",
                        resp.status().as_u16()
                    ),
                }
            }
            Err(e) => {
                tracing::warn!("upload endpoint unreachable: {e}");
                UploadOutcome {
                    success: true,
                    file_path: None,
                    message: "Upload service unreachable, file kept local-only".to_string(),
                }
            }
        }
    }

    pub async fn fetch_submissions(
        &self,
        view: StatusView,
        page: usize,
        per_page: usize,
    ) -> Result<SubmissionsPage, ApiError> {
        let endpoint = match view {
            StatusView::Pending => "pending-submissions",
            StatusView::Approved => "approved-submissions",
            StatusView::Rejected => "rejected-submissions",
        };
        let req = self
            .http
            .get(format!("{}/{}", self.base_url, endpoint))
            .query(&[("page", page), ("per_page", per_page)]);
        #[cfg(not(target_arch = "wasm32"))]
        let req = req.timeout(FETCH_TIMEOUT);

        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }
        Ok(resp.json().await?)
    }

    pub async fn approve_policy(
        &self,
        country: &str,
        policy_index: usize,
        text: &str,
    ) -> Result<(), ApiError> {
        self.post_ack(
            "approve-policy",
            serde_json::json!({ "country": country, "policyIndex": policy_index, "text": text }),
        )
        .await
    }

    pub async fn decline_policy(
        &self,
        country: &str,
        policy_index: usize,
        text: &str,
    ) -> Result<(), ApiError> {
        self.post_ack(
            "decline-policy",
            serde_json::json!({ "country": country, "policyIndex": policy_index, "text": text }),
        )
        .await
    }

    /// Edits and non-terminal status changes (`needs_revision`) go through
    /// the same endpoint.
    pub async fn update_policy(
        &self,
        country: &str,
        policy_index: usize,
        text: &str,
        status: PolicyStatus,
    ) -> Result<(), ApiError> {
        self.post_ack(
            "update-policy",
            serde_json::json!({
                "country": country,
                "policyIndex": policy_index,
                "text": text,
                "status": status.as_str(),
            }),
        )
        .await
    }

    pub async fn remove_submission(&self, country: &str) -> Result<(), ApiError> {
        self.post_ack("remove-submission", serde_json::json!({ "country": country }))
            .await
    }

    async fn post_ack(&self, endpoint: &str, body: serde_json::Value) -> Result<(), ApiError> {
        let resp = self
            .http
            .post(format!("{}/{}", self.base_url, endpoint))
            .json(&body)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }
        // body is optional on the mutation endpoints; a success:false still counts as failure
        if let Ok(ack) = resp.json::<Ack>().await {
            if ack.success == Some(false) {
                return Err(ApiError::Backend(
                    ack.message.unwrap_or_else(|| "Request rejected by server".to_string()),
                ));
            }
        }
        Ok(())
    }
}

/// Link to an uploaded document, for rendering `href`s outside the client.
pub fn policy_file_href(path: &str) -> String {
    file_url(&default_base_url(), path)
}

fn file_url(base_url: &str, filename: &str) -> String {
    format!("{base_url}/policy-file/{filename}")
}

fn default_base_url() -> String {
    #[cfg(not(target_arch = "wasm32"))]
    {
        std::env::var("POLICY_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
    }
    #[cfg(target_arch = "wasm32")]
    {
        DEFAULT_BASE_URL.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_file_url() {
        assert_eq!(
            file_url("http://example.org/api", "strategy.pdf"),
            "http://example.org/api/policy-file/strategy.pdf"
        );
    }

    #[test]
    fn test_submissions_page_parses_contract_shape() {
        let page: SubmissionsPage = serde_json::from_str(
            r#"{
                "submissions": [
                    {"country": "France", "policyInitiatives": [{"policyName": "AI Act", "status": "pending"}]}
                ],
                "pagination": {"total_pages": 3}
            }"#,
        )
        .expect("parse page");
        assert_eq!(page.submissions.len(), 1);
        assert_eq!(page.submissions[0].country, "France");
        assert_eq!(page.pagination.total_pages, 3);
    }

    #[test]
    fn test_submissions_page_tolerates_empty_body() {
        let page: SubmissionsPage = serde_json::from_str("{}").expect("parse empty");
        assert!(page.submissions.is_empty());
        assert_eq!(page.pagination.total_pages, 0);
    }
}
