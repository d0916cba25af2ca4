//! CityWatch report submission
//!
//! Validates a report draft, picks the authenticated or the anonymous
//! endpoint depending on whether a session token is stored, and uploads the
//! report as a multipart form.

pub mod draft;
pub mod form;
pub mod prompt;

use citywatch_core::{ApiClient, ApiError, StatusMessage, NETWORK_ERROR};
use log::{error, info};
use serde_json::Value;
use thiserror::Error;

pub use draft::{Attachment, Category, ReportDraft, ValidReport};
pub use form::{FormView, ReportForm};
pub use prompt::{FixedReporter, NoPrompt, ReporterInfo, ReporterPrompt};

/// Endpoint for signed-in reporters
pub const REPORTS_PATH: &str = "/api/reports";
/// Endpoint for anonymous reporters
pub const ANONYMOUS_REPORTS_PATH: &str = "/api/reports/anonymous";

/// Shown when the server does not return a reference number
pub const NO_REFERENCE: &str = "N/A";

/// Report errors
#[derive(Error, Debug)]
pub enum ReportError {
    /// Rejected before any request was sent
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Invalid attachment: {0}")]
    Attachment(String),
}

impl ReportError {
    fn invalid(message: &str) -> Self {
        ReportError::Validation(message.to_string())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ReportError::Validation(_))
    }

    /// Status line for this failure
    pub fn status_message(&self) -> StatusMessage {
        match self {
            ReportError::Api(err) if err.is_network() => StatusMessage::error(NETWORK_ERROR),
            other => StatusMessage::error(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;

/// A report the server accepted
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub reference_number: String,
    pub anonymous: bool,
    /// The `report` object of the response, when there was one
    pub report: Option<Value>,
}

impl Submission {
    pub fn status_message(&self) -> StatusMessage {
        StatusMessage::success(format!(
            "Report submitted successfully! Your reference number is: {}.",
            self.reference_number
        ))
    }
}

/// Client for the reports endpoints
#[derive(Debug, Clone)]
pub struct ReportsClient {
    api: ApiClient,
}

impl ReportsClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Validate `draft` and submit it
    pub async fn submit_draft(
        &self,
        draft: &ReportDraft,
        prompt: &dyn ReporterPrompt,
    ) -> Result<Submission> {
        let report = draft.validate()?;
        self.submit(report, prompt).await
    }

    /// Upload a validated report
    ///
    /// Without a stored session the report goes to the anonymous endpoint and
    /// `prompt` is asked for the reporter's optional name and email.
    pub async fn submit(&self, report: ValidReport, prompt: &dyn ReporterPrompt) -> Result<Submission> {
        let anonymous = !self.api.sessions().is_signed_in();

        let (endpoint, reporter) = if anonymous {
            (ANONYMOUS_REPORTS_PATH, prompt::collect(prompt).await)
        } else {
            (REPORTS_PATH, ReporterInfo::default())
        };

        let form = report.into_form(&reporter)?;
        let response = self.api.post(endpoint)?.multipart(form).send().await?;

        if !response.is_success() {
            let message = response
                .field_str("message")
                .filter(|m| !m.is_empty())
                .map(str::to_string)
                .or_else(|| Some(response.text.clone()).filter(|t| !t.trim().is_empty()))
                .unwrap_or_else(|| format!("Failed to submit report ({})", response.status));

            error!("Report submission rejected with status {}", response.status);
            return Err(ApiError::Api {
                status: response.status,
                message: Some(message),
                body: response.data,
            }
            .into());
        }

        let report = response.data.as_ref().and_then(|d| d.get("report")).cloned();
        let reference_number = report
            .as_ref()
            .and_then(|r| r.get("referenceNumber"))
            .and_then(|r| match r {
                Value::String(s) if !s.is_empty() => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .unwrap_or_else(|| NO_REFERENCE.to_string());

        info!("Report submitted with reference {}", reference_number);

        Ok(Submission {
            reference_number,
            anonymous,
            report,
        })
    }
}
