//! Report page state: the form, its status line and the success panel

use citywatch_core::StatusMessage;
use log::error;
use std::time::Duration;

use crate::{ReportDraft, ReportError, ReporterPrompt, ReportsClient, Submission};

/// How long a success status stays visible
pub const SUCCESS_STATUS_TTL: Duration = Duration::from_secs(5);

/// Which half of the page is showing
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormView {
    #[default]
    Editing,
    Success { reference: String },
}

#[derive(Debug, Clone, Default)]
pub struct ReportForm {
    pub draft: ReportDraft,
    view: FormView,
    status: Option<StatusMessage>,
    submitting: bool,
}

impl ReportForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> &FormView {
        &self.view
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Label of the submit button
    pub fn submit_label(&self) -> &'static str {
        if self.submitting {
            "Submitting..."
        } else {
            "Submit"
        }
    }

    /// Validate and upload the draft
    ///
    /// On success the draft is cleared and the success panel replaces the
    /// form; on failure the draft is kept and the status line explains why.
    pub async fn submit(
        &mut self,
        client: &ReportsClient,
        prompt: &dyn ReporterPrompt,
    ) -> Result<Submission, ReportError> {
        self.status = None;

        let report = match self.draft.validate() {
            Ok(report) => report,
            Err(err) => {
                self.status = Some(err.status_message());
                return Err(err);
            }
        };

        self.submitting = true;
        self.status = Some(StatusMessage::info("Submitting your report..."));
        let result = client.submit(report, prompt).await;
        self.submitting = false;

        match result {
            Ok(submission) => {
                self.status = Some(submission.status_message());
                self.draft = ReportDraft::default();
                self.view = FormView::Success {
                    reference: submission.reference_number.clone(),
                };
                Ok(submission)
            }
            Err(err) => {
                error!("Submission error: {}", err);
                self.status = Some(err.status_message());
                Err(err)
            }
        }
    }

    /// Leave the success panel for a fresh form
    pub fn back_to_form(&mut self) {
        self.view = FormView::Editing;
        self.draft.photo = None;
    }

    /// Drop a success status once [`SUCCESS_STATUS_TTL`] has passed
    pub fn expire_status(&mut self, shown_for: Duration) {
        let is_success = self
            .status
            .as_ref()
            .map_or(false, |s| s.kind == citywatch_core::StatusKind::Success);
        if is_success && shown_for >= SUCCESS_STATUS_TTL {
            self.status = None;
        }
    }
}
