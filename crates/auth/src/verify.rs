//! Email verification page state

use citywatch_core::{Page, StatusMessage};
use log::error;

use crate::{AuthClient, OtpInput};

pub const NO_EMAIL: &str = "No email provided. Please try signing up again.";

/// The verification form: the address being confirmed and the code cells
#[derive(Debug, Clone, Default)]
pub struct EmailVerification {
    email: Option<String>,
    pub code: OtpInput,
    status: Option<StatusMessage>,
    busy: bool,
}

impl EmailVerification {
    pub fn new(email: Option<String>) -> Self {
        let email = email.filter(|e| !e.trim().is_empty());
        let status = match email {
            Some(_) => None,
            None => Some(StatusMessage::error(NO_EMAIL)),
        };

        Self {
            email,
            status,
            ..Self::default()
        }
    }

    /// Read the address from the page's query string (`email=...`)
    pub fn from_query(query: &str) -> Self {
        let query = query.trim_start_matches('?');
        let email = url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == "email")
            .map(|(_, value)| value.into_owned());
        Self::new(email)
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    /// The form is hidden when there is no address to verify
    pub fn form_visible(&self) -> bool {
        self.email.is_some()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Submit the entered code; returns the page to go to on success
    pub async fn submit(&mut self, client: &AuthClient) -> Option<Page> {
        self.status = None;
        let email = self.email.clone().unwrap_or_default();

        self.busy = true;
        let result = client.verify_email(&email, &self.code.code()).await;
        self.busy = false;

        match result {
            Ok(page) => {
                self.status = Some(StatusMessage::success(
                    "Email verified successfully! Redirecting to login...",
                ));
                Some(page)
            }
            Err(err) => {
                if !err.is_validation() {
                    error!("Verification error: {}", err);
                }
                self.status = Some(err.status_message("Verification failed. Please try again."));
                None
            }
        }
    }

    /// Request a fresh code and empty the cells
    pub async fn resend(&mut self, client: &AuthClient) {
        self.status = None;
        let email = self.email.clone().unwrap_or_default();

        match client.resend_verification(&email).await {
            Ok(()) => {
                self.code.clear();
                self.status = Some(StatusMessage::success(
                    "Verification code resent! Please check your email.",
                ));
            }
            Err(err) => {
                if !err.is_validation() {
                    error!("Resend error: {}", err);
                }
                self.status =
                    Some(err.status_message("Failed to resend code. Please try again."));
            }
        }
    }
}
