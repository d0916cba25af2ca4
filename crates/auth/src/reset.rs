//! Three-step password reset: email, code, new password

use citywatch_core::{Page, StatusMessage};
use log::error;

use crate::validate::check_code;
use crate::{AuthClient, AuthError, OtpInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResetStage {
    #[default]
    Email,
    Code,
    Password,
    Done,
}

/// State of the password reset page
#[derive(Debug, Clone, Default)]
pub struct PasswordReset {
    stage: ResetStage,
    email: String,
    token: String,
    pub code: OtpInput,
    status: Option<StatusMessage>,
}

impl PasswordReset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> ResetStage {
        self.stage
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    /// Ask the server to send a reset code to `email`
    pub async fn submit_email(&mut self, client: &AuthClient, email: &str) {
        self.status = None;

        match client.forgot_password(email).await {
            Ok(dev_token) => {
                self.email = email.trim().to_string();
                self.status = Some(match dev_token {
                    Some(token) => {
                        self.token = token;
                        StatusMessage::info(
                            "Dev mode: Token received. In production this would be emailed.",
                        )
                    }
                    None => StatusMessage::success("OTP sent! Please check your email."),
                });
                self.code.clear();
                self.stage = ResetStage::Code;
            }
            Err(err) => self.fail(err, "Failed to send OTP."),
        }
    }

    /// Accept the six-digit code typed into the cells
    pub fn submit_code(&mut self) -> bool {
        self.status = None;
        let code = self.code.code();

        match check_code(&code) {
            Ok(()) => {
                self.token = code;
                self.stage = ResetStage::Password;
                true
            }
            Err(message) => {
                self.status = Some(StatusMessage::error(message));
                false
            }
        }
    }

    /// Set the new password; returns the page to go to on success
    pub async fn submit_password(
        &mut self,
        client: &AuthClient,
        new_password: &str,
        confirm_password: &str,
    ) -> Option<Page> {
        self.status = None;

        match client
            .reset_password(&self.token, new_password, confirm_password)
            .await
        {
            Ok(page) => {
                self.stage = ResetStage::Done;
                self.status = Some(StatusMessage::success(
                    "Password reset successful! Redirecting to login...",
                ));
                Some(page)
            }
            Err(err) => {
                self.fail(err, "Failed to reset password.");
                None
            }
        }
    }

    fn fail(&mut self, err: AuthError, fallback: &str) {
        if !err.is_validation() {
            error!("Password reset error: {}", err);
        }
        self.status = Some(err.status_message(fallback));
    }
}
