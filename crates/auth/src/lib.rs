//! CityWatch authentication client
//!
//! This crate provides the account flows of the CityWatch client: signup,
//! login, email verification and password reset. Every call validates its
//! input first and never touches the network when validation fails.

pub mod otp;
pub mod reset;
pub mod validate;
pub mod verify;

use citywatch_core::{
    ApiClient, ApiError, ApiResponse, Page, Role, Session, Sessions, StatusMessage, StoreError, User,
    NETWORK_ERROR,
};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

pub use otp::OtpInput;
pub use reset::{PasswordReset, ResetStage};
pub use verify::EmailVerification;

/// Auth errors
#[derive(Error, Debug)]
pub enum AuthError {
    /// Rejected before any request was sent
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Session storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Server response did not include a session token")]
    MissingToken,
}

impl AuthError {
    fn invalid(message: &str) -> Self {
        AuthError::Validation(message.to_string())
    }

    /// Status line for this failure, `fallback` covering silent server errors
    pub fn status_message(&self, fallback: &str) -> StatusMessage {
        match self {
            AuthError::Validation(message) => StatusMessage::error(message.clone()),
            AuthError::Api(err) if err.is_network() => StatusMessage::error(NETWORK_ERROR),
            AuthError::Api(err) => StatusMessage::error(err.user_message(fallback)),
            AuthError::Store(_) | AuthError::MissingToken => StatusMessage::error(fallback),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AuthError::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, AuthError>;

/// Email and password as typed into the login form
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Contents of the signup form
#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub role: Role,
}

impl SignupForm {
    /// Client-side checks, first failure wins
    pub fn validate(&self) -> Result<()> {
        validate::require_filled(&[
            &self.name,
            &self.email,
            &self.password,
            &self.confirm_password,
        ])
        .map_err(AuthError::invalid)?;

        if !validate::is_valid_email(self.email.trim()) {
            return Err(AuthError::invalid(validate::INVALID_EMAIL));
        }

        validate::check_new_password(&self.password, &self.confirm_password)
            .map_err(AuthError::invalid)
    }
}

/// Body returned by login and signup
#[derive(Debug, Clone, Default, Deserialize)]
struct AuthPayload {
    token: Option<String>,
    user: Option<User>,
}

/// Result of a login attempt that reached the server
#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    SignedIn { session: Session, redirect: Page },
    /// The account exists but its email is not verified yet
    NeedsVerification { email: String, redirect: Page },
}

impl LoginOutcome {
    pub fn redirect(&self) -> &Page {
        match self {
            LoginOutcome::SignedIn { redirect, .. } => redirect,
            LoginOutcome::NeedsVerification { redirect, .. } => redirect,
        }
    }

    pub fn status_message(&self) -> StatusMessage {
        match self {
            LoginOutcome::SignedIn { .. } => StatusMessage::success("Login successful! Redirecting..."),
            LoginOutcome::NeedsVerification { .. } => {
                StatusMessage::info("Please verify your email to continue.")
            }
        }
    }
}

/// Result of a successful signup
#[derive(Debug, Clone, PartialEq)]
pub enum SignupOutcome {
    /// The server issued a session right away
    SignedIn { session: Session, redirect: Page },
    /// The account must confirm its email first
    VerificationRequired { redirect: Page },
}

impl SignupOutcome {
    pub fn redirect(&self) -> &Page {
        match self {
            SignupOutcome::SignedIn { redirect, .. } => redirect,
            SignupOutcome::VerificationRequired { redirect } => redirect,
        }
    }

    pub fn status_message(&self) -> StatusMessage {
        match self {
            SignupOutcome::SignedIn { .. } => {
                StatusMessage::success("Account created successfully! Redirecting...")
            }
            SignupOutcome::VerificationRequired { .. } => {
                StatusMessage::success("Account created! Check your email for a verification code.")
            }
        }
    }
}

/// Client for the `/api/auth` endpoints
#[derive(Debug, Clone)]
pub struct AuthClient {
    api: ApiClient,
}

impl AuthClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn sessions(&self) -> &Sessions {
        self.api.sessions()
    }

    /// Where an already signed-in visitor of the login page is sent
    pub fn check_existing(&self) -> Option<Page> {
        let sessions = self.api.sessions();
        sessions.token()?;
        Some(Page::landing_for(sessions.role().unwrap_or_default()))
    }

    /// Sign in with email and password
    ///
    /// On success the session is stored and the redirect follows the role
    /// the server reports for the account.
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginOutcome> {
        let email = credentials.email.trim();
        validate::require_filled(&[email, &credentials.password]).map_err(AuthError::invalid)?;

        let response = self
            .api
            .post("/api/auth/login")?
            .json(&json!({ "email": email, "password": credentials.password }))?
            .send()
            .await?;

        if !response.is_success() {
            let needs_verification = response
                .data
                .as_ref()
                .and_then(|d| d.get("needsVerification"))
                .map(is_truthy)
                .unwrap_or(false);

            if needs_verification {
                let email = response.field_str("email").unwrap_or(email).to_string();
                info!("Login refused until {} is verified", email);
                return Ok(LoginOutcome::NeedsVerification {
                    redirect: Page::VerifyEmail {
                        email: email.clone(),
                    },
                    email,
                });
            }
        }

        let payload = auth_payload(response.error_for_status()?)?;
        let session = self.store_session(payload, None)?;
        info!("Login successful. Role: {}", session.user.role);

        Ok(LoginOutcome::SignedIn {
            redirect: Page::landing_for(session.user.role),
            session,
        })
    }

    /// Create an account
    pub async fn signup(&self, form: &SignupForm) -> Result<SignupOutcome> {
        form.validate()?;

        let email = form.email.trim().to_string();
        let response = self
            .api
            .post("/api/auth/signup")?
            .json(&json!({
                "name": form.name.trim(),
                "email": email,
                "password": form.password,
                "role": form.role.as_str(),
            }))?
            .execute()
            .await?;

        let payload = auth_payload(response)?;
        if payload.token.as_deref().map_or(true, str::is_empty) {
            debug!("Signup returned no token, verification required");
            return Ok(SignupOutcome::VerificationRequired {
                redirect: Page::VerifyEmail { email },
            });
        }

        let session = self.store_session(payload, Some(form.role))?;
        info!("Signup successful. Role: {}", session.user.role);
        Ok(SignupOutcome::SignedIn {
            session,
            redirect: Page::landing_for(form.role),
        })
    }

    /// Confirm an email address with the emailed code
    pub async fn verify_email(&self, email: &str, code: &str) -> Result<Page> {
        if email.trim().is_empty() {
            return Err(AuthError::invalid(verify::NO_EMAIL));
        }
        validate::check_code(code).map_err(AuthError::invalid)?;

        self.api
            .post("/api/auth/verify-email")?
            .json(&json!({ "email": email.trim(), "code": code }))?
            .execute()
            .await?;

        Ok(Page::Login)
    }

    /// Ask for a new verification code
    pub async fn resend_verification(&self, email: &str) -> Result<()> {
        if email.trim().is_empty() {
            return Err(AuthError::invalid(verify::NO_EMAIL));
        }

        self.api
            .post("/api/auth/resend-verification")?
            .json(&json!({ "email": email.trim() }))?
            .execute()
            .await?;

        Ok(())
    }

    /// Start a password reset
    ///
    /// Development servers answer with the reset token instead of mailing
    /// it; that token is returned when present.
    pub async fn forgot_password(&self, email: &str) -> Result<Option<String>> {
        let email = email.trim();
        if email.is_empty() {
            return Err(AuthError::invalid(validate::EMAIL_REQUIRED));
        }

        let response = self
            .api
            .post("/api/auth/forgot-password")?
            .json(&json!({ "email": email }))?
            .execute()
            .await?;

        Ok(response
            .field_str("token")
            .filter(|t| !t.is_empty())
            .map(str::to_string))
    }

    /// Set a new password using the reset token
    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<Page> {
        validate::check_new_password(new_password, confirm_password)
            .map_err(AuthError::invalid)?;

        self.api
            .post("/api/auth/reset-password")?
            .json(&json!({ "token": token, "newPassword": new_password }))?
            .execute()
            .await?;

        Ok(Page::Login)
    }

    /// Forget the stored session
    pub fn logout(&self) -> Result<Page> {
        self.api.sessions().clear()?;
        Ok(Page::Login)
    }

    fn store_session(&self, payload: AuthPayload, fallback_role: Option<Role>) -> Result<Session> {
        let token = payload
            .token
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingToken)?;

        let user = payload.user.unwrap_or_else(|| User {
            role: fallback_role.unwrap_or_default(),
            ..User::default()
        });

        let session = Session::new(token, user);
        self.api.sessions().save(&session)?;
        Ok(session)
    }
}

fn auth_payload(response: ApiResponse) -> Result<AuthPayload> {
    match response.data {
        Some(data) => Ok(serde_json::from_value(data).map_err(ApiError::from)?),
        None => Ok(AuthPayload::default()),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Null => false,
        Value::Number(n) => n.as_f64().map_or(false, |n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}
