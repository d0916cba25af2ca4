//! CityWatch Rust Client Library
//!
//! A Rust client for the CityWatch civic issue reporting service, covering
//! account flows, report submission, notification panels and the page
//! transition helper.

pub mod config;
pub mod error;
pub mod transitions;

use std::sync::Arc;

use citywatch_auth::{AuthClient, EmailVerification, PasswordReset};
use citywatch_core::{ApiBase, ApiClient, FileStore, Page, Sessions};
use citywatch_notifications::{NotificationPanel, PanelKind};
use citywatch_reports::{ReportForm, ReportsClient};
use log::debug;
use reqwest::Client;

use crate::config::ClientOptions;
use crate::error::Result;
use crate::transitions::PageTransitions;

pub use citywatch_auth;
pub use citywatch_core;
pub use citywatch_notifications;
pub use citywatch_reports;

/// The main entry point for the CityWatch client
#[derive(Debug, Clone)]
pub struct CityWatch {
    api: ApiClient,
    options: ClientOptions,
}

impl CityWatch {
    /// Create a client with default options
    ///
    /// Without an origin the client talks to the local development server.
    ///
    /// # Example
    ///
    /// ```
    /// use citywatch_client::CityWatch;
    ///
    /// let citywatch = CityWatch::new().unwrap();
    /// assert_eq!(citywatch.api().base().as_str(), "http://localhost:3000");
    /// ```
    pub fn new() -> Result<Self> {
        Self::new_with_options(ClientOptions::default())
    }

    /// Create a client with custom options
    ///
    /// # Example
    ///
    /// ```
    /// use citywatch_client::{CityWatch, config::ClientOptions};
    ///
    /// let options = ClientOptions::default().with_origin("https://citywatch.example");
    /// let citywatch = CityWatch::new_with_options(options).unwrap();
    /// assert!(!citywatch.sessions().is_signed_in());
    /// ```
    pub fn new_with_options(options: ClientOptions) -> Result<Self> {
        let sessions = match &options.session_file {
            Some(path) => Sessions::new(Arc::new(FileStore::open(path)?)),
            None => Sessions::in_memory(),
        };
        Self::with_sessions(options, sessions)
    }

    /// Create a client around an existing session store
    pub fn with_sessions(options: ClientOptions, sessions: Sessions) -> Result<Self> {
        options.validate()?;

        let base = ApiBase::resolve(options.origin.as_deref(), options.api_base.as_deref())?;
        debug!("CityWatch API base: {}", base.as_str());

        let mut builder = Client::builder();
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        Ok(Self {
            api: ApiClient::new(base, http_client, sessions),
            options,
        })
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub fn sessions(&self) -> &Sessions {
        self.api.sessions()
    }

    /// Client for signup, login, verification and password reset
    pub fn auth(&self) -> AuthClient {
        AuthClient::new(self.api.clone())
    }

    /// Where an already signed-in visitor of the login page belongs
    pub fn landing_page(&self) -> Option<Page> {
        self.auth().check_existing()
    }

    /// Verification form for a page opened with `query`
    pub fn email_verification(&self, query: &str) -> EmailVerification {
        EmailVerification::from_query(query)
    }

    pub fn password_reset(&self) -> PasswordReset {
        PasswordReset::new()
    }

    /// Client for submitting reports
    pub fn reports(&self) -> ReportsClient {
        ReportsClient::new(self.api.clone())
    }

    pub fn report_form(&self) -> ReportForm {
        ReportForm::new()
    }

    /// The full admin notification page
    ///
    /// Fails with a redirect to the login page unless an admin is signed in.
    pub fn admin_notifications(&self) -> Result<NotificationPanel> {
        self.panel(PanelKind::AdminPage)
    }

    /// The bell in the admin header
    pub fn notification_bell(&self) -> Result<NotificationPanel> {
        self.panel(PanelKind::AdminBell)
    }

    /// The resident's notification dropdown
    pub fn user_notifications(&self) -> Result<NotificationPanel> {
        self.panel(PanelKind::UserDropdown)
    }

    fn panel(&self, kind: PanelKind) -> Result<NotificationPanel> {
        Ok(NotificationPanel::new(
            kind,
            self.api.clone(),
            self.options.panel_config(),
        )?)
    }

    /// Fade helper for links within the configured origin
    pub fn transitions(&self) -> PageTransitions {
        let origin = self
            .options
            .origin
            .clone()
            .unwrap_or_else(|| self.api.base().as_str().to_string());
        PageTransitions::new(&origin)
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::config::ClientOptions;
    pub use crate::error::{Error, Result};
    pub use crate::CityWatch;
    pub use citywatch_auth::{AuthClient, Credentials, LoginOutcome, SignupForm, SignupOutcome};
    pub use citywatch_core::{Page, Role, Sessions, StatusMessage};
    pub use citywatch_notifications::{ClickTarget, NotificationPanel, PanelKind};
    pub use citywatch_reports::{Attachment, Category, ReportDraft, ReportsClient};
}
