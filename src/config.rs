//! Configuration options for the CityWatch client

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use citywatch_notifications::PanelConfig;

use crate::error::{Error, Result};

/// Explicit API base, bypassing origin resolution
pub const ENV_API_BASE: &str = "CITYWATCH_API_BASE";
/// Origin the pages are served from
pub const ENV_ORIGIN: &str = "CITYWATCH_ORIGIN";
/// Notification poll interval in seconds
pub const ENV_POLL_SECS: &str = "CITYWATCH_POLL_SECS";
/// JSON file to persist the session in
pub const ENV_SESSION_FILE: &str = "CITYWATCH_SESSION_FILE";

/// Configuration options for the CityWatch client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    /// Overrides the API base derived from `origin`
    pub api_base: Option<String>,

    /// Origin of the page the client acts for
    pub origin: Option<String>,

    /// The request timeout
    pub request_timeout: Option<Duration>,

    /// Where the session is persisted, in memory when unset
    pub session_file: Option<PathBuf>,

    pub poll_interval: Duration,

    /// Rows per page on the admin notification page
    pub page_size: usize,

    pub admin_page_limit: usize,
    pub bell_limit: usize,
    pub user_limit: usize,

    /// Rows the resident dropdown shows before "View all"
    pub preview_len: usize,
}

impl Default for ClientOptions {
    fn default() -> Self {
        let panels = PanelConfig::default();
        Self {
            api_base: None,
            origin: None,
            request_timeout: Some(Duration::from_secs(30)),
            session_file: None,
            poll_interval: panels.poll_interval,
            page_size: panels.page_size,
            admin_page_limit: panels.admin_page_limit,
            bell_limit: panels.bell_limit,
            user_limit: panels.user_limit,
            preview_len: panels.preview_len,
        }
    }
}

impl ClientOptions {
    /// Defaults overridden by `CITYWATCH_*` environment variables
    pub fn from_env() -> Result<Self> {
        let mut options = Self::default();

        if let Ok(base) = env::var(ENV_API_BASE) {
            options = options.with_api_base(&base);
        }
        if let Ok(origin) = env::var(ENV_ORIGIN) {
            options = options.with_origin(&origin);
        }
        if let Ok(path) = env::var(ENV_SESSION_FILE) {
            options = options.with_session_file(path);
        }
        if let Ok(secs) = env::var(ENV_POLL_SECS) {
            let secs: u64 = secs
                .trim()
                .parse()
                .map_err(|_| Error::config(format!("{} must be a number of seconds", ENV_POLL_SECS)))?;
            options = options.with_poll_interval(Duration::from_secs(secs));
        }

        options.validate()?;
        Ok(options)
    }

    /// Reject settings the panels cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval.is_zero() {
            return Err(Error::config("poll interval must be greater than zero"));
        }
        if self.page_size == 0 {
            return Err(Error::config("page size must be greater than zero"));
        }
        Ok(())
    }

    /// Set the API base override
    pub fn with_api_base(mut self, value: &str) -> Self {
        self.api_base = Some(value.to_string());
        self
    }

    /// Set the page origin
    pub fn with_origin(mut self, value: &str) -> Self {
        self.origin = Some(value.to_string());
        self
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Persist the session in a JSON file
    pub fn with_session_file(mut self, value: impl Into<PathBuf>) -> Self {
        self.session_file = Some(value.into());
        self
    }

    /// Set the notification poll interval
    pub fn with_poll_interval(mut self, value: Duration) -> Self {
        self.poll_interval = value;
        self
    }

    /// Set the admin page size
    pub fn with_page_size(mut self, value: usize) -> Self {
        self.page_size = value;
        self
    }

    /// Set the admin bell fetch limit
    pub fn with_bell_limit(mut self, value: usize) -> Self {
        self.bell_limit = value;
        self
    }

    /// Set the resident dropdown fetch limit
    pub fn with_user_limit(mut self, value: usize) -> Self {
        self.user_limit = value;
        self
    }

    /// Set how many rows the resident dropdown previews
    pub fn with_preview_len(mut self, value: usize) -> Self {
        self.preview_len = value;
        self
    }

    /// Panel settings derived from these options
    pub fn panel_config(&self) -> PanelConfig {
        PanelConfig {
            page_size: self.page_size,
            admin_page_limit: self.admin_page_limit,
            bell_limit: self.bell_limit,
            user_limit: self.user_limit,
            preview_len: self.preview_len,
            poll_interval: self.poll_interval,
        }
    }
}
