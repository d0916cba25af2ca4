//! Error handling for the CityWatch client

use std::fmt;

use citywatch_auth::AuthError;
use citywatch_core::{ApiError, Page, StoreError};
use citywatch_notifications::NotificationError;
use citywatch_reports::ReportError;
use thiserror::Error;

/// Unified error type for the CityWatch client
#[derive(Error, Debug)]
pub enum Error {
    /// Network or HTTP related errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    #[error("Notification error: {0}")]
    Notification(#[from] NotificationError),

    #[error("Session storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config<T: fmt::Display>(msg: T) -> Self {
        Error::Config(msg.to_string())
    }

    /// Page the caller should be sent to, for access failures
    pub fn redirect(&self) -> Option<&Page> {
        match self {
            Error::Notification(err) => err.redirect(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
