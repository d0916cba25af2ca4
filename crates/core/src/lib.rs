//! Shared plumbing for the CityWatch client
//!
//! This crate provides the pieces every CityWatch component leans on:
//! API base resolution, the request builder that attaches the bearer token,
//! the session store abstraction standing in for browser storage, and the
//! page targets the forms redirect to.

pub mod base;
pub mod error;
pub mod fetch;
pub mod ids;
pub mod page;
pub mod session;
pub mod status;

pub use base::{ApiBase, LOCAL_FALLBACK};
pub use error::{ApiError, Result};
pub use fetch::{ApiClient, ApiResponse, FetchBuilder};
pub use page::Page;
pub use session::{
    FileStore, MemoryStore, Role, Session, SessionStore, Sessions, StoreError, User, ROLE_KEY,
    TOKEN_KEY, USER_KEY,
};
pub use status::{StatusKind, StatusMessage, NETWORK_ERROR};
