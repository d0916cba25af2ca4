//! CityWatch notification panels
//!
//! Three views share one engine: the admin notification page, the admin
//! bell and the resident dropdown. Each panel keeps its own cache of the
//! last fetched notifications, refreshes it on a fixed poll interval and
//! renders a [`PanelView`](render::PanelView) from that cache.
//!
//! ```no_run
//! use citywatch_core::{ApiBase, ApiClient, Sessions};
//! use citywatch_notifications::{NotificationPanel, PanelConfig, PanelKind};
//!
//! # async fn run() -> citywatch_notifications::Result<()> {
//! let api = ApiClient::new(ApiBase::default(), reqwest::Client::new(), Sessions::in_memory());
//! let panel = NotificationPanel::new(PanelKind::UserDropdown, api, PanelConfig::default())?;
//! let _poll = panel.start_polling();
//! panel.refresh().await?;
//! println!("{} unread", panel.render(chrono::Utc::now()).badge.count);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod model;
pub mod pagination;
pub mod panel;
pub mod poll;
pub mod render;
pub mod time;

use citywatch_core::{ApiError, Page};
use thiserror::Error;

pub use api::{Feed, NotificationsApi};
pub use model::{Notification, NotificationPage};
pub use pagination::{PageButton, Pagination};
pub use panel::{
    ClickOutcome, ClickTarget, LoadState, NotificationPanel, PanelConfig, PanelKind, PanelState,
    StatusFilter, Toast,
};
pub use poll::PollHandle;
pub use render::{render, PanelView};
pub use time::TimeStyle;

/// Notification errors
#[derive(Error, Debug)]
pub enum NotificationError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The panel needs a signed-in admin
    #[error("Admin access required, redirecting to {redirect}")]
    Unauthorized { redirect: Page },

    #[error("Unsupported operation: {0}")]
    Unsupported(&'static str),
}

impl NotificationError {
    /// Page to send the caller to, if this error calls for a redirect
    pub fn redirect(&self) -> Option<&Page> {
        match self {
            NotificationError::Unauthorized { redirect } => Some(redirect),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, NotificationError>;
