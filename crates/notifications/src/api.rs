//! Notification endpoints

use citywatch_core::ApiClient;
use log::{debug, warn};
use serde_json::json;

use crate::model::NotificationPage;
use crate::{NotificationError, Result};

/// Which notifications endpoint a panel talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feed {
    /// `/api/admin/notifications`
    Admin,
    /// `/api/notifications`, the signed-in resident's own feed
    User,
}

impl Feed {
    pub fn path(&self) -> &'static str {
        match self {
            Feed::Admin => "/api/admin/notifications",
            Feed::User => "/api/notifications",
        }
    }
}

/// Thin wrapper over the notification endpoints of one feed
#[derive(Debug, Clone)]
pub struct NotificationsApi {
    api: ApiClient,
    feed: Feed,
}

impl NotificationsApi {
    pub fn new(api: ApiClient, feed: Feed) -> Self {
        Self { api, feed }
    }

    pub fn feed(&self) -> Feed {
        self.feed
    }

    pub fn client(&self) -> &ApiClient {
        &self.api
    }

    /// `GET <feed>?limit=N`
    pub async fn list(&self, limit: usize) -> Result<NotificationPage> {
        let response = self
            .api
            .get(self.feed.path())?
            .query("limit", limit)
            .execute()
            .await?;

        match response.data {
            Some(data) => Ok(NotificationPage::from_value(data)),
            None => {
                warn!(
                    "Notifications response from {} was not JSON",
                    self.feed.path()
                );
                Ok(NotificationPage::default())
            }
        }
    }

    /// `PATCH <feed>/:id` with `{read}`
    pub async fn set_read(&self, id: &str, read: bool) -> Result<()> {
        let path = format!("{}/{}", self.feed.path(), urlencoding::encode(id));
        debug!("Marking notification {} read={}", id, read);
        self.api
            .patch(&path)?
            .json(&json!({ "read": read }))?
            .execute()
            .await?;
        Ok(())
    }

    /// `POST /api/admin/notifications/mark-all-read`
    ///
    /// The resident feed has no bulk endpoint.
    pub async fn mark_all_read(&self) -> Result<()> {
        if self.feed != Feed::Admin {
            return Err(NotificationError::Unsupported(
                "mark-all-read is only available on the admin feed",
            ));
        }

        let path = format!("{}/mark-all-read", self.feed.path());
        self.api.post(&path)?.execute().await?;
        Ok(())
    }
}
