//! Notification records as the client caches them

use chrono::{DateTime, Utc};
use citywatch_core::ids::opt_string_or_number;
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A notification, normalized from the server's loosely-shaped JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawNotification", rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub created_at: Option<DateTime<Utc>>,
    /// Report this notification refers to, from `reportId` or the payload
    pub report_id: Option<String>,
    pub reporter_name: Option<String>,
}

impl Notification {
    /// Uppercase initial of the reporter, `A` when anonymous
    pub fn avatar(&self) -> char {
        self.reporter_name
            .as_deref()
            .and_then(|name| name.trim().chars().next())
            .and_then(|c| c.to_uppercase().next())
            .unwrap_or('A')
    }

    /// Case-insensitive match against message and title
    pub fn matches_search(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.message.to_lowercase().contains(&query) || self.title.to_lowercase().contains(&query)
    }
}

#[derive(Deserialize, Default)]
struct RawReporter {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Deserialize, Default)]
struct RawData {
    #[serde(default)]
    reporter: Option<RawReporter>,
    #[serde(default, rename = "reportId", deserialize_with = "opt_string_or_number")]
    report_id: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    id: Option<String>,
    #[serde(default, rename = "_id", deserialize_with = "opt_string_or_number")]
    object_id: Option<String>,
}

#[derive(Deserialize)]
struct RawNotification {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    id: Option<String>,
    #[serde(default, rename = "_id", deserialize_with = "opt_string_or_number")]
    object_id: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    read: Option<bool>,
    #[serde(default, rename = "createdAt")]
    created_at: Option<String>,
    #[serde(default, rename = "reportId", deserialize_with = "opt_string_or_number")]
    report_id: Option<String>,
    #[serde(default)]
    data: Option<RawData>,
}

impl From<RawNotification> for Notification {
    fn from(raw: RawNotification) -> Self {
        let data = raw.data.unwrap_or_default();
        let report_id = raw
            .report_id
            .or(data.report_id)
            .or(data.id)
            .or(data.object_id);

        Self {
            id: raw.id.or(raw.object_id).unwrap_or_default(),
            title: raw.title.unwrap_or_default(),
            message: raw.message.unwrap_or_default(),
            read: raw.read.unwrap_or(false),
            created_at: raw.created_at.as_deref().and_then(parse_timestamp),
            report_id,
            reporter_name: data
                .reporter
                .and_then(|r| r.name)
                .filter(|n| !n.trim().is_empty()),
        }
    }
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|d| d.with_timezone(&Utc))
        .ok()
}

/// One fetch worth of notifications
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationPage {
    pub items: Vec<Notification>,
    /// Total reported by the server, or the number of items
    pub total: usize,
}

impl NotificationPage {
    /// Accepts a bare array, `{notifications: [...]}` or `{items: [...]}`
    ///
    /// Entries that cannot be read are skipped; anything else yields an
    /// empty page.
    pub fn from_value(value: Value) -> Self {
        let (entries, total) = match value {
            Value::Array(entries) => (entries, None),
            Value::Object(mut map) => {
                let total = map.get("total").and_then(Value::as_u64);
                let list = map.remove("notifications").or_else(|| map.remove("items"));
                match list {
                    Some(Value::Array(entries)) => (entries, total),
                    _ => (Vec::new(), total),
                }
            }
            other => {
                warn!("Unexpected notifications payload: {}", other);
                (Vec::new(), None)
            }
        };

        let items: Vec<Notification> = entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value(entry) {
                Ok(notification) => Some(notification),
                Err(err) => {
                    warn!("Skipping unreadable notification: {}", err);
                    None
                }
            })
            .collect();

        let total = total.map(|t| t as usize).unwrap_or(items.len());
        Self { items, total }
    }

    pub fn unread_count(&self) -> usize {
        unread_count(&self.items)
    }
}

/// Number of notifications with `read == false`
pub fn unread_count(items: &[Notification]) -> usize {
    items.iter().filter(|n| !n.read).count()
}
