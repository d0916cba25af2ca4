//! Pure rendering of a panel's state

use std::cmp::Reverse;

use chrono::{DateTime, Utc};
use citywatch_core::Page;

use crate::model::Notification;
use crate::pagination::{self, Pagination};
use crate::panel::{LoadState, PanelConfig, PanelKind, PanelState};

pub const NO_NOTIFICATIONS: &str = "No notifications";
pub const NO_MATCHING_NOTIFICATIONS: &str = "No notifications found";
/// Fallback text for rows without a message
pub const DEFAULT_MESSAGE: &str = "New notification";

/// Unread counter on the bell icon
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub count: usize,
    pub label: String,
    pub visible: bool,
}

impl Badge {
    fn new(count: usize) -> Self {
        let label = if count > 99 {
            "99+".to_string()
        } else {
            count.to_string()
        };
        Self {
            count,
            label,
            visible: count > 0,
        }
    }
}

/// Counters at the top of the admin page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub total: usize,
    pub unread: usize,
    pub report_related: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemView {
    pub id: String,
    pub avatar: char,
    pub title: String,
    pub message: String,
    pub time: String,
    pub unread: bool,
    pub report_link: Option<Page>,
}

/// "View all (N)" / "Show less" under the resident dropdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewAllToggle {
    pub label: String,
    pub expanded: bool,
}

/// Everything needed to draw a panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelView {
    pub kind: PanelKind,
    pub load: LoadState,
    pub badge: Badge,
    pub dropdown_open: bool,
    pub items: Vec<ItemView>,
    /// Set instead of rows when there is nothing to show
    pub empty_text: Option<&'static str>,
    pub stats: Option<Stats>,
    pub pagination: Option<Pagination>,
    pub showing: Option<String>,
    pub view_all: Option<ViewAllToggle>,
    /// Footer link of the admin bell
    pub footer_link: Option<Page>,
}

/// Admin page rows after filtering, newest first
pub fn filtered(state: &PanelState) -> Vec<&Notification> {
    let search = state.search.trim();
    let mut rows: Vec<&Notification> = state
        .notifications
        .iter()
        .filter(|n| state.status_filter.matches(n))
        .filter(|n| search.is_empty() || n.matches_search(search))
        .collect();
    // None sorts last under Reverse
    rows.sort_by_key(|n| Reverse(n.created_at));
    rows
}

fn item_view(kind: PanelKind, notification: &Notification, now: DateTime<Utc>) -> ItemView {
    let message = match kind {
        PanelKind::UserDropdown if notification.message.is_empty() => DEFAULT_MESSAGE.to_string(),
        _ => notification.message.clone(),
    };
    let report_link = match kind {
        PanelKind::AdminBell => None,
        _ => notification
            .report_id
            .as_deref()
            .map(|id| kind.report_page(id)),
    };

    ItemView {
        id: notification.id.clone(),
        avatar: notification.avatar(),
        title: notification.title.clone(),
        message,
        time: kind.time_style().format(notification.created_at, now),
        unread: !notification.read,
        report_link,
    }
}

/// Render `state` as seen at `now`
pub fn render(
    kind: PanelKind,
    state: &PanelState,
    config: &PanelConfig,
    now: DateTime<Utc>,
) -> PanelView {
    let mut view = PanelView {
        kind,
        load: state.load.clone(),
        badge: Badge::new(state.unread_count()),
        dropdown_open: state.dropdown_open,
        items: Vec::new(),
        empty_text: None,
        stats: None,
        pagination: None,
        showing: None,
        view_all: None,
        footer_link: None,
    };

    match kind {
        PanelKind::AdminPage => {
            view.stats = Some(Stats {
                total: state.notifications.len(),
                unread: state.unread_count(),
                report_related: state
                    .notifications
                    .iter()
                    .filter(|n| n.report_id.is_some())
                    .count(),
            });

            let rows = filtered(state);
            let total_pages = pagination::page_count(rows.len(), config.page_size);
            let current = state.page.clamp(1, total_pages.max(1));
            let range = pagination::page_range(current, config.page_size, rows.len());

            if range.is_empty() {
                view.empty_text = Some(NO_MATCHING_NOTIFICATIONS);
                return view;
            }

            view.items = rows[range.clone()]
                .iter()
                .map(|n| item_view(kind, n, now))
                .collect();
            view.showing = Some(pagination::showing_text(&range, rows.len()));
            view.pagination = Some(Pagination::new(current, total_pages));
        }
        PanelKind::AdminBell => {
            view.footer_link = Some(Page::AdminNotifications);
            view.items = state
                .notifications
                .iter()
                .map(|n| item_view(kind, n, now))
                .collect();
        }
        PanelKind::UserDropdown => {
            let len = state.notifications.len();
            // The server total can exceed what one fetch returned
            let total = state.total.max(len);
            let shown = if state.expanded {
                len
            } else {
                len.min(config.preview_len)
            };
            view.items = state.notifications[..shown]
                .iter()
                .map(|n| item_view(kind, n, now))
                .collect();

            if total > config.preview_len {
                view.view_all = Some(ViewAllToggle {
                    label: if state.expanded {
                        "Show less".to_string()
                    } else {
                        format!("View all ({})", total)
                    },
                    expanded: state.expanded,
                });
            }
        }
    }

    if view.items.is_empty() {
        view.empty_text = Some(NO_NOTIFICATIONS);
    }
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
    }

    fn notification(id: usize, read: bool, minutes_ago: i64) -> Notification {
        let created = now() - Duration::minutes(minutes_ago);
        let report_id = if id % 2 == 0 {
            json!(format!("r{}", id))
        } else {
            json!(null)
        };
        serde_json::from_value(json!({
            "id": id.to_string(),
            "title": format!("Report {}", id),
            "message": format!("Streetlight out #{}", id),
            "read": read,
            "createdAt": created.to_rfc3339(),
            "reportId": report_id,
        }))
        .unwrap()
    }

    fn state_with(count: usize) -> PanelState {
        PanelState {
            notifications: (0..count).map(|i| notification(i, i % 3 == 0, i as i64)).collect(),
            total: count,
            page: 1,
            ..PanelState::default()
        }
    }

    #[test]
    fn test_admin_page_paginates_newest_first() {
        let mut state = state_with(60);
        state.page = 3;
        let view = render(PanelKind::AdminPage, &state, &PanelConfig::default(), now());

        assert_eq!(view.items.len(), 10);
        assert_eq!(view.items[0].id, "50");
        assert_eq!(view.showing.as_deref(), Some("Showing 51-60 of 60"));
        let pagination = view.pagination.unwrap();
        assert_eq!(pagination.total_pages, 3);
        assert_eq!(pagination.current, 3);

        let stats = view.stats.unwrap();
        assert_eq!(stats.total, 60);
        assert_eq!(stats.unread, 40);
        assert_eq!(stats.report_related, 30);
    }

    #[test]
    fn test_admin_page_filters_and_empty_text() {
        let mut state = state_with(10);
        state.status_filter = crate::panel::StatusFilter::Unread;
        let view = render(PanelKind::AdminPage, &state, &PanelConfig::default(), now());
        assert!(view.items.iter().all(|i| i.unread));
        assert_eq!(view.items.len(), 6);

        state.search = "no such text".to_string();
        let view = render(PanelKind::AdminPage, &state, &PanelConfig::default(), now());
        assert_eq!(view.empty_text, Some(NO_MATCHING_NOTIFICATIONS));
        assert!(view.pagination.is_none());
    }

    #[test]
    fn test_report_links_follow_the_feed() {
        let state = state_with(3);
        let admin = render(PanelKind::AdminPage, &state, &PanelConfig::default(), now());
        let row = admin.items.iter().find(|i| i.id == "2").unwrap();
        assert_eq!(
            row.report_link,
            Some(Page::AdminReports {
                open_report: "r2".to_string()
            })
        );

        let bell = render(PanelKind::AdminBell, &state, &PanelConfig::default(), now());
        assert!(bell.items.iter().all(|i| i.report_link.is_none()));
        assert_eq!(bell.footer_link, Some(Page::AdminNotifications));
        assert_eq!(bell.items[1].time, "1m ago");
    }

    #[test]
    fn test_user_dropdown_truncates_until_expanded() {
        let mut state = state_with(8);
        let config = PanelConfig::default();

        let view = render(PanelKind::UserDropdown, &state, &config, now());
        assert_eq!(view.items.len(), 5);
        assert_eq!(view.view_all.as_ref().unwrap().label, "View all (8)");

        state.expanded = true;
        let view = render(PanelKind::UserDropdown, &state, &config, now());
        assert_eq!(view.items.len(), 8);
        assert_eq!(view.view_all.unwrap().label, "Show less");

        let small = state_with(5);
        assert!(render(PanelKind::UserDropdown, &small, &config, now())
            .view_all
            .is_none());
    }

    #[test]
    fn test_user_dropdown_counts_server_total() {
        let mut state = state_with(3);
        state.total = 40;
        let view = render(PanelKind::UserDropdown, &state, &PanelConfig::default(), now());

        assert_eq!(view.items.len(), 3);
        assert_eq!(view.view_all.unwrap().label, "View all (40)");
    }

    #[test]
    fn test_badge_caps_at_99() {
        let state = PanelState {
            notifications: (0..150).map(|i| notification(i, false, 5)).collect(),
            ..PanelState::default()
        };
        let view = render(PanelKind::UserDropdown, &state, &PanelConfig::default(), now());
        assert_eq!(view.badge.label, "99+");
        assert_eq!(view.badge.count, 150);

        let view = render(
            PanelKind::UserDropdown,
            &PanelState::default(),
            &PanelConfig::default(),
            now(),
        );
        assert!(!view.badge.visible);
        assert_eq!(view.empty_text, Some(NO_NOTIFICATIONS));
    }

    #[test]
    fn test_user_rows_get_fallback_message() {
        let state = PanelState {
            notifications: vec![serde_json::from_value(json!({ "id": "x" })).unwrap()],
            ..PanelState::default()
        };
        let view = render(PanelKind::UserDropdown, &state, &PanelConfig::default(), now());
        assert_eq!(view.items[0].message, DEFAULT_MESSAGE);
        assert_eq!(view.items[0].time, "");
    }
}
