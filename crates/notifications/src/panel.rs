//! Panel state and the actions that change it

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use citywatch_core::{ApiClient, Page};
use log::{debug, error, warn};

use crate::api::{Feed, NotificationsApi};
use crate::model::Notification;
use crate::pagination::{self, DEFAULT_PAGE_SIZE};
use crate::poll::{self, PollHandle};
use crate::render::{self, PanelView};
use crate::time::TimeStyle;
use crate::{NotificationError, Result};

pub const ALL_MARKED_TOAST: &str = "All notifications marked as read";
pub const MARK_ALL_FAILED_TOAST: &str = "Failed to mark all as read";

/// How long a toast stays visible
pub const TOAST_DURATION: Duration = Duration::from_secs(3);

/// The three notification views
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKind {
    /// Full admin notification page with filters and pagination
    AdminPage,
    /// Bell dropdown in the admin header
    AdminBell,
    /// Bell dropdown for signed-in residents
    UserDropdown,
}

impl PanelKind {
    pub fn feed(&self) -> Feed {
        match self {
            PanelKind::AdminPage | PanelKind::AdminBell => Feed::Admin,
            PanelKind::UserDropdown => Feed::User,
        }
    }

    pub fn requires_admin(&self) -> bool {
        self.feed() == Feed::Admin
    }

    pub fn time_style(&self) -> TimeStyle {
        match self {
            PanelKind::AdminPage => TimeStyle::Long,
            PanelKind::AdminBell => TimeStyle::Compact,
            PanelKind::UserDropdown => TimeStyle::Short,
        }
    }

    /// `limit` query value for this view
    pub fn fetch_limit(&self, config: &PanelConfig) -> usize {
        match self {
            PanelKind::AdminPage => config.admin_page_limit,
            PanelKind::AdminBell => config.bell_limit,
            PanelKind::UserDropdown => config.user_limit,
        }
    }

    /// Where a notification's report opens from this view
    pub fn report_page(&self, report_id: &str) -> Page {
        match self {
            PanelKind::AdminPage | PanelKind::AdminBell => Page::AdminReports {
                open_report: report_id.to_string(),
            },
            PanelKind::UserDropdown => Page::Track {
                report_id: Some(report_id.to_string()),
            },
        }
    }
}

/// Sizes and timings for the notification views
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelConfig {
    pub page_size: usize,
    pub admin_page_limit: usize,
    pub bell_limit: usize,
    pub user_limit: usize,
    /// Rows the resident dropdown shows before "View all"
    pub preview_len: usize,
    pub poll_interval: Duration,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            admin_page_limit: 999_999,
            bell_limit: 5,
            user_limit: 50,
            preview_len: 5,
            poll_interval: poll::DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Read filter on the admin page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Read,
    Unread,
}

impl StatusFilter {
    pub fn parse(value: &str) -> Self {
        match value {
            "read" => StatusFilter::Read,
            "unread" => StatusFilter::Unread,
            _ => StatusFilter::All,
        }
    }

    pub fn matches(&self, notification: &Notification) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Read => notification.read,
            StatusFilter::Unread => !notification.read,
        }
    }
}

/// Progress of the most recent fetch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

/// Everything a panel remembers between renders
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelState {
    pub notifications: Vec<Notification>,
    /// Total as reported by the server
    pub total: usize,
    pub load: LoadState,
    /// Current admin page, 1-based
    pub page: usize,
    pub status_filter: StatusFilter,
    pub search: String,
    /// Resident dropdown showing every row
    pub expanded: bool,
    pub dropdown_open: bool,
}

impl PanelState {
    fn new() -> Self {
        Self {
            page: 1,
            ..Self::default()
        }
    }

    pub fn find(&self, id: &str) -> Option<&Notification> {
        self.notifications.iter().find(|n| n.id == id)
    }

    pub fn unread_count(&self) -> usize {
        crate::model::unread_count(&self.notifications)
    }

    fn set_read(&mut self, id: &str, read: bool) {
        if let Some(notification) = self.notifications.iter_mut().find(|n| n.id == id) {
            notification.read = read;
        }
    }
}

/// Part of a row that was clicked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Item,
    /// The row's "view report" link, which never marks as read
    ReportLink,
}

/// Result of clicking a row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClickOutcome {
    /// Read flag the server accepted, `None` when nothing was sent or it failed
    pub marked: Option<bool>,
    pub navigate: Option<Page>,
}

/// Transient message shown after a bulk action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub text: &'static str,
    pub success: bool,
    pub duration: Duration,
}

impl Toast {
    fn new(text: &'static str, success: bool) -> Self {
        Self {
            text,
            success,
            duration: TOAST_DURATION,
        }
    }
}

/// A notification view bound to one feed
///
/// Clones share the same state, so a poll task and the caller see each
/// other's updates. The lock is only held between awaits.
#[derive(Debug, Clone)]
pub struct NotificationPanel {
    kind: PanelKind,
    api: NotificationsApi,
    config: PanelConfig,
    state: Arc<Mutex<PanelState>>,
}

impl NotificationPanel {
    /// Build a panel, refusing admin views without an admin session
    pub fn new(kind: PanelKind, api: ApiClient, config: PanelConfig) -> Result<Self> {
        if kind.requires_admin() && !api.sessions().is_admin() {
            warn!("{:?} requires an admin session", kind);
            return Err(NotificationError::Unauthorized {
                redirect: Page::Login,
            });
        }

        Ok(Self {
            kind,
            api: NotificationsApi::new(api, kind.feed()),
            config,
            state: Arc::new(Mutex::new(PanelState::new())),
        })
    }

    pub fn kind(&self) -> PanelKind {
        self.kind
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    fn lock(&self) -> MutexGuard<'_, PanelState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> PanelState {
        self.lock().clone()
    }

    pub fn unread_count(&self) -> usize {
        self.lock().unread_count()
    }

    pub fn render(&self, now: DateTime<Utc>) -> PanelView {
        render::render(self.kind, &self.lock(), &self.config, now)
    }

    /// Fetch the feed and replace the cache
    ///
    /// A failed fetch keeps the previous cache.
    pub async fn refresh(&self) -> Result<()> {
        let limit = self.kind.fetch_limit(&self.config);
        self.lock().load = LoadState::Loading;

        match self.api.list(limit).await {
            Ok(page) => {
                debug!(
                    "Fetched {} notifications ({} unread)",
                    page.items.len(),
                    page.unread_count()
                );
                let mut state = self.lock();
                state.total = page.total;
                state.notifications = page.items;
                state.load = LoadState::Loaded;
                Ok(())
            }
            Err(err) => {
                error!("Error fetching notifications: {}", err);
                self.lock().load = LoadState::Failed(err.to_string());
                Err(err)
            }
        }
    }

    /// Handle a click on the row with `id`
    ///
    /// The admin page toggles the read flag; the bells always mark as read.
    /// The cache only changes once the server has accepted the update.
    pub async fn click_item(&self, id: &str, target: ClickTarget) -> ClickOutcome {
        let (was_read, report_id) = self
            .lock()
            .find(id)
            .map(|n| (n.read, n.report_id.clone()))
            .unwrap_or((false, None));

        if target == ClickTarget::ReportLink {
            return ClickOutcome {
                marked: None,
                navigate: report_id.map(|r| self.kind.report_page(&r)),
            };
        }

        let read = match self.kind {
            PanelKind::AdminPage => !was_read,
            PanelKind::AdminBell | PanelKind::UserDropdown => true,
        };

        let marked = match self.api.set_read(id, read).await {
            Ok(()) => {
                self.lock().set_read(id, read);
                Some(read)
            }
            Err(err) => {
                error!("Error updating notification {}: {}", id, err);
                None
            }
        };

        if self.kind != PanelKind::UserDropdown {
            return ClickOutcome {
                marked,
                navigate: None,
            };
        }

        self.lock().dropdown_open = false;
        if let Err(err) = self.refresh().await {
            debug!("Refresh after click failed: {}", err);
        }

        ClickOutcome {
            marked,
            navigate: report_id.map(|r| self.kind.report_page(&r)),
        }
    }

    /// Mark every admin notification read, then reload
    ///
    /// The toast reflects the bulk update only; a failed reload is logged and
    /// left to the next poll.
    pub async fn mark_all_read(&self) -> Toast {
        if let Err(err) = self.api.mark_all_read().await {
            error!("Error marking all as read: {}", err);
            return Toast::new(MARK_ALL_FAILED_TOAST, false);
        }

        if let Err(err) = self.refresh().await {
            warn!("Reload after marking all as read failed: {}", err);
        }
        Toast::new(ALL_MARKED_TOAST, true)
    }

    pub fn set_status_filter(&self, filter: StatusFilter) {
        let mut state = self.lock();
        state.status_filter = filter;
        state.page = 1;
    }

    pub fn set_search(&self, query: &str) {
        let mut state = self.lock();
        state.search = query.to_string();
        state.page = 1;
    }

    /// Jump to `page`, clamped to the filtered page count
    pub fn go_to_page(&self, page: usize) -> usize {
        let mut state = self.lock();
        let rows = render::filtered(&state).len();
        let last = pagination::page_count(rows, self.config.page_size).max(1);
        state.page = page.clamp(1, last);
        state.page
    }

    /// Open or close a bell; opening reloads it
    pub async fn toggle_dropdown(&self) -> Result<bool> {
        let open = {
            let mut state = self.lock();
            state.dropdown_open = !state.dropdown_open;
            state.dropdown_open
        };
        if open {
            self.refresh().await?;
        }
        Ok(open)
    }

    /// Close a bell, as a click outside it does
    pub fn hide_dropdown(&self) {
        self.lock().dropdown_open = false;
    }

    /// Flip the resident dropdown between its preview and the full list
    pub async fn toggle_expanded(&self) -> Result<bool> {
        let needs_fetch = {
            let state = self.lock();
            !state.expanded && state.notifications.is_empty()
        };
        if needs_fetch {
            self.refresh().await?;
        }

        let mut state = self.lock();
        state.expanded = !state.expanded;
        Ok(state.expanded)
    }

    /// Poll the feed every `poll_interval` until the handle is dropped
    pub fn start_polling(&self) -> PollHandle {
        poll::spawn(self.clone(), self.config.poll_interval)
    }
}
