//! Pages the client navigates to after an action completes

use std::fmt;

use crate::session::Role;

/// A navigation target within the CityWatch site
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Login,
    AdminDashboard,
    UserHome,
    VerifyEmail { email: String },
    Track { report_id: Option<String> },
    AdminReports { open_report: String },
    AdminNotifications,
}

impl Page {
    /// Where a freshly signed-in account lands
    pub fn landing_for(role: Role) -> Self {
        match role {
            Role::Admin => Page::AdminDashboard,
            Role::User => Page::UserHome,
        }
    }

    /// Relative URL of the page, query string included
    pub fn path(&self) -> String {
        match self {
            Page::Login => "CityWatch-Login-New.html".to_string(),
            Page::AdminDashboard => "CityWatch-Admin-Dashboard.html".to_string(),
            Page::UserHome => "CityWatch-User-Home.html".to_string(),
            Page::VerifyEmail { email } => format!(
                "CityWatch-Verify-Email.html?email={}",
                urlencoding::encode(email)
            ),
            Page::Track { report_id: None } => "CityWatch-Track.html".to_string(),
            Page::Track {
                report_id: Some(id),
            } => format!("CityWatch-Track.html?id={}", urlencoding::encode(id)),
            Page::AdminReports { open_report } => format!(
                "CityWatch-Admin-Reports.html?openReport={}",
                urlencoding::encode(open_report)
            ),
            Page::AdminNotifications => "CityWatch-Admin-Notification.html".to_string(),
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landing_by_role() {
        assert_eq!(Page::landing_for(Role::Admin).path(), "CityWatch-Admin-Dashboard.html");
        assert_eq!(Page::landing_for(Role::User).path(), "CityWatch-User-Home.html");
    }

    #[test]
    fn test_query_values_are_encoded() {
        let page = Page::VerifyEmail {
            email: "jane+test@example.org".to_string(),
        };
        assert_eq!(
            page.path(),
            "CityWatch-Verify-Email.html?email=jane%2Btest%40example.org"
        );

        let page = Page::Track {
            report_id: Some("CW 12/3".to_string()),
        };
        assert_eq!(page.to_string(), "CityWatch-Track.html?id=CW%2012%2F3");
    }
}
