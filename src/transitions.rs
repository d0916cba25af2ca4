//! Cosmetic fade between pages
//!
//! Only links into the current origin are faded; everything else navigates
//! straight away.

use std::time::Duration;

use log::debug;
use tokio::time;

/// How long content fades before navigating
pub const FADE_DURATION: Duration = Duration::from_millis(300);

/// Animation delay added per list child
pub const STAGGER_STEP: Duration = Duration::from_millis(100);

/// Whether a click on `href` gets the fade
pub fn should_intercept(href: &str, origin: &str) -> bool {
    !href.is_empty() && !origin.is_empty() && href.starts_with(origin)
}

/// Animation delays for `count` list children, `STAGGER_STEP` apart
pub fn stagger_delays(count: usize) -> Vec<Duration> {
    (0..count as u32).map(|i| STAGGER_STEP * i).collect()
}

/// What happened to a link click
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Faded out, then navigated to the URL
    Faded(String),
    /// Left to the default behavior
    Passthrough,
}

/// Fades same-origin navigations
#[derive(Debug, Clone)]
pub struct PageTransitions {
    origin: String,
    fade: Duration,
}

impl PageTransitions {
    pub fn new(origin: &str) -> Self {
        Self {
            origin: origin.trim_end_matches('/').to_string(),
            fade: FADE_DURATION,
        }
    }

    pub fn with_fade(mut self, fade: Duration) -> Self {
        self.fade = fade;
        self
    }

    /// Handle a click on a link to `href`
    pub async fn follow(&self, href: &str) -> Navigation {
        if !should_intercept(href, &self.origin) {
            return Navigation::Passthrough;
        }

        debug!("Fading out before navigating to {}", href);
        time::sleep(self.fade).await;
        Navigation::Faded(href.to_string())
    }
}
