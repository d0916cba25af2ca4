//! Optional reporter details for anonymous submissions

use async_trait::async_trait;

pub const NAME_QUESTION: &str = "Your name (optional):";
pub const EMAIL_QUESTION: &str = "Your email (optional):";

/// Name and email an anonymous reporter chose to leave
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReporterInfo {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl ReporterInfo {
    pub fn new(name: Option<&str>, email: Option<&str>) -> Self {
        let keep = |v: Option<&str>| {
            v.map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        Self {
            name: keep(name),
            email: keep(email),
        }
    }
}

/// Asks the person at the keyboard a question and waits for the answer
///
/// `None` means the question was dismissed.
#[async_trait]
pub trait ReporterPrompt: Send + Sync {
    async fn ask(&self, question: &str) -> Option<String>;
}

/// Dismisses every question
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPrompt;

#[async_trait]
impl ReporterPrompt for NoPrompt {
    async fn ask(&self, _question: &str) -> Option<String> {
        None
    }
}

/// Answers from details known up front
#[derive(Debug, Clone, Default)]
pub struct FixedReporter(pub ReporterInfo);

#[async_trait]
impl ReporterPrompt for FixedReporter {
    async fn ask(&self, question: &str) -> Option<String> {
        match question {
            NAME_QUESTION => self.0.name.clone(),
            EMAIL_QUESTION => self.0.email.clone(),
            _ => None,
        }
    }
}

/// Ask for the optional name, then the optional email
pub async fn collect(prompt: &dyn ReporterPrompt) -> ReporterInfo {
    let name = prompt.ask(NAME_QUESTION).await;
    let email = prompt.ask(EMAIL_QUESTION).await;
    ReporterInfo::new(name.as_deref(), email.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_answers_are_dropped() {
        let info = tokio_test::block_on(collect(&FixedReporter(ReporterInfo {
            name: Some("  ".to_string()),
            email: Some(" sam@example.org ".to_string()),
        })));
        assert_eq!(info.name, None);
        assert_eq!(info.email.as_deref(), Some("sam@example.org"));

        let nothing = tokio_test::block_on(collect(&NoPrompt));
        assert_eq!(nothing, ReporterInfo::default());
    }
}
