use std::env;
use std::io::{self, BufRead, Write};

use anyhow::Context;
use async_trait::async_trait;
use citywatch_client::{config::ClientOptions, CityWatch};
use citywatch_core::Page;
use citywatch_reports::{Attachment, Category, FormView, ReporterPrompt};
use dotenv::dotenv;

/// Asks on the terminal; an empty line or EOF skips the question
struct StdinPrompt;

#[async_trait]
impl ReporterPrompt for StdinPrompt {
    async fn ask(&self, question: &str) -> Option<String> {
        let question = question.to_string();
        tokio::task::spawn_blocking(move || {
            print!("{} ", question);
            io::stdout().flush().ok()?;
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line).ok()?;
            Some(line.trim().to_string()).filter(|l| !l.is_empty())
        })
        .await
        .ok()
        .flatten()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    pretty_env_logger::init();

    let citywatch = CityWatch::new_with_options(ClientOptions::from_env()?)?;

    let photo_path = env::var("REPORT_PHOTO").context("REPORT_PHOTO must point at an image")?;
    let mut form = citywatch.report_form();
    form.draft.title = env::var("REPORT_TITLE").unwrap_or_default();
    form.draft.description = env::var("REPORT_DESCRIPTION")
        .unwrap_or_else(|_| "Reported from the command line".to_string());
    form.draft.category = env::var("REPORT_CATEGORY")
        .ok()
        .and_then(|c| Category::parse(&c));
    form.draft.location = env::var("REPORT_LOCATION").unwrap_or_default();
    form.draft.location_other = env::var("REPORT_LOCATION_OTHER").unwrap_or_default();
    form.draft.photo = Some(Attachment::from_path(&photo_path).await?);

    let result = form.submit(&citywatch.reports(), &StdinPrompt).await;
    if let Some(status) = form.status() {
        println!("{}", status.text);
    }

    let submission = result?;
    if let FormView::Success { reference } = form.view() {
        let track = Page::Track {
            report_id: Some(reference.clone()),
        };
        println!("Track it at {}", track);
    }
    if submission.anonymous {
        println!("Submitted anonymously");
    }
    Ok(())
}
