use std::env;

use anyhow::{bail, Context};
use citywatch_auth::{Credentials, LoginOutcome};
use citywatch_client::{config::ClientOptions, CityWatch};
use citywatch_core::Role;
use dotenv::dotenv;
use log::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    pretty_env_logger::init();

    let options = ClientOptions::from_env()?;
    let citywatch = CityWatch::new_with_options(options)?;

    let email = env::var("CITYWATCH_EMAIL").context("CITYWATCH_EMAIL must be set")?;
    let password = env::var("CITYWATCH_PASSWORD").context("CITYWATCH_PASSWORD must be set")?;

    match citywatch.auth().login(&Credentials::new(email, password)).await? {
        LoginOutcome::SignedIn { session, redirect } => {
            info!("Signed in as {} ({})", session.user.email, session.user.role);
            println!("Would redirect to {}", redirect);
        }
        LoginOutcome::NeedsVerification { email, .. } => {
            bail!("{} has not verified their email yet", email);
        }
    }

    let panel = match citywatch.sessions().role() {
        Some(Role::Admin) => citywatch.notification_bell()?,
        _ => citywatch.user_notifications()?,
    };
    let _poll = panel.start_polling();
    let mut ticker = tokio::time::interval(citywatch.options().poll_interval);

    println!("Watching notifications, press Ctrl-C to stop");
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let view = panel.render(chrono::Utc::now());
                println!("\n[{} unread]", view.badge.label);
                if let Some(empty) = view.empty_text {
                    println!("  {}", empty);
                }
                for item in &view.items {
                    let marker = if item.unread { "*" } else { " " };
                    println!("{} {} {} ({})", marker, item.avatar, item.message, item.time);
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    citywatch.auth().logout()?;
    Ok(())
}
