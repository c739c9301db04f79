//! Telegram front end for the Kalsa court-availability bot.
//!
//! This crate focuses on:
//! - Command handling (/start, /hakis, /delsu, /remind, /unremind)
//! - Recurring weekly reminder jobs
//! - Environment configuration and log output

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use kalsa_core::{Avoinna24Client, TeamTable};
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod jobs;
mod settings;

use jobs::JobRegistry;
use settings::Settings;

/// Shared dispatcher state; every handler gets the same client, table and
/// job registry.
pub struct App {
    pub api: Avoinna24Client,
    pub table: TeamTable,
    pub jobs: JobRegistry,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let settings = Settings::from_env()?;
    init_logging(&settings.logfile_path)?;

    let table = load_team_table(&settings)?;
    info!(
        "starting KalsaBot, monitoring: {}",
        table.names().collect::<Vec<_>>().join(", ")
    );

    let app = Arc::new(App {
        api: Avoinna24Client::new().context("Failed to build booking API client")?,
        table,
        jobs: JobRegistry::new(),
    });

    let bot = Bot::new(settings.bot_token);
    let handler = Update::filter_message()
        .filter_command::<commands::Command>()
        .endpoint(commands::handle);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![app])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}

fn load_team_table(settings: &Settings) -> Result<TeamTable> {
    match &settings.team_table_path {
        Some(path) => {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read team table: {}", path.display()))?;
            TeamTable::from_toml_str(&contents)
        }
        None => Ok(TeamTable::builtin()),
    }
}

fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}
