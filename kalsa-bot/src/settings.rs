use anyhow::{Context, Result};
use std::{env, path::PathBuf};

/// Process configuration, read from the environment after `dotenv`.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Telegram bot credential.
    pub bot_token: String,
    /// Destination file for diagnostic log lines. Rotation and retention are
    /// handled outside the process.
    pub logfile_path: PathBuf,
    /// Optional TOML file replacing the builtin team table.
    pub team_table_path: Option<PathBuf>,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let bot_token = env::var("TELOXIDE_TOKEN")
            .context("TELOXIDE_TOKEN must be set (Telegram bot credential)")?;

        let logfile_path = env::var("LOGFILE_PATH")
            .context("LOGFILE_PATH must be set (log destination)")?
            .into();

        let team_table_path = env::var("TEAM_TABLE_PATH").ok().map(PathBuf::from);

        Ok(Self {
            bot_token,
            logfile_path,
            team_table_path,
        })
    }
}
