use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{Context, Result, ensure};
use chrono::{DateTime, Days, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use kalsa_core::{Avoinna24Client, TeamConfig, LOCAL_TZ, next_occurrence};
use teloxide::prelude::*;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::commands::run_team_check;

/// Reminders fire on the morning of the slot's own weekday, facility-local,
/// so the message covers that evening's slot.
const REMINDER_HOUR: u32 = 10;

/// Recurring weekly checks, at most one per logical team name.
#[derive(Debug, Default)]
pub struct JobRegistry {
    jobs: Mutex<HashMap<String, Job>>,
}

#[derive(Debug)]
struct Job {
    handle: JoinHandle<()>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Toggle {
    Enabled { fires: DateTime<Tz> },
    AlreadyEnabled,
    Disabled,
    NotActive,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the weekly job for `name`, posting results to `chat`.
    ///
    /// A no-op when a job with that name is already running, whichever chat
    /// enabled it.
    pub fn enable(
        &self,
        name: &str,
        team: &TeamConfig,
        chat: ChatId,
        bot: Bot,
        api: Avoinna24Client,
    ) -> Result<Toggle> {
        let mut jobs = self.jobs.lock().expect("job registry lock poisoned");

        if let Some(job) = jobs.get(name) {
            if job.handle.is_finished() {
                // The task bailed out on its own; forget it and start anew.
                jobs.remove(name);
            } else {
                return Ok(Toggle::AlreadyEnabled);
            }
        }

        let now = Utc::now().with_timezone(&LOCAL_TZ);
        let fires = next_fire(now, team.weekday, REMINDER_HOUR)?;

        info!(
            "{}: weekly reminder enabled for chat {chat}, first run {fires}",
            team.label
        );

        let handle = tokio::spawn(run_job(bot, chat, team.clone(), api));
        jobs.insert(name.to_string(), Job { handle });

        Ok(Toggle::Enabled { fires })
    }

    /// Stop the weekly job for `name`, if one is running.
    pub fn disable(&self, name: &str) -> Toggle {
        let mut jobs = self.jobs.lock().expect("job registry lock poisoned");

        match jobs.remove(name) {
            Some(job) if !job.handle.is_finished() => {
                job.handle.abort();
                info!("{name}: weekly reminder disabled");
                Toggle::Disabled
            }
            _ => Toggle::NotActive,
        }
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.jobs
            .lock()
            .expect("job registry lock poisoned")
            .get(name)
            .is_some_and(|job| !job.handle.is_finished())
    }
}

async fn run_job(bot: Bot, chat: ChatId, team: TeamConfig, api: Avoinna24Client) {
    loop {
        let now = Utc::now().with_timezone(&LOCAL_TZ);
        let fire = match next_fire(now, team.weekday, REMINDER_HOUR) {
            Ok(fire) => fire,
            Err(err) => {
                warn!("{}: stopping weekly reminder: {err}", team.label);
                return;
            }
        };

        let wait = (fire - now).to_std().unwrap_or_default();
        tokio::time::sleep(wait).await;

        let text = run_team_check(&api, &team).await;
        if let Err(err) = bot.send_message(chat, text).await {
            warn!("{}: sending reminder to chat {chat} failed: {err}", team.label);
        }
    }
}

/// Next instant, strictly after `now`, falling on `weekday` at `hour:00`
/// facility-local. At most seven days ahead.
pub fn next_fire(now: DateTime<Tz>, weekday: u8, hour: u32) -> Result<DateTime<Tz>> {
    ensure!(hour < 24, "reminder hour out of range: {hour}");
    let time = NaiveTime::from_hms_opt(hour, 0, 0).context("invalid reminder time")?;

    let mut date = next_occurrence(now.date_naive(), weekday)?;
    loop {
        let candidate = LOCAL_TZ
            .from_local_datetime(&date.and_time(time))
            .earliest()
            .context("reminder time does not exist on that date")?;

        if candidate > now {
            return Ok(candidate);
        }
        // Today at or past the fire time already; take next week's.
        date = date
            .checked_add_days(Days::new(7))
            .context("date overflow")?;
    }
}
