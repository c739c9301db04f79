use std::sync::Arc;

use chrono::Utc;
use kalsa_core::{SlotApi, TeamConfig, LOCAL_TZ, check};
use teloxide::{prelude::*, utils::command::BotCommands};
use tracing::error;

use crate::{App, jobs::Toggle};

const START_TEXT: &str = "Hei! Olen KalsaBot ja haen tietoja Kalsan kotiluolasta Hakiksesta!";
const CHECK_FAILED_TEXT: &str = "Vuorojen tarkistus epäonnistui, yritä myöhemmin uudelleen.";

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "Nämä komennot ovat käytössä:")]
pub enum Command {
    #[command(description = "esittäytyminen.")]
    Start,
    #[command(description = "tarkista Hakiksen seuraava vuoro.")]
    Hakis,
    #[command(description = "tarkista Delsun seuraava vuoro.")]
    Delsu,
    #[command(description = "kytke viikoittainen muistutus päälle, esim. /remind hakis.")]
    Remind(String),
    #[command(description = "kytke viikoittainen muistutus pois, esim. /unremind hakis.")]
    Unremind(String),
}

pub async fn handle(bot: Bot, msg: Message, cmd: Command, app: Arc<App>) -> ResponseResult<()> {
    let chat = msg.chat.id;

    let text = match cmd {
        Command::Start => START_TEXT.to_string(),
        Command::Hakis => check_named_team(&app, "hakis").await,
        Command::Delsu => check_named_team(&app, "delsu").await,
        Command::Remind(team) => enable_reminder(&bot, &app, chat, team.trim()),
        Command::Unremind(team) => disable_reminder(&app, team.trim()),
    };

    bot.send_message(chat, text).await?;
    Ok(())
}

/// One availability check for a team, rendered for the end user.
///
/// Shared by the command handlers and the recurring jobs so both paths run
/// the exact same decision logic. Transport/parse failures become a generic
/// notice; the detail goes to the log only.
pub async fn run_team_check(api: &dyn SlotApi, team: &TeamConfig) -> String {
    let today = Utc::now().with_timezone(&LOCAL_TZ).date_naive();

    let query = match team.query_on(today) {
        Ok(query) => query,
        Err(err) => {
            error!("{}: building query failed: {err}", team.label);
            return CHECK_FAILED_TEXT.to_string();
        }
    };

    match check(api, &query).await {
        Ok(result) => result.message(),
        Err(err) => {
            error!("{}: availability check failed: {err}", team.label);
            CHECK_FAILED_TEXT.to_string()
        }
    }
}

async fn check_named_team(app: &App, name: &str) -> String {
    match app.table.get(name) {
        Some(team) => run_team_check(&app.api, team).await,
        None => unknown_team_text(app, name),
    }
}

fn enable_reminder(bot: &Bot, app: &App, chat: ChatId, name: &str) -> String {
    let Some(team) = app.table.get(name) else {
        return unknown_team_text(app, name);
    };

    match app
        .jobs
        .enable(name, team, chat, bot.clone(), app.api.clone())
    {
        Ok(Toggle::Enabled { fires }) => format!(
            "Muistutus päällä: {} tarkistetaan viikoittain, seuraavan kerran {}.",
            team.label,
            fires.format("%Y-%m-%d klo %H:%M"),
        ),
        Ok(_) => format!("Muistutus on jo päällä vuorolle {}.", team.label),
        Err(err) => {
            error!("{}: enabling reminder failed: {err}", team.label);
            CHECK_FAILED_TEXT.to_string()
        }
    }
}

fn disable_reminder(app: &App, name: &str) -> String {
    let Some(team) = app.table.get(name) else {
        return unknown_team_text(app, name);
    };

    match app.jobs.disable(name) {
        Toggle::Disabled => format!("Muistutus poistettu vuorolta {}.", team.label),
        _ => format!("Muistutusta ei ole päällä vuorolle {}.", team.label),
    }
}

fn unknown_team_text(app: &App, name: &str) -> String {
    let known: Vec<&str> = app.table.names().collect();
    if name.is_empty() {
        format!("Anna joukkueen nimi, esim. /remind {}.", known.join(" tai /remind "))
    } else {
        format!("Tuntematon joukkue \"{name}\". Käytössä: {}.", known.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_parsing_covers_the_whole_surface() {
        let bot_name = "KalsaBot";

        assert_eq!(Command::parse("/start", bot_name).unwrap(), Command::Start);
        assert_eq!(Command::parse("/hakis", bot_name).unwrap(), Command::Hakis);
        assert_eq!(Command::parse("/delsu", bot_name).unwrap(), Command::Delsu);
        assert_eq!(
            Command::parse("/remind hakis", bot_name).unwrap(),
            Command::Remind("hakis".to_string())
        );
        assert_eq!(
            Command::parse("/unremind delsu", bot_name).unwrap(),
            Command::Unremind("delsu".to_string())
        );
    }

    #[test]
    fn unrelated_text_is_not_a_command() {
        assert!(Command::parse("moro", "KalsaBot").is_err());
    }
}
