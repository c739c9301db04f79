use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{error::SlotError, model::FacilityQuery, weekday::next_occurrence};

/// Monitored slot for one team: the facility identifier bundle plus the
/// weekly slot it books. Turned into a concrete [`FacilityQuery`] per check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamConfig {
    /// Display name used in messages and logs.
    pub label: String,
    pub branch_id: String,
    pub group_id: String,
    pub product_id: String,
    /// Selects the court within the hall.
    pub user_id: String,
    #[serde(default)]
    pub multibooking: bool,
    /// ISO weekday of the recurring slot, 1 = Monday .. 7 = Sunday.
    pub weekday: u8,
    /// Hour-of-day (facility-local) at which the wanted slot ends.
    pub hour: u32,
}

impl TeamConfig {
    /// Resolve the next slot date from `today` and build the query for it.
    ///
    /// Rejects a table entry with an out-of-range weekday or hour before any
    /// request is built.
    pub fn query_on(&self, today: NaiveDate) -> Result<FacilityQuery, SlotError> {
        if self.hour > 23 {
            return Err(SlotError::InvalidHour(self.hour));
        }
        let date = next_occurrence(today, self.weekday)?;
        Ok(FacilityQuery {
            branch_id: self.branch_id.clone(),
            group_id: self.group_id.clone(),
            product_id: self.product_id.clone(),
            user_id: self.user_id.clone(),
            multibooking: self.multibooking,
            date,
            hour: self.hour,
            label: self.label.clone(),
        })
    }
}

/// Map from command/team name to its monitored slot.
///
/// Example TOML:
/// [teams.hakis]
/// label = "Hakis"
/// branch_id = "..."
/// ...
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TeamTable {
    pub teams: BTreeMap<String, TeamConfig>,
}

const ARENA_BRANCH_ID: &str = "2b325906-5b7a-11e9-8370-fa163e3c66dd";
const ARENA_GROUP_ID: &str = "a17ccc08-838a-11e9-8fd9-fa163e3c66dd";
const BADMINTON_PRODUCT_ID: &str = "59305e30-8b49-11e9-800b-fa163e3c66dd";
const COURT_2_USER_ID: &str = "d7c92d04-807b-11e9-b480-fa163e3c66dd";
const COURT_3_USER_ID: &str = "ea8b1cf4-807b-11e9-93b7-fa163e3c66dd";

impl TeamTable {
    /// The two production slots at the Hakaniemi arena.
    pub fn builtin() -> Self {
        let mut teams = BTreeMap::new();
        teams.insert(
            "hakis".to_string(),
            TeamConfig {
                label: "Hakis".to_string(),
                branch_id: ARENA_BRANCH_ID.to_string(),
                group_id: ARENA_GROUP_ID.to_string(),
                product_id: BADMINTON_PRODUCT_ID.to_string(),
                user_id: COURT_2_USER_ID.to_string(),
                multibooking: false,
                weekday: 3,
                hour: 18,
            },
        );
        teams.insert(
            "delsu".to_string(),
            TeamConfig {
                label: "Delsu".to_string(),
                branch_id: ARENA_BRANCH_ID.to_string(),
                group_id: ARENA_GROUP_ID.to_string(),
                product_id: BADMINTON_PRODUCT_ID.to_string(),
                user_id: COURT_3_USER_ID.to_string(),
                multibooking: false,
                weekday: 2,
                hour: 19,
            },
        );
        Self { teams }
    }

    /// Parse an operator-supplied table, replacing the builtin one.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Failed to parse team table TOML")
    }

    pub fn get(&self, name: &str) -> Option<&TeamConfig> {
        self.teams.get(name)
    }

    /// Team names in stable order, for help texts.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.teams.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn builtin_table_has_both_production_teams() {
        let table = TeamTable::builtin();

        let hakis = table.get("hakis").expect("hakis must exist");
        assert_eq!(hakis.weekday, 3);
        assert_eq!(hakis.hour, 18);
        assert_eq!(hakis.user_id, COURT_2_USER_ID);

        let delsu = table.get("delsu").expect("delsu must exist");
        assert_eq!(delsu.weekday, 2);
        assert_eq!(delsu.hour, 19);
        assert_eq!(delsu.user_id, COURT_3_USER_ID);

        // Same hall, different court.
        assert_eq!(hakis.branch_id, delsu.branch_id);
        assert_ne!(hakis.user_id, delsu.user_id);
    }

    #[test]
    fn query_on_resolves_the_next_slot_weekday() {
        let table = TeamTable::builtin();
        let hakis = table.get("hakis").unwrap();

        // 2024-04-22 is a Monday; the next Wednesday is the 24th.
        let today = NaiveDate::from_ymd_opt(2024, 4, 22).unwrap();
        let query = hakis.query_on(today).unwrap();

        assert_eq!(query.date, NaiveDate::from_ymd_opt(2024, 4, 24).unwrap());
        assert_eq!(query.date.weekday().number_from_monday(), 3);
        assert_eq!(query.hour, 18);
        assert_eq!(query.label, "Hakis");
        assert!(!query.multibooking);
    }

    #[test]
    fn query_on_rejects_a_bad_weekday() {
        let mut team = TeamTable::builtin().get("hakis").unwrap().clone();
        team.weekday = 8;

        let today = NaiveDate::from_ymd_opt(2024, 4, 22).unwrap();
        let err = team.query_on(today).unwrap_err();
        assert!(matches!(err, SlotError::InvalidWeekday(8)));
    }

    #[test]
    fn query_on_rejects_an_out_of_range_hour() {
        let mut team = TeamTable::builtin().get("hakis").unwrap().clone();
        team.hour = 99;

        let today = NaiveDate::from_ymd_opt(2024, 4, 22).unwrap();
        let err = team.query_on(today).unwrap_err();
        assert!(matches!(err, SlotError::InvalidHour(99)));
    }

    #[test]
    fn toml_round_trip_preserves_the_table() {
        let table = TeamTable::builtin();
        let toml = toml::to_string_pretty(&table).unwrap();
        let parsed = TeamTable::from_toml_str(&toml).unwrap();

        assert_eq!(parsed.teams.len(), table.teams.len());
        assert_eq!(parsed.get("delsu").unwrap().hour, 19);
    }

    #[test]
    fn multibooking_defaults_to_false_in_toml() {
        let toml = r#"
            [teams.hakis]
            label = "Hakis"
            branch_id = "b"
            group_id = "g"
            product_id = "p"
            user_id = "u"
            weekday = 3
            hour = 18
        "#;
        let table = TeamTable::from_toml_str(toml).unwrap();
        assert!(!table.get("hakis").unwrap().multibooking);
    }
}
