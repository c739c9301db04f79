use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// All date and hour comparisons happen in the facility's timezone, never in
/// the API's implicit UTC.
pub const LOCAL_TZ: Tz = chrono_tz::Europe::Helsinki;

/// One availability check, fully specified: which court, which day, which hour.
#[derive(Debug, Clone)]
pub struct FacilityQuery {
    pub branch_id: String,
    pub group_id: String,
    pub product_id: String,
    pub user_id: String,
    pub multibooking: bool,
    /// Calendar date of the slot, in facility-local time.
    pub date: NaiveDate,
    /// Hour-of-day (0-23) at which the wanted slot ends, facility-local.
    pub hour: u32,
    /// Display name used in messages and logs, e.g. "Hakis".
    pub label: String,
}

/// One entry from the booking API's `data` array. Everything except the end
/// instant is dropped at parse time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotRecord {
    pub end_time: DateTime<Utc>,
}

/// Outcome of a single availability check.
///
/// `NoData` is a successful outcome distinct from `Unavailable`: the API has
/// not published any slots for that date yet, so nothing can be said about
/// the slot being taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    Available {
        label: String,
        date: NaiveDate,
        hour: u32,
    },
    Unavailable {
        label: String,
        date: NaiveDate,
        hour: u32,
    },
    NoData {
        label: String,
        date: NaiveDate,
    },
}

impl Availability {
    /// User-facing message text. Formatting is kept separate from the
    /// decision so both stay independently testable.
    pub fn message(&self) -> String {
        match self {
            Availability::Available { label, date, hour } => format!(
                "{label}: Päivälle {date} on vapaana vuoro joka loppuu tunnilla {hour}"
            ),
            Availability::Unavailable { label, date, hour } => format!(
                "{label}: Päivälle {date} EI OLE vapaata vuoroa joka loppuu tunnilla {hour}"
            ),
            Availability::NoData { label, date } => format!(
                "{label}: Päivän {date} vuorot eivät ole vielä varattavissa, dataa ei löytynyt"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, 24).unwrap()
    }

    #[test]
    fn available_message_mentions_date_and_hour() {
        let msg = Availability::Available {
            label: "Hakis".into(),
            date: date(),
            hour: 18,
        }
        .message();

        assert_eq!(
            msg,
            "Hakis: Päivälle 2024-04-24 on vapaana vuoro joka loppuu tunnilla 18"
        );
    }

    #[test]
    fn unavailable_and_no_data_messages_stay_distinct() {
        let unavailable = Availability::Unavailable {
            label: "Delsu".into(),
            date: date(),
            hour: 19,
        }
        .message();
        let no_data = Availability::NoData {
            label: "Delsu".into(),
            date: date(),
        }
        .message();

        assert!(unavailable.contains("EI OLE vapaata vuoroa"));
        assert!(no_data.contains("dataa ei löytynyt"));
        assert_ne!(unavailable, no_data);
    }
}
