use chrono::Timelike;
use tracing::info;

use crate::{
    error::SlotError,
    model::{Availability, FacilityQuery, SlotRecord, LOCAL_TZ},
    provider::SlotApi,
};

/// Run one availability check: fetch the day's slots and decide.
///
/// Stateless per call; concurrent checks for different queries are safe.
/// Transport and parse failures propagate untouched, retry policy (if any)
/// belongs to the caller.
pub async fn check(api: &dyn SlotApi, query: &FacilityQuery) -> Result<Availability, SlotError> {
    let slots = api.list_slots(query).await?;
    let result = decide(&slots, query);

    match &result {
        Availability::Available { label, date, hour } => {
            info!("{label}: free slot ending at hour {hour} on {date}");
        }
        Availability::Unavailable { label, date, hour } => {
            info!("{label}: no free slot ending at hour {hour} on {date}");
        }
        Availability::NoData { label, date } => {
            info!("{label}: no slot data published for {date} yet");
        }
    }

    Ok(result)
}

/// Pure decision over already-fetched records, in API order.
///
/// A record matches when its end instant, converted to facility-local time,
/// falls on the query's date with the query's hour-of-day. The first match
/// wins and the scan stops.
pub fn decide(slots: &[SlotRecord], query: &FacilityQuery) -> Availability {
    if slots.is_empty() {
        return Availability::NoData {
            label: query.label.clone(),
            date: query.date,
        };
    }

    for slot in slots {
        let local_end = slot.end_time.with_timezone(&LOCAL_TZ);
        if local_end.date_naive() == query.date && local_end.hour() == query.hour {
            return Availability::Available {
                label: query.label.clone(),
                date: query.date,
                hour: query.hour,
            };
        }
    }

    Availability::Unavailable {
        label: query.label.clone(),
        date: query.date,
        hour: query.hour,
    }
}
