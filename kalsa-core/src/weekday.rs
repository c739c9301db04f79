use chrono::{Datelike, Days, NaiveDate};

use crate::error::SlotError;

/// Next date on or after `reference` whose ISO weekday equals
/// `target_weekday` (1 = Monday .. 7 = Sunday).
///
/// Inclusive of the reference date: if `reference` already falls on the
/// target weekday it is returned unchanged. Otherwise the result is at most
/// six days ahead.
pub fn next_occurrence(reference: NaiveDate, target_weekday: u8) -> Result<NaiveDate, SlotError> {
    if !(1..=7).contains(&target_weekday) {
        return Err(SlotError::InvalidWeekday(target_weekday));
    }

    let reference_weekday = reference.weekday().number_from_monday() as u8;
    let offset = (u64::from(target_weekday) + 7 - u64::from(reference_weekday)) % 7;

    Ok(reference + Days::new(offset))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn concrete_cases() {
        // (reference, target weekday, expected)
        let cases = [
            (ymd(2024, 4, 1), 1, ymd(2024, 4, 1)), // Monday, asked Monday
            (ymd(2024, 4, 2), 2, ymd(2024, 4, 2)), // Tuesday, asked Tuesday
            (ymd(2024, 4, 2), 3, ymd(2024, 4, 3)), // Tuesday -> Wednesday
            (ymd(2024, 4, 4), 3, ymd(2024, 4, 10)), // Thursday -> next Wednesday
            (ymd(2024, 4, 6), 5, ymd(2024, 4, 12)), // Saturday -> next Friday
            (ymd(2024, 4, 6), 6, ymd(2024, 4, 6)), // Saturday, asked Saturday
            (ymd(2024, 4, 7), 1, ymd(2024, 4, 8)), // Sunday -> Monday
            (ymd(2024, 4, 8), 7, ymd(2024, 4, 14)), // Monday -> Sunday
        ];

        for (reference, weekday, expected) in cases {
            let got = next_occurrence(reference, weekday).unwrap();
            assert_eq!(got, expected, "reference {reference}, weekday {weekday}");
        }
    }

    #[test]
    fn result_always_matches_target_weekday_within_a_week() {
        let start = ymd(2024, 1, 1);
        for day_offset in 0..30 {
            let reference = start.checked_add_days(Days::new(day_offset)).unwrap();
            for weekday in 1..=7u8 {
                let got = next_occurrence(reference, weekday).unwrap();
                assert_eq!(got.weekday().number_from_monday() as u8, weekday);
                let gap = (got - reference).num_days();
                assert!((0..=6).contains(&gap), "gap {gap} for {reference}/{weekday}");
            }
        }
    }

    #[test]
    fn same_weekday_returns_reference_unchanged() {
        let start = ymd(2024, 4, 1);
        for day_offset in 0..7 {
            let reference = start.checked_add_days(Days::new(day_offset)).unwrap();
            let own = reference.weekday().number_from_monday() as u8;
            assert_eq!(next_occurrence(reference, own).unwrap(), reference);
        }
    }

    #[test]
    fn rejects_out_of_range_weekdays() {
        for weekday in [0u8, 8] {
            let err = next_occurrence(ymd(2024, 4, 1), weekday).unwrap_err();
            assert!(matches!(err, SlotError::InvalidWeekday(w) if w == weekday));
        }
    }
}
