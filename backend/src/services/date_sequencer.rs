use chrono::NaiveDate;

/// Consecutive calendar days after `last_observed`, one per forecast step.
///
/// Weekends and exchange holidays are not skipped. The sequence stops early
/// only at the end of chrono's representable range.
pub fn label_dates(last_observed: NaiveDate, count: usize) -> Vec<NaiveDate> {
    last_observed.iter_days().skip(1).take(count).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_the_day_after() {
        let last = NaiveDate::from_ymd_opt(2024, 12, 30).unwrap();
        let dates = label_dates(last, 3);

        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
                NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
            ]
        );
    }

    #[test]
    fn test_crosses_leap_day_and_weekends() {
        // Friday before a leap-year weekend
        let last = NaiveDate::from_ymd_opt(2024, 2, 23).unwrap();
        let dates = label_dates(last, 30);

        assert_eq!(dates.len(), 30);
        assert!(dates.contains(&NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()));
        assert!(dates.windows(2).all(|w| w[1] == w[0].succ_opt().unwrap()));
    }

    #[test]
    fn test_zero_count() {
        let last = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(label_dates(last, 0).is_empty());
    }
}
