use crate::domain::entities::WeekendPolicy;
use chrono::NaiveDate;

/// Counts the business days in the inclusive range `[start, end]`.
///
/// With weekend exclusion disabled this is the plain calendar span. Otherwise
/// every day whose weekday index appears in `policy.excluded_days` is skipped,
/// so a single excluded day yields zero. A reversed range yields zero.
pub fn compute_business_days(start: NaiveDate, end: NaiveDate, policy: &WeekendPolicy) -> i64 {
    if end < start {
        return 0;
    }

    if !policy.exclude_weekends {
        return (end - start).num_days() + 1;
    }

    start
        .iter_days()
        .take_while(|day| *day <= end)
        .filter(|day| !policy.is_excluded(*day))
        .count() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_without_exclusion_counts_calendar_span() {
        let policy = WeekendPolicy::including_all_days();
        assert_eq!(compute_business_days(date(2024, 1, 15), date(2024, 1, 21), &policy), 7);
        assert_eq!(compute_business_days(date(2024, 1, 20), date(2024, 1, 20), &policy), 1);
        // Leap day inside the span
        assert_eq!(compute_business_days(date(2024, 2, 27), date(2024, 3, 1), &policy), 4);
    }

    #[test]
    fn test_span_matches_inclusive_days_for_many_ranges() {
        let policy = WeekendPolicy::including_all_days();
        let start = date(2023, 12, 25);
        for len in 0..60 {
            let end = start + chrono::Duration::days(len);
            assert_eq!(compute_business_days(start, end, &policy), len + 1);
        }
    }

    #[test]
    fn test_monday_to_friday_is_five() {
        let policy = WeekendPolicy::default();
        assert_eq!(compute_business_days(date(2024, 1, 15), date(2024, 1, 19), &policy), 5);
    }

    #[test]
    fn test_monday_to_sunday_is_five() {
        let policy = WeekendPolicy::default();
        assert_eq!(compute_business_days(date(2024, 1, 15), date(2024, 1, 21), &policy), 5);
    }

    #[test]
    fn test_weekend_only_range_is_zero() {
        let policy = WeekendPolicy::default();
        assert_eq!(compute_business_days(date(2024, 1, 20), date(2024, 1, 21), &policy), 0);
        assert_eq!(compute_business_days(date(2024, 1, 20), date(2024, 1, 20), &policy), 0);
    }

    #[test]
    fn test_friday_saturday_weekend() {
        let policy = WeekendPolicy::excluding([5, 6]);
        // Sun 2024-01-14 .. Sat 2024-01-20: Friday and Saturday dropped
        assert_eq!(compute_business_days(date(2024, 1, 14), date(2024, 1, 20), &policy), 5);
        // Sunday is a working day under this convention
        assert_eq!(compute_business_days(date(2024, 1, 21), date(2024, 1, 21), &policy), 1);
    }

    #[test]
    fn test_enabled_with_empty_set_counts_every_day() {
        let policy = WeekendPolicy::excluding([]);
        assert_eq!(compute_business_days(date(2024, 1, 15), date(2024, 1, 28), &policy), 14);
    }

    #[test]
    fn test_reversed_range_is_never_negative() {
        let policy = WeekendPolicy::including_all_days();
        assert_eq!(compute_business_days(date(2024, 1, 19), date(2024, 1, 15), &policy), 0);
    }
}
