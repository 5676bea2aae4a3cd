use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;

/// Longest and current runs of consecutive active days
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StreakResult {
    /// Longest run of consecutive active days
    pub longest: u64,
    /// Run ending on `today`, zero when `today` had no activity
    pub current: u64,
    /// First day of the longest run
    pub longest_start: Option<NaiveDate>,
    /// Last day of the longest run
    pub longest_end: Option<NaiveDate>,
}

/// A run of consecutive days
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub length: u64,
}

/// Longest run in a set of active dates. The earliest run wins ties.
pub fn longest_run(dates: &BTreeSet<NaiveDate>) -> Option<Run> {
    let mut iter = dates.iter().copied();
    let first = iter.next()?;

    let mut longest = Run {
        start: first,
        end: first,
        length: 1,
    };
    let mut run = longest;

    for date in iter {
        if run.end.succ_opt() == Some(date) {
            run.end = date;
            run.length += 1;
            if run.length > longest.length {
                longest = run;
            }
        } else {
            run = Run {
                start: date,
                end: date,
                length: 1,
            };
        }
    }

    Some(longest)
}

/// Number of consecutive active days ending on `today`
pub fn current_run(dates: &BTreeSet<NaiveDate>, today: NaiveDate) -> u64 {
    let mut length = 0;
    let mut cursor = Some(today);

    while let Some(date) = cursor.filter(|d| dates.contains(d)) {
        length += 1;
        cursor = date.pred_opt();
    }

    length
}

/// Compute the streak summary for a set of active dates.
///
/// `today` anchors the current streak; the orchestrator passes the wall-clock
/// date, so analyses of past years report a current streak of zero.
pub fn detect_streaks<I>(dates: I, today: NaiveDate) -> StreakResult
where
    I: IntoIterator<Item = NaiveDate>,
{
    let dates: BTreeSet<NaiveDate> = dates.into_iter().collect();

    match longest_run(&dates) {
        Some(run) => StreakResult {
            longest: run.length,
            current: current_run(&dates, today),
            longest_start: Some(run.start),
            longest_end: Some(run.end),
        },
        None => StreakResult::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::fixtures::date;

    fn days_from(start: NaiveDate, count: i64) -> Vec<NaiveDate> {
        (0..count)
            .map(|i| start + chrono::Duration::days(i))
            .collect()
    }

    #[test]
    fn test_empty_set() {
        let result = detect_streaks(Vec::<NaiveDate>::new(), date(2024, 6, 1));
        assert_eq!(result, StreakResult::default());
        assert_eq!(result.longest, 0);
        assert_eq!(result.current, 0);
        assert!(result.longest_start.is_none());
    }

    #[test]
    fn test_single_ten_day_run() {
        let dates = days_from(date(2024, 3, 1), 10);
        let result = detect_streaks(dates, date(2025, 1, 1));
        assert_eq!(result.longest, 10);
        assert_eq!(result.longest_start, Some(date(2024, 3, 1)));
        assert_eq!(result.longest_end, Some(date(2024, 3, 10)));
        assert_eq!(result.current, 0);
    }

    #[test]
    fn test_run_across_month_and_year_boundary() {
        let dates = days_from(date(2023, 12, 30), 4);
        let result = detect_streaks(dates, date(2020, 1, 1));
        assert_eq!(result.longest, 4);
        assert_eq!(result.longest_end, Some(date(2024, 1, 2)));
    }

    #[test]
    fn test_first_longest_run_wins_ties() {
        let mut dates = days_from(date(2024, 1, 1), 3);
        dates.extend(days_from(date(2024, 2, 1), 3));
        let result = detect_streaks(dates, date(2024, 12, 31));
        assert_eq!(result.longest, 3);
        assert_eq!(result.longest_start, Some(date(2024, 1, 1)));
        assert_eq!(result.longest_end, Some(date(2024, 1, 3)));
    }

    #[test]
    fn test_unsorted_and_duplicate_dates() {
        let dates = vec![
            date(2024, 5, 3),
            date(2024, 5, 1),
            date(2024, 5, 2),
            date(2024, 5, 2),
            date(2024, 5, 9),
        ];
        let result = detect_streaks(dates, date(2024, 5, 9));
        assert_eq!(result.longest, 3);
        assert_eq!(result.current, 1);
    }

    #[test]
    fn test_current_streak_walks_back_from_today() {
        let mut dates = days_from(date(2024, 6, 1), 5);
        dates.push(date(2024, 5, 29));
        let result = detect_streaks(dates, date(2024, 6, 5));
        assert_eq!(result.current, 5);

        let dates = days_from(date(2024, 6, 1), 5);
        assert_eq!(detect_streaks(dates, date(2024, 6, 6)).current, 0);
    }
}
