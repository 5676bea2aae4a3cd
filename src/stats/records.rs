use crate::stats::DayAggregate;
use chrono::NaiveDate;
use serde::Serialize;

/// Smallest single-day deletion worth reporting
pub const BIG_DELETION_FLOOR: u64 = 1000;

/// Day with the most commits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BiggestDay {
    pub date: NaiveDate,
    pub commits: u64,
}

/// Day with the most deleted lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BiggestDeletion {
    pub date: NaiveDate,
    pub lines: u64,
}

/// Busiest day by commit count. `days` must be in grouping order; the first
/// day reaching the maximum wins.
pub fn find_biggest_day(days: &[DayAggregate]) -> Option<BiggestDay> {
    let mut biggest: Option<BiggestDay> = None;

    for day in days {
        if day.commits > biggest.map_or(0, |b| b.commits) {
            biggest = Some(BiggestDay {
                date: day.date,
                commits: day.commits,
            });
        }
    }

    biggest
}

/// Largest single-day deletion of at least [`BIG_DELETION_FLOOR`] lines
pub fn find_biggest_deletion(days: &[DayAggregate]) -> Option<BiggestDeletion> {
    let mut biggest: Option<BiggestDeletion> = None;

    for day in days.iter().filter(|d| d.deletions >= BIG_DELETION_FLOOR) {
        if biggest.map_or(true, |b| day.deletions > b.lines) {
            biggest = Some(BiggestDeletion {
                date: day.date,
                lines: day.deletions,
            });
        }
    }

    biggest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::fixtures::{date, day};

    #[test]
    fn test_biggest_day_first_encountered_wins() {
        let days = vec![
            day(2024, 5, 2, 4, 0),
            day(2024, 5, 1, 4, 0),
            day(2024, 5, 3, 1, 0),
        ];
        let biggest = find_biggest_day(&days).unwrap();
        assert_eq!(biggest.date, date(2024, 5, 2));
        assert_eq!(biggest.commits, 4);
    }

    #[test]
    fn test_biggest_day_empty() {
        assert!(find_biggest_day(&[]).is_none());
    }

    #[test]
    fn test_deletion_below_floor_is_absent() {
        let days = vec![day(2024, 5, 1, 1, 999)];
        assert!(find_biggest_deletion(&days).is_none());
    }

    #[test]
    fn test_deletion_at_floor_is_present() {
        let days = vec![day(2024, 5, 1, 1, 1000)];
        let found = find_biggest_deletion(&days).unwrap();
        assert_eq!(found.lines, 1000);
        assert_eq!(found.date, date(2024, 5, 1));
    }

    #[test]
    fn test_deletion_picks_maximum() {
        let days = vec![
            day(2024, 5, 1, 1, 1500),
            day(2024, 5, 2, 1, 4000),
            day(2024, 5, 3, 1, 4000),
            day(2024, 5, 4, 1, 20),
        ];
        let found = find_biggest_deletion(&days).unwrap();
        assert_eq!(found.lines, 4000);
        assert_eq!(found.date, date(2024, 5, 2));
    }
}
