use crate::stats::DayAggregate;
use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use std::collections::HashMap;

/// Minimum number of weeks in a heatmap grid
pub const MIN_WEEKS: usize = 52;

/// One calendar cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeatmapDay {
    pub date: NaiveDate,
    pub commits: u64,
    /// Intensity bucket, 0 (none) to 4 (busiest)
    pub level: u8,
}

/// Seven cells, Sunday first
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeatmapWeek {
    pub days: [HeatmapDay; 7],
}

/// GitHub-style contribution grid for one year
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HeatmapData {
    /// Oldest week first
    pub weeks: Vec<HeatmapWeek>,
    /// Busiest single day inside the target year
    pub max_commits: u64,
}

impl HeatmapData {
    /// Iterate every cell, week by week
    pub fn cells(&self) -> impl Iterator<Item = &HeatmapDay> {
        self.weeks.iter().flat_map(|week| week.days.iter())
    }
}

/// Bucket a day's commit count relative to the busiest day.
///
/// Thresholds are quarters of `max`, compared in integers so the result
/// never depends on float rounding.
pub fn intensity_level(commits: u64, max: u64) -> u8 {
    if commits == 0 || max == 0 {
        return 0;
    }

    if commits * 4 <= max {
        1
    } else if commits * 2 <= max {
        2
    } else if commits * 4 <= max * 3 {
        3
    } else {
        4
    }
}

/// Lay a year's daily activity onto a Sunday-aligned week grid.
///
/// The grid starts on the Sunday on or before January 1 and runs until a
/// week would start after December 31, with at least [`MIN_WEEKS`] weeks.
/// Cells dated outside `year` are always empty.
pub fn build_heatmap(days: &[DayAggregate], year: i32) -> HeatmapData {
    let (Some(jan_first), Some(dec_last)) = (
        NaiveDate::from_ymd_opt(year, 1, 1),
        NaiveDate::from_ymd_opt(year, 12, 31),
    ) else {
        return HeatmapData::default();
    };

    let mut commits_by_date: HashMap<NaiveDate, u64> = HashMap::new();
    for day in days.iter().filter(|day| day.date.year() == year) {
        *commits_by_date.entry(day.date).or_insert(0) += day.commits;
    }
    let max_commits = commits_by_date.values().copied().max().unwrap_or(0);

    let commits_on = |date: NaiveDate| -> u64 {
        if date.year() == year {
            commits_by_date.get(&date).copied().unwrap_or(0)
        } else {
            0
        }
    };

    let lead = jan_first.weekday().num_days_from_sunday() as i64;
    let mut week_start = jan_first - Duration::days(lead);
    let mut weeks = Vec::with_capacity(MIN_WEEKS + 1);

    while week_start <= dec_last || weeks.len() < MIN_WEEKS {
        let days = std::array::from_fn(|offset| {
            let date = week_start + Duration::days(offset as i64);
            let commits = commits_on(date);
            HeatmapDay {
                date,
                commits,
                level: intensity_level(commits, max_commits),
            }
        });
        weeks.push(HeatmapWeek { days });
        week_start = week_start + Duration::days(7);
    }

    HeatmapData { weeks, max_commits }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::fixtures::{date, day};
    use chrono::Weekday;

    #[test]
    fn test_intensity_levels() {
        assert_eq!(intensity_level(0, 8), 0);
        assert_eq!(intensity_level(2, 8), 1);
        assert_eq!(intensity_level(3, 8), 2);
        assert_eq!(intensity_level(4, 8), 2);
        assert_eq!(intensity_level(5, 8), 3);
        assert_eq!(intensity_level(6, 8), 3);
        assert_eq!(intensity_level(7, 8), 4);
        assert_eq!(intensity_level(8, 8), 4);
        assert_eq!(intensity_level(3, 0), 0);
    }

    #[test]
    fn test_intensity_is_monotonic() {
        for max in 1..=40u64 {
            for commits in 1..max {
                assert!(intensity_level(commits, max) <= intensity_level(commits + 1, max));
            }
        }
    }

    #[test]
    fn test_grid_starts_on_sunday_before_new_year() {
        // 2024-01-01 is a Monday
        let heatmap = build_heatmap(&[], 2024);
        let first = heatmap.weeks[0].days[0].date;
        assert_eq!(first, date(2023, 12, 31));
        assert_eq!(first.weekday(), Weekday::Sun);
        for week in &heatmap.weeks {
            assert_eq!(week.days[0].date.weekday(), Weekday::Sun);
        }
    }

    #[test]
    fn test_week_counts() {
        // 2024: starts 2023-12-31, needs a 53rd week for Dec 29-31
        assert_eq!(build_heatmap(&[], 2024).weeks.len(), 53);
        // 2023 starts on a Sunday and the last week begins Dec 31
        assert_eq!(build_heatmap(&[], 2023).weeks.len(), 53);
        // 2022: Sunday 2021-12-26 start, last week begins Dec 25
        assert_eq!(build_heatmap(&[], 2022).weeks.len(), 53);
        for year in 2000..2040 {
            let heatmap = build_heatmap(&[], year);
            assert!(heatmap.weeks.len() >= MIN_WEEKS);
            assert!(heatmap.cells().count() >= 364);
            assert!(heatmap.cells().any(|c| c.date == date(year, 12, 31)));
        }
    }

    #[test]
    fn test_out_of_year_cells_are_zeroed() {
        let days = vec![
            day(2023, 12, 31, 9, 0),
            day(2024, 1, 1, 2, 0),
            day(2025, 1, 2, 7, 0),
        ];
        let heatmap = build_heatmap(&days, 2024);
        assert_eq!(heatmap.max_commits, 2);
        for cell in heatmap.cells() {
            if cell.date.year() != 2024 {
                assert_eq!(cell.commits, 0);
                assert_eq!(cell.level, 0);
            }
        }
        let jan_first = heatmap.cells().find(|c| c.date == date(2024, 1, 1)).unwrap();
        assert_eq!(jan_first.commits, 2);
        assert_eq!(jan_first.level, 4);
    }

    #[test]
    fn test_levels_relative_to_max() {
        let days = vec![
            day(2024, 3, 1, 1, 0),
            day(2024, 3, 2, 5, 0),
            day(2024, 3, 3, 10, 0),
        ];
        let heatmap = build_heatmap(&days, 2024);
        let level = |d: u32| {
            heatmap
                .cells()
                .find(|c| c.date == date(2024, 3, d))
                .unwrap()
                .level
        };
        assert_eq!(level(1), 1);
        assert_eq!(level(2), 2);
        assert_eq!(level(3), 4);
        assert_eq!(level(4), 0);
    }

    #[test]
    fn test_deterministic() {
        let days = vec![day(2024, 7, 4, 3, 0), day(2024, 7, 5, 1, 0)];
        assert_eq!(build_heatmap(&days, 2024), build_heatmap(&days, 2024));
    }
}
