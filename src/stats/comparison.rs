use crate::stats::report::group_by_repo;
use crate::stats::streak::longest_run;
use crate::stats::{ActivitySnapshot, WrappedReport};
use serde::Serialize;
use std::collections::BTreeSet;

/// Percentage change from `previous` to `current`, rounded to a whole number.
///
/// A zero baseline reads as +100% when anything happened and 0% otherwise.
pub fn percent_change(current: u64, previous: u64) -> i64 {
    if previous == 0 {
        return if current > 0 { 100 } else { 0 };
    }

    let delta = (current as f64 - previous as f64) / previous as f64 * 100.0;
    delta.round() as i64
}

/// One metric in both periods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricChange {
    pub current: u64,
    pub previous: u64,
    /// Whole-number percentage change
    pub change: i64,
}

impl MetricChange {
    pub fn new(current: u64, previous: u64) -> Self {
        Self {
            current,
            previous,
            change: percent_change(current, previous),
        }
    }
}

/// The metrics compared between two years
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeriodTotals {
    pub commits: u64,
    pub prs: u64,
    pub additions: u64,
    pub deletions: u64,
    pub repos: u64,
    pub longest_streak: u64,
}

impl PeriodTotals {
    /// Reduce a raw snapshot to its comparable totals
    pub fn from_snapshot(snapshot: &ActivitySnapshot) -> Self {
        let dates: BTreeSet<_> = snapshot.records.iter().map(|r| r.date()).collect();

        Self {
            commits: snapshot.records.len() as u64,
            prs: snapshot.pr_count,
            additions: snapshot.records.iter().map(|r| r.additions).sum(),
            deletions: snapshot.records.iter().map(|r| r.deletions).sum(),
            repos: group_by_repo(&snapshot.records).len() as u64,
            longest_streak: longest_run(&dates).map_or(0, |run| run.length),
        }
    }

    /// Totals of an already built report
    pub fn from_report(report: &WrappedReport) -> Self {
        Self {
            commits: report.total_commits,
            prs: report.total_prs,
            additions: report.total_additions,
            deletions: report.total_deletions,
            repos: report.repo_count as u64,
            longest_streak: report.streak.longest,
        }
    }
}

/// Year-over-year change for each headline metric
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearComparison {
    pub previous_year: i32,
    pub commits: MetricChange,
    pub prs: MetricChange,
    pub additions: MetricChange,
    pub deletions: MetricChange,
    pub repos: MetricChange,
    pub streak: MetricChange,
}

/// Compare `year` against the year before it
pub fn compare_years(year: i32, current: &PeriodTotals, previous: &PeriodTotals) -> YearComparison {
    YearComparison {
        previous_year: year - 1,
        commits: MetricChange::new(current.commits, previous.commits),
        prs: MetricChange::new(current.prs, previous.prs),
        additions: MetricChange::new(current.additions, previous.additions),
        deletions: MetricChange::new(current.deletions, previous.deletions),
        repos: MetricChange::new(current.repos, previous.repos),
        streak: MetricChange::new(current.longest_streak, previous.longest_streak),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::fixtures::record;

    #[test]
    fn test_percent_change() {
        assert_eq!(percent_change(150, 100), 50);
        assert_eq!(percent_change(5, 0), 100);
        assert_eq!(percent_change(0, 0), 0);
        assert_eq!(percent_change(50, 100), -50);
        assert_eq!(percent_change(0, 7), -100);
        assert_eq!(percent_change(2, 3), -33);
        assert_eq!(percent_change(400, 100), 300);
    }

    #[test]
    fn test_totals_from_snapshot() {
        let snapshot = ActivitySnapshot {
            records: vec![
                record("me/a", 2023, 4, 1, 10, 10, 2),
                record("me/a", 2023, 4, 2, 10, 5, 5),
                record("me/b", 2023, 4, 3, 10, 1, 0),
                record("me/b", 2023, 6, 1, 10, 1, 0),
            ],
            pr_count: 3,
            ..Default::default()
        };
        let totals = PeriodTotals::from_snapshot(&snapshot);
        assert_eq!(
            totals,
            PeriodTotals {
                commits: 4,
                prs: 3,
                additions: 17,
                deletions: 7,
                repos: 2,
                longest_streak: 3,
            }
        );
    }

    #[test]
    fn test_compare_years() {
        let current = PeriodTotals {
            commits: 150,
            prs: 5,
            ..Default::default()
        };
        let previous = PeriodTotals {
            commits: 100,
            ..Default::default()
        };
        let comparison = compare_years(2024, &current, &previous);
        assert_eq!(comparison.previous_year, 2023);
        assert_eq!(comparison.commits.change, 50);
        assert_eq!(comparison.prs.change, 100);
        assert_eq!(comparison.additions.change, 0);
        assert_eq!(comparison.commits.previous, 100);
    }
}
