//! Aggregation engine: turns an activity snapshot into a [`WrappedReport`].
//!
//! Everything under this module is pure, synchronous computation over
//! already-fetched data. Fetching lives in `github` and `local`, formatting
//! lives in `render`.

pub mod comparison;
pub mod fun_facts;
pub mod heatmap;
pub mod personality;
pub mod records;
pub mod report;
pub mod streak;
pub mod time;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

pub use comparison::{PeriodTotals, YearComparison};
pub use fun_facts::FunFact;
pub use heatmap::HeatmapData;
pub use personality::Personality;
pub use records::{BiggestDay, BiggestDeletion};
pub use report::{build_report, ReportPeriod};
pub use streak::StreakResult;
pub use time::{HourHistogram, WeekdayHistogram};

/// One commit attributed to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// Commit hash
    pub sha: String,
    /// Full commit message
    pub message: String,
    /// Author timestamp, kept in the offset it was recorded with
    pub timestamp: DateTime<FixedOffset>,
    /// Owning repository (`owner/name` for GitHub, directory name locally)
    pub repo: String,
    /// Lines added
    pub additions: u64,
    /// Lines deleted
    pub deletions: u64,
}

impl ActivityRecord {
    /// Calendar date of the commit in its own offset
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

/// Bytes of code written in one language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageBytes {
    pub language: String,
    pub bytes: u64,
}

impl LanguageBytes {
    pub fn new<S: Into<String>>(language: S, bytes: u64) -> Self {
        Self {
            language: language.into(),
            bytes,
        }
    }
}

/// Language breakdown reported for one repository
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoLanguages {
    pub repo: String,
    pub languages: Vec<LanguageBytes>,
}

/// Someone the user interacted with on pull requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collaborator {
    pub username: String,
    pub interactions: u64,
}

/// Everything fetched for one user and one year, before aggregation
///
/// Side data that failed to fetch is already defaulted to zero or empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivitySnapshot {
    /// Login (GitHub) or author identity (local)
    pub username: String,
    /// Profile picture, when the source has one
    pub avatar_url: Option<String>,
    /// Commits in fetch order
    pub records: Vec<ActivityRecord>,
    /// Pull requests opened
    pub pr_count: u64,
    /// Issues opened
    pub issue_count: u64,
    /// Pull requests reviewed
    pub review_count: u64,
    /// Per-repository language bytes
    pub repo_languages: Vec<RepoLanguages>,
    /// Ranked collaborators, most interactions first
    pub collaborators: Vec<Collaborator>,
}

/// Per-repository rollup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoAggregate {
    pub name: String,
    pub commits: u64,
    pub additions: u64,
    pub deletions: u64,
    pub languages: Vec<LanguageBytes>,
}

/// Per-calendar-day rollup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayAggregate {
    pub date: NaiveDate,
    pub commits: u64,
    pub additions: u64,
    pub deletions: u64,
}

/// The finished year in review, consumed by every renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WrappedReport {
    // Identity
    pub username: String,
    pub avatar_url: Option<String>,
    pub year: i32,
    pub repo_scope: Option<String>,

    // Totals
    pub total_commits: u64,
    pub total_prs: u64,
    pub total_issues: u64,
    pub total_reviews: u64,
    pub total_additions: u64,
    pub total_deletions: u64,

    // Repositories
    pub repos: Vec<RepoAggregate>,
    pub most_active_repo: Option<String>,
    pub repo_count: usize,

    // Time analysis
    pub commits_by_day: WeekdayHistogram,
    pub commits_by_hour: HourHistogram,
    pub most_productive_day: Option<String>,
    pub most_productive_hour: Option<u32>,

    // Streaks
    pub streak: StreakResult,

    // Languages
    pub languages: Vec<LanguageBytes>,
    pub top_language: Option<String>,

    // Collaborators
    pub collaborators: Vec<Collaborator>,
    pub top_collaborator: Option<String>,

    // Insights
    pub personality: Personality,
    pub biggest_day: Option<BiggestDay>,
    pub biggest_deletion: Option<BiggestDeletion>,

    /// Per-day rollups, ascending by date
    pub daily_commits: Vec<DayAggregate>,

    pub heatmap: HeatmapData,
    pub fun_facts: Vec<FunFact>,
    pub year_comparison: Option<YearComparison>,
}
