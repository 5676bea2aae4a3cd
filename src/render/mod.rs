//! Output formats for a finished [`WrappedReport`].
//!
//! Renderers own every presentation concern: number abbreviation, date and
//! hour formatting, color. All of them accept a report with no activity.

pub mod html;
pub mod json;
pub mod markdown;
pub mod terminal;

use crate::error::Result;
use crate::stats::{LanguageBytes, RepoAggregate, WrappedReport};
use chrono::NaiveDate;

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    /// Colored text for a terminal
    #[default]
    Terminal,
    /// GitHub-flavored Markdown
    Markdown,
    /// Pretty-printed JSON of the full report
    Json,
    /// Self-contained HTML page
    Html,
}

impl Format {
    /// Conventional file extension
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Terminal => "txt",
            Format::Markdown => "md",
            Format::Json => "json",
            Format::Html => "html",
        }
    }
}

/// Render `report`; `color` only affects the terminal format
pub fn render(report: &WrappedReport, format: Format, color: bool) -> Result<String> {
    match format {
        Format::Terminal => Ok(terminal::render(report, color)),
        Format::Markdown => Ok(markdown::render(report)),
        Format::Json => json::render(report),
        Format::Html => Ok(html::render(report)),
    }
}

/// Abbreviate large counts: `999`, `1.2K`, `3.4M`
pub fn format_number(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

/// 12-hour clock label for an hour of the day
pub fn format_hour(hour: u32) -> String {
    match hour {
        0 => "12 AM".to_string(),
        12 => "12 PM".to_string(),
        h if h < 12 => format!("{} AM", h),
        h => format!("{} PM", h - 12),
    }
}

/// Signed percentage: `+12%`, `-5%`, `0%`
pub fn format_change(change: i64) -> String {
    if change > 0 {
        format!("+{}%", change)
    } else {
        format!("{}%", change)
    }
}

/// `March 5`
pub fn format_day(date: NaiveDate) -> String {
    date.format("%B %-d").to_string()
}

/// Share of changed lines that were additions; 50 when nothing changed
pub fn addition_percentage(report: &WrappedReport) -> u64 {
    let total = report.total_additions + report.total_deletions;
    if total == 0 {
        return 50;
    }
    (report.total_additions as f64 / total as f64 * 100.0).round() as u64
}

/// Emoji matching the time of day of the peak hour
pub fn hour_emoji(hour: u32) -> &'static str {
    match hour {
        22..=23 | 0..=3 => "🦉",
        5..=8 => "🌅",
        _ => "☕",
    }
}

/// Largest languages first with their whole-number share of the shown total
pub fn top_languages(report: &WrappedReport, limit: usize) -> Vec<(&LanguageBytes, u64)> {
    let mut languages: Vec<&LanguageBytes> = report.languages.iter().collect();
    languages.sort_by(|a, b| b.bytes.cmp(&a.bytes));
    languages.truncate(limit);

    let total: u64 = languages.iter().map(|l| l.bytes).sum();
    languages
        .into_iter()
        .map(|language| {
            let pct = if total == 0 {
                0
            } else {
                (language.bytes as f64 / total as f64 * 100.0).round() as u64
            };
            (language, pct)
        })
        .collect()
}

/// Busiest repositories first
pub fn top_repos(report: &WrappedReport, limit: usize) -> Vec<&RepoAggregate> {
    let mut repos: Vec<&RepoAggregate> = report.repos.iter().collect();
    repos.sort_by(|a, b| b.commits.cmp(&a.commits));
    repos.truncate(limit);
    repos
}

/// Medal (or rank) for a position in the top repositories
pub fn medal(rank: usize) -> String {
    match rank {
        0 => "🥇".to_string(),
        1 => "🥈".to_string(),
        2 => "🥉".to_string(),
        n => format!("{}.", n + 1),
    }
}

/// Closing line for the year-over-year commit change, if it is notable
pub fn comparison_message(change: i64, year: i32) -> Option<String> {
    if change > 20 {
        Some(format!("🚀 You coded {}% more in {}! Keep crushing it!", change, year))
    } else if change > 0 {
        Some(format!("📈 Steady growth! {}% more commits than last year.", change))
    } else if change < -20 {
        Some(format!("🧘 Taking it easier in {}. Quality over quantity!", year))
    } else {
        None
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::stats::fixtures::record;
    use crate::stats::{
        build_report, ActivitySnapshot, Collaborator, LanguageBytes, PeriodTotals, RepoLanguages,
        ReportPeriod, WrappedReport,
    };
    use chrono::NaiveDate;

    fn period() -> ReportPeriod {
        ReportPeriod {
            year: 2024,
            scope: None,
            today: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
        }
    }

    /// A report with no activity at all
    pub fn empty_report() -> WrappedReport {
        build_report(&ActivitySnapshot::default(), &period(), None)
    }

    /// A report with a bit of everything
    pub fn populated_report() -> WrappedReport {
        let snapshot = ActivitySnapshot {
            username: "octo<cat>".to_string(),
            avatar_url: Some("https://avatars.example.com/u/1".to_string()),
            records: vec![
                record("octocat/hello", 2024, 3, 4, 23, 1200, 40),
                record("octocat/hello", 2024, 3, 4, 23, 10, 1500),
                record("octocat/hello", 2024, 3, 5, 9, 300, 20),
                record("octocat/tools", 2024, 7, 19, 14, 50, 5),
            ],
            pr_count: 1250,
            issue_count: 3,
            review_count: 7,
            repo_languages: vec![RepoLanguages {
                repo: "octocat/hello".to_string(),
                languages: vec![
                    LanguageBytes::new("Rust", 9000),
                    LanguageBytes::new("Shell", 1000),
                ],
            }],
            collaborators: vec![Collaborator {
                username: "hubot".to_string(),
                interactions: 4,
            }],
        };
        let previous = PeriodTotals {
            commits: 2,
            prs: 1000,
            repos: 1,
            ..Default::default()
        };
        build_report(&snapshot, &period(), Some(&previous))
    }
}
