use crate::stats::comparison::{compare_years, PeriodTotals};
use crate::stats::fun_facts::{generate_fun_facts, FactContext};
use crate::stats::heatmap::build_heatmap;
use crate::stats::personality::{classify, PersonalitySignals};
use crate::stats::records::{find_biggest_day, find_biggest_deletion};
use crate::stats::streak::detect_streaks;
use crate::stats::time::{bucket_by_time, weekday_name};
use crate::stats::{
    ActivityRecord, ActivitySnapshot, DayAggregate, LanguageBytes, RepoAggregate, RepoLanguages,
    WrappedReport,
};
use chrono::NaiveDate;
use std::collections::HashMap;

/// What period a report covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPeriod {
    /// Calendar year being summarized
    pub year: i32,
    /// Single repository the snapshot was limited to, if any
    pub scope: Option<String>,
    /// Anchor for the current streak
    pub today: NaiveDate,
}

/// Fold records into one aggregate per repository, in first-seen order
pub fn group_by_repo(records: &[ActivityRecord]) -> Vec<RepoAggregate> {
    let mut repos: Vec<RepoAggregate> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in records {
        match index.get(record.repo.as_str()) {
            Some(&i) => {
                let repo = &mut repos[i];
                repo.commits += 1;
                repo.additions += record.additions;
                repo.deletions += record.deletions;
            }
            None => {
                index.insert(record.repo.as_str(), repos.len());
                repos.push(RepoAggregate {
                    name: record.repo.clone(),
                    commits: 1,
                    additions: record.additions,
                    deletions: record.deletions,
                    languages: Vec::new(),
                });
            }
        }
    }

    repos
}

/// Fold records into one aggregate per calendar day, in first-seen order
pub fn group_by_day(records: &[ActivityRecord]) -> Vec<DayAggregate> {
    let mut days: Vec<DayAggregate> = Vec::new();
    let mut index: HashMap<NaiveDate, usize> = HashMap::new();

    for record in records {
        let date = record.date();
        match index.get(&date) {
            Some(&i) => {
                let day = &mut days[i];
                day.commits += 1;
                day.additions += record.additions;
                day.deletions += record.deletions;
            }
            None => {
                index.insert(date, days.len());
                days.push(DayAggregate {
                    date,
                    commits: 1,
                    additions: record.additions,
                    deletions: record.deletions,
                });
            }
        }
    }

    days
}

/// Sum language bytes across repositories, keeping first-seen order
pub fn total_languages(repo_languages: &[RepoLanguages]) -> Vec<LanguageBytes> {
    let mut totals: Vec<LanguageBytes> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for entry in repo_languages.iter().flat_map(|repo| repo.languages.iter()) {
        match index.get(entry.language.as_str()) {
            Some(&i) => totals[i].bytes += entry.bytes,
            None => {
                index.insert(entry.language.as_str(), totals.len());
                totals.push(entry.clone());
            }
        }
    }

    totals
}

/// First item with the strictly largest key
fn first_max_by<T, F>(items: &[T], key: F) -> Option<&T>
where
    F: Fn(&T) -> u64,
{
    let mut best: Option<&T> = None;
    for item in items {
        if best.map_or(true, |b| key(item) > key(b)) {
            best = Some(item);
        }
    }
    best
}

/// Build the full year-in-review report from a snapshot.
///
/// Never fails: every statistic has a defined value for empty input. Pass the
/// prior year's totals to get a year-over-year comparison.
pub fn build_report(
    snapshot: &ActivitySnapshot,
    period: &ReportPeriod,
    previous: Option<&PeriodTotals>,
) -> WrappedReport {
    let records = &snapshot.records;

    let mut repos = group_by_repo(records);
    for repo in &mut repos {
        if let Some(found) = snapshot.repo_languages.iter().find(|l| l.repo == repo.name) {
            repo.languages = found.languages.clone();
        }
    }
    let days = group_by_day(records);
    let languages = total_languages(&snapshot.repo_languages);

    let (by_day, by_hour) = bucket_by_time(records);
    let streak = detect_streaks(days.iter().map(|d| d.date), period.today);
    let heatmap = build_heatmap(&days, period.year);
    let biggest_day = find_biggest_day(&days);
    let biggest_deletion = find_biggest_deletion(&days);

    let total_commits = records.len() as u64;
    let total_additions: u64 = records.iter().map(|r| r.additions).sum();
    let total_deletions: u64 = records.iter().map(|r| r.deletions).sum();

    let personality = classify(&PersonalitySignals {
        by_hour,
        by_day,
        longest_streak: streak.longest,
        additions: total_additions,
        deletions: total_deletions,
        reviews: snapshot.review_count,
        languages: languages.len(),
        repos: repos.len(),
    });

    let fun_facts = generate_fun_facts(&FactContext {
        records,
        by_hour: &by_hour,
        by_day: &by_day,
        total_commits,
        additions: total_additions,
        deletions: total_deletions,
        longest_streak: streak.longest,
        repo_count: repos.len(),
        languages: &languages,
        active_days: days.len(),
    });

    let most_active_repo = first_max_by(&repos, |r| r.commits).map(|r| r.name.clone());
    let top_language = first_max_by(&languages, |l| l.bytes).map(|l| l.language.clone());
    let most_productive_day = by_day.busiest().map(|(day, _)| weekday_name(day).to_string());
    let most_productive_hour = by_hour.peak();

    let mut daily_commits = days;
    daily_commits.sort_by_key(|d| d.date);

    let mut report = WrappedReport {
        username: snapshot.username.clone(),
        avatar_url: snapshot.avatar_url.clone(),
        year: period.year,
        repo_scope: period.scope.clone(),

        total_commits,
        total_prs: snapshot.pr_count,
        total_issues: snapshot.issue_count,
        total_reviews: snapshot.review_count,
        total_additions,
        total_deletions,

        repo_count: repos.len(),
        most_active_repo,
        repos,

        commits_by_day: by_day,
        commits_by_hour: by_hour,
        most_productive_day,
        most_productive_hour,

        streak,

        top_language,
        languages,

        top_collaborator: snapshot.collaborators.first().map(|c| c.username.clone()),
        collaborators: snapshot.collaborators.clone(),

        personality,
        biggest_day,
        biggest_deletion,
        daily_commits,
        heatmap,
        fun_facts,
        year_comparison: None,
    };

    if let Some(previous) = previous {
        let current = PeriodTotals::from_report(&report);
        report.year_comparison = Some(compare_years(period.year, &current, previous));
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::fixtures::{date, record};
    use crate::stats::fun_facts::MAX_FUN_FACTS;
    use crate::stats::{Collaborator, Personality};

    fn period(year: i32) -> ReportPeriod {
        ReportPeriod {
            year,
            scope: None,
            today: date(year + 1, 6, 1),
        }
    }

    #[test]
    fn test_empty_snapshot_builds_complete_report() {
        let report = build_report(&ActivitySnapshot::default(), &period(2024), None);
        assert_eq!(report.total_commits, 0);
        assert_eq!(report.repo_count, 0);
        assert_eq!(report.personality, Personality::NineToFiver);
        assert_eq!(report.streak.longest, 0);
        assert!(report.most_active_repo.is_none());
        assert!(report.most_productive_day.is_none());
        assert!(report.most_productive_hour.is_none());
        assert!(report.top_language.is_none());
        assert!(report.top_collaborator.is_none());
        assert!(report.biggest_day.is_none());
        assert!(report.biggest_deletion.is_none());
        assert!(report.fun_facts.is_empty());
        assert!(report.year_comparison.is_none());
        assert!(report.heatmap.weeks.len() >= 52);
        assert_eq!(report.heatmap.max_commits, 0);
    }

    #[test]
    fn test_two_day_scenario() {
        let snapshot = ActivitySnapshot {
            username: "octocat".to_string(),
            records: vec![
                record("octocat/hello", 2024, 1, 1, 12, 10, 2),
                record("octocat/hello", 2024, 1, 2, 12, 5, 5),
            ],
            ..Default::default()
        };
        let report = build_report(&snapshot, &period(2024), None);
        assert_eq!(report.total_additions, 15);
        assert_eq!(report.total_deletions, 7);
        assert_eq!(report.streak.longest, 2);
        assert_eq!(report.most_productive_day.as_deref(), Some("Monday"));
        assert_eq!(report.most_productive_hour, Some(12));
        assert_eq!(report.most_active_repo.as_deref(), Some("octocat/hello"));
        assert_eq!(report.daily_commits.len(), 2);
        assert_eq!(report.commits_by_day.total(), report.total_commits);
        assert_eq!(report.commits_by_hour.total(), report.total_commits);
    }

    #[test]
    fn test_grouping_preserves_first_seen_order() {
        let records = vec![
            record("me/b", 2024, 3, 2, 9, 1, 1),
            record("me/a", 2024, 3, 1, 9, 2, 0),
            record("me/b", 2024, 3, 1, 9, 3, 4),
        ];
        let repos = group_by_repo(&records);
        assert_eq!(repos.len(), 2);
        assert_eq!(repos[0].name, "me/b");
        assert_eq!(repos[0].commits, 2);
        assert_eq!(repos[0].additions, 4);
        assert_eq!(repos[0].deletions, 5);

        let days = group_by_day(&records);
        assert_eq!(days[0].date, date(2024, 3, 2));
        assert_eq!(days[1].date, date(2024, 3, 1));
        assert_eq!(days[1].commits, 2);
    }

    #[test]
    fn test_daily_commits_sorted_but_biggest_day_uses_grouping_order() {
        let records = vec![
            record("me/a", 2024, 3, 5, 9, 1, 0),
            record("me/a", 2024, 3, 5, 10, 1, 0),
            record("me/a", 2024, 3, 1, 9, 1, 0),
            record("me/a", 2024, 3, 1, 10, 1, 0),
        ];
        let snapshot = ActivitySnapshot {
            records,
            ..Default::default()
        };
        let report = build_report(&snapshot, &period(2024), None);
        assert_eq!(report.daily_commits[0].date, date(2024, 3, 1));
        assert_eq!(report.biggest_day.unwrap().date, date(2024, 3, 5));
    }

    #[test]
    fn test_most_active_repo_tie_goes_to_first() {
        let snapshot = ActivitySnapshot {
            records: vec![
                record("me/first", 2024, 3, 1, 9, 1, 0),
                record("me/second", 2024, 3, 1, 9, 1, 0),
            ],
            ..Default::default()
        };
        let report = build_report(&snapshot, &period(2024), None);
        assert_eq!(report.most_active_repo.as_deref(), Some("me/first"));
    }

    #[test]
    fn test_languages_attach_and_total() {
        let snapshot = ActivitySnapshot {
            records: vec![
                record("me/a", 2024, 3, 1, 9, 1, 0),
                record("me/b", 2024, 3, 1, 9, 1, 0),
            ],
            repo_languages: vec![
                RepoLanguages {
                    repo: "me/a".to_string(),
                    languages: vec![LanguageBytes::new("Rust", 100), LanguageBytes::new("Go", 50)],
                },
                RepoLanguages {
                    repo: "me/b".to_string(),
                    languages: vec![LanguageBytes::new("Go", 60)],
                },
            ],
            ..Default::default()
        };
        let report = build_report(&snapshot, &period(2024), None);
        assert_eq!(report.repos[0].languages.len(), 2);
        assert_eq!(report.repos[1].languages[0].language, "Go");
        assert_eq!(
            report.languages,
            vec![LanguageBytes::new("Rust", 100), LanguageBytes::new("Go", 110)]
        );
        assert_eq!(report.top_language.as_deref(), Some("Go"));
    }

    #[test]
    fn test_polyglot_single_repo_scenario() {
        // Weekdays only, 2024-04-01 is a Monday
        let records: Vec<_> = [1, 2, 3, 4, 5, 8, 9, 10, 11, 12]
            .iter()
            .map(|&d| record("me/only", 2024, 4, d, 12, 10, 5))
            .collect();
        let snapshot = ActivitySnapshot {
            records,
            repo_languages: vec![RepoLanguages {
                repo: "me/only".to_string(),
                languages: vec![
                    LanguageBytes::new("Rust", 850),
                    LanguageBytes::new("Shell", 50),
                    LanguageBytes::new("Python", 40),
                    LanguageBytes::new("Makefile", 30),
                    LanguageBytes::new("Dockerfile", 30),
                ],
            }],
            ..Default::default()
        };
        let report = build_report(&snapshot, &period(2024), None);
        assert_eq!(report.personality, Personality::Polyglot);
        assert!(report.fun_facts.iter().any(|f| f.emoji == "🌍"));
        assert!(report
            .fun_facts
            .iter()
            .any(|f| f.text.contains("You found the one")));
        assert!(report.fun_facts.len() <= MAX_FUN_FACTS);
    }

    #[test]
    fn test_out_of_year_records_do_not_leak_into_heatmap() {
        let snapshot = ActivitySnapshot {
            records: vec![
                record("me/a", 2023, 12, 31, 9, 1, 0),
                record("me/a", 2024, 6, 1, 9, 1, 0),
            ],
            ..Default::default()
        };
        let report = build_report(&snapshot, &period(2024), None);
        let cell = report
            .heatmap
            .cells()
            .find(|c| c.date == date(2023, 12, 31))
            .unwrap();
        assert_eq!(cell.commits, 0);
        assert_eq!(report.heatmap.max_commits, 1);
    }

    #[test]
    fn test_year_comparison_attached_when_previous_present() {
        let snapshot = ActivitySnapshot {
            records: vec![record("me/a", 2024, 3, 1, 9, 1, 0)],
            pr_count: 3,
            ..Default::default()
        };
        let previous = PeriodTotals {
            commits: 2,
            prs: 0,
            ..Default::default()
        };
        let report = build_report(&snapshot, &period(2024), Some(&previous));
        let comparison = report.year_comparison.unwrap();
        assert_eq!(comparison.previous_year, 2023);
        assert_eq!(comparison.commits.change, -50);
        assert_eq!(comparison.prs.change, 100);
    }

    #[test]
    fn test_collaborators_pass_through() {
        let snapshot = ActivitySnapshot {
            collaborators: vec![
                Collaborator {
                    username: "hubot".to_string(),
                    interactions: 7,
                },
                Collaborator {
                    username: "monalisa".to_string(),
                    interactions: 2,
                },
            ],
            ..Default::default()
        };
        let report = build_report(&snapshot, &period(2024), None);
        assert_eq!(report.top_collaborator.as_deref(), Some("hubot"));
        assert_eq!(report.collaborators.len(), 2);
    }

    #[test]
    fn test_current_streak_uses_today() {
        let snapshot = ActivitySnapshot {
            records: vec![
                record("me/a", 2024, 3, 1, 9, 1, 0),
                record("me/a", 2024, 3, 2, 9, 1, 0),
            ],
            ..Default::default()
        };
        let live = ReportPeriod {
            today: date(2024, 3, 2),
            ..period(2024)
        };
        assert_eq!(build_report(&snapshot, &live, None).streak.current, 2);
        assert_eq!(build_report(&snapshot, &period(2024), None).streak.current, 0);
    }
}
