//! Heuristic "fun facts".
//!
//! Every rule in [`FACT_RULES`] is evaluated against the same context and may
//! contribute one fact. The list is then cut to [`MAX_FUN_FACTS`], so the
//! table order decides which facts survive when many apply.

use crate::stats::comparison::percent_change;
use crate::stats::time::weekday_name;
use crate::stats::{ActivityRecord, HourHistogram, LanguageBytes, WeekdayHistogram};
use chrono::Weekday;
use serde::Serialize;

/// Upper bound on the number of facts in a report
pub const MAX_FUN_FACTS: usize = 6;

/// Only this many records are scanned for message keywords
const MESSAGE_SCAN_LIMIT: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FactCategory {
    Time,
    Code,
    Social,
    Quirky,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunFact {
    pub emoji: String,
    pub text: String,
    pub category: FactCategory,
}

impl FunFact {
    fn new(emoji: &str, text: String, category: FactCategory) -> Self {
        Self {
            emoji: emoji.to_string(),
            text,
            category,
        }
    }
}

/// Aggregates the fact rules read from
#[derive(Debug, Clone, Copy)]
pub struct FactContext<'a> {
    pub records: &'a [ActivityRecord],
    pub by_hour: &'a HourHistogram,
    pub by_day: &'a WeekdayHistogram,
    pub total_commits: u64,
    pub additions: u64,
    pub deletions: u64,
    pub longest_streak: u64,
    pub repo_count: usize,
    /// Language totals in first-seen order
    pub languages: &'a [LanguageBytes],
    /// Distinct days with at least one commit
    pub active_days: usize,
}

type FactRule = fn(&FactContext) -> Option<FunFact>;

const FACT_RULES: &[FactRule] = &[
    peak_hour,
    busiest_vs_quietest_day,
    friday_vs_monday,
    weekend_share,
    commit_size,
    net_deletions,
    streak,
    repo_spread,
    language_count,
    language_dominance,
    work_in_progress,
    fix_commits,
    midnight_commits,
    commits_per_active_day,
];

/// Evaluate every rule in order and keep the first [`MAX_FUN_FACTS`] facts
pub fn generate_fun_facts(ctx: &FactContext) -> Vec<FunFact> {
    let mut facts: Vec<FunFact> = FACT_RULES.iter().filter_map(|rule| rule(ctx)).collect();
    facts.truncate(MAX_FUN_FACTS);
    facts
}

fn peak_hour(ctx: &FactContext) -> Option<FunFact> {
    let hour = ctx.by_hour.peak()?;
    match hour {
        0..=4 => Some(FunFact::new(
            "🦇",
            format!("Your peak coding hour was {hour}:00. Sleep is clearly optional."),
            FactCategory::Time,
        )),
        5..=8 => Some(FunFact::new(
            "🌄",
            format!("Your peak coding hour was {hour}:00. Most people are still asleep."),
            FactCategory::Time,
        )),
        20..=23 => Some(FunFact::new(
            "🌙",
            format!("Your peak coding hour was {hour}:00. The evening shift is yours."),
            FactCategory::Time,
        )),
        _ => None,
    }
}

fn busiest_vs_quietest_day(ctx: &FactContext) -> Option<FunFact> {
    let (busiest, most) = ctx.by_day.busiest()?;
    let (quietest, least) = ctx.by_day.quietest_active()?;
    if most < least * 2 {
        return None;
    }

    let ratio = most as f64 / least as f64;
    Some(FunFact::new(
        "📅",
        format!(
            "You committed {ratio:.1}x more on {}s than on {}s",
            weekday_name(busiest),
            weekday_name(quietest)
        ),
        FactCategory::Time,
    ))
}

fn friday_vs_monday(ctx: &FactContext) -> Option<FunFact> {
    let friday = ctx.by_day.get(Weekday::Fri);
    let monday = ctx.by_day.get(Weekday::Mon);
    if friday <= 5 || monday == 0 || friday <= monday {
        return None;
    }

    Some(FunFact::new(
        "🍻",
        format!(
            "You were {}% more productive on Fridays than on Mondays",
            percent_change(friday, monday)
        ),
        FactCategory::Time,
    ))
}

fn weekend_share(ctx: &FactContext) -> Option<FunFact> {
    let weekend = ctx.by_day.weekend();
    if ctx.total_commits == 0 || weekend * 100 <= ctx.total_commits * 25 {
        return None;
    }

    let share = (weekend as f64 / ctx.total_commits as f64 * 100.0).round();
    Some(FunFact::new(
        "🏖️",
        format!("{share}% of your commits landed on a weekend"),
        FactCategory::Time,
    ))
}

fn commit_size(ctx: &FactContext) -> Option<FunFact> {
    if ctx.total_commits == 0 {
        return None;
    }

    let average = (ctx.additions + ctx.deletions) as f64 / ctx.total_commits as f64;
    if average > 200.0 {
        Some(FunFact::new(
            "🐘",
            format!("Your commits averaged {average:.0} changed lines. Go big or go home."),
            FactCategory::Code,
        ))
    } else if average < 20.0 && ctx.total_commits > 50 {
        Some(FunFact::new(
            "⚛️",
            format!("Atomic commits: just {average:.0} changed lines each on average"),
            FactCategory::Code,
        ))
    } else {
        None
    }
}

fn net_deletions(ctx: &FactContext) -> Option<FunFact> {
    if ctx.deletions <= ctx.additions {
        return None;
    }

    Some(FunFact::new(
        "🧹",
        format!(
            "You deleted {} more lines than you added. Less code, fewer bugs.",
            ctx.deletions - ctx.additions
        ),
        FactCategory::Code,
    ))
}

fn streak(ctx: &FactContext) -> Option<FunFact> {
    let days = ctx.longest_streak;
    if days >= 30 {
        Some(FunFact::new(
            "🔥",
            format!("{days} days in a row. Unstoppable."),
            FactCategory::Time,
        ))
    } else if days >= 14 {
        Some(FunFact::new(
            "⚡",
            format!("A {days}-day streak. Consistency looks good on you."),
            FactCategory::Time,
        ))
    } else {
        None
    }
}

fn repo_spread(ctx: &FactContext) -> Option<FunFact> {
    if ctx.repo_count == 1 {
        Some(FunFact::new(
            "🎯",
            format!(
                "All {} commits went into a single repository",
                ctx.total_commits
            ),
            FactCategory::Quirky,
        ))
    } else if ctx.repo_count >= 10 {
        Some(FunFact::new(
            "🗺️",
            format!("You spread your work across {} repositories", ctx.repo_count),
            FactCategory::Social,
        ))
    } else {
        None
    }
}

fn language_count(ctx: &FactContext) -> Option<FunFact> {
    let count = ctx.languages.len();
    if count < 5 {
        return None;
    }

    Some(FunFact::new(
        "🌍",
        format!("You wrote code in {count} different languages"),
        FactCategory::Code,
    ))
}

fn language_dominance(ctx: &FactContext) -> Option<FunFact> {
    if ctx.languages.len() < 2 {
        return None;
    }

    let total: u64 = ctx.languages.iter().map(|l| l.bytes).sum();
    let mut top = ctx.languages.first()?;
    for language in ctx.languages {
        if language.bytes > top.bytes {
            top = language;
        }
    }
    if total == 0 || top.bytes * 100 < total * 80 {
        return None;
    }

    let share = (top.bytes as f64 / total as f64 * 100.0).round();
    Some(FunFact::new(
        "💘",
        format!("You found the one: {share}% of your code was {}", top.language),
        FactCategory::Code,
    ))
}

fn scanned_messages<'a>(ctx: &FactContext<'a>) -> impl Iterator<Item = String> + 'a {
    let records: &'a [ActivityRecord] = ctx.records;
    records
        .iter()
        .take(MESSAGE_SCAN_LIMIT)
        .map(|record| record.message.to_lowercase())
}

fn work_in_progress(ctx: &FactContext) -> Option<FunFact> {
    let count = scanned_messages(ctx)
        .filter(|message| message.contains("wip") || message.contains("work in progress"))
        .count();
    if count < 5 {
        return None;
    }

    Some(FunFact::new(
        "🚧",
        format!("{count} commits were marked work in progress. Ship it!"),
        FactCategory::Quirky,
    ))
}

fn fix_commits(ctx: &FactContext) -> Option<FunFact> {
    let count = scanned_messages(ctx)
        .filter(|message| message.starts_with("fix"))
        .count();
    if count < 10 {
        return None;
    }

    Some(FunFact::new(
        "🔧",
        format!("{count} of your commit messages started with \"fix\""),
        FactCategory::Quirky,
    ))
}

fn midnight_commits(ctx: &FactContext) -> Option<FunFact> {
    let count = ctx.by_hour.get(0) + ctx.by_hour.get(23);
    if count < 5 {
        return None;
    }

    Some(FunFact::new(
        "🕛",
        format!("{count} commits landed within an hour of midnight"),
        FactCategory::Time,
    ))
}

fn commits_per_active_day(ctx: &FactContext) -> Option<FunFact> {
    if ctx.active_days == 0 {
        return None;
    }

    let average = ctx.total_commits as f64 / ctx.active_days as f64;
    if average < 5.0 {
        return None;
    }

    Some(FunFact::new(
        "🚀",
        format!("You averaged {average:.1} commits on the days you coded"),
        FactCategory::Quirky,
    ))
}
