use crate::render::{
    addition_percentage, comparison_message, format_change, format_day, format_hour,
    format_number, hour_emoji, medal, top_languages, top_repos,
};
use crate::stats::time::{weekday_name, WEEKDAYS};
use crate::stats::WrappedReport;
use crossterm::style::{Color, Stylize};

const BAR_WIDTH: usize = 40;
const SPARK: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const LANGUAGE_COLORS: [Color; 5] = [
    Color::Yellow,
    Color::Blue,
    Color::Cyan,
    Color::DarkYellow,
    Color::Magenta,
];

/// Applies styles only when color is enabled
#[derive(Clone, Copy)]
struct Painter {
    color: bool,
}

impl Painter {
    fn fg(&self, text: &str, color: Color) -> String {
        if self.color {
            text.with(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.color {
            text.dim().to_string()
        } else {
            text.to_string()
        }
    }

    fn italic(&self, text: &str) -> String {
        if self.color {
            text.italic().to_string()
        } else {
            text.to_string()
        }
    }

    fn section(&self, out: &mut Vec<String>, title: &str, color: Color, body: Vec<String>) {
        out.push(self.fg(&format!("  ╭─ {} ", title), color));
        for line in body {
            out.push(format!("{} {}", self.fg("  │", color), line));
        }
        out.push(self.fg("  ╰─", color));
        out.push(String::new());
    }
}

/// Render the report for a terminal
pub fn render(report: &WrappedReport, color: bool) -> String {
    let p = Painter { color };
    let mut out = Vec::new();

    out.push(String::new());
    out.push(p.bold(&p.fg(
        &format!("  🎁 Git Wrapped {}: @{}", report.year, report.username),
        Color::Cyan,
    )));
    if let Some(scope) = &report.repo_scope {
        out.push(p.dim(&format!("     {}", scope)));
    }
    out.push(String::new());

    p.section(&mut out, "📊 Stats", Color::Green, main_stats(report, p));
    p.section(&mut out, "📝 Code Changes", Color::Magenta, code_changes(report, p));
    p.section(&mut out, "⏰ When You Code", Color::Yellow, time_analysis(report, p));
    p.section(&mut out, "💻 Languages", Color::Blue, languages(report, p));
    p.section(&mut out, "📁 Top Repositories", Color::Cyan, repositories(report, p));

    let personality = report.personality;
    p.section(
        &mut out,
        "🎭 Your Developer Personality",
        Color::Magenta,
        vec![
            format!("{} {}", personality.emoji(), p.bold(personality.title())),
            p.italic(personality.description()),
        ],
    );

    p.section(&mut out, "✨ Fun Insights", Color::Yellow, insights(report, p));

    if let Some(lines) = comparison(report, p) {
        let title = match &report.year_comparison {
            Some(c) => format!("📊 {} vs {}", c.previous_year, report.year),
            None => "📊 Year over year".to_string(),
        };
        p.section(&mut out, &title, Color::Green, lines);
    }

    if !report.fun_facts.is_empty() {
        let facts = report
            .fun_facts
            .iter()
            .map(|fact| format!("{} {}", fact.emoji, fact.text))
            .collect();
        p.section(&mut out, "🎲 Fun Facts", Color::Cyan, facts);
    }

    out.push(p.dim("  Generated by git-wrapped"));
    out.push(String::new());
    out.join("\n")
}

fn main_stats(report: &WrappedReport, p: Painter) -> Vec<String> {
    let mut lines = vec![
        format!("{} {} commits", p.fg("●", Color::Green), p.bold(&format_number(report.total_commits))),
        format!("{} {} pull requests", p.fg("●", Color::Blue), p.bold(&format_number(report.total_prs))),
        format!("{} {} issues", p.fg("●", Color::Yellow), p.bold(&format_number(report.total_issues))),
        format!("{} {} reviews", p.fg("●", Color::Magenta), p.bold(&format_number(report.total_reviews))),
        format!("{} {} repositories", p.fg("●", Color::Cyan), p.bold(&report.repo_count.to_string())),
    ];

    if report.streak.longest > 0 {
        lines.push(String::new());
        lines.push(format!(
            "🔥 Longest streak: {} days",
            p.bold(&report.streak.longest.to_string())
        ));
        if report.streak.current > 0 {
            lines.push(format!(
                "   Current streak: {} days",
                p.bold(&report.streak.current.to_string())
            ));
        }
    }

    lines
}

fn code_changes(report: &WrappedReport, p: Painter) -> Vec<String> {
    let add_pct = addition_percentage(report) as usize;
    let add_width = (add_pct * BAR_WIDTH + 50) / 100;

    vec![
        format!("{} {} lines added", p.fg("+", Color::Green), format_number(report.total_additions)),
        format!("{} {} lines deleted", p.fg("-", Color::Red), format_number(report.total_deletions)),
        String::new(),
        format!(
            "{}{}",
            p.fg(&"█".repeat(add_width), Color::Green),
            p.fg(&"█".repeat(BAR_WIDTH - add_width), Color::Red)
        ),
        p.dim(&format!("{}% additions, {}% deletions", add_pct, 100 - add_pct)),
    ]
}

fn time_analysis(report: &WrappedReport, p: Painter) -> Vec<String> {
    let mut lines = Vec::new();

    match &report.most_productive_day {
        Some(day) => lines.push(format!("📅 Most productive day: {}", p.bold(day))),
        None => lines.push(p.dim("No commits this year")),
    }
    if let Some(hour) = report.most_productive_hour {
        lines.push(format!("⏰ Peak coding hour: {}", p.bold(&format_hour(hour))));
    }

    lines.push(String::new());
    lines.push(p.dim("Hour distribution:"));
    let counts = report.commits_by_hour.counts();
    let max = counts.iter().copied().max().unwrap_or(0);
    let sparkline: String = counts
        .iter()
        .enumerate()
        .map(|(hour, &count)| {
            let level = if max == 0 {
                0
            } else {
                ((count * 8 / max) as usize).min(7)
            };
            let glyph = SPARK[level].to_string();
            let color = match hour as u32 {
                h if Some(h) == report.most_productive_hour => Color::Yellow,
                22..=23 | 0..=5 => Color::Blue,
                9..=16 => Color::Green,
                _ => Color::Cyan,
            };
            p.fg(&glyph, color)
        })
        .collect();
    lines.push(sparkline);
    lines.push(p.dim("12a      6a      12p     6p"));

    lines.push(String::new());
    let busiest = report.commits_by_day.iter().map(|(_, c)| c).max().unwrap_or(0);
    for day in WEEKDAYS {
        let count = report.commits_by_day.get(day);
        let width = if busiest == 0 { 0 } else { (count * 20 / busiest) as usize };
        lines.push(format!(
            "{} {} {}",
            &weekday_name(day)[..3],
            p.fg(&"■".repeat(width), Color::Green),
            p.dim(&count.to_string())
        ));
    }

    lines
}

fn languages(report: &WrappedReport, p: Painter) -> Vec<String> {
    let top = top_languages(report, 5);
    if top.is_empty() {
        return vec![p.dim("No language data available")];
    }

    top.iter()
        .enumerate()
        .map(|(i, (language, pct))| {
            let width = ((*pct as usize * 30 + 50) / 100).max(1);
            format!(
                "{} {} {}",
                p.fg(&"█".repeat(width), LANGUAGE_COLORS[i % LANGUAGE_COLORS.len()]),
                p.bold(&language.language),
                p.dim(&format!("{}%", pct))
            )
        })
        .collect()
}

fn repositories(report: &WrappedReport, p: Painter) -> Vec<String> {
    let top = top_repos(report, 5);
    if top.is_empty() {
        return vec![p.dim("No repositories with commits")];
    }

    top.iter()
        .enumerate()
        .map(|(i, repo)| {
            format!(
                "{} {} {}",
                medal(i),
                p.bold(&repo.name),
                p.dim(&format!("({} commits)", repo.commits))
            )
        })
        .collect()
}

fn insights(report: &WrappedReport, p: Painter) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(day) = &report.biggest_day {
        lines.push(format!(
            "📈 Your most committed day was {} with {} commits!",
            p.bold(&format_day(day.date)),
            p.bold(&day.commits.to_string())
        ));
    }
    if let Some(deletion) = &report.biggest_deletion {
        lines.push(format!(
            "🧹 You mass-deleted {} lines on {} (spring cleaning?)",
            p.bold(&format_number(deletion.lines)),
            format_day(deletion.date)
        ));
    }
    if let Some(hour) = report.most_productive_hour {
        lines.push(format!(
            "{} Peak coding hour: {}",
            hour_emoji(hour),
            p.bold(&format_hour(hour))
        ));
    }
    if let Some(collaborator) = &report.top_collaborator {
        lines.push(format!(
            "🤝 Most collaborated with: {}",
            p.bold(&format!("@{}", collaborator))
        ));
    }
    if let Some(language) = &report.top_language {
        lines.push(format!("💝 Your top language: {}", p.bold(language)));
    }

    if lines.is_empty() {
        lines.push(p.dim("Nothing to report yet. Go write some code!"));
    }
    lines
}

fn comparison(report: &WrappedReport, p: Painter) -> Option<Vec<String>> {
    let comparison = report.year_comparison.as_ref()?;

    let row = |label: &str, previous: u64, current: u64, change: i64| {
        let color = if change >= 0 { Color::Green } else { Color::Red };
        format!(
            "{:<14} {:>7} → {:<7} {}",
            label,
            format_number(previous),
            format_number(current),
            p.fg(&format_change(change), color)
        )
    };

    let mut lines = vec![
        row("Commits", comparison.commits.previous, comparison.commits.current, comparison.commits.change),
        row("Pull requests", comparison.prs.previous, comparison.prs.current, comparison.prs.change),
        row("Lines added", comparison.additions.previous, comparison.additions.current, comparison.additions.change),
        row("Repositories", comparison.repos.previous, comparison.repos.current, comparison.repos.change),
        row("Longest streak", comparison.streak.previous, comparison.streak.current, comparison.streak.change),
    ];
    if let Some(message) = comparison_message(comparison.commits.change, report.year) {
        lines.push(String::new());
        lines.push(message);
    }

    Some(lines)
}
