use crate::render::{
    addition_percentage, comparison_message, format_change, format_day, format_hour,
    format_number, hour_emoji, medal, top_languages, top_repos,
};
use crate::stats::time::{weekday_name, WEEKDAYS};
use crate::stats::{HeatmapData, WrappedReport};
use chrono::Datelike;
use std::fmt::Write;

const HEAT_CHARS: [char; 5] = [' ', '░', '▒', '▓', '█'];
const DAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Render the report as GitHub-flavored Markdown
pub fn render(report: &WrappedReport) -> String {
    let mut md = String::new();

    let _ = writeln!(md, "# 🎁 Git Wrapped {}\n", report.year);
    let _ = writeln!(md, "## @{}'s Year in Review\n", report.username);
    if let Some(scope) = &report.repo_scope {
        let _ = writeln!(md, "_Scoped to `{}`_\n", scope);
    }

    overview(&mut md, report);
    code_changes(&mut md, report);
    streaks(&mut md, report);
    when_you_code(&mut md, report);
    languages(&mut md, report);
    repositories(&mut md, report);

    let personality = report.personality;
    let _ = writeln!(md, "### 🎭 Developer Personality\n");
    let _ = writeln!(
        md,
        "> {} **{}**\n>\n> _{}_\n",
        personality.emoji(),
        personality.title(),
        personality.description()
    );

    insights(&mut md, report);
    heatmap(&mut md, &report.heatmap);
    comparison(&mut md, report);

    if !report.fun_facts.is_empty() {
        let _ = writeln!(md, "### 🎲 Fun Facts\n");
        for fact in &report.fun_facts {
            let _ = writeln!(md, "- {} {}", fact.emoji, fact.text);
        }
        md.push('\n');
    }

    md.push_str("---\n\n_Generated by git-wrapped_\n");
    md
}

fn overview(md: &mut String, report: &WrappedReport) {
    let _ = writeln!(md, "### 📊 Overview\n");
    let _ = writeln!(md, "| Metric | Count |");
    let _ = writeln!(md, "|--------|------:|");
    let rows = [
        ("Commits", format_number(report.total_commits)),
        ("Pull Requests", format_number(report.total_prs)),
        ("Issues", format_number(report.total_issues)),
        ("Reviews", format_number(report.total_reviews)),
        ("Repositories", report.repo_count.to_string()),
    ];
    for (label, value) in rows {
        let _ = writeln!(md, "| {} | {} |", label, value);
    }
    md.push('\n');
}

fn code_changes(md: &mut String, report: &WrappedReport) {
    let add_pct = addition_percentage(report) as usize;
    let width = 30;
    let filled = (add_pct * width + 50) / 100;

    let _ = writeln!(md, "### 📝 Code Changes\n");
    let _ = writeln!(md, "- **+{}** lines added", format_number(report.total_additions));
    let _ = writeln!(md, "- **-{}** lines deleted\n", format_number(report.total_deletions));
    let _ = writeln!(
        md,
        "```\n{}{} {}% additions\n```\n",
        "█".repeat(filled),
        "░".repeat(width - filled),
        add_pct
    );
}

fn streaks(md: &mut String, report: &WrappedReport) {
    let _ = writeln!(md, "### 🔥 Streaks\n");
    let _ = writeln!(md, "- Longest streak: **{} days**", report.streak.longest);
    if let (Some(start), Some(end)) = (report.streak.longest_start, report.streak.longest_end) {
        let _ = writeln!(md, "  - {} to {}", format_day(start), format_day(end));
    }
    let _ = writeln!(md, "- Current streak: **{} days**\n", report.streak.current);
}

fn when_you_code(md: &mut String, report: &WrappedReport) {
    let _ = writeln!(md, "### ⏰ When You Code\n");
    let day = report.most_productive_day.as_deref().unwrap_or("n/a");
    let hour = report
        .most_productive_hour
        .map(format_hour)
        .unwrap_or_else(|| "n/a".to_string());
    let _ = writeln!(md, "- Most productive day: **{}**", day);
    let _ = writeln!(md, "- Peak coding hour: **{}**\n", hour);

    let busiest = report.commits_by_day.iter().map(|(_, c)| c).max().unwrap_or(0);
    let _ = writeln!(md, "#### Commits by Day\n\n```");
    // Monday first, Sunday last
    for day in WEEKDAYS.iter().cycle().skip(1).take(7) {
        let count = report.commits_by_day.get(*day);
        let width = if busiest == 0 { 0 } else { (count * 30 / busiest) as usize };
        let _ = writeln!(md, "{} {:<30} {}", &weekday_name(*day)[..3], "█".repeat(width), count);
    }
    let _ = writeln!(md, "```\n");
}

fn languages(md: &mut String, report: &WrappedReport) {
    let top = top_languages(report, 5);
    if top.is_empty() {
        return;
    }

    let _ = writeln!(md, "### 💻 Top Languages\n");
    for (language, pct) in top {
        let _ = writeln!(md, "- **{}** {}%", language.language, pct);
    }
    md.push('\n');
}

fn repositories(md: &mut String, report: &WrappedReport) {
    let top = top_repos(report, 5);
    if top.is_empty() {
        return;
    }

    let _ = writeln!(md, "### 📁 Top Repositories\n");
    for (i, repo) in top.iter().enumerate() {
        let _ = writeln!(
            md,
            "{} **{}** ({} commits, +{} / -{})",
            medal(i),
            repo.name,
            repo.commits,
            format_number(repo.additions),
            format_number(repo.deletions)
        );
        md.push('\n');
    }
}

fn insights(md: &mut String, report: &WrappedReport) {
    let mut lines = Vec::new();
    if let Some(day) = &report.biggest_day {
        lines.push(format!(
            "📈 Most committed day: **{}** with {} commits",
            format_day(day.date),
            day.commits
        ));
    }
    if let Some(deletion) = &report.biggest_deletion {
        lines.push(format!(
            "🧹 Deleted **{}** lines on {} (spring cleaning?)",
            format_number(deletion.lines),
            format_day(deletion.date)
        ));
    }
    if let Some(hour) = report.most_productive_hour {
        lines.push(format!("{} Peak coding hour: **{}**", hour_emoji(hour), format_hour(hour)));
    }
    if let Some(collaborator) = &report.top_collaborator {
        lines.push(format!("🤝 Most collaborated with: **@{}**", collaborator));
    }
    if let Some(language) = &report.top_language {
        lines.push(format!("💝 Top language: **{}**", language));
    }
    if lines.is_empty() {
        return;
    }

    let _ = writeln!(md, "### ✨ Fun Insights\n");
    for line in lines {
        let _ = writeln!(md, "- {}", line);
    }
    md.push('\n');
}

/// ASCII contribution grid with a month header over the week columns
fn heatmap_grid(heatmap: &HeatmapData) -> String {
    let mut grid = String::new();

    // A month is labelled over the week holding its first day
    let year = heatmap
        .weeks
        .get(heatmap.weeks.len() / 2)
        .map(|week| week.days[0].date.year());
    let mut header = vec![' '; heatmap.weeks.len() + 8];
    let mut last_label_end = 0;
    for (col, week) in heatmap.weeks.iter().enumerate() {
        let Some(first) = week
            .days
            .iter()
            .find(|d| d.date.day() == 1 && Some(d.date.year()) == year)
        else {
            continue;
        };
        let start = col + 4;
        if start < last_label_end {
            continue;
        }
        let label = MONTHS[first.date.month0() as usize];
        for (offset, ch) in label.chars().enumerate() {
            header[start + offset] = ch;
        }
        last_label_end = start + label.len() + 1;
    }
    let header: String = header.into_iter().collect();
    let _ = writeln!(grid, "{}", header.trim_end());

    for (row, label) in DAY_LABELS.iter().enumerate() {
        let cells: String = heatmap
            .weeks
            .iter()
            .map(|week| HEAT_CHARS[usize::from(week.days[row].level.min(4))])
            .collect();
        let _ = writeln!(grid, "{} {}", label, cells);
    }
    let _ = writeln!(grid, "\nLess {} More", HEAT_CHARS[1..].iter().collect::<String>());
    grid
}

fn heatmap(md: &mut String, heatmap: &HeatmapData) {
    if heatmap.weeks.is_empty() {
        return;
    }
    let _ = writeln!(md, "### 🗓️ Contribution Heatmap\n");
    let _ = writeln!(md, "```\n{}```\n", heatmap_grid(heatmap));
}

fn comparison(md: &mut String, report: &WrappedReport) {
    let Some(comparison) = &report.year_comparison else {
        return;
    };
    if comparison.commits.previous == 0 {
        return;
    }

    let _ = writeln!(md, "### 📊 {} vs {}\n", comparison.previous_year, report.year);
    let _ = writeln!(md, "| Metric | {} | {} | Change |", comparison.previous_year, report.year);
    let _ = writeln!(md, "|--------|-----:|-----:|-------:|");
    let rows = [
        ("Commits", &comparison.commits),
        ("PRs", &comparison.prs),
        ("Lines Added", &comparison.additions),
        ("Repos", &comparison.repos),
        ("Longest Streak", &comparison.streak),
    ];
    for (label, metric) in rows {
        let _ = writeln!(
            md,
            "| {} | {} | {} | {} |",
            label,
            format_number(metric.previous),
            format_number(metric.current),
            format_change(metric.change)
        );
    }
    md.push('\n');

    if let Some(message) = comparison_message(comparison.commits.change, report.year) {
        let _ = writeln!(md, "{}\n", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::fixtures::{empty_report, populated_report};

    #[test]
    fn test_populated_sections() {
        let md = render(&populated_report());
        assert!(md.starts_with("# 🎁 Git Wrapped 2024\n"));
        assert!(md.contains("## @octo<cat>'s Year in Review"));
        assert!(md.contains("| Pull Requests | 1.2K |"));
        assert!(md.contains("🥇 **octocat/hello** (3 commits"));
        assert!(md.contains("- **Rust** 90%"));
        assert!(md.contains("### 📊 2023 vs 2024"));
        assert!(md.contains("| Commits | 2 | 4 | +100% |"));
        assert!(md.contains("🚀 You coded 100% more in 2024!"));
        assert!(md.contains("Less ░▒▓█ More"));
    }

    #[test]
    fn test_empty_report_uses_placeholders() {
        let md = render(&empty_report());
        assert!(md.contains("Most productive day: **n/a**"));
        assert!(md.contains("Peak coding hour: **n/a**"));
        assert!(!md.contains("Top Languages"));
        assert!(!md.contains("Top Repositories"));
        assert!(!md.contains(" vs 2024"));
        assert!(md.ends_with("_Generated by git-wrapped_\n"));
    }

    #[test]
    fn test_heatmap_grid_shape() {
        let report = populated_report();
        let grid = heatmap_grid(&report.heatmap);
        let lines: Vec<&str> = grid.lines().collect();

        assert!(lines[0].trim_start().starts_with("Jan"));
        assert!(lines[0].contains("Dec"));
        for (row, label) in DAY_LABELS.iter().enumerate() {
            let line = lines[row + 1];
            assert!(line.starts_with(label));
            assert_eq!(line.chars().count(), 4 + report.heatmap.weeks.len());
        }
        // The busiest day is drawn at full intensity
        assert!(grid.contains('█'));
    }

    #[test]
    fn test_month_labels_align_with_weeks() {
        let report = populated_report();
        let grid = heatmap_grid(&report.heatmap);
        let header: Vec<char> = grid.lines().next().unwrap().chars().collect();

        let march_week = report
            .heatmap
            .weeks
            .iter()
            .position(|w| w.days.iter().any(|d| d.date.month() == 3 && d.date.day() == 1))
            .unwrap();
        let label: String = header[march_week + 4..march_week + 7].iter().collect();
        assert_eq!(label, "Mar");
    }
}
