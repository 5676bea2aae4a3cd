use crate::render::{
    addition_percentage, comparison_message, format_change, format_day, format_hour,
    format_number, medal, top_languages, top_repos,
};
use crate::stats::{HeatmapData, WrappedReport};
use std::fmt::Write;

const STYLE: &str = r#"
    * { box-sizing: border-box; margin: 0; padding: 0; }
    body {
      font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Helvetica, Arial, sans-serif;
      background: #0d1117;
      color: #e6edf3;
      display: flex;
      justify-content: center;
      padding: 40px 16px;
    }
    .card {
      width: 100%;
      max-width: 860px;
      background: #161b22;
      border: 1px solid #30363d;
      border-radius: 16px;
      padding: 32px;
    }
    header { display: flex; align-items: center; gap: 16px; margin-bottom: 24px; }
    header img { width: 64px; height: 64px; border-radius: 50%; }
    h1 { font-size: 28px; }
    h2 { font-size: 18px; margin: 28px 0 12px; color: #8b949e; }
    .subtitle { color: #8b949e; }
    .stats { display: grid; grid-template-columns: repeat(auto-fit, minmax(130px, 1fr)); gap: 12px; }
    .stat { background: #0d1117; border-radius: 12px; padding: 16px; text-align: center; }
    .stat-value { font-size: 26px; font-weight: 700; color: #39d353; }
    .stat-label { font-size: 12px; color: #8b949e; text-transform: uppercase; }
    .bar { display: flex; height: 12px; border-radius: 6px; overflow: hidden; background: #30363d; }
    .bar-add { background: #2ea043; }
    .bar-del { background: #da3633; }
    .lang { display: flex; align-items: center; gap: 12px; margin: 6px 0; }
    .lang-name { width: 120px; }
    .lang-bar { height: 8px; border-radius: 4px; background: #58a6ff; }
    .repo { padding: 8px 0; border-bottom: 1px solid #21262d; }
    .personality { background: #0d1117; border-radius: 12px; padding: 20px; text-align: center; }
    .personality-emoji { font-size: 40px; }
    .personality-title { font-size: 22px; font-weight: 700; margin: 8px 0; }
    .heatmap { display: flex; gap: 3px; overflow-x: auto; }
    .heatmap-week { display: flex; flex-direction: column; gap: 3px; }
    .heatmap-day { width: 11px; height: 11px; border-radius: 2px; }
    .heatmap-level-0 { background: #161b22; outline: 1px solid #21262d; }
    .heatmap-level-1 { background: #0e4429; }
    .heatmap-level-2 { background: #006d32; }
    .heatmap-level-3 { background: #26a641; }
    .heatmap-level-4 { background: #39d353; }
    table { width: 100%; border-collapse: collapse; }
    td, th { padding: 6px 8px; text-align: right; border-bottom: 1px solid #21262d; }
    td:first-child, th:first-child { text-align: left; }
    .up { color: #3fb950; }
    .down { color: #f85149; }
    ul { list-style: none; }
    li { margin: 6px 0; }
    footer { margin-top: 32px; text-align: center; color: #8b949e; font-size: 12px; }
"#;

/// Escape text for HTML element content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Render the report as a standalone HTML page
pub fn render(report: &WrappedReport) -> String {
    let user = escape_html(&report.username);
    let mut body = String::new();

    body.push_str("<header>");
    if let Some(avatar) = &report.avatar_url {
        let _ = write!(body, r#"<img src="{}" alt="{}">"#, escape_html(avatar), user);
    }
    let _ = write!(
        body,
        r#"<div><h1>🎁 Git Wrapped {}</h1><p class="subtitle">@{}'s year in review"#,
        report.year, user
    );
    if let Some(scope) = &report.repo_scope {
        let _ = write!(body, " in {}", escape_html(scope));
    }
    body.push_str("</p></div></header>\n");

    stats_grid(&mut body, report);
    code_changes(&mut body, report);
    languages(&mut body, report);
    repositories(&mut body, report);

    let personality = report.personality;
    let _ = write!(
        body,
        r#"<h2>Developer personality</h2><div class="personality {}"><div class="personality-emoji">{}</div><div class="personality-title">{}</div><p>{}</p></div>
"#,
        personality.slug(),
        personality.emoji(),
        personality.title(),
        personality.description()
    );

    highlights(&mut body, report);
    heatmap(&mut body, &report.heatmap);
    comparison(&mut body, report);

    if !report.fun_facts.is_empty() {
        body.push_str("<h2>Fun facts</h2><ul>");
        for fact in &report.fun_facts {
            let _ = write!(body, "<li>{} {}</li>", fact.emoji, escape_html(&fact.text));
        }
        body.push_str("</ul>\n");
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Git Wrapped {year}: @{user}</title>
  <style>{style}</style>
</head>
<body>
<div class="card">
{body}<footer>Generated by git-wrapped</footer>
</div>
</body>
</html>
"#,
        year = report.year,
        user = user,
        style = STYLE,
        body = body
    )
}

fn stats_grid(body: &mut String, report: &WrappedReport) {
    let stats = [
        ("Commits", format_number(report.total_commits)),
        ("Pull requests", format_number(report.total_prs)),
        ("Issues", format_number(report.total_issues)),
        ("Reviews", format_number(report.total_reviews)),
        ("Repositories", report.repo_count.to_string()),
        ("Longest streak", format!("{}d", report.streak.longest)),
    ];

    body.push_str(r#"<div class="stats">"#);
    for (label, value) in stats {
        let _ = write!(
            body,
            r#"<div class="stat"><div class="stat-value">{}</div><div class="stat-label">{}</div></div>"#,
            value, label
        );
    }
    body.push_str("</div>\n");
}

fn code_changes(body: &mut String, report: &WrappedReport) {
    let add_pct = addition_percentage(report);
    let _ = write!(
        body,
        r#"<h2>Code changes</h2><p><span class="up">+{}</span> / <span class="down">-{}</span> lines</p>
<div class="bar"><div class="bar-add" style="width: {}%"></div><div class="bar-del" style="width: {}%"></div></div>
"#,
        format_number(report.total_additions),
        format_number(report.total_deletions),
        add_pct,
        100 - add_pct
    );
}

fn languages(body: &mut String, report: &WrappedReport) {
    let top = top_languages(report, 5);
    if top.is_empty() {
        return;
    }

    body.push_str("<h2>Languages</h2>");
    for (language, pct) in top {
        let _ = write!(
            body,
            r#"<div class="lang"><span class="lang-name">{}</span><div class="lang-bar" style="width: {}%"></div><span>{}%</span></div>"#,
            escape_html(&language.language),
            pct.max(1),
            pct
        );
    }
    body.push('\n');
}

fn repositories(body: &mut String, report: &WrappedReport) {
    let top = top_repos(report, 3);
    if top.is_empty() {
        return;
    }

    body.push_str("<h2>Top repositories</h2>");
    for (i, repo) in top.iter().enumerate() {
        let _ = write!(
            body,
            r#"<div class="repo">{} <strong>{}</strong> · {} commits</div>"#,
            medal(i),
            escape_html(&repo.name),
            repo.commits
        );
    }
    body.push('\n');
}

fn highlights(body: &mut String, report: &WrappedReport) {
    let mut items = Vec::new();
    if let Some(day) = &report.most_productive_day {
        items.push(format!("📅 Most productive day: <strong>{}</strong>", escape_html(day)));
    }
    if let Some(hour) = report.most_productive_hour {
        items.push(format!("⏰ Peak coding hour: <strong>{}</strong>", format_hour(hour)));
    }
    if let Some(day) = &report.biggest_day {
        items.push(format!(
            "📈 Biggest day: <strong>{}</strong> with {} commits",
            format_day(day.date),
            day.commits
        ));
    }
    if let Some(deletion) = &report.biggest_deletion {
        items.push(format!(
            "🧹 Deleted <strong>{}</strong> lines on {}",
            format_number(deletion.lines),
            format_day(deletion.date)
        ));
    }
    if let Some(collaborator) = &report.top_collaborator {
        items.push(format!(
            "🤝 Most collaborated with <strong>@{}</strong>",
            escape_html(collaborator)
        ));
    }
    if items.is_empty() {
        return;
    }

    body.push_str("<h2>Highlights</h2><ul>");
    for item in items {
        let _ = write!(body, "<li>{}</li>", item);
    }
    body.push_str("</ul>\n");
}

fn heatmap(body: &mut String, heatmap: &HeatmapData) {
    if heatmap.weeks.is_empty() {
        return;
    }

    body.push_str(r#"<h2>Contributions</h2><div class="heatmap">"#);
    for week in &heatmap.weeks {
        body.push_str(r#"<div class="heatmap-week">"#);
        for day in &week.days {
            let _ = write!(
                body,
                r#"<div class="heatmap-day heatmap-level-{}" title="{}: {} commits"></div>"#,
                day.level.min(4),
                day.date.format("%Y-%m-%d"),
                day.commits
            );
        }
        body.push_str("</div>");
    }
    body.push_str("</div>\n");
}

fn comparison(body: &mut String, report: &WrappedReport) {
    let Some(comparison) = &report.year_comparison else {
        return;
    };
    if comparison.commits.previous == 0 {
        return;
    }

    let _ = write!(
        body,
        "<h2>{} vs {}</h2><table><tr><th></th><th>{}</th><th>{}</th><th></th></tr>",
        comparison.previous_year, report.year, comparison.previous_year, report.year
    );
    let rows = [
        ("Commits", &comparison.commits),
        ("Pull requests", &comparison.prs),
        ("Lines added", &comparison.additions),
        ("Repositories", &comparison.repos),
    ];
    for (label, metric) in rows {
        let class = if metric.change >= 0 { "up" } else { "down" };
        let _ = write!(
            body,
            r#"<tr><td>{}</td><td>{}</td><td>{}</td><td class="{}">{}</td></tr>"#,
            label,
            format_number(metric.previous),
            format_number(metric.current),
            class,
            format_change(metric.change)
        );
    }
    body.push_str("</table>");
    if let Some(message) = comparison_message(comparison.commits.change, report.year) {
        let _ = write!(body, "<p>{}</p>", message);
    }
    body.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::fixtures::{empty_report, populated_report};

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a<b>&\"c'"), "a&lt;b&gt;&amp;&quot;c&#39;");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_user_text_is_escaped() {
        let html = render(&populated_report());
        assert!(html.contains("@octo&lt;cat&gt;"));
        assert!(!html.contains("octo<cat>"));
    }

    #[test]
    fn test_populated_page() {
        let html = render(&populated_report());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("heatmap-day heatmap-level-4"));
        assert!(html.contains(r#"title="2024-03-04: 2 commits""#));
        assert!(html.contains("<h2>2023 vs 2024</h2>"));
        assert!(html.contains("🥇 <strong>octocat/hello</strong>"));
        assert!(html.contains(r#"<img src="https://avatars.example.com/u/1""#));
    }

    #[test]
    fn test_empty_page() {
        let html = render(&empty_report());
        assert!(html.contains("heatmap-day heatmap-level-0"));
        assert!(!html.contains("heatmap-day heatmap-level-4"));
        assert!(!html.contains("Top repositories"));
        assert!(!html.contains("<img"));
        assert!(html.contains(r#"class="personality nine-to-fiver""#));
        assert!(html.ends_with("</html>\n"));
    }
}
