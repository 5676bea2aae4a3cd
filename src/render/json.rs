use crate::error::Result;
use crate::stats::WrappedReport;

/// Pretty-printed JSON of the full report
pub fn render(report: &WrappedReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
