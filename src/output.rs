//! Terminal rendering for dashboard views.
//!
//! Supports a plain-text layout and pretty-printed JSON.

use std::io::Write;

use anyhow::Result;
use tracing::debug;

use crate::dashboard::DashboardView;

const BAR_WIDTH: usize = 20;

/// Draws a fixed-width progress bar for a 0..=100 value.
pub fn progress_bar(percent: u8) -> String {
    let filled = (percent.min(100) as usize * BAR_WIDTH) / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

/// Formats the full dashboard as plain text.
pub fn render_text(view: &DashboardView) -> String {
    let name_width = view.rows.iter().map(|r| r.name.len()).max().unwrap_or(0);

    let mut out = String::new();
    out.push_str(&format!("Floor Breakdown ({})\n", view.updated));

    for row in &view.rows {
        out.push_str(&format!(
            "  {:<width$}  {} {:>3}%  {}\n",
            row.name,
            progress_bar(row.progress),
            row.progress,
            row.status.unwrap_or("no reports"),
            width = name_width
        ));
    }

    out.push_str("\nRecommendation\n");
    out.push_str(&format!("  For Solo People: {}\n", view.solo));
    out.push_str(&format!("  For Groups: {}\n", view.group));

    if !view.contributors.is_empty() {
        out.push_str(&format!("\nThanks to {}\n", view.contributors.join(", ")));
    }

    if let Some(notice) = &view.notice {
        out.push_str(&format!("\n! {notice}\n"));
    }

    out
}

/// Writes `view` to `writer` as text or pretty JSON.
pub fn write_view<W: Write>(writer: &mut W, view: &DashboardView, json: bool) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *writer, view)?;
        writeln!(writer)?;
    } else {
        write!(writer, "{}", render_text(view))?;
    }
    writer.flush()?;
    debug!(json, rows = view.rows.len(), "Rendered dashboard");
    Ok(())
}
