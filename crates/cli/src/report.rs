//! Console and CSV rendering of reconciliation reports.

use std::fmt::Write as _;
use std::io::{self, Write};
use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use seasonwatch_core::{
    ProgressCallback, ProgressUpdate, ReconciliationReport, ReconciliationResult,
};

/// Header of the exported CSV.
const CSV_HEADER: [&str; 3] = ["Title", "Season (Local/Available)", "Missing"];

/// Results selected for output.
pub fn selected(
    report: &ReconciliationReport,
    include_complete: bool,
) -> Vec<&ReconciliationResult> {
    report
        .results
        .iter()
        .filter(|r| include_complete || r.needs_attention())
        .collect()
}

/// `3, 5, 8`
pub fn episode_list(episodes: &[u32]) -> String {
    episodes
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Progress bar on stderr for the season lookups.
pub fn progress_bar() -> Result<ProgressBar, indicatif::style::TemplateError> {
    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("[{bar:50}] {percent:>3}% ({pos}/{len}) {elapsed_precise}")?
            .progress_chars("=> "),
    );
    Ok(bar)
}

/// Reconciler callback that moves `bar` to each reported position.
pub fn progress_callback(bar: ProgressBar) -> ProgressCallback {
    Arc::new(move |update: ProgressUpdate| {
        bar.set_length(update.total as u64);
        bar.set_position(update.checked as u64);
    })
}

/// Render selected results as an aligned text table.
pub fn render_table(results: &[&ReconciliationResult]) -> String {
    let headers = ["Title", "Season", "Local/Aired", "Status", "Missing"];
    let rows: Vec<[String; 5]> = results
        .iter()
        .map(|r| {
            [
                r.show_title.clone(),
                r.season_number.to_string(),
                format!("{}/{}", r.local_episode_count, r.aired_count),
                r.status.to_string(),
                episode_list(&r.missing_episodes),
            ]
        })
        .collect();

    let mut widths = headers.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &headers.map(String::from), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("-+-"));
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String; 5], widths: &[usize; 5]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths.iter())
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{}{}", cell, " ".repeat(pad))
        })
        .collect();
    let _ = writeln!(out, "{}", padded.join(" | ").trim_end());
}

/// Write selected results as CSV.
pub fn write_csv<W: Write>(mut writer: W, results: &[&ReconciliationResult]) -> io::Result<()> {
    write_csv_record(&mut writer, &CSV_HEADER)?;
    for r in results {
        let season = format!(
            "{} ({}/{})",
            r.season_number, r.local_episode_count, r.aired_count
        );
        let missing = episode_list(&r.missing_episodes);
        write_csv_record(&mut writer, &[r.show_title.as_str(), &season, &missing])?;
    }
    writer.flush()
}

fn write_csv_record<W: Write>(writer: &mut W, fields: &[&str]) -> io::Result<()> {
    let line: Vec<String> = fields.iter().map(|f| csv_field(f)).collect();
    writer.write_all(line.join(",").as_bytes())?;
    writer.write_all(b"\r\n")
}

/// Quote a field when it contains a delimiter, quote or line break.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seasonwatch_core::{ReconciliationResult, SeasonStatus};

    fn result(
        title: &str,
        season: u32,
        local: u32,
        aired: u32,
        missing: Vec<u32>,
    ) -> ReconciliationResult {
        ReconciliationResult {
            show_title: title.to_string(),
            series_id: 1,
            season_number: season,
            local_episode_count: local,
            aired_count: aired,
            status: if local == aired {
                SeasonStatus::Complete
            } else {
                SeasonStatus::Incomplete
            },
            missing_episodes: missing,
            extra_episodes: vec![],
            total_watch_count: 0,
        }
    }

    #[test]
    fn test_csv_output() {
        let a = result("Show A", 1, 3, 5, vec![3, 5]);
        let b = result("Law & Order, SVU", 2, 1, 2, vec![2]);

        let mut out = Vec::new();
        write_csv(&mut out, &[&a, &b]).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(
            text,
            "Title,Season (Local/Available),Missing\r\n\
             Show A,1 (3/5),\"3, 5\"\r\n\
             \"Law & Order, SVU\",2 (1/2),2\r\n"
        );
    }

    #[test]
    fn test_csv_field_quoting() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("The \"Office\""), "\"The \"\"Office\"\"\"");
        assert_eq!(csv_field("a\nb"), "\"a\nb\"");
    }

    #[test]
    fn test_selected_filters_complete_seasons() {
        let report = ReconciliationReport {
            results: vec![
                result("Show A", 1, 3, 3, vec![]),
                result("Show A", 2, 1, 3, vec![2, 3]),
            ],
            total_seasons: 2,
            checked_seasons: 2,
            ..Default::default()
        };

        assert_eq!(selected(&report, false).len(), 1);
        assert_eq!(selected(&report, true).len(), 2);
    }

    #[test]
    fn test_table_alignment() {
        let a = result("Show A", 1, 3, 5, vec![3, 5]);
        let b = result("A Much Longer Title", 10, 1, 2, vec![2]);
        let table = render_table(&[&a, &b]);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Title               | Season |"));
        assert!(lines[2].starts_with("Show A              | 1      | 3/5"));
        assert!(lines[2].ends_with("3, 5"));
    }

    #[test]
    fn test_progress_callback_drives_bar() {
        let bar = ProgressBar::hidden();
        let callback = progress_callback(bar.clone());

        callback(ProgressUpdate {
            checked: 1,
            total: 4,
            percent: 25,
        });
        assert_eq!(bar.length(), Some(4));
        assert_eq!(bar.position(), 1);

        callback(ProgressUpdate {
            checked: 4,
            total: 4,
            percent: 100,
        });
        assert_eq!(bar.position(), 4);
    }

    #[test]
    fn test_progress_bar_template_is_valid() {
        assert!(progress_bar().is_ok());
    }
}
