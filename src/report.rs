use crate::analyzer::Analysis;
use crate::classifier::SuspicionReason;
use crate::error::AppError;
use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const SEPARATOR: &str =
    "════════════════════════════════════════════════════════════════════";
const THIN_SEP: &str =
    "────────────────────────────────────────────────────────────────────";

/// A ranked entry of the final report
#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry {
    pub rank: usize,
    pub line: String,
    pub occurrences: usize,
    pub reasons: Vec<SuspicionReason>,
}

/// The complete report output
#[derive(Debug, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub source: PathBuf,
    pub total_lines: usize,
    pub skipped_lines: usize,
    pub flagged_lines: usize,
    pub unique_flagged: usize,
    pub top_n: usize,
    pub entries: Vec<ReportEntry>,
}

impl Report {
    /// Rank the analysis and keep the `top_n` most repeated lines
    pub fn build(analysis: &Analysis, top_n: usize, source: &Path) -> Self {
        let entries = analysis
            .top(top_n)
            .into_iter()
            .enumerate()
            .map(|(i, entry)| ReportEntry {
                rank: i + 1,
                line: entry.line.clone(),
                occurrences: entry.occurrences,
                reasons: entry.reasons.clone(),
            })
            .collect();

        Report {
            generated_at: Utc::now(),
            source: source.to_path_buf(),
            total_lines: analysis.total_lines,
            skipped_lines: analysis.skipped_lines,
            flagged_lines: analysis.flagged_lines,
            unique_flagged: analysis.entries.len(),
            top_n,
            entries,
        }
    }

    /// The plain-text report: a header followed by `<line> - <reasons>` rows
    pub fn lines(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.entries.len() + 1);
        out.push(format!("Top-{} suspicious requests:", self.top_n));
        for entry in &self.entries {
            out.push(format!("{} - {}", entry.line, join_reasons(&entry.reasons)));
        }
        out
    }
}

/// Destination for report text, one line at a time
pub trait LineSink {
    fn write_line(&mut self, line: &str) -> io::Result<()>;

    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Adapts any `io::Write` into a `LineSink`, appending `\n` to each line
pub struct TextSink<W: Write> {
    inner: W,
}

impl<W: Write> TextSink<W> {
    pub fn new(inner: W) -> Self {
        TextSink { inner }
    }
}

impl<W: Write> LineSink for TextSink<W> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.inner, "{}", line)
    }

    fn finish(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl LineSink for Vec<String> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.push(line.to_string());
        Ok(())
    }
}

/// Write the plain-text report to `sink`
pub fn write_report<S: LineSink + ?Sized>(report: &Report, sink: &mut S) -> io::Result<()> {
    for line in report.lines() {
        sink.write_line(&line)?;
    }
    sink.finish()
}

/// Create (or truncate) `path` and write the plain-text report into it
pub fn write_report_file(report: &Report, path: &Path) -> Result<(), AppError> {
    let io_err = |source| AppError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = std::fs::File::create(path).map_err(io_err)?;
    let mut sink = TextSink::new(io::BufWriter::new(file));
    write_report(report, &mut sink).map_err(io_err)
}

/// Export the report as JSON to the given path
pub fn export_json(report: &Report, path: &Path) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Print a formatted summary of the report to stdout
pub fn print_summary(report: &Report) {
    println!("\n{}", SEPARATOR.cyan().bold());
    println!("{}", "  🔎  SUSPICIOUS REQUEST REPORT".white().bold());
    println!("{}", SEPARATOR.cyan().bold());
    println!("  Source : {}", report.source.display().to_string().yellow());
    println!();

    // ── Overview ──────────────────────────────────────────────────────────────
    section_header("OVERVIEW");
    let width = report.total_lines.to_string().len().max(6);
    println!(
        "  {:<28} {:>width$}",
        "Lines read:",
        report.total_lines.to_string().green().bold(),
        width = width
    );
    println!(
        "  {:<28} {:>width$}",
        "Malformed / skipped lines:",
        if report.skipped_lines > 0 {
            report.skipped_lines.to_string().yellow().bold()
        } else {
            "0".normal()
        },
        width = width
    );
    println!(
        "  {:<28} {:>width$}",
        "Flagged requests:",
        report.flagged_lines.to_string().red().bold(),
        width = width
    );
    println!(
        "  {:<28} {:>width$}",
        "Unique flagged lines:",
        report.unique_flagged,
        width = width
    );
    println!();

    // ── Top N ────────────────────────────────────────────────────────────────
    section_header(&format!("TOP {} SUSPICIOUS REQUESTS", report.top_n));
    if report.entries.is_empty() {
        println!("  {} No suspicious requests found.", "✓".green());
    } else {
        println!("  {:<3}  {:>5}  {}", "#", "Count", "Request / Reasons");
        println!("  {}", &THIN_SEP[..60]);
        for entry in &report.entries {
            println!(
                "  {:<3}  {:>5}  {}",
                entry.rank.to_string().dimmed(),
                entry.occurrences,
                truncate(&entry.line, 100).cyan()
            );
            println!("  {:<3}  {:>5}  {}", "", "", join_reasons(&entry.reasons).red());
        }
    }

    println!("\n{}\n", SEPARATOR.cyan());
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn section_header(title: &str) {
    println!("  {} {}", "▶".cyan(), title.white().bold());
    println!("  {}", THIN_SEP);
}

fn join_reasons(reasons: &[SuspicionReason]) -> String {
    reasons
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Shorten to `max` characters, marking the cut with an ellipsis
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let head: String = s.chars().take(max - 1).collect();
        format!("{}…", head)
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::SuspiciousEntry;
    use crate::classifier::SuspicionReason::*;

    fn entry(line: &str, occurrences: usize, reasons: Vec<SuspicionReason>) -> SuspiciousEntry {
        SuspiciousEntry {
            line: line.to_string(),
            reasons,
            occurrences,
        }
    }

    fn sample_analysis() -> Analysis {
        Analysis {
            entries: vec![
                entry("line-a", 1, vec![SuspiciousKeywordInUrl, SuspiciousUserAgent]),
                entry("line-b", 3, vec![SuspiciousHttpMethod, SuspiciousUserAgent]),
                entry("line-c", 1, vec![SuspiciousKeywordInUrl, LongParametersInUrl]),
            ],
            total_lines: 10,
            skipped_lines: 2,
            flagged_lines: 5,
        }
    }

    #[test]
    fn lines_have_header_and_ranked_rows() {
        let report = Report::build(&sample_analysis(), 20, Path::new("access.log"));
        assert_eq!(
            report.lines(),
            vec![
                "Top-20 suspicious requests:",
                "line-b - suspicious_http_method, suspicious_user_agent",
                "line-a - suspicious_keyword_in_url, suspicious_user_agent",
                "line-c - suspicious_keyword_in_url, long_parameters_in_url",
            ]
        );
    }

    #[test]
    fn build_truncates_to_top_n() {
        let report = Report::build(&sample_analysis(), 2, Path::new("access.log"));
        assert_eq!(report.entries.len(), 2);
        assert_eq!(report.entries[0].rank, 1);
        assert_eq!(report.entries[0].line, "line-b");
        assert_eq!(report.entries[1].line, "line-a");
        assert_eq!(report.unique_flagged, 3);
        assert_eq!(report.lines()[0], "Top-2 suspicious requests:");
    }

    #[test]
    fn empty_analysis_writes_only_header() {
        let report = Report::build(&Analysis::default(), 20, Path::new("access.log"));
        let mut sink: Vec<String> = Vec::new();
        write_report(&report, &mut sink).unwrap();
        assert_eq!(sink, vec!["Top-20 suspicious requests:"]);
    }

    #[test]
    fn text_sink_writes_newline_terminated_lines() {
        let report = Report::build(&sample_analysis(), 1, Path::new("access.log"));
        let mut sink = TextSink::new(Vec::new());
        write_report(&report, &mut sink).unwrap();
        let text = String::from_utf8(sink.inner).unwrap();
        assert_eq!(
            text,
            "Top-1 suspicious requests:\nline-b - suspicious_http_method, suspicious_user_agent\n"
        );
    }

    #[test]
    fn report_file_is_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("suspicious_requests.log");
        std::fs::write(&path, "stale contents\n").unwrap();

        let report = Report::build(&sample_analysis(), 20, Path::new("access.log"));
        write_report_file(&report, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Top-20 suspicious requests:\n"));
        assert!(!text.contains("stale"));
        assert_eq!(text.lines().count(), 4);
    }

    #[test]
    fn unwritable_report_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("out.log");
        let report = Report::build(&sample_analysis(), 20, Path::new("access.log"));
        assert!(matches!(
            write_report_file(&report, &path),
            Err(AppError::Io { .. })
        ));
    }

    #[test]
    fn exports_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let report = Report::build(&sample_analysis(), 20, Path::new("access.log"));
        export_json(&report, &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["total_lines"], 10);
        assert_eq!(value["entries"][0]["line"], "line-b");
        assert_eq!(value["entries"][0]["occurrences"], 3);
        assert_eq!(value["entries"][0]["reasons"][0], "suspicious_http_method");
    }

    #[test]
    fn truncate_marks_cut() {
        assert_eq!(truncate("abcdef", 10), "abcdef");
        assert_eq!(truncate("abcdef", 4), "abc…");
    }
}
