use crate::classifier::{classify, SuspicionReason};
use crate::config::DetectionConfig;
use crate::error::AppError;
use crate::parser;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// A flagged log line together with how often it appeared
#[derive(Debug, Clone, PartialEq)]
pub struct SuspiciousEntry {
    pub line: String,
    pub reasons: Vec<SuspicionReason>,
    pub occurrences: usize,
}

/// Everything collected during one pass over a log
#[derive(Debug, Default)]
pub struct Analysis {
    /// Flagged lines in first-seen order
    pub entries: Vec<SuspiciousEntry>,
    pub total_lines: usize,
    /// Lines with too few quoted fields to classify
    pub skipped_lines: usize,
    /// Every flagged occurrence, duplicates included
    pub flagged_lines: usize,
}

impl Analysis {
    /// The `n` most repeated entries, most frequent first.
    ///
    /// Equal counts are ordered by their reason names, compared as a list
    /// and descending; entries that still tie keep their first-seen order.
    pub fn top(&self, n: usize) -> Vec<&SuspiciousEntry> {
        let mut ranked: Vec<&SuspiciousEntry> = self.entries.iter().collect();
        ranked.sort_by(|a, b| {
            b.occurrences
                .cmp(&a.occurrences)
                .then_with(|| reason_names(&b.reasons).cmp(&reason_names(&a.reasons)))
        });
        ranked.truncate(n);
        ranked
    }
}

fn reason_names(reasons: &[SuspicionReason]) -> Vec<&'static str> {
    reasons.iter().map(|r| r.as_str()).collect()
}

/// Open `path` and analyze it line by line.
pub fn analyze_file(path: &Path, config: &DetectionConfig) -> Result<Analysis, AppError> {
    let io_err = |source| AppError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(io_err)?;
    analyze(BufReader::new(file), config).map_err(io_err)
}

/// Classify every line of `reader` and keep those with at least
/// `config.min_reasons` reasons.
///
/// Lines are keyed by their trimmed text. A repeated line bumps the count
/// and replaces the stored reasons.
pub fn analyze<R: BufRead>(reader: R, config: &DetectionConfig) -> io::Result<Analysis> {
    let mut analysis = Analysis::default();
    // trimmed line → index into analysis.entries
    let mut index: HashMap<String, usize> = HashMap::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        analysis.total_lines += 1;

        let fields = match parser::extract_fields(&line) {
            Some(f) => f,
            None => {
                analysis.skipped_lines += 1;
                log::debug!("skipping line {}: too few quoted fields", line_num + 1);
                continue;
            }
        };

        let reasons = classify(fields.request_line, fields.user_agent, config);
        if reasons.len() < config.min_reasons {
            continue;
        }

        analysis.flagged_lines += 1;
        let key = line.trim();
        match index.get(key) {
            Some(&i) => {
                let entry = &mut analysis.entries[i];
                entry.occurrences += 1;
                entry.reasons = reasons;
            }
            None => {
                index.insert(key.to_string(), analysis.entries.len());
                analysis.entries.push(SuspiciousEntry {
                    line: key.to_string(),
                    reasons,
                    occurrences: 1,
                });
            }
        }
    }

    log::info!(
        "analyzed {} lines: {} flagged ({} unique), {} skipped",
        analysis.total_lines,
        analysis.flagged_lines,
        analysis.entries.len(),
        analysis.skipped_lines
    );

    Ok(analysis)
}
