//! Per-file conversion driver, multi-document combiner, and the
//! duplicate-file ledger.
//!
//! Files are processed strictly sequentially, in input order: the
//! combiner's header-from-first-file and separator logic depends on
//! ordering, and the ledger must be consulted then updated serially.
//!
//! Two output modes:
//! - per-file ([`convert_all`]): each file resolves to its own
//!   [`ConversionResult`]; one bad file does not disturb its siblings.
//! - combined ([`combine`]): one CSV for the whole batch; any bad file
//!   fails the batch with a single aggregate error.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::core::{ConversionResult, ConvertError};
use crate::csv::{is_blank_row, to_csv};
use crate::dom::parse_document;
use crate::order::{ExtractOptions, OrderField, convert_order, extract_rows};

/// Upper bound on batch size, enforced by the file-selection layer rather
/// than the engine itself.
pub const MAX_BATCH_FILES: usize = 360;

/// One raw input file: name plus full XML text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub contents: String,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }

    /// Byte size of the contents; the ledger keys on (name, size).
    pub fn size(&self) -> u64 {
        self.contents.len() as u64
    }
}

/// Options for combined-mode conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombineOptions {
    /// Fields to emit, in column order.
    pub selection: Vec<OrderField>,
    /// Fixed-schema extraction settings shared by every file.
    pub extract: ExtractOptions,
    /// Fully-blank separator rows between consecutive files' data.
    pub separator_rows: usize,
}

impl Default for CombineOptions {
    fn default() -> Self {
        Self {
            selection: OrderField::ALL.to_vec(),
            extract: ExtractOptions::default(),
            separator_rows: 2,
        }
    }
}

/// Convert one file, resolving its [`ConversionResult`] in place.
///
/// Never returns an error: parse failures resolve the result as
/// [`ConversionStatus::Error`](crate::core::ConversionStatus::Error) with
/// the message attached.
pub fn convert_file(
    file: &SourceFile,
    selection: &[OrderField],
    options: &ExtractOptions,
) -> ConversionResult {
    let mut result = ConversionResult::processing(&file.name);
    match convert_order(&file.contents, selection, options) {
        Ok(csv) => {
            // Header line excluded from the count
            let row_count = csv.lines().count().saturating_sub(1);
            result.succeed(csv, row_count);
        }
        Err(err) => result.fail(err.for_file(&file.name).to_string()),
    }
    result
}

/// Convert every file sequentially, in input order. Per-file failures are
/// recorded in the corresponding result and do not abort the rest.
pub fn convert_all(
    files: &[SourceFile],
    selection: &[OrderField],
    options: &ExtractOptions,
) -> Vec<ConversionResult> {
    files
        .iter()
        .map(|file| convert_file(file, selection, options))
        .collect()
}

/// Combine a batch of order documents into one CSV.
///
/// The header row comes from the first file only (every file shares the
/// selection, so subsequent headers are redundant and discarded). Between
/// consecutive files' data, [`CombineOptions::separator_rows`] fully-blank
/// rows are inserted; trailing blank rows are stripped from the final
/// table. Interior separators survive.
///
/// Any malformed constituent fails the whole batch with one aggregate
/// error naming the file — combined output is never partial.
pub fn combine(files: &[SourceFile], options: &CombineOptions) -> Result<String, ConvertError> {
    let columns = options.selection.len();
    let headers: Vec<String> = options
        .selection
        .iter()
        .map(|f| f.column_name().to_string())
        .collect();

    let mut rows: Vec<Vec<String>> = Vec::new();
    for (i, file) in files.iter().enumerate() {
        let doc = parse_document(&file.contents).map_err(|err| ConvertError::Batch {
            file: file.name.clone(),
            message: err.to_string(),
        })?;
        if i > 0 {
            for _ in 0..options.separator_rows {
                rows.push(vec![String::new(); columns]);
            }
        }
        rows.extend(extract_rows(&doc, &options.selection, &options.extract));
    }

    while rows.last().is_some_and(|row| is_blank_row(row)) {
        rows.pop();
    }

    Ok(to_csv(&headers, &rows))
}

/// Caller-owned duplicate-file ledger, keyed by (name, size).
///
/// Consult-then-record is a single call so batches stay race-free under
/// the required sequential model. Append-only: entries are never removed.
/// Persistence, if any, is the caller's choice — the engine assumes no
/// global store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessedLedger {
    seen: HashSet<(String, u64)>,
}

impl ProcessedLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a file; returns `false` when the same (name, size) pair was
    /// already processed.
    pub fn check_and_record(&mut self, name: &str, size: u64) -> bool {
        self.seen.insert((name.to_string(), size))
    }

    /// Whether a file has been recorded, without recording it.
    pub fn contains(&self, name: &str, size: u64) -> bool {
        self.seen.contains(&(name.to_string(), size))
    }

    /// Number of recorded files.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Drop duplicates from a prospective batch, recording the survivors.
    pub fn filter_new(&mut self, files: Vec<SourceFile>) -> Vec<SourceFile> {
        files
            .into_iter()
            .filter(|f| self.check_and_record(&f.name, f.size()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_flags_second_occurrence() {
        let mut ledger = ProcessedLedger::new();
        assert!(ledger.check_and_record("a.xml", 100));
        assert!(!ledger.check_and_record("a.xml", 100));
        // Same name, different size: a different file
        assert!(ledger.check_and_record("a.xml", 101));
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn filter_new_keeps_order_and_drops_dupes() {
        let mut ledger = ProcessedLedger::new();
        let files = vec![
            SourceFile::new("a.xml", "<a/>"),
            SourceFile::new("b.xml", "<b/>"),
            SourceFile::new("a.xml", "<a/>"),
        ];
        let kept = ledger.filter_new(files);
        let names: Vec<&str> = kept.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["a.xml", "b.xml"]);
    }
}
