//! Fixed-schema extractor for GS1-shaped order documents.
//!
//! Resolves ten named business fields against one order document — one
//! output row per `orderLineItem`, in document order. Document-level fields
//! (reference, branch code, town, dates) are resolved once and repeated per
//! row; line-level fields are scoped to the current line item.
//!
//! # Example
//!
//! ```ignore
//! use xmltab::order::{convert_order, ExtractOptions, OrderField};
//!
//! let csv = convert_order(xml, &OrderField::ALL, &ExtractOptions::default())?;
//! ```

mod fields;

pub use fields::OrderField;

use serde::{Deserialize, Serialize};

use crate::core::ConvertError;
use crate::csv::{is_blank_row, to_csv};
use crate::dom::{Document, parse_document};

/// Configuration for fixed-schema extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractOptions {
    /// Emit the order reference on every row (`true`, default) or only on
    /// the first row of each document (`false`). Downstream consumers
    /// disagree on which they want; pick per batch.
    pub reference_on_every_row: bool,
    /// Format reformatted dates as `07/03/2024` instead of `7/3/2024`.
    pub zero_pad_dates: bool,
    /// Literal prefix for the branch code column, e.g. `"F"` for variants
    /// that tag branch numbers.
    pub branch_code_prefix: Option<String>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            reference_on_every_row: true,
            zero_pad_dates: false,
            branch_code_prefix: None,
        }
    }
}

/// Builder for [`ExtractOptions`].
pub struct ExtractOptionsBuilder {
    options: ExtractOptions,
}

impl ExtractOptionsBuilder {
    pub fn new() -> Self {
        Self {
            options: ExtractOptions::default(),
        }
    }

    /// Emit the order reference only on the first row of each document.
    pub fn reference_on_first_row_only(mut self) -> Self {
        self.options.reference_on_every_row = false;
        self
    }

    /// Zero-pad day and month in reformatted dates.
    pub fn zero_pad_dates(mut self) -> Self {
        self.options.zero_pad_dates = true;
        self
    }

    /// Prefix branch codes with a literal tag.
    pub fn branch_code_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.options.branch_code_prefix = Some(prefix.into());
        self
    }

    pub fn build(self) -> ExtractOptions {
        self.options
    }
}

impl Default for ExtractOptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve the selected fields against every line item of a parsed order
/// document.
///
/// Cells are CSV-escaped except the GTIN column, which is emitted verbatim.
/// Rows whose every cell is blank are dropped. A document with zero line
/// items yields zero rows — valid, not an error.
pub fn extract_rows(
    doc: &Document,
    selection: &[OrderField],
    options: &ExtractOptions,
) -> Vec<Vec<String>> {
    let ctx = fields::DocumentContext::resolve(doc, options);
    let lines = doc.all_by_tag(doc.root(), fields::LINE_ITEM_TAG);

    let mut rows = Vec::with_capacity(lines.len());
    for (index, &line) in lines.iter().enumerate() {
        let row: Vec<String> = selection
            .iter()
            .map(|field| field.resolve(doc, &ctx, line, index, rows.len(), options))
            .collect();
        if !is_blank_row(&row) {
            rows.push(row);
        }
    }
    rows
}

/// Parse one order document and produce its CSV text, header row first.
///
/// Fails with [`ConvertError::Parse`] on malformed XML. A structurally
/// valid document with no line items yields a header-only CSV.
pub fn convert_order(
    xml: &str,
    selection: &[OrderField],
    options: &ExtractOptions,
) -> Result<String, ConvertError> {
    let doc = parse_document(xml)?;
    let headers: Vec<String> = selection
        .iter()
        .map(|f| f.column_name().to_string())
        .collect();
    let rows = extract_rows(&doc, selection, options);
    Ok(to_csv(&headers, &rows))
}
