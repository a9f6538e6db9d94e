use serde::{Deserialize, Serialize};

/// Maximum length of a [`Field::sample`] preview value.
pub const SAMPLE_MAX_LEN: usize = 50;

/// How a discoverable field carries its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Text content of a leaf element.
    Text,
    /// Value of an element attribute.
    Attribute,
}

/// A discoverable extraction target, produced once per document by schema
/// inference and consumed by the mapping UI.
///
/// `path` is the dotted chain of ancestor tag names, with `@attr` appended
/// for attributes, and is unique within one document's field set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Dotted tag-name path, e.g. `order.buyer.gln` or `order.buyer@type`.
    pub path: String,
    /// Human-readable label; the last path segment, or `tag@attr`.
    pub name: String,
    /// Whether the value comes from element text or an attribute.
    pub kind: FieldKind,
    /// First observed value, truncated to [`SAMPLE_MAX_LEN`] characters.
    /// Preview only — never consulted during conversion.
    pub sample: String,
}

impl Field {
    pub(crate) fn text(path: String, name: &str, sample: &str) -> Self {
        Self {
            path,
            name: name.to_string(),
            kind: FieldKind::Text,
            sample: truncate_sample(sample),
        }
    }

    pub(crate) fn attribute(path: String, tag: &str, attr: &str, sample: &str) -> Self {
        Self {
            path,
            name: format!("{tag}@{attr}"),
            kind: FieldKind::Attribute,
            sample: truncate_sample(sample),
        }
    }
}

/// Truncate to [`SAMPLE_MAX_LEN`] characters without splitting a UTF-8
/// character.
fn truncate_sample(value: &str) -> String {
    value.chars().take(SAMPLE_MAX_LEN).collect()
}

/// Processing state of one input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversionStatus {
    /// Conversion started but has not resolved yet.
    Processing,
    /// CSV output is available in [`ConversionResult::csv_data`].
    Success,
    /// Conversion failed; see [`ConversionResult::error`].
    Error,
}

/// Per-file conversion outcome. Created when a file's processing starts and
/// resolved in place; never shared across files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionResult {
    /// Name of the input file.
    pub file_name: String,
    /// Current processing state.
    pub status: ConversionStatus,
    /// Full CSV text on success.
    pub csv_data: Option<String>,
    /// Number of data rows (header excluded) on success. A header-only
    /// CSV has a row count of zero and is still a success.
    pub row_count: Option<usize>,
    /// Failure message on error.
    pub error: Option<String>,
}

impl ConversionResult {
    /// Start tracking a file.
    pub fn processing(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            status: ConversionStatus::Processing,
            csv_data: None,
            row_count: None,
            error: None,
        }
    }

    /// Resolve as successful with the produced CSV text.
    pub fn succeed(&mut self, csv_data: String, row_count: usize) {
        self.status = ConversionStatus::Success;
        self.csv_data = Some(csv_data);
        self.row_count = Some(row_count);
        self.error = None;
    }

    /// Resolve as failed.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = ConversionStatus::Error;
        self.error = Some(message.into());
        self.csv_data = None;
        self.row_count = None;
    }
}
