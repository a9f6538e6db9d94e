use thiserror::Error;

/// Errors that can occur while converting XML documents to CSV.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConvertError {
    /// The input was not well-formed XML. Fatal to the affected file;
    /// sibling files in per-file mode are unaffected.
    #[error("invalid XML format{}: {}", file_suffix(.file), .message)]
    Parse {
        /// Name of the offending file, when known.
        file: Option<String>,
        /// The underlying parser diagnostic.
        message: String,
    },

    /// A combined-mode batch failed because one constituent file failed.
    /// Combined output is all-or-nothing, so the whole batch is reported
    /// as a single error.
    #[error("batch failed on '{file}': {message}")]
    Batch {
        /// The file that broke the batch.
        file: String,
        /// Description of the constituent failure.
        message: String,
    },
}

fn file_suffix(file: &Option<String>) -> String {
    match file {
        Some(name) => format!(" in '{name}'"),
        None => String::new(),
    }
}

impl ConvertError {
    /// Create a parse error with no file attribution.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            file: None,
            message: message.into(),
        }
    }

    /// Attach a file name to an error, for batch reporting.
    pub fn for_file(self, name: &str) -> Self {
        match self {
            Self::Parse { message, .. } => Self::Parse {
                file: Some(name.to_string()),
                message,
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_display_without_file() {
        let e = ConvertError::parse("unexpected EOF");
        assert_eq!(e.to_string(), "invalid XML format: unexpected EOF");
    }

    #[test]
    fn parse_error_display_with_file() {
        let e = ConvertError::parse("unexpected EOF").for_file("order.xml");
        assert_eq!(
            e.to_string(),
            "invalid XML format in 'order.xml': unexpected EOF"
        );
    }
}
