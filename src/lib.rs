//! # xmltab
//!
//! Converts batches of XML order documents into CSV tables according to a
//! field mapping — either inferred generically from document structure or
//! pinned to the fixed GS1 order schema.
//!
//! The crate is the extraction engine only: it takes raw XML text in and
//! hands CSV text out. File pickers, progress reporting, and ZIP packaging
//! are the caller's business.
//!
//! ## Quick Start
//!
//! ```rust
//! use xmltab::batch::{combine, CombineOptions, SourceFile};
//!
//! let xml = r#"<order>
//!     <orderLineItem>
//!         <gtin>04012345678901</gtin>
//!         <requestedQuantity><value>12</value></requestedQuantity>
//!     </orderLineItem>
//! </order>"#;
//!
//! let files = vec![SourceFile::new("order-001.xml", xml)];
//! let csv = combine(&files, &CombineOptions::default()).unwrap();
//! assert!(csv.starts_with("Order Reference,"));
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `core` | Shared types ([`Field`], [`ConversionResult`]) and errors |
//! | `dom` | Owned XML tree built once per file over quick-xml |
//! | `schema` | Field inference and generic repeating-record detection |
//! | `order` | Fixed-schema extractor for the ten GS1 order fields |
//! | `csv` | CSV escaping and row assembly |
//! | `batch` | Per-file driver, multi-document combiner, duplicate ledger |

pub mod batch;
pub mod core;
pub mod csv;
pub mod dom;
pub mod order;
pub mod schema;

// Re-export core types at crate root for convenience
pub use crate::core::*;
