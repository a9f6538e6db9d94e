//! The ten semantic order fields and their resolution rules.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ExtractOptions;
use crate::csv::escape_field;
use crate::dom::{Document, NodeId};

/// Tag of the repeating line-item element; one output row each.
pub(super) const LINE_ITEM_TAG: &str = "orderLineItem";

/// Type marker for buyer-assigned party identifications (branch code and
/// customer town both live under this marker, distinguished by value shape).
const BUYER_ASSIGNED: &str = "BUYER_ASSIGNED_IDENTIFIER_FOR_A_PARTY";

/// Type marker for supplier-assigned trade item identifications (pack size).
const SUPPLIER_ASSIGNED: &str = "SUPPLIER_ASSIGNED";

/// One of the ten fixed business fields of an order document. Order in
/// [`OrderField::ALL`] is the canonical output column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderField {
    /// Order number assigned by the creator, document-wide.
    Reference,
    /// Buyer-assigned numeric branch identifier.
    BranchCode,
    /// Buyer-assigned town name.
    CustomerTown,
    /// Document creation date, reformatted to `D/M/YYYY`.
    CreationDate,
    /// Requested delivery date, reformatted to `D/M/YYYY`.
    DeliveryDate,
    /// 1-based position of the line item within the document.
    LineIndex,
    /// Requested quantity of the line item.
    LineQuantity,
    /// Net unit price of the line item.
    LineUnitPrice,
    /// Supplier-assigned pack size (1–3 digits).
    PackSize,
    /// Trade item GTIN, emitted verbatim and never quoted.
    Gtin,
}

impl OrderField {
    /// All ten fields in canonical column order.
    pub const ALL: [OrderField; 10] = [
        OrderField::Reference,
        OrderField::BranchCode,
        OrderField::CustomerTown,
        OrderField::CreationDate,
        OrderField::DeliveryDate,
        OrderField::LineIndex,
        OrderField::LineQuantity,
        OrderField::LineUnitPrice,
        OrderField::PackSize,
        OrderField::Gtin,
    ];

    /// Stable selection key, as exchanged with the mapping UI.
    pub fn key(&self) -> &'static str {
        match self {
            OrderField::Reference => "order_reference",
            OrderField::BranchCode => "branch_code",
            OrderField::CustomerTown => "customer_town",
            OrderField::CreationDate => "creation_date",
            OrderField::DeliveryDate => "delivery_date",
            OrderField::LineIndex => "order_lines",
            OrderField::LineQuantity => "order_line_quantity",
            OrderField::LineUnitPrice => "order_line_unit_price",
            OrderField::PackSize => "pack_size",
            OrderField::Gtin => "gtin",
        }
    }

    /// Parse a selection key back into a field.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }

    /// CSV header for this field.
    pub fn column_name(&self) -> &'static str {
        match self {
            OrderField::Reference => "Order Reference",
            OrderField::BranchCode => "Branch Code",
            OrderField::CustomerTown => "Customer Town",
            OrderField::CreationDate => "Creation Date",
            OrderField::DeliveryDate => "Delivery Date",
            OrderField::LineIndex => "Line",
            OrderField::LineQuantity => "Quantity",
            OrderField::LineUnitPrice => "Unit Price",
            OrderField::PackSize => "Pack Size",
            OrderField::Gtin => "GTIN",
        }
    }

    /// Resolve this field for one line item, returning the final CSV cell.
    ///
    /// `line_index` is the 0-based position among all line items;
    /// `emitted_rows` counts rows already kept, which drives the
    /// first-row-only reference mode.
    pub(super) fn resolve(
        &self,
        doc: &Document,
        ctx: &DocumentContext,
        line: NodeId,
        line_index: usize,
        emitted_rows: usize,
        options: &ExtractOptions,
    ) -> String {
        let value = match self {
            OrderField::Reference => {
                if options.reference_on_every_row || emitted_rows == 0 {
                    ctx.reference.clone()
                } else {
                    String::new()
                }
            }
            OrderField::BranchCode => ctx.branch_code.clone(),
            OrderField::CustomerTown => ctx.customer_town.clone(),
            OrderField::CreationDate => ctx.creation_date.clone(),
            OrderField::DeliveryDate => ctx.delivery_date.clone(),
            OrderField::LineIndex => (line_index + 1).to_string(),
            OrderField::LineQuantity => nested_text(doc, line, &["requestedQuantity", "value"]),
            OrderField::LineUnitPrice => {
                nested_text(doc, line, &["netPrice", "amount", "monetaryAmount"])
            }
            OrderField::PackSize => pack_size(doc, line),
            OrderField::Gtin => doc.first_text(line, "gtin").to_string(),
        };

        // GTIN stays verbatim so spreadsheets never mangle it
        if *self == OrderField::Gtin {
            value
        } else {
            escape_field(&value).into_owned()
        }
    }
}

/// Document-wide field values, resolved once per document.
pub(super) struct DocumentContext {
    reference: String,
    branch_code: String,
    customer_town: String,
    creation_date: String,
    delivery_date: String,
}

impl DocumentContext {
    pub(super) fn resolve(doc: &Document, options: &ExtractOptions) -> Self {
        let root = doc.root();

        let reference = nested_text(
            doc,
            root,
            &["orderIdentification", "uniqueCreatorIdentification"],
        );

        let branch_raw = buyer_identification(doc, |v| !v.is_empty() && is_all_digits(v));
        let branch_code = match (&options.branch_code_prefix, branch_raw.is_empty()) {
            (Some(prefix), false) => format!("{prefix}{branch_raw}"),
            _ => branch_raw,
        };

        let customer_town = buyer_identification(doc, |v| v.chars().any(|c| c.is_ascii_alphabetic()));

        let creation_raw = nested_text(doc, root, &["DocumentIdentification", "CreationDateAndTime"]);
        // Date portion only; the time part after 'T' is discarded
        let creation_date = reformat_date(
            creation_raw.split('T').next().unwrap_or(""),
            options.zero_pad_dates,
        );

        let delivery_raw = nested_text(
            doc,
            root,
            &[
                "orderLogisticalDateGroup",
                "requestedDeliveryDateAtUltimateConsignee",
                "date",
            ],
        );
        let delivery_date = reformat_date(&delivery_raw, options.zero_pad_dates);

        fn buyer_identification(doc: &Document, select: impl Fn(&str) -> bool) -> String {
            let Some(buyer) = doc.first_by_tag(doc.root(), "buyer") else {
                return String::new();
            };
            for api in doc.all_by_tag(buyer, "additionalPartyIdentification") {
                let kind = doc.first_text(api, "additionalPartyIdentificationType");
                let value = doc.first_text(api, "additionalPartyIdentificationValue");
                if kind == BUYER_ASSIGNED && select(value) {
                    return value.to_string();
                }
            }
            String::new()
        }

        Self {
            reference,
            branch_code,
            customer_town,
            creation_date,
            delivery_date,
        }
    }
}

/// Trimmed text at the end of a chain of nested tag lookups, or empty.
fn nested_text(doc: &Document, start: NodeId, tags: &[&str]) -> String {
    let mut current = start;
    for tag in tags {
        match doc.first_by_tag(current, tag) {
            Some(next) => current = next,
            None => return String::new(),
        }
    }
    doc.own_text(current).trim().to_string()
}

/// First supplier-assigned trade item identification on the line whose
/// value is a 1–3 digit number.
fn pack_size(doc: &Document, line: NodeId) -> String {
    for ati in doc.all_by_tag(line, "additionalTradeItemIdentification") {
        let kind = doc.first_text(ati, "additionalTradeItemIdentificationType");
        let value = doc.first_text(ati, "additionalTradeItemIdentificationValue");
        if kind == SUPPLIER_ASSIGNED && (1..=3).contains(&value.len()) && is_all_digits(value) {
            return value.to_string();
        }
    }
    String::new()
}

fn is_all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Reformat a `YYYY-MM-DD` string to `D/M/YYYY` (or `DD/MM/YYYY` when
/// `zero_pad` is set). Strings that are not a valid calendar date in that
/// exact shape pass through unchanged.
fn reformat_date(value: &str, zero_pad: bool) -> String {
    if !matches_ymd_shape(value) {
        return value.to_string();
    }
    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => {
            let pattern = if zero_pad { "%d/%m/%Y" } else { "%-d/%-m/%Y" };
            date.format(pattern).to_string()
        }
        Err(_) => value.to_string(),
    }
}

fn matches_ymd_shape(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 10
        && b[..4].iter().all(|c| c.is_ascii_digit())
        && b[4] == b'-'
        && b[5..7].iter().all(|c| c.is_ascii_digit())
        && b[7] == b'-'
        && b[8..10].iter().all(|c| c.is_ascii_digit())
}
