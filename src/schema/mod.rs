//! Schema inference and generic repeating-record detection.
//!
//! Used when no fixed schema applies: [`infer_fields`] discovers candidate
//! extraction targets for the mapping UI, [`detect_record_tag`] guesses
//! which repeating element is one output row, and [`extract_generic_rows`]
//! resolves a path selection against each detected record.

use crate::core::{ConvertError, Field};
use crate::csv::{escape_field, is_blank_row, resolve_headers, to_csv};
use crate::dom::{Document, NodeId, parse_document};

/// Parse raw XML text and infer its fields in one step; the usual entry
/// point when analyzing a freshly loaded file.
pub fn analyze_structure(xml: &str) -> Result<Vec<Field>, ConvertError> {
    let doc = parse_document(xml)?;
    Ok(infer_fields(&doc))
}

/// Walk the document once and produce a deduplicated, order-preserving
/// list of discoverable fields.
///
/// Leaf elements with non-empty trimmed text yield a text field at their
/// dotted tag path; every element additionally yields one attribute field
/// per attribute, after its children. Duplicate paths keep the first
/// occurrence.
pub fn infer_fields(doc: &Document) -> Vec<Field> {
    let mut fields = Vec::new();
    collect_fields(doc, doc.root(), "", &mut fields);

    let mut seen = std::collections::HashSet::new();
    fields.retain(|f: &Field| seen.insert(f.path.clone()));
    fields
}

fn collect_fields(doc: &Document, id: NodeId, path: &str, fields: &mut Vec<Field>) {
    let node = doc.node(id);
    let current_path = if path.is_empty() {
        node.tag.clone()
    } else {
        format!("{path}.{}", node.tag)
    };

    let has_children = !node.children.is_empty();
    if !has_children && !node.text.is_empty() {
        fields.push(Field::text(current_path.clone(), &node.tag, &node.text));
    } else if has_children {
        for &child in &node.children {
            collect_fields(doc, child, &current_path, fields);
        }
    }

    // Attributes count as fields whether or not the element carried content
    for (attr, value) in &node.attributes {
        fields.push(Field::attribute(
            format!("{current_path}@{attr}"),
            &node.tag,
            attr,
            value,
        ));
    }
}

/// Identify the element tag that most plausibly represents one output row.
///
/// Data-bearing elements (non-empty text content, descendants included, or
/// at least one attribute) are grouped by tag; the largest group wins,
/// provided it repeats. Ties go to the tag seen first. Documents with no
/// repeating tag fall back to the root.
pub fn detect_record_tag(doc: &Document) -> &str {
    match best_repeating_group(doc) {
        Some((tag, _)) => tag,
        None => doc.tag(doc.root()),
    }
}

/// The elements treated as records in generic mode: every instance of the
/// detected record tag, or just the document root when nothing repeats.
pub fn record_nodes(doc: &Document) -> Vec<NodeId> {
    match best_repeating_group(doc) {
        Some((_, nodes)) => nodes,
        None => vec![doc.root()],
    }
}

fn best_repeating_group(doc: &Document) -> Option<(&str, Vec<NodeId>)> {
    // First-seen insertion order makes tie-breaking deterministic
    let mut groups: Vec<(&str, Vec<NodeId>)> = Vec::new();
    for id in doc.descendants(doc.root()) {
        if !has_data(doc, id) {
            continue;
        }
        let tag = doc.tag(id);
        match groups.iter_mut().find(|(t, _)| *t == tag) {
            Some((_, nodes)) => nodes.push(id),
            None => groups.push((tag, vec![id])),
        }
    }

    let mut best: Option<(&str, Vec<NodeId>)> = None;
    for (tag, nodes) in groups {
        let best_len = best.as_ref().map(|(_, n)| n.len()).unwrap_or(1);
        if nodes.len() > best_len {
            best = Some((tag, nodes));
        }
    }
    best
}

fn has_data(doc: &Document, id: NodeId) -> bool {
    !doc.node(id).attributes.is_empty() || !doc.text_content(id).trim().is_empty()
}

/// Resolve the selected field paths against each record, producing escaped
/// CSV cells. Rows whose every cell is blank are dropped.
pub fn extract_generic_rows(doc: &Document, selected: &[String]) -> Vec<Vec<String>> {
    let records = record_nodes(doc);
    let mut rows = Vec::with_capacity(records.len());
    for record in records {
        let row: Vec<String> = selected
            .iter()
            .map(|path| escape_field(&resolve_path_value(doc, record, path)).into_owned())
            .collect();
        if !is_blank_row(&row) {
            rows.push(row);
        }
    }
    rows
}

/// Parse a document and convert it generically: detect the record tag,
/// resolve the selected paths per record, and serialize with headers
/// resolved against the discovered field list.
pub fn convert_generic(
    xml: &str,
    selected: &[String],
    fields: &[Field],
) -> Result<String, ConvertError> {
    let doc = parse_document(xml)?;
    let headers = resolve_headers(selected, fields);
    let rows = extract_generic_rows(&doc, selected);
    Ok(to_csv(&headers, &rows))
}

fn resolve_path_value(doc: &Document, record: NodeId, path: &str) -> String {
    match path.split_once('@') {
        Some((element_path, attr)) => {
            let Some(node) = doc.find_by_path(record, element_path) else {
                return String::new();
            };
            doc.node(node)
                .attributes
                .iter()
                .find(|(name, _)| name == attr)
                .map(|(_, value)| value.trim().to_string())
                .unwrap_or_default()
        }
        None => doc
            .find_by_path(record, path)
            .map(|node| doc.own_text(node).trim().to_string())
            .unwrap_or_default(),
    }
}
