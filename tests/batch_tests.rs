use xmltab::batch::{
    CombineOptions, MAX_BATCH_FILES, SourceFile, combine, convert_all, convert_file,
};
use xmltab::core::ConversionStatus;
use xmltab::order::{ExtractOptions, OrderField};

/// Minimal order with one line item carrying the given GTIN and quantity.
fn order_xml(gtin: &str, qty: &str) -> String {
    format!(
        "<order>\
            <orderIdentification><uniqueCreatorIdentification>ORD-{gtin}</uniqueCreatorIdentification></orderIdentification>\
            <orderLineItem>\
                <requestedQuantity><value>{qty}</value></requestedQuantity>\
                <gtin>{gtin}</gtin>\
            </orderLineItem>\
        </order>"
    )
}

fn small_selection() -> CombineOptions {
    CombineOptions {
        selection: vec![OrderField::Reference, OrderField::LineQuantity, OrderField::Gtin],
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Per-file mode
// ---------------------------------------------------------------------------

#[test]
fn convert_file_resolves_success_with_row_count() {
    let file = SourceFile::new("one.xml", order_xml("100", "5"));
    let result = convert_file(&file, &OrderField::ALL, &ExtractOptions::default());
    assert_eq!(result.status, ConversionStatus::Success);
    assert_eq!(result.row_count, Some(1));
    assert!(result.csv_data.unwrap().starts_with("Order Reference,"));
}

#[test]
fn header_only_output_is_success_with_zero_rows() {
    let file = SourceFile::new("empty.xml", "<order/>");
    let result = convert_file(&file, &OrderField::ALL, &ExtractOptions::default());
    assert_eq!(result.status, ConversionStatus::Success);
    assert_eq!(result.row_count, Some(0));
}

#[test]
fn bad_file_does_not_disturb_siblings() {
    let files = vec![
        SourceFile::new("good.xml", order_xml("100", "5")),
        SourceFile::new("bad.xml", "<order><gtin>"),
        SourceFile::new("also-good.xml", order_xml("200", "6")),
    ];
    let results = convert_all(&files, &OrderField::ALL, &ExtractOptions::default());
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].status, ConversionStatus::Success);
    assert_eq!(results[1].status, ConversionStatus::Error);
    assert!(results[1].error.as_ref().unwrap().contains("bad.xml"));
    assert_eq!(results[2].status, ConversionStatus::Success);
}

#[test]
fn results_preserve_input_order() {
    let files = vec![
        SourceFile::new("b.xml", order_xml("2", "1")),
        SourceFile::new("a.xml", order_xml("1", "1")),
    ];
    let results = convert_all(&files, &OrderField::ALL, &ExtractOptions::default());
    assert_eq!(results[0].file_name, "b.xml");
    assert_eq!(results[1].file_name, "a.xml");
}

// ---------------------------------------------------------------------------
// Combined mode
// ---------------------------------------------------------------------------

#[test]
fn combine_inserts_two_blank_rows_between_files() {
    let files = vec![
        SourceFile::new("1.xml", order_xml("100", "5")),
        SourceFile::new("2.xml", order_xml("200", "6")),
        SourceFile::new("3.xml", order_xml("300", "7")),
    ];
    let csv = combine(&files, &small_selection()).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines,
        [
            "Order Reference,Quantity,GTIN",
            "ORD-100,5,100",
            ",,",
            ",,",
            "ORD-200,6,200",
            ",,",
            ",,",
            "ORD-300,7,300",
        ]
    );
}

#[test]
fn combine_separator_count_is_configurable() {
    let files = vec![
        SourceFile::new("1.xml", order_xml("100", "5")),
        SourceFile::new("2.xml", order_xml("200", "6")),
    ];
    let options = CombineOptions {
        separator_rows: 0,
        ..small_selection()
    };
    let csv = combine(&files, &options).unwrap();
    assert_eq!(csv.lines().count(), 3);
}

#[test]
fn combine_strips_trailing_blank_rows() {
    let files = vec![
        SourceFile::new("1.xml", order_xml("100", "5")),
        // No line items: contributes no data rows, so the separator before
        // it must not survive at the end
        SourceFile::new("2.xml", "<order/>".to_string()),
    ];
    let csv = combine(&files, &small_selection()).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines, ["Order Reference,Quantity,GTIN", "ORD-100,5,100"]);
}

#[test]
fn combine_single_file_has_no_separators() {
    let files = vec![SourceFile::new("1.xml", order_xml("100", "5"))];
    let csv = combine(&files, &small_selection()).unwrap();
    assert_eq!(csv.lines().count(), 2);
}

#[test]
fn combine_fails_whole_batch_on_one_bad_file() {
    let files = vec![
        SourceFile::new("1.xml", order_xml("100", "5")),
        SourceFile::new("broken.xml", "<order><oops>".to_string()),
        SourceFile::new("3.xml", order_xml("300", "7")),
    ];
    let err = combine(&files, &small_selection()).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("broken.xml"));
    assert!(message.starts_with("batch failed"));
}

#[test]
fn combine_over_no_files_is_header_only() {
    let csv = combine(&[], &small_selection()).unwrap();
    assert_eq!(csv, "Order Reference,Quantity,GTIN");
}

#[test]
fn batch_cap_matches_collaborator_contract() {
    assert_eq!(MAX_BATCH_FILES, 360);
}
