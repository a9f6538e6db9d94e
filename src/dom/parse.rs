use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::{Document, Element, NodeId};
use crate::core::ConvertError;

/// Parse raw XML text into an owned [`Document`].
///
/// Fails with [`ConvertError::Parse`] on malformed input, including a
/// missing or duplicated document element.
pub fn parse_document(xml: &str) -> Result<Document, ConvertError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut nodes: Vec<Element> = Vec::new();
    let mut stack: Vec<NodeId> = Vec::new();
    let mut root: Option<NodeId> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let id = open_element(&mut nodes, &stack, &mut root, e)?;
                stack.push(id);
            }
            Ok(Event::Empty(ref e)) => {
                open_element(&mut nodes, &stack, &mut root, e)?;
            }
            Ok(Event::Text(ref e)) => {
                let text = e
                    .unescape()
                    .map_err(|err| ConvertError::parse(format!("bad text content: {err}")))?;
                append_text(&mut nodes, &stack, text.trim());
            }
            Ok(Event::CData(ref e)) => {
                let raw = String::from_utf8_lossy(e).into_owned();
                append_text(&mut nodes, &stack, raw.trim());
            }
            Ok(Event::End(_)) => {
                stack.pop();
            }
            Ok(Event::Eof) => {
                if let Some(&open) = stack.last() {
                    return Err(ConvertError::parse(format!(
                        "unclosed element <{}>",
                        nodes[open.0].tag
                    )));
                }
                break;
            }
            Ok(_) => {}
            Err(err) => return Err(ConvertError::parse(err.to_string())),
        }
    }

    match root {
        Some(root) => Ok(Document::new(nodes, root)),
        None => Err(ConvertError::parse("no document element")),
    }
}

fn open_element(
    nodes: &mut Vec<Element>,
    stack: &[NodeId],
    root: &mut Option<NodeId>,
    start: &BytesStart<'_>,
) -> Result<NodeId, ConvertError> {
    let tag = std::str::from_utf8(start.name().as_ref())
        .map_err(|err| ConvertError::parse(format!("bad tag name: {err}")))?
        .to_string();

    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|err| ConvertError::parse(format!("bad attribute: {err}")))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|err| ConvertError::parse(format!("bad attribute name: {err}")))?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(|err| ConvertError::parse(format!("bad attribute value: {err}")))?
            .into_owned();
        attributes.push((key, value));
    }

    let parent = stack.last().copied();
    if parent.is_none() && root.is_some() {
        return Err(ConvertError::parse("multiple root elements"));
    }

    let id = NodeId(nodes.len());
    nodes.push(Element {
        tag,
        attributes,
        text: String::new(),
        children: Vec::new(),
        parent,
    });

    match parent {
        Some(p) => nodes[p.0].children.push(id),
        None => *root = Some(id),
    }
    Ok(id)
}

fn append_text(nodes: &mut [Element], stack: &[NodeId], text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(&current) = stack.last() {
        nodes[current.0].text.push_str(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_attributes_in_document_order() {
        let d = parse_document(r#"<a x="1" y="2"/>"#).unwrap();
        let root = d.node(d.root());
        assert_eq!(
            root.attributes,
            vec![("x".to_string(), "1".to_string()), ("y".to_string(), "2".to_string())]
        );
    }

    #[test]
    fn unescapes_entities() {
        let d = parse_document("<a>Fisch &amp; Chips</a>").unwrap();
        assert_eq!(d.own_text(d.root()), "Fisch & Chips");
    }

    #[test]
    fn mismatched_tags_fail() {
        assert!(matches!(
            parse_document("<a><b></a></b>"),
            Err(ConvertError::Parse { .. })
        ));
    }

    #[test]
    fn empty_input_has_no_document_element() {
        assert!(matches!(
            parse_document("   "),
            Err(ConvertError::Parse { .. })
        ));
    }

    #[test]
    fn second_root_element_fails() {
        assert!(matches!(
            parse_document("<a/><b/>"),
            Err(ConvertError::Parse { .. })
        ));
    }
}
