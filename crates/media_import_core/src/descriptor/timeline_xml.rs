//! Pre-check for embedded timeline XML.

use crate::orchestrator::{ImportError, ImportResult};

/// Parse an embedded timeline document and return its root element name.
///
/// Only well-formedness is checked. The host decides whether the
/// document is a timeline it understands, e.g. an FCP7 sequence:
/// ```xml
/// <?xml version="1.0" encoding="UTF-8"?>
/// <!DOCTYPE xmeml>
/// <xmeml version="5">
///   <sequence>
///     <name>Cut</name>
///     ...
///   </sequence>
/// </xmeml>
/// ```
pub fn check_timeline_xml(xml: &str) -> ImportResult<String> {
    if xml.trim().is_empty() {
        return Err(ImportError::validation("embedded timeline XML is empty"));
    }

    // Interchange formats ship with a DOCTYPE.
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..Default::default()
    };
    let doc = roxmltree::Document::parse_with_options(xml, options).map_err(|e| {
        ImportError::validation(format!("embedded timeline XML is malformed: {}", e))
    })?;

    Ok(doc.root_element().tag_name().name().to_string())
}
