use std::io::{Cursor, Read};

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::errors::ScreeningError;

const DOCUMENT_PART: &str = "word/document.xml";

lazy_static! {
    // Paragraph and line breaks become newlines before tags are stripped.
    static ref BREAK_RE: Regex = Regex::new(r"</w:p>|<w:br\s*/>|<w:tab\s*/>").unwrap();
    static ref TAG_RE: Regex = Regex::new(r"<[^>]+>").unwrap();
    static ref ENTITY_RE: Regex =
        Regex::new(r"&(?:#([0-9]{1,7})|#[xX]([0-9a-fA-F]{1,6})|(lt|gt|quot|apos|amp));").unwrap();
}

/// Extracts paragraph text from a DOCX (Office Open XML) package.
pub fn extract_docx_text(bytes: &[u8]) -> Result<String, ScreeningError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ScreeningError::parse(format!("DOCX is not a valid zip package: {e}")))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| ScreeningError::parse(format!("DOCX is missing {DOCUMENT_PART}: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| ScreeningError::parse(format!("DOCX body is unreadable: {e}")))?;

    Ok(xml_to_text(&xml))
}

fn xml_to_text(xml: &str) -> String {
    let with_breaks = BREAK_RE.replace_all(xml, "\n");
    let stripped = TAG_RE.replace_all(&with_breaks, "");
    decode_entities(&stripped)
}

/// Decodes the named XML entities and numeric character references in one
/// pass. References to invalid code points are left as written.
fn decode_entities(text: &str) -> String {
    ENTITY_RE
        .replace_all(text, |caps: &Captures<'_>| {
            let decoded = if let Some(dec) = caps.get(1) {
                dec.as_str().parse::<u32>().ok().and_then(char::from_u32)
            } else if let Some(hex) = caps.get(2) {
                u32::from_str_radix(hex.as_str(), 16).ok().and_then(char::from_u32)
            } else {
                caps.get(3).map(|named| match named.as_str() {
                    "lt" => '<',
                    "gt" => '>',
                    "quot" => '"',
                    "apos" => '\'',
                    _ => '&',
                })
            };
            match decoded {
                Some(c) => c.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}
