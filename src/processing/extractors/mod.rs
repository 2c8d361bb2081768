//! Per-type field extractors.
//!
//! Every extractor walks the same prepared [`DocumentText`]. A field is built
//! from an ordered list of strategies (inline label, following lines, whole
//! text scan) and the first strategy that yields a value wins.

mod aadhaar;
mod driving_license;
mod fallback;
mod handwritten;
mod pan;
mod voter_id;

use log::debug;
use regex::Regex;

use crate::models::{DocumentType, ExtractedFields};
use crate::processing::text::{clean_for_matching, convert_devanagari_numerals};

pub use aadhaar::extract_aadhaar;
pub use driving_license::extract_driving_license;
pub use fallback::extract_generic;
pub use handwritten::extract_handwritten;
pub use pan::extract_pan;
pub use voter_id::extract_voter_id;

/// Recognized text prepared once per extraction call.
#[derive(Debug, Clone)]
pub struct DocumentText<'a> {
    /// Text exactly as the recognizer produced it.
    pub raw: &'a str,
    /// Non-empty trimmed rows, in reading order.
    pub lines: Vec<String>,
    /// Whole text with ASCII digits and single spaces; rows are merged.
    pub cleaned: String,
    /// Upper-cased, numeral-converted rows joined by line breaks.
    pub upper: String,
}

impl<'a> DocumentText<'a> {
    pub fn new(raw: &'a str) -> Self {
        let lines: Vec<String> = raw
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();
        let upper = convert_devanagari_numerals(&lines.join("\n")).to_uppercase();
        DocumentText {
            raw,
            lines,
            cleaned: clean_for_matching(raw),
            upper,
        }
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }
}

/// A value together with the index of the row it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located<T> {
    pub value: T,
    pub line: usize,
}

impl<T> Located<T> {
    pub fn new(value: T, line: usize) -> Self {
        Located { value, line }
    }
}

/// One way of finding a field.
pub type Strategy<T> = fn(&DocumentText) -> Option<T>;

/// Runs strategies in priority order and returns the first hit.
pub fn first_match<T>(doc: &DocumentText, strategies: &[(&str, Strategy<T>)]) -> Option<T> {
    strategies.iter().find_map(|(name, strategy)| {
        let found = strategy(doc);
        if found.is_some() {
            debug!("strategy '{}' matched", name);
        }
        found
    })
}

/// Text following the end of `label`'s first match in `line`, with leading
/// separators and whitespace stripped. `None` when the label is absent.
pub(crate) fn text_after_label<'t>(line: &'t str, label: &Regex) -> Option<&'t str> {
    label.find(line).map(|m| {
        line[m.end()..].trim_start_matches(|c: char| {
            c.is_whitespace() || matches!(c, ':' | 'ः' | '-' | '.' | '/' | '=' | '|')
        })
    })
}

/// Truncates `value` at the first match of any marker.
pub(crate) fn cut_at_markers<'t>(value: &'t str, markers: &[&Regex]) -> &'t str {
    let end = markers
        .iter()
        .filter_map(|m| m.find(value).map(|found| found.start()))
        .min()
        .unwrap_or(value.len());
    value[..end].trim()
}

/// Collects up to `max` rows after `index`, stopping at a row that matches
/// any of `stop_labels`.
pub(crate) fn following_lines<'d>(
    doc: &'d DocumentText,
    index: usize,
    max: usize,
    stop_labels: &[&Regex],
) -> Vec<(usize, &'d str)> {
    doc.lines
        .iter()
        .enumerate()
        .skip(index + 1)
        .take(max)
        .take_while(|(_, line)| !stop_labels.iter().any(|label| label.is_match(line)))
        .map(|(i, line)| (i, line.as_str()))
        .collect()
}

/// Routes recognized text to the extractor for `document_type`.
pub fn extract(text: &str, document_type: DocumentType) -> ExtractedFields {
    let doc = DocumentText::new(text);
    debug!(
        "extracting {} fields from {} lines",
        document_type,
        doc.lines.len()
    );
    match document_type {
        DocumentType::Aadhaar => extract_aadhaar(&doc),
        DocumentType::Pan => extract_pan(&doc),
        DocumentType::VoterId => extract_voter_id(&doc),
        DocumentType::DrivingLicense => extract_driving_license(&doc),
        DocumentType::Handwritten => extract_handwritten(&doc),
        DocumentType::Unknown => extract_generic(&doc),
    }
}
