// PAN card extraction.
//
// Cards print bilingual labels, either with the value inline ("Name: JOHN SMITH")
// or on the following row. The Hindi father's-name label reads "पिता ... का नाम",
// so the value can sit between "पिता" and "का नाम" on the same row.

use lazy_static::lazy_static;
use regex::Regex;

use super::{first_match, DocumentText, Strategy};
use crate::models::ExtractedFields;
use crate::processing::patterns::{LABEL_SEPARATOR, PAN_PATTERN};
use crate::processing::text::{
    collapse_repeated_words, contains_any, devanagari_only, extract_date, latin_only,
    looks_like_devanagari_name, looks_like_name, normalize_whitespace, remove_words,
    strip_numeric_tokens,
};

lazy_static! {
    static ref NAME_INLINE: Regex = Regex::new(&format!(
        r"(?i)(?:नाम\s*/?\s*)?\bname\s*(?:{}|/)?\s*([A-Z][A-Z\s]+)",
        LABEL_SEPARATOR
    ))
    .unwrap();

    // Value sandwiched between "पिता"/"Father" and the trailing Hindi "का नाम".
    static ref FATHER_BEFORE_HINDI_LABEL: Regex = Regex::new(&format!(
        r"(?i)(?:पिता|father)['’]?s?\s+([A-Z][A-Z\s]+?)(?:\s*का\s*नाम{}?|\s*father|$)",
        LABEL_SEPARATOR
    ))
    .unwrap();

    static ref FATHER_INLINE: Regex = Regex::new(&format!(
        r"(?i)father['’]?s?\s*name\s*(?:{}|/)?\s*([A-Z][A-Z\s]+)",
        LABEL_SEPARATOR
    ))
    .unwrap();

    static ref LEADING_POSSESSIVE: Regex = Regex::new(r"^['’]?S\s+").unwrap();
}

const HEADER_WORDS: &[&str] = &[
    "income tax",
    "permanent account",
    "government",
    "dept",
    "signature",
];

const NAME_REJECT: &[&str] = &["father", "signature", "card", "permanent", "account"];
const FATHER_REJECT: &[&str] = &["signature", "card", "date", "birth"];
const LABEL_WORDS: &[&str] = &["NAME", "FATHER", "FATHERS", "FATHER'S", "FATHER’S", "'S"];

const HINDI_NAME_SKIP: &[&str] = &[
    "नाम", "आयकर", "विभाग", "भारत", "सरकार", "स्थायी", "लेखा", "संख्या", "कार्ड",
];
const HINDI_FATHER_SKIP: &[&str] = &["पिता", "का", "नाम", "भारत", "सरकार"];

pub fn extract_pan(doc: &DocumentText) -> ExtractedFields {
    let mut info = ExtractedFields::new();

    if let Some(caps) = PAN_PATTERN.captures(&doc.upper) {
        info.insert("document_id", &caps[1]);
        info.insert("pan_number", &caps[1]);
    }

    info.insert_opt("name", first_match(doc, NAME_STRATEGIES));
    info.insert_opt("name_hindi", hindi_name(doc));
    info.insert_opt("father_name", first_match(doc, FATHER_STRATEGIES));
    info.insert_opt("father_name_hindi", hindi_father_name(doc));
    info.insert_opt("date_of_birth", first_match(doc, DOB_STRATEGIES));

    info
}

fn is_header(line: &str) -> bool {
    contains_any(&line.to_lowercase(), HEADER_WORDS) || line.contains("हस्ताक्षर")
}

fn is_father_label(line: &str) -> bool {
    line.to_lowercase().contains("father") || line.contains("पिता")
}

fn is_name_label(line: &str) -> bool {
    (line.to_lowercase().contains("name") || line.contains("नाम")) && !is_father_label(line)
}

fn is_birth_label(line: &str) -> bool {
    contains_any(&line.to_lowercase(), &["date of birth", "dob", "birth"]) || line.contains("जन्म")
}

/// Rows carrying a label, paired with their index; headers are ignored.
fn label_rows<'d>(doc: &'d DocumentText, is_label: fn(&str) -> bool) -> Vec<(usize, &'d str)> {
    doc.lines
        .iter()
        .enumerate()
        .filter(|(_, line)| !is_header(line) && is_label(line))
        .map(|(i, line)| (i, line.as_str()))
        .collect()
}

/// Drops label words OCR merged in front of the value ("NAME SURESH KUMAR").
fn strip_leading_labels(text: &str) -> String {
    text.split_whitespace()
        .skip_while(|word| {
            let word = word.trim_matches(|c: char| matches!(c, '/' | ':' | 'ः' | '.' | '-'));
            word.is_empty() || LABEL_WORDS.contains(&word)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn finish(candidate: &str) -> Option<String> {
    let cleaned = normalize_whitespace(&strip_numeric_tokens(candidate)).to_uppercase();
    let value = collapse_repeated_words(&strip_leading_labels(&cleaned));
    (!value.is_empty()).then_some(value)
}

const NAME_STRATEGIES: &[(&str, Strategy<String>)] = &[
    ("inline name", inline_name),
    ("name on next row", next_row_name),
];

fn inline_name(doc: &DocumentText) -> Option<String> {
    label_rows(doc, is_name_label).into_iter().find_map(|(_, line)| {
        let caps = NAME_INLINE.captures(line)?;
        let candidate = caps[1].trim();
        if candidate.chars().count() <= 2 || contains_any(&candidate.to_lowercase(), NAME_REJECT) {
            return None;
        }
        finish(candidate)
    })
}

fn next_row_name(doc: &DocumentText) -> Option<String> {
    label_rows(doc, is_name_label).into_iter().find_map(|(i, _)| {
        let next = strip_numeric_tokens(&latin_only(doc.line(i + 1)?));
        if next.is_empty() || !looks_like_name(&next) || next.to_lowercase().contains("father") {
            return None;
        }
        finish(&next)
    })
}

fn hindi_name(doc: &DocumentText) -> Option<String> {
    label_rows(doc, is_name_label).into_iter().find_map(|(_, line)| {
        let hindi = devanagari_only(line);
        if hindi.is_empty() || !looks_like_devanagari_name(&hindi) {
            return None;
        }
        let cleaned = remove_words(&hindi, HINDI_NAME_SKIP);
        (cleaned.chars().count() > 2).then(|| collapse_repeated_words(&cleaned))
    })
}

const FATHER_STRATEGIES: &[(&str, Strategy<String>)] = &[
    ("father before hindi label", father_before_hindi_label),
    ("inline father's name", inline_father_name),
    ("father's name on next row", next_row_father_name),
];

fn father_before_hindi_label(doc: &DocumentText) -> Option<String> {
    label_rows(doc, is_father_label).into_iter().find_map(|(_, line)| {
        let caps = FATHER_BEFORE_HINDI_LABEL.captures(line)?;
        let candidate = caps[1].trim();
        if candidate.chars().count() <= 2 {
            return None;
        }
        let candidate = LEADING_POSSESSIVE.replace(candidate, "");
        if !looks_like_name(&candidate) {
            return None;
        }
        finish(&candidate)
    })
}

fn inline_father_name(doc: &DocumentText) -> Option<String> {
    label_rows(doc, is_father_label).into_iter().find_map(|(_, line)| {
        let caps = FATHER_INLINE.captures(line)?;
        let candidate = caps[1].trim();
        if candidate.chars().count() <= 2
            || contains_any(&candidate.to_lowercase(), FATHER_REJECT)
        {
            return None;
        }
        finish(candidate)
    })
}

fn next_row_father_name(doc: &DocumentText) -> Option<String> {
    label_rows(doc, is_father_label).into_iter().find_map(|(i, _)| {
        let next = strip_numeric_tokens(&latin_only(doc.line(i + 1)?));
        let lower = next.to_lowercase();
        if next.is_empty()
            || !looks_like_name(&next)
            || lower.contains("date")
            || lower.contains("birth")
        {
            return None;
        }
        finish(&next)
    })
}

fn hindi_father_name(doc: &DocumentText) -> Option<String> {
    label_rows(doc, is_father_label).into_iter().find_map(|(_, line)| {
        let cleaned = remove_words(&devanagari_only(line), HINDI_FATHER_SKIP);
        (!cleaned.is_empty() && looks_like_devanagari_name(&cleaned))
            .then(|| collapse_repeated_words(&cleaned))
    })
}

const DOB_STRATEGIES: &[(&str, Strategy<String>)] = &[
    ("inline date of birth", inline_birth_date),
    ("date of birth on next row", next_row_birth_date),
];

fn inline_birth_date(doc: &DocumentText) -> Option<String> {
    label_rows(doc, is_birth_label)
        .into_iter()
        .find_map(|(_, line)| extract_date(line))
}

fn next_row_birth_date(doc: &DocumentText) -> Option<String> {
    label_rows(doc, is_birth_label)
        .into_iter()
        .find_map(|(i, _)| doc.line(i + 1).and_then(extract_date))
}

#[cfg(test)]
mod tests {
    use super::super::extract;
    use crate::models::DocumentType;

    #[test]
    fn test_father_name_does_not_leak_into_name() {
        let text = "Name: JOHN SMITH\nFather's Name: ROBERT SMITH\nDate of Birth: 15/08/1990";
        let info = extract(text, DocumentType::Pan);
        assert_eq!(info.get("name"), Some("JOHN SMITH"));
        assert_eq!(info.get("father_name"), Some("ROBERT SMITH"));
        assert_eq!(info.get("date_of_birth"), Some("15/08/1990"));
    }

    #[test]
    fn test_card_layout_with_values_on_next_rows() {
        let text = "आयकर विभाग INCOME TAX DEPARTMENT\n\
            भारत सरकार GOVT. OF INDIA\n\
            स्थायी लेखा संख्या कार्ड Permanent Account Number Card\n\
            ABCDE1234F\n\
            नाम / Name\n\
            RAVI KUMAR\n\
            पिता का नाम / Father's Name\n\
            SURESH KUMAR\n\
            जन्म की तारीख / Date of Birth\n\
            ०१/०१/१९९०";
        let info = extract(text, DocumentType::Pan);
        assert_eq!(info.get("document_id"), Some("ABCDE1234F"));
        assert_eq!(info.get("pan_number"), Some("ABCDE1234F"));
        assert_eq!(info.get("name"), Some("RAVI KUMAR"));
        assert_eq!(info.get("father_name"), Some("SURESH KUMAR"));
        assert_eq!(info.get("date_of_birth"), Some("01/01/1990"));
    }

    #[test]
    fn test_father_value_before_hindi_label() {
        let text = "पिता RAMESH CHANDRA का नाम Father's Name";
        let info = extract(text, DocumentType::Pan);
        assert_eq!(info.get("father_name"), Some("RAMESH CHANDRA"));
        assert!(!info.contains_key("name"));
    }

    #[test]
    fn test_hindi_names() {
        let text = "नाम / Name रवि कुमार\nपिता का नाम / Father's Name सुरेश कुमार";
        let info = extract(text, DocumentType::Pan);
        assert_eq!(info.get("name_hindi"), Some("रवि कुमार"));
        assert_eq!(info.get("father_name_hindi"), Some("सुरेश कुमार"));
    }

    #[test]
    fn test_date_stripped_from_name_row() {
        let text = "Name\nRAVI KUMAR 15/08/1990";
        let info = extract(text, DocumentType::Pan);
        assert_eq!(info.get("name"), Some("RAVI KUMAR"));
    }

    #[test]
    fn test_label_merged_with_father_value() {
        let info = extract("पिता का नाम / Father's Name SURESH KUMAR", DocumentType::Pan);
        assert_eq!(info.get("father_name"), Some("SURESH KUMAR"));

        let info = extract("Name RAVI KUMAR\nFather's Name SURESH KUMAR", DocumentType::Pan);
        assert_eq!(info.get("name"), Some("RAVI KUMAR"));
        assert_eq!(info.get("father_name"), Some("SURESH KUMAR"));
    }

    #[test]
    fn test_initial_is_not_a_label_word() {
        let info = extract("Name: S KUMAR", DocumentType::Pan);
        assert_eq!(info.get("name"), Some("S KUMAR"));
    }
}
