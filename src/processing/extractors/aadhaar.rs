// Aadhaar card extraction (physical card and e-Aadhaar letter).
//
// Typical e-Aadhaar layout:
//   Enrolment No.: 0636/00520/07859
//   To / <Hindi name> / <English name> / <address rows> / <mobile>
//   Your Aadhaar No.: 6713 3842 5045
//   VID: 9120 3595 3405 8780
//   DOB: 13/07/2001  MALE

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use super::{first_match, DocumentText, Located, Strategy};
use crate::models::ExtractedFields;
use crate::processing::patterns::{LABEL_SEPARATOR, MOBILE_PATTERN, PIN_PATTERN};
use crate::processing::text::{
    clean_for_matching, collapse_repeated_words, contains_any, convert_devanagari_numerals,
    detect_gender, devanagari_only, extract_date, is_predominantly_devanagari, latin_only,
    looks_like_devanagari_name, looks_like_name, title_case,
};

lazy_static! {
    static ref AADHAAR_NUMBER_LABELS: Vec<Regex> = [
        r"(?i)your\s+aadhaar\s+no\.?",
        r"(?i)aadhaar\s+no\.?",
        r"आधार\s+क्रमांक",
        r"आपला\s+आधार\s+क्रमांक",
    ]
    .iter()
    .map(|label| {
        Regex::new(&format!(
            r"{}\s*{}?\s*([0-9]{{4}}\s?[0-9]{{4}}\s?[0-9]{{4}})\b",
            label, LABEL_SEPARATOR
        ))
        .unwrap()
    })
    .collect();

    static ref VID_LABELED: Regex = Regex::new(&format!(
        r"(?i)\bvid\s*{}?\s*([0-9]{{4}}\s?[0-9]{{4}}\s?[0-9]{{4}}\s?[0-9]{{4}})\b",
        LABEL_SEPARATOR
    ))
    .unwrap();

    static ref ENROLLMENT_LABELS: Vec<Regex> = [
        r"(?i)enrol(?:l)?(?:ment)?\s+no\.?",
        r"नोंदणी\s+क्रमांक",
        r"नामांकन\s+क्रम",
    ]
    .iter()
    .map(|label| {
        Regex::new(&format!(
            r"{}\s*{}?\s*([0-9]{{4}}/[0-9]{{5}}/[0-9]{{5}})",
            label, LABEL_SEPARATOR
        ))
        .unwrap()
    })
    .collect();

    static ref NAME_LABELED: Regex = Regex::new(&format!(
        r"(?i)(?:\bname|नाम)\s*{}?\s*([A-Za-z][A-Za-z\s]+)",
        LABEL_SEPARATOR
    ))
    .unwrap();

    static ref TO_MARKER: Regex = Regex::new(r"(?i)^[0-9]*\s*to\b").unwrap();

    static ref GROUPED_TWELVE_DIGITS: Regex =
        Regex::new(r"[0-9]{4}\s*[0-9]{4}\s*[0-9]{4}").unwrap();

    // Single-space grouping only, so a token cannot span two rows.
    static ref ROW_AADHAAR: Regex = Regex::new(r"\b[0-9]{4} ?[0-9]{4} ?[0-9]{4}\b").unwrap();
    static ref ROW_VID: Regex =
        Regex::new(r"\b[0-9]{4} ?[0-9]{4} ?[0-9]{4} ?[0-9]{4}\b").unwrap();

    static ref YEAR_OF_BIRTH: Regex = Regex::new(&format!(
        r"(?i)(?:year\s+of\s+birth|yob|जन्म\s+वर्ष)\s*{}?\s*([0-9]{{4}})\b",
        LABEL_SEPARATOR
    ))
    .unwrap();
}

// Rows inside the "To" block that are never the holder's name.
const TO_BLOCK_SKIP: &[&str] = &[
    "download", "issue", "generation", "validity", "aadhaar no", "vid", "enrol", "unique",
    "government", "authority", "qr code", "dob", "date of birth", "male", "female",
];

const NAME_SKIP_WORDS: &[&str] = &[
    "government", "india", "authority", "aadhaar", "unique", "identification", "enrolment",
    "download", "generation", "validity", "male", "female", "dob", "date", "birth", "address",
    "vid", "mobile",
];

const HINDI_SKIP_WORDS: &[&str] = &[
    "भारत", "सरकार", "आधार", "क्रमांक", "नोंदणी", "विशिष्ट", "ओळख", "प्राधिकरण", "माझे", "माझी",
    "पता", "जन्म", "पुरुष", "महिला",
];

const ADDRESS_SKIP: &[&str] = &[
    "download", "issue", "generation", "validity", "aadhaar", "vid", "unique", "government",
    "authority", "qr code", "dob", "date of birth", "birth", "gender", "male", "female", "enrol",
];

const ADDRESS_HINDI_SKIP: &[&str] = &["आधार", "क्रमांक", "माझे", "माझी", "ओळख", "सरकार"];

const MAX_ADDRESS_LINES: usize = 6;
const TO_BLOCK_SPAN: usize = 15;

pub fn extract_aadhaar(doc: &DocumentText) -> ExtractedFields {
    let mut info = ExtractedFields::new();

    if let Some(number) = first_match(doc, AADHAAR_NUMBER_STRATEGIES) {
        info.insert("document_id", number.clone());
        info.insert("aadhaar_number", number);
    }

    if let Some(caps) = VID_LABELED.captures(&doc.cleaned) {
        info.insert("vid", caps[1].replace(' ', ""));
    }

    if let Some(enrollment) = ENROLLMENT_LABELS
        .iter()
        .find_map(|label| label.captures(&doc.cleaned))
    {
        info.insert("enrollment_no", &enrollment[1]);
    }

    let name = first_match(doc, NAME_STRATEGIES);
    let name_hindi = first_match(doc, HINDI_NAME_STRATEGIES);

    if let Some(name) = &name {
        info.insert("name", name.value.clone());
    }
    if let Some(name_hindi) = &name_hindi {
        info.insert("name_hindi", name_hindi.value.clone());
    }

    let mut mobile = to_block_mobile(doc);

    // Address rows start right after the last name row.
    let name_row = match (&name, &name_hindi) {
        (Some(a), Some(b)) => Some(a.line.max(b.line)),
        (Some(a), None) => Some(a.line),
        (None, Some(b)) => Some(b.line),
        (None, None) => None,
    };
    if let Some(row) = name_row {
        let address = collect_address(doc, row);
        if mobile.is_none() {
            mobile = address.mobile;
        }
        if !address.latin.is_empty() {
            let joined = address.latin.join(", ");
            if let Some(pin) = PIN_PATTERN.captures(&joined) {
                info.insert("pin_code", &pin[1]);
            }
            info.insert("address", joined);
        }
        if !address.hindi.is_empty() {
            let joined = address.hindi.join(", ");
            if !info.contains_key("pin_code") {
                if let Some(pin) = PIN_PATTERN.captures(&convert_devanagari_numerals(&joined)) {
                    info.insert("pin_code", &pin[1]);
                }
            }
            info.insert("address_hindi", joined);
        }
    }
    info.insert_opt("mobile", mobile);

    if let Some(dob) = birth_date(doc) {
        info.insert("date_of_birth", dob);
    } else if let Some(caps) = YEAR_OF_BIRTH.captures(&doc.cleaned) {
        info.insert("year_of_birth", &caps[1]);
    }

    if let Some(gender) = detect_gender(&convert_devanagari_numerals(doc.raw)) {
        info.insert("gender", gender.english());
        info.insert("gender_hindi", gender.hindi());
    }

    debug!("aadhaar extraction produced {} fields", info.len());
    info
}

const AADHAAR_NUMBER_STRATEGIES: &[(&str, Strategy<String>)] = &[
    ("aadhaar number label", labeled_aadhaar_number),
    ("bare 12-digit token", unlabeled_aadhaar_number),
];

fn labeled_aadhaar_number(doc: &DocumentText) -> Option<String> {
    AADHAAR_NUMBER_LABELS
        .iter()
        .find_map(|label| label.captures(&doc.cleaned))
        .map(|caps| caps[1].replace(' ', ""))
}

// A 12-digit token that is neither the head of a 16-digit VID nor preceded by a VID label.
// Digit groups never join across rows.
fn unlabeled_aadhaar_number(doc: &DocumentText) -> Option<String> {
    let text = doc
        .lines
        .iter()
        .map(|line| clean_for_matching(line))
        .collect::<Vec<_>>()
        .join("\n");
    let text = text.as_str();
    let vid_spans: Vec<(usize, usize)> = ROW_VID
        .find_iter(text)
        .map(|m| (m.start(), m.end()))
        .collect();

    let mut pos = 0;
    while let Some(m) = ROW_AADHAAR.find_at(text, pos) {
        // Tokens are ASCII digits, so stepping past the first group stays on a char boundary.
        pos = m.start() + 4;
        let overlaps_vid = vid_spans
            .iter()
            .any(|(start, end)| m.start() < *end && m.end() > *start);
        if overlaps_vid {
            continue;
        }
        let context: String = text[..m.start()]
            .chars()
            .rev()
            .take(20)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        if context.to_lowercase().contains("vid") {
            continue;
        }
        let digits = m.as_str().replace(' ', "");
        if digits.len() == 12 {
            return Some(digits);
        }
    }
    None
}

const NAME_STRATEGIES: &[(&str, Strategy<Located<String>>)] = &[
    ("name label", labeled_name),
    ("to block", to_block_name),
    ("any line", any_line_name),
];

const HINDI_NAME_STRATEGIES: &[(&str, Strategy<Located<String>>)] = &[
    ("hindi name label", labeled_hindi_name),
    ("hindi to block", to_block_hindi_name),
    ("hindi any line", any_line_hindi_name),
];

fn finish_name(candidate: &str) -> Option<String> {
    let name = collapse_repeated_words(&title_case(&latin_only(candidate)));
    (!name.is_empty()).then_some(name)
}

fn usable_hindi_name(line: &str) -> Option<String> {
    let hindi = devanagari_only(line);
    if hindi.is_empty() || !looks_like_devanagari_name(&hindi) {
        return None;
    }
    if contains_any(&hindi, HINDI_SKIP_WORDS) {
        return None;
    }
    Some(collapse_repeated_words(&hindi))
}

fn labeled_name(doc: &DocumentText) -> Option<Located<String>> {
    doc.lines.iter().enumerate().find_map(|(i, line)| {
        let caps = NAME_LABELED.captures(line)?;
        let candidate = caps[1].trim();
        if looks_like_name(candidate) {
            finish_name(candidate).map(|name| Located::new(name, i))
        } else {
            None
        }
    })
}

fn labeled_hindi_name(doc: &DocumentText) -> Option<Located<String>> {
    doc.lines.iter().enumerate().find_map(|(i, line)| {
        if !line.contains("नाम") && !NAME_LABELED.is_match(line) {
            return None;
        }
        let without_label = line.replace("नाम", " ");
        usable_hindi_name(&without_label).map(|name| Located::new(name, i))
    })
}

fn to_marker_row(doc: &DocumentText) -> Option<usize> {
    doc.lines.iter().position(|line| {
        let lower = line.trim().to_lowercase();
        lower == "to" || lower.starts_with("to ") || TO_MARKER.is_match(&lower)
    })
}

/// Rows of the "To" block that are not labels.
fn to_block_rows<'d>(doc: &'d DocumentText) -> Vec<(usize, &'d str)> {
    let Some(start) = to_marker_row(doc) else {
        return Vec::new();
    };
    doc.lines
        .iter()
        .enumerate()
        .skip(start + 1)
        .take(TO_BLOCK_SPAN - 1)
        .filter(|(_, line)| !contains_any(&line.to_lowercase(), TO_BLOCK_SKIP))
        .map(|(i, line)| (i, line.as_str()))
        .collect()
}

fn to_block_name(doc: &DocumentText) -> Option<Located<String>> {
    to_block_rows(doc).into_iter().find_map(|(i, line)| {
        let english = latin_only(line);
        if !english.is_empty() && looks_like_name(&english) {
            finish_name(&english).map(|name| Located::new(name, i))
        } else {
            None
        }
    })
}

fn to_block_hindi_name(doc: &DocumentText) -> Option<Located<String>> {
    to_block_rows(doc).into_iter().find_map(|(i, line)| {
        if !is_predominantly_devanagari(line) {
            return None;
        }
        usable_hindi_name(line).map(|name| Located::new(name, i))
    })
}

fn to_block_mobile(doc: &DocumentText) -> Option<String> {
    to_block_rows(doc).into_iter().find_map(|(_, line)| {
        MOBILE_PATTERN
            .captures(&convert_devanagari_numerals(line))
            .map(|caps| caps[1].to_string())
    })
}

fn any_line_name(doc: &DocumentText) -> Option<Located<String>> {
    doc.lines.iter().enumerate().find_map(|(i, line)| {
        let english = latin_only(line);
        if english.is_empty() || !looks_like_name(&english) {
            return None;
        }
        if contains_any(&english.to_lowercase(), NAME_SKIP_WORDS) {
            return None;
        }
        finish_name(&english).map(|name| Located::new(name, i))
    })
}

fn any_line_hindi_name(doc: &DocumentText) -> Option<Located<String>> {
    doc.lines
        .iter()
        .enumerate()
        .find_map(|(i, line)| usable_hindi_name(line).map(|name| Located::new(name, i)))
}

#[derive(Debug, Default)]
struct AddressRows {
    latin: Vec<String>,
    hindi: Vec<String>,
    mobile: Option<String>,
}

fn collect_address(doc: &DocumentText, name_row: usize) -> AddressRows {
    let mut rows = AddressRows::default();
    for line in doc.lines.iter().skip(name_row + 1) {
        let lower = line.to_lowercase();
        if contains_any(&lower, ADDRESS_SKIP) {
            continue;
        }
        let converted = convert_devanagari_numerals(line);
        if lower.contains("your aadhaar") || GROUPED_TWELVE_DIGITS.is_match(&converted) {
            break;
        }

        if rows.mobile.is_none() {
            rows.mobile = MOBILE_PATTERN
                .captures(&converted)
                .map(|caps| caps[1].to_string());
        }

        let latin = latin_only(&converted);
        let without_mobile = MOBILE_PATTERN.replace_all(&latin, "");
        let english = without_mobile.trim_matches(|c: char| c == ',' || c.is_whitespace());
        if english.chars().count() > 2 {
            rows.latin.push(english.to_string());
        }

        let hindi = devanagari_only(line);
        if hindi.chars().count() > 2 && !contains_any(&hindi, ADDRESS_HINDI_SKIP) {
            rows.hindi.push(hindi);
        }

        if rows.latin.len() >= MAX_ADDRESS_LINES {
            break;
        }
    }
    rows
}

fn birth_date(doc: &DocumentText) -> Option<String> {
    doc.lines.iter().find_map(|line| {
        let converted = convert_devanagari_numerals(line);
        let lower = converted.to_lowercase();
        let labeled =
            contains_any(&lower, &["dob", "date of birth", "birth"]) || line.contains("जन्म");
        if labeled {
            extract_date(&converted)
        } else {
            None
        }
    })
}
