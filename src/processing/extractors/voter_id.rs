// Voter ID (EPIC) extraction.
//
// Names are read in two passes: Hindi labels first ("नाम:" / "पिता का नामः"),
// then English labels, which must be followed by a real colon.

use lazy_static::lazy_static;
use regex::Regex;

use super::DocumentText;
use crate::models::ExtractedFields;
use crate::processing::patterns::{LABEL_SEPARATOR, VOTER_ID_PATTERN};
use crate::processing::text::{
    collapse_repeated_words, contains_any, detect_gender, devanagari_only, extract_date,
    latin_only, looks_like_devanagari_name, looks_like_name, title_case,
};

lazy_static! {
    static ref HINDI_NAME: Regex =
        Regex::new(&format!(r"नाम\s*{}\s*(.+)", LABEL_SEPARATOR)).unwrap();
    static ref HINDI_FATHER_NAME: Regex =
        Regex::new(&format!(r"पिता\s*(?:का\s*)?नाम\s*{}\s*(.+)", LABEL_SEPARATOR)).unwrap();
    static ref HINDI_HUSBAND_NAME: Regex =
        Regex::new(&format!(r"पति\s*(?:का\s*)?नाम\s*{}\s*(.+)", LABEL_SEPARATOR)).unwrap();

    static ref ENGLISH_NAME: Regex = Regex::new(r"(?i)name\s*:\s*([A-Za-z][A-Za-z\s]+)").unwrap();
    static ref ENGLISH_FATHER_NAME: Regex =
        Regex::new(r"(?i)father['’]?s?\s*name\s*:\s*([A-Za-z][A-Za-z\s]+)").unwrap();
    static ref ENGLISH_HUSBAND_NAME: Regex =
        Regex::new(r"(?i)husband['’]?s?\s*name\s*:\s*([A-Za-z][A-Za-z\s]+)").unwrap();
}

const HEADER_WORDS: &[&str] = &["election commission", "elector photo", "identity card"];

pub fn extract_voter_id(doc: &DocumentText) -> ExtractedFields {
    let mut info = ExtractedFields::new();

    if let Some(caps) = VOTER_ID_PATTERN.captures(&doc.upper) {
        info.insert("document_id", &caps[1]);
        info.insert("voter_id", &caps[1]);
    }

    let rows: Vec<&str> = doc
        .lines
        .iter()
        .map(String::as_str)
        .filter(|line| !is_header(line))
        .collect();

    // Pass one: Hindi labels.
    let name_hindi = rows.iter().find_map(|line| {
        if line.contains("पिता") || line.contains("पति") {
            return None;
        }
        hindi_value(&HINDI_NAME, line)
    });
    let father_name_hindi = rows
        .iter()
        .filter(|line| line.contains("पिता"))
        .find_map(|line| hindi_value(&HINDI_FATHER_NAME, line));
    let husband_name_hindi = rows
        .iter()
        .filter(|line| line.contains("पति"))
        .find_map(|line| hindi_value(&HINDI_HUSBAND_NAME, line));

    // Pass two: English labels.
    let name = rows.iter().find_map(|line| {
        let lower = line.to_lowercase();
        if !lower.contains("name") || lower.contains("father") || lower.contains("husband") {
            return None;
        }
        english_value(&ENGLISH_NAME, line)
    });
    let father_name = rows
        .iter()
        .filter(|line| line.to_lowercase().contains("father"))
        .find_map(|line| english_value(&ENGLISH_FATHER_NAME, line));
    let husband_name = rows
        .iter()
        .filter(|line| line.to_lowercase().contains("husband"))
        .find_map(|line| english_value(&ENGLISH_HUSBAND_NAME, line));

    info.insert_opt("name", name);
    info.insert_opt("name_hindi", name_hindi);
    info.insert_opt("father_name", father_name);
    info.insert_opt("father_name_hindi", father_name_hindi);
    info.insert_opt("husband_name", husband_name);
    info.insert_opt("husband_name_hindi", husband_name_hindi);

    let birth_date = rows
        .iter()
        .filter(|line| is_birth_label(line))
        .find_map(|line| extract_date(line));
    info.insert_opt("date_of_birth", birth_date);

    let gender = rows
        .iter()
        .filter(|line| is_gender_label(line))
        .find_map(|line| detect_gender(line));
    if let Some(gender) = gender {
        info.insert("gender", gender.english());
        info.insert("gender_hindi", gender.hindi());
    }

    info
}

fn is_header(line: &str) -> bool {
    contains_any(&line.to_lowercase(), HEADER_WORDS) || line.contains("भारत निर्वाचन")
}

fn is_birth_label(line: &str) -> bool {
    contains_any(&line.to_lowercase(), &["date of birth", "dob", "birth", "age"])
        || line.contains("जन्म")
}

fn is_gender_label(line: &str) -> bool {
    contains_any(&line.to_lowercase(), &["gender", "sex"]) || line.contains("लिंग")
}

fn hindi_value(label: &Regex, line: &str) -> Option<String> {
    let caps = label.captures(line)?;
    let hindi = devanagari_only(&caps[1]);
    (!hindi.is_empty() && looks_like_devanagari_name(&hindi))
        .then(|| collapse_repeated_words(&hindi))
}

fn english_value(label: &Regex, line: &str) -> Option<String> {
    let caps = label.captures(line)?;
    let english = latin_only(caps[1].trim());
    if english.is_empty() || !looks_like_name(&english) {
        return None;
    }
    Some(collapse_repeated_words(&title_case(&english)))
}
