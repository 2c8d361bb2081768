// Driving licence extraction.
//
// Licences frequently print the holder and guardian on one row
// ("Name: RAJESH KUMAR S/O SURESH KUMAR Add: ..."), and pack taluka, district
// and several dates onto shared rows, so values are cut at the next field marker.

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use super::{
    cut_at_markers, first_match, following_lines, text_after_label, DocumentText, Located, Strategy,
};
use crate::models::ExtractedFields;
use crate::processing::patterns::{
    DRIVING_LICENSE_PATTERN, LABEL_SEPARATOR, PIN_PATTERN, STATE_DRIVING_LICENSE_PATTERN,
};
use crate::processing::text::{
    collapse_repeated_words, convert_devanagari_numerals, extract_date, latin_only, looks_like_name,
    normalize_whitespace, strip_numeric_tokens,
};

const RELATION: &str = r"(?:[sdwc]\s*/\s*o|son\s+of|daughter\s+of|wife\s+of|care\s+of)";

lazy_static! {
    static ref DL_NUMBER_LABELED: Regex = Regex::new(&format!(
        concat!(
            r"(?i)\b(?:dl|d\.l\.|licen[cs]e)\s*(?:no|number|num)\.?\s*(?:{}|-)?\s*",
            r"([A-Z]{{2}}[ -]?[0-9]{{2}}[0-9 /-]{{4,16}})",
        ),
        LABEL_SEPARATOR
    ))
    .unwrap();
    static ref NORMALIZED_DL_NUMBER: Regex = Regex::new(r"^[A-Z]{2}[0-9]{6,13}$").unwrap();

    static ref NAME_LABEL: Regex = Regex::new(r"(?i)(?:\bname\b|नाम)").unwrap();
    static ref FATHER_LABEL: Regex = Regex::new(concat!(
        r"(?i)(?:father['’]?s?\s*name|guardian['’]?s?\s*name",
        r"|s\s*/\s*w\s*/\s*d\s*of|s\s*/\s*d\s*/\s*w\s*of|son\s*/\s*daughter\s*/\s*wife\s*of)",
    ))
    .unwrap();
    // S/O, D/O, W/O, C/O and their spelled-out forms
    static ref RELATION_MARKER: Regex =
        Regex::new(&format!(r"(?i)\b{}\b", RELATION)).unwrap();
    static ref RELATION_AT_START: Regex =
        Regex::new(&format!(r"(?i)^\s*{}\b", RELATION)).unwrap();

    static ref ADDRESS_LABEL: Regex =
        Regex::new(r"(?i)\b(?:permanent\s+|present\s+)?add(?:ress)?\b\.?").unwrap();
    static ref TALUKA_LABEL: Regex = Regex::new(r"(?i)\btal(?:uka)?\b\.?").unwrap();
    static ref DISTRICT_LABEL: Regex = Regex::new(r"(?i)\bdist(?:rict|t)?\b\.?").unwrap();
    static ref PIN_LABEL: Regex = Regex::new(r"(?i)\bpin(?:\s*code)?\b").unwrap();
    static ref DOB_LABEL: Regex =
        Regex::new(r"(?i)(?:\bdob\b|\bd\.o\.b\b\.?|date\s+of\s+birth|birth\s+date|जन्म)").unwrap();
    static ref VALID_TILL_LABEL: Regex = Regex::new(
        r"(?i)\b(?:valid\s+(?:till|upto|up\s+to)|validity(?:\s*\((?:nt|tr)\))?|expiry(?:\s+date)?)"
    )
    .unwrap();
    static ref ISSUE_DATE_LABEL: Regex = Regex::new(
        r"(?i)\b(?:date\s+of\s+(?:first\s+)?issue|issue\s+date|doi|issued\s+on)\b"
    )
    .unwrap();
    static ref OTHER_LABELS: Regex = Regex::new(
        r"(?i)\b(?:blood\s+group|bg|sign(?:ature)?|cov|dl\s*no|licen[cs]e\s*no|badge)\b"
    )
    .unwrap();
}

/// Markers that end a value when several fields share a row.
fn field_markers() -> [&'static Regex; 7] {
    [
        &ADDRESS_LABEL,
        &TALUKA_LABEL,
        &DISTRICT_LABEL,
        &DOB_LABEL,
        &PIN_LABEL,
        &VALID_TILL_LABEL,
        &ISSUE_DATE_LABEL,
    ]
}

/// Labels that end a multi-row value.
fn row_labels() -> [&'static Regex; 11] {
    [
        &NAME_LABEL,
        &FATHER_LABEL,
        &ADDRESS_LABEL,
        &TALUKA_LABEL,
        &DISTRICT_LABEL,
        &DOB_LABEL,
        &PIN_LABEL,
        &VALID_TILL_LABEL,
        &ISSUE_DATE_LABEL,
        &OTHER_LABELS,
        &RELATION_AT_START,
    ]
}

pub fn extract_driving_license(doc: &DocumentText) -> ExtractedFields {
    let mut info = ExtractedFields::new();

    if let Some(number) = first_match(doc, DL_NUMBER_STRATEGIES) {
        info.insert("document_id", number.clone());
        info.insert("dl_number", number);
    }

    if let Some(name) = first_match(doc, NAME_STRATEGIES) {
        info.insert("name", name.value);
    }
    info.insert_opt("father_name", first_match(doc, FATHER_STRATEGIES));

    let address = address(doc);
    let taluka = labeled_place(doc, &TALUKA_LABEL);
    let district = labeled_place(doc, &DISTRICT_LABEL);

    if let Some(address) = &address {
        info.insert("address", address.value.clone());
    }
    info.insert_opt("taluka", taluka.clone());
    info.insert_opt("district", district.clone());

    let parts: Vec<String> = [
        address.as_ref().map(|a| a.value.clone()),
        taluka.map(|t| format!("Tal: {}", t)),
        district.map(|d| format!("Dist: {}", d)),
    ]
    .into_iter()
    .flatten()
    .collect();
    if parts.len() >= 2 {
        info.insert("full_address", parts.join(", "));
    }

    info.insert_opt("pin_code", pin_code(doc, address.as_ref().map(|a| a.line)));
    info.insert_opt("date_of_birth", labeled_date(doc, &DOB_LABEL));
    info.insert_opt("valid_till", labeled_date(doc, &VALID_TILL_LABEL));
    info.insert_opt("issue_date", labeled_date(doc, &ISSUE_DATE_LABEL));

    debug!("driving licence extraction produced {} fields", info.len());
    info
}

const DL_NUMBER_STRATEGIES: &[(&str, Strategy<String>)] = &[
    ("dl number label", labeled_dl_number),
    ("generic licence shape", generic_dl_number),
    ("state slash format", state_dl_number),
];

fn normalize_dl_number(raw: &str) -> Option<String> {
    let compact: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '/')
        .collect();
    NORMALIZED_DL_NUMBER.is_match(&compact).then_some(compact)
}

fn labeled_dl_number(doc: &DocumentText) -> Option<String> {
    DL_NUMBER_LABELED
        .captures_iter(&doc.upper)
        .find_map(|caps| normalize_dl_number(caps[1].trim()))
}

fn generic_dl_number(doc: &DocumentText) -> Option<String> {
    DRIVING_LICENSE_PATTERN
        .captures_iter(&doc.upper)
        .find_map(|caps| normalize_dl_number(&caps[1]))
}

fn state_dl_number(doc: &DocumentText) -> Option<String> {
    STATE_DRIVING_LICENSE_PATTERN
        .captures_iter(&doc.upper)
        .find_map(|caps| normalize_dl_number(&caps[1]))
}

fn is_label_row(line: &str) -> bool {
    row_labels().iter().any(|label| label.is_match(line))
}

fn clean_person_name(candidate: &str) -> Option<String> {
    let cleaned = normalize_whitespace(&strip_numeric_tokens(&latin_only(candidate)));
    let cleaned = cleaned
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, ',' | '.' | ':' | '-'));
    if cleaned.is_empty() || !looks_like_name(cleaned) {
        return None;
    }
    Some(collapse_repeated_words(cleaned))
}

/// Rows holding a "Name" label that is not a father's/guardian's label.
fn name_rows<'d>(doc: &'d DocumentText) -> impl Iterator<Item = (usize, &'d str)> + 'd {
    doc.lines
        .iter()
        .enumerate()
        .filter(|(_, line)| NAME_LABEL.is_match(line) && !FATHER_LABEL.is_match(line))
        .map(|(i, line)| (i, line.as_str()))
}

/// Splits "X S/O Y ..." into the holder part and the guardian part.
fn split_on_relation(value: &str) -> (&str, Option<&str>) {
    match RELATION_MARKER.find(value) {
        Some(m) => (&value[..m.start()], Some(&value[m.end()..])),
        None => (value, None),
    }
}

fn guardian_from(rest: &str) -> Option<String> {
    let rest = rest
        .trim_start_matches(|c: char| c.is_whitespace() || matches!(c, ':' | 'ः' | '.' | '-'));
    clean_person_name(cut_at_markers(rest, &field_markers()))
}

const NAME_STRATEGIES: &[(&str, Strategy<Located<String>>)] = &[
    ("inline name", inline_name),
    ("name on next row", next_row_name),
];

fn inline_name(doc: &DocumentText) -> Option<Located<String>> {
    name_rows(doc).find_map(|(i, line)| {
        let rest = text_after_label(line, &NAME_LABEL)?;
        let (holder, _) = split_on_relation(rest);
        clean_person_name(cut_at_markers(holder, &field_markers()))
            .map(|name| Located::new(name, i))
    })
}

fn next_row_name(doc: &DocumentText) -> Option<Located<String>> {
    name_rows(doc).find_map(|(i, _)| {
        let next = doc.line(i + 1)?;
        if FATHER_LABEL.is_match(next) || RELATION_AT_START.is_match(next) {
            return None;
        }
        let (holder, _) = split_on_relation(next);
        clean_person_name(cut_at_markers(holder, &field_markers()))
            .map(|name| Located::new(name, i + 1))
    })
}

const FATHER_STRATEGIES: &[(&str, Strategy<String>)] = &[
    ("relation marker on name row", merged_row_guardian),
    ("relation marker starting a row", relation_row_guardian),
    ("inline father's name", inline_father_name),
    ("father's name on next row", next_row_father_name),
];

fn merged_row_guardian(doc: &DocumentText) -> Option<String> {
    name_rows(doc).find_map(|(i, line)| {
        let rest = text_after_label(line, &NAME_LABEL)?;
        let (_, guardian) = split_on_relation(rest);
        let guardian = guardian?;
        guardian_from(guardian).or_else(|| {
            // "Name: X S/O" with the guardian wrapped onto the next row
            let next = doc.line(i + 1)?;
            if is_label_row(next) {
                return None;
            }
            guardian_from(next)
        })
    })
}

fn relation_row_guardian(doc: &DocumentText) -> Option<String> {
    doc.lines.iter().find_map(|line| {
        let m = RELATION_AT_START.find(line)?;
        guardian_from(&line[m.end()..])
    })
}

fn inline_father_name(doc: &DocumentText) -> Option<String> {
    doc.lines.iter().find_map(|line| {
        let rest = text_after_label(line, &FATHER_LABEL)?;
        guardian_from(rest)
    })
}

fn next_row_father_name(doc: &DocumentText) -> Option<String> {
    doc.lines.iter().enumerate().find_map(|(i, line)| {
        if !FATHER_LABEL.is_match(line) {
            return None;
        }
        let next = doc.line(i + 1)?;
        if is_label_row(next) {
            return None;
        }
        guardian_from(next)
    })
}

fn clean_place(value: &str) -> String {
    normalize_whitespace(value)
        .trim_matches(|c: char| c == ',' || c == '.' || c == ':' || c == '-' || c.is_whitespace())
        .to_string()
}

/// Address value after its label plus continuation rows, up to the next label.
fn address(doc: &DocumentText) -> Option<Located<String>> {
    doc.lines.iter().enumerate().find_map(|(i, line)| {
        let rest = text_after_label(line, &ADDRESS_LABEL)?;
        let mut parts = Vec::new();
        let inline = clean_place(cut_at_markers(rest, &field_markers()[1..]));
        if !inline.is_empty() {
            parts.push(inline);
        }
        for (_, next) in following_lines(doc, i, 3, &row_labels()) {
            let piece = clean_place(cut_at_markers(next, &field_markers()));
            if piece.is_empty() {
                break;
            }
            parts.push(piece);
        }
        (!parts.is_empty()).then(|| Located::new(parts.join(", "), i))
    })
}

/// Taluka or district: alphabetic value after the label, or on the next row.
fn labeled_place(doc: &DocumentText, label: &Regex) -> Option<String> {
    doc.lines.iter().enumerate().find_map(|(i, line)| {
        let rest = text_after_label(line, label)?;
        let value = place_value(rest).or_else(|| {
            let next = doc.line(i + 1)?;
            if is_label_row(next) {
                return None;
            }
            place_value(next)
        })?;
        Some(value)
    })
}

fn place_value(text: &str) -> Option<String> {
    let cut = cut_at_markers(text, &field_markers());
    let value = clean_place(&strip_numeric_tokens(&latin_only(cut)));
    value
        .chars()
        .next()
        .filter(|c| c.is_alphabetic())
        .map(|_| value.clone())
}

fn pin_code(doc: &DocumentText, address_row: Option<usize>) -> Option<String> {
    let labeled = doc.lines.iter().find_map(|line| {
        let rest = text_after_label(line, &PIN_LABEL)?;
        PIN_PATTERN
            .captures(&convert_devanagari_numerals(rest))
            .map(|caps| caps[1].to_string())
    });
    labeled.or_else(|| {
        let start = address_row?;
        doc.lines.iter().skip(start).take(4).find_map(|line| {
            PIN_PATTERN
                .captures(&convert_devanagari_numerals(line))
                .map(|caps| caps[1].to_string())
        })
    })
}

/// Date following `label` on its row, or the first date on the next row.
fn labeled_date(doc: &DocumentText, label: &Regex) -> Option<String> {
    doc.lines.iter().enumerate().find_map(|(i, line)| {
        let rest = text_after_label(line, label)?;
        extract_date(rest).or_else(|| {
            let next = doc.line(i + 1)?;
            if label.is_match(next) {
                return None;
            }
            extract_date(next)
        })
    })
}

#[cfg(test)]
mod tests {
    use super::super::extract;
    use crate::models::DocumentType;

    const LICENCE: &str = "UNION OF INDIA\n\
        MAHARASHTRA STATE MOTOR DRIVING LICENCE\n\
        DL No: MH12 20110012345\n\
        DOI: 15/06/2011 Valid Till: 14/06/2031\n\
        Name: RAJESH KUMAR PATIL S/O SURESH PATIL\n\
        Add: 12 SHIVAJI NAGAR, NEAR BUS STAND\n\
        KOTHRUD\n\
        Tal: Haveli Dist: Pune PIN: 411038\n\
        DOB: 02-03-1985 BG: B+";

    #[test]
    fn test_licence_fields() {
        let info = extract(LICENCE, DocumentType::DrivingLicense);
        assert_eq!(info.get("document_id"), Some("MH1220110012345"));
        assert_eq!(info.get("dl_number"), Some("MH1220110012345"));
        assert_eq!(info.get("name"), Some("RAJESH KUMAR PATIL"));
        assert_eq!(info.get("father_name"), Some("SURESH PATIL"));
        assert_eq!(info.get("address"), Some("12 SHIVAJI NAGAR, NEAR BUS STAND, KOTHRUD"));
        assert_eq!(info.get("taluka"), Some("Haveli"));
        assert_eq!(info.get("district"), Some("Pune"));
        assert_eq!(
            info.get("full_address"),
            Some("12 SHIVAJI NAGAR, NEAR BUS STAND, KOTHRUD, Tal: Haveli, Dist: Pune")
        );
        assert_eq!(info.get("pin_code"), Some("411038"));
        assert_eq!(info.get("date_of_birth"), Some("02/03/1985"));
        assert_eq!(info.get("issue_date"), Some("15/06/2011"));
        assert_eq!(info.get("valid_till"), Some("14/06/2031"));
    }

    #[test]
    fn test_guardian_cut_at_next_marker() {
        let text = "Name: ANITA SHARMA D/O RAMESH SHARMA Address: 4 MALL ROAD";
        let info = extract(text, DocumentType::DrivingLicense);
        assert_eq!(info.get("name"), Some("ANITA SHARMA"));
        assert_eq!(info.get("father_name"), Some("RAMESH SHARMA"));
        assert_eq!(info.get("address"), Some("4 MALL ROAD"));
        assert!(!info.contains_key("full_address"));
    }

    #[test]
    fn test_separate_father_label_row() {
        let text = "Name: VIKRAM SINGH\nS/W/D of: MOHAN SINGH\nDate of Birth: 10/10/1992";
        let info = extract(text, DocumentType::DrivingLicense);
        assert_eq!(info.get("name"), Some("VIKRAM SINGH"));
        assert_eq!(info.get("father_name"), Some("MOHAN SINGH"));
        assert_eq!(info.get("date_of_birth"), Some("10/10/1992"));
    }

    #[test]
    fn test_son_of_spelled_out() {
        let text = "Name RAVI VERMA son of AJAY VERMA";
        let info = extract(text, DocumentType::DrivingLicense);
        assert_eq!(info.get("name"), Some("RAVI VERMA"));
        assert_eq!(info.get("father_name"), Some("AJAY VERMA"));
    }

    #[test]
    fn test_wife_of_and_care_of() {
        let text = "Name: SUNITA DEVI W/O RAJ KUMAR\nDOB: 01/01/1990";
        let info = extract(text, DocumentType::DrivingLicense);
        assert_eq!(info.get("name"), Some("SUNITA DEVI"));
        assert_eq!(info.get("father_name"), Some("RAJ KUMAR"));

        let text = "Name: ARJUN RAO\nC/O: MEENA RAO\nAddress: 7 LAKE ROAD";
        let info = extract(text, DocumentType::DrivingLicense);
        assert_eq!(info.get("name"), Some("ARJUN RAO"));
        assert_eq!(info.get("father_name"), Some("MEENA RAO"));
        assert_eq!(info.get("address"), Some("7 LAKE ROAD"));
    }

    #[test]
    fn test_number_priority() {
        let info = extract("Licence No. DL-0420110149646", DocumentType::DrivingLicense);
        assert_eq!(info.get("document_id"), Some("DL0420110149646"));

        let info = extract("MH12/2011/0012345", DocumentType::DrivingLicense);
        assert_eq!(info.get("document_id"), Some("MH1220110012345"));
    }
}
