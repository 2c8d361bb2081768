// Handwritten application form extraction.
//
// Form labels sit at the start of a row, optionally numbered ("1." / "2)"),
// followed by a colon, visarga, dash or plain space. A label with nothing after
// it takes its value from the next row.

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use super::{following_lines, DocumentText};
use crate::models::ExtractedFields;
use crate::processing::patterns::{EMAIL_PATTERN, LABEL_SEPARATOR, MOBILE_PATTERN, PIN_PATTERN};
use crate::processing::text::{
    collapse_repeated_words, convert_devanagari_numerals, detect_gender_with_other, extract_date,
    normalize_whitespace, strip_numeric_tokens,
};

pub const FORM_TYPE: &str = "handwritten_form";

const MAX_ADDRESS_LINES: usize = 4;
const MAX_AGE: u32 = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormField {
    FirstName,
    MiddleName,
    LastName,
    FatherName,
    MotherName,
    DateOfBirth,
    Age,
    Gender,
    Address,
    City,
    State,
    PinCode,
    Mobile,
    Email,
    Occupation,
    FullName,
}

// Specific labels come before the bare "Name" label.
const LABEL_TABLE: &[(FormField, &str)] = &[
    (FormField::FirstName, r"first\s*name|given\s*name|पहला\s*नाम"),
    (FormField::MiddleName, r"middle\s*name|मध्य\s*नाम"),
    (FormField::LastName, r"last\s*name|surname|family\s*name|उपनाम"),
    (
        FormField::FatherName,
        r"father['’]?s?\s*name|name\s+of\s+(?:the\s+)?father|father|पिता\s*(?:का\s*)?(?:नाम)?",
    ),
    (
        FormField::MotherName,
        r"mother['’]?s?\s*name|name\s+of\s+(?:the\s+)?mother|mother|माता\s*(?:का\s*)?(?:नाम)?",
    ),
    (
        FormField::DateOfBirth,
        r"date\s*of\s*birth|birth\s*date|d\.?\s*o\.?\s*b\.?|जन्म\s*(?:तिथि|तारीख)?",
    ),
    (FormField::Age, r"age|आयु|उम्र"),
    (FormField::Gender, r"gender|sex|लिंग"),
    (
        FormField::Address,
        r"(?:permanent\s+|present\s+|residential\s+|postal\s+)?address|पता",
    ),
    (FormField::City, r"city|town|village|शहर"),
    (FormField::State, r"state|राज्य"),
    (
        FormField::PinCode,
        r"pin\s*code|pincode|postal\s*code|zip(?:\s*code)?|pin",
    ),
    (
        FormField::Mobile,
        r"(?:mobile|phone|contact)(?:\s*(?:no|number)\.?)?|मोबाइल",
    ),
    (FormField::Email, r"e-?mail(?:\s*(?:id|address))?|ईमेल"),
    (FormField::Occupation, r"occupation|profession|व्यवसाय"),
    (
        FormField::FullName,
        r"(?:full\s*)?name(?:\s+of\s+(?:the\s+)?applicant)?|applicant['’]?s?\s*name|नाम",
    ),
];

/// Label at the start of a row; group 1 is the value.
fn form_label(alternatives: &str) -> Regex {
    Regex::new(&format!(
        r"(?i)^\s*(?:[0-9]+\s*[.)]\s*)?(?:{})(?:\s*(?:{}|-)\s*|\s+|$)(.*)$",
        alternatives, LABEL_SEPARATOR
    ))
    .unwrap()
}

/// Label further along a row. Needs a separator so that ordinary words in a
/// value ("State Bank") do not end it.
fn form_marker(alternatives: &str) -> Regex {
    Regex::new(&format!(
        r"(?i)(?:^|\s)(?:[0-9]+\s*[.)]\s*)?(?:{})\s*(?:{}|-)",
        alternatives, LABEL_SEPARATOR
    ))
    .unwrap()
}

lazy_static! {
    static ref FORM_LABELS: Vec<(FormField, Regex)> = LABEL_TABLE
        .iter()
        .map(|(field, alternatives)| (*field, form_label(alternatives)))
        .collect();
    static ref FORM_MARKERS: Vec<Regex> = LABEL_TABLE
        .iter()
        .map(|(_, alternatives)| form_marker(alternatives))
        .collect();

    static ref ROW_LABELS: Vec<&'static Regex> = FORM_LABELS.iter().map(|(_, re)| re).collect();
    static ref AGE_VALUE: Regex = Regex::new(r"\b([0-9]{1,3})\b").unwrap();
}

/// One labelled field: which field it names and the text after the label.
struct LabelledRow<'d> {
    field: FormField,
    index: usize,
    value: &'d str,
    // Only the last field on a row may borrow its value from the next row.
    ends_row: bool,
}

/// Start of the next label at or after `from`, never at the very start of `segment`.
fn next_marker(segment: &str, from: usize) -> Option<usize> {
    FORM_MARKERS
        .iter()
        .filter_map(|marker| {
            marker
                .find_iter(&segment[from..])
                .map(|m| from + m.start())
                .find(|start| *start > 0)
        })
        .min()
}

/// Splits a row into its labelled fields; "City: Pune State: Maharashtra"
/// yields two.
fn labelled_rows(line: &str, index: usize) -> Vec<LabelledRow<'_>> {
    let mut rows = Vec::new();
    let mut rest = line;
    loop {
        let labelled = FORM_LABELS.iter().find_map(|(field, label)| {
            let value = label.captures(rest)?.get(1)?;
            Some((*field, value.start()))
        });
        let value_start = labelled.map_or(0, |(_, start)| start);
        let cut = next_marker(rest, value_start);
        if let Some((field, _)) = labelled {
            let value_end = cut.unwrap_or(rest.len()).max(value_start);
            rows.push(LabelledRow {
                field,
                index,
                value: rest[value_start..value_end].trim(),
                ends_row: cut.is_none(),
            });
        }
        match cut {
            Some(start) => rest = &rest[start..],
            None => return rows,
        }
    }
}

fn is_label_row(line: &str) -> bool {
    ROW_LABELS.iter().any(|label| label.is_match(line))
}

pub fn extract_handwritten(doc: &DocumentText) -> ExtractedFields {
    let mut info = ExtractedFields::new();
    info.insert("form_type", FORM_TYPE);

    let rows: Vec<LabelledRow> = doc
        .lines
        .iter()
        .enumerate()
        .flat_map(|(i, line)| labelled_rows(line, i))
        .collect();
    let value_of = |field: FormField, parse: fn(&str) -> Option<String>| {
        rows.iter()
            .filter(|row| row.field == field)
            .find_map(|row| row_value(doc, row, parse))
    };

    let first = value_of(FormField::FirstName, person_name);
    let middle = value_of(FormField::MiddleName, person_name);
    let last = value_of(FormField::LastName, person_name);
    if first.is_some() || middle.is_some() || last.is_some() {
        let combined: Vec<&str> = [&first, &middle, &last]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .collect();
        info.insert("name", combined.join(" "));
        info.insert_opt("first_name", first);
        info.insert_opt("middle_name", middle);
        info.insert_opt("last_name", last);
    } else if let Some(full) = value_of(FormField::FullName, person_name) {
        split_full_name(&full, &mut info);
        info.insert("name", full);
    }

    info.insert_opt("father_name", value_of(FormField::FatherName, person_name));
    info.insert_opt("mother_name", value_of(FormField::MotherName, person_name));
    info.insert_opt("date_of_birth", value_of(FormField::DateOfBirth, extract_date));
    info.insert_opt("age", value_of(FormField::Age, age));
    info.insert_opt("gender", value_of(FormField::Gender, gender));

    let address = rows
        .iter()
        .find(|row| row.field == FormField::Address)
        .and_then(|row| address(doc, row));
    info.insert_opt("city", value_of(FormField::City, plain_value));
    info.insert_opt("state", value_of(FormField::State, plain_value));
    info.insert_opt(
        "pin_code",
        value_of(FormField::PinCode, pin_code).or_else(|| address.as_deref().and_then(pin_in)),
    );
    info.insert_opt("address", address);

    info.insert_opt(
        "mobile",
        value_of(FormField::Mobile, mobile).or_else(|| {
            MOBILE_PATTERN
                .captures(&doc.cleaned)
                .map(|caps| caps[1].to_string())
        }),
    );
    info.insert_opt(
        "email",
        value_of(FormField::Email, email).or_else(|| email(&doc.cleaned)),
    );
    info.insert_opt("occupation", value_of(FormField::Occupation, plain_value));

    debug!("handwritten form extraction produced {} fields", info.len());
    info
}

/// Parses the inline value, falling back to the next row when that row is not
/// itself labelled.
fn row_value(
    doc: &DocumentText,
    row: &LabelledRow,
    parse: fn(&str) -> Option<String>,
) -> Option<String> {
    if !row.value.is_empty() || !row.ends_row {
        return parse(row.value);
    }
    let next = doc.line(row.index + 1)?;
    if is_label_row(next) {
        return None;
    }
    parse(next)
}

fn trim_value(value: &str) -> String {
    normalize_whitespace(value)
        .trim_matches(|c: char| {
            matches!(c, ',' | '.' | ':' | ';' | '-' | '_') || c.is_whitespace()
        })
        .to_string()
}

fn plain_value(value: &str) -> Option<String> {
    let value = trim_value(value);
    (!value.is_empty()).then_some(value)
}

fn person_name(value: &str) -> Option<String> {
    plain_value(&collapse_repeated_words(&strip_numeric_tokens(value)))
}

fn split_full_name(full: &str, info: &mut ExtractedFields) {
    let words: Vec<&str> = full.split_whitespace().collect();
    match words.as_slice() {
        [] => {}
        [only] => info.insert("first_name", *only),
        [first, last] => {
            info.insert("first_name", *first);
            info.insert("last_name", *last);
        }
        [first, middle @ .., last] => {
            info.insert("first_name", *first);
            info.insert("middle_name", middle.join(" "));
            info.insert("last_name", *last);
        }
    }
}

fn age(value: &str) -> Option<String> {
    let converted = convert_devanagari_numerals(value);
    let caps = AGE_VALUE.captures(&converted)?;
    let years: u32 = caps[1].parse().ok()?;
    (years <= MAX_AGE).then(|| years.to_string())
}

fn gender(value: &str) -> Option<String> {
    detect_gender_with_other(value).map(|g| g.english().to_string())
}

fn digits(value: &str) -> String {
    convert_devanagari_numerals(value)
        .chars()
        .filter(char::is_ascii_digit)
        .collect()
}

fn pin_code(value: &str) -> Option<String> {
    let all = digits(value);
    if all.len() == 6 {
        return Some(all);
    }
    pin_in(value)
}

fn pin_in(text: &str) -> Option<String> {
    PIN_PATTERN
        .captures(&convert_devanagari_numerals(text))
        .map(|caps| caps[1].to_string())
}

fn mobile(value: &str) -> Option<String> {
    let all = digits(value);
    let local = match all.len() {
        12 if all.starts_with("91") => &all[2..],
        11 if all.starts_with('0') => &all[1..],
        _ => all.as_str(),
    };
    (local.len() == 10 && MOBILE_PATTERN.is_match(local)).then(|| local.to_string())
}

fn email(value: &str) -> Option<String> {
    EMAIL_PATTERN
        .captures(value)
        .map(|caps| caps[1].to_string())
}

/// Inline address plus continuation rows up to the next label.
fn address(doc: &DocumentText, row: &LabelledRow) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(inline) = plain_value(row.value) {
        parts.push(inline);
    }
    if row.ends_row {
        for (_, line) in following_lines(doc, row.index, MAX_ADDRESS_LINES, &ROW_LABELS) {
            let cut = next_marker(line, 0);
            if let Some(piece) = plain_value(&line[..cut.unwrap_or(line.len())]) {
                parts.push(piece);
            }
            if cut.is_some() {
                break;
            }
        }
    }
    (!parts.is_empty()).then(|| parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::super::extract;
    use super::FORM_TYPE;
    use crate::models::DocumentType;
    use crate::processing::classify;

    const FORM: &str = "APPLICATION FORM\n\
        1. First Name: Priya\n\
        2. Middle Name: Ramesh\n\
        3. Last Name: Deshmukh\n\
        4. Father's Name: Ramesh Deshmukh\n\
        5. Mother's Name - Sunita Deshmukh\n\
        6. Date of Birth: 05/11/1994\n\
        7. Age: 29 years\n\
        8. Gender: Female\n\
        9. Address:\n\
        Flat 3, Sai Residency\n\
        Karve Nagar\n\
        10. City: Pune\n\
        11. State: Maharashtra\n\
        12. Pin Code: 411 052\n\
        13. Mobile No: +91 98220 12345\n\
        14. Email: priya.d@example.com\n\
        15. Occupation: Teacher";

    #[test]
    fn test_numbered_form() {
        let info = extract(FORM, DocumentType::Handwritten);
        assert_eq!(info.get("form_type"), Some(FORM_TYPE));
        assert_eq!(info.get("first_name"), Some("Priya"));
        assert_eq!(info.get("middle_name"), Some("Ramesh"));
        assert_eq!(info.get("last_name"), Some("Deshmukh"));
        assert_eq!(info.get("name"), Some("Priya Ramesh Deshmukh"));
        assert_eq!(info.get("father_name"), Some("Ramesh Deshmukh"));
        assert_eq!(info.get("mother_name"), Some("Sunita Deshmukh"));
        assert_eq!(info.get("date_of_birth"), Some("05/11/1994"));
        assert_eq!(info.get("age"), Some("29"));
        assert_eq!(info.get("gender"), Some("Female"));
        assert_eq!(info.get("address"), Some("Flat 3, Sai Residency, Karve Nagar"));
        assert_eq!(info.get("city"), Some("Pune"));
        assert_eq!(info.get("state"), Some("Maharashtra"));
        assert_eq!(info.get("pin_code"), Some("411052"));
        assert_eq!(info.get("mobile"), Some("9822012345"));
        assert_eq!(info.get("email"), Some("priya.d@example.com"));
        assert_eq!(info.get("occupation"), Some("Teacher"));
    }

    #[test]
    fn test_full_name_split_by_word_count() {
        let info = extract("Name: Ravi Kumar Singh Yadav", DocumentType::Handwritten);
        assert_eq!(info.get("name"), Some("Ravi Kumar Singh Yadav"));
        assert_eq!(info.get("first_name"), Some("Ravi"));
        assert_eq!(info.get("middle_name"), Some("Kumar Singh"));
        assert_eq!(info.get("last_name"), Some("Yadav"));

        let info = extract("Name: Ravi Kumar", DocumentType::Handwritten);
        assert_eq!(info.get("first_name"), Some("Ravi"));
        assert_eq!(info.get("last_name"), Some("Kumar"));
        assert!(!info.contains_key("middle_name"));

        let info = extract("Name\nRavi", DocumentType::Handwritten);
        assert_eq!(info.get("first_name"), Some("Ravi"));
        assert!(!info.contains_key("last_name"));
    }

    #[test]
    fn test_other_gender_and_visarga_labels() {
        let info = extract("नामः सीमा\nलिंगः Other\nआयुः ४२", DocumentType::Handwritten);
        assert_eq!(info.get("name"), Some("सीमा"));
        assert_eq!(info.get("gender"), Some("Other"));
        assert_eq!(info.get("age"), Some("42"));
    }

    #[test]
    fn test_implausible_age_and_unlabelled_contacts() {
        let text = "Age: 420\nreach me at 9876543210 or ravi@mail.in";
        let info = extract(text, DocumentType::Handwritten);
        assert!(!info.contains_key("age"));
        assert_eq!(info.get("mobile"), Some("9876543210"));
        assert_eq!(info.get("email"), Some("ravi@mail.in"));
    }

    #[test]
    fn test_label_prefix_is_not_a_label() {
        let info = extract("Agent code: 12\nStatement enclosed", DocumentType::Handwritten);
        assert!(!info.contains_key("age"));
        assert!(!info.contains_key("state"));
    }

    #[test]
    fn test_repeated_name_words_collapse() {
        let text = "Name: Abhishek Kumar Singh Singh";
        let info = extract(text, classify(text).document_type);
        assert_eq!(info.get("name"), Some("Abhishek Kumar Singh"));
        assert_eq!(info.get("middle_name"), Some("Kumar"));
        assert_eq!(info.get("last_name"), Some("Singh"));

        let info = extract("Full Name: Ravi Ravi Kumar", DocumentType::Handwritten);
        assert_eq!(info.get("name"), Some("Ravi Kumar"));
    }

    #[test]
    fn test_several_labels_on_one_row() {
        let info = extract("City: Pune State: Maharashtra", DocumentType::Handwritten);
        assert_eq!(info.get("city"), Some("Pune"));
        assert_eq!(info.get("state"), Some("Maharashtra"));

        let info = extract("Name: Ravi Kumar Age: 29", DocumentType::Handwritten);
        assert_eq!(info.get("name"), Some("Ravi Kumar"));
        assert_eq!(info.get("last_name"), Some("Kumar"));
        assert_eq!(info.get("age"), Some("29"));

        let info = extract("Address: 12 MG Road Pin - 411001
City: Pune", DocumentType::Handwritten);
        assert_eq!(info.get("address"), Some("12 MG Road"));
        assert_eq!(info.get("pin_code"), Some("411001"));
        assert_eq!(info.get("city"), Some("Pune"));
    }

    #[test]
    fn test_label_word_inside_value_is_kept() {
        let info = extract("Occupation: State Bank clerk", DocumentType::Handwritten);
        assert_eq!(info.get("occupation"), Some("State Bank clerk"));
        assert!(!info.contains_key("state"));
    }
}
