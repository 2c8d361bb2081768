// Text normalisation helpers shared by every extractor.
//
// Recognized text mixes Latin and Devanagari script on the same row, may carry
// Devanagari digits, and frequently repeats the last token of a name.

use chrono::NaiveDate;
use whatlang::Script;

use crate::processing::patterns::{is_female, is_male, is_other_gender, DATE_PATTERN};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Female,
    Male,
    Other,
}

impl Gender {
    pub fn english(&self) -> &'static str {
        match self {
            Gender::Female => "Female",
            Gender::Male => "Male",
            Gender::Other => "Other",
        }
    }

    pub fn hindi(&self) -> &'static str {
        match self {
            Gender::Female => "महिला",
            Gender::Male => "पुरुष",
            Gender::Other => "अन्य",
        }
    }
}

pub fn is_devanagari(c: char) -> bool {
    ('\u{0900}'..='\u{097F}').contains(&c)
}

/// Converts Devanagari digits (०-९) to ASCII digits.
pub fn convert_devanagari_numerals(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '०' => '0',
            '१' => '1',
            '२' => '2',
            '३' => '3',
            '४' => '4',
            '५' => '5',
            '६' => '6',
            '७' => '7',
            '८' => '8',
            '९' => '9',
            _ => c,
        })
        .collect()
}

/// Collapses every whitespace run (line breaks included) to a single space.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Numeral conversion plus whitespace normalisation. Never apply this before
/// splitting lines: line breaks separate visual rows.
pub fn clean_for_matching(text: &str) -> String {
    normalize_whitespace(&convert_devanagari_numerals(text))
}

/// Drops Devanagari characters, keeping Latin letters, digits and punctuation.
pub fn latin_only(text: &str) -> String {
    let kept: String = text.chars().filter(|c| !is_devanagari(*c)).collect();
    normalize_whitespace(&kept)
}

/// Keeps Devanagari characters and whitespace only.
pub fn devanagari_only(text: &str) -> String {
    let kept: String = text
        .chars()
        .filter(|c| is_devanagari(*c) || c.is_whitespace())
        .collect();
    normalize_whitespace(&kept)
}

pub fn has_devanagari(text: &str) -> bool {
    text.chars().any(is_devanagari)
}

/// Whether Devanagari is the dominant script of `text`.
pub fn is_predominantly_devanagari(text: &str) -> bool {
    matches!(whatlang::detect_script(text), Some(Script::Devanagari))
}

pub fn looks_like_name(text: &str) -> bool {
    let text = latin_only(text);
    let length = text.chars().count();
    if length < 3 {
        return false;
    }
    let words = text.split_whitespace().count();
    if !(1..=6).contains(&words) {
        return false;
    }
    let alpha = text
        .chars()
        .filter(|c| c.is_alphabetic() || c.is_whitespace())
        .count();
    alpha as f64 / length as f64 > 0.85
}

// Combining marks make an alphabetic ratio meaningless for Devanagari.
pub fn looks_like_devanagari_name(text: &str) -> bool {
    let text = devanagari_only(text);
    if text.chars().count() < 2 {
        return false;
    }
    (1..=6).contains(&text.split_whitespace().count())
}

/// Removes adjacent repeated words ("Singh Singh" -> "Singh"), keeping the
/// casing of the first occurrence.
pub fn collapse_repeated_words(name: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();
    for word in name.split_whitespace() {
        match kept.last() {
            Some(last) if last.to_lowercase() == word.to_lowercase() => {}
            _ => kept.push(word),
        }
    }
    kept.join(" ")
}

/// Upper-cases the first letter of every word and lower-cases the rest.
pub fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut previous_is_letter = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                result.extend(c.to_lowercase());
            } else {
                result.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            result.push(c);
            previous_is_letter = false;
        }
    }
    result
}

/// Drops whitespace-separated tokens that contain a digit, e.g. a date that
/// bled into a name row.
pub fn strip_numeric_tokens(text: &str) -> String {
    text.split_whitespace()
        .filter(|token| !token.chars().any(|c| c.is_ascii_digit() || c.is_numeric()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Removes every whole word of `text` that appears in `words`.
pub fn remove_words(text: &str, words: &[&str]) -> String {
    text.split_whitespace()
        .filter(|w| !words.contains(w))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Finds the first calendar-valid date in `text`, returned as D/M/YYYY with
/// the digits as written.
pub fn extract_date(text: &str) -> Option<String> {
    let cleaned = clean_for_matching(text);
    for caps in DATE_PATTERN.captures_iter(&cleaned) {
        let (day, month, year) = (&caps[1], &caps[2], &caps[3]);
        if is_calendar_date(day, month, year) {
            return Some(format!("{}/{}/{}", day, month, year));
        }
    }
    None
}

fn is_calendar_date(day: &str, month: &str, year: &str) -> bool {
    match (day.parse::<u32>(), month.parse::<u32>(), year.parse::<i32>()) {
        (Ok(d), Ok(m), Ok(y)) => NaiveDate::from_ymd_opt(y, m, d).is_some(),
        _ => false,
    }
}

/// Female is checked before Male so that "female" never resolves to Male.
pub fn detect_gender(text: &str) -> Option<Gender> {
    if is_female(text) {
        Some(Gender::Female)
    } else if is_male(text) {
        Some(Gender::Male)
    } else {
        None
    }
}

/// Like [`detect_gender`] but also recognises "Other"/"Transgender".
pub fn detect_gender_with_other(text: &str) -> Option<Gender> {
    detect_gender(text).or_else(|| is_other_gender(text).then_some(Gender::Other))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_devanagari_numerals() {
        assert_eq!(convert_devanagari_numerals("१२३४"), "1234");
        assert_eq!(convert_devanagari_numerals("DOB: ०१/०१/१९९०"), "DOB: 01/01/1990");
    }

    #[test]
    fn test_script_partitioning() {
        let line = "राम चंद्रशेखर Ram Chandrashekhar";
        assert_eq!(latin_only(line), "Ram Chandrashekhar");
        assert_eq!(devanagari_only(line), "राम चंद्रशेखर");
        assert!(has_devanagari(line));
        assert!(!has_devanagari("Ram"));
    }

    #[test]
    fn test_name_plausibility() {
        assert!(looks_like_name("Abhishek Kumar Singh"));
        assert!(!looks_like_name("Al"));
        assert!(!looks_like_name("DOB 13/07/2001"));
        assert!(!looks_like_name("one two three four five six seven"));
        assert!(looks_like_devanagari_name("अभिषेक कुमार सिंह"));
        assert!(!looks_like_devanagari_name("Abhishek"));
    }

    #[test]
    fn test_collapse_repeated_words() {
        assert_eq!(
            collapse_repeated_words("Abhishek Kumar Singh Singh"),
            "Abhishek Kumar Singh"
        );
        assert_eq!(collapse_repeated_words("Ravi RAVI kumar"), "Ravi kumar");
        assert_eq!(collapse_repeated_words("Singh Kumar Singh"), "Singh Kumar Singh");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("ABHISHEK kumar"), "Abhishek Kumar");
        assert_eq!(title_case("o'brien"), "O'Brien");
    }

    #[test]
    fn test_strip_numeric_tokens() {
        assert_eq!(strip_numeric_tokens("RAVI KUMAR 15/08/1990"), "RAVI KUMAR");
    }

    #[test]
    fn test_extract_date_formats() {
        assert_eq!(extract_date("DOB: 13/07/2001").as_deref(), Some("13/07/2001"));
        assert_eq!(extract_date("DOB 11-08-1990").as_deref(), Some("11/08/1990"));
        assert_eq!(extract_date("born 1 . 2 . 1985").as_deref(), Some("1/2/1985"));
        assert_eq!(extract_date("जन्म तिथि: १३/०७/२००१").as_deref(), Some("13/07/2001"));
        assert_eq!(extract_date("31/02/2001 or 28/02/2001").as_deref(), Some("28/02/2001"));
        assert_eq!(extract_date("no date here"), None);
    }

    #[test]
    fn test_gender_female_first() {
        assert_eq!(
            detect_gender("female applicant, not male"),
            Some(Gender::Female)
        );
        assert_eq!(detect_gender("Gender: MALE"), Some(Gender::Male));
        assert_eq!(detect_gender("लिंग: पुरुष"), Some(Gender::Male));
        assert_eq!(detect_gender("Gender: Other"), None);
        assert_eq!(detect_gender_with_other("Gender: Other"), Some(Gender::Other));
    }

    #[test]
    fn test_predominant_script() {
        assert!(is_predominantly_devanagari("अभिषेक कुमार सिंह"));
        assert!(!is_predominantly_devanagari("Abhishek Kumar Singh"));
    }
}
