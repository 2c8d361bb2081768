// Compiled ID-number and value patterns shared by the classifier and extractors.
// All patterns are matched against text whose Devanagari digits have already
// been converted to ASCII.

use lazy_static::lazy_static;
use regex::Regex;

/// Colon or Devanagari visarga (U+0903), which OCR emits interchangeably after labels.
pub const LABEL_SEPARATOR: &str = r"[ः:]";

lazy_static! {
    // PAN: 5 letters + 4 digits + 1 letter, e.g. ABCDE1234F
    pub static ref PAN_PATTERN: Regex = Regex::new(r"\b([A-Z]{5}[0-9]{4}[A-Z])\b").unwrap();

    // Aadhaar: 12 digits, optionally grouped as XXXX XXXX XXXX
    pub static ref AADHAAR_PATTERN: Regex =
        Regex::new(r"\b([0-9]{4}\s?[0-9]{4}\s?[0-9]{4})\b").unwrap();

    // VID: 16 digits, optionally grouped as XXXX XXXX XXXX XXXX
    pub static ref VID_PATTERN: Regex =
        Regex::new(r"\b([0-9]{4}\s?[0-9]{4}\s?[0-9]{4}\s?[0-9]{4})\b").unwrap();

    // EPIC: 3 letters + 7 digits, e.g. KKD1933993
    pub static ref VOTER_ID_PATTERN: Regex = Regex::new(r"\b([A-Z]{3}[0-9]{7})\b").unwrap();

    // Driving licence: state code + RTO code + 4 to 11 digits, e.g. MH12 20110012345
    pub static ref DRIVING_LICENSE_PATTERN: Regex =
        Regex::new(r"\b([A-Z]{2}[ -]?[0-9]{2}[ -]?(?:[0-9] ?){3,10}[0-9])\b").unwrap();

    // Older state formats separated by slashes, e.g. MH12/2011/0012345
    pub static ref STATE_DRIVING_LICENSE_PATTERN: Regex = Regex::new(concat!(
        r"\b((?:AN|AP|AR|AS|BR|CG|CH|DD|DL|GA|GJ|HP|HR|JH|JK|KA|KL|LA|LD|MH|ML|MN|MP|MZ|NL",
        r"|OD|OR|PB|PY|RJ|SK|TN|TR|TS|UK|UP|WB)[ -]?[0-9]{2}\s?/\s?[0-9]{4}\s?/\s?[0-9]{4,7})\b",
    ))
    .unwrap();

    // Dates written DD/MM/YYYY, DD-MM-YYYY or DD.MM.YYYY, spaces tolerated around separators
    pub static ref DATE_PATTERN: Regex =
        Regex::new(r"\b([0-9]{1,2})\s*[-/.]\s*([0-9]{1,2})\s*[-/.]\s*([0-9]{4})\b").unwrap();

    // Aadhaar enrolment number: XXXX/XXXXX/XXXXX
    pub static ref ENROLLMENT_PATTERN: Regex =
        Regex::new(r"\b([0-9]{4}/[0-9]{5}/[0-9]{5})\b").unwrap();

    pub static ref PIN_PATTERN: Regex = Regex::new(r"\b([0-9]{6})\b").unwrap();

    // Indian mobile numbers start with 6-9
    pub static ref MOBILE_PATTERN: Regex = Regex::new(r"\b([6-9][0-9]{9})\b").unwrap();

    pub static ref EMAIL_PATTERN: Regex =
        Regex::new(r"([A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,})").unwrap();

    static ref FEMALE_PATTERN: Regex = Regex::new(r"(?i)\bfemale\b|महिला|स्त्री").unwrap();
    static ref MALE_PATTERN: Regex = Regex::new(r"(?i)\bmale\b|पुरुष").unwrap();
    static ref OTHER_GENDER_PATTERN: Regex =
        Regex::new(r"(?i)\b(?:other|others|transgender)\b|अन्य").unwrap();
}

/// Whether an upper-cased, numeral-converted text holds any official ID token.
pub fn has_official_id(text_upper: &str) -> bool {
    PAN_PATTERN.is_match(text_upper)
        || AADHAAR_PATTERN.is_match(text_upper)
        || VOTER_ID_PATTERN.is_match(text_upper)
        || DRIVING_LICENSE_PATTERN.is_match(text_upper)
}

pub(crate) fn is_female(text: &str) -> bool {
    FEMALE_PATTERN.is_match(text)
}

pub(crate) fn is_male(text: &str) -> bool {
    MALE_PATTERN.is_match(text)
}

pub(crate) fn is_other_gender(text: &str) -> bool {
    OTHER_GENDER_PATTERN.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_patterns_respect_word_boundaries() {
        assert!(PAN_PATTERN.is_match("PAN ABCDE1234F"));
        assert!(!PAN_PATTERN.is_match("XABCDE1234F"));
        assert!(!PAN_PATTERN.is_match("ABCDE1234FG"));

        assert!(VOTER_ID_PATTERN.is_match("EPIC KKD1933993"));
        assert!(!VOTER_ID_PATTERN.is_match("KKD19339931"));

        assert!(AADHAAR_PATTERN.is_match("6713 3842 5045"));
        assert!(AADHAAR_PATTERN.is_match("671338425045"));
        assert!(!AADHAAR_PATTERN.is_match("6713384250451"));
    }

    #[test]
    fn test_driving_license_shapes() {
        let caps = DRIVING_LICENSE_PATTERN.captures("DL NO MH12 20110012345").unwrap();
        assert_eq!(&caps[1], "MH12 20110012345");
        assert!(DRIVING_LICENSE_PATTERN.is_match("DL-0420110149646"));
        assert!(!DRIVING_LICENSE_PATTERN.is_match("ABCDE1234F"));
        assert!(!DRIVING_LICENSE_PATTERN.is_match("KKD1933993"));
        assert!(STATE_DRIVING_LICENSE_PATTERN.is_match("MH12/2011/0012345"));
    }

    #[test]
    fn test_official_id_detection() {
        assert!(has_official_id("ABCDE1234F"));
        assert!(has_official_id("1234 5678 9012"));
        assert!(!has_official_id("NAME: RAVI\nADDRESS: PUNE"));
    }

    #[test]
    fn test_female_is_not_male() {
        assert!(is_male("Sex: Male"));
        assert!(!is_male("Sex: Female"));
        assert!(is_female("लिंग: महिला"));
    }
}
