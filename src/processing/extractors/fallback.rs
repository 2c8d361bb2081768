// Extraction for text that could not be classified: the first official ID
// token of any kind and the first date.

use regex::Regex;

use super::DocumentText;
use crate::models::ExtractedFields;
use crate::processing::patterns::{
    AADHAAR_PATTERN, DRIVING_LICENSE_PATTERN, PAN_PATTERN, VOTER_ID_PATTERN,
};
use crate::processing::text::extract_date;

pub fn extract_generic(doc: &DocumentText) -> ExtractedFields {
    let mut info = ExtractedFields::new();

    let id_patterns: [&Regex; 4] = [
        &PAN_PATTERN,
        &AADHAAR_PATTERN,
        &VOTER_ID_PATTERN,
        &DRIVING_LICENSE_PATTERN,
    ];
    let document_id = id_patterns
        .iter()
        .find_map(|pattern| pattern.captures(&doc.upper).map(|caps| compact(&caps[1])));
    info.insert_opt("document_id", document_id);
    info.insert_opt("date_of_birth", extract_date(doc.raw));

    info
}

/// Grouped Aadhaar and licence numbers are reported without their separators.
fn compact(token: &str) -> String {
    token
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::super::extract;
    use crate::models::DocumentType;

    #[test]
    fn test_pan_token_wins_over_later_ids() {
        let text = "ref 1234 5678 9012\nid abcde1234f\nissued 01-01-2020";
        let info = extract(text, DocumentType::Unknown);
        assert_eq!(info.get("document_id"), Some("ABCDE1234F"));
        assert_eq!(info.get("date_of_birth"), Some("01/01/2020"));
    }

    #[test]
    fn test_grouped_tokens_are_compacted() {
        let info = extract("number 1234 5678 9012", DocumentType::Unknown);
        assert_eq!(info.get("document_id"), Some("123456789012"));
        assert!(!info.contains_key("date_of_birth"));

        let info = extract("licence mh-12 2011 0012345", DocumentType::Unknown);
        assert_eq!(info.get("document_id"), Some("MH1220110012345"));
        assert!(!info.contains_key("date_of_birth"));
    }

    #[test]
    fn test_nothing_recognisable() {
        assert!(extract("hello world", DocumentType::Unknown).is_empty());
    }
}
