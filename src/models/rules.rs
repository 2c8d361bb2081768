use std::fs;
use std::path::Path;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::models::DocumentType;
use crate::utils::DocumentError;

lazy_static! {
    /// Built-in keyword tables, constructed once and shared read-only.
    pub static ref DEFAULT_RULES: ClassifierRules = ClassifierRules::default();
}

/// Per-type keyword lists used by the classifier. Keywords are matched as
/// case-insensitive substrings of the recognized text.
///
/// A rules file only needs to list the types it overrides; the others keep
/// their built-in lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierRules {
    pub aadhaar: Vec<String>,
    pub pan: Vec<String>,
    pub voter_id: Vec<String>,
    pub driving_license: Vec<String>,
    pub handwritten: Vec<String>,
}

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl Default for ClassifierRules {
    fn default() -> Self {
        ClassifierRules {
            aadhaar: owned(&[
                "aadhaar",
                "आधार",
                "uidai",
                "unique identification",
                "enrolment no",
                "enrollment no",
                "your aadhaar no",
                "आपला आधार",
                "भारतीय विशिष्ट",
                "vtc:",
                "pin code",
                "vid",
                "नोंदणी क्रमांक",
                "माझे आधार",
                "मार्जी ओळख",
                "generation date",
                "download date",
            ]),
            pan: owned(&[
                "permanent account number",
                "income tax department",
                "आयकर विभाग",
                "pan card",
                "govt. of india",
                "father's name",
                "पिता का नाम",
            ]),
            voter_id: owned(&[
                "election commission",
                "voter",
                "elector",
                "epic",
                "निर्वाचन",
                "मतदाता",
                "elector photo identity",
                "भारत निर्वाचन आयोग",
                "फोटो पहचान पत्र",
            ]),
            driving_license: owned(&[
                "driving licence",
                "driving license",
                "transport",
                "motor vehicle",
                "dl no",
                "licence no",
                "license no",
                "licensing authority",
                "valid till",
                "rto",
            ]),
            handwritten: owned(&[
                "name",
                "address",
                "date of birth",
                "dob",
                "gender",
                "mobile",
                "phone",
                "signature",
                "father",
                "mother",
                "occupation",
                "email",
                "city",
                "state",
                "age:",
            ]),
        }
    }
}

impl ClassifierRules {
    /// Loads rules from a JSON file. Keywords are lower-cased on load.
    pub fn from_json_file(path: &Path) -> Result<Self, DocumentError> {
        let raw = fs::read_to_string(path).map_err(|e| DocumentError::io(path, e))?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, DocumentError> {
        let mut rules: ClassifierRules = serde_json::from_str(raw)?;
        for list in rules.lists_mut() {
            for keyword in list.iter_mut() {
                *keyword = keyword.trim().to_lowercase();
            }
            list.retain(|k| !k.is_empty());
        }
        rules.validate()?;
        Ok(rules)
    }

    pub fn validate(&self) -> Result<(), DocumentError> {
        if DocumentType::CANDIDATES
            .iter()
            .all(|t| self.keywords(*t).is_empty())
        {
            return Err(DocumentError::InvalidRules(
                "every keyword list is empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn keywords(&self, document_type: DocumentType) -> &[String] {
        match document_type {
            DocumentType::Aadhaar => &self.aadhaar,
            DocumentType::Pan => &self.pan,
            DocumentType::VoterId => &self.voter_id,
            DocumentType::DrivingLicense => &self.driving_license,
            DocumentType::Handwritten => &self.handwritten,
            DocumentType::Unknown => &[],
        }
    }

    /// Keyword count plus the largest obtainable pattern bonus.
    pub fn max_possible_score(&self, document_type: DocumentType) -> u32 {
        self.keywords(document_type).len() as u32 + document_type.max_pattern_bonus()
    }

    fn lists_mut(&mut self) -> [&mut Vec<String>; 5] {
        [
            &mut self.aadhaar,
            &mut self.pan,
            &mut self.voter_id,
            &mut self.driving_license,
            &mut self.handwritten,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_max_possible_score() {
        let rules = ClassifierRules::default();
        assert_eq!(
            rules.max_possible_score(DocumentType::Pan),
            rules.pan.len() as u32 + 3
        );
        assert_eq!(
            rules.max_possible_score(DocumentType::Aadhaar),
            rules.aadhaar.len() as u32 + 2
        );
        assert_eq!(rules.max_possible_score(DocumentType::Unknown), 0);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let rules = ClassifierRules::from_json_str(r#"{ "pan": ["  PAN Card ", ""] }"#).unwrap();
        assert_eq!(rules.pan, vec!["pan card".to_string()]);
        assert_eq!(rules.aadhaar, ClassifierRules::default().aadhaar);
    }

    #[test]
    fn test_all_empty_rules_rejected() {
        let raw = r#"{
            "aadhaar": [], "pan": [], "voter_id": [], "driving_license": [], "handwritten": []
        }"#;
        assert!(matches!(
            ClassifierRules::from_json_str(raw),
            Err(DocumentError::InvalidRules(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "voter_id": ["EPIC No"] }}"#).unwrap();
        let rules = ClassifierRules::from_json_file(file.path()).unwrap();
        assert_eq!(rules.voter_id, vec!["epic no".to_string()]);

        let missing = ClassifierRules::from_json_file(Path::new("/nonexistent/rules.json"));
        assert!(matches!(missing, Err(DocumentError::IoError { .. })));
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(
            ClassifierRules::from_json_str("{ not json"),
            Err(DocumentError::RulesFormatError(_))
        ));
    }
}
