use log::info;

use crate::models::*;
use crate::processing::*;

/// Runs classification and extraction over recognized text.
pub struct DocumentAnalyzer {
    rules: ClassifierRules,
}

impl DocumentAnalyzer {
    pub fn new() -> Self {
        DocumentAnalyzer {
            rules: DEFAULT_RULES.clone(),
        }
    }

    pub fn with_rules(rules: ClassifierRules) -> Self {
        DocumentAnalyzer { rules }
    }

    pub fn rules(&self) -> &ClassifierRules {
        &self.rules
    }

    // Classify first, then extract with the winning type's parser
    pub fn analyze(&self, text: &str) -> DocumentAnalysis {
        let classification = classify_with(&self.rules, text);
        info!(
            "classified document as {} (confidence {:.2})",
            classification.document_type, classification.confidence
        );

        let fields = extract(text, classification.document_type);
        info!("extracted {} fields", fields.len());

        DocumentAnalysis {
            source: None,
            document_type: classification.document_type,
            confidence: classification.confidence,
            fields,
        }
    }

    /// Skips classification; the caller already knows the type.
    pub fn analyze_as(&self, text: &str, document_type: DocumentType) -> DocumentAnalysis {
        let fields = extract(text, document_type);
        info!("extracted {} fields as {}", fields.len(), document_type);

        DocumentAnalysis {
            source: None,
            document_type,
            confidence: 1.0,
            fields,
        }
    }
}

impl Default for DocumentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_pan_example() {
        let text = "INCOME TAX DEPARTMENT\nABCDE1234F\nName: JOHN SMITH\n\
            Father's Name: ROBERT SMITH\nDate of Birth: 15/08/1990";
        let analysis = DocumentAnalyzer::new().analyze(text);
        assert_eq!(analysis.document_type, DocumentType::Pan);
        assert!(analysis.confidence > 0.0 && analysis.confidence <= 1.0);
        assert_eq!(analysis.fields.get("document_id"), Some("ABCDE1234F"));
        assert_eq!(analysis.fields.get("name"), Some("JOHN SMITH"));
        assert_eq!(analysis.fields.get("father_name"), Some("ROBERT SMITH"));
    }

    #[test]
    fn test_unclassifiable_text_uses_generic_extraction() {
        let analysis = DocumentAnalyzer::default().analyze("lorem ipsum 12/12/2012");
        assert_eq!(analysis.document_type, DocumentType::Unknown);
        assert_eq!(analysis.confidence, 0.0);
        assert_eq!(analysis.fields.get("date_of_birth"), Some("12/12/2012"));
    }

    #[test]
    fn test_forced_type() {
        let analysis = DocumentAnalyzer::new().analyze_as("KKD1933993", DocumentType::VoterId);
        assert_eq!(analysis.confidence, 1.0);
        assert_eq!(analysis.fields.get("voter_id"), Some("KKD1933993"));
    }

    #[test]
    fn test_custom_rules() {
        let rules = ClassifierRules::from_json_str(r#"{ "voter_id": ["matdata"] }"#).unwrap();
        let analyzer = DocumentAnalyzer::with_rules(rules);
        assert_eq!(analyzer.rules().voter_id, vec!["matdata".to_string()]);
        assert_eq!(analyzer.analyze("matdata card").document_type, DocumentType::VoterId);
    }
}
