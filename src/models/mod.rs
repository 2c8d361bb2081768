pub mod data;
pub mod rules;

pub use data::{ClassificationResult, DocumentAnalysis, DocumentType, ExtractedFields};
pub use rules::{ClassifierRules, DEFAULT_RULES};
