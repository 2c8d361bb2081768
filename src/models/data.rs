use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::utils::DocumentError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    Aadhaar,
    Pan,
    VoterId,
    DrivingLicense,
    Handwritten,
    Unknown,
}

impl DocumentType {
    /// Candidate types in scoring order. Ties go to the earlier entry.
    pub const CANDIDATES: [DocumentType; 5] = [
        DocumentType::Aadhaar,
        DocumentType::Pan,
        DocumentType::VoterId,
        DocumentType::DrivingLicense,
        DocumentType::Handwritten,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Aadhaar => "AADHAAR",
            DocumentType::Pan => "PAN",
            DocumentType::VoterId => "VOTER_ID",
            DocumentType::DrivingLicense => "DRIVING_LICENSE",
            DocumentType::Handwritten => "HANDWRITTEN",
            DocumentType::Unknown => "UNKNOWN",
        }
    }

    /// Largest bonus the classifier can add for this type on top of keyword hits.
    pub fn max_pattern_bonus(&self) -> u32 {
        match self {
            DocumentType::Aadhaar => 2,
            DocumentType::Pan => 3,
            DocumentType::VoterId => 3,
            DocumentType::DrivingLicense => 3,
            DocumentType::Handwritten => 2,
            DocumentType::Unknown => 0,
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "AADHAAR" | "AADHAR" => Ok(DocumentType::Aadhaar),
            "PAN" => Ok(DocumentType::Pan),
            "VOTER_ID" | "VOTER" | "EPIC" => Ok(DocumentType::VoterId),
            "DRIVING_LICENSE" | "DRIVING_LICENCE" | "DL" => Ok(DocumentType::DrivingLicense),
            "HANDWRITTEN" => Ok(DocumentType::Handwritten),
            "UNKNOWN" => Ok(DocumentType::Unknown),
            _ => Err(DocumentError::UnknownDocumentType(s.to_string())),
        }
    }
}

/// Outcome of scoring a block of recognized text.
///
/// `confidence` is how completely the winning type's signal set matched, not a
/// calibrated probability.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub document_type: DocumentType,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub scores: Vec<(DocumentType, i32)>,
}

impl ClassificationResult {
    pub fn unknown() -> Self {
        ClassificationResult {
            document_type: DocumentType::Unknown,
            confidence: 0.0,
            scores: Vec::new(),
        }
    }

    pub fn score_of(&self, document_type: DocumentType) -> i32 {
        self.scores
            .iter()
            .find(|(t, _)| *t == document_type)
            .map(|(_, s)| *s)
            .unwrap_or(0)
    }
}

/// Sparse field map produced by an extractor. Only fields that were found are
/// present, and a present field never holds an empty value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExtractedFields {
    fields: BTreeMap<String, String>,
}

impl ExtractedFields {
    pub fn new() -> Self {
        ExtractedFields::default()
    }

    /// Stores `value` under `key` unless the trimmed value is empty.
    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return;
        }
        self.fields.insert(key.to_string(), trimmed.to_string());
    }

    pub fn insert_opt(&mut self, key: &str, value: Option<String>) {
        if let Some(value) = value {
            self.insert(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_map(self) -> BTreeMap<String, String> {
        self.fields
    }
}

/// Classification and extraction result for one document.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentAnalysis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub document_type: DocumentType,
    pub confidence: f64,
    pub fields: ExtractedFields,
}
