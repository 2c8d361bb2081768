// Keyword and ID-pattern scoring that decides which document type a block of
// recognized text most likely came from.

use log::debug;

use crate::models::{ClassificationResult, ClassifierRules, DocumentType, DEFAULT_RULES};
use crate::processing::patterns::{
    has_official_id, AADHAAR_PATTERN, DRIVING_LICENSE_PATTERN, PAN_PATTERN, VOTER_ID_PATTERN,
};
use crate::processing::text::convert_devanagari_numerals;

/// Handwritten scores at or above this get the official-ID adjustment.
const HANDWRITTEN_THRESHOLD: i32 = 3;
const HANDWRITTEN_ADJUSTMENT: i32 = 2;

/// Classifies `text` with the built-in keyword tables.
pub fn classify(text: &str) -> ClassificationResult {
    classify_with(&DEFAULT_RULES, text)
}

/// Classifies `text` with caller-supplied keyword tables.
pub fn classify_with(rules: &ClassifierRules, text: &str) -> ClassificationResult {
    let lower = text.to_lowercase();
    let upper = convert_devanagari_numerals(text).to_uppercase();

    let scores: Vec<(DocumentType, i32)> = DocumentType::CANDIDATES
        .iter()
        .map(|&document_type| {
            let keyword_hits = rules
                .keywords(document_type)
                .iter()
                .filter(|keyword| lower.contains(keyword.as_str()))
                .count() as i32;
            (
                document_type,
                keyword_hits + pattern_bonus(document_type, keyword_hits, &upper),
            )
        })
        .collect();
    debug!("classification scores: {:?}", scores);

    // Ties resolve to the earliest candidate, so only a strictly greater score replaces.
    let (winner, best) = scores
        .iter()
        .fold((DocumentType::Unknown, 0), |(winner, best), &(t, score)| {
            if score > best {
                (t, score)
            } else {
                (winner, best)
            }
        });
    if best <= 0 {
        return ClassificationResult {
            scores,
            ..ClassificationResult::unknown()
        };
    }

    let max_possible = rules.max_possible_score(winner);
    let confidence = if max_possible == 0 {
        0.0
    } else {
        (best as f64 / max_possible as f64).min(1.0)
    };
    debug!("classified as {} (confidence {:.2})", winner, confidence);

    ClassificationResult {
        document_type: winner,
        confidence,
        scores,
    }
}

fn pattern_bonus(document_type: DocumentType, keyword_hits: i32, upper: &str) -> i32 {
    match document_type {
        DocumentType::Pan if PAN_PATTERN.is_match(upper) => 3,
        DocumentType::Aadhaar if AADHAAR_PATTERN.is_match(upper) => 2,
        DocumentType::VoterId if VOTER_ID_PATTERN.is_match(upper) => 3,
        DocumentType::DrivingLicense if DRIVING_LICENSE_PATTERN.is_match(upper) => 3,
        DocumentType::Handwritten if keyword_hits >= HANDWRITTEN_THRESHOLD => {
            if has_official_id(upper) {
                -HANDWRITTEN_ADJUSTMENT
            } else {
                HANDWRITTEN_ADJUSTMENT
            }
        }
        _ => 0,
    }
}
