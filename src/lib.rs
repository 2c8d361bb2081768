pub mod document_analyzer;
pub mod models;
pub mod processing;
pub mod utils;

pub use document_analyzer::DocumentAnalyzer;
pub use processing::{classify, extract};
