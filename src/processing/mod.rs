pub mod classifier;
pub mod extractors;
pub mod patterns;
pub mod text;

pub use classifier::{classify, classify_with};
pub use extractors::{extract, DocumentText};
