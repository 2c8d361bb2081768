pub mod error;

pub use error::DocumentError;
