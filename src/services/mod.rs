pub mod answer_key;
pub mod chunker;
pub mod converter;
pub mod extractor;
pub mod report;
pub mod validator;

pub use chunker::{chunk, Chunker};
pub use converter::DocumentConverter;
pub use extractor::{Extractor, LlmExtractor};
pub use validator::{validate_all, validate_bytes, validate_file, validate_records};
