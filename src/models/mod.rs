pub mod chunk;
pub mod quiz;
pub mod report;

pub use chunk::{Chunk, ChunkConfig, DEFAULT_LOOKAHEAD_RANGE, DEFAULT_TARGET_SIZE};
pub use quiz::{option_letters, Answer, QuestionType, QuizRecord};
pub use report::{
    ErrorKind, FileOutcome, FileReport, ReportStatus, SummaryReport, ValidationError, POSITION_NA,
};
