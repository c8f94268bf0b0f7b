//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和流程调度，不包含切分和校验规则本身。
//!
//! ### `batch_processor` - 批量处理器
//! - 扫描目录，控制并发数量（Semaphore）
//! - 按输入顺序汇总每个文件的结果
//!
//! ### `file_processor` - 单个文件处理器
//! - 读取一个文件，调用能力层，写出结果
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<PathBuf>)
//!     ↓
//! file_processor (处理单个文件)
//!     ↓
//! services (能力层：chunker / validator / converter / extractor)
//! ```

pub mod batch_processor;
pub mod file_processor;

pub use batch_processor::{App, CheckOutcome, ProcessingStats};
