use serde::{Deserialize, Serialize};
use std::fmt;

/// 校验错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    FieldMissing,
    InvalidTypeError,
    AnswerFormatError,
    AnswerCountError,
    InvalidAnswerError,
    FileError,
    ParseError,
    UnexpectedError,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::FieldMissing => "FieldMissing",
            ErrorKind::InvalidTypeError => "InvalidTypeError",
            ErrorKind::AnswerFormatError => "AnswerFormatError",
            ErrorKind::AnswerCountError => "AnswerCountError",
            ErrorKind::InvalidAnswerError => "InvalidAnswerError",
            ErrorKind::FileError => "FileError",
            ErrorKind::ParseError => "ParseError",
            ErrorKind::UnexpectedError => "UnexpectedError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 文件级错误的位置标记
pub const POSITION_NA: &str = "N/A";

/// 单条校验错误
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub kind: ErrorKind,
    pub position: String,
    pub description: String,
}

impl ValidationError {
    pub fn new(
        kind: ErrorKind,
        position: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            position: position.into(),
            description: description.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.position, self.description)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Pass,
    Fail,
}

impl ReportStatus {
    pub fn is_pass(self) -> bool {
        self == ReportStatus::Pass
    }

    /// 报告中显示的状态文字
    pub fn label(self) -> &'static str {
        match self {
            ReportStatus::Pass => "✅ 通过",
            ReportStatus::Fail => "❌ 失败",
        }
    }
}

/// 单个文件的校验报告
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
    pub path: String,
    pub total_questions: usize,
    pub passed_questions: usize,
    pub failed_questions: usize,
    pub errors: Vec<ValidationError>,
    pub status: ReportStatus,
}

impl FileReport {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            total_questions: 0,
            passed_questions: 0,
            failed_questions: 0,
            errors: Vec::new(),
            status: ReportStatus::Pass,
        }
    }

    /// 以单条文件级错误结束的报告
    pub fn fatal(path: impl Into<String>, error: ValidationError) -> Self {
        let mut report = Self::new(path);
        report.errors.push(error);
        report.status = ReportStatus::Fail;
        report
    }
}

/// 汇总报告中每个文件的统计行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileOutcome {
    pub path: String,
    pub status: ReportStatus,
    pub total_questions: usize,
    pub passed_questions: usize,
    pub failed_questions: usize,
}

impl From<&FileReport> for FileOutcome {
    fn from(report: &FileReport) -> Self {
        Self {
            path: report.path.clone(),
            status: report.status,
            total_questions: report.total_questions,
            passed_questions: report.passed_questions,
            failed_questions: report.failed_questions,
        }
    }
}

/// 多文件汇总报告
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryReport {
    pub total_files: usize,
    pub passed_files: usize,
    pub failed_files: usize,
    pub total_questions: usize,
    pub passed_questions: usize,
    pub failed_questions: usize,
    pub status: ReportStatus,
    pub files: Vec<FileOutcome>,
}

impl Default for SummaryReport {
    fn default() -> Self {
        Self {
            total_files: 0,
            passed_files: 0,
            failed_files: 0,
            total_questions: 0,
            passed_questions: 0,
            failed_questions: 0,
            status: ReportStatus::Pass,
            files: Vec::new(),
        }
    }
}

impl SummaryReport {
    /// 累加一个文件的结果
    pub fn absorb(&mut self, report: &FileReport) {
        self.total_files += 1;
        match report.status {
            ReportStatus::Pass => self.passed_files += 1,
            ReportStatus::Fail => {
                self.failed_files += 1;
                self.status = ReportStatus::Fail;
            }
        }
        self.total_questions += report.total_questions;
        self.passed_questions += report.passed_questions;
        self.failed_questions += report.failed_questions;
        self.files.push(FileOutcome::from(report));
    }

    /// 顺序折叠所有文件报告
    pub fn from_reports<'a>(reports: impl IntoIterator<Item = &'a FileReport>) -> Self {
        reports.into_iter().fold(Self::default(), |mut summary, report| {
            summary.absorb(report);
            summary
        })
    }
}
