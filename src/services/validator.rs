//! 题目 JSON 校验服务 - 业务能力层
//!
//! 检查抽取出的题目列表是否符合约定结构，产出 `FileReport`。
//! 所有问题都转换成 `ValidationError` 记录在报告里，不会向调用方返回错误。

use crate::models::{
    option_letters, ErrorKind, FileReport, QuestionType, ReportStatus, SummaryReport,
    ValidationError, POSITION_NA,
};
use serde_json::Value;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use tracing::{debug, warn};

/// 每道题必需的字段，按检查顺序排列
const REQUIRED_FIELDS: [(&str, &str); 4] = [
    ("type", "题目类型"),
    ("content", "题目内容"),
    ("options", "选项"),
    ("answer", "答案"),
];

/// 校验已解码的题目列表
pub fn validate_records(path: &str, records: &[Value]) -> FileReport {
    let mut report = FileReport::new(path);
    report.total_questions = records.len();

    for (idx, record) in records.iter().enumerate() {
        match check_record(idx, record) {
            Ok(()) => report.passed_questions += 1,
            Err(error) => {
                debug!("{} {}", path, error);
                report.failed_questions += 1;
                report.errors.push(error);
            }
        }
    }

    if report.failed_questions > 0 {
        report.status = ReportStatus::Fail;
    }
    report
}

/// 校验原始 JSON 内容
pub fn validate_bytes(path: &str, bytes: &[u8]) -> FileReport {
    let value: Value = match serde_json::from_slice(bytes) {
        Ok(value) => value,
        Err(e) => {
            return FileReport::fatal(
                path,
                ValidationError::new(
                    ErrorKind::ParseError,
                    format!("Line {}, Column {}", e.line(), e.column()),
                    format!("JSON解析错误: {}", e),
                ),
            );
        }
    };

    match value {
        Value::Array(records) => validate_records(path, &records),
        other => FileReport::fatal(
            path,
            ValidationError::new(
                ErrorKind::InvalidTypeError,
                POSITION_NA,
                format!(
                    "JSON文件必须是一个题目列表，当前为: {}",
                    json_type_name(&other)
                ),
            ),
        ),
    }
}

/// 校验磁盘上的 JSON 文件
///
/// 校验过程中的意外 panic 也会被捕获并记为 `UnexpectedError`。
pub fn validate_file(path: &Path) -> FileReport {
    let label = path.display().to_string();
    guard(&label, || validate_file_inner(path, &label))
}

/// 运行一次校验，把其中的 panic 转换为 `UnexpectedError` 报告
pub fn guard<F>(label: &str, check: F) -> FileReport
where
    F: FnOnce() -> FileReport,
{
    match panic::catch_unwind(AssertUnwindSafe(check)) {
        Ok(report) => report,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "未知错误".to_string());
            warn!("校验 {} 时发生意外错误: {}", label, message);
            unexpected(label, message)
        }
    }
}

/// 单个文件的意外错误报告
fn unexpected(label: impl Into<String>, message: impl std::fmt::Display) -> FileReport {
    FileReport::fatal(
        label,
        ValidationError::new(
            ErrorKind::UnexpectedError,
            POSITION_NA,
            format!("意外错误: {}", message),
        ),
    )
}

fn validate_file_inner(path: &Path, label: &str) -> FileReport {
    if !path.exists() {
        return FileReport::fatal(
            label,
            ValidationError::new(
                ErrorKind::FileError,
                POSITION_NA,
                format!("文件不存在: {}", label),
            ),
        );
    }

    match std::fs::read(path) {
        Ok(bytes) => validate_bytes(label, &bytes),
        Err(e) => FileReport::fatal(
            label,
            ValidationError::new(
                ErrorKind::FileError,
                POSITION_NA,
                format!("读取文件失败: {}", e),
            ),
        ),
    }
}

/// 依次校验多个文件并汇总
pub fn validate_all<P: AsRef<Path>>(paths: &[P]) -> SummaryReport {
    let reports: Vec<FileReport> = paths.iter().map(|p| validate_file(p.as_ref())).collect();
    SummaryReport::from_reports(&reports)
}

/// 检查单道题目，返回遇到的第一个错误
fn check_record(idx: usize, record: &Value) -> Result<(), ValidationError> {
    let position = format!("Question {}", idx + 1);
    let fail = |kind: ErrorKind, description: String| {
        Err(ValidationError::new(kind, position.clone(), description))
    };

    let Some(fields) = record.as_object() else {
        return fail(
            ErrorKind::InvalidTypeError,
            format!("题目必须是一个对象，当前为: {}", json_type_name(record)),
        );
    };

    if let Some((field, label)) = REQUIRED_FIELDS
        .iter()
        .find(|(field, _)| !fields.contains_key(*field))
    {
        return fail(
            ErrorKind::FieldMissing,
            format!("缺少{}字段({})", label, field),
        );
    }

    let question_type = match fields["type"].as_str().and_then(QuestionType::from_str) {
        Some(t) => t,
        None => {
            return fail(
                ErrorKind::InvalidTypeError,
                format!(
                    "无效的题目类型: {}，支持的类型为: {}",
                    fields["type"],
                    QuestionType::supported_list()
                ),
            );
        }
    };

    let Some(options) = fields["options"].as_array() else {
        return fail(
            ErrorKind::AnswerFormatError,
            format!(
                "选项字段(options)必须是列表类型，当前为: {}",
                json_type_name(&fields["options"])
            ),
        );
    };

    let letters: Vec<String> = option_letters(options.len())
        .into_iter()
        .map(String::from)
        .collect();
    let answer = &fields["answer"];

    match question_type {
        QuestionType::SingleChoice => {
            let Some(answer) = answer.as_str() else {
                return fail(
                    ErrorKind::AnswerFormatError,
                    format!(
                        "单选题答案必须是字符串类型，当前为: {}",
                        json_type_name(answer)
                    ),
                );
            };
            let count = answer.chars().count();
            if count != 1 {
                return fail(
                    ErrorKind::AnswerCountError,
                    format!("单选题答案数量必须为1个，当前为: {}", count),
                );
            }
            if !letters.iter().any(|l| l == answer) {
                return fail(
                    ErrorKind::InvalidAnswerError,
                    format!(
                        "单选题答案无效，有效选项为: {}，当前为: {}",
                        letters.join(", "),
                        answer
                    ),
                );
            }
        }
        QuestionType::MultipleChoice => {
            let Some(answers) = answer.as_array() else {
                return fail(
                    ErrorKind::AnswerFormatError,
                    format!(
                        "多选题答案必须是列表类型，当前为: {}",
                        json_type_name(answer)
                    ),
                );
            };
            if answers.len() < 2 {
                return fail(
                    ErrorKind::AnswerCountError,
                    format!("多选题答案数量必须为2个或以上，当前为: {}", answers.len()),
                );
            }
            let invalid = answers.iter().find(|a| match a.as_str() {
                Some(s) => !letters.iter().any(|l| l == s),
                None => true,
            });
            if let Some(invalid) = invalid {
                let shown = invalid
                    .as_str()
                    .map(str::to_string)
                    .unwrap_or_else(|| invalid.to_string());
                return fail(
                    ErrorKind::InvalidAnswerError,
                    format!(
                        "多选题答案包含无效选项，有效选项为: {}，当前无效选项: {}",
                        letters.join(", "),
                        shown
                    ),
                );
            }
        }
        // 判断、填空、解答题暂不检查答案形状
        QuestionType::Judge | QuestionType::Fill | QuestionType::Essay => {}
    }

    Ok(())
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn single(record: Value) -> FileReport {
        validate_records("mem.json", &[record])
    }

    fn only_error(report: &FileReport) -> &ValidationError {
        assert_eq!(report.errors.len(), 1, "errors: {:?}", report.errors);
        &report.errors[0]
    }

    #[test]
    fn test_missing_answer_is_single_field_missing() {
        let report = single(json!({
            "type": "single_choice",
            "content": "c",
            "options": ["a", "b"]
        }));
        let err = only_error(&report);
        assert_eq!(err.kind, ErrorKind::FieldMissing);
        assert_eq!(err.position, "Question 1");
        assert!(err.description.contains("answer"));
        assert_eq!(report.failed_questions, 1);
        assert_eq!(report.passed_questions, 0);
        assert_eq!(report.status, ReportStatus::Fail);
    }

    #[test]
    fn test_missing_type_reports_first_field_only() {
        let report = single(json!({"content": "c"}));
        let err = only_error(&report);
        assert_eq!(err.kind, ErrorKind::FieldMissing);
        assert!(err.description.contains("(type)"));
        assert_eq!(report.failed_questions, 1);
    }

    #[test]
    fn test_unknown_type() {
        let report = single(json!({
            "type": "matching",
            "content": "c",
            "options": [],
            "answer": ""
        }));
        assert_eq!(only_error(&report).kind, ErrorKind::InvalidTypeError);
    }

    #[test]
    fn test_non_object_record() {
        let report = single(json!("just text"));
        assert_eq!(only_error(&report).kind, ErrorKind::InvalidTypeError);
    }

    #[test]
    fn test_single_choice_rules() {
        let base = |answer: Value| {
            json!({
                "type": "single_choice",
                "content": "c",
                "options": ["1", "2", "3", "4"],
                "answer": answer
            })
        };
        assert_eq!(single(base(json!("B"))).status, ReportStatus::Pass);
        assert_eq!(only_error(&single(base(json!(["B"])))).kind, ErrorKind::AnswerFormatError);
        assert_eq!(only_error(&single(base(json!("AB")))).kind, ErrorKind::AnswerCountError);
        assert_eq!(only_error(&single(base(json!("")))).kind, ErrorKind::AnswerCountError);
        let err = single(base(json!("E")));
        assert_eq!(only_error(&err).kind, ErrorKind::InvalidAnswerError);
        assert!(only_error(&err).description.contains("A, B, C, D"));
    }

    #[test]
    fn test_multiple_choice_rules() {
        let base = |answer: Value| {
            json!({
                "type": "multiple_choice",
                "content": "c",
                "options": ["1", "2", "3", "4"],
                "answer": answer
            })
        };
        assert_eq!(single(base(json!(["A", "C"]))).status, ReportStatus::Pass);
        assert_eq!(only_error(&single(base(json!("AC")))).kind, ErrorKind::AnswerFormatError);
        assert_eq!(only_error(&single(base(json!(["A"])))).kind, ErrorKind::AnswerCountError);

        let report = single(base(json!(["A", "Z", "Y"])));
        let err = only_error(&report);
        assert_eq!(err.kind, ErrorKind::InvalidAnswerError);
        assert!(err.description.ends_with("Z"));
    }

    #[test]
    fn test_open_types_pass_without_answer_checks() {
        for kind in ["judge", "fill", "essay"] {
            let report = single(json!({"type": kind, "content": "c", "options": [], "answer": 42}));
            assert_eq!(report.status, ReportStatus::Pass, "{}", kind);
        }
    }

    #[test]
    fn test_options_must_be_list() {
        let report = single(json!({
            "type": "single_choice",
            "content": "c",
            "options": "ABCD",
            "answer": "A"
        }));
        assert_eq!(only_error(&report).kind, ErrorKind::AnswerFormatError);
    }

    #[test]
    fn test_records_are_independent() {
        let records = vec![
            json!({"type": "single_choice", "content": "c", "options": ["x", "y"], "answer": "A"}),
            json!({"type": "single_choice", "content": "c", "options": ["x", "y"], "answer": "C"}),
            json!({"type": "essay", "content": "c", "options": [], "answer": "..."}),
        ];
        let report = validate_records("mem.json", &records);
        assert_eq!(report.total_questions, 3);
        assert_eq!(report.passed_questions, 2);
        assert_eq!(report.failed_questions, 1);
        assert_eq!(report.errors[0].position, "Question 2");
    }

    #[test]
    fn test_parse_error_has_line_and_column() {
        let report = validate_bytes("bad.json", b"[\n  {\"type\": }\n]");
        let err = only_error(&report);
        assert_eq!(err.kind, ErrorKind::ParseError);
        assert!(err.position.starts_with("Line 2, Column"));
        assert_eq!(report.status, ReportStatus::Fail);
    }

    #[test]
    fn test_non_list_payload() {
        let report = validate_bytes("obj.json", br#"{"type": "single_choice"}"#);
        assert_eq!(only_error(&report).kind, ErrorKind::InvalidTypeError);
        assert_eq!(report.total_questions, 0);
    }

    #[test]
    fn test_missing_file() {
        let report = validate_file(Path::new("/definitely/not/here.json"));
        assert_eq!(only_error(&report).kind, ErrorKind::FileError);
        assert_eq!(report.status, ReportStatus::Fail);
    }

    #[test]
    fn test_panic_becomes_unexpected_error() {
        let report = guard("boom.json", || panic!("解码器崩溃"));
        assert_eq!(report.status, ReportStatus::Fail);
        assert_eq!(report.errors.len(), 1);
        let error = &report.errors[0];
        assert_eq!(error.kind, ErrorKind::UnexpectedError);
        assert_eq!(error.position, POSITION_NA);
        assert!(error.description.contains("解码器崩溃"));
    }

    #[test]
    fn test_guard_passes_report_through() {
        let report = guard("ok.json", || validate_bytes("ok.json", b"[]"));
        assert_eq!(report.status, ReportStatus::Pass);
    }

    #[test]
    fn test_empty_list_passes() {
        let report = validate_bytes("empty.json", b"[]");
        assert_eq!(report.status, ReportStatus::Pass);
        assert_eq!(report.total_questions, 0);
    }
}
