use mist_parser::models::{Answer, ErrorKind, QuestionType, QuizRecord};
use mist_parser::services::validator::{
    validate_all, validate_bytes, validate_file, validate_records,
};
use mist_parser::{FileReport, ReportStatus, SummaryReport};
use serde_json::json;
use std::path::PathBuf;

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "mist_parser_{}_{}_{}",
        name,
        std::process::id(),
        chrono::Local::now().timestamp_nanos_opt().unwrap_or_default()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_missing_answer_field() {
    let records = vec![json!({"type": "single_choice", "content": "c", "options": ["a", "b"]})];
    let report = validate_records("q.json", &records);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].kind, ErrorKind::FieldMissing);
    assert_eq!(report.failed_questions, 1);
    assert_eq!(report.status, ReportStatus::Fail);
}

#[test]
fn test_single_choice_out_of_range_letter() {
    let records = vec![json!({
        "type": "single_choice", "content": "c",
        "options": ["1", "2", "3", "4"], "answer": "E"
    })];
    let report = validate_records("q.json", &records);
    assert_eq!(report.errors[0].kind, ErrorKind::InvalidAnswerError);
}

#[test]
fn test_multiple_choice_needs_two_answers() {
    let records = vec![json!({
        "type": "multiple_choice", "content": "c",
        "options": ["1", "2", "3", "4"], "answer": ["A"]
    })];
    let report = validate_records("q.json", &records);
    assert_eq!(report.errors[0].kind, ErrorKind::AnswerCountError);
}

#[test]
fn test_multiple_choice_names_invalid_member() {
    let records = vec![json!({
        "type": "multiple_choice", "content": "c",
        "options": ["1", "2", "3", "4"], "answer": ["A", "Z"]
    })];
    let report = validate_records("q.json", &records);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].kind, ErrorKind::InvalidAnswerError);
    assert!(report.errors[0].description.contains("Z"));
}

#[test]
fn test_serialized_records_pass() {
    let records = vec![
        QuizRecord {
            question_type: QuestionType::SingleChoice,
            content: "1+1=?".to_string(),
            options: vec!["1".into(), "2".into()],
            answer: Answer::Single("B".into()),
        },
        QuizRecord {
            question_type: QuestionType::MultipleChoice,
            content: "偶数有".to_string(),
            options: vec!["1".into(), "2".into(), "4".into()],
            answer: Answer::Multiple(vec!["B".into(), "C".into()]),
        },
        QuizRecord {
            question_type: QuestionType::Fill,
            content: "中国的首都是____".to_string(),
            options: vec![],
            answer: Answer::Single("北京".into()),
        },
    ];
    let bytes = serde_json::to_vec(&records).unwrap();
    let report = validate_bytes("ok.json", &bytes);
    assert_eq!(report.status, ReportStatus::Pass, "{:?}", report.errors);
    assert_eq!(report.passed_questions, 3);

    let decoded: Vec<QuizRecord> = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(decoded, records);
}

#[test]
fn test_summary_consistency_over_files() {
    let dir = temp_dir("summary");
    let good = dir.join("good.json");
    let bad = dir.join("bad.json");
    let broken = dir.join("broken.json");
    let missing = dir.join("missing.json");

    std::fs::write(
        &good,
        json!([{"type": "judge", "content": "地球是圆的", "options": [], "answer": "对"}])
            .to_string(),
    )
    .unwrap();
    std::fs::write(
        &bad,
        json!([
            {"type": "single_choice", "content": "c", "options": ["x", "y"], "answer": "A"},
            {"type": "single_choice", "content": "c", "options": ["x", "y"], "answer": ["A"]}
        ])
        .to_string(),
    )
    .unwrap();
    std::fs::write(&broken, "[{\"type\": ").unwrap();

    let paths = [good.clone(), bad.clone(), broken.clone(), missing.clone()];
    let reports: Vec<FileReport> = paths.iter().map(|p| validate_file(p)).collect();
    let summary = validate_all(&paths);

    assert_eq!(summary, SummaryReport::from_reports(&reports));
    assert_eq!(
        summary.total_questions,
        reports.iter().map(|r| r.total_questions).sum::<usize>()
    );
    assert_eq!(summary.total_files, 4);
    assert_eq!(summary.passed_files, 1);
    assert_eq!(summary.failed_files, 3);
    assert_eq!(summary.total_questions, 3);
    assert_eq!(summary.passed_questions, 2);
    assert_eq!(summary.failed_questions, 1);
    assert_eq!(summary.status, ReportStatus::Fail);

    assert_eq!(reports[2].errors[0].kind, ErrorKind::ParseError);
    assert_eq!(reports[3].errors[0].kind, ErrorKind::FileError);

    let all_good = validate_all(&[good]);
    assert_eq!(all_good.status, ReportStatus::Pass);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_empty_summary_passes() {
    let summary = validate_all::<PathBuf>(&[]);
    assert_eq!(summary.status, ReportStatus::Pass);
    assert_eq!(summary.total_files, 0);
}
