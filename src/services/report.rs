//! 校验报告渲染 - 业务能力层
//!
//! 只负责把 `FileReport` / `SummaryReport` 变成可读文本

use crate::models::{FileReport, SummaryReport};

fn rule(ch: char) -> String {
    ch.to_string().repeat(60)
}

/// 单个文件的检查报告
pub fn render_file_report(report: &FileReport) -> String {
    let mut lines = vec![
        rule('='),
        "JSON文件格式检查报告".to_string(),
        rule('='),
        format!("文件路径: {}", report.path),
        format!("总题目数: {}", report.total_questions),
        format!("通过题目数: {}", report.passed_questions),
        format!("失败题目数: {}", report.failed_questions),
        format!("整体状态: {}", report.status.label()),
        rule('='),
    ];

    if report.errors.is_empty() {
        lines.push("\n🎉 未发现任何错误！".to_string());
    } else {
        lines.push("\n错误详情:".to_string());
        lines.push(rule('-'));
        for (i, error) in report.errors.iter().enumerate() {
            lines.push(format!("{}. {}", i + 1, error));
        }
    }

    lines.push(rule('='));
    lines.join("\n")
}

/// 多个文件的汇总报告
pub fn render_summary(summary: &SummaryReport) -> String {
    let mut lines = vec![
        rule('='),
        "JSON文件格式检查汇总报告".to_string(),
        rule('='),
        format!("检查文件总数: {}", summary.total_files),
        format!("通过文件数: {}", summary.passed_files),
        format!("失败文件数: {}", summary.failed_files),
        format!("总题目数: {}", summary.total_questions),
        format!("通过题目数: {}", summary.passed_questions),
        format!("失败题目数: {}", summary.failed_questions),
        format!("整体状态: {}", summary.status.label()),
        rule('='),
        "\n各文件检查结果:".to_string(),
        rule('-'),
    ];

    for (i, file) in summary.files.iter().enumerate() {
        lines.push(format!("{}. {} - {}", i + 1, file.path, file.status.label()));
        if file.failed_questions > 0 {
            lines.push(format!(
                "   题目总数: {}, 通过: {}, 失败: {}",
                file.total_questions, file.passed_questions, file.failed_questions
            ));
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::validator::validate_bytes;

    #[test]
    fn test_file_report_lists_errors() {
        let report = validate_bytes(
            "a.json",
            br#"[{"type": "single_choice", "content": "c", "options": ["x"], "answer": "B"}]"#,
        );
        let text = render_file_report(&report);
        assert!(text.contains("文件路径: a.json"));
        assert!(text.contains("1. [InvalidAnswerError] Question 1:"));
        assert!(text.contains("❌ 失败"));
    }

    #[test]
    fn test_clean_report_celebrates() {
        let report = validate_bytes("ok.json", b"[]");
        assert!(render_file_report(&report).contains("未发现任何错误"));
    }

    #[test]
    fn test_summary_shows_failed_file_counts() {
        let ok = validate_bytes("ok.json", b"[]");
        let bad = validate_bytes(
            "bad.json",
            br#"[{"type": "multiple_choice", "content": "c", "options": ["x", "y"], "answer": ["A"]}]"#,
        );
        let summary = SummaryReport::from_reports([&ok, &bad]);
        let text = render_summary(&summary);
        assert!(text.contains("检查文件总数: 2"));
        assert!(text.contains("2. bad.json - ❌ 失败"));
        assert!(text.contains("题目总数: 1, 通过: 0, 失败: 1"));
    }
}
