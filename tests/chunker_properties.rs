use mist_parser::services::chunker::chunk;
use mist_parser::ChunkConfig;

fn config(target: usize, lookahead: usize) -> ChunkConfig {
    ChunkConfig::try_new(target, lookahead).unwrap()
}

/// 模拟一份试卷：题号、题干、选项、空行交替出现
fn sample_paper(questions: usize) -> String {
    let mut text = String::from("2024年期中考试 数学试卷\n\n一、选择题\n");
    for i in 1..=questions {
        text.push_str(&format!(
            "\n{}. 下列关于函数的说法正确的是（ ）\nA. 选项一\nB. 选项二\nC. 选项三\nD. 选项四\n",
            i
        ));
        if i % 3 == 0 {
            text.push_str("\n\n");
        }
    }
    text.push_str("\n二、解答题\n\n");
    text.push_str(&"请写出完整的解题过程。".repeat(30));
    text
}

/// 片段之间只允许空白，且按顺序拼回原文
fn assert_reconstructs(document: &str, chunks: &[mist_parser::Chunk]) {
    let mut cursor = 0;
    for c in chunks {
        assert!(c.span.start >= cursor, "spans must not overlap");
        assert!(document[cursor..c.span.start].trim().is_empty());
        assert_eq!(document[c.span.clone()].trim(), c.text);
        cursor = c.span.end;
    }
    assert!(document[cursor..].trim().is_empty());
}

#[test]
fn test_termination_and_coverage_across_configs() {
    let document = sample_paper(40);
    for target in [1, 2, 7, 50, 120, 500, 5000] {
        for lookahead in [0, 1, 30, 200] {
            let chunks = chunk(&document, &config(target, lookahead));
            assert!(!chunks.is_empty());
            assert_reconstructs(&document, &chunks);
            for (i, c) in chunks.iter().enumerate() {
                assert_eq!(c.index, i + 1);
                assert!(!c.text.trim().is_empty());
            }
        }
    }
}

#[test]
fn test_pathological_input_without_boundaries() {
    let document = "x".repeat(1001);
    let chunks = chunk(&document, &config(100, 50));
    assert_eq!(chunks.len(), 11);
    assert!(chunks[..10].iter().all(|c| c.text.len() == 100));
    assert_eq!(chunks[10].text, "x");
}

#[test]
fn test_single_chunk_property() {
    let document = "\n  1. 只有一道题\nA. 是\nB. 否\n  ";
    let target = document.chars().count();
    let chunks = chunk(document, &config(target, 10));
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].text, document.trim());

    assert!(chunk(" \n\t ", &config(100, 10)).is_empty());
}

#[test]
fn test_anchor_is_exact_boundary_even_with_later_double_break() {
    // "X" + 换行 + 题号，后面窗口内还有双换行
    let head = "X".repeat(20);
    let document = format!("{}\n\n\n1. next question\n\nY", head);
    let chunks = chunk(&document, &config(21, 40));
    // 目标位置落在第一个换行之后，窗口内的锚点从第二个换行开始
    assert_eq!(chunks[0].span, 0..21);
    assert_eq!(chunks[0].text, head);
    assert!(chunks[1].text.starts_with("1. next question"));
    assert_reconstructs(&document, &chunks);
}

#[test]
fn test_chinese_numeral_anchor() {
    let document = "甲".repeat(10) + "\n二、填空题\n内容";
    let chunks = chunk(&document, &config(10, 10));
    assert_eq!(chunks[0].text, "甲".repeat(10));
    assert!(chunks[1].text.starts_with("二、填空题"));
}

#[test]
fn test_double_break_chosen_over_single_break() {
    let document = "first para\n\nsecond line\nthird line continues without break";
    let chunks = chunk(document, &config(30, 0));
    assert_eq!(chunks[0].text, "first para");
    assert_eq!(chunks[0].span.end, 10);
}

#[test]
fn test_progress_boundaries_strictly_increase() {
    let document = "\n".repeat(50) + &"ab\n\n".repeat(50);
    let chunks = chunk(&document, &config(3, 2));
    for pair in chunks.windows(2) {
        assert!(pair[0].span.end <= pair[1].span.start);
        assert!(pair[0].span.start < pair[1].span.start);
        assert!(pair[0].span.end > pair[0].span.start);
    }
    assert_reconstructs(&document, &chunks);
}

#[test]
fn test_deterministic_output() {
    let document = sample_paper(25);
    let cfg = config(300, 80);
    assert_eq!(chunk(&document, &cfg), chunk(&document, &cfg));
}
