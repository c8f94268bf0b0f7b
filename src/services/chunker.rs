//! 文档切分服务 - 业务能力层
//!
//! 基于题号锚点把长文档切成目标大小的片段，尽量不把一道题切成两半。
//!
//! ## 切分点优先级
//!
//! 1. `Anchor` - 目标位置之后查找范围内的第一个题号
//! 2. `DoubleBreak` - 当前片段内最后一个双换行
//! 3. `SingleBreak` - 当前片段内最后一个单换行
//! 4. `HardCut` - 直接在目标位置切分
//!
//! 每次选中的切分点都严格大于当前位置，`HardCut` 总能给出 `target_end`，
//! 所以循环必然结束。

use crate::models::{Chunk, ChunkConfig};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// 题号锚点：换行、可选空白、阿拉伯数字或中文数字、分隔符
pub const ANCHOR_PATTERN: &str = r"\n\s*([0-9]+|[一二三四五六七八九十]+)[.、．\s]";

static ANCHOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(ANCHOR_PATTERN).expect("anchor pattern is a valid regex"));

/// 切分点查找策略，按优先级排列
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryStrategy {
    Anchor,
    DoubleBreak,
    SingleBreak,
    HardCut,
}

impl BoundaryStrategy {
    pub const PRIORITY: [BoundaryStrategy; 4] = [
        BoundaryStrategy::Anchor,
        BoundaryStrategy::DoubleBreak,
        BoundaryStrategy::SingleBreak,
        BoundaryStrategy::HardCut,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BoundaryStrategy::Anchor => "题号",
            BoundaryStrategy::DoubleBreak => "双换行",
            BoundaryStrategy::SingleBreak => "单换行",
            BoundaryStrategy::HardCut => "目标位置",
        }
    }

    /// 在窗口内查找候选切分点（字节偏移）
    fn locate(self, window: &Window<'_>) -> Option<usize> {
        match self {
            BoundaryStrategy::Anchor => ANCHOR_RE
                .find(&window.text[window.target_end..window.lookahead_end])
                .map(|m| window.target_end + m.start()),
            BoundaryStrategy::DoubleBreak => window.last_in_body("\n\n"),
            BoundaryStrategy::SingleBreak => window.last_in_body("\n"),
            BoundaryStrategy::HardCut => Some(window.target_end),
        }
    }
}

/// 一次切分迭代所看到的范围
struct Window<'a> {
    text: &'a str,
    pos: usize,
    target_end: usize,
    lookahead_end: usize,
}

impl Window<'_> {
    /// `[pos, target_end)` 内最后一次出现 `needle` 的位置，必须大于 `pos`
    fn last_in_body(&self, needle: &str) -> Option<usize> {
        self.text[self.pos..self.target_end]
            .rfind(needle)
            .filter(|&offset| offset > 0)
            .map(|offset| self.pos + offset)
    }

    /// 按优先级取第一个严格前进的切分点
    fn boundary(&self) -> (BoundaryStrategy, usize) {
        BoundaryStrategy::PRIORITY
            .into_iter()
            .find_map(|strategy| {
                strategy
                    .locate(self)
                    .filter(|&p| p > self.pos)
                    .map(|p| (strategy, p))
            })
            .unwrap_or((BoundaryStrategy::HardCut, self.target_end))
    }
}

/// 从 `from` 起前进 `n` 个字符后的字节偏移，越界时返回文本长度
fn advance_chars(text: &str, from: usize, n: usize) -> usize {
    text[from..]
        .char_indices()
        .nth(n)
        .map_or(text.len(), |(offset, _)| from + offset)
}

/// 基于题号锚点切分文本
///
/// 空文本或全空白文本返回空列表；长度不超过目标大小时返回唯一片段。
pub fn chunk(document: &str, config: &ChunkConfig) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let len = document.len();
    let mut pos = 0;

    while pos < len {
        let target_end = advance_chars(document, pos, config.target_size.get());

        if target_end >= len {
            push_chunk(&mut chunks, document, pos, len);
            break;
        }

        let window = Window {
            text: document,
            pos,
            target_end,
            lookahead_end: advance_chars(document, target_end, config.lookahead_range),
        };
        let (strategy, boundary) = window.boundary();
        debug!("在位置 {} 处按{}切分", boundary, strategy.name());

        push_chunk(&mut chunks, document, pos, boundary);
        pos = boundary;
    }

    chunks
}

fn push_chunk(chunks: &mut Vec<Chunk>, document: &str, start: usize, end: usize) {
    let text = document[start..end].trim();
    if text.is_empty() {
        return;
    }
    chunks.push(Chunk {
        index: chunks.len() + 1,
        text: text.to_string(),
        span: start..end,
    });
}

/// 切分后片段的文件名，例如 `试卷_part3.txt`
pub fn part_file_name(stem: &str, index: usize, ext: &str) -> String {
    format!("{}_part{}.{}", stem, index, ext)
}

/// 切分服务
///
/// 持有切分配置，供批量处理器复用
#[derive(Debug, Clone, Copy, Default)]
pub struct Chunker {
    config: ChunkConfig,
}

impl Chunker {
    pub fn new(config: ChunkConfig) -> Self {
        Self { config }
    }

    pub fn split(&self, document: &str) -> Vec<Chunk> {
        debug!(
            "开始智能切分，总长度: {} 字符，目标大小: {}",
            document.chars().count(),
            self.config.target_size
        );
        let chunks = chunk(document, &self.config);
        debug!("切分完成，共生成 {} 个片段", chunks.len());
        chunks
    }
}
