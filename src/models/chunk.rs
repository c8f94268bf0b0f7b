use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::ops::Range;

/// 默认切分目标大小（字符）
pub const DEFAULT_TARGET_SIZE: usize = 2500;
/// 默认向后查找题号的范围（字符）
pub const DEFAULT_LOOKAHEAD_RANGE: usize = 500;

/// 切分配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkConfig {
    /// 每个片段的目标字符数
    pub target_size: NonZeroUsize,
    /// 超过目标位置后继续查找题号的字符数
    pub lookahead_range: usize,
}

impl ChunkConfig {
    pub fn new(target_size: NonZeroUsize, lookahead_range: usize) -> Self {
        Self {
            target_size,
            lookahead_range,
        }
    }

    /// 从普通整数构造，`target_size` 为 0 时返回 None
    pub fn try_new(target_size: usize, lookahead_range: usize) -> Option<Self> {
        NonZeroUsize::new(target_size).map(|size| Self::new(size, lookahead_range))
    }
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            target_size: NonZeroUsize::new(DEFAULT_TARGET_SIZE).unwrap_or(NonZeroUsize::MIN),
            lookahead_range: DEFAULT_LOOKAHEAD_RANGE,
        }
    }
}

/// 切分片段
///
/// `span` 是片段在原文中未去空白的字节范围，`text` 是该范围去掉首尾空白后的内容。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// 片段编号（从1开始）
    pub index: usize,
    pub text: String,
    pub span: Range<usize>,
}
