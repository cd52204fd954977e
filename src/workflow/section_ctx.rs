//! 章节处理上下文
//!
//! 封装"我正在生成第几个章节"这一信息，仅用于日志

use std::fmt::Display;

/// 章节处理上下文
#[derive(Debug, Clone)]
pub struct SectionCtx {
    /// 章节在文档中的序号（从1开始）
    pub section_index: usize,

    /// 章节总数
    pub total: usize,

    /// 章节名称
    pub name: String,
}

impl SectionCtx {
    /// 创建新的章节上下文
    pub fn new(section_index: usize, total: usize, name: impl Into<String>) -> Self {
        Self {
            section_index,
            total,
            name: name.into(),
        }
    }
}

impl Display for SectionCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[章节 {}/{} {}]",
            self.section_index, self.total, self.name
        )
    }
}
