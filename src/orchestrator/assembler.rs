//! 文档组装
//!
//! 纯函数：Section 1 + 按章节列表顺序排列的生成结果 → 一份 markdown 文档。
//! 不做任何 I/O，不包含时间戳，相同输入得到逐字节相同的输出。

use crate::models::{Context, Document, GenerationResult, Outcome, ResultSet, SectionSpec};

/// 文档标题
pub const DOCUMENT_TITLE: &str = "# Project/Program Concept Paper";
/// Section 1 标题
pub const SECTION1_HEADING: &str = "## Section 1. Basic Project Information";

/// 组装完整文档
///
/// 每个章节都会输出标题；生成失败或缺失的章节输出占位提示，提醒用户人工补写。
pub fn assemble(context: &Context, specs: &[SectionSpec], results: &ResultSet) -> Document {
    let mut blocks: Vec<String> = Vec::with_capacity(specs.len() * 2 + 3);
    blocks.push(DOCUMENT_TITLE.to_string());
    blocks.push(SECTION1_HEADING.to_string());
    blocks.push(context.as_str().trim().to_string());

    for spec in specs {
        blocks.push(format!("## {}", spec.name));
        blocks.push(section_body(results.get(&spec.name)));
    }

    let mut content = blocks.join("\n\n");
    content.push('\n');
    Document::new(content)
}

fn section_body(result: Option<&GenerationResult>) -> String {
    match result.map(|r| &r.outcome) {
        Some(Outcome::Success { text }) => text.trim().to_string(),
        Some(Outcome::Failure { kind, message }) => failure_placeholder(kind.as_str(), message),
        None => failure_placeholder("missing", "no result was produced"),
    }
}

/// 生成失败的占位内容
pub fn failure_placeholder(kind: &str, message: &str) -> String {
    // 消息可能跨行，压成一行以保持引用块完整
    let message = message.split_whitespace().collect::<Vec<_>>().join(" ");
    format!(
        "> ⚠️ Generation failed ({}): {}. Please draft this section manually.",
        kind,
        message.trim_end_matches('.')
    )
}
