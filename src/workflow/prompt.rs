//! 章节生成提示词

use crate::models::{Context, Language, SectionSpec};

/// 系统消息
pub const SYSTEM_MESSAGE: &str =
    "You are a helpful assistant that drafts concept papers for KOICA projects.";

/// 构建单个章节的用户提示词
///
/// Section 1 原文只作为上下文，去除首尾空白后原样嵌入。
pub fn build_section_prompt(spec: &SectionSpec, context: &Context, language: Language) -> String {
    format!(
        "You are an international development expert preparing a KOICA bilateral Project/Program Concept Paper.\n\
         The user already drafted SECTION 1. Using that section **only as context**, write **{name}** in {language}.\n\
         \n\
         Guidelines:\n\
         {instruction}\n\
         \n\
         SECTION 1 (verbatim):\n\
         {section1}\n",
        name = spec.name,
        language = language.name(),
        instruction = spec.instruction.trim(),
        section1 = context.as_str().trim(),
    )
}
