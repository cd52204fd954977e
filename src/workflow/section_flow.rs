//! 章节生成流程 - 流程层
//!
//! 核心职责：定义"一个章节"的完整生成流程
//!
//! 流程顺序：
//! 1. 构建提示词（章节名 + 写作要求 + Section 1 + 输出语言）
//! 2. 调用 LLM
//! 3. 去掉模型自行重复的章节标题

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::error::GenerationError;
use crate::models::{Context, Language, SectionSpec};
use crate::services::LlmService;
use crate::utils::truncate_text;
use crate::workflow::prompt::{build_section_prompt, SYSTEM_MESSAGE};

/// 单个章节的生成能力
///
/// 编排层只依赖这个 trait；实现可以很慢，也可以失败。
#[async_trait]
pub trait SectionGenerator: Send + Sync {
    async fn generate(
        &self,
        spec: &SectionSpec,
        context: &Context,
    ) -> Result<String, GenerationError>;
}

/// 章节生成流程
///
/// - 不持有任何可变状态，可被多个并发任务共享
/// - 输出语言在构造时确定
pub struct SectionFlow {
    llm_service: Arc<LlmService>,
    language: Language,
}

impl SectionFlow {
    /// 创建新的章节生成流程
    pub fn new(llm_service: Arc<LlmService>, language: Language) -> Self {
        Self {
            llm_service,
            language,
        }
    }
}

#[async_trait]
impl SectionGenerator for SectionFlow {
    async fn generate(
        &self,
        spec: &SectionSpec,
        context: &Context,
    ) -> Result<String, GenerationError> {
        let prompt = build_section_prompt(spec, context, self.language);
        debug!("提示词预览 [{}]: {}", spec.name, truncate_text(&prompt, 120));

        let response = self
            .llm_service
            .send_to_llm(&prompt, Some(SYSTEM_MESSAGE))
            .await?;

        section_body(&response, &spec.name, self.llm_service.model_name())
    }
}

/// 去掉重复标题后的正文；只剩标题时视为空响应
fn section_body(response: &str, name: &str, model: &str) -> Result<String, GenerationError> {
    let body = strip_repeated_heading(response, name);
    if body.is_empty() {
        return Err(GenerationError::empty_response(model));
    }
    Ok(body.to_string())
}

/// 模型有时会在正文开头重复章节标题（如 `## 2.1 Situation Analysis`），
/// 文档组装时会再加一次标题，这里去掉。
fn strip_repeated_heading<'a>(text: &'a str, name: &str) -> &'a str {
    let text = text.trim();
    let (first_line, rest) = text.split_once('\n').unwrap_or((text, ""));

    let heading = first_line.trim_start_matches('#').trim().trim_matches('*').trim();
    if first_line.starts_with('#') && heading.eq_ignore_ascii_case(name) {
        rest.trim()
    } else {
        text
    }
}
