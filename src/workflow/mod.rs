//! 流程层（Workflow Layer）
//!
//! 定义"一个章节"的生成流程：提示词 → LLM → 清理输出

pub mod prompt;
pub mod section_ctx;
pub mod section_flow;

pub use section_ctx::SectionCtx;
pub use section_flow::{SectionFlow, SectionGenerator};
