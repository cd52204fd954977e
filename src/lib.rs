//! # PCP Generator
//!
//! 根据用户填写的 Section 1，并行生成 KOICA 项目概念文件（PCP）其余章节的草稿
//!
//! ## 架构设计
//!
//! 本系统采用严格的分层架构：
//!
//! ### ① 数据层（Models）
//! - `models/` - 章节定义、Section 1 表单、生成结果、文档
//! - `loaders` - 从 TOML / 文本文件加载输入
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，不关心章节之间的关系
//! - `LlmService` - 调用 LLM 生成文本
//! - `DocumentWriter` - 写出 markdown 文档
//! - `RunLog` - 写运行日志
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个章节"的完整生成流程
//! - `SectionGenerator` - 章节生成能力的抽象
//! - `SectionFlow` - 提示词 → LLM → 清理输出
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/fan_out` - 并行生成所有章节，控制并发
//! - `orchestrator/assembler` - 按固定顺序组装文档
//! - `orchestrator/app` - 应用生命周期
//!
//! ## 模块结构

pub mod cli;
pub mod config;
pub mod error;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use cli::Cli;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{Context, Document, Language, ResultSet, Section1Form, SectionSpec};
pub use orchestrator::{assemble, App, FanOutOrchestrator};
pub use workflow::{SectionFlow, SectionGenerator};
