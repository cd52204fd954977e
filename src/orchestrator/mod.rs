//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责并行调度和文档交付，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 管理应用生命周期（初始化、运行）
//! - 加载 Section 1 和章节列表
//! - 写出文档、运行日志，输出全局统计
//!
//! ### `fan_out` - 章节并行生成器
//! - 每个章节一个任务，信号量限制同时进行的请求数
//! - 单个章节失败或 panic 不影响其他章节
//! - 支持整轮取消
//!
//! ### `assembler` - 文档组装
//! - 纯函数，按章节列表顺序组装 markdown
//!
//! ## 层次关系
//!
//! ```text
//! app (一轮生成)
//!     ↓
//! fan_out (处理 Vec<SectionSpec>)  →  assembler (结果 → Document)
//!     ↓
//! workflow::SectionFlow (处理单个章节)
//!     ↓
//! services (能力层：llm / 文档写入 / 运行日志)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一职责**：fan_out 管并发，assembler 管格式，app 管交付
//! 2. **向下依赖**：编排层 → workflow → services
//! 3. **无业务逻辑**：只做调度和统计，不决定章节写什么

pub mod app;
pub mod assembler;
pub mod fan_out;

// 重新导出主要类型
pub use app::App;
pub use assembler::assemble;
pub use fan_out::{FanOutOrchestrator, RoundReport};
