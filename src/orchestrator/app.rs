//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：加载章节列表和 Section 1，构造唯一的 LLM 客户端
//! 2. **输入校验**：Section 1 为空、章节列表非法时在生成前拒绝
//! 3. **并行生成**：委托 `FanOutOrchestrator`，Ctrl-C 取消整轮
//! 4. **组装与交付**：组装文档、写入 .md、写运行日志
//! 5. **全局统计**：输出成功/失败数量

use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::AppResult;
use crate::models::{
    default_section_specs, load_section1_form, load_section_specs, Context, Document, SectionSpec,
};
use crate::orchestrator::assembler::assemble;
use crate::orchestrator::fan_out::FanOutOrchestrator;
use crate::services::{DocumentWriter, LlmService, RunLog};
use crate::utils::logging::{log_startup, print_final_stats};
use crate::workflow::{SectionFlow, SectionGenerator};

/// 应用主结构
pub struct App {
    config: Config,
    specs: Vec<SectionSpec>,
    context: Context,
    orchestrator: FanOutOrchestrator<dyn SectionGenerator>,
}

impl App {
    /// 初始化应用（使用真实的 LLM 服务）
    pub async fn initialize(config: Config) -> AppResult<Self> {
        log_startup(&config);

        let llm_service = Arc::new(LlmService::new(&config));
        let generator: Arc<dyn SectionGenerator> =
            Arc::new(SectionFlow::new(llm_service, config.language));

        Self::with_generator(config, generator).await
    }

    /// 使用指定的章节生成器初始化应用
    pub async fn with_generator(
        config: Config,
        generator: Arc<dyn SectionGenerator>,
    ) -> AppResult<Self> {
        let specs = load_specs(config.sections_file.as_deref()).await?;
        let context = load_context(&config.section1_file).await?;

        let orchestrator =
            FanOutOrchestrator::new(generator).with_max_concurrency(config.max_concurrent_sections);

        Ok(Self {
            config,
            specs,
            context,
            orchestrator,
        })
    }

    pub fn specs(&self) -> &[SectionSpec] {
        &self.specs
    }

    /// 运行应用主逻辑，Ctrl-C 时取消
    pub async fn run(&self) -> AppResult<Document> {
        self.run_until_cancelled(ctrl_c()).await
    }

    /// 运行应用主逻辑，`cancel` 完成时放弃整轮生成
    pub async fn run_until_cancelled<C>(&self, cancel: C) -> AppResult<Document>
    where
        C: Future<Output = ()>,
    {
        let report = self
            .orchestrator
            .run_until_cancelled(&self.context, &self.specs, cancel)
            .await?;

        let document = assemble(&self.context, &self.specs, &report.results);

        // 交付
        DocumentWriter::new(&self.config.output_file)
            .write(&document)
            .await?;

        if let Some(path) = &self.config.results_json_file {
            DocumentWriter::write_results_json(path, &self.specs, &report.results).await?;
            info!("📝 原始结果已保存至: {}", path.display());
        }

        if let Err(e) = RunLog::new(&self.config.output_log_file)
            .write(&self.specs, &report.results, &self.config.llm_model_name)
            .await
        {
            warn!("⚠️ 运行日志写入失败: {}", e);
        }

        print_final_stats(
            report.results.success_count(),
            report.results.failure_count(),
            report.elapsed,
            &self.config.output_file.display().to_string(),
        );

        Ok(document)
    }
}

/// 加载章节列表
async fn load_specs(sections_file: Option<&Path>) -> AppResult<Vec<SectionSpec>> {
    match sections_file {
        Some(path) => {
            info!("\n📁 正在加载章节定义...");
            load_section_specs(path).await
        }
        None => Ok(default_section_specs()),
    }
}

/// 加载 Section 1 并构建上下文
async fn load_context(section1_file: &Path) -> AppResult<Context> {
    info!("\n📁 正在加载 Section 1...");
    let form = load_section1_form(section1_file).await?;
    Ok(form.collect()?)
}

/// 等待 Ctrl-C；无法注册信号处理时永不完成
async fn ctrl_c() {
    if tokio::signal::ctrl_c().await.is_err() {
        warn!("⚠️ 无法监听 Ctrl-C，取消功能不可用");
        std::future::pending::<()>().await;
    }
}
