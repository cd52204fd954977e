//! 章节并行生成器 - 编排层
//!
//! ## 职责
//!
//! 给定 Section 1 上下文和固定顺序的章节列表，为每个章节发起一次独立的
//! 生成请求，等待全部结束（成功或失败）后返回按章节名索引的结果集。
//!
//! ## 核心规则
//!
//! 1. **先校验后调度**：章节列表为空、名称重复、并发数为 0 都在发起任何请求前拒绝
//! 2. **并发控制**：使用 Semaphore 限制同时进行的请求数量
//! 3. **失败隔离**：单个章节失败（包括 panic）只记录为该章节的 `Failure`，不影响其他章节
//! 4. **完整结果**：返回的结果集对每个章节恰好有一条记录
//! 5. **取消**：丢弃 future 即中止所有进行中的请求（JoinSet 在 drop 时 abort），
//!    被取消的一轮不会返回部分结果
//!
//! 结果集本身无序，文档顺序由 assembler 按章节列表重新确定。

use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use crate::config::DEFAULT_MAX_CONCURRENT_SECTIONS;
use crate::error::{GenerationError, OrchestrationError, ValidationError};
use crate::models::{validate_specs, Context, ErrorKind, GenerationResult, ResultSet, SectionSpec};
use crate::utils::logging::{log_round_start, log_section_done};
use crate::workflow::{SectionCtx, SectionGenerator};

/// 一轮生成的结果
#[derive(Debug)]
pub struct RoundReport {
    /// 每个章节恰好一条
    pub results: ResultSet,
    /// 实际使用的并发数
    pub concurrency: usize,
    /// 耗时
    pub elapsed: Duration,
}

/// 计算实际并发数
///
/// 未指定时为 `min(DEFAULT_MAX_CONCURRENT_SECTIONS, 章节数)`；
/// 指定值超过章节数时按章节数截断。
pub fn effective_concurrency(
    requested: Option<usize>,
    section_count: usize,
) -> Result<usize, ValidationError> {
    match requested {
        Some(0) => Err(ValidationError::ZeroConcurrency),
        Some(max) => Ok(max.min(section_count).max(1)),
        None => Ok(DEFAULT_MAX_CONCURRENT_SECTIONS.min(section_count).max(1)),
    }
}

/// 章节并行生成器
///
/// 启动时构造一次；`generator` 被所有并发任务共享。
pub struct FanOutOrchestrator<G: SectionGenerator + ?Sized> {
    generator: Arc<G>,
    max_concurrency: Option<usize>,
}

impl<G: SectionGenerator + ?Sized + 'static> FanOutOrchestrator<G> {
    pub fn new(generator: Arc<G>) -> Self {
        Self {
            generator,
            max_concurrency: None,
        }
    }

    /// 设置最大并发数（必须 ≥ 1，在 `run` 时校验）
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = Some(max_concurrency);
        self
    }

    /// 并行生成所有章节，等待全部结束
    pub async fn run(
        &self,
        context: &Context,
        specs: &[SectionSpec],
    ) -> Result<RoundReport, OrchestrationError> {
        validate_specs(specs)?;
        let concurrency = effective_concurrency(self.max_concurrency, specs.len())?;
        let total = specs.len();

        log_round_start(total, concurrency);
        let started = Instant::now();

        let semaphore = Arc::new(Semaphore::new(concurrency));
        let context = Arc::new(context.clone());
        let mut join_set = JoinSet::new();

        // 为每个章节创建并发任务
        for (idx, spec) in specs.iter().enumerate() {
            let ctx = SectionCtx::new(idx + 1, total, spec.name.clone());
            let spec = spec.clone();
            let context = Arc::clone(&context);
            let generator = Arc::clone(&self.generator);
            let semaphore = Arc::clone(&semaphore);

            join_set.spawn(async move {
                // 信号量不会被关闭，permit 在任务结束时释放
                let _permit = semaphore.acquire_owned().await.ok();
                debug!("{} 开始生成", ctx);

                let outcome = AssertUnwindSafe(generator.generate(&spec, &context))
                    .catch_unwind()
                    .await;

                into_result(&ctx, spec.name, outcome)
            });
        }

        // 等待所有任务完成
        let mut results = ResultSet::with_capacity(total);
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(result) => {
                    log_section_done(results.len() + 1, total, &result.name, result.outcome.is_success());
                    results.insert(result);
                }
                Err(e) => {
                    error!("章节任务执行失败: {}", e);
                }
            }
        }

        // 任务被外部中止时补齐缺失的章节
        for spec in specs {
            if results.get(&spec.name).is_none() {
                warn!("章节 {} 没有返回结果，记为失败", spec.name);
                results.insert(GenerationResult::failure(
                    spec.name.clone(),
                    ErrorKind::Panicked,
                    "generation task was aborted",
                ));
            }
        }

        Ok(RoundReport {
            results,
            concurrency,
            elapsed: started.elapsed(),
        })
    }

    /// 与 `run` 相同，但 `cancel` 先完成时放弃整轮生成
    ///
    /// 取消后所有进行中的请求被中止，之后到达的结果被丢弃，返回
    /// [`OrchestrationError::Cancelled`]。
    pub async fn run_until_cancelled<C>(
        &self,
        context: &Context,
        specs: &[SectionSpec],
        cancel: C,
    ) -> Result<RoundReport, OrchestrationError>
    where
        C: Future<Output = ()>,
    {
        tokio::select! {
            report = self.run(context, specs) => report,
            _ = cancel => {
                warn!("⚠️ 生成已取消，进行中的请求全部中止");
                Err(OrchestrationError::Cancelled)
            }
        }
    }
}

fn into_result(
    ctx: &SectionCtx,
    name: String,
    outcome: Result<Result<String, GenerationError>, Box<dyn Any + Send>>,
) -> GenerationResult {
    match outcome {
        Ok(Ok(text)) => GenerationResult::success(name, text),
        Ok(Err(e)) => {
            warn!("{} 生成失败: {}", ctx, e);
            GenerationResult::failure(name, e.kind, e.message)
        }
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            error!("{} 生成任务 panic: {}", ctx, message);
            GenerationResult::failure(name, ErrorKind::Panicked, message)
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Outcome;
    use crate::orchestrator::assembler::assemble;
    use async_trait::async_trait;
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// 按脚本返回结果的生成器，记录并发度与完成顺序
    #[derive(Default)]
    struct ScriptedGenerator {
        delays_ms: HashMap<String, u64>,
        failing: HashSet<String>,
        panicking: HashSet<String>,
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        completed: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        fn with_delay(mut self, name: &str, ms: u64) -> Self {
            self.delays_ms.insert(name.to_string(), ms);
            self
        }

        fn failing(mut self, name: &str) -> Self {
            self.failing.insert(name.to_string());
            self
        }

        fn panicking(mut self, name: &str) -> Self {
            self.panicking.insert(name.to_string());
            self
        }

        fn completion_order(&self) -> Vec<String> {
            self.completed.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SectionGenerator for ScriptedGenerator {
        async fn generate(
            &self,
            spec: &SectionSpec,
            context: &Context,
        ) -> Result<String, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            let delay = self.delays_ms.get(&spec.name).copied().unwrap_or(10);
            tokio::time::sleep(Duration::from_millis(delay)).await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.completed.lock().unwrap().push(spec.name.clone());

            if self.panicking.contains(&spec.name) {
                panic!("boom in {}", spec.name);
            }
            if self.failing.contains(&spec.name) {
                return Err(GenerationError::new(ErrorKind::Remote, "HTTP 500"));
            }
            Ok(format!("text{} <{}>", spec.name, context.as_str()))
        }
    }

    fn specs(names: &[&str]) -> Vec<SectionSpec> {
        names
            .iter()
            .map(|n| SectionSpec::new(*n, format!("do {}", n)))
            .collect()
    }

    fn ctx() -> Context {
        Context::new("ctx").unwrap()
    }

    #[test]
    fn test_effective_concurrency() {
        assert_eq!(effective_concurrency(None, 7), Ok(6));
        assert_eq!(effective_concurrency(None, 3), Ok(3));
        assert_eq!(effective_concurrency(Some(2), 7), Ok(2));
        assert_eq!(effective_concurrency(Some(10), 4), Ok(4));
        assert_eq!(
            effective_concurrency(Some(0), 4),
            Err(ValidationError::ZeroConcurrency)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_result_keys_match_spec_names() {
        let generator = Arc::new(ScriptedGenerator::default());
        let specs = specs(&["A", "B", "C", "D"]);

        let report = FanOutOrchestrator::new(generator).run(&ctx(), &specs).await.unwrap();

        let expected: HashSet<&str> = ["A", "B", "C", "D"].into_iter().collect();
        assert_eq!(report.results.names(), expected);
        assert_eq!(report.results.len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_success_when_generator_always_succeeds() {
        let generator = Arc::new(ScriptedGenerator::default());
        let specs = specs(&["A", "B", "C"]);

        let report = FanOutOrchestrator::new(generator).run(&ctx(), &specs).await.unwrap();

        assert_eq!(report.results.success_count(), 3);
        assert_eq!(
            report.results.get("B").unwrap().outcome,
            Outcome::Success {
                text: "textB <ctx>".to_string()
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_partial_failure_is_isolated() {
        let generator = Arc::new(ScriptedGenerator::default().failing("B").failing("D"));
        let specs = specs(&["A", "B", "C", "D"]);

        let report = FanOutOrchestrator::new(generator.clone())
            .run(&ctx(), &specs)
            .await
            .unwrap();

        assert_eq!(report.results.len(), 4);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 4);
        for name in ["A", "C"] {
            assert!(report.results.get(name).unwrap().outcome.is_success());
        }
        for name in ["B", "D"] {
            assert_eq!(
                report.results.get(name).unwrap().outcome,
                Outcome::Failure {
                    kind: ErrorKind::Remote,
                    message: "HTTP 500".to_string()
                }
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_panic_is_recorded_as_failure() {
        let generator = Arc::new(ScriptedGenerator::default().panicking("B"));
        let specs = specs(&["A", "B", "C"]);

        let report = FanOutOrchestrator::new(generator).run(&ctx(), &specs).await.unwrap();

        assert_eq!(report.results.success_count(), 2);
        match &report.results.get("B").unwrap().outcome {
            Outcome::Failure { kind, message } => {
                assert_eq!(*kind, ErrorKind::Panicked);
                assert_eq!(message, "boom in B");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_in_flight_never_exceeds_limit() {
        let generator = Arc::new(ScriptedGenerator::default());
        let specs = specs(&["A", "B", "C", "D", "E"]);

        let report = FanOutOrchestrator::new(generator.clone())
            .with_max_concurrency(2)
            .run(&ctx(), &specs)
            .await
            .unwrap();

        assert_eq!(report.concurrency, 2);
        assert_eq!(report.results.len(), 5);
        assert_eq!(generator.max_in_flight.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_serialized_run_completes_every_section() {
        let generator = Arc::new(ScriptedGenerator::default().failing("B"));
        let specs = specs(&["A", "B", "C"]);

        let serial = FanOutOrchestrator::new(generator.clone())
            .with_max_concurrency(1)
            .run(&ctx(), &specs)
            .await
            .unwrap();
        assert_eq!(generator.max_in_flight.load(Ordering::SeqCst), 1);

        let parallel = FanOutOrchestrator::new(Arc::new(
            ScriptedGenerator::default()
                .failing("B")
                .with_delay("A", 300)
                .with_delay("C", 50),
        ))
        .with_max_concurrency(3)
        .run(&ctx(), &specs)
        .await
        .unwrap();

        assert_eq!(serial.results, parallel.results);

        let serial_doc = assemble(&ctx(), &specs, &serial.results);
        let parallel_doc = assemble(&ctx(), &specs, &parallel.results);
        assert_eq!(serial_doc.content().as_bytes(), parallel_doc.content().as_bytes());
    }

    #[tokio::test(start_paused = true)]
    async fn test_results_do_not_depend_on_completion_order() {
        let generator = Arc::new(
            ScriptedGenerator::default()
                .with_delay("A", 300)
                .with_delay("B", 200)
                .with_delay("C", 100),
        );
        let specs = specs(&["A", "B", "C"]);

        let report = FanOutOrchestrator::new(generator.clone())
            .run(&ctx(), &specs)
            .await
            .unwrap();

        assert_eq!(generator.completion_order(), vec!["C", "B", "A"]);
        let ordered: Vec<&str> = report
            .results
            .ordered(&specs)
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(ordered, vec!["A", "B", "C"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_input_is_rejected_before_scheduling() {
        let generator = Arc::new(ScriptedGenerator::default());
        let orchestrator = FanOutOrchestrator::new(generator.clone());

        let err = orchestrator.run(&ctx(), &[]).await.unwrap_err();
        assert_eq!(err, OrchestrationError::Validation(ValidationError::EmptySpecs));

        let err = orchestrator.run(&ctx(), &specs(&["A", "A"])).await.unwrap_err();
        assert!(matches!(
            err,
            OrchestrationError::Validation(ValidationError::DuplicateSectionName { .. })
        ));

        let err = FanOutOrchestrator::new(generator.clone())
            .with_max_concurrency(0)
            .run(&ctx(), &specs(&["A"]))
            .await
            .unwrap_err();
        assert_eq!(err, OrchestrationError::Validation(ValidationError::ZeroConcurrency));

        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_discards_late_results() {
        let generator = Arc::new(
            ScriptedGenerator::default()
                .with_delay("A", 10_000)
                .with_delay("B", 10_000),
        );
        let specs = specs(&["A", "B"]);

        let result = FanOutOrchestrator::new(generator.clone())
            .run_until_cancelled(&ctx(), &specs, tokio::time::sleep(Duration::from_millis(50)))
            .await;

        assert_eq!(result.unwrap_err(), OrchestrationError::Cancelled);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 2);

        // 被中止的任务不会再完成
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(generator.completion_order().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_that_never_fires_returns_full_round() {
        let generator = Arc::new(ScriptedGenerator::default());
        let specs = specs(&["A", "B"]);

        let report = FanOutOrchestrator::new(generator)
            .run_until_cancelled(&ctx(), &specs, std::future::pending())
            .await
            .unwrap();

        assert_eq!(report.results.success_count(), 2);
    }

    #[test]
    fn test_panic_message_variants() {
        let s: Box<dyn Any + Send> = Box::new("static");
        assert_eq!(panic_message(s.as_ref()), "static");
        let s: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(s.as_ref()), "owned");
        let s: Box<dyn Any + Send> = Box::new(42u8);
        assert_eq!(panic_message(s.as_ref()), "unknown panic");
    }
}
