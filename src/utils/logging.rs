/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// 初始化 tracing 日志
///
/// 优先使用 `RUST_LOG`；否则默认 `info`，详细模式下为 `debug`。
/// 重复调用不会报错（测试中可能多次初始化）。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pcp_generator={}", default_level)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - KOICA PCP 并行生成模式");
    info!("🤖 模型: {}", config.llm_model_name);
    info!("🌐 输出语言: {}", config.language);
    info!("📊 最大并发数: {}", config.max_concurrent_sections);
    info!("{}", "=".repeat(60));
}

/// 记录一轮生成开始
///
/// # 参数
/// - `total`: 章节总数
/// - `max_concurrent`: 实际并发数
pub fn log_round_start(total: usize, max_concurrent: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始并行生成 {} 个章节（并发 {}）", total, max_concurrent);
    info!("💡 通常需要 30–60 秒");
    info!("{}", "=".repeat(60));
}

/// 记录单个章节完成
///
/// # 参数
/// - `completed`: 已完成数量
/// - `total`: 章节总数
/// - `name`: 章节名称
/// - `ok`: 是否生成成功
pub fn log_section_done(completed: usize, total: usize, name: &str, ok: bool) {
    if ok {
        info!("✓ 完成 {}/{}: {}", completed, total, name);
    } else {
        info!("✗ 完成 {}/{}: {}（生成失败，需人工补写）", completed, total, name);
    }
}

/// 打印最终统计信息
///
/// # 参数
/// - `success`: 成功数量
/// - `failed`: 失败数量
/// - `elapsed`: 耗时
/// - `output_file`: 输出文件路径
pub fn print_final_stats(success: usize, failed: usize, elapsed: Duration, output_file: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("耗时: {:.1}s", elapsed.as_secs_f64());
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", success, success + failed);
    info!("❌ 失败: {}", failed);
    info!("{}", "=".repeat(60));
    info!("\n文档已保存至: {}", output_file);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（按字符计）
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
