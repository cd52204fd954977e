//! 运行日志服务 - 业务能力层
//!
//! 只负责"写运行日志"能力：日志头 + 每个章节一行结果 + 需要人工补写的章节

use std::fmt::Write as _;
use std::path::PathBuf;
use tokio::fs;
use tracing::debug;

use crate::error::FileError;
use crate::models::{Outcome, ResultSet, SectionSpec};

/// 运行日志
pub struct RunLog {
    log_file_path: PathBuf,
}

impl RunLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            log_file_path: path.into(),
        }
    }

    /// 写入本轮生成的日志（覆盖旧文件）
    ///
    /// # 参数
    /// - `specs`: 章节列表（决定行顺序）
    /// - `results`: 生成结果
    /// - `model`: 使用的模型名称
    pub async fn write(
        &self,
        specs: &[SectionSpec],
        results: &ResultSet,
        model: &str,
    ) -> Result<(), FileError> {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let content = render_log(specs, results, model, &timestamp);

        debug!("写入运行日志: {}", self.log_file_path.display());
        fs::write(&self.log_file_path, content)
            .await
            .map_err(|e| FileError::write_failed(self.log_file_path.display().to_string(), e))
    }
}

fn render_log(specs: &[SectionSpec], results: &ResultSet, model: &str, timestamp: &str) -> String {
    let mut log = format!(
        "{}\nPCP 生成日志 - {}\n模型: {}\n{}\n\n",
        "=".repeat(60),
        timestamp,
        model,
        "=".repeat(60)
    );

    let mut needs_attention = Vec::new();
    for spec in specs {
        match results.get(&spec.name).map(|r| &r.outcome) {
            Some(Outcome::Success { text }) => {
                let _ = writeln!(log, "OK     | {} | {} 字符", spec.name, text.chars().count());
            }
            Some(Outcome::Failure { kind, message }) => {
                let _ = writeln!(log, "FAILED | {} | {}: {}", spec.name, kind, message);
                needs_attention.push(spec.name.as_str());
            }
            None => {
                let _ = writeln!(log, "FAILED | {} | missing", spec.name);
                needs_attention.push(spec.name.as_str());
            }
        }
    }

    if !needs_attention.is_empty() {
        let _ = writeln!(log, "\n需要人工补写的章节:");
        for name in needs_attention {
            let _ = writeln!(log, "  - {}", name);
        }
    }

    log
}
