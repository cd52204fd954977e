//! 文档写入服务 - 业务能力层
//!
//! 只负责把组装好的文档写到磁盘（UTF-8 .md），不关心文档内容

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::error::FileError;
use crate::models::{Document, ResultSet, SectionSpec};

/// 文档写入服务
pub struct DocumentWriter {
    output_path: PathBuf,
}

impl DocumentWriter {
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
        }
    }

    /// 写入文档，父目录不存在时自动创建
    pub async fn write(&self, document: &Document) -> Result<(), FileError> {
        write_file(&self.output_path, document.content()).await?;
        debug!(
            "文档已写入: {} ({} 字节, {})",
            self.output_path.display(),
            document.content().len(),
            document.content_type()
        );
        Ok(())
    }

    /// 按章节顺序把原始结果写成 JSON，方便人工修改后重新组装
    pub async fn write_results_json(
        path: &Path,
        specs: &[SectionSpec],
        results: &ResultSet,
    ) -> Result<(), FileError> {
        let json = serde_json::to_string_pretty(&results.ordered(specs))?;
        write_file(path, &json).await
    }
}

async fn write_file(path: &Path, content: &str) -> Result<(), FileError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| FileError::write_failed(parent.display().to_string(), e))?;
    }

    fs::write(path, content)
        .await
        .map_err(|e| FileError::write_failed(path.display().to_string(), e))
}
