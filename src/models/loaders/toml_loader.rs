use crate::error::{AppResult, FileError};
use crate::models::section::{validate_specs, SectionSpec};
use crate::models::section1::Section1Form;
use serde::Deserialize;
use std::path::Path;
use tokio::fs;

/// 章节列表文件格式
///
/// ```toml
/// [[sections]]
/// name = "2.1 Situation Analysis"
/// instruction = "Explain the current context..."
/// ```
#[derive(Debug, Deserialize)]
struct SectionsFile {
    sections: Vec<SectionSpec>,
}

/// 读取文本文件，不存在时返回 `NotFound`
async fn read_file(path: &Path) -> Result<String, FileError> {
    if !fs::try_exists(path).await.unwrap_or(false) {
        return Err(FileError::NotFound {
            path: path.display().to_string(),
        });
    }

    fs::read_to_string(path)
        .await
        .map_err(|e| FileError::read_failed(path.display().to_string(), e))
}

/// 从 TOML 文本解析 Section 1 表单
pub fn parse_section1_form(content: &str, source: &str) -> Result<Section1Form, FileError> {
    toml::from_str(content).map_err(|e| FileError::TomlParseFailed {
        path: source.to_string(),
        source: e,
    })
}

/// 从 TOML 文件加载 Section 1 表单
///
/// `.md` / `.txt` 文件按自由文本处理（等同于只填写了 summary）。
pub async fn load_section1_form(path: &Path) -> AppResult<Section1Form> {
    let content = read_file(path).await?;

    let is_plain_text = matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("md") | Some("txt")
    );
    if is_plain_text {
        tracing::info!("按自由文本加载 Section 1: {}", path.display());
        return Ok(Section1Form::from_text(content));
    }

    let form = parse_section1_form(&content, &path.display().to_string())?;
    tracing::info!("成功加载 Section 1 表单: {}", path.display());
    Ok(form)
}

/// 从 TOML 文本解析章节列表并校验
pub fn parse_section_specs(content: &str, source: &str) -> AppResult<Vec<SectionSpec>> {
    let file: SectionsFile = toml::from_str(content).map_err(|e| FileError::TomlParseFailed {
        path: source.to_string(),
        source: e,
    })?;
    validate_specs(&file.sections)?;
    Ok(file.sections)
}

/// 从 TOML 文件加载章节列表
pub async fn load_section_specs(path: &Path) -> AppResult<Vec<SectionSpec>> {
    let content = read_file(path).await?;
    let specs = parse_section_specs(&content, &path.display().to_string())?;
    tracing::info!("成功加载 {} 个章节定义: {}", specs.len(), path.display());
    Ok(specs)
}
