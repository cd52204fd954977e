//! 命令行参数
//!
//! 命令行参数优先于环境变量。

use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;
use crate::models::Language;

#[derive(Debug, Parser)]
#[command(
    name = "pcp-generator",
    version,
    about = "Draft the remaining sections of a KOICA Project/Program Concept Paper from Section 1"
)]
pub struct Cli {
    /// Section 1 表单文件（.toml，或 .md/.txt 自由文本）
    #[arg(long, value_name = "PATH")]
    pub section1: Option<PathBuf>,

    /// 自定义章节列表（TOML，[[sections]] name/instruction）
    #[arg(long, value_name = "PATH")]
    pub sections: Option<PathBuf>,

    /// 输出语言（English / 한국어）
    #[arg(long, short = 'l')]
    pub language: Option<Language>,

    /// 输出 markdown 文件
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// 同时进行的请求上限
    #[arg(long)]
    pub max_concurrency: Option<usize>,

    /// 模型名称
    #[arg(long)]
    pub model: Option<String>,

    /// 额外输出各章节原始结果（JSON）
    #[arg(long, value_name = "PATH")]
    pub results_json: Option<PathBuf>,

    /// 生成完成后把文档打印到标准输出
    #[arg(long)]
    pub print: bool,

    /// 显示详细日志
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

impl Cli {
    /// 用命令行参数覆盖配置
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(path) = &self.section1 {
            config.section1_file = path.clone();
        }
        if let Some(path) = &self.sections {
            config.sections_file = Some(path.clone());
        }
        if let Some(language) = self.language {
            config.language = language;
        }
        if let Some(path) = &self.output {
            config.output_file = path.clone();
        }
        if let Some(max) = self.max_concurrency {
            config.max_concurrent_sections = max;
        }
        if let Some(model) = &self.model {
            config.llm_model_name = model.clone();
        }
        if let Some(path) = &self.results_json {
            config.results_json_file = Some(path.clone());
        }
        if self.verbose {
            config.verbose_logging = true;
        }
    }
}
