use thiserror::Error;

use crate::models::section::ErrorKind;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 配置错误（启动阶段，致命）
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 输入校验错误（编排开始前拒绝）
    #[error("输入错误: {0}")]
    Validation(#[from] ValidationError),
    /// 编排错误
    #[error("编排错误: {0}")]
    Orchestration(#[from] OrchestrationError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 环境变量不存在
    #[error("环境变量 {var_name} 不存在")]
    EnvVarNotFound { var_name: String },
}

/// 输入校验错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Section 1 为空
    #[error("Section 1 cannot be empty. Please write it first.")]
    EmptyContext,
    /// 章节列表为空
    #[error("章节列表不能为空")]
    EmptySpecs,
    /// 章节名称为空
    #[error("第 {index} 个章节名称为空")]
    BlankSectionName { index: usize },
    /// 章节名称重复
    #[error("章节名称重复: {name}")]
    DuplicateSectionName { name: String },
    /// 并发数非法
    #[error("最大并发数必须 ≥ 1")]
    ZeroConcurrency,
}

/// 编排错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrchestrationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// 整轮生成被调用方取消，不返回部分结果
    #[error("生成已取消")]
    Cancelled,
}

/// 单个章节的生成错误
///
/// 只影响对应章节，由编排层转换为占位内容，不会中断整批任务。
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct GenerationError {
    pub kind: ErrorKind,
    pub message: String,
}

impl GenerationError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn timeout(secs: u64) -> Self {
        Self::new(ErrorKind::Timeout, format!("no response within {}s", secs))
    }

    pub fn empty_response(model: &str) -> Self {
        Self::new(
            ErrorKind::EmptyResponse,
            format!("model {} returned empty content", model),
        )
    }
}

impl From<async_openai::error::OpenAIError> for GenerationError {
    fn from(err: async_openai::error::OpenAIError) -> Self {
        use async_openai::error::OpenAIError;

        let kind = match &err {
            OpenAIError::ApiError(api) if is_rate_limit_message(&api.message) => {
                ErrorKind::RateLimited
            }
            OpenAIError::InvalidArgument(_) => ErrorKind::InvalidRequest,
            _ => ErrorKind::Remote,
        };
        Self::new(kind, err.to_string())
    }
}

fn is_rate_limit_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("rate limit") || lower.contains("quota")
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 文件不存在
    #[error("文件不存在: {path}")]
    NotFound { path: String },
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// JSON 序列化失败
    #[error("JSON序列化失败: {0}")]
    JsonSerializeFailed(#[from] serde_json::Error),
}

// ========== 便捷构造函数 ==========

impl FileError {
    pub fn read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        FileError::ReadFailed {
            path: path.into(),
            source,
        }
    }

    pub fn write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        FileError::WriteFailed {
            path: path.into(),
            source,
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
