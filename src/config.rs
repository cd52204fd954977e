use crate::error::ConfigError;
use crate::models::Language;
use std::path::PathBuf;
use std::str::FromStr;

/// 程序配置
///
/// 启动时构造一次，之后只读共享；不存在全局客户端状态。
#[derive(Clone, Debug)]
pub struct Config {
    /// 同时进行的章节生成请求上限
    pub max_concurrent_sections: usize,
    /// Section 1 表单文件
    pub section1_file: PathBuf,
    /// 自定义章节列表文件（为空时使用内置 KOICA 章节）
    pub sections_file: Option<PathBuf>,
    /// 输出语言
    pub language: Language,
    /// 输出 markdown 文件
    pub output_file: PathBuf,
    /// 运行日志文件
    pub output_log_file: PathBuf,
    /// 各章节原始结果（JSON），为空时不输出
    pub results_json_file: Option<PathBuf>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    pub llm_temperature: f32,
    /// 单次请求超时（秒）
    pub llm_request_timeout_secs: u64,
    /// 单个章节失败后的重试次数
    pub llm_max_retries: u32,
}

/// 默认最大并发数
pub const DEFAULT_MAX_CONCURRENT_SECTIONS: usize = 6;

impl Default for Config {
    fn default() -> Self {
        Self {
            max_concurrent_sections: DEFAULT_MAX_CONCURRENT_SECTIONS,
            section1_file: PathBuf::from("section1.toml"),
            sections_file: None,
            language: Language::English,
            output_file: PathBuf::from("pcp.md"),
            output_log_file: PathBuf::from("pcp_run.log"),
            results_json_file: None,
            verbose_logging: false,
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-4o".to_string(),
            llm_temperature: 0.7,
            llm_request_timeout_secs: 120,
            llm_max_retries: 0,
        }
    }
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// `OPENAI_API_KEY` 必须存在，否则返回 [`ConfigError::EnvVarNotFound`]。
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源加载配置
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let llm_api_key = get("OPENAI_API_KEY").ok_or_else(|| ConfigError::EnvVarNotFound {
            var_name: "OPENAI_API_KEY".to_string(),
        })?;

        let language = match get("OUTPUT_LANGUAGE") {
            Some(value) => Language::from_str(&value).ok_or(ConfigError::EnvVarParseFailed {
                var_name: "OUTPUT_LANGUAGE".to_string(),
                value,
                expected_type: "Language".to_string(),
            })?,
            None => default.language,
        };

        Ok(Self {
            max_concurrent_sections: parse_var(&get, "MAX_CONCURRENT_SECTIONS", "usize")?
                .unwrap_or(default.max_concurrent_sections),
            section1_file: get("SECTION1_FILE")
                .map(PathBuf::from)
                .unwrap_or(default.section1_file),
            sections_file: get("SECTIONS_FILE").map(PathBuf::from),
            language,
            output_file: get("OUTPUT_FILE")
                .map(PathBuf::from)
                .unwrap_or(default.output_file),
            output_log_file: get("OUTPUT_LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or(default.output_log_file),
            results_json_file: get("RESULTS_JSON_FILE").map(PathBuf::from),
            verbose_logging: parse_var(&get, "VERBOSE_LOGGING", "bool")?
                .unwrap_or(default.verbose_logging),
            llm_api_key,
            llm_api_base_url: get("OPENAI_API_BASE").unwrap_or(default.llm_api_base_url),
            llm_model_name: get("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
            llm_temperature: parse_var(&get, "LLM_TEMPERATURE", "f32")?
                .unwrap_or(default.llm_temperature),
            llm_request_timeout_secs: parse_var(&get, "LLM_REQUEST_TIMEOUT_SECS", "u64")?
                .unwrap_or(default.llm_request_timeout_secs),
            llm_max_retries: parse_var(&get, "LLM_MAX_RETRIES", "u32")?
                .unwrap_or(default.llm_max_retries),
        })
    }
}

/// 解析可选的环境变量，存在但无法解析时报错
fn parse_var<T, G>(get: &G, var_name: &str, expected_type: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(var_name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::EnvVarNotFound { ref var_name } if var_name == "OPENAI_API_KEY"));
    }

    #[test]
    fn test_blank_api_key_counts_as_missing() {
        let err = Config::from_lookup(lookup_from(&[("OPENAI_API_KEY", "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::EnvVarNotFound { .. }));
    }

    #[test]
    fn test_defaults_with_only_api_key() {
        let config = Config::from_lookup(lookup_from(&[("OPENAI_API_KEY", "sk-test")])).unwrap();
        assert_eq!(config.llm_api_key, "sk-test");
        assert_eq!(config.llm_model_name, "gpt-4o");
        assert_eq!(config.max_concurrent_sections, 6);
        assert_eq!(config.language, Language::English);
        assert_eq!(config.output_file, PathBuf::from("pcp.md"));
        assert_eq!(config.llm_max_retries, 0);
        assert!(config.sections_file.is_none());
    }

    #[test]
    fn test_overrides_from_env() {
        let config = Config::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("MAX_CONCURRENT_SECTIONS", "2"),
            ("OUTPUT_LANGUAGE", "한국어"),
            ("LLM_TEMPERATURE", "0.2"),
            ("SECTIONS_FILE", "custom.toml"),
        ]))
        .unwrap();

        assert_eq!(config.max_concurrent_sections, 2);
        assert_eq!(config.language, Language::Korean);
        assert!((config.llm_temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(config.sections_file, Some(PathBuf::from("custom.toml")));
    }

    #[test]
    fn test_parse_failure_is_reported() {
        let err = Config::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("MAX_CONCURRENT_SECTIONS", "many"),
        ]))
        .unwrap_err();

        match err {
            ConfigError::EnvVarParseFailed {
                var_name, value, ..
            } => {
                assert_eq!(var_name, "MAX_CONCURRENT_SECTIONS");
                assert_eq!(value, "many");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_language_is_reported() {
        let err = Config::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OUTPUT_LANGUAGE", "Klingon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::EnvVarParseFailed { .. }));
    }
}
