//! 章节数据模型
//!
//! - `SectionSpec`：要生成的章节（名称 + 写作要求），启动时固定，运行中不修改
//! - `Context`：用户撰写的 Section 1，作为每次生成的上下文
//! - `GenerationResult` / `ResultSet`：一轮生成的结果，按章节名索引

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::error::ValidationError;

/// 单个待生成章节
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSpec {
    /// 章节名称（唯一，同时决定最终文档中的顺序）
    pub name: String,
    /// 写作要求
    pub instruction: String,
}

impl SectionSpec {
    pub fn new(name: impl Into<String>, instruction: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instruction: instruction.into(),
        }
    }
}

/// KOICA PCP 第 2–5 部分的内置章节列表
const KOICA_PCP_SECTIONS: &[(&str, &str)] = &[
    (
        "2.1 Situation Analysis",
        "Explain the current social, economic, and sector‑specific context relevant to the project. Provide key statistics where possible.",
    ),
    (
        "2.2 Country Development Strategies and Policies",
        "Describe national strategies, policies, or plans that align with the project objective. Reference policy names and publication years.",
    ),
    (
        "2.3 Justification for Intervention",
        "Why is KOICA support necessary? Highlight problem magnitude, KOICA’s comparative advantage, and alignment with SDGs.",
    ),
    (
        "2.4 Lessons Learned",
        "Summarize lessons from similar past projects (KOICA or other donors). Include at least two concrete lessons.",
    ),
    (
        "3 Project Description",
        "Provide Objective, Expected Outcomes, Outputs, and Key Activities (high‑level workplan). Use a bullet list for Outputs and Activities.",
    ),
    (
        "4 Stakeholder Analysis",
        "Identify target beneficiaries (with numbers) and other stakeholders with their roles and interests.",
    ),
    (
        "5 Project Management and Implementation",
        "Outline governance and coordination mechanisms (steering committee, executing agency, reporting). State indicative timeline and risks.",
    ),
];

/// 内置章节列表（按文档顺序）
pub fn default_section_specs() -> Vec<SectionSpec> {
    KOICA_PCP_SECTIONS
        .iter()
        .map(|(name, instruction)| SectionSpec::new(*name, *instruction))
        .collect()
}

/// 校验章节列表：非空、名称非空且唯一
pub fn validate_specs(specs: &[SectionSpec]) -> Result<(), ValidationError> {
    if specs.is_empty() {
        return Err(ValidationError::EmptySpecs);
    }

    let mut seen = HashSet::with_capacity(specs.len());
    for (index, spec) in specs.iter().enumerate() {
        if spec.name.trim().is_empty() {
            return Err(ValidationError::BlankSectionName { index: index + 1 });
        }
        if !seen.insert(spec.name.as_str()) {
            return Err(ValidationError::DuplicateSectionName {
                name: spec.name.clone(),
            });
        }
    }

    Ok(())
}

/// 生成上下文（Section 1 全文）
///
/// 只能通过 [`Context::new`] 构造，保证非空。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context(String);

impl Context {
    pub fn new(text: impl Into<String>) -> Result<Self, ValidationError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ValidationError::EmptyContext);
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 生成失败的分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// 超时
    Timeout,
    /// 触发频率或配额限制
    RateLimited,
    /// 远端返回错误或网络错误
    Remote,
    /// 返回内容为空
    EmptyResponse,
    /// 请求构建失败
    InvalidRequest,
    /// 生成任务内部 panic
    Panicked,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Timeout => "timeout",
            ErrorKind::RateLimited => "rate_limited",
            ErrorKind::Remote => "remote",
            ErrorKind::EmptyResponse => "empty_response",
            ErrorKind::InvalidRequest => "invalid_request",
            ErrorKind::Panicked => "panicked",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 单个章节的生成结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Success { text: String },
    Failure { kind: ErrorKind, message: String },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationResult {
    pub name: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl GenerationResult {
    pub fn success(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            outcome: Outcome::Success { text: text.into() },
        }
    }

    pub fn failure(name: impl Into<String>, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            outcome: Outcome::Failure {
                kind,
                message: message.into(),
            },
        }
    }
}

/// 一轮生成的全部结果
///
/// 无序；文档顺序只由 `SectionSpec` 列表决定。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    entries: HashMap<String, GenerationResult>,
}

impl ResultSet {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
        }
    }

    /// 写入一个结果，同名结果会被覆盖
    pub fn insert(&mut self, result: GenerationResult) {
        self.entries.insert(result.name.clone(), result);
    }

    pub fn get(&self, name: &str) -> Option<&GenerationResult> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> HashSet<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GenerationResult> {
        self.entries.values()
    }

    pub fn success_count(&self) -> usize {
        self.iter().filter(|r| r.outcome.is_success()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.len() - self.success_count()
    }

    /// 按给定章节顺序导出结果（缺失的章节跳过）
    pub fn ordered<'a>(&'a self, specs: &'a [SectionSpec]) -> Vec<&'a GenerationResult> {
        specs.iter().filter_map(|spec| self.get(&spec.name)).collect()
    }
}

impl FromIterator<GenerationResult> for ResultSet {
    fn from_iter<I: IntoIterator<Item = GenerationResult>>(iter: I) -> Self {
        let mut set = ResultSet::default();
        for result in iter {
            set.insert(result);
        }
        set
    }
}
