use serde::{Deserialize, Serialize};
use std::fmt;

/// 输出语言
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    /// 英语
    #[default]
    English,
    /// 韩语
    Korean,
}

impl Language {
    /// 获取提示词中使用的名称
    pub fn name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Korean => "한국어",
        }
    }

    /// 尝试从字符串解析语言（忽略大小写与首尾空白）
    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.trim();
        match s.to_lowercase().as_str() {
            "english" | "en" | "eng" => Some(Language::English),
            "korean" | "ko" | "kor" | "한국어" | "한국말" => Some(Language::Korean),
            _ => None,
        }
    }

    /// 所有支持的语言
    pub fn all() -> &'static [Language] {
        &[Language::English, Language::Korean]
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::from_str(s).ok_or_else(|| {
            let supported: Vec<&str> = Language::all().iter().map(|l| l.name()).collect();
            format!("不支持的语言: {}（可选: {}）", s, supported.join(", "))
        })
    }
}
