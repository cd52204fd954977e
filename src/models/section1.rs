//! Section 1 表单
//!
//! 用户填写的 "Section 1. Basic Project Information"，
//! 被整理成一段文本作为所有章节生成的上下文。

use serde::Deserialize;

use crate::error::ValidationError;
use crate::models::section::Context;

/// Section 1 表单字段（均可为空，空字段不输出）
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Section1Form {
    pub project_title: Option<String>,
    pub country: Option<String>,
    pub sector: Option<String>,
    pub duration: Option<String>,
    pub budget: Option<String>,
    pub executing_agency: Option<String>,
    pub target_area: Option<String>,
    pub beneficiaries: Option<String>,
    /// 自由文本（支持 markdown）
    pub summary: Option<String>,
}

impl Section1Form {
    /// 只有自由文本的表单
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            summary: Some(text.into()),
            ..Default::default()
        }
    }

    /// 按固定顺序列出 (标签, 值)
    fn labeled_fields(&self) -> [(&'static str, Option<&str>); 8] {
        [
            ("Project Title", self.project_title.as_deref()),
            ("Partner Country", self.country.as_deref()),
            ("Sector", self.sector.as_deref()),
            ("Project Duration", self.duration.as_deref()),
            ("Total Budget", self.budget.as_deref()),
            ("Executing Agency", self.executing_agency.as_deref()),
            ("Target Area", self.target_area.as_deref()),
            ("Target Beneficiaries", self.beneficiaries.as_deref()),
        ]
    }

    /// 渲染成上下文文本
    pub fn render(&self) -> String {
        let lines: Vec<String> = self
            .labeled_fields()
            .into_iter()
            .filter_map(|(label, value)| {
                let value = value?.trim();
                (!value.is_empty()).then(|| format!("**{}:** {}", label, value))
            })
            .collect();

        let summary = self
            .summary
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        match (lines.is_empty(), summary) {
            (true, None) => String::new(),
            (true, Some(summary)) => summary.to_string(),
            (false, None) => lines.join("\n"),
            (false, Some(summary)) => format!("{}\n\n{}", lines.join("\n"), summary),
        }
    }

    /// 构建生成上下文，全部为空时拒绝
    pub fn collect(&self) -> Result<Context, ValidationError> {
        Context::new(self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_fields_in_fixed_order() {
        let form = Section1Form {
            sector: Some("Health".to_string()),
            project_title: Some("Maternal Care Improvement".to_string()),
            country: Some("  Laos ".to_string()),
            summary: Some("Background text.\n".to_string()),
            ..Default::default()
        };

        assert_eq!(
            form.render(),
            "**Project Title:** Maternal Care Improvement\n\
             **Partner Country:** Laos\n\
             **Sector:** Health\n\
             \n\
             Background text."
        );
    }

    #[test]
    fn test_blank_fields_are_skipped() {
        let form = Section1Form {
            project_title: Some("   ".to_string()),
            budget: Some("USD 5M".to_string()),
            ..Default::default()
        };
        assert_eq!(form.render(), "**Total Budget:** USD 5M");
    }

    #[test]
    fn test_free_text_only() {
        let form = Section1Form::from_text("  # My project\nDetails  ");
        assert_eq!(form.render(), "# My project\nDetails");
        assert!(form.collect().is_ok());
    }

    #[test]
    fn test_empty_form_is_rejected() {
        assert_eq!(
            Section1Form::default().collect(),
            Err(ValidationError::EmptyContext)
        );
        assert_eq!(
            Section1Form::from_text("\n  ").collect(),
            Err(ValidationError::EmptyContext)
        );
    }
}
