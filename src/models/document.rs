/// 文档 MIME 类型
pub const CONTENT_TYPE: &str = "text/markdown";

/// 组装好的 markdown 文档，构造后不可修改
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    content: String,
}

impl Document {
    pub(crate) fn new(content: String) -> Self {
        Self { content }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn content_type(&self) -> &'static str {
        CONTENT_TYPE
    }
}
