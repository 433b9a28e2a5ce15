//! Tool result content model.

use serde::Serialize;

/// One entry of a tool result's `content` list.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentItem {
    Text { text: String },
}

impl ContentItem {
    pub fn text(text: impl Into<String>) -> Self {
        ContentItem::Text { text: text.into() }
    }
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct ToolOutput {
    pub content: Vec<ContentItem>,
}

impl ToolOutput {
    pub fn push(mut self, item: ContentItem) -> Self {
        self.content.push(item);
        self
    }
}
