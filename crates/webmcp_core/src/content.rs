//! Content blocks and the canonical execution result shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single block of tool output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    /// Plain text
    Text {
        /// The text
        text: String,
    },
    /// Encoded binary data such as an image
    #[serde(alias = "binary")]
    Image {
        /// Base64 payload
        data: String,
        /// Media type of the payload
        #[serde(rename = "mimeType")]
        mime_type: String,
    },
    /// Reference to an external resource
    Resource {
        /// Resource location
        uri: String,
        /// Media type, when known
        #[serde(rename = "mimeType", default, skip_serializing_if = "Option::is_none")]
        mime_type: Option<String>,
    },
    /// Any other block, kept verbatim
    #[serde(untagged)]
    Other(Value),
}

impl ContentBlock {
    /// Create a text block
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Create a binary block
    #[must_use]
    pub fn image(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self::Image {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Create a resource reference block
    #[must_use]
    pub fn resource(uri: impl Into<String>, mime_type: Option<String>) -> Self {
        Self::Resource {
            uri: uri.into(),
            mime_type,
        }
    }

    /// Get text content if this is a text block.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            _ => None,
        }
    }
}

/// What a tool invocation resolves to.
///
/// `content` is never empty once a result leaves the execution wrapper.
/// Errors are always one text block with `is_error` set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Ordered output blocks
    pub content: Vec<ContentBlock>,
    /// Set when the invocation failed
    #[serde(rename = "isError", default, skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

impl ExecutionResult {
    /// Single text block, no error flag.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::text(text)],
            is_error: None,
        }
    }

    /// Pretty-printed JSON in a single text block.
    #[must_use]
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Self {
        let text = serde_json::to_string_pretty(value)
            .unwrap_or_else(|err| format!("<unserializable result: {err}>"));
        Self::text(text)
    }

    /// Error result carrying `message`.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::text(message)],
            is_error: Some(true),
        }
    }

    /// Build a result from explicit blocks.
    #[must_use]
    pub fn from_blocks(content: Vec<ContentBlock>) -> Self {
        Self {
            content,
            is_error: None,
        }
    }

    /// True when the error flag is set.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.is_error.unwrap_or(false)
    }

    /// Text of the first text block, if any.
    #[must_use]
    pub fn first_text(&self) -> Option<&str> {
        self.content.iter().find_map(ContentBlock::as_text)
    }

    /// Interpret a JSON value as a result when it has a `content` array.
    ///
    /// Blocks of unknown kinds are carried as [`ContentBlock::Other`].
    /// Top-level keys other than `content` and `isError` are not kept.
    /// Returns `None` for any other shape, including a non-boolean `isError`.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        let content = value.get("content")?;
        if !content.is_array() {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }

    /// Human-readable rendering: text blocks verbatim, others as compact JSON.
    #[must_use]
    pub fn to_display_text(&self) -> String {
        self.content
            .iter()
            .map(|block| match block {
                ContentBlock::Text { text } => text.clone(),
                other => serde_json::to_string(other).unwrap_or_default(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
