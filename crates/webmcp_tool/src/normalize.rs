//! Coercion of handler return values into [`ExecutionResult`].

use serde::Serialize;
use serde_json::Value;
use webmcp_core::ExecutionResult;

/// What a handler may hand back
#[derive(Debug, Clone, PartialEq)]
pub enum ToolReturn {
    /// A plain string
    Text(String),
    /// An already-shaped result, passed through
    Result(ExecutionResult),
    /// Any other JSON value
    Value(Value),
}

impl ToolReturn {
    /// Serialize any value as a return
    ///
    /// # Errors
    ///
    /// Returns error if the value cannot be represented as JSON
    pub fn json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Self> {
        serde_json::to_value(value).map(Self::Value)
    }
}

impl From<String> for ToolReturn {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for ToolReturn {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<ExecutionResult> for ToolReturn {
    fn from(result: ExecutionResult) -> Self {
        Self::Result(result)
    }
}

impl From<Value> for ToolReturn {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

/// Canonicalize a handler return.
///
/// Strings become one text block. Result-shaped values (a `content`
/// array) pass through untouched, error flag and unknown block kinds
/// included. Everything else is pretty-printed into one text block.
#[must_use]
pub fn normalize(output: ToolReturn) -> ExecutionResult {
    match output {
        ToolReturn::Text(text) => ExecutionResult::text(text),
        ToolReturn::Result(result) => result,
        ToolReturn::Value(Value::String(text)) => ExecutionResult::text(text),
        ToolReturn::Value(value) => {
            ExecutionResult::from_value(&value).unwrap_or_else(|| ExecutionResult::json(&value))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;
    use webmcp_core::ContentBlock;

    #[test]
    fn test_string_becomes_text_block() {
        let result = normalize("Count: 3".into());
        assert_eq!(result.content, vec![ContentBlock::text("Count: 3")]);
        assert!(result.is_error.is_none());
    }

    #[test]
    fn test_result_passes_through() {
        let shaped = ExecutionResult::error("custom failure");
        assert_eq!(normalize(shaped.clone().into()), shaped);
    }

    #[test]
    fn test_content_shaped_value_passes_through() {
        let value = json!({
            "content": [{"type": "image", "data": "AAAA", "mimeType": "image/png"}],
            "isError": false
        });
        let result = normalize(value.into());
        assert_eq!(result.content, vec![ContentBlock::image("AAAA", "image/png")]);
        assert_eq!(result.is_error, Some(false));
    }

    #[test]
    fn test_unknown_block_kind_passes_through() {
        let value = json!({
            "content": [
                {"type": "text", "text": "clip"},
                {"type": "audio", "data": "UklG", "mimeType": "audio/wav"}
            ]
        });
        let result = normalize(value.clone().into());
        assert_eq!(result.content.len(), 2);
        assert_eq!(result.first_text(), Some("clip"));
        assert_eq!(serde_json::to_value(&result).unwrap(), value);
    }

    #[test]
    fn test_other_values_are_pretty_printed() {
        let result = normalize(json!({"pizzas": ["margherita"]}).into());
        assert_eq!(
            result.first_text(),
            Some("{\n  \"pizzas\": [\n    \"margherita\"\n  ]\n}")
        );
        assert!(!result.is_error());
    }

    #[test]
    fn test_content_field_not_array_is_serialized() {
        let value = json!({"content": "text"});
        let result = normalize(value.clone().into());
        assert_eq!(
            result.first_text(),
            Some(serde_json::to_string_pretty(&value).unwrap().as_str())
        );
    }

    #[test]
    fn test_json_helper() {
        let ret = ToolReturn::json(&vec![1, 2]).unwrap();
        assert_eq!(ret, ToolReturn::Value(json!([1, 2])));
    }

    proptest! {
        #[test]
        fn test_any_string_is_single_text_block(text in ".*") {
            let result = normalize(ToolReturn::Text(text.clone()));
            prop_assert_eq!(result.content.len(), 1);
            prop_assert_eq!(result.first_text(), Some(text.as_str()));
            prop_assert!(result.is_error.is_none());
        }

        #[test]
        fn test_numbers_are_never_empty(n in any::<i64>()) {
            let result = normalize(json!(n).into());
            prop_assert_eq!(result.content.len(), 1);
            let expected = n.to_string();
            prop_assert_eq!(result.first_text(), Some(expected.as_str()));
        }
    }
}
