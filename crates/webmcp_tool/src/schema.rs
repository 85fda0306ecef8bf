//! Input schemas and structural introspection.
//!
//! A schema description is converted into a JSON-Schema value exactly once,
//! when the contract is built. Everything after that (validation, form
//! derivation, listing) reads the converted value.

use crate::error::BuildError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Converted input schema of a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputSchema {
    value: Value,
}

impl InputSchema {
    /// Derive the schema of a typed input.
    ///
    /// # Errors
    ///
    /// Returns error if the derived schema cannot be represented as JSON
    pub fn for_type<T: JsonSchema>(tool: &str) -> Result<Self, BuildError> {
        let schema = schemars::schema_for!(T);
        let value = serde_json::to_value(&schema).map_err(|e| BuildError::SchemaConversion {
            tool: tool.to_string(),
            reason: e.to_string(),
        })?;
        Self::from_value(tool, value)
    }

    /// Accept a hand-written JSON-Schema value.
    ///
    /// # Errors
    ///
    /// Returns error if the value is not a JSON object or boolean schema
    pub fn from_value(tool: &str, mut value: Value) -> Result<Self, BuildError> {
        match &mut value {
            Value::Object(map) => {
                map.remove("$schema");
            }
            Value::Bool(_) => {}
            other => {
                return Err(BuildError::SchemaConversion {
                    tool: tool.to_string(),
                    reason: format!("schema must be an object, got {}", type_name(other)),
                });
            }
        }
        Ok(Self { value })
    }

    /// Schema accepting an object with no declared fields
    #[must_use]
    pub fn empty_object() -> Self {
        Self {
            value: serde_json::json!({"type": "object", "properties": {}}),
        }
    }

    /// The converted JSON-Schema value
    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.value
    }

    /// Declared top-level type, if any
    #[must_use]
    pub fn root_type(&self) -> Option<&str> {
        self.value.get("type").and_then(Value::as_str)
    }

    /// Names listed under `required`
    #[must_use]
    pub fn required(&self) -> Vec<String> {
        self.value
            .get("required")
            .and_then(Value::as_array)
            .map(|names| {
                names
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Top-level fields in declaration order, with references resolved
    #[must_use]
    pub fn fields(&self) -> Vec<FieldSchema> {
        let required = self.required();
        let Some(properties) = self.value.get("properties").and_then(Value::as_object) else {
            return Vec::new();
        };
        properties
            .iter()
            .map(|(name, property)| {
                let resolved = self.resolve(property);
                FieldSchema::from_parts(name, property, &resolved, required.contains(name))
            })
            .collect()
    }

    /// Look up one field by name
    #[must_use]
    pub fn field(&self, name: &str) -> Option<FieldSchema> {
        self.fields().into_iter().find(|f| f.name == name)
    }

    /// Follow `$ref` and strip nullable wrappers until a concrete schema remains
    fn resolve(&self, schema: &Value) -> Value {
        let mut current = schema.clone();
        // Bounded so a self-referential `$ref` cannot loop forever.
        for _ in 0..8 {
            if let Some(target) = current
                .get("$ref")
                .and_then(Value::as_str)
                .and_then(|r| self.lookup_ref(r))
            {
                current = merge_outer(&current, target);
                continue;
            }
            if let Some(inner) = non_null_variant(&current) {
                current = merge_outer(&current, inner);
                continue;
            }
            break;
        }
        current
    }

    fn lookup_ref(&self, reference: &str) -> Option<&Value> {
        let pointer = reference.strip_prefix('#')?;
        self.value.pointer(pointer)
    }
}

/// Coarse JSON type of a field, used to pick an input control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// JSON string
    String,
    /// Any JSON number
    Number,
    /// Whole number
    Integer,
    /// true / false
    Boolean,
    /// JSON array
    Array,
    /// JSON object
    Object,
    /// Type not declared or not recognised
    Unknown,
}

impl FieldType {
    fn parse(name: &str) -> Self {
        match name {
            "string" => Self::String,
            "number" => Self::Number,
            "integer" => Self::Integer,
            "boolean" => Self::Boolean,
            "array" => Self::Array,
            "object" => Self::Object,
            _ => Self::Unknown,
        }
    }

    /// Lowercase JSON-Schema name
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
            Self::Unknown => "unknown",
        }
    }
}

/// One top-level property of an input schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    /// Property name
    pub name: String,
    /// Declared type
    pub field_type: FieldType,
    /// Listed under `required`
    pub required: bool,
    /// Human hint
    pub description: Option<String>,
    /// Declared default
    pub default: Option<Value>,
    /// Closed set of allowed values
    pub enum_values: Option<Vec<Value>>,
    /// Declares nested `properties` (objects) or `items` (arrays)
    pub has_nested_schema: bool,
}

impl FieldSchema {
    fn from_parts(name: &str, outer: &Value, resolved: &Value, required: bool) -> Self {
        let description = outer
            .get("description")
            .or_else(|| resolved.get("description"))
            .and_then(Value::as_str)
            .map(str::to_string);
        let default = outer
            .get("default")
            .or_else(|| resolved.get("default"))
            .cloned();
        let field_type = declared_type(resolved);
        let has_nested_schema = match field_type {
            FieldType::Object => resolved
                .get("properties")
                .and_then(Value::as_object)
                .is_some_and(|p| !p.is_empty()),
            FieldType::Array => resolved.get("items").is_some_and(Value::is_object),
            _ => false,
        };
        Self {
            name: name.to_string(),
            field_type,
            required,
            description,
            default,
            enum_values: enum_values(resolved),
            has_nested_schema,
        }
    }

    /// True when the field has a closed set of values
    #[must_use]
    pub fn is_enum(&self) -> bool {
        self.enum_values.as_ref().is_some_and(|v| !v.is_empty())
    }
}

fn declared_type(schema: &Value) -> FieldType {
    match schema.get("type") {
        Some(Value::String(name)) => FieldType::parse(name),
        Some(Value::Array(names)) => names
            .iter()
            .filter_map(Value::as_str)
            .find(|n| *n != "null")
            .map(FieldType::parse)
            .unwrap_or(FieldType::Unknown),
        _ if schema.get("properties").is_some() => FieldType::Object,
        _ if schema.get("enum").is_some() || const_variants(schema).is_some() => {
            FieldType::String
        }
        _ => FieldType::Unknown,
    }
}

fn enum_values(schema: &Value) -> Option<Vec<Value>> {
    if let Some(values) = schema.get("enum").and_then(Value::as_array) {
        return Some(values.iter().filter(|v| !v.is_null()).cloned().collect());
    }
    const_variants(schema)
}

/// `oneOf`/`anyOf` where every branch is a `const` reads as an enumeration.
fn const_variants(schema: &Value) -> Option<Vec<Value>> {
    let branches = schema
        .get("oneOf")
        .or_else(|| schema.get("anyOf"))
        .and_then(Value::as_array)?;
    branches
        .iter()
        .map(|branch| branch.get("const").cloned())
        .collect()
}

/// For `anyOf: [X, {type: null}]` style wrappers, the non-null branch.
fn non_null_variant(schema: &Value) -> Option<&Value> {
    let branches = schema
        .get("anyOf")
        .or_else(|| schema.get("oneOf"))
        .and_then(Value::as_array)?;
    if branches.len() != 2 {
        return None;
    }
    let is_null = |v: &Value| v.get("type").and_then(Value::as_str) == Some("null");
    match (is_null(&branches[0]), is_null(&branches[1])) {
        (true, false) => Some(&branches[1]),
        (false, true) => Some(&branches[0]),
        _ => None,
    }
}

/// Inner schema with the outer annotations (description, default) kept on top.
fn merge_outer(outer: &Value, inner: &Value) -> Value {
    let mut merged: Map<String, Value> = inner.as_object().cloned().unwrap_or_default();
    if let Some(outer) = outer.as_object() {
        for key in ["description", "default", "title"] {
            if let Some(v) = outer.get(key) {
                merged.insert(key.to_string(), v.clone());
            }
        }
    }
    Value::Object(merged)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[allow(dead_code)]
    #[derive(Deserialize, JsonSchema)]
    struct OrderInput {
        /// The pizza ID from the menu
        pizza_id: String,
        #[schemars(range(min = 1, max = 10))]
        quantity: u32,
        size: Option<Size>,
        extra_cheese: bool,
    }

    #[allow(dead_code)]
    #[derive(Deserialize, JsonSchema)]
    #[serde(rename_all = "lowercase")]
    enum Size {
        Small,
        Medium,
        Large,
    }

    #[test]
    fn test_for_type_strips_meta_schema() {
        let schema = InputSchema::for_type::<OrderInput>("order").unwrap();
        assert!(schema.as_value().get("$schema").is_none());
        assert_eq!(schema.root_type(), Some("object"));
    }

    #[test]
    fn test_required_excludes_options() {
        let schema = InputSchema::for_type::<OrderInput>("order").unwrap();
        let required = schema.required();
        assert!(required.contains(&"pizza_id".to_string()));
        assert!(required.contains(&"quantity".to_string()));
        assert!(!required.contains(&"size".to_string()));
    }

    #[test]
    fn test_fields_keep_declaration_order() {
        let schema = InputSchema::for_type::<OrderInput>("order").unwrap();
        let names: Vec<_> = schema.fields().into_iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["pizza_id", "quantity", "size", "extra_cheese"]);
    }

    #[test]
    fn test_field_types_and_hints() {
        let schema = InputSchema::for_type::<OrderInput>("order").unwrap();
        let pizza = schema.field("pizza_id").unwrap();
        assert_eq!(pizza.field_type, FieldType::String);
        assert_eq!(pizza.description.as_deref(), Some("The pizza ID from the menu"));
        assert!(pizza.required);

        assert_eq!(schema.field("quantity").unwrap().field_type, FieldType::Integer);
        assert_eq!(schema.field("extra_cheese").unwrap().field_type, FieldType::Boolean);
    }

    #[test]
    fn test_optional_enum_is_resolved() {
        let schema = InputSchema::for_type::<OrderInput>("order").unwrap();
        let size = schema.field("size").unwrap();
        assert!(size.is_enum());
        assert_eq!(
            size.enum_values.unwrap(),
            vec![json!("small"), json!("medium"), json!("large")]
        );
        assert!(!size.required);
    }

    #[test]
    fn test_from_value_rejects_scalars() {
        let err = InputSchema::from_value("bad", json!(42)).unwrap_err();
        assert!(matches!(err, BuildError::SchemaConversion { .. }));
    }

    #[test]
    fn test_raw_schema_fields() {
        let schema = InputSchema::from_value(
            "raw",
            json!({
                "type": "object",
                "properties": {
                    "tags": {"type": "array"},
                    "meta": {"type": "object"},
                    "point": {"type": "object", "properties": {"x": {"type": "number"}}},
                    "mode": {"enum": ["a", "b"], "default": "a"}
                },
                "required": ["tags"]
            }),
        )
        .unwrap();
        let tags = schema.field("tags").unwrap();
        assert_eq!(tags.field_type, FieldType::Array);
        assert!(!tags.has_nested_schema);
        assert!(!schema.field("meta").unwrap().has_nested_schema);
        assert!(schema.field("point").unwrap().has_nested_schema);
        let mode = schema.field("mode").unwrap();
        assert_eq!(mode.field_type, FieldType::String);
        assert_eq!(mode.default, Some(json!("a")));
    }

    #[test]
    fn test_empty_object_has_no_fields() {
        assert!(InputSchema::empty_object().fields().is_empty());
    }
}
