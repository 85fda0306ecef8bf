//! Input forms derived from a tool's schema.
//!
//! Each top-level field gets one control chosen by its declared type. The
//! form collects its controls into the raw JSON input handed to the tool;
//! it never validates, that is left to the contract.

use serde_json::{Map, Number, Value};
use webmcp_tool::{FieldSchema, FieldType, ToolContract};

/// Editing control for one field
#[derive(Debug, Clone, PartialEq)]
pub enum Control {
    /// Closed list; `None` until the user picks one
    Choice {
        /// Allowed values
        options: Vec<Value>,
        /// Index into `options`
        selected: Option<usize>,
    },
    /// On/off switch
    Toggle(bool),
    /// Numeric text entry
    Numeric {
        /// Typed text
        text: String,
        /// Whole numbers only
        integer: bool,
    },
    /// Raw JSON text for arrays and free-form objects
    RawJson(String),
    /// Plain text
    Text(String),
}

impl Control {
    /// Pick the control for `field`, prefilled with its default where the
    /// control shows text.
    #[must_use]
    pub fn for_field(field: &FieldSchema) -> Self {
        let default_text = field.default.as_ref().map(display_value).unwrap_or_default();
        if let Some(options) = field.enum_values.clone().filter(|v| !v.is_empty()) {
            return Self::Choice {
                options,
                selected: None,
            };
        }
        match field.field_type {
            FieldType::Boolean => Self::Toggle(false),
            FieldType::Number | FieldType::Integer => Self::Numeric {
                text: default_text,
                integer: field.field_type == FieldType::Integer,
            },
            FieldType::Array => Self::RawJson(String::new()),
            FieldType::Object if !field.has_nested_schema => Self::RawJson(String::new()),
            _ => Self::Text(default_text),
        }
    }

    /// Short label of the control kind
    #[must_use]
    pub fn kind_label(&self) -> &'static str {
        match self {
            Self::Choice { .. } => "choice",
            Self::Toggle(_) => "toggle",
            Self::Numeric { integer: true, .. } => "integer",
            Self::Numeric { .. } => "number",
            Self::RawJson(_) => "json",
            Self::Text(_) => "text",
        }
    }

    /// True for controls edited by typing
    #[must_use]
    pub fn is_textual(&self) -> bool {
        matches!(self, Self::Numeric { .. } | Self::RawJson(_) | Self::Text(_))
    }

    /// What the control currently shows
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            Self::Choice {
                options,
                selected: Some(i),
            } => options.get(*i).map(display_value).unwrap_or_default(),
            Self::Choice { selected: None, .. } => "Select...".to_string(),
            Self::Toggle(on) => if *on { "[x]" } else { "[ ]" }.to_string(),
            Self::Numeric { text, .. } | Self::RawJson(text) | Self::Text(text) => text.clone(),
        }
    }

    /// Value submitted for this control; `None` means omit the field
    fn submitted(&self) -> Option<Value> {
        match self {
            Self::Choice { options, selected } => selected.and_then(|i| options.get(i)).cloned(),
            Self::Toggle(on) => Some(Value::Bool(*on)),
            Self::Numeric { text, .. } => {
                let text = text.trim();
                if text.is_empty() {
                    return None;
                }
                Some(parse_number(text).unwrap_or_else(|| Value::String(text.to_string())))
            }
            Self::RawJson(text) => {
                if text.trim().is_empty() {
                    return None;
                }
                Some(serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.clone())))
            }
            Self::Text(text) => (!text.is_empty()).then(|| Value::String(text.clone())),
        }
    }
}

/// One labelled field of a form
#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    /// Schema introspection for the field
    pub schema: FieldSchema,
    /// Current control state
    pub control: Control,
}

/// Editable form for one tool
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormState {
    fields: Vec<FormField>,
    focus: usize,
}

impl FormState {
    /// Form for `tool`'s top-level fields, in schema order
    #[must_use]
    pub fn for_tool(tool: &ToolContract) -> Self {
        Self::from_fields(tool.input_schema().fields())
    }

    /// Form over explicit fields
    #[must_use]
    pub fn from_fields(fields: Vec<FieldSchema>) -> Self {
        let fields = fields
            .into_iter()
            .map(|schema| FormField {
                control: Control::for_field(&schema),
                schema,
            })
            .collect();
        Self { fields, focus: 0 }
    }

    /// Fields in order
    #[must_use]
    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    /// True when the tool takes no fields
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Index of the focused field
    #[must_use]
    pub fn focus(&self) -> usize {
        self.focus
    }

    /// The focused field
    #[must_use]
    pub fn focused(&self) -> Option<&FormField> {
        self.fields.get(self.focus)
    }

    /// Move focus forward, wrapping
    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    /// Move focus backward, wrapping
    pub fn focus_prev(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        }
    }

    /// Flip a toggle or advance a choice on the focused field
    pub fn cycle(&mut self) {
        let Some(field) = self.fields.get_mut(self.focus) else {
            return;
        };
        match &mut field.control {
            Control::Toggle(on) => *on = !*on,
            Control::Choice { options, selected } if !options.is_empty() => {
                *selected = match *selected {
                    None => Some(0),
                    Some(i) if i + 1 < options.len() => Some(i + 1),
                    Some(_) => None,
                };
            }
            _ => {}
        }
    }

    /// Replace the focused field's text
    pub fn set_text(&mut self, text: impl Into<String>) {
        if let Some(buffer) = self.focused_text_mut() {
            *buffer = text.into();
        }
    }

    /// Append to the focused field's text
    pub fn push_char(&mut self, c: char) {
        if let Some(buffer) = self.focused_text_mut() {
            buffer.push(c);
        }
    }

    /// Remove the last character of the focused field's text
    pub fn pop_char(&mut self) {
        if let Some(buffer) = self.focused_text_mut() {
            buffer.pop();
        }
    }

    /// Set a field's toggle by name
    pub fn set_toggle(&mut self, name: &str, on: bool) {
        if let Some(Control::Toggle(state)) = self.control_mut(name) {
            *state = on;
        }
    }

    /// Set a field's text by name
    pub fn set_field_text(&mut self, name: &str, text: impl Into<String>) {
        if let Some(Control::Numeric { text: buffer, .. } | Control::RawJson(buffer) | Control::Text(buffer)) =
            self.control_mut(name)
        {
            *buffer = text.into();
        }
    }

    /// Pick a choice by value
    pub fn select_choice(&mut self, name: &str, value: &Value) {
        if let Some(Control::Choice { options, selected }) = self.control_mut(name) {
            *selected = options.iter().position(|o| o == value);
        }
    }

    /// Build the raw input object.
    ///
    /// Empty controls are omitted. Toggles are always present. Text that
    /// does not parse as the expected number or JSON is passed as a string
    /// so validation reports it.
    #[must_use]
    pub fn collect(&self) -> Value {
        let mut input = Map::new();
        for field in &self.fields {
            if let Some(value) = field.control.submitted() {
                input.insert(field.schema.name.clone(), value);
            }
        }
        Value::Object(input)
    }

    fn control_mut(&mut self, name: &str) -> Option<&mut Control> {
        self.fields
            .iter_mut()
            .find(|f| f.schema.name == name)
            .map(|f| &mut f.control)
    }

    fn focused_text_mut(&mut self) -> Option<&mut String> {
        match &mut self.fields.get_mut(self.focus)?.control {
            Control::Numeric { text, .. } | Control::RawJson(text) | Control::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Fractional text in an integer field still parses; validation rejects it.
fn parse_number(text: &str) -> Option<Value> {
    if let Ok(n) = text.parse::<i64>() {
        return Some(Value::Number(n.into()));
    }
    text.parse::<f64>().ok().and_then(Number::from_f64).map(Value::Number)
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
