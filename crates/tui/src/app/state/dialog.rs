use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Opaque host-supplied identifier correlating selections with a dialog.
///
/// Hosts send strings or numbers; the value is echoed back untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DialogId(Value);

impl DialogId {
    /// Accepts only truthy ids: `null`, `false`, `0` and `""` count as absent.
    pub fn from_value(value: &Value) -> Option<Self> {
        let truthy = match value {
            Value::Null => false,
            Value::Bool(flag) => *flag,
            Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
            Value::String(text) => !text.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        };
        truthy.then(|| Self(value.clone()))
    }
}

impl From<&str> for DialogId {
    fn from(value: &str) -> Self {
        Self(Value::String(value.to_string()))
    }
}

impl fmt::Display for DialogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(text) => f.write_str(text),
            other => write!(f, "{other}"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogOption {
    pub label: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub disabled: bool,
}

impl DialogOption {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DialogState {
    pub dialog_id: Option<DialogId>,
    pub speaker: String,
    pub body_text: String,
    pub options: Vec<DialogOption>,
    pub show_back: bool,
    pub visible: bool,
}

impl DialogState {
    /// Resets to the empty, hidden dialog. The active id goes with it.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_selectable(&self, index: usize) -> bool {
        self.visible
            && self
                .options
                .get(index)
                .is_some_and(|option| !option.disabled)
    }
}
