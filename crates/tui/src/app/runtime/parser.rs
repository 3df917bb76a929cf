use crate::app::state::{
    DialogId, DialogOption, DEFAULT_PROGRESS_DURATION, DEFAULT_PROGRESS_LABEL,
};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

pub const SELECT_OPTION_PATH: &str = "/selectOption";
pub const BACK_ACTION: &str = "back";
/// Index reported when the user dismisses the dialog.
pub const CANCEL_INDEX: i64 = -1;

#[derive(Debug, Clone, PartialEq)]
pub struct ShowDialogRequest {
    pub id: Option<DialogId>,
    pub speaker: String,
    pub text: String,
    pub options: Vec<DialogOption>,
    pub show_back: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressStartRequest {
    pub label: String,
    pub duration: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HostCommand {
    ShowDialog(ShowDialogRequest),
    CloseDialog,
    ProgressStart(ProgressStartRequest),
    ProgressEnd,
}

impl HostCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ShowDialog(_) => "showDialog",
            Self::CloseDialog => "closeDialog",
            Self::ProgressStart(_) => "progressStart",
            Self::ProgressEnd => "progressEnd",
        }
    }
}

/// Host answer to an earlier POST. Only ever logged.
#[derive(Debug, Clone, PartialEq)]
pub struct HostResponse {
    pub id: String,
    pub result: Option<Value>,
    pub error: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HostMessage {
    Command(HostCommand),
    UnknownAction(String),
    Response(HostResponse),
    Output(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Choice {
    Index { index: i64 },
    Action { action: String },
}

/// Body of the `/selectOption` POST.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionReport {
    #[serde(flatten)]
    pub choice: Choice,
    pub dialog_id: Option<DialogId>,
}

impl SelectionReport {
    pub fn index(index: i64, dialog_id: Option<DialogId>) -> Self {
        Self {
            choice: Choice::Index { index },
            dialog_id,
        }
    }

    pub fn action(action: impl Into<String>, dialog_id: Option<DialogId>) -> Self {
        Self {
            choice: Choice::Action {
                action: action.into(),
            },
            dialog_id,
        }
    }
}

/// Falsy values read as empty; other scalars are shown as their text.
fn text_field(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) if number.as_f64().is_some_and(|n| n != 0.0) => {
            number.to_string()
        }
        Some(Value::Bool(true)) => "true".to_string(),
        _ => String::new(),
    }
}

fn optional_text_field(value: Option<&Value>) -> Option<String> {
    let text = text_field(value);
    (!text.is_empty()).then_some(text)
}

fn parse_option(value: &Value) -> DialogOption {
    DialogOption {
        label: text_field(value.get("label")),
        description: optional_text_field(value.get("description")),
        icon: optional_text_field(value.get("icon")),
        disabled: value
            .get("disabled")
            .and_then(Value::as_bool)
            .unwrap_or(false),
    }
}

fn parse_show_dialog(data: &Value) -> ShowDialogRequest {
    let options = data
        .get("options")
        .and_then(Value::as_array)
        .map(|items| items.iter().map(parse_option).collect())
        .unwrap_or_default();
    ShowDialogRequest {
        id: data.get("id").and_then(DialogId::from_value),
        speaker: text_field(data.get("speaker")),
        text: text_field(data.get("text")),
        options,
        show_back: data
            .get("showBack")
            .and_then(Value::as_bool)
            .unwrap_or(false),
    }
}

fn parse_duration(value: Option<&Value>) -> Duration {
    let Some(value) = value else {
        return DEFAULT_PROGRESS_DURATION;
    };
    if let Some(ms) = value.as_u64() {
        return Duration::from_millis(ms);
    }
    match value.as_f64() {
        Some(ms) if ms.is_finite() && ms >= 0.0 => Duration::from_millis(ms.round() as u64),
        _ => DEFAULT_PROGRESS_DURATION,
    }
}

fn parse_progress_start(data: &Value) -> ProgressStartRequest {
    let label = optional_text_field(data.get("label"))
        .unwrap_or_else(|| DEFAULT_PROGRESS_LABEL.to_string());
    ProgressStartRequest {
        label,
        duration: parse_duration(data.get("duration")),
    }
}

pub fn parse_command(action: &str, data: &Value) -> Option<HostCommand> {
    match action {
        "showDialog" => Some(HostCommand::ShowDialog(parse_show_dialog(data))),
        "closeDialog" => Some(HostCommand::CloseDialog),
        "progressStart" => Some(HostCommand::ProgressStart(parse_progress_start(data))),
        "progressEnd" => Some(HostCommand::ProgressEnd),
        _ => None,
    }
}

fn id_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

pub fn parse_host_line(raw: &str) -> HostMessage {
    let trimmed = raw.trim_end();
    let parsed: Result<Value, _> = serde_json::from_str(trimmed);
    let value = match parsed {
        Ok(value) => value,
        Err(_) => return HostMessage::Output(trimmed.to_string()),
    };

    if let Some(action) = value.get("action").and_then(Value::as_str) {
        let data = value.get("data").unwrap_or(&Value::Null);
        return match parse_command(action, data) {
            Some(command) => HostMessage::Command(command),
            None => HostMessage::UnknownAction(action.to_string()),
        };
    }

    let result = value.get("result").cloned();
    let error = value.get("error").filter(|error| !error.is_null()).cloned();
    if let Some(id) = value.get("id") {
        if result.is_some() || error.is_some() {
            return HostMessage::Response(HostResponse {
                id: id_string(id),
                result,
                error,
            });
        }
    }

    HostMessage::Output(trimmed.to_string())
}
