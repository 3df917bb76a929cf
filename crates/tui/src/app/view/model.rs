//! Projection of controller state into what the terminal draws.

use crate::app::runtime::BACK_ACTION;
use crate::app::state::{DialogState, ProgressState};
use crate::app::util::{sanitize_for_tui, sanitize_inline};
use std::time::Instant;

pub const BACK_LABEL: &str = "Back";

/// What activating an entry does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickTarget {
    Option(usize),
    Action(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Back,
    Option { index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryView {
    pub kind: EntryKind,
    pub label: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub disabled: bool,
    /// `None` for disabled options: nothing is wired to them.
    pub target: Option<ClickTarget>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogView {
    pub visible: bool,
    pub speaker: String,
    pub body: String,
    pub entries: Vec<EntryView>,
}

impl DialogView {
    pub fn target(&self, entry: usize) -> Option<&ClickTarget> {
        self.entries.get(entry).and_then(|view| view.target.as_ref())
    }

    pub fn entry_for_option(&self, index: usize) -> Option<usize> {
        self.entries
            .iter()
            .position(|view| view.kind == EntryKind::Option { index })
    }

    pub fn back_entry(&self) -> Option<usize> {
        self.entries
            .iter()
            .position(|view| view.kind == EntryKind::Back)
    }
}

pub fn render_dialog(state: &DialogState) -> DialogView {
    if !state.visible {
        return DialogView::default();
    }

    let mut entries = Vec::with_capacity(state.options.len() + 1);
    if state.show_back {
        entries.push(EntryView {
            kind: EntryKind::Back,
            label: BACK_LABEL.to_string(),
            description: None,
            icon: None,
            disabled: false,
            target: Some(ClickTarget::Action(BACK_ACTION.to_string())),
        });
    }
    for (index, option) in state.options.iter().enumerate() {
        entries.push(EntryView {
            kind: EntryKind::Option { index },
            label: sanitize_inline(&option.label),
            description: option.description.as_deref().map(sanitize_inline),
            icon: option.icon.as_deref().map(sanitize_inline),
            disabled: option.disabled,
            target: (!option.disabled).then_some(ClickTarget::Option(index)),
        });
    }

    DialogView {
        visible: true,
        speaker: sanitize_inline(&state.speaker),
        body: sanitize_for_tui(&state.body_text),
        entries,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressView {
    pub visible: bool,
    pub label: String,
    /// `0.0..=1.0`
    pub fill: f64,
    pub animating: bool,
}

pub fn render_progress(state: &ProgressState, now: Instant) -> ProgressView {
    if !state.running() {
        return ProgressView {
            visible: false,
            label: String::new(),
            fill: 0.0,
            animating: false,
        };
    }
    ProgressView {
        visible: true,
        label: sanitize_inline(&state.label),
        fill: state.fill_ratio(now),
        animating: state.is_animating(),
    }
}
