use crate::app::view::EntryKind;
use ratatui::style::{Color, Modifier, Style};

use super::constants::DIALOG_BG;

pub(super) fn dialog_style() -> Style {
    Style::default().fg(Color::White).bg(DIALOG_BG)
}

pub(super) fn speaker_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

pub(super) fn entry_style(kind: EntryKind, disabled: bool, focused: bool) -> Style {
    let mut style = match kind {
        EntryKind::Back => Style::default().fg(Color::Cyan),
        EntryKind::Option { .. } => Style::default().fg(Color::White),
    };
    if disabled {
        style = style.fg(Color::DarkGray).add_modifier(Modifier::DIM);
    }
    if focused {
        style = style.add_modifier(Modifier::BOLD);
    }
    style
}

pub(super) fn description_style() -> Style {
    Style::default().fg(Color::Gray).add_modifier(Modifier::DIM)
}

pub(super) fn progress_style(animating: bool) -> Style {
    if animating {
        Style::default().fg(Color::Cyan).bg(Color::Black)
    } else {
        Style::default().fg(Color::DarkGray).bg(Color::Black)
    }
}
