use ratatui::style::Color;

pub(super) const DIALOG_MAX_WIDTH: u16 = 72;
pub(super) const DIALOG_PADDING_X: u16 = 1;
pub(super) const DIALOG_BG: Color = Color::Rgb(28, 28, 32);
pub(super) const PROGRESS_MAX_WIDTH: u16 = 44;
pub(super) const PROGRESS_HEIGHT: u16 = 3;
pub(super) const FOCUS_MARKER: &str = "> ";
pub(super) const BLANK_MARKER: &str = "  ";
