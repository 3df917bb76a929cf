pub(crate) mod model;
pub(crate) mod ui;

pub(crate) use model::{
    render_dialog, render_progress, ClickTarget, DialogView, EntryKind, EntryView, ProgressView,
};
pub(crate) use ui::draw_ui;
