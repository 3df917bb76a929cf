mod constants;
mod dialog;
mod progress;
mod style;
mod text;

use crate::app::state::RenderState;
use crate::app::view::{DialogView, ProgressView};
use ratatui::widgets::Clear;
use ratatui::Frame;

use self::dialog::render_dialog_box;
use self::progress::render_progress_overlay;

/// Paints one frame and records the clickable regions it produced.
pub fn draw_ui(
    f: &mut Frame,
    dialog: &DialogView,
    progress: &ProgressView,
    render_state: &mut RenderState,
) {
    render_state.hit_regions.clear();

    let size = f.area();
    if size.width == 0 || size.height == 0 {
        return;
    }
    f.render_widget(Clear, size);

    if dialog.visible {
        render_dialog_box(f, size, dialog, render_state);
    }
    if progress.visible {
        if let Some(covered) = render_progress_overlay(f, size, progress) {
            // Rows hidden under the gauge must not stay clickable.
            render_state
                .hit_regions
                .retain(|region| !region.area.intersects(covered));
        }
    }
}
