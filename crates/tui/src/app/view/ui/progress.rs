use crate::app::view::ProgressView;
use ratatui::layout::Rect;
use ratatui::widgets::{Block, Borders, Clear, Gauge};
use ratatui::Frame;

use super::constants::{PROGRESS_HEIGHT, PROGRESS_MAX_WIDTH};
use super::style::progress_style;
use super::text::truncate_to_width;

/// Draws the gauge and returns the area it covers.
pub(super) fn render_progress_overlay(
    f: &mut Frame,
    area: Rect,
    view: &ProgressView,
) -> Option<Rect> {
    let width = area.width.min(PROGRESS_MAX_WIDTH);
    let height = area.height.min(PROGRESS_HEIGHT);
    if width < 4 || height == 0 {
        return None;
    }
    let rect = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y,
        width,
        height,
    };
    f.render_widget(Clear, rect);

    let title = truncate_to_width(&view.label, width.saturating_sub(4) as usize);
    let fill = view.fill.clamp(0.0, 1.0);
    let percent = (fill * 100.0).round() as u16;
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {title} ")),
        )
        .gauge_style(progress_style(view.animating))
        .ratio(fill)
        .label(format!("{percent}%"));
    f.render_widget(gauge, rect);
    Some(rect)
}
