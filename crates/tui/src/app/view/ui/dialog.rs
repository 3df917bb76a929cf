use crate::app::state::{HitRegion, RenderState};
use crate::app::util::text::wrap_line;
use crate::app::view::{DialogView, EntryKind, EntryView};
use ratatui::layout::Rect;
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;
use std::ops::Range;

use super::constants::{BLANK_MARKER, DIALOG_MAX_WIDTH, DIALOG_PADDING_X, FOCUS_MARKER};
use super::style::{description_style, dialog_style, entry_style, speaker_style};
use super::text::{truncate_to_width, visual_width};

struct EntryRow {
    line: Line<'static>,
    entry: usize,
}

fn entry_prefix(entry: &EntryView) -> String {
    match entry.kind {
        EntryKind::Back => "← ".to_string(),
        EntryKind::Option { index } => format!("{}. ", index + 1),
    }
}

fn build_entry_rows(view: &DialogView, focused: usize, width: usize) -> Vec<EntryRow> {
    let mut rows = Vec::new();
    for (position, entry) in view.entries.iter().enumerate() {
        let is_focused = position == focused;
        let marker = if is_focused { FOCUS_MARKER } else { BLANK_MARKER };
        let prefix = entry_prefix(entry);
        let icon = entry
            .icon
            .as_ref()
            .map(|icon| format!("[{icon}] "))
            .unwrap_or_default();
        let suffix = if entry.disabled { " (unavailable)" } else { "" };
        let text = truncate_to_width(
            &format!("{marker}{prefix}{icon}{}{suffix}", entry.label),
            width,
        );
        rows.push(EntryRow {
            line: Line::from(Span::styled(
                text,
                entry_style(entry.kind, entry.disabled, is_focused),
            )),
            entry: position,
        });
        if let Some(description) = entry.description.as_ref() {
            let indent = " ".repeat(visual_width(marker) + visual_width(&prefix));
            rows.push(EntryRow {
                line: Line::from(Span::styled(
                    truncate_to_width(&format!("{indent}{description}"), width),
                    description_style(),
                )),
                entry: position,
            });
        }
    }
    rows
}

/// Picks which entry rows fit, keeping every row of the focused entry visible.
fn visible_window(rows: &[EntryRow], focused: usize, capacity: usize) -> Range<usize> {
    let total = rows.len();
    if total <= capacity {
        return 0..total;
    }
    if capacity == 0 {
        return 0..0;
    }
    let focus_start = rows
        .iter()
        .position(|row| row.entry == focused)
        .unwrap_or(0);
    let focus_end = rows
        .iter()
        .rposition(|row| row.entry == focused)
        .map_or(focus_start + 1, |last| last + 1);
    let start = focus_end.saturating_sub(capacity).min(focus_start);
    start..start + capacity
}

pub(super) fn render_dialog_box(
    f: &mut Frame,
    area: Rect,
    view: &DialogView,
    render_state: &mut RenderState,
) {
    let width = area.width.min(DIALOG_MAX_WIDTH);
    if width < 4 || area.height < 3 {
        return;
    }
    let content_width = width
        .saturating_sub(2 + DIALOG_PADDING_X.saturating_mul(2))
        .max(1) as usize;
    let focused = render_state
        .focused
        .min(view.entries.len().saturating_sub(1));

    let body_lines: Vec<String> = if view.body.is_empty() {
        Vec::new()
    } else {
        view.body
            .split('\n')
            .flat_map(|line| wrap_line(line, content_width))
            .collect()
    };
    let entry_rows = build_entry_rows(view, focused, content_width);

    // Entries win over body text when the terminal is short.
    let wanted_gap = usize::from(!body_lines.is_empty() && !entry_rows.is_empty());
    let max_inner = area.height.saturating_sub(2) as usize;
    let inner_height = (body_lines.len() + wanted_gap + entry_rows.len()).clamp(1, max_inner);
    let entry_capacity = entry_rows.len().min(inner_height);
    let remaining = inner_height - entry_capacity;
    let gap = wanted_gap.min(remaining);
    let body_capacity = (remaining - gap).min(body_lines.len());

    let height = inner_height as u16 + 2;
    let rect = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + area.height.saturating_sub(height),
        width,
        height,
    };
    f.render_widget(Clear, rect);

    let mut block = Block::default()
        .borders(Borders::ALL)
        .style(dialog_style());
    if !view.speaker.is_empty() {
        block = block.title(Span::styled(
            format!(" {} ", truncate_to_width(&view.speaker, content_width)),
            speaker_style(),
        ));
    }
    let bordered = block.inner(rect);
    f.render_widget(block, rect);
    let inner = Rect {
        x: bordered.x + DIALOG_PADDING_X,
        width: bordered
            .width
            .saturating_sub(DIALOG_PADDING_X.saturating_mul(2)),
        ..bordered
    };

    let window = visible_window(&entry_rows, focused, entry_capacity);
    let mut lines: Vec<Line> = body_lines
        .into_iter()
        .take(body_capacity)
        .map(Line::from)
        .collect();
    if gap > 0 {
        lines.push(Line::default());
    }
    let entries_top = inner.y + lines.len() as u16;
    let window_len = window.len();
    for (offset, row) in entry_rows
        .into_iter()
        .skip(window.start)
        .take(window_len)
        .enumerate()
    {
        if let Some(target) = view.target(row.entry) {
            render_state.hit_regions.push(HitRegion {
                area: Rect {
                    x: inner.x,
                    y: entries_top + offset as u16,
                    width: inner.width,
                    height: 1,
                },
                entry: row.entry,
                target: target.clone(),
            });
        }
        lines.push(row.line);
    }
    f.render_widget(Paragraph::new(Text::from(lines)), inner);
}
