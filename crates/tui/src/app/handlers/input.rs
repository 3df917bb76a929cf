use crate::app::runtime::HostBridge;
use crate::app::DialogController;
use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use tracing::debug;

/// Keyboard handling while the controller owns the screen. Returns whether
/// the key changed anything worth redrawing.
pub fn handle_dialog_key<B: HostBridge>(
    controller: &mut DialogController<B>,
    key: KeyCode,
    modifiers: KeyModifiers,
) -> bool {
    // Esc goes straight to the transition step; it decides whether a dialog is active.
    if key == KeyCode::Esc {
        controller.cancel();
        return true;
    }
    if controller.current_dialog().is_none() {
        return false;
    }
    if modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return false;
    }

    match key {
        KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => {
            controller.move_focus(-1);
            true
        }
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => {
            controller.move_focus(1);
            true
        }
        KeyCode::Home => {
            controller.move_focus(isize::MIN);
            true
        }
        KeyCode::End => {
            controller.move_focus(isize::MAX);
            true
        }
        KeyCode::Enter | KeyCode::Char(' ') => activate_entry(controller, None),
        KeyCode::Char('b') | KeyCode::Backspace => {
            let entry = controller.dialog_view().back_entry();
            entry.is_some() && activate_entry(controller, entry)
        }
        KeyCode::Char(digit @ '1'..='9') => {
            let index = digit as usize - '1' as usize;
            let entry = controller.dialog_view().entry_for_option(index);
            entry.is_some() && activate_entry(controller, entry)
        }
        _ => false,
    }
}

/// Activates `entry`, or the focused entry when `None`.
fn activate_entry<B: HostBridge>(
    controller: &mut DialogController<B>,
    entry: Option<usize>,
) -> bool {
    let view = controller.dialog_view();
    let entry = entry.unwrap_or(controller.render_state.focused);
    let Some(target) = view.target(entry).cloned() else {
        debug!(entry, "entry has no target");
        return false;
    };
    controller.render_state.focused = entry;
    controller.activate(&target);
    true
}

pub fn handle_mouse<B: HostBridge>(
    controller: &mut DialogController<B>,
    event: MouseEvent,
) -> bool {
    match event.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let Some(region) = controller.render_state.region_at(event.column, event.row) else {
                return false;
            };
            let entry = region.entry;
            activate_entry(controller, Some(entry))
        }
        MouseEventKind::ScrollUp => {
            controller.move_focus(-1);
            true
        }
        MouseEventKind::ScrollDown => {
            controller.move_focus(1);
            true
        }
        _ => false,
    }
}
