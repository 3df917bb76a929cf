//! Pure dialog/progress state transitions.
//!
//! [`transition`] mutates [`ControllerState`] and describes every side effect
//! as an [`Effect`]; it never touches the view, the timer or the host.

use crate::app::runtime::{
    HostCommand, ProgressStartRequest, SelectionReport, ShowDialogRequest, BACK_ACTION,
    CANCEL_INDEX,
};
use crate::app::state::{
    ControllerState, DialogState, ProgressPhase, ProgressState, ProgressTick,
    PROGRESS_BASELINE_DELAY,
};
use std::time::Instant;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Host(HostCommand),
    SelectOption(i64),
    SelectAction(String),
    CancelKey,
    TimerFired { generation: u64, tick: ProgressTick },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    DialogChanged,
    ProgressChanged,
    SendReport(SelectionReport),
    ArmTimer {
        generation: u64,
        tick: ProgressTick,
        deadline: Instant,
    },
    CancelTimer,
}

pub fn transition(state: &mut ControllerState, event: Event, now: Instant) -> Vec<Effect> {
    match event {
        Event::Host(command) => apply_host_command(state, command, now),
        Event::SelectOption(index) => select_option(state, index),
        Event::SelectAction(action) => select_action(state, action),
        Event::CancelKey => {
            if state.dialog.dialog_id.is_none() {
                return Vec::new();
            }
            select_option(state, CANCEL_INDEX)
        }
        Event::TimerFired { generation, tick } => {
            fire_progress_timer(state, generation, tick, now)
        }
    }
}

fn apply_host_command(
    state: &mut ControllerState,
    command: HostCommand,
    now: Instant,
) -> Vec<Effect> {
    match command {
        HostCommand::ShowDialog(request) => show_dialog(state, request),
        HostCommand::CloseDialog => hide_dialog(state),
        HostCommand::ProgressStart(request) => start_progress(state, request, now),
        HostCommand::ProgressEnd => end_progress(state),
    }
}

fn show_dialog(state: &mut ControllerState, request: ShowDialogRequest) -> Vec<Effect> {
    // An omitted id keeps the previous one so multi-step dialogs can reuse it.
    let dialog_id = request.id.or_else(|| state.dialog.dialog_id.take());
    state.dialog = DialogState {
        dialog_id,
        speaker: request.speaker,
        body_text: request.text,
        options: request.options,
        show_back: request.show_back,
        visible: true,
    };
    info!(
        dialog_id = ?state.dialog.dialog_id.as_ref().map(ToString::to_string),
        speaker = %state.dialog.speaker,
        options = state.dialog.options.len(),
        show_back = state.dialog.show_back,
        "dialog shown"
    );
    vec![Effect::DialogChanged]
}

fn hide_dialog(state: &mut ControllerState) -> Vec<Effect> {
    if state.dialog == DialogState::default() {
        debug!("close requested with no active dialog");
        return Vec::new();
    }
    state.dialog.clear();
    info!("dialog hidden");
    vec![Effect::DialogChanged]
}

fn select_option(state: &mut ControllerState, index: i64) -> Vec<Effect> {
    if index == CANCEL_INDEX {
        let dialog_id = state.dialog.dialog_id.clone();
        let mut effects = hide_dialog(state);
        effects.push(Effect::SendReport(SelectionReport::index(index, dialog_id)));
        return effects;
    }

    let selectable = usize::try_from(index).is_ok_and(|slot| state.dialog.is_selectable(slot));
    if !selectable {
        warn!(index, "ignoring selection of unavailable option");
        return Vec::new();
    }
    vec![Effect::SendReport(SelectionReport::index(
        index,
        state.dialog.dialog_id.clone(),
    ))]
}

fn select_action(state: &mut ControllerState, action: String) -> Vec<Effect> {
    let available = state.dialog.visible && (action != BACK_ACTION || state.dialog.show_back);
    if !available {
        warn!(action = %action, "ignoring unavailable dialog action");
        return Vec::new();
    }
    vec![Effect::SendReport(SelectionReport::action(
        action,
        state.dialog.dialog_id.clone(),
    ))]
}

fn start_progress(
    state: &mut ControllerState,
    request: ProgressStartRequest,
    now: Instant,
) -> Vec<Effect> {
    if state.progress.running() {
        debug!("restarting progress; previous cycle cancelled");
    }
    let generation = state.progress.generation.wrapping_add(1);
    state.progress = ProgressState {
        label: request.label,
        duration: request.duration,
        phase: ProgressPhase::Baseline { started_at: now },
        generation,
    };
    info!(
        label = %state.progress.label,
        duration_ms = state.progress.duration.as_millis() as u64,
        "progress started"
    );
    vec![
        Effect::CancelTimer,
        Effect::ArmTimer {
            generation,
            tick: ProgressTick::BeginFill,
            deadline: now + PROGRESS_BASELINE_DELAY,
        },
        Effect::ProgressChanged,
    ]
}

fn end_progress(state: &mut ControllerState) -> Vec<Effect> {
    let was_running = state.progress.running();
    state.progress = ProgressState {
        generation: state.progress.generation.wrapping_add(1),
        ..ProgressState::default()
    };
    if was_running {
        info!("progress ended");
    }
    vec![Effect::CancelTimer, Effect::ProgressChanged]
}

fn fire_progress_timer(
    state: &mut ControllerState,
    generation: u64,
    tick: ProgressTick,
    now: Instant,
) -> Vec<Effect> {
    if generation != state.progress.generation || !state.progress.running() {
        debug!(generation, ?tick, "dropping stale progress timer");
        return Vec::new();
    }
    match (tick, state.progress.phase) {
        (ProgressTick::BeginFill, ProgressPhase::Baseline { started_at }) => {
            state.progress.phase = ProgressPhase::Filling {
                started_at,
                fill_started_at: now,
            };
            let deadline = state.progress.auto_end_at().unwrap_or(now);
            vec![
                Effect::ArmTimer {
                    generation,
                    tick: ProgressTick::AutoEnd,
                    deadline,
                },
                Effect::ProgressChanged,
            ]
        }
        (ProgressTick::AutoEnd, _) => end_progress(state),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::{DialogId, DialogOption, DEFAULT_PROGRESS_LABEL, PROGRESS_GRACE};
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn show(id: Option<&str>, options: &[&str]) -> Event {
        Event::Host(HostCommand::ShowDialog(ShowDialogRequest {
            id: id.map(DialogId::from),
            speaker: "Bob".to_string(),
            text: "Hello".to_string(),
            options: options.iter().map(|label| DialogOption::new(*label)).collect(),
            show_back: false,
        }))
    }

    fn progress_start(label: &str, ms: u64) -> Event {
        Event::Host(HostCommand::ProgressStart(ProgressStartRequest {
            label: label.to_string(),
            duration: Duration::from_millis(ms),
        }))
    }

    #[test]
    fn show_replaces_previous_dialog_without_merging() {
        let now = Instant::now();
        let mut state = ControllerState::default();
        transition(&mut state, show(Some("d1"), &["Yes", "No", "Maybe"]), now);
        let effects = transition(&mut state, show(Some("d2"), &["Ok"]), now);

        assert_eq!(effects, vec![Effect::DialogChanged]);
        assert_eq!(state.dialog.dialog_id, Some(DialogId::from("d2")));
        assert_eq!(state.dialog.options, vec![DialogOption::new("Ok")]);
        assert!(state.dialog.visible);
    }

    #[test]
    fn show_without_id_keeps_previous_id() {
        let now = Instant::now();
        let mut state = ControllerState::default();
        transition(&mut state, show(Some("d1"), &["Next"]), now);
        transition(&mut state, show(None, &["Done"]), now);
        assert_eq!(state.dialog.dialog_id, Some(DialogId::from("d1")));
    }

    #[test]
    fn selecting_an_option_reports_index_and_keeps_dialog_visible() {
        let now = Instant::now();
        let mut state = ControllerState::default();
        transition(&mut state, show(Some("d1"), &["Yes", "No"]), now);

        let effects = transition(&mut state, Event::SelectOption(1), now);
        assert_eq!(
            effects,
            vec![Effect::SendReport(SelectionReport::index(
                1,
                Some(DialogId::from("d1"))
            ))]
        );
        assert!(state.dialog.visible);
    }

    #[test]
    fn cancel_hides_before_reporting_with_captured_id() {
        let now = Instant::now();
        let mut state = ControllerState::default();
        transition(&mut state, show(Some("d1"), &["Yes"]), now);

        let effects = transition(&mut state, Event::SelectOption(CANCEL_INDEX), now);
        assert_eq!(
            effects,
            vec![
                Effect::DialogChanged,
                Effect::SendReport(SelectionReport::index(-1, Some(DialogId::from("d1")))),
            ]
        );
        assert_eq!(state.dialog, DialogState::default());
    }

    #[test]
    fn cancel_key_is_ignored_without_an_active_dialog() {
        let now = Instant::now();
        let mut state = ControllerState::default();
        assert!(transition(&mut state, Event::CancelKey, now).is_empty());

        transition(&mut state, show(None, &["Yes"]), now);
        assert!(transition(&mut state, Event::CancelKey, now).is_empty());
        assert!(state.dialog.visible);
    }

    #[test]
    fn selections_after_hide_never_carry_the_old_id() {
        let now = Instant::now();
        let mut state = ControllerState::default();
        transition(&mut state, show(Some("d1"), &["Yes"]), now);
        transition(&mut state, Event::Host(HostCommand::CloseDialog), now);

        assert!(transition(&mut state, Event::SelectOption(0), now).is_empty());
        let back = Event::SelectAction(BACK_ACTION.to_string());
        assert!(transition(&mut state, back, now).is_empty());
        let effects = transition(&mut state, Event::SelectOption(CANCEL_INDEX), now);
        assert_eq!(
            effects,
            vec![Effect::SendReport(SelectionReport::index(-1, None))]
        );
    }

    #[test]
    fn disabled_and_unknown_indices_produce_no_report() {
        let now = Instant::now();
        let mut state = ControllerState::default();
        transition(&mut state, show(Some("d1"), &["Yes", "No"]), now);
        state.dialog.options[1].disabled = true;

        assert!(transition(&mut state, Event::SelectOption(1), now).is_empty());
        assert!(transition(&mut state, Event::SelectOption(2), now).is_empty());
        assert!(transition(&mut state, Event::SelectOption(-7), now).is_empty());
    }

    #[test]
    fn back_action_requires_show_back() {
        let now = Instant::now();
        let mut state = ControllerState::default();
        transition(&mut state, show(Some("d1"), &["Yes"]), now);
        let back = Event::SelectAction(BACK_ACTION.to_string());
        assert!(transition(&mut state, back.clone(), now).is_empty());

        state.dialog.show_back = true;
        assert_eq!(
            transition(&mut state, back, now),
            vec![Effect::SendReport(SelectionReport::action(
                BACK_ACTION,
                Some(DialogId::from("d1"))
            ))]
        );
    }

    #[test]
    fn close_without_dialog_is_a_no_op() {
        let mut state = ControllerState::default();
        let close = Event::Host(HostCommand::CloseDialog);
        let effects = transition(&mut state, close, Instant::now());
        assert!(effects.is_empty());
        assert_eq!(state, ControllerState::default());
    }

    #[test]
    fn progress_runs_baseline_then_fill_then_auto_end() {
        let now = Instant::now();
        let mut state = ControllerState::default();
        let effects = transition(&mut state, progress_start("Loading", 500), now);
        assert_eq!(
            effects,
            vec![
                Effect::CancelTimer,
                Effect::ArmTimer {
                    generation: 1,
                    tick: ProgressTick::BeginFill,
                    deadline: now + PROGRESS_BASELINE_DELAY,
                },
                Effect::ProgressChanged,
            ]
        );

        let fill_at = now + PROGRESS_BASELINE_DELAY;
        let effects = transition(
            &mut state,
            Event::TimerFired {
                generation: 1,
                tick: ProgressTick::BeginFill,
            },
            fill_at,
        );
        assert_eq!(
            effects,
            vec![
                Effect::ArmTimer {
                    generation: 1,
                    tick: ProgressTick::AutoEnd,
                    deadline: now + Duration::from_millis(500) + PROGRESS_GRACE,
                },
                Effect::ProgressChanged,
            ]
        );
        assert!(state.progress.is_animating());

        let effects = transition(
            &mut state,
            Event::TimerFired {
                generation: 1,
                tick: ProgressTick::AutoEnd,
            },
            now + Duration::from_millis(550),
        );
        assert_eq!(effects, vec![Effect::CancelTimer, Effect::ProgressChanged]);
        assert!(!state.progress.running());
        assert_eq!(state.progress.fill_ratio(now + Duration::from_secs(1)), 0.0);
    }

    #[test]
    fn restarting_progress_invalidates_the_first_cycle() {
        let now = Instant::now();
        let mut state = ControllerState::default();
        transition(&mut state, progress_start("First", 500), now);
        transition(&mut state, progress_start("Second", 500), now);
        assert_eq!(state.progress.label, "Second");

        let stale = transition(
            &mut state,
            Event::TimerFired {
                generation: 1,
                tick: ProgressTick::AutoEnd,
            },
            now + Duration::from_secs(1),
        );
        assert!(stale.is_empty());
        assert!(state.progress.running());
    }

    #[test]
    fn explicit_end_resets_to_idle_defaults() {
        let now = Instant::now();
        let mut state = ControllerState::default();
        transition(&mut state, progress_start(DEFAULT_PROGRESS_LABEL, 1000), now);
        let effects = transition(&mut state, Event::Host(HostCommand::ProgressEnd), now);
        assert_eq!(effects, vec![Effect::CancelTimer, Effect::ProgressChanged]);
        assert_eq!(state.progress.phase, ProgressPhase::Idle);
        assert_eq!(state.progress.generation, 2);
        assert!(state.progress.label.is_empty());
    }
}
