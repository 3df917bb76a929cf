pub(crate) mod handlers;
pub(crate) mod runtime;
pub(crate) mod state;
pub(crate) mod timer;
pub(crate) mod transition;
pub(crate) mod util;
pub(crate) mod view;

#[cfg(test)]
pub(crate) mod test_support;

use crate::app::runtime::{
    Endpoint, HostBridge, HostCommand, HostResponse, PostRequest, SelectionReport,
    SELECT_OPTION_PATH,
};
use crate::app::state::{ControllerState, DialogId, DialogState, ProgressState, RenderState};
use crate::app::timer::ProgressTimer;
use crate::app::transition::{transition, Effect, Event};
use crate::app::view::{render_dialog, render_progress, ClickTarget, DialogView, ProgressView};
use crate::error::BridgeError;
use serde_json::Value;
use std::collections::VecDeque;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Reports kept for matching host answers; the host may never answer.
const MAX_PENDING_REPORTS: usize = 64;

/// Owns the single dialog/progress instance and everything that reacts to it.
pub struct DialogController<B: HostBridge> {
    state: ControllerState,
    pub render_state: RenderState,
    timer: ProgressTimer,
    bridge: B,
    endpoint: Endpoint,
    pending_reports: VecDeque<(String, SelectionReport)>,
    needs_redraw: bool,
}

impl<B: HostBridge> DialogController<B> {
    pub fn new(bridge: B, endpoint: Endpoint) -> Self {
        Self {
            state: ControllerState::default(),
            render_state: RenderState::default(),
            timer: ProgressTimer::default(),
            bridge,
            endpoint,
            pending_reports: VecDeque::new(),
            needs_redraw: true,
        }
    }

    /// The dialog on screen, if any.
    pub fn current_dialog(&self) -> Option<&DialogState> {
        self.state.dialog.visible.then_some(&self.state.dialog)
    }

    pub fn active_dialog_id(&self) -> Option<&DialogId> {
        self.state.dialog.dialog_id.as_ref()
    }

    pub fn progress(&self) -> &ProgressState {
        &self.state.progress
    }

    pub fn dialog_view(&self) -> DialogView {
        render_dialog(&self.state.dialog)
    }

    pub fn progress_view(&self, now: Instant) -> ProgressView {
        render_progress(&self.state.progress, now)
    }

    /// The fill bar needs a repaint every tick while it moves.
    pub fn is_animating(&self) -> bool {
        self.state.progress.is_animating()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    pub fn request_redraw(&mut self) {
        self.needs_redraw = true;
    }

    pub fn handle_command(&mut self, command: HostCommand, now: Instant) {
        debug!(action = command.name(), "host command");
        self.dispatch(Event::Host(command), now);
    }

    pub fn select_option(&mut self, index: i64) {
        self.dispatch(Event::SelectOption(index), Instant::now());
    }

    pub fn select_action(&mut self, action: &str) {
        self.dispatch(Event::SelectAction(action.to_string()), Instant::now());
    }

    /// Cancel key: dismisses the active dialog and reports index -1.
    pub fn cancel(&mut self) {
        self.dispatch(Event::CancelKey, Instant::now());
    }

    pub fn activate(&mut self, target: &ClickTarget) {
        match target {
            ClickTarget::Option(index) => match i64::try_from(*index) {
                Ok(index) => self.select_option(index),
                Err(_) => warn!(index, "option index out of range"),
            },
            ClickTarget::Action(action) => self.select_action(action),
        }
    }

    pub fn fire_due_timers(&mut self, now: Instant) {
        while let Some(armed) = self.timer.take_due(now) {
            self.dispatch(
                Event::TimerFired {
                    generation: armed.generation,
                    tick: armed.tick,
                },
                now,
            );
        }
    }

    pub fn move_focus(&mut self, delta: isize) {
        let count = self.dialog_view().entries.len();
        if count == 0 {
            return;
        }
        let current = self.render_state.focused.min(count - 1);
        let next = current.saturating_add_signed(delta).min(count - 1);
        if next != self.render_state.focused {
            self.render_state.focused = next;
            self.needs_redraw = true;
        }
    }

    pub fn handle_response(&mut self, response: HostResponse) {
        let report = self
            .pending_reports
            .iter()
            .position(|(request_id, _)| *request_id == response.id)
            .and_then(|slot| self.pending_reports.remove(slot))
            .map(|(_, report)| report);
        if report.is_none() {
            debug!(request_id = %response.id, "response for unknown request");
        }
        if let Some(error) = response.error {
            error!(
                request_id = %response.id,
                report = ?report,
                error = %response_text(&error),
                "error selecting option"
            );
            return;
        }
        let body = response
            .result
            .as_ref()
            .map(response_text)
            .unwrap_or_default();
        info!(request_id = %response.id, body = %body, "option selected response");
    }

    fn dispatch(&mut self, event: Event, now: Instant) {
        let effects = transition(&mut self.state, event, now);
        for effect in effects {
            self.apply(effect);
        }
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::DialogChanged => {
                self.render_state.reset_focus();
                self.needs_redraw = true;
            }
            Effect::ProgressChanged => self.needs_redraw = true,
            Effect::SendReport(report) => self.send_report(report),
            Effect::ArmTimer {
                generation,
                tick,
                deadline,
            } => self.timer.arm(generation, tick, deadline),
            Effect::CancelTimer => self.timer.cancel(),
        }
    }

    fn post_report(&mut self, report: &SelectionReport) -> Result<String, BridgeError> {
        let request = PostRequest {
            url: self.endpoint.url(SELECT_OPTION_PATH),
            path: SELECT_OPTION_PATH.to_string(),
            body: serde_json::to_value(report)?,
        };
        self.bridge.post(&request)
    }

    fn send_report(&mut self, report: SelectionReport) {
        match self.post_report(&report) {
            Ok(request_id) => {
                debug!(request_id = %request_id, report = ?report, "selection report sent");
                if self.pending_reports.len() == MAX_PENDING_REPORTS {
                    self.pending_reports.pop_front();
                }
                self.pending_reports.push_back((request_id, report));
            }
            // The dialog keeps whatever state it already moved to.
            Err(error) => error!(%error, report = ?report, "error selecting option"),
        }
    }

    #[cfg(test)]
    pub(crate) fn bridge(&self) -> &B {
        &self.bridge
    }

    #[cfg(test)]
    pub(crate) fn timer(&self) -> &ProgressTimer {
        &self.timer
    }
}

fn response_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
