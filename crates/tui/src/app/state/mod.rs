pub(crate) mod dialog;
pub(crate) mod progress;
pub(crate) mod render;

pub(crate) use dialog::{DialogId, DialogOption, DialogState};
pub(crate) use progress::{
    ProgressPhase, ProgressState, ProgressTick, DEFAULT_PROGRESS_DURATION, DEFAULT_PROGRESS_LABEL,
    PROGRESS_BASELINE_DELAY, PROGRESS_GRACE,
};
pub(crate) use render::{HitRegion, RenderState};

/// Everything the controller owns that the transition step may change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControllerState {
    pub dialog: DialogState,
    pub progress: ProgressState,
}
