use crate::app::view::ClickTarget;
use ratatui::layout::{Position, Rect};

/// A clickable rectangle recorded by the last draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitRegion {
    pub area: Rect,
    pub entry: usize,
    pub target: ClickTarget,
}

/// View-layer bookkeeping that never feeds back into dialog state.
#[derive(Debug, Default)]
pub struct RenderState {
    pub focused: usize,
    pub hit_regions: Vec<HitRegion>,
}

impl RenderState {
    /// Forgets focus and the last frame's regions; they belong to the old dialog.
    pub fn reset_focus(&mut self) {
        self.focused = 0;
        self.hit_regions.clear();
    }

    pub fn region_at(&self, column: u16, row: u16) -> Option<&HitRegion> {
        let position = Position { x: column, y: row };
        self.hit_regions
            .iter()
            .find(|region| region.area.contains(position))
    }
}
