//! The passive views around the sheet: the dimming overlay and the drag handle.

use std::cell::Cell;

use semimodal_core::*;

use crate::SemiModalConfig;

/// Full-container dimming layer behind the sheet.
pub struct OverlayView {
    view: ViewId,
    active: Cell<bool>,
    active_alpha: f32,
}

impl OverlayView {
    /// Creates the overlay detached and inactive.
    pub fn new(tree: &mut ViewTree, config: &SemiModalConfig) -> Self {
        let view = tree.create(ViewKind::Plain);
        if let Some(node) = tree.get_mut(view) {
            node.background = Color::BLACK;
            node.alpha = 0.0;
        }
        Self {
            view,
            active: Cell::new(false),
            active_alpha: config.overlay_alpha,
        }
    }

    pub fn view(&self) -> ViewId {
        self.view
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    pub fn alpha_for(&self, active: bool) -> f32 {
        if active { self.active_alpha } else { 0.0 }
    }

    pub fn set_active(&self, tree: &mut ViewTree, active: bool) {
        self.active.set(active);
        if let Err(e) = tree.set_alpha(self.view, self.alpha_for(active)) {
            log::warn!("overlay activation skipped: {e}");
        }
    }
}

/// Drag handle shown above the sheet's top edge.
pub struct IndicatorView {
    view: ViewId,
    size: Size,
}

impl IndicatorView {
    pub fn new(tree: &mut ViewTree, config: &SemiModalConfig) -> Self {
        let size = config.indicator_size();
        let view = tree.create_with_frame(ViewKind::Plain, Rect::from_size(size));
        if let Some(node) = tree.get_mut(view) {
            node.background = Color::LIGHT_GRAY;
            node.corner_radius = config.indicator_corner_radius;
            node.clips_to_bounds = true;
        }
        Self { view, size }
    }

    pub fn view(&self) -> ViewId {
        self.view
    }

    pub fn size(&self) -> Size {
        self.size
    }
}
