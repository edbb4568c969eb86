use std::rc::{Rc, Weak};

use semimodal_core::*;

use crate::{IndicatorView, OverlayView, SemiModalConfig, SemiModalScreen};

fn log_err(what: &str, r: Result<(), ViewError>) {
    if let Err(e) = r {
        log::warn!("{what}: {e}");
    }
}

/// Lays out a bottom-anchored sheet over a dimming overlay and runs the overlay
/// alongside the presentation and dismissal animations.
pub struct PresentationLayoutController {
    presented: ViewId,
    screen: Option<Weak<dyn SemiModalScreen>>,
    overlay: Rc<OverlayView>,
    indicator: Rc<IndicatorView>,
    config: SemiModalConfig,
}

impl PresentationLayoutController {
    pub fn new(
        presented: ViewId,
        screen: Option<Weak<dyn SemiModalScreen>>,
        overlay: Rc<OverlayView>,
        indicator: Rc<IndicatorView>,
        config: &SemiModalConfig,
    ) -> Self {
        Self {
            presented,
            screen,
            overlay,
            indicator,
            config: config.clone(),
        }
    }

    /// Full width; height from the screen's sizing capability, else a fixed ratio
    /// of the parent. A self-sized height is used as is, even if taller than `parent`.
    pub fn size_for_child(&self, tree: &ViewTree, parent: Size) -> Size {
        let content_height = self
            .screen
            .as_ref()
            .and_then(Weak::upgrade)
            .and_then(|s| s.sizing().map(|z| z.semi_modal_content_height(tree)));
        match content_height {
            Some(h) => Size::new(parent.width, h),
            None => Size::new(parent.width, parent.height * self.config.default_height_ratio),
        }
    }
}

impl PresentationController for PresentationLayoutController {
    fn frame_of_presented_view(&self, tree: &ViewTree, container: ViewId) -> Rect {
        let Some(bounds) = tree.bounds(container) else {
            return Rect::ZERO;
        };
        let size = self.size_for_child(tree, bounds.size());
        Rect::new(
            bounds.w - size.width,
            bounds.h - size.height,
            size.width,
            size.height,
        )
    }

    fn container_will_layout_subviews(&self, tree: &mut ViewTree, container: ViewId) {
        let Some(bounds) = tree.bounds(container) else {
            log::warn!("layout skipped: container {container:?} is gone");
            return;
        };

        let overlay = self.overlay.view();
        log_err("overlay frame", tree.set_frame(overlay, bounds));
        log_err("overlay insert", tree.insert_subview(container, overlay, 0));

        let frame = self.frame_of_presented_view(tree, container);
        if let Some(node) = tree.get_mut(self.presented) {
            node.frame = frame;
            node.corner_radius = self.config.corner_radius;
            node.masked_corners = Corners::TOP;
        }

        let size = self.indicator.size();
        let indicator = self.indicator.view();
        log_err(
            "indicator frame",
            tree.set_frame(
                indicator,
                Rect::new(
                    (frame.w - size.width) / 2.0,
                    -self.config.indicator_offset,
                    size.width,
                    size.height,
                ),
            ),
        );
        log_err("indicator attach", tree.add_subview(self.presented, indicator));
    }

    fn presentation_transition_will_begin(&self, coordinator: &mut TransitionCoordinator) {
        let overlay = self.overlay.clone();
        coordinator.animate_alongside(move |tree| overlay.set_active(tree, true), None);
    }

    fn presentation_transition_did_end(&self, tree: &mut ViewTree, completed: bool) {
        if !completed {
            log_err("overlay removal", tree.remove_from_superview(self.overlay.view()));
        }
    }

    fn dismissal_transition_will_begin(&self, coordinator: &mut TransitionCoordinator) {
        let overlay = self.overlay.clone();
        let restore = self.overlay.clone();
        coordinator.animate_alongside(
            move |tree| overlay.set_active(tree, false),
            Some(Box::new(move |ctx: &TransitionContext, tree: &mut ViewTree| {
                if ctx.transition_was_cancelled() {
                    restore.set_active(tree, true);
                }
            })),
        );
    }

    fn dismissal_transition_did_end(&self, tree: &mut ViewTree, completed: bool) {
        if completed {
            log_err("overlay removal", tree.remove_from_superview(self.overlay.view()));
        }
    }
}
