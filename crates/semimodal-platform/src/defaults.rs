//! What the host uses when a screen has no custom presentation.

use std::time::Duration;

use semimodal_core::animation::AnimationSpec;
use semimodal_core::*;

use crate::log_err;

/// Presented view fills the container.
pub struct FullScreenPresentation;

impl PresentationController for FullScreenPresentation {
    fn frame_of_presented_view(&self, tree: &ViewTree, container: ViewId) -> Rect {
        tree.bounds(container).unwrap_or(Rect::ZERO)
    }

    fn container_will_layout_subviews(&self, tree: &mut ViewTree, container: ViewId) {
        let frame = self.frame_of_presented_view(tree, container);
        for child in tree.subviews(container).to_vec() {
            log_err("full-screen layout", tree.set_frame(child, frame));
        }
    }
}

/// Slides the from-view off the bottom of the screen.
pub struct SlideDownAnimator;

impl AnimatedTransitioning for SlideDownAnimator {
    fn transition_duration(&self, _ctx: &TransitionContext) -> Duration {
        AnimationSpec::default().duration
    }

    fn animate_transition(&self, ctx: &TransitionContext, animator: &mut dyn ViewAnimator) {
        let spec = AnimationSpec {
            duration: self.transition_duration(ctx),
            ..AnimationSpec::default()
        };
        let changes = {
            let ctx = ctx.clone();
            move |tree: &mut ViewTree| {
                if let Some(from) = ctx.view(TransitionViewKey::From) {
                    if let Some(frame) = tree.frame(from) {
                        let offscreen = Rect {
                            y: ctx.screen_bounds().max_y(),
                            ..frame
                        };
                        log_err("slide down", tree.set_frame(from, offscreen));
                    }
                }
            }
        };
        let ctx = ctx.clone();
        animator.animate(
            spec,
            Box::new(changes),
            Box::new(move |_| ctx.complete_transition(!ctx.transition_was_cancelled())),
        );
    }
}
