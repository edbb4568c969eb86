use std::time::Duration;

use semimodal_core::animation::{AnimationSpec, Easing};
use semimodal_core::*;

/// Slides the sheet down until its top edge meets the bottom of the screen.
pub struct DismissAnimator {
    duration: Duration,
}

impl DismissAnimator {
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }
}

impl Default for DismissAnimator {
    fn default() -> Self {
        Self::new(Duration::from_millis(400))
    }
}

impl AnimatedTransitioning for DismissAnimator {
    fn transition_duration(&self, _ctx: &TransitionContext) -> Duration {
        self.duration
    }

    fn animate_transition(&self, ctx: &TransitionContext, animator: &mut dyn ViewAnimator) {
        let spec = AnimationSpec::tween(self.transition_duration(ctx), Easing::EaseInOut);
        let changes = {
            let ctx = ctx.clone();
            move |tree: &mut ViewTree| {
                let Some(from) = ctx.view(TransitionViewKey::From) else {
                    log::debug!("dismissal without a from-view; nothing to slide");
                    return;
                };
                let Some(bounds) = tree.bounds(from) else {
                    return;
                };
                let center_y = ctx.screen_bounds().h + bounds.h / 2.0;
                if let Err(e) = tree.set_center_y(from, center_y) {
                    log::warn!("dismiss slide skipped: {e}");
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
