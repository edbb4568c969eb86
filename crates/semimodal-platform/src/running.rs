use std::rc::Rc;

use semimodal_core::animation::{AnimatedValue, AnimationSpec, Easing, Interpolate};
use semimodal_core::*;
use web_time::Instant;

/// One view's animatable properties, before and after a transition's changes.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Tween {
    pub view: ViewId,
    pub from: Animatable,
    pub to: Animatable,
}

pub(crate) fn diff(before: &ViewSnapshot, after: &ViewSnapshot) -> Vec<Tween> {
    after
        .iter()
        .filter_map(|(view, to)| {
            let from = before.get(view)?;
            (from != to).then_some(Tween {
                view,
                from: *from,
                to: *to,
            })
        })
        .collect()
}

fn apply_tweens(tree: &mut ViewTree, tweens: &[Tween], t: f32) {
    for tw in tweens {
        let value = Animatable {
            frame: tw.from.frame.interpolate(&tw.to.frame, t),
            alpha: tw.from.alpha.interpolate(&tw.to.alpha, t),
        };
        tree.apply(tw.view, value);
    }
}

pub(crate) struct AnimationRequest {
    pub spec: AnimationSpec,
    pub changes: Changes,
    pub completion: Completion,
}

/// `ViewAnimator` that only records; the host applies the changes afterwards.
#[derive(Default)]
pub(crate) struct AnimationRecorder {
    pub requests: Vec<AnimationRequest>,
}

impl ViewAnimator for AnimationRecorder {
    fn animate(&mut self, spec: AnimationSpec, changes: Changes, completion: Completion) {
        self.requests.push(AnimationRequest {
            spec,
            changes,
            completion,
        });
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TransitionKind {
    Presentation,
    Dismissal,
}

pub(crate) struct InteractiveDriver {
    pub percent: PercentDrivenTransition,
    pub controller: Rc<dyn InteractiveTransitioning>,
    resolved: bool,
}

/// A presentation or dismissal in flight.
///
/// `fraction` is linear time in [0, 1]; the curve in `spec.easing` is applied when
/// writing views. Interactive transitions hold `fraction` at the driver's percent
/// until the driver is finished or cancelled.
pub(crate) struct RunningTransition {
    pub kind: TransitionKind,
    pub presented: ViewId,
    pub ctx: TransitionContext,
    pub tweens: Vec<Tween>,
    pub spec: AnimationSpec,
    pub fraction: AnimatedValue<f32>,
    pub completions: Vec<Completion>,
    pub alongside: Vec<AlongsideCompletion>,
    pub driver: Option<InteractiveDriver>,
}

impl RunningTransition {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        kind: TransitionKind,
        presented: ViewId,
        ctx: TransitionContext,
        tweens: Vec<Tween>,
        spec: AnimationSpec,
        completions: Vec<Completion>,
        alongside: Vec<AlongsideCompletion>,
        interactive: Option<Rc<dyn InteractiveTransitioning>>,
        now: Instant,
    ) -> Self {
        let mut fraction = AnimatedValue::new(
            0.0,
            AnimationSpec {
                easing: Easing::Linear,
                ..spec
            },
        );
        let driver = interactive.map(|controller| {
            let percent = controller.percent_driven();
            percent.bind();
            InteractiveDriver {
                percent,
                controller,
                resolved: false,
            }
        });
        if driver.is_none() {
            fraction.set_target(1.0, now);
        }
        Self {
            kind,
            presented,
            ctx,
            tweens,
            spec,
            fraction,
            completions,
            alongside,
            driver,
        }
    }

    fn eased(&self, t: f32) -> f32 {
        self.spec.easing.interpolate(t)
    }

    pub fn apply_at(&self, tree: &mut ViewTree, t: f32) {
        apply_tweens(tree, &self.tweens, self.eased(t));
    }

    pub fn is_paused(&self) -> bool {
        self.driver.as_ref().is_some_and(|d| !d.resolved)
    }

    /// Advances to `now` and writes the current values. Returns true when done.
    pub fn advance(&mut self, now: Instant, tree: &mut ViewTree) -> bool {
        let mut resolve = None;
        if let Some(d) = &self.driver {
            if !d.resolved {
                match d.percent.resolution() {
                    None => {
                        let p = d.percent.percent_complete();
                        self.fraction.snap_to(p);
                        self.apply_at(tree, p);
                        return false;
                    }
                    Some(r) => {
                        resolve = Some((r, d.percent.percent_complete(), d.percent.completion_speed()))
                    }
                }
            }
        }
        if let Some((resolution, p, speed)) = resolve {
            self.resolve(resolution, p, speed, now);
        }

        let running = self.fraction.update(now);
        let t = *self.fraction.get();
        self.apply_at(tree, t);
        !running
    }

    fn resolve(&mut self, resolution: Resolution, p: f32, speed: f32, now: Instant) {
        let target = match resolution {
            Resolution::Finish => 1.0,
            Resolution::Cancel => {
                self.ctx.mark_cancelled();
                0.0
            }
        };
        let remaining = (target - p).abs();
        let duration = self.spec.duration.mul_f32(remaining / speed.max(0.01));
        log::debug!("interactive {resolution:?} from {p:.3} at speed {speed} over {duration:?}");

        self.fraction
            .set_spec(AnimationSpec::tween(duration, Easing::Linear));
        self.fraction.snap_to(p);
        self.fraction.set_target(target, now);
        if let Some(d) = self.driver.as_mut() {
            d.resolved = true;
        }
    }

    /// Jumps straight to the end state, used for non-animated transitions.
    pub fn jump_to_end(&mut self) {
        let end = if self.ctx.transition_was_cancelled() {
            0.0
        } else {
            1.0
        };
        self.fraction.snap_to(end);
    }
}
