//! # Modal transition lifecycle
//!
//! These traits describe how a host presents and dismisses a screen and where a
//! component can plug in. A screen is identified by its root `ViewId`.
//!
//! - `TransitioningDelegate` is asked for the pieces of a custom presentation:
//!   a `PresentationController` (layout + lifecycle hooks), an
//!   `AnimatedTransitioning` (the dismissal animation) and optionally an
//!   `InteractiveTransitioning` (gesture-driven progress).
//! - Animations are requested through a `ViewAnimator`: a `changes` closure moves
//!   views to their final state, the host interpolates from the previous state.
//! - `TransitionCoordinator` lets a presentation controller run extra changes in
//!   lockstep with the transition, with a completion that sees whether the
//!   transition was cancelled.
//! - `PercentDrivenTransition` is the shared handle an interactive controller uses
//!   to scrub, finish or cancel a running transition.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use crate::animation::AnimationSpec;
use crate::{Rect, ViewId, ViewTree};

pub type Changes = Box<dyn FnOnce(&mut ViewTree)>;
pub type Completion = Box<dyn FnOnce(bool)>;
pub type AlongsideCompletion = Box<dyn FnOnce(&TransitionContext, &mut ViewTree)>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ModalPresentationStyle {
    #[default]
    FullScreen,
    Custom,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionViewKey {
    From,
    To,
}

/// State of one running presentation or dismissal. Clones share state.
#[derive(Clone)]
pub struct TransitionContext(Rc<ContextInner>);

struct ContextInner {
    container: ViewId,
    from_view: Option<ViewId>,
    to_view: Option<ViewId>,
    screen_bounds: Rect,
    interactive: bool,
    cancelled: Cell<bool>,
    completed: Cell<Option<bool>>,
}

impl TransitionContext {
    pub fn new(
        container: ViewId,
        from_view: Option<ViewId>,
        to_view: Option<ViewId>,
        screen_bounds: Rect,
        interactive: bool,
    ) -> Self {
        Self(Rc::new(ContextInner {
            container,
            from_view,
            to_view,
            screen_bounds,
            interactive,
            cancelled: Cell::new(false),
            completed: Cell::new(None),
        }))
    }

    pub fn container(&self) -> ViewId {
        self.0.container
    }

    pub fn view(&self, key: TransitionViewKey) -> Option<ViewId> {
        match key {
            TransitionViewKey::From => self.0.from_view,
            TransitionViewKey::To => self.0.to_view,
        }
    }

    pub fn screen_bounds(&self) -> Rect {
        self.0.screen_bounds
    }

    pub fn is_interactive(&self) -> bool {
        self.0.interactive
    }

    pub fn transition_was_cancelled(&self) -> bool {
        self.0.cancelled.get()
    }

    /// Host only: an interactive transition was reversed.
    pub fn mark_cancelled(&self) {
        self.0.cancelled.set(true);
    }

    /// Called by the animator once its animation is over. Only the first call counts.
    pub fn complete_transition(&self, did_complete: bool) {
        if self.0.completed.get().is_none() {
            self.0.completed.set(Some(did_complete));
        }
    }

    pub fn completion(&self) -> Option<bool> {
        self.0.completed.get()
    }
}

/// Collects animation requests made by an `AnimatedTransitioning`.
pub trait ViewAnimator {
    fn animate(&mut self, spec: AnimationSpec, changes: Changes, completion: Completion);
}

/// Changes that run in lockstep with the current transition.
#[derive(Default)]
pub struct TransitionCoordinator {
    changes: Vec<Changes>,
    completions: Vec<AlongsideCompletion>,
}

impl TransitionCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn animate_alongside(
        &mut self,
        changes: impl FnOnce(&mut ViewTree) + 'static,
        completion: Option<AlongsideCompletion>,
    ) {
        self.changes.push(Box::new(changes));
        if let Some(c) = completion {
            self.completions.push(c);
        }
    }

    pub fn into_parts(self) -> (Vec<Changes>, Vec<AlongsideCompletion>) {
        (self.changes, self.completions)
    }
}

pub trait AnimatedTransitioning {
    fn transition_duration(&self, ctx: &TransitionContext) -> Duration;

    /// Requests the animation on `animator`. The completion must eventually call
    /// `ctx.complete_transition`.
    fn animate_transition(&self, ctx: &TransitionContext, animator: &mut dyn ViewAnimator);
}

pub trait InteractiveTransitioning {
    fn percent_driven(&self) -> PercentDrivenTransition;

    /// The host finished (or reversed) the interactive transition.
    fn interactive_transition_did_end(&self, _completed: bool) {}
}

pub trait PresentationController {
    fn frame_of_presented_view(&self, tree: &ViewTree, container: ViewId) -> Rect;

    fn container_will_layout_subviews(&self, tree: &mut ViewTree, container: ViewId);

    fn presentation_transition_will_begin(&self, _coordinator: &mut TransitionCoordinator) {}

    fn presentation_transition_did_end(&self, _tree: &mut ViewTree, _completed: bool) {}

    fn dismissal_transition_will_begin(&self, _coordinator: &mut TransitionCoordinator) {}

    fn dismissal_transition_did_end(&self, _tree: &mut ViewTree, _completed: bool) {}
}

/// Supplies the pieces of a custom presentation. `None` means "use the host default".
pub trait TransitioningDelegate {
    fn presentation_controller_for(
        &self,
        _presented: ViewId,
        _presenting: Option<ViewId>,
        _source: ViewId,
    ) -> Option<Box<dyn PresentationController>> {
        None
    }

    fn animation_controller_for_dismissed(
        &self,
        _dismissed: ViewId,
    ) -> Option<Rc<dyn AnimatedTransitioning>> {
        None
    }

    fn interaction_controller_for_dismissal(
        &self,
        _animator: &dyn AnimatedTransitioning,
    ) -> Option<Rc<dyn InteractiveTransitioning>> {
        None
    }
}

/// What a component may ask of the host while handling an event.
pub trait HostContext {
    fn tree(&self) -> &ViewTree;

    fn tree_mut(&mut self) -> &mut ViewTree;

    fn screen_bounds(&self) -> Rect;

    fn configure_modal(
        &mut self,
        screen: ViewId,
        style: ModalPresentationStyle,
        delegate: Option<Rc<dyn TransitioningDelegate>>,
    );

    fn present(&mut self, presenting: ViewId, presented: ViewId, animated: bool);

    fn dismiss(&mut self, presented: ViewId, animated: bool);

    fn is_presented(&self, screen: ViewId) -> bool;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    Finish,
    Cancel,
}

/// Percent-driven handle onto an interactive transition.
///
/// The host binds it when an interactive transition starts and unbinds it when
/// the transition ends. While unbound, `update`, `finish` and `cancel` are ignored.
#[derive(Clone)]
pub struct PercentDrivenTransition(Rc<PercentInner>);

struct PercentInner {
    bound: Cell<bool>,
    percent: Cell<f32>,
    completion_speed: Cell<f32>,
    resolution: Cell<Option<Resolution>>,
}

impl Default for PercentDrivenTransition {
    fn default() -> Self {
        Self::new()
    }
}

impl PercentDrivenTransition {
    pub fn new() -> Self {
        Self(Rc::new(PercentInner {
            bound: Cell::new(false),
            percent: Cell::new(0.0),
            completion_speed: Cell::new(1.0),
            resolution: Cell::new(None),
        }))
    }

    pub fn is_bound(&self) -> bool {
        self.0.bound.get()
    }

    pub fn percent_complete(&self) -> f32 {
        self.0.percent.get()
    }

    pub fn completion_speed(&self) -> f32 {
        self.0.completion_speed.get()
    }

    pub fn set_completion_speed(&self, speed: f32) {
        self.0.completion_speed.set(speed);
    }

    pub fn resolution(&self) -> Option<Resolution> {
        self.0.resolution.get()
    }

    pub fn update(&self, percent: f32) {
        if !self.is_bound() || self.resolution().is_some() {
            log::trace!("percent update {percent} ignored: no transition to drive");
            return;
        }
        self.0.percent.set(percent.clamp(0.0, 1.0));
    }

    pub fn finish(&self) {
        self.resolve(Resolution::Finish);
    }

    pub fn cancel(&self) {
        self.resolve(Resolution::Cancel);
    }

    fn resolve(&self, r: Resolution) {
        if self.is_bound() && self.resolution().is_none() {
            self.0.resolution.set(Some(r));
        }
    }

    /// Host only.
    pub fn bind(&self) {
        self.0.bound.set(true);
        self.0.percent.set(0.0);
        self.0.resolution.set(None);
    }

    /// Host only.
    pub fn unbind(&self) {
        self.0.bound.set(false);
        self.0.percent.set(0.0);
        self.0.resolution.set(None);
    }
}
