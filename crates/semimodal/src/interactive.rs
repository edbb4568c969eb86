use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use semimodal_core::*;

use crate::gestures::{
    GestureDirection, GestureSampler, Release, allows_simultaneous_recognition,
    dismissal_progress, release_decision,
};
use crate::SemiModalScreen;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransitionState {
    #[default]
    Idle,
    /// A drag is in flight.
    Interactive,
    /// Released past the threshold; finishing the dismissal.
    Committing,
    /// Released short of the threshold; returning to presented.
    Cancelling,
}

/// Turns a vertical drag on the sheet into a scrubbable dismissal.
///
/// A downward drag starts the dismissal at once and scrubs it with the finger;
/// on release the drag either commits or snaps back, depending on how far it got.
/// `state` and `progress` are published as signals.
pub struct InteractiveDismissController {
    screen: RefCell<Option<Weak<dyn SemiModalScreen>>>,
    transition: PercentDrivenTransition,
    threshold: f32,
    direction: Cell<GestureDirection>,
    state: Signal<TransitionState>,
    progress: Signal<f32>,
    attached: RefCell<Vec<ViewId>>,
}

impl InteractiveDismissController {
    pub fn new(threshold: f32) -> Self {
        Self {
            screen: RefCell::new(None),
            transition: PercentDrivenTransition::new(),
            threshold,
            direction: Cell::new(GestureDirection::default()),
            state: signal(TransitionState::Idle),
            progress: signal(0.0),
            attached: RefCell::new(Vec::new()),
        }
    }

    /// Rebinds to `screen`. Only a weak reference is kept.
    pub fn bind(&self, screen: &Rc<dyn SemiModalScreen>) {
        *self.screen.borrow_mut() = Some(Rc::downgrade(screen));
    }

    pub fn screen(&self) -> Option<Rc<dyn SemiModalScreen>> {
        self.screen.borrow().as_ref().and_then(Weak::upgrade)
    }

    /// Adds this controller's pan recognizer to each view, once per view.
    pub fn attach(self: &Rc<Self>, tree: &mut ViewTree, views: &[ViewId]) {
        let mut attached = self.attached.borrow_mut();
        for &view in views {
            if attached.contains(&view) {
                continue;
            }
            match tree.add_recognizer(view, Recognizer::pan(self.clone())) {
                Ok(()) => attached.push(view),
                Err(e) => log::warn!("dismiss pan not attached: {e}"),
            }
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn state(&self) -> TransitionState {
        self.state.get()
    }

    pub fn state_signal(&self) -> Signal<TransitionState> {
        self.state.clone()
    }

    /// Last progress pushed into a bound dismissal.
    pub fn progress(&self) -> f32 {
        self.progress.get()
    }

    pub fn progress_signal(&self) -> Signal<f32> {
        self.progress.clone()
    }

    pub fn direction(&self) -> GestureDirection {
        self.direction.get()
    }

    pub fn is_interactive_dismissal(&self) -> bool {
        self.state.get() == TransitionState::Interactive
    }

    fn set_state(&self, state: TransitionState) {
        if self.state.get() != state {
            log::trace!("dismiss state {:?} -> {state:?}", self.state.get());
            self.state.set(state);
        }
    }

    fn begin(&self, gesture: &PanGesture, screen: &dyn SemiModalScreen, host: &mut dyn HostContext) {
        if self.state.get() != TransitionState::Idle {
            log::debug!("drag began while {:?}; ignored", self.state.get());
            return;
        }
        let sampler = GestureSampler::new(host.tree(), screen.view());
        let direction = GestureDirection::from_velocity(sampler.velocity(gesture));
        self.direction.set(direction);
        self.progress.set(0.0);
        self.set_state(TransitionState::Interactive);
        if direction == GestureDirection::Down {
            host.dismiss(screen.view(), true);
        }
    }

    fn change(&self, gesture: &PanGesture, screen: &dyn SemiModalScreen, host: &dyn HostContext) {
        if self.state.get() != TransitionState::Interactive {
            return;
        }
        let sampler = GestureSampler::new(host.tree(), screen.view());
        let Some(height) = sampler.reference_height() else {
            return;
        };
        let raw = dismissal_progress(self.direction.get(), sampler.translation(gesture).y, height);
        self.transition.update(raw);
        if self.transition.is_bound() {
            self.progress.set(self.transition.percent_complete());
        }
    }

    fn release(&self, release: Release) {
        match release {
            Release::Commit { rate } => {
                self.transition.set_completion_speed(rate);
                self.set_state(TransitionState::Committing);
                self.transition.finish();
            }
            Release::Cancel { rate } => {
                self.transition.set_completion_speed(rate);
                self.set_state(TransitionState::Cancelling);
                self.transition.cancel();
            }
        }
    }

    fn end(&self, cancelled: bool) {
        if self.state.get() != TransitionState::Interactive {
            return;
        }
        if !self.transition.is_bound() {
            // upward drags and refused dismissals leave nothing to resolve
            self.reset();
            return;
        }
        let release = if cancelled {
            Release::Cancel {
                rate: self.threshold,
            }
        } else {
            release_decision(self.transition.percent_complete(), self.threshold)
        };
        log::debug!("drag released at {:.3}: {release:?}", self.transition.percent_complete());
        self.release(release);
    }

    fn reset(&self) {
        self.set_state(TransitionState::Idle);
        self.progress.set(0.0);
    }
}

impl GestureTarget for InteractiveDismissController {
    fn on_pan(&self, gesture: &PanGesture, host: &mut dyn HostContext) {
        // a release must resolve a running dismissal even if the screen is gone
        match gesture.phase {
            GesturePhase::Ended => return self.end(false),
            GesturePhase::Cancelled => return self.end(true),
            GesturePhase::Began | GesturePhase::Changed => {}
        }
        let Some(screen) = self.screen() else {
            log::debug!("pan ignored: no screen bound");
            return;
        };
        if gesture.phase == GesturePhase::Began {
            self.begin(gesture, screen.as_ref(), host);
        } else {
            self.change(gesture, screen.as_ref(), host);
        }
    }

    fn should_recognize_simultaneously(&self, other: RecognizerTag) -> bool {
        allows_simultaneous_recognition(other)
    }
}

impl InteractiveTransitioning for InteractiveDismissController {
    fn percent_driven(&self) -> PercentDrivenTransition {
        self.transition.clone()
    }

    fn interactive_transition_did_end(&self, completed: bool) {
        log::debug!("interactive dismissal ended, completed={completed}");
        self.reset();
    }
}
