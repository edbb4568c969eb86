use std::collections::HashMap;
use std::rc::Rc;

use semimodal_core::animation::{AnimationSpec, Clock, SystemClock};
use semimodal_core::*;

use crate::defaults::{FullScreenPresentation, SlideDownAnimator};
use crate::log_err;
use crate::pointer::{PointerAction, PointerTracker, recognizer_chain};
use crate::running::{AnimationRecorder, RunningTransition, TransitionKind, diff};

struct ModalConfig {
    style: ModalPresentationStyle,
    delegate: Option<Rc<dyn TransitioningDelegate>>,
}

struct Presentation {
    presenting: ViewId,
    presented: ViewId,
    container: ViewId,
    controller: Box<dyn PresentationController>,
}

/// Headless host for modal screens.
///
/// Owns the view tree and a window view covering the screen. Screens are
/// presented into their own container view on top of the window. Only one
/// presentation or dismissal runs at a time; requests made meanwhile are dropped.
///
/// Time comes from the host's `Clock`; call `tick` once per frame.
pub struct ModalHost {
    tree: ViewTree,
    window: ViewId,
    screen: Size,
    clock: Rc<dyn Clock>,
    modal: HashMap<ViewId, ModalConfig>,
    presentations: Vec<Presentation>,
    running: Option<RunningTransition>,
    /// Set when the screen was resized mid-transition.
    needs_layout: bool,
    pointer: PointerTracker,
}

impl ModalHost {
    pub fn new(screen: Size) -> Self {
        Self::with_clock(screen, Rc::new(SystemClock))
    }

    pub fn with_clock(screen: Size, clock: Rc<dyn Clock>) -> Self {
        let mut tree = ViewTree::new();
        let window = tree.create_with_frame(ViewKind::Plain, Rect::from_size(screen));
        Self {
            tree,
            window,
            screen,
            clock,
            modal: HashMap::new(),
            presentations: Vec::new(),
            running: None,
            needs_layout: false,
            pointer: PointerTracker::default(),
        }
    }

    pub fn window(&self) -> ViewId {
        self.window
    }

    /// Installs `view` as the bottom-most, full-screen content of the window.
    pub fn set_root(&mut self, view: ViewId) -> Result<(), ViewError> {
        self.tree.insert_subview(self.window, view, 0)?;
        self.tree.set_frame(view, Rect::from_size(self.screen))
    }

    pub fn container_of(&self, presented: ViewId) -> Option<ViewId> {
        self.presentation_index(presented)
            .map(|i| self.presentations[i].container)
    }

    pub fn presenting_of(&self, presented: ViewId) -> Option<ViewId> {
        self.presentation_index(presented)
            .map(|i| self.presentations[i].presenting)
    }

    pub fn is_transitioning(&self) -> bool {
        self.running.is_some()
    }

    /// True while an interactive transition waits for its driver.
    pub fn is_interactive(&self) -> bool {
        self.running.as_ref().is_some_and(|r| r.is_paused())
    }

    pub fn set_screen_size(&mut self, size: Size) {
        self.screen = size;
        let bounds = Rect::from_size(size);
        log_err("window resize", self.tree.set_frame(self.window, bounds));
        for p in &self.presentations {
            log_err("container resize", self.tree.set_frame(p.container, bounds));
        }
        if self.running.is_some() {
            // frames belong to the running transition until it ends
            self.needs_layout = true;
        } else {
            self.layout();
        }
    }

    /// Runs a layout pass on every presentation's container.
    pub fn layout(&mut self) {
        for p in &self.presentations {
            p.controller
                .container_will_layout_subviews(&mut self.tree, p.container);
        }
    }

    /// Advances running animations to the clock's current time.
    pub fn tick(&mut self) {
        self.pump();
    }

    /// Runs the current transition straight to its end state. An interactive
    /// transition still waiting for its driver is left running.
    pub fn settle(&mut self) {
        match self.running.as_ref() {
            None => return,
            Some(run) if run.is_paused() => {
                log::debug!("settle skipped: interactive transition not resolved yet");
                return;
            }
            Some(_) => {}
        }
        if let Some(mut run) = self.running.take() {
            run.jump_to_end();
            self.finalize(run);
        }
    }

    pub fn send_pointer(&mut self, event: PointerEvent) {
        if event.event == PointerEventKind::Down {
            if !self.pointer.is_pressed() {
                let chain = self
                    .tree
                    .hit_test(self.window, event.position)
                    .map(|hit| recognizer_chain(&self.tree, hit))
                    .unwrap_or_default();
                self.pointer
                    .down(event.id, event.position, event.time, chain);
            }
            return;
        }
        match self.pointer.handle(&event) {
            PointerAction::None => {}
            PointerAction::Pan(phase, pans, translation, velocity) => {
                for c in pans {
                    let gesture = PanGesture {
                        phase,
                        translation,
                        velocity,
                        view: c.view,
                    };
                    c.recognizer.target.on_pan(&gesture, self);
                }
            }
            PointerAction::Tap(c) => c.recognizer.target.on_tap(c.view, self),
        }
        self.pump();
    }

    /// Delivers an already-recognized pan to the pan recognizers on `view`.
    pub fn send_pan(&mut self, view: ViewId, phase: GesturePhase, translation: Vec2, velocity: Vec2) {
        let gesture = PanGesture {
            phase,
            translation,
            velocity,
            view,
        };
        for target in self.targets(view, RecognizerKind::Pan) {
            target.on_pan(&gesture, self);
        }
        self.pump();
    }

    /// Delivers a tap to the tap recognizers on `view`.
    pub fn send_tap(&mut self, view: ViewId) {
        for target in self.targets(view, RecognizerKind::Tap) {
            target.on_tap(view, self);
        }
        self.pump();
    }

    fn targets(&self, view: ViewId, kind: RecognizerKind) -> Vec<Rc<dyn GestureTarget>> {
        self.tree
            .get(view)
            .map(|n| {
                n.recognizers()
                    .iter()
                    .filter(|r| r.kind == kind)
                    .map(|r| r.target.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn presentation_index(&self, presented: ViewId) -> Option<usize> {
        self.presentations
            .iter()
            .position(|p| p.presented == presented)
    }

    fn delegate_for(&self, screen: ViewId) -> Option<Rc<dyn TransitioningDelegate>> {
        self.modal
            .get(&screen)
            .filter(|c| c.style == ModalPresentationStyle::Custom)
            .and_then(|c| c.delegate.clone())
    }

    fn start(&mut self, mut run: RunningTransition, animated: bool) {
        if animated {
            run.apply_at(&mut self.tree, 0.0);
            self.running = Some(run);
            self.pump();
        } else {
            run.jump_to_end();
            self.finalize(run);
        }
    }

    fn pump(&mut self) {
        let now = self.clock.now();
        let done = match self.running.as_mut() {
            Some(run) => run.advance(now, &mut self.tree),
            None => return,
        };
        if done {
            if let Some(run) = self.running.take() {
                self.finalize(run);
            }
        }
    }

    fn finalize(&mut self, mut run: RunningTransition) {
        let t = *run.fraction.get();
        run.apply_at(&mut self.tree, t);

        let ctx = run.ctx.clone();
        for completion in run.completions.drain(..) {
            completion(true);
        }
        for completion in run.alongside.drain(..) {
            completion(&ctx, &mut self.tree);
        }
        let completed = ctx.completion().unwrap_or_else(|| {
            log::warn!("animator never completed the {:?}; assuming it ran to the end", run.kind);
            !ctx.transition_was_cancelled()
        });
        log::debug!("{:?} of {:?} ended, completed={completed}", run.kind, run.presented);

        if let Some(idx) = self.presentation_index(run.presented) {
            match run.kind {
                TransitionKind::Presentation => {
                    self.presentations[idx]
                        .controller
                        .presentation_transition_did_end(&mut self.tree, completed);
                    if !completed {
                        self.teardown(idx);
                    }
                }
                TransitionKind::Dismissal => {
                    self.presentations[idx]
                        .controller
                        .dismissal_transition_did_end(&mut self.tree, completed);
                    if completed {
                        self.teardown(idx);
                    }
                }
            }
        }

        if let Some(driver) = run.driver {
            driver.percent.unbind();
            driver.controller.interactive_transition_did_end(completed);
        }

        if self.needs_layout {
            self.needs_layout = false;
            self.layout();
        }
    }

    fn teardown(&mut self, idx: usize) {
        let p = self.presentations.remove(idx);
        log_err("teardown", self.tree.remove_from_superview(p.presented));
        self.tree.remove(p.container);
    }
}

impl HostContext for ModalHost {
    fn tree(&self) -> &ViewTree {
        &self.tree
    }

    fn tree_mut(&mut self) -> &mut ViewTree {
        &mut self.tree
    }

    fn screen_bounds(&self) -> Rect {
        Rect::from_size(self.screen)
    }

    fn configure_modal(
        &mut self,
        screen: ViewId,
        style: ModalPresentationStyle,
        delegate: Option<Rc<dyn TransitioningDelegate>>,
    ) {
        self.modal.insert(screen, ModalConfig { style, delegate });
    }

    fn present(&mut self, presenting: ViewId, presented: ViewId, animated: bool) {
        if self.running.is_some() {
            log::warn!("present ignored: a transition is already running");
            return;
        }
        if self.presentation_index(presented).is_some() {
            log::warn!("present ignored: {presented:?} is already presented");
            return;
        }
        if !self.tree.contains(presenting) || !self.tree.contains(presented) {
            log::warn!("present ignored: unknown view");
            return;
        }

        let controller: Box<dyn PresentationController> = self
            .delegate_for(presented)
            .and_then(|d| d.presentation_controller_for(presented, Some(presenting), presenting))
            .unwrap_or_else(|| Box::new(FullScreenPresentation));

        let bounds = Rect::from_size(self.screen);
        let container = self.tree.create_with_frame(ViewKind::Plain, bounds);
        let attached = self
            .tree
            .add_subview(self.window, container)
            .and_then(|_| self.tree.add_subview(container, presented));
        if let Err(e) = attached {
            log::warn!("present failed: {e}");
            log_err("present cleanup", self.tree.remove_from_superview(presented));
            self.tree.remove(container);
            return;
        }

        controller.container_will_layout_subviews(&mut self.tree, container);
        let final_frame = controller.frame_of_presented_view(&self.tree, container);
        // start just below the screen, slide up into place
        log_err(
            "offscreen start frame",
            self.tree.set_frame(presented, final_frame.offset(0.0, bounds.h)),
        );

        let mut coordinator = TransitionCoordinator::new();
        controller.presentation_transition_will_begin(&mut coordinator);
        let (changes, alongside) = coordinator.into_parts();

        let before = self.tree.snapshot();
        log_err("final frame", self.tree.set_frame(presented, final_frame));
        for change in changes {
            change(&mut self.tree);
        }
        let tweens = diff(&before, &self.tree.snapshot());

        let ctx = TransitionContext::new(container, Some(presenting), Some(presented), bounds, false);
        let completion: Completion = {
            let ctx = ctx.clone();
            Box::new(move |_| ctx.complete_transition(!ctx.transition_was_cancelled()))
        };
        self.presentations.push(Presentation {
            presenting,
            presented,
            container,
            controller,
        });

        log::debug!("presenting {presented:?} over {presenting:?}");
        let run = RunningTransition::new(
            TransitionKind::Presentation,
            presented,
            ctx,
            tweens,
            AnimationSpec::default(),
            vec![completion],
            alongside,
            None,
            self.clock.now(),
        );
        self.start(run, animated);
    }

    fn dismiss(&mut self, presented: ViewId, animated: bool) {
        if self.running.is_some() {
            log::debug!("dismiss ignored: a transition is already running");
            return;
        }
        let Some(idx) = self.presentation_index(presented) else {
            log::debug!("dismiss ignored: {presented:?} is not presented");
            return;
        };

        let delegate = self.delegate_for(presented);
        let animator: Rc<dyn AnimatedTransitioning> = delegate
            .as_ref()
            .and_then(|d| d.animation_controller_for_dismissed(presented))
            .unwrap_or_else(|| Rc::new(SlideDownAnimator));
        let interactive = if animated {
            delegate
                .as_ref()
                .and_then(|d| d.interaction_controller_for_dismissal(animator.as_ref()))
        } else {
            None
        };

        let (container, presenting) = {
            let p = &self.presentations[idx];
            (p.container, p.presenting)
        };
        let ctx = TransitionContext::new(
            container,
            Some(presented),
            Some(presenting),
            Rect::from_size(self.screen),
            interactive.is_some(),
        );

        let mut coordinator = TransitionCoordinator::new();
        self.presentations[idx]
            .controller
            .dismissal_transition_will_begin(&mut coordinator);
        let mut recorder = AnimationRecorder::default();
        animator.animate_transition(&ctx, &mut recorder);
        let (changes, alongside) = coordinator.into_parts();

        let spec = recorder
            .requests
            .first()
            .map(|r| r.spec)
            .unwrap_or_else(|| AnimationSpec {
                duration: animator.transition_duration(&ctx),
                ..AnimationSpec::default()
            });

        let before = self.tree.snapshot();
        let mut completions = Vec::with_capacity(recorder.requests.len());
        for request in recorder.requests {
            (request.changes)(&mut self.tree);
            completions.push(request.completion);
        }
        for change in changes {
            change(&mut self.tree);
        }
        let tweens = diff(&before, &self.tree.snapshot());

        log::debug!(
            "dismissing {presented:?} ({})",
            if interactive.is_some() { "interactive" } else { "animated" }
        );
        let run = RunningTransition::new(
            TransitionKind::Dismissal,
            presented,
            ctx,
            tweens,
            spec,
            completions,
            alongside,
            interactive,
            self.clock.now(),
        );
        self.start(run, animated);
    }

    fn is_presented(&self, screen: ViewId) -> bool {
        self.presentation_index(screen).is_some()
    }
}
