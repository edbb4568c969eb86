#[cfg(test)]
mod tests {
    use crate::gestures::*;
    use crate::*;
    use semimodal_core::animation::{AnimationSpec, Clock, TestClock};
    use semimodal_core::*;
    use semimodal_platform::ModalHost;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    struct Sheet {
        view: ViewId,
        height: Option<f32>,
    }

    impl SemiModalSizing for Sheet {
        fn semi_modal_content_height(&self, _tree: &ViewTree) -> f32 {
            self.height.unwrap_or_default()
        }
    }

    impl SemiModalScreen for Sheet {
        fn view(&self) -> ViewId {
            self.view
        }

        fn sizing(&self) -> Option<&dyn SemiModalSizing> {
            self.height.map(|_| self as &dyn SemiModalSizing)
        }
    }

    struct Fixture {
        host: ModalHost,
        clock: TestClock,
        root: ViewId,
        sheet: Rc<Sheet>,
        presenter: Rc<SemiModalPresenter>,
    }

    impl Fixture {
        fn new(height: Option<f32>) -> Self {
            let clock = TestClock::default();
            let mut host = ModalHost::with_clock(Size::new(400.0, 800.0), Rc::new(clock.clone()));
            let root = host.tree_mut().create(ViewKind::Plain);
            host.set_root(root).unwrap();
            let view = host.tree_mut().create(ViewKind::Plain);
            let sheet = Rc::new(Sheet { view, height });
            let presenter = SemiModalPresenter::new();
            presenter.set_screen(sheet.clone(), &mut host);
            Self {
                host,
                clock,
                root,
                sheet,
                presenter,
            }
        }

        fn presented(height: Option<f32>) -> Self {
            let mut f = Self::new(height);
            f.presenter.present_over(f.root, &mut f.host);
            f.wait(Duration::from_millis(400));
            assert!(f.host.is_presented(f.sheet.view));
            assert!(!f.host.is_transitioning());
            f
        }

        fn wait(&mut self, d: Duration) {
            self.clock.advance(d);
            self.host.tick();
        }

        fn pan(&mut self, phase: GesturePhase, ty: f32, vy: f32) {
            self.host
                .send_pan(self.sheet.view, phase, Vec2::new(0.0, ty), Vec2::new(0.0, vy));
        }

        fn overlay(&self) -> ViewId {
            self.presenter.overlay().unwrap().view()
        }

        fn indicator(&self) -> ViewId {
            self.presenter.indicator().unwrap().view()
        }

        fn state(&self) -> TransitionState {
            self.presenter.controller().state()
        }

        fn sheet_frame(&self) -> Rect {
            self.host.tree().frame(self.sheet.view).unwrap()
        }

        /// Drops the app's only strong reference to the bound screen.
        fn drop_screen(&mut self) {
            let view = self.sheet.view;
            self.sheet = Rc::new(Sheet { view, height: None });
            assert!(self.presenter.screen().is_none());
        }

        fn trace_states(&self) -> Rc<RefCell<Vec<String>>> {
            let trace = Rc::new(RefCell::new(Vec::new()));
            let sink = trace.clone();
            self.presenter
                .controller()
                .state_signal()
                .subscribe(move |s| sink.borrow_mut().push(format!("{s:?}")));
            trace
        }
    }

    #[test]
    fn test_config_defaults_and_json() {
        let config = SemiModalConfig::default();
        assert_eq!(config.completion_threshold, 0.3);
        assert_eq!(config.dismiss_duration(), Duration::from_secs_f32(0.4));
        insta::assert_snapshot!(
            serde_json::to_string(&config).unwrap(),
            @r#"{"corner_radius":10.0,"indicator_corner_radius":5.0,"overlay_alpha":0.5,"default_height_ratio":0.5,"completion_threshold":0.3,"dismiss_duration_secs":0.4,"indicator_width":60.0,"indicator_height":8.0,"indicator_offset":16.0}"#
        );

        let partial = SemiModalConfig::from_json(r#"{ "overlay_alpha": 0.25 }"#).unwrap();
        assert_eq!(partial.overlay_alpha, 0.25);
        assert_eq!(partial.default_height_ratio, 0.5);

        assert!(matches!(
            SemiModalConfig::from_json(r#"{ "completion_threshold": 1.5 }"#),
            Err(ConfigError::OutOfRange {
                field: "completion_threshold",
                ..
            })
        ));
        assert!(matches!(
            SemiModalConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_downward_progress_is_clamped() {
        use GestureDirection::Down;
        assert_eq!(dismissal_progress(Down, 100.0, 400.0), 0.25);
        assert_eq!(dismissal_progress(Down, 1000.0, 400.0), 1.0);
        assert_eq!(dismissal_progress(Down, -50.0, 400.0), 0.0);
        assert_eq!(dismissal_progress(Down, 100.0, 0.0), 0.0);
    }

    #[test]
    fn test_upward_progress_formula() {
        use GestureDirection::Up;
        // upward motion is positive, moving back down is negative; both are dropped unbound
        assert_eq!(dismissal_progress(Up, 100.0, 400.0), -0.25);
        assert_eq!(dismissal_progress(Up, 1000.0, 400.0), -2.5);
        assert_eq!(dismissal_progress(Up, -2000.0, 400.0), 1.0);
    }

    #[test]
    fn test_release_threshold_boundary() {
        assert_eq!(release_decision(0.3, 0.3), Release::Cancel { rate: 0.3 });
        assert_eq!(release_decision(0.0, 0.3), Release::Cancel { rate: 0.3 });
        assert_eq!(release_decision(0.31, 0.3), Release::Commit { rate: 0.7 });
        assert_eq!(release_decision(1.0, 0.3), Release::Commit { rate: 0.7 });
    }

    #[test]
    fn test_direction_and_simultaneous_policy() {
        assert_eq!(GestureDirection::from_velocity(Vec2::new(0.0, 10.0)), GestureDirection::Down);
        assert_eq!(GestureDirection::from_velocity(Vec2::new(50.0, -1.0)), GestureDirection::Up);
        assert_eq!(GestureDirection::from_velocity(Vec2::ZERO), GestureDirection::Up);

        let tag = |kind, view_kind| RecognizerTag { kind, view_kind };
        assert!(allows_simultaneous_recognition(tag(RecognizerKind::Pan, ViewKind::Scroll)));
        assert!(!allows_simultaneous_recognition(tag(RecognizerKind::Pan, ViewKind::Plain)));
        assert!(!allows_simultaneous_recognition(tag(RecognizerKind::Tap, ViewKind::Scroll)));
    }

    #[test]
    fn test_overlay_activation_is_idempotent() {
        let mut tree = ViewTree::new();
        let overlay = OverlayView::new(&mut tree, &SemiModalConfig::default());
        assert!(!overlay.is_active());
        assert_eq!(tree.alpha(overlay.view()), Some(0.0));

        overlay.set_active(&mut tree, true);
        overlay.set_active(&mut tree, true);
        assert!(overlay.is_active());
        assert_eq!(tree.alpha(overlay.view()), Some(0.5));

        overlay.set_active(&mut tree, false);
        overlay.set_active(&mut tree, false);
        assert!(!overlay.is_active());
        assert_eq!(tree.alpha(overlay.view()), Some(0.0));
    }

    #[test]
    fn test_default_layout_is_bottom_half() {
        let f = Fixture::presented(None);
        let tree = f.host.tree();
        let container = f.host.container_of(f.sheet.view).unwrap();

        assert_eq!(f.sheet_frame(), Rect::new(0.0, 400.0, 400.0, 400.0));
        let node = tree.get(f.sheet.view).unwrap();
        assert_eq!(node.corner_radius, 10.0);
        assert_eq!(node.masked_corners, Corners::TOP);

        assert_eq!(tree.subviews(container)[0], f.overlay());
        assert_eq!(tree.frame(f.overlay()), tree.bounds(container));
        assert_eq!(tree.alpha(f.overlay()), Some(0.5));
        assert!(f.presenter.overlay().unwrap().is_active());

        assert_eq!(tree.superview(f.indicator()), Some(f.sheet.view));
        assert_eq!(tree.frame(f.indicator()), Some(Rect::new(170.0, -16.0, 60.0, 8.0)));
        let indicator = tree.get(f.indicator()).unwrap();
        assert_eq!(indicator.corner_radius, 5.0);
        assert_eq!(indicator.background, Color::LIGHT_GRAY);
    }

    #[test]
    fn test_self_sized_height_is_not_clamped() {
        let f = Fixture::presented(Some(300.0));
        assert_eq!(f.sheet_frame(), Rect::new(0.0, 500.0, 400.0, 300.0));

        let f = Fixture::presented(Some(900.0));
        assert_eq!(f.sheet_frame(), Rect::new(0.0, -100.0, 400.0, 900.0));
    }

    #[test]
    fn test_rebinding_does_not_duplicate_recognizers() {
        let mut f = Fixture::new(None);
        f.presenter.set_screen(f.sheet.clone(), &mut f.host);

        let count = |view| f.host.tree().get(view).unwrap().recognizers().len();
        assert_eq!(count(f.sheet.view), 1);
        // tap + pan
        assert_eq!(count(f.overlay()), 2);
        assert_eq!(count(f.indicator()), 2);
    }

    #[test]
    fn test_downward_begin_dismisses_immediately() {
        let mut f = Fixture::presented(None);
        f.pan(GesturePhase::Began, 0.0, 500.0);

        assert_eq!(f.state(), TransitionState::Interactive);
        assert_eq!(f.presenter.controller().direction(), GestureDirection::Down);
        assert!(f.host.is_transitioning());
        assert!(f.host.is_interactive());
        // nothing moves until the drag does
        assert_eq!(f.sheet_frame().y, 400.0);
    }

    #[test]
    fn test_upward_drag_never_dismisses() {
        let mut f = Fixture::presented(None);
        let trace = f.trace_states();

        f.pan(GesturePhase::Began, 0.0, -500.0);
        assert_eq!(f.state(), TransitionState::Interactive);
        assert!(!f.host.is_transitioning());

        f.pan(GesturePhase::Changed, -100.0, -500.0);
        f.pan(GesturePhase::Changed, 150.0, 300.0);
        assert!(f.presenter.controller().progress() <= 0.0);

        f.pan(GesturePhase::Ended, 150.0, 300.0);
        assert_eq!(f.state(), TransitionState::Idle);
        assert!(f.host.is_presented(f.sheet.view));
        insta::assert_snapshot!(trace.borrow().join(" -> "), @"Interactive -> Idle");
    }

    #[test]
    fn test_drag_past_threshold_commits() {
        let mut f = Fixture::presented(None);
        let trace = f.trace_states();

        f.pan(GesturePhase::Began, 0.0, 500.0);
        f.pan(GesturePhase::Changed, 200.0, 500.0);
        assert_eq!(f.presenter.controller().progress(), 0.5);
        assert_eq!(f.sheet_frame().y, 600.0);
        assert_eq!(f.host.tree().alpha(f.overlay()), Some(0.25));

        f.pan(GesturePhase::Ended, 200.0, 500.0);
        assert_eq!(f.state(), TransitionState::Committing);
        assert_eq!(f.presenter.controller().percent_driven().completion_speed(), 0.7);

        // remaining half of 400ms at 0.7 speed
        f.wait(Duration::from_millis(300));
        assert!(!f.host.is_presented(f.sheet.view));
        assert_eq!(f.state(), TransitionState::Idle);
        assert_eq!(f.presenter.controller().progress(), 0.0);
        assert_eq!(f.host.tree().superview(f.overlay()), None);
        assert!(!f.presenter.overlay().unwrap().is_active());
        insta::assert_snapshot!(trace.borrow().join(" -> "), @"Interactive -> Committing -> Idle");
    }

    #[test]
    fn test_drag_short_of_threshold_snaps_back() {
        let mut f = Fixture::presented(None);
        let trace = f.trace_states();

        f.pan(GesturePhase::Began, 0.0, 500.0);
        f.pan(GesturePhase::Changed, 100.0, 500.0);
        assert_eq!(f.presenter.controller().progress(), 0.25);
        f.pan(GesturePhase::Ended, 100.0, 50.0);
        assert_eq!(f.state(), TransitionState::Cancelling);
        assert_eq!(f.presenter.controller().percent_driven().completion_speed(), 0.3);

        f.wait(Duration::from_secs(1));
        assert!(f.host.is_presented(f.sheet.view));
        assert!(!f.host.is_transitioning());
        assert_eq!(f.state(), TransitionState::Idle);
        assert_eq!(f.presenter.controller().progress(), 0.0);
        assert_eq!(f.sheet_frame(), Rect::new(0.0, 400.0, 400.0, 400.0));

        let container = f.host.container_of(f.sheet.view).unwrap();
        assert_eq!(f.host.tree().superview(f.overlay()), Some(container));
        assert!(f.presenter.overlay().unwrap().is_active());
        assert_eq!(f.host.tree().alpha(f.overlay()), Some(0.5));
        insta::assert_snapshot!(trace.borrow().join(" -> "), @"Interactive -> Cancelling -> Idle");
    }

    #[test]
    fn test_release_exactly_at_threshold_cancels() {
        let mut f = Fixture::presented(None);
        f.pan(GesturePhase::Began, 0.0, 500.0);
        f.pan(GesturePhase::Changed, 120.0, 500.0);
        assert_eq!(f.presenter.controller().progress(), 0.3);
        f.pan(GesturePhase::Ended, 120.0, 500.0);
        assert_eq!(f.state(), TransitionState::Cancelling);

        f.wait(Duration::from_secs(1));
        assert!(f.host.is_presented(f.sheet.view));
    }

    #[test]
    fn test_cancelled_drag_takes_cancel_path() {
        let mut f = Fixture::presented(None);
        f.pan(GesturePhase::Began, 0.0, 500.0);
        f.pan(GesturePhase::Changed, 300.0, 500.0);
        f.pan(GesturePhase::Cancelled, 300.0, 500.0);
        assert_eq!(f.state(), TransitionState::Cancelling);

        f.wait(Duration::from_secs(2));
        assert!(f.host.is_presented(f.sheet.view));
        assert_eq!(f.state(), TransitionState::Idle);
    }

    #[test]
    fn test_new_drag_ignored_until_idle() {
        let mut f = Fixture::presented(None);
        f.pan(GesturePhase::Began, 0.0, 500.0);
        f.pan(GesturePhase::Changed, 100.0, 500.0);
        f.pan(GesturePhase::Ended, 100.0, 500.0);
        assert_eq!(f.state(), TransitionState::Cancelling);

        f.pan(GesturePhase::Began, 0.0, 500.0);
        f.pan(GesturePhase::Changed, 300.0, 500.0);
        assert_eq!(f.state(), TransitionState::Cancelling);
        assert_eq!(f.presenter.controller().progress(), 0.25);
    }

    #[test]
    fn test_tapping_overlay_or_indicator_dismisses() {
        for tap_indicator in [false, true] {
            let mut f = Fixture::presented(None);
            let target = if tap_indicator { f.indicator() } else { f.overlay() };
            f.host.send_tap(target);

            assert!(f.host.is_transitioning());
            assert!(!f.host.is_interactive());
            assert_eq!(f.state(), TransitionState::Idle);

            f.wait(Duration::from_millis(450));
            assert!(!f.host.is_presented(f.sheet.view));
            assert_eq!(f.host.tree().superview(f.overlay()), None);
        }
    }

    #[test]
    fn test_interaction_controller_only_while_dragging() {
        let f = Fixture::presented(None);
        let animator = DismissAnimator::default();
        assert!(f.presenter.interaction_controller_for_dismissal(&animator).is_none());
        assert!(f.presenter.animation_controller_for_dismissed(f.sheet.view).is_some());
    }

    #[test]
    fn test_pointer_drag_on_sheet_commits() {
        let mut f = Fixture::presented(None);
        let press = |f: &mut Fixture, event: PointerEventKind, y: f32| {
            let time = f.clock.now();
            f.host.send_pointer(PointerEvent {
                id: PointerId(7),
                event,
                position: Vec2::new(200.0, y),
                time,
            });
            f.clock.advance(Duration::from_millis(16));
        };

        press(&mut f, PointerEventKind::Down, 500.0);
        press(&mut f, PointerEventKind::Move, 540.0);
        assert!(f.host.is_interactive());
        press(&mut f, PointerEventKind::Move, 740.0);
        assert_eq!(f.presenter.controller().progress(), 0.6);
        press(&mut f, PointerEventKind::Up, 740.0);
        assert_eq!(f.state(), TransitionState::Committing);

        f.wait(Duration::from_millis(300));
        assert!(!f.host.is_presented(f.sheet.view));
    }

    #[test]
    fn test_release_after_screen_dropped_still_resolves() {
        let mut f = Fixture::presented(None);
        f.pan(GesturePhase::Began, 0.0, 500.0);
        f.pan(GesturePhase::Changed, 100.0, 500.0);
        assert!(f.host.is_interactive());

        f.drop_screen();
        f.pan(GesturePhase::Ended, 100.0, 500.0);
        assert_eq!(f.state(), TransitionState::Cancelling);
        assert!(!f.host.is_interactive());

        f.wait(Duration::from_secs(5));
        f.host.settle();
        assert!(!f.host.is_transitioning());
        assert_eq!(f.state(), TransitionState::Idle);
        assert!(f.host.is_presented(f.sheet.view));
    }

    #[test]
    fn test_resize_during_drag_relayouts_when_it_ends() {
        let mut f = Fixture::presented(None);
        f.pan(GesturePhase::Began, 0.0, 500.0);
        f.pan(GesturePhase::Changed, 40.0, 500.0);
        f.host.set_screen_size(Size::new(600.0, 1000.0));
        f.pan(GesturePhase::Ended, 40.0, 500.0);

        f.wait(Duration::from_secs(5));
        assert!(!f.host.is_transitioning());
        assert!(f.host.is_presented(f.sheet.view));
        assert_eq!(f.sheet_frame(), Rect::new(0.0, 500.0, 600.0, 500.0));
        assert_eq!(f.host.tree().frame(f.overlay()), Some(Rect::new(0.0, 0.0, 600.0, 1000.0)));
    }

    #[test]
    fn test_pan_without_screen_is_ignored() {
        let mut f = Fixture::presented(None);
        let unbound = Rc::new(InteractiveDismissController::new(0.3));
        unbound.attach(f.host.tree_mut(), &[f.root]);

        for (phase, ty) in [
            (GesturePhase::Began, 0.0),
            (GesturePhase::Changed, 200.0),
            (GesturePhase::Ended, 200.0),
        ] {
            f.host
                .send_pan(f.root, phase, Vec2::new(0.0, ty), Vec2::new(0.0, 500.0));
            assert_eq!(unbound.state(), TransitionState::Idle);
            assert_eq!(unbound.progress(), 0.0);
        }
        assert!(!f.host.is_transitioning());
        assert!(f.host.is_presented(f.sheet.view));
    }

    #[test]
    fn test_pan_after_screen_dropped_is_ignored() {
        let mut f = Fixture::presented(None);
        f.drop_screen();

        f.pan(GesturePhase::Began, 0.0, 500.0);
        f.pan(GesturePhase::Changed, 200.0, 500.0);
        assert_eq!(f.state(), TransitionState::Idle);
        assert!(!f.host.is_transitioning());
        f.pan(GesturePhase::Ended, 200.0, 500.0);
        assert_eq!(f.state(), TransitionState::Idle);
        assert!(f.host.is_presented(f.sheet.view));
    }

    #[test]
    fn test_set_screen_skips_views_outside_the_tree() {
        let clock = TestClock::default();
        let mut host = ModalHost::with_clock(Size::new(400.0, 800.0), Rc::new(clock));
        let view = host.tree_mut().create(ViewKind::Plain);
        host.tree_mut().remove(view);
        let ghost: Rc<dyn SemiModalScreen> = Rc::new(Sheet { view, height: None });

        let presenter = SemiModalPresenter::new();
        presenter.set_screen(ghost.clone(), &mut host);
        assert!(presenter.screen().is_none());
        assert!(presenter.controller().screen().is_none());
        assert!(presenter.overlay().is_none());
        assert!(presenter.indicator().is_none());
    }

    #[test]
    fn test_no_presentation_controller_before_decorations() {
        let f = Fixture::new(None);
        let fresh = SemiModalPresenter::new();
        assert!(fresh
            .presentation_controller_for(f.sheet.view, Some(f.root), f.root)
            .is_none());
        assert!(f
            .presenter
            .presentation_controller_for(f.sheet.view, Some(f.root), f.root)
            .is_some());
    }

    /// Runs every animation to its end as soon as it is requested.
    struct RunToEnd<'a> {
        tree: &'a mut ViewTree,
        requests: usize,
    }

    impl ViewAnimator for RunToEnd<'_> {
        fn animate(&mut self, _spec: AnimationSpec, changes: Changes, completion: Completion) {
            self.requests += 1;
            changes(self.tree);
            completion(true);
        }
    }

    #[test]
    fn test_dismiss_animator_without_from_view_completes() {
        let mut tree = ViewTree::new();
        let container = tree.create_with_frame(ViewKind::Plain, Rect::new(0.0, 0.0, 400.0, 800.0));
        let ctx = TransitionContext::new(container, None, None, Rect::new(0.0, 0.0, 400.0, 800.0), false);

        let mut animator = RunToEnd {
            tree: &mut tree,
            requests: 0,
        };
        DismissAnimator::default().animate_transition(&ctx, &mut animator);
        assert_eq!(animator.requests, 1);
        assert_eq!(ctx.completion(), Some(true));
        assert_eq!(tree.frame(container), Some(Rect::new(0.0, 0.0, 400.0, 800.0)));
    }
}
