#[cfg(test)]
mod tests {
    use crate::animation::*;
    use crate::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;
    use web_time::Instant;

    #[test]
    fn test_signal_basic() {
        let sig = signal(42);
        assert_eq!(sig.get(), 42);

        sig.set(100);
        assert_eq!(sig.get(), 100);

        sig.update(|v| *v += 1);
        assert_eq!(sig.get(), 101);
    }

    #[test]
    fn test_signal_subscriber_may_read() {
        let sig = signal(0);
        let seen = Rc::new(RefCell::new(Vec::new()));

        let seen_clone = seen.clone();
        let sig_clone = sig.clone();
        sig.subscribe(move |v| {
            seen_clone.borrow_mut().push((*v, sig_clone.get()));
        });

        sig.set(7);
        assert_eq!(*seen.borrow(), vec![(7, 7)]);
    }

    #[test]
    fn test_color_from_hex() {
        let c = Color::from_hex("#FF5733");
        assert_eq!(c, Color(255, 87, 51, 255));

        let c_alpha = Color::from_hex("#FF5733AA");
        assert_eq!(c_alpha, Color(255, 87, 51, 170));
    }

    #[test]
    fn test_rect_contains() {
        let rect = Rect {
            x: 10.0,
            y: 10.0,
            w: 100.0,
            h: 50.0,
        };

        assert!(rect.contains(Vec2 { x: 50.0, y: 30.0 }));
        assert!(!rect.contains(Vec2 { x: 5.0, y: 30.0 }));
        assert!(!rect.contains(Vec2 { x: 50.0, y: 70.0 }));
    }

    #[test]
    fn test_rect_center_y() {
        let r = Rect::new(0.0, 400.0, 400.0, 400.0);
        assert_eq!(r.center().y, 600.0);
        assert_eq!(r.with_center_y(1000.0).y, 800.0);
    }

    #[test]
    fn test_animation_deterministic() {
        let clock = TestClock::new(Instant::now());

        let mut a = AnimatedValue::new(
            0.0f32,
            AnimationSpec::tween(Duration::from_millis(1000), Easing::Linear),
        );
        a.set_target(10.0, clock.now());

        clock.advance(Duration::from_millis(250));
        assert!(a.update(clock.now()));
        assert!((*a.get() - 2.5).abs() < 0.01);

        clock.advance(Duration::from_millis(750));
        let cont = a.update(clock.now());
        assert!(!cont);
        assert!((*a.get() - 10.0).abs() < 0.001);
    }

    #[test]
    fn test_ease_in_out_is_symmetric() {
        let e = Easing::EaseInOut;
        assert_eq!(e.interpolate(0.0), 0.0);
        assert_eq!(e.interpolate(0.5), 0.5);
        assert_eq!(e.interpolate(1.0), 1.0);
        assert!((e.interpolate(0.25) + e.interpolate(0.75) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_view_tree_insert_and_order() {
        let mut tree = ViewTree::new();
        let root = tree.create(ViewKind::Plain);
        let a = tree.create(ViewKind::Plain);
        let b = tree.create(ViewKind::Plain);

        tree.add_subview(root, a).unwrap();
        tree.insert_subview(root, b, 0).unwrap();
        assert_eq!(tree.subviews(root), &[b, a]);

        // re-adding moves to front without duplicating
        tree.add_subview(root, b).unwrap();
        assert_eq!(tree.subviews(root), &[a, b]);
        assert_eq!(tree.superview(b), Some(root));

        tree.remove_from_superview(a).unwrap();
        assert_eq!(tree.subviews(root), &[b]);
        assert_eq!(tree.superview(a), None);
        assert!(tree.contains(a));
    }

    #[test]
    fn test_view_tree_rejects_cycles() {
        let mut tree = ViewTree::new();
        let parent = tree.create(ViewKind::Plain);
        let child = tree.create(ViewKind::Plain);
        tree.add_subview(parent, child).unwrap();

        assert_eq!(
            tree.add_subview(child, parent),
            Err(ViewError::Cycle {
                parent: child,
                child: parent
            })
        );
    }

    #[test]
    fn test_view_tree_remove_subtree() {
        let mut tree = ViewTree::new();
        let root = tree.create(ViewKind::Plain);
        let mid = tree.create(ViewKind::Plain);
        let leaf = tree.create(ViewKind::Plain);
        tree.add_subview(root, mid).unwrap();
        tree.add_subview(mid, leaf).unwrap();

        tree.remove(mid);
        assert!(!tree.contains(mid));
        assert!(!tree.contains(leaf));
        assert!(tree.subviews(root).is_empty());
        assert_eq!(
            tree.set_alpha(leaf, 0.5),
            Err(ViewError::UnknownView(leaf))
        );
    }

    #[test]
    fn test_hit_test_outside_parent_bounds_and_alpha() {
        let mut tree = ViewTree::new();
        let root = tree.create_with_frame(ViewKind::Plain, Rect::new(0.0, 0.0, 400.0, 800.0));
        let sheet = tree.create_with_frame(ViewKind::Plain, Rect::new(0.0, 400.0, 400.0, 400.0));
        let handle = tree.create_with_frame(ViewKind::Plain, Rect::new(170.0, -16.0, 60.0, 8.0));
        tree.add_subview(root, sheet).unwrap();
        tree.add_subview(sheet, handle).unwrap();

        assert_eq!(tree.hit_test(root, Vec2::new(200.0, 388.0)), Some(handle));
        assert_eq!(
            tree.window_frame(handle),
            Some(Rect::new(170.0, 384.0, 60.0, 8.0))
        );

        tree.get_mut(sheet).unwrap().clips_to_bounds = true;
        assert_eq!(tree.hit_test(root, Vec2::new(200.0, 388.0)), Some(root));

        tree.set_alpha(sheet, 0.0).unwrap();
        assert_eq!(tree.hit_test(root, Vec2::new(200.0, 600.0)), Some(root));
    }

    #[test]
    fn test_percent_driven_ignores_input_while_unbound() {
        let t = PercentDrivenTransition::new();
        t.update(0.5);
        t.finish();
        assert_eq!(t.percent_complete(), 0.0);
        assert_eq!(t.resolution(), None);

        t.bind();
        t.update(1.5);
        assert_eq!(t.percent_complete(), 1.0);
        t.cancel();
        t.finish();
        assert_eq!(t.resolution(), Some(Resolution::Cancel));
        // resolved transitions no longer scrub
        t.update(0.2);
        assert_eq!(t.percent_complete(), 1.0);

        t.unbind();
        assert!(!t.is_bound());
        assert_eq!(t.percent_complete(), 0.0);
    }

    #[test]
    fn test_transition_context_completes_once() {
        let mut tree = ViewTree::new();
        let container = tree.create(ViewKind::Plain);
        let ctx = TransitionContext::new(container, None, None, Rect::ZERO, false);
        let shared = ctx.clone();

        shared.complete_transition(true);
        ctx.complete_transition(false);
        assert_eq!(ctx.completion(), Some(true));
        assert_eq!(ctx.view(TransitionViewKey::From), None);
    }
}
