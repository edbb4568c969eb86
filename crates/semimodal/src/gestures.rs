//! Pure drag-to-dismiss math, kept free of views so it can be checked directly.

use semimodal_core::*;

/// Reads a pan relative to the view whose height the drag is measured against.
pub struct GestureSampler<'a> {
    tree: &'a ViewTree,
    reference: ViewId,
}

impl<'a> GestureSampler<'a> {
    pub fn new(tree: &'a ViewTree, reference: ViewId) -> Self {
        Self { tree, reference }
    }

    // Window and view spaces differ only by an offset, so vectors carry over as is.
    pub fn translation(&self, gesture: &PanGesture) -> Vec2 {
        gesture.translation
    }

    pub fn velocity(&self, gesture: &PanGesture) -> Vec2 {
        gesture.velocity
    }

    pub fn reference_height(&self) -> Option<f32> {
        self.tree
            .bounds(self.reference)
            .map(|b| b.h)
            .filter(|h| *h > 0.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GestureDirection {
    #[default]
    Up,
    Down,
}

impl GestureDirection {
    /// Zero vertical velocity counts as `Up`.
    pub fn from_velocity(velocity: Vec2) -> Self {
        if velocity.y <= 0.0 {
            GestureDirection::Up
        } else {
            GestureDirection::Down
        }
    }
}

/// Progress of a drag of `translation_y` over a sheet `height` points tall.
///
/// Downward drags map to `[0, 1]`.
///
/// For an `Up` gesture the value is only floored at `-1` before negation, so real
/// upward movement yields a positive number and moving back down yields a
/// negative one. Neither is used: no dismissal is started for an `Up` gesture,
/// the percent-driven transition stays unbound and drops the update.
pub fn dismissal_progress(direction: GestureDirection, translation_y: f32, height: f32) -> f32 {
    if height <= 0.0 {
        return 0.0;
    }
    let raw = translation_y / height;
    match direction {
        GestureDirection::Down => raw.clamp(0.0, 1.0),
        GestureDirection::Up => -(raw.max(-1.0)),
    }
}

/// How a released drag resolves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Release {
    /// Finish the dismissal, animating at `rate` of normal speed.
    Commit { rate: f32 },
    /// Reverse back to presented.
    Cancel { rate: f32 },
}

/// Progress strictly beyond `threshold` commits; the threshold itself cancels.
pub fn release_decision(progress: f32, threshold: f32) -> Release {
    if progress > threshold {
        Release::Commit {
            rate: 1.0 - threshold,
        }
    } else {
        Release::Cancel { rate: threshold }
    }
}

/// The dismiss drag may run together with a scroll view's own pan and nothing else.
pub fn allows_simultaneous_recognition(other: RecognizerTag) -> bool {
    other.kind == RecognizerKind::Pan && other.view_kind == ViewKind::Scroll
}
