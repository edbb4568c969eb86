use std::rc::Rc;
use web_time::Instant;

use crate::transition::HostContext;
use crate::{Vec2, ViewId, ViewKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PointerId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEventKind {
    Down,
    Move,
    Up,
    Cancel,
}

#[derive(Clone, Debug)]
pub struct PointerEvent {
    pub id: PointerId,
    pub event: PointerEventKind,
    /// Window coordinates.
    pub position: Vec2,
    pub time: Instant,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GesturePhase {
    Began,
    Changed,
    Ended,
    Cancelled,
}

/// A continuous drag as delivered by the host's pan recognizer.
#[derive(Clone, Copy, Debug)]
pub struct PanGesture {
    pub phase: GesturePhase,
    /// Offset from the touch-down point, window space.
    pub translation: Vec2,
    /// Points per second, window space.
    pub velocity: Vec2,
    /// The view the recognizer is attached to.
    pub view: ViewId,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecognizerKind {
    Pan,
    Tap,
}

/// What a recognizer is and what kind of view carries it. Enough to decide
/// gesture conflicts without inspecting concrete types.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecognizerTag {
    pub kind: RecognizerKind,
    pub view_kind: ViewKind,
}

/// Receives recognized gestures. All methods run on the UI thread with the host
/// passed in, so handlers may mutate views or request transitions.
pub trait GestureTarget {
    fn on_pan(&self, _gesture: &PanGesture, _host: &mut dyn HostContext) {}

    fn on_tap(&self, _view: ViewId, _host: &mut dyn HostContext) {}

    /// Whether this target's recognizer may run together with `other`.
    fn should_recognize_simultaneously(&self, _other: RecognizerTag) -> bool {
        false
    }
}

#[derive(Clone)]
pub struct Recognizer {
    pub kind: RecognizerKind,
    pub target: Rc<dyn GestureTarget>,
}

impl Recognizer {
    pub fn pan(target: Rc<dyn GestureTarget>) -> Self {
        Self {
            kind: RecognizerKind::Pan,
            target,
        }
    }

    pub fn tap(target: Rc<dyn GestureTarget>) -> Self {
        Self {
            kind: RecognizerKind::Tap,
            target,
        }
    }
}
