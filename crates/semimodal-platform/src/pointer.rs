//! Turns raw pointer streams into taps and pans.

use smallvec::SmallVec;
use std::time::Duration;

use semimodal_core::*;
use web_time::Instant;

/// Movement beyond which a press becomes a pan.
pub const DRAG_THRESHOLD: f32 = 8.0;
/// A press shorter and tighter than this is a tap.
pub const TAP_MAX_DURATION: Duration = Duration::from_millis(200);
pub const TAP_MAX_DISTANCE: f32 = 10.0;
/// Only samples this recent contribute to the velocity estimate.
const VELOCITY_HORIZON: Duration = Duration::from_millis(100);

#[derive(Clone, Copy, Debug)]
struct Sample {
    time: Instant,
    position: Vec2,
}

/// A recognizer reached from the hit view, with the view it is attached to.
#[derive(Clone)]
pub(crate) struct Candidate {
    pub view: ViewId,
    pub tag: RecognizerTag,
    pub recognizer: Recognizer,
}

pub(crate) struct Press {
    pub id: PointerId,
    pub start: Sample,
    samples: SmallVec<[Sample; 8]>,
    pub chain: Vec<Candidate>,
    /// Recognizers that accepted the pan, once the slop is exceeded.
    pub panning: Option<Vec<Candidate>>,
}

pub(crate) enum PointerAction {
    None,
    Pan(GesturePhase, Vec<Candidate>, Vec2, Vec2),
    Tap(Candidate),
}

#[derive(Default)]
pub(crate) struct PointerTracker {
    press: Option<Press>,
}

/// Collects recognizers from `hit` up to the root, innermost first.
pub(crate) fn recognizer_chain(tree: &ViewTree, hit: ViewId) -> Vec<Candidate> {
    let mut out = Vec::new();
    let mut cur = Some(hit);
    while let Some(id) = cur {
        if let Some(node) = tree.get(id) {
            for r in node.recognizers() {
                out.push(Candidate {
                    view: id,
                    tag: RecognizerTag {
                        kind: r.kind,
                        view_kind: node.kind,
                    },
                    recognizer: r.clone(),
                });
            }
        }
        cur = tree.superview(id);
    }
    out
}

/// The innermost pan recognizer wins; outer pans join only if either side allows it.
pub(crate) fn pan_participants(chain: &[Candidate]) -> Vec<Candidate> {
    let mut pans = chain.iter().filter(|c| c.tag.kind == RecognizerKind::Pan);
    let Some(primary) = pans.next() else {
        return Vec::new();
    };
    let mut out = vec![primary.clone()];
    for other in pans {
        let allowed = primary
            .recognizer
            .target
            .should_recognize_simultaneously(other.tag)
            || other
                .recognizer
                .target
                .should_recognize_simultaneously(primary.tag);
        if allowed {
            out.push(other.clone());
        }
    }
    out
}

impl PointerTracker {
    pub fn is_pressed(&self) -> bool {
        self.press.is_some()
    }

    pub fn down(&mut self, id: PointerId, position: Vec2, time: Instant, chain: Vec<Candidate>) {
        let start = Sample { time, position };
        let mut samples = SmallVec::new();
        samples.push(start);
        self.press = Some(Press {
            id,
            start,
            samples,
            chain,
            panning: None,
        });
    }

    pub fn handle(&mut self, event: &PointerEvent) -> PointerAction {
        let Some(press) = self.press.as_mut() else {
            return PointerAction::None;
        };
        if press.id != event.id {
            return PointerAction::None;
        }
        let sample = Sample {
            time: event.time,
            position: event.position,
        };
        press.samples.push(sample);
        press
            .samples
            .retain(|s| event.time.saturating_duration_since(s.time) <= VELOCITY_HORIZON);

        let translation = event.position - press.start.position;
        let velocity = press.velocity();

        match event.event {
            PointerEventKind::Down => PointerAction::None,
            PointerEventKind::Move => {
                if let Some(pans) = &press.panning {
                    return PointerAction::Pan(GesturePhase::Changed, pans.clone(), translation, velocity);
                }
                if translation.length() <= DRAG_THRESHOLD {
                    return PointerAction::None;
                }
                let pans = pan_participants(&press.chain);
                if pans.is_empty() {
                    return PointerAction::None;
                }
                press.panning = Some(pans.clone());
                PointerAction::Pan(GesturePhase::Began, pans, translation, velocity)
            }
            PointerEventKind::Up | PointerEventKind::Cancel => {
                let press = self.press.take();
                let Some(press) = press else {
                    return PointerAction::None;
                };
                if let Some(pans) = press.panning {
                    let phase = if event.event == PointerEventKind::Up {
                        GesturePhase::Ended
                    } else {
                        GesturePhase::Cancelled
                    };
                    return PointerAction::Pan(phase, pans, translation, velocity);
                }
                let elapsed = event.time.saturating_duration_since(press.start.time);
                let is_tap = event.event == PointerEventKind::Up
                    && elapsed < TAP_MAX_DURATION
                    && translation.length() < TAP_MAX_DISTANCE;
                if !is_tap {
                    return PointerAction::None;
                }
                press
                    .chain
                    .into_iter()
                    .find(|c| c.tag.kind == RecognizerKind::Tap)
                    .map(PointerAction::Tap)
                    .unwrap_or(PointerAction::None)
            }
        }
    }
}

impl Press {
    fn velocity(&self) -> Vec2 {
        let (Some(first), Some(last)) = (self.samples.first(), self.samples.last()) else {
            return Vec2::ZERO;
        };
        let dt = last.time.saturating_duration_since(first.time).as_secs_f32();
        if dt <= f32::EPSILON {
            return Vec2::ZERO;
        }
        let d = last.position - first.position;
        Vec2::new(d.x / dt, d.y / dt)
    }
}
