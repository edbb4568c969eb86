//! Headless platform runner for modal screens.
//!
//! `ModalHost` plays the part a mobile UI toolkit plays for a modal component: it
//! owns the view tree, routes pointer input to gesture recognizers, runs the
//! presentation/dismissal lifecycle against `TransitioningDelegate`s, and
//! interpolates animations on every `tick`.

mod defaults;
mod host;
mod pointer;
mod running;

pub use defaults::{FullScreenPresentation, SlideDownAnimator};
pub use host::ModalHost;
pub use pointer::{DRAG_THRESHOLD, TAP_MAX_DISTANCE, TAP_MAX_DURATION};

use semimodal_core::ViewError;

fn log_err(what: &str, result: Result<(), ViewError>) {
    if let Err(e) = result {
        log::warn!("{what} failed: {e}");
    }
}
