//! # Semi-modal sheets
//!
//! Presents a screen as a bottom-anchored sheet over a dimmed backdrop. The sheet
//! can be dismissed by tapping the backdrop or the drag handle, or by dragging it
//! down; a drag released short of the completion threshold snaps back.
//!
//! ```rust,ignore
//! let presenter = SemiModalPresenter::new();
//! presenter.set_screen(modal.clone(), &mut host);
//! presenter.present_over(main_view, &mut host);
//! ```
//!
//! The presenter plugs into any host implementing `HostContext` through the
//! `TransitioningDelegate` family of traits from `semimodal-core`.

mod config;
mod decorations;
mod dismiss_animator;
pub mod gestures;
mod interactive;
mod presentation;
mod presenter;
pub mod tests;

pub use config::{ConfigError, SemiModalConfig};
pub use decorations::{IndicatorView, OverlayView};
pub use dismiss_animator::DismissAnimator;
pub use gestures::{GestureDirection, GestureSampler, Release};
pub use interactive::{InteractiveDismissController, TransitionState};
pub use presentation::PresentationLayoutController;
pub use presenter::{SemiModalPresenter, SemiModalScreen, SemiModalSizing};
