//! # Core model
//!
//! Everything a modal component needs from its host, with no platform attached:
//!
//! - geometry (`Vec2`, `Size`, `Rect`, `Corners`) and `Color`;
//! - an animation clock with easing curves and `AnimatedValue`;
//! - `Signal<T>`, a small observable value used to publish component state;
//! - `ViewTree`, a retained arena of views with hit testing and gesture recognizers;
//! - the modal transition lifecycle traits (`transition` module).
//!
//! ```rust
//! use semimodal_core::*;
//!
//! let progress = signal(0.0f32);
//! progress.set(0.25);
//! progress.update(|v| *v += 0.25);
//! assert_eq!(progress.get(), 0.5);
//! ```

pub mod animation;
pub mod color;
pub mod error;
pub mod geometry;
pub mod input;
pub mod signal;
pub mod tests;
pub mod transition;
pub mod view;

pub use color::*;
pub use error::*;
pub use geometry::*;
pub use input::*;
pub use signal::*;
pub use transition::*;
pub use view::*;
