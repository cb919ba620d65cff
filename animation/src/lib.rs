//! Time driven interpolation of numeric target fields.
//!
//! A [`Tween`] owns a set of [`Controller`]s and weak references to a set of [`Target`]s. Every
//! [`update`](Tween::update) advances its timer and applies each controller to each target at the
//! current progress, shaped by an [`Easing`].

mod combinators;
mod completion;
mod controller;
mod easing;
mod error;
mod spec;
mod target;
mod tickery;
mod tween;

pub use combinators::*;
pub use completion::*;
pub use controller::*;
pub use easing::*;
pub use error::*;
pub use spec::*;
pub use target::*;
pub use tickery::*;
pub use tween::*;

pub mod time {
    #[cfg(not(target_arch = "wasm32"))]
    pub use std::time::Instant;
    #[cfg(target_arch = "wasm32")]
    pub use web_time::Instant;
}
