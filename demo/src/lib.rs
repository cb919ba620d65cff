//! A sandbox scene that drives a fighter sprite through a small state machine of tweened idle
//! animations.

mod config;
mod demo;
mod runner;
mod sprite;
mod state;

pub use config::*;
pub use demo::*;
pub use runner::*;
pub use sprite::*;
pub use state::*;
