use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TweenError {
    #[error("A tween can not run for a zero duration")]
    ZeroDuration,

    #[error("A point easing needs at least one point")]
    NoPoints,

    #[error("Point {index} is not finite")]
    NonFinitePoint { index: usize },

    #[error("Point {index} at k = {next} precedes the previous point at k = {previous}")]
    UnorderedPoints {
        index: usize,
        previous: f64,
        next: f64,
    },

    #[error("Unknown easing curve: `{0}`")]
    UnknownCurve(String),

    #[error("The tween was stopped, destroyed, or restarted before it completed")]
    Cancelled,
}
