//! Easings built from other easings.

use std::{fmt, sync::Arc};

use crate::{Easing, TweenError};

/// Left to right composition of easings.
///
/// `Pipe` of `f1, f2, .., fn` evaluates `fn(..f2(f1(k)))`. An empty pipe is the identity.
#[derive(Clone, Default)]
pub struct Pipe {
    stages: Vec<Arc<dyn Easing>>,
}

impl fmt::Debug for Pipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipe")
            .field("stages", &self.stages.len())
            .finish()
    }
}

impl Pipe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an easing that is applied to the result of all previous ones.
    pub fn then(mut self, easing: impl Easing + 'static) -> Self {
        self.stages.push(Arc::new(easing));
        self
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl FromIterator<Arc<dyn Easing>> for Pipe {
    fn from_iter<I: IntoIterator<Item = Arc<dyn Easing>>>(iter: I) -> Self {
        Self {
            stages: iter.into_iter().collect(),
        }
    }
}

impl Easing for Pipe {
    fn ease(&self, k: f64) -> f64 {
        self.stages.iter().fold(k, |k, stage| stage.ease(k))
    }
}

/// Build a [`Pipe`] from a list of easings, applied left to right.
///
/// ```
/// use tweenery_animation::{pipe, Curve, Easing};
///
/// let there_and_back = pipe![Curve::LinearBack, Curve::CubicIn];
/// assert_eq!(there_and_back.ease(0.5), 1.0);
/// ```
#[macro_export]
macro_rules! pipe {
    ($($easing:expr),* $(,)?) => {
        $crate::Pipe::new()$(.then($easing))*
    };
}

/// A control point of a [`PointEasing`]: at progress `k` the easing yields `t`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Point {
    pub k: f64,
    pub t: f64,
}

impl Point {
    pub const fn new(k: f64, t: f64) -> Self {
        Self { k, t }
    }
}

impl From<(f64, f64)> for Point {
    fn from((k, t): (f64, f64)) -> Self {
        Self { k, t }
    }
}

/// A piecewise linear easing through a sequence of points.
///
/// Progress before the first point yields the first point's `t`, progress at or beyond the last
/// point yields the last point's `t`.
#[derive(Debug, Clone, PartialEq)]
pub struct PointEasing {
    points: Vec<Point>,
}

impl PointEasing {
    /// Points must be ordered by `k`. Equal `k`s are allowed and produce a jump.
    pub fn new<P: Into<Point>>(points: impl IntoIterator<Item = P>) -> Result<Self, TweenError> {
        let points: Vec<Point> = points.into_iter().map(Into::into).collect();
        if points.is_empty() {
            return Err(TweenError::NoPoints);
        }

        if let Some(index) = points
            .iter()
            .position(|p| !p.k.is_finite() || !p.t.is_finite())
        {
            return Err(TweenError::NonFinitePoint { index });
        }

        if let Some(index) = points.windows(2).position(|w| w[1].k < w[0].k) {
            return Err(TweenError::UnorderedPoints {
                index: index + 1,
                previous: points[index].k,
                next: points[index + 1].k,
            });
        }

        Ok(Self { points })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }
}

impl Easing for PointEasing {
    fn ease(&self, k: f64) -> f64 {
        // Index of the first point past `k`.
        let next = self.points.partition_point(|p| k >= p.k);
        if next == 0 {
            return self.points[0].t;
        }
        if next == self.points.len() {
            return self.points[next - 1].t;
        }

        let (a, b) = (self.points[next - 1], self.points[next]);
        b.t + (b.t - a.t) / (b.k - a.k) * (k - b.k)
    }
}

/// Cyclic phase shift of the progress by the fractional part of `d`.
///
/// Meant to be piped in front of another easing.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Shift {
    offset: f64,
}

impl Shift {
    pub fn new(d: f64) -> Self {
        Self {
            offset: d - d.floor(),
        }
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }
}

impl Easing for Shift {
    fn ease(&self, k: f64) -> f64 {
        let k = k - self.offset;
        if k > 0.0 {
            k
        } else {
            k + 1.0
        }
    }
}

/// Scales progress by a constant factor, compressing the easing that follows in a pipe.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mult(pub f64);

impl Easing for Mult {
    fn ease(&self, k: f64) -> f64 {
        k * self.0
    }
}
