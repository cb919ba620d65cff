//! Easing curves.
//!
//! An easing maps the linear progress `k` of a tween to an eased progress. Curves are not clamped:
//! elastic and back curves leave `[0, 1]` on purpose.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::TweenError;

/// Anything that reshapes progress.
///
/// Implemented by [`Curve`], the combinators ([`Pipe`](crate::Pipe),
/// [`PointEasing`](crate::PointEasing), [`Shift`](crate::Shift), [`Mult`](crate::Mult)), and every
/// `Fn(f64) -> f64 + Send + Sync`.
pub trait Easing: Send + Sync {
    fn ease(&self, k: f64) -> f64;
}

impl<F> Easing for F
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    fn ease(&self, k: f64) -> f64 {
        self(k)
    }
}

macro_rules! curves {
    ($($variant:ident => $method:ident,)*) => {
        /// The built-in easing curves.
        #[allow(missing_docs)]
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum Curve {
            $($variant,)*
        }

        impl Curve {
            pub const ALL: &'static [Curve] = &[$(Curve::$variant,)*];

            pub fn name(&self) -> &'static str {
                match self {
                    $(Curve::$variant => stringify!($variant),)*
                }
            }

            /// Evaluate this curve at `k`.
            pub fn apply<E: Ease>(self, k: E) -> E {
                match self {
                    $(Curve::$variant => k.$method(),)*
                }
            }
        }
    };
}

curves! {
    Linear => linear,
    Reverse => reverse,
    Cut => cut,
    LinearBack => linear_back,

    QuadraticIn => quadratic_in,
    QuadraticOut => quadratic_out,
    QuadraticInOut => quadratic_in_out,

    CubicIn => cubic_in,
    CubicOut => cubic_out,
    CubicInOut => cubic_in_out,
    CubicInReverse => cubic_in_reverse,

    QuarticIn => quartic_in,
    QuarticOut => quartic_out,
    QuarticInOut => quartic_in_out,
    QuarticInReverse => quartic_in_reverse,

    QuinticIn => quintic_in,
    QuinticOut => quintic_out,
    QuinticInOut => quintic_in_out,

    SinusoidalIn => sinusoidal_in,
    SinusoidalOut => sinusoidal_out,
    SinusoidalInOut => sinusoidal_in_out,

    ExponentialIn => exponential_in,
    ExponentialOut => exponential_out,
    ExponentialInOut => exponential_in_out,

    CircularIn => circular_in,
    CircularOut => circular_out,
    CircularInOut => circular_in_out,

    ElasticIn => elastic_in,
    ElasticOut => elastic_out,
    ElasticInOut => elastic_in_out,

    BackIn => back_in,
    BackOut => back_out,
    BackInOut => back_in_out,

    BounceIn => bounce_in,
    BounceOut => bounce_out,
    BounceInOut => bounce_in_out,
}

impl Default for Curve {
    fn default() -> Self {
        Curve::Linear
    }
}

impl Easing for Curve {
    fn ease(&self, k: f64) -> f64 {
        self.apply(k)
    }
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Curve {
    type Err = TweenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Curve::ALL
            .iter()
            .find(|curve| curve.name() == s)
            .copied()
            .ok_or_else(|| TweenError::UnknownCurve(s.to_owned()))
    }
}

#[allow(missing_docs)]
pub trait Ease: Copy {
    /// Calculate the eased value.
    fn eased(self, curve: Curve) -> Self {
        curve.apply(self)
    }

    fn linear(self) -> Self;
    fn reverse(self) -> Self;
    fn cut(self) -> Self;
    fn linear_back(self) -> Self;

    fn quadratic_in(self) -> Self;
    fn quadratic_out(self) -> Self;
    fn quadratic_in_out(self) -> Self;

    fn cubic_in(self) -> Self;
    fn cubic_out(self) -> Self;
    fn cubic_in_out(self) -> Self;
    fn cubic_in_reverse(self) -> Self;

    fn quartic_in(self) -> Self;
    fn quartic_out(self) -> Self;
    fn quartic_in_out(self) -> Self;
    fn quartic_in_reverse(self) -> Self;

    fn quintic_in(self) -> Self;
    fn quintic_out(self) -> Self;
    fn quintic_in_out(self) -> Self;

    fn sinusoidal_in(self) -> Self;
    fn sinusoidal_out(self) -> Self;
    fn sinusoidal_in_out(self) -> Self;

    fn exponential_in(self) -> Self;
    fn exponential_out(self) -> Self;
    fn exponential_in_out(self) -> Self;

    fn circular_in(self) -> Self;
    fn circular_out(self) -> Self;
    fn circular_in_out(self) -> Self;

    fn elastic_in(self) -> Self;
    fn elastic_out(self) -> Self;
    fn elastic_in_out(self) -> Self;

    fn back_in(self) -> Self;
    fn back_out(self) -> Self;
    fn back_in_out(self) -> Self;

    fn bounce_in(self) -> Self;
    fn bounce_out(self) -> Self;
    fn bounce_in_out(self) -> Self;
}

macro_rules! impl_ease_trait_for {
    ($T: ident) => {
        mod $T {
            pub const BACK_OVERSHOOT: $T = 1.70158;
            pub const BACK_IN_OUT_SCALE: $T = 1.525;

            pub const ELASTIC_AMPLITUDE: $T = 0.1;
            pub const ELASTIC_PERIOD: $T = 0.4;

            pub const BOUNCE_STRETCH: $T = 2.75;
            pub const BOUNCE_FACTOR: $T = 7.5625;

            /// The effective amplitude and phase offset of the elastic curves.
            ///
            /// Amplitudes below 1 are raised to 1.
            pub fn elastic_shape() -> ($T, $T) {
                use std::$T::consts::PI;
                if ELASTIC_AMPLITUDE < 1.0 {
                    (1.0, ELASTIC_PERIOD / 4.0)
                } else {
                    let s = ELASTIC_PERIOD * (1.0 / ELASTIC_AMPLITUDE).asin() / (2.0 * PI);
                    (ELASTIC_AMPLITUDE, s)
                }
            }

            /// The damped sine shared by all elastic curves.
            pub fn elastic_wave(k: $T, decay: $T) -> $T {
                use std::$T::consts::PI;
                let (a, s) = elastic_shape();
                a * (2.0 as $T).powf(decay * k) * ((k - s) * (2.0 * PI) / ELASTIC_PERIOD).sin()
            }
        }

        impl Ease for $T {
            fn linear(self) -> Self {
                self
            }

            fn reverse(self) -> Self {
                1.0 - self
            }

            fn cut(self) -> Self {
                self.clamp(0.0, 1.0)
            }

            fn linear_back(self) -> Self {
                if self < 0.5 {
                    2.0 * self
                } else {
                    -2.0 * self + 2.0
                }
            }

            fn quadratic_in(self) -> Self {
                self * self
            }

            fn quadratic_out(self) -> Self {
                self * (2.0 - self)
            }

            fn quadratic_in_out(self) -> Self {
                let k = self * 2.0;
                if k < 1.0 {
                    return 0.5 * k * k;
                }
                let k = k - 1.0;
                -0.5 * (k * (k - 2.0) - 1.0)
            }

            fn cubic_in(self) -> Self {
                self * self * self
            }

            fn cubic_out(self) -> Self {
                let k = self - 1.0;
                k * k * k + 1.0
            }

            fn cubic_in_out(self) -> Self {
                let k = self * 2.0;
                if k < 1.0 {
                    return 0.5 * k * k * k;
                }
                let k = k - 2.0;
                0.5 * (k * k * k + 2.0)
            }

            fn cubic_in_reverse(self) -> Self {
                if self * 2.0 < 1.0 {
                    (self * 2.0).cubic_in()
                } else {
                    ((1.0 - self) * 2.0).cubic_in()
                }
            }

            fn quartic_in(self) -> Self {
                self * self * self * self
            }

            fn quartic_out(self) -> Self {
                let k = self - 1.0;
                1.0 - k * k * k * k
            }

            fn quartic_in_out(self) -> Self {
                let k = self * 2.0;
                if k < 1.0 {
                    return 0.5 * k * k * k * k;
                }
                let k = k - 2.0;
                -0.5 * (k * k * k * k - 2.0)
            }

            fn quartic_in_reverse(self) -> Self {
                if self * 2.0 < 1.0 {
                    (self * 2.0).quartic_in()
                } else {
                    ((1.0 - self) * 2.0).quartic_in()
                }
            }

            fn quintic_in(self) -> Self {
                self * self * self * self * self
            }

            fn quintic_out(self) -> Self {
                let k = self - 1.0;
                k * k * k * k * k + 1.0
            }

            fn quintic_in_out(self) -> Self {
                let k = self * 2.0;
                if k < 1.0 {
                    return 0.5 * k * k * k * k * k;
                }
                let k = k - 2.0;
                0.5 * (k * k * k * k * k + 2.0)
            }

            fn sinusoidal_in(self) -> Self {
                use std::$T::consts::FRAC_PI_2;
                if self == 0.0 || self == 1.0 {
                    return self;
                }
                1.0 - (self * FRAC_PI_2).cos()
            }

            fn sinusoidal_out(self) -> Self {
                use std::$T::consts::FRAC_PI_2;
                if self == 0.0 || self == 1.0 {
                    return self;
                }
                (self * FRAC_PI_2).sin()
            }

            fn sinusoidal_in_out(self) -> Self {
                use std::$T::consts::PI;
                if self == 0.0 || self == 1.0 {
                    return self;
                }
                0.5 * (1.0 - (PI * self).cos())
            }

            fn exponential_in(self) -> Self {
                if self == 0.0 || self == 1.0 {
                    return self;
                }
                (1024.0 as $T).powf(self - 1.0)
            }

            fn exponential_out(self) -> Self {
                if self == 0.0 || self == 1.0 {
                    return self;
                }
                1.0 - (2.0 as $T).powf(-10.0 * self)
            }

            fn exponential_in_out(self) -> Self {
                if self == 0.0 || self == 1.0 {
                    return self;
                }
                let k = self * 2.0;
                if k < 1.0 {
                    return 0.5 * (1024.0 as $T).powf(k - 1.0);
                }
                0.5 * (-(2.0 as $T).powf(-10.0 * (k - 1.0)) + 2.0)
            }

            fn circular_in(self) -> Self {
                1.0 - (1.0 - self * self).sqrt()
            }

            fn circular_out(self) -> Self {
                let k = self - 1.0;
                (1.0 - k * k).sqrt()
            }

            fn circular_in_out(self) -> Self {
                let k = self * 2.0;
                if k < 1.0 {
                    return -0.5 * ((1.0 - k * k).sqrt() - 1.0);
                }
                let k = k - 2.0;
                0.5 * ((1.0 - k * k).sqrt() + 1.0)
            }

            fn elastic_in(self) -> Self {
                if self == 0.0 || self == 1.0 {
                    return self;
                }
                -$T::elastic_wave(self - 1.0, 10.0)
            }

            fn elastic_out(self) -> Self {
                if self == 0.0 || self == 1.0 {
                    return self;
                }
                $T::elastic_wave(self, -10.0) + 1.0
            }

            fn elastic_in_out(self) -> Self {
                if self == 0.0 || self == 1.0 {
                    return self;
                }
                let k = self * 2.0 - 1.0;
                if k < 0.0 {
                    -0.5 * $T::elastic_wave(k, 10.0)
                } else {
                    0.5 * $T::elastic_wave(k, -10.0) + 1.0
                }
            }

            fn back_in(self) -> Self {
                let s = $T::BACK_OVERSHOOT;
                self * self * ((s + 1.0) * self - s)
            }

            fn back_out(self) -> Self {
                let s = $T::BACK_OVERSHOOT;
                let k = self - 1.0;
                k * k * ((s + 1.0) * k + s) + 1.0
            }

            fn back_in_out(self) -> Self {
                let s = $T::BACK_OVERSHOOT * $T::BACK_IN_OUT_SCALE;
                let k = self * 2.0;
                if k < 1.0 {
                    return 0.5 * (k * k * ((s + 1.0) * k - s));
                }
                let k = k - 2.0;
                0.5 * (k * k * ((s + 1.0) * k + s) + 2.0)
            }

            fn bounce_in(self) -> Self {
                1.0 - (1.0 - self).bounce_out()
            }

            fn bounce_out(self) -> Self {
                use self::$T::{BOUNCE_FACTOR, BOUNCE_STRETCH};
                let k = self;
                if k < 1.0 / BOUNCE_STRETCH {
                    BOUNCE_FACTOR * k * k
                } else if k < 2.0 / BOUNCE_STRETCH {
                    let k = k - 1.5 / BOUNCE_STRETCH;
                    BOUNCE_FACTOR * k * k + 0.75
                } else if k < 2.5 / BOUNCE_STRETCH {
                    let k = k - 2.25 / BOUNCE_STRETCH;
                    BOUNCE_FACTOR * k * k + 0.9375
                } else {
                    let k = k - 2.625 / BOUNCE_STRETCH;
                    BOUNCE_FACTOR * k * k + 0.984375
                }
            }

            fn bounce_in_out(self) -> Self {
                if self < 0.5 {
                    (self * 2.0).bounce_in() * 0.5
                } else {
                    (self * 2.0 - 1.0).bounce_out() * 0.5 + 0.5
                }
            }
        }
    };
}

impl_ease_trait_for!(f32);
impl_ease_trait_for!(f64);
