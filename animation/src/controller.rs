use std::{fmt, sync::Arc};

use crate::{Easing, Target, TweenSpec};

type ApplyFn = dyn Fn(&mut dyn Target, f64) + Send + Sync;

/// Applies an animation to a target at a given progress.
///
/// Controllers hold no run state and can be shared between tweens.
#[derive(Clone)]
pub struct Controller {
    apply: Arc<ApplyFn>,
}

impl fmt::Debug for Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller").finish_non_exhaustive()
    }
}

impl Controller {
    pub fn from_fn(apply: impl Fn(&mut dyn Target, f64) + Send + Sync + 'static) -> Self {
        Self {
            apply: Arc::new(apply),
        }
    }

    /// Interpolate all properties of `spec` along `easing`.
    ///
    /// Properties the target does not have are skipped. Field references are resolved on every
    /// application, and a property is skipped if one of its references can not be resolved.
    pub fn from_spec(spec: TweenSpec, easing: impl Easing + 'static) -> Self {
        Self::from_shared_easing(spec, Arc::new(easing))
    }

    pub fn from_shared_easing(spec: TweenSpec, easing: Arc<dyn Easing>) -> Self {
        if let Some(literals) = spec.literals() {
            return Self::from_fn(move |target, k| {
                let t = easing.ease(k);
                for (name, from, to) in &literals {
                    target.set_field(name, from + (to - from) * t);
                }
            });
        }

        Self::from_fn(move |target, k| {
            let t = easing.ease(k);
            for property in spec.properties() {
                if !target.has_field(&property.name) {
                    continue;
                }
                let (Some(from), Some(to)) = (
                    property.from.resolve(&*target),
                    property.to.resolve(&*target),
                ) else {
                    continue;
                };
                target.set_field(&property.name, from + (to - from) * t);
            }
        })
    }

    pub fn apply(&self, target: &mut dyn Target, k: f64) {
        (self.apply)(target, k)
    }
}
