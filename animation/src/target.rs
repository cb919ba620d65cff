use std::collections::{BTreeMap, HashMap};

/// An object exposing named numeric fields a tween can write to.
///
/// Unknown names are not an error: `field` returns `None` and `set_field` returns `false` without
/// changing anything.
pub trait Target {
    fn field(&self, name: &str) -> Option<f64>;

    /// Set an existing field. Returns `false` if there is no such field.
    fn set_field(&mut self, name: &str, value: f64) -> bool;

    fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }
}

impl Target for HashMap<String, f64> {
    fn field(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }

    fn set_field(&mut self, name: &str, value: f64) -> bool {
        match self.get_mut(name) {
            Some(field) => {
                *field = value;
                true
            }
            None => false,
        }
    }
}

impl Target for BTreeMap<String, f64> {
    fn field(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }

    fn set_field(&mut self, name: &str, value: f64) -> bool {
        match self.get_mut(name) {
            Some(field) => {
                *field = value;
                true
            }
            None => false,
        }
    }
}
