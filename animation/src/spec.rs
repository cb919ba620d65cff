use serde::{Deserialize, Deserializer, Serialize};

use crate::Target;

/// One end of a property's interpolation.
///
/// Strings that parse as a finite number are literals, `"0"` is the same as `0`. Any other string
/// names a field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Endpoint {
    /// A literal value.
    Value(f64),
    /// The current value of another field of the same target, read on every tick.
    Field(String),
}

impl Endpoint {
    /// The literal value, if this endpoint does not refer to a field.
    pub fn value(&self) -> Option<f64> {
        match self {
            Endpoint::Value(value) => Some(*value),
            Endpoint::Field(_) => None,
        }
    }

    pub fn resolve(&self, target: &dyn Target) -> Option<f64> {
        match self {
            Endpoint::Value(value) => Some(*value),
            Endpoint::Field(name) => target.field(name),
        }
    }
}

impl From<f64> for Endpoint {
    fn from(value: f64) -> Self {
        Endpoint::Value(value)
    }
}

impl From<f32> for Endpoint {
    fn from(value: f32) -> Self {
        Endpoint::Value(value.into())
    }
}

impl From<i32> for Endpoint {
    fn from(value: i32) -> Self {
        Endpoint::Value(value.into())
    }
}

impl From<&str> for Endpoint {
    fn from(field: &str) -> Self {
        match parse_literal(field) {
            Some(value) => Endpoint::Value(value),
            None => Endpoint::Field(field.to_owned()),
        }
    }
}

impl From<String> for Endpoint {
    fn from(field: String) -> Self {
        match parse_literal(&field) {
            Some(value) => Endpoint::Value(value),
            None => Endpoint::Field(field),
        }
    }
}

fn parse_literal(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

impl<'de> Deserialize<'de> for Endpoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Value(f64),
            Field(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Value(value) => Endpoint::Value(value),
            Raw::Field(field) => field.into(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    pub from: Endpoint,
    pub to: Endpoint,
}

/// The properties a tween interpolates, in the order they are written.
///
/// ```
/// use tweenery_animation::TweenSpec;
///
/// let spec = TweenSpec::new()
///     .property("x", 0.0, 100.0)
///     .property("y", "base_y", 400.0);
/// assert!(!spec.is_simple());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TweenSpec {
    properties: Vec<Property>,
}

impl TweenSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn property(
        mut self,
        name: impl Into<String>,
        from: impl Into<Endpoint>,
        to: impl Into<Endpoint>,
    ) -> Self {
        self.properties.push(Property {
            name: name.into(),
            from: from.into(),
            to: to.into(),
        });
        self
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// `true` if no endpoint refers to a field.
    pub fn is_simple(&self) -> bool {
        self.properties
            .iter()
            .all(|p| p.from.value().is_some() && p.to.value().is_some())
    }

    /// The literal endpoints of all properties, or `None` if the spec is not simple.
    pub(crate) fn literals(&self) -> Option<Vec<(String, f64, f64)>> {
        self.properties
            .iter()
            .map(|p| Some((p.name.clone(), p.from.value()?, p.to.value()?)))
            .collect()
    }
}

impl<N: Into<String>, F: Into<Endpoint>, T: Into<Endpoint>> FromIterator<(N, F, T)> for TweenSpec {
    fn from_iter<I: IntoIterator<Item = (N, F, T)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(TweenSpec::new(), |spec, (name, from, to)| {
                spec.property(name, from, to)
            })
    }
}

mod serde_impl {
    use std::fmt;

    use serde::{
        de::{MapAccess, Visitor},
        ser::SerializeMap,
        Deserialize, Deserializer, Serialize, Serializer,
    };

    use super::{Endpoint, TweenSpec};

    /// Serialized as a map from property name to `[from, to]`.
    impl Serialize for TweenSpec {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(self.properties.len()))?;
            for property in &self.properties {
                map.serialize_entry(&property.name, &[&property.from, &property.to])?;
            }
            map.end()
        }
    }

    impl<'de> Deserialize<'de> for TweenSpec {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            struct SpecVisitor;

            impl<'de> Visitor<'de> for SpecVisitor {
                type Value = TweenSpec;

                fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                    f.write_str("a map of property names to [from, to] pairs")
                }

                fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<TweenSpec, A::Error> {
                    let mut spec = TweenSpec::new();
                    while let Some((name, [from, to])) = map.next_entry::<String, [Endpoint; 2]>()? {
                        spec = spec.property(name, from, to);
                    }
                    Ok(spec)
                }
            }

            deserializer.deserialize_map(SpecVisitor)
        }
    }
}
