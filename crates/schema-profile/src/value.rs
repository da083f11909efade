//! Scalar value model at the sampling boundary.
//!
//! The walker only ever hands scalar leaves to the sampler, so sampling
//! works on a closed variant instead of carrying full `serde_json::Value`
//! trees around. Each variant serializes back to the plain JSON scalar it
//! came from.

use serde::Serialize;

/// A sampled JSON scalar.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl ScalarValue {
    /// Convert a scalar leaf. Containers (objects, arrays) return `None`.
    ///
    /// Integers outside the `i64` range fall back to the float variant.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Null => Some(Self::Null),
            serde_json::Value::Bool(b) => Some(Self::Bool(*b)),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(Self::Int(i))
                } else {
                    n.as_f64().map(Self::Float)
                }
            }
            serde_json::Value::String(s) => Some(Self::Str(s.clone())),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                None
            }
        }
    }

    /// Kinds eligible for the unique-example list. Null is sampled into
    /// the duplicate reservoir but never tracked as a unique example.
    pub fn is_unique_eligible(&self) -> bool {
        !matches!(self, Self::Null)
    }

    /// Short kind name for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
        }
    }
}

// Floats compare by bit pattern so set membership stays coherent; JSON
// input never produces NaN.
impl PartialEq for ScalarValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Str(a), Self::Str(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for ScalarValue {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn converts_scalar_leaves() {
        assert_eq!(
            ScalarValue::from_json(&json!(null)),
            Some(ScalarValue::Null)
        );
        assert_eq!(
            ScalarValue::from_json(&json!(true)),
            Some(ScalarValue::Bool(true))
        );
        assert_eq!(
            ScalarValue::from_json(&json!(42)),
            Some(ScalarValue::Int(42))
        );
        assert_eq!(
            ScalarValue::from_json(&json!(1.5)),
            Some(ScalarValue::Float(1.5))
        );
        assert_eq!(
            ScalarValue::from_json(&json!("hi")),
            Some(ScalarValue::Str("hi".into()))
        );
    }

    #[test]
    fn rejects_containers() {
        assert_eq!(ScalarValue::from_json(&json!([1, 2])), None);
        assert_eq!(ScalarValue::from_json(&json!({"a": 1})), None);
    }

    #[test]
    fn huge_unsigned_becomes_float() {
        let v = ScalarValue::from_json(&json!(u64::MAX)).unwrap();
        assert!(matches!(v, ScalarValue::Float(_)));
    }

    #[test]
    fn null_is_not_unique_eligible() {
        assert!(!ScalarValue::Null.is_unique_eligible());
        assert!(ScalarValue::Bool(false).is_unique_eligible());
        assert!(ScalarValue::Str("x".into()).is_unique_eligible());
    }

    #[test]
    fn serializes_as_plain_scalars() {
        let vals = vec![
            ScalarValue::Null,
            ScalarValue::Bool(true),
            ScalarValue::Int(-7),
            ScalarValue::Float(2.5),
            ScalarValue::Str("s".into()),
        ];
        let json = serde_json::to_string(&vals).unwrap();
        assert_eq!(json, r#"[null,true,-7,2.5,"s"]"#);
    }

    #[test]
    fn int_and_float_are_distinct_members() {
        assert_ne!(ScalarValue::Int(1), ScalarValue::Float(1.0));
    }
}
