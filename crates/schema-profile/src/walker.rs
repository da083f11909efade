//! Document walking.
//!
//! Derives dotted/bracketed key paths from a parsed JSON document and
//! feeds scalar leaves to the counter and sampler. Object keys join with
//! `.`, array traversal appends a `[]` segment, so an object inside an
//! array at key `a` contributes paths like `a[].c` and a scalar element
//! lands at literally `a[]`.
//!
//! Traversal uses an explicit work stack rather than recursion, so
//! adversarial nesting depth grows the heap, not the call stack. Children
//! are pushed in reverse: array elements are the only way one document
//! produces several values at the same path, and they must arrive at the
//! reservoir in document order.

use serde_json::{Map, Value};
use tracing::trace;

use crate::counter::PathCounter;
use crate::reservoir::ReservoirSampler;
use crate::value::ScalarValue;

/// Walk one parsed document, updating `counter` and `sampler` in place.
///
/// `prefix` is empty at the root call; a non-empty prefix profiles the
/// document as a subtree rooted at that path. A root that is not an
/// object is a deliberate no-op, not an error, so atypical top-level
/// documents never abort the pass.
pub fn walk(
    value: &Value,
    counter: &mut PathCounter,
    sampler: &mut ReservoirSampler,
    prefix: &str,
) {
    let Value::Object(map) = value else {
        trace!(kind = json_kind(value), "non-object root skipped");
        return;
    };

    let mut stack: Vec<(String, &Value)> = Vec::new();
    push_keys(map, prefix, counter, &mut stack);

    while let Some((path, value)) = stack.pop() {
        match value {
            Value::Object(map) => {
                let child_prefix = format!("{path}.");
                push_keys(map, &child_prefix, counter, &mut stack);
            }
            Value::Array(items) => {
                let elem_path = format!("{path}[]");
                for item in items.iter().rev() {
                    stack.push((elem_path.clone(), item));
                }
            }
            leaf => {
                if let Some(scalar) = ScalarValue::from_json(leaf) {
                    sampler.add(&path, scalar);
                }
            }
        }
    }
}

/// Count every key of `map` and queue its children, in reverse so the
/// stack pops them in document order.
fn push_keys<'a>(
    map: &'a Map<String, Value>,
    prefix: &str,
    counter: &mut PathCounter,
    stack: &mut Vec<(String, &'a Value)>,
) {
    for (key, child) in map.iter().rev() {
        let child_path = format!("{prefix}{key}");
        counter.increment(&child_path);
        stack.push((child_path, child));
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
