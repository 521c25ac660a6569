use serde_json::{Map, Value};

use super::parser::PathSegment;

/// Read the value at `segments` inside `root`.
///
/// Returns `None` as soon as a segment cannot be resolved: a `Key` segment
/// against a non-object, an `Index` segment against a non-array, or an index
/// past the end. A stored `null` at the end of the path is
/// `Some(&Value::Null)`, which keeps "absent" and "present but null"
/// distinguishable.
pub fn get<'a>(root: &'a Value, segments: &[PathSegment]) -> Option<&'a Value> {
    let mut node = root;
    for segment in segments {
        node = match segment {
            PathSegment::Key(name) => node.as_object()?.get(name)?,
            PathSegment::Index(index) => node.as_array()?.get(*index)?,
        };
    }
    Some(node)
}

/// Store `value` at `segments` inside `root`, creating intermediate
/// containers as needed.
///
/// The container created at each step is inferred from the segment kind:
/// objects for keys, arrays for indices. Indexing past the end of an array
/// pads the intervening slots with empty objects. An existing value of the
/// wrong kind along the way is replaced with a fresh container; clobbering
/// malformed intermediate data is the intended behavior, not an error.
pub fn set(root: &mut Value, segments: &[PathSegment], value: Value) {
    let mut node = root;
    for segment in segments {
        node = descend(node, segment);
    }
    *node = value;
}

/// Walk one segment, coercing `node` to the container kind the segment
/// demands and returning the slot it addresses.
fn descend<'a>(node: &'a mut Value, segment: &PathSegment) -> &'a mut Value {
    match segment {
        PathSegment::Key(name) => {
            if !matches!(node, Value::Object(_)) {
                *node = Value::Object(Map::new());
            }
            match node {
                Value::Object(map) => map.entry(name.clone()).or_insert(Value::Null),
                _ => unreachable!(),
            }
        }
        PathSegment::Index(index) => {
            if !matches!(node, Value::Array(_)) {
                *node = Value::Array(Vec::new());
            }
            match node {
                Value::Array(items) => {
                    while items.len() <= *index {
                        items.push(Value::Object(Map::new()));
                    }
                    &mut items[*index]
                }
                _ => unreachable!(),
            }
        }
    }
}
