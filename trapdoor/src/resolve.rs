//! Candidate resolution: narrow a component's declared methods down to
//! exactly one executable target.
//!
//! Resolution is purely structural. It looks at method names, the
//! optional explicit parameter-type hint, and the payload's arity, never
//! at argument values. A zero-parameter method is therefore selectable
//! even against a non-empty payload; that mismatch is reported later, at
//! coercion time.

use serde_json::Value;

use crate::error::{BridgeError, BridgeResult};
use crate::method::MethodDescriptor;
use crate::registry::Component;

/// Structural shape of the request payload, as far as it is inferable
/// without decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// Absent or JSON null: no arguments.
    Empty,
    /// A single bare scalar value.
    Single,
    /// A JSON array of n positional values.
    Positional(usize),
    /// A JSON object of n name-keyed values.
    Keyed(usize),
}

impl PayloadShape {
    pub fn of(payload: Option<&Value>) -> Self {
        match payload {
            None | Some(Value::Null) => PayloadShape::Empty,
            Some(Value::Array(items)) => PayloadShape::Positional(items.len()),
            Some(Value::Object(map)) => PayloadShape::Keyed(map.len()),
            Some(_) => PayloadShape::Single,
        }
    }

    /// Argument count implied by the shape.
    pub fn arity(&self) -> usize {
        match self {
            PayloadShape::Empty => 0,
            PayloadShape::Single => 1,
            PayloadShape::Positional(n) | PayloadShape::Keyed(n) => *n,
        }
    }
}

/// Picks exactly one method, applying in order: name filter, explicit
/// parameter-type hint, unique-candidate shortcut, payload-arity
/// disambiguation. Anything still ambiguous is a hard error carrying all
/// candidate signatures.
pub fn resolve_method<'a>(
    component: &'a Component,
    method_name: &str,
    explicit_types: Option<&[String]>,
    shape: PayloadShape,
) -> BridgeResult<&'a MethodDescriptor> {
    let candidates = component.methods_named(method_name);
    if candidates.is_empty() {
        return Err(BridgeError::MethodNotFound {
            target: component.type_name().to_string(),
            method: method_name.to_string(),
        });
    }

    let ambiguous = |candidates: &[&'a MethodDescriptor]| BridgeError::AmbiguousMethod {
        method: method_name.to_string(),
        candidates: candidates
            .iter()
            .map(|m| component.signature_of(m))
            .collect(),
    };

    if let Some(wanted) = explicit_types {
        let filtered: Vec<&MethodDescriptor> = candidates
            .iter()
            .copied()
            .filter(|m| {
                m.params().len() == wanted.len()
                    && m.parameter_type_names()
                        .iter()
                        .zip(wanted.iter())
                        .all(|(declared, hint)| *declared == hint.as_str())
            })
            .collect();
        return match filtered.len() {
            1 => Ok(filtered[0]),
            _ => Err(ambiguous(&candidates)),
        };
    }

    if candidates.len() == 1 {
        return Ok(candidates[0]);
    }

    let arity = shape.arity();
    let by_arity: Vec<&MethodDescriptor> = candidates
        .iter()
        .copied()
        .filter(|m| m.params().len() == arity)
        .collect();
    match by_arity.len() {
        1 => Ok(by_arity[0]),
        _ => Err(ambiguous(&candidates)),
    }
}
