//! Coercion engine: one normalized value per declared parameter, in
//! declaration order.
//!
//! The engine works on the structural payload only. Scalar and container
//! kinds are checked here; structural decoding of named object types is
//! deferred to the bound invoker, whose decode failures carry the same
//! parameter attribution.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::error::{BridgeError, BridgeResult};
use crate::json;
use crate::method::{ParamSpec, TypeTag};
use crate::resolve::PayloadShape;

/// Aligns the payload with the declared parameters and normalizes each
/// value against its parameter's type tag.
///
/// Alignment is strict declaration order: arrays bind positionally,
/// objects bind each declared parameter by name (a missing key binds null), a
/// bare value binds the first parameter. Reordering by name is not
/// supported.
pub fn coerce_arguments(
    payload: Option<&Value>,
    params: &[ParamSpec],
) -> BridgeResult<Vec<Value>> {
    if params.is_empty() {
        // A zero-parameter method accepts only an absent or empty payload.
        return if PayloadShape::of(payload).arity() == 0 {
            Ok(Vec::new())
        } else {
            Err(BridgeError::Coercion {
                index: 0,
                expected: "()".to_string(),
                detail: "method declares no parameters but a non-empty payload was supplied"
                    .to_string(),
            })
        };
    }

    let aligned: Vec<Value> = match payload {
        None | Some(Value::Null) => vec![Value::Null; params.len()],
        Some(Value::Array(items)) => {
            if items.len() > params.len() {
                return Err(BridgeError::Coercion {
                    index: params.len(),
                    expected: "end of parameter list".to_string(),
                    detail: format!(
                        "payload supplies {} values for {} parameters",
                        items.len(),
                        params.len()
                    ),
                });
            }
            let mut values = items.clone();
            values.resize(params.len(), Value::Null);
            values
        }
        Some(Value::Object(map)) => params
            .iter()
            .map(|p| map.get(&p.name).cloned().unwrap_or(Value::Null))
            .collect(),
        Some(single) => {
            let mut values = vec![single.clone()];
            values.resize(params.len(), Value::Null);
            values
        }
    };

    aligned
        .into_iter()
        .zip(params.iter())
        .enumerate()
        .map(|(index, (value, param))| coerce_value(index, value, param))
        .collect()
}

fn coerce_value(index: usize, value: Value, param: &ParamSpec) -> BridgeResult<Value> {
    if value.is_null() {
        if param.nullable {
            return Ok(Value::Null);
        }
        // Non-nullable textual parameters get the idiomatic empty
        // sentinel; every other non-nullable type sees the null and the
        // bound invoker decides whether it tolerates it.
        return Ok(match param.tag {
            TypeTag::Text => Value::String(String::new()),
            _ => Value::Null,
        });
    }

    // Operator tooling routinely submits argument values as raw JSON
    // text. A string against a non-textual parameter is decoded as an
    // embedded fragment (with the temporal quote-wrapping rule) before
    // kind checking; text that is not valid JSON stays a string and is
    // judged as one.
    let value = match value {
        Value::String(text) if !matches!(param.tag, TypeTag::Text) => {
            match json::decode_typed(&text, &param.tag) {
                Ok(parsed) => parsed,
                Err(_) => Value::String(text),
            }
        }
        other => other,
    };
    coerce_tag(index, value, &param.tag, &param.type_name)
}

fn coerce_tag(index: usize, value: Value, tag: &TypeTag, expected: &str) -> BridgeResult<Value> {
    let mismatch = |value: &Value, want: &str| BridgeError::Coercion {
        index,
        expected: expected.to_string(),
        detail: format!("expected {}, got {}", want, kind_of(value)),
    };

    match tag {
        TypeTag::Bool => match value {
            Value::Bool(_) => Ok(value),
            other => Err(mismatch(&other, "boolean")),
        },
        TypeTag::Int => match &value {
            Value::Number(n) if n.is_i64() || n.is_u64() => Ok(value),
            other => Err(mismatch(other, "integer")),
        },
        TypeTag::Float => match &value {
            Value::Number(_) => Ok(value),
            other => Err(mismatch(other, "number")),
        },
        TypeTag::Text => match value {
            Value::String(_) => Ok(value),
            // The reference decoder accepts bare scalars into textual
            // parameters; mirror that leniency.
            Value::Number(n) => Ok(Value::String(n.to_string())),
            Value::Bool(b) => Ok(Value::String(b.to_string())),
            other => Err(mismatch(&other, "string")),
        },
        TypeTag::DateTime => match &value {
            Value::String(text) if parses_as_datetime(text) => Ok(value),
            Value::String(text) => Err(BridgeError::Coercion {
                index,
                expected: expected.to_string(),
                detail: format!("'{}' is not a recognized date-time", text),
            }),
            other => Err(mismatch(other, "date-time string")),
        },
        TypeTag::List(inner) => match value {
            Value::Array(items) => {
                let coerced = coerce_elements(index, items, inner, expected)?;
                Ok(Value::Array(coerced))
            }
            other => Err(mismatch(&other, "array")),
        },
        TypeTag::Set(inner) => match value {
            Value::Array(items) => {
                let coerced = coerce_elements(index, items, inner, expected)?;
                // Deduplicate under value equality; input ordering is not
                // part of the set's meaning.
                let mut unique: Vec<Value> = Vec::with_capacity(coerced.len());
                for item in coerced {
                    if !unique.contains(&item) {
                        unique.push(item);
                    }
                }
                Ok(Value::Array(unique))
            }
            other => Err(mismatch(&other, "array")),
        },
        TypeTag::Object(_) | TypeTag::Any => Ok(value),
    }
}

fn coerce_elements(
    index: usize,
    items: Vec<Value>,
    inner: &TypeTag,
    expected: &str,
) -> BridgeResult<Vec<Value>> {
    items
        .into_iter()
        .enumerate()
        .map(|(pos, item)| {
            coerce_tag(index, item, inner, expected).map_err(|err| match err {
                BridgeError::Coercion {
                    index,
                    expected,
                    detail,
                } => BridgeError::Coercion {
                    index,
                    expected,
                    detail: format!("element {}: {}", pos, detail),
                },
                other => other,
            })
        })
        .collect()
}

/// Accepts RFC 3339 as well as the bare ISO local forms the reference
/// system tolerates.
fn parses_as_datetime(text: &str) -> bool {
    DateTime::parse_from_rfc3339(text).is_ok()
        || NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f").is_ok()
        || NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn p(name: &str, type_name: &str, tag: TypeTag) -> ParamSpec {
        ParamSpec::required(name, type_name, tag)
    }

    #[test]
    fn zero_parameter_method_rejects_non_empty_payload() {
        let err = coerce_arguments(Some(&json!({"x": 1})), &[]).unwrap_err();
        assert!(matches!(err, BridgeError::Coercion { index: 0, .. }));
        let err = coerce_arguments(Some(&json!("stray")), &[]).unwrap_err();
        assert!(matches!(err, BridgeError::Coercion { index: 0, .. }));
    }

    #[test]
    fn zero_parameter_method_accepts_absent_or_empty_payload() {
        assert!(coerce_arguments(None, &[]).unwrap().is_empty());
        assert!(coerce_arguments(Some(&Value::Null), &[]).unwrap().is_empty());
        assert!(coerce_arguments(Some(&json!({})), &[]).unwrap().is_empty());
        assert!(coerce_arguments(Some(&json!([])), &[]).unwrap().is_empty());
    }

    #[test]
    fn keyed_payload_binds_by_parameter_name() {
        let params = vec![
            p("id", "Long", TypeTag::Int),
            p("name", "String", TypeTag::Text),
        ];
        let payload = json!({"name": "widget", "id": 7});
        let args = coerce_arguments(Some(&payload), &params).unwrap();
        assert_eq!(args, vec![json!(7), json!("widget")]);
    }

    #[test]
    fn positional_payload_binds_in_declaration_order() {
        let params = vec![
            p("id", "Long", TypeTag::Int),
            p("name", "String", TypeTag::Text),
        ];
        let args = coerce_arguments(Some(&json!([7, "widget"])), &params).unwrap();
        assert_eq!(args, vec![json!(7), json!("widget")]);
    }

    #[test]
    fn surplus_positional_values_fail() {
        let params = vec![p("id", "Long", TypeTag::Int)];
        let err = coerce_arguments(Some(&json!([1, 2])), &params).unwrap_err();
        match err {
            BridgeError::Coercion { index, .. } => assert_eq!(index, 1),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn bare_value_binds_single_parameter() {
        let params = vec![p("id", "Long", TypeTag::Int)];
        let args = coerce_arguments(Some(&json!(42)), &params).unwrap();
        assert_eq!(args, vec![json!(42)]);
    }

    #[test]
    fn scalar_mismatch_names_index_and_declared_type() {
        let params = vec![
            p("flag", "Boolean", TypeTag::Bool),
            p("count", "Integer", TypeTag::Int),
        ];
        let err = coerce_arguments(Some(&json!([true, "three"])), &params).unwrap_err();
        match err {
            BridgeError::Coercion {
                index, expected, ..
            } => {
                assert_eq!(index, 1);
                assert_eq!(expected, "Integer");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn text_accepts_bare_scalars() {
        let params = vec![p("label", "String", TypeTag::Text)];
        assert_eq!(
            coerce_arguments(Some(&json!(12)), &params).unwrap(),
            vec![json!("12")]
        );
        assert_eq!(
            coerce_arguments(Some(&json!(true)), &params).unwrap(),
            vec![json!("true")]
        );
    }

    #[test]
    fn datetime_accepts_iso_local_and_rfc3339() {
        let params = vec![p("at", "LocalDateTime", TypeTag::DateTime)];
        for ok in [
            "2023-01-01T00:00:00",
            "2023-01-01T00:00:00.123",
            "2023-01-01T00:00:00+02:00",
            "2023-01-01",
        ] {
            let args = coerce_arguments(Some(&json!(ok)), &params).unwrap();
            assert_eq!(args, vec![json!(ok)]);
        }
        let err = coerce_arguments(Some(&json!("not a date")), &params).unwrap_err();
        assert!(matches!(err, BridgeError::Coercion { index: 0, .. }));
    }

    #[test]
    fn list_preserves_order_and_duplicates() {
        let params = vec![p(
            "tags",
            "List<String>",
            TypeTag::List(Box::new(TypeTag::Text)),
        )];
        let args = coerce_arguments(Some(&json!([["a", "b", "a"]])), &params).unwrap();
        assert_eq!(args, vec![json!(["a", "b", "a"])]);
    }

    #[test]
    fn set_deduplicates_under_value_equality() {
        let params = vec![p(
            "tags",
            "Set<String>",
            TypeTag::Set(Box::new(TypeTag::Text)),
        )];
        let args = coerce_arguments(Some(&json!([["a", "b", "a"]])), &params).unwrap();
        assert_eq!(args, vec![json!(["a", "b"])]);
    }

    #[test]
    fn bad_list_element_reports_position() {
        let params = vec![p(
            "ids",
            "List<Long>",
            TypeTag::List(Box::new(TypeTag::Int)),
        )];
        let err = coerce_arguments(Some(&json!([[1, "two", 3]])), &params).unwrap_err();
        match err {
            BridgeError::Coercion { detail, .. } => assert!(detail.contains("element 1")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn raw_text_decodes_as_embedded_json_for_non_text_params() {
        let params = vec![p("count", "Integer", TypeTag::Int)];
        let args = coerce_arguments(Some(&json!("5")), &params).unwrap();
        assert_eq!(args, vec![json!(5)]);

        let params = vec![p(
            "ids",
            "List<Long>",
            TypeTag::List(Box::new(TypeTag::Int)),
        )];
        let args = coerce_arguments(Some(&json!("[1, 2]")), &params).unwrap();
        assert_eq!(args, vec![json!([1, 2])]);

        let params = vec![p(
            "filter",
            "OrderFilter",
            TypeTag::Object("OrderFilter".to_string()),
        )];
        let payload = json!({"filter": "{\"status\": \"open\"}"});
        let args = coerce_arguments(Some(&payload), &params).unwrap();
        assert_eq!(args, vec![json!({"status": "open"})]);
    }

    #[test]
    fn raw_text_leaves_textual_params_alone() {
        let params = vec![p("label", "String", TypeTag::Text)];
        let args = coerce_arguments(Some(&json!("5")), &params).unwrap();
        assert_eq!(args, vec![json!("5")]);
    }

    #[test]
    fn bare_and_quoted_temporal_payloads_normalize_identically() {
        let params = vec![p("at", "LocalDateTime", TypeTag::DateTime)];
        let bare = coerce_arguments(Some(&json!("2023-01-01T00:00:00")), &params).unwrap();
        let quoted = coerce_arguments(Some(&json!("\"2023-01-01T00:00:00\"")), &params).unwrap();
        assert_eq!(bare, quoted);
        assert_eq!(bare, vec![json!("2023-01-01T00:00:00")]);
    }

    #[test]
    fn null_for_nullable_parameter_passes() {
        let params = vec![ParamSpec::nullable("note", "String", TypeTag::Text)];
        let args = coerce_arguments(Some(&json!({"note": null})), &params).unwrap();
        assert_eq!(args, vec![Value::Null]);
    }

    #[test]
    fn null_for_required_text_becomes_empty_string() {
        let params = vec![p("note", "String", TypeTag::Text)];
        let args = coerce_arguments(Some(&json!({"note": null})), &params).unwrap();
        assert_eq!(args, vec![json!("")]);
    }

    #[test]
    fn null_for_other_required_types_propagates() {
        let params = vec![p("count", "Integer", TypeTag::Int)];
        let args = coerce_arguments(Some(&json!({"count": null})), &params).unwrap();
        assert_eq!(args, vec![Value::Null]);
    }

    #[test]
    fn missing_keyed_entry_is_treated_as_null() {
        let params = vec![
            p("id", "Long", TypeTag::Int),
            ParamSpec::nullable("note", "String", TypeTag::Text),
        ];
        let args = coerce_arguments(Some(&json!({"id": 5})), &params).unwrap();
        assert_eq!(args, vec![json!(5), Value::Null]);
    }

    #[test]
    fn object_parameters_pass_through_untouched() {
        let params = vec![p(
            "filter",
            "OrderFilter",
            TypeTag::Object("OrderFilter".to_string()),
        )];
        let payload = json!({"filter": {"status": "open", "limit": 10}});
        let args = coerce_arguments(Some(&payload), &params).unwrap();
        assert_eq!(args, vec![json!({"status": "open", "limit": 10})]);
    }
}
