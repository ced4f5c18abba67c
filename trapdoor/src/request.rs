//! Request and response records exchanged with the transport layer.
//!
//! Wire field names (`className`, `methodName`, `content`,
//! `parameterTypes`, `isSync`) follow the reference protocol so existing
//! operator tooling keeps working.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BridgeError, BridgeResult};
use crate::json;

/// One invocation request against a live component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvocationRequest {
    /// Identifier of the target component, e.g. a fully-qualified type
    /// name or its short form.
    #[serde(rename = "className")]
    pub target: String,

    #[serde(rename = "methodName")]
    pub method: String,

    /// Structured arguments; absent means "no arguments".
    #[serde(rename = "content", default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,

    /// Optional overload disambiguation hint: declared parameter type
    /// names, in order.
    #[serde(
        rename = "parameterTypes",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub parameter_types: Option<Vec<String>>,

    /// Defaults to asynchronous (fire-and-forget) when absent.
    #[serde(rename = "isSync", default, skip_serializing_if = "Option::is_none")]
    pub synchronous: Option<bool>,
}

impl InvocationRequest {
    pub fn new(target: &str, method: &str) -> Self {
        Self {
            target: target.to_string(),
            method: method.to_string(),
            payload: None,
            parameter_types: None,
            synchronous: None,
        }
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn with_parameter_types(mut self, types: Vec<&str>) -> Self {
        self.parameter_types = Some(types.into_iter().map(str::to_string).collect());
        self
    }

    pub fn synchronous(mut self) -> Self {
        self.synchronous = Some(true);
        self
    }

    pub fn is_synchronous(&self) -> bool {
        self.synchronous.unwrap_or(false)
    }

    /// Payload rendered as plain text for diagnostics; strings pass
    /// through unquoted.
    pub fn payload_text(&self) -> Option<String> {
        self.payload.as_ref().and_then(json::to_text_lossy)
    }

    /// Fails fast before any resolution work when a required field is
    /// missing.
    pub fn verify(&self) -> BridgeResult<()> {
        if self.target.trim().is_empty() {
            return Err(BridgeError::Validation("className is required".to_string()));
        }
        if self.method.trim().is_empty() {
            return Err(BridgeError::Validation(
                "methodName is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Caller-visible result of one invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "data", rename_all = "camelCase")]
pub enum InvocationOutcome {
    /// A real return value; may be JSON null.
    Value(Value),
    /// The method declared void and completed; distinct from a null
    /// return value.
    Void,
    /// Acknowledgment for asynchronous dispatch, issued before the method
    /// body necessarily completes.
    Accepted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: String,
    pub message: String,
    /// Candidate signatures (ambiguous method) or colliding identifiers
    /// (ambiguous target).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidates: Option<Vec<String>>,
}

/// Transport envelope: either an outcome or a structured error, never a
/// raw fault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvocationResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<InvocationOutcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl InvocationResponse {
    pub fn ok(outcome: InvocationOutcome) -> Self {
        Self {
            success: true,
            outcome: Some(outcome),
            error: None,
        }
    }

    pub fn err(error: &BridgeError) -> Self {
        let candidates = match error {
            BridgeError::AmbiguousMethod { candidates, .. } => Some(candidates.clone()),
            BridgeError::AmbiguousTarget { matches, .. } => Some(matches.clone()),
            _ => None,
        };
        Self {
            success: false,
            outcome: None,
            error: Some(ErrorBody {
                kind: error.kind().to_string(),
                message: error.to_string(),
                candidates,
            }),
        }
    }

    /// Pretty-printed rendering for operator-facing output.
    pub fn pretty(&self) -> String {
        match serde_json::to_value(self) {
            Ok(value) => json::pretty(&value),
            Err(_) => format!("{:?}", self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_names_round_trip() {
        let body = json!({
            "className": "com.example.OrderService",
            "methodName": "find",
            "content": {"id": 1},
            "parameterTypes": ["Long"],
            "isSync": true
        });
        let req: InvocationRequest = serde_json::from_value(body).unwrap();
        assert_eq!(req.target, "com.example.OrderService");
        assert_eq!(req.method, "find");
        assert!(req.is_synchronous());
        assert_eq!(req.parameter_types, Some(vec!["Long".to_string()]));

        let back = serde_json::to_value(&req).unwrap();
        assert_eq!(back["className"], "com.example.OrderService");
        assert_eq!(back["isSync"], true);
    }

    #[test]
    fn sync_defaults_to_false() {
        let req: InvocationRequest =
            serde_json::from_value(json!({"className": "A", "methodName": "m"})).unwrap();
        assert!(!req.is_synchronous());
        assert!(req.payload.is_none());
    }

    #[test]
    fn verify_rejects_blank_fields() {
        let req = InvocationRequest::new("", "m");
        assert!(matches!(
            req.verify().unwrap_err(),
            BridgeError::Validation(_)
        ));
        let req = InvocationRequest::new("A", "  ");
        assert!(matches!(
            req.verify().unwrap_err(),
            BridgeError::Validation(_)
        ));
        assert!(InvocationRequest::new("A", "m").verify().is_ok());
    }

    #[test]
    fn payload_text_passes_strings_through_unquoted() {
        let req = InvocationRequest::new("A", "m").with_payload(json!("plain"));
        assert_eq!(req.payload_text(), Some("plain".to_string()));
        let req = InvocationRequest::new("A", "m").with_payload(json!({"id": 1}));
        assert_eq!(req.payload_text(), Some("{\"id\":1}".to_string()));
        assert_eq!(InvocationRequest::new("A", "m").payload_text(), None);
    }

    #[test]
    fn void_and_null_serialize_distinguishably() {
        let void = serde_json::to_value(InvocationOutcome::Void).unwrap();
        let null = serde_json::to_value(InvocationOutcome::Value(Value::Null)).unwrap();
        assert_ne!(void, null);
        assert_eq!(void["outcome"], "void");
        assert_eq!(null["outcome"], "value");
    }

    #[test]
    fn error_response_carries_kind_and_candidates() {
        let err = BridgeError::AmbiguousMethod {
            method: "find".to_string(),
            candidates: vec!["A#find(Long)".to_string()],
        };
        let resp = InvocationResponse::err(&err);
        assert!(!resp.success);
        let body = resp.error.unwrap();
        assert_eq!(body.kind, "AmbiguousMethod");
        assert_eq!(body.candidates, Some(vec!["A#find(Long)".to_string()]));
    }
}
