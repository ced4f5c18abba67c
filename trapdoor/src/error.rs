// Error taxonomy for the invocation bridge.
//
// Every failure the transport layer can observe is one of these variants;
// the bridge never lets a raw panic or unwrapped fault escape. Faults
// raised by detached (asynchronous) invocations are logged and swallowed,
// so they never appear here.

use thiserror::Error;

pub type BridgeResult<T> = Result<T, BridgeError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BridgeError {
    /// Required request fields missing or empty; rejected before any
    /// resolution work.
    #[error("invalid request: {0}")]
    Validation(String),

    #[error("no component registered for '{identifier}'")]
    TargetNotFound { identifier: String },

    #[error("identifier '{identifier}' matches multiple components: [{}]", .matches.join(", "))]
    AmbiguousTarget {
        identifier: String,
        matches: Vec<String>,
    },

    #[error("no method named '{method}' on '{target}'")]
    MethodNotFound { target: String, method: String },

    /// Carries every candidate signature so the caller can resubmit with
    /// explicit parameter types.
    #[error("method '{method}' is ambiguous, resubmit with parameterTypes; candidates: [{}]", .candidates.join(", "))]
    AmbiguousMethod {
        method: String,
        candidates: Vec<String>,
    },

    #[error("cannot coerce argument {index} to {expected}: {detail}")]
    Coercion {
        index: usize,
        expected: String,
        detail: String,
    },

    /// The invoked method itself failed during synchronous execution.
    /// `error_type` is the concrete error type's name as captured at
    /// registration time.
    #[error("method raised {error_type}: {message}")]
    Invocation { error_type: String, message: String },
}

impl BridgeError {
    /// Stable kind label used in the transport envelope.
    pub fn kind(&self) -> &'static str {
        match self {
            BridgeError::Validation(_) => "ValidationError",
            BridgeError::TargetNotFound { .. } => "TargetNotFound",
            BridgeError::AmbiguousTarget { .. } => "AmbiguousTarget",
            BridgeError::MethodNotFound { .. } => "MethodNotFound",
            BridgeError::AmbiguousMethod { .. } => "AmbiguousMethod",
            BridgeError::Coercion { .. } => "CoercionError",
            BridgeError::Invocation { .. } => "InvocationFailure",
        }
    }

    /// Whether the failure happened before the method body ran.
    /// Transports map pre-invocation failures to caller-error statuses;
    /// a captured method fault means the invocation itself went through.
    pub fn is_pre_invocation(&self) -> bool {
        !matches!(self, BridgeError::Invocation { .. })
    }
}
