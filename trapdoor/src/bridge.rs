//! Bridge façade: the one logical operation the transport layer calls.

use std::sync::Arc;

use crate::coerce::coerce_arguments;
use crate::error::BridgeResult;
use crate::execute::{execute, ResolvedInvocation};
use crate::registry::TargetRegistry;
use crate::request::{InvocationOutcome, InvocationRequest, InvocationResponse};
use crate::resolve::{resolve_method, PayloadShape};

/// The dynamic invocation engine, end to end: validate the request,
/// resolve the target and method, coerce arguments, execute.
///
/// Holds the host's registry as a read-only capability; all other state
/// is per-request and discarded.
pub struct InvocationBridge {
    registry: Arc<dyn TargetRegistry>,
}

impl InvocationBridge {
    pub fn new(registry: Arc<dyn TargetRegistry>) -> Self {
        Self { registry }
    }

    /// Resolves and executes one request. All resolution and coercion
    /// failures are detected before the method body runs; only a
    /// synchronous method's own failure is captured from the invocation
    /// act.
    pub async fn invoke(&self, request: InvocationRequest) -> BridgeResult<InvocationOutcome> {
        request.verify()?;

        let component = self.registry.resolve(&request.target)?;
        let shape = PayloadShape::of(request.payload.as_ref());
        let descriptor = resolve_method(
            &component,
            &request.method,
            request.parameter_types.as_deref(),
            shape,
        )?;
        let args = coerce_arguments(request.payload.as_ref(), descriptor.params())?;

        let resolved = ResolvedInvocation {
            signature: component.signature_of(descriptor),
            descriptor: descriptor.clone(),
            args,
        };
        log::debug!(
            "invoking {} (sync={}, payload={})",
            resolved.signature,
            request.is_synchronous(),
            request.payload_text().unwrap_or_default()
        );
        execute(resolved, request.is_synchronous()).await
    }

    /// Convenience for transports: always yields a structured envelope,
    /// never an error.
    pub async fn handle(&self, request: InvocationRequest) -> InvocationResponse {
        match self.invoke(request).await {
            Ok(outcome) => InvocationResponse::ok(outcome),
            Err(err) => InvocationResponse::err(&err),
        }
    }

    /// Every registered component identifier, for listings.
    pub fn identifiers(&self) -> Vec<String> {
        self.registry.identifiers()
    }
}
