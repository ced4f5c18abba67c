//! Invocation executor: runs a resolved invocation synchronously on the
//! calling task, or detaches it fire-and-forget.
//!
//! There is no cancellation, no timeout and no join for detached runs;
//! their failures are logged and never surface to the triggering request.

use serde_json::Value;

use crate::error::{BridgeError, BridgeResult};
use crate::method::{InvokeError, MethodDescriptor, ReturnValue};
use crate::request::InvocationOutcome;

/// A fully-resolved invocation: the chosen descriptor, coerced arguments
/// aligned with its parameters, and the rendered signature for
/// diagnostics.
#[derive(Debug, Clone)]
pub struct ResolvedInvocation {
    pub descriptor: MethodDescriptor,
    pub args: Vec<Value>,
    pub signature: String,
}

/// Executes a resolved invocation.
///
/// Synchronous mode blocks the calling task until the method returns or
/// fails, surfacing the outcome inline. Asynchronous mode hands the run
/// to the blocking pool and immediately acknowledges with
/// [`InvocationOutcome::Accepted`].
pub async fn execute(
    resolved: ResolvedInvocation,
    synchronous: bool,
) -> BridgeResult<InvocationOutcome> {
    if synchronous {
        return run(&resolved);
    }

    tokio::task::spawn_blocking(move || {
        if let Err(err) = run(&resolved) {
            // Only observable through host logging, by design.
            log::error!("detached invocation {} failed: {}", resolved.signature, err);
        }
    });
    Ok(InvocationOutcome::Accepted)
}

fn run(resolved: &ResolvedInvocation) -> BridgeResult<InvocationOutcome> {
    match resolved.descriptor.invoke(resolved.args.clone()) {
        Ok(ReturnValue::Void) => Ok(InvocationOutcome::Void),
        Ok(ReturnValue::Value(value)) => Ok(InvocationOutcome::Value(value)),
        Err(InvokeError::Decode {
            index,
            expected,
            detail,
        }) => Err(BridgeError::Coercion {
            index,
            expected,
            detail,
        }),
        Err(InvokeError::Fault {
            error_type,
            message,
        }) => Err(BridgeError::Invocation {
            error_type,
            message,
        }),
    }
}
