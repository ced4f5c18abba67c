// trapdoor
// A remote-invocation bridge embedded inside a running application: resolve
// a live component by textual identifier, pick a method among overloads,
// coerce a structured payload into typed arguments and invoke it:
// synchronously for inspection, fire-and-forget for operational triggers.
//
// There is no live introspection: hosts register an explicit table of
// method descriptors at startup, each carrying a bound invoker closure
// constructed with full access regardless of the method's declared
// visibility.

pub mod bridge;
pub mod coerce;
pub mod error;
pub mod execute;
pub mod json;
pub mod method;
pub mod registry;
pub mod request;
pub mod resolve;

pub use bridge::InvocationBridge;
pub use error::{BridgeError, BridgeResult};
pub use method::{
    bind, InvokeError, MethodDescriptor, ParamSpec, ReturnValue, TypeTag, Visibility,
};
pub use registry::{Component, StaticRegistry, TargetRegistry};
pub use request::{ErrorBody, InvocationOutcome, InvocationRequest, InvocationResponse};
