//! Method descriptors and registration-time binding.
//!
//! The bridge never introspects live types. Hosts describe each invocable
//! method up front: its name, declared parameter types, return type and
//! visibility, plus a bound invoker closure constructed with full access
//! to the component. The visibility field is metadata only; the closure
//! is the access-bypass capability, granted at registration.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Declared shape of a parameter type, used by the coercion engine to
/// normalize payload values before they reach the bound invoker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeTag {
    Bool,
    Int,
    Float,
    Text,
    /// Temporal parameter; accepts quoted or bare ISO text on the wire.
    DateTime,
    /// Ordered sequence, decoded element-wise.
    List(Box<TypeTag>),
    /// Decoded like a list, then deduplicated under value equality.
    Set(Box<TypeTag>),
    /// Named structured type; structural decoding is deferred to the
    /// bound invoker.
    Object(String),
    Any,
}

/// One declared method parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    /// Parameter name as declared in the source signature; keyed payloads
    /// bind by this name.
    pub name: String,
    /// Declared type name, compared verbatim against the request's
    /// `parameterTypes` hint.
    pub type_name: String,
    pub tag: TypeTag,
    pub nullable: bool,
}

impl ParamSpec {
    pub fn required(name: &str, type_name: &str, tag: TypeTag) -> Self {
        Self {
            name: name.to_string(),
            type_name: type_name.to_string(),
            tag,
            nullable: false,
        }
    }

    pub fn nullable(name: &str, type_name: &str, tag: TypeTag) -> Self {
        Self {
            name: name.to_string(),
            type_name: type_name.to_string(),
            tag,
            nullable: true,
        }
    }
}

/// Declared visibility of the original method. Never consulted at
/// invocation time; kept for diagnostics and listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Public => write!(f, "public"),
            Visibility::Protected => write!(f, "protected"),
            Visibility::Private => write!(f, "private"),
        }
    }
}

/// What a bound invoker hands back on success. `Void` is distinct from
/// `Value(Value::Null)` so the response layer can tell "no value" from
/// "returned null".
#[derive(Debug, Clone, PartialEq)]
pub enum ReturnValue {
    Void,
    Value(Value),
}

/// Failure inside a bound invoker.
#[derive(Debug, Clone, PartialEq)]
pub enum InvokeError {
    /// A positional argument failed structural decoding into its concrete
    /// parameter type.
    Decode {
        index: usize,
        expected: String,
        detail: String,
    },
    /// The method body itself failed.
    Fault { error_type: String, message: String },
}

pub type BoundInvoker = Arc<dyn Fn(Vec<Value>) -> Result<ReturnValue, InvokeError> + Send + Sync>;

/// A registered method: declared shape plus the closure that executes it.
#[derive(Clone)]
pub struct MethodDescriptor {
    name: String,
    params: Vec<ParamSpec>,
    return_type: String,
    returns_void: bool,
    visibility: Visibility,
    invoker: BoundInvoker,
}

impl MethodDescriptor {
    pub fn public(name: &str) -> MethodBuilder {
        MethodBuilder::new(name, Visibility::Public)
    }

    pub fn protected(name: &str) -> MethodBuilder {
        MethodBuilder::new(name, Visibility::Protected)
    }

    pub fn private(name: &str) -> MethodBuilder {
        MethodBuilder::new(name, Visibility::Private)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    pub fn return_type(&self) -> &str {
        &self.return_type
    }

    pub fn returns_void(&self) -> bool {
        self.returns_void
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Declared parameter type names, in order.
    pub fn parameter_type_names(&self) -> Vec<&str> {
        self.params.iter().map(|p| p.type_name.as_str()).collect()
    }

    /// Renders `OwnerType#name(T1, T2)` for diagnostics.
    pub fn signature(&self, owner: &str) -> String {
        format!(
            "{}#{}({})",
            owner,
            self.name,
            self.parameter_type_names().join(", ")
        )
    }

    /// Runs the bound invoker against coerced arguments. Access bypass is
    /// implicit: the closure was built with full access at registration.
    pub fn invoke(&self, args: Vec<Value>) -> Result<ReturnValue, InvokeError> {
        (self.invoker)(args)
    }
}

impl fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("return_type", &self.return_type)
            .field("returns_void", &self.returns_void)
            .field("visibility", &self.visibility)
            .finish()
    }
}

/// Fluent builder for [`MethodDescriptor`].
pub struct MethodBuilder {
    name: String,
    visibility: Visibility,
    params: Vec<ParamSpec>,
    return_type: String,
    returns_void: bool,
}

impl MethodBuilder {
    fn new(name: &str, visibility: Visibility) -> Self {
        Self {
            name: name.to_string(),
            visibility,
            params: Vec::new(),
            return_type: "void".to_string(),
            returns_void: true,
        }
    }

    pub fn param(mut self, param: ParamSpec) -> Self {
        self.params.push(param);
        self
    }

    pub fn returns(mut self, type_name: &str) -> Self {
        self.return_type = type_name.to_string();
        self.returns_void = false;
        self
    }

    /// Finishes the descriptor by binding the invoker closure.
    pub fn bind<F>(self, invoker: F) -> MethodDescriptor
    where
        F: Fn(Vec<Value>) -> Result<ReturnValue, InvokeError> + Send + Sync + 'static,
    {
        MethodDescriptor {
            name: self.name,
            params: self.params,
            return_type: self.return_type,
            returns_void: self.returns_void,
            visibility: self.visibility,
            invoker: Arc::new(invoker),
        }
    }
}

/// Helpers for writing bound invokers against typed component methods.
pub mod bind {
    use super::*;

    /// Decodes the argument at `index` into a concrete parameter type.
    /// A missing argument decodes from null.
    pub fn arg<T: DeserializeOwned>(
        args: &[Value],
        index: usize,
        expected: &str,
    ) -> Result<T, InvokeError> {
        let value = args.get(index).cloned().unwrap_or(Value::Null);
        serde_json::from_value(value).map_err(|e| InvokeError::Decode {
            index,
            expected: expected.to_string(),
            detail: e.to_string(),
        })
    }

    /// Encodes a method's return value.
    pub fn value<T: Serialize>(value: &T) -> Result<ReturnValue, InvokeError> {
        serde_json::to_value(value)
            .map(ReturnValue::Value)
            .map_err(|e| InvokeError::Fault {
                error_type: "serde_json::Error".to_string(),
                message: e.to_string(),
            })
    }

    pub fn void() -> Result<ReturnValue, InvokeError> {
        Ok(ReturnValue::Void)
    }

    /// Captures a typed method error with its concrete type name, for
    /// faithful surfacing in synchronous mode.
    pub fn fault<E: std::error::Error>(err: E) -> InvokeError {
        InvokeError::Fault {
            error_type: short_type_name(std::any::type_name::<E>()),
            message: err.to_string(),
        }
    }

    /// A fault with an explicit type label, for closures whose error is
    /// not a `std::error::Error`.
    pub fn fault_with(error_type: &str, message: impl Into<String>) -> InvokeError {
        InvokeError::Fault {
            error_type: error_type.to_string(),
            message: message.into(),
        }
    }

    fn short_type_name(full: &str) -> String {
        // Strip generic noise but keep the module path readable.
        full.replace("alloc::string::", "")
            .replace("core::", "")
            .replace("std::", "")
    }
}
