//! Target registry: lookup from textual identifier to live component.
//!
//! The registry is owned by the host, built once at startup and read-only
//! afterwards. The bridge holds it behind an `Arc` and never mutates it.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{BridgeError, BridgeResult};
use crate::method::MethodDescriptor;

/// A registered component: its full type name and every invocable method
/// declared on it, private ones included.
#[derive(Debug)]
pub struct Component {
    type_name: String,
    methods: Vec<MethodDescriptor>,
}

impl Component {
    pub fn builder(type_name: &str) -> ComponentBuilder {
        ComponentBuilder {
            type_name: type_name.to_string(),
            methods: Vec::new(),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn methods(&self) -> &[MethodDescriptor] {
        &self.methods
    }

    /// All declared methods sharing `name`, regardless of visibility.
    pub fn methods_named(&self, name: &str) -> Vec<&MethodDescriptor> {
        self.methods.iter().filter(|m| m.name() == name).collect()
    }

    pub fn signature_of(&self, method: &MethodDescriptor) -> String {
        method.signature(&self.type_name)
    }

    /// Final dot-separated segment of the type name, the "short" lookup key.
    pub fn short_name(&self) -> &str {
        self.type_name
            .rsplit('.')
            .next()
            .unwrap_or(&self.type_name)
    }
}

pub struct ComponentBuilder {
    type_name: String,
    methods: Vec<MethodDescriptor>,
}

impl ComponentBuilder {
    pub fn method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    pub fn build(self) -> Component {
        Component {
            type_name: self.type_name,
            methods: self.methods,
        }
    }
}

/// Read-only lookup capability the host grants the bridge.
pub trait TargetRegistry: Send + Sync {
    /// Resolves an identifier to a live component. Pure lookup, no side
    /// effects.
    fn resolve(&self, identifier: &str) -> BridgeResult<Arc<Component>>;

    /// Every registered full identifier, sorted.
    fn identifiers(&self) -> Vec<String>;
}

/// In-memory registry built once at startup.
///
/// Resolution tries the full type name first, then falls back to matching
/// the final dot-separated segment. A short name shared by several
/// components is surfaced as `AmbiguousTarget` rather than silently
/// picking one.
#[derive(Default)]
pub struct StaticRegistry {
    components: HashMap<String, Arc<Component>>,
}

impl StaticRegistry {
    pub fn builder() -> StaticRegistryBuilder {
        StaticRegistryBuilder {
            components: HashMap::new(),
        }
    }
}

impl TargetRegistry for StaticRegistry {
    fn resolve(&self, identifier: &str) -> BridgeResult<Arc<Component>> {
        if let Some(component) = self.components.get(identifier) {
            return Ok(component.clone());
        }

        let mut matches: Vec<&Arc<Component>> = self
            .components
            .values()
            .filter(|c| c.short_name() == identifier)
            .collect();
        matches.sort_by(|a, b| a.type_name().cmp(b.type_name()));

        match matches.len() {
            0 => Err(BridgeError::TargetNotFound {
                identifier: identifier.to_string(),
            }),
            1 => Ok(matches[0].clone()),
            _ => Err(BridgeError::AmbiguousTarget {
                identifier: identifier.to_string(),
                matches: matches
                    .iter()
                    .map(|c| c.type_name().to_string())
                    .collect(),
            }),
        }
    }

    fn identifiers(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.components.keys().cloned().collect();
        ids.sort();
        ids
    }
}

pub struct StaticRegistryBuilder {
    components: HashMap<String, Arc<Component>>,
}

impl StaticRegistryBuilder {
    /// Registers a component under its full type name. Registering the
    /// same full name twice replaces the earlier entry.
    pub fn component(mut self, component: Component) -> Self {
        self.components
            .insert(component.type_name().to_string(), Arc::new(component));
        self
    }

    pub fn build(self) -> StaticRegistry {
        StaticRegistry {
            components: self.components,
        }
    }
}
