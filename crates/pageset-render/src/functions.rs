//! Named callables made available to every compiled template.
//!
//! A [`FunctionSet`] is an opaque name → callable table. The registry never
//! calls anything in it; it only hands the set to the
//! [`TemplateEngine`](crate::template::TemplateEngine) at compile time and keeps a copy so
//! a reload can repeat the same compilation.
//!
//! Callables work on JSON values so the table stays independent of the engine.
//! The MiniJinja engine exposes every entry both as a global function and as a
//! filter:
//!
//! ```rust
//! use pageset_render::FunctionSet;
//! use serde_json::Value;
//!
//! let functions = FunctionSet::new().add("shout", |args| {
//!     let text = args.first().and_then(Value::as_str).unwrap_or_default();
//!     Ok(Value::String(text.to_uppercase()))
//! });
//!
//! assert!(functions.contains("shout"));
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::error::RenderError;

/// Failure reported by a template function.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct FunctionError(pub String);

impl FunctionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// A callable stored in a [`FunctionSet`].
pub type TemplateFn = Arc<dyn Fn(&[Value]) -> Result<Value, FunctionError> + Send + Sync>;

/// Table of functions exposed to templates.
///
/// Cloning is cheap: callables are reference counted.
#[derive(Clone, Default)]
pub struct FunctionSet {
    functions: BTreeMap<String, TemplateFn>,
}

impl FunctionSet {
    /// Creates an empty function set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a function, replacing any previous one with the same name.
    pub fn add<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, FunctionError> + Send + Sync + 'static,
    {
        self.insert(name, f);
        self
    }

    /// Adds a function in place.
    pub fn insert<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(&[Value]) -> Result<Value, FunctionError> + Send + Sync + 'static,
    {
        self.functions.insert(name.into(), Arc::new(f));
    }

    /// Calls the function registered under `name`.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, RenderError> {
        let f = self.functions.get(name).ok_or_else(|| RenderError::Function {
            name: name.to_string(),
            message: "no such function".to_string(),
        })?;
        f(args).map_err(|e| RenderError::Function {
            name: name.to_string(),
            message: e.0,
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Returns an iterator over function names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl fmt::Debug for FunctionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionSet")
            .field("names", &self.functions.keys().collect::<Vec<_>>())
            .finish()
    }
}
