//! Hook system for work that must happen before a request handler runs.
//!
//! Hooks let a serving process attach cross-cutting steps (template reloads,
//! request validation, context setup) without putting them in every handler.
//!
//! # Pipeline Position
//!
//! ```text
//! incoming request → context C
//!   → PRE-DISPATCH HOOKS ← (reload, validation, setup)
//!   → handler(C)
//! ```
//!
//! Hooks run in registration order. The first hook that fails aborts the
//! chain, and the handler is not called.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// The phase at which a hook error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookPhase {
    /// A generic pre-dispatch hook failed
    PreDispatch,
    /// Recompiling templates before the handler failed
    Reload,
}

impl fmt::Display for HookPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookPhase::PreDispatch => write!(f, "pre-dispatch"),
            HookPhase::Reload => write!(f, "reload"),
        }
    }
}

/// Error returned by a hook.
#[derive(Debug, Error)]
#[error("hook error ({phase}): {message}")]
pub struct HookError {
    /// Human-readable error message
    pub message: String,
    /// The hook phase where the error occurred
    pub phase: HookPhase,
    /// The underlying error source, if any
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl HookError {
    /// Creates a new hook error for the pre-dispatch phase.
    pub fn pre_dispatch(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            phase: HookPhase::PreDispatch,
            source: None,
        }
    }

    /// Creates a new hook error for the reload phase.
    pub fn reload(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            phase: HookPhase::Reload,
            source: None,
        }
    }

    /// Sets the source error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        self.source = Some(source.into());
        self
    }
}

/// Type alias for pre-dispatch hook functions.
///
/// Hooks receive mutable access to the request context `C`, so they can
/// record what they did for the handler to see.
pub type PreDispatchFn<C> = Arc<dyn Fn(&mut C) -> Result<(), HookError> + Send + Sync>;

/// Ordered chain of pre-dispatch hooks over a request context `C`.
pub struct Hooks<C> {
    pre_dispatch: Vec<PreDispatchFn<C>>,
}

impl<C> Default for Hooks<C> {
    fn default() -> Self {
        Self {
            pre_dispatch: Vec::new(),
        }
    }
}

impl<C> Clone for Hooks<C> {
    fn clone(&self) -> Self {
        Self {
            pre_dispatch: self.pre_dispatch.clone(),
        }
    }
}

impl<C> Hooks<C> {
    /// Creates a new empty hook chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no hooks are registered.
    pub fn is_empty(&self) -> bool {
        self.pre_dispatch.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pre_dispatch.len()
    }

    /// Adds a pre-dispatch hook.
    ///
    /// # Example
    ///
    /// ```rust
    /// use pageset_dispatch::{HookError, Hooks};
    ///
    /// struct Request {
    ///     address: String,
    /// }
    ///
    /// let hooks = Hooks::<Request>::new().pre_dispatch(|req| {
    ///     if req.address.is_empty() {
    ///         return Err(HookError::pre_dispatch("empty address"));
    ///     }
    ///     Ok(())
    /// });
    ///
    /// let mut req = Request { address: String::new() };
    /// assert!(hooks.run_pre_dispatch(&mut req).is_err());
    /// ```
    pub fn pre_dispatch<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut C) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.pre_dispatch.push(Arc::new(f));
        self
    }

    /// Runs all pre-dispatch hooks, stopping at the first failure.
    pub fn run_pre_dispatch(&self, ctx: &mut C) -> Result<(), HookError> {
        for hook in &self.pre_dispatch {
            hook(ctx)?;
        }
        Ok(())
    }

    /// Runs the hook chain, then `handler` if every hook succeeded.
    pub fn dispatch<T, E, F>(&self, ctx: &mut C, handler: F) -> Result<T, E>
    where
        F: FnOnce(&mut C) -> Result<T, E>,
        E: From<HookError>,
    {
        self.run_pre_dispatch(ctx)?;
        handler(ctx)
    }
}

impl<C> fmt::Debug for Hooks<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("pre_dispatch_count", &self.pre_dispatch.len())
            .finish()
    }
}
