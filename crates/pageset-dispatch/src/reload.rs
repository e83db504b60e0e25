//! Template reloading as a pre-dispatch step.
//!
//! [`ReloadHook`] asks a [`ReloadableRenderer`] to recompile from its last
//! inputs before a handler runs. It keeps no state besides the renderer
//! handle and the [`ReloadMode`], so the same hook can be shared by every
//! request.
//!
//! ```rust
//! use std::sync::Arc;
//! use pageset_dispatch::{with_reload, HookError, ReloadHook};
//! use pageset_render::{
//!     CompileInputs, FunctionSet, MemoryStore, PageRegistry, ReloadMode, ReloadableRenderer,
//! };
//!
//! let registry = Arc::new(PageRegistry::with_store(MemoryStore::from_entries(&[
//!     ("partials/hello.txt", "hello"),
//!     ("layout.txt", "{% block base %}{% endblock %}"),
//! ])));
//! registry
//!     .register(CompileInputs::new(FunctionSet::new(), "partials/*.txt", "pages/*.txt", "layout.txt"))
//!     .unwrap();
//!
//! let renderer: Arc<dyn ReloadableRenderer> = registry.clone();
//! let handler = with_reload(ReloadHook::new(renderer, ReloadMode::Always), |address: &mut String| {
//!     registry
//!         .render_to_string(address.as_str(), &serde_json::json!({}))
//!         .map_err(|e| HookError::pre_dispatch("render failed").with_source(e))
//! });
//!
//! assert_eq!(handler(&mut "hello".to_string()).unwrap(), "hello");
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use pageset_render::{ReloadMode, ReloadableRenderer};

use crate::hooks::HookError;

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Recompiles templates before each request when enabled.
#[derive(Clone)]
pub struct ReloadHook {
    renderer: Arc<dyn ReloadableRenderer>,
    mode: ReloadMode,
}

impl ReloadHook {
    pub fn new(renderer: Arc<dyn ReloadableRenderer>, mode: ReloadMode) -> Self {
        Self { renderer, mode }
    }

    pub fn mode(&self) -> ReloadMode {
        self.mode
    }

    /// Reloads the renderer if the mode asks for it.
    ///
    /// # Errors
    ///
    /// A failed reload is returned as a [`HookError`] in the reload phase with
    /// the registry error as its source. The renderer keeps serving the
    /// templates it had before.
    pub fn run(&self) -> Result<(), HookError> {
        if !self.mode.is_enabled() {
            return Ok(());
        }

        let start = Instant::now();
        self.renderer.reload().map_err(|err| {
            tracing::warn!(error = %err, "Template reload failed");
            HookError::reload(format!("template reload failed: {err}")).with_source(err)
        })?;
        tracing::debug!(elapsed_ms = elapsed_ms(start), "Templates reloaded");
        Ok(())
    }

    /// Turns the hook into a pre-dispatch function for any context type.
    pub fn into_pre_dispatch<C: 'static>(
        self,
    ) -> impl Fn(&mut C) -> Result<(), HookError> + Send + Sync + 'static {
        move |_ctx: &mut C| self.run()
    }
}

impl fmt::Debug for ReloadHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReloadHook")
            .field("mode", &self.mode)
            .finish()
    }
}

/// Wraps `next` so the reload hook runs before it.
///
/// When the reload fails, its [`HookError`] is converted into the handler's
/// error type and `next` is not called.
pub fn with_reload<C, T, E, F>(hook: ReloadHook, next: F) -> impl Fn(&mut C) -> Result<T, E>
where
    F: Fn(&mut C) -> Result<T, E>,
    E: From<HookError>,
{
    move |ctx: &mut C| {
        hook.run()?;
        next(ctx)
    }
}
