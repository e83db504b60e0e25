//! Pre-request hooks for serving `pageset-render` templates.
//!
//! `pageset-dispatch` sits between a request router and its handlers. It runs
//! an ordered chain of pre-dispatch hooks over a caller-chosen context type,
//! and provides the hook that hot-reloads templates before each request.
//!
//! # Features
//!
//! - **Hook chain**: [`Hooks`] runs pre-dispatch hooks in order and aborts on
//!   the first failure
//! - **Reload hook**: [`ReloadHook`] replays the registry's last compilation
//!   when [`ReloadMode::Always`](pageset_render::ReloadMode) is set
//! - **Handler wrapping**: [`with_reload`] guards a single handler with a reload
//!
//! The reload hook depends only on
//! [`ReloadableRenderer`](pageset_render::ReloadableRenderer), so anything that
//! can reload and render may stand in for the registry.
//!
//! # Usage
//!
//! ```rust,ignore
//! use pageset_dispatch::{Hooks, ReloadHook};
//!
//! let hooks = Hooks::<Request>::new()
//!     .pre_dispatch(ReloadHook::new(registry.clone(), config.reload).into_pre_dispatch());
//!
//! hooks.dispatch(&mut request, |req| render_page(req))?;
//! ```

mod hooks;
mod reload;

pub use hooks::{HookError, HookPhase, Hooks, PreDispatchFn};
pub use reload::{with_reload, ReloadHook};
