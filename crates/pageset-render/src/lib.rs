//! # Pageset Render - Hot-Reloadable Page Templates
//!
//! `pageset-render` compiles a site's templates (one layout, a set of pages and
//! a set of shared partials) into independently executable groups, renders
//! them by address, and recompiles everything on demand without restarting.
//!
//! ## Core Concepts
//!
//! - [`PageRegistry`]: Compiled groups behind one readers-writer lock
//! - [`CompileInputs`]: Patterns, layout path and functions of a registration
//! - [`FunctionSet`]: Named helpers callable from every template
//! - [`TemplateStore`]: Where sources come from ([`FsStore`], [`MemoryStore`])
//! - [`TemplateConfig`]: YAML model for template locations and reload policy
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pageset_render::{CompileInputs, FunctionSet, PageRegistry};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Page {
//!     title: String,
//! }
//!
//! let functions = FunctionSet::new().add("upper", |args| {
//!     let text = args.first().and_then(|v| v.as_str()).unwrap_or_default();
//!     Ok(serde_json::Value::from(text.to_uppercase()))
//! });
//!
//! let registry = PageRegistry::new();
//! registry.register(CompileInputs::new(
//!     functions,
//!     "templates/partials/*.html",
//!     "templates/pages/*.html",
//!     "templates/layout.html",
//! ))?;
//!
//! let mut out = std::io::stdout();
//! let page = Page { title: "About".into() };
//!
//! // Whole page through the layout's `base` block
//! registry.render(&mut out, "templates/pages/about.html", &page)?;
//! // One block or partial of the page's group
//! registry.render(&mut out, "templates/pages/about.html#content", &page)?;
//! // A partial on its own
//! registry.render(&mut out, "footer", &page)?;
//!
//! // Pick up edits on disk
//! registry.reload()?;
//! # Ok::<(), pageset_render::RegistryError>(())
//! ```
//!
//! ## Addresses
//!
//! | Address | Renders |
//! |---------|---------|
//! | `<pages root>/<page>` | the page group's `base` entry |
//! | `<pages root>/<page>#<entry>` | that entry of the page group |
//! | anything else | that entry of the partials group |
//!
//! The pages root is the directory part of the pages pattern. See
//! [`template::address`].
//!
//! ## Concurrency
//!
//! The registry is `Send + Sync`. Renders run in parallel; a registration or
//! reload excludes them for its full duration and publishes its result only if
//! every group compiled.

pub mod config;
mod error;
mod functions;
pub mod store;
pub mod template;

pub use config::{ConfigError, ReloadMode, TemplateConfig};
pub use error::RenderError;
pub use functions::{FunctionError, FunctionSet, TemplateFn};
pub use store::{FsStore, MemoryStore, StoreError, TemplateStore};
pub use template::{
    CompileInputs, PageRegistry, RegistryError, ReloadableRenderer, BASE_ENTRY, PARTIALS_GROUP,
};
