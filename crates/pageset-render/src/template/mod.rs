//! Template compilation and rendering.
//!
//! ## Layers
//!
//! | Module | Role |
//! |--------|------|
//! | [`address`] | Classifies render addresses into page or partial lookups |
//! | [`engine`] | Compiles sources into groups ([`MiniJinjaEngine`] by default) |
//! | [`registry`] | Owns every compiled group behind one lock ([`PageRegistry`]) |
//!
//! [`ReloadableRenderer`] is the narrow interface other crates use to render
//! and trigger reloads without depending on the registry type.
//!
//! ## Template Layout
//!
//! A site is described by three inputs:
//!
//! ```text
//! templates/
//! ├── layout.html          # layout: wraps every page
//! ├── pages/
//! │   ├── home.html        # pages: one compiled group each
//! │   └── about.html
//! └── partials/
//!     ├── header.html      # partials: shared by every group
//!     └── footer.html
//! ```
//!
//! Pages typically extend the layout and fill its blocks:
//!
//! ```jinja
//! {% extends "layout" %}
//! {% block content %}<h1>About</h1>{% endblock %}
//! ```

pub mod address;
pub mod engine;
pub mod registry;
mod renderer;

pub use address::{clean_path, pattern_root, Address};
pub use engine::{
    register_functions, CompiledGroup, MiniJinjaEngine, MiniJinjaGroup, SourceRole,
    TemplateEngine, TemplateSource, BASE_ENTRY, LAYOUT_ALIAS,
};
pub use registry::{CompileInputs, PageRegistry, RegistryError, PARTIALS_GROUP};
pub use renderer::ReloadableRenderer;
