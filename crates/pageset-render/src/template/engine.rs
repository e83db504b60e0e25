//! Template engine abstraction.
//!
//! This module defines the [`TemplateEngine`] trait, which turns an ordered list
//! of [`TemplateSource`]s into a [`CompiledGroup`], and the [`CompiledGroup`]
//! trait, which executes a named entry point into a byte sink. The registry
//! only ever talks to these two traits; it never interprets template bodies.
//!
//! The default implementation is [`MiniJinjaEngine`].
//!
//! # Entry Points (MiniJinja)
//!
//! Every source is added to the group's environment under its file name
//! (`footer.html`) and its stem (`footer`). The layout is additionally
//! available as `layout`, so pages can write `{% extends "layout" %}`.
//!
//! Inside a page group an entry point is looked up first as a block of the
//! page (blocks inherited from the layout included, page overrides winning),
//! then as a template name. A layout shaped like
//!
//! ```jinja
//! {% block base %}<html>{% block content %}{% endblock %}</html>{% endblock %}
//! ```
//!
//! therefore gives every page that extends it a `base` entry rendering the
//! whole document, while `footer` still resolves to the partial file unless
//! the page or layout defines a `footer` block of its own.
//!
//! In a group without a page (the partials group) entry points are template
//! names only.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use minijinja::value::Rest;
use minijinja::{Environment, Error, ErrorKind, Value};

use crate::error::RenderError;
use crate::functions::FunctionSet;

/// Entry point executed when a page address has no `#entry` suffix.
pub const BASE_ENTRY: &str = "base";

/// Extra name under which the layout is registered in page groups.
pub const LAYOUT_ALIAS: &str = "layout";

/// What part a source plays in a compiled group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceRole {
    Partial,
    Page,
    Layout,
}

/// One template file handed to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSource {
    /// Base file name, e.g. `footer.html`
    pub name: String,
    /// Path the content was read from
    pub path: PathBuf,
    /// Template body
    pub content: String,
    pub role: SourceRole,
}

impl TemplateSource {
    /// Creates a source, deriving its name from the path's file name.
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>, role: SourceRole) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self {
            name,
            path,
            content: content.into(),
            role,
        }
    }

    /// Returns the file name without its extension.
    pub fn stem(&self) -> &str {
        Path::new(&self.name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.name)
    }

    /// Names this source is reachable under inside a compiled group.
    fn aliases(&self) -> Vec<String> {
        let mut names = vec![self.name.clone()];
        if self.stem() != self.name {
            names.push(self.stem().to_string());
        }
        if self.role == SourceRole::Layout && !names.iter().any(|n| n == LAYOUT_ALIAS) {
            names.push(LAYOUT_ALIAS.to_string());
        }
        names
    }
}

/// A bundle of templates compiled together.
pub trait CompiledGroup: Send + Sync {
    /// Executes `entry`, streaming output into `out`.
    ///
    /// Output written before a failure is not retracted.
    fn execute(
        &self,
        entry: &str,
        data: &serde_json::Value,
        out: &mut dyn Write,
    ) -> Result<(), RenderError>;

    /// Template-level entry point names, sorted.
    fn entries(&self) -> Vec<String>;
}

/// Compiles template sources into executable groups.
///
/// Sources arrive in the order partials, page, layout. When two sources claim
/// the same name, the later one wins.
pub trait TemplateEngine: Send + Sync {
    fn compile(
        &self,
        sources: &[TemplateSource],
        functions: &FunctionSet,
    ) -> Result<Box<dyn CompiledGroup>, RenderError>;
}

type ConfigureFn = Arc<dyn Fn(&mut Environment<'static>) + Send + Sync>;

/// MiniJinja-based template engine.
///
/// Each compiled group owns its own [`Environment`], so groups never see each
/// other's templates.
///
/// # Example
///
/// ```rust
/// use pageset_render::template::{MiniJinjaEngine, SourceRole, TemplateEngine, TemplateSource};
/// use pageset_render::FunctionSet;
///
/// let engine = MiniJinjaEngine::new();
/// let sources = vec![TemplateSource::new(
///     "partials/greeting.html",
///     "Hello, {{ name }}!",
///     SourceRole::Partial,
/// )];
/// let group = engine.compile(&sources, &FunctionSet::new()).unwrap();
///
/// let mut out = Vec::new();
/// group
///     .execute("greeting", &serde_json::json!({ "name": "World" }), &mut out)
///     .unwrap();
/// assert_eq!(String::from_utf8(out).unwrap(), "Hello, World!");
/// ```
#[derive(Clone, Default)]
pub struct MiniJinjaEngine {
    configure: Option<ConfigureFn>,
}

impl MiniJinjaEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a hook run on every freshly created environment, after the
    /// function set is installed and before any template is added.
    ///
    /// This allows registering extra filters, tests, globals, or changing
    /// syntax settings.
    pub fn with_environment<F>(mut self, configure: F) -> Self
    where
        F: Fn(&mut Environment<'static>) + Send + Sync + 'static,
    {
        self.configure = Some(Arc::new(configure));
        self
    }
}

impl fmt::Debug for MiniJinjaEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiniJinjaEngine")
            .field("configured", &self.configure.is_some())
            .finish()
    }
}

impl TemplateEngine for MiniJinjaEngine {
    fn compile(
        &self,
        sources: &[TemplateSource],
        functions: &FunctionSet,
    ) -> Result<Box<dyn CompiledGroup>, RenderError> {
        let mut env = Environment::new();
        register_functions(&mut env, functions);
        if let Some(configure) = &self.configure {
            configure(&mut env);
        }

        // Escaping is decided when a template is added, so the callback has to
        // be in place first. Aliases escape like the file they point at.
        let mut file_names = HashMap::new();
        for source in sources {
            for alias in source.aliases() {
                file_names.insert(alias, source.name.clone());
            }
        }
        env.set_auto_escape_callback(move |name| {
            let file_name = file_names.get(name).map(String::as_str).unwrap_or(name);
            minijinja::default_auto_escape_callback(file_name)
        });

        let mut entries = BTreeSet::new();
        let mut root = None;
        for source in sources {
            for alias in source.aliases() {
                env.add_template_owned(alias.clone(), source.content.clone())
                    .map_err(|e| {
                        RenderError::Syntax(format!("{}: {}", source.path.display(), e))
                    })?;
                entries.insert(alias);
            }
            if source.role == SourceRole::Page {
                root = Some(source.name.clone());
            }
        }

        Ok(Box::new(MiniJinjaGroup { env, root, entries }))
    }
}

/// A group compiled by [`MiniJinjaEngine`].
pub struct MiniJinjaGroup {
    env: Environment<'static>,
    /// The page template, when this is a page group
    root: Option<String>,
    entries: BTreeSet<String>,
}

impl MiniJinjaGroup {
    /// Renders `entry` as a block of the root template.
    ///
    /// Returns `Ok(false)` when the root has no such block.
    fn render_root_block(
        &self,
        root: &str,
        entry: &str,
        ctx: &Value,
        out: &mut dyn Write,
    ) -> Result<bool, RenderError> {
        let tmpl = self.env.get_template(root)?;
        // The page is evaluated for its block table only; its own output is dropped.
        let mut captured = tmpl.render_captured_to(ctx, io::sink())?;
        captured.with_state_mut(|state| match state.render_block_to_write(entry, out) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::UnknownBlock => Ok(false),
            Err(err) => Err(err.into()),
        })
    }
}

impl CompiledGroup for MiniJinjaGroup {
    fn execute(
        &self,
        entry: &str,
        data: &serde_json::Value,
        out: &mut dyn Write,
    ) -> Result<(), RenderError> {
        let ctx = Value::from_serialize(data);

        if let Some(root) = &self.root {
            if self.render_root_block(root, entry, &ctx, &mut *out)? {
                return Ok(());
            }
        }

        if !self.entries.contains(entry) {
            return Err(RenderError::EntryNotFound(entry.to_string()));
        }
        let tmpl = self.env.get_template(entry)?;
        tmpl.render_captured_to(&ctx, out)?;
        Ok(())
    }

    fn entries(&self) -> Vec<String> {
        self.entries.iter().cloned().collect()
    }
}

/// Installs every function of the set as both a global function and a filter.
pub fn register_functions(env: &mut Environment<'static>, functions: &FunctionSet) {
    for name in functions.names() {
        let callable = bridge(functions.clone(), name.to_string());
        env.add_function(name.to_string(), callable.clone());
        env.add_filter(name.to_string(), callable);
    }
}

fn bridge(
    functions: FunctionSet,
    name: String,
) -> impl Fn(Rest<Value>) -> Result<Value, Error> + Clone + Send + Sync + 'static {
    move |args: Rest<Value>| {
        let args = args
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| Error::new(ErrorKind::BadSerialization, e.to_string()))?;
        let rv = functions
            .call(&name, &args)
            .map_err(|e| Error::new(ErrorKind::InvalidOperation, e.to_string()).with_source(e))?;
        Ok(Value::from_serialize(&rv))
    }
}
