//! The page registry: compiled template groups behind one readers-writer lock.
//!
//! [`PageRegistry`] compiles a layout, a set of partials and a set of pages
//! into independently executable groups, and renders addresses against them.
//!
//! # Groups
//!
//! For every page file matched by the pages pattern the registry compiles one
//! page group from all partials, the page, and the layout (in that order),
//! keyed by the page path as the store returned it after
//! [cleaning](super::address::clean_path). One extra group, keyed
//! [`PARTIALS_GROUP`], holds the partials alone.
//!
//! # Addresses
//!
//! See [`Address`] for the address grammar. An address starting with the pages
//! root selects a page group; anything else names an entry of the partials
//! group.
//!
//! # Locking
//!
//! All state lives in a single `RwLock`. Renders hold the read lock for the
//! whole execution, including writes to the sink. Registration holds the write
//! lock for the whole rebuild, including file reads, so a render never sees a
//! half-built group set.
//!
//! A registration builds its groups into a fresh state and swaps it in only
//! when every group compiled. A failed registration leaves groups, roots and
//! the remembered inputs exactly as they were.
//!
//! # Example
//!
//! ```rust
//! use pageset_render::{CompileInputs, FunctionSet, MemoryStore, PageRegistry};
//!
//! let store = MemoryStore::from_entries(&[
//!     ("partials/footer.html", "<footer>{{ year }}</footer>"),
//!     ("pages/home.html", "{% extends 'layout' %}{% block content %}Home{% endblock %}"),
//!     ("layout.html", "{% block base %}{% block content %}{% endblock %} {% include 'footer' %}{% endblock %}"),
//! ]);
//! let registry = PageRegistry::with_store(store);
//! registry
//!     .register(CompileInputs::new(
//!         FunctionSet::new(),
//!         "partials/*.html",
//!         "pages/*.html",
//!         "layout.html",
//!     ))
//!     .unwrap();
//!
//! let data = serde_json::json!({ "year": 2026 });
//! assert_eq!(
//!     registry.render_to_string("pages/home.html", &data).unwrap(),
//!     "Home <footer>2026</footer>"
//! );
//! assert_eq!(
//!     registry.render_to_string("footer", &data).unwrap(),
//!     "<footer>2026</footer>"
//! );
//! ```

use std::collections::HashMap;
use std::fmt;
use std::io::Write;
use std::path::Path;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;

use serde::Serialize;
use thiserror::Error;

use super::address::{clean_path, pattern_root, Address};
use super::engine::{
    CompiledGroup, MiniJinjaEngine, SourceRole, TemplateEngine, TemplateSource, BASE_ENTRY,
};
use crate::error::RenderError;
use crate::functions::FunctionSet;
use crate::store::{validate_pattern, FsStore, StoreError, TemplateStore};

/// Key of the group compiled from the partials alone.
pub const PARTIALS_GROUP: &str = "partials";

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Everything a registration needs, kept so a reload can repeat it.
#[derive(Debug, Clone)]
pub struct CompileInputs {
    /// Functions made available to every compiled template
    pub functions: FunctionSet,
    /// Glob pattern selecting partial files
    pub partials: String,
    /// Glob pattern selecting page files
    pub pages: String,
    /// Path of the layout file
    pub layout: String,
}

impl CompileInputs {
    pub fn new(
        functions: FunctionSet,
        partials: impl Into<String>,
        pages: impl Into<String>,
        layout: impl Into<String>,
    ) -> Self {
        Self {
            functions,
            partials: partials.into(),
            pages: pages.into(),
            layout: layout.into(),
        }
    }

    /// Rejects empty inputs and malformed patterns.
    fn validate(&self) -> Result<(), RegistryError> {
        for (field, value) in [
            ("partials", &self.partials),
            ("pages", &self.pages),
            ("layout", &self.layout),
        ] {
            if value.is_empty() {
                return Err(RegistryError::InvalidInput { field });
            }
        }
        validate_pattern(&self.partials)?;
        validate_pattern(&self.pages)?;
        Ok(())
    }
}

/// Error type for registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A compilation input was empty.
    #[error("compilation input `{field}` must not be empty")]
    InvalidInput { field: &'static str },

    /// A glob pattern could not be parsed.
    #[error("invalid pattern \"{pattern}\": {message}")]
    Pattern { pattern: String, message: String },

    /// A template file could not be listed or read.
    #[error(transparent)]
    Read(StoreError),

    /// A group failed to compile.
    #[error("failed to compile template group \"{group}\": {source}")]
    Compile {
        group: String,
        #[source]
        source: RenderError,
    },

    /// Rendering or reloading was attempted before any successful registration.
    #[error("no templates have been registered")]
    NotRegistered,

    /// The address selects a page with no compiled group.
    #[error("unable to find template: \"{address}\"")]
    AddressNotFound { address: String },

    /// The group exists but has no such entry point.
    #[error("entry \"{entry}\" not found in \"{group}\"")]
    EntryNotFound { entry: String, group: String },

    /// The entry point failed while producing output.
    #[error("failed to execute \"{entry}\" in \"{group}\": {source}")]
    Execution {
        entry: String,
        group: String,
        #[source]
        source: RenderError,
    },

    /// Render data could not be converted for the engine.
    #[error("failed to serialize render data: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RegistryError {
    fn execution(entry: &str, group: &str, err: RenderError) -> Self {
        match err {
            RenderError::EntryNotFound(_) => RegistryError::EntryNotFound {
                entry: entry.to_string(),
                group: group.to_string(),
            },
            source => RegistryError::Execution {
                entry: entry.to_string(),
                group: group.to_string(),
                source,
            },
        }
    }
}

impl From<StoreError> for RegistryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Pattern { pattern, message } => RegistryError::Pattern { pattern, message },
            other => RegistryError::Read(other),
        }
    }
}

#[derive(Default)]
struct RegistryState {
    groups: HashMap<String, Box<dyn CompiledGroup>>,
    pages_root: String,
    partials_root: String,
    last_inputs: Option<CompileInputs>,
}

/// Registry of compiled page and partial groups.
///
/// The registry is `Send + Sync`; share it behind an `Arc` between request
/// handlers. See the [module documentation](self) for the compilation and
/// locking model.
pub struct PageRegistry {
    engine: Box<dyn TemplateEngine>,
    store: Box<dyn TemplateStore>,
    state: RwLock<RegistryState>,
}

impl Default for PageRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PageRegistry {
    /// Creates an empty registry reading from the filesystem with MiniJinja.
    pub fn new() -> Self {
        Self::with_store(FsStore::new())
    }

    /// Creates an empty registry reading from a custom store.
    pub fn with_store(store: impl TemplateStore + 'static) -> Self {
        Self::with_engine_and_store(Box::new(MiniJinjaEngine::new()), Box::new(store))
    }

    /// Creates an empty registry with an explicit engine and store.
    pub fn with_engine_and_store(
        engine: Box<dyn TemplateEngine>,
        store: Box<dyn TemplateStore>,
    ) -> Self {
        Self {
            engine,
            store,
            state: RwLock::new(RegistryState::default()),
        }
    }

    // State is only ever replaced wholesale, so a panic elsewhere cannot leave
    // it half-updated and poisoning is safe to ignore.
    fn read_state(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Compiles every group described by `inputs` and publishes them.
    ///
    /// Blocks all renders and other registrations until finished.
    ///
    /// # Errors
    ///
    /// Returns an error for empty inputs, malformed patterns, unreadable files
    /// or a group that fails to compile. The registry is left unchanged.
    pub fn register(&self, inputs: CompileInputs) -> Result<(), RegistryError> {
        let mut state = self.write_state();
        self.register_locked(&mut state, inputs)
    }

    /// Repeats the last successful registration with the same inputs.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotRegistered`] if nothing was registered yet,
    /// otherwise the same errors as [`register`](Self::register).
    pub fn reload(&self) -> Result<(), RegistryError> {
        let mut state = self.write_state();
        let inputs = state
            .last_inputs
            .clone()
            .ok_or(RegistryError::NotRegistered)?;
        self.register_locked(&mut state, inputs)
    }

    fn register_locked(
        &self,
        state: &mut RegistryState,
        inputs: CompileInputs,
    ) -> Result<(), RegistryError> {
        let start = Instant::now();
        match self.build(inputs) {
            Ok(next) => {
                tracing::info!(
                    groups = next.groups.len(),
                    pages_root = %next.pages_root,
                    elapsed_ms = elapsed_ms(start),
                    "Templates registered"
                );
                *state = next;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "Template registration failed");
                Err(err)
            }
        }
    }

    fn build(&self, inputs: CompileInputs) -> Result<RegistryState, RegistryError> {
        inputs.validate()?;

        let partial_paths = self.store.glob(&inputs.partials)?;
        let page_paths = self.store.glob(&inputs.pages)?;

        let partials = partial_paths
            .iter()
            .map(|path| self.load(path, SourceRole::Partial))
            .collect::<Result<Vec<_>, _>>()?;
        let layout = self.load(Path::new(&inputs.layout), SourceRole::Layout)?;

        let mut groups = HashMap::with_capacity(page_paths.len() + 1);
        for page_path in &page_paths {
            let key = clean_path(&page_path.to_string_lossy());
            let mut sources = Vec::with_capacity(partials.len() + 2);
            sources.extend(partials.iter().cloned());
            sources.push(self.load(page_path, SourceRole::Page)?);
            sources.push(layout.clone());

            let group = self.compile(&key, &sources, &inputs.functions)?;
            groups.insert(key, group);
        }

        let group = self.compile(PARTIALS_GROUP, &partials, &inputs.functions)?;
        groups.insert(PARTIALS_GROUP.to_string(), group);

        Ok(RegistryState {
            groups,
            pages_root: pattern_root(&inputs.pages),
            partials_root: pattern_root(&inputs.partials),
            last_inputs: Some(inputs),
        })
    }

    fn load(&self, path: &Path, role: SourceRole) -> Result<TemplateSource, RegistryError> {
        let content = self.store.read(path)?;
        Ok(TemplateSource::new(path, content, role))
    }

    fn compile(
        &self,
        key: &str,
        sources: &[TemplateSource],
        functions: &FunctionSet,
    ) -> Result<Box<dyn CompiledGroup>, RegistryError> {
        let group = self
            .engine
            .compile(sources, functions)
            .map_err(|source| RegistryError::Compile {
                group: key.to_string(),
                source,
            })?;
        tracing::debug!(group = %key, sources = sources.len(), "Compiled template group");
        Ok(group)
    }

    /// Renders `address` into `out`.
    ///
    /// `data` is serialized once and handed to the template unchanged. Output
    /// is streamed; on error, whatever was written so far stays written.
    ///
    /// # Errors
    ///
    /// See [`render_value`](Self::render_value).
    pub fn render<T: Serialize + ?Sized>(
        &self,
        out: &mut dyn Write,
        address: &str,
        data: &T,
    ) -> Result<(), RegistryError> {
        let data = serde_json::to_value(data)?;
        self.render_value(out, address, &data)
    }

    /// Renders `address` into `out` with pre-serialized data.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::NotRegistered`] before the first registration
    /// - [`RegistryError::AddressNotFound`] for an unknown page
    /// - [`RegistryError::EntryNotFound`] for an unknown entry point
    /// - [`RegistryError::Execution`] when the template fails at runtime
    pub fn render_value(
        &self,
        out: &mut dyn Write,
        address: &str,
        data: &serde_json::Value,
    ) -> Result<(), RegistryError> {
        let state = self.read_state();
        if state.last_inputs.is_none() {
            return Err(RegistryError::NotRegistered);
        }

        let (group_key, entry) = match Address::parse(address, &state.pages_root) {
            Address::Page { page, entry } => (clean_path(page), entry.unwrap_or(BASE_ENTRY)),
            Address::Partial(name) => (PARTIALS_GROUP.to_string(), name),
        };
        let group = state
            .groups
            .get(&group_key)
            .ok_or_else(|| RegistryError::AddressNotFound {
                address: address.to_string(),
            })?;

        tracing::trace!(group = %group_key, entry, "Rendering template");
        group
            .execute(entry, data, out)
            .map_err(|err| RegistryError::execution(entry, &group_key, err))
    }

    /// Renders `address` into a string.
    pub fn render_to_string<T: Serialize + ?Sized>(
        &self,
        address: &str,
        data: &T,
    ) -> Result<String, RegistryError> {
        let mut out = Vec::new();
        self.render(&mut out, address, data)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    /// Returns true once a registration has succeeded.
    pub fn is_registered(&self) -> bool {
        self.read_state().last_inputs.is_some()
    }

    /// Inputs of the last successful registration.
    pub fn last_inputs(&self) -> Option<CompileInputs> {
        self.read_state().last_inputs.clone()
    }

    /// Directory part of the pages pattern, if registered.
    pub fn pages_root(&self) -> Option<String> {
        let state = self.read_state();
        state.last_inputs.as_ref().map(|_| state.pages_root.clone())
    }

    /// Directory part of the partials pattern, if registered.
    pub fn partials_root(&self) -> Option<String> {
        let state = self.read_state();
        state.last_inputs.as_ref().map(|_| state.partials_root.clone())
    }

    /// Returns all group keys, sorted.
    pub fn group_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.read_state().groups.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Returns the template-level entry points of one group.
    pub fn entries(&self, group: &str) -> Option<Vec<String>> {
        self.read_state().groups.get(group).map(|g| g.entries())
    }
}

impl fmt::Debug for PageRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.read_state();
        f.debug_struct("PageRegistry")
            .field("groups", &state.groups.len())
            .field("pages_root", &state.pages_root)
            .field("partials_root", &state.partials_root)
            .field("registered", &state.last_inputs.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Engine that echoes source contents, keyed by stem; the layout doubles
    /// as the `base` entry. Sources containing `FAIL` do not compile.
    struct MockEngine {
        compiles: Arc<AtomicUsize>,
    }

    struct MockGroup {
        entries: HashMap<String, String>,
    }

    impl TemplateEngine for MockEngine {
        fn compile(
            &self,
            sources: &[TemplateSource],
            _functions: &FunctionSet,
        ) -> Result<Box<dyn CompiledGroup>, RenderError> {
            self.compiles.fetch_add(1, Ordering::SeqCst);
            let mut entries = HashMap::new();
            for source in sources {
                if source.content.contains("FAIL") {
                    return Err(RenderError::Syntax(source.name.clone()));
                }
                entries.insert(source.stem().to_string(), source.content.clone());
                if source.role == SourceRole::Layout {
                    entries.insert(BASE_ENTRY.to_string(), source.content.clone());
                }
            }
            Ok(Box::new(MockGroup { entries }))
        }
    }

    impl CompiledGroup for MockGroup {
        fn execute(
            &self,
            entry: &str,
            _data: &serde_json::Value,
            out: &mut dyn Write,
        ) -> Result<(), RenderError> {
            let content = self
                .entries
                .get(entry)
                .ok_or_else(|| RenderError::EntryNotFound(entry.to_string()))?;
            out.write_all(content.as_bytes())?;
            Ok(())
        }

        fn entries(&self) -> Vec<String> {
            let mut names: Vec<String> = self.entries.keys().cloned().collect();
            names.sort();
            names
        }
    }

    fn mock_registry(store: MemoryStore) -> (PageRegistry, Arc<AtomicUsize>) {
        let compiles = Arc::new(AtomicUsize::new(0));
        let engine = MockEngine {
            compiles: compiles.clone(),
        };
        let registry = PageRegistry::with_engine_and_store(Box::new(engine), Box::new(store));
        (registry, compiles)
    }

    fn site() -> MemoryStore {
        MemoryStore::from_entries(&[
            ("partials/header.html", "HEADER"),
            ("partials/footer.html", "FOOTER"),
            ("pages/home.html", "HOME"),
            ("pages/about.html", "ABOUT"),
            ("layout.html", "LAYOUT"),
        ])
    }

    fn inputs() -> CompileInputs {
        CompileInputs::new(
            FunctionSet::new(),
            "partials/*.html",
            "pages/*.html",
            "layout.html",
        )
    }

    #[test]
    fn test_register_builds_one_group_per_page_plus_partials() {
        let (registry, compiles) = mock_registry(site());
        registry.register(inputs()).unwrap();

        assert_eq!(
            registry.group_keys(),
            vec!["pages/about.html", "pages/home.html", "partials"]
        );
        assert_eq!(compiles.load(Ordering::SeqCst), 3);
        assert_eq!(registry.pages_root().as_deref(), Some("pages"));
        assert_eq!(registry.partials_root().as_deref(), Some("partials"));
        assert!(registry.is_registered());
    }

    #[test]
    fn test_page_group_contains_partials_page_and_layout() {
        let (registry, _) = mock_registry(site());
        registry.register(inputs()).unwrap();

        assert_eq!(
            registry.entries("pages/home.html").unwrap(),
            vec!["base", "footer", "header", "home", "layout"]
        );
        assert_eq!(
            registry.entries(PARTIALS_GROUP).unwrap(),
            vec!["footer", "header"]
        );
    }

    #[test]
    fn test_render_resolution() {
        let (registry, _) = mock_registry(site());
        registry.register(inputs()).unwrap();

        let empty = serde_json::json!({});
        assert_eq!(registry.render_to_string("pages/home.html", &empty).unwrap(), "LAYOUT");
        assert_eq!(
            registry.render_to_string("pages/home.html#home", &empty).unwrap(),
            "HOME"
        );
        assert_eq!(
            registry.render_to_string("pages/about.html#footer", &empty).unwrap(),
            "FOOTER"
        );
        assert_eq!(registry.render_to_string("header", &empty).unwrap(), "HEADER");
    }

    #[test]
    fn test_render_errors() {
        let (registry, _) = mock_registry(site());
        registry.register(inputs()).unwrap();
        let empty = serde_json::json!({});

        let err = registry.render_to_string("pages/missing.html", &empty).unwrap_err();
        assert!(
            matches!(err, RegistryError::AddressNotFound { ref address } if address == "pages/missing.html")
        );

        let err = registry
            .render_to_string("pages/home.html#sidebar", &empty)
            .unwrap_err();
        match err {
            RegistryError::EntryNotFound { entry, group } => {
                assert_eq!(entry, "sidebar");
                assert_eq!(group, "pages/home.html");
            }
            other => panic!("unexpected error: {other}"),
        }

        // Pages are not entries of the partials group.
        let err = registry.render_to_string("home", &empty).unwrap_err();
        assert!(
            matches!(err, RegistryError::EntryNotFound { ref group, .. } if group == PARTIALS_GROUP)
        );
    }

    #[test]
    fn test_render_before_register() {
        let (registry, _) = mock_registry(site());
        let err = registry
            .render_to_string("footer", &serde_json::json!({}))
            .unwrap_err();
        assert!(matches!(err, RegistryError::NotRegistered));
        assert!(registry.pages_root().is_none());
        assert!(matches!(registry.reload(), Err(RegistryError::NotRegistered)));
    }

    #[test]
    fn test_empty_inputs_rejected() {
        let (registry, compiles) = mock_registry(site());
        let mut bad = inputs();
        bad.layout = String::new();

        let err = registry.register(bad).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidInput { field: "layout" }));
        assert_eq!(compiles.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_bad_pattern_rejected_before_compiling() {
        let (registry, compiles) = mock_registry(site());
        let mut bad = inputs();
        bad.pages = "pages/[*.html".to_string();

        let err = registry.register(bad).unwrap_err();
        assert!(matches!(err, RegistryError::Pattern { ref pattern, .. } if pattern == "pages/[*.html"));
        assert_eq!(compiles.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_missing_layout_is_read_error() {
        let (registry, _) = mock_registry(site());
        let mut bad = inputs();
        bad.layout = "missing.html".to_string();

        let err = registry.register(bad).unwrap_err();
        assert!(matches!(err, RegistryError::Read(_)));
        assert!(err.to_string().contains("missing.html"));
    }

    #[test]
    fn test_failed_register_keeps_previous_state() {
        let store = Arc::new(site());
        let (registry, _) = mock_registry_shared(store.clone());
        registry.register(inputs()).unwrap();

        store.insert("pages/about.html", "ABOUT v2");
        store.insert("pages/home.html", "FAIL");

        let err = registry.reload().unwrap_err();
        assert!(
            matches!(err, RegistryError::Compile { ref group, .. } if group == "pages/home.html")
        );

        // Nothing from the failed attempt is visible.
        let empty = serde_json::json!({});
        assert_eq!(
            registry.render_to_string("pages/about.html#about", &empty).unwrap(),
            "ABOUT"
        );
        assert_eq!(
            registry.render_to_string("pages/home.html#home", &empty).unwrap(),
            "HOME"
        );
    }

    #[test]
    fn test_failed_register_with_new_inputs_keeps_roots() {
        let (registry, _) = mock_registry(site());
        registry.register(inputs()).unwrap();

        let other = CompileInputs::new(FunctionSet::new(), "partials/*.html", "other/*.html", "nope.html");
        assert!(registry.register(other).is_err());

        assert_eq!(registry.pages_root().as_deref(), Some("pages"));
        assert_eq!(registry.last_inputs().unwrap().pages, "pages/*.html");
    }

    #[test]
    fn test_reload_picks_up_changes() {
        let store = Arc::new(site());
        let (registry, compiles) = mock_registry_shared(store.clone());
        registry.register(inputs()).unwrap();

        store.insert("pages/contact.html", "CONTACT");
        store.insert("partials/footer.html", "FOOTER v2");
        registry.reload().unwrap();

        let empty = serde_json::json!({});
        assert_eq!(
            registry.render_to_string("pages/contact.html#contact", &empty).unwrap(),
            "CONTACT"
        );
        assert_eq!(registry.render_to_string("footer", &empty).unwrap(), "FOOTER v2");
        assert_eq!(compiles.load(Ordering::SeqCst), 3 + 4);
    }

    #[test]
    fn test_reload_drops_removed_pages() {
        let store = Arc::new(site());
        let (registry, _) = mock_registry_shared(store.clone());
        registry.register(inputs()).unwrap();

        store.remove("pages/about.html");
        registry.reload().unwrap();

        let err = registry
            .render_to_string("pages/about.html", &serde_json::json!({}))
            .unwrap_err();
        assert!(matches!(err, RegistryError::AddressNotFound { .. }));
    }

    #[test]
    fn test_dot_prefixed_patterns_use_cleaned_keys() {
        let store = MemoryStore::from_entries(&[
            ("./partials/footer.html", "FOOTER"),
            ("./pages/home.html", "HOME"),
            ("./layout.html", "LAYOUT"),
        ]);
        let (registry, _) = mock_registry(store);
        registry
            .register(CompileInputs::new(
                FunctionSet::new(),
                "./partials/*.html",
                "./pages/*.html",
                "./layout.html",
            ))
            .unwrap();

        assert_eq!(registry.group_keys(), vec!["pages/home.html", "partials"]);
        assert_eq!(registry.pages_root().as_deref(), Some("pages"));

        let empty = serde_json::json!({});
        assert_eq!(registry.render_to_string("pages/home.html", &empty).unwrap(), "LAYOUT");
        assert_eq!(
            registry.render_to_string("pages//home.html#home", &empty).unwrap(),
            "HOME"
        );
        assert_eq!(registry.render_to_string("footer", &empty).unwrap(), "FOOTER");
    }

    #[test]
    fn test_no_pages_still_builds_partials() {
        let store = MemoryStore::from_entries(&[
            ("partials/footer.html", "FOOTER"),
            ("layout.html", "LAYOUT"),
        ]);
        let (registry, _) = mock_registry(store);
        registry.register(inputs()).unwrap();

        assert_eq!(registry.group_keys(), vec!["partials"]);
    }

    #[test]
    fn test_debug_output() {
        let (registry, _) = mock_registry(site());
        registry.register(inputs()).unwrap();
        let debug = format!("{registry:?}");
        assert!(debug.contains("PageRegistry"));
        assert!(debug.contains("groups: 3"));
    }

    struct SharedStore(Arc<MemoryStore>);

    impl TemplateStore for SharedStore {
        fn glob(&self, pattern: &str) -> Result<Vec<std::path::PathBuf>, StoreError> {
            self.0.glob(pattern)
        }

        fn read(&self, path: &Path) -> Result<String, StoreError> {
            self.0.read(path)
        }
    }

    fn mock_registry_shared(store: Arc<MemoryStore>) -> (PageRegistry, Arc<AtomicUsize>) {
        let compiles = Arc::new(AtomicUsize::new(0));
        let engine = MockEngine {
            compiles: compiles.clone(),
        };
        let registry =
            PageRegistry::with_engine_and_store(Box::new(engine), Box::new(SharedStore(store)));
        (registry, compiles)
    }
}
