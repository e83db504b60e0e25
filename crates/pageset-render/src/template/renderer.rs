//! The renderer seam used by request-handling layers.
//!
//! Code that only needs to render addresses and trigger reloads should depend
//! on [`ReloadableRenderer`] rather than on [`PageRegistry`] directly, so it
//! can be exercised against a stub.

use std::io::Write;

use super::registry::{PageRegistry, RegistryError};

/// Something that renders addresses and can recompile itself.
///
/// The trait is object safe; share implementations as
/// `Arc<dyn ReloadableRenderer>`.
pub trait ReloadableRenderer: Send + Sync {
    /// Recompiles from the last successful inputs.
    fn reload(&self) -> Result<(), RegistryError>;

    /// Renders `address` into `out`.
    fn render(
        &self,
        out: &mut dyn Write,
        address: &str,
        data: &serde_json::Value,
    ) -> Result<(), RegistryError>;
}

impl ReloadableRenderer for PageRegistry {
    fn reload(&self) -> Result<(), RegistryError> {
        PageRegistry::reload(self)
    }

    fn render(
        &self,
        out: &mut dyn Write,
        address: &str,
        data: &serde_json::Value,
    ) -> Result<(), RegistryError> {
        self.render_value(out, address, data)
    }
}
