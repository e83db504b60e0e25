//! Request loop for the demo server.
//!
//! Each input line is one request: an address to render. Requests pass
//! through the pre-dispatch hooks (template reload first) and are rendered to
//! the output sink with the data loaded at startup.

use std::io::{BufRead, Write};
use std::sync::Arc;

use anyhow::Context;
use pageset_dispatch::{HookError, Hooks, ReloadHook};
use pageset_render::{
    FunctionError, FunctionSet, PageRegistry, ReloadableRenderer, TemplateConfig,
};
use serde_json::Value;

/// Per-request context seen by hooks.
#[derive(Debug, Clone)]
pub struct Request {
    pub address: String,
}

/// Counts reported after the input is exhausted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServeSummary {
    pub served: usize,
    pub failed: usize,
}

/// Functions available to the demo templates.
pub fn functions() -> FunctionSet {
    FunctionSet::new()
        .add("upper", |args| {
            let text = args
                .first()
                .and_then(Value::as_str)
                .ok_or_else(|| FunctionError::new("upper expects a string"))?;
            Ok(Value::from(text.to_uppercase()))
        })
        .add("join", |args| {
            let items = args
                .first()
                .and_then(Value::as_array)
                .ok_or_else(|| FunctionError::new("join expects a list"))?;
            let separator = args.get(1).and_then(Value::as_str).unwrap_or(", ");
            let parts: Vec<String> = items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect();
            Ok(Value::from(parts.join(separator)))
        })
}

pub struct Server {
    registry: Arc<PageRegistry>,
    hooks: Hooks<Request>,
    data: Value,
}

impl Server {
    /// Registers the configured templates and wires the reload hook.
    pub fn from_config(config: &TemplateConfig, data: Value) -> anyhow::Result<Self> {
        let registry = Arc::new(PageRegistry::new());
        registry
            .register(config.inputs(functions()))
            .context("failed to register templates")?;

        let renderer: Arc<dyn ReloadableRenderer> = registry.clone();
        let hooks = Hooks::new()
            .pre_dispatch(ReloadHook::new(renderer, config.reload).into_pre_dispatch())
            .pre_dispatch(|req: &mut Request| {
                if req.address.is_empty() {
                    return Err(HookError::pre_dispatch("empty address"));
                }
                Ok(())
            });

        Ok(Self {
            registry,
            hooks,
            data,
        })
    }

    pub fn registry(&self) -> &PageRegistry {
        &self.registry
    }

    /// Serves one request.
    pub fn handle(&self, address: &str, out: &mut dyn Write) -> anyhow::Result<()> {
        let mut request = Request {
            address: address.to_string(),
        };
        self.hooks.dispatch(&mut request, |req| {
            self.registry
                .render_value(out, &req.address, &self.data)
                .with_context(|| format!("failed to render \"{}\"", req.address))
        })
    }

    /// Serves every non-blank, non-comment line of `input`.
    ///
    /// A failed request is logged and counted; serving continues.
    pub fn serve(&self, input: impl BufRead, out: &mut dyn Write) -> anyhow::Result<ServeSummary> {
        let mut summary = ServeSummary::default();
        for line in input.lines() {
            let line = line.context("failed to read request")?;
            let address = line.trim();
            if address.is_empty() || address.starts_with("//") {
                continue;
            }

            match self.handle(address, out) {
                Ok(()) => {
                    writeln!(out)?;
                    summary.served += 1;
                    tracing::debug!(address, "Request served");
                }
                Err(err) => {
                    summary.failed += 1;
                    tracing::error!(address, error = %format!("{err:#}"), "Request failed");
                }
            }
        }
        out.flush()?;
        Ok(summary)
    }
}
