//! Error types for template compilation and execution.
//!
//! This module provides [`RenderError`], the error type produced by a
//! [`TemplateEngine`](crate::template::TemplateEngine) and its compiled groups. It
//! abstracts over the underlying engine's errors so the registry never has to
//! know which template language is in use.
//!
//! Registry-level failures (bad patterns, unknown addresses, wrapped engine
//! errors) live in [`RegistryError`](crate::RegistryError).

use thiserror::Error;

/// Error type for engine operations.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Template syntax error or other compilation failure.
    #[error("template error: {0}")]
    Syntax(String),

    /// The requested entry point does not exist in the compiled group.
    #[error("entry point not found: {0}")]
    EntryNotFound(String),

    /// Runtime failure while producing output.
    #[error("execution error: {0}")]
    Execution(String),

    /// A registered template function reported a failure.
    #[error("function `{name}` failed: {message}")]
    Function { name: String, message: String },

    /// Data serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error while writing to the output sink.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for RenderError {
    fn from(err: serde_json::Error) -> Self {
        RenderError::Serialization(err.to_string())
    }
}

/// Finds a template function failure attached to an engine error.
fn function_failure(err: &minijinja::Error) -> Option<RenderError> {
    let mut source = std::error::Error::source(err);
    while let Some(current) = source {
        if let Some(RenderError::Function { name, message }) = current.downcast_ref::<RenderError>()
        {
            return Some(RenderError::Function {
                name: name.clone(),
                message: message.clone(),
            });
        }
        source = current.source();
    }
    None
}

// Missing entry points are detected by the engine before execution, so a
// `TemplateNotFound` reaching this conversion comes from an include or extends
// inside a template body and is an execution failure.
impl From<minijinja::Error> for RenderError {
    fn from(err: minijinja::Error) -> Self {
        use minijinja::ErrorKind;

        if let Some(failure) = function_failure(&err) {
            return failure;
        }
        match err.kind() {
            ErrorKind::SyntaxError | ErrorKind::BadEscape => RenderError::Syntax(err.to_string()),
            ErrorKind::BadSerialization => RenderError::Serialization(err.to_string()),
            _ => RenderError::Execution(err.to_string()),
        }
    }
}
