//! Error types for compiling documents and driving transitions.
//!
//! Compile-time problems ([`CompileError`]) are always reported in full:
//! every syntax error or every validation violation, never a partial result.
//! Runtime problems ([`EngineError`]) abort a single `trigger` call and leave
//! the compiled machine untouched.

use fsml_syntax::SyntaxErrors;
use std::fmt;
use thiserror::Error;

/// Every structural violation found in one validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors(pub Vec<String>);

impl ValidationErrors {
    pub fn messages(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn push(&mut self, message: impl Into<String>) {
        self.0.push(message.into());
    }

    pub(crate) fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.0.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("\n"))
    }
}

impl std::error::Error for ValidationErrors {}

/// Failure to turn a document into an [`Engine`](crate::Engine).
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("syntax errors:\n{0}")]
    Syntax(#[from] SyntaxErrors),

    #[error("schema validation failed:\n{0}")]
    Validation(#[from] ValidationErrors),

    #[error("failed to read document: {0}")]
    Io(#[from] std::io::Error),
}

impl CompileError {
    pub fn code(&self) -> &'static str {
        match self {
            CompileError::Syntax(_) => "SYNTAX_ERROR",
            CompileError::Validation(_) => "VALIDATION_ERROR",
            CompileError::Io(_) => "IO_ERROR",
        }
    }
}

/// Misuse of the task registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("task already exists: {name}")]
    AlreadyExists { name: String },

    #[error("task not found: {name}")]
    NotFound { name: String },
}

/// Failure of a single `trigger` call.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("entity does not implement the stateful capability")]
    MissingCapability,

    #[error("cannot fire '{event}' from state '{state}'")]
    NotAdmissible { event: String, state: String },

    #[error("task not found: {task} (hook '{hook}')")]
    TaskNotFound { task: String, hook: String },

    #[error("task '{task}' failed during '{hook}': {source}")]
    TaskFailed {
        task: String,
        hook: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to set entity state to '{state}': {source}")]
    SetState {
        state: String,
        #[source]
        source: anyhow::Error,
    },
}

impl EngineError {
    /// Stable identifier for the error kind, independent of its message.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::MissingCapability => "MISSING_CAPABILITY",
            EngineError::NotAdmissible { .. } => "TRANSITION_NOT_ADMISSIBLE",
            EngineError::TaskNotFound { .. } => "TASK_NOT_FOUND",
            EngineError::TaskFailed { .. } => "TASK_FAILED",
            EngineError::SetState { .. } => "SET_STATE_FAILED",
        }
    }

    /// True for failures raised while hooks were running.
    pub fn is_hook_failure(&self) -> bool {
        matches!(self, EngineError::TaskNotFound { .. } | EngineError::TaskFailed { .. })
    }
}
