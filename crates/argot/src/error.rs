//! Error types for resolution, hydration, and execution.
//!
//! [`ArgotError`] is the single error surfaced by the public API. It separates
//! configuration mistakes (a malformed command tree or destination record),
//! input mistakes (missing or malformed values), and failures raised by
//! user-supplied hooks and actions.

use std::error::Error as StdError;

use thiserror::Error;

use crate::value::ValueKind;

/// Errors produced while building, resolving, hydrating, or executing commands.
#[derive(Debug, Error)]
pub enum ArgotError {
    /// The command tree or destination record is malformed.
    ///
    /// Raised at registration time and again as a hydration precondition.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The first positional token does not name any top-level command.
    #[error("no command found for '{name}'")]
    CommandNotFound { name: String },

    /// The argument vector carried no command token at all.
    #[error("missing command")]
    MissingCommand,

    /// A required flag had no explicit, environment, or default value.
    #[error("missing required flag '{name}'")]
    MissingRequiredFlag { name: String },

    /// A required positional argument was not supplied.
    #[error("missing required argument '{name}': need {need}, got {got}")]
    MissingRequiredArgument {
        name: String,
        need: usize,
        got: usize,
    },

    /// A validator rejected the value of a flag or argument.
    #[error("invalid value for '{name}': {source}")]
    ValidationFailed {
        name: String,
        #[source]
        source: ValidationError,
    },

    /// The destination field bound to a descriptor cannot be coerced into.
    #[error("unsupported field type for '{name}': {kind}")]
    UnsupportedFieldType { name: String, kind: String },

    /// A raw value could not be parsed into the destination field's type.
    #[error("failed to set '{name}': {source}")]
    TypeConversion {
        name: String,
        #[source]
        source: ConversionError,
    },

    /// A lifecycle hook failed.
    #[error("{phase} hook of '{command}' failed: {source}")]
    Hook {
        phase: crate::hooks::HookPhase,
        command: String,
        #[source]
        source: anyhow::Error,
    },

    /// The command's action failed.
    #[error("command '{command}' failed: {source}")]
    Action {
        command: String,
        #[source]
        source: anyhow::Error,
    },
}

impl ArgotError {
    /// Creates an [`ArgotError::InvalidConfiguration`].
    pub fn config(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }

    /// Returns the process exit code this error maps to.
    ///
    /// Hook and action failures carrying an [`ExitError`] report its code.
    /// Input errors map to `2`; everything else to `1`.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Hook { source, .. } | Self::Action { source, .. } => {
                if let Some(exit) = source.downcast_ref::<ExitError>() {
                    exit.code()
                } else if let Some(inner) = source.downcast_ref::<ArgotError>() {
                    inner.exit_code()
                } else {
                    1
                }
            }
            Self::MissingCommand
            | Self::CommandNotFound { .. }
            | Self::MissingRequiredFlag { .. }
            | Self::MissingRequiredArgument { .. }
            | Self::ValidationFailed { .. }
            | Self::TypeConversion { .. } => 2,
            Self::InvalidConfiguration(_) | Self::UnsupportedFieldType { .. } => 1,
        }
    }

    /// Returns true for errors caused by a malformed tree or destination record.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfiguration(_) | Self::UnsupportedFieldType { .. }
        )
    }
}

/// A handler error that carries the exit code the process should end with.
///
/// # Example
///
/// ```rust
/// use argot::ExitError;
///
/// fn action() -> anyhow::Result<()> {
///     Err(ExitError::new(anyhow::anyhow!("remote unreachable"), 3).into())
/// }
///
/// let err = action().unwrap_err();
/// assert_eq!(err.downcast_ref::<ExitError>().map(ExitError::code), Some(3));
/// ```
#[derive(Debug, Error)]
#[error("{source}")]
pub struct ExitError {
    code: i32,
    source: anyhow::Error,
}

impl ExitError {
    /// Wraps `source` with an exit code.
    pub fn new(source: impl Into<anyhow::Error>, code: i32) -> Self {
        Self {
            code,
            source: source.into(),
        }
    }

    /// The exit code to report.
    pub fn code(&self) -> i32 {
        self.code
    }

    /// The wrapped error.
    pub fn inner(&self) -> &anyhow::Error {
        &self.source
    }
}

/// A raw string could not be parsed into the requested kind.
#[derive(Debug, Error)]
#[error("cannot parse {raw:?} as {kind}: {source}")]
pub struct ConversionError {
    raw: String,
    kind: ValueKind,
    #[source]
    source: Box<dyn StdError + Send + Sync>,
}

impl ConversionError {
    /// Creates a conversion error wrapping the underlying parse failure.
    pub fn new(
        raw: impl Into<String>,
        kind: ValueKind,
        source: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        Self {
            raw: raw.into(),
            kind,
            source: source.into(),
        }
    }

    /// The raw input that failed to parse.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The kind the input was parsed as.
    pub fn kind(&self) -> ValueKind {
        self.kind
    }
}

/// Outcome of a failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    /// Creates a validation error with a descriptive message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Creates the error reported when an erased validator receives a value
    /// of the wrong runtime type.
    pub fn type_mismatch(expected: &str) -> Self {
        Self::new(format!("invalid type: expected {expected}"))
    }

    /// The failure message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Failure reported by a destination [`Field`](crate::Field) while assigning.
#[derive(Debug, Error)]
pub enum FieldError {
    #[error(transparent)]
    Conversion(#[from] ConversionError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl FieldError {
    /// Attaches the descriptor name, producing the public error.
    pub(crate) fn named(self, name: &str) -> ArgotError {
        match self {
            FieldError::Conversion(source) => ArgotError::TypeConversion {
                name: name.to_string(),
                source,
            },
            FieldError::Validation(source) => ArgotError::ValidationFailed {
                name: name.to_string(),
                source,
            },
        }
    }
}
