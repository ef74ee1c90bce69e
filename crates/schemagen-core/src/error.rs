use thiserror::Error;

/// Errors raised while assembling the descriptor registry.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Type already registered: {0}")]
    DuplicateType(String),

    #[error("Type {type_key} declares unknown supertype {supertype}")]
    UnknownSupertype { type_key: String, supertype: String },

    #[error("Type {type_key} has a parent-bound parameter on {function} that is not first")]
    MisplacedParentParameter { type_key: String, function: String },
}

impl CoreError {
    /// Create a new DuplicateType error
    pub fn duplicate_type(key: impl Into<String>) -> Self {
        Self::DuplicateType(key.into())
    }

    /// Create a new UnknownSupertype error
    pub fn unknown_supertype(type_key: impl Into<String>, supertype: impl Into<String>) -> Self {
        Self::UnknownSupertype {
            type_key: type_key.into(),
            supertype: supertype.into(),
        }
    }
}

/// Errors raised while a generated field is being resolved.
///
/// These surface through the execution engine as field errors; they never
/// occur during schema generation.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(
        "Argument injection not implemented even though parameter '{parameter}' should be resolved by the argument resolver"
    )]
    InjectionNotImplemented { parameter: String },

    #[error("Missing required argument '{0}'")]
    MissingArgument(String),

    #[error("Invalid value for argument '{name}': {message}")]
    InvalidArgument { name: String, message: String },

    #[error("Bound instance is not a {expected}")]
    TargetMismatch { expected: &'static str },

    #[error("Argument '{parameter}' rejected: {message}")]
    Rejected { parameter: String, message: String },

    #[error("{0}")]
    Failed(String),

    #[error("JSON conversion error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ResolveError {
    /// Create a new InjectionNotImplemented error
    pub fn injection_not_implemented(parameter: impl Into<String>) -> Self {
        Self::InjectionNotImplemented {
            parameter: parameter.into(),
        }
    }

    /// Create a new InvalidArgument error
    pub fn invalid_argument(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a new Rejected error
    pub fn rejected(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rejected {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Create a generic failure
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    /// Check if this error was caused by the request rather than by configuration
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MissingArgument(_) | Self::InvalidArgument { .. } | Self::Rejected { .. }
        )
    }
}

/// Convenience result type for registry operations
pub type Result<T> = std::result::Result<T, CoreError>;
