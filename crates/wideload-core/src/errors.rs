use thiserror::Error;
use wideload_core_types::UnitId;

/// Result type alias using WideLoadError
pub type Result<T> = std::result::Result<T, WideLoadError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for
/// programmatic error handling and test assertions. The accumulator's
/// mutators are total apart from numeric coercion, so the taxonomy is
/// deliberately small.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    InvalidConfig,
    /// A stored value could not be coerced to an integer
    Coercion,
    /// Integer arithmetic left the i64 range
    Overflow,
    Serialization,
    Io,
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::Coercion => "ERR_COERCION",
            ExErrorKind::Overflow => "ERR_OVERFLOW",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries classification fields for programmatic handling and optional
/// context (operation, entry key, unit of work) for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    key: Option<String>,
    unit_id: Option<UnitId>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            key: None,
            unit_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entry key context
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Add unit of work context
    pub fn with_unit_id(mut self, unit_id: UnitId) -> Self {
        self.unit_id = Some(unit_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn unit_id(&self) -> Option<&UnitId> {
        self.unit_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(key) = &self.key {
            write!(f, " (key: {})", key)?;
        }
        if let Some(unit_id) = &self.unit_id {
            write!(f, " (unit_id: {})", unit_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for WideLoad operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WideLoadError {
    /// Stored value has no integer interpretation
    #[error("Cannot coerce value of type {found} at key '{key}' to an integer")]
    NotCoercible { key: String, found: &'static str },

    /// Increment or decrement overflowed i64
    #[error("Integer overflow at key '{key}': {current} + {amount}")]
    IntegerOverflow {
        key: String,
        current: i64,
        amount: i64,
    },

    /// Configuration value could not be parsed
    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidConfig { field: String, reason: String },

    /// Unknown log level name
    #[error("Unknown log level: {level}")]
    UnknownLogLevel { level: String },

    /// Side-channel payload could not be encoded or decoded
    #[error("Serialization failed: {reason}")]
    Serialization { reason: String },

    /// Configuration file could not be read
    #[error("Failed to read '{path}': {reason}")]
    Io { path: String, reason: String },
}

impl From<WideLoadError> for ExError {
    fn from(err: WideLoadError) -> Self {
        let message = err.to_string();
        match err {
            WideLoadError::NotCoercible { key, .. } => ExError::new(ExErrorKind::Coercion)
                .with_op("increment")
                .with_key(key)
                .with_message(message),
            WideLoadError::IntegerOverflow { key, .. } => ExError::new(ExErrorKind::Overflow)
                .with_op("increment")
                .with_key(key)
                .with_message(message),
            WideLoadError::InvalidConfig { .. } | WideLoadError::UnknownLogLevel { .. } => {
                ExError::new(ExErrorKind::InvalidConfig)
                    .with_op("load_config")
                    .with_message(message)
            }
            WideLoadError::Serialization { .. } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
            WideLoadError::Io { .. } => ExError::new(ExErrorKind::Io)
                .with_op("load_config")
                .with_message(message),
        }
    }
}

impl From<serde_json::Error> for WideLoadError {
    fn from(err: serde_json::Error) -> Self {
        WideLoadError::Serialization {
            reason: err.to_string(),
        }
    }
}
