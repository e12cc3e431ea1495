use crate::{model::FieldKind, traits::KeyKind, value::Value};
use std::{error::Error as StdError, fmt};
use thiserror::Error as ThisError;

///
/// ConfigError
///
/// Raised while a reader or its options are assembled, never from `read()`.
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("key field '{field}' not found on entity '{entity}' or its base entities")]
    FieldNotFound { entity: &'static str, field: String },

    #[error("key field '{field}' on '{entity}' is {found}, expected a {expected} key")]
    FieldKindMismatch {
        entity: &'static str,
        field: String,
        found: FieldKind,
        expected: KeyKind,
    },

    #[error("invalid key field path '{path}'")]
    InvalidFieldPath { path: String },

    #[error("page size must be at least 1")]
    ZeroPageSize,

    #[error("reader name must not be empty")]
    EmptyName,
}

///
/// StoreErrorKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StoreErrorKind {
    /// The store could not be reached or a session could not be opened.
    Connection,
    /// Query execution failed.
    Execution,
    /// Unit-of-work misuse or commit failure.
    Transaction,
    /// The session was used after close.
    Closed,
}

impl fmt::Display for StoreErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Connection => "connection",
            Self::Execution => "execution",
            Self::Transaction => "transaction",
            Self::Closed => "closed",
        };
        write!(f, "{label}")
    }
}

///
/// StoreError
///
/// Failure reported by a store implementation. Readers pass it through
/// untouched inside [`ReadError::Store`].
///

#[derive(Debug, ThisError)]
#[error("store {kind} error: {message}")]
pub struct StoreError {
    pub kind: StoreErrorKind,
    pub message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl StoreError {
    pub fn new(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Connection, message)
    }

    pub fn execution(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Execution, message)
    }

    pub fn transaction(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Transaction, message)
    }

    #[must_use]
    pub fn closed() -> Self {
        Self::new(StoreErrorKind::Closed, "session is closed")
    }

    /// Attach the driver-level cause.
    #[must_use]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

///
/// ReadError
///
/// Everything `ItemReader` lifecycle operations can fail with.
/// End-of-data is `Ok(None)`, not an error.
///

#[derive(Debug, ThisError)]
pub enum ReadError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("reader '{name}' is not open")]
    NotOpen { name: String },

    #[error("reader '{name}' is already open")]
    AlreadyOpen { name: String },

    #[error("bootstrap value {value} for key field '{field}' does not fit the key type")]
    KeyDecode { field: String, value: Value },
}

impl ReadError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Store(_) => ErrorClass::Store,
            Self::Config(_) => ErrorClass::Configuration,
            Self::NotOpen { .. } | Self::AlreadyOpen { .. } => ErrorClass::Lifecycle,
            Self::KeyDecode { .. } => ErrorClass::InvariantViolation,
        }
    }

    /// Whether rerunning the whole step may succeed. Readers never retry
    /// on their own.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Store(err) => matches!(
                err.kind,
                StoreErrorKind::Connection | StoreErrorKind::Execution
            ),
            _ => false,
        }
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}: {self}", self.class())
    }
}

///
/// ErrorClass
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Configuration,
    Store,
    Lifecycle,
    InvariantViolation,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Configuration => "configuration",
            Self::Store => "store",
            Self::Lifecycle => "lifecycle",
            Self::InvariantViolation => "invariant_violation",
        };
        write!(f, "{label}")
    }
}
