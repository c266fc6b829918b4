use thiserror::Error;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers (and tests) can match
/// on without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Validation
    InvalidInput,
    NotFound,
    AlreadyExists,

    // Storage
    /// The embedded database cannot be opened or accessed
    StorageUnavailable,
    /// Any other failure reported by the storage engine
    Persistence,

    // Schema
    /// The database was written by a newer schema than this build knows
    UpgradeConflict,
    /// An applied migration no longer matches its embedded SQL
    ChecksumMismatch,
    MigrationFailed,

    // Integration
    Serialization,
    Io,
    Concurrency,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::StorageUnavailable => "ERR_STORAGE_UNAVAILABLE",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::UpgradeConflict => "ERR_UPGRADE_CONFLICT",
            ExErrorKind::ChecksumMismatch => "ERR_CHECKSUM_MISMATCH",
            ExErrorKind::MigrationFailed => "ERR_MIGRATION_FAILED",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Concurrency => "ERR_CONCURRENCY",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification (`kind`) for programmatic handling plus the
/// operation and entity context needed when reading logs.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
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

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
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
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(source) = &self.source {
            write!(f, " <- {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain error taxonomy for Markkk operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarkkkError {
    /// A document with this id is already stored
    #[error("Document already exists: {document_id}")]
    DocumentAlreadyExists { document_id: String },

    /// No document with this id is stored
    #[error("Document not found: {document_id}")]
    DocumentNotFound { document_id: String },

    /// The database was upgraded by a newer build
    #[error("Database schema version {found} is newer than supported version {supported}")]
    SchemaTooNew { found: u32, supported: u32 },

    /// An applied migration differs from the embedded one
    #[error("Checksum mismatch for migration {migration_id}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        migration_id: String,
        expected: String,
        actual: String,
    },

    #[error("Migration {migration_id} failed: {reason}")]
    MigrationFailed {
        migration_id: String,
        reason: String,
    },

    /// A stored timestamp could not be parsed as RFC 3339
    #[error("Invalid timestamp '{value}': {reason}")]
    InvalidTimestamp { value: String, reason: String },

    #[error("Storage unavailable: {reason}")]
    StorageUnavailable { reason: String },

    /// The connection mutex was poisoned by a panicking holder
    #[error("Database connection lock poisoned")]
    LockPoisoned,

    /// A blocking storage task could not be joined
    #[error("Storage task failed: {reason}")]
    TaskFailed { reason: String },

    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },
}

impl From<MarkkkError> for ExError {
    fn from(err: MarkkkError) -> Self {
        let message = err.to_string();
        match err {
            MarkkkError::DocumentAlreadyExists { document_id } => {
                ExError::new(ExErrorKind::AlreadyExists)
                    .with_entity_id(document_id)
                    .with_message("Document already exists")
            }

            MarkkkError::DocumentNotFound { document_id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(document_id)
                .with_message("Document not found"),

            MarkkkError::SchemaTooNew { .. } => ExError::new(ExErrorKind::UpgradeConflict)
                .with_op("migration")
                .with_message(message),

            MarkkkError::ChecksumMismatch { migration_id, .. } => {
                ExError::new(ExErrorKind::ChecksumMismatch)
                    .with_op("migration_checksum")
                    .with_entity_id(migration_id)
                    .with_message(message)
            }

            MarkkkError::MigrationFailed { migration_id, .. } => {
                ExError::new(ExErrorKind::MigrationFailed)
                    .with_op("migration")
                    .with_entity_id(migration_id)
                    .with_message(message)
            }

            MarkkkError::InvalidTimestamp { .. } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }

            MarkkkError::StorageUnavailable { .. } => {
                ExError::new(ExErrorKind::StorageUnavailable).with_message(message)
            }

            MarkkkError::LockPoisoned | MarkkkError::TaskFailed { .. } => {
                ExError::new(ExErrorKind::Concurrency).with_message(message)
            }

            MarkkkError::InvalidInput { .. } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(message)
            }
        }
    }
}
