use std::fmt;

// === NetworkError ===

/// Failures of a single round-trip to the backend API.
///
/// A non-2xx status and a transport failure are distinct variants for logging,
/// but controllers treat every variant the same way.
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkError {
    /// The server answered with a non-success HTTP status.
    Status(u16),
    /// The request never completed (connection refused, reset, timeout).
    Transport(String),
    /// The body was not the JSON shape the caller expected.
    Decode(String),
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkError::Status(code) => write!(f, "Server responded with status {}", code),
            NetworkError::Transport(msg) => write!(f, "Transport failure: {}", msg),
            NetworkError::Decode(msg) => write!(f, "Malformed response: {}", msg),
        }
    }
}

impl std::error::Error for NetworkError {}

// === ValidationError ===

/// Input rejected on the client before any request is issued.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The field was empty after trimming.
    Empty(&'static str),
    /// The field exceeded its character limit.
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
    /// A happiness rating of 0 means "not yet rated" and is never sent.
    ZeroRating,
    /// Only the author may edit a comment.
    NotOwner(i64),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Empty(field) => write!(f, "{} cannot be empty", field),
            ValidationError::TooLong { field, max, actual } => write!(
                f,
                "{} too long ({} characters, max {})",
                field, actual, max
            ),
            ValidationError::ZeroRating => write!(f, "Rating must be between 1 and 100"),
            ValidationError::NotOwner(id) => write!(f, "Not the author of comment {}", id),
        }
    }
}

impl std::error::Error for ValidationError {}

// === ActionError ===

/// Outcome of a failed user action (like, rate, post, edit, delete, report, load).
#[derive(Debug, Clone, PartialEq)]
pub enum ActionError {
    /// Caught locally, no network cost.
    Validation(ValidationError),
    /// The server answered well-formed JSON with `success: false`.
    Business(String),
    /// Non-2xx status or transport failure.
    Network(NetworkError),
}

impl ActionError {
    /// Business and network failures share messaging and rollback handling.
    pub fn is_remote(&self) -> bool {
        matches!(self, ActionError::Business(_) | ActionError::Network(_))
    }
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionError::Validation(err) => write!(f, "Validation failed: {}", err),
            ActionError::Business(msg) => write!(f, "Request unsuccessful: {}", msg),
            ActionError::Network(err) => write!(f, "Network error: {}", err),
        }
    }
}

impl std::error::Error for ActionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ActionError::Validation(err) => Some(err),
            ActionError::Network(err) => Some(err),
            ActionError::Business(_) => None,
        }
    }
}

impl From<ValidationError> for ActionError {
    fn from(err: ValidationError) -> Self {
        ActionError::Validation(err)
    }
}

impl From<NetworkError> for ActionError {
    fn from(err: NetworkError) -> Self {
        ActionError::Network(err)
    }
}

// === StoreError ===

/// Errors related to the client-local key/value store.
#[derive(Debug)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    IoError(String),
    /// The backing file is not a JSON object of strings.
    SerializationError(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::IoError(msg) => write!(f, "Local store I/O error: {}", msg),
            StoreError::SerializationError(msg) => {
                write!(f, "Local store serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for StoreError {}

// === SettingsError ===

/// Errors related to client settings.
#[derive(Debug)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    IoError(String),
    /// Failed to serialize or deserialize settings.
    SerializationError(String),
    /// A value failed validation.
    InvalidValue(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::IoError(msg) => write!(f, "Settings I/O error: {}", msg),
            SettingsError::SerializationError(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
            SettingsError::InvalidValue(msg) => write!(f, "Invalid settings value: {}", msg),
        }
    }
}

impl std::error::Error for SettingsError {}
