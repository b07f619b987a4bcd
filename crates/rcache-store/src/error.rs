/// Errors from backend operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The backend cannot be reached or is no longer usable.
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// A list primitive was used on a scalar key, or the reverse.
    #[error("wrong kind of value held at key {key:?}")]
    WrongType { key: String },

    /// `incr` on a scalar whose content is not a decimal integer.
    #[error("value at key {key:?} is not an integer")]
    NotAnInteger { key: String },

    /// `incr` would overflow a signed 64-bit counter.
    #[error("increment would overflow counter at key {key:?}")]
    IntegerOverflow { key: String },

    /// Expiry must be strictly positive.
    #[error("invalid expiry for key {key:?}")]
    InvalidExpiry { key: String },
}

/// Result alias for backend operations.
pub type StoreResult<T> = Result<T, StoreError>;
