use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    /// No value is stored under the key (or it has expired).
    #[error("no value stored under key {0:?}")]
    MissingKey(String),

    #[error("value under key {key:?} is not valid text: {reason}")]
    Decode { key: String, reason: String },

    #[error("store error: {0}")]
    Store(#[from] rcache_store::StoreError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CacheResult<T> = Result<T, CacheError>;
