//! # Error Types
//!
//! Error handling for metadata construction, registration, and framing.
//!
//! ## Error Categories
//! - **Registry Errors**: duplicate registrations, unregistering absent keys
//! - **Stream Errors**: a registered reader could not parse the body it was given
//! - **Payload Errors**: in-memory payload values that cannot be represented on the wire
//! - **Frame Errors**: truncated or oversized key/body frames
//!
//! Unknown keys during reconstruction are *not* errors: the factory falls back
//! to [`RawMetadata`](crate::payload::RawMetadata). A type mismatch on
//! [`ResourceMetadata::extract`](crate::ResourceMetadata::extract) is not an
//! error either; it yields `None`.
//!
//! ## Example Usage
//! ```rust
//! use resource_metadata::error::{MetadataError, Result};
//! use resource_metadata::MetadataFactory;
//! use tracing::{error, info};
//!
//! fn register_twice(factory: &MetadataFactory) -> Result<()> {
//!     resource_metadata::payload::song::register_song(factory)?;
//!     resource_metadata::payload::song::register_song(factory)
//! }
//!
//! let factory = MetadataFactory::new();
//! match register_twice(&factory) {
//!     Ok(()) => info!("registered"),
//!     Err(MetadataError::DuplicateKey(key)) => error!(%key, "already registered"),
//!     Err(e) => error!(error = %e, "registration failed"),
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
pub mod constants {
    /// Factory lock errors
    pub const ERR_FACTORY_WRITE_LOCK: &str = "Failed to acquire write lock on metadata factory";
    pub const ERR_FACTORY_READ_LOCK: &str = "Failed to acquire read lock on metadata factory";

    /// Stream parsing errors
    pub const ERR_MISSING_TOKEN: &str = "Expected a whitespace-delimited token";
    pub const ERR_TOKEN_NOT_UTF8: &str = "Token is not valid UTF-8";

    /// Frame errors
    pub const ERR_TRUNCATED_KEY_HEADER: &str = "Frame truncated before key length";
    pub const ERR_TRUNCATED_KEY: &str = "Frame truncated inside key";
    pub const ERR_TRUNCATED_BODY_HEADER: &str = "Frame truncated before body length";
    pub const ERR_TRUNCATED_BODY: &str = "Frame truncated inside body";
    pub const ERR_KEY_NOT_UTF8: &str = "Frame key is not valid UTF-8";
    pub const ERR_EMPTY_KEY: &str = "Frame key is empty";
}

/// Primary error type for all metadata operations
#[derive(Error, Debug, Serialize, Deserialize)]
pub enum MetadataError {
    #[error("I/O error: {0}")]
    #[serde(skip_serializing, skip_deserializing)]
    Io(#[from] io::Error),

    /// A reader is already registered under this key.
    #[error("Duplicate metadata key: {0}")]
    DuplicateKey(String),

    /// No reader is registered under this key.
    #[error("Unknown metadata key: {0}")]
    UnknownKey(String),

    /// A registered reader could not parse the body it was handed.
    #[error("Malformed metadata stream: {0}")]
    MalformedStream(String),

    /// A payload value was rejected at construction.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    #[error("Key too long: {0} bytes")]
    OversizedKey(usize),

    #[error("Body too large: {0} bytes")]
    OversizedBody(usize),

    #[error("Synchronization primitive poisoned")]
    LockPoisoned,

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Type alias for Results using MetadataError
pub type Result<T> = std::result::Result<T, MetadataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            MetadataError::DuplicateKey("SongMetadata".into()).to_string(),
            "Duplicate metadata key: SongMetadata"
        );
        assert_eq!(
            MetadataError::UnknownKey("Nope".into()).to_string(),
            "Unknown metadata key: Nope"
        );
        assert_eq!(
            MetadataError::OversizedBody(42).to_string(),
            "Body too large: 42 bytes"
        );
    }

    #[test]
    fn test_io_conversion() {
        let err: MetadataError = io::Error::new(io::ErrorKind::UnexpectedEof, "eof").into();
        assert!(matches!(err, MetadataError::Io(_)));
    }
}
