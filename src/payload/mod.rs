//! # Metadata Payloads
//!
//! Concrete payload types carried by [`ResourceMetadata`](crate::ResourceMetadata).
//!
//! ## Payloads
//! - **RawMetadata**: fallback for keys with no registered reader; keeps the
//!   unresolved key and the body bytes verbatim
//! - **SongMetadata**: a single song name, read as one whitespace-delimited token

pub mod raw;
pub mod song;

pub use raw::RawMetadata;
pub use song::SongMetadata;
