//! # Metadata Protocol
//!
//! Key-dispatched reconstruction and ownership of metadata values.
//!
//! ## Components
//! - **MetadataFactory**: key to reader registry with raw fallback for unknown keys
//! - **Resource**: owner of a single metadata value with whole-value replacement
//!
//! ## Dispatch
//! ```text
//! create_metadata(key, body)
//!   ├─ key registered   → reader(body)       → typed payload or MalformedStream
//!   └─ key unregistered → RawMetadata(key, remaining body)
//! ```

pub mod factory;
pub mod resource;
