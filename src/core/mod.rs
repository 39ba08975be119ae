//! # Core Metadata Components
//!
//! The type-erased metadata value, the payload capability traits, and the
//! frame format that carries a key alongside its body.
//!
//! ## Components
//! - **Capability**: payload traits and the `has_size_on_wire!` probe
//! - **Metadata**: `ResourceMetadata`, the shared immutable value
//! - **Frame**: key-prefixed framing for byte streams
//!
//! ## Wire Format
//! ```text
//! [KeyLen(2)] [Key(N)] [BodyLen(4)] [Body(M)]
//! ```

pub mod capability;
pub mod frame;
pub mod metadata;
