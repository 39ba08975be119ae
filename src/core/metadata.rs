//! # Resource Metadata
//!
//! [`ResourceMetadata`] is a type-erased, immutable handle to exactly one
//! concrete payload. Clones share the payload through an `Arc`; nothing hands
//! out a mutable reference, so sharing is safe across threads.
//!
//! The concrete type can be recovered with [`ResourceMetadata::extract`],
//! which compares the stored [`TypeId`] tag before downcasting and returns
//! `None` on mismatch.
//!
//! ## Usage
//! ```rust
//! use resource_metadata::payload::SongMetadata;
//! use resource_metadata::ResourceMetadata;
//!
//! let meta = ResourceMetadata::new(SongMetadata::new("HeyDJ").unwrap());
//! assert_eq!(meta.key(), "SongMetadata");
//! assert_eq!(meta.size_on_wire(), 5);
//! assert_eq!(meta.extract::<SongMetadata>().map(|s| s.song_name()), Some("HeyDJ"));
//! ```

use crate::core::capability::{encode_to_bytes, MetadataPayload, WireEncode};
use bytes::{BufMut, Bytes};
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// Object-safe view over a [`MetadataPayload`].
trait ErasedPayload: Send + Sync {
    fn key(&self) -> &str;
    fn size_on_wire(&self) -> usize;
    fn write_to_stream(&self, sink: &mut dyn BufMut);
    fn print(&self, out: &mut dyn fmt::Write) -> fmt::Result;
    fn type_name(&self) -> &'static str;
    fn as_any(&self) -> &dyn Any;
}

impl<T: MetadataPayload> ErasedPayload for T {
    fn key(&self) -> &str {
        MetadataPayload::key(self)
    }

    fn size_on_wire(&self) -> usize {
        WireEncode::size_on_wire(self)
    }

    fn write_to_stream(&self, sink: &mut dyn BufMut) {
        WireEncode::write_to_stream(self, sink)
    }

    fn print(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        MetadataPayload::print(self, out)
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Copyable, immutable, type-erased metadata value
#[derive(Clone)]
pub struct ResourceMetadata {
    payload: Arc<dyn ErasedPayload>,
    tag: TypeId,
}

impl ResourceMetadata {
    /// Wrap a concrete payload, taking ownership of it
    pub fn new<T: MetadataPayload>(payload: T) -> Self {
        Self {
            payload: Arc::new(payload),
            tag: TypeId::of::<T>(),
        }
    }

    /// Key of the wrapped payload (registered key, or the unresolved key for raw payloads)
    pub fn key(&self) -> &str {
        self.payload.key()
    }

    /// Exact number of bytes [`write_to_stream`](Self::write_to_stream) emits
    pub fn size_on_wire(&self) -> usize {
        self.payload.size_on_wire()
    }

    /// Serialize the payload body. The key is not written.
    pub fn write_to_stream(&self, sink: &mut dyn BufMut) {
        self.payload.write_to_stream(sink)
    }

    /// Serialize the payload body into a new buffer
    pub fn to_bytes(&self) -> Bytes {
        encode_to_bytes(self)
    }

    /// Write a human-readable description. Not part of the wire contract.
    pub fn print(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        self.payload.print(out)
    }

    /// Borrow the payload as `T` if that is its concrete type
    pub fn extract<T: MetadataPayload>(&self) -> Option<&T> {
        if self.tag != TypeId::of::<T>() {
            return None;
        }
        self.payload.as_any().downcast_ref::<T>()
    }

    /// Whether the payload's concrete type is `T`
    pub fn is<T: MetadataPayload>(&self) -> bool {
        self.tag == TypeId::of::<T>()
    }

    /// Rust type name of the wrapped payload
    pub fn type_name(&self) -> &'static str {
        self.payload.type_name()
    }

    /// Whether two values share the same payload instance
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.payload, &b.payload)
    }
}

impl WireEncode for ResourceMetadata {
    fn size_on_wire(&self) -> usize {
        self.payload.size_on_wire()
    }

    fn write_to_stream(&self, sink: &mut dyn BufMut) {
        self.payload.write_to_stream(sink)
    }
}

impl<T: MetadataPayload> From<T> for ResourceMetadata {
    fn from(payload: T) -> Self {
        Self::new(payload)
    }
}

impl fmt::Display for ResourceMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.print(f)
    }
}

impl fmt::Debug for ResourceMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceMetadata")
            .field("key", &self.key())
            .field("type", &self.type_name())
            .field("size_on_wire", &self.size_on_wire())
            .finish()
    }
}
