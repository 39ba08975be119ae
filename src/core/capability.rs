//! # Payload Capabilities
//!
//! Traits a type must implement to be carried inside a
//! [`ResourceMetadata`](crate::ResourceMetadata), plus a compile-time probe
//! answering "can this type report its wire size?".
//!
//! ## Traits
//! - [`WireEncode`]: wire size and body serialization
//! - [`MetadataPayload`]: static key and human-readable printing on top of [`WireEncode`]
//! - [`ReadFromStream`]: reconstruction from a body stream, used by
//!   [`MetadataFactory::register`](crate::MetadataFactory::register)
//!
//! ## Detection
//! Generic code gates on `T: WireEncode` bounds. For concrete types where a
//! boolean is more convenient, [`has_size_on_wire!`](crate::has_size_on_wire)
//! resolves through autoref method lookup at compile time:
//!
//! ```rust
//! use resource_metadata::has_size_on_wire;
//! use resource_metadata::payload::SongMetadata;
//!
//! assert!(has_size_on_wire!(SongMetadata));
//! assert!(!has_size_on_wire!(String));
//! ```

use crate::error::Result;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::any::Any;
use std::fmt;
use std::marker::PhantomData;

/// Body serialization contract.
///
/// `write_to_stream` must emit exactly `size_on_wire` bytes.
pub trait WireEncode {
    /// Number of bytes `write_to_stream` emits
    fn size_on_wire(&self) -> usize;

    /// Write the payload body (never the key) into `sink`
    fn write_to_stream(&self, sink: &mut dyn BufMut);
}

/// A concrete metadata payload.
pub trait MetadataPayload: WireEncode + Any + Send + Sync {
    /// Wire-format type identifier shared by every value of this type
    const KEY: &'static str;

    /// Key this value travels under
    fn key(&self) -> &str {
        Self::KEY
    }

    /// Human-readable description, diagnostics only
    fn print(&self, out: &mut dyn fmt::Write) -> fmt::Result;
}

/// Reconstruction of a payload from a body stream positioned at its start.
pub trait ReadFromStream: MetadataPayload + Sized {
    fn read_from_stream(source: &mut dyn Buf) -> Result<Self>;
}

/// Wire size of any encodable value.
#[inline]
pub fn size_on_wire<T: WireEncode + ?Sized>(value: &T) -> usize {
    value.size_on_wire()
}

/// Serialize a value's body into a freshly allocated buffer sized from `size_on_wire`.
pub fn encode_to_bytes<T: WireEncode + ?Sized>(value: &T) -> Bytes {
    let mut buf = BytesMut::with_capacity(value.size_on_wire());
    value.write_to_stream(&mut buf);
    buf.freeze()
}

/// Zero-sized probe used by [`has_size_on_wire!`](crate::has_size_on_wire).
pub struct Probe<T: ?Sized>(PhantomData<fn() -> PhantomData<T>>);

impl<T: ?Sized> Probe<T> {
    #[allow(clippy::new_without_default)]
    pub const fn new() -> Self {
        Probe(PhantomData)
    }
}

/// Selected when `T: WireEncode` (matches `&Probe<T>` by value).
pub trait HasSizeOnWire {
    fn has_size_on_wire(&self) -> bool {
        true
    }
}

impl<T: WireEncode + ?Sized> HasSizeOnWire for Probe<T> {}

/// Selected otherwise (only reachable after an extra autoref).
pub trait LacksSizeOnWire {
    fn has_size_on_wire(&self) -> bool {
        false
    }
}

impl<T: ?Sized> LacksSizeOnWire for &Probe<T> {}

/// Compile-time check whether a concrete type implements [`WireEncode`].
///
/// Only meaningful for concrete types; inside generic code use a
/// `T: WireEncode` bound instead.
#[macro_export]
macro_rules! has_size_on_wire {
    ($ty:ty) => {{
        #[allow(unused_imports)]
        use $crate::core::capability::{HasSizeOnWire as _, LacksSizeOnWire as _};
        (&$crate::core::capability::Probe::<$ty>::new()).has_size_on_wire()
    }};
}
