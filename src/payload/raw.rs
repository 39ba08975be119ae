//! Fallback payload for unresolved keys.

use crate::core::capability::{MetadataPayload, WireEncode};
use bytes::{Buf, BufMut, Bytes};
use std::fmt;

/// Body of a key nobody registered a reader for.
///
/// Only [`MetadataFactory`](crate::MetadataFactory) builds these. The
/// original key is kept so the value can be re-framed under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMetadata {
    key: String,
    data: Bytes,
}

impl RawMetadata {
    pub(crate) fn new(key: impl Into<String>, data: Bytes) -> Self {
        Self {
            key: key.into(),
            data,
        }
    }

    /// Drain everything left in `source` into a raw payload under `key`
    pub(crate) fn from_remaining(key: &str, source: &mut dyn Buf) -> Self {
        let data = source.copy_to_bytes(source.remaining());
        Self::new(key, data)
    }

    /// The unresolved key this payload was read under
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }
}

impl WireEncode for RawMetadata {
    /// Key length plus data length. This counts more than
    /// [`write_to_stream`](WireEncode::write_to_stream) emits because the key
    /// travels out of band; use [`body_len`](RawMetadata::body_len) for framing.
    fn size_on_wire(&self) -> usize {
        self.key.len() + self.data.len()
    }

    fn write_to_stream(&self, sink: &mut dyn BufMut) {
        sink.put_slice(&self.data);
    }
}

impl RawMetadata {
    /// Number of bytes `write_to_stream` actually emits
    pub fn body_len(&self) -> usize {
        self.data.len()
    }
}

impl MetadataPayload for RawMetadata {
    const KEY: &'static str = "RawMetadata";

    fn key(&self) -> &str {
        &self.key
    }

    fn print(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        write!(out, "Raw data: {}", String::from_utf8_lossy(&self.data))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_remaining_drains_source() {
        let mut source = Bytes::from_static(b"hello world");
        source.advance(6);
        let raw = RawMetadata::from_remaining("Unknown", &mut source);
        assert_eq!(raw.key(), "Unknown");
        assert_eq!(&raw.data()[..], b"world");
        assert!(!source.has_remaining());
    }

    #[test]
    fn test_size_counts_key_and_data() {
        let raw = RawMetadata::new("Key", Bytes::from_static(b"hello"));
        assert_eq!(raw.size_on_wire(), 8);
        assert_eq!(raw.body_len(), 5);

        let mut sink = Vec::new();
        raw.write_to_stream(&mut sink);
        assert_eq!(sink, b"hello");
    }

    #[test]
    fn test_print_is_lossy_utf8() {
        let raw = RawMetadata::new("Key", Bytes::from_static(b"ok\xFF"));
        let mut out = String::new();
        MetadataPayload::print(&raw, &mut out).unwrap();
        assert!(out.starts_with("Raw data: ok"));
    }
}
