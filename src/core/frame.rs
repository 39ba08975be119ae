//! # Metadata Frames
//!
//! A payload body does not carry its key. To move metadata through a single
//! byte stream, each value is wrapped in a frame:
//!
//! ```text
//! [KeyLen(2)] [Key(KeyLen)] [BodyLen(4)] [Body(BodyLen)]
//! ```
//!
//! Integers are big-endian. The key is UTF-8. On decode the factory receives
//! a buffer holding exactly the body, so a fallback payload captures the body
//! and nothing from the next frame.
//!
//! ## Security
//! - Key and body lengths are checked against [`FramingConfig`] before any allocation
//! - Truncated input is rejected without consuming a partial frame
//! - A registered reader must consume exactly the frame body

use crate::config::FramingConfig;
use crate::core::metadata::ResourceMetadata;
use crate::error::{constants, MetadataError, Result};
use crate::protocol::factory::MetadataFactory;
use crate::utils::metrics::Timer;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::io::IoSlice;
use tracing::{debug, instrument, trace};

/// Size of the key length prefix
pub const KEY_LEN_SIZE: usize = 2;

/// Size of the body length prefix
pub const BODY_LEN_SIZE: usize = 4;

/// Encoder/decoder for key-prefixed metadata frames
#[derive(Debug, Clone, Default)]
pub struct FrameCodec {
    limits: FramingConfig,
}

impl FrameCodec {
    pub fn new(limits: FramingConfig) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &FramingConfig {
        &self.limits
    }

    /// Encoded size of a frame carrying `meta`, used as a capacity hint.
    ///
    /// Exact for payloads whose wire size equals their body length; an upper
    /// bound for raw payloads, whose wire size also counts the key.
    pub fn frame_len(meta: &ResourceMetadata) -> usize {
        KEY_LEN_SIZE + meta.key().len() + BODY_LEN_SIZE + meta.size_on_wire()
    }

    /// Encode `meta` into a new buffer
    pub fn encode(&self, meta: &ResourceMetadata) -> Result<Bytes> {
        let mut dst = BytesMut::with_capacity(Self::frame_len(meta));
        self.encode_into(meta, &mut dst)?;
        Ok(dst.freeze())
    }

    /// Append the frame for `meta` to `dst`. On error `dst` is left as it was.
    pub fn encode_into(&self, meta: &ResourceMetadata, dst: &mut BytesMut) -> Result<()> {
        let key = meta.key();
        let key_len = self.check_key_len(key.len())?;

        let frame_start = dst.len();
        dst.reserve(Self::frame_len(meta));
        dst.put_u16(key_len);
        dst.put_slice(key.as_bytes());
        dst.put_u32(0);

        // Body length is measured, not taken from size_on_wire.
        let body_start = dst.len();
        meta.write_to_stream(dst);
        let body_len = match self.check_body_len(dst.len() - body_start) {
            Ok(len) => len,
            Err(e) => {
                dst.truncate(frame_start);
                return Err(e);
            }
        };
        dst[body_start - BODY_LEN_SIZE..body_start].copy_from_slice(&body_len.to_be_bytes());

        trace!(key, body_len, "Encoded metadata frame");
        Ok(())
    }

    /// Decode one frame from `src` and reconstruct it through `factory`.
    ///
    /// The reader must consume the whole body; leftover body bytes are a
    /// [`MetadataError::MalformedStream`]. A rejected header leaves `src`
    /// untouched, except for sources that cannot expose their bytes without
    /// advancing (see [`FrameCodec::split_frame`]).
    #[instrument(level = "trace", skip_all)]
    pub fn decode<B: Buf>(
        &self,
        factory: &MetadataFactory,
        src: &mut B,
    ) -> Result<ResourceMetadata> {
        let (key, mut body) = self.split_frame(src)?;
        debug!(key = %key, body_len = body.len(), "Decoded metadata frame");
        let meta = factory.create_metadata(&key, &mut body)?;
        if body.has_remaining() {
            return Err(MetadataError::MalformedStream(format!(
                "{} unread bytes left in {key} frame body",
                body.remaining()
            )));
        }
        Ok(meta)
    }

    /// Decode every frame in `src` until it is exhausted
    pub fn decode_all<B: Buf>(
        &self,
        factory: &MetadataFactory,
        src: &mut B,
    ) -> Result<Vec<ResourceMetadata>> {
        let _timer = Timer::start("decode_all");
        let mut out = Vec::new();
        while src.has_remaining() {
            out.push(self.decode(factory, src)?);
        }
        Ok(out)
    }

    /// Validate and split a frame into its key and body without touching the factory.
    ///
    /// The header is peeked first, so a truncated or oversized frame leaves
    /// `src` as it was. A `Buf` whose `chunks_vectored` exposes fewer bytes
    /// than it holds is read as it is consumed instead; for such sources a
    /// rejected frame may have had its header consumed.
    pub fn split_frame<B: Buf>(&self, src: &mut B) -> Result<(String, Bytes)> {
        let available = src.remaining();
        let window = available.min(self.header_window());
        let header = peek(src, window);

        if header.len() == window {
            let mut cursor = &header[..];
            let (key, body_len) = self.read_header(&mut cursor, available)?;
            src.advance(KEY_LEN_SIZE + key.len() + BODY_LEN_SIZE);
            return Ok((key, src.copy_to_bytes(body_len)));
        }

        debug!(
            window,
            exposed = header.len(),
            "Source cannot be peeked, consuming frame header"
        );
        let (key, body_len) = self.read_header(src, available)?;
        Ok((key, src.copy_to_bytes(body_len)))
    }

    /// Largest header this codec accepts
    fn header_window(&self) -> usize {
        KEY_LEN_SIZE
            .saturating_add(self.limits.max_key_len.min(usize::from(u16::MAX)))
            .saturating_add(BODY_LEN_SIZE)
    }

    /// Read and validate a header from `src`, returning the key and body length.
    /// `available` is the byte count of the whole frame source.
    fn read_header<B: Buf>(&self, src: &mut B, available: usize) -> Result<(String, usize)> {
        if src.remaining() < KEY_LEN_SIZE {
            return Err(MetadataError::InvalidFrame(
                constants::ERR_TRUNCATED_KEY_HEADER.to_string(),
            ));
        }
        let key_len = usize::from(src.get_u16());
        if key_len == 0 {
            return Err(MetadataError::InvalidFrame(constants::ERR_EMPTY_KEY.to_string()));
        }
        if key_len > self.limits.max_key_len {
            return Err(MetadataError::OversizedKey(key_len));
        }
        if src.remaining() < key_len {
            return Err(MetadataError::InvalidFrame(
                constants::ERR_TRUNCATED_KEY.to_string(),
            ));
        }
        let mut key = vec![0u8; key_len];
        src.copy_to_slice(&mut key);

        if src.remaining() < BODY_LEN_SIZE {
            return Err(MetadataError::InvalidFrame(
                constants::ERR_TRUNCATED_BODY_HEADER.to_string(),
            ));
        }
        let body_len = src.get_u32() as usize;
        if body_len > self.limits.max_body_size {
            return Err(MetadataError::OversizedBody(body_len));
        }
        if available - (KEY_LEN_SIZE + key_len + BODY_LEN_SIZE) < body_len {
            return Err(MetadataError::InvalidFrame(
                constants::ERR_TRUNCATED_BODY.to_string(),
            ));
        }

        let key = String::from_utf8(key)
            .map_err(|_| MetadataError::InvalidFrame(constants::ERR_KEY_NOT_UTF8.to_string()))?;
        Ok((key, body_len))
    }

    fn check_key_len(&self, len: usize) -> Result<u16> {
        if len == 0 {
            return Err(MetadataError::InvalidFrame(constants::ERR_EMPTY_KEY.to_string()));
        }
        if len > self.limits.max_key_len {
            return Err(MetadataError::OversizedKey(len));
        }
        u16::try_from(len).map_err(|_| MetadataError::OversizedKey(len))
    }

    fn check_body_len(&self, len: usize) -> Result<u32> {
        if len > self.limits.max_body_size {
            return Err(MetadataError::OversizedBody(len));
        }
        u32::try_from(len).map_err(|_| MetadataError::OversizedBody(len))
    }
}

/// Copy up to `len` leading bytes of `src` without advancing it
fn peek<B: Buf>(src: &B, len: usize) -> Vec<u8> {
    let chunk = src.chunk();
    if chunk.len() >= len {
        return chunk[..len].to_vec();
    }

    let mut slots = 16;
    loop {
        let mut slices = vec![IoSlice::new(&[]); slots];
        let filled = src.chunks_vectored(&mut slices);

        let mut out = Vec::with_capacity(len);
        for slice in &slices[..filled] {
            let take = (len - out.len()).min(slice.len());
            out.extend_from_slice(&slice[..take]);
            if out.len() == len {
                break;
            }
        }
        // A full slot array may hide further segments.
        if out.len() == len || filled < slots || slots >= len {
            return out;
        }
        slots = (slots * 2).min(len);
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::payload::song::register_song;
    use crate::payload::{RawMetadata, SongMetadata};

    fn song(name: &str) -> ResourceMetadata {
        ResourceMetadata::new(SongMetadata::new(name).unwrap())
    }

    #[test]
    fn test_frame_layout() {
        let codec = FrameCodec::default();
        let bytes = codec.encode(&song("HeyDJ")).unwrap();

        let mut expected = vec![0x00, 0x0C];
        expected.extend_from_slice(b"SongMetadata");
        expected.extend_from_slice(&[0, 0, 0, 5]);
        expected.extend_from_slice(b"HeyDJ");
        assert_eq!(&bytes[..], &expected[..]);
        assert_eq!(bytes.len(), FrameCodec::frame_len(&song("HeyDJ")));
    }

    #[test]
    fn test_decode_registered_key() {
        let factory = MetadataFactory::new();
        register_song(&factory).unwrap();
        let codec = FrameCodec::default();

        let mut bytes = codec.encode(&song("HeyDJ")).unwrap();
        let meta = codec.decode(&factory, &mut bytes).unwrap();

        assert_eq!(meta.key(), "SongMetadata");
        assert_eq!(meta.extract::<SongMetadata>().unwrap().song_name(), "HeyDJ");
        assert!(!bytes.has_remaining());
    }

    #[test]
    fn test_fallback_body_stops_at_frame_boundary() {
        let factory = MetadataFactory::new();
        let codec = FrameCodec::default();

        let mut stream = BytesMut::new();
        codec.encode_into(&song("First"), &mut stream).unwrap();
        codec.encode_into(&song("Second"), &mut stream).unwrap();
        let mut stream = stream.freeze();

        let all = codec.decode_all(&factory, &mut stream).unwrap();
        assert_eq!(all.len(), 2);
        let raw = all[0].extract::<RawMetadata>().unwrap();
        assert_eq!(raw.key(), "SongMetadata");
        assert_eq!(&raw.data()[..], b"First");
        assert_eq!(&all[1].extract::<RawMetadata>().unwrap().data()[..], b"Second");
    }

    #[test]
    fn test_raw_payload_reframes_under_original_key() {
        let factory = MetadataFactory::new();
        let codec = FrameCodec::default();

        let mut first = codec.encode(&song("Echo")).unwrap();
        let raw = codec.decode(&factory, &mut first).unwrap();
        assert!(raw.is::<RawMetadata>());

        let reencoded = codec.encode(&raw).unwrap();
        assert_eq!(reencoded, codec.encode(&song("Echo")).unwrap());
    }

    #[test]
    fn test_truncated_frame_leaves_source_untouched() {
        let codec = FrameCodec::default();
        let full = codec.encode(&song("HeyDJ")).unwrap();

        for cut in 0..full.len() {
            let mut partial = full.slice(..cut);
            let err = codec.split_frame(&mut partial).unwrap_err();
            assert!(matches!(err, MetadataError::InvalidFrame(_)), "cut {cut}: {err:?}");
            assert_eq!(partial.len(), cut);
        }
    }

    #[test]
    fn test_oversized_key_and_body_rejected() {
        let codec = FrameCodec::new(FramingConfig {
            max_key_len: 4,
            max_body_size: 3,
        });

        assert!(matches!(
            codec.encode(&song("ok")),
            Err(MetadataError::OversizedKey(12))
        ));

        let mut crafted = BytesMut::new();
        crafted.put_u16(3);
        crafted.put_slice(b"Key");
        crafted.put_u32(1_000);
        let mut crafted = crafted.freeze();
        assert!(matches!(
            codec.split_frame(&mut crafted),
            Err(MetadataError::OversizedBody(1_000))
        ));
    }

    #[test]
    fn test_non_utf8_key_rejected() {
        let codec = FrameCodec::default();
        let mut crafted = BytesMut::new();
        crafted.put_u16(2);
        crafted.put_slice(&[0xFF, 0xFE]);
        crafted.put_u32(0);
        let mut crafted = crafted.freeze();
        assert!(matches!(
            codec.split_frame(&mut crafted),
            Err(MetadataError::InvalidFrame(_))
        ));
    }

    #[test]
    fn test_decode_across_chained_buffers() {
        let factory = MetadataFactory::new();
        register_song(&factory).unwrap();
        let codec = FrameCodec::default();

        let full = codec.encode(&song("Split")).unwrap();
        let mut chained = full.slice(..5).chain(full.slice(5..));
        let meta = codec.decode(&factory, &mut chained).unwrap();
        assert_eq!(meta.extract::<SongMetadata>().unwrap().song_name(), "Split");
    }

    #[test]
    fn test_decode_across_many_chunks() {
        let factory = MetadataFactory::new();
        register_song(&factory).unwrap();
        let codec = FrameCodec::default();

        let full = codec.encode(&song("HeyDJ")).unwrap();
        let mut chained: Box<dyn Buf> = Box::new(Bytes::new());
        for i in 0..full.len() {
            chained = Box::new(chained.chain(full.slice(i..i + 1)));
        }
        assert!(full.len() > 16);

        let meta = codec.decode(&factory, &mut chained).unwrap();
        assert_eq!(meta.extract::<SongMetadata>().unwrap().song_name(), "HeyDJ");
        assert!(!chained.has_remaining());
    }

    /// Exposes one byte at a time and keeps the default `chunks_vectored`.
    struct Trickle(Bytes);

    impl Buf for Trickle {
        fn remaining(&self) -> usize {
            self.0.len()
        }

        fn chunk(&self) -> &[u8] {
            &self.0[..self.0.len().min(1)]
        }

        fn advance(&mut self, cnt: usize) {
            self.0.advance(cnt);
        }
    }

    #[test]
    fn test_decode_from_single_byte_chunks() {
        let factory = MetadataFactory::new();
        register_song(&factory).unwrap();
        let codec = FrameCodec::default();

        let mut stream = BytesMut::new();
        codec.encode_into(&song("First"), &mut stream).unwrap();
        codec.encode_into(&song("Second"), &mut stream).unwrap();
        let mut trickle = Trickle(stream.freeze());

        let all = codec.decode_all(&factory, &mut trickle).unwrap();
        let names: Vec<&str> = all
            .iter()
            .map(|m| m.extract::<SongMetadata>().unwrap().song_name())
            .collect();
        assert_eq!(names, ["First", "Second"]);

        let mut short = Trickle(codec.encode(&song("Cut")).unwrap().slice(..10));
        assert!(matches!(
            codec.decode(&factory, &mut short),
            Err(MetadataError::InvalidFrame(_))
        ));
    }

    fn frame(key: &[u8], body: &[u8]) -> Bytes {
        let mut buf = BytesMut::new();
        buf.put_u16(key.len() as u16);
        buf.put_slice(key);
        buf.put_u32(body.len() as u32);
        buf.put_slice(body);
        buf.freeze()
    }

    #[test]
    fn test_unread_body_bytes_rejected() {
        let factory = MetadataFactory::new();
        register_song(&factory).unwrap();
        let codec = FrameCodec::default();

        let mut src = frame(b"SongMetadata", b"A B");
        assert!(matches!(
            codec.decode(&factory, &mut src),
            Err(MetadataError::MalformedStream(_))
        ));

        // The delimiter after the token is unread body too.
        let mut padded = frame(b"SongMetadata", b"A\n");
        assert!(codec.decode(&factory, &mut padded).is_err());
    }

    #[test]
    fn test_unbounded_limits_do_not_overflow() {
        let factory = MetadataFactory::new();
        register_song(&factory).unwrap();
        let codec = FrameCodec::new(FramingConfig {
            max_key_len: usize::MAX,
            max_body_size: usize::MAX,
        });

        let mut full = codec.encode(&song("Wide")).unwrap();
        let meta = codec.decode(&factory, &mut full).unwrap();
        assert_eq!(meta.extract::<SongMetadata>().unwrap().song_name(), "Wide");

        let mut partial = codec.encode(&song("Wide")).unwrap().slice(..7);
        assert!(matches!(
            codec.split_frame(&mut partial),
            Err(MetadataError::InvalidFrame(_))
        ));
        assert_eq!(partial.len(), 7);
    }
}
