//! Song metadata: one name, one token on the wire.

use crate::core::capability::{MetadataPayload, ReadFromStream, WireEncode};
use crate::error::{constants, MetadataError, Result};
use crate::protocol::factory::MetadataFactory;
use bytes::{Buf, BufMut};
use std::fmt;

/// Metadata naming a song.
///
/// The name is a single token: non-empty and free of ASCII whitespace, so
/// the body written by `write_to_stream` always reads back as the same name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SongMetadata {
    song_name: String,
}

impl SongMetadata {
    pub fn new(song_name: impl Into<String>) -> Result<Self> {
        let song_name = song_name.into();
        if song_name.is_empty() {
            return Err(MetadataError::InvalidPayload(
                "Song name cannot be empty".to_string(),
            ));
        }
        if song_name.bytes().any(|b| b.is_ascii_whitespace()) {
            return Err(MetadataError::InvalidPayload(format!(
                "Song name must be a single token: {song_name:?}"
            )));
        }
        Ok(Self { song_name })
    }

    pub fn song_name(&self) -> &str {
        &self.song_name
    }
}

impl WireEncode for SongMetadata {
    fn size_on_wire(&self) -> usize {
        self.song_name.len()
    }

    fn write_to_stream(&self, sink: &mut dyn BufMut) {
        sink.put_slice(self.song_name.as_bytes());
    }
}

impl MetadataPayload for SongMetadata {
    const KEY: &'static str = "SongMetadata";

    fn print(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        write!(out, "Song Name: {}", self.song_name)
    }
}

impl ReadFromStream for SongMetadata {
    fn read_from_stream(source: &mut dyn Buf) -> Result<Self> {
        let token = read_token(source)?;
        let song_name = String::from_utf8(token)
            .map_err(|_| MetadataError::MalformedStream(constants::ERR_TOKEN_NOT_UTF8.to_string()))?;
        Ok(Self { song_name })
    }
}

/// Register the song reader with `factory`.
///
/// Fails with [`MetadataError::DuplicateKey`] when called twice on the same factory.
pub fn register_song(factory: &MetadataFactory) -> Result<()> {
    factory.register::<SongMetadata>()
}

/// Skip leading ASCII whitespace, then take bytes up to the next whitespace or end of stream.
/// The delimiter itself is left in `source`.
fn read_token(source: &mut dyn Buf) -> Result<Vec<u8>> {
    while source.has_remaining() && source.chunk()[0].is_ascii_whitespace() {
        source.advance(1);
    }

    let mut token = Vec::new();
    while source.has_remaining() {
        let chunk = source.chunk();
        let end = chunk
            .iter()
            .position(u8::is_ascii_whitespace)
            .unwrap_or(chunk.len());
        token.extend_from_slice(&chunk[..end]);
        let at_delimiter = end < chunk.len();
        source.advance(end);
        if at_delimiter {
            break;
        }
    }

    if token.is_empty() {
        return Err(MetadataError::MalformedStream(
            constants::ERR_MISSING_TOKEN.to_string(),
        ));
    }
    Ok(token)
}
