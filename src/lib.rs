//! # Resource Metadata
//!
//! Type-erased metadata values that can be copied, written to a byte stream,
//! and rebuilt from that stream without the reader knowing the concrete type.
//!
//! ## Overview
//! - [`ResourceMetadata`] wraps one immutable payload behind an `Arc` and
//!   exposes a uniform contract: key, wire size, body serialization, printing,
//!   and a checked downcast via [`ResourceMetadata::extract`]
//! - [`MetadataFactory`] maps keys to readers; keys with no reader become
//!   [`RawMetadata`](payload::RawMetadata) so their bytes survive a round trip
//! - [`Resource`] owns one value and replaces it whole
//! - [`FrameCodec`](core::frame::FrameCodec) carries key and body together in one stream
//!
//! ## Example
//! ```rust
//! use resource_metadata::payload::{song, SongMetadata};
//! use resource_metadata::{MetadataFactory, Resource, ResourceMetadata};
//!
//! let factory = MetadataFactory::new();
//! song::register_song(&factory).unwrap();
//!
//! let meta = ResourceMetadata::new(SongMetadata::new("HeyDJ").unwrap());
//! let mut body = meta.to_bytes();
//!
//! let rebuilt = factory.create_metadata(meta.key(), &mut body).unwrap();
//! assert_eq!(rebuilt.size_on_wire(), 5);
//! assert_eq!(rebuilt.extract::<SongMetadata>().unwrap().song_name(), "HeyDJ");
//!
//! let resource = Resource::new(rebuilt);
//! assert_eq!(resource.to_string(), "Song Name: HeyDJ");
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod payload;
pub mod protocol;
pub mod utils;

pub use crate::core::capability::{MetadataPayload, ReadFromStream, WireEncode};
pub use crate::core::frame::FrameCodec;
pub use crate::core::metadata::ResourceMetadata;
pub use error::{MetadataError, Result};
pub use protocol::factory::MetadataFactory;
pub use protocol::resource::Resource;
