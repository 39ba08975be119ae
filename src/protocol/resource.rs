use crate::core::metadata::ResourceMetadata;
use std::fmt;

/// Holder of exactly one metadata value.
///
/// The held value is only ever swapped out whole; readers see either the old
/// or the new value.
#[derive(Debug, Clone)]
pub struct Resource {
    metadata: ResourceMetadata,
}

impl Resource {
    pub fn new(metadata: ResourceMetadata) -> Self {
        Self { metadata }
    }

    pub fn metadata(&self) -> &ResourceMetadata {
        &self.metadata
    }

    /// Copy of the held value, sharing its payload
    pub fn metadata_cloned(&self) -> ResourceMetadata {
        self.metadata.clone()
    }

    pub fn set_metadata(&mut self, metadata: ResourceMetadata) {
        self.metadata = metadata;
    }

    /// Swap in `metadata`, returning the previous value
    pub fn replace_metadata(&mut self, metadata: ResourceMetadata) -> ResourceMetadata {
        std::mem::replace(&mut self.metadata, metadata)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.metadata.print(f)
    }
}
