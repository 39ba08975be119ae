use crate::config::RegistryConfig;
use crate::core::capability::{MetadataPayload, ReadFromStream};
use crate::core::metadata::ResourceMetadata;
use crate::error::{constants, MetadataError, Result};
use crate::payload::RawMetadata;
use crate::utils::metrics::FactoryMetrics;
use crate::utils::sort::sort_by_member_ref;
use bytes::Buf;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, error, trace, warn};

type CreatorFn = dyn Fn(&mut dyn Buf) -> Result<ResourceMetadata> + Send + Sync + 'static;

/// Key-dispatched metadata reconstruction.
///
/// Maps keys to readers. Unknown keys fall back to [`RawMetadata`]; errors
/// from a registered reader are returned as-is. Cloning a factory shares its
/// registrations; use [`MetadataFactory::new`] for an independent one.
#[derive(Clone)]
pub struct MetadataFactory {
    creators: Arc<RwLock<HashMap<Cow<'static, str>, Arc<CreatorFn>>>>,
    metrics: Arc<FactoryMetrics>,
    config: RegistryConfig,
}

impl Default for MetadataFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataFactory {
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            creators: Arc::new(RwLock::new(HashMap::new())),
            metrics: Arc::new(FactoryMetrics::new()),
            config,
        }
    }

    /// Register `creator` under `key`. Fails without touching the registry if `key` is taken.
    pub fn register_key<F>(&self, key: &str, creator: F) -> Result<()>
    where
        F: Fn(&mut dyn Buf) -> Result<ResourceMetadata> + Send + Sync + 'static,
    {
        self.insert(Cow::Owned(key.to_string()), Arc::new(creator))
    }

    /// Remove the reader under `key`. Fails if nothing is registered there.
    pub fn unregister_key(&self, key: &str) -> Result<()> {
        let mut creators = self
            .creators
            .write()
            .map_err(|_| poisoned(constants::ERR_FACTORY_WRITE_LOCK))?;

        if creators.remove(key).is_none() {
            return Err(MetadataError::UnknownKey(key.to_string()));
        }
        self.metrics.unregistration();
        debug!(key, "Unregistered metadata key");
        Ok(())
    }

    /// Register `creator` under `T::KEY`
    pub fn register_type<T, F>(&self, creator: F) -> Result<()>
    where
        T: MetadataPayload,
        F: Fn(&mut dyn Buf) -> Result<T> + Send + Sync + 'static,
    {
        self.insert(
            Cow::Borrowed(T::KEY),
            Arc::new(move |source: &mut dyn Buf| creator(source).map(ResourceMetadata::new)),
        )
    }

    /// Register `T`'s own stream reader under `T::KEY`
    pub fn register<T: ReadFromStream>(&self) -> Result<()> {
        self.register_type::<T, _>(T::read_from_stream)
    }

    pub fn unregister_type<T: MetadataPayload>(&self) -> Result<()> {
        self.unregister_key(T::KEY)
    }

    /// Whether a reader is registered under `key`. A poisoned registry is
    /// logged and reports nothing registered.
    pub fn contains_key(&self, key: &str) -> bool {
        self.creators
            .read()
            .map_err(|_| poisoned(constants::ERR_FACTORY_READ_LOCK))
            .map(|creators| creators.contains_key(key))
            .unwrap_or(false)
    }

    /// Number of registered keys; `0` for a poisoned registry, which is logged.
    pub fn len(&self) -> usize {
        self.creators
            .read()
            .map_err(|_| poisoned(constants::ERR_FACTORY_READ_LOCK))
            .map(|creators| creators.len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registered keys in ascending order
    pub fn registered_keys(&self) -> Result<Vec<String>> {
        let creators = self
            .creators
            .read()
            .map_err(|_| poisoned(constants::ERR_FACTORY_READ_LOCK))?;
        let mut keys: Vec<String> = creators.keys().map(|k| k.to_string()).collect();
        drop(creators);

        sort_by_member_ref(&mut keys, |a: &str, b: &str| a.cmp(b), String::as_str);
        Ok(keys)
    }

    /// Reconstruct metadata stored under `key` from `source`.
    ///
    /// A registered reader is handed `source` positioned at the body. For an
    /// unregistered key, everything left in `source` becomes a [`RawMetadata`]
    /// carrying `key`. The reader runs outside the registry lock, so it may
    /// itself use the factory.
    pub fn create_metadata(&self, key: &str, source: &mut dyn Buf) -> Result<ResourceMetadata> {
        let creator = {
            let creators = self
                .creators
                .read()
                .map_err(|_| poisoned(constants::ERR_FACTORY_READ_LOCK))?;
            creators.get(key).cloned()
        };

        let Some(creator) = creator else {
            self.metrics.unresolved();
            if self.config.log_unresolved_keys {
                debug!(key, body_len = source.remaining(), "No reader for key, keeping raw bytes");
            }
            return Ok(ResourceMetadata::new(RawMetadata::from_remaining(key, source)));
        };

        trace!(key, "Dispatching to registered reader");
        match creator(source) {
            Ok(meta) => {
                self.metrics.resolved();
                if source.has_remaining() {
                    if self.config.warn_on_trailing_bytes {
                        warn!(key, trailing = source.remaining(), "Reader left bytes unread");
                    } else {
                        debug!(key, trailing = source.remaining(), "Reader left bytes unread");
                    }
                }
                Ok(meta)
            }
            Err(e) => {
                self.metrics.failed();
                warn!(key, error = %e, "Failed to read metadata body");
                Err(e)
            }
        }
    }

    /// Reconstruct metadata stored under `T::KEY`
    pub fn create_typed<T: MetadataPayload>(&self, source: &mut dyn Buf) -> Result<ResourceMetadata> {
        self.create_metadata(T::KEY, source)
    }

    pub fn metrics(&self) -> &FactoryMetrics {
        &self.metrics
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    fn insert(&self, key: Cow<'static, str>, creator: Arc<CreatorFn>) -> Result<()> {
        let mut creators = self
            .creators
            .write()
            .map_err(|_| poisoned(constants::ERR_FACTORY_WRITE_LOCK))?;

        if creators.contains_key(key.as_ref()) {
            return Err(MetadataError::DuplicateKey(key.into_owned()));
        }
        debug!(key = %key, "Registered metadata key");
        creators.insert(key, creator);
        self.metrics.registration();
        Ok(())
    }
}

fn poisoned(context: &'static str) -> MetadataError {
    error!("{context}");
    MetadataError::LockPoisoned
}

impl std::fmt::Debug for MetadataFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataFactory")
            .field("keys", &self.registered_keys().unwrap_or_default())
            .field("config", &self.config)
            .finish()
    }
}
