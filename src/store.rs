use std::fmt::Debug;

use codee::string::JsonSerdeCodec;
use codee::{Decoder, Encoder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use snafu::{ResultExt, Snafu};

use crate::catalog::{Flow, Provider, ProviderOptions};
use crate::kv::{KeyValueStore, StorageError};
use crate::sdk::SessionResult;

pub const AUTH_PROVIDER_KEY: &str = "auth-provider";
pub const AUTH_PROVIDER_OPTIONS_KEY: &str = "auth-provider-options";
pub const AUTH_FLOW_KEY: &str = "auth-flow";
pub const AUTH_RESULT_KEY: &str = "auth-result";

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum StoreError {
    #[snafu(display("StoreError: Underlying storage failed"))]
    Storage { source: StorageError },

    #[snafu(display("StoreError: Could not serialize value for '{key}': {source}"))]
    Encode {
        key: &'static str,
        source: serde_json::Error,
    },

    #[snafu(display("StoreError: Could not deserialize value of '{key}': {source}"))]
    Decode {
        key: &'static str,
        source: serde_json::Error,
    },
}

/// One persisted value with a read-through cache.
///
/// Only present values are cached. A missing value is looked up again on the next `get`.
#[derive(Debug)]
struct Slot<T> {
    key: &'static str,
    cached: Option<T>,
}

impl<T> Slot<T>
where
    T: Debug + Clone + Serialize + DeserializeOwned,
{
    fn new(key: &'static str) -> Self {
        Self { key, cached: None }
    }

    async fn get(&mut self, kv: &impl KeyValueStore) -> Result<Option<T>, StoreError> {
        if let Some(cached) = &self.cached {
            tracing::trace!(key = self.key, "Cache hit");
            return Ok(Some(cached.clone()));
        }
        tracing::trace!(key = self.key, "Cache miss. Reading from storage.");
        let raw = kv.get(self.key).await.context(StorageSnafu)?;
        let value = match raw {
            Some(raw) => Some(
                <JsonSerdeCodec as Decoder<T>>::decode(raw.as_str())
                    .context(DecodeSnafu { key: self.key })?,
            ),
            None => None,
        };
        self.cached.clone_from(&value);
        Ok(value)
    }

    async fn set(&mut self, kv: &impl KeyValueStore, value: T) -> Result<(), StoreError> {
        let encoded =
            <JsonSerdeCodec as Encoder<T>>::encode(&value).context(EncodeSnafu { key: self.key })?;
        kv.set(self.key, encoded).await.context(StorageSnafu)?;
        self.cached = Some(value);
        Ok(())
    }

    async fn clear(&mut self, kv: &impl KeyValueStore) -> Result<(), StoreError> {
        kv.remove(self.key).await.context(StorageSnafu)?;
        self.cached = None;
        Ok(())
    }

    /// Store `Some` or remove on `None`.
    async fn replace(
        &mut self,
        kv: &impl KeyValueStore,
        value: Option<T>,
    ) -> Result<(), StoreError> {
        match value {
            Some(value) => self.set(kv, value).await,
            None => self.clear(kv).await,
        }
    }

    fn forget(&mut self) {
        self.cached = None;
    }
}

/// Persists the selected provider, flow, provider options and the current session in a
/// `KeyValueStore`, caching every value after its first read.
///
/// Values are JSON encoded. Storage failures are handed to the caller as they are, there is no
/// retry.
#[derive(Debug)]
pub struct ConfigStore<K> {
    kv: K,
    provider: Slot<Provider>,
    flow: Slot<Flow>,
    options: Slot<ProviderOptions>,
    auth_result: Slot<SessionResult>,
}

impl<K: KeyValueStore> ConfigStore<K> {
    pub fn new(kv: K) -> Self {
        Self {
            kv,
            provider: Slot::new(AUTH_PROVIDER_KEY),
            flow: Slot::new(AUTH_FLOW_KEY),
            options: Slot::new(AUTH_PROVIDER_OPTIONS_KEY),
            auth_result: Slot::new(AUTH_RESULT_KEY),
        }
    }

    pub fn kv(&self) -> &K {
        &self.kv
    }

    pub async fn provider(&mut self) -> Result<Option<Provider>, StoreError> {
        self.provider.get(&self.kv).await
    }

    pub async fn flow(&mut self) -> Result<Option<Flow>, StoreError> {
        self.flow.get(&self.kv).await
    }

    pub async fn provider_options(&mut self) -> Result<Option<ProviderOptions>, StoreError> {
        self.options.get(&self.kv).await
    }

    pub async fn auth_result(&mut self) -> Result<Option<SessionResult>, StoreError> {
        self.auth_result.get(&self.kv).await
    }

    pub async fn set_provider(&mut self, provider: Provider) -> Result<(), StoreError> {
        self.provider.set(&self.kv, provider).await
    }

    pub async fn set_flow(&mut self, flow: Flow) -> Result<(), StoreError> {
        self.flow.set(&self.kv, flow).await
    }

    pub async fn set_provider_options(
        &mut self,
        options: ProviderOptions,
    ) -> Result<(), StoreError> {
        self.options.set(&self.kv, options).await
    }

    pub async fn store_auth_result(&mut self, session: SessionResult) -> Result<(), StoreError> {
        self.auth_result.set(&self.kv, session).await
    }

    pub async fn clear_auth_result(&mut self) -> Result<(), StoreError> {
        self.auth_result.clear(&self.kv).await
    }

    pub async fn clear_flow(&mut self) -> Result<(), StoreError> {
        self.flow.clear(&self.kv).await
    }

    /// Persist a complete configuration.
    ///
    /// Without a `flow`, a previously stored flow is removed. It is never left in place.
    /// Writes run one after another: provider, options, then flow. The first failing write stops
    /// the rest, so storage never holds a flow newer than its provider. Should any write fail,
    /// the three affected caches are dropped, so that subsequent reads observe whatever actually
    /// made it into storage.
    pub async fn store_config(
        &mut self,
        provider: Provider,
        options: ProviderOptions,
        flow: Option<Flow>,
    ) -> Result<(), StoreError> {
        let result = self.write_config(provider, options, flow).await;
        if result.is_err() {
            self.provider.forget();
            self.options.forget();
            self.flow.forget();
        }
        result
    }

    async fn write_config(
        &mut self,
        provider: Provider,
        options: ProviderOptions,
        flow: Option<Flow>,
    ) -> Result<(), StoreError> {
        self.provider.set(&self.kv, provider).await?;
        self.options.set(&self.kv, options).await?;
        self.flow.replace(&self.kv, flow).await
    }

    /// Drop all cached values without touching storage.
    pub fn reset_cache(&mut self) {
        tracing::trace!("Resetting config store cache");
        self.provider.forget();
        self.flow.forget();
        self.options.forget();
        self.auth_result.forget();
    }
}
