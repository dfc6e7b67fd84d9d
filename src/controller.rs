use snafu::ResultExt;

use crate::catalog::{self, Flow, Provider, ProviderOptions};
use crate::config::{AuthConnectOptions, Platform};
use crate::error::{
    AuthConnectError, LoginSnafu, LogoutSnafu, RefreshRejectedSnafu, RefreshSnafu, SetupSnafu,
    StoreSnafu, TokenStatusSnafu,
};
use crate::kv::KeyValueStore;
use crate::sdk::{AuthConnectConfig, AuthSdk, ProviderClient, SessionResult};
use crate::store::ConfigStore;
use crate::templates::AuthConfigUpdate;

/// How far the controller got in bringing up the SDK.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Uninitialized,

    /// Persisted configuration is being loaded, or the SDK is being set up.
    Loading,

    /// The SDK was set up at least once. Login and friends may be used.
    Ready,
}

/// Read-only copy of the controller state, as rendered by the UI.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSnapshot {
    pub readiness: Readiness,
    pub platform: Platform,
    pub provider: Option<Provider>,
    pub flow: Option<Flow>,
    pub options: Option<ProviderOptions>,
    pub session: Option<SessionResult>,
}

impl AuthSnapshot {
    pub fn is_ready(&self) -> bool {
        self.readiness == Readiness::Ready
    }

    /// Holding a session is the only criterion for being logged in.
    pub fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    pub fn status_label(&self) -> &'static str {
        if self.is_logged_in() {
            "Logged In"
        } else {
            "Logged Out"
        }
    }
}

/// Owns the selected provider, flow and provider options, the SDK client derived from them and
/// the current session. Every state change is persisted through a `ConfigStore`.
///
/// All operations take `&mut self`, so at most one of them is in flight per controller.
#[derive(Debug)]
pub struct AuthController<S, K> {
    sdk: S,
    store: ConfigStore<K>,
    options: AuthConnectOptions,
    readiness: Readiness,
    provider: Option<Provider>,
    flow: Option<Flow>,
    provider_options: Option<ProviderOptions>,
    client: Option<ProviderClient>,
    session: Option<SessionResult>,
}

impl<S: AuthSdk, K: KeyValueStore> AuthController<S, K> {
    /// Create an uninitialized controller. Call `initialize` to load state and set up the SDK.
    pub fn new(sdk: S, kv: K, options: AuthConnectOptions) -> Self {
        Self {
            sdk,
            store: ConfigStore::new(kv),
            options,
            readiness: Readiness::Uninitialized,
            provider: None,
            flow: None,
            provider_options: None,
            client: None,
            session: None,
        }
    }

    /// Restore the persisted session and configuration, falling back to defaults for everything
    /// not persisted, then instantiate the provider client and set up the SDK.
    ///
    /// Runs once. Later calls are no-ops, unless a previous attempt failed, in which case the
    /// controller went back to `Readiness::Uninitialized` and may be initialized again.
    pub async fn initialize(&mut self) -> Result<(), AuthConnectError> {
        if self.readiness != Readiness::Uninitialized {
            tracing::debug!(readiness = ?self.readiness, "Already initialized. Ignoring.");
            return Ok(());
        }
        self.readiness = Readiness::Loading;
        match self.load_and_setup().await {
            Ok(()) => {
                self.readiness = Readiness::Ready;
                tracing::info!(
                    provider = ?self.provider.as_ref().map(|it| &it.key),
                    flow = ?self.flow.as_ref().map(|it| it.key),
                    logged_in = self.session.is_some(),
                    "Auth Connect is ready"
                );
                Ok(())
            }
            Err(err) => {
                self.readiness = Readiness::Uninitialized;
                Err(err)
            }
        }
    }

    async fn load_and_setup(&mut self) -> Result<(), AuthConnectError> {
        self.session = self.store.auth_result().await.context(StoreSnafu)?;

        let provider = self.store.provider().await.context(StoreSnafu)?;
        self.provider = Some(provider.unwrap_or_else(catalog::default_provider));

        let flow = self.store.flow().await.context(StoreSnafu)?;
        self.flow = Some(flow.unwrap_or_else(catalog::default_flow));

        let provider_options = self.store.provider_options().await.context(StoreSnafu)?;
        self.provider_options = Some(
            provider_options.unwrap_or_else(|| catalog::default_options(self.options.platform)),
        );

        tracing::debug!(
            has_session = self.session.is_some(),
            "Loaded persisted auth configuration"
        );
        self.reconfigure().await
    }

    /// Derive the provider client from the current selection and set up the SDK with it.
    ///
    /// A client is only (re-)created once provider and options are known, and, in a browser, a
    /// flow as well. Setup runs whenever some client exists.
    async fn reconfigure(&mut self) -> Result<(), AuthConnectError> {
        let flow_resolved = self.options.platform.is_native() || self.flow.is_some();
        if self.provider.is_some() && self.provider_options.is_some() && flow_resolved {
            let client = ProviderClient::for_provider(self.provider.as_ref());
            tracing::debug!(?client, "Instantiated provider client");
            self.client = Some(client);
        } else {
            tracing::trace!("Configuration incomplete. Keeping the current provider client.");
        }

        if self.client.is_none() {
            tracing::trace!("No provider client yet. Skipping SDK setup.");
            return Ok(());
        }

        let config = AuthConnectConfig::new(
            self.options.platform,
            self.flow.as_ref().map(|it| it.key),
            &self.options.advanced,
        );
        tracing::debug!(?config, "Setting up Auth Connect");
        self.sdk.setup(&config).await.context(SetupSnafu)
    }

    /// Select a new configuration, persist it and set the SDK up again.
    ///
    /// This does not refuse to run while a session is active. Keeping the configuration
    /// untouched while logged in is up to the caller.
    ///
    /// Before the controller is ready, the configuration is only stored. `initialize` picks it up
    /// and sets the SDK up once.
    pub async fn update_auth_config(
        &mut self,
        options: ProviderOptions,
        provider: Provider,
        flow: Option<Flow>,
    ) -> Result<(), AuthConnectError> {
        if self.session.is_some() {
            tracing::warn!("Updating the auth configuration while a session is active");
        }
        tracing::debug!(
            provider = %provider.key,
            flow = ?flow.as_ref().map(|it| it.key),
            "Updating auth configuration"
        );

        self.provider_options = Some(options.clone());
        self.provider = Some(provider.clone());
        self.flow = flow.clone();

        self.store
            .store_config(provider, options, flow)
            .await
            .context(StoreSnafu)?;

        if self.readiness != Readiness::Ready {
            tracing::trace!("Not initialized yet. Setup is left to initialization.");
            return Ok(());
        }
        self.reconfigure().await
    }

    /// `update_auth_config` with a prepared template or custom configuration.
    pub async fn apply_config(&mut self, update: AuthConfigUpdate) -> Result<(), AuthConnectError> {
        self.update_auth_config(update.options, update.provider, update.flow)
            .await
    }

    /// Log in with the current client and options, persisting the resulting session.
    ///
    /// Does nothing as long as no client or options are known.
    pub async fn login(&mut self) -> Result<(), AuthConnectError> {
        let (Some(client), Some(options)) = (self.client, self.provider_options.as_ref()) else {
            tracing::debug!("Login requested before a provider client was set up. Ignoring.");
            return Ok(());
        };

        let session = self.sdk.login(client, options).await.context(LoginSnafu)?;
        self.session = Some(session.clone());
        self.store
            .store_auth_result(session)
            .await
            .context(StoreSnafu)?;
        tracing::debug!("Logged in");
        Ok(())
    }

    /// Log out remotely, when possible, and always drop the local session.
    ///
    /// The local session is cleared even when the SDK fails to log out. That SDK failure is
    /// still returned afterwards.
    pub async fn logout(&mut self) -> Result<(), AuthConnectError> {
        let remote = match (self.client, self.session.as_ref()) {
            (Some(client), Some(session)) => self.sdk.logout(client, session).await,
            _ => {
                tracing::debug!("No client or session. Only clearing local session state.");
                Ok(())
            }
        };

        self.session = None;
        self.store.clear_auth_result().await.context(StoreSnafu)?;

        match remote {
            Ok(()) => {
                tracing::debug!("Logged out");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(?err, "SDK logout failed. Local session was cleared anyway.");
                Err(err).context(LogoutSnafu)
            }
        }
    }

    /// Whether the current session carries a usable refresh token. `false` without a session.
    pub async fn can_refresh(&self) -> Result<bool, AuthConnectError> {
        match &self.session {
            Some(session) => self
                .sdk
                .is_refresh_token_available(session)
                .await
                .context(TokenStatusSnafu),
            None => Ok(false),
        }
    }

    /// Whether the access token of the current session expired. `false` without a session.
    pub async fn is_expired(&self) -> Result<bool, AuthConnectError> {
        match &self.session {
            Some(session) => self
                .sdk
                .is_access_token_expired(session)
                .await
                .context(TokenStatusSnafu),
            None => Ok(false),
        }
    }

    /// Exchange the current session for a fresh one.
    ///
    /// Does nothing without a session or client. Should the provider decline the refresh, the
    /// session is dropped and `AuthConnectError::RefreshRejected` is returned, even if the
    /// persisted session could not be removed. SDK errors leave the session untouched.
    pub async fn refresh(&mut self) -> Result<(), AuthConnectError> {
        let (Some(client), Some(session)) = (self.client, self.session.as_ref()) else {
            tracing::debug!("No client or session to refresh. Ignoring.");
            return Ok(());
        };

        let refreshed = self
            .sdk
            .refresh_session(client, session)
            .await
            .context(RefreshSnafu)?;

        match refreshed {
            Some(session) => {
                self.session = Some(session.clone());
                self.store
                    .store_auth_result(session)
                    .await
                    .context(StoreSnafu)?;
                tracing::debug!("Session refreshed");
                Ok(())
            }
            None => {
                tracing::debug!("Refresh was declined. Dropping session.");
                self.session = None;
                if let Err(err) = self.store.clear_auth_result().await {
                    tracing::error!(?err, "Could not remove the persisted session.");
                }
                RefreshRejectedSnafu.fail()
            }
        }
    }
}

impl<S, K> AuthController<S, K> {
    pub fn readiness(&self) -> Readiness {
        self.readiness
    }

    pub fn is_ready(&self) -> bool {
        self.readiness == Readiness::Ready
    }

    pub fn platform(&self) -> Platform {
        self.options.platform
    }

    pub fn auth_connect_options(&self) -> &AuthConnectOptions {
        &self.options
    }

    pub fn provider(&self) -> Option<&Provider> {
        self.provider.as_ref()
    }

    pub fn flow(&self) -> Option<&Flow> {
        self.flow.as_ref()
    }

    pub fn provider_options(&self) -> Option<&ProviderOptions> {
        self.provider_options.as_ref()
    }

    pub fn client(&self) -> Option<ProviderClient> {
        self.client
    }

    pub fn session(&self) -> Option<&SessionResult> {
        self.session.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    pub fn sdk(&self) -> &S {
        &self.sdk
    }

    pub fn store(&self) -> &ConfigStore<K> {
        &self.store
    }

    pub fn snapshot(&self) -> AuthSnapshot {
        AuthSnapshot {
            readiness: self.readiness,
            platform: self.options.platform,
            provider: self.provider.clone(),
            flow: self.flow.clone(),
            options: self.provider_options.clone(),
            session: self.session.clone(),
        }
    }
}
