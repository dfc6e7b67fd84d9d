//! Ready-made and user-entered configurations, as offered on a settings page.

use snafu::{ResultExt, Snafu};
use url::Url;

use crate::catalog::{
    self, DEFAULT_URL_SCHEME, Flow, FlowKey, Provider, ProviderKey, ProviderOptions,
};
use crate::config::Platform;

#[derive(Debug, Snafu)]
pub enum InvalidCustomConfig {
    #[snafu(display("InvalidCustomConfig: Discovery URL '{discovery_url}' is not valid: {source}"))]
    DiscoveryUrl {
        discovery_url: String,
        source: url::ParseError,
    },

    #[snafu(display("InvalidCustomConfig: Client id must not be empty"))]
    MissingClientId,
}

/// Arguments of `AuthController::update_auth_config`.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthConfigUpdate {
    pub options: ProviderOptions,
    pub provider: Provider,

    /// Always `None` on native platforms.
    pub flow: Option<Flow>,
}

impl AuthConfigUpdate {
    /// Finalize a selection for the given platform: browsers redirect to localhost, native
    /// platforms do not use a web flow.
    fn for_platform(
        options: ProviderOptions,
        provider: Provider,
        flow: FlowKey,
        platform: Platform,
    ) -> Self {
        match platform {
            Platform::Native => Self {
                options,
                provider,
                flow: None,
            },
            Platform::Web => Self {
                options: options.with_overlay(&catalog::web_overlay()),
                provider,
                flow: catalog::find_flow(flow),
            },
        }
    }
}

/// The flow each provider template is paired with.
pub fn template_flow(key: &ProviderKey) -> Option<FlowKey> {
    match key {
        ProviderKey::Azure | ProviderKey::Auth0 => Some(FlowKey::Implicit),
        ProviderKey::Cognito | ProviderKey::Okta => Some(FlowKey::Pkce),
        ProviderKey::OneLogin | ProviderKey::Other(_) => None,
    }
}

/// Providers offering a one-click template.
pub fn template_providers() -> Vec<Provider> {
    catalog::providers()
        .into_iter()
        .filter(|it| template_flow(&it.key).is_some())
        .collect()
}

/// One-click configuration for a provider, built from its preset.
pub fn template(key: &ProviderKey, platform: Platform) -> Option<AuthConfigUpdate> {
    let flow = template_flow(key)?;
    let options = catalog::preset_options(key)?;
    let provider = catalog::find_provider(key)?;
    Some(AuthConfigUpdate::for_platform(
        options, provider, flow, platform,
    ))
}

/// Values entered by hand on the settings page.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomConfig {
    pub provider: ProviderKey,
    pub flow: FlowKey,
    pub client_id: String,
    pub discovery_url: String,
    pub audience: String,
    pub scope: String,
}

impl CustomConfig {
    /// Prefill the form from the active configuration.
    pub fn from_current(
        options: Option<&ProviderOptions>,
        provider: Option<&Provider>,
        flow: Option<&Flow>,
    ) -> Self {
        Self {
            provider: provider
                .map(|it| it.key.clone())
                .unwrap_or_else(|| catalog::default_provider().key),
            flow: flow.map_or(catalog::default_flow().key, |it| it.key),
            client_id: options.map(|it| it.client_id.clone()).unwrap_or_default(),
            discovery_url: options
                .map(|it| it.discovery_url.clone())
                .unwrap_or_default(),
            audience: options.map(|it| it.audience.clone()).unwrap_or_default(),
            scope: options.map(|it| it.scope.clone()).unwrap_or_default(),
        }
    }

    /// Turn the entered values into a configuration. Redirect URIs are taken from the platform
    /// overlay, using `url_scheme` on native platforms.
    ///
    /// A provider key outside the catalog is kept as is. The controller then drives it with the
    /// default client.
    pub fn build(
        self,
        platform: Platform,
        url_scheme: &str,
    ) -> Result<AuthConfigUpdate, InvalidCustomConfig> {
        if self.client_id.trim().is_empty() {
            return MissingClientIdSnafu.fail();
        }
        Url::parse(&self.discovery_url).context(DiscoveryUrlSnafu {
            discovery_url: self.discovery_url.clone(),
        })?;

        let overlay = catalog::platform_overlay(platform, url_scheme);
        let options = ProviderOptions {
            client_id: self.client_id,
            discovery_url: self.discovery_url,
            redirect_uri: overlay.redirect_uri,
            logout_url: overlay.logout_url,
            scope: self.scope,
            audience: self.audience,
        };
        let provider = catalog::find_provider(&self.provider).unwrap_or_else(|| Provider {
            label: self.provider.to_string(),
            key: self.provider,
        });
        Ok(AuthConfigUpdate::for_platform(
            options, provider, self.flow, platform,
        ))
    }
}

/// Configuration must not be edited while logged in.
pub fn edits_enabled(logged_in: bool) -> bool {
    !logged_in
}

/// Templates redirect to the `msauth` scheme and are only offered when the app is registered
/// for it.
pub fn templates_enabled(logged_in: bool, url_scheme: &str) -> bool {
    !logged_in && url_scheme == DEFAULT_URL_SCHEME
}
