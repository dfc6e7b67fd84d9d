//! Boundary to the external Auth Connect SDK. This crate never speaks OIDC itself; everything
//! protocol related is delegated through the `AuthSdk` trait.

use serde::{Deserialize, Serialize};
use snafu::Snafu;

use crate::catalog::{FlowKey, Provider, ProviderKey, ProviderOptions};
use crate::config::{AdvancedOptions, IosWebView, LogLevel, Platform, WebUiMode};

/// Failure reported by the SDK. Opaque to this crate.
#[derive(Debug, Snafu)]
#[snafu(display("SdkError: {message}"))]
pub struct SdkError {
    message: String,
}

impl SdkError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Credentials returned by a successful login or refresh.
///
/// Tokens are opaque strings and never parsed. Whatever else the SDK hands back is kept in
/// `additional`, so persisting and restoring a result is lossless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResult {
    pub access_token: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,

    #[serde(flatten)]
    pub additional: serde_json::Map<String, serde_json::Value>,
}

impl SessionResult {
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: Option<String>,
        id_token: Option<String>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token,
            id_token,
            additional: serde_json::Map::new(),
        }
    }
}

/// The SDK client type to drive a provider with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderClient {
    Auth0,
    Azure,
    Cognito,
    Okta,
    OneLogin,
}

impl ProviderClient {
    /// Select the client for a provider. Unknown or missing providers get the Cognito client.
    pub fn for_provider(provider: Option<&Provider>) -> Self {
        match provider.map(|it| &it.key) {
            Some(ProviderKey::Auth0) => ProviderClient::Auth0,
            Some(ProviderKey::Azure) => ProviderClient::Azure,
            Some(ProviderKey::Cognito) => ProviderClient::Cognito,
            Some(ProviderKey::Okta) => ProviderClient::Okta,
            Some(ProviderKey::OneLogin) => ProviderClient::OneLogin,
            unknown => {
                tracing::warn!(
                    provider = ?unknown,
                    "No known provider was set. Defaulting to the Cognito (AWS) client."
                );
                ProviderClient::Cognito
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformTag {
    Capacitor,
    Web,
}

impl From<Platform> for PlatformTag {
    fn from(value: Platform) -> Self {
        match value {
            Platform::Native => PlatformTag::Capacitor,
            Platform::Web => PlatformTag::Web,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IosSetup {
    pub web_view: IosWebView,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebSetup {
    pub ui_mode: WebUiMode,
    pub auth_flow: FlowKey,
}

/// Argument of `AuthSdk::setup`. Serializes to the SDK's expected JSON shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthConnectConfig {
    pub log_level: LogLevel,
    pub platform: PlatformTag,
    pub ios: IosSetup,
    pub web: WebSetup,
}

impl AuthConnectConfig {
    /// Without a selected flow, the implicit flow is configured.
    pub fn new(platform: Platform, flow: Option<FlowKey>, advanced: &AdvancedOptions) -> Self {
        Self {
            log_level: advanced.log_level,
            platform: platform.into(),
            ios: IosSetup {
                web_view: advanced.ios_web_view,
            },
            web: WebSetup {
                ui_mode: advanced.web_ui_mode,
                auth_flow: flow.unwrap_or(FlowKey::Implicit),
            },
        }
    }
}

/// Operations consumed from the Auth Connect SDK.
#[allow(async_fn_in_trait)]
pub trait AuthSdk {
    /// One-time SDK configuration. Called again whenever the selected configuration changes.
    async fn setup(&self, config: &AuthConnectConfig) -> Result<(), SdkError>;

    async fn login(
        &self,
        client: ProviderClient,
        options: &ProviderOptions,
    ) -> Result<SessionResult, SdkError>;

    async fn logout(&self, client: ProviderClient, session: &SessionResult)
    -> Result<(), SdkError>;

    async fn is_refresh_token_available(&self, session: &SessionResult) -> Result<bool, SdkError>;

    async fn is_access_token_expired(&self, session: &SessionResult) -> Result<bool, SdkError>;

    /// `Ok(None)` means the provider declined the refresh without raising an error.
    async fn refresh_session(
        &self,
        client: ProviderClient,
        session: &SessionResult,
    ) -> Result<Option<SessionResult>, SdkError>;
}
