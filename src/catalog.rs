//! Static catalog of the identity providers, web authorization flows and per-provider default
//! option sets this harness knows about. Pure lookups, nothing in here can fail.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::config::Platform;

/// Identifier of an identity-provider integration.
///
/// The catalog is closed, but persisted data may still carry a key we do not know (for example,
/// written by an older build). Such keys survive a round-trip through storage as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProviderKey {
    Auth0,
    Azure,
    Cognito,
    Okta,
    OneLogin,
    Other(String),
}

impl ProviderKey {
    pub fn as_str(&self) -> &str {
        match self {
            ProviderKey::Auth0 => "auth0",
            ProviderKey::Azure => "azure",
            ProviderKey::Cognito => "cognito",
            ProviderKey::Okta => "okta",
            ProviderKey::OneLogin => "onelogin",
            ProviderKey::Other(other) => other.as_str(),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ProviderKey::Other(_))
    }
}

impl From<String> for ProviderKey {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<&str> for ProviderKey {
    fn from(value: &str) -> Self {
        match value {
            "auth0" => ProviderKey::Auth0,
            "azure" => ProviderKey::Azure,
            "cognito" => ProviderKey::Cognito,
            "okta" => ProviderKey::Okta,
            "onelogin" => ProviderKey::OneLogin,
            other => ProviderKey::Other(other.to_owned()),
        }
    }
}

impl From<ProviderKey> for String {
    fn from(value: ProviderKey) -> Self {
        match value {
            ProviderKey::Other(other) => other,
            known => known.as_str().to_owned(),
        }
    }
}

impl Display for ProviderKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An identity-provider integration as selectable in the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    pub key: ProviderKey,

    /// Display string. Persisted under `value` to stay readable by earlier builds.
    #[serde(rename = "value")]
    pub label: String,
}

/// Web authorization flow variant. Only relevant when running in a browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlowKey {
    #[serde(rename = "implicit")]
    Implicit,
    #[serde(rename = "PKCE")]
    Pkce,
}

impl FlowKey {
    pub fn as_str(self) -> &'static str {
        match self {
            FlowKey::Implicit => "implicit",
            FlowKey::Pkce => "PKCE",
        }
    }
}

impl Display for FlowKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flow {
    pub key: FlowKey,

    #[serde(rename = "value")]
    pub label: String,
}

/// OIDC client configuration handed to the SDK on login.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderOptions {
    pub client_id: String,
    pub discovery_url: String,
    pub redirect_uri: String,
    pub logout_url: String,
    pub scope: String,

    /// May be empty. Auth0 requires it, its JWT payload stays empty otherwise.
    #[serde(default)]
    pub audience: String,
}

impl ProviderOptions {
    /// Replace redirect and logout URIs with the ones of the given overlay.
    #[must_use]
    pub fn with_overlay(mut self, overlay: &OptionsOverlay) -> Self {
        self.redirect_uri.clone_from(&overlay.redirect_uri);
        self.logout_url.clone_from(&overlay.logout_url);
        self
    }
}

/// Partial `ProviderOptions` adapting redirect/logout URIs to the execution platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionsOverlay {
    pub redirect_uri: String,
    pub logout_url: String,
}

pub const DEFAULT_URL_SCHEME: &str = "msauth";

const WEB_AUTH_ACTION_COMPLETE: &str = "http://localhost:8100/auth-action-complete";

pub fn providers() -> Vec<Provider> {
    [
        (ProviderKey::Auth0, "Auth0"),
        (ProviderKey::Azure, "Azure B2C"),
        (ProviderKey::Cognito, "Cognito (AWS)"),
        (ProviderKey::Okta, "Okta"),
        (ProviderKey::OneLogin, "OneLogin"),
    ]
    .into_iter()
    .map(|(key, label)| Provider {
        key,
        label: label.to_owned(),
    })
    .collect()
}

pub fn flows() -> Vec<Flow> {
    [(FlowKey::Implicit, "Implicit"), (FlowKey::Pkce, "PKCE")]
        .into_iter()
        .map(|(key, label)| Flow {
            key,
            label: label.to_owned(),
        })
        .collect()
}

pub fn find_provider(key: &ProviderKey) -> Option<Provider> {
    providers().into_iter().find(|it| &it.key == key)
}

pub fn find_flow(key: FlowKey) -> Option<Flow> {
    flows().into_iter().find(|it| it.key == key)
}

/// The provider selected when nothing was persisted yet.
pub fn default_provider() -> Provider {
    Provider {
        key: ProviderKey::Cognito,
        label: "Cognito (AWS)".to_owned(),
    }
}

/// The flow selected when nothing was persisted yet.
pub fn default_flow() -> Flow {
    Flow {
        key: FlowKey::Pkce,
        label: "PKCE".to_owned(),
    }
}

/// Preset options for a provider. Presets redirect to the `msauth` scheme.
///
/// The OneLogin preset is a placeholder. Its client id and discovery URL do not belong to a
/// real OneLogin tenant and must be replaced before logging in.
pub fn preset_options(key: &ProviderKey) -> Option<ProviderOptions> {
    let (client_id, discovery_url, redirect, scope, audience) = match key {
        ProviderKey::Auth0 => (
            "yLasZNUGkZ19DGEjTmAITBfGXzqbvd00",
            "https://dev-2uspt-sz.us.auth0.com/.well-known/openid-configuration",
            "msauth://auth-action-complete",
            "openid email picture profile offline_access",
            "https://io.ionic.demo.ac",
        ),
        ProviderKey::Azure => (
            "ed8cb65d-7bb2-4107-bc36-557fb680b994",
            "https://dtjacdemo.b2clogin.com/dtjacdemo.onmicrosoft.com/v2.0/.well-known/openid-configuration?p=B2C_1_acdemo2",
            "msauth://com.ionic.acprovider/O5m5Gtd2Xt8UNkW3wk7DWyKGfv8%3D",
            "openid offline_access email profile https://dtjacdemo.onmicrosoft.com/ed8cb65d-7bb2-4107-bc36-557fb680b994/demo.read",
            "",
        ),
        ProviderKey::Cognito => (
            "64p9c53l5thd5dikra675suvq9",
            "https://cognito-idp.us-east-2.amazonaws.com/us-east-2_YU8VQe29z/.well-known/openid-configuration",
            "msauth://auth-action-complete",
            "openid email profile",
            "",
        ),
        ProviderKey::Okta => (
            "0oaur4c907I5uMr4I0h7",
            "https://dev-622807.oktapreview.com/.well-known/openid-configuration",
            "msauth://auth-action-complete",
            "openid email profile offline_access",
            "",
        ),
        // Placeholder values, not a registered client.
        ProviderKey::OneLogin => (
            "c3a1fe40-2ba5-013c-9d1f-0a8b2d7ea1c5",
            "https://ionic-demo.onelogin.com/oidc/2/.well-known/openid-configuration",
            "msauth://auth-action-complete",
            "openid email profile",
            "",
        ),
        ProviderKey::Other(_) => return None,
    };
    Some(ProviderOptions {
        client_id: client_id.to_owned(),
        discovery_url: discovery_url.to_owned(),
        redirect_uri: redirect.to_owned(),
        logout_url: redirect.to_owned(),
        scope: scope.to_owned(),
        audience: audience.to_owned(),
    })
}

/// Redirect/logout URIs pointing at the local development server.
pub fn web_overlay() -> OptionsOverlay {
    OptionsOverlay {
        redirect_uri: WEB_AUTH_ACTION_COMPLETE.to_owned(),
        logout_url: WEB_AUTH_ACTION_COMPLETE.to_owned(),
    }
}

/// Redirect/logout URIs using the app's custom URL scheme.
pub fn native_overlay(url_scheme: &str) -> OptionsOverlay {
    let uri = format!("{url_scheme}://auth-action-complete");
    OptionsOverlay {
        redirect_uri: uri.clone(),
        logout_url: uri,
    }
}

pub fn platform_overlay(platform: Platform, url_scheme: &str) -> OptionsOverlay {
    match platform {
        Platform::Native => native_overlay(url_scheme),
        Platform::Web => web_overlay(),
    }
}

/// Options used on first start, when nothing was persisted.
///
/// Native builds take the Cognito preset as is, web builds redirect to localhost instead.
pub fn default_options(platform: Platform) -> ProviderOptions {
    let preset = cognito_preset();
    match platform {
        Platform::Native => preset,
        Platform::Web => preset.with_overlay(&web_overlay()),
    }
}

fn cognito_preset() -> ProviderOptions {
    // Known keys always have a preset.
    preset_options(&ProviderKey::Cognito).unwrap_or_default()
}
