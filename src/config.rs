use serde::{Deserialize, Serialize};

use crate::catalog::DEFAULT_URL_SCHEME;

/// Where the application is running. Decides which option overlay applies and whether a web
/// authorization flow takes part in setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Mobile or desktop shell, redirecting through a custom URL scheme.
    Native,

    /// Plain browser.
    Web,
}

impl Platform {
    /// `Web` when compiled to `wasm32`, `Native` otherwise.
    pub fn current() -> Self {
        if cfg!(target_arch = "wasm32") {
            Platform::Web
        } else {
            Platform::Native
        }
    }

    pub fn is_native(self) -> bool {
        matches!(self, Platform::Native)
    }
}

/// Configuration used to initialize an `AuthController`.
#[derive(Debug, Clone)]
pub struct AuthConnectOptions {
    /// Defaults to `Platform::current()`.
    pub platform: Platform,

    /// Custom URL scheme used for native redirects.
    /// Defaults to the compile-time `AUTH_URL_SCHEME` environment variable, or `msauth`.
    pub url_scheme: String,

    pub advanced: AdvancedOptions,
}

impl Default for AuthConnectOptions {
    fn default() -> Self {
        Self {
            platform: Platform::current(),
            url_scheme: option_env!("AUTH_URL_SCHEME")
                .unwrap_or(DEFAULT_URL_SCHEME)
                .to_owned(),
            advanced: AdvancedOptions::default(),
        }
    }
}

/// Settings passed through to the SDK's one-time setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvancedOptions {
    /// Defaults to `LogLevel::Debug`.
    pub log_level: LogLevel,

    /// Webview used for the iOS login dialog.
    /// Defaults to `IosWebView::Private`.
    pub ios_web_view: IosWebView,

    /// How the login page is presented in a browser.
    /// Defaults to `WebUiMode::Popup`.
    pub web_ui_mode: WebUiMode,
}

impl Default for AdvancedOptions {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Debug,
            ios_web_view: IosWebView::Private,
            web_ui_mode: WebUiMode::Popup,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IosWebView {
    Private,
    Shared,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WebUiMode {
    Popup,
    Current,
}
