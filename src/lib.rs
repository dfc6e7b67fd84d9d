//! Configuration harness for an Auth Connect SDK.
//!
//! Pick one of several OIDC providers (Auth0, Azure AD, AWS Cognito, Okta, OneLogin) together with
//! a web authentication flow, persist that choice, set the SDK up with it and drive login, logout
//! and session refresh against the selected provider. The SDK itself is an `AuthSdk`
//! implementation you bring along; this crate never talks OIDC on its own.
//!
//! ```ignore
//! use leptos::prelude::*;
//! use leptos_auth_connect::{components::AuthProvider, kv::WebStorage, use_auth_context};
//!
//! #[component]
//! pub fn App() -> impl IntoView {
//!     view! {
//!         <AuthProvider sdk=MySdk::default() store=WebStorage::default()>
//!             <Home/>
//!         </AuthProvider>
//!     }
//! }
//!
//! #[component]
//! pub fn Home() -> impl IntoView {
//!     let auth = use_auth_context::<MySdk, WebStorage>();
//!     let toggle = Action::new_local(move |_: &()| async move { auth.toggle_login().await });
//!
//!     view! {
//!         <p>{ move || auth.state.read().status_label() }</p>
//!         <button on:click=move |_| { toggle.dispatch(()); }>"Login / Logout"</button>
//!     }
//! }
//! ```
//!
//! Without Leptos, use an `AuthController` directly.

pub mod catalog;
pub mod components;
mod config;
mod controller;
mod error;
mod hooks;
pub mod kv;
pub mod sdk;
mod state;
pub mod store;
pub mod templates;
#[cfg(test)]
mod testing;

// Library exports (additional to pub modules).
pub use config::*;
pub use controller::*;
pub use error::AuthConnectError;
pub use hooks::*;
pub use state::*;
pub mod url {
    pub use url::Url;
}
