use leptos::prelude::*;

use crate::config::AuthConnectOptions;
use crate::hooks::init_auth_context;
use crate::kv::KeyValueStore;
use crate::sdk::AuthSdk;

/// Initialize Auth Connect and provide the `AuthContext` to `children`.
///
/// Children are only rendered once the SDK was set up. Until then, `fallback` is shown, which
/// defaults to a plain loading indicator. Should initialization fail, the fallback stays and the
/// error is available through `AuthContext::last_error`.
#[allow(clippy::must_use_candidate)]
#[component]
pub fn AuthProvider<S, K>(
    /// The Auth Connect SDK binding.
    sdk: S,

    /// Where configuration and session are persisted, e.g. `WebStorage`.
    store: K,

    /// Platform, URL scheme and SDK setup options. Defaults to `AuthConnectOptions::default()`.
    #[prop(optional)]
    options: Option<AuthConnectOptions>,

    /// Rendered while initialization is in progress.
    #[prop(optional, into)]
    fallback: Option<ViewFn>,

    children: ChildrenFn,
) -> impl IntoView
where
    S: AuthSdk + 'static,
    K: KeyValueStore + 'static,
{
    let auth = init_auth_context(sdk, store, options.unwrap_or_default());
    let fallback = fallback.unwrap_or_else(|| ViewFn::from(|| view! { <LoadingIndicator/> }));

    view! {
        <Show when=move || auth.is_ready.get() fallback=fallback>
            { children() }
        </Show>
    }
}

#[component]
fn LoadingIndicator() -> impl IntoView {
    view! {
        <div class="auth-connect-loading" role="progressbar" aria-busy="true">
            "Loading..."
        </div>
    }
}
