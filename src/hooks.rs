use leptos::prelude::*;

use crate::config::AuthConnectOptions;
use crate::controller::AuthController;
use crate::kv::KeyValueStore;
use crate::sdk::AuthSdk;
use crate::state::AuthContext;

/// Create an `AuthController` for `sdk` and `kv`, start its initialization in the background and
/// provide the resulting `AuthContext` to all child components.
///
/// Must be called from inside a Leptos owner, on a thread able to run local tasks.
pub fn init_auth_context<S, K>(sdk: S, kv: K, options: AuthConnectOptions) -> AuthContext<S, K>
where
    S: AuthSdk + 'static,
    K: KeyValueStore + 'static,
{
    tracing::trace!(platform = ?options.platform, "Initializing Auth Connect...");

    let controller = AuthController::new(sdk, kv, options);
    let auth = AuthContext::new(&controller);
    auth.start(controller);

    provide_context(auth);
    auth
}

/// Access the `AuthContext` provided by `init_auth_context` or the `AuthProvider` component.
///
/// # Panics
///
/// When no context of this exact type was provided.
pub fn use_auth_context<S, K>() -> AuthContext<S, K>
where
    S: AuthSdk + 'static,
    K: KeyValueStore + 'static,
{
    expect_context::<AuthContext<S, K>>()
}

pub fn try_use_auth_context<S, K>() -> Option<AuthContext<S, K>>
where
    S: AuthSdk + 'static,
    K: KeyValueStore + 'static,
{
    use_context::<AuthContext<S, K>>()
}
