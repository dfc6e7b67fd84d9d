use std::fmt::{Debug, Formatter};

use leptos::prelude::*;

use crate::catalog::{Flow, Provider, ProviderOptions};
use crate::controller::{AuthController, AuthSnapshot, Readiness};
use crate::error::{AuthConnectError, BusySnafu};
use crate::kv::KeyValueStore;
use crate::sdk::AuthSdk;
use crate::templates::AuthConfigUpdate;

/// Reactive handle to an `AuthController`, provided as context by `init_auth_context`.
///
/// The controller lives in a local arena slot. While an operation runs, it is taken out of that
/// slot, so that any overlapping operation fails fast with `AuthConnectError::Busy` instead of
/// interleaving with it. The same happens while initialization is still running.
pub struct AuthContext<S: 'static, K: 'static> {
    controller: StoredValue<Option<AuthController<S, K>>, LocalStorage>,

    /// Controller state as of the end of the last operation.
    pub state: Signal<AuthSnapshot>,
    set_state: WriteSignal<AuthSnapshot>,

    /// Derived signal stating `true` once the SDK was set up. Render app content only then.
    pub is_ready: Signal<bool>,

    /// Derived signal stating `true` while a session is held.
    pub is_logged_in: Signal<bool>,

    /// Display message of the error the last operation ended with, if any.
    pub last_error: Signal<Option<String>>,
    set_last_error: WriteSignal<Option<String>>,
}

impl<S: 'static, K: 'static> Clone for AuthContext<S, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: 'static, K: 'static> Copy for AuthContext<S, K> {}

impl<S: 'static, K: 'static> Debug for AuthContext<S, K> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthContext")
            .field("state", &self.state)
            .field("is_ready", &self.is_ready)
            .field("is_logged_in", &self.is_logged_in)
            .field("last_error", &self.last_error)
            .finish_non_exhaustive()
    }
}

impl<S, K> AuthContext<S, K>
where
    S: AuthSdk + 'static,
    K: KeyValueStore + 'static,
{
    pub(crate) fn new(controller: &AuthController<S, K>) -> Self {
        let (state, set_state) = signal(controller.snapshot());
        let (last_error, set_last_error) = signal::<Option<String>>(None);
        Self {
            controller: StoredValue::new_local(None),
            state: state.into(),
            set_state,
            is_ready: Signal::derive(move || state.read().is_ready()),
            is_logged_in: Signal::derive(move || state.read().is_logged_in()),
            last_error: last_error.into(),
            set_last_error,
        }
    }

    /// Initialize the controller in the background and hand it over once done.
    pub(crate) fn start(self, controller: AuthController<S, K>) {
        self.set_state.set(AuthSnapshot {
            readiness: Readiness::Loading,
            ..controller.snapshot()
        });
        leptos::task::spawn_local(async move {
            let result = self
                .run(controller, async |controller: &mut AuthController<S, K>| {
                    controller.initialize().await
                })
                .await;
            if let Err(err) = result {
                tracing::error!(?err, "Could not initialize Auth Connect.");
            }
        });
    }

    /// Run `op` against a controller taken out of the slot. The controller goes back into the slot
    /// when `op` finishes or when this future is dropped early.
    async fn run<T>(
        &self,
        controller: AuthController<S, K>,
        op: impl AsyncFnOnce(&mut AuthController<S, K>) -> Result<T, AuthConnectError>,
    ) -> Result<T, AuthConnectError> {
        let mut lease = Lease {
            auth: *self,
            controller: Some(controller),
        };
        let result = match lease.controller.as_mut() {
            Some(controller) => op(controller).await,
            None => BusySnafu.fail(),
        };
        let _ = self
            .set_last_error
            .try_set(result.as_ref().err().map(ToString::to_string));
        result
    }

    async fn exclusive<T>(
        &self,
        op: impl AsyncFnOnce(&mut AuthController<S, K>) -> Result<T, AuthConnectError>,
    ) -> Result<T, AuthConnectError> {
        let Some(controller) = self.controller.try_update_value(|it| it.take()).flatten() else {
            tracing::debug!("Auth controller is busy or not initialized yet.");
            return BusySnafu.fail();
        };
        self.run(controller, op).await
    }

    pub async fn login(&self) -> Result<(), AuthConnectError> {
        self.exclusive(async |controller: &mut AuthController<S, K>| controller.login().await)
            .await
    }

    pub async fn logout(&self) -> Result<(), AuthConnectError> {
        self.exclusive(async |controller: &mut AuthController<S, K>| controller.logout().await)
            .await
    }

    pub async fn refresh(&self) -> Result<(), AuthConnectError> {
        self.exclusive(async |controller: &mut AuthController<S, K>| controller.refresh().await)
            .await
    }

    pub async fn can_refresh(&self) -> Result<bool, AuthConnectError> {
        self.exclusive(async |controller: &mut AuthController<S, K>| {
            controller.can_refresh().await
        })
        .await
    }

    pub async fn is_expired(&self) -> Result<bool, AuthConnectError> {
        self.exclusive(async |controller: &mut AuthController<S, K>| {
            controller.is_expired().await
        })
        .await
    }

    pub async fn update_auth_config(
        &self,
        options: ProviderOptions,
        provider: Provider,
        flow: Option<Flow>,
    ) -> Result<(), AuthConnectError> {
        self.exclusive(async move |controller: &mut AuthController<S, K>| {
            controller.update_auth_config(options, provider, flow).await
        })
        .await
    }

    pub async fn apply_config(&self, update: AuthConfigUpdate) -> Result<(), AuthConnectError> {
        self.exclusive(async move |controller: &mut AuthController<S, K>| {
            controller.apply_config(update).await
        })
        .await
    }

    /// Log out when logged in, log in otherwise.
    pub async fn toggle_login(&self) -> Result<(), AuthConnectError> {
        if self.is_logged_in.get_untracked() {
            self.logout().await
        } else {
            self.login().await
        }
    }
}

/// Controller on loan to a running operation.
struct Lease<S: 'static, K: 'static> {
    auth: AuthContext<S, K>,
    controller: Option<AuthController<S, K>>,
}

impl<S: 'static, K: 'static> Drop for Lease<S, K> {
    fn drop(&mut self) {
        if let Some(controller) = self.controller.take() {
            let _ = self.auth.set_state.try_set(controller.snapshot());
            let _ = self
                .auth
                .controller
                .try_update_value(|slot| *slot = Some(controller));
        }
    }
}

#[cfg(test)]
mod tests {
    use assertr::prelude::*;

    use super::*;
    use crate::config::{AuthConnectOptions, Platform};
    use crate::kv::MemoryStore;
    use crate::testing::StubSdk;

    async fn ready_context(sdk: StubSdk) -> AuthContext<StubSdk, MemoryStore> {
        let options = AuthConnectOptions {
            platform: Platform::Web,
            ..AuthConnectOptions::default()
        };
        let controller = AuthController::new(sdk, MemoryStore::new(), options);
        let auth = AuthContext::new(&controller);
        auth.run(controller, async |controller: &mut AuthController<StubSdk, MemoryStore>| {
            controller.initialize().await
        })
        .await
        .unwrap();
        auth
    }

    #[tokio::test]
    async fn operations_are_refused_until_the_controller_was_handed_over() {
        let owner = Owner::new();
        owner.set();
        let controller = AuthController::new(
            StubSdk::default(),
            MemoryStore::new(),
            AuthConnectOptions::default(),
        );
        let auth = AuthContext::new(&controller);

        let err = auth.login().await.unwrap_err();

        assert_that(matches!(err, AuthConnectError::Busy)).is_equal_to(true);
        assert_that(auth.is_ready.get_untracked()).is_equal_to(false);
    }

    #[tokio::test]
    async fn state_follows_operations() {
        let owner = Owner::new();
        owner.set();
        let auth = ready_context(StubSdk::default()).await;
        assert_that(auth.is_ready.get_untracked()).is_equal_to(true);

        auth.toggle_login().await.unwrap();
        assert_that(auth.is_logged_in.get_untracked()).is_equal_to(true);
        assert_that(auth.state.get_untracked().status_label()).is_equal_to("Logged In");

        let err = auth.toggle_login().await.unwrap_err();
        assert_that(matches!(err, AuthConnectError::Logout { .. })).is_equal_to(true);
        assert_that(auth.is_logged_in.get_untracked()).is_equal_to(false);
        assert_that(auth.last_error.get_untracked())
            .is_equal_to(Some("AuthConnectError: Logout failed".to_owned()));
    }

    #[tokio::test]
    async fn controller_is_returned_when_an_operation_is_abandoned() {
        let owner = Owner::new();
        owner.set();
        let auth = ready_context(StubSdk {
            hang_login: true,
            ..StubSdk::default()
        })
        .await;

        let mut login_finished = false;
        tokio::select! {
            biased;
            _ = auth.login() => login_finished = true,
            () = tokio::task::yield_now() => {}
        }
        assert_that(login_finished).is_equal_to(false);

        assert_that(auth.logout().await.is_ok()).is_equal_to(true);
        assert_that(auth.is_ready.get_untracked()).is_equal_to(true);
        assert_that(auth.is_logged_in.get_untracked()).is_equal_to(false);
    }
}
