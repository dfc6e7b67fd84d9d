use crate::catalog::ProviderOptions;
use crate::sdk::{AuthConnectConfig, AuthSdk, ProviderClient, SdkError, SessionResult};

/// Minimal SDK for unit tests. Logging out always fails, refreshes are always declined.
#[derive(Debug, Default)]
pub(crate) struct StubSdk {
    pub(crate) fail_setup: bool,

    /// Let `login` never complete.
    pub(crate) hang_login: bool,
}

impl AuthSdk for StubSdk {
    async fn setup(&self, _config: &AuthConnectConfig) -> Result<(), SdkError> {
        if self.fail_setup {
            return Err(SdkError::new("setup rejected"));
        }
        Ok(())
    }

    async fn login(
        &self,
        _client: ProviderClient,
        _options: &ProviderOptions,
    ) -> Result<SessionResult, SdkError> {
        if self.hang_login {
            std::future::pending::<()>().await;
        }
        Ok(SessionResult::new("access", None, None))
    }

    async fn logout(
        &self,
        _client: ProviderClient,
        _session: &SessionResult,
    ) -> Result<(), SdkError> {
        Err(SdkError::new("offline"))
    }

    async fn is_refresh_token_available(&self, _session: &SessionResult) -> Result<bool, SdkError> {
        Ok(false)
    }

    async fn is_access_token_expired(&self, _session: &SessionResult) -> Result<bool, SdkError> {
        Ok(false)
    }

    async fn refresh_session(
        &self,
        _client: ProviderClient,
        _session: &SessionResult,
    ) -> Result<Option<SessionResult>, SdkError> {
        Ok(None)
    }
}
