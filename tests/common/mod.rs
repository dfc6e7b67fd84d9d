#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use leptos_auth_connect::catalog::ProviderOptions;
use leptos_auth_connect::kv::{KeyValueStore, MemoryStore, StorageError};
use leptos_auth_connect::sdk::{AuthConnectConfig, AuthSdk, ProviderClient, SdkError, SessionResult};

pub mod tracing {
    use tracing_subscriber::filter::LevelFilter;

    pub fn init_subscriber() {
        let _ = tracing_subscriber::fmt()
            .with_max_level(LevelFilter::TRACE)
            .with_test_writer()
            .try_init();
    }
}

/// `MemoryStore` counting reads per key, able to fail writes of a chosen key.
#[derive(Debug, Default)]
pub struct CountingStore {
    inner: MemoryStore,
    reads: RefCell<BTreeMap<String, usize>>,
    failing_key: RefCell<Option<String>>,
}

impl CountingStore {
    pub fn shared() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn reads(&self, key: &str) -> usize {
        self.reads.borrow().get(key).copied().unwrap_or(0)
    }

    pub fn entry(&self, key: &str) -> Option<String> {
        self.inner.entry(key)
    }

    pub fn fail_writes_of(&self, key: &str) {
        *self.failing_key.borrow_mut() = Some(key.to_owned());
    }

    pub fn heal(&self) {
        *self.failing_key.borrow_mut() = None;
    }

    fn check(&self, key: &str) -> Result<(), StorageError> {
        match self.failing_key.borrow().as_deref() {
            Some(failing) if failing == key => Err(StorageError::Set {
                key: key.to_owned(),
                message: "disk full".to_owned(),
            }),
            _ => Ok(()),
        }
    }
}

impl KeyValueStore for CountingStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        *self.reads.borrow_mut().entry(key.to_owned()).or_default() += 1;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.check(key)?;
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.check(key)?;
        self.inner.remove(key).await
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Login(ProviderClient, ProviderOptions),
    Logout(ProviderClient),
    RefreshAvailable,
    Expired,
    Refresh(ProviderClient),
}

#[derive(Debug, Clone)]
pub enum RefreshOutcome {
    Renewed(SessionResult),
    Declined,
    Failed,
}

#[derive(Debug)]
struct FakeSdkState {
    setups: Vec<AuthConnectConfig>,
    calls: Vec<Call>,
    fail_setup: bool,
    fail_login: bool,
    fail_logout: bool,
    refresh_available: bool,
    expired: bool,
    refresh: RefreshOutcome,
}

/// Records every call. Clones share their state, so a test can keep one to inspect the SDK
/// after handing another to a controller.
#[derive(Debug, Clone)]
pub struct FakeSdk {
    state: Rc<RefCell<FakeSdkState>>,
}

impl Default for FakeSdk {
    fn default() -> Self {
        Self {
            state: Rc::new(RefCell::new(FakeSdkState {
                setups: Vec::new(),
                calls: Vec::new(),
                fail_setup: false,
                fail_login: false,
                fail_logout: false,
                refresh_available: true,
                expired: false,
                refresh: RefreshOutcome::Renewed(renewed_session()),
            })),
        }
    }
}

impl FakeSdk {
    pub fn setups(&self) -> Vec<AuthConnectConfig> {
        self.state.borrow().setups.clone()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub fn fail_setup(&self, fail: bool) {
        self.state.borrow_mut().fail_setup = fail;
    }

    pub fn fail_login(&self) {
        self.state.borrow_mut().fail_login = true;
    }

    pub fn fail_logout(&self) {
        self.state.borrow_mut().fail_logout = true;
    }

    pub fn set_expired(&self, expired: bool) {
        self.state.borrow_mut().expired = expired;
    }

    pub fn set_refresh_outcome(&self, outcome: RefreshOutcome) {
        self.state.borrow_mut().refresh = outcome;
    }

    fn record(&self, call: Call) {
        self.state.borrow_mut().calls.push(call);
    }
}

pub fn session() -> SessionResult {
    SessionResult::new("access-1", Some("refresh-1".to_owned()), Some("id-1".to_owned()))
}

pub fn renewed_session() -> SessionResult {
    SessionResult::new("access-2", Some("refresh-2".to_owned()), Some("id-2".to_owned()))
}

impl AuthSdk for FakeSdk {
    async fn setup(&self, config: &AuthConnectConfig) -> Result<(), SdkError> {
        if self.state.borrow().fail_setup {
            return Err(SdkError::new("setup rejected"));
        }
        self.state.borrow_mut().setups.push(*config);
        Ok(())
    }

    async fn login(
        &self,
        client: ProviderClient,
        options: &ProviderOptions,
    ) -> Result<SessionResult, SdkError> {
        self.record(Call::Login(client, options.clone()));
        if self.state.borrow().fail_login {
            return Err(SdkError::new("user cancelled"));
        }
        Ok(session())
    }

    async fn logout(
        &self,
        client: ProviderClient,
        _session: &SessionResult,
    ) -> Result<(), SdkError> {
        self.record(Call::Logout(client));
        if self.state.borrow().fail_logout {
            return Err(SdkError::new("end session endpoint unreachable"));
        }
        Ok(())
    }

    async fn is_refresh_token_available(&self, _session: &SessionResult) -> Result<bool, SdkError> {
        self.record(Call::RefreshAvailable);
        Ok(self.state.borrow().refresh_available)
    }

    async fn is_access_token_expired(&self, _session: &SessionResult) -> Result<bool, SdkError> {
        self.record(Call::Expired);
        Ok(self.state.borrow().expired)
    }

    async fn refresh_session(
        &self,
        client: ProviderClient,
        _session: &SessionResult,
    ) -> Result<Option<SessionResult>, SdkError> {
        self.record(Call::Refresh(client));
        let outcome = self.state.borrow().refresh.clone();
        match outcome {
            RefreshOutcome::Renewed(session) => Ok(Some(session)),
            RefreshOutcome::Declined => Ok(None),
            RefreshOutcome::Failed => Err(SdkError::new("network down")),
        }
    }
}
