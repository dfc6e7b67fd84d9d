use snafu::Snafu;

use crate::sdk::SdkError;
use crate::store::StoreError;

/// Everything an `AuthController` operation may fail with.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum AuthConnectError {
    #[snafu(display("AuthConnectError: Could not access persisted configuration"))]
    Store { source: StoreError },

    #[snafu(display("AuthConnectError: Auth Connect setup failed"))]
    Setup { source: SdkError },

    #[snafu(display("AuthConnectError: Login failed"))]
    Login { source: SdkError },

    #[snafu(display("AuthConnectError: Logout failed"))]
    Logout { source: SdkError },

    #[snafu(display("AuthConnectError: Refresh failed"))]
    Refresh { source: SdkError },

    #[snafu(display("AuthConnectError: Could not check token status"))]
    TokenStatus { source: SdkError },

    /// The provider answered a refresh without new tokens. The local session was dropped.
    #[snafu(display("The refresh failed, you are no longer logged in"))]
    RefreshRejected,

    /// Another operation is in flight, or initialization did not finish yet.
    #[snafu(display("AuthConnectError: Another operation is still in progress"))]
    Busy,
}
