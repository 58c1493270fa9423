//! Host interfaces consumed by the tab.
//!
//! The tab owns none of the data it shows: tokens and network information come from the
//! host's shared store, cached DIDs from local storage, and the recovery phrase from the
//! keyring. Each of those is reached through one of the traits below.

use serde::{Deserialize, Serialize};

use crate::{error::VerificationError, records::SbtToken};

/// Checks the wallet password and, on success, returns the recovery phrase words.
///
/// # Security
/// The credential is moved into the call and not retained by the core. Implementations
/// must not log it.
#[uniffi::export(with_foreign)]
#[async_trait::async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Verifies `credential`.
    ///
    /// # Errors
    ///
    /// Returns [`VerificationError::Rejected`] with a user-facing reason when the
    /// credential is wrong or the keyring refuses to export the phrase.
    async fn verify(&self, credential: String) -> Result<Vec<String>, VerificationError>;
}

/// Read access to the browser's local key-value storage.
///
/// The tab only reads; writes belong to the DID import flow.
#[uniffi::export(with_foreign)]
pub trait KeyValueStore: Send + Sync {
    /// Returns the raw value stored under `key`, if any.
    fn get_item(&self, key: String) -> Option<String>;
}

/// Read-only selectors over the host's shared state.
#[uniffi::export(with_foreign)]
pub trait StateStore: Send + Sync {
    /// The active network.
    fn network(&self) -> NetworkInfo;

    /// The active UI locale, e.g. `en`.
    fn locale(&self) -> String;

    /// Soulbound tokens fetched so far.
    fn sbt_tokens(&self) -> Vec<SbtToken>;

    /// Whether a token fetch is in flight.
    fn fetching_dids(&self) -> bool;
}

/// Host actions the tab can trigger. Neither returns a result to the tab.
#[uniffi::export(with_foreign)]
pub trait Dispatcher: Send + Sync {
    /// Starts an asynchronous fetch of soulbound tokens into the shared store.
    fn fetch_sbt_tokens(&self);

    /// Opens the external "import DID" modal.
    fn show_import_did_modal(&self);
}

/// The network the wallet is connected to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
pub struct NetworkInfo {
    /// Chain id as reported by the host, e.g. `0x1`.
    pub chain_id: String,
    /// Display name of the network.
    pub nickname: String,
    /// Whether this is the main network; token fetches only happen there.
    pub is_mainnet: bool,
}
