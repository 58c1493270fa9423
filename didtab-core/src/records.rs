//! Records listed by the tab and the loader that gathers them on mount.

use serde::{Deserialize, Serialize};

use crate::{
    collaborators::{Dispatcher, KeyValueStore, StateStore},
    defaults::CACHED_DIDS_KEY,
};

/// A soulbound token owned by the selected account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct SbtToken {
    /// On-chain token id.
    pub token_id: String,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
}

/// A DID imported into the extension and cached in local storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
pub struct DidRecord {
    /// The identifier, e.g. `did:example:123456789abcdefghi`.
    pub id: String,
    /// The DID document, kept as the raw JSON string it was imported with.
    pub document: String,
}

/// Parses the cached DID list stored under [`CACHED_DIDS_KEY`].
///
/// Missing, empty or malformed content yields an empty list; this path never surfaces an
/// error to the user.
#[uniffi::export]
#[must_use]
pub fn parse_cached_records(raw: Option<String>) -> Vec<DidRecord> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    if raw.trim().is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<Vec<DidRecord>>(&raw) {
        Ok(records) => records,
        Err(err) => {
            log::warn!("ignoring unreadable DID cache: {err}");
            Vec::new()
        }
    }
}

/// Runs the tab's mount-time loading.
pub struct DataLoader<'a> {
    store: &'a dyn StateStore,
    storage: &'a dyn KeyValueStore,
    dispatcher: &'a dyn Dispatcher,
}

impl<'a> DataLoader<'a> {
    /// Creates a loader over the given collaborators.
    #[must_use]
    pub fn new(
        store: &'a dyn StateStore,
        storage: &'a dyn KeyValueStore,
        dispatcher: &'a dyn Dispatcher,
    ) -> Self {
        Self {
            store,
            storage,
            dispatcher,
        }
    }

    /// Dispatches the token fetch when on the main network, then reads the cached DIDs.
    #[must_use]
    pub fn mount(&self) -> Vec<DidRecord> {
        let network = self.store.network();
        if network.is_mainnet {
            log::debug!("fetching soulbound tokens on {}", network.nickname);
            self.dispatcher.fetch_sbt_tokens();
        }
        let records =
            parse_cached_records(self.storage.get_item(CACHED_DIDS_KEY.to_string()));
        log::info!("loaded {} cached DIDs", records.len());
        records
    }
}
