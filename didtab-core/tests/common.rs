//! Host doubles shared across integration tests.
#![allow(dead_code, missing_docs)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;

use didtab_core::{
    CredentialVerifier, DidRecord, DidsTab, Dispatcher, EventBuffer, KeyValueStore,
    NetworkInfo, SbtToken, StateStore, VerificationError,
};

pub const PASSWORD: &str = "correct horse battery staple";

pub fn seed_words() -> Vec<String> {
    "legal winner thank year wave sausage worth useful legal winner thank yellow"
        .split(' ')
        .map(str::to_string)
        .collect()
}

pub fn sbt_tokens() -> Vec<SbtToken> {
    ["1", "2"]
        .into_iter()
        .map(|id| SbtToken {
            token_id: id.to_string(),
            name: format!("Token {id}"),
            description: format!("Description for Token {id}"),
        })
        .collect()
}

pub fn local_dids() -> Vec<DidRecord> {
    ["did:example:123456789abcdefghi", "did:example:abcdefghi123456789"]
        .into_iter()
        .map(|id| DidRecord {
            id: id.to_string(),
            document: format!(
                r#"{{"@context":"https://www.w3.org/ns/did/v1","id":"{id}"}}"#
            ),
        })
        .collect()
}

pub fn mainnet() -> NetworkInfo {
    NetworkInfo {
        chain_id: "0x1".to_string(),
        nickname: "Mainnet".to_string(),
        is_mainnet: true,
    }
}

pub fn sepolia() -> NetworkInfo {
    NetworkInfo {
        chain_id: "0xaa36a7".to_string(),
        nickname: "Sepolia".to_string(),
        is_mainnet: false,
    }
}

pub struct InMemoryStorage {
    items: Mutex<HashMap<String, String>>,
    reads: AtomicUsize,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(HashMap::new()),
            reads: AtomicUsize::new(0),
        }
    }

    pub fn with_dids(dids: &[DidRecord]) -> Self {
        let storage = Self::new();
        storage.set_item("dids", &serde_json::to_string(dids).unwrap());
        storage
    }

    pub fn set_item(&self, key: &str, value: &str) {
        self.items
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl KeyValueStore for InMemoryStorage {
    fn get_item(&self, key: String) -> Option<String> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.items.lock().unwrap().get(&key).cloned()
    }
}

pub struct MockStateStore {
    network: Mutex<NetworkInfo>,
    tokens: Mutex<Vec<SbtToken>>,
    fetching: Mutex<bool>,
}

impl MockStateStore {
    pub fn new(network: NetworkInfo, tokens: Vec<SbtToken>) -> Self {
        Self {
            network: Mutex::new(network),
            tokens: Mutex::new(tokens),
            fetching: Mutex::new(false),
        }
    }

    pub fn set_fetching(&self, fetching: bool) {
        *self.fetching.lock().unwrap() = fetching;
    }

    pub fn set_tokens(&self, tokens: Vec<SbtToken>) {
        *self.tokens.lock().unwrap() = tokens;
    }
}

impl StateStore for MockStateStore {
    fn network(&self) -> NetworkInfo {
        self.network.lock().unwrap().clone()
    }

    fn locale(&self) -> String {
        "en".to_string()
    }

    fn sbt_tokens(&self) -> Vec<SbtToken> {
        self.tokens.lock().unwrap().clone()
    }

    fn fetching_dids(&self) -> bool {
        *self.fetching.lock().unwrap()
    }
}

#[derive(Default)]
pub struct RecordingDispatcher {
    pub fetches: AtomicUsize,
    pub import_modals: AtomicUsize,
}

impl Dispatcher for RecordingDispatcher {
    fn fetch_sbt_tokens(&self) {
        self.fetches.fetch_add(1, Ordering::SeqCst);
    }

    fn show_import_did_modal(&self) {
        self.import_modals.fetch_add(1, Ordering::SeqCst);
    }
}

/// Accepts [`PASSWORD`] and answers immediately.
pub struct InstantVerifier;

#[async_trait::async_trait]
impl CredentialVerifier for InstantVerifier {
    async fn verify(&self, credential: String) -> Result<Vec<String>, VerificationError> {
        if credential == PASSWORD {
            Ok(seed_words())
        } else {
            Err(VerificationError::Rejected {
                reason: "Incorrect password".to_string(),
            })
        }
    }
}

type Outcome = Result<Vec<String>, VerificationError>;

/// Holds every call until the test answers it, in any order.
#[derive(Default)]
pub struct ScriptedVerifier {
    calls: Mutex<Vec<Option<oneshot::Sender<Outcome>>>>,
}

impl ScriptedVerifier {
    pub fn calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub async fn wait_for_calls(&self, n: usize) {
        while self.calls() < n {
            tokio::task::yield_now().await;
        }
    }

    pub fn respond(&self, call: usize, outcome: Outcome) {
        let sender = self.calls.lock().unwrap()[call]
            .take()
            .expect("call already answered");
        let _ = sender.send(outcome);
    }
}

#[async_trait::async_trait]
impl CredentialVerifier for ScriptedVerifier {
    async fn verify(&self, _credential: String) -> Result<Vec<String>, VerificationError> {
        let (tx, rx) = oneshot::channel();
        self.calls.lock().unwrap().push(Some(tx));
        rx.await
            .unwrap_or_else(|_| Err(VerificationError::Unexpected("dropped".to_string())))
    }
}

pub struct Harness {
    pub tab: Arc<DidsTab>,
    pub storage: Arc<InMemoryStorage>,
    pub store: Arc<MockStateStore>,
    pub dispatcher: Arc<RecordingDispatcher>,
    pub events: Arc<EventBuffer>,
}

impl Harness {
    pub fn new(
        verifier: Arc<dyn CredentialVerifier>,
        network: NetworkInfo,
        tokens: Vec<SbtToken>,
        dids: &[DidRecord],
    ) -> Self {
        let storage = Arc::new(InMemoryStorage::with_dids(dids));
        let store = Arc::new(MockStateStore::new(network, tokens));
        let dispatcher = Arc::new(RecordingDispatcher::default());
        let events = Arc::new(EventBuffer::new());
        let tab = Arc::new(DidsTab::new(
            verifier,
            storage.clone(),
            store.clone(),
            dispatcher.clone(),
            events.clone(),
        ));
        Self {
            tab,
            storage,
            store,
            dispatcher,
            events,
        }
    }
}
