//! WebAssembly bindings for `didtab_core`.
//!
//! The extension UI owns rendering and the Redux store; it passes store snapshots in,
//! forwards hold-to-reveal callbacks, and drains buffered analytics events after each
//! interaction.

#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use js_sys::{Function, Promise};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{future_to_promise, JsFuture};

use didtab_core::{
    defaults::CACHED_DIDS_KEY,
    records::DataLoader,
    view::{select_content, EmptyStateTracker},
    DidRecord, DidTabError, Dispatcher, EventBuffer, KeyValueStore, NetworkInfo,
    RevealController, SbtToken, SecretFormat, StateStore, VerificationError,
};

const FORMAT_TEXT: &str = "text-seed";
const FORMAT_QR: &str = "qr-srp";

/// The DIDs tab, one instance per mount.
#[wasm_bindgen]
pub struct DidsTab {
    network: NetworkInfo,
    locale: String,
    events: Arc<EventBuffer>,
    reveal: Rc<RevealController>,
    records: Vec<DidRecord>,
    empty_state: EmptyStateTracker,
}

#[wasm_bindgen]
impl DidsTab {
    /// Creates the tab for `network` (`{ chainId, nickname, isMainnet }`) and `locale`.
    ///
    /// # Errors
    /// Returns a stringified error when `network` has the wrong shape.
    #[wasm_bindgen(constructor)]
    pub fn new(network: JsValue, locale: String) -> Result<Self, JsValue> {
        let network: HostNetwork = serde_wasm_bindgen::from_value(network)?;
        let events = Arc::new(EventBuffer::new());
        Ok(Self {
            network: network.into(),
            locale,
            reveal: Rc::new(RevealController::new(events.clone())),
            events,
            records: Vec::new(),
            empty_state: EmptyStateTracker::new(),
        })
    }

    /// Loads the cached DIDs from `localStorage.getItem("dids")`.
    ///
    /// Returns `true` when the host should dispatch the soulbound token fetch.
    #[wasm_bindgen(js_name = mount)]
    pub fn mount(&mut self, cached_dids: Option<String>) -> bool {
        let snapshot = HostSnapshot {
            network: self.network.clone(),
            locale: self.locale.clone(),
            tokens: Vec::new(),
            fetching: false,
        };
        let cache = CachedDids(cached_dids);
        let actions = PendingActions::default();
        self.records = DataLoader::new(&snapshot, &cache, &actions).mount();
        actions.fetch_tokens.load(Ordering::Relaxed)
    }

    /// Selects the list content for the current store state.
    ///
    /// # Errors
    /// Returns a stringified error when `tokens` is not a list of
    /// `{ tokenId, name, description }`.
    #[wasm_bindgen(js_name = content)]
    pub fn content(&mut self, fetching: bool, tokens: JsValue) -> Result<JsValue, JsValue> {
        let tokens: Vec<SbtToken> = if tokens.is_undefined() || tokens.is_null() {
            Vec::new()
        } else {
            serde_wasm_bindgen::from_value(tokens)?
        };
        let content = select_content(fetching, tokens, self.records.clone());
        self.empty_state
            .observe(&content, &self.network, &self.locale, self.events.as_ref());
        to_js(&content)
    }

    /// Submits the password form. `verify(password)` must return a promise of the
    /// recovery phrase words, or reject with an `Error` whose message is shown to the user.
    ///
    /// The returned promise resolves once the outcome is applied and rejects with the
    /// failure reason.
    #[wasm_bindgen(js_name = submitCredential)]
    pub fn submit_credential(&self, password: String, verify: Function) -> Promise {
        let reveal = Rc::clone(&self.reveal);
        future_to_promise(async move {
            let id = reveal.begin_submission().map_err(|e| error_to_jsvalue(&e))?;
            let outcome = match verify.call1(&JsValue::NULL, &JsValue::from(password)) {
                Ok(value) => await_words(value).await,
                Err(err) => Err(rejection(&err)),
            };
            reveal
                .resolve_submission(id, outcome)
                .map(|()| JsValue::UNDEFINED)
                .map_err(|e| error_to_jsvalue(&e))
        })
    }

    /// `onLongPressed` of the hold-to-reveal modal.
    #[wasm_bindgen(js_name = completeConfirmationGesture)]
    pub fn complete_confirmation_gesture(&self) -> bool {
        self.reveal.complete_confirmation_gesture()
    }

    /// `onClose` of the hold-to-reveal modal.
    #[wasm_bindgen(js_name = cancelConfirmation)]
    pub fn cancel_confirmation(&self) -> bool {
        self.reveal.cancel_confirmation()
    }

    /// Tab click in the revealed view, `"text-seed"` or `"qr-srp"`.
    #[wasm_bindgen(js_name = selectFormat)]
    pub fn select_format(&self, tab_key: &str) -> bool {
        parse_format(tab_key).is_some_and(|format| self.reveal.select_format(format))
    }

    /// Whether the hold-to-reveal modal is open.
    #[wasm_bindgen(js_name = isModalOpen)]
    #[must_use]
    pub fn is_modal_open(&self) -> bool {
        self.reveal.is_modal_open()
    }

    /// The reveal area: `{ kind: "password_prompt", error }` or
    /// `{ kind: "revealed_secret", format }`.
    ///
    /// # Errors
    /// Returns a stringified error if serialization fails.
    #[wasm_bindgen(js_name = revealView)]
    pub fn reveal_view(&self) -> Result<JsValue, JsValue> {
        to_js(&self.reveal.view())
    }

    /// The phrase for the clipboard, when revealed.
    #[wasm_bindgen(js_name = copySecret)]
    #[must_use]
    pub fn copy_secret(&self) -> Option<String> {
        self.reveal
            .copy_secret()
            .map(|phrase| phrase.as_str().to_owned())
    }

    /// QR modules of the phrase, `{ size, modules }`, when revealed.
    ///
    /// # Errors
    /// Returns a stringified error if serialization fails.
    #[wasm_bindgen(js_name = secretQr)]
    pub fn secret_qr(&self) -> Result<JsValue, JsValue> {
        to_js(&self.reveal.secret_qr())
    }

    /// Analytics events raised since the last call, oldest first.
    ///
    /// # Errors
    /// Returns a stringified error if serialization fails.
    #[wasm_bindgen(js_name = drainEvents)]
    pub fn drain_events(&self) -> Result<JsValue, JsValue> {
        to_js(&self.events.drain())
    }

    /// Drops the phrase; pending submissions resolve into no-ops.
    #[wasm_bindgen(js_name = teardown)]
    pub fn teardown(&self) {
        self.reveal.teardown();
    }
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct HostNetwork {
    chain_id: String,
    nickname: String,
    is_mainnet: bool,
}

impl From<HostNetwork> for NetworkInfo {
    fn from(network: HostNetwork) -> Self {
        Self {
            chain_id: network.chain_id,
            nickname: network.nickname,
            is_mainnet: network.is_mainnet,
        }
    }
}

struct HostSnapshot {
    network: NetworkInfo,
    locale: String,
    tokens: Vec<SbtToken>,
    fetching: bool,
}

impl StateStore for HostSnapshot {
    fn network(&self) -> NetworkInfo {
        self.network.clone()
    }

    fn locale(&self) -> String {
        self.locale.clone()
    }

    fn sbt_tokens(&self) -> Vec<SbtToken> {
        self.tokens.clone()
    }

    fn fetching_dids(&self) -> bool {
        self.fetching
    }
}

struct CachedDids(Option<String>);

impl KeyValueStore for CachedDids {
    fn get_item(&self, key: String) -> Option<String> {
        if key == CACHED_DIDS_KEY {
            self.0.clone()
        } else {
            None
        }
    }
}

#[derive(Default)]
struct PendingActions {
    fetch_tokens: AtomicBool,
}

impl Dispatcher for PendingActions {
    fn fetch_sbt_tokens(&self) {
        self.fetch_tokens.store(true, Ordering::Relaxed);
    }

    // The import button is wired directly in the extension UI.
    fn show_import_did_modal(&self) {}
}

async fn await_words(value: JsValue) -> Result<Vec<String>, VerificationError> {
    let value = match value.dyn_into::<Promise>() {
        Ok(promise) => JsFuture::from(promise).await.map_err(|err| rejection(&err))?,
        Err(value) => value,
    };
    serde_wasm_bindgen::from_value(value)
        .map_err(|err| VerificationError::Unexpected(err.to_string()))
}

fn rejection(err: &JsValue) -> VerificationError {
    let reason = err.dyn_ref::<js_sys::Error>().map_or_else(
        || err.as_string().unwrap_or_else(|| "unknown error".to_string()),
        |err| String::from(err.message()),
    );
    VerificationError::Rejected { reason }
}

fn parse_format(tab_key: &str) -> Option<SecretFormat> {
    match tab_key {
        FORMAT_TEXT => Some(SecretFormat::Text),
        FORMAT_QR => Some(SecretFormat::Qr),
        _ => None,
    }
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(Into::into)
}

fn error_to_jsvalue(error: &DidTabError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

#[wasm_bindgen(typescript_custom_section)]
const TYPESCRIPT_DEFS: &str = r#"
export type TabContent =
    | { kind: "loading" }
    | { kind: "empty" }
    | {
          kind: "populated";
          tokens: { tokenId: string; name: string; description: string }[];
          dids: { id: string; document: string }[];
      };

export type RevealView =
    | { kind: "password_prompt"; error: string | undefined }
    | { kind: "revealed_secret"; format: "text" | "qr" };

export interface AnalyticsEvent {
    category: "keys" | "navigation";
    event: string;
    properties: Record<string, string>;
}

export class DidsTab {
    constructor(
        network: { chainId: string; nickname: string; isMainnet: boolean },
        locale: string
    );
    mount(cachedDids?: string | null): boolean;
    content(
        fetching: boolean,
        tokens: { tokenId: string; name: string; description: string }[]
    ): TabContent;
    submitCredential(
        password: string,
        verify: (password: string) => Promise<string[]>
    ): Promise<void>;
    completeConfirmationGesture(): boolean;
    cancelConfirmation(): boolean;
    selectFormat(tabKey: "text-seed" | "qr-srp"): boolean;
    isModalOpen(): boolean;
    revealView(): RevealView;
    copySecret(): string | undefined;
    secretQr(): { size: number; modules: boolean[] } | undefined;
    drainEvents(): AnalyticsEvent[];
    teardown(): void;
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format_uses_tab_keys() {
        assert_eq!(parse_format("text-seed"), Some(SecretFormat::Text));
        assert_eq!(parse_format("qr-srp"), Some(SecretFormat::Qr));
        assert_eq!(parse_format("qr"), None);
    }

    #[test]
    fn test_cached_dids_only_answers_its_key() {
        let cache = CachedDids(Some("[]".to_string()));
        assert_eq!(cache.get_item(CACHED_DIDS_KEY.to_string()).as_deref(), Some("[]"));
        assert!(cache.get_item("other".to_string()).is_none());
    }

    #[test]
    fn test_loader_requests_fetch_on_mainnet() {
        let snapshot = HostSnapshot {
            network: NetworkInfo {
                chain_id: "0x1".to_string(),
                nickname: "Mainnet".to_string(),
                is_mainnet: true,
            },
            locale: "en".to_string(),
            tokens: Vec::new(),
            fetching: false,
        };
        let cache = CachedDids(Some(r#"[{"id":"did:example:1","document":"{}"}]"#.to_string()));
        let actions = PendingActions::default();
        let records = DataLoader::new(&snapshot, &cache, &actions).mount();
        assert_eq!(records.len(), 1);
        assert!(actions.fetch_tokens.load(Ordering::Relaxed));
    }
}
