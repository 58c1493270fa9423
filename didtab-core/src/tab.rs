//! The DIDs tab: data loading, content selection and the phrase reveal, wired to the host.

use std::sync::{Arc, Mutex, PoisonError};

use crate::{
    analytics::AnalyticsSink,
    collaborators::{CredentialVerifier, Dispatcher, KeyValueStore, StateStore},
    error::DidTabResult,
    qr::QrMatrix,
    records::{DataLoader, DidRecord},
    reveal::{RevealController, RevealScreen, RevealView, SecretFormat},
    view::{select_content, EmptyStateTracker, TabContent},
};

/// One mounted instance of the DIDs tab.
///
/// Create it when the tab is shown, call [`DidsTab::mount`] once, and
/// [`DidsTab::teardown`] when it goes away. Hold-to-reveal modal callbacks map to
/// [`DidsTab::complete_confirmation_gesture`] (`onLongPressed`) and
/// [`DidsTab::cancel_confirmation`] (`onClose`).
#[derive(uniffi::Object)]
pub struct DidsTab {
    verifier: Arc<dyn CredentialVerifier>,
    storage: Arc<dyn KeyValueStore>,
    store: Arc<dyn StateStore>,
    dispatcher: Arc<dyn Dispatcher>,
    analytics: Arc<dyn AnalyticsSink>,
    reveal: RevealController,
    records: Mutex<Vec<DidRecord>>,
    empty_state: Mutex<EmptyStateTracker>,
}

#[uniffi::export]
impl DidsTab {
    /// Creates the tab over the host's collaborators.
    #[uniffi::constructor]
    #[must_use]
    pub fn new(
        verifier: Arc<dyn CredentialVerifier>,
        storage: Arc<dyn KeyValueStore>,
        store: Arc<dyn StateStore>,
        dispatcher: Arc<dyn Dispatcher>,
        analytics: Arc<dyn AnalyticsSink>,
    ) -> Self {
        Self {
            verifier,
            storage,
            store,
            dispatcher,
            reveal: RevealController::new(Arc::clone(&analytics)),
            analytics,
            records: Mutex::new(Vec::new()),
            empty_state: Mutex::new(EmptyStateTracker::new()),
        }
    }

    /// Requests tokens (main network only) and reads the cached DIDs.
    pub fn mount(&self) {
        let loader = DataLoader::new(
            self.store.as_ref(),
            self.storage.as_ref(),
            self.dispatcher.as_ref(),
        );
        let records = loader.mount();
        *self.records.lock().unwrap_or_else(PoisonError::into_inner) = records;
    }

    /// The list area for the current store state.
    ///
    /// Call on every store change; the empty banner event is reported once per entry
    /// into the empty state regardless of how often this is called.
    pub fn content(&self) -> TabContent {
        let dids = self
            .records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let content =
            select_content(self.store.fetching_dids(), self.store.sbt_tokens(), dids);
        let network = self.store.network();
        let locale = self.store.locale();
        self.empty_state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .observe(&content, &network, &locale, self.analytics.as_ref());
        content
    }

    /// Cached DIDs read at mount.
    #[must_use]
    pub fn local_dids(&self) -> Vec<DidRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Opens the host's import modal.
    pub fn import_did(&self) {
        self.dispatcher.show_import_did_modal();
    }

    /// Submits the wallet password.
    ///
    /// Hosts should disable the form while this is outstanding; overlapping calls are
    /// allowed and the last one to resolve decides the state.
    ///
    /// # Errors
    ///
    /// See [`RevealController::submit_credential`].
    pub async fn submit_credential(&self, candidate: String) -> DidTabResult<()> {
        self.reveal
            .submit_credential(self.verifier.as_ref(), candidate)
            .await
    }

    /// `onLongPressed` of the hold-to-reveal modal.
    pub fn complete_confirmation_gesture(&self) -> bool {
        self.reveal.complete_confirmation_gesture()
    }

    /// `onClose` of the hold-to-reveal modal.
    pub fn cancel_confirmation(&self) -> bool {
        self.reveal.cancel_confirmation()
    }

    /// Tab click in the revealed view.
    pub fn select_format(&self, format: SecretFormat) -> bool {
        self.reveal.select_format(format)
    }

    /// The phrase for the clipboard, when revealed.
    pub fn copy_secret(&self) -> Option<String> {
        self.reveal.copy_secret().map(|phrase| phrase.as_str().to_owned())
    }

    /// QR code of the phrase, when revealed.
    #[must_use]
    pub fn secret_qr(&self) -> Option<QrMatrix> {
        self.reveal.secret_qr()
    }

    /// What the reveal area renders.
    #[must_use]
    pub fn reveal_view(&self) -> RevealView {
        self.reveal.view()
    }

    /// Current reveal screen.
    #[must_use]
    pub fn reveal_screen(&self) -> RevealScreen {
        self.reveal.screen()
    }

    /// Whether the hold-to-reveal modal is open.
    #[must_use]
    pub fn is_modal_open(&self) -> bool {
        self.reveal.is_modal_open()
    }

    /// Drops the phrase; outstanding submissions resolve into no-ops.
    pub fn teardown(&self) {
        self.reveal.teardown();
    }
}

impl DidsTab {
    /// The reveal state machine.
    #[must_use]
    pub const fn reveal(&self) -> &RevealController {
        &self.reveal
    }
}
