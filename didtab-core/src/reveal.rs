//! Password-gated reveal of the secret recovery phrase.
//!
//! The phrase is only shown after two independent steps: the keyring accepted the
//! password (phrase obtained), and the user completed the hold-to-reveal gesture.
//!
//! ```text
//!                    success                  gesture
//! PasswordPrompt ───────────────▶ Awaiting ───────────────▶ RevealedSecret
//!       ▲  │ failure                │ cancel
//!       │  └─────────┐              │
//!       └────────────┴──────────────┘
//! ```
//!
//! A new submission always starts from `PasswordPrompt` and drops any phrase held so far.
//! Outcomes are applied in the order they resolve, so with overlapping submissions the
//! last one to resolve wins; each outcome replaces the whole state.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use zeroize::Zeroizing;

use crate::{
    analytics::{AnalyticsEvent, AnalyticsEventName, AnalyticsSink},
    collaborators::CredentialVerifier,
    defaults::CLIPBOARD_COPY_METHOD,
    error::{DidTabError, DidTabResult, VerificationError},
    qr::{self, QrMatrix},
    secret::SeedPhrase,
};

/// Screen of the reveal flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, uniffi::Enum)]
#[serde(rename_all = "snake_case")]
pub enum RevealScreen {
    /// Password entry, possibly with an error from the last attempt.
    PasswordPrompt,
    /// Phrase obtained, hold-to-reveal modal open.
    AwaitingConfirmation,
    /// Phrase on screen.
    RevealedSecret,
}

/// How the revealed phrase is presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, uniffi::Enum)]
#[serde(rename_all = "snake_case")]
pub enum SecretFormat {
    /// Plain words. Active when the phrase is first shown.
    #[default]
    Text,
    /// Scannable QR code.
    Qr,
}

/// What the reveal area renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, uniffi::Enum)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RevealView {
    /// The password form.
    PasswordPrompt {
        /// Error from the last failed attempt.
        error: Option<String>,
    },
    /// The phrase, in the selected format.
    RevealedSecret {
        /// Active presentation.
        format: SecretFormat,
    },
}

/// Identifies one credential submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubmissionId(pub u64);

enum Phase {
    PasswordPrompt { error: Option<String> },
    AwaitingConfirmation { secret: SeedPhrase },
    RevealedSecret { secret: SeedPhrase, format: SecretFormat },
}

impl Phase {
    const fn screen(&self) -> RevealScreen {
        match self {
            Self::PasswordPrompt { .. } => RevealScreen::PasswordPrompt,
            Self::AwaitingConfirmation { .. } => RevealScreen::AwaitingConfirmation,
            Self::RevealedSecret { .. } => RevealScreen::RevealedSecret,
        }
    }
}

fn can_show(phase: &Phase) -> bool {
    let secret_present = !matches!(phase, Phase::PasswordPrompt { .. });
    let gesture_complete = matches!(phase, Phase::RevealedSecret { .. });
    secret_present && gesture_complete
}

struct RevealState {
    phase: Phase,
    last_submission: u64,
    torn_down: bool,
}

/// State machine behind the recovery phrase reveal.
///
/// All methods take `&self`; state sits behind a mutex that is never held while
/// waiting on the verifier or calling the analytics sink.
pub struct RevealController {
    analytics: Arc<dyn AnalyticsSink>,
    state: Mutex<RevealState>,
}

impl RevealController {
    /// Creates a controller in the password prompt.
    #[must_use]
    pub fn new(analytics: Arc<dyn AnalyticsSink>) -> Self {
        Self {
            analytics,
            state: Mutex::new(RevealState {
                phase: Phase::PasswordPrompt { error: None },
                last_submission: 0,
                torn_down: false,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RevealState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Submits a password: clears the previous outcome, asks `verifier`, applies the result.
    ///
    /// # Errors
    ///
    /// - [`DidTabError::CredentialVerificationFailed`] when the verifier rejects the
    ///   password; the reason is also stored for the prompt.
    /// - [`DidTabError::TornDown`] when the tab was torn down before or during the call.
    pub async fn submit_credential(
        &self,
        verifier: &dyn CredentialVerifier,
        candidate: String,
    ) -> DidTabResult<()> {
        let id = self.begin_submission()?;
        let outcome = verifier.verify(candidate).await;
        self.resolve_submission(id, outcome)
    }

    /// Starts a submission. Drops any held phrase and clears the error before the
    /// verifier is called, so nothing stale can be rendered while it is outstanding.
    ///
    /// # Errors
    ///
    /// Returns [`DidTabError::TornDown`] after [`Self::teardown`].
    pub fn begin_submission(&self) -> DidTabResult<SubmissionId> {
        let mut state = self.lock();
        if state.torn_down {
            return Err(DidTabError::TornDown);
        }
        state.phase = Phase::PasswordPrompt { error: None };
        state.last_submission += 1;
        log::info!("credential submission #{} started", state.last_submission);
        Ok(SubmissionId(state.last_submission))
    }

    /// Applies the verifier's outcome for submission `id`.
    ///
    /// On success the phrase is held and the hold-to-reveal modal opens. On failure the
    /// prompt shows the reason. Either way the outcome replaces the current state.
    ///
    /// # Errors
    ///
    /// - [`DidTabError::CredentialVerificationFailed`] for a failed outcome.
    /// - [`DidTabError::TornDown`] after [`Self::teardown`]; the outcome is discarded.
    pub fn resolve_submission(
        &self,
        id: SubmissionId,
        outcome: Result<Vec<String>, VerificationError>,
    ) -> DidTabResult<()> {
        let result = {
            let mut state = self.lock();
            if state.torn_down {
                log::debug!("discarding outcome of submission #{} after teardown", id.0);
                return Err(DidTabError::TornDown);
            }
            if id.0 != state.last_submission {
                log::debug!(
                    "submission #{} resolved after #{} was started",
                    id.0,
                    state.last_submission
                );
            }
            match outcome {
                Ok(words) => {
                    state.phase = Phase::AwaitingConfirmation {
                        secret: SeedPhrase::from_words(words),
                    };
                    Ok(())
                }
                Err(err) => {
                    state.phase = Phase::PasswordPrompt {
                        error: Some(err.reason()),
                    };
                    Err(err)
                }
            }
        };

        match result {
            Ok(()) => {
                log::info!("submission #{} verified, awaiting confirmation", id.0);
                self.emit(AnalyticsEvent::keys(AnalyticsEventName::KeyExportRevealed));
                Ok(())
            }
            Err(err) => {
                log::info!("submission #{} rejected", id.0);
                self.emit(
                    AnalyticsEvent::keys(AnalyticsEventName::KeyExportFailed)
                        .with_property("reason", err.reason()),
                );
                Err(err.into())
            }
        }
    }

    /// The hold-to-reveal gesture completed: closes the modal and shows the phrase as text.
    ///
    /// Returns `false`, changing nothing, unless the modal is open.
    pub fn complete_confirmation_gesture(&self) -> bool {
        {
            let mut state = self.lock();
            if state.torn_down {
                return false;
            }
            let phase = std::mem::replace(
                &mut state.phase,
                Phase::PasswordPrompt { error: None },
            );
            match phase {
                Phase::AwaitingConfirmation { secret } => {
                    state.phase = Phase::RevealedSecret {
                        secret,
                        format: SecretFormat::default(),
                    };
                }
                other => {
                    state.phase = other;
                    log::warn!("confirmation gesture outside of the confirmation modal");
                    return false;
                }
            }
        }
        // Entering the revealed view shows the text tab first.
        self.emit(AnalyticsEvent::keys(AnalyticsEventName::SrpViewSrpText));
        true
    }

    /// The hold-to-reveal modal was dismissed. Drops the phrase and returns to the prompt.
    ///
    /// Returns `false`, changing nothing, unless the modal is open.
    pub fn cancel_confirmation(&self) -> bool {
        {
            let mut state = self.lock();
            if !matches!(state.phase, Phase::AwaitingConfirmation { .. }) {
                return false;
            }
            state.phase = Phase::PasswordPrompt { error: None };
        }
        self.emit(AnalyticsEvent::keys(
            AnalyticsEventName::SrpHoldToRevealCloseClicked,
        ));
        true
    }

    /// Switches the revealed phrase between text and QR. Every selection is reported.
    ///
    /// Returns `false` when the phrase is not on screen.
    pub fn select_format(&self, format: SecretFormat) -> bool {
        {
            let mut state = self.lock();
            let Phase::RevealedSecret { format: active, .. } = &mut state.phase else {
                return false;
            };
            *active = format;
        }
        let name = match format {
            SecretFormat::Text => AnalyticsEventName::SrpViewSrpText,
            SecretFormat::Qr => AnalyticsEventName::SrpViewSrpQr,
        };
        self.emit(AnalyticsEvent::keys(name));
        true
    }

    /// Returns the phrase for the host clipboard when it is on screen.
    pub fn copy_secret(&self) -> Option<Zeroizing<String>> {
        let phrase = match &self.lock().phase {
            Phase::RevealedSecret { secret, .. } => secret.expose_phrase(),
            _ => return None,
        };
        for name in [
            AnalyticsEventName::KeyExportCopied,
            AnalyticsEventName::SrpCopiedToClipboard,
        ] {
            self.emit(
                AnalyticsEvent::keys(name).with_property("copy_method", CLIPBOARD_COPY_METHOD),
            );
        }
        Some(phrase)
    }

    /// QR code of the phrase when it is on screen.
    #[must_use]
    pub fn secret_qr(&self) -> Option<QrMatrix> {
        match &self.lock().phase {
            Phase::RevealedSecret { secret, .. } => qr::encode(&secret.expose_phrase()),
            _ => None,
        }
    }

    /// Drops the phrase and stops accepting transitions. Outstanding submissions resolve
    /// into no-ops.
    pub fn teardown(&self) {
        let mut state = self.lock();
        state.torn_down = true;
        state.phase = Phase::PasswordPrompt { error: None };
        log::debug!("reveal controller torn down");
    }

    /// Current screen.
    #[must_use]
    pub fn screen(&self) -> RevealScreen {
        self.lock().phase.screen()
    }

    /// Whether the hold-to-reveal modal is open.
    #[must_use]
    pub fn is_modal_open(&self) -> bool {
        self.screen() == RevealScreen::AwaitingConfirmation
    }

    /// Error shown under the password field.
    #[must_use]
    pub fn error(&self) -> Option<String> {
        match &self.lock().phase {
            Phase::PasswordPrompt { error } => error.clone(),
            _ => None,
        }
    }

    /// Whether a phrase is held in memory.
    #[must_use]
    pub fn secret_present(&self) -> bool {
        !matches!(self.lock().phase, Phase::PasswordPrompt { .. })
    }

    /// Whether the hold-to-reveal gesture has completed for the held phrase.
    #[must_use]
    pub fn confirmation_gesture_complete(&self) -> bool {
        self.screen() == RevealScreen::RevealedSecret
    }

    /// The only gate for rendering the phrase.
    #[must_use]
    pub fn can_show_secret(&self) -> bool {
        can_show(&self.lock().phase)
    }

    /// What the reveal area renders.
    #[must_use]
    pub fn view(&self) -> RevealView {
        let state = self.lock();
        match &state.phase {
            Phase::RevealedSecret { format, .. } if can_show(&state.phase) => {
                RevealView::RevealedSecret { format: *format }
            }
            Phase::PasswordPrompt { error } => RevealView::PasswordPrompt {
                error: error.clone(),
            },
            _ => RevealView::PasswordPrompt { error: None },
        }
    }

    fn emit(&self, event: AnalyticsEvent) {
        self.analytics.track(event);
    }
}
