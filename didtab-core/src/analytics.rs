//! Analytics events raised by the tab and the sink they are handed to.
//!
//! Emission is fire-and-forget: the core never waits for a sink, never retries and
//! ignores whatever the sink does with an event.

use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError},
};

use serde::Serialize;
use strum::Display;

use crate::defaults::SRP_KEY_TYPE;

/// Event category, mirrors the host's analytics taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, uniffi::Enum)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    /// Key material export (recovery phrase reveal).
    Keys,
    /// Navigation and banners.
    Navigation,
}

/// Every event the tab can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, uniffi::Enum)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AnalyticsEventName {
    /// The password was accepted and the phrase obtained.
    KeyExportRevealed,
    /// The password was rejected. Carries `reason`.
    KeyExportFailed,
    /// The phrase was copied. Carries `copy_method`.
    KeyExportCopied,
    /// The phrase was copied to the clipboard. Carries `copy_method`.
    SrpCopiedToClipboard,
    /// The phrase is shown as text.
    SrpViewSrpText,
    /// The phrase is shown as a QR code.
    #[strum(serialize = "srp_view_srp_qr")]
    #[serde(rename = "srp_view_srp_qr")]
    SrpViewSrpQr,
    /// The hold-to-reveal modal was dismissed without completing the gesture.
    SrpHoldToRevealCloseClicked,
    /// The "No DIDs" banner was displayed.
    EmptyDidsBannerDisplayed,
}

/// A single analytics event with a flat property map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, uniffi::Record)]
pub struct AnalyticsEvent {
    /// Event category.
    pub category: EventCategory,
    /// Event name.
    #[serde(rename = "event")]
    pub name: AnalyticsEventName,
    /// Flat string properties.
    pub properties: HashMap<String, String>,
}

impl AnalyticsEvent {
    /// Creates an event with no properties.
    #[must_use]
    pub fn new(category: EventCategory, name: AnalyticsEventName) -> Self {
        Self {
            category,
            name,
            properties: HashMap::new(),
        }
    }

    /// Creates a `Keys` event tagged with the recovery phrase key type.
    #[must_use]
    pub fn keys(name: AnalyticsEventName) -> Self {
        Self::new(EventCategory::Keys, name).with_property("key_type", SRP_KEY_TYPE)
    }

    /// Adds (or replaces) a property.
    #[must_use]
    pub fn with_property(mut self, key: &str, value: impl Into<String>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    /// Reads a property.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}

/// Receives analytics events from the tab.
///
/// Implementations must not block; anything slow belongs on the host's own queue.
#[uniffi::export(with_foreign)]
pub trait AnalyticsSink: Send + Sync {
    /// Records one event.
    fn track(&self, event: AnalyticsEvent);
}

/// Sink that queues events until the host drains them.
///
/// Used by hosts that poll rather than receive callbacks, such as the WebAssembly build.
#[derive(Debug, Default, uniffi::Object)]
pub struct EventBuffer {
    events: Mutex<Vec<AnalyticsEvent>>,
}

#[uniffi::export]
impl EventBuffer {
    /// Creates an empty buffer.
    #[uniffi::constructor]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns every queued event, oldest first.
    pub fn drain(&self) -> Vec<AnalyticsEvent> {
        std::mem::take(
            &mut *self.events.lock().unwrap_or_else(PoisonError::into_inner),
        )
    }

    /// Number of queued events.
    pub fn len(&self) -> u64 {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len() as u64
    }

    /// Whether no events are queued.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AnalyticsSink for EventBuffer {
    fn track(&self, event: AnalyticsEvent) {
        log::debug!("analytics: {} / {}", event.category, event.name);
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
