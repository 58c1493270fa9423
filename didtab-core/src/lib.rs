#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
//! Headless core of the wallet's DIDs tab.
//!
//! Lists soulbound tokens and locally imported DIDs, and gates the secret recovery
//! phrase behind a password check plus a hold-to-reveal confirmation. All I/O goes
//! through host-implemented traits in [`collaborators`] and [`analytics`].

pub mod analytics;
pub use analytics::{AnalyticsEvent, AnalyticsEventName, AnalyticsSink, EventBuffer};

pub mod collaborators;
pub use collaborators::{
    CredentialVerifier, Dispatcher, KeyValueStore, NetworkInfo, StateStore,
};

pub mod defaults;

mod error;
pub use error::*;

pub mod logger;

pub mod records;
pub use records::{parse_cached_records, DidRecord, SbtToken};

pub mod reveal;
pub use reveal::{RevealController, RevealScreen, RevealView, SecretFormat};

pub mod secret;
pub use secret::SeedPhrase;

mod tab;
pub use tab::DidsTab;

pub mod view;
pub use view::{select_content, TabContent};

mod qr;
pub use qr::QrMatrix;

uniffi::setup_scaffolding!("didtab_core");
