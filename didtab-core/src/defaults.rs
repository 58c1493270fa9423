//! Fixed values shared with the extension host.

/// Local storage key holding the JSON list of imported DIDs.
pub const CACHED_DIDS_KEY: &str = "dids";

/// `referrer` property attached to navigation events raised by the tab.
pub const ORIGIN_REFERRER: &str = "metamask";

/// `key_type` property attached to every key export event.
pub const SRP_KEY_TYPE: &str = "srp";

/// `copy_method` property reported when the phrase is copied.
pub const CLIPBOARD_COPY_METHOD: &str = "clipboard";
