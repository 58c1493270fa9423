//! Chooses which content branch the tab shows.

use serde::Serialize;

use crate::{
    analytics::{AnalyticsEvent, AnalyticsEventName, AnalyticsSink, EventCategory},
    collaborators::NetworkInfo,
    defaults::ORIGIN_REFERRER,
    records::{DidRecord, SbtToken},
};

/// The list area of the tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, uniffi::Enum)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TabContent {
    /// A token fetch is in flight; show a spinner.
    Loading,
    /// Nothing to list; show the "No DIDs" banner.
    Empty,
    /// Labeled lists of soulbound tokens and cached DIDs.
    Populated {
        /// Tokens from the shared store.
        tokens: Vec<SbtToken>,
        /// DIDs from local storage.
        dids: Vec<DidRecord>,
    },
}

impl TabContent {
    /// Labels rendered for this content, tokens first, in list order.
    ///
    /// Tokens render their name and description, DIDs their id and document.
    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        match self {
            Self::Populated { tokens, dids } => tokens
                .iter()
                .flat_map(|t| [t.name.as_str(), t.description.as_str()])
                .chain(dids.iter().flat_map(|d| [d.id.as_str(), d.document.as_str()]))
                .collect(),
            Self::Loading | Self::Empty => Vec::new(),
        }
    }
}

/// Picks the content branch from the store state and the cached DIDs.
#[must_use]
pub fn select_content(
    fetching: bool,
    tokens: Vec<SbtToken>,
    dids: Vec<DidRecord>,
) -> TabContent {
    if fetching {
        TabContent::Loading
    } else if tokens.is_empty() && dids.is_empty() {
        TabContent::Empty
    } else {
        TabContent::Populated { tokens, dids }
    }
}

/// Emits `EmptyDidsBannerDisplayed` once per entry into the empty state.
///
/// Re-selecting the same content is not an entry; the tracker re-arms as soon as a
/// different branch is observed.
#[derive(Debug, Default)]
pub struct EmptyStateTracker {
    showing_empty: bool,
}

impl EmptyStateTracker {
    /// Creates an armed tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the branch just selected. Returns whether the banner event fired.
    pub fn observe(
        &mut self,
        content: &TabContent,
        network: &NetworkInfo,
        locale: &str,
        sink: &dyn AnalyticsSink,
    ) -> bool {
        let is_empty = matches!(content, TabContent::Empty);
        let entered = is_empty && !self.showing_empty;
        self.showing_empty = is_empty;
        if entered {
            sink.track(
                AnalyticsEvent::new(
                    EventCategory::Navigation,
                    AnalyticsEventName::EmptyDidsBannerDisplayed,
                )
                .with_property("chain_id", network.chain_id.as_str())
                .with_property("locale", locale)
                .with_property("network", network.nickname.as_str())
                .with_property("referrer", ORIGIN_REFERRER),
            );
        }
        entered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::EventBuffer;

    fn token(id: &str) -> SbtToken {
        SbtToken {
            token_id: id.to_string(),
            name: format!("Token {id}"),
            description: format!("Description for Token {id}"),
        }
    }

    fn mainnet() -> NetworkInfo {
        NetworkInfo {
            chain_id: "0x1".to_string(),
            nickname: "Mainnet".to_string(),
            is_mainnet: true,
        }
    }

    #[test]
    fn test_loading_wins_over_data() {
        assert_eq!(select_content(true, vec![token("1")], vec![]), TabContent::Loading);
    }

    #[test]
    fn test_either_list_populates() {
        let content = select_content(false, vec![token("1")], vec![]);
        assert_eq!(content.labels(), vec!["Token 1", "Description for Token 1"]);

        let did = DidRecord {
            id: "did:example:1".to_string(),
            document: "{}".to_string(),
        };
        let content = select_content(false, vec![], vec![did]);
        assert!(matches!(content, TabContent::Populated { .. }));
    }

    #[test]
    fn test_populated_wire_shape() {
        let did = DidRecord {
            id: "did:example:1".to_string(),
            document: "{}".to_string(),
        };
        let content = select_content(false, vec![token("1")], vec![did]);
        let json = serde_json::to_value(&content).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "kind": "populated",
                "tokens": [{
                    "tokenId": "1",
                    "name": "Token 1",
                    "description": "Description for Token 1"
                }],
                "dids": [{ "id": "did:example:1", "document": "{}" }]
            })
        );
        assert_eq!(
            serde_json::to_value(TabContent::Empty).unwrap(),
            serde_json::json!({ "kind": "empty" })
        );
    }

    #[test]
    fn test_empty_banner_fires_once_per_entry() {
        let sink = EventBuffer::new();
        let mut tracker = EmptyStateTracker::new();
        let network = mainnet();

        assert!(!tracker.observe(&TabContent::Loading, &network, "en", &sink));
        assert!(tracker.observe(&TabContent::Empty, &network, "en", &sink));
        assert!(!tracker.observe(&TabContent::Empty, &network, "en", &sink));
        assert_eq!(sink.len(), 1);

        // leaving and re-entering the empty state fires again
        assert!(!tracker.observe(&TabContent::Loading, &network, "en", &sink));
        assert!(tracker.observe(&TabContent::Empty, &network, "en", &sink));

        let events = sink.drain();
        assert_eq!(events.len(), 2);
        let event = &events[0];
        assert_eq!(event.category, EventCategory::Navigation);
        assert_eq!(event.property("chain_id"), Some("0x1"));
        assert_eq!(event.property("network"), Some("Mainnet"));
        assert_eq!(event.property("locale"), Some("en"));
        assert_eq!(event.property("referrer"), Some("metamask"));
    }

    #[test]
    fn test_populated_never_fires_banner() {
        let sink = EventBuffer::new();
        let mut tracker = EmptyStateTracker::new();
        let content = select_content(false, vec![token("1")], vec![]);
        assert!(!tracker.observe(&content, &mainnet(), "en", &sink));
        assert!(sink.is_empty());
    }
}
