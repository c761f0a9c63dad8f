use serde::{Deserialize, Serialize};
use std::fmt;

/// What a cross-site event announces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SiteEventKind {
    /// A remote site has joined the cross-site view.
    SiteConnected,
    /// A site asks the receiver to push a cache's state to it.
    StateRequest,
    /// Like `StateRequest`, but triggered by a cache starting for the first time.
    InitialStateRequest,
}

/// A single cross-site occurrence. Immutable once constructed; compared by value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteEvent {
    pub kind: SiteEventKind,
    pub origin_site: String,
    /// Absent for [`SiteEventKind::SiteConnected`].
    pub cache_name: Option<String>,
}

impl SiteEvent {
    pub fn connect(origin_site: impl Into<String>) -> Self {
        SiteEvent {
            kind: SiteEventKind::SiteConnected,
            origin_site: origin_site.into(),
            cache_name: None,
        }
    }

    pub fn request_state(origin_site: impl Into<String>, cache_name: impl Into<String>) -> Self {
        SiteEvent {
            kind: SiteEventKind::StateRequest,
            origin_site: origin_site.into(),
            cache_name: Some(cache_name.into()),
        }
    }

    pub fn initial_state_request(
        origin_site: impl Into<String>,
        cache_name: impl Into<String>,
    ) -> Self {
        SiteEvent {
            kind: SiteEventKind::InitialStateRequest,
            origin_site: origin_site.into(),
            cache_name: Some(cache_name.into()),
        }
    }
}

impl fmt::Display for SiteEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SiteEventKind::SiteConnected => "site-connected",
            SiteEventKind::StateRequest => "state-request",
            SiteEventKind::InitialStateRequest => "initial-state-request",
        };
        f.write_str(name)
    }
}

impl fmt::Display for SiteEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cache_name {
            Some(cache) => write!(f, "{} from {} for cache {}", self.kind, self.origin_site, cache),
            None => write!(f, "{} from {}", self.kind, self.origin_site),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_event_has_no_cache_name() {
        let event = SiteEvent::connect("eu");

        assert_eq!(event.kind, SiteEventKind::SiteConnected);
        assert_eq!(event.origin_site, "eu");
        assert_eq!(event.cache_name, None);
    }

    #[test]
    fn test_state_request_constructors() {
        let request = SiteEvent::request_state("eu", "orders");
        assert_eq!(request.kind, SiteEventKind::StateRequest);
        assert_eq!(request.origin_site, "eu");
        assert_eq!(request.cache_name.as_deref(), Some("orders"));

        let initial = SiteEvent::initial_state_request("us", "orders-us");
        assert_eq!(initial.kind, SiteEventKind::InitialStateRequest);
        assert_eq!(initial.cache_name.as_deref(), Some("orders-us"));
    }

    #[test]
    fn test_value_equality() {
        assert_eq!(
            SiteEvent::request_state("eu", "orders"),
            SiteEvent::request_state("eu", "orders")
        );
        assert_ne!(
            SiteEvent::request_state("eu", "orders"),
            SiteEvent::initial_state_request("eu", "orders")
        );
    }

    #[test]
    fn test_display_names_kind_origin_and_cache() {
        assert_eq!(
            SiteEvent::connect("eu").to_string(),
            "site-connected from eu"
        );
        assert_eq!(
            SiteEvent::request_state("eu", "orders").to_string(),
            "state-request from eu for cache orders"
        );
        assert_eq!(
            SiteEvent::initial_state_request("us", "orders-us").to_string(),
            "initial-state-request from us for cache orders-us"
        );
    }

    #[test]
    fn test_serde_round_trip() {
        let event = SiteEvent::initial_state_request("eu", "orders");
        let json = serde_json::to_string(&event).unwrap();
        let back: SiteEvent = serde_json::from_str(&json).unwrap();

        assert_eq!(event, back);
    }
}
