use crate::event::SiteEvent;
use serde::{Deserialize, Serialize};

/// Batch of locally-generated events, routed node-to-coordinator within one cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalEventCommand {
    pub events: Vec<SiteEvent>,
}

/// Batch of events shipped site-to-site.
///
/// Idempotent at the receiving end: a duplicate `StateRequest` re-requests a
/// transfer that is itself best-effort, and a duplicate `SiteConnected` causes
/// at most an extra state-request cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEventCommand {
    pub events: Vec<SiteEvent>,
}

/// Routable descriptor for one remote site's backup endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupTarget {
    pub site: String,
    pub sync: bool,
    pub timeout_ms: u64,
}

impl BackupTarget {
    /// Asynchronous target with the given response timeout. Event delivery
    /// never uses synchronous backups.
    pub fn async_with_timeout(site: impl Into<String>, timeout_ms: u64) -> Self {
        BackupTarget {
            site: site.into(),
            sync: false,
            timeout_ms,
        }
    }
}

/// Opaque cluster-member address, assigned by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeAddress(pub String);

/// Delivery guarantee requested from the in-cluster transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOrder {
    /// Messages from one sender arrive in the order sent; no ordering across senders.
    PerSender,
    /// No ordering guarantee.
    None,
}

/// One (site, cache) pair on the remote end of an async backup relationship.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteCacheRef {
    pub site: String,
    pub cache: String,
}
