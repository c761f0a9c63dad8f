//! # Griddle
//!
//! Cross-site event relay for clustered in-memory data grids: the layer by
//! which independently-clustered sites notify each other about topology
//! changes and coordinate on-demand cache-state transfer.
//!
//! One [`SiteEventsManager`] runs on every cluster member. Cluster-role guards
//! keep the protocol single-writer: only the coordinator talks to remote
//! sites, and only the primary relay node announces the cluster on multi-site
//! view changes. Everyone else forwards to the coordinator over the
//! per-sender-ordered in-cluster channel.
//!
//! Cross-site delivery is best-effort: each outbound command gets a
//! [`backoff::BackoffSender`] that retries on a fixed delay schedule and then
//! gives up with a debug log. Nothing in this crate ever fails a cache start
//! or a membership notification.
//!
//! The group-communication transport, the backup-relationship configuration,
//! and per-cache state transfer are external collaborators behind the
//! [`Transport`], [`CacheSiteMapper`], and [`StateTransferRegistry`] traits.
//!
//! ```rust,no_run
//! use griddle::config::RelayConfig;
//! use griddle::manager::{ClusterNotification, SiteEventsManager};
//! use griddle::registry::InProcessRegistry;
//! use std::sync::Arc;
//! use tokio::sync::mpsc;
//!
//! # async fn wire(
//! #     transport: Arc<dyn griddle::transport::Transport>,
//! #     mapper: Arc<dyn griddle::mapper::CacheSiteMapper>,
//! # ) {
//! let config = RelayConfig::load_or_default(std::path::Path::new("./data"));
//! let registry = Arc::new(InProcessRegistry::new());
//! let manager = SiteEventsManager::new(&config, transport, mapper, registry);
//!
//! let (notifications, rx) = mpsc::channel(64);
//! manager.spawn_listener(rx);
//!
//! // The embedding grid feeds membership and lifecycle notifications:
//! notifications
//!     .send(ClusterNotification::CacheStarted { cache_name: "orders".into() })
//!     .await
//!     .unwrap();
//! # }
//! ```

pub mod backoff;
pub mod batch;
pub mod config;
pub mod error;
pub mod event;
pub mod manager;
pub mod mapper;
pub mod registry;
pub mod transport;
pub mod types;

pub use error::{RelayError, Result};
pub use event::{SiteEvent, SiteEventKind};
pub use manager::{ClusterNotification, SiteEventsManager};
pub use mapper::CacheSiteMapper;
pub use registry::{StateTransferHandle, StateTransferRegistry};
pub use transport::Transport;
