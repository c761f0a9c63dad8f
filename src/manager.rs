use crate::backoff::BackoffSender;
use crate::batch::EventBatchSender;
use crate::config::RelayConfig;
use crate::error::{RelayError, Result};
use crate::event::{SiteEvent, SiteEventKind};
use crate::mapper::CacheSiteMapper;
use crate::registry::StateTransferRegistry;
use crate::transport::Transport;
use crate::types::{BackupTarget, DeliveryOrder, LocalEventCommand, RemoteEventCommand};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Cluster notifications the manager subscribes to. Explicit enum dispatch in
/// place of the grid's reflective listener registration.
#[derive(Debug, Clone)]
pub enum ClusterNotification {
    /// The multi-site view changed; carries the newly joined site names.
    SiteViewChanged { joiners: Vec<String> },
    /// A local cache finished starting.
    CacheStarted { cache_name: String },
}

/// Orchestrates cross-site event propagation for one cluster member.
///
/// Owns no durable state beyond in-flight backoff senders. Every node runs
/// one, but the cluster-role guards make only the coordinator act on inbound
/// events and cache starts, and only the primary relay node act on site-view
/// changes.
pub struct SiteEventsManager {
    transport: Arc<dyn Transport>,
    mapper: Arc<dyn CacheSiteMapper>,
    registry: Arc<dyn StateTransferRegistry>,
    backup_timeout_ms: u64,
}

impl SiteEventsManager {
    pub fn new(
        config: &RelayConfig,
        transport: Arc<dyn Transport>,
        mapper: Arc<dyn CacheSiteMapper>,
        registry: Arc<dyn StateTransferRegistry>,
    ) -> Arc<Self> {
        Arc::new(SiteEventsManager {
            transport,
            mapper,
            registry,
            backup_timeout_ms: config.backup_timeout_ms,
        })
    }

    /// Consumes cluster notifications on a background task until the sender
    /// side is dropped.
    pub fn spawn_listener(
        self: &Arc<Self>,
        mut notifications: mpsc::Receiver<ClusterNotification>,
    ) -> JoinHandle<()> {
        let manager = Arc::clone(self);
        tokio::spawn(async move {
            while let Some(notification) = notifications.recv().await {
                match notification {
                    ClusterNotification::SiteViewChanged { joiners } => {
                        manager.on_site_view_changed(&joiners);
                    }
                    ClusterNotification::CacheStarted { cache_name } => {
                        manager.on_cache_started(&cache_name);
                    }
                }
            }
        })
    }

    /// Processes a batch of events on the coordinator.
    ///
    /// Events are handled sequentially in list order. A failure partway leaves
    /// earlier side effects in place; there are no transactional semantics
    /// across a batch. The per-site batch accumulated while iterating is
    /// flushed on scope exit regardless.
    pub async fn on_local_events(&self, events: Vec<SiteEvent>) -> Result<()> {
        tracing::debug!("Local events received: {:?}", events);
        let mut sender = self.new_batch_sender();
        for event in &events {
            match event.kind {
                SiteEventKind::SiteConnected => {
                    self.on_remote_site_connected(&event.origin_site, &mut sender);
                }
                SiteEventKind::StateRequest | SiteEventKind::InitialStateRequest => {
                    let Some(cache_name) = event.cache_name.as_deref() else {
                        tracing::debug!("Dropping state request without a cache name: {}", event);
                        continue;
                    };
                    self.on_remote_site_state_request(
                        &event.origin_site,
                        cache_name,
                        event.kind == SiteEventKind::InitialStateRequest,
                    );
                }
            }
        }
        Ok(())
    }

    /// Entry point for batches delivered from a remote site.
    ///
    /// The coordinator processes them directly; any other node forwards the
    /// whole batch once, per-sender ordered, and surfaces a forwarding failure
    /// to the caller without retrying.
    pub async fn on_remote_events(&self, events: Vec<SiteEvent>) -> Result<()> {
        tracing::debug!("Remote events received: {:?}", events);
        if self.transport.is_coordinator() {
            return self.on_local_events(events).await;
        }
        tracing::debug!("Forwarding events to coordinator: {:?}", events);
        let coordinator = self.transport.coordinator();
        self.transport
            .send_to(
                &coordinator,
                LocalEventCommand { events },
                DeliveryOrder::PerSender,
            )
            .map_err(RelayError::ForwardFailed)
    }

    /// Announces this site to every joining site. No-op unless this node is
    /// the primary relay node, so each cluster speaks once per view change.
    pub fn on_site_view_changed(&self, joiners: &[String]) {
        if !self.transport.is_primary_relay_node() {
            return;
        }
        tracing::debug!("Site view changed, joiners: {:?}", joiners);
        let local_site = self.transport.local_site_name();
        for site in joiners.iter().filter(|s| **s != local_site) {
            self.send_new_connection_event(site);
        }
    }

    /// Requests initial state for every remote backup of the started cache.
    /// No-op unless this node is the coordinator.
    pub fn on_cache_started(&self, cache_name: &str) {
        tracing::debug!(
            "Cache started (is coordinator? {}): {}",
            self.transport.is_coordinator(),
            cache_name
        );
        if !self.transport.is_coordinator() {
            return;
        }
        let local_site = self.transport.local_site_name();
        let mut sender = self.new_batch_sender();
        for remote in self.mapper.find_remote_caches_with_async_backup(cache_name) {
            sender.add_event_to_site(
                remote.site,
                SiteEvent::initial_state_request(local_site.clone(), remote.cache),
            );
        }
    }

    fn new_batch_sender(
        &self,
    ) -> EventBatchSender<impl FnMut(BackupTarget, RemoteEventCommand) + '_> {
        EventBatchSender::new(self.backup_timeout_ms, move |target, command| {
            self.send_with_backoff(target, command)
        })
    }

    fn on_remote_site_connected<F>(&self, site: &str, sender: &mut EventBatchSender<F>)
    where
        F: FnMut(BackupTarget, RemoteEventCommand),
    {
        let local_site = self.transport.local_site_name();
        for cache in self.mapper.remote_caches_from_site(site) {
            sender.add_event_to_site(site, SiteEvent::request_state(local_site.clone(), cache));
        }
    }

    fn on_remote_site_state_request(&self, remote_site: &str, cache_name: &str, initial: bool) {
        let Some(handle) = self.registry.state_transfer(cache_name) else {
            tracing::debug!(
                "State transfer request from site '{}' for cache '{}' dropped, cache does not exist",
                remote_site,
                cache_name
            );
            return;
        };
        if !handle.is_running() {
            tracing::debug!(
                "State transfer request from site '{}' for cache '{}' dropped, cache is not started",
                remote_site,
                cache_name
            );
            return;
        }
        handle.start_automatic_state_transfer_to(remote_site, initial);
    }

    fn send_new_connection_event(&self, remote_site: &str) {
        let command = RemoteEventCommand {
            events: vec![SiteEvent::connect(self.transport.local_site_name())],
        };
        let target = BackupTarget::async_with_timeout(remote_site, self.backup_timeout_ms);
        tracing::debug!("Sending connection event to {:?}: {:?}", target, command);
        self.send_with_backoff(target, command);
    }

    /// Hands the command to a fresh backoff sender, skipping self-delivery.
    fn send_with_backoff(&self, target: BackupTarget, command: RemoteEventCommand) {
        if self.transport.local_site_name() == target.site {
            return;
        }
        BackoffSender::new(Arc::clone(&self.transport), target, command).spawn();
    }
}
