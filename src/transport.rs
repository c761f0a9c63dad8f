use crate::types::{BackupTarget, DeliveryOrder, LocalEventCommand, NodeAddress, RemoteEventCommand};
use std::future::Future;
use std::pin::Pin;

/// Completion handle for an asynchronous cross-site send. Resolves once the
/// remote site acknowledged the command, or with the failure reason.
pub type SendCompletion = Pin<Box<dyn Future<Output = Result<(), String>> + Send>>;

/// Group-communication transport owned by the embedding grid.
///
/// Membership views, coordinator designation, and delivery guarantees all live
/// behind this trait; the relay only queries and sends.
pub trait Transport: Send + Sync {
    /// Whether this node is the cluster coordinator for inter-site duties.
    fn is_coordinator(&self) -> bool;

    /// Whether this node speaks for the whole cluster in multi-site view changes.
    /// A distinct role from the coordinator.
    fn is_primary_relay_node(&self) -> bool;

    fn local_site_name(&self) -> String;

    fn coordinator(&self) -> NodeAddress;

    /// Reliable in-cluster delivery to one member.
    fn send_to(
        &self,
        dest: &NodeAddress,
        command: LocalEventCommand,
        order: DeliveryOrder,
    ) -> Result<(), String>;

    /// Asynchronous cross-site delivery to one remote site.
    fn backup_remotely(&self, target: &BackupTarget, command: RemoteEventCommand)
        -> SendCompletion;
}
