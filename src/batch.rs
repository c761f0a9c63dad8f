use crate::event::SiteEvent;
use crate::types::{BackupTarget, RemoteEventCommand};
use indexmap::IndexMap;

/// Accumulates outbound events per destination site during one processing pass
/// and flushes exactly one command per non-empty destination when dropped.
///
/// Flushing from `Drop` means an early return or panic while events are being
/// added still emits whatever was accumulated; a pass never loses its batch.
pub struct EventBatchSender<F>
where
    F: FnMut(BackupTarget, RemoteEventCommand),
{
    pending: IndexMap<String, Vec<SiteEvent>>,
    timeout_ms: u64,
    send: F,
}

impl<F> EventBatchSender<F>
where
    F: FnMut(BackupTarget, RemoteEventCommand),
{
    pub fn new(timeout_ms: u64, send: F) -> Self {
        EventBatchSender {
            pending: IndexMap::new(),
            timeout_ms,
            send,
        }
    }

    /// Appends the event to the site's pending list, creating it on first use.
    pub fn add_event_to_site(&mut self, site: impl Into<String>, event: SiteEvent) {
        self.pending.entry(site.into()).or_default().push(event);
    }
}

impl<F> Drop for EventBatchSender<F>
where
    F: FnMut(BackupTarget, RemoteEventCommand),
{
    fn drop(&mut self) {
        for (site, events) in self.pending.drain(..) {
            let target = BackupTarget::async_with_timeout(site, self.timeout_ms);
            tracing::debug!("Flushing {} event(s) to {:?}", events.len(), target);
            (self.send)(target, RemoteEventCommand { events });
        }
    }
}
