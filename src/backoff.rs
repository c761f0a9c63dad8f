use crate::transport::Transport;
use crate::types::{BackupTarget, RemoteEventCommand};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Delays between successive delivery attempts. A literal table, not a
/// computed formula, so retry timing stays observably identical.
pub(crate) const BACKOFF_DELAYS_MS: [u64; 5] = [200, 500, 1000, 2000, 5000];

/// Retries one cross-site command against one destination on the fixed delay
/// schedule, then gives up.
///
/// Delivery is best-effort: exhausting the schedule is logged at debug level
/// and surfaced to no caller. There is no cancellation; a sender stops only by
/// succeeding or running out of schedule.
pub struct BackoffSender {
    transport: Arc<dyn Transport>,
    target: BackupTarget,
    command: RemoteEventCommand,
    /// Only one retry is ever in flight per sender, but the increment is
    /// serialized anyway to guard against re-entrant scheduling.
    step: Mutex<usize>,
}

impl BackoffSender {
    pub fn new(
        transport: Arc<dyn Transport>,
        target: BackupTarget,
        command: RemoteEventCommand,
    ) -> Self {
        BackoffSender {
            transport,
            target,
            command,
            step: Mutex::new(0),
        }
    }

    /// Spawns the attempt chain onto the runtime and returns immediately.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(self) {
        loop {
            tracing::debug!("Sending {:?} to {:?}", self.command, self.target);
            let completion = self
                .transport
                .backup_remotely(&self.target, self.command.clone());
            match completion.await {
                Ok(()) => return,
                Err(reason) => {
                    let step = self.next_step();
                    if step >= BACKOFF_DELAYS_MS.len() {
                        tracing::debug!(
                            "Failed to send {:?} to {:?}, giving up: {}",
                            self.command,
                            self.target,
                            reason
                        );
                        return;
                    }
                    let delay = BACKOFF_DELAYS_MS[step];
                    tracing::debug!(
                        "Sending {:?} to {:?} again in {} ms: {}",
                        self.command,
                        self.target,
                        delay,
                        reason
                    );
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                }
            }
        }
    }

    fn next_step(&self) -> usize {
        let mut step = self
            .step
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let current = *step;
        *step += 1;
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::SiteEvent;
    use crate::transport::SendCompletion;
    use crate::types::{DeliveryOrder, LocalEventCommand, NodeAddress};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::Instant;

    /// Fails the first `failures` backup attempts, then succeeds.
    struct FlakyTransport {
        failures: usize,
        attempts: AtomicUsize,
    }

    impl FlakyTransport {
        fn failing(failures: usize) -> Arc<Self> {
            Arc::new(FlakyTransport {
                failures,
                attempts: AtomicUsize::new(0),
            })
        }
    }

    impl Transport for FlakyTransport {
        fn is_coordinator(&self) -> bool {
            true
        }

        fn is_primary_relay_node(&self) -> bool {
            true
        }

        fn local_site_name(&self) -> String {
            "local".to_string()
        }

        fn coordinator(&self) -> NodeAddress {
            NodeAddress("local-node".to_string())
        }

        fn send_to(
            &self,
            _dest: &NodeAddress,
            _command: LocalEventCommand,
            _order: DeliveryOrder,
        ) -> std::result::Result<(), String> {
            Ok(())
        }

        fn backup_remotely(
            &self,
            _target: &BackupTarget,
            _command: RemoteEventCommand,
        ) -> SendCompletion {
            let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
            let fail = attempt < self.failures;
            Box::pin(async move {
                if fail {
                    Err("site unreachable".to_string())
                } else {
                    Ok(())
                }
            })
        }
    }

    fn sender_for(transport: Arc<FlakyTransport>) -> BackoffSender {
        BackoffSender::new(
            transport,
            BackupTarget::async_with_timeout("eu", 10_000),
            RemoteEventCommand {
                events: vec![SiteEvent::connect("local")],
            },
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_attempt_success_never_schedules() {
        let transport = FlakyTransport::failing(0);
        let start = Instant::now();

        sender_for(Arc::clone(&transport)).spawn().await.unwrap();

        assert_eq!(transport.attempts.load(Ordering::SeqCst), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_on_third_attempt() {
        let transport = FlakyTransport::failing(2);
        let start = Instant::now();

        sender_for(Arc::clone(&transport)).spawn().await.unwrap();

        assert_eq!(transport.attempts.load(Ordering::SeqCst), 3);
        // 200 ms + 500 ms of backoff before the successful attempt.
        assert_eq!(start.elapsed(), Duration::from_millis(700));
    }

    #[tokio::test(start_paused = true)]
    async fn test_schedule_exhaustion_stops_silently() {
        let transport = FlakyTransport::failing(usize::MAX);
        let start = Instant::now();

        sender_for(Arc::clone(&transport)).spawn().await.unwrap();

        // Initial attempt plus one retry per schedule entry.
        assert_eq!(
            transport.attempts.load(Ordering::SeqCst),
            1 + BACKOFF_DELAYS_MS.len()
        );
        assert_eq!(start.elapsed(), Duration::from_millis(8700));
    }

    #[tokio::test(start_paused = true)]
    async fn test_delays_follow_the_table() {
        let transport = FlakyTransport::failing(usize::MAX);
        let handle = sender_for(Arc::clone(&transport)).spawn();

        let mut expected_attempts = 1;
        tokio::task::yield_now().await;
        assert_eq!(transport.attempts.load(Ordering::SeqCst), expected_attempts);

        for delay in BACKOFF_DELAYS_MS {
            tokio::time::advance(Duration::from_millis(delay - 1)).await;
            tokio::task::yield_now().await;
            assert_eq!(transport.attempts.load(Ordering::SeqCst), expected_attempts);

            tokio::time::advance(Duration::from_millis(1)).await;
            tokio::task::yield_now().await;
            expected_attempts += 1;
            assert_eq!(transport.attempts.load(Ordering::SeqCst), expected_attempts);
        }

        handle.await.unwrap();
        assert_eq!(transport.attempts.load(Ordering::SeqCst), 6);
    }
}
