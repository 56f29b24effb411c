use crate::client::transport::{RelayTransport, TransportError};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Pending,
    Ready,
}

/// How long a submission waits for the transport to come up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessPolicy {
    pub attempts: u32,
    pub backoff: Duration,
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            backoff: Duration::from_millis(500),
        }
    }
}

/// Calls `init` until it succeeds or `policy.attempts` run out, sleeping a fixed
/// backoff between failed attempts.
pub async fn initialize<T>(transport: &T, policy: ReadinessPolicy) -> Result<(), TransportError>
where
    T: RelayTransport + ?Sized,
{
    for attempt in 1..=policy.attempts {
        match transport.init().await {
            Ok(()) => {
                debug!(attempt, "relay transport ready");
                return Ok(());
            }
            Err(e) => {
                warn!(attempt, error = %e, "relay transport not ready");
                if attempt < policy.attempts {
                    sleep(policy.backoff).await;
                }
            }
        }
    }
    Err(TransportError::NotReady {
        attempts: policy.attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submission::SanitizedSubmission;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct FlakyInit {
        failures: u32,
        calls: AtomicU32,
    }

    #[async_trait]
    impl RelayTransport for FlakyInit {
        async fn init(&self) -> Result<(), TransportError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                return Err(TransportError::Unconfigured("not loaded yet"));
            }
            Ok(())
        }

        async fn send(&self, _submission: &SanitizedSubmission) -> Result<(), TransportError> {
            Ok(())
        }
    }

    fn quick_policy() -> ReadinessPolicy {
        ReadinessPolicy {
            attempts: 3,
            backoff: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn initialize_after_retries_works() {
        let transport = FlakyInit {
            failures: 2,
            calls: AtomicU32::new(0),
        };
        initialize(&transport, quick_policy())
            .await
            .expect("Failed to initialize");
        assert_eq!(transport.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn initialize_gives_up_after_attempts() {
        let transport = FlakyInit {
            failures: u32::MAX,
            calls: AtomicU32::new(0),
        };
        let error = initialize(&transport, quick_policy())
            .await
            .expect_err("Initialized a transport that never loads");
        assert!(matches!(error, TransportError::NotReady { attempts: 3 }));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn initialize_sleeps_only_between_failures() {
        let transport = FlakyInit {
            failures: u32::MAX,
            calls: AtomicU32::new(0),
        };
        let started = tokio::time::Instant::now();
        initialize(&transport, ReadinessPolicy::default())
            .await
            .expect_err("Initialized a transport that never loads");
        assert_eq!(started.elapsed(), Duration::from_millis(1000));

        let transport = FlakyInit {
            failures: 1,
            calls: AtomicU32::new(0),
        };
        let started = tokio::time::Instant::now();
        initialize(&transport, ReadinessPolicy::default())
            .await
            .expect("Failed to initialize");
        assert_eq!(started.elapsed(), Duration::from_millis(500));
    }

    #[test]
    fn default_policy_works() {
        let policy = ReadinessPolicy::default();
        assert_eq!(policy.attempts, 3);
        assert_eq!(policy.backoff, Duration::from_millis(500));
    }
}
