//! Graceful shutdown management

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::time::sleep;
use tracing::info;

const CHECK_INTERVAL: Duration = Duration::from_millis(50);

/// Running flag flipped by Ctrl+C
pub struct ShutdownManager {
    flag: Arc<AtomicBool>,
}

impl ShutdownManager {
    pub fn new() -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Spawn a Ctrl+C signal handler that triggers shutdown
    pub fn spawn_signal_handler(&self) {
        let flag = Arc::clone(&self.flag);
        tokio::spawn(async move {
            if signal::ctrl_c().await.is_ok() {
                info!("");
                info!("Received shutdown signal (Ctrl+C)");
                info!("Finishing current cycle and shutting down...");
                flag.store(false, Ordering::Release);
            }
        });
    }

    pub fn is_running(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    pub fn trigger(&self) {
        self.flag.store(false, Ordering::Release);
    }

    /// Sleep for a duration, but wake early if shutdown is triggered
    pub async fn interruptible_sleep(&self, duration: Duration) {
        let mut elapsed = Duration::ZERO;

        while elapsed < duration && self.is_running() {
            let step = CHECK_INTERVAL.min(duration - elapsed);
            sleep(step).await;
            elapsed += step;
        }
    }
}

impl Default for ShutdownManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn test_sleep_returns_immediately_after_trigger() {
        let shutdown = ShutdownManager::new();
        assert!(shutdown.is_running());

        shutdown.trigger();
        let started = Instant::now();
        shutdown.interruptible_sleep(Duration::from_secs(30)).await;

        assert!(!shutdown.is_running());
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_short_sleep_completes() {
        let shutdown = ShutdownManager::default();
        let started = Instant::now();

        shutdown.interruptible_sleep(Duration::from_millis(20)).await;

        assert!(started.elapsed() >= Duration::from_millis(20));
        assert!(shutdown.is_running());
    }
}
