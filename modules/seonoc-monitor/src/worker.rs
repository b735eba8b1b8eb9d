use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Sleep in one-second slices so a worker notices shutdown quickly.
/// Returns false when the running flag dropped during the wait.
pub async fn sleep_with_cancel(running: &Arc<AtomicBool>, duration: Duration) -> bool {
    let mut remaining = duration;
    while !remaining.is_zero() {
        if !running.load(Ordering::Relaxed) {
            return false;
        }
        let slice = remaining.min(Duration::from_secs(1));
        tokio::time::sleep(slice).await;
        remaining = remaining.saturating_sub(slice);
    }
    running.load(Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn completes_when_running() {
        let running = Arc::new(AtomicBool::new(true));
        assert!(sleep_with_cancel(&running, Duration::from_millis(10)).await);
    }

    #[tokio::test]
    async fn aborts_when_stopped() {
        let running = Arc::new(AtomicBool::new(false));
        assert!(!sleep_with_cancel(&running, Duration::from_secs(60)).await);
    }
}
