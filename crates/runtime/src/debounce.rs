//! Trailing-edge debounce with a single outstanding timer.
//!
//! Every `push` aborts the pending timer (if any) before arming a new one, so
//! there is never more than one timer in flight per `Debouncer`. A value is
//! delivered on the paired receiver only after `quiet` elapses with no newer
//! push. Only the timer is cancelled; work started by the receiver side is
//! never interrupted here.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

#[derive(Debug)]
pub struct Debouncer<T> {
    quiet: Duration,
    tx: mpsc::UnboundedSender<T>,
    pending: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Must be called from within a tokio runtime.
    pub fn new(quiet: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                quiet,
                tx,
                pending: None,
            },
            rx,
        )
    }

    pub fn quiet(&self) -> Duration {
        self.quiet
    }

    /// Re-arms the timer with `value`, discarding any value still waiting.
    pub fn push(&mut self, value: T) {
        self.cancel();

        let deadline = Instant::now() + self.quiet;
        let tx = self.tx.clone();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            // A closed receiver means the owner is shutting down.
            let _ = tx.send(value);
        }));
    }

    /// Cancels the pending timer. Returns `true` if one was still armed.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::Debouncer;

    #[tokio::test(start_paused = true)]
    async fn burst_settles_once_with_last_value() {
        let (mut d, mut rx) = Debouncer::new(Duration::from_millis(500));
        for i in 0..5 {
            d.push(i);
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(450)).await;
        assert_eq!(rx.recv().await, Some(4));

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn separated_pushes_each_fire() {
        let (mut d, mut rx) = Debouncer::new(Duration::from_millis(500));
        d.push("a");
        tokio::time::sleep(Duration::from_millis(600)).await;
        d.push("b");
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(rx.recv().await, Some("a"));
        assert_eq!(rx.recv().await, Some("b"));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_pending_value() {
        let (mut d, mut rx) = Debouncer::new(Duration::from_millis(500));
        d.push(1);
        assert!(d.is_pending());
        assert!(d.cancel());
        assert!(!d.is_pending());
        assert!(!d.cancel());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
    }
}
