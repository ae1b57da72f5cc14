/// Cooperative cancellation token.
///
/// Cloning is cheap; all clones observe the same state. Besides the flag,
/// the token owns a channel whose only sender is dropped on `cancel()`, so
/// code blocked in a crossbeam `select!` can include
/// `recv(token.signal())` and wake the moment cancellation happens.
use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct CancelToken {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    flag: AtomicBool,
    trigger: Mutex<Option<Sender<()>>>,
    signal: Receiver<()>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (trigger, signal) = crossbeam_channel::bounded(0);
        Self {
            inner: Arc::new(Inner {
                flag: AtomicBool::new(false),
                trigger: Mutex::new(Some(trigger)),
                signal,
            }),
        }
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.inner.flag.store(true, Ordering::SeqCst);
        self.inner.trigger.lock().take();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.flag.load(Ordering::SeqCst)
    }

    /// A receiver that becomes ready (disconnected) once cancelled.
    /// Never yields a message.
    pub fn signal(&self) -> &Receiver<()> {
        &self.inner.signal
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn fresh_token_is_not_cancelled() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());
        assert!(token
            .signal()
            .recv_timeout(Duration::from_millis(10))
            .unwrap_err()
            .is_timeout());
    }

    #[test]
    fn cancel_is_visible_through_clones() {
        let token = CancelToken::new();
        let clone = token.clone();
        clone.cancel();
        assert!(token.is_cancelled());
        // Disconnected, not timed out.
        assert!(token.signal().recv_timeout(Duration::from_secs(1)).unwrap_err().is_disconnected());
    }

    #[test]
    fn cancel_wakes_a_blocked_select() {
        let token = CancelToken::new();
        let remote = token.clone();
        let waiter = std::thread::spawn(move || {
            let (_tx, rx) = crossbeam_channel::bounded::<u32>(1);
            crossbeam_channel::select! {
                recv(rx) -> _ => false,
                recv(remote.signal()) -> _ => true,
            }
        });
        std::thread::sleep(Duration::from_millis(20));
        token.cancel();
        assert!(waiter.join().unwrap());
    }

    #[test]
    fn cancel_twice_is_harmless() {
        let token = CancelToken::new();
        token.cancel();
        token.cancel();
        assert!(token.is_cancelled());
    }
}
