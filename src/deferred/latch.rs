use std::sync::{Condvar, Mutex, PoisonError};

/// One-shot latch backed by `Mutex<bool>` + `Condvar`.
///
/// Blocking reads on a deferred park on one of these until resolution.
/// Once opened it stays open, so late waiters pass straight through.
pub(crate) struct Latch {
    open: Mutex<bool>,
    wake: Condvar,
}

impl Latch {
    pub(crate) fn new() -> Self {
        Latch {
            open: Mutex::new(false),
            wake: Condvar::new(),
        }
    }

    /// Block the calling thread until the latch opens.
    pub(crate) fn wait(&self) {
        let mut open = self.open.lock().unwrap_or_else(PoisonError::into_inner);
        while !*open {
            open = self
                .wake
                .wait(open)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Open the latch and wake every waiter.
    pub(crate) fn open(&self) {
        let mut open = self.open.lock().unwrap_or_else(PoisonError::into_inner);
        *open = true;
        self.wake.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn wait_after_open_returns_immediately() {
        let latch = Latch::new();
        latch.open();
        latch.wait();
    }

    #[test]
    fn open_wakes_blocked_waiter() {
        let latch = Arc::new(Latch::new());
        let waiter = {
            let latch = Arc::clone(&latch);
            thread::spawn(move || latch.wait())
        };
        latch.open();
        waiter.join().unwrap();
    }

    #[test]
    fn open_is_idempotent() {
        let latch = Latch::new();
        latch.open();
        latch.open();
        latch.wait();
    }
}
