use tokio::sync::watch;

/// Owning side of a cancellation signal.
///
/// Hand [`CancelHandle::token`] clones to in-flight calls, then fire
/// [`CancelHandle::cancel`] to interrupt their retry waits. The signal is
/// level-triggered: once fired it stays fired, and firing twice is a no-op.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    /// Creates a token observing this handle's signal.
    pub fn token(&self) -> CancelToken {
        CancelToken {
            rx: self.tx.subscribe(),
        }
    }

    /// Fires the signal. Idempotent, and latches even when no token has
    /// subscribed yet.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for CancelHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Observer side of a cancellation signal.
#[derive(Clone, Debug)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    /// A token that can never fire, for calls nobody intends to cancel.
    pub fn never() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self { rx }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once the handle fires.
    ///
    /// Pends forever for a [`CancelToken::never`] token, and likewise when
    /// the handle was dropped without firing: a call that can no longer be
    /// cancelled simply runs to completion.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        loop {
            if *rx.borrow() {
                return;
            }
            if rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}
