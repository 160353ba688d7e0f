use std::{future::Future, time::Duration};

use tokio::sync::watch;

use crate::domain::{FetchError, Stage, TransportError};

/// Owner side of a cancellation signal.
#[derive(Clone)]
pub struct CancelHandle {
    sender: watch::Sender<bool>,
}

/// Observer side, threaded through every network-issuing call.
#[derive(Clone)]
pub struct CancelToken {
    receiver: watch::Receiver<bool>,
}

impl CancelHandle {
    pub fn new() -> (Self, CancelToken) {
        let (sender, receiver) = watch::channel(false);
        (Self { sender }, CancelToken { receiver })
    }

    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.sender.borrow()
    }

    /// Cancels once `deadline` elapses. Must be called inside a tokio runtime.
    pub fn cancel_after(&self, deadline: Duration) {
        let handle = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(deadline).await;
            tracing::warn!(target: "app", ?deadline, "deadline reached; cancelling");
            handle.cancel();
        });
    }
}

impl CancelToken {
    /// A token nobody can cancel.
    pub fn never() -> Self {
        let (sender, receiver) = watch::channel(false);
        // Dropping the sender leaves the value at `false` forever.
        drop(sender);
        Self { receiver }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Resolves once cancelled. Pends forever if the handle is dropped first.
    pub async fn cancelled(&self) {
        let mut receiver = self.receiver.clone();
        loop {
            if *receiver.borrow_and_update() {
                return;
            }
            if receiver.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }

    /// Races one remote call against cancellation and tags failures with `stage`.
    /// An already-cancelled token never polls `call`.
    pub async fn run<T, F>(&self, stage: Stage, call: F) -> Result<T, FetchError>
    where
        F: Future<Output = Result<T, TransportError>>,
    {
        tokio::select! {
            biased;
            _ = self.cancelled() => Err(FetchError::Cancelled { stage }),
            res = call => res.map_err(|err| FetchError::transport(stage, err)),
        }
    }
}

pub fn install_signal_handlers(handle: CancelHandle) {
    let ctrlc = handle.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!(target: "app", "interrupt received; cancelling");
            ctrlc.cancel();
        }
    });

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let term = handle.clone();
        tokio::spawn(async move {
            if let Ok(mut sig) = signal(SignalKind::terminate()) {
                sig.recv().await;
                tracing::info!(target: "app", "SIGTERM received; cancelling");
                term.cancel();
            }
        });
    }
}
