//! Run an async task to completion from synchronous code.
//!
//! Callers may sit on a plain thread, on a worker of a multi-threaded tokio
//! runtime, or on a current-thread runtime that is already busy polling the
//! caller. Each case needs a different strategy; all of them are bounded.

use std::future::Future;
use std::sync::mpsc;
use std::time::Duration;

use tokio::runtime::{Builder, Handle, Runtime, RuntimeFlavor};

use crate::error::BridgeError;

/// How [`run_blocking`] will execute a task from the current thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeStrategy {
    /// No runtime on this thread: build one and run on it.
    OwnedRuntime,
    /// Multi-threaded runtime: lend this worker thread to it.
    LendWorker,
    /// A runtime that cannot lend this thread: hand off to a driver thread.
    DriverThread,
}

/// Strategy for the calling thread, without running anything.
pub fn current_strategy() -> BridgeStrategy {
    match Handle::try_current() {
        Err(_) => BridgeStrategy::OwnedRuntime,
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            BridgeStrategy::LendWorker
        }
        Ok(_) => BridgeStrategy::DriverThread,
    }
}

/// Drive `future` to completion and return its output, waiting at most `wait`.
///
/// Must not be called from inside a future polled by a current-thread runtime
/// that owns a resource the task needs; the dedicated driver thread cannot
/// make progress on it.
pub fn run_blocking<F, T>(future: F, wait: Duration) -> Result<T, BridgeError>
where
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    match current_strategy() {
        BridgeStrategy::OwnedRuntime => {
            let rt = owned_runtime()?;
            rt.block_on(tokio::time::timeout(wait, future))
                .map_err(|_| BridgeError::WaitExpired(wait))
        }
        BridgeStrategy::LendWorker => {
            let handle = Handle::current();
            tokio::task::block_in_place(|| handle.block_on(tokio::time::timeout(wait, future)))
                .map_err(|_| BridgeError::WaitExpired(wait))
        }
        BridgeStrategy::DriverThread => run_on_driver_thread(future, wait),
    }
}

fn owned_runtime() -> Result<Runtime, BridgeError> {
    Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| BridgeError::Runtime(e.to_string()))
}

fn run_on_driver_thread<F, T>(future: F, wait: Duration) -> Result<T, BridgeError>
where
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let (tx, rx) = mpsc::sync_channel(1);
    std::thread::Builder::new()
        .name("breathu-bridge".into())
        .spawn(move || {
            let outcome = owned_runtime().and_then(|rt| {
                rt.block_on(tokio::time::timeout(wait, future))
                    .map_err(|_| BridgeError::WaitExpired(wait))
            });
            // Receiver may have given up already.
            let _ = tx.send(outcome);
        })
        .map_err(|e| BridgeError::Runtime(e.to_string()))?;

    match rx.recv_timeout(wait) {
        Ok(outcome) => outcome,
        Err(mpsc::RecvTimeoutError::Timeout) => {
            tracing::warn!(wait_ms = wait.as_millis(), "bridge: driver thread wait expired");
            Err(BridgeError::WaitExpired(wait))
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => Err(BridgeError::Disconnected),
    }
}
