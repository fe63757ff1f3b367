//! Cooperative shutdown signal
//!
//! `main` owns the sender and flips it to `true` on SIGINT/SIGTERM. Every
//! blocking wait in the export (retry pauses, the post-submission grace
//! period) races against the receiver so an operator can stop a stuck run.

use crate::domain::{Result, SumoError};
use std::time::Duration;
use tokio::sync::watch;

/// Receiving half of the shutdown channel
pub type ShutdownSignal = watch::Receiver<bool>;

/// Whether shutdown has been requested
pub fn is_shutdown(signal: &ShutdownSignal) -> bool {
    *signal.borrow()
}

/// Resolves once shutdown is requested
///
/// If the sender is dropped without ever signalling, this never resolves.
pub async fn wait_for_shutdown(signal: &mut ShutdownSignal) {
    loop {
        if *signal.borrow_and_update() {
            return;
        }
        if signal.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Sleep for `duration` unless shutdown is requested first
///
/// # Errors
///
/// Returns [`SumoError::Interrupted`] if the signal fires before or during the sleep.
pub async fn sleep_or_shutdown(duration: Duration, signal: &ShutdownSignal) -> Result<()> {
    let mut signal = signal.clone();
    if is_shutdown(&signal) {
        return Err(SumoError::Interrupted);
    }

    tokio::select! {
        _ = tokio::time::sleep(duration) => Ok(()),
        _ = wait_for_shutdown(&mut signal) => Err(SumoError::Interrupted),
    }
}
