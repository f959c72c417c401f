//! Connectivity precondition for mutating operations.
//!
//! Session start, dispatch and consent requests all need a live network.
//! Wrapping them in [`OfflineGate`] keeps that check in one place.

use crate::connectivity::ConnectivityMonitor;
use crate::error::NotifyError;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct OfflineGate {
    connectivity: Arc<ConnectivityMonitor>,
}

impl OfflineGate {
    pub fn new(connectivity: Arc<ConnectivityMonitor>) -> Self {
        Self { connectivity }
    }

    /// Run `action` if the device is online right now.
    ///
    /// Offline, the action is not invoked: the offline warning is raised
    /// (once) and the call fails with `NotifyError::Offline` converted into
    /// the action's error type. Online, the action's own result passes
    /// through untouched.
    pub fn run<T, E>(&self, action: impl FnOnce() -> Result<T, E>) -> Result<T, E>
    where
        E: From<NotifyError>,
    {
        self.check()?;
        action()
    }

    /// Async form of [`OfflineGate::run`]. The check happens before the
    /// future is created.
    pub async fn run_async<T, E, F, Fut>(&self, action: F) -> Result<T, E>
    where
        E: From<NotifyError>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.check()?;
        action().await
    }

    fn check(&self) -> Result<(), NotifyError> {
        if self.connectivity.state().is_online() {
            return Ok(());
        }
        debug!("Gated action rejected - device offline");
        self.connectivity.ensure_offline_warning();
        Err(NotifyError::Offline)
    }
}
