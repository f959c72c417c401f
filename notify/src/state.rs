//! Process-wide connectivity and permission state.
//!
//! Both values live behind one lock so a dispatch reads them as a single
//! snapshot. Each field has exactly one writer: the connectivity monitor
//! owns `connectivity`, the permission manager owns `permission`. The
//! writers are crate-private; everything else only reads.

use chorely_core::{ConnectivityState, PermissionState};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Both states as observed at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Snapshot {
    pub connectivity: ConnectivityState,
    pub permission: PermissionState,
}

/// Shared multi-reader state cell.
#[derive(Debug, Default)]
pub struct SharedState {
    inner: RwLock<Snapshot>,
}

impl SharedState {
    /// Create a cell starting Online with permission undecided. The monitor
    /// and manager overwrite their fields when they are constructed.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Read connectivity and permission together.
    pub fn snapshot(&self) -> Snapshot {
        *self.read()
    }

    pub fn connectivity(&self) -> ConnectivityState {
        self.read().connectivity
    }

    pub fn permission(&self) -> PermissionState {
        self.read().permission
    }

    /// Move to `next` if it differs from the current value.
    ///
    /// Returns the previous state on an actual transition, `None` when the
    /// signal repeats the current state.
    pub(crate) fn transition_connectivity(
        &self,
        next: ConnectivityState,
    ) -> Option<ConnectivityState> {
        let mut guard = self.write();
        if guard.connectivity == next {
            return None;
        }
        Some(std::mem::replace(&mut guard.connectivity, next))
    }

    /// Overwrite the permission state, returning the previous value.
    pub(crate) fn set_permission(&self, next: PermissionState) -> PermissionState {
        std::mem::replace(&mut self.write().permission, next)
    }

    // A panicking reader cannot leave a Copy snapshot half-written, so a
    // poisoned lock still holds a consistent value.
    fn read(&self) -> RwLockReadGuard<'_, Snapshot> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Snapshot> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_online_and_undecided() {
        let state = SharedState::new();
        assert_eq!(
            state.snapshot(),
            Snapshot {
                connectivity: ConnectivityState::Online,
                permission: PermissionState::Default,
            }
        );
    }

    #[test]
    fn repeated_connectivity_is_not_a_transition() {
        let state = SharedState::new();
        assert_eq!(state.transition_connectivity(ConnectivityState::Online), None);
        assert_eq!(
            state.transition_connectivity(ConnectivityState::Offline),
            Some(ConnectivityState::Online)
        );
        assert_eq!(state.transition_connectivity(ConnectivityState::Offline), None);
        assert_eq!(state.connectivity(), ConnectivityState::Offline);
    }

    #[test]
    fn set_permission_returns_previous() {
        let state = SharedState::new();
        assert_eq!(
            state.set_permission(PermissionState::Granted),
            PermissionState::Default
        );
        assert_eq!(state.permission(), PermissionState::Granted);
    }
}
