//! Connectivity monitor.
//!
//! Tracks online/offline transitions reported by the host platform and keeps
//! the offline indicator in the in-app sink in step with them:
//!
//! - Offline raises a persistent warning. Only the next Online transition
//!   clears it; it never expires on a timer.
//! - Online (from Offline) dismisses the warning and shows a short
//!   acknowledgement.
//!
//! Without any platform signal the monitor fails open and reports Online
//! for the lifetime of the process.

use crate::config::Config;
use crate::listeners::{Listeners, Subscription};
use crate::sink::{InAppNotice, NoticeDisplay, NoticeStyle, PresentationSink};
use crate::state::SharedState;
use chorely_core::ConnectivityState;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};
use tracing::{debug, info, warn};

/// Key of the persistent offline warning in the in-app sink.
pub const OFFLINE_NOTICE_KEY: &str = "connectivity.offline";

const OFFLINE_TITLE: &str = "Você está offline";
const OFFLINE_BODY: &str = "Conecte-se à internet para enviar notificações";
const ONLINE_TITLE: &str = "Conexão restaurada";
const ONLINE_BODY: &str = "Você está online novamente";

/// Broadcast capacity for transition streams
const EVENT_CAPACITY: usize = 64;

pub struct ConnectivityMonitor {
    state: Arc<SharedState>,
    sink: Arc<dyn PresentationSink>,
    supported: bool,
    online_notice: Duration,
    warning_active: AtomicBool,
    listeners: Listeners<ConnectivityState>,
    events: broadcast::Sender<ConnectivityState>,
}

impl ConnectivityMonitor {
    /// Create the monitor with the platform's current reading.
    ///
    /// `initial = None` means the platform exposes no connectivity signal;
    /// the monitor then assumes Online permanently.
    pub fn new(
        state: Arc<SharedState>,
        initial: Option<ConnectivityState>,
        sink: Arc<dyn PresentationSink>,
        config: &Config,
    ) -> Self {
        let supported = initial.is_some();
        if !supported {
            warn!("No connectivity signal available - assuming online");
        }
        let initial = initial.unwrap_or(ConnectivityState::Online);
        state.transition_connectivity(initial);

        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let monitor = Self {
            state,
            sink,
            supported,
            online_notice: config.online_notice,
            warning_active: AtomicBool::new(false),
            listeners: Listeners::new(),
            events,
        };

        if initial == ConnectivityState::Offline {
            monitor.ensure_offline_warning();
        }
        debug!(state = %initial, supported, "Connectivity monitor started");
        monitor
    }

    /// Current state, read at call time.
    pub fn state(&self) -> ConnectivityState {
        self.state.connectivity()
    }

    /// Whether the platform reports connectivity at all.
    pub fn is_supported(&self) -> bool {
        self.supported
    }

    /// Feed a platform connectivity event.
    ///
    /// Returns `true` on an actual transition. Repeated signals of the
    /// current state are ignored.
    pub fn signal(&self, next: ConnectivityState) -> bool {
        if !self.supported {
            debug!(signal = %next, "Ignoring connectivity signal - monitor fails open");
            return false;
        }

        let Some(previous) = self.state.transition_connectivity(next) else {
            debug!(state = %next, "Duplicate connectivity signal");
            return false;
        };

        info!(from = %previous, to = %next, "Connectivity changed");
        match next {
            ConnectivityState::Offline => {
                self.ensure_offline_warning();
            }
            ConnectivityState::Online => {
                self.clear_offline_warning();
                self.sink.enqueue(InAppNotice::new(
                    ONLINE_TITLE,
                    ONLINE_BODY,
                    NoticeStyle::Success,
                    NoticeDisplay::Timed(self.online_notice),
                ));
            }
        }

        // No receivers is fine
        let _ = self.events.send(next);
        self.listeners.emit(&next);
        true
    }

    /// Raise the persistent offline warning unless it is already showing.
    ///
    /// Returns `true` if a warning was enqueued.
    pub fn ensure_offline_warning(&self) -> bool {
        if self.state() != ConnectivityState::Offline {
            return false;
        }
        if self.warning_active.swap(true, Ordering::SeqCst) {
            return false;
        }

        self.sink.enqueue(
            InAppNotice::new(
                OFFLINE_TITLE,
                OFFLINE_BODY,
                NoticeStyle::Warning,
                NoticeDisplay::Persistent,
            )
            .with_key(OFFLINE_NOTICE_KEY),
        );
        true
    }

    /// Whether the offline warning is currently showing.
    pub fn warning_active(&self) -> bool {
        self.warning_active.load(Ordering::SeqCst)
    }

    fn clear_offline_warning(&self) {
        if self.warning_active.swap(false, Ordering::SeqCst) {
            self.sink.dismiss(OFFLINE_NOTICE_KEY);
        }
    }

    /// Call `callback` on every transition until the subscription drops.
    pub fn on_change(
        &self,
        callback: impl Fn(&ConnectivityState) + Send + Sync + 'static,
    ) -> Subscription {
        self.listeners.subscribe(callback)
    }

    /// Stream of transitions from now on. A receiver that falls behind
    /// skips the missed transitions.
    pub fn changes(&self) -> impl Stream<Item = ConnectivityState> + Send + 'static {
        BroadcastStream::new(self.events.subscribe()).filter_map(|event| event.ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;
    use std::sync::atomic::AtomicUsize;

    fn monitor(initial: Option<ConnectivityState>) -> (ConnectivityMonitor, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let monitor = ConnectivityMonitor::new(
            SharedState::new(),
            initial,
            sink.clone(),
            &Config::with_defaults(),
        );
        (monitor, sink)
    }

    #[test]
    fn duplicate_offline_raises_warning_once() {
        let (monitor, sink) = monitor(Some(ConnectivityState::Online));

        assert!(monitor.signal(ConnectivityState::Offline));
        assert!(!monitor.signal(ConnectivityState::Offline));

        assert_eq!(sink.keyed(OFFLINE_NOTICE_KEY).len(), 1);
        assert_eq!(sink.keyed(OFFLINE_NOTICE_KEY)[0].display, NoticeDisplay::Persistent);
    }

    #[test]
    fn online_clears_warning_and_shows_transient_notice() {
        let (monitor, sink) = monitor(Some(ConnectivityState::Online));
        monitor.signal(ConnectivityState::Offline);
        monitor.signal(ConnectivityState::Online);

        assert!(sink.keyed(OFFLINE_NOTICE_KEY).is_empty());
        assert!(!monitor.warning_active());

        let success = sink.styled(NoticeStyle::Success);
        assert_eq!(success.len(), 1);
        assert!(matches!(success[0].display, NoticeDisplay::Timed(_)));
    }

    #[test]
    fn starting_offline_shows_warning() {
        let (monitor, sink) = monitor(Some(ConnectivityState::Offline));
        assert_eq!(monitor.state(), ConnectivityState::Offline);
        assert_eq!(sink.keyed(OFFLINE_NOTICE_KEY).len(), 1);
    }

    #[test]
    fn duplicate_online_is_silent() {
        let (monitor, sink) = monitor(Some(ConnectivityState::Online));
        assert!(!monitor.signal(ConnectivityState::Online));
        assert!(sink.is_empty());
    }

    #[test]
    fn fails_open_without_signal() {
        let (monitor, sink) = monitor(None);
        assert!(!monitor.is_supported());
        assert!(!monitor.signal(ConnectivityState::Offline));
        assert_eq!(monitor.state(), ConnectivityState::Online);
        assert!(sink.is_empty());
    }

    #[test]
    fn ensure_warning_is_noop_while_online() {
        let (monitor, sink) = monitor(Some(ConnectivityState::Online));
        assert!(!monitor.ensure_offline_warning());
        assert!(sink.is_empty());
    }

    #[test]
    fn callbacks_fire_only_on_transitions() {
        let (monitor, _sink) = monitor(Some(ConnectivityState::Online));
        let calls = Arc::new(AtomicUsize::new(0));
        let sub = {
            let calls = calls.clone();
            monitor.on_change(move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
            })
        };

        monitor.signal(ConnectivityState::Offline);
        monitor.signal(ConnectivityState::Offline);
        monitor.signal(ConnectivityState::Online);
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        drop(sub);
        monitor.signal(ConnectivityState::Offline);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn change_stream_yields_transitions() {
        let (monitor, _sink) = monitor(Some(ConnectivityState::Online));
        let mut changes = Box::pin(monitor.changes());

        monitor.signal(ConnectivityState::Offline);
        monitor.signal(ConnectivityState::Offline);
        monitor.signal(ConnectivityState::Online);

        assert_eq!(changes.next().await, Some(ConnectivityState::Offline));
        assert_eq!(changes.next().await, Some(ConnectivityState::Online));
    }
}
