//! Window backend trait and the platform event plumbing shared by backends.

use std::path::Path;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::errors::BackendError;
use super::types::{ContentSource, WindowSpec};

/// Events a platform reports about itself or one of its windows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformEvent {
    /// The platform finished initialising; windows may now be created.
    Ready,
    /// The application was re-activated (dock click, taskbar, launcher).
    Activate,
    /// The platform asked the application to quit.
    QuitRequested,
    /// Something happened to one window.
    Window { id: String, event: WindowEvent },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    /// The surface has rendered its first frame and can be shown without flicker.
    ReadyToShow,
    /// The platform object is gone (explicit close or native close button).
    Closed,
    Minimized,
    Maximized,
    Restored,
    Focused,
}

pub type PlatformSender = mpsc::UnboundedSender<PlatformEvent>;
pub type PlatformReceiver = mpsc::UnboundedReceiver<PlatformEvent>;

pub fn platform_channel() -> (PlatformSender, PlatformReceiver) {
    mpsc::unbounded_channel()
}

/// Display state as the platform currently reports it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservedState {
    pub visible: bool,
    pub maximized: bool,
    pub minimized: bool,
    pub focused: bool,
    pub title: String,
}

/// Handle held by the controller for one window's event stream.
///
/// Dropping it cancels delivery: the backend stops emitting events for that
/// window, so no callback can outlive the registry entry.
#[derive(Debug)]
pub struct Subscription {
    token: CancellationToken,
}

impl Subscription {
    pub fn is_active(&self) -> bool {
        !self.token.is_cancelled()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Sending side of one window's event stream, owned by the backend.
#[derive(Debug, Clone)]
pub struct WindowEvents {
    id: String,
    tx: PlatformSender,
    token: CancellationToken,
}

impl WindowEvents {
    /// Create the pair: events for the backend, subscription for the owner.
    pub fn subscribe(id: &str, tx: PlatformSender) -> (WindowEvents, Subscription) {
        let token = CancellationToken::new();
        let events = WindowEvents {
            id: id.to_string(),
            tx,
            token: token.clone(),
        };
        (events, Subscription { token })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_active(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Deliver an event. Returns false if the subscription was cancelled or
    /// the receiving loop is gone.
    pub fn emit(&self, event: WindowEvent) -> bool {
        if self.token.is_cancelled() {
            return false;
        }
        self.tx
            .send(PlatformEvent::Window {
                id: self.id.clone(),
                event,
            })
            .is_ok()
    }
}

/// Interface to a native windowing toolkit.
///
/// Each platform (or the headless backend) implements this trait. Display
/// operations are fire-and-forget: an id the backend no longer knows is
/// ignored, because the window may have closed on the platform side first.
pub trait WindowBackend: Send {
    /// The canonical name of this backend (e.g., "headless").
    fn name(&self) -> &'static str;

    /// Start the platform. Must eventually emit [`PlatformEvent::Ready`].
    fn launch(&mut self) -> Result<(), BackendError>;

    /// Serve files under `root` from `<scheme>://`.
    fn register_protocol(&mut self, scheme: &str, root: &Path) -> Result<(), BackendError>;

    /// Build a hidden platform window. Events for it go through `events`.
    fn create(&mut self, spec: &WindowSpec, events: WindowEvents) -> Result<(), BackendError>;

    fn load(&mut self, id: &str, source: &ContentSource);

    fn open_devtools(&mut self, id: &str);

    fn show(&mut self, id: &str);

    fn minimize(&mut self, id: &str);

    fn maximize(&mut self, id: &str);

    fn unmaximize(&mut self, id: &str);

    /// Un-minimize.
    fn restore(&mut self, id: &str);

    fn focus(&mut self, id: &str);

    /// Destroy the platform object. Emits `Closed` if the window existed.
    fn close(&mut self, id: &str);

    /// Current display state, or `None` if the window does not exist.
    fn observe(&self, id: &str) -> Option<ObservedState>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_delivers_window_event() {
        let (tx, mut rx) = platform_channel();
        let (events, _subscription) = WindowEvents::subscribe("c1", tx);

        assert!(events.emit(WindowEvent::ReadyToShow));
        assert_eq!(
            rx.try_recv().unwrap(),
            PlatformEvent::Window {
                id: "c1".to_string(),
                event: WindowEvent::ReadyToShow
            }
        );
    }

    #[test]
    fn test_dropping_subscription_stops_delivery() {
        let (tx, mut rx) = platform_channel();
        let (events, subscription) = WindowEvents::subscribe("c1", tx);

        drop(subscription);

        assert!(!events.is_active());
        assert!(!events.emit(WindowEvent::Closed));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_cancel_is_visible_to_both_sides() {
        let (tx, _rx) = platform_channel();
        let (events, subscription) = WindowEvents::subscribe("c1", tx);
        assert!(subscription.is_active());

        subscription.cancel();
        assert!(!subscription.is_active());
        assert!(!events.is_active());
    }
}
