//! In-process window backend with no native surface.
//!
//! Tracks each window's observed state and reports platform events through
//! the same channel a native toolkit would. The CLI host runs on it, and it
//! doubles as the test platform: the `simulate_*` methods stand in for the
//! user clicking native chrome.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use super::backend::{
    ObservedState, PlatformEvent, PlatformSender, WindowBackend, WindowEvent, WindowEvents,
};
use super::errors::BackendError;
use super::types::{ContentSource, WindowSpec};

#[derive(Debug)]
struct HeadlessWindow {
    spec: WindowSpec,
    state: ObservedState,
    location: Option<String>,
    devtools: bool,
    events: WindowEvents,
}

#[derive(Debug, Default)]
struct HeadlessState {
    windows: HashMap<String, HeadlessWindow>,
    protocols: HashMap<String, PathBuf>,
    launched: bool,
    /// Emit ReadyToShow right after create.
    auto_ready: bool,
    fail_next_create: Option<String>,
}

/// Cloneable handle; clones share the same simulated platform.
#[derive(Debug, Clone)]
pub struct HeadlessBackend {
    inner: Arc<Mutex<HeadlessState>>,
    events: PlatformSender,
}

impl HeadlessBackend {
    pub fn new(events: PlatformSender) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HeadlessState {
                auto_ready: true,
                ..Default::default()
            })),
            events,
        }
    }

    fn state(&self) -> MutexGuard<'_, HeadlessState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// When false, windows stay in `Created` until [`Self::simulate_ready_to_show`].
    pub fn set_auto_ready(&self, auto_ready: bool) {
        self.state().auto_ready = auto_ready;
    }

    /// Make the next `create` call fail with the given message.
    pub fn fail_next_create(&self, message: impl Into<String>) {
        self.state().fail_next_create = Some(message.into());
    }

    pub fn simulate_ready_to_show(&self, id: &str) {
        if let Some(window) = self.state().windows.get(id) {
            window.events.emit(WindowEvent::ReadyToShow);
        }
    }

    /// The user clicked the native close button.
    pub fn simulate_user_close(&self, id: &str) {
        let removed = self.state().windows.remove(id);
        if let Some(window) = removed {
            debug!(event = "core.headless.user_close", window_id = id);
            window.events.emit(WindowEvent::Closed);
        }
    }

    /// The user minimized the window from native chrome.
    pub fn simulate_user_minimize(&self, id: &str) {
        let mut state = self.state();
        if let Some(window) = state.windows.get_mut(id) {
            window.state.minimized = true;
            window.state.focused = false;
            window.events.emit(WindowEvent::Minimized);
        }
    }

    pub fn simulate_activate(&self) {
        let _ = self.events.send(PlatformEvent::Activate);
    }

    pub fn simulate_quit(&self) {
        let _ = self.events.send(PlatformEvent::QuitRequested);
    }

    pub fn is_launched(&self) -> bool {
        self.state().launched
    }

    pub fn live_windows(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.state().windows.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn spec(&self, id: &str) -> Option<WindowSpec> {
        self.state().windows.get(id).map(|w| w.spec.clone())
    }

    pub fn location(&self, id: &str) -> Option<String> {
        self.state().windows.get(id).and_then(|w| w.location.clone())
    }

    pub fn devtools_open(&self, id: &str) -> bool {
        self.state().windows.get(id).is_some_and(|w| w.devtools)
    }

    pub fn protocol_root(&self, scheme: &str) -> Option<PathBuf> {
        self.state().protocols.get(scheme).cloned()
    }

    fn update(&self, id: &str, event: WindowEvent, apply: impl FnOnce(&mut ObservedState)) {
        let mut state = self.state();
        if let Some(window) = state.windows.get_mut(id) {
            apply(&mut window.state);
            window.events.emit(event);
        }
    }
}

impl WindowBackend for HeadlessBackend {
    fn name(&self) -> &'static str {
        "headless"
    }

    fn launch(&mut self) -> Result<(), BackendError> {
        self.state().launched = true;
        self.events
            .send(PlatformEvent::Ready)
            .map_err(|e| BackendError::LaunchFailed {
                message: e.to_string(),
            })
    }

    fn register_protocol(&mut self, scheme: &str, root: &Path) -> Result<(), BackendError> {
        let mut state = self.state();
        if state.protocols.contains_key(scheme) {
            return Err(BackendError::ProtocolFailed {
                scheme: scheme.to_string(),
                message: "scheme already registered".to_string(),
            });
        }
        state.protocols.insert(scheme.to_string(), root.to_path_buf());
        Ok(())
    }

    fn create(&mut self, spec: &WindowSpec, events: WindowEvents) -> Result<(), BackendError> {
        let mut state = self.state();
        if let Some(message) = state.fail_next_create.take() {
            return Err(BackendError::CreateFailed {
                id: spec.id.clone(),
                message,
            });
        }
        if state.windows.contains_key(&spec.id) {
            return Err(BackendError::CreateFailed {
                id: spec.id.clone(),
                message: "platform window already exists".to_string(),
            });
        }

        let window = HeadlessWindow {
            spec: spec.clone(),
            state: ObservedState {
                visible: spec.show,
                title: spec.title.clone(),
                ..Default::default()
            },
            location: None,
            devtools: false,
            events,
        };
        if state.auto_ready {
            window.events.emit(WindowEvent::ReadyToShow);
        }
        state.windows.insert(spec.id.clone(), window);
        Ok(())
    }

    fn load(&mut self, id: &str, source: &ContentSource) {
        if let Some(window) = self.state().windows.get_mut(id) {
            window.location = Some(source.location());
        }
    }

    fn open_devtools(&mut self, id: &str) {
        if let Some(window) = self.state().windows.get_mut(id) {
            window.devtools = true;
        }
    }

    fn show(&mut self, id: &str) {
        if let Some(window) = self.state().windows.get_mut(id) {
            window.state.visible = true;
            window.state.focused = true;
        }
    }

    fn minimize(&mut self, id: &str) {
        self.update(id, WindowEvent::Minimized, |s| {
            s.minimized = true;
            s.focused = false;
        });
    }

    fn maximize(&mut self, id: &str) {
        self.update(id, WindowEvent::Maximized, |s| {
            s.maximized = true;
            s.minimized = false;
            s.visible = true;
        });
    }

    fn unmaximize(&mut self, id: &str) {
        self.update(id, WindowEvent::Restored, |s| s.maximized = false);
    }

    fn restore(&mut self, id: &str) {
        self.update(id, WindowEvent::Restored, |s| {
            s.minimized = false;
            s.visible = true;
        });
    }

    fn focus(&mut self, id: &str) {
        let mut state = self.state();
        for window in state.windows.values_mut() {
            window.state.focused = false;
        }
        if let Some(window) = state.windows.get_mut(id) {
            window.state.focused = true;
            window.events.emit(WindowEvent::Focused);
        }
    }

    fn close(&mut self, id: &str) {
        let removed = self.state().windows.remove(id);
        if let Some(window) = removed {
            window.events.emit(WindowEvent::Closed);
        }
    }

    fn observe(&self, id: &str) -> Option<ObservedState> {
        self.state().windows.get(id).map(|w| w.state.clone())
    }
}
