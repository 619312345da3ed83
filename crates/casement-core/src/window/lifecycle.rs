//! Window lifecycle controller.
//!
//! Owns the [`WindowRegistry`] and the platform backend, and is the only
//! component that creates or destroys windows. All methods run on the host
//! event loop, one at a time, so registry mutations never interleave.

use std::collections::HashMap;

use tracing::{debug, info, warn};
use uuid::Uuid;

use super::backend::{
    ObservedState, PlatformSender, Subscription, WindowBackend, WindowEvent, WindowEvents,
};
use super::errors::WindowError;
use super::registry::WindowRegistry;
use super::types::{
    ContentSource, LifecycleNotice, MAIN_WINDOW_ID, Outcome, Window, WindowDefaults, WindowHandle,
    WindowKind, WindowOptions, WindowPhase, WindowSpec, WindowSummary,
};
use crate::config::{CasementConfig, Environment};

/// Per-window state the controller keeps beside the registry record.
struct Tracked {
    subscription: Subscription,
    show_when_ready: bool,
}

pub struct WindowLifecycleController {
    registry: WindowRegistry,
    backend: Box<dyn WindowBackend>,
    tracked: HashMap<String, Tracked>,
    platform_tx: PlatformSender,
    content: ContentSource,
    environment: Environment,
    main_defaults: WindowDefaults,
    child_defaults: WindowDefaults,
    notices: Vec<LifecycleNotice>,
    accepting: bool,
}

impl WindowLifecycleController {
    pub fn new(
        config: &CasementConfig,
        backend: Box<dyn WindowBackend>,
        platform_tx: PlatformSender,
    ) -> Self {
        Self {
            registry: WindowRegistry::new(),
            backend,
            tracked: HashMap::new(),
            platform_tx,
            content: ContentSource::from_config(config),
            environment: config.app.environment(),
            main_defaults: WindowDefaults::main_from_config(config),
            child_defaults: WindowDefaults::child_from_config(config),
            notices: Vec::new(),
            accepting: true,
        }
    }

    pub fn registry(&self) -> &WindowRegistry {
        &self.registry
    }

    pub fn content_source(&self) -> &ContentSource {
        &self.content
    }

    pub fn backend_mut(&mut self) -> &mut dyn WindowBackend {
        self.backend.as_mut()
    }

    /// Create the primary window.
    ///
    /// The window is built hidden and shown only once the backend reports
    /// `ReadyToShow`, so the user never sees a blank frame.
    pub fn create_main(&mut self, options: &WindowOptions) -> Result<WindowHandle, WindowError> {
        if !self.accepting {
            return Err(WindowError::ShuttingDown);
        }
        if self.registry.get_main().is_some() || self.registry.contains(MAIN_WINDOW_ID) {
            return Err(WindowError::AlreadyExists);
        }

        info!(
            event = "core.window.create_main_started",
            source = %self.content.location()
        );

        let spec = WindowSpec::resolve(
            MAIN_WINDOW_ID,
            WindowKind::Main,
            None,
            options,
            &self.main_defaults,
        );
        let handle = self.build(spec)?;

        self.backend.load(&handle.id, &self.content);
        if self.environment.is_development() {
            self.backend.open_devtools(&handle.id);
        }

        info!(event = "core.window.create_main_completed", window_id = %handle.id);
        Ok(handle)
    }

    /// Create a secondary window, parented to main when main exists.
    ///
    /// A missing id is generated as `child-<8 hex chars>`.
    pub fn create_child(
        &mut self,
        id: Option<&str>,
        options: &WindowOptions,
    ) -> Result<WindowHandle, WindowError> {
        if !self.accepting {
            return Err(WindowError::ShuttingDown);
        }

        let id = match id {
            Some(requested) => {
                let requested = requested.trim();
                if requested.is_empty() {
                    return Err(WindowError::InvalidId);
                }
                if requested == MAIN_WINDOW_ID {
                    return Err(WindowError::ReservedId {
                        id: requested.to_string(),
                    });
                }
                requested.to_string()
            }
            None => self.generate_child_id(),
        };

        if self.registry.contains(&id) {
            return Err(WindowError::DuplicateId { id });
        }

        let parent = self.registry.get_main().map(|w| w.id.clone());
        debug!(
            event = "core.window.create_child_started",
            window_id = %id,
            parent = ?parent
        );

        let spec = WindowSpec::resolve(
            &id,
            WindowKind::Child,
            parent,
            options,
            &self.child_defaults,
        );
        let handle = self.build(spec)?;
        self.backend.load(&handle.id, &self.content);

        info!(event = "core.window.create_child_completed", window_id = %handle.id);
        Ok(handle)
    }

    fn generate_child_id(&self) -> String {
        loop {
            let simple = Uuid::new_v4().simple().to_string();
            let id = format!("child-{}", &simple[..8]);
            if !self.registry.contains(&id) {
                return id;
            }
        }
    }

    fn build(&mut self, spec: WindowSpec) -> Result<WindowHandle, WindowError> {
        let (events, subscription) = WindowEvents::subscribe(&spec.id, self.platform_tx.clone());
        self.backend.create(&spec, events)?;

        let window =
            Window::new(&spec.id, spec.kind, &spec.title).with_parent(spec.parent.clone());
        if let Err(e) = self.registry.register(window) {
            // Cancel first so the rollback close is not reported back.
            drop(subscription);
            self.backend.close(&spec.id);
            return Err(e);
        }

        self.tracked.insert(
            spec.id.clone(),
            Tracked {
                subscription,
                show_when_ready: spec.show_when_ready,
            },
        );

        Ok(WindowHandle {
            id: spec.id,
            kind: spec.kind,
        })
    }

    pub fn minimize(&mut self, id: &str) -> Outcome {
        if !self.registry.contains(id) {
            return self.skipped("minimize", id);
        }
        self.backend.minimize(id);
        self.sync(id);
        Outcome::Applied
    }

    /// Flip between maximized and normal based on what the platform reports
    /// right now.
    pub fn toggle_maximize(&mut self, id: &str) -> Outcome {
        let Ok(observed) = self.observe_live(id) else {
            return self.skipped("toggle_maximize", id);
        };

        if observed.maximized {
            self.backend.unmaximize(id);
        } else {
            self.backend.maximize(id);
        }
        self.sync(id);
        Outcome::Applied
    }

    /// Un-minimize if minimized.
    pub fn restore(&mut self, id: &str) -> Outcome {
        let Ok(observed) = self.observe_live(id) else {
            return self.skipped("restore", id);
        };

        if observed.minimized {
            self.backend.restore(id);
        }
        self.sync(id);
        Outcome::Applied
    }

    pub fn focus(&mut self, id: &str) -> Outcome {
        if !self.registry.contains(id) {
            return self.skipped("focus", id);
        }
        self.backend.focus(id);
        self.sync(id);
        Outcome::Applied
    }

    pub fn is_maximized(&self, id: &str) -> bool {
        self.observe_live(id).is_ok_and(|s| s.maximized)
    }

    /// Close a window and drop its registry entry in the same step.
    ///
    /// A `Closed` event that the platform delivers later for this id finds
    /// no entry and is ignored.
    pub fn close(&mut self, id: &str) -> Outcome {
        if !self.registry.contains(id) {
            return self.skipped("close", id);
        }
        self.backend.close(id);
        self.finalize_close(id);
        Outcome::Applied
    }

    /// Close every registered window, iterating a snapshot of the ids taken
    /// up front. Returns the number of windows closed.
    pub fn close_all(&mut self) -> usize {
        let ids = self.registry.ids();
        info!(event = "core.window.close_all_started", count = ids.len());

        let mut closed = 0;
        for id in &ids {
            if self.close(id) == Outcome::Applied {
                closed += 1;
            }
        }

        info!(event = "core.window.close_all_completed", closed = closed);
        closed
    }

    /// Apply one platform-reported window event.
    pub fn handle_platform_event(&mut self, id: &str, event: WindowEvent) {
        let show_when_ready = match self.tracked.get(id) {
            Some(tracked) if tracked.subscription.is_active() => tracked.show_when_ready,
            _ => {
                debug!(
                    event = "core.window.event_dropped",
                    window_id = id,
                    platform_event = ?event
                );
                return;
            }
        };

        match event {
            WindowEvent::ReadyToShow => {
                let Some(window) = self.registry.get_mut(id) else {
                    return;
                };
                if window.phase != WindowPhase::Created {
                    return;
                }
                window.phase = WindowPhase::Ready;
                if show_when_ready {
                    self.backend.show(id);
                }
                self.sync(id);
                debug!(
                    event = "core.window.ready_to_show",
                    window_id = id,
                    shown = show_when_ready
                );
            }
            WindowEvent::Closed => {
                self.finalize_close(id);
            }
            WindowEvent::Minimized
            | WindowEvent::Maximized
            | WindowEvent::Restored
            | WindowEvent::Focused => self.sync(id),
        }
    }

    /// Stop accepting new windows. Used once shutdown begins.
    pub fn begin_shutdown(&mut self) {
        self.accepting = false;
    }

    pub fn is_accepting(&self) -> bool {
        self.accepting
    }

    pub fn summaries(&self) -> Vec<WindowSummary> {
        self.registry.all().iter().map(WindowSummary::from).collect()
    }

    pub fn take_notices(&mut self) -> Vec<LifecycleNotice> {
        std::mem::take(&mut self.notices)
    }

    fn finalize_close(&mut self, id: &str) {
        let Some(window) = self.registry.unregister(id) else {
            return;
        };
        // Dropping the subscription cancels any further platform callbacks.
        self.tracked.remove(id);

        for child in self.registry.children_of(id) {
            if let Some(w) = self.registry.get_mut(&child) {
                w.parent = None;
            }
        }

        info!(
            event = "core.window.closed",
            window_id = id,
            kind = ?window.kind,
            remaining = self.registry.len()
        );

        self.notices.push(LifecycleNotice::WindowClosed { id: id.to_string() });
        if window.is_main() {
            self.notices.push(LifecycleNotice::MainWindowClosed);
        }
        if self.registry.is_empty() {
            self.notices.push(LifecycleNotice::AllWindowsClosed);
        }
    }

    /// Copy the platform's observed state into the registry record.
    fn sync(&mut self, id: &str) {
        let Some(observed) = self.backend.observe(id) else {
            warn!(event = "core.window.observe_missing", window_id = id);
            return;
        };
        let Some(window) = self.registry.get_mut(id) else {
            return;
        };

        window.visible = observed.visible;
        window.maximized = observed.maximized;
        window.minimized = observed.minimized;
        window.title = observed.title;

        if window.phase != WindowPhase::Created && window.visible {
            window.phase = if window.minimized {
                WindowPhase::Minimized
            } else if window.maximized {
                WindowPhase::Maximized
            } else {
                WindowPhase::Normal
            };
        }
    }

    /// Platform state of a registered window.
    fn observe_live(&self, id: &str) -> Result<ObservedState, WindowError> {
        self.registry.require(id)?;
        self.backend
            .observe(id)
            .ok_or_else(|| WindowError::NotFound { id: id.to_string() })
    }

    fn skipped(&self, operation: &'static str, id: &str) -> Outcome {
        debug!(
            event = "core.window.operation_skipped",
            operation = operation,
            window_id = id
        );
        Outcome::Skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::backend::{PlatformEvent, PlatformReceiver, platform_channel};
    use crate::window::headless::HeadlessBackend;

    fn controller_with(
        config: &CasementConfig,
    ) -> (WindowLifecycleController, HeadlessBackend, PlatformReceiver) {
        let (tx, rx) = platform_channel();
        let backend = HeadlessBackend::new(tx.clone());
        let controller = WindowLifecycleController::new(config, Box::new(backend.clone()), tx);
        (controller, backend, rx)
    }

    fn controller() -> (WindowLifecycleController, HeadlessBackend, PlatformReceiver) {
        controller_with(&CasementConfig::default())
    }

    /// Deliver every queued platform event, the way the host loop would.
    fn pump(controller: &mut WindowLifecycleController, rx: &mut PlatformReceiver) {
        while let Ok(event) = rx.try_recv() {
            if let PlatformEvent::Window { id, event } = event {
                controller.handle_platform_event(&id, event);
            }
        }
    }

    #[test]
    fn test_operations_on_unknown_ids_are_noops() {
        let (mut controller, _backend, _rx) = controller();

        assert_eq!(controller.minimize("ghost"), Outcome::Skipped);
        assert_eq!(controller.toggle_maximize("ghost"), Outcome::Skipped);
        assert_eq!(controller.close("ghost"), Outcome::Skipped);
        assert_eq!(controller.restore("ghost"), Outcome::Skipped);
        assert_eq!(controller.focus("ghost"), Outcome::Skipped);
        assert!(!controller.is_maximized("ghost"));
        assert!(controller.registry().is_empty());
        assert!(controller.take_notices().is_empty());
    }

    #[test]
    fn test_main_is_hidden_until_ready_to_show() {
        let (mut controller, backend, mut rx) = controller();
        backend.set_auto_ready(false);

        controller.create_main(&WindowOptions::default()).unwrap();
        pump(&mut controller, &mut rx);
        assert!(!backend.observe(MAIN_WINDOW_ID).unwrap().visible);
        assert_eq!(
            controller.registry().get(MAIN_WINDOW_ID).unwrap().phase,
            WindowPhase::Created
        );

        backend.simulate_ready_to_show(MAIN_WINDOW_ID);
        pump(&mut controller, &mut rx);

        let main = controller.registry().get(MAIN_WINDOW_ID).unwrap();
        assert!(main.visible);
        assert_eq!(main.phase, WindowPhase::Normal);
    }

    #[test]
    fn test_second_create_main_fails_and_leaves_registry_unchanged() {
        let (mut controller, _backend, _rx) = controller();
        controller.create_main(&WindowOptions::default()).unwrap();
        let before = controller.registry().all();

        let result = controller.create_main(&WindowOptions::default());
        assert!(matches!(result, Err(WindowError::AlreadyExists)));
        assert_eq!(controller.registry().all(), before);
    }

    #[test]
    fn test_main_loads_bundle_in_production() {
        let (mut controller, backend, _rx) = controller();
        controller.create_main(&WindowOptions::default()).unwrap();

        assert_eq!(
            backend.location(MAIN_WINDOW_ID).as_deref(),
            Some("app://./index.html")
        );
        assert!(!backend.devtools_open(MAIN_WINDOW_ID));
        let spec = backend.spec(MAIN_WINDOW_ID).unwrap();
        assert_eq!((spec.width, spec.height), (1200, 800));
        assert_eq!((spec.min_width, spec.min_height), (800, 600));
        assert!(!spec.frame);
    }

    #[test]
    fn test_main_loads_dev_server_and_opens_devtools_in_development() {
        let mut config = CasementConfig::default();
        config.app.environment = Some(Environment::Development);
        let (mut controller, backend, _rx) = controller_with(&config);

        controller.create_main(&WindowOptions::default()).unwrap();

        assert_eq!(
            backend.location(MAIN_WINDOW_ID).as_deref(),
            Some("http://localhost:8080")
        );
        assert!(backend.devtools_open(MAIN_WINDOW_ID));
    }

    #[test]
    fn test_child_is_parented_to_main() {
        let (mut controller, _backend, _rx) = controller();
        controller.create_main(&WindowOptions::default()).unwrap();

        let handle = controller
            .create_child(Some("c1"), &WindowOptions::default())
            .unwrap();
        assert_eq!(handle.kind, WindowKind::Child);
        assert_eq!(
            controller.registry().get("c1").unwrap().parent.as_deref(),
            Some(MAIN_WINDOW_ID)
        );
    }

    #[test]
    fn test_child_without_main_has_no_parent() {
        let (mut controller, _backend, _rx) = controller();
        controller
            .create_child(Some("c1"), &WindowOptions::default())
            .unwrap();
        assert!(controller.registry().get("c1").unwrap().parent.is_none());
    }

    #[test]
    fn test_create_child_generates_id() {
        let (mut controller, _backend, _rx) = controller();
        let handle = controller.create_child(None, &WindowOptions::default()).unwrap();
        assert!(handle.id.starts_with("child-"));
        assert_eq!(handle.id.len(), "child-".len() + 8);
        assert!(controller.registry().contains(&handle.id));
    }

    #[test]
    fn test_create_child_rejects_duplicate_and_reserved_ids() {
        let (mut controller, _backend, _rx) = controller();
        controller
            .create_child(Some("c1"), &WindowOptions::default())
            .unwrap();

        assert!(matches!(
            controller.create_child(Some("c1"), &WindowOptions::default()),
            Err(WindowError::DuplicateId { .. })
        ));
        assert!(matches!(
            controller.create_child(Some("main"), &WindowOptions::default()),
            Err(WindowError::ReservedId { .. })
        ));
        assert!(matches!(
            controller.create_child(Some("  "), &WindowOptions::default()),
            Err(WindowError::InvalidId)
        ));
        assert_eq!(controller.registry().len(), 1);
    }

    #[test]
    fn test_backend_create_failure_leaves_registry_untouched() {
        let (mut controller, backend, _rx) = controller();
        backend.fail_next_create("no display");

        let result = controller.create_main(&WindowOptions::default());
        assert!(matches!(result, Err(WindowError::Backend { .. })));
        assert!(controller.registry().is_empty());
    }

    #[test]
    fn test_toggle_maximize_reads_observed_state() {
        let (mut controller, mut backend, mut rx) = controller();
        controller.create_main(&WindowOptions::default()).unwrap();
        pump(&mut controller, &mut rx);

        controller.toggle_maximize(MAIN_WINDOW_ID);
        assert!(controller.is_maximized(MAIN_WINDOW_ID));

        // Platform un-maximizes behind the controller's back.
        backend.unmaximize(MAIN_WINDOW_ID);
        assert!(!controller.is_maximized(MAIN_WINDOW_ID));

        controller.toggle_maximize(MAIN_WINDOW_ID);
        assert!(controller.is_maximized(MAIN_WINDOW_ID));
        assert_eq!(
            controller.registry().get(MAIN_WINDOW_ID).unwrap().phase,
            WindowPhase::Maximized
        );
    }

    #[test]
    fn test_minimize_then_restore() {
        let (mut controller, _backend, mut rx) = controller();
        controller.create_main(&WindowOptions::default()).unwrap();
        pump(&mut controller, &mut rx);

        controller.minimize(MAIN_WINDOW_ID);
        assert!(controller.registry().get(MAIN_WINDOW_ID).unwrap().minimized);

        controller.restore(MAIN_WINDOW_ID);
        let main = controller.registry().get(MAIN_WINDOW_ID).unwrap();
        assert!(!main.minimized);
        assert_eq!(main.phase, WindowPhase::Normal);
    }

    #[test]
    fn test_user_minimize_is_reflected_in_registry() {
        let (mut controller, backend, mut rx) = controller();
        controller.create_main(&WindowOptions::default()).unwrap();
        pump(&mut controller, &mut rx);

        backend.simulate_user_minimize(MAIN_WINDOW_ID);
        pump(&mut controller, &mut rx);

        assert!(controller.registry().get(MAIN_WINDOW_ID).unwrap().minimized);
    }

    #[test]
    fn test_close_unregisters_synchronously_and_ignores_late_closed_event() {
        let (mut controller, _backend, mut rx) = controller();
        controller
            .create_child(Some("c1"), &WindowOptions::default())
            .unwrap();

        assert_eq!(controller.close("c1"), Outcome::Applied);
        assert!(!controller.registry().contains("c1"));

        pump(&mut controller, &mut rx);
        assert_eq!(controller.close("c1"), Outcome::Skipped);
        assert_eq!(
            controller.take_notices(),
            vec![
                LifecycleNotice::WindowClosed {
                    id: "c1".to_string()
                },
                LifecycleNotice::AllWindowsClosed
            ]
        );
    }

    #[test]
    fn test_platform_close_of_main_raises_notices() {
        let (mut controller, backend, mut rx) = controller();
        controller.create_main(&WindowOptions::default()).unwrap();
        controller
            .create_child(Some("c1"), &WindowOptions::default())
            .unwrap();
        pump(&mut controller, &mut rx);

        backend.simulate_user_close(MAIN_WINDOW_ID);
        pump(&mut controller, &mut rx);

        assert!(controller.registry().get_main().is_none());
        assert!(controller.registry().get("c1").unwrap().parent.is_none());
        let notices = controller.take_notices();
        assert!(notices.contains(&LifecycleNotice::MainWindowClosed));
        assert!(!notices.contains(&LifecycleNotice::AllWindowsClosed));
    }

    #[test]
    fn test_close_all_uses_snapshot() {
        let (mut controller, backend, mut rx) = controller();
        controller.create_main(&WindowOptions::default()).unwrap();
        controller
            .create_child(Some("c1"), &WindowOptions::default())
            .unwrap();
        controller
            .create_child(Some("c2"), &WindowOptions::default())
            .unwrap();

        assert_eq!(controller.close_all(), 3);
        assert!(controller.registry().is_empty());
        assert!(backend.live_windows().is_empty());

        pump(&mut controller, &mut rx);
        assert!(controller.registry().is_empty());
    }

    #[test]
    fn test_begin_shutdown_refuses_new_windows() {
        let (mut controller, _backend, _rx) = controller();
        controller.begin_shutdown();

        assert!(matches!(
            controller.create_main(&WindowOptions::default()),
            Err(WindowError::ShuttingDown)
        ));
        assert!(matches!(
            controller.create_child(Some("c1"), &WindowOptions::default()),
            Err(WindowError::ShuttingDown)
        ));
    }

    #[test]
    fn test_summaries_reflect_registry() {
        let (mut controller, _backend, mut rx) = controller();
        controller
            .create_child(
                Some("c1"),
                &WindowOptions {
                    title: Some("Settings".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        pump(&mut controller, &mut rx);

        let summaries = controller.summaries();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].id, "c1");
        assert_eq!(summaries[0].title, "Settings");
        assert!(summaries[0].visible);
        assert!(!summaries[0].maximized);
    }
}
