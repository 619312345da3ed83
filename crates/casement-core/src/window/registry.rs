//! Bookkeeping for live windows.
//!
//! The registry makes no platform calls. It only records which windows exist,
//! in which order they were registered, and which one is main.

use std::collections::HashMap;

use tracing::debug;

use super::errors::WindowError;
use super::types::{Window, WindowKind, WindowPhase};

#[derive(Debug, Default)]
pub struct WindowRegistry {
    windows: HashMap<String, Window>,
    order: Vec<String>,
}

impl WindowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a window.
    ///
    /// Fails with `DuplicateId` if the id is taken, or `AlreadyExists` if a
    /// second Main window is offered. The registry is unchanged on failure.
    pub fn register(&mut self, window: Window) -> Result<(), WindowError> {
        if self.windows.contains_key(&window.id) {
            return Err(WindowError::DuplicateId {
                id: window.id.clone(),
            });
        }
        if window.kind == WindowKind::Main && self.get_main().is_some() {
            return Err(WindowError::AlreadyExists);
        }

        debug!(
            event = "core.window.registered",
            window_id = %window.id,
            kind = ?window.kind
        );
        self.order.push(window.id.clone());
        self.windows.insert(window.id.clone(), window);
        Ok(())
    }

    /// Remove a window. Absent ids are a no-op.
    ///
    /// Returns the removed record marked as destroyed and `Closed`, or `None`
    /// if the id was not registered.
    pub fn unregister(&mut self, id: &str) -> Option<Window> {
        let mut window = self.windows.remove(id)?;
        self.order.retain(|existing| existing != id);
        window.destroyed = true;
        window.phase = WindowPhase::Closed;
        debug!(event = "core.window.unregistered", window_id = id);
        Some(window)
    }

    pub fn get(&self, id: &str) -> Option<&Window> {
        self.windows.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Window> {
        self.windows.get_mut(id)
    }

    pub fn get_main(&self) -> Option<&Window> {
        self.windows.values().find(|w| w.kind == WindowKind::Main)
    }

    /// Like [`Self::get`], for internal call sites that need an error.
    pub fn require(&self, id: &str) -> Result<&Window, WindowError> {
        self.windows
            .get(id)
            .ok_or_else(|| WindowError::NotFound { id: id.to_string() })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.windows.contains_key(id)
    }

    /// Owned snapshot in registration order.
    ///
    /// Callers may mutate the registry while iterating the result.
    pub fn all(&self) -> Vec<Window> {
        self.order
            .iter()
            .filter_map(|id| self.windows.get(id).cloned())
            .collect()
    }

    /// Ids in registration order, as an owned snapshot.
    pub fn ids(&self) -> Vec<String> {
        self.order.clone()
    }

    /// Ids of windows whose parent is `parent_id`.
    pub fn children_of(&self, parent_id: &str) -> Vec<String> {
        self.order
            .iter()
            .filter(|id| {
                self.windows
                    .get(*id)
                    .is_some_and(|w| w.parent.as_deref() == Some(parent_id))
            })
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::types::MAIN_WINDOW_ID;

    fn main_window() -> Window {
        Window::new(MAIN_WINDOW_ID, WindowKind::Main, "App")
    }

    fn child(id: &str) -> Window {
        Window::new(id, WindowKind::Child, "Child").with_parent(Some(MAIN_WINDOW_ID.to_string()))
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = WindowRegistry::new();
        registry.register(main_window()).unwrap();
        registry.register(child("c1")).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("c1").unwrap().parent.as_deref(), Some("main"));
        assert_eq!(registry.get_main().unwrap().id, "main");
    }

    #[test]
    fn test_register_duplicate_id_fails_and_leaves_registry_unchanged() {
        let mut registry = WindowRegistry::new();
        registry.register(child("c1")).unwrap();

        let result = registry.register(child("c1"));
        assert!(matches!(result, Err(WindowError::DuplicateId { id }) if id == "c1"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_second_main_is_rejected() {
        let mut registry = WindowRegistry::new();
        registry.register(main_window()).unwrap();

        let second = Window::new("other-main", WindowKind::Main, "App");
        assert!(matches!(
            registry.register(second),
            Err(WindowError::AlreadyExists)
        ));
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.all().iter().filter(|w| w.is_main()).count(),
            1
        );
    }

    #[test]
    fn test_require_reports_missing_id() {
        let mut registry = WindowRegistry::new();
        registry.register(main_window()).unwrap();

        assert_eq!(registry.require("main").unwrap().id, "main");
        assert!(matches!(
            registry.require("ghost"),
            Err(WindowError::NotFound { id }) if id == "ghost"
        ));
    }

    #[test]
    fn test_unregister_is_idempotent() {
        let mut registry = WindowRegistry::new();
        registry.register(main_window()).unwrap();
        registry.register(child("c1")).unwrap();

        let removed = registry.unregister("c1").unwrap();
        assert!(removed.destroyed);
        assert_eq!(removed.phase, WindowPhase::Closed);
        let after_first = registry.all();

        assert!(registry.unregister("c1").is_none());
        assert_eq!(registry.all(), after_first);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unregister_unknown_is_noop() {
        let mut registry = WindowRegistry::new();
        assert!(registry.unregister("never-registered").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_all_is_a_snapshot_in_registration_order() {
        let mut registry = WindowRegistry::new();
        registry.register(main_window()).unwrap();
        registry.register(child("c2")).unwrap();
        registry.register(child("c1")).unwrap();

        let snapshot = registry.all();
        for window in &snapshot {
            registry.unregister(&window.id);
        }

        let ids: Vec<&str> = snapshot.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec!["main", "c2", "c1"]);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_children_of() {
        let mut registry = WindowRegistry::new();
        registry.register(main_window()).unwrap();
        registry.register(child("c1")).unwrap();
        registry
            .register(Window::new("orphan", WindowKind::Child, "Orphan"))
            .unwrap();

        assert_eq!(registry.children_of(MAIN_WINDOW_ID), vec!["c1".to_string()]);
    }
}
