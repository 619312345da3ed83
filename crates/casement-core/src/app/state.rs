use tracing::{debug, warn};

/// Orchestrator phases, in the only order they can occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum AppPhase {
    #[default]
    Starting,
    AwaitingReady,
    Ready,
    Running,
    ShuttingDown,
    Terminated,
}

/// Process-wide application state. Only the orchestrator mutates it.
#[derive(Debug, Clone, Default)]
pub struct ApplicationState {
    pub primary_instance_held: bool,
    pub ready: bool,
    pub shutting_down: bool,
    phase: AppPhase,
}

impl ApplicationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> AppPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == AppPhase::Running
    }

    /// Move forward to `next`. Backward or repeated moves are refused.
    pub fn advance(&mut self, next: AppPhase) -> bool {
        if next <= self.phase {
            warn!(
                event = "core.app.transition_refused",
                from = ?self.phase,
                to = ?next
            );
            return false;
        }

        debug!(event = "core.app.transition", from = ?self.phase, to = ?next);
        self.phase = next;
        match next {
            AppPhase::AwaitingReady => self.primary_instance_held = true,
            AppPhase::Ready => self.ready = true,
            AppPhase::ShuttingDown => self.shutting_down = true,
            AppPhase::Terminated => self.primary_instance_held = false,
            AppPhase::Starting | AppPhase::Running => {}
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_lifecycle_sets_flags() {
        let mut state = ApplicationState::new();
        assert_eq!(state.phase(), AppPhase::Starting);

        assert!(state.advance(AppPhase::AwaitingReady));
        assert!(state.primary_instance_held);

        assert!(state.advance(AppPhase::Ready));
        assert!(state.ready);

        assert!(state.advance(AppPhase::Running));
        assert!(state.is_running());

        assert!(state.advance(AppPhase::ShuttingDown));
        assert!(state.shutting_down);

        assert!(state.advance(AppPhase::Terminated));
        assert!(!state.primary_instance_held);
    }

    #[test]
    fn test_backward_transition_is_refused() {
        let mut state = ApplicationState::new();
        state.advance(AppPhase::Running);

        assert!(!state.advance(AppPhase::Ready));
        assert!(!state.advance(AppPhase::Running));
        assert_eq!(state.phase(), AppPhase::Running);
    }

    #[test]
    fn test_denied_instance_terminates_from_starting() {
        let mut state = ApplicationState::new();
        assert!(state.advance(AppPhase::Terminated));
        assert!(!state.primary_instance_held);
        assert!(!state.ready);
    }
}
