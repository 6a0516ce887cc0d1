//! Session state machine with thread-safe transitions.
//!
//! Two phases, two transitions:
//! - Idle -> Busy (a valid query was submitted)
//! - Busy -> Idle (the exchange completed, successfully or not)
//!
//! There is no error phase. Submitting while Busy is refused.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::ChatError;
use crate::types::{Phase, SessionState};

impl Phase {
    /// Returns whether a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: &Phase) -> bool {
        matches!(
            (self, target),
            (Phase::Idle, Phase::Busy) | (Phase::Busy, Phase::Idle)
        )
    }
}

/// Thread-safe state machine for one session.
///
/// Cloning yields another handle to the same state, so a surface and the
/// orchestrator can both observe it.
#[derive(Debug, Clone, Default)]
pub struct SessionStateMachine {
    state: Arc<Mutex<SessionState>>,
}

impl SessionStateMachine {
    /// Create a state machine initialized to `Idle` with no status text.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the current state.
    pub fn current(&self) -> SessionState {
        self.lock().clone()
    }

    pub fn phase(&self) -> Phase {
        self.lock().phase
    }

    pub fn is_busy(&self) -> bool {
        self.phase() == Phase::Busy
    }

    /// Enter `Busy` with the given status text.
    ///
    /// Returns a guard that moves the session back to `Idle` when finished or
    /// dropped, so every `Busy` ends exactly once.
    pub fn begin(&self, status_text: &str) -> Result<BusyGuard, ChatError> {
        self.transition(Phase::Busy, status_text)
            .map_err(|_| ChatError::Busy)?;
        Ok(BusyGuard {
            machine: self.clone(),
            released: false,
        })
    }

    /// Leave `Busy`, clearing the status text. Only the live guard calls
    /// this, so a release always belongs to the exchange in flight.
    fn complete(&self) -> Result<(), ChatError> {
        self.transition(Phase::Idle, "")
    }

    fn transition(&self, target: Phase, status_text: &str) -> Result<(), ChatError> {
        let mut state = self.lock();
        if state.phase.can_transition_to(&target) {
            tracing::debug!("Session state: {} -> {}", state.phase, target);
            state.phase = target;
            state.status_text = status_text.to_string();
            Ok(())
        } else {
            Err(ChatError::InvalidTransition {
                from: state.phase,
                to: target,
            })
        }
    }

    // The state is plain data, always left consistent, so a poisoned lock is
    // still safe to read and write.
    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Holds a session in `Busy` for the duration of one exchange.
#[derive(Debug)]
pub struct BusyGuard {
    machine: SessionStateMachine,
    released: bool,
}

impl BusyGuard {
    /// Return the session to `Idle`.
    pub fn finish(mut self) -> Result<(), ChatError> {
        self.released = true;
        self.machine.complete()
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        tracing::debug!("Exchange abandoned while busy; releasing session");
        if let Err(e) = self.machine.complete() {
            tracing::warn!(error = %e, "Failed to release busy session");
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_idle() {
        let sm = SessionStateMachine::new();
        assert_eq!(sm.current(), SessionState::default());
        assert!(!sm.is_busy());
    }

    #[test]
    fn test_valid_transitions() {
        assert!(Phase::Idle.can_transition_to(&Phase::Busy));
        assert!(Phase::Busy.can_transition_to(&Phase::Idle));
    }

    #[test]
    fn test_invalid_transitions() {
        assert!(!Phase::Idle.can_transition_to(&Phase::Idle));
        assert!(!Phase::Busy.can_transition_to(&Phase::Busy));
    }

    #[test]
    fn test_begin_sets_status_text() {
        let sm = SessionStateMachine::new();
        let guard = sm.begin("Thinking...").unwrap();
        let state = sm.current();
        assert_eq!(state.phase, Phase::Busy);
        assert_eq!(state.status_text, "Thinking...");
        guard.finish().unwrap();
    }

    #[test]
    fn test_finish_clears_status_text() {
        let sm = SessionStateMachine::new();
        let guard = sm.begin("Thinking...").unwrap();
        guard.finish().unwrap();
        assert_eq!(sm.current(), SessionState::default());
    }

    #[test]
    fn test_begin_while_busy_is_refused() {
        let sm = SessionStateMachine::new();
        let _guard = sm.begin("Thinking...").unwrap();
        let second = sm.begin("Again");
        assert!(matches!(second, Err(ChatError::Busy)));
        // The refused submission does not touch the status.
        assert_eq!(sm.current().status_text, "Thinking...");
    }

    #[test]
    fn test_complete_while_idle_is_invalid() {
        let sm = SessionStateMachine::new();
        let err = sm.complete().unwrap_err();
        assert!(matches!(
            err,
            ChatError::InvalidTransition {
                from: Phase::Idle,
                to: Phase::Idle
            }
        ));
    }

    #[test]
    fn test_dropped_guard_releases_session() {
        let sm = SessionStateMachine::new();
        {
            let _guard = sm.begin("Thinking...").unwrap();
            assert!(sm.is_busy());
        }
        assert!(!sm.is_busy());
        // And the session is usable again.
        sm.begin("next").unwrap().finish().unwrap();
    }

    #[test]
    fn test_finished_guard_does_not_release_twice() {
        let sm = SessionStateMachine::new();
        sm.begin("one").unwrap().finish().unwrap();
        let guard = sm.begin("two").unwrap();
        // Only the live guard's exchange is in flight.
        assert!(sm.is_busy());
        drop(guard);
        assert!(!sm.is_busy());
    }

    #[test]
    fn test_clone_shares_state() {
        let sm = SessionStateMachine::new();
        let observer = sm.clone();
        let guard = sm.begin("Thinking...").unwrap();
        assert!(observer.is_busy());
        guard.finish().unwrap();
        assert!(!observer.is_busy());
    }

    #[test]
    fn test_abandoned_exchange_cannot_release_the_next() {
        let sm = SessionStateMachine::new();
        let first = sm.begin("a").unwrap();
        drop(first);

        let second = sm.begin("b").unwrap();
        assert!(matches!(sm.begin("c"), Err(ChatError::Busy)));
        assert_eq!(sm.current().status_text, "b");

        second.finish().unwrap();
        assert_eq!(sm.phase(), Phase::Idle);
        sm.begin("d").unwrap().finish().unwrap();
    }

    #[test]
    fn test_concurrent_begin_admits_one() {
        use std::thread;

        let sm = SessionStateMachine::new();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let sm = sm.clone();
                thread::spawn(move || sm.begin("race").map(std::mem::forget).is_ok())
            })
            .collect();
        let admitted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(admitted, 1);
        assert!(sm.is_busy());
    }
}
