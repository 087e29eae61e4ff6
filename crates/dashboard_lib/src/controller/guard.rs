use parking_lot::Mutex;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("{0} is already in progress")]
    InFlight(String),
    #[error("Invalid amount: {0}")]
    InvalidInput(String),
    #[error("Insufficient token balance!")]
    InsufficientBalance,
    #[error("Nothing to claim")]
    NothingToClaim,
    #[error("{0}")]
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionState {
    Idle,
    InFlight,
    Done { success: bool },
}

/// In-flight flag of a single button. Taking the ticket is synchronous,
/// so a second trigger is refused before the first one reaches any await.
#[derive(Debug)]
pub struct ActionGuard {
    name: &'static str,
    in_flight: AtomicBool,
    state: Mutex<ActionState>,
}

impl ActionGuard {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            in_flight: AtomicBool::new(false),
            state: Mutex::new(ActionState::Idle),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn try_begin(&self) -> Result<ActionTicket<'_>, ActionError> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ActionError::InFlight(self.name.to_string()))?;
        *self.state.lock() = ActionState::InFlight;
        Ok(ActionTicket {
            guard: self,
            success: false,
        })
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn state(&self) -> ActionState {
        *self.state.lock()
    }
}

/// Releases the guard when dropped; the action counts as failed unless [`ActionTicket::succeeded`] was called
#[derive(Debug)]
pub struct ActionTicket<'a> {
    guard: &'a ActionGuard,
    success: bool,
}

impl ActionTicket<'_> {
    pub fn succeeded(&mut self) {
        self.success = true;
    }
}

impl Drop for ActionTicket<'_> {
    fn drop(&mut self) {
        *self.guard.state.lock() = ActionState::Done {
            success: self.success,
        };
        self.guard.in_flight.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_trigger_refused() {
        let guard = ActionGuard::new("stake");
        assert_eq!(guard.state(), ActionState::Idle);

        let mut ticket = guard.try_begin().unwrap();
        assert!(guard.is_in_flight());
        assert_eq!(
            guard.try_begin().unwrap_err(),
            ActionError::InFlight("stake".to_string())
        );
        ticket.succeeded();
        drop(ticket);

        assert!(!guard.is_in_flight());
        assert_eq!(guard.state(), ActionState::Done { success: true });
    }

    #[test]
    fn test_released_on_failure() {
        let guard = ActionGuard::new("claim");
        {
            let _ticket = guard.try_begin().unwrap();
        }
        assert_eq!(guard.state(), ActionState::Done { success: false });
        assert!(guard.try_begin().is_ok());
    }
}
