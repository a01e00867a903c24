//! Two-phase rental action.
//!
//! Views drive a rental through [`RentalFlow`] so they can show a spinner
//! while the grant is recorded and the outcome afterwards:
//!
//! ```text
//! Idle ──submit──▶ Pending ──▶ Succeeded(rental)
//!                         └──▶ Failed(message)
//! ```
//!
//! `reset` returns to `Idle` from any settled state.

use std::sync::{Mutex, PoisonError};

use bookhub_core::{BookId, Rental, UserId};

use super::{Clock, RentalError, RentalManager, RentalStore};
use crate::notify::Notifier;

/// State of a rental action.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ActionState {
    #[default]
    Idle,
    Pending,
    Succeeded(Rental),
    Failed(String),
}

/// Observable rental action. Shared by reference between the task that
/// submits and the view that renders it.
#[derive(Debug, Default)]
pub struct RentalFlow {
    state: Mutex<ActionState>,
}

impl RentalFlow {
    /// A flow in the `Idle` state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> ActionState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether a submission is in progress.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(
            *self.state.lock().unwrap_or_else(PoisonError::into_inner),
            ActionState::Pending
        )
    }

    /// Run a rental through `manager`, moving to `Pending` and then to the
    /// outcome.
    ///
    /// # Errors
    ///
    /// Returns `RentalError::AlreadyInFlight` without touching the state if
    /// this flow is already pending; otherwise whatever
    /// [`RentalManager::rent`] returns.
    pub async fn submit<R, C, N>(
        &self,
        manager: &RentalManager<R, C, N>,
        user: Option<&UserId>,
        book_id: &BookId,
        plan: &str,
    ) -> Result<Rental, RentalError>
    where
        R: RentalStore,
        C: Clock,
        N: Notifier,
    {
        {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            if *state == ActionState::Pending {
                return Err(RentalError::AlreadyInFlight);
            }
            *state = ActionState::Pending;
        }

        let result = manager.rent(user, book_id, plan).await;

        let settled = match &result {
            Ok(rental) => ActionState::Succeeded(rental.clone()),
            Err(e) => ActionState::Failed(e.to_string()),
        };
        self.set(settled);
        result
    }

    /// Back to `Idle`. Has no effect while pending.
    pub fn reset(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if *state != ActionState::Pending {
            *state = ActionState::Idle;
        }
    }

    fn set(&self, next: ActionState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = next;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::notify::MemoryNotifier;
    use crate::rentals::{FixedClock, MemoryRentalStore};

    fn manager() -> RentalManager<MemoryRentalStore, FixedClock, MemoryNotifier> {
        RentalManager::new(
            MemoryRentalStore::new(),
            FixedClock::new(Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap()),
            MemoryNotifier::new(),
        )
    }

    #[tokio::test]
    async fn test_success_then_reset() {
        let manager = manager();
        let flow = RentalFlow::new();
        assert_eq!(flow.state(), ActionState::Idle);

        let rental = flow
            .submit(&manager, Some(&UserId::new("u1")), &BookId::new("b"), "1_month")
            .await
            .unwrap();
        assert_eq!(flow.state(), ActionState::Succeeded(rental));

        flow.reset();
        assert_eq!(flow.state(), ActionState::Idle);
    }

    #[tokio::test]
    async fn test_failure_records_message() {
        let manager = manager();
        let flow = RentalFlow::new();

        let result = flow
            .submit(&manager, None, &BookId::new("b"), "1_month")
            .await;
        assert!(result.is_err());
        assert_eq!(
            flow.state(),
            ActionState::Failed("Please log in to rent books".to_owned())
        );
        assert!(!flow.is_pending());
    }

    #[tokio::test]
    async fn test_submit_while_pending_is_rejected() {
        let manager = manager();
        let flow = RentalFlow::new();
        flow.set(ActionState::Pending);

        let result = flow
            .submit(&manager, Some(&UserId::new("u1")), &BookId::new("b"), "1_year")
            .await;
        assert!(matches!(result, Err(RentalError::AlreadyInFlight)));
        assert!(flow.is_pending());

        flow.reset();
        assert!(flow.is_pending());
    }
}
