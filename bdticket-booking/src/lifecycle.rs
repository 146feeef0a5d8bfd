use chrono::Utc;

use crate::models::{Booking, BookingStatus};

/// What the caller must do to the seat ledger after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatEffect {
    /// Same-state update, nothing to do.
    None,
    /// Sale confirmed: the reservation becomes permanent.
    Commit,
    /// Booking cancelled: seats go back to the batch.
    Release,
}

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },
}

/// Apply a guarded status transition. Allowed moves:
/// pending → confirmed, pending → cancelled, confirmed → cancelled.
/// Same-state updates are idempotent no-ops; everything else is
/// rejected. A cancelled booking is final.
pub fn apply_transition(
    booking: &mut Booking,
    to: BookingStatus,
) -> Result<SeatEffect, BookingError> {
    use BookingStatus::*;

    let effect = match (booking.status, to) {
        (from, to) if from == to => return Ok(SeatEffect::None),
        (Pending, Confirmed) => SeatEffect::Commit,
        (Pending, Cancelled) => SeatEffect::Release,
        (Confirmed, Cancelled) => SeatEffect::Release,
        (from, to) => return Err(BookingError::InvalidTransition { from, to }),
    };

    booking.status = to;
    booking.updated_at = Utc::now();
    Ok(effect)
}
