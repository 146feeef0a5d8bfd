use chrono::{Datelike, Utc};
use uuid::Uuid;

use crate::models::{Booking, Payment, PaymentStatus, PaymentType};

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("Partial payment requires a partial amount")]
    MissingPartialAmount,

    #[error("Full payment must not carry a partial amount")]
    UnexpectedPartialAmount,

    #[error("Partial amount {amount} must be between 1 and {selling_price}")]
    InvalidPartialAmount { amount: i64, selling_price: i64 },
}

/// Check the payment fields of a booking request: a partial payment
/// needs an advance strictly between zero and the selling price, a
/// full payment carries none.
pub fn validate_payment(
    payment_type: PaymentType,
    partial_amount: Option<i64>,
    selling_price: i64,
) -> Result<(), PaymentError> {
    match (payment_type, partial_amount) {
        (PaymentType::Full, None) => Ok(()),
        (PaymentType::Full, Some(_)) => Err(PaymentError::UnexpectedPartialAmount),
        (PaymentType::Partial, None) => Err(PaymentError::MissingPartialAmount),
        (PaymentType::Partial, Some(amount)) => {
            if amount <= 0 || amount >= selling_price {
                Err(PaymentError::InvalidPartialAmount {
                    amount,
                    selling_price,
                })
            } else {
                Ok(())
            }
        }
    }
}

/// The settlement row recorded when a booking is taken: the full price,
/// or the advance when the agent pays partially.
pub fn initial_payment(booking: &Booking, transaction_id: String, recorded_by: Uuid) -> Payment {
    let amount = match (booking.payment_type, booking.partial_amount) {
        (PaymentType::Partial, Some(advance)) => advance,
        _ => booking.selling_price,
    };

    Payment {
        id: Uuid::new_v4(),
        booking_id: booking.id,
        booking_reference: booking.reference.clone(),
        passenger_name: booking.passenger.name.clone(),
        amount,
        payment_method: booking.payment_method,
        payment_date: Utc::now(),
        status: PaymentStatus::Completed,
        transaction_id,
        recorded_by,
    }
}

/// Transaction ids follow the ledger book style: TXN-<year>-<sequence>.
pub fn transaction_id(sequence: u64) -> String {
    format!("TXN-{}-{:03}", Utc::now().year(), sequence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_booking;

    #[test]
    fn full_payment_needs_no_advance() {
        assert!(validate_payment(PaymentType::Full, None, 95_000).is_ok());
        assert!(matches!(
            validate_payment(PaymentType::Full, Some(10_000), 95_000),
            Err(PaymentError::UnexpectedPartialAmount)
        ));
    }

    #[test]
    fn partial_payment_bounds() {
        assert!(validate_payment(PaymentType::Partial, Some(30_000), 95_000).is_ok());
        assert!(matches!(
            validate_payment(PaymentType::Partial, None, 95_000),
            Err(PaymentError::MissingPartialAmount)
        ));
        assert!(matches!(
            validate_payment(PaymentType::Partial, Some(0), 95_000),
            Err(PaymentError::InvalidPartialAmount { .. })
        ));
        assert!(matches!(
            validate_payment(PaymentType::Partial, Some(95_000), 95_000),
            Err(PaymentError::InvalidPartialAmount { .. })
        ));
    }

    #[test]
    fn initial_payment_uses_advance_for_partial() {
        let mut booking = test_booking(Uuid::new_v4(), "BK002");
        booking.payment_type = PaymentType::Partial;
        booking.partial_amount = Some(30_000);

        let payment = initial_payment(&booking, transaction_id(7), Uuid::new_v4());
        assert_eq!(payment.amount, 30_000);
        assert_eq!(payment.booking_reference, "BK002");
        assert_eq!(payment.status, PaymentStatus::Completed);
        assert!(payment.transaction_id.starts_with("TXN-"));
        assert!(payment.transaction_id.ends_with("-007"));
    }

    #[test]
    fn initial_payment_uses_full_price_otherwise() {
        let booking = test_booking(Uuid::new_v4(), "BK003");
        let payment = initial_payment(&booking, transaction_id(1), Uuid::new_v4());
        assert_eq!(payment.amount, booking.selling_price);
    }
}
