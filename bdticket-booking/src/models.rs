use bdticket_shared::pii::Masked;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Booking lifecycle. Bookings always start `pending`; seats are held
/// on the ticket batch until the sale is confirmed or the booking is
/// cancelled.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookingStatus::Pending => write!(f, "pending"),
            BookingStatus::Confirmed => write!(f, "confirmed"),
            BookingStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    Full,
    Partial,
}

impl std::fmt::Display for PaymentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentType::Full => write!(f, "full"),
            PaymentType::Partial => write!(f, "partial"),
        }
    }
}

impl std::str::FromStr for PaymentType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(PaymentType::Full),
            "partial" => Ok(PaymentType::Partial),
            _ => Err(()),
        }
    }
}

/// Settlement channels the agency accepts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Bank,
    Bkash,
    Nagad,
    Rocket,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "cash"),
            PaymentMethod::Bank => write!(f, "bank"),
            PaymentMethod::Bkash => write!(f, "bkash"),
            PaymentMethod::Nagad => write!(f, "nagad"),
            PaymentMethod::Rocket => write!(f, "rocket"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(PaymentMethod::Cash),
            "bank" => Ok(PaymentMethod::Bank),
            "bkash" => Ok(PaymentMethod::Bkash),
            "nagad" => Ok(PaymentMethod::Nagad),
            "rocket" => Ok(PaymentMethod::Rocket),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Completed,
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Completed => write!(f, "completed"),
        }
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "completed" => Ok(PaymentStatus::Completed),
            _ => Err(()),
        }
    }
}

/// The agent who brought in the sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentInfo {
    pub name: String,
    pub phone: String,
    pub email: String,
}

/// Traveling party. Passport and phone are wrapped so debug logging
/// cannot leak them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassengerInfo {
    pub name: String,
    pub passport_no: Masked<String>,
    pub phone: Masked<String>,
    pub email: String,
    pub pax_count: i32,
}

/// A sale against a ticket batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub reference: String,
    pub ticket_id: Uuid,
    pub agent: AgentInfo,
    pub passenger: PassengerInfo,
    pub selling_price: i64,
    pub payment_type: PaymentType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partial_amount: Option<i64>,
    pub payment_method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    pub status: BookingStatus,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        reference: String,
        ticket_id: Uuid,
        agent: AgentInfo,
        passenger: PassengerInfo,
        selling_price: i64,
        payment_type: PaymentType,
        partial_amount: Option<i64>,
        payment_method: PaymentMethod,
        comments: Option<String>,
        created_by: Uuid,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            reference,
            ticket_id,
            agent,
            passenger,
            selling_price,
            payment_type,
            partial_amount,
            payment_method,
            comments,
            status: BookingStatus::Pending,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }

    /// Amount still owed by the agent. Zero once fully settled.
    pub fn outstanding_amount(&self) -> i64 {
        match self.payment_type {
            PaymentType::Full => 0,
            PaymentType::Partial => {
                (self.selling_price - self.partial_amount.unwrap_or(0)).max(0)
            }
        }
    }
}

/// A settlement record against a booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub booking_reference: String,
    pub passenger_name: String,
    pub amount: i64,
    pub payment_method: PaymentMethod,
    pub payment_date: DateTime<Utc>,
    pub status: PaymentStatus,
    pub transaction_id: String,
    pub recorded_by: Uuid,
}

/// Query parameters accepted by the booking listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingFilter {
    pub status: Option<BookingStatus>,
    pub search: Option<String>,
}

impl BookingFilter {
    pub fn matches(&self, booking: &Booking) -> bool {
        if let Some(status) = self.status {
            if booking.status != status {
                return false;
            }
        }

        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let hit = booking.reference.to_lowercase().contains(&needle)
                || booking.passenger.name.to_lowercase().contains(&needle)
                || booking.agent.name.to_lowercase().contains(&needle);
            if !hit {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
pub fn test_booking(ticket_id: Uuid, reference: &str) -> Booking {
    Booking::new(
        reference.to_string(),
        ticket_id,
        AgentInfo {
            name: "Sky Travel Agency".to_string(),
            phone: "+880-1666-777888".to_string(),
            email: "sky@example.com".to_string(),
        },
        PassengerInfo {
            name: "Ahmed Rahman".to_string(),
            passport_no: Masked("AB1234567".to_string()),
            phone: Masked("+880-1987-654321".to_string()),
            email: "ahmed@example.com".to_string(),
            pax_count: 1,
        },
        95_000,
        PaymentType::Full,
        None,
        PaymentMethod::Cash,
        None,
        Uuid::new_v4(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_booking_starts_pending() {
        let booking = test_booking(Uuid::new_v4(), "BK001");
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.outstanding_amount(), 0);
    }

    #[test]
    fn partial_booking_tracks_outstanding() {
        let mut booking = test_booking(Uuid::new_v4(), "BK002");
        booking.payment_type = PaymentType::Partial;
        booking.partial_amount = Some(30_000);
        assert_eq!(booking.outstanding_amount(), 65_000);
    }

    #[test]
    fn filter_matches_reference_and_names() {
        let booking = test_booking(Uuid::new_v4(), "BK007");

        let by_reference = BookingFilter {
            search: Some("bk007".to_string()),
            ..Default::default()
        };
        assert!(by_reference.matches(&booking));

        let by_passenger = BookingFilter {
            search: Some("rahman".to_string()),
            ..Default::default()
        };
        assert!(by_passenger.matches(&booking));

        let wrong_status = BookingFilter {
            status: Some(BookingStatus::Confirmed),
            ..Default::default()
        };
        assert!(!wrong_status.matches(&booking));
    }

    #[test]
    fn passenger_debug_never_shows_documents() {
        let booking = test_booking(Uuid::new_v4(), "BK003");
        let dump = format!("{:?}", booking.passenger);
        assert!(!dump.contains("AB1234567"));
        assert!(!dump.contains("654321"));
    }
}
