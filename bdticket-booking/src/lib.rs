pub mod finance;
pub mod lifecycle;
pub mod models;
pub mod payments;

pub use lifecycle::{BookingError, SeatEffect};
pub use models::{
    AgentInfo, Booking, BookingFilter, BookingStatus, PassengerInfo, Payment, PaymentMethod,
    PaymentStatus, PaymentType,
};
pub use payments::PaymentError;
