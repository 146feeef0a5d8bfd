pub mod intake;
pub mod models;
pub mod seats;

pub use intake::{BulkIntake, IntakeError, NewTicket};
pub use models::{
    country_stats, sort_by_departure, Airline, Country, CountryStats, Ticket, TicketFilter,
    TicketStatus,
};
pub use seats::SeatError;
