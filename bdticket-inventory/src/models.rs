use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle of a ticket batch. `locked` means at least one pending
/// booking is holding seats; `sold` means no seats are left.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    Available,
    Locked,
    Sold,
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TicketStatus::Available => write!(f, "available"),
            TicketStatus::Locked => write!(f, "locked"),
            TicketStatus::Sold => write!(f, "sold"),
        }
    }
}

impl std::str::FromStr for TicketStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(TicketStatus::Available),
            "locked" => Ok(TicketStatus::Locked),
            "sold" => Ok(TicketStatus::Sold),
            _ => Err(()),
        }
    }
}

/// A batch of seats bought from an airline for one flight. Seat counts
/// are tracked here; bookings draw them down.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: Uuid,
    pub airline_id: Uuid,
    pub country_id: Uuid,
    pub flight_number: String,
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    pub departure_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrival_time: Option<String>,
    pub buying_price: i64,
    pub selling_price: i64,
    pub total_seats: i32,
    pub available_seats: i32,
    pub status: TicketStatus,
    pub locked_until: Option<DateTime<Utc>>,
    pub batch_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Destination country for ticket batches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Country {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub flag: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Airline {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

/// Per-country seat totals for the countries overview.
#[derive(Debug, Clone, Serialize)]
pub struct CountryStats {
    pub code: String,
    pub name: String,
    pub flag: String,
    pub total_tickets: i64,
    pub available_tickets: i64,
}

/// Query parameters accepted by the ticket listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TicketFilter {
    pub search: Option<String>,
    pub status: Option<TicketStatus>,
    /// Destination country code, e.g. "UAE".
    pub destination: Option<String>,
}

impl TicketFilter {
    /// Matches a ticket against the filter. The ticket's destination
    /// country code is resolved by the caller since tickets only carry
    /// the country id.
    pub fn matches(&self, ticket: &Ticket, destination_code: Option<&str>) -> bool {
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let hit = ticket.flight_number.to_lowercase().contains(&needle)
                || ticket.origin.to_lowercase().contains(&needle)
                || ticket.destination.to_lowercase().contains(&needle);
            if !hit {
                return false;
            }
        }

        if let Some(status) = self.status {
            if ticket.status != status {
                return false;
            }
        }

        if let Some(wanted) = &self.destination {
            if wanted != "all" && destination_code != Some(wanted.as_str()) {
                return false;
            }
        }

        true
    }
}

/// Listing order: soonest departure first.
pub fn sort_by_departure(tickets: &mut [Ticket]) {
    tickets.sort_by(|a, b| {
        a.departure_date
            .cmp(&b.departure_date)
            .then_with(|| a.departure_time.cmp(&b.departure_time))
    });
}

/// Seat totals grouped by destination country.
pub fn country_stats(countries: &[Country], tickets: &[Ticket]) -> Vec<CountryStats> {
    countries
        .iter()
        .map(|country| {
            let mut total = 0i64;
            let mut available = 0i64;
            for ticket in tickets.iter().filter(|t| t.country_id == country.id) {
                total += ticket.total_seats as i64;
                available += ticket.available_seats as i64;
            }
            CountryStats {
                code: country.code.clone(),
                name: country.name.clone(),
                flag: country.flag.clone(),
                total_tickets: total,
                available_tickets: available,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::test_ticket;

    #[test]
    fn search_matches_flight_number_and_route() {
        let ticket = test_ticket("BG-1001", "DAC", "DXB");

        let by_flight = TicketFilter {
            search: Some("bg-10".to_string()),
            ..Default::default()
        };
        assert!(by_flight.matches(&ticket, None));

        let by_destination = TicketFilter {
            search: Some("dxb".to_string()),
            ..Default::default()
        };
        assert!(by_destination.matches(&ticket, None));

        let miss = TicketFilter {
            search: Some("jeddah".to_string()),
            ..Default::default()
        };
        assert!(!miss.matches(&ticket, None));
    }

    #[test]
    fn destination_filter_uses_country_code() {
        let ticket = test_ticket("EK-2002", "DAC", "DXB");

        let filter = TicketFilter {
            destination: Some("UAE".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&ticket, Some("UAE")));
        assert!(!filter.matches(&ticket, Some("KSA")));

        let all = TicketFilter {
            destination: Some("all".to_string()),
            ..Default::default()
        };
        assert!(all.matches(&ticket, Some("KSA")));
    }

    #[test]
    fn stats_sum_seats_per_country() {
        let country = Country {
            id: Uuid::new_v4(),
            name: "United Arab Emirates".to_string(),
            code: "UAE".to_string(),
            flag: "🇦🇪".to_string(),
        };
        let mut a = test_ticket("EK-2002", "DAC", "DXB");
        a.country_id = country.id;
        a.total_seats = 10;
        a.available_seats = 4;
        let mut b = test_ticket("FZ-0506", "CGP", "DXB");
        b.country_id = country.id;
        b.total_seats = 20;
        b.available_seats = 20;

        let stats = country_stats(&[country], &[a, b]);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].total_tickets, 30);
        assert_eq!(stats[0].available_tickets, 24);
    }
}
