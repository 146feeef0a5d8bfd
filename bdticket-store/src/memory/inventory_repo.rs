use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use bdticket_core::repository::{AirlineRepository, CountryRepository, TicketRepository};
use bdticket_inventory::{Airline, Country, Ticket};

use super::MemoryStore;

type RepoError = Box<dyn std::error::Error + Send + Sync>;

#[async_trait]
impl TicketRepository for MemoryStore {
    async fn list_tickets(&self) -> Result<Vec<Ticket>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.tickets.values().cloned().collect())
    }

    async fn get_ticket(&self, id: Uuid) -> Result<Option<Ticket>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.tickets.get(&id).cloned())
    }

    async fn create_ticket(&self, ticket: &Ticket) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.tickets.insert(ticket.id, ticket.clone());
        Ok(())
    }

    async fn create_tickets(&self, tickets: &[Ticket]) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        for ticket in tickets {
            tables.tickets.insert(ticket.id, ticket.clone());
        }
        Ok(())
    }

    async fn update_ticket(&self, ticket: &Ticket) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.tickets.insert(ticket.id, ticket.clone());
        Ok(())
    }

    async fn delete_ticket(&self, id: Uuid) -> Result<bool, RepoError> {
        let mut tables = self.tables.write().await;
        Ok(tables.tickets.remove(&id).is_some())
    }

    async fn expired_locks(&self, now: DateTime<Utc>) -> Result<Vec<Ticket>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .tickets
            .values()
            .filter(|t| t.is_lock_expired(now))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CountryRepository for MemoryStore {
    async fn list_countries(&self) -> Result<Vec<Country>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.countries.clone())
    }

    async fn create_country(&self, country: &Country) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.countries.push(country.clone());
        Ok(())
    }
}

#[async_trait]
impl AirlineRepository for MemoryStore {
    async fn list_airlines(&self) -> Result<Vec<Airline>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.airlines.clone())
    }

    async fn create_airline(&self, airline: &Airline) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.airlines.push(airline.clone());
        Ok(())
    }
}
