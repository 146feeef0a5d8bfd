use async_trait::async_trait;
use uuid::Uuid;

use bdticket_core::repository::UmrahRepository;
use bdticket_umrah::{UmrahBooking, UmrahPackage};

use super::MemoryStore;

type RepoError = Box<dyn std::error::Error + Send + Sync>;

#[async_trait]
impl UmrahRepository for MemoryStore {
    async fn list_packages(&self) -> Result<Vec<UmrahPackage>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.packages.values().cloned().collect())
    }

    async fn get_package(&self, id: Uuid) -> Result<Option<UmrahPackage>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.packages.get(&id).cloned())
    }

    async fn create_package(&self, package: &UmrahPackage) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.packages.insert(package.id, package.clone());
        Ok(())
    }

    async fn update_package(&self, package: &UmrahPackage) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.packages.insert(package.id, package.clone());
        Ok(())
    }

    async fn list_group_bookings(&self) -> Result<Vec<UmrahBooking>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.group_bookings.values().cloned().collect())
    }

    async fn get_group_booking(&self, id: Uuid) -> Result<Option<UmrahBooking>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.group_bookings.get(&id).cloned())
    }

    async fn create_group_booking(
        &self,
        booking: &UmrahBooking,
        package: &UmrahPackage,
    ) -> Result<(), RepoError> {
        // Single write lock, so the group and pilgrim seats land together.
        let mut tables = self.tables.write().await;
        tables.group_bookings.insert(booking.id, booking.clone());
        tables.packages.insert(package.id, package.clone());
        Ok(())
    }

    async fn update_group_booking(
        &self,
        booking: &UmrahBooking,
        package: &UmrahPackage,
    ) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.group_bookings.insert(booking.id, booking.clone());
        tables.packages.insert(package.id, package.clone());
        Ok(())
    }
}
