//! In-memory backend. Runs the whole API on the seeded demo dataset
//! without external services; integration tests run against it.

mod admin_repo;
mod booking_repo;
mod inventory_repo;
mod umrah_repo;

use std::collections::HashMap;

use tokio::sync::RwLock;
use uuid::Uuid;

use bdticket_booking::{Booking, Payment};
use bdticket_core::auth::User;
use bdticket_inventory::{Airline, Country, Ticket};
use bdticket_shared::{ActivityLog, SettingsDocument};
use bdticket_umrah::{UmrahBooking, UmrahPackage};

use crate::seed::SeedData;

pub(crate) struct Tables {
    pub tickets: HashMap<Uuid, Ticket>,
    pub bookings: HashMap<Uuid, Booking>,
    pub payments: Vec<Payment>,
    pub countries: Vec<Country>,
    pub airlines: Vec<Airline>,
    pub packages: HashMap<Uuid, UmrahPackage>,
    pub group_bookings: HashMap<Uuid, UmrahBooking>,
    pub activity: Vec<ActivityLog>,
    pub users: Vec<User>,
    pub settings: SettingsDocument,
}

pub struct MemoryStore {
    pub(crate) tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables {
                tickets: HashMap::new(),
                bookings: HashMap::new(),
                payments: Vec::new(),
                countries: Vec::new(),
                airlines: Vec::new(),
                packages: HashMap::new(),
                group_bookings: HashMap::new(),
                activity: Vec::new(),
                users: Vec::new(),
                settings: SettingsDocument::default(),
            }),
        }
    }

    pub fn with_demo_data() -> Self {
        Self::from_seed(SeedData::demo())
    }

    pub fn from_seed(seed: SeedData) -> Self {
        Self {
            tables: RwLock::new(Tables {
                tickets: seed.tickets.into_iter().map(|t| (t.id, t)).collect(),
                bookings: seed.bookings.into_iter().map(|b| (b.id, b)).collect(),
                payments: seed.payments,
                countries: seed.countries,
                airlines: seed.airlines,
                packages: seed.packages.into_iter().map(|p| (p.id, p)).collect(),
                group_bookings: seed.group_bookings.into_iter().map(|b| (b.id, b)).collect(),
                activity: seed.activity,
                users: seed.users,
                settings: seed.settings,
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}
