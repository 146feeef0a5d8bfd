//! Demo dataset used by the in-memory backend and for first-run
//! Postgres seeding. Ids are fixed so reseeding is stable; dates are
//! relative so the data always looks current.
//!
//! Seat counts, ticket statuses and holds are kept consistent with the
//! seeded bookings: BK001 holds 2 seats of the Emirates batch, BK003
//! holds 3 seats of the Turkish batch, the Saudia batch is sold out.

use chrono::{Datelike, Duration, Utc};
use uuid::Uuid;

use bdticket_booking::{
    AgentInfo, Booking, BookingStatus, PassengerInfo, Payment, PaymentMethod, PaymentStatus,
    PaymentType,
};
use bdticket_core::auth::{Role, User, UserStatus};
use bdticket_inventory::{Airline, Country, Ticket, TicketStatus};
use bdticket_shared::{ActivityLog, Masked, SettingsDocument};
use bdticket_umrah::{
    GroupBookingStatus, GroupLeader, PackageStatus, PackageType, UmrahBooking, UmrahPackage,
};

pub struct SeedData {
    pub users: Vec<User>,
    pub countries: Vec<Country>,
    pub airlines: Vec<Airline>,
    pub tickets: Vec<Ticket>,
    pub bookings: Vec<Booking>,
    pub payments: Vec<Payment>,
    pub packages: Vec<UmrahPackage>,
    pub group_bookings: Vec<UmrahBooking>,
    pub activity: Vec<ActivityLog>,
    pub settings: SettingsDocument,
}

fn fixed(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

impl SeedData {
    pub fn demo() -> Self {
        let now = Utc::now();
        let year = now.year();

        let users = vec![
            User {
                id: fixed(0x0001),
                username: "admin".to_string(),
                name: "Admin User".to_string(),
                email: "admin@bdticket.com".to_string(),
                role: Role::Admin,
                status: UserStatus::Active,
                created_at: now - Duration::days(400),
            },
            User {
                id: fixed(0x0002),
                username: "manager".to_string(),
                name: "Manager User".to_string(),
                email: "manager@bdticket.com".to_string(),
                role: Role::Manager,
                status: UserStatus::Active,
                created_at: now - Duration::days(300),
            },
            User {
                id: fixed(0x0003),
                username: "staff".to_string(),
                name: "Staff User".to_string(),
                email: "staff@bdticket.com".to_string(),
                role: Role::Staff,
                status: UserStatus::Active,
                created_at: now - Duration::days(200),
            },
        ];

        let countries = vec![
            country(0x1001, "Saudi Arabia", "KSA", "🇸🇦"),
            country(0x1002, "United Arab Emirates", "UAE", "🇦🇪"),
            country(0x1003, "Qatar", "QAT", "🇶🇦"),
            country(0x1004, "Kuwait", "KWT", "🇰🇼"),
            country(0x1005, "Oman", "OMN", "🇴🇲"),
            country(0x1006, "Bahrain", "BHR", "🇧🇭"),
            country(0x1007, "Malaysia", "MYS", "🇲🇾"),
            country(0x1008, "Singapore", "SGP", "🇸🇬"),
            country(0x1009, "Thailand", "THA", "🇹🇭"),
            country(0x100A, "Turkey", "TUR", "🇹🇷"),
        ];

        let airlines = vec![
            airline(0x2001, "Biman Bangladesh Airlines", "BG"),
            airline(0x2002, "Emirates", "EK"),
            airline(0x2003, "Qatar Airways", "QR"),
            airline(0x2004, "Turkish Airlines", "TK"),
            airline(0x2005, "Saudia", "SV"),
            airline(0x2006, "AirAsia", "AK"),
            airline(0x2007, "Malaysia Airlines", "MH"),
            airline(0x2008, "Singapore Airlines", "SQ"),
            airline(0x2009, "Thai Airways", "TG"),
            airline(0x200A, "flydubai", "FZ"),
        ];

        let tickets = vec![
            Ticket {
                id: fixed(0x3001),
                airline_id: fixed(0x2001),
                country_id: fixed(0x1001),
                flight_number: "BG-147".to_string(),
                origin: "DAC".to_string(),
                destination: "JED".to_string(),
                departure_date: (now + Duration::days(14)).date_naive(),
                departure_time: "02:30".to_string(),
                arrival_time: Some("06:45".to_string()),
                buying_price: 85_000,
                selling_price: 95_000,
                total_seats: 10,
                available_seats: 10,
                status: TicketStatus::Available,
                locked_until: None,
                batch_number: "BATCH-2024-001".to_string(),
                notes: None,
                created_by: fixed(0x0001),
                created_at: now - Duration::days(12),
                updated_at: now - Duration::days(12),
            },
            Ticket {
                id: fixed(0x3002),
                airline_id: fixed(0x2002),
                country_id: fixed(0x1002),
                flight_number: "EK-585".to_string(),
                origin: "DAC".to_string(),
                destination: "DXB".to_string(),
                departure_date: (now + Duration::days(7)).date_naive(),
                departure_time: "10:15".to_string(),
                arrival_time: Some("14:30".to_string()),
                buying_price: 80_000,
                selling_price: 90_000,
                total_seats: 20,
                available_seats: 18,
                status: TicketStatus::Locked,
                locked_until: Some(now + Duration::minutes(30)),
                batch_number: "BATCH-2024-002".to_string(),
                notes: None,
                created_by: fixed(0x0001),
                created_at: now - Duration::days(9),
                updated_at: now - Duration::hours(2),
            },
            Ticket {
                id: fixed(0x3003),
                airline_id: fixed(0x2003),
                country_id: fixed(0x1003),
                flight_number: "QR-639".to_string(),
                origin: "DAC".to_string(),
                destination: "DOH".to_string(),
                departure_date: (now + Duration::days(21)).date_naive(),
                departure_time: "18:40".to_string(),
                arrival_time: Some("22:10".to_string()),
                buying_price: 88_000,
                selling_price: 98_000,
                total_seats: 15,
                available_seats: 15,
                status: TicketStatus::Available,
                locked_until: None,
                batch_number: "BATCH-2024-003".to_string(),
                notes: None,
                created_by: fixed(0x0001),
                created_at: now - Duration::days(8),
                updated_at: now - Duration::days(2),
            },
            Ticket {
                id: fixed(0x3004),
                airline_id: fixed(0x2005),
                country_id: fixed(0x1001),
                flight_number: "SV-803".to_string(),
                origin: "DAC".to_string(),
                destination: "RUH".to_string(),
                departure_date: (now + Duration::days(10)).date_naive(),
                departure_time: "08:20".to_string(),
                arrival_time: Some("12:05".to_string()),
                buying_price: 78_000,
                selling_price: 88_000,
                total_seats: 10,
                available_seats: 0,
                status: TicketStatus::Sold,
                locked_until: None,
                batch_number: "BATCH-2024-004".to_string(),
                notes: None,
                created_by: fixed(0x0001),
                created_at: now - Duration::days(20),
                updated_at: now - Duration::hours(1),
            },
            Ticket {
                id: fixed(0x3005),
                airline_id: fixed(0x2004),
                country_id: fixed(0x100A),
                flight_number: "TK-713".to_string(),
                origin: "DAC".to_string(),
                destination: "IST".to_string(),
                departure_date: (now + Duration::days(28)).date_naive(),
                departure_time: "06:00".to_string(),
                arrival_time: Some("12:35".to_string()),
                buying_price: 92_000,
                selling_price: 105_000,
                total_seats: 12,
                available_seats: 9,
                status: TicketStatus::Locked,
                locked_until: Some(now + Duration::minutes(45)),
                batch_number: "BATCH-2024-005".to_string(),
                notes: None,
                created_by: fixed(0x0001),
                created_at: now - Duration::days(5),
                updated_at: now - Duration::minutes(30),
            },
            Ticket {
                id: fixed(0x3006),
                airline_id: fixed(0x2007),
                country_id: fixed(0x1007),
                flight_number: "MH-197".to_string(),
                origin: "DAC".to_string(),
                destination: "KUL".to_string(),
                departure_date: (now + Duration::days(35)).date_naive(),
                departure_time: "23:45".to_string(),
                arrival_time: Some("05:50".to_string()),
                buying_price: 52_000,
                selling_price: 61_000,
                total_seats: 25,
                available_seats: 25,
                status: TicketStatus::Available,
                locked_until: None,
                batch_number: "BATCH-2024-006".to_string(),
                notes: Some("Group fare block".to_string()),
                created_by: fixed(0x0001),
                created_at: now - Duration::days(3),
                updated_at: now - Duration::days(3),
            },
        ];

        let bookings = vec![
            Booking {
                id: fixed(0x4001),
                reference: "BK001".to_string(),
                ticket_id: fixed(0x3002),
                agent: AgentInfo {
                    name: "Dhaka Travels".to_string(),
                    phone: "+8801712345678".to_string(),
                    email: "info@dhakatravels.com".to_string(),
                },
                passenger: PassengerInfo {
                    name: "Ahmed Hassan".to_string(),
                    passport_no: Masked("A1234567".to_string()),
                    phone: Masked("+8801811111111".to_string()),
                    email: "ahmed.hassan@example.com".to_string(),
                    pax_count: 2,
                },
                selling_price: 180_000,
                payment_type: PaymentType::Full,
                partial_amount: None,
                payment_method: PaymentMethod::Cash,
                comments: Some("Visa already issued".to_string()),
                status: BookingStatus::Pending,
                created_by: fixed(0x0003),
                created_at: now - Duration::hours(2),
                updated_at: now - Duration::hours(2),
            },
            Booking {
                id: fixed(0x4002),
                reference: "BK002".to_string(),
                ticket_id: fixed(0x3004),
                agent: AgentInfo {
                    name: "Chittagong Air Services".to_string(),
                    phone: "+8801819876543".to_string(),
                    email: "sales@ctgair.com".to_string(),
                },
                passenger: PassengerInfo {
                    name: "Fatima Khan".to_string(),
                    passport_no: Masked("B2345678".to_string()),
                    phone: Masked("+8801822222222".to_string()),
                    email: "fatima.khan@example.com".to_string(),
                    pax_count: 1,
                },
                selling_price: 88_000,
                payment_type: PaymentType::Full,
                partial_amount: None,
                payment_method: PaymentMethod::Bank,
                comments: None,
                status: BookingStatus::Confirmed,
                created_by: fixed(0x0002),
                created_at: now - Duration::hours(1),
                updated_at: now - Duration::minutes(40),
            },
            Booking {
                id: fixed(0x4003),
                reference: "BK003".to_string(),
                ticket_id: fixed(0x3005),
                agent: AgentInfo {
                    name: "Sylhet Hajj Kafela".to_string(),
                    phone: "+8801715551234".to_string(),
                    email: "contact@sylhetkafela.com".to_string(),
                },
                passenger: PassengerInfo {
                    name: "Mohammad Ali".to_string(),
                    passport_no: Masked("C3456789".to_string()),
                    phone: Masked("+8801833333333".to_string()),
                    email: "m.ali@example.com".to_string(),
                    pax_count: 3,
                },
                selling_price: 315_000,
                payment_type: PaymentType::Partial,
                partial_amount: Some(100_000),
                payment_method: PaymentMethod::Bkash,
                comments: Some("Family of three, window seats requested".to_string()),
                status: BookingStatus::Pending,
                created_by: fixed(0x0003),
                created_at: now - Duration::minutes(30),
                updated_at: now - Duration::minutes(30),
            },
            Booking {
                id: fixed(0x4004),
                reference: "BK004".to_string(),
                ticket_id: fixed(0x3003),
                agent: AgentInfo {
                    name: "Dhaka Travels".to_string(),
                    phone: "+8801712345678".to_string(),
                    email: "info@dhakatravels.com".to_string(),
                },
                passenger: PassengerInfo {
                    name: "Zainab Hossain".to_string(),
                    passport_no: Masked("D4567890".to_string()),
                    phone: Masked("+8801844444444".to_string()),
                    email: "zainab.h@example.com".to_string(),
                    pax_count: 1,
                },
                selling_price: 98_000,
                payment_type: PaymentType::Full,
                partial_amount: None,
                payment_method: PaymentMethod::Nagad,
                comments: None,
                status: BookingStatus::Cancelled,
                created_by: fixed(0x0003),
                created_at: now - Duration::days(2),
                updated_at: now - Duration::days(1),
            },
        ];

        let payments = vec![
            Payment {
                id: fixed(0x5001),
                booking_id: fixed(0x4001),
                booking_reference: "BK001".to_string(),
                passenger_name: "Ahmed Hassan".to_string(),
                amount: 180_000,
                payment_method: PaymentMethod::Cash,
                payment_date: now - Duration::hours(2),
                status: PaymentStatus::Completed,
                transaction_id: format!("TXN-{year}-001"),
                recorded_by: fixed(0x0003),
            },
            Payment {
                id: fixed(0x5002),
                booking_id: fixed(0x4002),
                booking_reference: "BK002".to_string(),
                passenger_name: "Fatima Khan".to_string(),
                amount: 88_000,
                payment_method: PaymentMethod::Bank,
                payment_date: now - Duration::hours(1),
                status: PaymentStatus::Completed,
                transaction_id: format!("TXN-{year}-002"),
                recorded_by: fixed(0x0002),
            },
            Payment {
                id: fixed(0x5003),
                booking_id: fixed(0x4003),
                booking_reference: "BK003".to_string(),
                passenger_name: "Mohammad Ali".to_string(),
                amount: 100_000,
                payment_method: PaymentMethod::Bkash,
                payment_date: now - Duration::minutes(30),
                status: PaymentStatus::Completed,
                transaction_id: format!("TXN-{year}-003"),
                recorded_by: fixed(0x0003),
            },
        ];

        let packages = vec![
            UmrahPackage {
                id: fixed(0x6001),
                package_name: "Standard Umrah".to_string(),
                package_type: PackageType::Standard,
                duration_days: 7,
                makkah_hotel: "Al Noor Hotel".to_string(),
                madinah_hotel: "Al Hana Hotel".to_string(),
                makkah_nights: 4,
                madinah_nights: 3,
                departure_date: (now + Duration::days(30)).date_naive(),
                return_date: (now + Duration::days(37)).date_naive(),
                total_seats: 30,
                available_seats: 5,
                package_price: 85_000,
                status: PackageStatus::Active,
                airline_id: fixed(0x2001),
                created_at: now - Duration::days(40),
            },
            UmrahPackage {
                id: fixed(0x6002),
                package_name: "Premium Umrah".to_string(),
                package_type: PackageType::Premium,
                duration_days: 10,
                makkah_hotel: "Pullman Zamzam Makkah".to_string(),
                madinah_hotel: "Pullman Madinah".to_string(),
                makkah_nights: 6,
                madinah_nights: 4,
                departure_date: (now + Duration::days(45)).date_naive(),
                return_date: (now + Duration::days(55)).date_naive(),
                total_seats: 20,
                available_seats: 8,
                package_price: 125_000,
                status: PackageStatus::Active,
                airline_id: fixed(0x2002),
                created_at: now - Duration::days(35),
            },
            UmrahPackage {
                id: fixed(0x6003),
                package_name: "VIP Umrah".to_string(),
                package_type: PackageType::Vip,
                duration_days: 12,
                makkah_hotel: "Swissotel Al Maqam Makkah".to_string(),
                madinah_hotel: "InterContinental Madinah".to_string(),
                makkah_nights: 7,
                madinah_nights: 5,
                departure_date: (now + Duration::days(60)).date_naive(),
                return_date: (now + Duration::days(72)).date_naive(),
                total_seats: 15,
                available_seats: 15,
                package_price: 180_000,
                status: PackageStatus::Active,
                airline_id: fixed(0x2003),
                created_at: now - Duration::days(30),
            },
        ];

        let group_bookings = vec![
            UmrahBooking {
                id: fixed(0x7001),
                package_id: fixed(0x6001),
                group_leader: GroupLeader {
                    name: "Sheikh Ahmed".to_string(),
                    phone: Masked("+8801712340001".to_string()),
                    email: "sheikh.ahmed@example.com".to_string(),
                },
                number_of_pilgrims: 25,
                total_amount: 2_125_000,
                booking_reference: "UMH-2024-001".to_string(),
                status: GroupBookingStatus::Confirmed,
                created_at: now - Duration::days(10),
            },
            UmrahBooking {
                id: fixed(0x7002),
                package_id: fixed(0x6002),
                group_leader: GroupLeader {
                    name: "Maulvi Hassan".to_string(),
                    phone: Masked("+8801722340002".to_string()),
                    email: "maulvi.hassan@example.com".to_string(),
                },
                number_of_pilgrims: 12,
                total_amount: 1_500_000,
                booking_reference: "UMH-2024-002".to_string(),
                status: GroupBookingStatus::Pending,
                created_at: now - Duration::days(5),
            },
        ];

        let activity = vec![
            ActivityLog {
                id: fixed(0x8001),
                user_id: fixed(0x0003),
                action: "booking_created".to_string(),
                description: "New booking created for Mohammad Ali".to_string(),
                booking_id: Some(fixed(0x4003)),
                created_at: now - Duration::minutes(30),
            },
            ActivityLog {
                id: fixed(0x8002),
                user_id: fixed(0x0002),
                action: "booking_confirmed".to_string(),
                description: "Booking BK002 confirmed".to_string(),
                booking_id: Some(fixed(0x4002)),
                created_at: now - Duration::minutes(40),
            },
            ActivityLog {
                id: fixed(0x8003),
                user_id: fixed(0x0002),
                action: "payment_received".to_string(),
                description: "Payment received for booking BK002".to_string(),
                booking_id: Some(fixed(0x4002)),
                created_at: now - Duration::hours(1),
            },
            ActivityLog {
                id: fixed(0x8004),
                user_id: fixed(0x0001),
                action: "ticket_purchased".to_string(),
                description: "Bulk ticket purchase of 25 tickets".to_string(),
                booking_id: None,
                created_at: now - Duration::days(3),
            },
            ActivityLog {
                id: fixed(0x8005),
                user_id: fixed(0x0001),
                action: "report_generated".to_string(),
                description: "Sales report generated for the month".to_string(),
                booking_id: None,
                created_at: now - Duration::hours(2),
            },
        ];

        SeedData {
            users,
            countries,
            airlines,
            tickets,
            bookings,
            payments,
            packages,
            group_bookings,
            activity,
            settings: SettingsDocument::default(),
        }
    }
}

fn country(id: u128, name: &str, code: &str, flag: &str) -> Country {
    Country {
        id: fixed(id),
        name: name.to_string(),
        code: code.to_string(),
        flag: flag.to_string(),
    }
}

fn airline(id: u128, name: &str, code: &str) -> Airline {
    Airline {
        id: fixed(id),
        name: name.to_string(),
        code: code.to_string(),
        logo_url: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_seat_counts_stay_within_capacity() {
        let seed = SeedData::demo();
        for ticket in &seed.tickets {
            assert!(ticket.available_seats >= 0);
            assert!(ticket.available_seats <= ticket.total_seats);
            if ticket.status == TicketStatus::Sold {
                assert_eq!(ticket.available_seats, 0);
            }
        }
        for package in &seed.packages {
            assert!(package.available_seats >= 0);
            assert!(package.available_seats <= package.total_seats);
        }
    }

    #[test]
    fn seeded_references_line_up() {
        let seed = SeedData::demo();
        for payment in &seed.payments {
            let booking = seed
                .bookings
                .iter()
                .find(|b| b.id == payment.booking_id)
                .unwrap();
            assert_eq!(booking.reference, payment.booking_reference);
        }
        for booking in &seed.bookings {
            assert!(seed.tickets.iter().any(|t| t.id == booking.ticket_id));
        }
        for group in &seed.group_bookings {
            assert!(seed.packages.iter().any(|p| p.id == group.package_id));
        }
    }
}
