// In-memory movie ticket booking engine

pub mod allocator;
pub mod catalog;
pub mod config;
pub mod error;
pub mod ledger;
pub mod models;
pub mod payment;
pub mod seed;

// Re-export key types for convenience
pub use allocator::{BookingStats, MovieBookingSystem, TicketBooking};
pub use catalog::{ShowCatalog, Theatre};
pub use config::{BookingConfig, FareTable};
pub use error::BookingError;
pub use ledger::BookingLedger;
pub use models::{Booking, City, Movie, Screen, Seat, SeatCategory, SeatView, Show, User};
pub use payment::{PaymentGateway, PaymentReceipt, RecordingPayment};
