// Domain records for the booking engine: seats, screens, shows and bookings

use std::{
    collections::HashSet,
    fmt,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::BookingError;

// Price tier attached to a seat when the screen is set up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SeatCategory {
    Silver,
    Gold,
    Platinum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum City {
    Bangalore,
    Hyderabad,
    Chennai,
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            City::Bangalore => "Bangalore",
            City::Hyderabad => "Hyderabad",
            City::Chennai => "Chennai",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct User {
    pub id: String,
    pub name: String,
}

impl User {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

// A physical seat. The booked flag is the only mutable part and is owned by the allocator.
#[derive(Debug)]
pub struct Seat {
    id: u32,
    category: SeatCategory,
    booked: AtomicBool,
}

impl Seat {
    pub fn new(id: u32, category: SeatCategory) -> Self {
        Self {
            id,
            category,
            booked: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn category(&self) -> SeatCategory {
        self.category
    }

    pub fn is_booked(&self) -> bool {
        self.booked.load(Ordering::Acquire)
    }

    pub(crate) fn set_booked(&self, booked: bool) {
        self.booked.store(booked, Ordering::Release);
    }
}

#[derive(Debug)]
pub struct Screen {
    id: u32,
    seats: Vec<Arc<Seat>>,
}

impl Screen {
    pub fn new(id: u32, seats: Vec<Seat>) -> Result<Self, BookingError> {
        let mut seen = HashSet::with_capacity(seats.len());
        for seat in &seats {
            if !seen.insert(seat.id()) {
                return Err(BookingError::DuplicateSeat {
                    screen_id: id,
                    seat_id: seat.id(),
                });
            }
        }

        Ok(Self {
            id,
            seats: seats.into_iter().map(Arc::new).collect(),
        })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn seats(&self) -> &[Arc<Seat>] {
        &self.seats
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movie {
    pub name: String,
    pub duration: String,
}

impl Movie {
    pub fn new(name: impl Into<String>, duration: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            duration: duration.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Show {
    pub id: u32,
    pub movie: Movie,
    pub timing: String,
}

impl Show {
    pub fn new(id: u32, movie: Movie, timing: impl Into<String>) -> Self {
        Self {
            id,
            movie,
            timing: timing.into(),
        }
    }
}

// A committed reservation. Show and seat are shared with the catalog, the ledger owns the record.
#[derive(Debug, Clone)]
pub struct Booking {
    pub id: String,
    pub theatre_id: u32,
    pub show: Arc<Show>,
    pub screen_id: u32,
    pub seat: Arc<Seat>,
    pub user: User,
    pub booked_at: DateTime<Utc>,
}

impl Booking {
    pub fn slot(&self) -> SeatSlot {
        SeatSlot {
            theatre_id: self.theatre_id,
            show_id: self.show.id,
            screen_id: self.screen_id,
            seat_id: self.seat.id(),
        }
    }
}

// Identifies one (show, seat) pair; at most one live booking may hold a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SeatSlot {
    pub theatre_id: u32,
    pub show_id: u32,
    pub screen_id: u32,
    pub seat_id: u32,
}

// Read-only view of a seat for availability queries
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeatView {
    pub screen_id: u32,
    pub seat_id: u32,
    pub category: SeatCategory,
}
