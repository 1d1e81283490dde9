// Booking allocator: resolves a request down to a concrete (show, seat) pair
// and commits it to the ledger. Lookups are read-only against the catalog; the
// only shared mutable state is the ledger.

use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    catalog::{ShowCatalog, Theatre},
    config::BookingConfig,
    error::BookingError,
    ledger::BookingLedger,
    models::{Booking, SeatSlot, SeatView, Show, User},
    payment::PaymentGateway,
};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BookingStats {
    pub bookings_made: usize,
    pub bookings_cancelled: usize,
    pub conflicts: usize,
    pub lookups_failed: usize,
    pub payments_declined: usize,
    pub active_bookings: usize,
}

pub trait TicketBooking: Send + Sync + 'static {
    // Reserve `seat_id` for the show of `movie` at `time` in the first theatre of
    // `city` screening that movie. Fails if any lookup misses or the seat is
    // already held for that show.
    fn book_ticket(
        &self,
        city: &str,
        movie: &str,
        time: &str,
        seat_id: u32,
        user: &User,
    ) -> Result<Booking, BookingError>;

    // Release a booking, handing back the released record
    fn cancel_booking(&self, booking_id: &str) -> Result<Booking, BookingError>;

    // Release a booking. Returns false for unknown or already cancelled ids.
    fn cancel_ticket(&self, booking_id: &str) -> bool {
        self.cancel_booking(booking_id).is_ok()
    }

    // Bookable seats with no live booking for the resolved show, in screen order.
    // A seat id repeated on a later screen is left out since requests resolve to the first one.
    fn available_seats(
        &self,
        city: &str,
        movie: &str,
        time: &str,
    ) -> Result<Vec<SeatView>, BookingError>;

    fn booking(&self, booking_id: &str) -> Option<Booking>;

    fn stats(&self) -> BookingStats;
}

pub struct MovieBookingSystem {
    catalog: Arc<ShowCatalog>,
    ledger: BookingLedger,
    payments: Arc<dyn PaymentGateway>,
    config: BookingConfig,
    stats: RwLock<BookingStats>,
}

impl MovieBookingSystem {
    pub fn new(
        catalog: Arc<ShowCatalog>,
        payments: Arc<dyn PaymentGateway>,
        config: BookingConfig,
    ) -> Result<Self, BookingError> {
        config.validate()?;

        Ok(Self {
            catalog,
            ledger: BookingLedger::with_shards(config.ledger_shards),
            payments,
            config,
            stats: RwLock::new(BookingStats::default()),
        })
    }

    pub fn bookings_for_user(&self, user_id: &str) -> Vec<Booking> {
        self.ledger.bookings_for_user(user_id)
    }

    // Theatre is chosen by city and movie alone, the show time only narrows the show
    fn resolve(
        &self,
        city: &str,
        movie: &str,
        time: &str,
    ) -> Result<(&Arc<Theatre>, Arc<Show>), BookingError> {
        let theatre = self.catalog.find_theatre(city, movie).ok_or_else(|| {
            BookingError::TheatreNotFound {
                city: city.to_string(),
                movie: movie.to_string(),
            }
        })?;

        let show = theatre
            .find_show(movie, time)
            .cloned()
            .ok_or_else(|| BookingError::ShowNotFound {
                theatre: theatre.name().to_string(),
                movie: movie.to_string(),
                time: time.to_string(),
            })?;

        Ok((theatre, show))
    }

    fn record_failure(&self, err: &BookingError) {
        let mut stats = self.stats.write();
        match err {
            BookingError::AlreadyBooked { .. } => stats.conflicts += 1,
            BookingError::PaymentDeclined { .. } => stats.payments_declined += 1,
            e if e.is_not_found() => stats.lookups_failed += 1,
            _ => {}
        }
    }

    fn try_book(
        &self,
        city: &str,
        movie: &str,
        time: &str,
        seat_id: u32,
        user: &User,
    ) -> Result<Booking, BookingError> {
        let (theatre, show) = self.resolve(city, movie, time)?;
        let (screen_id, seat) = theatre
            .find_seat(seat_id)
            .ok_or(BookingError::SeatNotFound(seat_id))?;

        let booking = Booking {
            id: Uuid::new_v4().to_string(),
            theatre_id: theatre.id(),
            show,
            screen_id,
            seat: seat.clone(),
            user: user.clone(),
            booked_at: Utc::now(),
        };

        let booking = self.ledger.try_commit(booking)?;

        if self.config.process_payments {
            let amount = self.config.fares.fare_for(booking.seat.category());
            if let Err(e) = self.payments.process_payment(&booking, amount) {
                warn!(booking_id = %booking.id, error = %e, "payment failed, releasing seat");
                self.ledger.remove(&booking.id);
                return Err(e);
            }
        }

        Ok(booking)
    }
}

impl TicketBooking for MovieBookingSystem {
    fn book_ticket(
        &self,
        city: &str,
        movie: &str,
        time: &str,
        seat_id: u32,
        user: &User,
    ) -> Result<Booking, BookingError> {
        match self.try_book(city, movie, time, seat_id, user) {
            Ok(booking) => {
                self.stats.write().bookings_made += 1;
                info!(
                    booking_id = %booking.id,
                    show_id = booking.show.id,
                    screen_id = booking.screen_id,
                    seat_id,
                    user_id = %user.id,
                    "Ticket booked"
                );
                Ok(booking)
            }
            Err(e) => {
                self.record_failure(&e);
                debug!(city, movie, time, seat_id, error = %e, "booking rejected");
                Err(e)
            }
        }
    }

    fn cancel_booking(&self, booking_id: &str) -> Result<Booking, BookingError> {
        match self.ledger.remove(booking_id) {
            Some(booking) => {
                self.stats.write().bookings_cancelled += 1;
                info!(booking_id, seat_id = booking.seat.id(), "Booking cancelled");
                Ok(booking)
            }
            None => {
                debug!(booking_id, "cancel ignored, no such booking");
                Err(BookingError::BookingNotFound(booking_id.to_string()))
            }
        }
    }

    fn available_seats(
        &self,
        city: &str,
        movie: &str,
        time: &str,
    ) -> Result<Vec<SeatView>, BookingError> {
        let (theatre, show) = self.resolve(city, movie, time)?;

        let seats = theatre
            .screens()
            .iter()
            .flat_map(|screen| {
                screen.seats().iter().map(move |seat| (screen.id(), seat))
            })
            .filter(|(screen_id, seat)| {
                theatre.find_seat(seat.id()).map(|(sid, _)| sid) == Some(*screen_id)
            })
            .filter(|(screen_id, seat)| {
                !self.ledger.is_slot_taken(&SeatSlot {
                    theatre_id: theatre.id(),
                    show_id: show.id,
                    screen_id: *screen_id,
                    seat_id: seat.id(),
                })
            })
            .map(|(screen_id, seat)| SeatView {
                screen_id,
                seat_id: seat.id(),
                category: seat.category(),
            })
            .collect();

        Ok(seats)
    }

    fn booking(&self, booking_id: &str) -> Option<Booking> {
        self.ledger.get(booking_id)
    }

    fn stats(&self) -> BookingStats {
        let mut stats = self.stats.read().clone();
        stats.active_bookings = self.ledger.len();
        stats
    }
}
