// Booking ledger: the in-memory registry of live bookings keyed by booking id.
//
// Three sharded maps back it:
// - `bookings`: booking id -> record (the ledger owns every Booking)
// - `slots`: (show, seat) slot -> booking id, the at-most-one-booking guard
// - `seat_usage`: physical seat -> number of live bookings holding it across shows
//
// Lock order is always slots -> bookings -> seat_usage, and no method holds a
// guard on one map while acquiring an earlier one.

use dashmap::{mapref::entry::Entry, DashMap};
use tracing::debug;

use crate::{
    error::BookingError,
    models::{Booking, SeatSlot},
};

type SeatKey = (u32, u32, u32);

pub struct BookingLedger {
    bookings: DashMap<String, Booking>,
    slots: DashMap<SeatSlot, String>,
    seat_usage: DashMap<SeatKey, usize>,
}

impl Default for BookingLedger {
    fn default() -> Self {
        Self {
            bookings: DashMap::new(),
            slots: DashMap::new(),
            seat_usage: DashMap::new(),
        }
    }
}

fn seat_key(slot: &SeatSlot) -> SeatKey {
    (slot.theatre_id, slot.screen_id, slot.seat_id)
}

impl BookingLedger {
    // `shards` must be a power of two greater than 1, see BookingConfig::validate
    pub fn with_shards(shards: usize) -> Self {
        Self {
            bookings: DashMap::with_shard_amount(shards),
            slots: DashMap::with_shard_amount(shards),
            seat_usage: DashMap::with_shard_amount(shards),
        }
    }

    // Insert the booking unless its slot is already held. The slot entry stays
    // locked until the record and the seat flag are in place, so two callers
    // racing for the same slot cannot both get through.
    pub fn try_commit(&self, booking: Booking) -> Result<Booking, BookingError> {
        let slot = booking.slot();

        match self.slots.entry(slot) {
            Entry::Occupied(held) => {
                debug!(?slot, holder = %held.get(), "slot already held");
                Err(BookingError::AlreadyBooked {
                    seat_id: slot.seat_id,
                    show_id: slot.show_id,
                })
            }
            Entry::Vacant(vacant) => {
                self.bookings.insert(booking.id.clone(), booking.clone());
                {
                    let mut usage = self.seat_usage.entry(seat_key(&slot)).or_insert(0);
                    *usage += 1;
                    booking.seat.set_booked(true);
                }
                vacant.insert(booking.id.clone());

                Ok(booking)
            }
        }
    }

    // Drop a booking and release its slot. The seat flag is cleared only when no
    // other show still holds the same physical seat.
    pub fn remove(&self, booking_id: &str) -> Option<Booking> {
        let (_, booking) = self.bookings.remove(booking_id)?;
        let slot = booking.slot();

        self.slots.remove_if(&slot, |_, holder| holder == booking_id);

        if let Entry::Occupied(mut usage) = self.seat_usage.entry(seat_key(&slot)) {
            let remaining = usage.get().saturating_sub(1);
            if remaining == 0 {
                booking.seat.set_booked(false);
                usage.remove();
            } else {
                *usage.get_mut() = remaining;
            }
        }

        Some(booking)
    }

    pub fn get(&self, booking_id: &str) -> Option<Booking> {
        self.bookings.get(booking_id).map(|b| b.value().clone())
    }

    pub fn is_slot_taken(&self, slot: &SeatSlot) -> bool {
        self.slots.contains_key(slot)
    }

    pub fn bookings_for_user(&self, user_id: &str) -> Vec<Booking> {
        let mut found: Vec<Booking> = self
            .bookings
            .iter()
            .filter(|b| b.user.id == user_id)
            .map(|b| b.value().clone())
            .collect();
        found.sort_by_key(|b| b.booked_at);
        found
    }

    pub fn len(&self) -> usize {
        self.bookings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Movie, Seat, SeatCategory, Show, User};
    use chrono::Utc;
    use std::{sync::Arc, thread};

    fn booking(id: &str, show: &Arc<Show>, seat: &Arc<Seat>, user: &User) -> Booking {
        Booking {
            id: id.to_string(),
            theatre_id: 101,
            show: show.clone(),
            screen_id: 51,
            seat: seat.clone(),
            user: user.clone(),
            booked_at: Utc::now(),
        }
    }

    fn show(id: u32) -> Arc<Show> {
        Arc::new(Show::new(id, Movie::new("BAHUBALI", "3:00hrs"), "8:00 AM"))
    }

    #[test]
    fn test_commit_then_conflict() {
        let ledger = BookingLedger::with_shards(4);
        let seat = Arc::new(Seat::new(1, SeatCategory::Silver));
        let show = show(1001);
        let user = User::new("1", "John Doe");

        let first = ledger.try_commit(booking("a", &show, &seat, &user)).unwrap();
        assert!(seat.is_booked());
        assert!(ledger.is_slot_taken(&first.slot()));

        let err = ledger
            .try_commit(booking("b", &show, &seat, &user))
            .unwrap_err();
        assert_eq!(
            err,
            BookingError::AlreadyBooked {
                seat_id: 1,
                show_id: 1001
            }
        );
        assert_eq!(ledger.len(), 1);
        assert!(ledger.get("b").is_none());
    }

    #[test]
    fn test_remove_releases_slot() {
        let ledger = BookingLedger::default();
        let seat = Arc::new(Seat::new(1, SeatCategory::Silver));
        let show = show(1001);
        let user = User::new("1", "John Doe");

        let first = ledger.try_commit(booking("a", &show, &seat, &user)).unwrap();
        let removed = ledger.remove("a").unwrap();
        assert_eq!(removed.id, "a");
        assert!(!seat.is_booked());
        assert!(!ledger.is_slot_taken(&first.slot()));
        assert!(ledger.is_empty());

        // Second removal is a no-op
        assert!(ledger.remove("a").is_none());

        assert!(ledger.try_commit(booking("c", &show, &seat, &user)).is_ok());
    }

    #[test]
    fn test_seat_flag_tracks_all_shows() {
        let ledger = BookingLedger::default();
        let seat = Arc::new(Seat::new(5, SeatCategory::Gold));
        let user = User::new("1", "John Doe");

        ledger
            .try_commit(booking("morning", &show(1001), &seat, &user))
            .unwrap();
        ledger
            .try_commit(booking("noon", &show(1002), &seat, &user))
            .unwrap();
        assert!(seat.is_booked());

        ledger.remove("morning");
        assert!(seat.is_booked(), "noon show still holds the seat");

        ledger.remove("noon");
        assert!(!seat.is_booked());
    }

    #[test]
    fn test_bookings_for_user() {
        let ledger = BookingLedger::default();
        let show = show(1001);
        let alice = User::new("1", "Alice");
        let bob = User::new("2", "Bob");

        for (id, seat_id, user) in [("a", 1, &alice), ("b", 2, &bob), ("c", 3, &alice)] {
            let seat = Arc::new(Seat::new(seat_id, SeatCategory::Silver));
            ledger.try_commit(booking(id, &show, &seat, user)).unwrap();
        }

        let ids: Vec<String> = ledger
            .bookings_for_user("1")
            .into_iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&"a".to_string()));
        assert!(ids.contains(&"c".to_string()));
    }

    #[test]
    fn test_concurrent_commits_on_one_slot() {
        let ledger = Arc::new(BookingLedger::with_shards(8));
        let seat = Arc::new(Seat::new(1, SeatCategory::Silver));
        let show = show(1001);
        let threads_count = 32;

        let mut handles = vec![];
        for i in 0..threads_count {
            let ledger = ledger.clone();
            let seat = seat.clone();
            let show = show.clone();
            handles.push(thread::spawn(move || {
                let user = User::new(i.to_string(), format!("user{}", i));
                ledger
                    .try_commit(booking(&format!("b{}", i), &show, &seat, &user))
                    .is_ok()
            }));
        }

        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();

        assert_eq!(successes, 1);
        assert_eq!(ledger.len(), 1);
    }
}
