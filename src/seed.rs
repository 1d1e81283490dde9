// Sample catalog used by the demo binary, tests and benchmarks

use std::sync::Arc;

use crate::{
    catalog::{ShowCatalog, Theatre},
    error::BookingError,
    models::{City, Movie, Screen, Seat, SeatCategory, Show},
};

pub const SEATS_PER_SCREEN: u32 = 100;

// Tiering of the seeded screens: front rows silver, back rows platinum
pub fn category_for(seat_id: u32) -> SeatCategory {
    match seat_id {
        0..=40 => SeatCategory::Silver,
        41..=70 => SeatCategory::Gold,
        _ => SeatCategory::Platinum,
    }
}

pub fn seeded_screen(id: u32) -> Result<Screen, BookingError> {
    let seats = (1..=SEATS_PER_SCREEN)
        .map(|seat_id| Seat::new(seat_id, category_for(seat_id)))
        .collect();
    Screen::new(id, seats)
}

pub fn pvr_inox() -> Result<Theatre, BookingError> {
    let shows = vec![
        Show::new(1001, Movie::new("BAHUBALI", "3:00hrs"), "8:00 AM"),
        Show::new(1002, Movie::new("PUSHPA", "3:00hrs"), "12:00 AM"),
    ];
    let screens = vec![seeded_screen(51)?, seeded_screen(52)?];

    Ok(Theatre::new(101, "Pvr Inox", shows, screens))
}

// One theatre registered in Bangalore and Hyderabad. Both cities share the same
// seats, so a booking made through either city holds the seat for both.
pub fn demo_catalog() -> Result<ShowCatalog, BookingError> {
    let theatre = Arc::new(pvr_inox()?);

    let mut catalog = ShowCatalog::new();
    catalog.add_theatre(&City::Bangalore.to_string(), theatre.clone());
    catalog.add_theatre(&City::Hyderabad.to_string(), theatre);

    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiers() {
        assert_eq!(category_for(1), SeatCategory::Silver);
        assert_eq!(category_for(40), SeatCategory::Silver);
        assert_eq!(category_for(41), SeatCategory::Gold);
        assert_eq!(category_for(70), SeatCategory::Gold);
        assert_eq!(category_for(71), SeatCategory::Platinum);
        assert_eq!(category_for(100), SeatCategory::Platinum);
    }

    #[test]
    fn test_demo_catalog_layout() {
        let catalog = demo_catalog().unwrap();

        let hyderabad = catalog.theatres("Hyderabad");
        let bangalore = catalog.theatres("Bangalore");
        assert_eq!(hyderabad.len(), 1);
        assert!(Arc::ptr_eq(&hyderabad[0], &bangalore[0]));
        assert!(catalog.theatres(&City::Chennai.to_string()).is_empty());

        let theatre = &hyderabad[0];
        assert_eq!(theatre.name(), "Pvr Inox");
        assert_eq!(theatre.screens().len(), 2);
        assert!(theatre
            .screens()
            .iter()
            .all(|s| s.seats().len() == SEATS_PER_SCREEN as usize));
        assert_eq!(theatre.find_show("PUSHPA", "12:00 AM").unwrap().id, 1002);
    }
}
