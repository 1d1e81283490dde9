use thiserror::Error;

// Every failure the booking engine can report. None of these are fatal, callers
// are expected to surface the message and carry on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    #[error("No theatre found for movie {movie} in city {city}")]
    TheatreNotFound { city: String, movie: String },

    #[error("No show found for movie {movie} at {time} in theatre {theatre}")]
    ShowNotFound {
        theatre: String,
        movie: String,
        time: String,
    },

    #[error("Invalid seat id: {0}")]
    SeatNotFound(u32),

    #[error("Seat {seat_id} already booked for show {show_id}")]
    AlreadyBooked { seat_id: u32, show_id: u32 },

    #[error("Unknown booking id: {0}")]
    BookingNotFound(String),

    #[error("Seat {seat_id} appears twice on screen {screen_id}")]
    DuplicateSeat { screen_id: u32, seat_id: u32 },

    #[error("Payment declined for booking {booking_id}: {reason}")]
    PaymentDeclined { booking_id: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl BookingError {
    // Lookup failures, as opposed to seat conflicts or payment problems
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            BookingError::TheatreNotFound { .. }
                | BookingError::ShowNotFound { .. }
                | BookingError::SeatNotFound(_)
                | BookingError::BookingNotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_missing_piece() {
        let err = BookingError::TheatreNotFound {
            city: "Chennai".to_string(),
            movie: "BAHUBALI".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "No theatre found for movie BAHUBALI in city Chennai"
        );

        let err = BookingError::AlreadyBooked {
            seat_id: 1,
            show_id: 1001,
        };
        assert_eq!(err.to_string(), "Seat 1 already booked for show 1001");
    }

    #[test]
    fn test_not_found_classification() {
        assert!(BookingError::SeatNotFound(500).is_not_found());
        assert!(BookingError::BookingNotFound("x".into()).is_not_found());
        assert!(!BookingError::AlreadyBooked {
            seat_id: 1,
            show_id: 1
        }
        .is_not_found());
        assert!(!BookingError::Config("bad".into()).is_not_found());
    }
}
