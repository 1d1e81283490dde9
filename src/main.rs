use std::sync::Arc;

use futures::future::join_all;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use movie_booking::{
    seed::demo_catalog, BookingConfig, BookingError, City, MovieBookingSystem, RecordingPayment,
    SeatCategory, TicketBooking, User,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => BookingConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => BookingConfig::default(),
    };

    let payments = Arc::new(RecordingPayment::new());
    let system = Arc::new(MovieBookingSystem::new(
        Arc::new(demo_catalog()?),
        payments.clone(),
        config,
    )?);

    let city = City::Hyderabad.to_string();
    let user = User::new("1", "John Doe");

    // Book a ticket, then try the same seat again
    for _ in 0..2 {
        match system.book_ticket(&city, "BAHUBALI", "8:00 AM", 1, &user) {
            Ok(booking) => println!(
                "Ticket booked: {} ({}, {} at {})",
                booking.id, booking.show.movie.name, booking.show.movie.duration, booking.show.timing
            ),
            Err(e) => println!("Error: {}", e),
        }
    }

    // A rush of customers for the same platinum seat
    let rush = (0..8).map(|i| {
        let system = system.clone();
        tokio::task::spawn_blocking(move || {
            let user = User::new(format!("rush-{}", i), format!("Customer {}", i));
            system.book_ticket("Hyderabad", "PUSHPA", "12:00 AM", 80, &user)
        })
    });

    let mut winner = None;
    for result in join_all(rush).await {
        match result? {
            Ok(booking) => winner = Some(booking),
            Err(BookingError::AlreadyBooked { .. }) => {}
            Err(e) => println!("Error: {}", e),
        }
    }

    if let Some(booking) = winner {
        println!("Seat 80 went to {}", booking.user.name);
        println!("Cancelled: {}", system.cancel_ticket(&booking.id));
    }
    println!("Cancel unknown booking: {}", system.cancel_ticket("missing"));

    let free = system.available_seats(&city, "PUSHPA", "12:00 AM")?;
    let platinum: Vec<_> = free
        .iter()
        .filter(|s| s.category == SeatCategory::Platinum)
        .collect();
    println!("Free platinum seats: {}", serde_json::to_string(&platinum)?);

    let receipts = payments.receipts();
    println!("Receipts: {}", serde_json::to_string_pretty(&receipts)?);
    info!(free = free.len(), receipts = receipts.len(), "Done");
    println!("{:?}", system.stats());

    Ok(())
}
