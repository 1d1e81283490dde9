// Show catalog: city -> theatres -> shows and screens.
// Built once at startup and handed to the allocator behind an Arc, read-only from then on.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use crate::models::{Screen, Seat, Show};

// Names and timings are matched case-insensitively, ignoring surrounding whitespace
pub fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

#[derive(Debug)]
pub struct Theatre {
    id: u32,
    name: String,
    shows: Vec<Arc<Show>>,
    screens: Vec<Screen>,
    movies: HashSet<String>,
    // First show for a (movie, timing) pair, in declaration order
    show_index: HashMap<(String, String), usize>,
    // First (screen index, seat index) for a seat id, scanning screens in order
    seat_index: HashMap<u32, (usize, usize)>,
}

impl Theatre {
    pub fn new(id: u32, name: impl Into<String>, shows: Vec<Show>, screens: Vec<Screen>) -> Self {
        let shows: Vec<Arc<Show>> = shows.into_iter().map(Arc::new).collect();

        let mut movies = HashSet::new();
        let mut show_index = HashMap::new();
        for (pos, show) in shows.iter().enumerate() {
            let movie = normalize(&show.movie.name);
            show_index
                .entry((movie.clone(), normalize(&show.timing)))
                .or_insert(pos);
            movies.insert(movie);
        }

        let mut seat_index = HashMap::new();
        for (screen_pos, screen) in screens.iter().enumerate() {
            for (seat_pos, seat) in screen.seats().iter().enumerate() {
                seat_index
                    .entry(seat.id())
                    .or_insert((screen_pos, seat_pos));
            }
        }

        Self {
            id,
            name: name.into(),
            shows,
            screens,
            movies,
            show_index,
            seat_index,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn screens(&self) -> &[Screen] {
        &self.screens
    }

    pub fn screens_movie(&self, movie: &str) -> bool {
        self.movies.contains(&normalize(movie))
    }

    pub fn find_show(&self, movie: &str, time: &str) -> Option<&Arc<Show>> {
        self.show_index
            .get(&(normalize(movie), normalize(time)))
            .map(|&pos| &self.shows[pos])
    }

    // Returns the owning screen id with the seat
    pub fn find_seat(&self, seat_id: u32) -> Option<(u32, &Arc<Seat>)> {
        self.seat_index.get(&seat_id).map(|&(screen_pos, seat_pos)| {
            let screen = &self.screens[screen_pos];
            (screen.id(), &screen.seats()[seat_pos])
        })
    }
}

#[derive(Debug, Default)]
pub struct ShowCatalog {
    cities: HashMap<String, Vec<Arc<Theatre>>>,
}

impl ShowCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    // The same theatre may be registered under several cities
    pub fn add_theatre(&mut self, city: &str, theatre: Arc<Theatre>) {
        self.cities
            .entry(normalize(city))
            .or_default()
            .push(theatre);
    }

    pub fn theatres(&self, city: &str) -> &[Arc<Theatre>] {
        self.cities
            .get(&normalize(city))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    // First theatre in the city showing the movie at any time
    pub fn find_theatre(&self, city: &str, movie: &str) -> Option<&Arc<Theatre>> {
        self.theatres(city).iter().find(|t| t.screens_movie(movie))
    }
}
