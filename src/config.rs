// Runtime configuration for the booking engine

use serde::Deserialize;

use crate::{error::BookingError, models::SeatCategory};

// Ticket price per seat tier, in the smallest currency unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FareTable {
    pub silver_cents: u64,
    pub gold_cents: u64,
    pub platinum_cents: u64,
}

impl Default for FareTable {
    fn default() -> Self {
        Self {
            silver_cents: 15_000,
            gold_cents: 25_000,
            platinum_cents: 40_000,
        }
    }
}

impl FareTable {
    pub fn fare_for(&self, category: SeatCategory) -> u64 {
        match category {
            SeatCategory::Silver => self.silver_cents,
            SeatCategory::Gold => self.gold_cents,
            SeatCategory::Platinum => self.platinum_cents,
        }
    }
}

// Booking engine configuration options
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BookingConfig {
    // Shard count for the ledger maps; dashmap wants a power of two above 1
    pub ledger_shards: usize,
    pub process_payments: bool,
    pub fares: FareTable,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            ledger_shards: 16,
            process_payments: true,
            fares: FareTable::default(),
        }
    }
}

impl BookingConfig {
    // Parse a JSON document; missing fields fall back to the defaults
    pub fn from_json(raw: &str) -> Result<Self, BookingError> {
        let config: BookingConfig =
            serde_json::from_str(raw).map_err(|e| BookingError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), BookingError> {
        if self.ledger_shards < 2 || !self.ledger_shards.is_power_of_two() {
            return Err(BookingError::Config(format!(
                "ledger_shards must be a power of two greater than 1, got {}",
                self.ledger_shards
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = BookingConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.process_payments);
        assert_eq!(config.fares.fare_for(SeatCategory::Gold), 25_000);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            BookingConfig::from_json(r#"{ "process_payments": false, "fares": { "gold_cents": 1 } }"#)
                .unwrap();

        assert!(!config.process_payments);
        assert_eq!(config.ledger_shards, 16);
        assert_eq!(config.fares.gold_cents, 1);
        assert_eq!(config.fares.silver_cents, 15_000);
    }

    #[test]
    fn test_rejects_bad_shard_count() {
        let err = BookingConfig::from_json(r#"{ "ledger_shards": 12 }"#).unwrap_err();
        assert!(matches!(err, BookingError::Config(_)));

        let err = BookingConfig::from_json(r#"{ "ledger_shards": 1 }"#).unwrap_err();
        assert!(matches!(err, BookingError::Config(_)));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = BookingConfig::from_json("{ ledger_shards: ").unwrap_err();
        assert!(matches!(err, BookingError::Config(_)));
    }
}
