// Payment stub. Charges are notional: the recording gateway always accepts and
// keeps a receipt so callers and tests can see what was billed.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use tracing::info;

use crate::{error::BookingError, models::Booking};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentReceipt {
    pub booking_id: String,
    pub amount_cents: u64,
    pub paid_at: DateTime<Utc>,
}

pub trait PaymentGateway: Send + Sync + 'static {
    fn process_payment(
        &self,
        booking: &Booking,
        amount_cents: u64,
    ) -> Result<PaymentReceipt, BookingError>;
}

#[derive(Default)]
pub struct RecordingPayment {
    receipts: RwLock<Vec<PaymentReceipt>>,
}

impl RecordingPayment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn receipts(&self) -> Vec<PaymentReceipt> {
        self.receipts.read().clone()
    }
}

impl PaymentGateway for RecordingPayment {
    fn process_payment(
        &self,
        booking: &Booking,
        amount_cents: u64,
    ) -> Result<PaymentReceipt, BookingError> {
        let receipt = PaymentReceipt {
            booking_id: booking.id.clone(),
            amount_cents,
            paid_at: Utc::now(),
        };

        info!(booking_id = %booking.id, amount_cents, "Payment processed");
        self.receipts.write().push(receipt.clone());

        Ok(receipt)
    }
}
