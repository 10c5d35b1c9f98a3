//! Simulated payment gateway.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::PaymentRequest;
use crate::config::CheckoutConfig;

/// Proof of an approved payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentReceipt {
    pub reference: Uuid,
    pub amount: Decimal,
    pub card_last4: String,
    pub processed_at: DateTime<Utc>,
}

/// Result of a simulated payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    Approved(PaymentReceipt),
    Declined,
}

impl PaymentOutcome {
    #[must_use]
    pub const fn is_approved(&self) -> bool {
        matches!(self, Self::Approved(_))
    }
}

/// Approves payments at random after a fixed delay.
///
/// Shared across requests; the RNG lock is only held while drawing.
#[derive(Debug)]
pub struct PaymentSimulator {
    delay: Duration,
    success_rate: f64,
    rng: Mutex<StdRng>,
}

impl PaymentSimulator {
    #[must_use]
    pub fn new(config: &CheckoutConfig) -> Self {
        let rng = config
            .seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);

        Self {
            delay: config.delay,
            success_rate: config.success_rate.clamp(0.0, 1.0),
            rng: Mutex::new(rng),
        }
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Decide the outcome immediately.
    pub fn draw(&self, request: &PaymentRequest) -> PaymentOutcome {
        let roll: f64 = self
            .rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .random();

        if roll < self.success_rate {
            let receipt = PaymentReceipt {
                reference: Uuid::new_v4(),
                amount: request.amount,
                card_last4: request.card_last4.clone(),
                processed_at: Utc::now(),
            };
            tracing::info!(reference = %receipt.reference, amount = %receipt.amount, "Payment approved");
            PaymentOutcome::Approved(receipt)
        } else {
            tracing::info!(amount = %request.amount, "Payment declined");
            PaymentOutcome::Declined
        }
    }

    /// Wait out the configured delay, then decide.
    pub async fn process(&self, request: &PaymentRequest) -> PaymentOutcome {
        tokio::time::sleep(self.delay).await;
        self.draw(request)
    }
}
