//! Payment simulator dry run.

use std::time::Duration;

use rust_decimal::Decimal;

use tienda_storefront::config::CheckoutConfig;
use tienda_storefront::services::checkout::{PaymentRequest, PaymentSimulator};

use super::CommandError;

/// Draw `runs` payments and report how many were approved.
///
/// `seed` and `rate` override the configured values. The configured delay
/// is skipped.
///
/// # Errors
///
/// Returns `CommandError::InvalidRate` if `rate` is outside [0, 1].
pub fn run(config: &CheckoutConfig, runs: u32, seed: Option<u64>, rate: Option<f64>) -> Result<(), CommandError> {
    let success_rate = rate.unwrap_or(config.success_rate);
    if !(0.0..=1.0).contains(&success_rate) {
        return Err(CommandError::InvalidRate(success_rate));
    }

    let simulator = PaymentSimulator::new(&CheckoutConfig {
        delay: Duration::ZERO,
        success_rate,
        seed: seed.or(config.seed),
    });
    let approved = approvals(&simulator, runs);

    let ratio = if runs == 0 {
        0.0
    } else {
        f64::from(approved) / f64::from(runs)
    };
    tracing::info!(
        "{approved} of {runs} payments approved (ratio {ratio:.3}, configured {success_rate:.3})"
    );
    Ok(())
}

fn approvals(simulator: &PaymentSimulator, runs: u32) -> u32 {
    let request = PaymentRequest {
        cardholder: "Simulation".to_string(),
        card_last4: "4242".to_string(),
        amount: Decimal::ONE,
    };
    (0..runs).fold(0, |approved, _| {
        approved + u32::from(simulator.draw(&request).is_approved())
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn simulator(success_rate: f64, seed: u64) -> PaymentSimulator {
        PaymentSimulator::new(&CheckoutConfig {
            delay: Duration::ZERO,
            success_rate,
            seed: Some(seed),
        })
    }

    #[test]
    fn test_approvals_follow_rate() {
        assert_eq!(approvals(&simulator(1.0, 1), 50), 50);
        assert_eq!(approvals(&simulator(0.0, 1), 50), 0);

        let approved = approvals(&simulator(0.8, 7), 1000);
        assert!((750..=850).contains(&approved), "approved {approved}");
    }

    #[test]
    fn test_same_seed_same_count() {
        assert_eq!(approvals(&simulator(0.5, 99), 200), approvals(&simulator(0.5, 99), 200));
    }

    #[test]
    fn test_rejects_rate_out_of_range() {
        let config = CheckoutConfig::default();
        assert!(matches!(
            run(&config, 10, Some(1), Some(1.5)),
            Err(CommandError::InvalidRate(_))
        ));
        assert!(run(&config, 0, Some(1), Some(0.5)).is_ok());
    }
}
