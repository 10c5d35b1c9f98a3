//! Simulated checkout.
//!
//! # State Machine
//!
//! ```text
//! Idle --begin--> AwaitingAuth            (anonymous shopper)
//! Idle --begin--> FormOpen                (signed in, cart not empty)
//! FormOpen --submit--> Processing         (form valid)
//! Processing --approved--> Succeeded
//! Processing --declined--> FormOpen       (retry)
//! any --close--> Idle
//! ```
//!
//! Submitting while the form is not open is rejected, so an anonymous
//! shopper can never reach `Processing`.

mod simulator;

pub use simulator::{PaymentOutcome, PaymentReceipt, PaymentSimulator};

use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use crate::models::{AuthSession, Cart};

/// Errors surfaced by the checkout flow.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    /// Nothing to pay for.
    #[error("cart is empty")]
    EmptyCart,

    /// A required payment field was left blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Card number contains something other than digits.
    #[error("card number must be numeric")]
    InvalidCardNumber,

    /// Payment submitted while the form was not open.
    #[error("payment form is not open")]
    FormNotOpen,

    /// Payment completion arrived while nothing was processing.
    #[error("no payment is processing")]
    NotProcessing,

    /// The simulated gateway declined the payment.
    #[error("payment declined")]
    PaymentDeclined,
}

impl CheckoutError {
    /// Message suitable for showing to the shopper.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyCart => "Your cart is empty.".to_string(),
            Self::MissingField(_) => "All payment fields are required.".to_string(),
            Self::InvalidCardNumber => "Please enter a valid card number.".to_string(),
            Self::FormNotOpen | Self::NotProcessing => {
                "Please start checkout again.".to_string()
            }
            Self::PaymentDeclined => {
                "There was a problem processing your payment. Please try again.".to_string()
            }
        }
    }
}

/// Where the checkout currently stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CheckoutStage {
    #[default]
    Idle,
    AwaitingAuth,
    FormOpen,
    Processing,
    Succeeded,
}

/// Payment form input. The card number never appears in `Debug` output.
#[derive(Debug)]
pub struct PaymentForm {
    pub name: String,
    pub card_number: SecretString,
    pub expiry: String,
}

impl PaymentForm {
    /// Build a form from raw field values.
    #[must_use]
    pub fn new(name: impl Into<String>, card_number: impl Into<String>, expiry: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            card_number: SecretString::from(card_number.into()),
            expiry: expiry.into(),
        }
    }

    /// Validate the form for a payment of `amount`.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::MissingField` for a blank field and
    /// `CheckoutError::InvalidCardNumber` if the card number holds anything
    /// other than digits and spaces.
    pub fn validate(&self, amount: Decimal) -> Result<PaymentRequest, CheckoutError> {
        let name = self.name.trim();
        let card = self.card_number.expose_secret().trim();
        let expiry = self.expiry.trim();

        if name.is_empty() {
            return Err(CheckoutError::MissingField("name"));
        }
        if card.is_empty() {
            return Err(CheckoutError::MissingField("card number"));
        }
        if expiry.is_empty() {
            return Err(CheckoutError::MissingField("expiry"));
        }

        let digits: String = card.chars().filter(|c| *c != ' ').collect();
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(CheckoutError::InvalidCardNumber);
        }

        let last4_start = digits.len().saturating_sub(4);
        Ok(PaymentRequest {
            cardholder: name.to_string(),
            card_last4: digits.get(last4_start..).unwrap_or_default().to_string(),
            amount,
        })
    }
}

/// A validated payment, ready for the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    pub cardholder: String,
    pub card_last4: String,
    pub amount: Decimal,
}

/// The checkout state machine.
#[derive(Debug, Clone, Default)]
pub struct CheckoutFlow {
    stage: CheckoutStage,
}

impl CheckoutFlow {
    /// Current stage.
    #[must_use]
    pub const fn stage(&self) -> CheckoutStage {
        self.stage
    }

    /// Enter checkout. Anonymous shoppers are routed to authentication.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` for a signed-in shopper with an
    /// empty cart.
    pub fn begin(&mut self, session: &AuthSession, cart: &Cart) -> Result<CheckoutStage, CheckoutError> {
        if !session.is_authenticated() {
            self.stage = CheckoutStage::AwaitingAuth;
            return Ok(self.stage);
        }

        if cart.is_empty() {
            self.stage = CheckoutStage::Idle;
            return Err(CheckoutError::EmptyCart);
        }

        self.stage = CheckoutStage::FormOpen;
        Ok(self.stage)
    }

    /// Submit the payment form.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::FormNotOpen` unless the form is open, or a
    /// validation error from [`PaymentForm::validate`]. The stage is left
    /// unchanged on error.
    pub fn submit(&mut self, form: &PaymentForm, cart: &Cart) -> Result<PaymentRequest, CheckoutError> {
        if self.stage != CheckoutStage::FormOpen {
            return Err(CheckoutError::FormNotOpen);
        }

        let request = form.validate(cart.total())?;
        self.stage = CheckoutStage::Processing;
        Ok(request)
    }

    /// Record the gateway's answer, returning the receipt on approval.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::PaymentDeclined` on a decline (the form is
    /// reopened for a retry) and `CheckoutError::NotProcessing` if no payment
    /// was in flight.
    pub fn complete(&mut self, outcome: PaymentOutcome) -> Result<PaymentReceipt, CheckoutError> {
        if self.stage != CheckoutStage::Processing {
            return Err(CheckoutError::NotProcessing);
        }

        match outcome {
            PaymentOutcome::Approved(receipt) => {
                self.stage = CheckoutStage::Succeeded;
                Ok(receipt)
            }
            PaymentOutcome::Declined => {
                self.stage = CheckoutStage::FormOpen;
                Err(CheckoutError::PaymentDeclined)
            }
        }
    }

    /// Close the checkout and return to the storefront.
    pub fn close(&mut self) {
        self.stage = CheckoutStage::Idle;
    }
}
