//! The shop controller.
//!
//! [`Shop`] owns everything one shopper can change: cart, user registry,
//! sign-in state and checkout progress. Front ends translate user actions
//! into [`Intent`] values and apply them; each successful intent yields a
//! [`Transition`] describing what changed, what to tell the shopper, which
//! screen to show next and whether a payment must be processed.
//!
//! Persistence is explicit. After applying an intent, the caller hands
//! [`Transition::changes`] to [`Shop::save_changes`]. A failed intent leaves
//! persisted state untouched.

use thiserror::Error;

use tienda_core::{ProductId, Username};

use super::auth::{AuthError, AuthService, LoginForm, RegisterForm};
use super::checkout::{CheckoutError, CheckoutFlow, CheckoutStage, PaymentForm, PaymentOutcome, PaymentRequest};
use crate::catalog::Catalog;
use crate::models::{AuthSession, Cart, CartChange, Confirmation, Notification, UserRegistry};
use crate::storage::{LocalStore, StorageError, keys};

/// A user action.
#[derive(Debug)]
pub enum Intent {
    AddToCart(ProductId),
    RemoveFromCart(ProductId),
    /// Ask before emptying the cart.
    RequestClearCart,
    ClearCart(Confirmation),
    Register(RegisterForm),
    Login(LoginForm),
    Logout,
    BeginCheckout,
    SubmitPayment(PaymentForm),
    /// The gateway answered a payment started by [`Effect::ProcessPayment`].
    PaymentCompleted(PaymentOutcome),
    CancelCheckout,
}

/// Which persisted keys an intent touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Changes {
    pub cart: bool,
    pub users: bool,
    pub session: bool,
}

impl Changes {
    pub const NONE: Self = Self {
        cart: false,
        users: false,
        session: false,
    };

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !(self.cart || self.users || self.session)
    }

    /// Keys touched by either set.
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        Self {
            cart: self.cart || other.cart,
            users: self.users || other.users,
            session: self.session || other.session,
        }
    }
}

/// What the front end should show next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Screen {
    /// Product list and cart panel.
    #[default]
    Storefront,
    /// "Empty your cart?" prompt.
    ConfirmClear,
    /// Login / register prompt.
    AuthPrompt,
    PaymentForm,
    /// Payment in flight.
    Processing,
}

/// Work the front end must perform outside the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run the payment through the gateway, then apply
    /// [`Intent::PaymentCompleted`] with the outcome.
    ProcessPayment(PaymentRequest),
}

/// Result of a successfully applied intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub changes: Changes,
    pub notices: Vec<Notification>,
    pub screen: Screen,
    pub effect: Option<Effect>,
}

impl Transition {
    const fn to(screen: Screen) -> Self {
        Self {
            changes: Changes::NONE,
            notices: Vec::new(),
            screen,
            effect: None,
        }
    }

    fn notify(mut self, notice: Notification) -> Self {
        self.notices.push(notice);
        self
    }

    fn touching(mut self, changes: Changes) -> Self {
        self.changes = changes;
        self
    }
}

/// Reasons an intent was rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShopError {
    #[error("unknown product {0}")]
    UnknownProduct(ProductId),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),
}

impl ShopError {
    /// Message suitable for showing to the shopper.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::UnknownProduct(_) => "That product is no longer available.".to_string(),
            Self::Auth(e) => e.user_message(),
            Self::Checkout(e) => e.user_message(),
        }
    }

    /// The error as an acknowledgment notification.
    #[must_use]
    pub fn notification(&self) -> Notification {
        Notification::error(self.user_message())
    }

    /// Screen on which the error should be acknowledged.
    #[must_use]
    pub const fn screen(&self) -> Screen {
        match self {
            Self::UnknownProduct(_)
            | Self::Checkout(CheckoutError::EmptyCart | CheckoutError::FormNotOpen | CheckoutError::NotProcessing) => {
                Screen::Storefront
            }
            Self::Auth(_) => Screen::AuthPrompt,
            Self::Checkout(_) => Screen::PaymentForm,
        }
    }
}

/// One shopper's state.
#[derive(Debug, Clone, Default)]
pub struct Shop {
    cart: Cart,
    users: UserRegistry,
    session: AuthSession,
    checkout: CheckoutFlow,
}

impl Shop {
    /// Rebuild state from a store.
    ///
    /// Absent keys give defaults. Malformed values are logged and replaced by
    /// defaults, so a corrupted store never prevents the shop from loading.
    pub fn restore(store: &impl LocalStore) -> Self {
        let cart = store
            .get(keys::CART)
            .map(|raw| {
                serde_json::from_str::<Cart>(&raw).unwrap_or_else(|e| {
                    tracing::warn!(error = %e, "Stored cart is malformed, starting empty");
                    Cart::new()
                })
            })
            .unwrap_or_default();

        let users = store
            .get(keys::USERS)
            .map(|raw| {
                serde_json::from_str::<UserRegistry>(&raw).unwrap_or_else(|e| {
                    tracing::warn!(error = %e, "Stored user registry is malformed, starting empty");
                    UserRegistry::default()
                })
            })
            .unwrap_or_default();

        let session = store
            .get(keys::SESSION_USER)
            .and_then(|raw| match Username::parse(&raw) {
                Ok(username) => Some(AuthSession::Authenticated(username)),
                Err(e) => {
                    tracing::warn!(error = %e, "Stored session user is invalid, signing out");
                    None
                }
            })
            .unwrap_or_default();

        Self {
            cart,
            users,
            session,
            checkout: CheckoutFlow::default(),
        }
    }

    /// Write the touched parts of the state back to the store.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if serialization or the store write fails.
    pub fn save_changes(&self, store: &mut impl LocalStore, changes: Changes) -> Result<(), StorageError> {
        if changes.cart {
            store.set(keys::CART, to_json(keys::CART, &self.cart)?)?;
        }
        if changes.users {
            store.set(keys::USERS, to_json(keys::USERS, &self.users)?)?;
        }
        if changes.session {
            match self.session.username() {
                Some(username) => store.set(keys::SESSION_USER, username.to_string())?,
                None => store.remove(keys::SESSION_USER)?,
            }
        }
        Ok(())
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub const fn users(&self) -> &UserRegistry {
        &self.users
    }

    #[must_use]
    pub const fn session(&self) -> &AuthSession {
        &self.session
    }

    #[must_use]
    pub const fn checkout_stage(&self) -> CheckoutStage {
        self.checkout.stage()
    }

    /// Apply one user action.
    ///
    /// # Errors
    ///
    /// Returns `ShopError` when the action is rejected. Cart, registry and
    /// session are unchanged on error.
    pub fn apply(&mut self, catalog: &Catalog, intent: Intent) -> Result<Transition, ShopError> {
        let cart_changed = Changes {
            cart: true,
            ..Changes::NONE
        };

        match intent {
            Intent::AddToCart(id) => {
                let product = catalog.get(id).ok_or(ShopError::UnknownProduct(id))?;
                let change = self.cart.add(product);
                Ok(Transition::to(Screen::Storefront)
                    .touching(cart_changed)
                    .notify(Notification::success(cart_message(&change))))
            }

            Intent::RemoveFromCart(id) => Ok(match self.cart.remove_one(id) {
                Some(change) => Transition::to(Screen::Storefront)
                    .touching(cart_changed)
                    .notify(Notification::info(cart_message(&change))),
                None => Transition::to(Screen::Storefront),
            }),

            Intent::RequestClearCart => Ok(if self.cart.is_empty() {
                Transition::to(Screen::Storefront).notify(Notification::info("Your cart is already empty."))
            } else {
                Transition::to(Screen::ConfirmClear)
            }),

            Intent::ClearCart(confirmation) => Ok(match self.cart.clear(confirmation) {
                Some(change) => {
                    tracing::info!("Cart cleared");
                    Transition::to(Screen::Storefront)
                        .touching(cart_changed)
                        .notify(Notification::success(cart_message(&change)))
                }
                None => Transition::to(Screen::Storefront),
            }),

            Intent::Register(form) => {
                let username = AuthService::new(&mut self.users, &mut self.session).register(&form)?;
                Ok(Transition::to(Screen::Storefront)
                    .touching(Changes {
                        users: true,
                        session: true,
                        ..Changes::NONE
                    })
                    .notify(Notification::success(format!("Welcome, {username}!"))))
            }

            Intent::Login(form) => {
                let username = AuthService::new(&mut self.users, &mut self.session).login(&form)?;
                Ok(Transition::to(Screen::Storefront)
                    .touching(Changes {
                        session: true,
                        ..Changes::NONE
                    })
                    .notify(Notification::success(format!("Welcome back, {username}!"))))
            }

            Intent::Logout => {
                self.checkout.close();
                Ok(match AuthService::new(&mut self.users, &mut self.session).logout() {
                    Some(_) => Transition::to(Screen::Storefront)
                        .touching(Changes {
                            session: true,
                            ..Changes::NONE
                        })
                        .notify(Notification::info("You have been logged out.")),
                    None => Transition::to(Screen::Storefront),
                })
            }

            Intent::BeginCheckout => Ok(match self.checkout.begin(&self.session, &self.cart)? {
                CheckoutStage::AwaitingAuth => Transition::to(Screen::AuthPrompt)
                    .notify(Notification::info("Please log in or register to check out.")),
                _ => Transition::to(Screen::PaymentForm),
            }),

            Intent::SubmitPayment(form) => {
                let request = self.checkout.submit(&form, &self.cart)?;
                tracing::info!(amount = %request.amount, "Payment submitted");
                let mut transition = Transition::to(Screen::Processing);
                transition.effect = Some(Effect::ProcessPayment(request));
                Ok(transition)
            }

            Intent::PaymentCompleted(outcome) => {
                let receipt = self.checkout.complete(outcome)?;
                self.cart.clear(Confirmation::Confirmed);
                self.checkout.close();
                tracing::info!(reference = %receipt.reference, amount = %receipt.amount, "Order completed");
                Ok(Transition::to(Screen::Storefront)
                    .touching(cart_changed)
                    .notify(Notification::success(format!(
                        "Payment successful! Order reference {}.",
                        receipt.reference.simple()
                    ))))
            }

            Intent::CancelCheckout => {
                self.checkout.close();
                Ok(Transition::to(Screen::Storefront))
            }
        }
    }
}

fn to_json<T: serde::Serialize>(key: &'static str, value: &T) -> Result<String, StorageError> {
    serde_json::to_string(value).map_err(|source| StorageError::Serialize { key, source })
}

/// Acknowledgment text for a cart mutation.
fn cart_message(change: &CartChange) -> String {
    match change {
        CartChange::Added { name } => format!("{name} added to cart"),
        CartChange::Incremented { name, .. } => format!("Added another {name} to cart"),
        CartChange::Decremented { name, .. } => format!("Reduced {name} in cart"),
        CartChange::Removed { name } => format!("{name} removed from cart"),
        CartChange::Cleared => "Cart cleared".to_string(),
    }
}
