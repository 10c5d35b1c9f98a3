//! Shopping cart domain types.
//!
//! The cart is an ordered list of lines, one per product, kept in insertion
//! order. Every quantity is at least 1; a line whose quantity would drop to
//! zero is removed instead.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tienda_core::{Price, ProductId};

use crate::catalog::Product;

/// One product in the cart with its quantity.
///
/// Serializes as the flat product object plus a `quantity` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: u32,
}

impl CartLine {
    /// Price of this line: unit price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

/// What a successful cart mutation did, for user-facing notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartChange {
    /// A new line was appended.
    Added { name: String },
    /// An existing line's quantity went up.
    Incremented { name: String, quantity: u32 },
    /// An existing line's quantity went down.
    Decremented { name: String, quantity: u32 },
    /// The last unit of a line was removed.
    Removed { name: String },
    /// All lines were removed.
    Cleared,
}

/// User's answer to the "empty your cart?" prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

impl Confirmation {
    /// Interpret a yes/no form value. Anything but an explicit yes declines.
    #[must_use]
    pub fn from_answer(answer: &str) -> Self {
        match answer.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" | "true" | "confirm" => Self::Confirmed,
            _ => Self::Declined,
        }
    }
}

/// The shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CartLine>", into = "Vec<CartLine>")]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Build a cart from possibly inconsistent lines.
    ///
    /// Lines with quantity 0 are dropped and repeated product IDs are merged
    /// into the first occurrence, so restored data always satisfies the cart
    /// invariants.
    #[must_use]
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        let mut cart = Self::new();
        for line in lines.into_iter().filter(|l| l.quantity > 0) {
            match cart.position(line.product.id) {
                Some(index) => {
                    if let Some(existing) = cart.lines.get_mut(index) {
                        existing.quantity = existing.quantity.saturating_add(line.quantity);
                    }
                }
                None => cart.lines.push(line),
            }
        }
        cart
    }

    fn position(&self, id: ProductId) -> Option<usize> {
        self.lines.iter().position(|l| l.product.id == id)
    }

    /// Add one unit of a product.
    pub fn add(&mut self, product: &Product) -> CartChange {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product.id == product.id) {
            line.quantity = line.quantity.saturating_add(1);
            return CartChange::Incremented {
                name: line.product.name.clone(),
                quantity: line.quantity,
            };
        }

        self.lines.push(CartLine {
            product: product.clone(),
            quantity: 1,
        });
        CartChange::Added {
            name: product.name.clone(),
        }
    }

    /// Remove one unit of a product. Returns `None` if it is not in the cart.
    pub fn remove_one(&mut self, id: ProductId) -> Option<CartChange> {
        let index = self.position(id)?;
        let line = self.lines.get_mut(index)?;

        if line.quantity > 1 {
            line.quantity -= 1;
            return Some(CartChange::Decremented {
                name: line.product.name.clone(),
                quantity: line.quantity,
            });
        }

        let line = self.lines.remove(index);
        Some(CartChange::Removed {
            name: line.product.name,
        })
    }

    /// Empty the cart if the user confirmed. Returns `None` when declined.
    pub fn clear(&mut self, confirmation: Confirmation) -> Option<CartChange> {
        match confirmation {
            Confirmation::Confirmed => {
                self.lines.clear();
                Some(CartChange::Cleared)
            }
            Confirmation::Declined => None,
        }
    }

    /// Sum of price × quantity over all lines.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// Total with currency, for display.
    #[must_use]
    pub fn total_price(&self) -> Price {
        Price::from_amount(self.total())
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Quantity of a product in the cart, 0 if absent.
    #[must_use]
    pub fn quantity_of(&self, id: ProductId) -> u32 {
        self.lines
            .iter()
            .find(|l| l.product.id == id)
            .map_or(0, |l| l.quantity)
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |acc, l| acc.saturating_add(l.quantity))
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl From<Vec<CartLine>> for Cart {
    fn from(lines: Vec<CartLine>) -> Self {
        Self::from_lines(lines)
    }
}

impl From<Cart> for Vec<CartLine> {
    fn from(cart: Cart) -> Self {
        cart.lines
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(id: i32, price: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Decimal::from(price),
            image: format!("/static/img/{id}.svg"),
            category: "test".to_string(),
        }
    }

    #[test]
    fn test_add_twice_makes_one_line() {
        let a = product(1, 10);
        let mut cart = Cart::new();

        assert!(matches!(cart.add(&a), CartChange::Added { .. }));
        assert!(matches!(
            cart.add(&a),
            CartChange::Incremented { quantity: 2, .. }
        ));

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.quantity_of(a.id), 2);
        assert_eq!(cart.total(), Decimal::from(20));
    }

    #[test]
    fn test_lines_keep_insertion_order() {
        let mut cart = Cart::new();
        cart.add(&product(3, 1));
        cart.add(&product(1, 1));
        cart.add(&product(3, 1));

        let ids: Vec<i32> = cart.lines().iter().map(|l| l.product.id.as_i32()).collect();
        assert_eq!(ids, [3, 1]);
    }

    #[test]
    fn test_remove_last_unit_removes_line() {
        let a = product(1, 10);
        let mut cart = Cart::new();
        cart.add(&a);

        assert!(matches!(
            cart.remove_one(a.id),
            Some(CartChange::Removed { .. })
        ));
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);
    }

    #[test]
    fn test_remove_decrements() {
        let a = product(1, 10);
        let mut cart = Cart::new();
        cart.add(&a);
        cart.add(&a);

        assert!(matches!(
            cart.remove_one(a.id),
            Some(CartChange::Decremented { quantity: 1, .. })
        ));
        assert_eq!(cart.total(), Decimal::from(10));
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut cart = Cart::new();
        cart.add(&product(1, 10));
        let before = cart.clone();

        assert!(cart.remove_one(ProductId::new(42)).is_none());
        assert_eq!(cart, before);
    }

    #[test]
    fn test_clear_requires_confirmation() {
        let mut cart = Cart::new();
        cart.add(&product(1, 10));
        let before = cart.clone();

        assert!(cart.clear(Confirmation::Declined).is_none());
        assert_eq!(cart, before);

        assert_eq!(cart.clear(Confirmation::Confirmed), Some(CartChange::Cleared));
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);
    }

    #[test]
    fn test_total_with_fractional_prices() {
        let mut mug = product(1, 0);
        mug.price = Decimal::new(1250, 2);
        let mut cart = Cart::new();
        cart.add(&mug);
        cart.add(&mug);
        cart.add(&product(2, 5));

        assert_eq!(cart.total(), Decimal::from(30));
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.total_price().to_string(), "$30.00");
    }

    #[test]
    fn test_from_lines_normalizes() {
        let a = product(1, 2);
        let b = product(2, 3);
        let cart = Cart::from_lines(vec![
            CartLine { product: a.clone(), quantity: 1 },
            CartLine { product: b.clone(), quantity: 0 },
            CartLine { product: a.clone(), quantity: 2 },
        ]);

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.quantity_of(a.id), 3);
        assert_eq!(cart.quantity_of(b.id), 0);
    }

    #[test]
    fn test_serializes_as_flat_line_array() {
        let mut cart = Cart::new();
        cart.add(&product(1, 10));

        let value = serde_json::to_value(&cart).unwrap();
        let line = &value.as_array().unwrap()[0];
        assert_eq!(line["id"], 1);
        assert_eq!(line["name"], "Product 1");
        assert_eq!(line["quantity"], 1);

        let restored: Cart = serde_json::from_value(value).unwrap();
        assert_eq!(restored, cart);
    }

    #[test]
    fn test_confirmation_from_answer() {
        assert_eq!(Confirmation::from_answer("yes"), Confirmation::Confirmed);
        assert_eq!(Confirmation::from_answer(" YES "), Confirmation::Confirmed);
        assert_eq!(Confirmation::from_answer("no"), Confirmation::Declined);
        assert_eq!(Confirmation::from_answer(""), Confirmation::Declined);
    }
}
