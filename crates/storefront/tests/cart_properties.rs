//! Property tests for cart invariants.

#![allow(clippy::unwrap_used)]

use std::collections::HashSet;

use proptest::prelude::*;
use rust_decimal::Decimal;

use tienda_core::ProductId;
use tienda_storefront::catalog::Product;
use tienda_storefront::models::Cart;

#[derive(Debug, Clone)]
enum Op {
    Add(usize),
    Remove(usize),
}

fn products() -> Vec<Product> {
    [(1, 1250), (2, 199), (3, 0), (4, 4999)]
        .into_iter()
        .map(|(id, cents)| Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Decimal::new(cents, 2),
            image: String::new(),
            category: "test".to_string(),
        })
        .collect()
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..4usize).prop_map(Op::Add),
        (0..4usize).prop_map(Op::Remove),
    ]
}

/// Insertion-ordered `(catalog index, quantity)` pairs, updated by the
/// add-one / remove-one rules independently of `Cart`.
#[derive(Debug, Default)]
struct Model(Vec<(usize, u32)>);

impl Model {
    fn add(&mut self, index: usize) {
        match self.0.iter_mut().find(|(i, _)| *i == index) {
            Some((_, quantity)) => *quantity += 1,
            None => self.0.push((index, 1)),
        }
    }

    fn remove_one(&mut self, index: usize) {
        if let Some(pos) = self.0.iter().position(|(i, _)| *i == index) {
            self.0[pos].1 -= 1;
            if self.0[pos].1 == 0 {
                self.0.remove(pos);
            }
        }
    }
}

proptest! {
    #[test]
    fn cart_matches_reference_model(ops in prop::collection::vec(op(), 0..64)) {
        let catalog = products();
        let mut cart = Cart::new();
        let mut model = Model::default();

        for op in ops {
            match op {
                Op::Add(i) => {
                    cart.add(&catalog[i]);
                    model.add(i);
                }
                Op::Remove(i) => {
                    cart.remove_one(catalog[i].id);
                    model.remove_one(i);
                }
            }
        }

        let actual: Vec<(ProductId, u32)> = cart
            .lines()
            .iter()
            .map(|l| (l.product.id, l.quantity))
            .collect();
        let expected: Vec<(ProductId, u32)> = model
            .0
            .iter()
            .map(|&(i, quantity)| (catalog[i].id, quantity))
            .collect();
        prop_assert_eq!(actual, expected);

        let expected_total: Decimal = model
            .0
            .iter()
            .map(|&(i, quantity)| catalog[i].price * Decimal::from(quantity))
            .sum();
        prop_assert_eq!(cart.total(), expected_total);
        prop_assert!(cart.total() >= Decimal::ZERO);
        prop_assert_eq!(cart.item_count(), model.0.iter().map(|&(_, q)| q).sum::<u32>());

        prop_assert!(cart.lines().iter().all(|l| l.quantity >= 1));
        let ids: HashSet<ProductId> = cart.lines().iter().map(|l| l.product.id).collect();
        prop_assert_eq!(ids.len(), cart.lines().len());
    }

    #[test]
    fn cart_survives_json(ops in prop::collection::vec(op(), 0..32)) {
        let catalog = products();
        let mut cart = Cart::new();
        for op in ops {
            if let Op::Add(i) = op {
                cart.add(&catalog[i]);
            }
        }

        let json = serde_json::to_string(&cart).unwrap();
        let restored: Cart = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(restored, cart);
    }
}
