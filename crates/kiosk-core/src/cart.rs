//! # Cart
//!
//! The cart a cashier builds before confirming a sale. It lives entirely
//! in the caller's hands and is only persisted by checkout.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Cashier Action            Cart Change                                  │
//! │  ──────────────            ───────────                                  │
//! │  Pick product + qty ─────► add()            entries.push / qty += n     │
//! │  Change quantity ────────► update_quantity() entries[i].qty = n         │
//! │  Remove line ────────────► remove()          entries.remove(i)          │
//! │  Confirm ────────────────► checkout(session, cart.entries())            │
//! │                            then clear()                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::Product;
use crate::validation::{validate_price_cents, validate_quantity};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// One line of the cart: a product, the price it sells at, and how many.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    pub product_id: i64,

    /// Price in cents frozen when the line was added. Checkout charges
    /// this, not whatever the shelf price is at commit time.
    pub unit_price_cents: i64,

    pub quantity: i64,
}

impl CartEntry {
    pub fn new(product_id: i64, unit_price: Money, quantity: i64) -> Self {
        CartEntry {
            product_id,
            unit_price_cents: unit_price.cents(),
            quantity,
        }
    }

    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// `unit price × quantity`. Only exact for validated entries; use
    /// [`checked_subtotal`](Self::checked_subtotal) on untrusted input.
    #[inline]
    pub fn subtotal(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }

    /// `unit price × quantity`, or [`CoreError::AmountOutOfRange`] when it
    /// overflows.
    pub fn checked_subtotal(&self) -> CoreResult<Money> {
        self.unit_price()
            .checked_multiply_quantity(self.quantity)
            .ok_or_else(|| CoreError::AmountOutOfRange {
                what: format!("subtotal of product {}", self.product_id),
            })
    }

    /// Checks the line is sellable: positive bounded quantity, price in
    /// range, subtotal representable.
    pub fn validate(&self) -> CoreResult<()> {
        validate_quantity(self.quantity)?;
        validate_price_cents(self.unit_price_cents)?;
        self.checked_subtotal()?;
        Ok(())
    }
}

/// The in-progress cart.
///
/// ## Invariants
/// - Entries are unique by `product_id` (adding the same product again
///   increases its quantity)
/// - Every quantity is in `1..=MAX_ITEM_QUANTITY`
/// - At most `MAX_CART_ITEMS` entries
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    pub fn new() -> Self {
        Cart::default()
    }

    /// Adds `quantity` units of `product`, freezing its current price.
    pub fn add(&mut self, product: &Product, quantity: i64) -> CoreResult<()> {
        validate_quantity(quantity)?;
        validate_price_cents(product.unit_price_cents)?;

        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|e| e.product_id == product.id)
        {
            let new_qty = entry.quantity + quantity;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            entry.quantity = new_qty;
            return Ok(());
        }

        if self.entries.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }

        self.entries
            .push(CartEntry::new(product.id, product.unit_price(), quantity));
        Ok(())
    }

    /// Sets the quantity of a line. Zero removes it.
    pub fn update_quantity(&mut self, product_id: i64, quantity: i64) -> CoreResult<()> {
        if quantity == 0 {
            return self.remove(product_id);
        }
        validate_quantity(quantity)?;

        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.product_id == product_id)
            .ok_or(CoreError::NotInCart(product_id))?;
        entry.quantity = quantity;
        Ok(())
    }

    pub fn remove(&mut self, product_id: i64) -> CoreResult<()> {
        let before = self.entries.len();
        self.entries.retain(|e| e.product_id != product_id);
        if self.entries.len() == before {
            return Err(CoreError::NotInCart(product_id));
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Lines in the order they were added.
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Sum of the line subtotals.
    pub fn total(&self) -> Money {
        self.entries.iter().map(CartEntry::subtotal).sum()
    }

    /// Checks every line against a catalog snapshot before checkout.
    ///
    /// Checkout itself does not guard stock unless asked to; this is the
    /// counter-side check the sale form runs on the products it just read.
    pub fn check_stock(&self, catalog: &[Product]) -> CoreResult<()> {
        for entry in &self.entries {
            let product = catalog
                .iter()
                .find(|p| p.id == entry.product_id)
                .ok_or(CoreError::ProductNotFound(entry.product_id))?;

            if !product.can_sell(entry.quantity) {
                return Err(CoreError::InsufficientStock {
                    product_id: product.id,
                    available: product.quantity,
                    requested: entry.quantity,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64, price: i64, stock: i64) -> Product {
        Product {
            id,
            name: format!("Product {id}"),
            supplier_id: 1,
            quantity: stock,
            unit_price_cents: price,
        }
    }

    #[test]
    fn test_add_merges_same_product() {
        let mut cart = Cart::new();
        let alfajor = product(7, 250, 10);

        cart.add(&alfajor, 2).unwrap();
        cart.add(&alfajor, 1).unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.entries()[0].quantity, 3);
        assert_eq!(cart.total().cents(), 750);
    }

    #[test]
    fn test_price_is_frozen_at_add() {
        let mut cart = Cart::new();
        let mut soda = product(9, 1000, 5);
        cart.add(&soda, 1).unwrap();

        soda.unit_price_cents = 1200;
        assert_eq!(cart.entries()[0].unit_price_cents, 1000);
    }

    #[test]
    fn test_entries_keep_insertion_order() {
        let mut cart = Cart::new();
        cart.add(&product(9, 1000, 5), 1).unwrap();
        cart.add(&product(7, 250, 5), 3).unwrap();

        let ids: Vec<i64> = cart.entries().iter().map(|e| e.product_id).collect();
        assert_eq!(ids, vec![9, 7]);
        assert_eq!(cart.total().cents(), 1750);
    }

    #[test]
    fn test_rejects_bad_quantities() {
        let mut cart = Cart::new();
        let p = product(1, 100, 5);

        assert!(cart.add(&p, 0).is_err());
        assert!(cart.add(&p, -2).is_err());

        cart.add(&p, MAX_ITEM_QUANTITY).unwrap();
        assert!(matches!(
            cart.add(&p, 1),
            Err(CoreError::QuantityTooLarge { .. })
        ));
    }

    #[test]
    fn test_cart_size_cap() {
        let mut cart = Cart::new();
        for id in 0..MAX_CART_ITEMS as i64 {
            cart.add(&product(id, 100, 1), 1).unwrap();
        }
        assert!(matches!(
            cart.add(&product(10_000, 100, 1), 1),
            Err(CoreError::CartTooLarge { .. })
        ));
    }

    #[test]
    fn test_update_and_remove() {
        let mut cart = Cart::new();
        cart.add(&product(1, 100, 5), 1).unwrap();

        cart.update_quantity(1, 4).unwrap();
        assert_eq!(cart.entries()[0].quantity, 4);

        cart.update_quantity(1, 0).unwrap();
        assert!(cart.is_empty());

        assert!(matches!(cart.remove(1), Err(CoreError::NotInCart(1))));
        assert!(cart.update_quantity(2, 3).is_err());
    }

    #[test]
    fn test_check_stock() {
        let mut cart = Cart::new();
        let catalog = vec![product(7, 250, 3), product(9, 1000, 0)];

        cart.add(&catalog[0], 3).unwrap();
        assert!(cart.check_stock(&catalog).is_ok());

        cart.add(&catalog[1], 1).unwrap();
        assert!(matches!(
            cart.check_stock(&catalog),
            Err(CoreError::InsufficientStock {
                product_id: 9,
                available: 0,
                requested: 1
            })
        ));

        assert!(matches!(
            cart.check_stock(&catalog[..1]),
            Err(CoreError::ProductNotFound(9))
        ));
    }

    #[test]
    fn test_entry_validate() {
        assert!(CartEntry::new(1, Money::from_cents(100), 1).validate().is_ok());
        assert!(CartEntry::new(1, Money::from_cents(100), 0).validate().is_err());
        assert!(CartEntry::new(1, Money::from_cents(-1), 1).validate().is_err());
        assert!(CartEntry::new(1, Money::from_cents(i64::MAX / 2), 3)
            .validate()
            .is_err());
    }

    #[test]
    fn test_checked_subtotal() {
        let entry = CartEntry::new(7, Money::from_cents(250), 3);
        assert_eq!(entry.checked_subtotal().unwrap().cents(), 750);

        let huge = CartEntry::new(7, Money::from_cents(i64::MAX / 2), 3);
        assert!(matches!(
            huge.checked_subtotal(),
            Err(CoreError::AmountOutOfRange { .. })
        ));
    }
}
