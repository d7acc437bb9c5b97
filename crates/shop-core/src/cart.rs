//! # Cart Types
//!
//! Ephemeral cart: a mapping of product id to desired quantity.
//! The cart is per-caller state; nothing here is shared or persisted.
//! Summary and line-item derivation are pure functions of cart × catalog.

use crate::checkout::{to_minor_units, LineItem};
use crate::product::Catalog;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summary of a cart resolved against the catalog
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CartSummary {
    /// Total quantity across resolved entries
    pub item_count: u32,
    /// Subtotal in major currency units (unrounded until display)
    pub subtotal: f64,
}

/// A cart: product id → quantity, quantities always positive.
///
/// Entries iterate in id order, so derived line items are deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    entries: BTreeMap<String, u32>,
}

impl Cart {
    /// Create an empty cart
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of a product; increments if already present
    pub fn add(&mut self, product_id: impl Into<String>) {
        *self.entries.entry(product_id.into()).or_insert(0) += 1;
    }

    /// Remove a product entirely (not decrement-to-zero).
    /// Removing an absent id is a no-op.
    pub fn remove(&mut self, product_id: &str) {
        self.entries.remove(product_id);
    }

    /// Clear all entries
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Quantity for a product, 0 if absent
    pub fn quantity(&self, product_id: &str) -> u32 {
        self.entries.get(product_id).copied().unwrap_or(0)
    }

    /// Number of distinct products in the cart
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cart is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate (product_id, quantity) entries in id order
    pub fn entries(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(id, qty)| (id.as_str(), *qty))
    }

    /// Derive the cart summary against a catalog.
    ///
    /// Entries whose product id is no longer in the catalog are silently
    /// skipped, never an error.
    pub fn summary(&self, catalog: &Catalog) -> CartSummary {
        let mut item_count = 0u32;
        let mut subtotal = 0f64;

        for (id, qty) in self.entries() {
            if let Some(product) = catalog.get(id) {
                item_count += qty;
                subtotal += product.price * qty as f64;
            }
        }

        CartSummary {
            item_count,
            subtotal,
        }
    }

    /// Derive checkout line items against a catalog, skipping stale ids
    pub fn line_items(&self, catalog: &Catalog) -> Vec<LineItem> {
        self.entries()
            .filter_map(|(id, qty)| {
                catalog.get(id).map(|product| LineItem {
                    name: product.name.clone(),
                    unit_amount: to_minor_units(product.price),
                    quantity: qty,
                })
            })
            .collect()
    }
}
