//! Client-side staging cart.
//!
//! Nothing in here is trusted at checkout: the cart only says which products
//! and how many boxes/pallets. Prices shown from it are indicative and are
//! re-resolved from the catalog when the order is placed.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::pricing::CartItem;
use super::product::Product;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: Uuid,
    pub name: String,
    pub price: BigDecimal,
    pub units_per_box: u32,
    pub box_per_palet: Option<u32>,
    pub boxes: u32,
    pub pallets: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Adds one box of `product`, starting a new line at 1 box / 0 pallets.
    pub fn add(&mut self, product: &Product) {
        if let Some(line) = self.line_mut(product.id) {
            line.boxes = line.boxes.saturating_add(1);
            return;
        }
        self.lines.push(CartLine {
            product_id: product.id,
            name: product.name.clone(),
            price: product.price.clone(),
            units_per_box: product.effective_units_per_box(),
            box_per_palet: product.box_per_palet,
            boxes: 1,
            pallets: 0,
        });
    }

    /// Sets the box count directly. Pallets reset to 0; 0 boxes drops the line.
    pub fn set_boxes(&mut self, product_id: Uuid, boxes: u32) {
        if boxes == 0 {
            self.remove(product_id);
            return;
        }
        if let Some(line) = self.line_mut(product_id) {
            line.boxes = boxes;
            line.pallets = 0;
        }
    }

    /// Sets the pallet count; boxes become `pallets * box_per_palet`, replacing
    /// whatever box count was there. Lines whose product has no pallet size are
    /// left untouched and `false` is returned.
    pub fn set_pallets(&mut self, product_id: Uuid, pallets: u32) -> bool {
        let Some(line) = self.line_mut(product_id) else {
            return false;
        };
        let Some(per_pallet) = line.box_per_palet else {
            return false;
        };
        line.pallets = pallets;
        line.boxes = pallets.saturating_mul(per_pallet);
        if line.boxes == 0 {
            self.remove(product_id);
        }
        true
    }

    /// Takes one box off a line, dropping it when it reaches zero.
    pub fn decrease(&mut self, product_id: Uuid) {
        if let Some(line) = self.line_mut(product_id) {
            line.boxes = line.boxes.saturating_sub(1);
        }
        self.lines.retain(|l| l.boxes > 0);
    }

    pub fn remove(&mut self, product_id: Uuid) {
        self.lines.retain(|l| l.product_id != product_id);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn box_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.boxes)).sum()
    }

    /// Display-only estimate; the server never reads it.
    pub fn indicative_total(&self) -> BigDecimal {
        self.lines.iter().fold(BigDecimal::from(0), |acc, l| {
            acc + BigDecimal::from(u64::from(l.boxes) * u64::from(l.units_per_box)) * &l.price
        })
    }

    /// The checkout payload: product references and quantities, no prices.
    pub fn to_items(&self) -> Vec<CartItem> {
        self.lines
            .iter()
            .map(|l| CartItem {
                product_id: l.product_id,
                quantity: i64::from(l.boxes),
                pallets: i64::from(l.pallets),
            })
            .collect()
    }

    fn line_mut(&mut self, product_id: Uuid) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|l| l.product_id == product_id)
    }
}
