//! Turns client cart intents into authoritative, priced order lines.
//!
//! The cart payload only names products and quantities. Unit price and
//! packaging always come from the live catalog rows handed in here.

use std::collections::{HashMap, HashSet};

use bigdecimal::BigDecimal;
use uuid::Uuid;

use super::errors::DomainError;
use super::money::{exceeds_max_amount, is_negative, Currency};
use super::order::OrderLineSnapshot;
use super::product::Product;

/// One line of the checkout cart: which product, how many boxes, how many pallets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    pub product_id: Uuid,
    pub quantity: i64,
    pub pallets: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCart {
    pub lines: Vec<OrderLineSnapshot>,
    pub subtotal: BigDecimal,
}

/// Distinct product ids in first-seen order, for the catalog lookup.
pub fn referenced_ids(items: &[CartItem]) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    items
        .iter()
        .map(|i| i.product_id)
        .filter(|id| seen.insert(*id))
        .collect()
}

/// Prices `items` against `products`.
///
/// Fails when any item references a product missing from `products`, before
/// anything is priced. Items resolving to zero boxes are dropped; if nothing
/// survives the cart is rejected.
pub fn resolve(
    items: &[CartItem],
    products: &[Product],
    currency: Currency,
) -> Result<ResolvedCart, DomainError> {
    if items.is_empty() {
        return Err(DomainError::invalid_cart("Cart is empty."));
    }

    let catalog: HashMap<Uuid, &Product> = products.iter().map(|p| (p.id, p)).collect();
    if let Some(missing) = items.iter().find(|i| !catalog.contains_key(&i.product_id)) {
        return Err(DomainError::ProductNotFound(missing.product_id));
    }

    let mut lines = Vec::with_capacity(items.len());
    for item in items {
        let product = catalog
            .get(&item.product_id)
            .ok_or(DomainError::ProductNotFound(item.product_id))?;
        if let Some(line) = price_line(item, product, currency)? {
            lines.push(line);
        }
    }

    if lines.is_empty() {
        return Err(DomainError::invalid_cart("Cart has no valid quantities."));
    }

    let subtotal = lines
        .iter()
        .fold(currency.zero(), |acc, l| acc + &l.line_total);
    if exceeds_max_amount(&subtotal) {
        return Err(DomainError::invalid_cart("Order total is too large."));
    }

    Ok(ResolvedCart { lines, subtotal })
}

fn price_line(
    item: &CartItem,
    product: &Product,
    currency: Currency,
) -> Result<Option<OrderLineSnapshot>, DomainError> {
    let (boxes, pallets) = boxes_and_pallets(item, product);
    if boxes <= 0 {
        return Ok(None);
    }

    let too_large =
        || DomainError::invalid_cart(format!("Quantity for product {} is too large.", product.id));
    let boxes = i32::try_from(boxes)
        .ok()
        .and_then(|b| u32::try_from(b).ok())
        .ok_or_else(too_large)?;
    let pallets = u32::try_from(pallets).map_err(|_| too_large())?;

    if is_negative(&product.price) {
        return Err(DomainError::Internal(format!(
            "product {} has a negative price",
            product.id
        )));
    }

    let units_per_box = product.effective_units_per_box();
    let unit_price = product.price.clone();
    let units = u64::from(boxes) * u64::from(units_per_box);
    let line_total = currency.round(&(BigDecimal::from(units) * &unit_price));
    if exceeds_max_amount(&line_total) {
        return Err(too_large());
    }

    Ok(Some(OrderLineSnapshot {
        product_id: product.id,
        name: product.name.clone(),
        image: product.image.clone(),
        unit_price,
        units_per_box,
        boxes,
        pallets,
        line_total,
    }))
}

/// Pallets win over boxes when the product has a pallet size.
fn boxes_and_pallets(item: &CartItem, product: &Product) -> (i64, i64) {
    let pallets = item.pallets.max(0);
    match product.box_per_palet {
        Some(per_pallet) if pallets > 0 => (pallets.saturating_mul(i64::from(per_pallet)), pallets),
        _ => (item.quantity, 0),
    }
}
