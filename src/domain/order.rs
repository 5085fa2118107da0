use std::collections::HashMap;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::DomainError;
use super::money::Currency;
use super::product::ProductReference;

labelled_enum! {
    pub enum CustomerType {
        Individual => "individual",
        Company => "company",
    }
}

labelled_enum! {
    pub enum PaymentMethod {
        Revolut => "REVOLUT",
        Paypal => "PAYPAL",
        IbanRon => "IBAN_RON",
        IbanEur => "IBAN_EUR",
        WesternUnion => "WU",
    }
}

labelled_enum! {
    /// `created → pending_payment → paid → shipped → completed`, with
    /// `cancelled` reachable from anything before `completed`.
    pub enum OrderStatus {
        Created => "created",
        PendingPayment => "pending_payment",
        Paid => "paid",
        Shipped => "shipped",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

labelled_enum! {
    pub enum PaymentStatus {
        Unpaid => "unpaid",
        Pending => "pending",
        Paid => "paid",
        Failed => "failed",
    }
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        match (*self, next) {
            (Created, PendingPayment)
            | (PendingPayment, Paid)
            | (Paid, Shipped)
            | (Shipped, Completed) => true,
            (from, Cancelled) => !from.is_terminal(),
            _ => false,
        }
    }

    /// Validates a move to `next`; staying put is always allowed.
    pub fn transition(self, next: OrderStatus) -> Result<OrderStatus, DomainError> {
        if self == next || self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(DomainError::InvalidTransition {
                kind: "status",
                from: self.as_str(),
                to: next.as_str(),
            })
        }
    }
}

impl PaymentStatus {
    pub fn can_transition_to(&self, next: PaymentStatus) -> bool {
        use PaymentStatus::*;
        matches!(
            (*self, next),
            (Unpaid, Pending | Paid | Failed) | (Pending, Paid | Failed) | (Failed, Pending | Paid)
        )
    }

    pub fn transition(self, next: PaymentStatus) -> Result<PaymentStatus, DomainError> {
        if self == next || self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(DomainError::InvalidTransition {
                kind: "paymentStatus",
                from: self.as_str(),
                to: next.as_str(),
            })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerSnapshot {
    pub full_name: Option<String>,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanySnapshot {
    pub company_name: String,
    pub vat_number: String,
    pub contact_person: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub country: String,
    pub city: String,
    pub address_line: String,
    pub postal_code: String,
}

/// Commercial record of one ordered product, frozen at order time.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLineSnapshot {
    /// Kept so fulfillment can still reach the live product (barcode lookup).
    pub product_id: Uuid,
    pub name: String,
    pub image: Option<String>,
    pub unit_price: BigDecimal,
    pub units_per_box: u32,
    pub boxes: u32,
    pub pallets: u32,
    pub line_total: BigDecimal,
}

impl OrderLineSnapshot {
    pub fn total_units(&self) -> u64 {
        u64::from(self.boxes) * u64::from(self.units_per_box)
    }
}

/// A fully priced and validated order that has not been numbered or stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
    pub user_id: Uuid,
    pub customer_type: CustomerType,
    pub customer: CustomerSnapshot,
    pub company: Option<CompanySnapshot>,
    pub shipping_address: Address,
    pub lines: Vec<OrderLineSnapshot>,
    pub currency: Currency,
    pub subtotal: BigDecimal,
    pub shipping: BigDecimal,
    pub total: BigDecimal,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: Uuid,
    pub order_number: String,
    pub user_id: Uuid,
    pub customer_type: CustomerType,
    pub customer: CustomerSnapshot,
    pub company: Option<CompanySnapshot>,
    pub shipping_address: Address,
    pub lines: Vec<OrderLineSnapshot>,
    pub currency: Currency,
    pub subtotal: BigDecimal,
    pub shipping: BigDecimal,
    pub total: BigDecimal,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn from_draft(id: Uuid, order_number: String, draft: OrderDraft, at: DateTime<Utc>) -> Self {
        Self {
            id,
            order_number,
            user_id: draft.user_id,
            customer_type: draft.customer_type,
            customer: draft.customer,
            company: draft.company,
            shipping_address: draft.shipping_address,
            lines: draft.lines,
            currency: draft.currency,
            subtotal: draft.subtotal,
            shipping: draft.shipping,
            total: draft.total,
            payment_method: draft.payment_method,
            status: draft.status,
            payment_status: draft.payment_status,
            notes: draft.notes,
            created_at: at,
            updated_at: at,
        }
    }

    /// `total == subtotal + shipping` and `subtotal == Σ line_total`, exactly.
    pub fn reconciles(&self) -> bool {
        let lines_sum = self
            .lines
            .iter()
            .fold(BigDecimal::from(0), |acc, l| acc + &l.line_total);
        self.subtotal == lines_sum && self.total == &self.subtotal + &self.shipping
    }
}

/// The only order fields that may change after creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusChange {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
}

impl StatusChange {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.payment_status.is_none()
    }

    /// Checks both state machines against the current values and returns the
    /// resulting `(status, payment_status)` pair.
    pub fn apply_to(
        &self,
        status: OrderStatus,
        payment_status: PaymentStatus,
    ) -> Result<(OrderStatus, PaymentStatus), DomainError> {
        let status = match self.status {
            Some(next) => status.transition(next)?,
            None => status,
        };
        let payment_status = match self.payment_status {
            Some(next) => payment_status.transition(next)?,
            None => payment_status,
        };
        Ok((status, payment_status))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: i64,
    pub limit: i64,
}

impl Page {
    pub const DEFAULT_LIMIT: i64 = 50;
    pub const MAX_LIMIT: i64 = 200;

    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit
                .unwrap_or(Self::DEFAULT_LIMIT)
                .clamp(1, Self::MAX_LIMIT),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

#[derive(Debug, Clone)]
pub struct OrderPage {
    pub items: Vec<Order>,
    pub total: i64,
}

/// Admin listing entry: the stored order plus whatever the live catalog still
/// knows about each referenced product.
#[derive(Debug, Clone)]
pub struct AdminOrderView {
    pub order: Order,
    pub products: HashMap<Uuid, ProductReference>,
}

#[derive(Debug, Clone)]
pub struct AdminOrderPage {
    pub items: Vec<AdminOrderView>,
    pub total: i64,
}
