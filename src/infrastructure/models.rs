use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{
    Address, CompanySnapshot, CustomerSnapshot, Order, OrderDraft, OrderLineSnapshot,
};
use crate::domain::product::{parse_packaging, Product};
use crate::domain::user::{AccountType, CompanyProfile, CompanyUpgrade, UserProfile};
use crate::schema::{order_items, orders, products, users};

// ── Catalog ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductRow {
    pub id: Uuid,
    pub name: String,
    pub price: BigDecimal,
    pub stock: String,
    pub units_per_box: Option<String>,
    pub box_per_palet: Option<String>,
    pub barcode: Option<String>,
    pub image: Option<String>,
    pub category: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = products)]
pub struct NewProductRow {
    pub id: Uuid,
    pub name: String,
    pub price: BigDecimal,
    pub stock: String,
    pub units_per_box: Option<String>,
    pub box_per_palet: Option<String>,
    pub barcode: Option<String>,
    pub image: Option<String>,
    pub category: String,
}

impl TryFrom<ProductRow> for Product {
    type Error = DomainError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        Ok(Product {
            id: row.id,
            name: row.name,
            price: row.price,
            units_per_box: parse_packaging(row.units_per_box.as_deref()),
            box_per_palet: parse_packaging(row.box_per_palet.as_deref()),
            stock: row.stock.parse()?,
            category: row.category.parse()?,
            barcode: non_blank(row.barcode),
            image: non_blank(row.image),
        })
    }
}

// ── Users ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub role: String,
    pub account_type: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub ship_country: Option<String>,
    pub ship_city: Option<String>,
    pub ship_address_line: Option<String>,
    pub ship_postal_code: Option<String>,
    pub company_name: Option<String>,
    pub company_vat_number: Option<String>,
    pub company_contact_person: Option<String>,
    pub company_email: Option<String>,
    pub company_phone: Option<String>,
    pub invoice_country: Option<String>,
    pub invoice_city: Option<String>,
    pub invoice_address_line: Option<String>,
    pub invoice_postal_code: Option<String>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow {
    pub id: Uuid,
    pub username: String,
    pub role: String,
    pub account_type: String,
}

/// Columns a company order writes back onto the user.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = users)]
pub struct CompanyUpgradeChangeset {
    pub account_type: String,
    pub email: String,
    pub phone: String,
    pub ship_country: String,
    pub ship_city: String,
    pub ship_address_line: String,
    pub ship_postal_code: String,
    pub company_name: String,
    pub company_vat_number: String,
    pub company_contact_person: Option<String>,
    pub company_email: Option<String>,
    pub company_phone: Option<String>,
    pub invoice_country: Option<String>,
    pub invoice_city: Option<String>,
    pub invoice_address_line: Option<String>,
    pub invoice_postal_code: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<&CompanyUpgrade> for CompanyUpgradeChangeset {
    fn from(u: &CompanyUpgrade) -> Self {
        let invoice = u.company.invoice_address.as_ref();
        Self {
            account_type: AccountType::Company.as_str().to_string(),
            email: u.email.clone(),
            phone: u.phone.clone(),
            ship_country: u.shipping_address.country.clone(),
            ship_city: u.shipping_address.city.clone(),
            ship_address_line: u.shipping_address.address_line.clone(),
            ship_postal_code: u.shipping_address.postal_code.clone(),
            company_name: u.company.company_name.clone(),
            company_vat_number: u.company.vat_number.clone(),
            company_contact_person: u.company.contact_person.clone(),
            company_email: u.company.email.clone(),
            company_phone: u.company.phone.clone(),
            invoice_country: invoice.map(|a| a.country.clone()),
            invoice_city: invoice.map(|a| a.city.clone()),
            invoice_address_line: invoice.map(|a| a.address_line.clone()),
            invoice_postal_code: invoice.map(|a| a.postal_code.clone()),
            updated_at: Utc::now(),
        }
    }
}

impl TryFrom<UserRow> for UserProfile {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let shipping_address = address(
            row.ship_country,
            row.ship_city,
            row.ship_address_line,
            row.ship_postal_code,
        );
        let invoice_address = address(
            row.invoice_country,
            row.invoice_city,
            row.invoice_address_line,
            row.invoice_postal_code,
        );
        let company = match (non_blank(row.company_name), non_blank(row.company_vat_number)) {
            (Some(company_name), Some(vat_number)) => Some(CompanyProfile {
                company_name,
                vat_number,
                contact_person: non_blank(row.company_contact_person),
                email: non_blank(row.company_email),
                phone: non_blank(row.company_phone),
                invoice_address,
            }),
            _ => None,
        };
        Ok(UserProfile {
            id: row.id,
            username: row.username,
            role: row.role.parse()?,
            account_type: row.account_type.parse()?,
            email: non_blank(row.email),
            phone: non_blank(row.phone),
            shipping_address,
            company,
        })
    }
}

// ── Orders ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: Uuid,
    pub order_number: String,
    pub user_id: Uuid,
    pub customer_type: String,
    pub customer_full_name: Option<String>,
    pub customer_email: String,
    pub customer_phone: String,
    pub company_name: Option<String>,
    pub company_vat_number: Option<String>,
    pub company_contact_person: Option<String>,
    pub ship_country: String,
    pub ship_city: String,
    pub ship_address_line: String,
    pub ship_postal_code: String,
    pub currency: String,
    pub subtotal: BigDecimal,
    pub shipping: BigDecimal,
    pub total: BigDecimal,
    pub payment_method: String,
    pub status: String,
    pub payment_status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub id: Uuid,
    pub order_number: String,
    pub user_id: Uuid,
    pub customer_type: String,
    pub customer_full_name: Option<String>,
    pub customer_email: String,
    pub customer_phone: String,
    pub company_name: Option<String>,
    pub company_vat_number: Option<String>,
    pub company_contact_person: Option<String>,
    pub ship_country: String,
    pub ship_city: String,
    pub ship_address_line: String,
    pub ship_postal_code: String,
    pub currency: String,
    pub subtotal: BigDecimal,
    pub shipping: BigDecimal,
    pub total: BigDecimal,
    pub payment_method: String,
    pub status: String,
    pub payment_status: String,
    pub notes: Option<String>,
}

impl NewOrderRow {
    pub fn from_draft(id: Uuid, order_number: &str, d: &OrderDraft) -> Self {
        let company = d.company.as_ref();
        Self {
            id,
            order_number: order_number.to_string(),
            user_id: d.user_id,
            customer_type: d.customer_type.as_str().to_string(),
            customer_full_name: d.customer.full_name.clone(),
            customer_email: d.customer.email.clone(),
            customer_phone: d.customer.phone.clone(),
            company_name: company.map(|c| c.company_name.clone()),
            company_vat_number: company.map(|c| c.vat_number.clone()),
            company_contact_person: company.map(|c| c.contact_person.clone()),
            ship_country: d.shipping_address.country.clone(),
            ship_city: d.shipping_address.city.clone(),
            ship_address_line: d.shipping_address.address_line.clone(),
            ship_postal_code: d.shipping_address.postal_code.clone(),
            currency: d.currency.as_str().to_string(),
            subtotal: d.subtotal.clone(),
            shipping: d.shipping.clone(),
            total: d.total.clone(),
            payment_method: d.payment_method.as_str().to_string(),
            status: d.status.as_str().to_string(),
            payment_status: d.payment_status.as_str().to_string(),
            notes: d.notes.clone(),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = order_items)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderItemRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub position: i32,
    pub product_id: Uuid,
    pub name: String,
    pub image: Option<String>,
    pub unit_price: BigDecimal,
    pub units_per_box: i32,
    pub boxes: i32,
    pub pallets: i32,
    pub line_total: BigDecimal,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_items)]
pub struct NewOrderItemRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub position: i32,
    pub product_id: Uuid,
    pub name: String,
    pub image: Option<String>,
    pub unit_price: BigDecimal,
    pub units_per_box: i32,
    pub boxes: i32,
    pub pallets: i32,
    pub line_total: BigDecimal,
}

impl NewOrderItemRow {
    pub fn from_line(
        order_id: Uuid,
        position: usize,
        line: &OrderLineSnapshot,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            id: Uuid::new_v4(),
            order_id,
            position: to_i32(position, "position")?,
            product_id: line.product_id,
            name: line.name.clone(),
            image: line.image.clone(),
            unit_price: line.unit_price.clone(),
            units_per_box: to_i32(line.units_per_box, "units_per_box")?,
            boxes: to_i32(line.boxes, "boxes")?,
            pallets: to_i32(line.pallets, "pallets")?,
            line_total: line.line_total.clone(),
        })
    }
}

impl TryFrom<OrderItemRow> for OrderLineSnapshot {
    type Error = DomainError;

    fn try_from(row: OrderItemRow) -> Result<Self, Self::Error> {
        Ok(OrderLineSnapshot {
            product_id: row.product_id,
            name: row.name,
            image: non_blank(row.image),
            unit_price: row.unit_price,
            units_per_box: to_u32(row.units_per_box, "units_per_box")?,
            boxes: to_u32(row.boxes, "boxes")?,
            pallets: to_u32(row.pallets, "pallets")?,
            line_total: row.line_total,
        })
    }
}

/// Reassembles an order from its header and its items (any order; sorted by position here).
pub fn order_from_rows(row: OrderRow, mut items: Vec<OrderItemRow>) -> Result<Order, DomainError> {
    items.sort_by_key(|i| i.position);
    let lines = items
        .into_iter()
        .map(OrderLineSnapshot::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    let company = match (row.company_name, row.company_vat_number) {
        (Some(company_name), Some(vat_number)) => Some(CompanySnapshot {
            company_name,
            vat_number,
            contact_person: row.company_contact_person.unwrap_or_default(),
        }),
        _ => None,
    };

    Ok(Order {
        id: row.id,
        order_number: row.order_number,
        user_id: row.user_id,
        customer_type: row.customer_type.parse()?,
        customer: CustomerSnapshot {
            full_name: row.customer_full_name,
            email: row.customer_email,
            phone: row.customer_phone,
        },
        company,
        shipping_address: Address {
            country: row.ship_country,
            city: row.ship_city,
            address_line: row.ship_address_line,
            postal_code: row.ship_postal_code,
        },
        lines,
        currency: row.currency.parse()?,
        subtotal: row.subtotal,
        shipping: row.shipping,
        total: row.total,
        payment_method: row.payment_method.parse()?,
        status: row.status.parse()?,
        payment_status: row.payment_status.parse()?,
        notes: row.notes,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn address(
    country: Option<String>,
    city: Option<String>,
    address_line: Option<String>,
    postal_code: Option<String>,
) -> Option<Address> {
    Some(Address {
        country: non_blank(country)?,
        city: non_blank(city)?,
        address_line: non_blank(address_line)?,
        postal_code: non_blank(postal_code)?,
    })
}

fn to_i32<T>(value: T, column: &str) -> Result<i32, DomainError>
where
    T: TryInto<i32> + Copy + std::fmt::Display,
{
    value
        .try_into()
        .map_err(|_| DomainError::Internal(format!("{column} {value} does not fit the column")))
}

fn to_u32(value: i32, column: &str) -> Result<u32, DomainError> {
    u32::try_from(value).map_err(|_| DomainError::Internal(format!("negative {column} stored")))
}
