//! Builds the immutable order snapshot from resolved lines and customer data.

use bigdecimal::BigDecimal;
use uuid::Uuid;

use super::errors::DomainError;
use super::money::{exceeds_max_amount, is_negative, Currency};
use super::order::{
    Address, CompanySnapshot, CustomerSnapshot, CustomerType, OrderDraft, OrderStatus,
    PaymentMethod, PaymentStatus,
};
use super::pricing::{CartItem, ResolvedCart};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerInput {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyInput {
    pub company_name: Option<String>,
    pub vat_number: Option<String>,
    pub contact_person: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressInput {
    pub country: Option<String>,
    pub city: Option<String>,
    pub address_line: Option<String>,
    pub postal_code: Option<String>,
}

/// Everything a customer submits at checkout. Carries no prices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkout {
    pub customer_type: CustomerType,
    pub customer: CustomerInput,
    pub company: Option<CompanyInput>,
    pub shipping_address: AddressInput,
    pub cart: Vec<CartItem>,
    pub payment_method: PaymentMethod,
    pub currency: Currency,
    pub notes: Option<String>,
}

/// Which entry point placed the order; decides the initial status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutPath {
    Direct,
    PaymentInitiation,
}

impl CheckoutPath {
    pub fn initial_status(&self) -> OrderStatus {
        match self {
            CheckoutPath::Direct => OrderStatus::Created,
            CheckoutPath::PaymentInitiation => OrderStatus::PendingPayment,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OrderAssembler {
    shipping_fee: BigDecimal,
}

impl OrderAssembler {
    pub fn new(shipping_fee: BigDecimal) -> Result<Self, DomainError> {
        if is_negative(&shipping_fee) {
            return Err(DomainError::Internal(
                "shipping fee must not be negative".to_string(),
            ));
        }
        Ok(Self { shipping_fee })
    }

    /// Validates the customer side of `checkout` and builds the order snapshot.
    ///
    /// Subtotal is recomputed from the lines and total from subtotal and
    /// shipping, so whatever totals the caller holds are never used.
    pub fn assemble(
        &self,
        user_id: Uuid,
        checkout: &Checkout,
        resolved: ResolvedCart,
        path: CheckoutPath,
    ) -> Result<OrderDraft, DomainError> {
        if resolved.lines.is_empty() {
            return Err(DomainError::invalid_cart("Order must have at least one item."));
        }

        let customer = validate_customer(checkout.customer_type, &checkout.customer)?;
        let company = match checkout.customer_type {
            CustomerType::Company => Some(validate_company(checkout.company.as_ref())?),
            CustomerType::Individual => None,
        };
        let shipping_address = validate_address(&checkout.shipping_address)?;

        let currency = checkout.currency;
        let subtotal = resolved
            .lines
            .iter()
            .fold(currency.zero(), |acc, l| acc + &l.line_total);
        let shipping = currency.round(&self.shipping_fee);
        let total = &subtotal + &shipping;
        if exceeds_max_amount(&total) {
            return Err(DomainError::invalid_cart("Order total is too large."));
        }

        Ok(OrderDraft {
            user_id,
            customer_type: checkout.customer_type,
            customer,
            company,
            shipping_address,
            lines: resolved.lines,
            currency,
            subtotal,
            shipping,
            total,
            payment_method: checkout.payment_method,
            status: path.initial_status(),
            payment_status: PaymentStatus::Unpaid,
            notes: present(checkout.notes.as_deref()),
        })
    }
}

fn present(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

// Column widths of the order and user tables.
const NAME_MAX: usize = 255;
const EMAIL_MAX: usize = 255;
const PHONE_MAX: usize = 50;
const VAT_MAX: usize = 50;
const COUNTRY_MAX: usize = 100;
const CITY_MAX: usize = 100;
const ADDRESS_LINE_MAX: usize = 255;
const POSTAL_CODE_MAX: usize = 20;

fn bounded(
    value: Option<&str>,
    field: &'static str,
    label: &str,
    max_chars: usize,
) -> Result<Option<String>, DomainError> {
    match present(value) {
        Some(v) if v.chars().count() > max_chars => Err(DomainError::invalid(
            field,
            format!("{label} must be at most {max_chars} characters."),
        )),
        other => Ok(other),
    }
}

fn required(
    value: Option<&str>,
    field: &'static str,
    label: &str,
    max_chars: usize,
) -> Result<String, DomainError> {
    bounded(value, field, label, max_chars)?
        .ok_or_else(|| DomainError::invalid(field, format!("{label} is required.")))
}

fn validate_customer(
    customer_type: CustomerType,
    input: &CustomerInput,
) -> Result<CustomerSnapshot, DomainError> {
    let full_name = match customer_type {
        CustomerType::Individual => Some(required(
            input.full_name.as_deref(),
            "customer.fullName",
            "Full name",
            NAME_MAX,
        )?),
        CustomerType::Company => bounded(
            input.full_name.as_deref(),
            "customer.fullName",
            "Full name",
            NAME_MAX,
        )?,
    };
    let email = required(input.email.as_deref(), "customer.email", "Email", EMAIL_MAX)?;
    if !looks_like_email(&email) {
        return Err(DomainError::invalid(
            "customer.email",
            "Email address is not valid.",
        ));
    }
    let phone = required(input.phone.as_deref(), "customer.phone", "Phone", PHONE_MAX)?;

    Ok(CustomerSnapshot {
        full_name,
        email,
        phone,
    })
}

fn looks_like_email(email: &str) -> bool {
    email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty())
}

fn validate_company(input: Option<&CompanyInput>) -> Result<CompanySnapshot, DomainError> {
    let input = input.ok_or_else(|| {
        DomainError::invalid("company", "Company details are required for company orders.")
    })?;
    Ok(CompanySnapshot {
        company_name: required(
            input.company_name.as_deref(),
            "company.companyName",
            "Company name",
            NAME_MAX,
        )?,
        vat_number: required(
            input.vat_number.as_deref(),
            "company.vatNumber",
            "VAT number",
            VAT_MAX,
        )?,
        contact_person: required(
            input.contact_person.as_deref(),
            "company.contactPerson",
            "Contact person",
            NAME_MAX,
        )?,
    })
}

fn validate_address(input: &AddressInput) -> Result<Address, DomainError> {
    Ok(Address {
        country: required(
            input.country.as_deref(),
            "shippingAddress.country",
            "Country",
            COUNTRY_MAX,
        )?,
        city: required(input.city.as_deref(), "shippingAddress.city", "City", CITY_MAX)?,
        address_line: required(
            input.address_line.as_deref(),
            "shippingAddress.addressLine",
            "Address",
            ADDRESS_LINE_MAX,
        )?,
        postal_code: required(
            input.postal_code.as_deref(),
            "shippingAddress.postalCode",
            "Postal code",
            POSTAL_CODE_MAX,
        )?,
    })
}
