use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::order_service::{OrderService, PlacedOrder};
use crate::domain::assembler::{AddressInput, Checkout, CheckoutPath, CompanyInput, CustomerInput};
use crate::domain::money::Currency;
use crate::domain::order::{
    Address, AdminOrderView, Order, OrderLineSnapshot, Page, StatusChange,
};
use crate::domain::pricing::CartItem;
use crate::domain::product::ProductReference;
use crate::domain::user::{CompanyProfile, UserProfile};
use crate::errors::AppError;
use crate::handlers::identity::AuthenticatedUser;

// ── Request DTOs ─────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRequest {
    /// Required for individual orders only.
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRequest {
    pub company_name: Option<String>,
    pub vat_number: Option<String>,
    pub contact_person: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressRequest {
    pub country: Option<String>,
    pub city: Option<String>,
    pub address_line: Option<String>,
    pub postal_code: Option<String>,
}

/// One cart line. Any price, name or packaging field the client sends is ignored.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartLineRequest {
    pub product_id: Uuid,
    /// Number of boxes.
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub pallets: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    /// "individual" or "company"
    pub customer_type: Option<String>,
    #[serde(default)]
    pub customer: CustomerRequest,
    pub company: Option<CompanyRequest>,
    #[serde(default)]
    pub shipping_address: AddressRequest,
    #[serde(default)]
    pub cart: Vec<CartLineRequest>,
    /// REVOLUT, PAYPAL, IBAN_RON, IBAN_EUR or WU
    pub payment_method: Option<String>,
    /// RON (default) or EUR
    pub currency: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
    pub payment_status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListOrdersParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl TryFrom<PlaceOrderRequest> for Checkout {
    type Error = AppError;

    fn try_from(req: PlaceOrderRequest) -> Result<Self, Self::Error> {
        let customer_type = present(req.customer_type)
            .ok_or_else(|| AppError::invalid("customerType", "Customer type is required."))?
            .trim()
            .parse()
            .map_err(|_| AppError::invalid("customerType", "Unknown customer type."))?;
        let payment_method = present(req.payment_method)
            .ok_or_else(|| AppError::invalid("paymentMethod", "Payment method is required."))?
            .trim()
            .parse()
            .map_err(|_| AppError::invalid("paymentMethod", "Unsupported payment method."))?;
        let currency = match present(req.currency) {
            Some(raw) => raw
                .trim()
                .to_ascii_uppercase()
                .parse()
                .map_err(|_| AppError::invalid("currency", "Unsupported currency."))?,
            None => Currency::default(),
        };

        Ok(Checkout {
            customer_type,
            customer: CustomerInput {
                full_name: req.customer.full_name,
                email: req.customer.email,
                phone: req.customer.phone,
            },
            company: req.company.map(|c| CompanyInput {
                company_name: c.company_name,
                vat_number: c.vat_number,
                contact_person: c.contact_person,
            }),
            shipping_address: AddressInput {
                country: req.shipping_address.country,
                city: req.shipping_address.city,
                address_line: req.shipping_address.address_line,
                postal_code: req.shipping_address.postal_code,
            },
            cart: req
                .cart
                .into_iter()
                .map(|l| CartItem {
                    product_id: l.product_id,
                    quantity: l.quantity,
                    pallets: l.pallets,
                })
                .collect(),
            payment_method,
            currency,
            notes: req.notes,
        })
    }
}

impl TryFrom<UpdateStatusRequest> for StatusChange {
    type Error = AppError;

    fn try_from(req: UpdateStatusRequest) -> Result<Self, Self::Error> {
        Ok(StatusChange {
            status: present(req.status)
                .map(|s| s.trim().parse())
                .transpose()
                .map_err(|_| AppError::invalid("status", "Unknown order status."))?,
            payment_status: present(req.payment_status)
                .map(|s| s.trim().parse())
                .transpose()
                .map_err(|_| AppError::invalid("paymentStatus", "Unknown payment status."))?,
        })
    }
}

// ── Response DTOs ────────────────────────────────────────────────────────────

fn money(amount: &BigDecimal) -> String {
    amount.to_string()
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressResponse {
    pub country: String,
    pub city: String,
    pub address_line: String,
    pub postal_code: String,
}

impl From<&Address> for AddressResponse {
    fn from(a: &Address) -> Self {
        Self {
            country: a.country.clone(),
            city: a.city.clone(),
            address_line: a.address_line.clone(),
            postal_code: a.postal_code.clone(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfileResponse {
    pub company_name: String,
    pub vat_number: String,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub invoice_address: Option<AddressResponse>,
}

impl From<&CompanyProfile> for CompanyProfileResponse {
    fn from(c: &CompanyProfile) -> Self {
        Self {
            company_name: c.company_name.clone(),
            vat_number: c.vat_number.clone(),
            contact_person: c.contact_person.clone(),
            email: c.email.clone(),
            phone: c.phone.clone(),
            invoice_address: c.invoice_address.as_ref().map(AddressResponse::from),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileResponse {
    pub id: Uuid,
    pub username: String,
    pub role: String,
    pub account_type: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub shipping_address: Option<AddressResponse>,
    pub company: Option<CompanyProfileResponse>,
}

impl From<&UserProfile> for UserProfileResponse {
    fn from(u: &UserProfile) -> Self {
        Self {
            id: u.id,
            username: u.username.clone(),
            role: u.role.to_string(),
            account_type: u.account_type.to_string(),
            email: u.email.clone(),
            phone: u.phone.clone(),
            shipping_address: u.shipping_address.as_ref().map(AddressResponse::from),
            company: u.company.as_ref().map(CompanyProfileResponse::from),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderResponse {
    pub message: String,
    pub order_id: Uuid,
    pub order_number: String,
    /// The caller's profile after any company upgrade; null if it could not be read back.
    pub updated_user: Option<UserProfileResponse>,
}

impl PlaceOrderResponse {
    fn new(message: &str, placed: PlacedOrder) -> Self {
        Self {
            message: message.to_string(),
            order_id: placed.order_id,
            order_number: placed.order_number,
            updated_user: placed.user.as_ref().map(UserProfileResponse::from),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerResponse {
    pub full_name: Option<String>,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyResponse {
    pub company_name: String,
    pub vat_number: String,
    pub contact_person: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemResponse {
    pub product_id: Uuid,
    pub name: String,
    pub image: Option<String>,
    pub unit_price: String,
    pub units_per_box: u32,
    pub boxes: u32,
    pub pallets: u32,
    pub total_units: u64,
    pub line_total: String,
}

impl From<&OrderLineSnapshot> for OrderItemResponse {
    fn from(l: &OrderLineSnapshot) -> Self {
        Self {
            product_id: l.product_id,
            name: l.name.clone(),
            image: l.image.clone(),
            unit_price: money(&l.unit_price),
            units_per_box: l.units_per_box,
            boxes: l.boxes,
            pallets: l.pallets,
            total_units: l.total_units(),
            line_total: money(&l.line_total),
        }
    }
}

/// Order fields shared by the customer and the admin views.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderHeaderResponse {
    pub id: Uuid,
    pub order_number: String,
    pub user_id: Uuid,
    pub customer_type: String,
    pub customer: CustomerResponse,
    pub company: Option<CompanyResponse>,
    pub shipping_address: AddressResponse,
    pub currency: String,
    pub subtotal: String,
    pub shipping: String,
    pub total: String,
    pub payment_method: String,
    pub status: String,
    pub payment_status: String,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Order> for OrderHeaderResponse {
    fn from(o: &Order) -> Self {
        Self {
            id: o.id,
            order_number: o.order_number.clone(),
            user_id: o.user_id,
            customer_type: o.customer_type.to_string(),
            customer: CustomerResponse {
                full_name: o.customer.full_name.clone(),
                email: o.customer.email.clone(),
                phone: o.customer.phone.clone(),
            },
            company: o.company.as_ref().map(|c| CompanyResponse {
                company_name: c.company_name.clone(),
                vat_number: c.vat_number.clone(),
                contact_person: c.contact_person.clone(),
            }),
            shipping_address: AddressResponse::from(&o.shipping_address),
            currency: o.currency.to_string(),
            subtotal: money(&o.subtotal),
            shipping: money(&o.shipping),
            total: money(&o.total),
            payment_method: o.payment_method.to_string(),
            status: o.status.to_string(),
            payment_status: o.payment_status.to_string(),
            notes: o.notes.clone(),
            created_at: o.created_at.to_rfc3339(),
            updated_at: o.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    #[serde(flatten)]
    pub header: OrderHeaderResponse,
    pub items: Vec<OrderItemResponse>,
}

impl From<&Order> for OrderResponse {
    fn from(o: &Order) -> Self {
        Self {
            header: OrderHeaderResponse::from(o),
            items: o.lines.iter().map(OrderItemResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductReferenceResponse {
    pub barcode: Option<String>,
    pub units_per_box: Option<u32>,
}

impl From<&ProductReference> for ProductReferenceResponse {
    fn from(r: &ProductReference) -> Self {
        Self {
            barcode: r.barcode.clone(),
            units_per_box: r.units_per_box,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminOrderItemResponse {
    #[serde(flatten)]
    pub item: OrderItemResponse,
    /// What the catalog currently holds for this line's product; null once it is gone.
    pub product: Option<ProductReferenceResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminOrderResponse {
    #[serde(flatten)]
    pub header: OrderHeaderResponse,
    pub items: Vec<AdminOrderItemResponse>,
}

impl From<&AdminOrderView> for AdminOrderResponse {
    fn from(view: &AdminOrderView) -> Self {
        Self {
            header: OrderHeaderResponse::from(&view.order),
            items: view
                .order
                .lines
                .iter()
                .map(|l| AdminOrderItemResponse {
                    item: OrderItemResponse::from(l),
                    product: view
                        .products
                        .get(&l.product_id)
                        .map(ProductReferenceResponse::from),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListAdminOrdersResponse {
    pub items: Vec<AdminOrderResponse>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

async fn place(
    service: web::Data<OrderService>,
    user: AuthenticatedUser,
    body: PlaceOrderRequest,
    path: CheckoutPath,
    message: &str,
) -> Result<HttpResponse, AppError> {
    let checkout = Checkout::try_from(body)?;
    let actor = *user.actor();

    let placed = web::block(move || service.place_order(&actor, checkout, path))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(PlaceOrderResponse::new(message, placed)))
}

/// POST /orders
///
/// Prices the cart against the live catalog and stores the order with status
/// `created`. Company orders also upgrade the caller's profile.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = PlaceOrderRequest,
    params(
        ("X-User-Id" = Uuid, Header, description = "Authenticated user id"),
        ("X-User-Role" = Option<String>, Header, description = "client (default) or admin"),
    ),
    responses(
        (status = 201, description = "Order created", body = PlaceOrderResponse),
        (status = 400, description = "Invalid customer, shipping or cart data"),
        (status = 401, description = "Missing identity"),
        (status = 403, description = "Admins cannot place orders"),
        (status = 404, description = "Cart references an unknown product"),
        (status = 409, description = "No free order number after retries"),
        (status = 503, description = "Store unavailable, safe to retry"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    service: web::Data<OrderService>,
    user: AuthenticatedUser,
    body: web::Json<PlaceOrderRequest>,
) -> Result<HttpResponse, AppError> {
    place(
        service,
        user,
        body.into_inner(),
        CheckoutPath::Direct,
        "Order created successfully",
    )
    .await
}

/// POST /payments/initiate
///
/// Same checkout as `POST /orders`, but the order starts as `pending_payment`.
#[utoipa::path(
    post,
    path = "/payments/initiate",
    request_body = PlaceOrderRequest,
    params(
        ("X-User-Id" = Uuid, Header, description = "Authenticated user id"),
        ("X-User-Role" = Option<String>, Header, description = "client (default) or admin"),
    ),
    responses(
        (status = 201, description = "Order created, awaiting payment", body = PlaceOrderResponse),
        (status = 400, description = "Invalid customer, shipping or cart data"),
        (status = 401, description = "Missing identity"),
        (status = 403, description = "Admins cannot place orders"),
        (status = 404, description = "Cart references an unknown product"),
        (status = 503, description = "Store unavailable, safe to retry"),
    ),
    tag = "payments"
)]
pub async fn initiate_payment(
    service: web::Data<OrderService>,
    user: AuthenticatedUser,
    body: web::Json<PlaceOrderRequest>,
) -> Result<HttpResponse, AppError> {
    place(
        service,
        user,
        body.into_inner(),
        CheckoutPath::PaymentInitiation,
        "Payment initiated",
    )
    .await
}

/// GET /orders/my
#[utoipa::path(
    get,
    path = "/orders/my",
    params(
        ("X-User-Id" = Uuid, Header, description = "Authenticated user id"),
    ),
    responses(
        (status = 200, description = "The caller's orders, newest first", body = [OrderResponse]),
        (status = 401, description = "Missing identity"),
    ),
    tag = "orders"
)]
pub async fn my_orders(
    service: web::Data<OrderService>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let actor = *user.actor();

    let orders = web::block(move || service.my_orders(&actor))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<OrderResponse> = orders.iter().map(OrderResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /orders/{id}
///
/// Orders belonging to someone else are reported as not found.
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
        ("X-User-Id" = Uuid, Header, description = "Authenticated user id"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 401, description = "Missing identity"),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    service: web::Data<OrderService>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let actor = *user.actor();

    let order = web::block(move || service.get_order(&actor, order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(&order)))
}

/// GET /orders/admin/all
///
/// Every order, newest first, with each line's current catalog barcode and
/// packaging for fulfilment.
#[utoipa::path(
    get,
    path = "/orders/admin/all",
    params(
        ("page" = Option<i64>, Query, description = "Page number (1-based, default 1)"),
        ("limit" = Option<i64>, Query, description = "Items per page (default 50, max 200)"),
        ("X-User-Id" = Uuid, Header, description = "Authenticated user id"),
        ("X-User-Role" = String, Header, description = "Must be admin"),
    ),
    responses(
        (status = 200, description = "Paginated list of orders", body = ListAdminOrdersResponse),
        (status = 401, description = "Missing identity"),
        (status = 403, description = "Caller is not an admin"),
    ),
    tag = "admin"
)]
pub async fn admin_orders(
    service: web::Data<OrderService>,
    user: AuthenticatedUser,
    query: web::Query<ListOrdersParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let page = Page::new(params.page, params.limit);
    let actor = *user.actor();

    let listed = web::block(move || service.admin_orders(&actor, page))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ListAdminOrdersResponse {
        items: listed.items.iter().map(AdminOrderResponse::from).collect(),
        total: listed.total,
        page: page.page,
        limit: page.limit,
    }))
}

/// PATCH /orders/admin/{id}/status
#[utoipa::path(
    patch,
    path = "/orders/admin/{id}/status",
    request_body = UpdateStatusRequest,
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
        ("X-User-Id" = Uuid, Header, description = "Authenticated user id"),
        ("X-User-Role" = String, Header, description = "Must be admin"),
    ),
    responses(
        (status = 200, description = "Order after the transition", body = OrderResponse),
        (status = 400, description = "Unknown status value or nothing to update"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Transition not allowed from the current state"),
    ),
    tag = "admin"
)]
pub async fn update_status(
    service: web::Data<OrderService>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    body: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let change = StatusChange::try_from(body.into_inner())?;
    let actor = *user.actor();

    let order = web::block(move || service.update_status(&actor, order_id, change))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(&order)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::{CustomerType, OrderStatus, PaymentMethod, PaymentStatus};

    fn request(json: serde_json::Value) -> PlaceOrderRequest {
        serde_json::from_value(json).expect("request should deserialize")
    }

    #[test]
    fn client_prices_in_the_cart_are_dropped_on_decode() {
        let id = Uuid::new_v4();
        let req = request(serde_json::json!({
            "customerType": "individual",
            "paymentMethod": "WU",
            "cart": [{ "productId": id, "quantity": 3, "price": "0.01", "unitsPerBox": 1000 }]
        }));

        let checkout = Checkout::try_from(req).expect("valid checkout");

        assert_eq!(checkout.customer_type, CustomerType::Individual);
        assert_eq!(checkout.payment_method, PaymentMethod::WesternUnion);
        assert_eq!(checkout.currency, Currency::Ron);
        assert_eq!(
            checkout.cart,
            vec![CartItem {
                product_id: id,
                quantity: 3,
                pallets: 0
            }]
        );
    }

    #[test]
    fn enum_fields_fail_with_their_field_name() {
        let cases = [
            (serde_json::json!({ "paymentMethod": "PAYPAL" }), "customerType"),
            (
                serde_json::json!({ "customerType": "reseller", "paymentMethod": "PAYPAL" }),
                "customerType",
            ),
            (serde_json::json!({ "customerType": "company" }), "paymentMethod"),
            (
                serde_json::json!({ "customerType": "company", "paymentMethod": "CASH" }),
                "paymentMethod",
            ),
            (
                serde_json::json!({
                    "customerType": "company",
                    "paymentMethod": "IBAN_EUR",
                    "currency": "USD"
                }),
                "currency",
            ),
        ];

        for (json, expected) in cases {
            match Checkout::try_from(request(json.clone())) {
                Err(AppError::Validation { field, .. }) => {
                    assert_eq!(field, Some(expected), "{json}")
                }
                other => panic!("expected validation error for {json}, got {other:?}"),
            }
        }
    }

    #[test]
    fn currency_is_case_insensitive() {
        let checkout = Checkout::try_from(request(serde_json::json!({
            "customerType": "company",
            "paymentMethod": "IBAN_EUR",
            "currency": "eur"
        })))
        .expect("valid checkout");
        assert_eq!(checkout.currency, Currency::Eur);
    }

    #[test]
    fn status_request_parses_both_machines() {
        let change = StatusChange::try_from(UpdateStatusRequest {
            status: Some("shipped".into()),
            payment_status: Some("paid".into()),
        })
        .expect("valid change");
        assert_eq!(change.status, Some(OrderStatus::Shipped));
        assert_eq!(change.payment_status, Some(PaymentStatus::Paid));

        let err = StatusChange::try_from(UpdateStatusRequest {
            status: None,
            payment_status: Some("refunded".into()),
        })
        .unwrap_err();
        assert!(matches!(err, AppError::Validation { field: Some("paymentStatus"), .. }));
    }
}
