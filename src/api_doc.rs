use utoipa::OpenApi;

use crate::handlers::{health, orders};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Storefront orders",
        description = "Cart pricing, order placement and order history"
    ),
    paths(
        orders::create_order,
        orders::initiate_payment,
        orders::my_orders,
        orders::get_order,
        orders::admin_orders,
        orders::update_status,
        health::health,
    ),
    components(schemas(
        orders::PlaceOrderRequest,
        orders::CustomerRequest,
        orders::CompanyRequest,
        orders::AddressRequest,
        orders::CartLineRequest,
        orders::UpdateStatusRequest,
        orders::PlaceOrderResponse,
        orders::UserProfileResponse,
        orders::CompanyProfileResponse,
        orders::AddressResponse,
        orders::OrderResponse,
        orders::OrderHeaderResponse,
        orders::OrderItemResponse,
        orders::CustomerResponse,
        orders::CompanyResponse,
        orders::AdminOrderResponse,
        orders::AdminOrderItemResponse,
        orders::ProductReferenceResponse,
        orders::ListAdminOrdersResponse,
    )),
    tags(
        (name = "orders", description = "Checkout and order history"),
        (name = "payments", description = "Checkout through payment initiation"),
        (name = "admin", description = "Back-office order management"),
        (name = "health", description = "Liveness"),
    )
)]
pub struct ApiDoc;
