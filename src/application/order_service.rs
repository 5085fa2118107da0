use std::collections::HashMap;
use std::sync::Arc;

use log::{error, info, warn};
use uuid::Uuid;

use crate::domain::assembler::{Checkout, CheckoutPath, OrderAssembler};
use crate::domain::errors::DomainError;
use crate::domain::order::{AdminOrderPage, AdminOrderView, Order, OrderDraft, Page, StatusChange};
use crate::domain::order_number::OrderNumberGenerator;
use crate::domain::ports::{CatalogStore, OrderRepository, UserStore};
use crate::domain::pricing;
use crate::domain::product::ProductReference;
use crate::domain::user::{CompanyUpgrade, Role, UserProfile};

/// The authenticated caller of a service operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: Uuid,
    pub role: Role,
}

impl Actor {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, Clone)]
pub struct PlacedOrder {
    pub order_id: Uuid,
    pub order_number: String,
    pub user: Option<UserProfile>,
}

pub struct OrderService {
    orders: Arc<dyn OrderRepository>,
    catalog: Arc<dyn CatalogStore>,
    users: Arc<dyn UserStore>,
    numbers: Arc<dyn OrderNumberGenerator>,
    assembler: OrderAssembler,
    max_number_attempts: u32,
}

impl OrderService {
    pub const DEFAULT_MAX_NUMBER_ATTEMPTS: u32 = 5;

    pub fn new(
        orders: Arc<dyn OrderRepository>,
        catalog: Arc<dyn CatalogStore>,
        users: Arc<dyn UserStore>,
        numbers: Arc<dyn OrderNumberGenerator>,
        assembler: OrderAssembler,
    ) -> Self {
        Self {
            orders,
            catalog,
            users,
            numbers,
            assembler,
            max_number_attempts: Self::DEFAULT_MAX_NUMBER_ATTEMPTS,
        }
    }

    pub fn with_max_number_attempts(mut self, attempts: u32) -> Self {
        self.max_number_attempts = attempts.max(1);
        self
    }

    /// Prices the cart against the live catalog, stores the order snapshot and,
    /// for company orders, upgrades the caller's profile afterwards.
    ///
    /// Any failure before the insert commits leaves nothing behind.
    pub fn place_order(
        &self,
        actor: &Actor,
        checkout: Checkout,
        path: CheckoutPath,
    ) -> Result<PlacedOrder, DomainError> {
        if actor.is_admin() {
            return Err(DomainError::Forbidden(
                "Admins are not allowed to create orders".to_string(),
            ));
        }
        if checkout.cart.is_empty() {
            return Err(DomainError::invalid_cart("Cart is empty."));
        }

        let ids = pricing::referenced_ids(&checkout.cart);
        let products = self.catalog.get_products_by_ids(&ids)?;
        let resolved = pricing::resolve(&checkout.cart, &products, checkout.currency)?;
        let draft = self
            .assembler
            .assemble(actor.user_id, &checkout, resolved, path)?;

        let (order_id, order_number) = self.insert_with_fresh_number(&draft)?;
        info!(
            "Order {} placed by user {}: {} line(s), total {} {}",
            order_number,
            actor.user_id,
            draft.lines.len(),
            draft.total,
            draft.currency
        );

        let user = self.sync_profile(actor.user_id, &draft);

        Ok(PlacedOrder {
            order_id,
            order_number,
            user,
        })
    }

    /// Order numbers are random, so a collision just means drawing again.
    fn insert_with_fresh_number(&self, draft: &OrderDraft) -> Result<(Uuid, String), DomainError> {
        let mut last_taken = String::new();
        for attempt in 1..=self.max_number_attempts {
            let number = self.numbers.next_number();
            match self.orders.create(&number, draft) {
                Ok(id) => return Ok((id, number)),
                Err(DomainError::Conflict(taken)) => {
                    warn!(
                        "Order number {} already taken (attempt {}/{})",
                        taken, attempt, self.max_number_attempts
                    );
                    last_taken = taken;
                }
                Err(e) => return Err(e),
            }
        }
        Err(DomainError::Conflict(last_taken))
    }

    /// Runs only after the order is committed. A failure here is logged and
    /// swallowed: failing the request would invite a duplicate order on retry.
    fn sync_profile(&self, user_id: Uuid, draft: &OrderDraft) -> Option<UserProfile> {
        let result = match CompanyUpgrade::from_order(draft) {
            Some(upgrade) => self.users.apply_company_upgrade(user_id, &upgrade),
            None => self.users.find_by_id(user_id),
        };
        match result {
            Ok(profile) => profile,
            Err(e) => {
                error!("Profile sync for user {} failed after order commit: {}", user_id, e);
                None
            }
        }
    }

    pub fn my_orders(&self, actor: &Actor) -> Result<Vec<Order>, DomainError> {
        self.orders.find_by_user(actor.user_id)
    }

    /// Someone else's order is reported exactly like a missing one.
    pub fn get_order(&self, actor: &Actor, order_id: Uuid) -> Result<Order, DomainError> {
        self.orders
            .find_by_id_for_user(order_id, actor.user_id)?
            .ok_or(DomainError::NotFound)
    }

    /// All orders, each enriched with what the live catalog still holds for
    /// the referenced products.
    pub fn admin_orders(&self, actor: &Actor, page: Page) -> Result<AdminOrderPage, DomainError> {
        require_admin(actor)?;
        let listed = self.orders.find_all(page)?;

        let mut ids: Vec<Uuid> = listed
            .items
            .iter()
            .flat_map(|o| o.lines.iter().map(|l| l.product_id))
            .collect();
        ids.sort_unstable();
        ids.dedup();

        let references: HashMap<Uuid, ProductReference> = if ids.is_empty() {
            HashMap::new()
        } else {
            self.catalog
                .get_products_by_ids(&ids)?
                .iter()
                .map(|p| (p.id, ProductReference::from(p)))
                .collect()
        };

        let items = listed
            .items
            .into_iter()
            .map(|order| {
                let products = order
                    .lines
                    .iter()
                    .filter_map(|l| references.get(&l.product_id).map(|r| (l.product_id, r.clone())))
                    .collect();
                AdminOrderView { order, products }
            })
            .collect();

        Ok(AdminOrderPage {
            items,
            total: listed.total,
        })
    }

    pub fn update_status(
        &self,
        actor: &Actor,
        order_id: Uuid,
        change: StatusChange,
    ) -> Result<Order, DomainError> {
        require_admin(actor)?;
        if change.is_empty() {
            return Err(DomainError::invalid("status", "Nothing to update."));
        }
        let order = self.orders.update_status(order_id, change)?;
        info!(
            "Order {} now {} / {}",
            order.order_number, order.status, order.payment_status
        );
        Ok(order)
    }
}

fn require_admin(actor: &Actor) -> Result<(), DomainError> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(DomainError::Forbidden("Admin access only".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use bigdecimal::BigDecimal;

    use super::*;
    use crate::domain::assembler::{AddressInput, CompanyInput, CustomerInput};
    use crate::domain::money::Currency;
    use crate::domain::order::{
        CustomerType, OrderPage, OrderStatus, PaymentMethod, PaymentStatus,
    };
    use crate::domain::pricing::CartItem;
    use crate::domain::product::{Category, Product, StockStatus};
    use crate::domain::user::AccountType;
    use crate::infrastructure::memory::InMemoryStore;

    // ── Fakes ────────────────────────────────────────────────────────────────

    /// Hands out a fixed sequence of numbers, then repeats the last one.
    struct ScriptedNumbers {
        numbers: Vec<&'static str>,
        next: AtomicUsize,
    }

    impl ScriptedNumbers {
        fn new(numbers: Vec<&'static str>) -> Self {
            Self {
                numbers,
                next: AtomicUsize::new(0),
            }
        }
    }

    impl OrderNumberGenerator for ScriptedNumbers {
        fn next_number(&self) -> String {
            let i = self.next.fetch_add(1, Ordering::SeqCst);
            let i = i.min(self.numbers.len() - 1);
            self.numbers[i].to_string()
        }
    }

    /// Wraps the in-memory store and fails chosen operations.
    struct FaultyStore {
        inner: InMemoryStore,
        fail_create: bool,
        fail_lookup: bool,
        fail_profile: bool,
        upgrades: Mutex<usize>,
    }

    impl FaultyStore {
        fn new(inner: InMemoryStore) -> Self {
            Self {
                inner,
                fail_create: false,
                fail_lookup: false,
                fail_profile: false,
                upgrades: Mutex::new(0),
            }
        }
    }

    fn outage() -> DomainError {
        DomainError::StoreUnavailable("connection refused".to_string())
    }

    impl CatalogStore for FaultyStore {
        fn get_products_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Product>, DomainError> {
            if self.fail_lookup {
                return Err(outage());
            }
            self.inner.get_products_by_ids(ids)
        }
    }

    impl OrderRepository for FaultyStore {
        fn create(&self, order_number: &str, draft: &OrderDraft) -> Result<Uuid, DomainError> {
            if self.fail_create {
                return Err(outage());
            }
            self.inner.create(order_number, draft)
        }
        fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Order>, DomainError> {
            self.inner.find_by_user(user_id)
        }
        fn find_by_id_for_user(
            &self,
            order_id: Uuid,
            user_id: Uuid,
        ) -> Result<Option<Order>, DomainError> {
            self.inner.find_by_id_for_user(order_id, user_id)
        }
        fn find_all(&self, page: Page) -> Result<OrderPage, DomainError> {
            self.inner.find_all(page)
        }
        fn update_status(&self, order_id: Uuid, change: StatusChange) -> Result<Order, DomainError> {
            self.inner.update_status(order_id, change)
        }
    }

    impl UserStore for FaultyStore {
        fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserProfile>, DomainError> {
            if self.fail_profile {
                return Err(outage());
            }
            self.inner.find_by_id(user_id)
        }
        fn apply_company_upgrade(
            &self,
            user_id: Uuid,
            upgrade: &CompanyUpgrade,
        ) -> Result<Option<UserProfile>, DomainError> {
            if let Ok(mut n) = self.upgrades.lock() {
                *n += 1;
            }
            if self.fail_profile {
                return Err(outage());
            }
            self.inner.apply_company_upgrade(user_id, upgrade)
        }
    }

    // ── Fixtures ─────────────────────────────────────────────────────────────

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).expect("valid decimal")
    }

    fn p1() -> Product {
        Product {
            id: Uuid::new_v4(),
            name: "Zacusca de vinete".into(),
            price: dec("2.50"),
            units_per_box: Some(12),
            box_per_palet: Some(10),
            stock: StockStatus::InStock,
            category: Category::LegumeConservate,
            barcode: Some("5940000000017".into()),
            image: Some("/uploads/zacusca.png".into()),
        }
    }

    fn client(store: &InMemoryStore) -> Actor {
        let user = UserProfile {
            id: Uuid::new_v4(),
            username: format!("client-{}", Uuid::new_v4()),
            role: Role::Client,
            account_type: AccountType::Individual,
            email: None,
            phone: None,
            shipping_address: None,
            company: None,
        };
        store.insert_user(user.clone());
        Actor {
            user_id: user.id,
            role: Role::Client,
        }
    }

    fn admin() -> Actor {
        Actor {
            user_id: Uuid::new_v4(),
            role: Role::Admin,
        }
    }

    fn checkout(customer_type: CustomerType, cart: Vec<CartItem>) -> Checkout {
        Checkout {
            customer_type,
            customer: CustomerInput {
                full_name: Some("Ion Popescu".into()),
                email: Some("ion@example.ro".into()),
                phone: Some("0722000000".into()),
            },
            company: Some(CompanyInput {
                company_name: Some("Horeca SRL".into()),
                vat_number: Some("RO998877".into()),
                contact_person: Some("Maria Ionescu".into()),
            }),
            shipping_address: AddressInput {
                country: Some("Romania".into()),
                city: Some("Iasi".into()),
                address_line: Some("Bd. Independentei 1".into()),
                postal_code: Some("700000".into()),
            },
            cart,
            payment_method: PaymentMethod::IbanRon,
            currency: Currency::Ron,
            notes: None,
        }
    }

    fn line(product: &Product, quantity: i64, pallets: i64) -> Vec<CartItem> {
        vec![CartItem {
            product_id: product.id,
            quantity,
            pallets,
        }]
    }

    fn service_over(store: Arc<FaultyStore>, numbers: Arc<dyn OrderNumberGenerator>) -> OrderService {
        OrderService::new(
            store.clone(),
            store.clone(),
            store,
            numbers,
            OrderAssembler::new(BigDecimal::from(0)).expect("valid fee"),
        )
    }

    fn service(store: &InMemoryStore) -> OrderService {
        let numbers = Arc::new(ScriptedNumbers::new(vec![
            "ZD-2024-100001",
            "ZD-2024-100002",
            "ZD-2024-100003",
            "ZD-2024-100004",
        ]));
        service_over(Arc::new(FaultyStore::new(store.clone())), numbers)
    }

    // ── Placement ────────────────────────────────────────────────────────────

    #[test]
    fn individual_checkout_stores_reconciled_order() {
        let store = InMemoryStore::new();
        let product = p1();
        store.insert_product(product.clone());
        let actor = client(&store);

        let placed = service(&store)
            .place_order(
                &actor,
                checkout(CustomerType::Individual, line(&product, 3, 0)),
                CheckoutPath::PaymentInitiation,
            )
            .expect("order placed");

        let order = service(&store)
            .get_order(&actor, placed.order_id)
            .expect("own order is visible");
        assert_eq!(order.order_number, placed.order_number);
        assert_eq!(order.lines.len(), 1);
        assert_eq!(order.lines[0].line_total.to_string(), "90.00");
        assert_eq!(order.subtotal.to_string(), "90.00");
        assert_eq!(order.total.to_string(), "90.00");
        assert_eq!(order.status, OrderStatus::PendingPayment);
        assert_eq!(order.payment_status, PaymentStatus::Unpaid);
        assert!(order.reconciles());
    }

    #[test]
    fn order_snapshot_does_not_follow_catalog_repricing() {
        let store = InMemoryStore::new();
        let mut product = p1();
        store.insert_product(product.clone());
        let actor = client(&store);
        let placed = service(&store)
            .place_order(
                &actor,
                checkout(CustomerType::Individual, line(&product, 1, 0)),
                CheckoutPath::Direct,
            )
            .expect("order placed");

        product.price = dec("9.99");
        store.insert_product(product);

        let order = service(&store)
            .get_order(&actor, placed.order_id)
            .expect("own order is visible");
        assert_eq!(order.lines[0].unit_price, dec("2.50"));
        assert_eq!(order.total.to_string(), "30.00");
        assert_eq!(order.status, OrderStatus::Created);
    }

    #[test]
    fn pallets_resolve_to_boxes() {
        let store = InMemoryStore::new();
        let product = p1();
        store.insert_product(product.clone());
        let actor = client(&store);

        let placed = service(&store)
            .place_order(
                &actor,
                checkout(CustomerType::Individual, line(&product, 5, 3)),
                CheckoutPath::Direct,
            )
            .expect("order placed");

        let order = service(&store)
            .get_order(&actor, placed.order_id)
            .expect("own order is visible");
        assert_eq!(order.lines[0].boxes, 30);
        assert_eq!(order.lines[0].pallets, 3);
    }

    #[test]
    fn dangling_reference_creates_nothing() {
        let store = InMemoryStore::new();
        let product = p1();
        store.insert_product(product.clone());
        let actor = client(&store);
        let mut cart = line(&product, 1, 0);
        cart.push(CartItem {
            product_id: Uuid::new_v4(),
            quantity: 1,
            pallets: 0,
        });

        let err = service(&store)
            .place_order(&actor, checkout(CustomerType::Individual, cart), CheckoutPath::Direct)
            .unwrap_err();

        assert!(matches!(err, DomainError::ProductNotFound(_)));
        assert_eq!(store.order_count(), 0);
    }

    #[test]
    fn zero_quantity_cart_is_rejected() {
        let store = InMemoryStore::new();
        let product = p1();
        store.insert_product(product.clone());
        let actor = client(&store);

        let err = service(&store)
            .place_order(
                &actor,
                checkout(CustomerType::Individual, line(&product, 0, 0)),
                CheckoutPath::Direct,
            )
            .unwrap_err();

        assert!(matches!(err, DomainError::Validation { .. }));
        assert_eq!(store.order_count(), 0);
    }

    #[test]
    fn admins_cannot_place_orders() {
        let store = InMemoryStore::new();
        let product = p1();
        store.insert_product(product.clone());

        let err = service(&store)
            .place_order(
                &admin(),
                checkout(CustomerType::Individual, line(&product, 1, 0)),
                CheckoutPath::Direct,
            )
            .unwrap_err();

        assert!(matches!(err, DomainError::Forbidden(_)));
        assert_eq!(store.order_count(), 0);
    }

    #[test]
    fn company_order_upgrades_profile_and_individual_does_not_revert() {
        let store = InMemoryStore::new();
        let product = p1();
        store.insert_product(product.clone());
        let actor = client(&store);
        let service = service(&store);

        let placed = service
            .place_order(
                &actor,
                checkout(CustomerType::Company, line(&product, 1, 0)),
                CheckoutPath::PaymentInitiation,
            )
            .expect("company order placed");
        let profile = placed.user.expect("profile returned");
        assert_eq!(profile.account_type, AccountType::Company);
        let company = profile.company.expect("company block populated");
        assert_eq!(company.company_name, "Horeca SRL");
        assert_eq!(company.vat_number, "RO998877");
        assert_eq!(
            company.invoice_address.map(|a| a.city),
            Some("Iasi".to_string())
        );

        let placed = service
            .place_order(
                &actor,
                checkout(CustomerType::Individual, line(&product, 1, 0)),
                CheckoutPath::PaymentInitiation,
            )
            .expect("individual order placed");
        let profile = placed.user.expect("profile returned");
        assert_eq!(profile.account_type, AccountType::Company);
        assert!(profile.company.is_some());
    }

    #[test]
    fn order_number_collision_is_retried() {
        let store = InMemoryStore::new();
        let product = p1();
        store.insert_product(product.clone());
        let actor = client(&store);
        let numbers = Arc::new(ScriptedNumbers::new(vec![
            "ZD-2024-111111",
            "ZD-2024-111111",
            "ZD-2024-222222",
        ]));
        let service = service_over(Arc::new(FaultyStore::new(store.clone())), numbers);

        let first = service
            .place_order(
                &actor,
                checkout(CustomerType::Individual, line(&product, 1, 0)),
                CheckoutPath::Direct,
            )
            .expect("first order");
        let second = service
            .place_order(
                &actor,
                checkout(CustomerType::Individual, line(&product, 1, 0)),
                CheckoutPath::Direct,
            )
            .expect("second order after one collision");

        assert_eq!(first.order_number, "ZD-2024-111111");
        assert_eq!(second.order_number, "ZD-2024-222222");
        assert_eq!(store.order_count(), 2);
    }

    #[test]
    fn exhausted_number_retries_surface_conflict() {
        let store = InMemoryStore::new();
        let product = p1();
        store.insert_product(product.clone());
        let actor = client(&store);
        let numbers = Arc::new(ScriptedNumbers::new(vec!["ZD-2024-333333"]));
        let service = service_over(Arc::new(FaultyStore::new(store.clone())), numbers)
            .with_max_number_attempts(3);

        service
            .place_order(
                &actor,
                checkout(CustomerType::Individual, line(&product, 1, 0)),
                CheckoutPath::Direct,
            )
            .expect("first order");
        let err = service
            .place_order(
                &actor,
                checkout(CustomerType::Individual, line(&product, 1, 0)),
                CheckoutPath::Direct,
            )
            .unwrap_err();

        assert!(matches!(err, DomainError::Conflict(n) if n == "ZD-2024-333333"));
        assert_eq!(store.order_count(), 1);
    }

    #[test]
    fn store_outage_on_insert_skips_profile_sync() {
        let store = InMemoryStore::new();
        let product = p1();
        store.insert_product(product.clone());
        let actor = client(&store);
        let mut faulty = FaultyStore::new(store.clone());
        faulty.fail_create = true;
        let faulty = Arc::new(faulty);
        let service = service_over(
            faulty.clone(),
            Arc::new(ScriptedNumbers::new(vec!["ZD-2024-444444"])),
        );

        let err = service
            .place_order(
                &actor,
                checkout(CustomerType::Company, line(&product, 1, 0)),
                CheckoutPath::Direct,
            )
            .unwrap_err();

        assert!(matches!(err, DomainError::StoreUnavailable(_)));
        assert_eq!(store.order_count(), 0);
        assert_eq!(faulty.upgrades.lock().map(|n| *n).ok(), Some(0));
        let profile = store.find_by_id(actor.user_id).ok().flatten();
        assert_eq!(profile.map(|p| p.account_type), Some(AccountType::Individual));
    }

    #[test]
    fn store_outage_on_lookup_fails_visibly() {
        let store = InMemoryStore::new();
        let product = p1();
        store.insert_product(product.clone());
        let actor = client(&store);
        let mut faulty = FaultyStore::new(store.clone());
        faulty.fail_lookup = true;
        let service = service_over(
            Arc::new(faulty),
            Arc::new(ScriptedNumbers::new(vec!["ZD-2024-555555"])),
        );

        let err = service
            .place_order(
                &actor,
                checkout(CustomerType::Individual, line(&product, 1, 0)),
                CheckoutPath::Direct,
            )
            .unwrap_err();

        assert!(matches!(err, DomainError::StoreUnavailable(_)));
        assert_eq!(store.order_count(), 0);
    }

    #[test]
    fn profile_sync_failure_keeps_the_committed_order() {
        let store = InMemoryStore::new();
        let product = p1();
        store.insert_product(product.clone());
        let actor = client(&store);
        let mut faulty = FaultyStore::new(store.clone());
        faulty.fail_profile = true;
        let service = service_over(
            Arc::new(faulty),
            Arc::new(ScriptedNumbers::new(vec!["ZD-2024-666666"])),
        );

        let placed = service
            .place_order(
                &actor,
                checkout(CustomerType::Company, line(&product, 1, 0)),
                CheckoutPath::Direct,
            )
            .expect("order still placed");

        assert!(placed.user.is_none());
        assert_eq!(store.order_count(), 1);
    }

    // ── Reads ────────────────────────────────────────────────────────────────

    #[test]
    fn other_users_orders_look_missing() {
        let store = InMemoryStore::new();
        let product = p1();
        store.insert_product(product.clone());
        let owner = client(&store);
        let stranger = client(&store);
        let service = service(&store);
        let placed = service
            .place_order(
                &owner,
                checkout(CustomerType::Individual, line(&product, 1, 0)),
                CheckoutPath::Direct,
            )
            .expect("order placed");

        let err = service.get_order(&stranger, placed.order_id).unwrap_err();
        assert!(matches!(err, DomainError::NotFound));
        let err = service.get_order(&stranger, Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, DomainError::NotFound));
        assert!(service.my_orders(&stranger).expect("listing").is_empty());
        assert_eq!(service.my_orders(&owner).expect("listing").len(), 1);
    }

    #[test]
    fn my_orders_are_newest_first() {
        let store = InMemoryStore::new();
        let product = p1();
        store.insert_product(product.clone());
        let actor = client(&store);
        let service = service(&store);
        let mut placed = Vec::new();
        for _ in 0..3 {
            placed.push(
                service
                    .place_order(
                        &actor,
                        checkout(CustomerType::Individual, line(&product, 1, 0)),
                        CheckoutPath::Direct,
                    )
                    .expect("order placed")
                    .order_id,
            );
        }

        let listed: Vec<Uuid> = service
            .my_orders(&actor)
            .expect("listing")
            .into_iter()
            .map(|o| o.id)
            .collect();
        placed.reverse();
        assert_eq!(listed, placed);
    }

    #[test]
    fn admin_listing_is_enriched_with_live_product_references() {
        let store = InMemoryStore::new();
        let product = p1();
        store.insert_product(product.clone());
        let actor = client(&store);
        let service = service(&store);
        service
            .place_order(
                &actor,
                checkout(CustomerType::Individual, line(&product, 2, 0)),
                CheckoutPath::Direct,
            )
            .expect("order placed");

        let page = service
            .admin_orders(&admin(), Page::new(None, None))
            .expect("admin listing");

        assert_eq!(page.total, 1);
        let reference = page.items[0]
            .products
            .get(&product.id)
            .expect("reference resolved");
        assert_eq!(reference.barcode.as_deref(), Some("5940000000017"));
        assert_eq!(reference.units_per_box, Some(12));
    }

    #[test]
    fn admin_surface_rejects_clients() {
        let store = InMemoryStore::new();
        let actor = client(&store);
        let service = service(&store);

        assert!(matches!(
            service.admin_orders(&actor, Page::new(None, None)),
            Err(DomainError::Forbidden(_))
        ));
        assert!(matches!(
            service.update_status(
                &actor,
                Uuid::new_v4(),
                StatusChange {
                    status: Some(OrderStatus::Paid),
                    payment_status: None
                }
            ),
            Err(DomainError::Forbidden(_))
        ));
    }

    #[test]
    fn status_updates_follow_the_state_machine_and_keep_lines() {
        let store = InMemoryStore::new();
        let product = p1();
        store.insert_product(product.clone());
        let actor = client(&store);
        let service = service(&store);
        let placed = service
            .place_order(
                &actor,
                checkout(CustomerType::Individual, line(&product, 3, 0)),
                CheckoutPath::PaymentInitiation,
            )
            .expect("order placed");
        let before = service.get_order(&actor, placed.order_id).expect("order");

        let paid = service
            .update_status(
                &admin(),
                placed.order_id,
                StatusChange {
                    status: Some(OrderStatus::Paid),
                    payment_status: Some(PaymentStatus::Paid),
                },
            )
            .expect("pending_payment -> paid");
        assert_eq!(paid.status, OrderStatus::Paid);
        assert_eq!(paid.payment_status, PaymentStatus::Paid);
        assert_eq!(paid.lines, before.lines);
        assert_eq!(paid.total, before.total);

        let err = service
            .update_status(
                &admin(),
                placed.order_id,
                StatusChange {
                    status: Some(OrderStatus::Created),
                    payment_status: None,
                },
            )
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));

        let err = service
            .update_status(&admin(), placed.order_id, StatusChange::default())
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }
}
