//! Process-local implementation of every store port, for tests and local runs.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{Order, OrderDraft, OrderPage, Page, StatusChange};
use crate::domain::ports::{CatalogStore, OrderRepository, UserStore};
use crate::domain::product::Product;
use crate::domain::user::{CompanyUpgrade, UserProfile};

#[derive(Debug, Default)]
struct State {
    products: HashMap<Uuid, Product>,
    users: HashMap<Uuid, UserProfile>,
    /// Insertion order, oldest first.
    orders: Vec<Order>,
}

/// Cloning shares the underlying state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a catalog product.
    pub fn insert_product(&self, product: Product) {
        if let Ok(mut state) = self.state.write() {
            state.products.insert(product.id, product);
        }
    }

    pub fn insert_user(&self, user: UserProfile) {
        if let Ok(mut state) = self.state.write() {
            state.users.insert(user.id, user);
        }
    }

    pub fn order_count(&self) -> usize {
        self.state.read().map(|s| s.orders.len()).unwrap_or(0)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>, DomainError> {
        self.state
            .read()
            .map_err(|_| DomainError::Internal("in-memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>, DomainError> {
        self.state
            .write()
            .map_err(|_| DomainError::Internal("in-memory store lock poisoned".to_string()))
    }
}

impl CatalogStore for InMemoryStore {
    fn get_products_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Product>, DomainError> {
        let state = self.read()?;
        Ok(ids
            .iter()
            .filter_map(|id| state.products.get(id).cloned())
            .collect())
    }
}

impl OrderRepository for InMemoryStore {
    fn create(&self, order_number: &str, draft: &OrderDraft) -> Result<Uuid, DomainError> {
        let mut state = self.write()?;
        if state.orders.iter().any(|o| o.order_number == order_number) {
            return Err(DomainError::Conflict(order_number.to_string()));
        }
        let id = Uuid::new_v4();
        state.orders.push(Order::from_draft(
            id,
            order_number.to_string(),
            draft.clone(),
            Utc::now(),
        ));
        Ok(id)
    }

    fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Order>, DomainError> {
        let state = self.read()?;
        Ok(state
            .orders
            .iter()
            .rev()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect())
    }

    fn find_by_id_for_user(
        &self,
        order_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Order>, DomainError> {
        let state = self.read()?;
        Ok(state
            .orders
            .iter()
            .find(|o| o.id == order_id && o.user_id == user_id)
            .cloned())
    }

    fn find_all(&self, page: Page) -> Result<OrderPage, DomainError> {
        let state = self.read()?;
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit).unwrap_or(0);
        Ok(OrderPage {
            items: state
                .orders
                .iter()
                .rev()
                .skip(offset)
                .take(limit)
                .cloned()
                .collect(),
            total: i64::try_from(state.orders.len()).unwrap_or(i64::MAX),
        })
    }

    fn update_status(&self, order_id: Uuid, change: StatusChange) -> Result<Order, DomainError> {
        let mut state = self.write()?;
        let order = state
            .orders
            .iter_mut()
            .find(|o| o.id == order_id)
            .ok_or(DomainError::NotFound)?;
        let (status, payment_status) = change.apply_to(order.status, order.payment_status)?;
        order.status = status;
        order.payment_status = payment_status;
        order.updated_at = Utc::now();
        Ok(order.clone())
    }
}

impl UserStore for InMemoryStore {
    fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserProfile>, DomainError> {
        Ok(self.read()?.users.get(&user_id).cloned())
    }

    fn apply_company_upgrade(
        &self,
        user_id: Uuid,
        upgrade: &CompanyUpgrade,
    ) -> Result<Option<UserProfile>, DomainError> {
        let mut state = self.write()?;
        Ok(state.users.get_mut(&user_id).map(|user| {
            user.apply_company_upgrade(upgrade);
            user.clone()
        }))
    }
}
