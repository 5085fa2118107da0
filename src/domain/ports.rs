use uuid::Uuid;

use super::errors::DomainError;
use super::order::{Order, OrderDraft, OrderPage, Page, StatusChange};
use super::product::Product;
use super::user::{CompanyUpgrade, UserProfile};

pub trait CatalogStore: Send + Sync + 'static {
    /// Ids that do not exist are left out of the result, not reported.
    fn get_products_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Product>, DomainError>;
}

pub trait OrderRepository: Send + Sync + 'static {
    /// Writes the header and every line atomically. Returns `Conflict` when
    /// `order_number` is already taken.
    fn create(&self, order_number: &str, draft: &OrderDraft) -> Result<Uuid, DomainError>;
    /// Newest first.
    fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Order>, DomainError>;
    /// `None` both when the order does not exist and when `user_id` does not own it.
    fn find_by_id_for_user(&self, order_id: Uuid, user_id: Uuid)
        -> Result<Option<Order>, DomainError>;
    /// Every user's orders, newest first.
    fn find_all(&self, page: Page) -> Result<OrderPage, DomainError>;
    /// Moves `status`/`payment_status` through their state machines. Line data
    /// is never written.
    fn update_status(&self, order_id: Uuid, change: StatusChange) -> Result<Order, DomainError>;
}

pub trait UserStore: Send + Sync + 'static {
    fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserProfile>, DomainError>;
    /// Returns the updated profile, or `None` when the user does not exist.
    fn apply_company_upgrade(
        &self,
        user_id: Uuid,
        upgrade: &CompanyUpgrade,
    ) -> Result<Option<UserProfile>, DomainError>;
}
