use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::CatalogStore;
use crate::domain::product::Product;
use crate::schema::products;

use super::models::ProductRow;

pub struct DieselCatalogStore {
    pool: DbPool,
}

impl DieselCatalogStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl CatalogStore for DieselCatalogStore {
    fn get_products_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Product>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get()?;

        products::table
            .filter(products::id.eq_any(ids))
            .select(ProductRow::as_select())
            .load(&mut conn)?
            .into_iter()
            .map(Product::try_from)
            .collect()
    }
}
