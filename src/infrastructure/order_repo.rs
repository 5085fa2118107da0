use chrono::Utc;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{
    Order, OrderDraft, OrderPage, OrderStatus, Page, PaymentStatus, StatusChange,
};
use crate::domain::ports::OrderRepository;
use crate::schema::{order_items, orders};

use super::models::{order_from_rows, NewOrderItemRow, NewOrderRow, OrderItemRow, OrderRow};

const ORDER_NUMBER_CONSTRAINT: &str = "orders_order_number_key";

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<DieselError> for DomainError {
    fn from(e: DieselError) -> Self {
        match e {
            DieselError::DatabaseError(
                DatabaseErrorKind::ClosedConnection | DatabaseErrorKind::UnableToSendCommand,
                info,
            ) => DomainError::StoreUnavailable(info.message().to_string()),
            other => DomainError::Internal(other.to_string()),
        }
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::StoreUnavailable(e.to_string())
    }
}

fn is_order_number_clash(e: &DieselError) -> bool {
    matches!(
        e,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info)
            if info.constraint_name() == Some(ORDER_NUMBER_CONSTRAINT)
    )
}

// ── Repository ────────────────────────────────────────────────────────────────

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn with_items(
        conn: &mut PgConnection,
        rows: Vec<OrderRow>,
    ) -> Result<Vec<Order>, DomainError> {
        let items = OrderItemRow::belonging_to(&rows)
            .select(OrderItemRow::as_select())
            .load(conn)?
            .grouped_by(&rows);

        rows.into_iter()
            .zip(items)
            .map(|(row, items)| order_from_rows(row, items))
            .collect()
    }
}

impl OrderRepository for DieselOrderRepository {
    fn create(&self, order_number: &str, draft: &OrderDraft) -> Result<Uuid, DomainError> {
        let order_id = Uuid::new_v4();
        let header = NewOrderRow::from_draft(order_id, order_number, draft);
        let lines = draft
            .lines
            .iter()
            .enumerate()
            .map(|(position, line)| NewOrderItemRow::from_line(order_id, position, line))
            .collect::<Result<Vec<_>, _>>()?;

        let mut conn = self.pool.get()?;

        // Header and lines commit together or not at all.
        conn.transaction::<_, DieselError, _>(|conn| {
            diesel::insert_into(orders::table)
                .values(&header)
                .execute(conn)?;
            diesel::insert_into(order_items::table)
                .values(&lines)
                .execute(conn)?;
            Ok(())
        })
        .map_err(|e| {
            if is_order_number_clash(&e) {
                DomainError::Conflict(order_number.to_string())
            } else {
                DomainError::from(e)
            }
        })?;

        Ok(order_id)
    }

    fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = orders::table
            .filter(orders::user_id.eq(user_id))
            .select(OrderRow::as_select())
            .order((orders::created_at.desc(), orders::id.desc()))
            .load(&mut conn)?;

        Self::with_items(&mut conn, rows)
    }

    fn find_by_id_for_user(
        &self,
        order_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        let order = orders::table
            .filter(orders::id.eq(order_id))
            .filter(orders::user_id.eq(user_id))
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?;

        let Some(order) = order else {
            return Ok(None);
        };

        Ok(Self::with_items(&mut conn, vec![order])?.pop())
    }

    fn find_all(&self, page: Page) -> Result<OrderPage, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let total: i64 = orders::table.count().get_result(conn)?;

            let rows = orders::table
                .select(OrderRow::as_select())
                .order((orders::created_at.desc(), orders::id.desc()))
                .limit(page.limit)
                .offset(page.offset())
                .load(conn)?;

            Ok(OrderPage {
                items: Self::with_items(conn, rows)?,
                total,
            })
        })
    }

    fn update_status(&self, order_id: Uuid, change: StatusChange) -> Result<Order, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let current = orders::table
                .filter(orders::id.eq(order_id))
                .select(OrderRow::as_select())
                .for_update()
                .first(conn)
                .optional()?
                .ok_or(DomainError::NotFound)?;

            let (status, payment_status) = change.apply_to(
                current.status.parse::<OrderStatus>()?,
                current.payment_status.parse::<PaymentStatus>()?,
            )?;

            let updated = diesel::update(orders::table.find(order_id))
                .set((
                    orders::status.eq(status.as_str()),
                    orders::payment_status.eq(payment_status.as_str()),
                    orders::updated_at.eq(Utc::now()),
                ))
                .returning(OrderRow::as_returning())
                .get_result(conn)?;

            Self::with_items(conn, vec![updated])?
                .pop()
                .ok_or(DomainError::NotFound)
        })
    }
}
