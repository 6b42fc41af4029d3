//! Repository for the `customers` table.
//!
//! Visit counts are never stored: every query derives them from `job_cards`
//! rows linked by id or sharing the customer's mobile.

use repairdesk_core::listing::{like_pattern, Page, PageRequest};
use repairdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::customer::{CreateCustomer, Customer, UpdateCustomer, VisitCount};

/// Column list for queries over `customers c` (or a CTE named `c`).
const COLUMNS: &str = "\
    c.id, c.name, c.mobile, c.address, c.national_id, \
    (SELECT COUNT(*) FROM job_cards j \
      WHERE j.customer_id = c.id OR j.mobile = c.mobile) AS visit_count, \
    c.created_at, c.updated_at";

/// Provides CRUD and visit-count reporting for customers.
pub struct CustomerRepo;

impl CustomerRepo {
    /// Insert a new customer and link any unlinked job cards with the same mobile.
    ///
    /// Both writes happen in one transaction.
    pub async fn create(pool: &PgPool, input: &CreateCustomer) -> Result<Customer, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "WITH c AS (
                INSERT INTO customers (name, mobile, address, national_id)
                VALUES ($1, $2, $3, $4)
                RETURNING *
             )
             SELECT {COLUMNS} FROM c"
        );
        let customer = sqlx::query_as::<_, Customer>(&query)
            .bind(&input.name)
            .bind(&input.mobile)
            .bind(&input.address)
            .bind(&input.national_id)
            .fetch_one(&mut *tx)
            .await?;

        let linked = sqlx::query(
            "UPDATE job_cards SET customer_id = $1 WHERE mobile = $2 AND customer_id IS NULL",
        )
        .bind(customer.id)
        .bind(&customer.mobile)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit().await?;

        if linked > 0 {
            tracing::debug!(customer_id = customer.id, linked, "Linked existing job cards");
        }
        Ok(customer)
    }

    /// Find a customer by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Customer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM customers c WHERE c.id = $1");
        sqlx::query_as::<_, Customer>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a customer by (normalized) mobile number.
    pub async fn find_by_mobile(
        pool: &PgPool,
        mobile: &str,
    ) -> Result<Option<Customer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM customers c WHERE c.mobile = $1");
        sqlx::query_as::<_, Customer>(&query)
            .bind(mobile)
            .fetch_optional(pool)
            .await
    }

    /// Search and page customers, newest first.
    ///
    /// The search term matches name, mobile, address or national ID
    /// (case-insensitive substring).
    pub async fn list(
        pool: &PgPool,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<Customer>, sqlx::Error> {
        let pattern = search.map(like_pattern);
        let where_clause = if pattern.is_some() {
            "WHERE (c.name ILIKE $1 OR c.mobile ILIKE $1 \
                    OR c.address ILIKE $1 OR c.national_id ILIKE $1)"
        } else {
            ""
        };

        let count_query = format!("SELECT COUNT(*) FROM customers c {where_clause}");
        let mut count_q = sqlx::query_as::<_, (i64,)>(&count_query);
        if let Some(ref p) = pattern {
            count_q = count_q.bind(p);
        }
        let (total,) = count_q.fetch_one(pool).await?;

        let page = page.within(total);
        let (limit_idx, offset_idx) = if pattern.is_some() { (2, 3) } else { (1, 2) };

        let query = format!(
            "SELECT {COLUMNS} FROM customers c {where_clause} \
             ORDER BY c.created_at DESC, c.id DESC \
             LIMIT ${limit_idx} OFFSET ${offset_idx}"
        );
        let mut q = sqlx::query_as::<_, Customer>(&query);
        if let Some(ref p) = pattern {
            q = q.bind(p);
        }
        let rows = q
            .bind(page.page_size)
            .bind(page.offset())
            .fetch_all(pool)
            .await?;

        Ok(Page::new(rows, page, total))
    }

    /// Update a customer. Only supplied fields in `input` are applied;
    /// `Some(None)` clears a nullable column.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCustomer,
    ) -> Result<Option<Customer>, sqlx::Error> {
        let query = format!(
            "WITH c AS (
                UPDATE customers SET
                    name = COALESCE($2, name),
                    mobile = COALESCE($3, mobile),
                    address = CASE WHEN $6 THEN $4 ELSE address END,
                    national_id = CASE WHEN $7 THEN $5 ELSE national_id END
                WHERE id = $1
                RETURNING *
             )
             SELECT {COLUMNS} FROM c"
        );
        sqlx::query_as::<_, Customer>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.mobile)
            .bind(input.address.as_ref().and_then(|v| v.as_deref()))
            .bind(input.national_id.as_ref().and_then(|v| v.as_deref()))
            .bind(input.address.is_some())
            .bind(input.national_id.is_some())
            .fetch_optional(pool)
            .await
    }

    /// Delete a customer. Returns `true` if a row was removed.
    ///
    /// Job cards keep their snapshot fields; their `customer_id` is set to
    /// NULL by the foreign key.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Recompute every customer's visit count from scratch, highest first.
    pub async fn visit_counts(pool: &PgPool) -> Result<Vec<VisitCount>, sqlx::Error> {
        sqlx::query_as::<_, VisitCount>(
            "SELECT c.id AS customer_id, c.name, c.mobile,
                    (SELECT COUNT(*) FROM job_cards j
                      WHERE j.customer_id = c.id OR j.mobile = c.mobile) AS visit_count
             FROM customers c
             ORDER BY visit_count DESC, c.id",
        )
        .fetch_all(pool)
        .await
    }
}
