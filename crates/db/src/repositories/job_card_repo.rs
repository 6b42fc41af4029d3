//! Repository for the `job_cards` table.

use repairdesk_core::job_status::JobStatus;
use repairdesk_core::listing::{like_pattern, ListQuery, Page};
use repairdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::job_card::{CreateJobCard, JobCard, StatusSummary, UpdateJobCard};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, bill_no, customer_name, mobile, address, model, complaint, \
    power_on, display_ok, touch_ok, water_damage, battery_present, sim_tray_present, \
    admission_fee, estimate, advance, final_amount, status, \
    created_by, customer_id, created_at, updated_at";

/// Newest first; id breaks ties between cards created in the same instant.
const ORDER_BY: &str = "ORDER BY created_at DESC, id DESC";

/// Provides CRUD, listing and reporting for job cards.
pub struct JobCardRepo;

impl JobCardRepo {
    /// Insert a new job card, returning the created row.
    ///
    /// The id is drawn from the table sequence inside the statement and
    /// written to both `id` and `bill_no`, so the bill number is correct the
    /// moment the row becomes visible. Without an explicit `customer_id` the
    /// card is linked to the customer sharing its mobile, if one exists.
    pub async fn create(
        pool: &PgPool,
        input: &CreateJobCard,
        created_by: DbId,
    ) -> Result<JobCard, sqlx::Error> {
        let query = format!(
            "WITH next AS (
                SELECT nextval(pg_get_serial_sequence('job_cards', 'id')) AS id
             )
             INSERT INTO job_cards (
                id, bill_no, customer_name, mobile, address, model, complaint,
                power_on, display_ok, touch_ok, water_damage, battery_present, sim_tray_present,
                admission_fee, estimate, advance, final_amount, created_by, customer_id
             )
             SELECT next.id, next.id, $1, $2, $3, $4, $5,
                    $6, $7, $8, $9, $10, $11,
                    $12, $13, $14, $15, $16,
                    COALESCE($17, (SELECT c.id FROM customers c WHERE c.mobile = $2))
             FROM next
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, JobCard>(&query)
            .bind(&input.customer_name)
            .bind(&input.mobile)
            .bind(input.address.as_deref())
            .bind(&input.model)
            .bind(&input.complaint)
            .bind(input.power_on)
            .bind(input.display_ok)
            .bind(input.touch_ok)
            .bind(input.water_damage)
            .bind(input.battery_present)
            .bind(input.sim_tray_present)
            .bind(input.admission_fee)
            .bind(input.estimate)
            .bind(input.advance)
            .bind(input.final_amount)
            .bind(created_by)
            .bind(input.customer_id)
            .fetch_one(pool)
            .await
    }

    /// Find a job card by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<JobCard>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM job_cards WHERE id = $1");
        sqlx::query_as::<_, JobCard>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Search, filter and page job cards in the database.
    ///
    /// The search term matches the bill number, customer name, mobile or
    /// model (case-insensitive substring). A page past the end falls back to
    /// page 1.
    pub async fn list(pool: &PgPool, params: &ListQuery) -> Result<Page<JobCard>, sqlx::Error> {
        let pattern = params.search.as_deref().map(like_pattern);
        let status = params.status.as_status();

        // Build dynamic WHERE clauses.
        let mut conditions = Vec::new();
        let mut bind_idx = 1u32;

        if pattern.is_some() {
            conditions.push(format!(
                "(bill_no::text ILIKE ${bind_idx} \
                  OR customer_name ILIKE ${bind_idx} \
                  OR mobile ILIKE ${bind_idx} \
                  OR model ILIKE ${bind_idx})"
            ));
            bind_idx += 1;
        }
        if status.is_some() {
            conditions.push(format!("status = ${bind_idx}"));
            bind_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_query = format!("SELECT COUNT(*) FROM job_cards {where_clause}");
        let mut count_q = sqlx::query_as::<_, (i64,)>(&count_query);
        if let Some(ref p) = pattern {
            count_q = count_q.bind(p);
        }
        if let Some(s) = status {
            count_q = count_q.bind(s.as_str());
        }
        let (total,) = count_q.fetch_one(pool).await?;

        let page = params.page.within(total);

        let query = format!(
            "SELECT {COLUMNS} FROM job_cards {where_clause} {ORDER_BY} \
             LIMIT ${bind_idx} OFFSET ${next_idx}",
            next_idx = bind_idx + 1,
        );
        let mut q = sqlx::query_as::<_, JobCard>(&query);
        if let Some(ref p) = pattern {
            q = q.bind(p);
        }
        if let Some(s) = status {
            q = q.bind(s.as_str());
        }
        let rows = q
            .bind(page.page_size)
            .bind(page.offset())
            .fetch_all(pool)
            .await?;

        Ok(Page::new(rows, page, total))
    }

    /// All job cards belonging to a customer: linked by id or sharing its mobile.
    pub async fn list_for_customer(
        pool: &PgPool,
        customer_id: DbId,
        mobile: &str,
    ) -> Result<Vec<JobCard>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM job_cards
             WHERE customer_id = $1 OR mobile = $2
             {ORDER_BY}"
        );
        sqlx::query_as::<_, JobCard>(&query)
            .bind(customer_id)
            .bind(mobile)
            .fetch_all(pool)
            .await
    }

    /// Update a job card. Only supplied fields in `input` are applied;
    /// `Some(None)` clears `address` or `final_amount`.
    ///
    /// `input.status`, when present, must already be a canonical status
    /// string. Changing the mobile re-links the card to the customer with the
    /// new mobile (or unlinks it when there is none).
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateJobCard,
    ) -> Result<Option<JobCard>, sqlx::Error> {
        let query = format!(
            "UPDATE job_cards SET
                customer_name = COALESCE($2, customer_name),
                mobile = COALESCE($3, mobile),
                address = CASE WHEN $18 THEN $4 ELSE address END,
                model = COALESCE($5, model),
                complaint = COALESCE($6, complaint),
                power_on = COALESCE($7, power_on),
                display_ok = COALESCE($8, display_ok),
                touch_ok = COALESCE($9, touch_ok),
                water_damage = COALESCE($10, water_damage),
                battery_present = COALESCE($11, battery_present),
                sim_tray_present = COALESCE($12, sim_tray_present),
                admission_fee = COALESCE($13, admission_fee),
                estimate = COALESCE($14, estimate),
                advance = COALESCE($15, advance),
                final_amount = CASE WHEN $19 THEN $16 ELSE final_amount END,
                status = COALESCE($17, status),
                customer_id = CASE
                    WHEN $3::text IS NOT NULL AND $3 <> job_cards.mobile
                        THEN (SELECT c.id FROM customers c WHERE c.mobile = $3)
                    ELSE customer_id
                END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, JobCard>(&query)
            .bind(id)
            .bind(&input.customer_name)
            .bind(&input.mobile)
            .bind(input.address.as_ref().and_then(|a| a.as_deref()))
            .bind(&input.model)
            .bind(&input.complaint)
            .bind(input.power_on)
            .bind(input.display_ok)
            .bind(input.touch_ok)
            .bind(input.water_damage)
            .bind(input.battery_present)
            .bind(input.sim_tray_present)
            .bind(input.admission_fee)
            .bind(input.estimate)
            .bind(input.advance)
            .bind(input.final_amount.flatten())
            .bind(&input.status)
            .bind(input.address.is_some())
            .bind(input.final_amount.is_some())
            .fetch_optional(pool)
            .await
    }

    /// Set the status of a job card. Any status may move to any other.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: JobStatus,
    ) -> Result<Option<JobCard>, sqlx::Error> {
        let query = format!("UPDATE job_cards SET status = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, JobCard>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Delete a job card. Returns `true` if a row was removed.
    ///
    /// The linked customer row is left untouched.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM job_cards WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count job cards per status.
    pub async fn status_summary(pool: &PgPool) -> Result<StatusSummary, sqlx::Error> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM job_cards GROUP BY status")
                .fetch_all(pool)
                .await?;

        Ok(StatusSummary::from_counts(rows.into_iter().filter_map(
            |(status, count)| status.parse::<JobStatus>().ok().map(|s| (s, count)),
        )))
    }
}
