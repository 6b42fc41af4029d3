//! Handlers for the `/customers` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use repairdesk_core::error::CoreError;
use repairdesk_core::listing::{list_page, normalize_search, Page};
use repairdesk_core::mobile::normalize_mobile;
use repairdesk_core::types::DbId;
use repairdesk_core::validation::{
    optional_text, parse_id, required_text, MAX_NAME_LENGTH, MAX_NATIONAL_ID_LENGTH,
    MAX_TEXT_LENGTH,
};
use repairdesk_db::models::customer::{CreateCustomer, Customer, UpdateCustomer, VisitCount};
use repairdesk_db::models::job_card::JobCard;
use repairdesk_db::repositories::{CustomerRepo, JobCardRepo};

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppQuery};
use crate::middleware::auth::AuthUser;
use crate::query::ListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/customers
///
/// Existing job cards with the same mobile and no customer are linked to the
/// new record.
pub async fn create(
    State(state): State<AppState>,
    auth_user: AuthUser,
    AppJson(input): AppJson<CreateCustomer>,
) -> AppResult<(StatusCode, Json<Customer>)> {
    let input = validate_create(input)?;
    let customer = CustomerRepo::create(&state.pool, &input).await?;

    tracing::info!(
        customer_id = customer.id,
        visit_count = customer.visit_count,
        user_id = auth_user.user_id,
        "Customer created"
    );
    Ok((StatusCode::CREATED, Json(customer)))
}

/// GET /api/customers
pub async fn list(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    AppQuery(params): AppQuery<ListParams>,
) -> AppResult<Json<Page<Customer>>> {
    let search = normalize_search(params.search.as_deref());
    let page = CustomerRepo::list(&state.pool, search.as_deref(), params.page_request()).await?;
    Ok(Json(page))
}

/// GET /api/customers/visit-counts
///
/// Every customer's visit count, recomputed from the job cards.
pub async fn visit_counts(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<VisitCount>>>> {
    let report = CustomerRepo::visit_counts(&state.pool).await?;
    Ok(Json(DataResponse { data: report }))
}

/// GET /api/customers/by-mobile/{mobile}
pub async fn get_by_mobile(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(mobile): Path<String>,
) -> AppResult<Json<Customer>> {
    let mobile = normalize_mobile(&mobile)?;
    let customer = CustomerRepo::find_by_mobile(&state.pool, &mobile)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No customer with mobile {mobile}")))?;
    Ok(Json(customer))
}

/// GET /api/customers/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(raw_id): Path<String>,
) -> AppResult<Json<Customer>> {
    let id = parse_id("customer", &raw_id)?;
    let customer = find_customer(&state, id).await?;
    Ok(Json(customer))
}

/// GET /api/customers/{id}/job-cards
///
/// The customer's job cards, searched, filtered and paged in memory.
pub async fn job_cards(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(raw_id): Path<String>,
    AppQuery(params): AppQuery<ListParams>,
) -> AppResult<Json<Page<JobCard>>> {
    let id = parse_id("customer", &raw_id)?;
    let query = params.list_query()?;
    let customer = find_customer(&state, id).await?;

    let cards = JobCardRepo::list_for_customer(&state.pool, customer.id, &customer.mobile).await?;
    Ok(Json(list_page(cards, &query)))
}

/// PUT /api/customers/{id}
///
/// Omitted fields are left unchanged; `null` clears `address` or `national_id`.
pub async fn update(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(raw_id): Path<String>,
    AppJson(input): AppJson<UpdateCustomer>,
) -> AppResult<Json<Customer>> {
    let id = parse_id("customer", &raw_id)?;
    let input = validate_update(input)?;
    let customer = CustomerRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(customer))
}

/// DELETE /api/customers/{id}
///
/// Job cards survive with their customer link cleared.
pub async fn delete(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(raw_id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_id("customer", &raw_id)?;
    if CustomerRepo::delete(&state.pool, id).await? {
        tracing::info!(customer_id = id, user_id = auth_user.user_id, "Customer deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Customer",
        id,
    })
}

async fn find_customer(state: &AppState, id: DbId) -> AppResult<Customer> {
    CustomerRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))
}

fn validate_create(input: CreateCustomer) -> Result<CreateCustomer, CoreError> {
    Ok(CreateCustomer {
        name: required_text("name", &input.name, MAX_NAME_LENGTH)?,
        mobile: normalize_mobile(&input.mobile)?,
        address: optional_text("address", input.address.as_deref(), MAX_TEXT_LENGTH)?,
        national_id: optional_text(
            "national_id",
            input.national_id.as_deref(),
            MAX_NATIONAL_ID_LENGTH,
        )?,
    })
}

fn validate_update(input: UpdateCustomer) -> Result<UpdateCustomer, CoreError> {
    Ok(UpdateCustomer {
        name: input
            .name
            .as_deref()
            .map(|v| required_text("name", v, MAX_NAME_LENGTH))
            .transpose()?,
        mobile: input.mobile.as_deref().map(normalize_mobile).transpose()?,
        address: input
            .address
            .as_ref()
            .map(|v| optional_text("address", v.as_deref(), MAX_TEXT_LENGTH))
            .transpose()?,
        national_id: input
            .national_id
            .as_ref()
            .map(|v| optional_text("national_id", v.as_deref(), MAX_NATIONAL_ID_LENGTH))
            .transpose()?,
    })
}
