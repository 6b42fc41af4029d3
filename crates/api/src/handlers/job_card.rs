//! Handlers for the `/job-cards` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use repairdesk_core::error::CoreError;
use repairdesk_core::job_status::JobStatus;
use repairdesk_core::listing::Page;
use repairdesk_core::mobile::normalize_mobile;
use repairdesk_core::types::{DbId, Money};
use repairdesk_core::validation::{
    optional_text, parse_id, required_text, validate_amount, MAX_NAME_LENGTH, MAX_TEXT_LENGTH,
};
use repairdesk_db::models::job_card::{
    CreateJobCard, JobCard, StatusSummary, UpdateJobCard, UpdateJobStatus,
};
use repairdesk_db::repositories::JobCardRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppQuery};
use crate::middleware::auth::AuthUser;
use crate::query::ListParams;
use crate::state::AppState;

/// POST /api/job-cards
///
/// The bill number is assigned atomically with the row; the creator is the
/// signed-in operator.
pub async fn create(
    State(state): State<AppState>,
    auth_user: AuthUser,
    AppJson(input): AppJson<CreateJobCard>,
) -> AppResult<(StatusCode, Json<JobCard>)> {
    let input = validate_create(input)?;
    let card = JobCardRepo::create(&state.pool, &input, auth_user.user_id).await?;

    tracing::info!(
        job_card_id = card.id,
        bill_no = card.bill_no,
        user_id = auth_user.user_id,
        "Job card created"
    );
    Ok((StatusCode::CREATED, Json(card)))
}

/// GET /api/job-cards
pub async fn list(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    AppQuery(params): AppQuery<ListParams>,
) -> AppResult<Json<Page<JobCard>>> {
    let query = params.list_query()?;
    let page = JobCardRepo::list(&state.pool, &query).await?;
    Ok(Json(page))
}

/// GET /api/job-cards/summary
pub async fn summary(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> AppResult<Json<StatusSummary>> {
    let summary = JobCardRepo::status_summary(&state.pool).await?;
    Ok(Json(summary))
}

/// GET /api/job-cards/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(raw_id): Path<String>,
) -> AppResult<Json<JobCard>> {
    let id = parse_id("job card", &raw_id)?;
    let card = JobCardRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(card))
}

/// PUT /api/job-cards/{id}
///
/// Omitted fields are left unchanged. `address` and `final_amount` are
/// cleared by an explicit `null`; a blank `address` clears it too.
pub async fn update(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(raw_id): Path<String>,
    AppJson(input): AppJson<UpdateJobCard>,
) -> AppResult<Json<JobCard>> {
    let id = parse_id("job card", &raw_id)?;
    let input = validate_update(input)?;
    let card = JobCardRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(card))
}

/// PATCH /api/job-cards/{id}/status
///
/// Any status may move to any other, including itself.
pub async fn update_status(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(raw_id): Path<String>,
    AppJson(input): AppJson<UpdateJobStatus>,
) -> AppResult<Json<JobCard>> {
    let id = parse_id("job card", &raw_id)?;
    let status: JobStatus = input.status.parse()?;

    let card = JobCardRepo::update_status(&state.pool, id, status)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(
        job_card_id = id,
        status = %status,
        user_id = auth_user.user_id,
        "Job card status changed"
    );
    Ok(Json(card))
}

/// DELETE /api/job-cards/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(raw_id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_id("job card", &raw_id)?;
    if JobCardRepo::delete(&state.pool, id).await? {
        tracing::info!(job_card_id = id, user_id = auth_user.user_id, "Job card deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "JobCard",
        id,
    })
}

fn check_amounts(amounts: [(&str, Option<Money>); 4]) -> Result<(), CoreError> {
    for (field, amount) in amounts {
        if let Some(amount) = amount {
            validate_amount(field, amount)?;
        }
    }
    Ok(())
}

/// Trim and check the text fields, normalize the mobile, and range-check amounts.
fn validate_create(input: CreateJobCard) -> Result<CreateJobCard, CoreError> {
    check_amounts([
        ("admission_fee", Some(input.admission_fee)),
        ("estimate", Some(input.estimate)),
        ("advance", Some(input.advance)),
        ("final_amount", input.final_amount),
    ])?;

    Ok(CreateJobCard {
        customer_name: required_text("customer_name", &input.customer_name, MAX_NAME_LENGTH)?,
        mobile: normalize_mobile(&input.mobile)?,
        address: optional_text("address", input.address.as_deref(), MAX_TEXT_LENGTH)?,
        model: required_text("model", &input.model, MAX_NAME_LENGTH)?,
        complaint: required_text("complaint", &input.complaint, MAX_TEXT_LENGTH)?,
        ..input
    })
}

/// As [`validate_create`] for the supplied fields; `status` is canonicalized.
fn validate_update(input: UpdateJobCard) -> Result<UpdateJobCard, CoreError> {
    check_amounts([
        ("admission_fee", input.admission_fee),
        ("estimate", input.estimate),
        ("advance", input.advance),
        ("final_amount", input.final_amount.flatten()),
    ])?;

    let status = input
        .status
        .as_deref()
        .map(str::parse::<JobStatus>)
        .transpose()?
        .map(|s| s.as_str().to_string());

    Ok(UpdateJobCard {
        customer_name: input
            .customer_name
            .as_deref()
            .map(|v| required_text("customer_name", v, MAX_NAME_LENGTH))
            .transpose()?,
        mobile: input.mobile.as_deref().map(normalize_mobile).transpose()?,
        address: input
            .address
            .as_ref()
            .map(|v| optional_text("address", v.as_deref(), MAX_TEXT_LENGTH))
            .transpose()?,
        model: input
            .model
            .as_deref()
            .map(|v| required_text("model", v, MAX_NAME_LENGTH))
            .transpose()?,
        complaint: input
            .complaint
            .as_deref()
            .map(|v| required_text("complaint", v, MAX_TEXT_LENGTH))
            .transpose()?,
        status,
        ..input
    })
}
