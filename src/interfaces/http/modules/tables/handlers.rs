//! Table HTTP handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};

use crate::application::identity::Caller;
use crate::interfaces::http::common::{domain_error, ApiError, ApiResponse, ApiResult, ValidatedJson};
use crate::interfaces::http::modules::state::BookingState;

use super::dto::*;

#[utoipa::path(
    post,
    path = "/api/v1/tables",
    tag = "Tables",
    request_body = CreateTableRequest,
    responses(
        (status = 201, description = "Table created", body = ApiResponse<TableDto>),
        (status = 403, description = "Only the owner can create tables"),
        (status = 422, description = "Invalid capacity")
    )
)]
pub async fn create_table(
    State(state): State<BookingState>,
    caller: Option<Extension<Caller>>,
    ValidatedJson(body): ValidatedJson<CreateTableRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TableDto>>), ApiError> {
    let caller = caller.map(|Extension(c)| c).unwrap_or_default();
    let table = state
        .booking
        .create_table(&caller, body.capacity)
        .await
        .map_err(domain_error)?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(table.into()))))
}

#[utoipa::path(
    get,
    path = "/api/v1/tables",
    tag = "Tables",
    responses(
        (status = 200, description = "Every table with its availability over the listing window", body = ApiResponse<Vec<TableAvailabilityDto>>),
        (status = 503, description = "Reservation store unavailable")
    )
)]
pub async fn list_tables(
    State(state): State<BookingState>,
) -> ApiResult<Vec<TableAvailabilityDto>> {
    let availability = state
        .booking
        .table_availability(state.clock.today())
        .await
        .map_err(domain_error)?;

    Ok(Json(ApiResponse::success(
        availability.into_iter().map(Into::into).collect(),
    )))
}
