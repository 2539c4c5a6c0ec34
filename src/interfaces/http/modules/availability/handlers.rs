use axum::extract::State;
use axum::Json;
use chrono::NaiveDate;

use crate::interfaces::http::common::{domain_error, ApiResponse, ApiResult, ValidatedQuery};
use crate::interfaces::http::modules::state::BookingState;
use crate::interfaces::http::modules::tables::TableDto;

use super::dto::*;

#[utoipa::path(
    get,
    path = "/api/v1/availability/tables",
    tag = "Availability",
    params(FreeTablesQuery),
    responses(
        (status = 200, description = "Tables seating the party that are free at that time", body = ApiResponse<Vec<TableDto>>),
        (status = 422, description = "Unknown time slot or invalid guest count")
    )
)]
pub async fn available_tables(
    State(state): State<BookingState>,
    ValidatedQuery(query): ValidatedQuery<FreeTablesQuery>,
) -> ApiResult<Vec<TableDto>> {
    let tables = state
        .booking
        .available_tables(query.guests, query.date, &query.time, state.clock.today())
        .await
        .map_err(domain_error)?;

    Ok(Json(ApiResponse::success(
        tables.into_iter().map(Into::into).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/availability/dates",
    tag = "Availability",
    params(FreeDatesQuery),
    responses(
        (status = 200, description = "Bookable dates, today or later", body = ApiResponse<Vec<NaiveDate>>)
    )
)]
pub async fn available_dates(
    State(state): State<BookingState>,
    ValidatedQuery(query): ValidatedQuery<FreeDatesQuery>,
) -> ApiResult<Vec<NaiveDate>> {
    let dates = state
        .booking
        .available_dates(query.guests, state.clock.today())
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(dates)))
}

#[utoipa::path(
    get,
    path = "/api/v1/availability/times",
    tag = "Availability",
    params(FreeTimesQuery),
    responses(
        (status = 200, description = "Time labels free on that date", body = ApiResponse<Vec<String>>)
    )
)]
pub async fn available_times(
    State(state): State<BookingState>,
    ValidatedQuery(query): ValidatedQuery<FreeTimesQuery>,
) -> ApiResult<Vec<String>> {
    let times = state
        .booking
        .available_times(query.guests, query.date, state.clock.today())
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(times)))
}
