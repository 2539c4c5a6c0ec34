//! Reservation HTTP handlers

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use crate::application::identity::Caller;
use crate::application::BookingRequest;
use crate::domain::{AvailabilityWindow, ReservationFilter};
use crate::interfaces::http::common::{
    domain_error, error_response, ApiError, ApiResponse, ApiResult, ValidatedJson, ValidatedQuery,
};
use crate::interfaces::http::modules::state::BookingState;

use super::dto::*;

fn caller_of(caller: Option<Extension<Caller>>) -> Caller {
    caller.map(|Extension(c)| c).unwrap_or_default()
}

fn parse_id(raw: Option<&str>) -> Result<i32, ApiError> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty()).ok_or_else(|| {
        error_response(StatusCode::BAD_REQUEST, "Reservation id is required")
    })?;
    raw.parse::<i32>().map_err(|_| {
        error_response(
            StatusCode::BAD_REQUEST,
            format!("Invalid reservation id '{}'", raw),
        )
    })
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations",
    tag = "Reservations",
    request_body = CreateReservationRequest,
    responses(
        (status = 201, description = "Reservation created", body = ApiResponse<ReservationDto>),
        (status = 404, description = "Table not found"),
        (status = 409, description = "Table already reserved for that slot"),
        (status = 422, description = "Invalid request")
    )
)]
pub async fn create_reservation(
    State(state): State<BookingState>,
    caller: Option<Extension<Caller>>,
    ValidatedJson(body): ValidatedJson<CreateReservationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ReservationDto>>), ApiError> {
    let caller = caller_of(caller);
    let request = BookingRequest {
        table_id: body.table_id,
        name: body.name,
        email: body.email,
        date: body.date,
        time_slot: body.time_slot,
        guests: body.guests,
    };

    let reservation = state
        .booking
        .book(&caller, request, state.clock.today())
        .await
        .map_err(domain_error)?;

    let dto = ReservationDto::from_domain(reservation, state.booking.engine().catalog());
    Ok((StatusCode::CREATED, Json(ApiResponse::success(dto))))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations",
    tag = "Reservations",
    params(ReservationQuery),
    responses(
        (status = 200, description = "Reservations, ordered by date", body = ApiResponse<Vec<ReservationDto>>),
        (status = 403, description = "Caller identity required")
    )
)]
pub async fn list_reservations(
    State(state): State<BookingState>,
    caller: Option<Extension<Caller>>,
    ValidatedQuery(query): ValidatedQuery<ReservationQuery>,
) -> ApiResult<Vec<ReservationDto>> {
    let caller = caller_of(caller);

    let window = match (query.from, query.days) {
        (Some(from), days) => Some(
            AvailabilityWindow::new(from, days.unwrap_or(1))
                .map_err(|e| domain_error(e.into()))?,
        ),
        (None, Some(days)) => Some(
            AvailabilityWindow::new(state.clock.today(), days)
                .map_err(|e| domain_error(e.into()))?,
        ),
        (None, None) => None,
    };
    let filter = ReservationFilter {
        table_id: query.table_id,
        window,
        email: query.email,
    };

    let reservations = state
        .booking
        .reservations(&caller, filter)
        .await
        .map_err(domain_error)?;

    let catalog = state.booking.engine().catalog();
    Ok(Json(ApiResponse::success(
        reservations
            .into_iter()
            .map(|r| ReservationDto::from_domain(r, catalog))
            .collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations/{reservation_id}",
    tag = "Reservations",
    params(("reservation_id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation", body = ApiResponse<ReservationDto>),
        (status = 400, description = "Malformed id"),
        (status = 403, description = "Reservation belongs to another guest, or no identity"),
        (status = 404, description = "Reservation not found")
    )
)]
pub async fn get_reservation(
    State(state): State<BookingState>,
    caller: Option<Extension<Caller>>,
    Path(reservation_id): Path<String>,
) -> ApiResult<ReservationDto> {
    let id = parse_id(Some(&reservation_id))?;
    let reservation = state
        .booking
        .reservation(&caller_of(caller), id)
        .await
        .map_err(domain_error)?;

    Ok(Json(ApiResponse::success(ReservationDto::from_domain(
        reservation,
        state.booking.engine().catalog(),
    ))))
}

async fn cancel(
    state: &BookingState,
    caller: &Caller,
    id: i32,
) -> ApiResult<Vec<ReservationDto>> {
    let deleted = state.booking.cancel(caller, id).await.map_err(domain_error)?;
    let dto = ReservationDto::from_domain(deleted, state.booking.engine().catalog());
    Ok(Json(ApiResponse::success(vec![dto])))
}

#[utoipa::path(
    delete,
    path = "/api/v1/reservations/{reservation_id}",
    tag = "Reservations",
    params(("reservation_id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Deleted rows", body = ApiResponse<Vec<ReservationDto>>),
        (status = 400, description = "Missing or malformed id"),
        (status = 403, description = "Reservation belongs to another guest, or no identity"),
        (status = 404, description = "Reservation not found")
    )
)]
pub async fn delete_reservation(
    State(state): State<BookingState>,
    caller: Option<Extension<Caller>>,
    Path(reservation_id): Path<String>,
) -> ApiResult<Vec<ReservationDto>> {
    let id = parse_id(Some(&reservation_id))?;
    cancel(&state, &caller_of(caller), id).await
}

#[utoipa::path(
    delete,
    path = "/api/v1/reservations",
    tag = "Reservations",
    params(DeleteReservationQuery),
    responses(
        (status = 200, description = "Deleted rows", body = ApiResponse<Vec<ReservationDto>>),
        (status = 400, description = "Missing or malformed id"),
        (status = 403, description = "Reservation belongs to another guest, or no identity"),
        (status = 404, description = "Reservation not found")
    )
)]
pub async fn delete_reservation_by_query(
    State(state): State<BookingState>,
    caller: Option<Extension<Caller>>,
    Query(query): Query<DeleteReservationQuery>,
) -> ApiResult<Vec<ReservationDto>> {
    let id = parse_id(query.id.as_deref())?;
    cancel(&state, &caller_of(caller), id).await
}
