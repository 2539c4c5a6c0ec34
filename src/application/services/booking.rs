//! Booking service: application-layer orchestration
//!
//! Sources tables and reservations from the repositories, runs the
//! availability engine over them and reconciles bookings with the store.
//! HTTP handlers are thin wrappers around this service.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, instrument, warn};

use crate::application::identity::Caller;
use crate::domain::{
    AvailabilityEngine, AvailabilityWindow, DomainError, DomainResult, NewReservation,
    RepositoryProvider, Reservation, ReservationFilter, Table, TableAvailability, WindowPolicy,
};
use crate::shared::retry::{retry_with_backoff, RetryConfig};

/// A guest's request for a table
#[derive(Debug, Clone)]
pub struct BookingRequest {
    /// Specific table, or `None` to take the first free one that fits
    pub table_id: Option<i32>,
    pub name: String,
    pub email: String,
    pub date: NaiveDate,
    /// Display label ("1:00 PM") or stored form ("13:00:00")
    pub time_slot: String,
    pub guests: i32,
}

pub struct BookingService {
    repos: Arc<dyn RepositoryProvider>,
    engine: AvailabilityEngine,
    window: WindowPolicy,
    retry: RetryConfig,
}

impl BookingService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        engine: AvailabilityEngine,
        window: WindowPolicy,
    ) -> Self {
        Self {
            repos,
            engine,
            window,
            retry: RetryConfig::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn engine(&self) -> &AvailabilityEngine {
        &self.engine
    }

    pub fn window_policy(&self) -> WindowPolicy {
        self.window
    }

    // ── Tables ──────────────────────────────────────────────────

    pub async fn create_table(&self, caller: &Caller, capacity: i32) -> DomainResult<Table> {
        if !caller.can_manage_tables() {
            return Err(DomainError::Forbidden(
                "only the owner can create tables".into(),
            ));
        }
        if capacity < 1 {
            return Err(DomainError::Validation(
                "capacity must be at least 1".into(),
            ));
        }

        let table = self.repos.tables().create(capacity).await?;
        info!(table_id = table.id, capacity, "Table created");
        Ok(table)
    }

    /// Every table with its slots over the configured window
    #[instrument(skip(self))]
    pub async fn table_availability(
        &self,
        today: NaiveDate,
    ) -> DomainResult<Vec<TableAvailability>> {
        let window = self.window.resolve(today)?;
        let tables = self.load_tables().await?;
        let reservations = self
            .load_reservations(ReservationFilter::for_window(window))
            .await?;

        metrics::counter!("availability_queries_total", "query" => "tables").increment(1);
        Ok(self
            .engine
            .compute_availability(&tables, &reservations, &window))
    }

    // ── Reservations ────────────────────────────────────────────

    /// Book a table. Never retried: a repeated insert could double-book
    /// once the first attempt actually reached the store.
    #[instrument(skip(self, caller, request), fields(date = %request.date, guests = request.guests))]
    pub async fn book(
        &self,
        caller: &Caller,
        request: BookingRequest,
        today: NaiveDate,
    ) -> DomainResult<Reservation> {
        if request.date < today {
            return Err(DomainError::Validation(format!(
                "date {} is in the past",
                request.date
            )));
        }
        if request.guests < 1 {
            return Err(DomainError::Validation(
                "guests must be at least 1".into(),
            ));
        }
        if request.name.trim().is_empty() {
            return Err(DomainError::Validation("name is required".into()));
        }

        let slot = self.engine.catalog().resolve(&request.time_slot)?.clone();
        let day = AvailabilityWindow::single_day(request.date);

        let table = match request.table_id {
            Some(table_id) => {
                let table = self
                    .load_table(table_id)
                    .await?
                    .ok_or_else(|| DomainError::not_found("Table", "id", table_id))?;
                if !table.seats(request.guests) {
                    return Err(DomainError::Validation(format!(
                        "table {} seats {}, party of {}",
                        table.id, table.capacity, request.guests
                    )));
                }
                let booked = self
                    .load_reservations(ReservationFilter {
                        table_id: Some(table_id),
                        window: Some(day),
                        email: None,
                    })
                    .await?;
                self.engine
                    .first_available_table(
                        std::slice::from_ref(&table),
                        &booked,
                        request.guests,
                        request.date,
                        &slot.label,
                    )?
                    .ok_or_else(|| {
                        self.conflict(format!(
                            "table {} is already reserved on {} at {}",
                            table_id, request.date, slot.label
                        ))
                    })?
            }
            None => {
                let tables = self.load_tables().await?;
                let booked = self
                    .load_reservations(ReservationFilter::for_window(day))
                    .await?;
                self.engine
                    .first_available_table(
                        &tables,
                        &booked,
                        request.guests,
                        request.date,
                        &slot.label,
                    )?
                    .ok_or_else(|| {
                        self.conflict(format!(
                            "no table for {} is free on {} at {}",
                            request.guests, request.date, slot.label
                        ))
                    })?
            }
        };

        // customers always book under their own identity
        let email = caller
            .customer_email()
            .map(str::to_string)
            .unwrap_or(request.email);

        let created = self
            .repos
            .reservations()
            .create(NewReservation {
                table_id: table.id,
                name: request.name.trim().to_string(),
                email,
                date: request.date,
                time_slot: slot.stored.clone(),
                guests: request.guests,
            })
            .await;

        match created {
            Ok(reservation) => {
                metrics::counter!("reservations_created_total").increment(1);
                info!(
                    reservation_id = reservation.id,
                    table_id = reservation.table_id,
                    time_slot = %slot.label,
                    "Reservation created"
                );
                Ok(reservation)
            }
            Err(DomainError::Conflict(msg)) => Err(self.conflict(msg)),
            Err(e) => Err(e),
        }
    }

    pub async fn reservations(
        &self,
        caller: &Caller,
        mut filter: ReservationFilter,
    ) -> DomainResult<Vec<Reservation>> {
        if caller.is_anonymous() {
            return Err(DomainError::Forbidden(
                "an identity is required to list reservations".into(),
            ));
        }
        if let Some(email) = caller.customer_email() {
            filter.email = Some(email.to_string());
        }
        self.load_reservations(filter).await
    }

    pub async fn reservation(&self, caller: &Caller, id: i32) -> DomainResult<Reservation> {
        let reservation = retry_with_backoff(
            &self.retry,
            || self.repos.reservations().find_by_id(id),
            DomainError::is_transient,
            "find_reservation",
        )
        .await?
        .ok_or_else(|| DomainError::not_found("Reservation", "id", id))?;

        if !caller.owns(&reservation.email) {
            return Err(DomainError::Forbidden(format!(
                "reservation {} belongs to another guest",
                id
            )));
        }
        Ok(reservation)
    }

    /// Cancel a reservation, returning the removed row
    pub async fn cancel(&self, caller: &Caller, id: i32) -> DomainResult<Reservation> {
        if !caller.can_manage_tables() {
            // ownership has to be checked before anything is removed
            self.reservation(caller, id).await?;
        }

        let deleted = self.repos.reservations().delete(id).await?;
        info!(reservation_id = id, table_id = deleted.table_id, "Reservation cancelled");
        Ok(deleted)
    }

    // ── Reverse lookups ─────────────────────────────────────────

    /// Tables seating `guests` that are free at `time` on `date`
    pub async fn available_tables(
        &self,
        guests: i32,
        date: NaiveDate,
        time: &str,
        today: NaiveDate,
    ) -> DomainResult<Vec<Table>> {
        let label = self.engine.catalog().resolve(time)?.label.clone();
        if date < today {
            return Ok(Vec::new());
        }

        let tables = self.load_tables().await?;
        let reservations = self
            .load_reservations(ReservationFilter::for_window(AvailabilityWindow::single_day(
                date,
            )))
            .await?;

        metrics::counter!("availability_queries_total", "query" => "tables_free").increment(1);
        Ok(self
            .engine
            .find_available_tables(&tables, &reservations, guests, date, &label)?)
    }

    /// Bookable dates in the configured window for a party of `guests`
    pub async fn available_dates(
        &self,
        guests: i32,
        today: NaiveDate,
    ) -> DomainResult<Vec<NaiveDate>> {
        let availability = self.table_availability(today).await?;
        Ok(self.engine.available_dates(&availability, guests, today)?)
    }

    /// Time labels still free on `date` for a party of `guests`
    pub async fn available_times(
        &self,
        guests: i32,
        date: NaiveDate,
        today: NaiveDate,
    ) -> DomainResult<Vec<String>> {
        if guests < 1 {
            return Err(crate::domain::AvailabilityError::InvalidGuestCount(guests).into());
        }
        if date < today {
            return Ok(Vec::new());
        }

        let day = AvailabilityWindow::single_day(date);
        let tables = self.load_tables().await?;
        let reservations = self
            .load_reservations(ReservationFilter::for_window(day))
            .await?;
        let availability = self
            .engine
            .compute_availability(&tables, &reservations, &day);

        metrics::counter!("availability_queries_total", "query" => "times").increment(1);
        Ok(self.engine.available_times(&availability, guests, date)?)
    }

    // ── Store reads ─────────────────────────────────────────────

    async fn load_tables(&self) -> DomainResult<Vec<Table>> {
        retry_with_backoff(
            &self.retry,
            || self.repos.tables().list(),
            DomainError::is_transient,
            "list_tables",
        )
        .await
    }

    async fn load_table(&self, id: i32) -> DomainResult<Option<Table>> {
        retry_with_backoff(
            &self.retry,
            || self.repos.tables().find_by_id(id),
            DomainError::is_transient,
            "find_table",
        )
        .await
    }

    async fn load_reservations(&self, filter: ReservationFilter) -> DomainResult<Vec<Reservation>> {
        retry_with_backoff(
            &self.retry,
            || self.repos.reservations().list(&filter),
            DomainError::is_transient,
            "list_reservations",
        )
        .await
    }

    fn conflict(&self, message: String) -> DomainError {
        metrics::counter!("reservation_conflicts_total").increment(1);
        warn!("Booking conflict: {}", message);
        DomainError::Conflict(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::InMemoryRepositoryProvider;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn today() -> NaiveDate {
        d(2024, 5, 20)
    }

    async fn service_with_tables(capacities: &[i32]) -> BookingService {
        let service = BookingService::new(
            Arc::new(InMemoryRepositoryProvider::new()),
            AvailabilityEngine::default(),
            WindowPolicy::NextCalendarMonth,
        )
        .with_retry(RetryConfig::none());
        for capacity in capacities {
            service
                .create_table(&Caller::owner(None), *capacity)
                .await
                .unwrap();
        }
        service
    }

    fn request(table_id: Option<i32>, date: NaiveDate, slot: &str, guests: i32) -> BookingRequest {
        BookingRequest {
            table_id,
            name: "Ana".into(),
            email: "ana@example.com".into(),
            date,
            time_slot: slot.into(),
            guests,
        }
    }

    #[tokio::test]
    async fn listing_covers_next_calendar_month() {
        let service = service_with_tables(&[2, 4]).await;
        let anon = Caller::anonymous();
        service
            .book(&anon, request(Some(1), d(2024, 6, 15), "1:00 PM", 2), today())
            .await
            .unwrap();

        let listing = service.table_availability(today()).await.unwrap();

        assert_eq!(listing.len(), 2);
        assert_eq!(listing[0].availability.len(), 30);
        assert_eq!(listing[0].availability[0].date, d(2024, 6, 1));
        let day = listing[0].on(d(2024, 6, 15)).unwrap();
        assert_eq!(day.times.get("1:00 PM"), Some(false));
        assert!(listing[1].on(d(2024, 6, 15)).unwrap().times.is_free("1:00 PM"));
    }

    #[tokio::test]
    async fn book_stores_24_hour_slot() {
        let service = service_with_tables(&[4]).await;
        let r = service
            .book(&Caller::anonymous(), request(None, d(2024, 6, 2), "2:00 PM", 3), today())
            .await
            .unwrap();
        assert_eq!(r.time_slot, "14:00:00");
        assert_eq!(r.table_id, 1);
    }

    #[tokio::test]
    async fn auto_assign_takes_first_free_table_that_fits() {
        let service = service_with_tables(&[2, 4, 6]).await;
        let anon = Caller::anonymous();
        let date = d(2024, 6, 2);

        let first = service.book(&anon, request(None, date, "12:00 PM", 3), today()).await.unwrap();
        assert_eq!(first.table_id, 2);

        let second = service.book(&anon, request(None, date, "12:00 PM", 3), today()).await.unwrap();
        assert_eq!(second.table_id, 3);

        let err = service
            .book(&anon, request(None, date, "12:00 PM", 3), today())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn explicit_table_checks() {
        let service = service_with_tables(&[2]).await;
        let anon = Caller::anonymous();
        let date = d(2024, 6, 2);

        let err = service.book(&anon, request(Some(9), date, "12:00 PM", 2), today()).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));

        let err = service.book(&anon, request(Some(1), date, "12:00 PM", 5), today()).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        service.book(&anon, request(Some(1), date, "12:00 PM", 2), today()).await.unwrap();
        let err = service.book(&anon, request(Some(1), date, "12:00:00", 2), today()).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn book_rejects_invalid_requests() {
        let service = service_with_tables(&[2]).await;
        let anon = Caller::anonymous();

        for bad in [
            request(None, d(2024, 5, 19), "12:00 PM", 2),
            request(None, d(2024, 6, 1), "12:00 PM", 0),
            request(None, d(2024, 6, 1), "11:00 PM", 2),
        ] {
            let err = service.book(&anon, bad, today()).await.unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)), "{err:?}");
        }

        // today itself is bookable
        service
            .book(&anon, request(None, today(), "12:00 PM", 2), today())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn customers_are_confined_to_their_reservations() {
        let service = service_with_tables(&[4]).await;
        let ana = Caller::customer("ana@example.com");
        let bo = Caller::customer("bo@example.com");
        let date = d(2024, 6, 3);

        let mut spoofed = request(None, date, "12:00 PM", 2);
        spoofed.email = "someone@example.com".into();
        let ana_res = service.book(&ana, spoofed, today()).await.unwrap();
        assert_eq!(ana_res.email, "ana@example.com");
        service.book(&bo, request(None, date, "1:00 PM", 2), today()).await.unwrap();

        let seen = service.reservations(&ana, ReservationFilter::default()).await.unwrap();
        assert_eq!(seen, vec![ana_res.clone()]);
        let all = service
            .reservations(&Caller::owner(None), ReservationFilter::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 2);

        let err = service.cancel(&bo, ana_res.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
        let err = service.reservation(&bo, ana_res.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));

        assert_eq!(service.cancel(&ana, ana_res.id).await.unwrap(), ana_res);
        let err = service.cancel(&ana, ana_res.id).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn anonymous_callers_can_only_book() {
        let service = service_with_tables(&[4]).await;
        let anon = Caller::anonymous();
        let booked = service
            .book(&anon, request(None, d(2024, 6, 3), "12:00 PM", 2), today())
            .await
            .unwrap();
        assert_eq!(booked.email, "ana@example.com");

        let err = service.create_table(&anon, 2).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
        let err = service
            .reservations(&anon, ReservationFilter::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
        let err = service.reservation(&anon, booked.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
        let err = service.cancel(&anon, booked.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));

        // still there for the owner
        let owner = Caller::owner(None);
        assert_eq!(service.cancel(&owner, booked.id).await.unwrap(), booked);
    }

    #[tokio::test]
    async fn customers_cannot_create_tables() {
        let service = service_with_tables(&[]).await;
        let err = service
            .create_table(&Caller::customer("ana@example.com"), 4)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));

        let err = service.create_table(&Caller::owner(None), 0).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn reverse_lookups() {
        let service = service_with_tables(&[2, 4]).await;
        let anon = Caller::anonymous();
        let date = d(2024, 6, 10);
        service.book(&anon, request(Some(2), date, "3:00 PM", 4), today()).await.unwrap();

        let tables = service.available_tables(3, date, "3:00 PM", today()).await.unwrap();
        assert!(tables.is_empty());
        let tables = service.available_tables(2, date, "15:00:00", today()).await.unwrap();
        assert_eq!(tables, vec![Table::new(1, 2)]);
        let past = service.available_tables(2, d(2024, 5, 1), "3:00 PM", today()).await.unwrap();
        assert!(past.is_empty());

        let times = service.available_times(4, date, today()).await.unwrap();
        assert_eq!(times, vec!["12:00 PM", "1:00 PM", "2:00 PM"]);

        let dates = service.available_dates(4, today()).await.unwrap();
        assert_eq!(dates.len(), 30);
        assert_eq!(dates[0], d(2024, 6, 1));

        let dates = service.available_dates(8, today()).await.unwrap();
        assert!(dates.is_empty());
    }
}
