//! SeaORM implementation of ReservationRepository

use async_trait::async_trait;
use log::{debug, warn};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::reservation::{
    NewReservation, Reservation, ReservationFilter, ReservationRepository,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::reservation;

pub struct SeaOrmReservationRepository {
    db: DatabaseConnection,
}

impl SeaOrmReservationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: reservation::Model) -> Reservation {
    Reservation {
        id: m.id,
        table_id: m.table_id,
        name: m.name,
        email: m.email,
        date: m.date,
        time_slot: m.time_slot,
        guests: m.guests,
    }
}

fn insert_err(e: sea_orm::DbErr, r: &NewReservation) -> DomainError {
    match DomainError::from(e) {
        DomainError::Conflict(_) => {
            warn!(
                "Slot already booked: table {} on {} at {}",
                r.table_id, r.date, r.time_slot
            );
            DomainError::Conflict(format!(
                "table {} is already reserved on {} at {}",
                r.table_id, r.date, r.time_slot
            ))
        }
        other => other,
    }
}

// ── ReservationRepository impl ──────────────────────────────────

#[async_trait]
impl ReservationRepository for SeaOrmReservationRepository {
    async fn create(&self, r: NewReservation) -> DomainResult<Reservation> {
        debug!(
            "Saving reservation: table {} on {} at {}",
            r.table_id, r.date, r.time_slot
        );

        let model = reservation::ActiveModel {
            table_id: Set(r.table_id),
            name: Set(r.name.clone()),
            email: Set(r.email.clone()),
            date: Set(r.date),
            time_slot: Set(r.time_slot.clone()),
            guests: Set(r.guests),
            ..Default::default()
        };
        let saved = model
            .insert(&self.db)
            .await
            .map_err(|e| insert_err(e, &r))?;
        Ok(model_to_domain(saved))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Reservation>> {
        let model = reservation::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(model_to_domain))
    }

    async fn list(&self, filter: &ReservationFilter) -> DomainResult<Vec<Reservation>> {
        let mut query = reservation::Entity::find();

        if let Some(table_id) = filter.table_id {
            query = query.filter(reservation::Column::TableId.eq(table_id));
        }
        if let Some(window) = &filter.window {
            query = query.filter(
                reservation::Column::Date.between(window.start(), window.last_day()),
            );
        }
        if let Some(email) = &filter.email {
            // SQLite's lower() folds ASCII only, the same rule as eq_ignore_ascii_case
            query = query.filter(
                Expr::expr(Func::lower(Expr::col(reservation::Column::Email)))
                    .eq(email.to_ascii_lowercase()),
            );
        }

        let models = query
            .order_by_asc(reservation::Column::Date)
            .order_by_asc(reservation::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn delete(&self, id: i32) -> DomainResult<Reservation> {
        debug!("Deleting reservation: {}", id);

        let model = reservation::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found("Reservation", "id", id))?;

        let deleted = model.clone().delete(&self.db).await?;
        if deleted.rows_affected == 0 {
            return Err(DomainError::not_found("Reservation", "id", id));
        }
        Ok(model_to_domain(model))
    }
}
