//! Create reservations table
//!
//! One row per booked (table, date, time slot). The unique index makes the
//! store reject a second booking of the same slot.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_dining_tables::DiningTables;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reservations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reservations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reservations::TableId).integer().not_null())
                    .col(ColumnDef::new(Reservations::Name).string().not_null())
                    .col(ColumnDef::new(Reservations::Email).string().not_null())
                    .col(ColumnDef::new(Reservations::Date).date().not_null())
                    .col(ColumnDef::new(Reservations::TimeSlot).string().not_null())
                    .col(
                        ColumnDef::new(Reservations::Guests)
                            .integer()
                            .not_null()
                            .check(Expr::col(Reservations::Guests).gte(1)),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservations_table")
                            .from(Reservations::Table, Reservations::TableId)
                            .to(DiningTables::Table, DiningTables::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_table_date_slot")
                    .table(Reservations::Table)
                    .col(Reservations::TableId)
                    .col(Reservations::Date)
                    .col(Reservations::TimeSlot)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_email")
                    .table(Reservations::Table)
                    .col(Reservations::Email)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reservations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Reservations {
    Table,
    Id,
    TableId,
    Name,
    Email,
    Date,
    TimeSlot,
    Guests,
}
