//! Create `bookings` table.
//!
//! `product_id` / `service_id` are weak references: plain nullable integers
//! without foreign keys, so deleting a product or service keeps its bookings.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Booking::Table)
                    .if_not_exists()
                    .col(pk_auto(Booking::Id))
                    .col(integer_null(Booking::ProductId))
                    .col(integer_null(Booking::ServiceId))
                    .col(string_len(Booking::Name, 255).not_null())
                    .col(string_len(Booking::Phone, 20).not_null())
                    .col(text_null(Booking::Message))
                    .col(timestamp_with_time_zone(Booking::Timestamp).not_null())
                    .col(string_len_null(Booking::Appointment, 25))
                    .col(string_len(Booking::Status, 16).not_null().default("pending"))
                    .col(double_null(Booking::AmountPaid))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Booking::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Booking {
    #[sea_orm(iden = "bookings")]
    Table,
    Id,
    ProductId,
    ServiceId,
    Name,
    Phone,
    Message,
    Timestamp,
    Appointment,
    Status,
    AmountPaid,
}
