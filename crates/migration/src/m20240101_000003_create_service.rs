//! Create `services` table.
//! Before/after images are optional paths or URLs.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Service::Table)
                    .if_not_exists()
                    .col(pk_auto(Service::Id))
                    .col(string_len(Service::Name, 100).unique_key().not_null())
                    .col(string_len_null(Service::Description, 500))
                    .col(double(Service::Price).not_null())
                    .col(string_len(Service::CategoryName, 100).not_null())
                    .col(string_len(Service::SubcategoryName, 100).not_null())
                    .col(string_len_null(Service::BeforeServiceImage, 255))
                    .col(string_len_null(Service::AfterServiceImage, 255))
                    .col(integer(Service::Clicks).not_null().default(0))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Service::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Service {
    #[sea_orm(iden = "services")]
    Table,
    Id,
    Name,
    Description,
    Price,
    CategoryName,
    SubcategoryName,
    BeforeServiceImage,
    AfterServiceImage,
    Clicks,
}
