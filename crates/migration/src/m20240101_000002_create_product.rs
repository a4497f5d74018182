//! Create `products` table with a click counter defaulting to zero.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Product::Table)
                    .if_not_exists()
                    .col(pk_auto(Product::Id))
                    .col(string_len(Product::Name, 100).unique_key().not_null())
                    .col(string_len(Product::CategoryName, 100).not_null())
                    .col(string_len(Product::SubcategoryName, 100).not_null())
                    .col(text(Product::Description).not_null())
                    .col(double(Product::Price).not_null())
                    .col(string_len_null(Product::ImageUrl, 255))
                    .col(integer(Product::Clicks).not_null().default(0))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Product::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Product {
    #[sea_orm(iden = "products")]
    Table,
    Id,
    Name,
    CategoryName,
    SubcategoryName,
    Description,
    Price,
    ImageUrl,
    Clicks,
}
