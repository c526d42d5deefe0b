use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Products::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Products::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Products::MetalType).string_len(16).null())
                    .col(ColumnDef::new(Products::Purity).string_len(16).null())
                    .col(ColumnDef::new(Products::GrossWeight).decimal_len(10, 3).null())
                    .col(ColumnDef::new(Products::NetWeight).decimal_len(10, 3).null())
                    .col(
                        ColumnDef::new(Products::MakingChargesPercentage)
                            .decimal_len(5, 2)
                            .null()
                            .default(15),
                    )
                    .col(
                        ColumnDef::new(Products::IsMetalPriceBased)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Products::PriceInr).decimal_len(12, 0).not_null())
                    .col(ColumnDef::new(Products::PriceBhd).decimal_len(12, 3).not_null())
                    .col(ColumnDef::new(Products::UpdatedAt).timestamp().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_products_is_metal_price_based")
                    .table(Products::Table)
                    .col(Products::IsMetalPriceBased)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Products {
    Table,
    Id,
    Name,
    MetalType,
    Purity,
    GrossWeight,
    NetWeight,
    MakingChargesPercentage,
    IsMetalPriceBased,
    PriceInr,
    PriceBhd,
    UpdatedAt,
}
