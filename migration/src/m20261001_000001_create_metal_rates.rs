use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MetalRates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MetalRates::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MetalRates::Metal).string_len(16).not_null())
                    .col(ColumnDef::new(MetalRates::Purity).string_len(16).not_null())
                    .col(ColumnDef::new(MetalRates::Market).string_len(16).not_null())
                    // Prices are decimal strings: INR whole rupees, BHD 3dp, USD 2dp
                    .col(ColumnDef::new(MetalRates::PricePerGramInr).string_len(32).not_null())
                    .col(ColumnDef::new(MetalRates::PricePerGramBhd).string_len(32).not_null())
                    .col(ColumnDef::new(MetalRates::PricePerGramUsd).string_len(32).not_null())
                    .col(ColumnDef::new(MetalRates::Source).text().not_null())
                    .col(ColumnDef::new(MetalRates::LastUpdated).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // One row per (metal, purity, market); upserts conflict on this index
        manager
            .create_index(
                Index::create()
                    .name("idx_metal_rates_metal_purity_market")
                    .table(MetalRates::Table)
                    .col(MetalRates::Metal)
                    .col(MetalRates::Purity)
                    .col(MetalRates::Market)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MetalRates::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum MetalRates {
    Table,
    Id,
    Metal,
    Purity,
    Market,
    PricePerGramInr,
    PricePerGramBhd,
    PricePerGramUsd,
    Source,
    LastUpdated,
}
