use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Append-only change feed; rows outlive the asset they describe,
        // so no foreign key here.
        manager
            .create_table(
                Table::create()
                    .table(Change::Table)
                    .if_not_exists()
                    .col(pk_auto(Change::Id))
                    .col(string_len(Change::Kind, 64).not_null())
                    .col(string_len(Change::AssetId, 255).not_null())
                    .col(json(Change::Payload).not_null())
                    .col(timestamp_with_time_zone(Change::CreatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Change::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Change { Table, Id, Kind, AssetId, Payload, CreatedAt }
