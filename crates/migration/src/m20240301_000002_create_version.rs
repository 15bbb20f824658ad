use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Version::Table)
                    .if_not_exists()
                    .col(pk_auto(Version::Id))
                    .col(string_len(Version::AssetId, 255).not_null())
                    .col(integer(Version::Version).not_null())
                    .col(json(Version::Metadata).not_null())
                    .col(timestamp_with_time_zone(Version::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Version::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_version_asset")
                            .from(Version::Table, Version::AssetId)
                            .to(Asset::Table, Asset::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Version::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Version { Table, Id, AssetId, Version, Metadata, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Asset { Table, Id }
