use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Asset: listing filters on family and status
        manager
            .create_index(
                Index::create()
                    .name("idx_asset_family")
                    .table(Asset::Table)
                    .col(Asset::Family)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_asset_status")
                    .table(Asset::Table)
                    .col(Asset::Status)
                    .to_owned(),
            )
            .await?;

        // Version: composite unique (asset_id, version)
        manager
            .create_index(
                Index::create()
                    .name("uniq_version_asset_version")
                    .table(Version::Table)
                    .col(Version::AssetId)
                    .col(Version::Version)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // File: lookup by asset and by (asset, version)
        manager
            .create_index(
                Index::create()
                    .name("idx_file_asset_version")
                    .table(File::Table)
                    .col(File::AssetId)
                    .col(File::Version)
                    .to_owned(),
            )
            .await?;

        // Change feed: polled by created_at
        manager
            .create_index(
                Index::create()
                    .name("idx_change_created_at")
                    .table(Change::Table)
                    .col(Change::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_asset_family").table(Asset::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_asset_status").table(Asset::Table).to_owned())
            .await?;
        manager
            .drop_index(
                Index::drop().name("uniq_version_asset_version").table(Version::Table).to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop().name("idx_file_asset_version").table(File::Table).to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop().name("idx_change_created_at").table(Change::Table).to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Asset { Table, Family, Status }

#[derive(DeriveIden)]
enum Version { Table, AssetId, Version }

#[derive(DeriveIden)]
enum File { Table, AssetId, Version }

#[derive(DeriveIden)]
enum Change { Table, CreatedAt }
