use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Asset::Table)
                    .if_not_exists()
                    .col(string_len(Asset::Id, 255).primary_key())
                    .col(string_len(Asset::Name, 255).not_null())
                    .col(string_len(Asset::Family, 32).not_null())
                    .col(text(Asset::Description).not_null())
                    .col(text(Asset::Tags).not_null())
                    .col(string_len(Asset::Status, 32).not_null())
                    // Highest version number ever assigned; never decremented.
                    .col(integer(Asset::HeadVersion).not_null().default(0))
                    .col(timestamp_with_time_zone(Asset::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Asset::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Asset::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Asset { Table, Id, Name, Family, Description, Tags, Status, HeadVersion, CreatedAt, UpdatedAt }
