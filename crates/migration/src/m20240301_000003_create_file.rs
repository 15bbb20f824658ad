use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(File::Table)
                    .if_not_exists()
                    .col(pk_auto(File::Id))
                    .col(string_len(File::AssetId, 255).not_null())
                    .col(integer(File::Version).not_null())
                    .col(string_len(File::Filename, 255).not_null())
                    .col(text(File::RelPath).not_null())
                    .col(string_len(File::Format, 32).not_null())
                    .col(big_integer(File::SizeBytes).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_file_asset")
                            .from(File::Table, File::AssetId)
                            .to(Asset::Table, Asset::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(File::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum File { Table, Id, AssetId, Version, Filename, RelPath, Format, SizeBytes }

#[derive(DeriveIden)]
enum Asset { Table, Id }
