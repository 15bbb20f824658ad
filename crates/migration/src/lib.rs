//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240301_000001_create_asset;
mod m20240301_000002_create_version;
mod m20240301_000003_create_file;
mod m20240301_000004_create_comment;
mod m20240301_000005_create_change;
mod m20240301_000006_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_asset::Migration),
            Box::new(m20240301_000002_create_version::Migration),
            Box::new(m20240301_000003_create_file::Migration),
            Box::new(m20240301_000004_create_comment::Migration),
            Box::new(m20240301_000005_create_change::Migration),
            // Indexes should always be applied last
            Box::new(m20240301_000006_add_indexes::Migration),
        ]
    }
}
