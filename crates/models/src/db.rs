use sea_orm::{Database, DatabaseConnection};

/// Connect to the given SQLite URL and bring the schema up to date.
/// URL resolution (config file, `DATABASE_URL`, default path) happens in the
/// `configs` crate; callers pass the resolved value.
pub async fn connect_and_migrate(url: &str) -> anyhow::Result<DatabaseConnection> {
    use migration::MigratorTrait;
    let db = Database::connect(url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}
