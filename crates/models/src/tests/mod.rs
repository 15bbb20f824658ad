mod crud_tests;

use sea_orm::DatabaseConnection;
use tempfile::TempDir;

/// Fresh file-backed SQLite database with the full schema applied.
/// The TempDir must stay alive for as long as the connection is used.
pub(crate) async fn setup_test_db() -> (DatabaseConnection, TempDir) {
    let dir = TempDir::new().expect("temp dir");
    let db_path = dir.path().join("test.sqlite3");
    let url = format!("sqlite:{}?mode=rwc", db_path.display());
    let db = crate::db::connect_and_migrate(&url).await.expect("connect + migrate");
    (db, dir)
}
