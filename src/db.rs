use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

/// Open the application database and bring its schema up to date.
///
/// First run creates the database file (and its parent directory) from
/// scratch. The schema relies on REFERENCES and the messages CHECK
/// constraint, so foreign-key enforcement is switched on explicitly rather
/// than left to driver defaults; WAL keeps concurrent request handlers from
/// serializing on reads.
pub async fn init_pool(database_url: &str) -> SqlitePool {
    if let Some(path) = database_url.strip_prefix("sqlite:") {
        if let Some(parent) = Path::new(path).parent() {
            std::fs::create_dir_all(parent).ok();
        }
    }

    let options = SqliteConnectOptions::from_str(database_url)
        .expect("Invalid database URL")
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}
