use sqlx::{SqlitePool, sqlite::SqlitePoolOptions, sqlite::SqliteConnectOptions};
use std::str::FromStr;
use std::time::Duration;

#[derive(Clone)]
pub struct Db(pub SqlitePool);
impl Db {
    pub async fn connect_and_migrate(path: &str) -> anyhow::Result<Self> {
        let opts = SqliteConnectOptions::from_str(&format!("sqlite://{}", path))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(8)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(opts).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Db(pool))
    }

    /// Startup-only readiness wait: fixed backoff, bounded attempts, then give up.
    pub async fn connect_with_retry(
        path: &str,
        attempts: u32,
        backoff: Duration,
    ) -> anyhow::Result<Self> {
        let attempts = attempts.max(1);
        let mut attempt = 1;
        loop {
            match Self::connect_and_migrate(path).await {
                Ok(db) => {
                    log::info!("connected to database at {path}");
                    return Ok(db);
                }
                Err(e) if attempt < attempts => {
                    log::warn!(
                        "database not ready (attempt {attempt}/{attempts}): {e:#}, retrying in {:?}",
                        backoff
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(e) => {
                    return Err(e.context(format!(
                        "could not connect to database after {attempts} attempts"
                    )));
                }
            }
        }
    }
}
