use crate::db::Db;
use crate::models::UserCredentials;
use crate::store::StoreError;

#[derive(Clone)]
pub struct CredentialStore {
    db: Db,
}

impl CredentialStore {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Inserts the user and lets the UNIQUE constraint decide duplicates, so two
    /// concurrent registrations of one name cannot both succeed.
    pub async fn register(&self, username: &str, password_hash: &str) -> Result<i64, StoreError> {
        let res = sqlx::query("INSERT INTO users(username, password_hash, created_at) VALUES (?, ?, ?)")
            .bind(username)
            .bind(password_hash)
            .bind(chrono::Utc::now())
            .execute(&self.db.0)
            .await;

        match res {
            Ok(done) => Ok(done.last_insert_rowid()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(StoreError::DuplicateUsername)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn find_by_username(&self, username: &str) -> Result<UserCredentials, StoreError> {
        sqlx::query_as::<_, UserCredentials>("SELECT id, password_hash FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.db.0)
            .await?
            .ok_or(StoreError::NotFound)
    }
}
