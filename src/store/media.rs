use crate::db::Db;
use crate::models::MediaRecord;
use crate::store::StoreError;

const MEDIA_COLUMNS: &str = "id, user_id, filename, mime_type, created_at, media_name";

#[derive(Clone)]
pub struct MediaRepository {
    db: Db,
}

impl MediaRepository {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub async fn insert(
        &self,
        user_id: i64,
        blob_name: &str,
        mime_type: &str,
        media_name: &str,
    ) -> Result<i64, StoreError> {
        let res = sqlx::query("INSERT INTO media(user_id, filename, mime_type, created_at, media_name) VALUES (?, ?, ?, ?, ?)")
            .bind(user_id)
            .bind(blob_name)
            .bind(mime_type)
            .bind(chrono::Utc::now())
            .bind(media_name)
            .execute(&self.db.0)
            .await?;
        Ok(res.last_insert_rowid())
    }

    /// Newest first.
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<MediaRecord>, StoreError> {
        let sql = format!(
            "SELECT {MEDIA_COLUMNS} FROM media WHERE user_id = ? ORDER BY created_at DESC, id DESC"
        );
        Ok(sqlx::query_as::<_, MediaRecord>(&sql)
            .bind(user_id)
            .fetch_all(&self.db.0)
            .await?)
    }

    /// Owner is part of the predicate: someone else's id looks exactly like a missing one.
    pub async fn get_by_id_for_user(&self, id: i64, user_id: i64) -> Result<MediaRecord, StoreError> {
        let sql = format!("SELECT {MEDIA_COLUMNS} FROM media WHERE id = ? AND user_id = ?");
        sqlx::query_as::<_, MediaRecord>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.db.0)
            .await?
            .ok_or(StoreError::NotFound)
    }

    pub async fn get_by_blob_name(&self, blob_name: &str) -> Result<MediaRecord, StoreError> {
        let sql = format!("SELECT {MEDIA_COLUMNS} FROM media WHERE filename = ?");
        sqlx::query_as::<_, MediaRecord>(&sql)
            .bind(blob_name)
            .fetch_optional(&self.db.0)
            .await?
            .ok_or(StoreError::NotFound)
    }

    /// Returns `NotFound` when a concurrent delete got there first.
    pub async fn delete_by_id(&self, id: i64) -> Result<(), StoreError> {
        let res = sqlx::query("DELETE FROM media WHERE id = ?")
            .bind(id)
            .execute(&self.db.0)
            .await?;
        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::CredentialStore;
    use crate::testing::temp_db;

    async fn two_users(db: &Db) -> (i64, i64) {
        let users = CredentialStore::new(db.clone());
        let a = users.register("alice", "h").await.unwrap();
        let b = users.register("bob", "h").await.unwrap();
        (a, b)
    }

    #[actix_web::test]
    async fn lookups_are_scoped_to_owner() {
        let (_dir, db) = temp_db().await;
        let (alice, bob) = two_users(&db).await;
        let repo = MediaRepository::new(db);

        let id = repo.insert(alice, "blob1.png", "image/png", "cat.png").await.unwrap();

        let rec = repo.get_by_id_for_user(id, alice).await.unwrap();
        assert_eq!(rec.user_id, alice);
        assert_eq!(rec.filename, "blob1.png");
        assert_eq!(rec.mime_type, "image/png");
        assert_eq!(rec.media_name, "cat.png");

        assert!(matches!(repo.get_by_id_for_user(id, bob).await, Err(StoreError::NotFound)));
        assert!(matches!(repo.get_by_id_for_user(id + 100, alice).await, Err(StoreError::NotFound)));
        assert!(repo.list_for_user(bob).await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn list_is_newest_first() {
        let (_dir, db) = temp_db().await;
        let (alice, _) = two_users(&db).await;
        let repo = MediaRepository::new(db);

        let first = repo.insert(alice, "b1", "text/plain", "one.txt").await.unwrap();
        let second = repo.insert(alice, "b2", "text/plain", "two.txt").await.unwrap();

        let ids: Vec<i64> = repo.list_for_user(alice).await.unwrap().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![second, first]);
    }

    #[actix_web::test]
    async fn delete_removes_and_reports_missing() {
        let (_dir, db) = temp_db().await;
        let (alice, _) = two_users(&db).await;
        let repo = MediaRepository::new(db);

        let id = repo.insert(alice, "b1", "text/plain", "one.txt").await.unwrap();
        repo.delete_by_id(id).await.unwrap();
        assert!(matches!(repo.delete_by_id(id).await, Err(StoreError::NotFound)));
        assert!(matches!(repo.get_by_blob_name("b1").await, Err(StoreError::NotFound)));
    }

    #[actix_web::test]
    async fn blob_names_are_unique_and_owner_must_exist() {
        let (_dir, db) = temp_db().await;
        let (alice, _) = two_users(&db).await;
        let repo = MediaRepository::new(db);

        repo.insert(alice, "same", "text/plain", "a").await.unwrap();
        assert!(repo.insert(alice, "same", "text/plain", "b").await.is_err());
        assert!(repo.insert(9999, "other", "text/plain", "c").await.is_err());
    }
}
