use crate::db::Db;
use tempfile::TempDir;

/// Fresh migrated database in its own directory; keep the `TempDir` alive for the test.
pub async fn temp_db() -> (TempDir, Db) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.sqlite3");
    let db = Db::connect_and_migrate(path.to_str().unwrap()).await.unwrap();
    (dir, db)
}
