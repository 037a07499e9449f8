//! Shared fixtures for the HTTP-level tests.

#![allow(dead_code)]

use std::sync::Arc;

use actix_web::http::header::{AUTHORIZATION, CONTENT_TYPE};
use actix_web::test::TestRequest;
use medialocker::Services;
use medialocker::blob::{BlobStore, LocalBlobStore, MemoryBlobStore};
use medialocker::config::Config;
use medialocker::db::Db;
use tempfile::TempDir;

pub const BASE_URL: &str = "http://localhost/files";
pub const SECRET: &str = "integration-test-secret";

pub struct TestEnv {
    pub dir: TempDir,
    pub services: Services,
}

pub fn test_config(dir: &TempDir) -> Config {
    Config {
        database_path: dir.path().join("test.sqlite3").to_string_lossy().into_owned(),
        media_dir: dir.path().join("media").to_string_lossy().into_owned(),
        fs_base_url: BASE_URL.to_string(),
        jwt_secret: Some(SECRET.to_string()),
        hash_memory_kib: 256,
        hash_iterations: 1,
        hash_parallelism: 1,
        ..Config::default()
    }
}

async fn build(cfg: Config, dir: TempDir, blobs: Arc<dyn BlobStore>) -> TestEnv {
    let db = Db::connect_and_migrate(&cfg.database_path).await.unwrap();
    let services = Services::new(cfg, db, blobs).unwrap();
    TestEnv { dir, services }
}

/// App backed by blobs on disk under the temp dir.
pub async fn on_disk() -> TestEnv {
    on_disk_with(|_| {}).await
}

pub async fn on_disk_with(tweak: impl FnOnce(&mut Config)) -> TestEnv {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = test_config(&dir);
    tweak(&mut cfg);
    let blobs = LocalBlobStore::new(&cfg.media_dir).await.unwrap();
    build(cfg, dir, Arc::new(blobs)).await
}

/// App backed by a `MemoryBlobStore` the test can poke at.
pub async fn in_memory() -> (TestEnv, Arc<MemoryBlobStore>) {
    let dir = tempfile::tempdir().unwrap();
    let cfg = test_config(&dir);
    let blobs = Arc::new(MemoryBlobStore::new());
    let env = build(cfg, dir, blobs.clone()).await;
    (env, blobs)
}

pub fn credentials(username: &str, password: &str) -> serde_json::Value {
    serde_json::json!({ "username": username, "password": password })
}

pub fn bearer(token: &str) -> (actix_web::http::header::HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {token}"))
}

const BOUNDARY: &str = "medialocker-test-boundary";

/// A single-part `multipart/form-data` body.
pub fn multipart(field: &str, filename: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    multipart_raw(&format!("form-data; name=\"{field}\"; filename=\"{filename}\""), content_type, data)
}

/// Same, with the part's `Content-Disposition` value given verbatim.
pub fn multipart_raw(disposition: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: {disposition}\r\nContent-Type: {content_type}\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn upload_request(token: Option<&str>, body: Vec<u8>) -> TestRequest {
    let mut req = TestRequest::post()
        .uri("/media")
        .insert_header((CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}")))
        .set_payload(body);
    if let Some(token) = token {
        req = req.insert_header(bearer(token));
    }
    req
}
