use crate::{
    auth::{Hasher, TokenIssuer},
    errors::ApiError,
    models::RegisteredUser,
    store::{CredentialStore, StoreError},
};
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct CredentialsReq {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResp {
    token: String,
}

pub async fn register(
    users: web::Data<CredentialStore>,
    hasher: web::Data<Hasher>,
    body: web::Json<CredentialsReq>,
) -> Result<HttpResponse, ApiError> {
    let CredentialsReq { username, password } = body.into_inner();
    if username.is_empty() || password.is_empty() {
        return Err(ApiError::BadRequest("username and password are required".into()));
    }

    let hasher = hasher.into_inner();
    let hash = web::block(move || hasher.hash(&password))
        .await
        .map_err(|_| ApiError::Internal)??;

    let user_id = users.register(&username, &hash).await?;
    log::info!("registered user {user_id} ({username})");
    Ok(HttpResponse::Created().json(RegisteredUser { user_id, username }))
}

pub async fn login(
    users: web::Data<CredentialStore>,
    hasher: web::Data<Hasher>,
    tokens: web::Data<TokenIssuer>,
    body: web::Json<CredentialsReq>,
) -> Result<HttpResponse, ApiError> {
    let CredentialsReq { username, password } = body.into_inner();
    let creds = match users.find_by_username(&username).await {
        Ok(creds) => creds,
        Err(StoreError::NotFound) => return Err(ApiError::Unauthorized),
        Err(e) => return Err(e.into()),
    };

    let hasher = hasher.into_inner();
    let digest = creds.password_hash;
    let ok = web::block(move || hasher.verify(&password, &digest))
        .await
        .map_err(|_| ApiError::Internal)?;
    if !ok {
        return Err(ApiError::Unauthorized);
    }

    let token = tokens.issue(creds.id, chrono::Utc::now()).map_err(|e| {
        log::error!("token issue failed: {e}");
        ApiError::Internal
    })?;
    Ok(HttpResponse::Ok().json(LoginResp { token }))
}
