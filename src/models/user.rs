use serde::Serialize;

/// Credentials row as the login path needs it. The hash never leaves the server.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserCredentials {
    pub id: i64,
    pub password_hash: String,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RegisteredUser {
    pub user_id: i64,
    pub username: String,
}
