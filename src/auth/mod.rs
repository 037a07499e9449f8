//! Password hashing, bearer tokens, and the request gate that turns a token
//! into an [`AuthUser`].

pub mod gate;
pub mod password;
pub mod token;

pub use gate::{AuthUser, require_bearer};
pub use password::Hasher;
pub use token::{SessionClaim, TokenError, TokenIssuer};
