use crate::auth::token::TokenIssuer;
use crate::errors::ApiError;
use actix_web::body::MessageBody;
use actix_web::dev::{Payload, ServiceRequest, ServiceResponse};
use actix_web::http::header::{AUTHORIZATION, HeaderMap};
use actix_web::middleware::Next;
use actix_web::{FromRequest, HttpMessage, HttpRequest, ResponseError, web};
use futures_util::future::{Ready, ready};

/// Identity of the caller, attached to the request by [`require_bearer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i64,
}

/// Pulls the token out of `Authorization: Bearer <token>`. Anything other than
/// exactly two space-separated parts with a literal `Bearer` scheme is rejected.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) if !token.is_empty() => Some(token),
        _ => None,
    }
}

fn authenticate(req: &ServiceRequest) -> Result<AuthUser, ApiError> {
    let tokens = req
        .app_data::<web::Data<TokenIssuer>>()
        .ok_or(ApiError::Internal)?;
    let token = bearer_token(req.headers()).ok_or(ApiError::Unauthorized)?;
    let claim = tokens.verify(token, chrono::Utc::now()).map_err(|e| {
        log::debug!("rejected bearer token: {e}");
        ApiError::Unauthorized
    })?;
    Ok(AuthUser {
        user_id: claim.user_id,
    })
}

/// Gate for protected scopes: the downstream service only runs once the token
/// verifies, and it sees the caller only through the request's extensions.
pub async fn require_bearer(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, actix_web::Error> {
    match authenticate(&req) {
        Ok(user) => {
            req.extensions_mut().insert(user);
            next.call(req).await.map(ServiceResponse::map_into_left_body)
        }
        Err(e) => Ok(req.into_response(e.error_response()).map_into_right_body()),
    }
}

impl FromRequest for AuthUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(req.extensions().get::<AuthUser>().copied().ok_or(ApiError::Unauthorized))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::middleware::from_fn;
    use actix_web::test as awtest;
    use actix_web::{App, HttpResponse};
    use chrono::{Duration, Utc};

    fn headers(value: &str) -> HeaderMap {
        let req = awtest::TestRequest::default()
            .insert_header((AUTHORIZATION, value))
            .to_http_request();
        req.headers().clone()
    }

    #[test]
    fn header_shapes() {
        assert_eq!(bearer_token(&headers("Bearer abc")), Some("abc"));
        assert_eq!(bearer_token(&headers("bearer abc")), None);
        assert_eq!(bearer_token(&headers("Bearer")), None);
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&headers("Bearer abc def")), None);
        assert_eq!(bearer_token(&headers("Basic abc")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    async fn whoami(user: AuthUser) -> HttpResponse {
        HttpResponse::Ok().body(user.user_id.to_string())
    }

    #[actix_web::test]
    async fn gate_attaches_identity_or_stops_the_request() {
        let tokens = web::Data::new(TokenIssuer::new(b"gate-test", Duration::hours(24)));
        let good = tokens.issue(5, Utc::now()).unwrap();
        let stale = tokens.issue(5, Utc::now() - Duration::hours(25)).unwrap();
        let app = awtest::init_service(
            App::new().app_data(tokens.clone()).service(
                web::scope("/p")
                    .wrap(from_fn(require_bearer))
                    .route("", web::get().to(whoami)),
            ),
        )
        .await;

        let req = awtest::TestRequest::get()
            .uri("/p")
            .insert_header((AUTHORIZATION, format!("Bearer {good}")))
            .to_request();
        let body = awtest::call_and_read_body(&app, req).await;
        assert_eq!(body, "5");

        for value in [None, Some(format!("Bearer {stale}")), Some(format!("Token {good}"))] {
            let mut req = awtest::TestRequest::get().uri("/p");
            if let Some(v) = value {
                req = req.insert_header((AUTHORIZATION, v));
            }
            let resp = awtest::call_service(&app, req.to_request()).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[actix_web::test]
    async fn extractor_without_gate_is_unauthorized() {
        let app = awtest::init_service(App::new().route("/p", web::get().to(whoami))).await;
        let resp = awtest::call_service(&app, awtest::TestRequest::get().uri("/p").to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
