//! Bearer-credential identity gate.
//!
//! Handlers take an [`Authenticated`] argument; extraction parses the
//! `Authorization` header, verifies the credential through the
//! [`CredentialVerifier`](crate::domain::ports::CredentialVerifier) held in
//! [`HttpState`] and publishes the resulting [`Principal`]. Any failure is a
//! `401` before the handler body runs.

use actix_web::dev::Payload;
use actix_web::http::header::{AUTHORIZATION, HeaderMap};
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::{Ready, ready};
use tracing::debug;

use crate::domain::ports::CredentialError;
use crate::domain::{Error, Principal, Role};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Principal of an authenticated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authenticated(Principal);

impl Authenticated {
    /// The verified caller.
    pub fn principal(&self) -> &Principal {
        &self.0
    }

    /// Require `role`, yielding the principal on success.
    pub fn require_role(self, role: Role) -> ApiResult<Principal> {
        self.0.require_role(role)?;
        Ok(self.0)
    }

    /// Require one of `roles`, yielding the principal on success.
    pub fn require_any_role(self, roles: &[Role]) -> ApiResult<Principal> {
        self.0.require_any_role(roles)?;
        Ok(self.0)
    }

    /// Accept any role.
    pub fn into_principal(self) -> Principal {
        self.0
    }
}

/// Extract the credential from an `Authorization: Bearer <token>` header.
///
/// The value must split on ASCII whitespace into exactly two parts, the first
/// of which is `bearer` in any case.
pub(crate) fn bearer_credential(headers: &HeaderMap) -> ApiResult<&str> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("missing authorization header"))?
        .to_str()
        .map_err(|_| Error::unauthorized("authorization header is not valid ASCII"))?;

    let parts: Vec<&str> = value.split_ascii_whitespace().collect();
    match parts.as_slice() {
        [scheme, credential] if scheme.eq_ignore_ascii_case("bearer") => Ok(credential),
        _ => Err(Error::unauthorized(
            "authorization header must be of the form 'Bearer <token>'",
        )),
    }
}

fn map_credential_error(error: CredentialError) -> Error {
    match error {
        CredentialError::Expired => Error::unauthorized("token has expired"),
        CredentialError::NotYetValid => Error::unauthorized("token is not yet valid"),
        CredentialError::Invalid { message } => {
            debug!(reason = %message, "bearer credential rejected");
            Error::unauthorized("invalid token")
        }
    }
}

fn authenticate(req: &HttpRequest) -> ApiResult<Principal> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("HTTP state is not registered"))?;
    let credential = bearer_credential(req.headers())?;
    state
        .credentials
        .verify(credential)
        .map_err(map_credential_error)
}

impl FromRequest for Authenticated {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            authenticate(req)
                .map(Self)
                .map_err(actix_web::Error::from),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::inbound::http::test_utils::{TestPorts, bearer_for, issue};
    use actix_web::http::StatusCode;
    use actix_web::http::header::HeaderValue;
    use actix_web::test as actix_test;
    use actix_web::{App, HttpResponse};
    use chrono::{Duration, Utc};
    use rstest::rstest;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(value).expect("valid header"),
        );
        headers
    }

    #[rstest]
    #[case("Bearer abc.def.ghi", "abc.def.ghi")]
    #[case("bearer abc", "abc")]
    #[case("BEARER   abc", "abc")]
    #[case("Bearer\tabc", "abc")]
    fn accepts_well_formed_bearer_headers(#[case] raw: &str, #[case] expected: &str) {
        let headers = headers_with(raw);
        assert_eq!(bearer_credential(&headers), Ok(expected));
    }

    #[rstest]
    #[case("abc")]
    #[case("Bearer")]
    #[case("Basic abc")]
    #[case("Bearer abc extra")]
    #[case("Bearerabc")]
    fn rejects_malformed_headers(#[case] raw: &str) {
        let headers = headers_with(raw);
        let err = bearer_credential(&headers).expect_err("malformed");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    fn rejects_missing_header() {
        let err = bearer_credential(&HeaderMap::new()).expect_err("missing");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    async fn whoami(caller: Authenticated) -> HttpResponse {
        HttpResponse::Ok().body(caller.principal().email().to_owned())
    }

    async fn call_with(header: Option<String>) -> (StatusCode, String) {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(TestPorts::default().into_state()))
                .route("/whoami", web::get().to(whoami)),
        )
        .await;
        let mut request = actix_test::TestRequest::get().uri("/whoami");
        if let Some(value) = header {
            request = request.insert_header((AUTHORIZATION, value));
        }
        let response = actix_test::call_service(&app, request.to_request()).await;
        let status = response.status();
        let body = actix_test::read_body(response).await;
        (status, String::from_utf8_lossy(&body).into_owned())
    }

    #[actix_web::test]
    async fn verified_principal_reaches_the_handler() {
        let principal = Principal::new(5, "s5@uni.edu", Role::Student);
        let (status, body) = call_with(Some(bearer_for(&principal))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "s5@uni.edu");
    }

    #[actix_web::test]
    async fn missing_credentials_are_unauthorised() {
        let (status, body) = call_with(None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("\"error\":\"unauthorized\""));
    }

    #[actix_web::test]
    async fn expired_credentials_are_unauthorised() {
        let principal = Principal::new(5, "s5@uni.edu", Role::Student);
        let token = issue(&principal, Utc::now() - Duration::hours(2));
        let (status, body) = call_with(Some(format!("Bearer {token}"))).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("token has expired"));
    }

    #[actix_web::test]
    async fn future_dated_credentials_are_unauthorised() {
        let principal = Principal::new(5, "s5@uni.edu", Role::Student);
        let token = issue(&principal, Utc::now() + Duration::minutes(10));
        let (status, body) = call_with(Some(format!("Bearer {token}"))).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("token is not yet valid"));
    }

    #[actix_web::test]
    async fn tampered_credentials_are_unauthorised() {
        let principal = Principal::new(5, "s5@uni.edu", Role::Student);
        let header = format!("{}x", bearer_for(&principal));
        let (status, _) = call_with(Some(header)).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
