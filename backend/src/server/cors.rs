//! Cross-origin access policy.

use std::time::Duration;

use actix_cors::Cors;
use actix_web::http::Method;
use actix_web::http::header::HeaderName;

const DEFAULT_METHODS: &[&str] = &["GET", "POST", "PUT", "DELETE", "PATCH", "OPTIONS"];
const DEFAULT_HEADERS: &[&str] = &[
    "Origin",
    "Content-Type",
    "Authorization",
    "Accept",
    "X-Requested-With",
];
const DEFAULT_EXPOSED: &[&str] = &["Content-Length"];
const DEFAULT_MAX_AGE: Duration = Duration::from_secs(12 * 3600);

/// Origins a browser may call from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedOrigins {
    Any,
    List(Vec<String>),
}

/// Rejected CORS setting.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CorsError {
    #[error("invalid HTTP method in CORS_ALLOW_METHODS: {0}")]
    Method(String),
    #[error("invalid header name in {setting}: {value}")]
    Header { setting: &'static str, value: String },
}

/// Validated CORS policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsPolicy {
    pub origins: AllowedOrigins,
    pub methods: Vec<Method>,
    pub headers: Vec<HeaderName>,
    pub exposed: Vec<HeaderName>,
    pub credentials: bool,
    pub max_age: Duration,
}

/// Raw CORS values as read from the environment.
#[derive(Debug, Clone, Default)]
pub struct CorsInput<'a> {
    pub origins: Option<&'a str>,
    pub methods: Option<&'a str>,
    pub headers: Option<&'a str>,
    pub exposed: Option<&'a str>,
    pub credentials: Option<&'a str>,
    pub max_age: Option<Duration>,
}

/// Split a comma-separated list, trimming entries and dropping empty ones.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_owned)
        .collect()
}

fn list_or_default(raw: Option<&str>, default: &[&str]) -> Vec<String> {
    raw.map(split_list)
        .filter(|entries| !entries.is_empty())
        .unwrap_or_else(|| default.iter().map(|entry| (*entry).to_owned()).collect())
}

fn header_names(entries: Vec<String>, setting: &'static str) -> Result<Vec<HeaderName>, CorsError> {
    entries
        .into_iter()
        .map(|entry| {
            HeaderName::from_bytes(entry.as_bytes())
                .map_err(|_| CorsError::Header { setting, value: entry })
        })
        .collect()
}

/// `1`, `true`, `t`, `yes` and `y` (any case) enable a flag.
pub fn truthy(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "t" | "yes" | "y"
    )
}

impl CorsPolicy {
    /// Build the policy, applying defaults for absent settings.
    ///
    /// No origins, or a `*` entry, allows any origin and disables
    /// credentials.
    pub fn from_input(input: CorsInput<'_>) -> Result<Self, CorsError> {
        let origins = input.origins.map(split_list).unwrap_or_default();
        let origins = if origins.is_empty() || origins.iter().any(|origin| origin == "*") {
            AllowedOrigins::Any
        } else {
            AllowedOrigins::List(origins)
        };

        let methods = list_or_default(input.methods, DEFAULT_METHODS)
            .into_iter()
            .map(|entry| {
                Method::from_bytes(entry.to_ascii_uppercase().as_bytes())
                    .map_err(|_| CorsError::Method(entry))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let headers = header_names(
            list_or_default(input.headers, DEFAULT_HEADERS),
            "CORS_ALLOW_HEADERS",
        )?;
        let exposed = header_names(
            list_or_default(input.exposed, DEFAULT_EXPOSED),
            "CORS_EXPOSE_HEADERS",
        )?;
        let credentials = origins != AllowedOrigins::Any && input.credentials.is_some_and(truthy);

        Ok(Self {
            origins,
            methods,
            headers,
            exposed,
            credentials,
            max_age: input.max_age.unwrap_or(DEFAULT_MAX_AGE),
        })
    }

    /// Actix middleware enforcing this policy.
    pub fn middleware(&self) -> Cors {
        let mut cors = Cors::default()
            .allowed_methods(self.methods.clone())
            .allowed_headers(self.headers.clone())
            .expose_headers(self.exposed.clone())
            .max_age(usize::try_from(self.max_age.as_secs()).ok());
        cors = match &self.origins {
            AllowedOrigins::Any => cors.allow_any_origin(),
            AllowedOrigins::List(origins) => origins
                .iter()
                .fold(cors, |cors, origin| cors.allowed_origin(origin)),
        };
        if self.credentials {
            cors = cors.supports_credentials();
        }
        cors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::http::header::{
        ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_ORIGIN, ORIGIN,
    };
    use actix_web::{App, HttpResponse, test as actix_test, web};
    use rstest::rstest;

    #[rstest]
    fn defaults_allow_any_origin_without_credentials() {
        let policy = CorsPolicy::from_input(CorsInput {
            credentials: Some("true"),
            ..CorsInput::default()
        })
        .expect("valid policy");

        assert_eq!(policy.origins, AllowedOrigins::Any);
        assert!(!policy.credentials);
        assert_eq!(policy.methods.len(), 6);
        assert_eq!(policy.headers.len(), 5);
        assert_eq!(policy.exposed, vec![HeaderName::from_static("content-length")]);
        assert_eq!(policy.max_age, Duration::from_secs(43_200));
    }

    #[rstest]
    fn wildcard_forces_any_origin() {
        let policy = CorsPolicy::from_input(CorsInput {
            origins: Some("https://a.edu, *"),
            credentials: Some("yes"),
            ..CorsInput::default()
        })
        .expect("valid policy");

        assert_eq!(policy.origins, AllowedOrigins::Any);
        assert!(!policy.credentials);
    }

    #[rstest]
    fn explicit_origins_keep_credentials() {
        let policy = CorsPolicy::from_input(CorsInput {
            origins: Some(" https://portal.uni.edu ,, https://staff.uni.edu "),
            credentials: Some("Y"),
            ..CorsInput::default()
        })
        .expect("valid policy");

        assert_eq!(
            policy.origins,
            AllowedOrigins::List(vec![
                "https://portal.uni.edu".to_owned(),
                "https://staff.uni.edu".to_owned(),
            ])
        );
        assert!(policy.credentials);
    }

    #[rstest]
    #[case("1", true)]
    #[case("TRUE", true)]
    #[case("t", true)]
    #[case("yes", true)]
    #[case("0", false)]
    #[case("no", false)]
    #[case("", false)]
    fn truthy_values(#[case] raw: &str, #[case] expected: bool) {
        assert_eq!(truthy(raw), expected);
    }

    #[rstest]
    fn invalid_header_names_are_rejected() {
        let err = CorsPolicy::from_input(CorsInput {
            headers: Some("Content Type"),
            ..CorsInput::default()
        })
        .expect_err("space in header name");
        assert!(matches!(err, CorsError::Header { setting: "CORS_ALLOW_HEADERS", .. }));
    }

    #[actix_web::test]
    async fn listed_origins_are_echoed() {
        let policy = CorsPolicy::from_input(CorsInput {
            origins: Some("https://portal.uni.edu"),
            credentials: Some("true"),
            ..CorsInput::default()
        })
        .expect("valid policy");
        let app = actix_test::init_service(
            App::new()
                .wrap(policy.middleware())
                .route("/", web::get().to(HttpResponse::Ok)),
        )
        .await;

        let request = actix_test::TestRequest::get()
            .uri("/")
            .insert_header((ORIGIN, "https://portal.uni.edu"))
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN),
            Some(&actix_web::http::header::HeaderValue::from_static(
                "https://portal.uni.edu"
            ))
        );
        assert!(response.headers().contains_key(ACCESS_CONTROL_ALLOW_CREDENTIALS));
    }
}
