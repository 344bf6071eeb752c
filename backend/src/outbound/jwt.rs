//! HS256 bearer credentials.
//!
//! [`JwtCodec`] verifies presented credentials for the identity gate and
//! issues them for the login collaborator and tests. Claims are
//! `{id, email, role, iat, nbf, exp}`; validation accepts HS256 only, requires
//! `exp`, honours `nbf` when present, rejects an `iat` in the future and
//! applies no leeway.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::domain::ports::{CredentialError, CredentialVerifier};
use crate::domain::{Principal, Role};

/// HMAC key material, wiped from memory on drop.
#[derive(Clone)]
pub struct JwtSecret(Zeroizing<Vec<u8>>);

impl JwtSecret {
    /// Wrap configured key bytes.
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self(Zeroizing::new(secret.into()))
    }

    /// Generate a per-process key from the operating system RNG.
    pub fn random() -> Self {
        let mut bytes = Zeroizing::new(vec![0_u8; 32]);
        OsRng.fill_bytes(bytes.as_mut_slice());
        Self(bytes)
    }

    fn expose(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl fmt::Debug for JwtSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("JwtSecret(<redacted>)")
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    id: i64,
    email: String,
    role: Role,
    iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    nbf: Option<i64>,
    exp: i64,
}

/// Failure to sign a credential.
#[derive(Debug, thiserror::Error)]
#[error("failed to sign credential: {0}")]
pub struct SigningError(#[from] jsonwebtoken::errors::Error);

/// Signs and verifies HS256 credentials.
#[derive(Debug, Clone)]
pub struct JwtCodec {
    secret: JwtSecret,
}

impl JwtCodec {
    /// Build a codec over `secret`.
    pub fn new(secret: JwtSecret) -> Self {
        Self { secret }
    }

    /// Credential lifetime for a role: seven days for admins, one hour
    /// otherwise.
    pub fn lifetime(role: Role) -> Duration {
        match role {
            Role::Admin => Duration::days(7),
            Role::Student | Role::Lecturer => Duration::minutes(60),
        }
    }

    /// Issue a credential for `principal` as of `now`.
    ///
    /// # Examples
    /// ```
    /// use attendance::domain::{Principal, Role};
    /// use attendance::domain::ports::CredentialVerifier;
    /// use attendance::outbound::jwt::{JwtCodec, JwtSecret};
    /// use chrono::Utc;
    ///
    /// let codec = JwtCodec::new(JwtSecret::new("test-secret"));
    /// let principal = Principal::new(7, "s@uni.edu", Role::Student);
    /// let token = codec.issue(&principal, Utc::now()).expect("signed");
    /// assert_eq!(codec.verify(&token).expect("valid"), principal);
    /// ```
    pub fn issue(&self, principal: &Principal, now: DateTime<Utc>) -> Result<String, SigningError> {
        let claims = Claims {
            id: principal.id(),
            email: principal.email().to_owned(),
            role: principal.role(),
            iat: now.timestamp(),
            nbf: Some(now.timestamp()),
            exp: (now + Self::lifetime(principal.role())).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.expose()),
        )?;
        Ok(token)
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256];
        validation.leeway = 0;
        validation.validate_nbf = true;
        validation.set_required_spec_claims(&["exp"]);
        validation
    }
}

impl CredentialVerifier for JwtCodec {
    fn verify(&self, credential: &str) -> Result<Principal, CredentialError> {
        let data = decode::<Claims>(
            credential,
            &DecodingKey::from_secret(self.secret.expose()),
            &Self::validation(),
        )
        .map_err(|err| match err.kind() {
            ErrorKind::ExpiredSignature => CredentialError::expired(),
            ErrorKind::ImmatureSignature => CredentialError::not_yet_valid(),
            _ => CredentialError::invalid(err.to_string()),
        })?;
        let Claims {
            id,
            email,
            role,
            iat,
            ..
        } = data.claims;
        if iat > Utc::now().timestamp() {
            return Err(CredentialError::not_yet_valid());
        }
        Ok(Principal::new(id, email, role))
    }
}
