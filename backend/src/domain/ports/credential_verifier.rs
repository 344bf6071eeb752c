//! Port for turning a presented bearer credential into a principal.

use crate::domain::Principal;

use super::define_port_error;

define_port_error! {
    /// Reasons a credential is rejected.
    pub enum CredentialError {
        /// Signature, algorithm or claims are invalid.
        Invalid { message: String } => "invalid credential: {message}",
        /// The credential's expiry has passed.
        Expired => "credential has expired",
        /// The credential's `nbf` or `iat` lies in the future.
        NotYetValid => "credential is not yet valid",
    }
}

/// Verifies bearer credentials.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialVerifier: Send + Sync {
    /// Verify `credential` and return the principal it names.
    fn verify(&self, credential: &str) -> Result<Principal, CredentialError>;
}
