//! Port for bearer-token verification.

use async_trait::async_trait;

use crate::domain::ids::UserId;

use super::define_port_error;

define_port_error! {
    /// Errors raised by token verifier adapters.
    pub enum TokenVerifierError {
        /// Verifier backend could not be reached.
        Connection { message: String } =>
            "token verifier connection failed: {message}",
        /// Lookup failed during execution.
        Query { message: String } =>
            "token verifier query failed: {message}",
    }
}

/// Port resolving a bearer token to the user it authenticates.
///
/// A `None` result means the token is unknown or revoked; the HTTP adapter
/// turns that into a 401.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Resolve a bearer token to a user id.
    async fn verify(&self, token: &str) -> Result<Option<UserId>, TokenVerifierError>;
}

/// Fixture verifier rejecting every token; used where auth is not under test.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTokenVerifier;

#[async_trait]
impl TokenVerifier for FixtureTokenVerifier {
    async fn verify(&self, _token: &str) -> Result<Option<UserId>, TokenVerifierError> {
        Ok(None)
    }
}
