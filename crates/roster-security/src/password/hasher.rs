//! Password hashing using Argon2.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Argon2, Params,
};
use roster_config::SecurityConfig;
use roster_core::{Interface, RosterError, RosterResult};
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, warn};

/// Interface for password hashing operations.
///
/// This trait abstracts password hashing functionality for dependency injection.
pub trait PasswordHasherInterface: Interface + Send + Sync {
    /// Hashes a password into a PHC string with a fresh random salt.
    fn hash(&self, password: &str) -> RosterResult<String>;

    /// Verifies a password against a PHC string.
    fn verify(&self, password: &str, hash: &str) -> RosterResult<bool>;
}

/// Password hasher service using Argon2id.
#[derive(Component, Clone)]
#[shaku(interface = PasswordHasherInterface)]
pub struct PasswordHasher {
    argon2: Arc<Argon2<'static>>,
}

impl PasswordHasher {
    /// Iteration count used with a configured memory cost.
    const TIME_COST: u32 = 2;

    /// Creates a new password hasher with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::with_params(Params::DEFAULT)
    }

    /// Creates a new password hasher with custom parameters.
    #[must_use]
    pub fn with_params(params: Params) -> Self {
        let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);
        Self {
            argon2: Arc::new(argon2),
        }
    }

    /// Creates a password hasher from a memory cost in MiB.
    ///
    /// Falls back to the argon2 defaults when the cost is out of range.
    #[must_use]
    pub fn with_cost(cost_mib: u32) -> Self {
        let params = Params::new(cost_mib.saturating_mul(1024), Self::TIME_COST, 1, None)
            .unwrap_or_else(|e| {
                warn!("Invalid argon2 cost {} MiB ({}), using defaults", cost_mib, e);
                Params::DEFAULT
            });

        Self::with_params(params)
    }

    /// Creates a password hasher from the security configuration.
    #[must_use]
    pub fn from_config(config: &SecurityConfig) -> Self {
        Self::with_cost(config.password_hash_cost)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasherInterface for PasswordHasher {
    fn hash(&self, password: &str) -> RosterResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| RosterError::Internal(format!("Failed to hash password: {e}")))?;

        debug!("Password hashed successfully");
        Ok(hash.to_string())
    }

    fn verify(&self, password: &str, hash: &str) -> RosterResult<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| RosterError::Internal(format!("Invalid password hash format: {e}")))?;

        match self.argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => {
                debug!("Password verification failed: incorrect password");
                Ok(false)
            }
            Err(e) => Err(RosterError::Internal(format!(
                "Password verification error: {e}"
            ))),
        }
    }
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher").finish_non_exhaustive()
    }
}
