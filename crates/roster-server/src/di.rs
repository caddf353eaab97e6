//! Dependency injection module using Shaku.
//!
//! Components that need runtime values (the connected pool, the configured
//! hasher) are supplied as overrides; everything else is built by Shaku.

use roster_config::SecurityConfig;
use roster_repository::{DatabasePool, DatabasePoolInterface, MySqlUserRepository};
use roster_security::{PasswordHasher, PasswordHasherInterface};
use roster_service::UserServiceImpl;
use shaku::module;
use std::sync::Arc;

module! {
    pub RosterModule {
        components = [
            DatabasePool,
            PasswordHasher,
            MySqlUserRepository,
            UserServiceImpl,
        ],
        providers = [],
    }
}

/// Builds the application module around a connected pool.
pub fn build_module(db_pool: DatabasePool, security_config: &SecurityConfig) -> Arc<RosterModule> {
    let module = RosterModule::builder()
        .with_component_override::<dyn DatabasePoolInterface>(Box::new(db_pool))
        .with_component_override::<dyn PasswordHasherInterface>(Box::new(
            PasswordHasher::from_config(security_config),
        ))
        .build();

    Arc::new(module)
}
