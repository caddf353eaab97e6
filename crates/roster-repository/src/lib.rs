//! # Roster Repository
//!
//! Data access for users:
//!
//! ```text
//! Service
//!   ↓  Arc<dyn UserRepository>
//! MySqlUserRepository            (SQLx, `users` table)
//!   ↓  Arc<dyn DatabasePoolInterface>
//! MySQL
//! ```
//!
//! [`InMemoryUserRepository`] implements the same trait without a database
//! and is what the service and REST tests run against.

pub mod memory;
pub mod mysql;
pub mod pool;
pub mod traits;

pub use memory::InMemoryUserRepository;
pub use mysql::*;
pub use pool::*;
pub use traits::*;
