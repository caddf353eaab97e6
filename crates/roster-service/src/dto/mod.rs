//! Data transfer objects.

mod field;
mod user_dto;

pub use field::Field;
pub use user_dto::*;
