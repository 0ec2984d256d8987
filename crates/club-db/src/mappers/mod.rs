//! Entity to model mappers
//!
//! Conversions from database rows to domain entities. Enum columns that
//! fail to parse surface as `DomainError::DatabaseError`.

mod event;
mod member;
mod records;

pub use member::member_from_model;
