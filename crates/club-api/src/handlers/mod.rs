//! Route handlers
//!
//! All HTTP request handlers organized by domain.

pub mod achievements;
pub mod admin;
pub mod auth;
pub mod cards;
pub mod events;
pub mod health;
pub mod members;
pub mod verification;
