//! Error types shared across the client core.

pub mod domain;

pub use domain::{DomainError, ValidationKind};
