//! Domain-level error type used by the reconciliation layer and the local
//! intent validators.
//!
//! This error type is transport-agnostic. Nothing in the session core turns a
//! `DomainError` into a user-facing failure: callers log it and degrade to a
//! no-op, or to a snapshot re-request.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Why a player intent was rejected before anything was emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    PhaseMismatch,
    ActionBlocked,
    InsufficientMoney,
    JokerCapacity,
    NothingToReroll,
    NoHandsLeft,
    NoDiscardsLeft,
    InvalidSelection,
    UnknownItem,
    PackLimit,
    NotHost,
    Other(String),
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Local pre-validation rejected an intent
    Validation(ValidationKind, String),
    /// Payload failed the shape check for its event
    Payload { event: String, detail: String },
    /// A value the local catalogs do not know about
    OutOfRange(String),
    /// A card token could not be parsed
    ParseCard(String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Validation(kind, d) => write!(f, "rejected {kind:?}: {d}"),
            DomainError::Payload { event, detail } => {
                write!(f, "malformed payload for {event}: {detail}")
            }
            DomainError::OutOfRange(d) => write!(f, "out of range: {d}"),
            DomainError::ParseCard(s) => write!(f, "parse card: {s}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }

    pub fn payload(event: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Payload {
            event: event.into(),
            detail: detail.into(),
        }
    }

    pub fn out_of_range(detail: impl Into<String>) -> Self {
        Self::OutOfRange(detail.into())
    }

    /// Validation kind, if this is a local rejection.
    pub fn validation_kind(&self) -> Option<&ValidationKind> {
        match self {
            DomainError::Validation(kind, _) => Some(kind),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_event_for_payload_errors() {
        let err = DomainError::payload("played_hand", "missing field `hand_type`");
        assert_eq!(
            err.to_string(),
            "malformed payload for played_hand: missing field `hand_type`"
        );
    }

    #[test]
    fn validation_kind_only_for_rejections() {
        let rejected = DomainError::validation(ValidationKind::JokerCapacity, "5 jokers owned");
        assert_eq!(rejected.validation_kind(), Some(&ValidationKind::JokerCapacity));
        assert_eq!(DomainError::out_of_range("hand type 42").validation_kind(), None);
    }
}
