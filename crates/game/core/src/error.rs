//! Common error infrastructure for tactical-core.
//!
//! This module provides the shared classification used by every error type in
//! the crate. Domain-specific errors (e.g., [`FovError`](crate::fov::FovError),
//! [`ActivationError`](crate::activation::ActivationError)) live next to the
//! component that raises them.
//!
//! # Design Principles
//!
//! - **Recoverable input errors** (bad origin, out-of-bounds edit) are returned
//!   as values so callers can reposition and retry.
//! - **Internal-consistency violations** (a missed cache invalidation, an
//!   activation record missing required data) are `Internal`/`Fatal` and must
//!   surface immediately instead of producing a wrong tactical decision.

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the caller can fix the input and retry
/// - **Validation**: invalid input that should be rejected without retry
/// - **Internal**: unexpected inconsistency, indicates a bug upstream
/// - **Fatal**: an invariant is broken, the simulation cannot continue
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - can retry with corrected input.
    ///
    /// Examples: FOV origin off the map, map edit outside bounds
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: spawning an activation for the player, malformed map rows
    Validation,

    /// Internal error - unexpected state inconsistency.
    ///
    /// Examples: monster without an activation record, stale FOV cache
    Internal,

    /// Fatal error - activation invariant violated, cannot continue.
    ///
    /// Examples: Alert monster without a last known player position
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all tactical-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
/// - Wrapping errors delegate to the wrapped error
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_covers_fatal() {
        assert!(ErrorSeverity::Fatal.is_internal());
        assert!(ErrorSeverity::Internal.is_internal());
        assert!(!ErrorSeverity::Validation.is_internal());
        assert!(ErrorSeverity::Recoverable.is_recoverable());
        assert_eq!(ErrorSeverity::Fatal.as_str(), "fatal");
    }
}
