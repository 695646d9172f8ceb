//! Connection lifecycle state.
//!
//! A [`SearchGateway`](crate::SearchGateway) moves through these states:
//!
//! ```text
//! Disconnected ──connect ok──▶ Connected
//!      │
//!      └──retries exhausted──▶ Failed
//! ```
//!
//! `Failed` is sticky for lazy connects: later operations fail fast instead
//! of re-entering the retry loop. An explicit `connect()` leaves it.

use std::fmt;

// ============================================================================
// ConnectionState
// ============================================================================

/// State of the gateway's connection to the engine.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// No connection has been attempted.
    #[default]
    Disconnected,
    /// The engine answered a liveness probe.
    Connected,
    /// The retry budget was exhausted.
    Failed {
        /// Attempts made before giving up.
        attempts: u32,
        /// Last failure observed.
        reason: String,
    },
}

impl ConnectionState {
    /// Returns `true` if the engine is known to be reachable.
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }

    /// Returns `true` if connecting was attempted and gave up.
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "disconnected"),
            Self::Connected => write!(f, "connected"),
            Self::Failed { attempts, reason } => {
                write!(f, "failed after {attempts} attempt(s): {reason}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_disconnected() {
        let state = ConnectionState::default();
        assert_eq!(state, ConnectionState::Disconnected);
        assert!(!state.is_connected());
        assert!(!state.is_failed());
    }

    #[test]
    fn test_predicates() {
        assert!(ConnectionState::Connected.is_connected());
        let failed = ConnectionState::Failed {
            attempts: 5,
            reason: "refused".to_string(),
        };
        assert!(failed.is_failed());
        assert!(!failed.is_connected());
    }

    #[test]
    fn test_display() {
        assert_eq!(ConnectionState::Disconnected.to_string(), "disconnected");
        assert_eq!(ConnectionState::Connected.to_string(), "connected");
        assert_eq!(
            ConnectionState::Failed {
                attempts: 3,
                reason: "timeout".to_string()
            }
            .to_string(),
            "failed after 3 attempt(s): timeout"
        );
    }
}
