//! Connection state machine

use crate::{Error, Result};

/// Connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Descriptor built, nothing opened yet
    Initial,

    /// Driver is opening the session
    Connecting,

    /// Session open and usable
    Open,

    /// Session released
    Closed,
}

impl ConnectionState {
    /// Check if transition is valid
    ///
    /// `Closed` is terminal: a released session is never released again.
    pub fn can_transition_to(&self, next: ConnectionState) -> bool {
        use ConnectionState::*;

        matches!(
            (self, next),
            (Initial, Connecting)
                | (Connecting, Open)
                | (Initial, Closed)
                | (Connecting, Closed)
                | (Open, Closed)
        )
    }

    /// Transition to new state
    pub fn transition(&mut self, next: ConnectionState) -> Result<()> {
        if !self.can_transition_to(next) {
            return Err(Error::InvalidState {
                expected: format!("valid transition from {}", self),
                actual: next.to_string(),
            });
        }
        *self = next;
        Ok(())
    }

    /// Whether the session can serve requests
    pub fn is_open(&self) -> bool {
        *self == ConnectionState::Open
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initial => write!(f, "initial"),
            Self::Connecting => write!(f, "connecting"),
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
        }
    }
}
