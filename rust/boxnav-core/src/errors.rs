use std::io;

use thiserror::Error;

use crate::geometry::Pt;
use crate::navigator::Action;

#[derive(Error, Debug)]
pub enum NavError {
    /// Normalizing a zero-length vector, e.g. the agent sits exactly on its sub-goal.
    #[error("cannot normalize a zero-length vector")]
    GeometryDegenerate,
    /// A translation would leave every box; nothing was committed.
    #[error("{action} from ({}, {}) to ({}, {}) leaves every box", from.x, from.y, to.x, to.y)]
    OutOfBounds { action: Action, from: Pt, to: Pt },
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error(transparent)]
    Bridge(#[from] BridgeError),
}

impl NavError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        NavError::InvalidConfiguration(msg.into())
    }
}

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("engine did not answer {op} within {after_ms} ms")]
    Timeout { op: &'static str, after_ms: u64 },
    #[error("engine disconnected: {0}")]
    Disconnected(String),
    #[error("engine protocol error: {0}")]
    Protocol(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl BridgeError {
    /// Timeouts and transient I/O may be retried; a dropped connection or a
    /// malformed exchange may not.
    pub fn is_retryable(&self) -> bool {
        match self {
            BridgeError::Timeout { .. } => true,
            BridgeError::Io(e) => matches!(
                e.kind(),
                io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
            ),
            BridgeError::Disconnected(_) | BridgeError::Protocol(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classification() {
        assert!(BridgeError::Timeout { op: "get_position", after_ms: 10 }.is_retryable());
        assert!(BridgeError::Io(io::Error::from(io::ErrorKind::TimedOut)).is_retryable());
        assert!(!BridgeError::Io(io::Error::from(io::ErrorKind::ConnectionReset)).is_retryable());
        assert!(!BridgeError::Disconnected("eof".into()).is_retryable());
        assert!(!BridgeError::Protocol("bad json".into()).is_retryable());
    }

    #[test]
    fn out_of_bounds_message_names_action() {
        let e = NavError::OutOfBounds { action: Action::Forward, from: Pt::new(1.0, 2.0), to: Pt::new(1.0, 3.0) };
        let msg = e.to_string();
        assert!(msg.starts_with("forward"), "{msg}");
        assert!(msg.contains("leaves every box"));
    }
}
