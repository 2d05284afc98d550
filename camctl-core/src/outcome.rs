//! Typed results of move and reset commands

use std::fmt;

use crate::error::DeviceError;

/// Result of [`SessionManager::execute_move`](crate::SessionManager::execute_move)
#[derive(Debug, Clone, PartialEq)]
pub enum MoveOutcome {
    /// The device accepted the move
    Applied,
    /// No control handle, or the device rejected the command
    Unsupported { cause: Option<DeviceError> },
}

impl MoveOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }

    pub fn cause(&self) -> Option<&DeviceError> {
        match self {
            Self::Applied => None,
            Self::Unsupported { cause } => cause.as_ref(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::Unsupported { .. } => "unsupported",
        }
    }
}

impl fmt::Display for MoveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cause() {
            Some(cause) => write!(f, "{} ({})", self.as_str(), cause),
            None => f.write_str(self.as_str()),
        }
    }
}

/// Result of [`SessionManager::execute_reset`](crate::SessionManager::execute_reset)
#[derive(Debug, Clone, PartialEq)]
pub enum ResetOutcome {
    /// The device was sent to its first preset
    Applied,
    /// No control handle, or the device rejected the command
    Unsupported { cause: Option<DeviceError> },
    /// The device reports no presets
    NoPresets,
}

impl ResetOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }

    pub fn cause(&self) -> Option<&DeviceError> {
        match self {
            Self::Unsupported { cause } => cause.as_ref(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::Unsupported { .. } => "unsupported",
            Self::NoPresets => "no-presets",
        }
    }
}

impl fmt::Display for ResetOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cause() {
            Some(cause) => write!(f, "{} ({})", self.as_str(), cause),
            None => f.write_str(self.as_str()),
        }
    }
}
