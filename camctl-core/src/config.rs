//! Session manager configuration

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// How move and reset commands are serialized
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LockPolicy {
    /// One lock shared by every camera: a command for camera A waits for a
    /// running command on camera B
    #[default]
    Global,
    /// One lock per camera address
    PerDevice,
}

impl LockPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::PerDevice => "per-device",
        }
    }
}

impl FromStr for LockPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "global" => Ok(Self::Global),
            "per-device" => Ok(Self::PerDevice),
            _ => Err(Error::InvalidPolicy {
                value: s.to_string(),
                expected: "global, per-device",
            }),
        }
    }
}

impl fmt::Display for LockPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happens to a requested speed before translation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpeedPolicy {
    /// Forward the speed unchanged, even outside `[0, 1]`
    #[default]
    PassThrough,
    /// Clamp to `[0, 1]`; NaN and infinities become 0
    Clamp,
}

impl SpeedPolicy {
    pub fn apply(&self, speed: f32) -> f32 {
        match self {
            Self::PassThrough => speed,
            Self::Clamp if !speed.is_finite() => 0.0,
            Self::Clamp => speed.clamp(0.0, 1.0),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PassThrough => "pass-through",
            Self::Clamp => "clamp",
        }
    }
}

impl FromStr for SpeedPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "pass-through" | "passthrough" => Ok(Self::PassThrough),
            "clamp" => Ok(Self::Clamp),
            _ => Err(Error::InvalidPolicy {
                value: s.to_string(),
                expected: "pass-through, clamp",
            }),
        }
    }
}

impl fmt::Display for SpeedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for a [`SessionManager`](crate::SessionManager)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerConfig {
    #[serde(default)]
    pub lock_policy: LockPolicy,

    #[serde(default)]
    pub speed_policy: SpeedPolicy,
}

impl ManagerConfig {
    pub fn with_lock_policy(mut self, policy: LockPolicy) -> Self {
        self.lock_policy = policy;
        self
    }

    pub fn with_speed_policy(mut self, policy: SpeedPolicy) -> Self {
        self.speed_policy = policy;
        self
    }
}
