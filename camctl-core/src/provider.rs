//! Device session provider traits
//!
//! The session manager never speaks a device protocol itself. A
//! [`SessionProvider`] performs discovery and authentication and hands back a
//! [`DeviceHandle`]; movement goes through the device's optional
//! [`ControlHandle`].

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::DeviceError;
use crate::params::ConnectionParameters;
use crate::translate::PtzVector;

/// Identifier of a preset position stored on the device
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresetId(String);

impl PresetId {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PresetId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for PresetId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for PresetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Establishes authenticated sessions with cameras
///
/// Implementations should bound their I/O by
/// [`ConnectionParameters::timeout`].
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Discover and authenticate the device at `params.address()`
    async fn establish(
        &self,
        params: &ConnectionParameters,
    ) -> Result<Arc<dyn DeviceHandle>, DeviceError>;
}

/// An established device
#[async_trait]
pub trait DeviceHandle: Send + Sync {
    /// Basic identity query. A non-empty answer means the device is alive.
    async fn identity(&self) -> Result<String, DeviceError>;

    /// PTZ control, or `None` when the device has no movable axes
    fn control_handle(&self) -> Option<Arc<dyn ControlHandle>>;

    /// Token of the media profile movement commands apply to
    fn primary_profile_token(&self) -> String;
}

/// PTZ control capability of a device
#[async_trait]
pub trait ControlHandle: Send + Sync {
    /// Move continuously with `velocity` for `duration`
    async fn continuous_move(
        &self,
        profile_token: &str,
        velocity: &PtzVector,
        duration: Duration,
    ) -> Result<(), DeviceError>;

    /// Presets registered on the device, in device order
    async fn list_presets(&self, profile_token: &str) -> Result<Vec<PresetId>, DeviceError>;

    /// Move to a stored preset at `speed`
    async fn goto_preset(
        &self,
        profile_token: &str,
        preset: &PresetId,
        speed: &PtzVector,
    ) -> Result<(), DeviceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_id_conversions() {
        let from_str = PresetId::from("1");
        let from_string = PresetId::from("1".to_string());
        assert_eq!(from_str, from_string);
        assert_eq!(from_str.as_str(), "1");
        assert_eq!(from_str.to_string(), "1");
    }

    #[test]
    fn preset_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&PresetId::new("Home")).unwrap();
        assert_eq!(json, "\"Home\"");
    }
}
