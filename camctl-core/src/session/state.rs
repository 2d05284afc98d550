//! Session state for one camera address

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DeviceError;
use crate::params::DeviceAddress;
use crate::provider::{ControlHandle, DeviceHandle};

/// Cached connection context for one camera
///
/// A session never changes after it is built, apart from the time it was
/// last verified. Re-establishment builds a new session that replaces this
/// one in the cache.
pub struct Session {
    address: DeviceAddress,
    device: Option<Arc<dyn DeviceHandle>>,
    control: Option<Arc<dyn ControlHandle>>,
    profile_token: String,
    online: bool,
    /// Milliseconds since the Unix epoch
    last_verified: AtomicI64,
    failure: Option<DeviceError>,
}

impl Session {
    /// Build a session around an established device
    pub fn established(address: DeviceAddress, device: Arc<dyn DeviceHandle>, online: bool) -> Self {
        let control = device.control_handle();
        let profile_token = device.primary_profile_token();
        Self {
            address,
            device: Some(device),
            control,
            profile_token,
            online,
            last_verified: AtomicI64::new(Utc::now().timestamp_millis()),
            failure: None,
        }
    }

    /// Build an offline session recording why establishment failed
    pub fn offline(address: DeviceAddress, failure: DeviceError) -> Self {
        Self {
            address,
            device: None,
            control: None,
            profile_token: String::new(),
            online: false,
            last_verified: AtomicI64::new(Utc::now().timestamp_millis()),
            failure: Some(failure),
        }
    }

    pub fn address(&self) -> &DeviceAddress {
        &self.address
    }

    pub fn device(&self) -> Option<&Arc<dyn DeviceHandle>> {
        self.device.as_ref()
    }

    pub fn control(&self) -> Option<&Arc<dyn ControlHandle>> {
        self.control.as_ref()
    }

    pub fn profile_token(&self) -> &str {
        &self.profile_token
    }

    pub fn is_online(&self) -> bool {
        self.online
    }

    pub fn supports_ptz(&self) -> bool {
        self.control.is_some()
    }

    /// Why establishment failed, if it did
    pub fn failure(&self) -> Option<&DeviceError> {
        self.failure.as_ref()
    }

    pub fn last_verified(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.last_verified.load(Ordering::Acquire)).unwrap_or_default()
    }

    /// Record a successful liveness check
    pub(crate) fn touch(&self) {
        self.last_verified
            .store(Utc::now().timestamp_millis(), Ordering::Release);
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            address: self.address.key(),
            online: self.online,
            ptz_supported: self.supports_ptz(),
            profile_token: (!self.profile_token.is_empty()).then(|| self.profile_token.clone()),
            last_verified: self.last_verified(),
            failure: self.failure.as_ref().map(ToString::to_string),
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("address", &self.address.key())
            .field("online", &self.online)
            .field("ptz_supported", &self.supports_ptz())
            .field("profile_token", &self.profile_token)
            .field("failure", &self.failure)
            .finish_non_exhaustive()
    }
}

/// Serializable snapshot of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStatus {
    pub address: String,
    pub online: bool,
    pub ptz_supported: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_token: Option<String>,
    pub last_verified: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockControl, MockDevice};

    fn address() -> DeviceAddress {
        DeviceAddress::parse("10.0.0.5").unwrap()
    }

    #[test]
    fn established_session_reads_device_capabilities() {
        let device = Arc::new(MockDevice::with_control("Acme PTZ", Arc::new(MockControl::new())));
        let session = Session::established(address(), device, true);

        assert!(session.is_online());
        assert!(session.supports_ptz());
        assert_eq!(session.profile_token(), MockDevice::PROFILE_TOKEN);
        assert!(session.failure().is_none());
        assert!(session.device().is_some());
    }

    #[test]
    fn established_session_without_ptz_has_no_control() {
        let device = Arc::new(MockDevice::new("Fixed Dome"));
        let session = Session::established(address(), device, true);

        assert!(!session.supports_ptz());
        assert!(session.control().is_none());
    }

    #[test]
    fn offline_session_keeps_failure() {
        let session = Session::offline(address(), DeviceError::Unauthorized("bad password".to_string()));

        assert!(!session.is_online());
        assert!(session.device().is_none());
        assert!(session.control().is_none());
        assert_eq!(
            session.failure(),
            Some(&DeviceError::Unauthorized("bad password".to_string()))
        );
    }

    #[test]
    fn touch_advances_last_verified() {
        let session = Session::offline(address(), DeviceError::Timeout);
        session.last_verified.store(0, Ordering::Release);
        assert_eq!(session.last_verified().timestamp_millis(), 0);

        session.touch();
        assert!(session.last_verified().timestamp_millis() > 0);
    }

    #[test]
    fn status_snapshot_serializes() {
        let session = Session::offline(address(), DeviceError::Timeout);
        let status = session.status();

        assert_eq!(status.address, "10.0.0.5");
        assert!(!status.online);
        assert!(status.profile_token.is_none());
        assert_eq!(status.failure.as_deref(), Some("Request timed out"));

        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["online"], false);
        assert!(json.get("profile_token").is_none());
    }
}
