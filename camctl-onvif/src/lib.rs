//! ONVIF session provider for camctl
//!
//! Implements [`camctl_core::SessionProvider`] with a minimal SOAP client
//! covering only the calls the session manager needs:
//!
//! | Service | Calls |
//! |---------|-------|
//! | Device  | `GetCapabilities`, `GetDeviceInformation` |
//! | Media   | `GetProfiles` |
//! | PTZ     | `ContinuousMove`, `GetPresets`, `GotoPreset` |
//!
//! Every request carries a fresh WS-Security UsernameToken digest.
//!
//! ```no_run
//! use std::sync::Arc;
//! use camctl_core::{ConnectionParameters, Credentials, DeviceAddress, ManagerConfig, SessionManager};
//! use camctl_onvif::OnvifProvider;
//!
//! # async fn run() -> camctl_core::Result<()> {
//! let manager = SessionManager::new(Arc::new(OnvifProvider::new()), ManagerConfig::default());
//! let params = ConnectionParameters::new(
//!     DeviceAddress::parse("10.0.0.5")?,
//!     Credentials::new("admin", "password"),
//! );
//! println!("online: {}", manager.liveness(&params).await);
//! # Ok(())
//! # }
//! ```

mod device;
mod ptz;
mod soap;
mod xml;

pub use device::{DEFAULT_DEVICE_PATH, OnvifDevice, OnvifProvider};
pub use ptz::OnvifPtz;
