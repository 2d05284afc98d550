//! camctl-core: session cache and PTZ command translation for network cameras
//!
//! This crate provides the control-session layer that sits in front of a
//! camera's device-management protocol:
//!
//! - **Direction vocabulary** - [`Direction`] and its per-axis signs
//! - **Command translation** - [`translate`] from direction and speed to a [`PtzVector`]
//! - **Session cache** - [`SessionCache`] mapping an address to its [`Session`]
//! - **Session management** - [`SessionManager`] for get-or-establish, liveness, move and reset
//! - **Provider traits** - [`SessionProvider`], [`DeviceHandle`], [`ControlHandle`]
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use camctl_core::mock::{MockControl, MockDevice, MockProvider};
//! use camctl_core::{ConnectionParameters, Credentials, DeviceAddress, Direction, ManagerConfig, SessionManager};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let device = Arc::new(MockDevice::with_control("Acme PTZ", Arc::new(MockControl::new())));
//!     let manager = SessionManager::new(Arc::new(MockProvider::new(device)), ManagerConfig::default());
//!
//!     let params = ConnectionParameters::new(
//!         DeviceAddress::parse("10.0.0.5")?,
//!         Credentials::new("admin", "pw"),
//!     );
//!
//!     if manager.liveness(&params).await {
//!         let outcome = manager
//!             .execute_move(&params, Direction::RightUp, 0.2, Duration::from_millis(1000))
//!             .await;
//!         println!("move: {}", outcome);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                 SessionManager                  │
//! │  ┌──────────────┐  ┌─────────┐  ┌────────────┐  │
//! │  │ SessionCache │  │MoveLock │  │ translate  │  │
//! │  └──────────────┘  └─────────┘  └────────────┘  │
//! └─────────────────────────────────────────────────┘
//!                          │
//!                          ▼
//! ┌─────────────────────────────────────────────────┐
//! │                 SessionProvider                 │
//! │       DeviceHandle ──► ControlHandle (PTZ)      │
//! └─────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod direction;
pub mod error;
pub mod mock;
pub mod outcome;
pub mod params;
pub mod provider;
pub mod session;
pub mod translate;

// Re-export key types for convenience
pub use config::{LockPolicy, ManagerConfig, SpeedPolicy};
pub use direction::Direction;
pub use error::{DeviceError, Error, Result};
pub use outcome::{MoveOutcome, ResetOutcome};
pub use params::{ConnectionParameters, Credentials, DEFAULT_SPEED, DEFAULT_TIMEOUT, DeviceAddress};
pub use provider::{ControlHandle, DeviceHandle, PresetId, SessionProvider};
pub use session::{Session, SessionCache, SessionManager, SessionStatus};
pub use translate::{
    DEFAULT_DURATION, MoveCommand, PAN_TILT_SPACE, PtzVector, RESET_SPEED, ZOOM_SPACE, translate,
};
