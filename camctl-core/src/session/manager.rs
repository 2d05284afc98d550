//! SessionManager: get-or-establish, liveness, move and reset
//!
//! The manager owns the session cache and a provider for establishing new
//! sessions. Establishment failures never surface as errors: they produce an
//! offline session, and commands against it report `unsupported`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info, warn};

use crate::config::{LockPolicy, ManagerConfig};
use crate::direction::Direction;
use crate::outcome::{MoveOutcome, ResetOutcome};
use crate::params::ConnectionParameters;
use crate::provider::{DeviceHandle, SessionProvider};
use crate::translate::{MoveCommand, PtzVector, RESET_SPEED, translate};

use super::cache::SessionCache;
use super::state::{Session, SessionStatus};

/// Serializes move and reset commands according to a [`LockPolicy`]
enum MoveLock {
    Global(Arc<Mutex<()>>),
    PerDevice(Mutex<HashMap<String, Arc<Mutex<()>>>>),
}

impl MoveLock {
    fn new(policy: LockPolicy) -> Self {
        match policy {
            LockPolicy::Global => Self::Global(Arc::new(Mutex::new(()))),
            LockPolicy::PerDevice => Self::PerDevice(Mutex::new(HashMap::new())),
        }
    }

    async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        let mutex = match self {
            Self::Global(mutex) => Arc::clone(mutex),
            Self::PerDevice(locks) => Arc::clone(
                locks
                    .lock()
                    .await
                    .entry(key.to_string())
                    .or_insert_with(|| Arc::new(Mutex::new(()))),
            ),
        };
        mutex.lock_owned().await
    }
}

/// Manages camera sessions and the commands sent through them
///
/// SessionManager provides:
/// - Lazy session establishment with a liveness re-check on every use
/// - Liveness reporting
/// - Direction-based continuous moves and preset reset, serialized per
///   [`LockPolicy`]
///
/// Construct one per process and share it by reference or `Arc`.
pub struct SessionManager {
    cache: SessionCache,
    provider: Arc<dyn SessionProvider>,
    config: ManagerConfig,
    move_lock: MoveLock,
}

impl SessionManager {
    pub fn new(provider: Arc<dyn SessionProvider>, config: ManagerConfig) -> Self {
        Self {
            cache: SessionCache::new(),
            provider,
            move_lock: MoveLock::new(config.lock_policy),
            config,
        }
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Return the cached session if its device still answers, otherwise
    /// establish a fresh one.
    ///
    /// Makes at most one establishment attempt. On failure the returned
    /// session is offline, has no control handle, and carries the cause.
    pub async fn get_or_establish(&self, params: &ConnectionParameters) -> Arc<Session> {
        let key = params.address().key();

        if let Some(session) = self.cache.get(&key).await {
            if probe(&session).await {
                session.touch();
                debug!(address = %key, "Reusing cached session");
                return session;
            }
            info!(address = %key, "Cached session failed liveness check, re-establishing");
        }

        self.establish(params).await
    }

    /// Whether the camera currently answers an identity query
    ///
    /// May re-establish the session as [`get_or_establish`](Self::get_or_establish) does.
    pub async fn liveness(&self, params: &ConnectionParameters) -> bool {
        self.get_or_establish(params).await.is_online()
    }

    /// Move the camera in `direction` at `speed` for `duration`
    ///
    /// An unrecognized direction still reaches the device as a zero vector.
    /// No retry is made when the device rejects the command.
    pub async fn execute_move(
        &self,
        params: &ConnectionParameters,
        direction: Direction,
        speed: f32,
        duration: Duration,
    ) -> MoveOutcome {
        let key = params.address().key();
        let _guard = self.move_lock.acquire(&key).await;

        let session = self.get_or_establish(params).await;
        let Some(control) = session.control() else {
            warn!(address = %key, online = session.is_online(), "Move requested but device has no PTZ control");
            return MoveOutcome::Unsupported {
                cause: session.failure().cloned(),
            };
        };

        if !direction.is_known() {
            warn!(address = %key, "Unrecognized direction, sending zero vector");
        }

        let speed = self.config.speed_policy.apply(speed);
        let velocity = translate(direction, speed);

        match control
            .continuous_move(session.profile_token(), &velocity, duration)
            .await
        {
            Ok(()) => {
                info!(
                    address = %key,
                    direction = %direction,
                    pan = velocity.pan(),
                    tilt = velocity.tilt(),
                    zoom = velocity.zoom(),
                    duration_ms = duration.as_millis() as u64,
                    "PTZ move applied"
                );
                MoveOutcome::Applied
            }
            Err(e) => {
                warn!(address = %key, direction = %direction, error = %e, "PTZ move rejected");
                MoveOutcome::Unsupported { cause: Some(e) }
            }
        }
    }

    /// Execute a prepared [`MoveCommand`]
    pub async fn execute(&self, params: &ConnectionParameters, command: &MoveCommand) -> MoveOutcome {
        self.execute_move(params, command.direction, command.speed, command.duration)
            .await
    }

    /// Send the camera to its first registered preset
    pub async fn execute_reset(&self, params: &ConnectionParameters) -> ResetOutcome {
        let key = params.address().key();
        let _guard = self.move_lock.acquire(&key).await;

        let session = self.get_or_establish(params).await;
        let Some(control) = session.control() else {
            warn!(address = %key, online = session.is_online(), "Reset requested but device has no PTZ control");
            return ResetOutcome::Unsupported {
                cause: session.failure().cloned(),
            };
        };

        let token = session.profile_token();
        let presets = match control.list_presets(token).await {
            Ok(presets) => presets,
            Err(e) => {
                warn!(address = %key, error = %e, "Failed to list presets");
                return ResetOutcome::Unsupported { cause: Some(e) };
            }
        };

        let Some(first) = presets.first() else {
            info!(address = %key, "Reset requested but no presets are registered");
            return ResetOutcome::NoPresets;
        };

        match control
            .goto_preset(token, first, &PtzVector::uniform(RESET_SPEED))
            .await
        {
            Ok(()) => {
                info!(address = %key, preset = %first, "Returned to first preset");
                ResetOutcome::Applied
            }
            Err(e) => {
                warn!(address = %key, preset = %first, error = %e, "Goto preset rejected");
                ResetOutcome::Unsupported { cause: Some(e) }
            }
        }
    }

    /// Cached status for an address key, without probing the device
    pub async fn status(&self, key: &str) -> Option<SessionStatus> {
        self.cache.get(key).await.map(|session| session.status())
    }

    /// Cached status of every known camera, sorted by address
    pub async fn statuses(&self) -> Vec<SessionStatus> {
        let mut statuses: Vec<SessionStatus> = self
            .cache
            .sessions()
            .await
            .iter()
            .map(|session| session.status())
            .collect();
        statuses.sort_by(|a, b| a.address.cmp(&b.address));
        statuses
    }

    async fn establish(&self, params: &ConnectionParameters) -> Arc<Session> {
        let address = params.address().clone();
        let key = address.key();

        let session = match self.provider.establish(params).await {
            Ok(device) => {
                let online = probe_device(device.as_ref()).await;
                info!(address = %key, online, "Session established");
                Session::established(address, device, online)
            }
            Err(e) => {
                warn!(address = %key, error = %e, "Session establishment failed, marking offline");
                Session::offline(address, e)
            }
        };

        let session = Arc::new(session);
        self.cache.put(Arc::clone(&session)).await;
        session
    }
}

async fn probe(session: &Session) -> bool {
    match session.device() {
        Some(device) => probe_device(device.as_ref()).await,
        None => false,
    }
}

/// A non-empty identity answer means the device is alive
async fn probe_device(device: &dyn DeviceHandle) -> bool {
    match device.identity().await {
        Ok(identity) => !identity.trim().is_empty(),
        Err(e) => {
            debug!(error = %e, "Identity query failed");
            false
        }
    }
}
