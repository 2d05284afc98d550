//! In-memory provider for tests and dry runs
//!
//! [`MockProvider`] hands out scripted [`MockDevice`]s; a device may carry a
//! [`MockControl`] that records every command it receives. Failures and
//! latency can be injected, and overlapping moves are counted so tests can
//! assert the manager's locking.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::DeviceError;
use crate::params::ConnectionParameters;
use crate::provider::{ControlHandle, DeviceHandle, PresetId, SessionProvider};
use crate::translate::PtzVector;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ────────────────────────────────────────────────────────────────────────────
// Provider
// ────────────────────────────────────────────────────────────────────────────

/// Scriptable [`SessionProvider`]
pub struct MockProvider {
    default_device: Arc<MockDevice>,
    devices: Mutex<HashMap<String, Arc<MockDevice>>>,
    failure: Mutex<Option<DeviceError>>,
    establish_calls: AtomicUsize,
}

impl MockProvider {
    /// Provider returning `device` for every address
    pub fn new(device: Arc<MockDevice>) -> Self {
        Self {
            default_device: device,
            devices: Mutex::new(HashMap::new()),
            failure: Mutex::new(None),
            establish_calls: AtomicUsize::new(0),
        }
    }

    /// Provider whose establishment always fails with `error`
    pub fn failing(error: DeviceError) -> Self {
        let provider = Self::new(Arc::new(MockDevice::new("")));
        provider.set_failure(Some(error));
        provider
    }

    /// Return `device` for the given address key instead of the default
    pub fn with_device(self, key: impl Into<String>, device: Arc<MockDevice>) -> Self {
        lock(&self.devices).insert(key.into(), device);
        self
    }

    /// Make subsequent establishment calls fail, or succeed again with `None`
    pub fn set_failure(&self, error: Option<DeviceError>) {
        *lock(&self.failure) = error;
    }

    /// Number of establishment calls so far
    pub fn establish_calls(&self) -> usize {
        self.establish_calls.load(Ordering::SeqCst)
    }

    pub fn default_device(&self) -> &Arc<MockDevice> {
        &self.default_device
    }
}

#[async_trait]
impl SessionProvider for MockProvider {
    async fn establish(
        &self,
        params: &ConnectionParameters,
    ) -> Result<Arc<dyn DeviceHandle>, DeviceError> {
        self.establish_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(error) = lock(&self.failure).clone() {
            return Err(error);
        }

        let device = lock(&self.devices)
            .get(&params.address().key())
            .cloned()
            .unwrap_or_else(|| Arc::clone(&self.default_device));
        Ok(device)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Device
// ────────────────────────────────────────────────────────────────────────────

/// Scriptable [`DeviceHandle`]
pub struct MockDevice {
    identity: Mutex<Result<String, DeviceError>>,
    control: Option<Arc<MockControl>>,
}

impl MockDevice {
    /// Profile token every mock device reports
    pub const PROFILE_TOKEN: &'static str = "profile_0";

    /// Device without PTZ
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: Mutex::new(Ok(identity.into())),
            control: None,
        }
    }

    /// Device with PTZ control
    pub fn with_control(identity: impl Into<String>, control: Arc<MockControl>) -> Self {
        Self {
            identity: Mutex::new(Ok(identity.into())),
            control: Some(control),
        }
    }

    /// Change what the identity query answers
    pub fn set_identity(&self, identity: impl Into<String>) {
        *lock(&self.identity) = Ok(identity.into());
    }

    /// Make the identity query fail
    pub fn fail_identity(&self, error: DeviceError) {
        *lock(&self.identity) = Err(error);
    }

    pub fn control(&self) -> Option<&Arc<MockControl>> {
        self.control.as_ref()
    }
}

#[async_trait]
impl DeviceHandle for MockDevice {
    async fn identity(&self) -> Result<String, DeviceError> {
        lock(&self.identity).clone()
    }

    fn control_handle(&self) -> Option<Arc<dyn ControlHandle>> {
        self.control
            .as_ref()
            .map(|control| Arc::clone(control) as Arc<dyn ControlHandle>)
    }

    fn primary_profile_token(&self) -> String {
        Self::PROFILE_TOKEN.to_string()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Control
// ────────────────────────────────────────────────────────────────────────────

/// Counts commands that are in flight at the same time
///
/// Share one tracker between several controls to observe overlap across
/// devices.
#[derive(Debug, Default)]
pub struct InFlightTracker {
    active: AtomicUsize,
    peak: AtomicUsize,
}

impl InFlightTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn enter(&self) {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn exit(&self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }

    /// Highest number of simultaneous commands observed
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    /// True once two commands have ever overlapped
    pub fn overlapped(&self) -> bool {
        self.peak() > 1
    }
}

/// A recorded `continuous_move` call
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedMove {
    pub profile_token: String,
    pub velocity: PtzVector,
    pub duration: Duration,
}

/// A recorded `goto_preset` call
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedGoto {
    pub profile_token: String,
    pub preset: PresetId,
    pub speed: PtzVector,
}

/// Scriptable [`ControlHandle`]
pub struct MockControl {
    presets: Mutex<Vec<PresetId>>,
    moves: Mutex<Vec<RecordedMove>>,
    gotos: Mutex<Vec<RecordedGoto>>,
    move_error: Mutex<Option<DeviceError>>,
    preset_error: Mutex<Option<DeviceError>>,
    latency: Duration,
    tracker: Arc<InFlightTracker>,
}

impl MockControl {
    pub fn new() -> Self {
        Self {
            presets: Mutex::new(Vec::new()),
            moves: Mutex::new(Vec::new()),
            gotos: Mutex::new(Vec::new()),
            move_error: Mutex::new(None),
            preset_error: Mutex::new(None),
            latency: Duration::ZERO,
            tracker: Arc::new(InFlightTracker::new()),
        }
    }

    pub fn with_presets<I, P>(self, presets: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PresetId>,
    {
        *lock(&self.presets) = presets.into_iter().map(Into::into).collect();
        self
    }

    /// Each command takes this long to complete
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Report in-flight commands to a shared tracker
    pub fn with_tracker(mut self, tracker: Arc<InFlightTracker>) -> Self {
        self.tracker = tracker;
        self
    }

    /// Make moves and preset gotos fail, or succeed again with `None`
    pub fn set_move_error(&self, error: Option<DeviceError>) {
        *lock(&self.move_error) = error;
    }

    /// Make preset listing fail, or succeed again with `None`
    pub fn set_preset_error(&self, error: Option<DeviceError>) {
        *lock(&self.preset_error) = error;
    }

    pub fn moves(&self) -> Vec<RecordedMove> {
        lock(&self.moves).clone()
    }

    pub fn gotos(&self) -> Vec<RecordedGoto> {
        lock(&self.gotos).clone()
    }

    pub fn tracker(&self) -> &Arc<InFlightTracker> {
        &self.tracker
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

impl Default for MockControl {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ControlHandle for MockControl {
    async fn continuous_move(
        &self,
        profile_token: &str,
        velocity: &PtzVector,
        duration: Duration,
    ) -> Result<(), DeviceError> {
        self.tracker.enter();
        self.simulate_latency().await;
        self.tracker.exit();

        if let Some(error) = lock(&self.move_error).clone() {
            return Err(error);
        }

        lock(&self.moves).push(RecordedMove {
            profile_token: profile_token.to_string(),
            velocity: *velocity,
            duration,
        });
        Ok(())
    }

    async fn list_presets(&self, _profile_token: &str) -> Result<Vec<PresetId>, DeviceError> {
        if let Some(error) = lock(&self.preset_error).clone() {
            return Err(error);
        }
        Ok(lock(&self.presets).clone())
    }

    async fn goto_preset(
        &self,
        profile_token: &str,
        preset: &PresetId,
        speed: &PtzVector,
    ) -> Result<(), DeviceError> {
        self.tracker.enter();
        self.simulate_latency().await;
        self.tracker.exit();

        if let Some(error) = lock(&self.move_error).clone() {
            return Err(error);
        }

        lock(&self.gotos).push(RecordedGoto {
            profile_token: profile_token.to_string(),
            preset: preset.clone(),
            speed: *speed,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{Credentials, DeviceAddress};

    fn params(address: &str) -> ConnectionParameters {
        ConnectionParameters::new(
            DeviceAddress::parse(address).unwrap(),
            Credentials::new("admin", "pw"),
        )
    }

    #[tokio::test]
    async fn provider_counts_establish_calls() {
        let provider = MockProvider::new(Arc::new(MockDevice::new("Acme")));
        provider.establish(&params("10.0.0.5")).await.unwrap();
        provider.establish(&params("10.0.0.5")).await.unwrap();
        assert_eq!(provider.establish_calls(), 2);
    }

    #[tokio::test]
    async fn provider_routes_by_address_key() {
        let special = Arc::new(MockDevice::new("Special"));
        let provider = MockProvider::new(Arc::new(MockDevice::new("Default")))
            .with_device("10.0.0.6", special);

        let a = provider.establish(&params("10.0.0.5")).await.unwrap();
        let b = provider.establish(&params("10.0.0.6")).await.unwrap();

        assert_eq!(a.identity().await.unwrap(), "Default");
        assert_eq!(b.identity().await.unwrap(), "Special");
    }

    #[tokio::test]
    async fn failing_provider_returns_error() {
        let provider = MockProvider::failing(DeviceError::Unauthorized("nope".to_string()));
        let result = provider.establish(&params("10.0.0.5")).await;
        assert!(matches!(result, Err(DeviceError::Unauthorized(_))));

        provider.set_failure(None);
        assert!(provider.establish(&params("10.0.0.5")).await.is_ok());
    }

    #[tokio::test]
    async fn control_records_moves() {
        let control = MockControl::new();
        let velocity = PtzVector::new(0.2, 0.0, 0.0);
        control
            .continuous_move("p", &velocity, Duration::from_millis(500))
            .await
            .unwrap();

        let moves = control.moves();
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].velocity, velocity);
        assert_eq!(moves[0].duration, Duration::from_millis(500));
    }

    #[tokio::test]
    async fn control_reports_injected_errors() {
        let control = MockControl::new().with_presets(["1"]);
        control.set_move_error(Some(DeviceError::Rejected("busy".to_string())));
        control.set_preset_error(Some(DeviceError::Timeout));

        assert!(control.continuous_move("p", &PtzVector::zero(), Duration::ZERO).await.is_err());
        assert_eq!(control.list_presets("p").await, Err(DeviceError::Timeout));
        assert!(control.moves().is_empty());
    }

    #[tokio::test]
    async fn tracker_detects_overlap() {
        let tracker = Arc::new(InFlightTracker::new());
        let control = MockControl::new()
            .with_latency(Duration::from_millis(20))
            .with_tracker(Arc::clone(&tracker));
        let v = PtzVector::zero();

        let (a, b) = tokio::join!(
            control.continuous_move("p", &v, Duration::ZERO),
            control.continuous_move("p", &v, Duration::ZERO),
        );
        assert!(a.is_ok() && b.is_ok());
        assert!(tracker.overlapped());
        assert_eq!(tracker.peak(), 2);
    }

    #[tokio::test]
    async fn device_identity_can_fail() {
        let device = MockDevice::new("Acme");
        device.fail_identity(DeviceError::Timeout);
        assert_eq!(device.identity().await, Err(DeviceError::Timeout));
        device.set_identity("Acme 2");
        assert_eq!(device.identity().await.unwrap(), "Acme 2");
    }
}
