//! Command translation: direction and speed to a PTZ velocity vector

use std::time::Duration;

use serde::Serialize;

use crate::direction::Direction;

/// Coordinate space of the pan/tilt plane
pub const PAN_TILT_SPACE: &str = "http://www.onvif.org/ver10/tptz/PanTiltSpaces/PositionGenericSpace";

/// Coordinate space of the zoom axis
pub const ZOOM_SPACE: &str = "http://www.onvif.org/ver10/tptz/ZoomSpaces/PositionGenericSpace";

/// Speed applied on every axis when returning to a preset
pub const RESET_SPEED: f32 = 1.0;

/// Move duration used when the caller does not supply one
pub const DEFAULT_DURATION: Duration = Duration::from_millis(1000);

/// Pan (x) and tilt (y) components
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Vector2D {
    pub x: f32,
    pub y: f32,
    pub space: &'static str,
}

/// Zoom component
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Vector1D {
    pub x: f32,
    pub space: &'static str,
}

/// A full PTZ vector as handed to the control handle
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PtzVector {
    pub pan_tilt: Vector2D,
    pub zoom: Vector1D,
}

impl PtzVector {
    pub fn new(pan: f32, tilt: f32, zoom: f32) -> Self {
        Self {
            pan_tilt: Vector2D {
                x: pan,
                y: tilt,
                space: PAN_TILT_SPACE,
            },
            zoom: Vector1D {
                x: zoom,
                space: ZOOM_SPACE,
            },
        }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// The same value on every axis
    pub fn uniform(value: f32) -> Self {
        Self::new(value, value, value)
    }

    pub fn pan(&self) -> f32 {
        self.pan_tilt.x
    }

    pub fn tilt(&self) -> f32 {
        self.pan_tilt.y
    }

    pub fn zoom(&self) -> f32 {
        self.zoom.x
    }

    pub fn is_zero(&self) -> bool {
        self.pan() == 0.0 && self.tilt() == 0.0 && self.zoom() == 0.0
    }
}

/// Translate a direction and speed magnitude into a velocity vector.
///
/// Total over its inputs: [`Direction::Unknown`] yields the zero vector.
/// Speed is used as given; range policy is applied by the caller.
pub fn translate(direction: Direction, speed: f32) -> PtzVector {
    let (pan, tilt, zoom) = direction.axis_signs();
    PtzVector::new(scale(pan, speed), scale(tilt, speed), scale(zoom, speed))
}

fn scale(sign: i8, speed: f32) -> f32 {
    match sign {
        0 => 0.0,
        s if s > 0 => speed,
        _ => -speed,
    }
}

/// A single movement request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveCommand {
    pub direction: Direction,
    pub speed: f32,
    pub duration: Duration,
}

impl MoveCommand {
    pub fn new(direction: impl Into<Direction>, speed: f32, duration: Duration) -> Self {
        Self {
            direction: direction.into(),
            speed,
            duration,
        }
    }

    pub fn vector(&self) -> PtzVector {
        translate(self.direction, self.speed)
    }
}
