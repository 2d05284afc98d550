//! Direction vocabulary for PTZ moves
//!
//! Ten motion commands (eight compass directions plus zoom in/out) and
//! their sign on each axis. Parsing is total: anything unrecognized becomes
//! [`Direction::Unknown`], which translates to a zero vector but is still
//! sent to the device.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A motion command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
    LeftUp,
    LeftDown,
    RightUp,
    RightDown,
    ZoomIn,
    ZoomOut,
    /// Unrecognized input; moves nothing
    Unknown,
}

impl Direction {
    /// Every recognized direction, in table order
    pub const ALL: [Direction; 10] = [
        Self::Left,
        Self::Right,
        Self::Up,
        Self::Down,
        Self::LeftUp,
        Self::LeftDown,
        Self::RightUp,
        Self::RightDown,
        Self::ZoomIn,
        Self::ZoomOut,
    ];

    /// Parse a command name
    ///
    /// Accepts the wire names (`PTZ_CMD_LEFTUP`, `PTZ_CMD_ZOOM_IN`) as well as
    /// short forms (`left-up`, `zoom_in`, `RightDown`), case-insensitively.
    pub fn parse(input: &str) -> Self {
        let upper = input.trim().to_ascii_uppercase();
        let name = upper.strip_prefix("PTZ_CMD_").unwrap_or(&upper);
        let compact: String = name.chars().filter(|c| *c != '_' && *c != '-').collect();

        match compact.as_str() {
            "LEFT" => Self::Left,
            "RIGHT" => Self::Right,
            "UP" => Self::Up,
            "DOWN" => Self::Down,
            "LEFTUP" => Self::LeftUp,
            "LEFTDOWN" => Self::LeftDown,
            "RIGHTUP" => Self::RightUp,
            "RIGHTDOWN" => Self::RightDown,
            "ZOOMIN" => Self::ZoomIn,
            "ZOOMOUT" => Self::ZoomOut,
            _ => Self::Unknown,
        }
    }

    /// Name used by the device control vocabulary
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::Left => "PTZ_CMD_LEFT",
            Self::Right => "PTZ_CMD_RIGHT",
            Self::Up => "PTZ_CMD_UP",
            Self::Down => "PTZ_CMD_DOWN",
            Self::LeftUp => "PTZ_CMD_LEFTUP",
            Self::LeftDown => "PTZ_CMD_LEFTDOWN",
            Self::RightUp => "PTZ_CMD_RIGHTUP",
            Self::RightDown => "PTZ_CMD_RIGHTDOWN",
            Self::ZoomIn => "PTZ_CMD_ZOOM_IN",
            Self::ZoomOut => "PTZ_CMD_ZOOM_OUT",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Sign on (pan, tilt, zoom), each -1, 0 or +1
    pub fn axis_signs(&self) -> (i8, i8, i8) {
        match self {
            Self::Left => (-1, 0, 0),
            Self::Right => (1, 0, 0),
            Self::Up => (0, 1, 0),
            Self::Down => (0, -1, 0),
            Self::LeftUp => (-1, 1, 0),
            Self::LeftDown => (-1, -1, 0),
            Self::RightUp => (1, 1, 0),
            Self::RightDown => (1, -1, 0),
            Self::ZoomIn => (0, 0, 1),
            Self::ZoomOut => (0, 0, -1),
            Self::Unknown => (0, 0, 0),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl From<&str> for Direction {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<String> for Direction {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<Direction> for String {
    fn from(d: Direction) -> Self {
        d.wire_name().to_string()
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}
