//! Sensor sample types.
//!
//! Each sample is immutable once created; feeds replace the stored value
//! wholesale on every update, so no history is kept.

use web_time::SystemTime;

/// A single location fix from the positioning feed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationFix {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Altitude above sea level in meters.
    pub altitude: f64,
    /// When the fix was produced.
    pub timestamp: SystemTime,
}

impl LocationFix {
    /// Create a fix stamped with the current time.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude,
            timestamp: SystemTime::now(),
        }
    }
}

/// A compass heading sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadingSample {
    /// Heading relative to true north, in degrees.
    pub true_heading_degrees: f64,
}

impl HeadingSample {
    #[must_use]
    pub fn new(true_heading_degrees: f64) -> Self {
        Self {
            true_heading_degrees,
        }
    }
}

/// A device attitude sample from the motion feed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttitudeSample {
    /// Rotation about the device's lateral axis, in radians.
    pub pitch_radians: f64,
    /// Rotation about the device's longitudinal axis, in radians.
    pub roll_radians: f64,
}

impl AttitudeSample {
    #[must_use]
    pub fn new(pitch_radians: f64, roll_radians: f64) -> Self {
        Self {
            pitch_radians,
            roll_radians,
        }
    }
}

/// Physical orientation of the device.
///
/// Determines which attitude axis corresponds to the camera's tilt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DeviceOrientation {
    /// Orientation not yet reported.
    #[default]
    Unknown,
    /// Upright, home button at the bottom.
    Portrait,
    /// Upside down.
    PortraitUpsideDown,
    /// Rotated so the top of the device points left.
    LandscapeLeft,
    /// Rotated so the top of the device points right.
    LandscapeRight,
    /// Lying flat, screen up.
    FaceUp,
    /// Lying flat, screen down.
    FaceDown,
}
