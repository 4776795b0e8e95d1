//! Derived readout: the values the overlay displays.
//!
//! Everything here is a pure function of a [`SensorSnapshot`] and an
//! [`ElevationLookup`]. Missing sensor data reads as zero rather than as an
//! error, so a readout can be computed before any feed has reported.
//!
//! Device pitch is measured from straight down: 0 degrees looks at the
//! ground directly below, 90 degrees looks at the horizon. The slant
//! distance assumes a flat ground plane at the looked-up ground elevation,
//! which the camera axis meets at `height / cos(pitch)`. Past 90 degrees the
//! axis points above the horizon and there is no intersection.

use std::fmt;

use crate::elevation::{ElevationKey, ElevationLookup, format_coordinate};
use crate::sensors::SensorSnapshot;
use crate::types::{AttitudeSample, DeviceOrientation};

/// Pitch above which the camera cannot see the ground plane.
pub const MAX_GROUND_PITCH_DEGREES: f64 = 90.0;

/// Latitude to three decimals, `0.000` without a fix.
#[must_use]
pub fn format_latitude(snapshot: &SensorSnapshot) -> String {
    format_coordinate(snapshot.location.map_or(0.0, |fix| fix.latitude))
}

/// Longitude to three decimals, `0.000` without a fix.
#[must_use]
pub fn format_longitude(snapshot: &SensorSnapshot) -> String {
    format_coordinate(snapshot.location.map_or(0.0, |fix| fix.longitude))
}

/// Altitude in meters to one decimal.
#[must_use]
pub fn format_altitude(snapshot: &SensorSnapshot) -> String {
    format!("{:.1}", altitude(snapshot))
}

/// True heading in degrees to one decimal, `0.0` without a heading.
#[must_use]
pub fn format_heading(snapshot: &SensorSnapshot) -> String {
    format!("{:.1}", heading(snapshot))
}

fn altitude(snapshot: &SensorSnapshot) -> f64 {
    snapshot.location.map_or(0.0, |fix| fix.altitude)
}

fn heading(snapshot: &SensorSnapshot) -> f64 {
    snapshot
        .heading
        .map_or(0.0, |sample| sample.true_heading_degrees)
}

/// Elevation cache key for the displayed coordinates.
#[must_use]
pub fn elevation_key(snapshot: &SensorSnapshot) -> ElevationKey {
    ElevationKey::from_formatted(&format_latitude(snapshot), &format_longitude(snapshot))
}

/// Camera tilt in degrees for the given attitude and device orientation.
///
/// | orientation     | pitch      |
/// |-----------------|------------|
/// | portrait        | `pitch`    |
/// | landscape left  | `-roll`    |
/// | landscape right | `roll`     |
/// | anything else   | `0`        |
#[must_use]
pub fn pitch_for_orientation(attitude: AttitudeSample, orientation: DeviceOrientation) -> f64 {
    match orientation {
        DeviceOrientation::Portrait => attitude.pitch_radians.to_degrees(),
        DeviceOrientation::LandscapeLeft => (-attitude.roll_radians).to_degrees(),
        DeviceOrientation::LandscapeRight => attitude.roll_radians.to_degrees(),
        DeviceOrientation::Unknown
        | DeviceOrientation::PortraitUpsideDown
        | DeviceOrientation::FaceUp
        | DeviceOrientation::FaceDown => 0.0,
    }
}

/// Camera tilt in degrees, `0` without an attitude sample.
#[must_use]
pub fn device_pitch_degrees(snapshot: &SensorSnapshot) -> f64 {
    snapshot.attitude.map_or(0.0, |attitude| {
        pitch_for_orientation(attitude, snapshot.orientation)
    })
}

/// Ground elevation under the current fix.
///
/// `None` while the elevation is unknown (a cache-backed lookup schedules a
/// fetch in that case) and always `None` without a fix.
pub fn ground_elevation(
    snapshot: &SensorSnapshot,
    elevations: &impl ElevationLookup,
) -> Option<f32> {
    if snapshot.location.is_none() {
        return None;
    }
    elevations.lookup(&elevation_key(snapshot))
}

/// Height of the device above the ground, treating an unknown ground
/// elevation as zero.
pub fn elevation_above_ground(
    snapshot: &SensorSnapshot,
    elevations: &impl ElevationLookup,
) -> f64 {
    height_above(altitude(snapshot), ground_elevation(snapshot, elevations))
}

fn height_above(altitude: f64, ground: Option<f32>) -> f64 {
    altitude - f64::from(ground.unwrap_or(0.0))
}

/// Straight-line distance from the device to where the camera meets the
/// ground.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SlantDistance {
    /// The camera points above the horizon.
    Infinite,
    /// Distance in meters.
    Meters(f64),
}

impl SlantDistance {
    #[must_use]
    pub fn meters(self) -> Option<f64> {
        match self {
            SlantDistance::Infinite => None,
            SlantDistance::Meters(m) => Some(m),
        }
    }
}

impl fmt::Display for SlantDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlantDistance::Infinite => f.write_str("inf"),
            SlantDistance::Meters(m) => write!(f, "{m:.0}"),
        }
    }
}

/// Distance along the camera axis to a flat ground plane
/// `elevation_above_ground` meters below.
#[must_use]
pub fn slant_distance(elevation_above_ground: f64, pitch_degrees: f64) -> SlantDistance {
    if pitch_degrees > MAX_GROUND_PITCH_DEGREES {
        return SlantDistance::Infinite;
    }
    SlantDistance::Meters(elevation_above_ground / pitch_degrees.to_radians().cos())
}

/// Every derived quantity for one presentation tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Readout {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    pub heading: f64,
    pub pitch_degrees: f64,
    /// `None` until the elevation for the current cell is known.
    pub ground_elevation: Option<f32>,
    pub elevation_above_ground: f64,
    pub distance: SlantDistance,
}

impl Readout {
    /// Derive the readout from the latest sensor values.
    ///
    /// With a cache-backed lookup, an unknown ground elevation schedules a
    /// fetch and reads as zero for this tick; later ticks pick it up.
    pub fn compute(snapshot: &SensorSnapshot, elevations: &impl ElevationLookup) -> Self {
        let altitude = altitude(snapshot);
        let pitch_degrees = device_pitch_degrees(snapshot);
        let ground_elevation = ground_elevation(snapshot, elevations);
        let elevation_above_ground = height_above(altitude, ground_elevation);

        Self {
            latitude: snapshot.location.map_or(0.0, |fix| fix.latitude),
            longitude: snapshot.location.map_or(0.0, |fix| fix.longitude),
            altitude,
            heading: heading(snapshot),
            pitch_degrees,
            ground_elevation,
            elevation_above_ground,
            distance: slant_distance(elevation_above_ground, pitch_degrees),
        }
    }

    /// Format for display.
    #[must_use]
    pub fn format(&self) -> FormattedReadout {
        FormattedReadout {
            latitude: format_coordinate(self.latitude),
            longitude: format_coordinate(self.longitude),
            altitude: format!("{:.1}", self.altitude),
            ground_level: format!("{:.1}", self.ground_elevation.unwrap_or(0.0)),
            elevation_above_ground: format!("{:.1}", self.elevation_above_ground),
            heading: format!("{:.1}", self.heading),
            pitch: format!("{:.1}", self.pitch_degrees),
            distance: self.distance.to_string(),
        }
    }
}

/// Display strings for a [`Readout`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedReadout {
    pub latitude: String,
    pub longitude: String,
    pub altitude: String,
    pub ground_level: String,
    pub elevation_above_ground: String,
    pub heading: String,
    pub pitch: String,
    /// Slant distance in whole meters, or `inf`.
    pub distance: String,
}

impl fmt::Display for FormattedReadout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{} alt {} ground {} agl {} | {} m | hdg {} pitch {}",
            self.latitude,
            self.longitude,
            self.altitude,
            self.ground_level,
            self.elevation_above_ground,
            self.distance,
            self.heading,
            self.pitch
        )
    }
}
