//! Launch parameter parsing for the headless driver.

use std::time::Duration;

use clap::{Parser, ValueEnum};
use geocamera::DeviceOrientation;
use geocamera::ElevationConfig;
use geocamera::permissions::AuthorizationStatus;

/// Default simulated latitude (Jungfraujoch).
const DEFAULT_LAT: f64 = 46.547;
/// Default simulated longitude (Jungfraujoch).
const DEFAULT_LON: f64 = 7.983;
/// Default simulated altitude in meters.
const DEFAULT_ALTITUDE: f64 = 3_571.0;
/// Default simulated attitude pitch: camera 20 degrees below the horizon.
const DEFAULT_PITCH: f64 = 70.0;
/// Number of readout ticks before exiting.
const DEFAULT_TICKS: u32 = 20;
/// Milliseconds between readout ticks.
const DEFAULT_TICK_MS: u64 = 500;

/// Device orientation as given on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OrientationArg {
    Unknown,
    #[default]
    Portrait,
    PortraitUpsideDown,
    LandscapeLeft,
    LandscapeRight,
    FaceUp,
    FaceDown,
}

impl From<OrientationArg> for DeviceOrientation {
    fn from(arg: OrientationArg) -> Self {
        match arg {
            OrientationArg::Unknown => DeviceOrientation::Unknown,
            OrientationArg::Portrait => DeviceOrientation::Portrait,
            OrientationArg::PortraitUpsideDown => DeviceOrientation::PortraitUpsideDown,
            OrientationArg::LandscapeLeft => DeviceOrientation::LandscapeLeft,
            OrientationArg::LandscapeRight => DeviceOrientation::LandscapeRight,
            OrientationArg::FaceUp => DeviceOrientation::FaceUp,
            OrientationArg::FaceDown => DeviceOrientation::FaceDown,
        }
    }
}

/// Location permission status to simulate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum PermissionArg {
    #[default]
    Authorized,
    NotDetermined,
    Denied,
    Restricted,
}

impl From<PermissionArg> for AuthorizationStatus {
    fn from(arg: PermissionArg) -> Self {
        match arg {
            PermissionArg::Authorized => AuthorizationStatus::Authorized,
            PermissionArg::NotDetermined => AuthorizationStatus::NotDetermined,
            PermissionArg::Denied => AuthorizationStatus::Denied,
            PermissionArg::Restricted => AuthorizationStatus::Restricted,
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Print a live geocamera readout from simulated sensor feeds")]
struct CliArgs {
    /// Simulated latitude in degrees.
    #[arg(long, default_value_t = DEFAULT_LAT, allow_hyphen_values = true)]
    lat: f64,

    /// Simulated longitude in degrees.
    #[arg(long, default_value_t = DEFAULT_LON, allow_hyphen_values = true)]
    lon: f64,

    /// Simulated altitude above sea level in meters.
    #[arg(long, default_value_t = DEFAULT_ALTITUDE, allow_hyphen_values = true)]
    altitude: f64,

    /// Simulated true heading in degrees.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    heading: f64,

    /// Simulated attitude pitch in degrees.
    #[arg(long, default_value_t = DEFAULT_PITCH, allow_hyphen_values = true)]
    pitch: f64,

    /// Simulated attitude roll in degrees.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    roll: f64,

    /// Device orientation.
    #[arg(long, value_enum, default_value_t = OrientationArg::default())]
    orientation: OrientationArg,

    /// Location permission status to simulate.
    #[arg(long, value_enum, default_value_t = PermissionArg::default())]
    location_permission: PermissionArg,

    /// Random walk step of the simulated position, in meters per fix.
    #[arg(long, default_value_t = 0.0)]
    jitter: f64,

    /// Seed for the simulated feeds.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of readout ticks before exiting.
    #[arg(long, default_value_t = DEFAULT_TICKS)]
    ticks: u32,

    /// Milliseconds between readout ticks.
    #[arg(long, default_value_t = DEFAULT_TICK_MS)]
    tick_ms: u64,

    /// Elevation API base URL.
    #[arg(long)]
    api_url: Option<String>,

    /// Elevation dataset.
    #[arg(long)]
    dataset: Option<String>,

    /// Maximum number of cached elevations (unbounded when omitted).
    #[arg(long)]
    max_cache_entries: Option<usize>,
}

/// Launch parameters for the driver.
#[derive(Debug, Clone)]
pub struct LaunchParams {
    pub lat: f64,
    pub lon: f64,
    pub altitude: f64,
    pub heading: f64,
    /// Attitude pitch in radians.
    pub pitch: f64,
    /// Attitude roll in radians.
    pub roll: f64,
    pub orientation: DeviceOrientation,
    pub location_permission: AuthorizationStatus,
    pub jitter_meters: f64,
    pub seed: Option<u64>,
    pub ticks: u32,
    pub tick_interval: Duration,
    pub elevation: ElevationConfig,
}

impl LaunchParams {
    fn from_args(args: CliArgs) -> Self {
        let defaults = ElevationConfig::default();
        Self {
            lat: args.lat,
            lon: args.lon,
            altitude: args.altitude,
            heading: args.heading,
            pitch: args.pitch.to_radians(),
            roll: args.roll.to_radians(),
            orientation: args.orientation.into(),
            location_permission: args.location_permission.into(),
            jitter_meters: args.jitter.abs(),
            seed: args.seed,
            ticks: args.ticks,
            tick_interval: Duration::from_millis(args.tick_ms.max(1)),
            elevation: ElevationConfig {
                base_url: args.api_url.unwrap_or(defaults.base_url),
                dataset: args.dataset.unwrap_or(defaults.dataset),
                max_entries: args.max_cache_entries,
                ..defaults
            },
        }
    }
}

/// Parse launch parameters from command-line arguments.
pub fn parse() -> LaunchParams {
    LaunchParams::from_args(CliArgs::parse())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_from(args: &[&str]) -> LaunchParams {
        let args =
            CliArgs::try_parse_from(std::iter::once("geocamera").chain(args.iter().copied()))
                .unwrap();
        LaunchParams::from_args(args)
    }

    #[test]
    fn test_defaults() {
        let params = parse_from(&[]);
        assert_eq!(params.lat, DEFAULT_LAT);
        assert_eq!(params.orientation, DeviceOrientation::Portrait);
        assert_eq!(params.location_permission, AuthorizationStatus::Authorized);
        assert_eq!(params.elevation.dataset, "aster30m");
        assert!(params.elevation.max_entries.is_none());
        assert!((params.pitch - DEFAULT_PITCH.to_radians()).abs() < 1e-12);
    }

    #[test]
    fn test_overrides() {
        let params = parse_from(&[
            "--lat",
            "-33.857",
            "--lon",
            "151.215",
            "--orientation",
            "landscape-left",
            "--roll",
            "-30",
            "--location-permission",
            "denied",
            "--api-url",
            "http://localhost:5000/v1/",
            "--max-cache-entries",
            "16",
        ]);
        assert_eq!(params.lat, -33.857);
        assert_eq!(params.orientation, DeviceOrientation::LandscapeLeft);
        assert!((params.roll + 30.0_f64.to_radians()).abs() < 1e-12);
        assert_eq!(params.location_permission, AuthorizationStatus::Denied);
        assert_eq!(params.elevation.base_url, "http://localhost:5000/v1/");
        assert_eq!(params.elevation.max_entries, Some(16));
    }

    #[test]
    fn test_negative_heading() {
        let params = parse_from(&["--heading", "-10", "--pitch", "-5"]);
        assert_eq!(params.heading, -10.0);
        assert!((params.pitch + 5.0_f64.to_radians()).abs() < 1e-12);
    }
}
