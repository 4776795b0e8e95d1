//! Simulated location, heading and motion feeds.
//!
//! Each feed runs as its own task at its own rate and pushes
//! [`SensorEvent`]s into a shared feed channel, the way the platform
//! callbacks would.

use std::time::Duration;

use geocamera::{AttitudeSample, FeedSender, HeadingSample, LocationFix, SensorEvent};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::launch_params::LaunchParams;

/// Meters per degree of latitude (spherical approximation).
const METERS_PER_DEGREE: f64 = 111_320.0;

/// Interval between location fixes.
const LOCATION_INTERVAL: Duration = Duration::from_secs(1);
/// Interval between heading samples.
const HEADING_INTERVAL: Duration = Duration::from_millis(250);
/// Interval between attitude samples (60 Hz).
const MOTION_INTERVAL: Duration = Duration::from_micros(16_667);

/// Attitude noise amplitude in radians.
const ATTITUDE_NOISE: f64 = 0.002;
/// Heading noise amplitude in degrees.
const HEADING_NOISE: f64 = 0.5;

/// Which feeds to start.
#[derive(Debug, Clone, Copy)]
pub struct Feeds {
    /// Location and heading, gated by the location permission.
    pub location: bool,
    pub motion: bool,
}

/// Spawn the simulated feeds. They stop once the receiving side is closed.
pub fn spawn(params: &LaunchParams, feeds: Feeds, tx: &FeedSender) {
    let mut seeds = match params.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    // Orientation is reported once, like a device held still.
    let _ = tx.try_send(SensorEvent::Orientation(params.orientation));

    if feeds.location {
        tokio::spawn(location_feed(
            params.clone(),
            StdRng::seed_from_u64(seeds.random()),
            tx.clone(),
        ));
        tokio::spawn(heading_feed(
            params.heading,
            StdRng::seed_from_u64(seeds.random()),
            tx.clone(),
        ));
    }

    if feeds.motion {
        tokio::spawn(motion_feed(
            AttitudeSample::new(params.pitch, params.roll),
            StdRng::seed_from_u64(seeds.random()),
            tx.clone(),
        ));
    }
}

/// Random-walk the position by up to `jitter_meters` per fix.
async fn location_feed(params: LaunchParams, mut rng: StdRng, tx: FeedSender) {
    let mut interval = tokio::time::interval(LOCATION_INTERVAL);
    let (mut lat, mut lon) = (params.lat, params.lon);

    loop {
        interval.tick().await;

        let fix = LocationFix::new(lat, lon, params.altitude);
        if tx.send(SensorEvent::Location(fix)).await.is_err() {
            break;
        }

        if params.jitter_meters > 0.0 {
            let step = params.jitter_meters / METERS_PER_DEGREE;
            lat += rng.random_range(-step..=step);
            lon += rng.random_range(-step..=step) / lat.to_radians().cos().max(0.01);
        }
    }
}

async fn heading_feed(heading: f64, mut rng: StdRng, tx: FeedSender) {
    let mut interval = tokio::time::interval(HEADING_INTERVAL);

    loop {
        interval.tick().await;

        let noisy = heading + rng.random_range(-HEADING_NOISE..=HEADING_NOISE);
        let sample = HeadingSample::new(noisy.rem_euclid(360.0));
        if tx.send(SensorEvent::Heading(sample)).await.is_err() {
            break;
        }
    }
}

async fn motion_feed(attitude: AttitudeSample, mut rng: StdRng, tx: FeedSender) {
    let mut interval = tokio::time::interval(MOTION_INTERVAL);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        interval.tick().await;

        let sample = AttitudeSample::new(
            attitude.pitch_radians + rng.random_range(-ATTITUDE_NOISE..=ATTITUDE_NOISE),
            attitude.roll_radians + rng.random_range(-ATTITUDE_NOISE..=ATTITUDE_NOISE),
        );
        if tx.send(SensorEvent::Attitude(sample)).await.is_err() {
            break;
        }
    }
}
