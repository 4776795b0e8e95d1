//! Sensor-fusion readout core for a geotagging camera overlay.
//!
//! This crate combines the latest location fix, compass heading, device
//! attitude and a remotely fetched ground elevation into the values a camera
//! overlay displays: coordinates, altitude, heading, pitch, height above
//! ground and the slant distance to the point the camera is aimed at.
//!
//! # Design principles
//!
//! - **Injected state**: the [`SensorStore`] and [`ElevationCache`] are plain
//!   owned objects handed to the engine, never ambient singletons
//! - **Non-blocking reads**: lookups never wait on the network; a miss
//!   schedules one background fetch and reads as zero until it lands
//! - **Pure derivation**: [`Readout::compute`] is a function of a snapshot and
//!   an elevation lookup, so it is deterministic under test
//!
//! # Example
//!
//! ```ignore
//! use geocamera::{ElevationCache, ElevationConfig, Readout, SensorStore, TaskSpawner};
//!
//! let store = SensorStore::new();
//! let spawner = TaskSpawner::current().expect("inside a Tokio runtime");
//! let cache = ElevationCache::open_topo_data(&ElevationConfig::default(), spawner)?;
//!
//! // Every presentation tick:
//! let readout = Readout::compute(&store.snapshot(), &cache).format();
//! println!("{} m", readout.distance);
//! ```

pub mod elevation;
mod error;
pub mod permissions;
pub mod readout;
pub mod sensors;
mod spawn;
pub mod types;

pub use elevation::{
    ElevationCache, ElevationConfig, ElevationKey, ElevationLookup, ElevationSource, OpenTopoData,
};
pub use error::{Error, Result};
pub use readout::{FormattedReadout, Readout, SlantDistance};
pub use sensors::{FeedReceiver, FeedSender, SensorEvent, SensorSnapshot, SensorStore};
pub use spawn::TaskSpawner;
pub use types::{AttitudeSample, DeviceOrientation, HeadingSample, LocationFix};
