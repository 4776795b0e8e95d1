//! Ground elevation lookup: quantized keys, the HTTP source and the cache.

mod cache;
mod client;
mod key;

pub use cache::{ElevationCache, ElevationLookup};
pub use client::{
    ElevationConfig, ElevationResponse, ElevationResult, ElevationSource, FetchFuture,
    OpenTopoData, ResultLocation,
};
pub use key::{ElevationKey, KEY_DECIMALS, format_coordinate};
