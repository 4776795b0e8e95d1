//! Quantized coordinate keys for elevation lookups.

use std::fmt;

/// Number of decimal places coordinates are rounded to (about 110 m of
/// latitude per cell).
pub const KEY_DECIMALS: usize = 3;

/// Format a coordinate in degrees to [`KEY_DECIMALS`] places.
///
/// Values that round to zero from below print as `0.000`, not `-0.000`, so
/// the cell straddling the equator or prime meridian has a single key.
#[must_use]
pub fn format_coordinate(degrees: f64) -> String {
    let formatted = format!("{degrees:.prec$}", prec = KEY_DECIMALS);
    match formatted.strip_prefix('-') {
        Some(magnitude) if magnitude.bytes().all(|b| b == b'0' || b == b'.') => {
            magnitude.to_string()
        }
        _ => formatted,
    }
}

/// A `"{lat},{lon}"` key with both coordinates rounded to three decimals.
///
/// Serves both as the cache key and as the `locations` query parameter of
/// the elevation API. Every position inside the same 0.001 degree cell maps
/// to the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElevationKey(String);

impl ElevationKey {
    /// Build a key from raw coordinates in degrees.
    #[must_use]
    pub fn from_coordinates(latitude: f64, longitude: f64) -> Self {
        Self::from_formatted(&format_coordinate(latitude), &format_coordinate(longitude))
    }

    /// Build a key from coordinates that are already formatted for display.
    #[must_use]
    pub fn from_formatted(latitude: &str, longitude: &str) -> Self {
        Self(format!("{latitude},{longitude}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElevationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ElevationKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_format() {
        let key = ElevationKey::from_coordinates(46.557_89, 7.980_12);
        assert_eq!(key.as_str(), "46.558,7.980");
    }

    #[test]
    fn test_same_cell_same_key() {
        let cells = [
            ((46.5578, 7.9801), (46.5584, 7.9804)),
            ((-33.8568, 151.2153), (-33.8572, 151.2148)),
            ((0.0001, -0.0004), (-0.0002, 0.0003)),
        ];

        for ((lat_a, lon_a), (lat_b, lon_b)) in cells {
            let a = ElevationKey::from_coordinates(lat_a, lon_a);
            let b = ElevationKey::from_coordinates(lat_b, lon_b);
            assert_eq!(a, b, "{lat_a},{lon_a} vs {lat_b},{lon_b}");
        }
    }

    #[test]
    fn test_negative_zero_is_normalized() {
        assert_eq!(format_coordinate(-0.0004), "0.000");
        assert_eq!(format_coordinate(-0.0), "0.000");
        assert_eq!(format_coordinate(-0.0006), "-0.001");
        assert_eq!(format_coordinate(-12.3456), "-12.346");
    }

    #[test]
    fn test_neighbouring_cells_differ() {
        let a = ElevationKey::from_coordinates(46.5574, 7.98);
        let b = ElevationKey::from_coordinates(46.5586, 7.98);
        assert_ne!(a, b);
    }

    #[test]
    fn test_from_formatted_matches_from_coordinates() {
        let lat = 51.477_928;
        let lon = -0.001_545;
        let formatted = ElevationKey::from_formatted(&format!("{lat:.3}"), &format!("{lon:.3}"));
        assert_eq!(formatted, ElevationKey::from_coordinates(lat, lon));
        assert_eq!(formatted.to_string(), "51.478,-0.002");
    }
}
