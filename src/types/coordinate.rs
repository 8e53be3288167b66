//! The geographic point every query resolves to.

use crate::validation::InvalidInput;
use serde::Serialize;
use std::fmt;

/// A validated latitude/longitude pair in decimal degrees.
///
/// Construction goes through [`Coordinate::new`], which rejects values outside
/// `[-90, 90]` / `[-180, 180]` (and NaN), so any `Coordinate` held by the engine
/// is known to be valid.
///
/// # Examples
///
/// ```
/// use climate_odds::Coordinate;
///
/// let delhi = Coordinate::new(28.61, 77.21).unwrap();
/// assert_eq!(delhi.latitude(), 28.61);
/// assert_eq!(delhi.longitude(), 77.21);
///
/// assert!(Coordinate::new(91.0, 0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidInput> {
        // `contains` is false for NaN, so non-finite values are rejected here too.
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(InvalidInput::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(InvalidInput::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_bounds_inclusive() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn test_coordinate_rejects_out_of_range() {
        assert_eq!(
            Coordinate::new(-90.5, 0.0),
            Err(InvalidInput::LatitudeOutOfRange(-90.5))
        );
        assert_eq!(
            Coordinate::new(0.0, 180.01),
            Err(InvalidInput::LongitudeOutOfRange(180.01))
        );
    }

    #[test]
    fn test_coordinate_rejects_nan() {
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::INFINITY).is_err());
    }
}
