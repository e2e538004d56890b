//! Fixed-point geographic coordinates.
//!
//! Latitude and longitude are stored as `i128` scaled by 10^18, so `3.4`
//! is persisted as `3_400000000000000000`, and persisted as 16 bytes
//! little-endian. Conversions to and from [`Decimal`] are exact at that
//! scale for every value a [`Decimal`] can carry.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{BazaarError, Result, constants};

/// A decimal value encoded as an integer scaled by 10^18.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Default, Serialize, Deserialize)]
pub struct Coordinate(pub i128);

impl Coordinate {
    #[must_use]
    pub fn raw(self) -> i128 {
        self.0
    }

    /// # Errors
    /// Returns `InvalidInput` if the raw value exceeds a `Decimal` mantissa.
    pub fn to_decimal(self) -> Result<Decimal> {
        Decimal::try_from_i128_with_scale(self.0, constants::COORDINATE_DECIMALS).map_err(|_| {
            BazaarError::InvalidInput {
                reason: format!("coordinate {} exceeds decimal range", self.0),
            }
        })
    }

    /// Encode a decimal, rounding anything past 18 places.
    ///
    /// # Errors
    /// Returns `InvalidInput` if the value cannot be held at 18 places.
    pub fn from_decimal(value: Decimal) -> Result<Self> {
        let mut scaled = value.round_dp(constants::COORDINATE_DECIMALS);
        scaled.rescale(constants::COORDINATE_DECIMALS);
        if scaled.scale() != constants::COORDINATE_DECIMALS {
            return Err(BazaarError::InvalidInput {
                reason: format!("coordinate {value} out of fixed-point range"),
            });
        }
        Ok(Self(scaled.mantissa()))
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_decimal() {
            Ok(value) => write!(f, "{}", value.normalize()),
            Err(_) => write!(f, "{}e-{}", self.0, constants::COORDINATE_DECIMALS),
        }
    }
}

/// A latitude / longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Location {
    pub latitude: Coordinate,
    pub longitude: Coordinate,
}

impl Location {
    #[must_use]
    pub fn new(latitude: i128, longitude: i128) -> Self {
        Self {
            latitude: Coordinate(latitude),
            longitude: Coordinate(longitude),
        }
    }

    pub fn from_decimals(latitude: Decimal, longitude: Decimal) -> Result<Self> {
        Ok(Self {
            latitude: Coordinate::from_decimal(latitude)?,
            longitude: Coordinate::from_decimal(longitude)?,
        })
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::field_bytes;

    #[test]
    fn decimal_encoding_matches_fixed_point() {
        let lat = Coordinate::from_decimal(Decimal::new(34, 1)).unwrap();
        assert_eq!(lat.raw(), 3_400_000_000_000_000_000);
        assert_eq!(lat.to_decimal().unwrap(), Decimal::new(34, 1));
    }

    #[test]
    fn negative_coordinates() {
        let long = Coordinate::from_decimal(Decimal::new(-62, 1)).unwrap();
        assert_eq!(long.raw(), -6_200_000_000_000_000_000);
        assert_eq!(format!("{long}"), "-6.2");
    }

    #[test]
    fn real_world_coordinates_round_trip() {
        let pairs = [
            (Decimal::new(-339, 1), Decimal::new(1512, 1)),
            (Decimal::new(90, 0), Decimal::new(-180, 0)),
        ];
        for (lat, long) in pairs {
            let location = Location::from_decimals(lat, long).unwrap();
            assert_eq!(location.latitude.to_decimal().unwrap(), lat);
            assert_eq!(location.longitude.to_decimal().unwrap(), long);
        }
        let sydney = Location::from_decimals(pairs[0].0, pairs[0].1).unwrap();
        assert_eq!(sydney.longitude.raw(), 151_200_000_000_000_000_000);
        assert_eq!(format!("{sydney}"), "(-33.9, 151.2)");
    }

    #[test]
    fn encodes_as_sixteen_bytes_little_endian() {
        let bytes = field_bytes(&Coordinate(-1)).unwrap();
        assert_eq!(bytes, vec![0xFF; 16]);
        let bytes = field_bytes(&Location::new(1, 2)).unwrap();
        assert_eq!(bytes.len(), 32);
        assert_eq!(bytes[0], 1);
        assert_eq!(bytes[16], 2);
    }

    #[test]
    fn raw_beyond_decimal_range_is_reported() {
        let huge = Coordinate(i128::MAX);
        assert!(matches!(
            huge.to_decimal(),
            Err(BazaarError::InvalidInput { .. })
        ));
        assert!(format!("{huge}").ends_with("e-18"));
    }

    #[test]
    fn location_display() {
        let loc = Location::new(3_400_000_000_000_000_000, 6_200_000_000_000_000_000);
        assert_eq!(format!("{loc}"), "(3.4, 6.2)");
    }
}
