use std::{fmt::Display, str::FromStr};

use crate::{Error, ParseCoord, coords::utm::{UtmUps, ZoneHint}};

/// Representation of a WGS84 Latitude/Longitude point. Can be converted
/// to/from [`UtmUps`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LatLon {
    #[cfg_attr(feature = "serde", serde(alias = "lat"))]
    pub(crate) latitude: f64,
    #[cfg_attr(feature = "serde", serde(alias = "lon"))]
    pub(crate) longitude: f64,
}

impl LatLon {
    /// Internal-only constructor that doesn't check the bounds of lat/lon
    pub(crate) fn new(lat: f64, lon: f64) -> LatLon {
        Self {
            latitude: lat,
            longitude: lon,
        }
    }

    /// Tries to create a latitude/longitude point from a lat/lon pair. First checks if the
    /// values are valid:
    /// * Latitude must be in range [-90,90]
    /// * Longitude must be in range [-180,180]
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfProjectionDomain`] if either latitude or longitude are invalid.
    ///
    /// # Usage
    ///
    /// ```
    /// use usngconvert::LatLon;
    ///
    /// let coord = LatLon::create(40.748333, -73.985278);
    ///
    /// assert!(coord.is_ok());
    ///
    /// let coord = coord.unwrap();
    ///
    /// assert_eq!(coord.latitude(), 40.748333);
    /// assert_eq!(coord.longitude(), -73.985278);
    ///
    /// let invalid_coord_lat = LatLon::create(100.0, 0.0);
    /// assert!(invalid_coord_lat.is_err());
    ///
    /// let invalid_coord_lon = LatLon::create(0.0, -200.0);
    /// assert!(invalid_coord_lon.is_err());
    /// ```
    pub fn create(lat: f64, lon: f64) -> Result<LatLon, Error> {
        if !(-90_f64..=90_f64).contains(&lat) {
            Err(Error::OutOfProjectionDomain(format!(
                "Latitude {lat} outside of valid range [-90, 90]"
            )))
        } else if !(-180_f64..=180_f64).contains(&lon) {
            Err(Error::OutOfProjectionDomain(format!(
                "Longitude {lon} outside of valid range [-180, 180]"
            )))
        } else {
            Ok(LatLon::new(lat, lon))
        }
    }

    /// Returns the latitude value.
    #[inline]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Returns the longitude value.
    #[inline]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Returns whether the current point is in the northern hemisphere.
    ///
    /// # Example
    ///
    /// ```
    /// use usngconvert::LatLon;
    ///
    /// let coord = LatLon::create(40.748333, -73.985278).unwrap();
    /// assert!(coord.is_north());
    ///
    /// let coord = LatLon::create(-40.748333, -73.985278).unwrap();
    /// assert!(!coord.is_north());
    /// ```
    pub fn is_north(&self) -> bool {
        self.latitude.is_sign_positive()
    }

    /// Converts from [`UtmUps`] to [`LatLon`]
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfProjectionDomain`] if the coordinate lies outside
    /// its zone's envelope.
    ///
    /// # Usage
    ///
    /// ```
    /// use usngconvert::{LatLon, UtmUps};
    ///
    /// let coord = LatLon::create(40.748333, -73.985278).unwrap();
    /// let coord_utm = UtmUps::create(18, true, 585664.121, 4511315.422).unwrap();
    ///
    /// let converted = LatLon::from_utmups(&coord_utm).unwrap();
    ///
    /// // Check if the converted coordinate is accurate to 6 decimals (same as reference)
    /// assert!((converted.latitude() - coord.latitude()).abs() < 1e-6);
    /// assert!((converted.longitude() - coord.longitude()).abs() < 1e-6);
    /// ```
    pub fn from_utmups(value: &UtmUps) -> Result<LatLon, Error> {
        value.to_latlon()
    }

    /// Converts from [`LatLon`] to [`UtmUps`], picking the standard zone.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfProjectionDomain`] if the projected point falls
    /// outside the zone's envelope.
    ///
    /// # Usage
    ///
    /// ```
    /// use usngconvert::LatLon;
    ///
    /// let coord = LatLon::create(40.748333, -73.985278).unwrap();
    /// let converted = coord.to_utmups().unwrap();
    ///
    /// assert_eq!(converted.zone(), 18);
    /// assert!(converted.is_north());
    /// // Check if the converted coordinate is accurate to 3 decimals (same as reference)
    /// assert!((converted.easting() - 585664.121).abs() < 1e-3);
    /// assert!((converted.northing() - 4511315.422).abs() < 1e-3);
    /// ```
    pub fn to_utmups(&self) -> Result<UtmUps, Error> {
        UtmUps::from_latlon(self, ZoneHint::Standard)
    }
}

impl FromStr for LatLon {
    type Err = Error;

    /// Parses `"<lat> <lon>"`, separated by whitespace and/or a comma.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut pieces = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|piece| !piece.is_empty());

        let mut next_value = |label: &str| -> Result<f64, Error> {
            let piece = pieces
                .next()
                .ok_or_else(|| Error::MalformedInput(format!("Missing {label} in '{s}'")))?;
            piece
                .parse()
                .map_err(|_| Error::MalformedInput(format!("{label} '{piece}' is not a number")))
        };

        let lat = next_value("latitude")?;
        let lon = next_value("longitude")?;

        if pieces.next().is_some() {
            return Err(Error::MalformedInput(format!("Trailing text after longitude in '{s}'")));
        }

        LatLon::create(lat, lon)
    }
}

impl ParseCoord for LatLon {
    fn parse_coord(value: &str) -> Result<Self, Error> {
        Self::from_str(value)
    }
}

impl Display for LatLon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut buf = ryu::Buffer::new();
        let lat = buf.format(self.latitude);
        let mut buf = ryu::Buffer::new();
        let lon = buf.format(self.longitude);
        write!(
            f,
            "{lat} {lon}",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lat_lon_text() {
        let coord: LatLon = "40.5, -73.25".parse().unwrap();
        assert_eq!(coord.latitude(), 40.5);
        assert_eq!(coord.longitude(), -73.25);

        let coord: LatLon = "  -12   130 ".parse().unwrap();
        assert_eq!(coord.latitude(), -12.0);
        assert_eq!(coord.longitude(), 130.0);
    }

    #[test]
    fn rejects_bad_lat_lon_text() {
        assert!(matches!("40.5".parse::<LatLon>(), Err(Error::MalformedInput(_))));
        assert!(matches!("40.5 abc".parse::<LatLon>(), Err(Error::MalformedInput(_))));
        assert!(matches!("1 2 3".parse::<LatLon>(), Err(Error::MalformedInput(_))));
        assert!(matches!("95 2".parse::<LatLon>(), Err(Error::OutOfProjectionDomain(_))));
    }

    #[test]
    fn longitude_bounds_are_inclusive() {
        assert!(LatLon::create(0., 180.).is_ok());
        assert!(LatLon::create(0., -180.).is_ok());
        assert!(LatLon::create(-90., 0.).is_ok());
    }

    #[test]
    fn display_uses_shortest_repr() {
        let coord = LatLon::create(1.5, -2.25).unwrap();
        assert_eq!(coord.to_string(), "1.5 -2.25");
    }
}
