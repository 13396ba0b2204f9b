use std::fmt::Display;

use crate::{coords::latlon::LatLon, utility::GeoMath};

/// A geographic region bounded by two parallels and two meridians.
///
/// `north >= south` always holds. A box whose `west` is greater than its
/// `east` straddles the antimeridian.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox {
    pub(crate) north: f64,
    pub(crate) south: f64,
    pub(crate) east: f64,
    pub(crate) west: f64,
}

impl BoundingBox {
    /// Internal-only constructor; callers keep `north >= south`.
    pub(crate) fn new(north: f64, south: f64, east: f64, west: f64) -> BoundingBox {
        Self {
            north,
            south,
            east,
            west,
        }
    }

    /// The degenerate box holding only `point`.
    pub(crate) fn from_point(point: &LatLon) -> BoundingBox {
        Self::new(point.latitude, point.latitude, point.longitude, point.longitude)
    }

    #[inline]
    pub fn north(&self) -> f64 {
        self.north
    }

    #[inline]
    pub fn south(&self) -> f64 {
        self.south
    }

    #[inline]
    pub fn east(&self) -> f64 {
        self.east
    }

    #[inline]
    pub fn west(&self) -> f64 {
        self.west
    }

    /// Whether the box wraps across the 180° meridian.
    pub fn crosses_antimeridian(&self) -> bool {
        self.west > self.east
    }

    /// Whether the box has collapsed to a single point.
    pub fn is_point(&self) -> bool {
        self.north.eps_eq(self.south) && self.east.eps_eq(self.west)
    }

    /// Whether `point` lies inside the box or on its edge.
    ///
    /// # Example
    ///
    /// ```
    /// use usngconvert::{parse_utm_ups_string, to_bounding_box, LatLon};
    ///
    /// let coord = parse_utm_ups_string("13 234789mE 234789mN N").unwrap();
    /// let bbox = to_bounding_box(&coord).unwrap();
    ///
    /// assert!(bbox.contains(&LatLon::create(4.0, -105.0).unwrap()));
    /// assert!(!bbox.contains(&LatLon::create(-4.0, -105.0).unwrap()));
    /// ```
    pub fn contains(&self, point: &LatLon) -> bool {
        let lat = point.latitude;
        let lon = point.longitude;

        if !(self.south..=self.north).contains(&lat) {
            return false;
        }

        if self.crosses_antimeridian() {
            lon >= self.west || lon <= self.east
        } else {
            (self.west..=self.east).contains(&lon)
        }
    }

    /// Corners as `[south-west, north-west, north-east, south-east]`.
    pub fn corners(&self) -> [LatLon; 4] {
        [
            LatLon::new(self.south, self.west),
            LatLon::new(self.north, self.west),
            LatLon::new(self.north, self.east),
            LatLon::new(self.south, self.east),
        ]
    }
}

impl Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut buf = ryu::Buffer::new();
        let north = buf.format(self.north).to_owned();
        let south = buf.format(self.south).to_owned();
        let east = buf.format(self.east).to_owned();
        let west = buf.format(self.west);
        write!(f, "N {north} S {south} E {east} W {west}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn antimeridian_box_contains_both_sides() {
        let bbox = BoundingBox::new(10., 0., -179., 179.);
        assert!(bbox.crosses_antimeridian());
        assert!(bbox.contains(&LatLon::new(5., 179.5)));
        assert!(bbox.contains(&LatLon::new(5., -179.5)));
        assert!(!bbox.contains(&LatLon::new(5., 0.)));
    }

    #[test]
    fn point_box() {
        let bbox = BoundingBox::from_point(&LatLon::new(1., 2.));
        assert!(bbox.is_point());
        assert!(bbox.contains(&LatLon::new(1., 2.)));
    }

    #[test]
    fn corners_run_clockwise_from_south_west() {
        let bbox = BoundingBox::new(8., 0.01, -102., -108.);
        let corners = bbox.corners();
        assert_eq!(corners[0], LatLon::new(0.01, -108.));
        assert_eq!(corners[2], LatLon::new(8., -102.));
    }

    #[test]
    fn display() {
        let bbox = BoundingBox::new(8., 0.01, -102., -108.);
        assert_eq!(bbox.to_string(), "N 8.0 S 0.01 E -102.0 W -108.0");
    }
}
