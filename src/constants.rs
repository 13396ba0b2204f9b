// Semi-major axis a
pub(crate) const WGS84_A: f64 = 6_378_137.;
// Flattening
#[allow(clippy::unreadable_literal)]
pub(crate) const WGS84_F: f64 = 1.0 / 298.257223563;

// UTM central scale factor
pub(crate) const UTM_K0: f64 = 9996.0 / 10_000.;
// UPS central scale factor
pub(crate) const UPS_K0: f64 = 994.0 / 1000.;

// False origins, in metres
pub(crate) const UTM_FALSE_EASTING: f64 = 500_000.;
pub(crate) const UTM_FALSE_NORTHING_SOUTH: f64 = 10_000_000.;
pub(crate) const UPS_FALSE_ORIGIN: f64 = 2_000_000.;

// Latitude limits of the UTM projection
pub(crate) const UTM_MIN_LAT: f64 = -80.;
pub(crate) const UTM_MAX_LAT: f64 = 84.;
/// Overlap tolerated on inverse projection, in degrees
pub(crate) const ZONE_OVERLAP: f64 = 0.5;

/// Southern edge reported for the northern band touching the equator
pub(crate) const EQUATOR_BAND_SOUTH: f64 = 0.01;
