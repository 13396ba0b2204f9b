use lazy_static::lazy_static;

use crate::{
    band::{GridSystem, Hemisphere, LatitudeBand, PolarZone, ZoneLetter},
    constants::{
        UPS_FALSE_ORIGIN, UTM_FALSE_EASTING, UTM_FALSE_NORTHING_SOUTH, UTM_MAX_LAT, UTM_MIN_LAT,
        ZONE_OVERLAP,
    },
    coords::{bbox::BoundingBox, latlon::LatLon, usng::{self, Usng}},
    precision::PrecisionLevel,
    projections::{polar_stereographic::PolarStereographic, transverse_mercator::TransverseMercator},
    utility::{dms, GeoMath},
    Error, ParseCoord, ThisOrThat,
};

pub(crate) mod zonespec {
    pub(crate) const UPS: i32 = 0;
    pub(crate) const MINZONE: i32 = 0;
    pub(crate) const MINUTMZONE: i32 = 1;
    pub(crate) const MAXUTMZONE: i32 = 60;
    pub(crate) const MAXZONE: i32 = 60;
}

lazy_static! {
    static ref TM: TransverseMercator = TransverseMercator::utm();
    static ref PS: PolarStereographic = PolarStereographic::ups();
}

const MIN_EASTING: [i32; 4] = [
    usng::MINUPS_S_IND * usng::TILE,
    usng::MINUPS_N_IND * usng::TILE,
    usng::MINUTMCOL * usng::TILE,
    usng::MINUTMCOL * usng::TILE,
];

const MAX_EASTING: [i32; 4] = [
    usng::MAXUPS_S_IND * usng::TILE,
    usng::MAXUPS_N_IND * usng::TILE,
    usng::MAXUTMCOL * usng::TILE,
    usng::MAXUTMCOL * usng::TILE,
];

const MIN_NORTHING: [i32; 4] = [
    usng::MINUPS_S_IND * usng::TILE,
    usng::MINUPS_N_IND * usng::TILE,
    usng::MINUTM_S_ROW * usng::TILE,
    (usng::MINUTM_N_ROW + usng::MINUTM_S_ROW - usng::MAXUTM_S_ROW) * usng::TILE,
];

const MAX_NORTHING: [i32; 4] = [
    usng::MAXUPS_S_IND * usng::TILE,
    usng::MAXUPS_N_IND * usng::TILE,
    (usng::MAXUTM_S_ROW + usng::MAXUTM_N_ROW - usng::MINUTM_N_ROW) * usng::TILE,
    usng::MAXUTM_N_ROW * usng::TILE,
];

/// Which zone [`UtmUps::from_latlon`] projects into.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ZoneHint {
    /// UTM between 80°S and 84°N, UPS beyond, with the Norway and Svalbard
    /// exceptions applied.
    #[default]
    Standard,
    /// The standard UTM zone for the longitude, regardless of latitude.
    Utm,
    /// UPS, regardless of latitude.
    Ups,
    /// A specific zone number, `0` meaning UPS.
    Zone(i32),
}

/// Representation of a WGS84
/// [UTM](https://en.wikipedia.org/wiki/Universal_Transverse_Mercator_coordinate_system)
/// /
/// [UPS](https://en.wikipedia.org/wiki/Universal_polar_stereographic_coordinate_system)
/// coordinate. A zone value of `0` designates UPS.
///
/// Besides the projected position it carries the zone letter (latitude band or
/// polar zone) and the [`PrecisionLevel`] it is known to, which decides whether
/// it stands for a point or a region.
#[allow(clippy::module_name_repetitions)]
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UtmUps {
    pub(crate) zone: i32,
    #[cfg_attr(feature = "serde", serde(alias = "north", alias = "is_north"))]
    pub(crate) northp: bool,
    pub(crate) easting: f64,
    pub(crate) northing: f64,
    pub(crate) letter: ZoneLetter,
    pub(crate) precision: PrecisionLevel,
}

impl UtmUps {
    /// Internal-only constructor that doesn't check the coordinate
    pub(crate) fn new(
        zone: i32,
        northp: bool,
        easting: f64,
        northing: f64,
        letter: ZoneLetter,
        precision: PrecisionLevel,
    ) -> UtmUps {
        Self {
            zone,
            northp,
            easting,
            northing,
            letter,
            precision,
        }
    }

    /// Tries to create an exact UTM or UPS point from its constituent parts.
    /// Zone of `0` designates UPS, otherwise it is UTM. The latitude band (or
    /// polar zone) is derived from the position.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfProjectionDomain`] if the zone is outside the range
    /// `[0, 60]` or the easting/northing lie outside the zone's envelope.
    ///
    /// # Usage
    ///
    /// ```
    /// use usngconvert::UtmUps;
    ///
    /// let coord = UtmUps::create(18, true, 585664.121, 4511315.422);
    ///
    /// assert!(coord.is_ok());
    ///
    /// let coord = coord.unwrap();
    ///
    /// assert_eq!(coord.zone(), 18);
    /// assert_eq!(coord.is_north(), true);
    /// assert_eq!(coord.zone_letter().letter(), 'T');
    /// assert!((coord.easting() - 585664.121).abs() < 1e-3);
    /// assert!((coord.northing() - 4511315.422).abs() < 1e-3);
    ///
    /// let invalid_coord_zone_neg = UtmUps::create(-10, true, 585664.121, 4511315.422);
    /// assert!(invalid_coord_zone_neg.is_err());
    ///
    /// let invalid_coord_zone_too_big = UtmUps::create(70, true, 585664.121, 4511315.422);
    /// assert!(invalid_coord_zone_too_big.is_err());
    /// ```
    pub fn create(zone: i32, northp: bool, easting: f64, northing: f64) -> Result<UtmUps, Error> {
        // Make sure zone is a valid value
        if !(zonespec::MINZONE..=zonespec::MAXZONE).contains(&zone) {
            return Err(Error::OutOfProjectionDomain(format!("Zone {zone} not in [0, 60]")));
        }

        let utmp = zone != zonespec::UPS;

        check_coords(utmp, northp, easting, northing)?;

        let letter = if utmp {
            let lat = inverse(zone, northp, easting, northing).latitude;
            ZoneLetter::Band(band_in_hemisphere(northp, lat))
        } else {
            ZoneLetter::Polar(PolarZone::from_position(northp, easting >= UPS_FALSE_ORIGIN))
        };

        Ok(UtmUps::new(zone, northp, easting, northing, letter, PrecisionLevel::Exact))
    }

    /// Returns the zone number, `0` for UPS.
    pub fn zone(&self) -> i32 {
        self.zone
    }

    /// Returns whether this is a UTM or a UPS coordinate.
    pub fn system(&self) -> GridSystem {
        self.is_utm().ternary(GridSystem::Utm, GridSystem::Ups)
    }

    pub fn is_utm(&self) -> bool {
        self.zone != zonespec::UPS
    }

    /// Returns the latitude band (UTM) or polar zone (UPS) letter.
    pub fn zone_letter(&self) -> ZoneLetter {
        self.letter
    }

    /// Returns the latitude band, `None` for UPS coordinates.
    pub fn latitude_band(&self) -> Option<LatitudeBand> {
        self.letter.band()
    }

    pub fn hemisphere(&self) -> Hemisphere {
        Hemisphere::from_northp(self.northp)
    }

    /// Returns whether the coordinate is in the northern hemisphere.
    ///
    /// # Example
    /// ```
    /// use usngconvert::UtmUps;
    ///
    /// let coord = UtmUps::create(18, true, 585664.121, 4511315.422).unwrap();
    /// assert_eq!(coord.is_north(), true);
    /// ```
    pub fn is_north(&self) -> bool {
        self.northp
    }

    /// Returns the easting in metres, false easting included.
    pub fn easting(&self) -> f64 {
        self.easting
    }

    /// Returns the northing in metres, false northing included.
    pub fn northing(&self) -> f64 {
        self.northing
    }

    pub fn precision(&self) -> PrecisionLevel {
        self.precision
    }

    /// Returns a copy of this coordinate known only to `precision`.
    ///
    /// ```
    /// use usngconvert::{PrecisionLevel, UtmUps};
    ///
    /// let coord = UtmUps::create(18, true, 585664.121, 4511315.422)
    ///     .unwrap()
    ///     .with_precision(PrecisionLevel::GridZone);
    /// assert_eq!(coord.precision(), PrecisionLevel::GridZone);
    /// ```
    pub fn with_precision(&self, precision: PrecisionLevel) -> UtmUps {
        UtmUps { precision, ..*self }
    }

    /// Projects a [`LatLon`] into UTM/UPS as an exact point.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfProjectionDomain`] if the latitude is outside the
    /// chosen projection's range (UTM `[-80, 84]`, UPS beyond those limits),
    /// if an explicit zone is not in `[0, 60]`, or if the result falls outside
    /// the zone's envelope.
    ///
    /// # Usage
    ///
    /// ```
    /// use usngconvert::{LatLon, UtmUps, ZoneHint};
    ///
    /// let coord = LatLon::create(40.748333, -73.985278).unwrap();
    ///
    /// let converted = UtmUps::from_latlon(&coord, ZoneHint::Standard).unwrap();
    /// assert_eq!(converted.zone(), 18);
    /// assert!((converted.easting() - 585664.121).abs() < 1e-3);
    /// assert!((converted.northing() - 4511315.422).abs() < 1e-3);
    ///
    /// // The neighbouring zone is still close enough to project into
    /// let neighbour = UtmUps::from_latlon(&coord, ZoneHint::Zone(19)).unwrap();
    /// assert_eq!(neighbour.zone(), 19);
    ///
    /// assert!(UtmUps::from_latlon(&coord, ZoneHint::Ups).is_err());
    /// ```
    pub fn from_latlon(value: &LatLon, hint: ZoneHint) -> Result<UtmUps, Error> {
        let (lat, lon) = (value.latitude, value.longitude);
        let northp = value.is_north();
        let zone = standard_zone(lat, lon, hint)?;
        let utmp = zone != zonespec::UPS;

        if utmp && !(UTM_MIN_LAT..=UTM_MAX_LAT).contains(&lat) {
            return Err(Error::OutOfProjectionDomain(
                format!("Latitude {lat} outside UTM range [{UTM_MIN_LAT}, {UTM_MAX_LAT}]")
            ));
        }
        if !utmp && !northp.ternary(lat >= UTM_MAX_LAT, lat <= UTM_MIN_LAT) {
            let hemisphere = northp.ternary("N", "S");
            return Err(Error::OutOfProjectionDomain(
                format!("Latitude {lat} outside UPS range for {hemisphere} hemisphere")
            ));
        }

        let (x, y) = if utmp {
            TM.from_latlon(central_meridian(zone), lat, lon)
        } else {
            PS.from_latlon(northp, lat, lon)
        };

        let (x0, y0) = false_origin(utmp, northp);
        let (easting, northing) = (x + x0, y + y0);

        check_coords(utmp, northp, easting, northing)?;

        let letter = if utmp {
            ZoneLetter::Band(band_in_hemisphere(northp, lat))
        } else {
            ZoneLetter::Polar(PolarZone::from_position(northp, easting >= UPS_FALSE_ORIGIN))
        };

        Ok(UtmUps::new(zone, northp, easting, northing, letter, PrecisionLevel::Exact))
    }

    /// Converts from [`UtmUps`] to [`LatLon`] by inverse projection of the
    /// stored easting/northing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfProjectionDomain`] if the easting/northing lie
    /// outside the zone's envelope, or the resulting latitude is outside the
    /// projection's range (allowing the half-degree MGRS overlap).
    ///
    /// # Usage
    ///
    /// ```
    /// use usngconvert::{LatLon, UtmUps};
    ///
    /// let coord = LatLon::create(40.748333, -73.985278).unwrap();
    /// let coord_utm = UtmUps::create(18, true, 585664.121, 4511315.422).unwrap();
    ///
    /// let converted = coord_utm.to_latlon().unwrap();
    ///
    /// // Check if the converted coordinate is accurate to 6 decimals (same as reference)
    /// assert!((converted.latitude() - coord.latitude()).abs() < 1e-6);
    /// assert!((converted.longitude() - coord.longitude()).abs() < 1e-6);
    /// ```
    pub fn to_latlon(&self) -> Result<LatLon, Error> {
        let utmp = self.is_utm();
        check_coords(utmp, self.northp, self.easting, self.northing)?;

        let coord = inverse(self.zone, self.northp, self.easting, self.northing);
        let lat = coord.latitude;

        let in_range = if utmp {
            (UTM_MIN_LAT - ZONE_OVERLAP..=UTM_MAX_LAT + ZONE_OVERLAP).contains(&lat)
        } else {
            self.northp
                .ternary(lat >= UTM_MAX_LAT - ZONE_OVERLAP, lat <= UTM_MIN_LAT + ZONE_OVERLAP)
        };

        if !in_range {
            return Err(Error::OutOfProjectionDomain(format!(
                "{self} projects to latitude {lat:.4}, outside the {} range",
                utmp.ternary("UTM", "UPS"),
            )));
        }

        Ok(coord)
    }

    /// Returns the geographic region this coordinate stands for at its
    /// precision. See [`crate::to_bounding_box`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfProjectionDomain`] if a grid square lies outside
    /// the zone's envelope.
    pub fn to_bounding_box(&self) -> Result<BoundingBox, Error> {
        crate::bounds::to_bounding_box(self)
    }

    /// Parses the projected form, e.g. `13N 234789mE 234789mN` or
    /// `A 2347891mE 2347891mN S`. See [`crate::parse_utm_ups_string`].
    ///
    /// # Errors
    ///
    /// See [`crate::parse_utm_ups_string`].
    pub fn parse_str(value: &str) -> Result<UtmUps, Error> {
        crate::parser::parse_utm_ups(value)
    }

    /// Wraps this coordinate as a USNG grid reference at `precision`.
    ///
    /// # Errors
    ///
    /// See [`Usng::from_utmups`].
    ///
    /// # Usage
    ///
    /// ```
    /// use usngconvert::{PrecisionLevel, UtmUps};
    ///
    /// let coord = UtmUps::create(18, true, 585664.121, 4511315.422).unwrap();
    /// let usng = coord.to_usng(PrecisionLevel::Meter).unwrap();
    ///
    /// assert_eq!(usng.to_string(), "18T WL 85664 11315");
    /// ```
    pub fn to_usng(&self, precision: PrecisionLevel) -> Result<Usng, Error> {
        Usng::from_utmups(self, precision)
    }
}

pub(crate) fn central_meridian(zone: i32) -> f64 {
    6.0 * f64::from(zone) - 183.
}

fn false_origin(utmp: bool, northp: bool) -> (f64, f64) {
    if utmp {
        (UTM_FALSE_EASTING, northp.ternary(0., UTM_FALSE_NORTHING_SOUTH))
    } else {
        (UPS_FALSE_ORIGIN, UPS_FALSE_ORIGIN)
    }
}

/// Inverse projection without any range checks.
pub(crate) fn inverse(zone: i32, northp: bool, easting: f64, northing: f64) -> LatLon {
    let utmp = zone != zonespec::UPS;
    let (x0, y0) = false_origin(utmp, northp);
    let (x, y) = (easting - x0, northing - y0);

    if utmp {
        TM.to_latlon(central_meridian(zone), x, y)
    } else {
        PS.to_latlon(northp, x, y)
    }
}

/// Latitude of the point on the zone's central meridian with the given
/// northing.
pub(crate) fn meridian_latitude(northp: bool, northing: f64) -> f64 {
    let (_, y0) = false_origin(true, northp);
    TM.to_latlon(0., 0., northing - y0).latitude
}

/// The band enclosing `lat`, kept on the `northp` side of the equator.
pub(crate) fn band_in_hemisphere(northp: bool, lat: f64) -> LatitudeBand {
    let index = LatitudeBand::from_latitude(lat).index();
    LatitudeBand::from_index(northp.ternary(index.max(0), index.min(-1)))
}

// Map lat/lon to zone in either UTM or UPS based on position.
#[allow(clippy::cast_possible_truncation)]
fn utm_zone(lat: f64, lon: f64) -> i32 {
    let mut lon_int = lon.ang_normalize().floor() as i32;
    if lon_int == dms::HD {
        lon_int = -dms::HD;
    }

    let mut zone = (lon_int + 186) / 6;
    let band = LatitudeBand::from_latitude(lat).index();
    // The Norway exception
    if band == 7 && zone == 31 && lon_int >= 3 {
        zone = 32;
    }
    // The Svalbard exception
    else if band == 9 && (0..42).contains(&lon_int) {
        zone = 2 * ((lon_int + 183) / 12) + 1;
    }

    zone
}

fn standard_zone(lat: f64, lon: f64, hint: ZoneHint) -> Result<i32, Error> {
    match hint {
        ZoneHint::Zone(zone) if (zonespec::MINZONE..=zonespec::MAXZONE).contains(&zone) => Ok(zone),
        ZoneHint::Zone(zone) => {
            Err(Error::OutOfProjectionDomain(format!("Zone {zone} not in [0, 60]")))
        }
        ZoneHint::Ups => Ok(zonespec::UPS),
        ZoneHint::Utm => Ok(utm_zone(lat, lon)),
        ZoneHint::Standard => Ok(
            (UTM_MIN_LAT..UTM_MAX_LAT)
                .contains(&lat)
                .ternary_lazy(|| utm_zone(lat, lon), || zonespec::UPS)
        ),
    }
}

/// Checks that an easting/northing pair lies inside the envelope of its
/// projection and hemisphere, allowing 100km of slop on every side.
pub(crate) fn check_coords(utmp: bool, northp: bool, x: f64, y: f64) -> Result<(), Error> {
    let slop = f64::from(usng::TILE);

    let ind = utmp.ternary(2, 0) + northp.ternary(1, 0);
    if !(x >= f64::from(MIN_EASTING[ind]) - slop && x <= f64::from(MAX_EASTING[ind]) + slop) {
        return Err(Error::OutOfProjectionDomain(
            format!(
                "Easting {:.2}km not in {} range for {} hemisphere [{:.2}km, {:.2}km]",
                x / 1000.0,
                utmp.ternary("UTM", "UPS"),
                northp.ternary("N", "S"),
                (f64::from(MIN_EASTING[ind]) - slop) / 1000.0,
                (f64::from(MAX_EASTING[ind]) + slop) / 1000.0,
            )
        ));
    }

    if !(y >= f64::from(MIN_NORTHING[ind]) - slop && y <= f64::from(MAX_NORTHING[ind]) + slop) {
        return Err(Error::OutOfProjectionDomain(
            format!(
                "Northing {:.2}km not in {} range for {} hemisphere [{:.2}km, {:.2}km]",
                y / 1000.0,
                utmp.ternary("UTM", "UPS"),
                northp.ternary("N", "S"),
                (f64::from(MIN_NORTHING[ind]) - slop) / 1000.0,
                (f64::from(MAX_NORTHING[ind]) + slop) / 1000.0,
            )
        ));
    }

    Ok(())
}

impl ParseCoord for UtmUps {
    fn parse_coord(value: &str) -> Result<Self, Error> {
        Self::parse_str(value)
    }
}

impl std::str::FromStr for UtmUps {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for UtmUps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_utm() {
            write!(f, "{}", self.zone)?;
        }
        write!(
            f,
            "{} {:.0}mE {:.0}mN",
            self.letter.letter(),
            self.easting,
            self.northing,
        )
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn central_meridians() {
        assert_abs_diff_eq!(central_meridian(1), -177.);
        assert_abs_diff_eq!(central_meridian(13), -105.);
        assert_abs_diff_eq!(central_meridian(60), 177.);
    }

    #[test]
    fn standard_zone_applies_exceptions() {
        // Bergen sits in 32V despite being west of 6°E
        assert_eq!(utm_zone(60.39, 5.32), 32);
        // Longyearbyen: 33X
        assert_eq!(utm_zone(78.22, 15.65), 33);
        assert_eq!(utm_zone(0., 179.999), 60);
        assert_eq!(utm_zone(0., 180.), 1);
        assert_eq!(standard_zone(84., 0., ZoneHint::Standard).unwrap(), zonespec::UPS);
        assert_eq!(standard_zone(-80., 0., ZoneHint::Standard).unwrap(), 31);
        assert!(standard_zone(0., 0., ZoneHint::Zone(61)).is_err());
    }

    #[test]
    fn forward_derives_letters() {
        let coord = UtmUps::from_latlon(&LatLon::new(-71.2, -105.), ZoneHint::Standard).unwrap();
        assert_eq!(coord.zone(), 13);
        assert_eq!(coord.hemisphere(), Hemisphere::South);
        assert_eq!(coord.zone_letter().letter(), 'D');
        assert_eq!(coord.precision(), PrecisionLevel::Exact);

        let coord = UtmUps::from_latlon(&LatLon::new(-85., -10.), ZoneHint::Standard).unwrap();
        assert_eq!(coord.system(), GridSystem::Ups);
        assert_eq!(coord.zone_letter(), ZoneLetter::Polar(PolarZone::A));

        let coord = UtmUps::from_latlon(&LatLon::new(88., 10.), ZoneHint::Standard).unwrap();
        assert_eq!(coord.zone_letter(), ZoneLetter::Polar(PolarZone::Z));
    }

    #[test]
    fn forward_enforces_domains() {
        let err = UtmUps::from_latlon(&LatLon::new(85., 10.), ZoneHint::Utm);
        assert!(matches!(err, Err(Error::OutOfProjectionDomain(_))));

        let err = UtmUps::from_latlon(&LatLon::new(60., 10.), ZoneHint::Ups);
        assert!(matches!(err, Err(Error::OutOfProjectionDomain(_))));

        // Far outside zone 13, the easting leaves the envelope
        let err = UtmUps::from_latlon(&LatLon::new(10., 0.), ZoneHint::Zone(13));
        assert!(matches!(err, Err(Error::OutOfProjectionDomain(_))));

        let ok = UtmUps::from_latlon(&LatLon::new(85., 10.), ZoneHint::Zone(0)).unwrap();
        assert_eq!(ok.system(), GridSystem::Ups);
    }

    #[test]
    fn inverse_checks_envelope() {
        let coord = UtmUps::new(
            13, false, 234_789., 234_789.,
            ZoneLetter::Band(LatitudeBand::from_letter('C').unwrap()),
            PrecisionLevel::GridZone,
        );
        assert!(matches!(coord.to_latlon(), Err(Error::OutOfProjectionDomain(_))));
    }

    #[test]
    fn equator_latitude_keeps_southern_band() {
        assert_eq!(band_in_hemisphere(false, 0.).letter(), 'M');
        assert_eq!(band_in_hemisphere(true, -0.2).letter(), 'N');
        assert_eq!(band_in_hemisphere(true, 40.).letter(), 'T');
    }

    #[test]
    fn meridian_latitude_follows_northing() {
        assert_abs_diff_eq!(meridian_latitude(true, 0.), 0., epsilon = 1e-12);
        let lat = meridian_latitude(false, 2_100_000.);
        assert!((-72.0..-64.0).contains(&lat), "{lat}");
    }

    #[test]
    fn display_writes_projected_form() {
        let coord = UtmUps::create(13, true, 234_789., 234_789.).unwrap();
        assert_eq!(coord.to_string(), "13N 234789mE 234789mN");

        let coord = UtmUps::create(0, false, 2_347_891., 2_347_891.).unwrap();
        assert_eq!(coord.to_string(), "B 2347891mE 2347891mN");
    }
}
