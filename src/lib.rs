#![warn(clippy::pedantic)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use
)]

use thiserror::Error;

pub mod band;
pub mod precision;

pub mod coords {
    pub mod bbox;
    pub mod latlon;
    pub mod usng;
    pub mod utm;
}

pub(crate) mod bounds;
pub(crate) mod parser;
pub(crate) mod resolver;

pub(crate) mod projections {
    pub mod transverse_mercator;
    pub mod polar_stereographic;
}

pub(crate) mod constants;
pub(crate) mod utility;

pub use band::{GridSystem, Hemisphere, LatitudeBand, PolarZone, ZoneLetter};
pub use coords::{
    bbox::BoundingBox,
    latlon::LatLon,
    usng::Usng,
    utm::{UtmUps, ZoneHint},
};
pub use precision::PrecisionLevel;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum Error {
    #[error("Coordinate string is malformed: {0}")]
    MalformedInput(String),
    #[error("Coordinate is outside the projection domain: {0}")]
    OutOfProjectionDomain(String),
}

pub trait ParseCoord {
    fn parse_coord(value: &str) -> Result<Self, Error>
    where Self: Sized;
}

/// Parses any of the crate's coordinate types, picked by the annotated
/// result type.
///
/// # Errors
///
/// Returns whatever the target type's parser returns for `value`.
///
/// # Usage
///
/// ```
/// use usngconvert::{Error, LatLon, PrecisionLevel, Usng, UtmUps};
///
/// let coord: UtmUps = usngconvert::from_str("13 234789mE 234789mN N").unwrap();
/// assert_eq!(coord.zone(), 13);
/// assert_eq!(coord.precision(), PrecisionLevel::GridZone);
///
/// let usng: Usng = usngconvert::from_str("18T WL").unwrap();
/// assert_eq!(usng.precision(), PrecisionLevel::HundredKilometer);
///
/// let point: LatLon = usngconvert::from_str(String::from("40.5 -73.25")).unwrap();
/// assert_eq!(point.latitude(), 40.5);
///
/// let bad: Result<Usng, Error> = usngconvert::from_str("18T WL 856 11");
/// assert!(matches!(bad, Err(Error::MalformedInput(_))));
/// ```
pub fn from_str<S, T>(value: S) -> Result<T, Error>
where
    S: AsRef<str>,
    T: ParseCoord
{
    T::parse_coord(value.as_ref())
}

/// Parses a projected UTM/UPS string such as `13N 234789mE 234789mN`,
/// `13 234789mE 2100000mN S` or `A 2347891mE 2347891mN`.
///
/// A latitude band letter after the zone number decides the hemisphere. A
/// bare `N` or `S` there is ambiguous and gives way to a trailing hemisphere
/// indicator, defaulting to north. Without a band letter the band is derived
/// from the northing. The result is known to [`PrecisionLevel::GridZone`].
///
/// # Errors
///
/// Returns [`Error::MalformedInput`] if the text does not follow the grammar,
/// or carries neither a zone letter nor a trailing hemisphere. Returns
/// [`Error::OutOfProjectionDomain`] if a derived band cannot be found because
/// the northing lies outside the hemisphere's range.
///
/// # Usage
///
/// ```
/// use usngconvert::{parse_utm_ups_string, Error, Hemisphere};
///
/// let coord = parse_utm_ups_string("13 234789mE 2100000mN S").unwrap();
/// assert_eq!(coord.zone(), 13);
/// assert_eq!(coord.hemisphere(), Hemisphere::South);
/// assert_eq!(coord.zone_letter().letter(), 'D');
///
/// let ambiguous = parse_utm_ups_string("13 234789mE 234789mN");
/// assert!(matches!(ambiguous, Err(Error::MalformedInput(_))));
/// ```
pub fn parse_utm_ups_string(text: &str) -> Result<UtmUps, Error> {
    parser::parse_utm_ups(text)
}

/// Returns the geographic region `coord` stands for at its precision.
///
/// # Errors
///
/// Returns [`Error::OutOfProjectionDomain`] if a grid square or point lies
/// outside its zone's envelope.
///
/// # Usage
///
/// ```
/// use usngconvert::{parse_utm_ups_string, to_bounding_box};
///
/// let coord = parse_utm_ups_string("13 234789mE 234789mN N").unwrap();
/// let bbox = to_bounding_box(&coord).unwrap();
///
/// assert_eq!(bbox.north(), 8.0);
/// assert_eq!(bbox.south(), 0.01);
/// assert_eq!(bbox.west(), -108.0);
/// assert_eq!(bbox.east(), -102.0);
/// ```
pub fn to_bounding_box(coord: &UtmUps) -> Result<BoundingBox, Error> {
    bounds::to_bounding_box(coord)
}

/// Inverse projection of `coord` to latitude/longitude.
///
/// # Errors
///
/// See [`UtmUps::to_latlon`].
pub fn to_geographic_point(coord: &UtmUps) -> Result<LatLon, Error> {
    coord.to_latlon()
}

/// Forward projection of `point`, into the standard zone unless `hint` says
/// otherwise.
///
/// # Errors
///
/// See [`UtmUps::from_latlon`].
///
/// # Usage
///
/// ```
/// use usngconvert::{from_geographic_point, LatLon, ZoneHint};
///
/// let point = LatLon::create(40.748333, -73.985278).unwrap();
/// let coord = from_geographic_point(&point, None).unwrap();
/// assert_eq!(coord.zone(), 18);
///
/// let polar = from_geographic_point(&point, Some(ZoneHint::Ups));
/// assert!(polar.is_err());
/// ```
pub fn from_geographic_point(point: &LatLon, hint: Option<ZoneHint>) -> Result<UtmUps, Error> {
    UtmUps::from_latlon(point, hint.unwrap_or_default())
}

trait ThisOrThat {
    fn ternary<T>(&self, r#true: T, r#false: T) -> T;
    fn ternary_lazy<F, E, T>(&self, r#true: F, r#false: E) -> T
    where
        F: Fn() -> T,
        E: Fn() -> T;
}

impl ThisOrThat for bool {
    fn ternary<T>(&self, r#true: T, r#false: T) -> T {
        if *self { r#true } else { r#false }
    }

    fn ternary_lazy<F, E, T>(&self, r#true: F, r#false: E) -> T
    where
        F: Fn() -> T,
        E: Fn() -> T,
    {
        if *self { r#true() } else { r#false() }
    }
}
