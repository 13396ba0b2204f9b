//! Latitude bands, polar zones and hemispheres: the letters that qualify a
//! UTM zone number or stand alone for a UPS cap.

use std::fmt::Display;

use crate::{constants::{UTM_MAX_LAT, UTM_MIN_LAT}, ThisOrThat};

const LATBAND: &str = "CDEFGHJKLMNPQRSTUVWX";
const UPSBAND: &str = "ABYZ";

/// Height of every latitude band but the last, in degrees
const BAND_HEIGHT: f64 = 8.;

/// North or south of the equator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Hemisphere {
    North,
    South,
}

impl Hemisphere {
    pub(crate) fn from_northp(northp: bool) -> Hemisphere {
        northp.ternary(Hemisphere::North, Hemisphere::South)
    }

    /// Maps a hemisphere indicator (`N` or `S`, either case).
    pub fn from_letter(letter: char) -> Option<Hemisphere> {
        match letter.to_ascii_uppercase() {
            'N' => Some(Hemisphere::North),
            'S' => Some(Hemisphere::South),
            _ => None,
        }
    }

    pub fn is_north(self) -> bool {
        self == Hemisphere::North
    }

    pub fn letter(self) -> char {
        self.is_north().ternary('N', 'S')
    }
}

/// Which projection a coordinate is expressed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GridSystem {
    Utm,
    Ups,
}

/// A UTM latitude band, `C` (80°S) through `X` (84°N).
///
/// Stored as an offset from the equator: `-10` is `C`, `0` is `N`, `9` is `X`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LatitudeBand(i32);

impl LatitudeBand {
    /// Looks up a band letter. `I` and `O` are not band letters, nor are the
    /// polar zone letters.
    ///
    /// ```
    /// use usngconvert::LatitudeBand;
    ///
    /// assert_eq!(LatitudeBand::from_letter('t').unwrap().letter(), 'T');
    /// assert!(LatitudeBand::from_letter('O').is_none());
    /// assert!(LatitudeBand::from_letter('Z').is_none());
    /// ```
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn from_letter(letter: char) -> Option<LatitudeBand> {
        let letter = letter.to_ascii_uppercase();
        LATBAND
            .find(letter)
            .map(|i| LatitudeBand(i as i32 - 10))
    }

    /// Band enclosing `lat`. Latitudes beyond the UTM limits clamp to the
    /// outermost bands.
    ///
    /// ```
    /// use usngconvert::LatitudeBand;
    ///
    /// assert_eq!(LatitudeBand::from_latitude(40.7).letter(), 'T');
    /// assert_eq!(LatitudeBand::from_latitude(-0.1).letter(), 'M');
    /// assert_eq!(LatitudeBand::from_latitude(83.9).letter(), 'X');
    /// ```
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_latitude(lat: f64) -> LatitudeBand {
        let lat_int = lat.floor() as i32;
        LatitudeBand((-10).max(9.min((lat_int + 80) / 8 - 10)))
    }

    pub(crate) fn from_index(index: i32) -> LatitudeBand {
        LatitudeBand(index.clamp(-10, 9))
    }

    pub(crate) fn index(self) -> i32 {
        self.0
    }

    #[allow(clippy::cast_sign_loss)]
    pub fn letter(self) -> char {
        LATBAND.as_bytes()[(self.0 + 10) as usize] as char
    }

    pub fn hemisphere(self) -> Hemisphere {
        Hemisphere::from_northp(self.0 >= 0)
    }

    /// Southern edge of the band, in degrees.
    pub fn south(self) -> f64 {
        UTM_MIN_LAT + BAND_HEIGHT * f64::from(self.0 + 10)
    }

    /// Northern edge of the band, in degrees. Band `X` is 12° tall.
    pub fn north(self) -> f64 {
        (self.0 == 9).ternary(UTM_MAX_LAT, self.south() + BAND_HEIGHT)
    }

    /// Western and eastern edges of the grid zone `zone`/`self`, including the
    /// irregular zones around Norway and Svalbard.
    pub fn zone_longitudes(self, zone: i32) -> (f64, f64) {
        let nominal = {
            let west = f64::from(6 * zone - 186);
            (west, west + 6.)
        };

        match (self.letter(), zone) {
            ('V', 31) => (0., 3.),
            ('V', 32) => (3., 12.),
            ('X', 31) => (0., 9.),
            ('X', 33) => (9., 21.),
            ('X', 35) => (21., 33.),
            ('X', 37) => (33., 42.),
            _ => nominal,
        }
    }
}

impl Display for LatitudeBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// One half of a UPS polar cap. `A`/`Y` lie west of Greenwich, `B`/`Z` east.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PolarZone {
    A,
    B,
    Y,
    Z,
}

impl PolarZone {
    pub fn from_letter(letter: char) -> Option<PolarZone> {
        match letter.to_ascii_uppercase() {
            'A' => Some(PolarZone::A),
            'B' => Some(PolarZone::B),
            'Y' => Some(PolarZone::Y),
            'Z' => Some(PolarZone::Z),
            _ => None,
        }
    }

    pub(crate) fn from_position(northp: bool, eastp: bool) -> PolarZone {
        match (northp, eastp) {
            (false, false) => PolarZone::A,
            (false, true) => PolarZone::B,
            (true, false) => PolarZone::Y,
            (true, true) => PolarZone::Z,
        }
    }

    /// Position in `ABYZ`, which is also the index into the UPS letter tables.
    pub(crate) fn index(self) -> usize {
        match self {
            PolarZone::A => 0,
            PolarZone::B => 1,
            PolarZone::Y => 2,
            PolarZone::Z => 3,
        }
    }

    pub fn letter(self) -> char {
        UPSBAND.as_bytes()[self.index()] as char
    }

    pub fn hemisphere(self) -> Hemisphere {
        Hemisphere::from_northp(matches!(self, PolarZone::Y | PolarZone::Z))
    }

    pub fn is_east(self) -> bool {
        matches!(self, PolarZone::B | PolarZone::Z)
    }

    /// Western and eastern edges of the cap half, in degrees.
    pub fn longitudes(self) -> (f64, f64) {
        self.is_east().ternary((0., 180.), (-180., 0.))
    }
}

/// The letter that follows (UTM) or replaces (UPS) a zone number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ZoneLetter {
    Band(LatitudeBand),
    Polar(PolarZone),
}

impl ZoneLetter {
    pub fn letter(self) -> char {
        match self {
            ZoneLetter::Band(band) => band.letter(),
            ZoneLetter::Polar(zone) => zone.letter(),
        }
    }

    pub fn hemisphere(self) -> Hemisphere {
        match self {
            ZoneLetter::Band(band) => band.hemisphere(),
            ZoneLetter::Polar(zone) => zone.hemisphere(),
        }
    }

    pub fn band(self) -> Option<LatitudeBand> {
        match self {
            ZoneLetter::Band(band) => Some(band),
            ZoneLetter::Polar(_) => None,
        }
    }
}
