use std::{fmt::{Display, Write}, str::FromStr};

use lazy_static::lazy_static;
use num::Integer;

use crate::{
    band::{LatitudeBand, PolarZone, ZoneLetter},
    coords::{
        bbox::BoundingBox,
        latlon::LatLon,
        utm::{self, zonespec::{MAXUTMZONE, MINUTMZONE, UPS}, UtmUps},
    },
    precision::PrecisionLevel,
    utility::{dms, GeoMath},
    Error, ParseCoord, ThisOrThat,
};

const UTMCOLS: &[&str] = &["ABCDEFGH", "JKLMNPQR", "STUVWXYZ"];
const UTMROW: &str = "ABCDEFGHJKLMNPQRSTUV";
const UPSCOLS: &[&str] = &["JKLPQRSTUXYZ", "ABCFGHJKLPQR", "RSTUXYZ", "ABCFGHJ"];
const UPSROWS: &[&str] = &["ABCDEFGHJKLMNPQRSTUVWXYZ", "ABCDEFGHJKLMNP"];

pub(crate) const TILE: i32 = 100_000;
pub(crate) const MINUTMCOL: i32 = 1;
pub(crate) const MAXUTMCOL: i32 = 9;
pub(crate) const MINUTM_S_ROW: i32 = 10;
pub(crate) const MAXUTM_S_ROW: i32 = 100;
pub(crate) const MINUTM_N_ROW: i32 = 0;
pub(crate) const MAXUTM_N_ROW: i32 = 95;
pub(crate) const MINUPS_S_IND: i32 = 8;
pub(crate) const MAXUPS_S_IND: i32 = 32;
pub(crate) const MINUPS_N_IND: i32 = 13;
pub(crate) const MAXUPS_N_IND: i32 = 27;
const UPSEASTING: i32 = 20;
const UTM_N_SHIFT: i32 = (MAXUTM_S_ROW - MINUTM_N_ROW) * TILE;

// Envelopes in units of TILE, closed below and open above
const MIN_EASTING: [i32; 4] = [
    MINUPS_S_IND,
    MINUPS_N_IND,
    MINUTMCOL,
    MINUTMCOL,
];

const MAX_EASTING: [i32; 4] = [
    MAXUPS_S_IND,
    MAXUPS_N_IND,
    MAXUTMCOL,
    MAXUTMCOL,
];

const MIN_NORTHING: [i32; 4] = [
    MINUPS_S_IND,
    MINUPS_N_IND,
    MINUTM_S_ROW,
    MINUTM_S_ROW - MAXUTM_S_ROW - MINUTM_N_ROW,
];

const MAX_NORTHING: [i32; 4] = [
    MAXUPS_S_IND,
    MAXUPS_N_IND,
    MAXUTM_N_ROW + MAXUTM_S_ROW - MINUTM_N_ROW,
    MAXUTM_N_ROW,
];

const BASE: i32 = 10;
const UTM_ROW_PERIOD: i32 = 20;
const UTM_EVEN_ROW_SHIFT: i32 = 5;

lazy_static! {
    // Smallest length s.t. 1.0e7 - EPS < 1.0e7
    static ref EPS: f64 = 2_f64.powi(-(f64::MANTISSA_DIGITS as i32 - 25));
    // Latitudes closer than this to the equator pick the band by hemisphere
    static ref ANG_EPS: f64 = 2_f64.powi(-(f64::MANTISSA_DIGITS as i32 - 7));
}

/// A [US National Grid](https://en.wikipedia.org/wiki/United_States_National_Grid)
/// reference such as `18T WL 85664 11315`.
///
/// The wrapped [`UtmUps`] holds the south-west corner of the referenced cell;
/// its [`PrecisionLevel`] gives the cell's size.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "UtmUps", into = "UtmUps"))]
pub struct Usng {
    pub(crate) utm: UtmUps,
}

impl Usng {
    /// Parses a USNG reference. Spaces are optional; the number of digits
    /// after the 100 km square letters sets the precision.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedInput`] if the string is not a valid USNG
    /// reference, or [`Error::OutOfProjectionDomain`] if the square it names
    /// cannot be written back out.
    ///
    /// # Usage
    ///
    /// ```
    /// use usngconvert::{PrecisionLevel, Usng};
    ///
    /// let usng = Usng::parse_str("18T WL 856 113").unwrap();
    ///
    /// assert_eq!(usng.zone(), 18);
    /// assert_eq!(usng.precision(), PrecisionLevel::HundredMeter);
    /// assert_eq!(usng.to_utmups().easting(), 585_600.);
    /// assert_eq!(usng.to_utmups().northing(), 4_511_300.);
    ///
    /// assert!(Usng::parse_str("18T WL 8566 113").is_err());
    /// ```
    pub fn parse_str(usng_str: &str) -> Result<Usng, Error> {
        Self::from_str(usng_str)
    }

    /// Wraps `value` as a reference at `precision`, checking that it can be
    /// written out.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfProjectionDomain`] if the coordinate lies outside
    /// the grid, for instance when it was projected into a neighbouring zone.
    ///
    /// # Usage
    ///
    /// ```
    /// use usngconvert::{Error, LatLon, PrecisionLevel, Usng, UtmUps, ZoneHint};
    ///
    /// let point = LatLon::create(40.748333, -73.985278).unwrap();
    ///
    /// let coord = UtmUps::from_latlon(&point, ZoneHint::Standard).unwrap();
    /// assert!(Usng::from_utmups(&coord, PrecisionLevel::Meter).is_ok());
    ///
    /// let neighbour = UtmUps::from_latlon(&point, ZoneHint::Zone(19)).unwrap();
    /// let usng = Usng::from_utmups(&neighbour, PrecisionLevel::Meter);
    /// assert!(matches!(usng, Err(Error::OutOfProjectionDomain(_))));
    /// ```
    pub fn from_utmups(value: &UtmUps, precision: PrecisionLevel) -> Result<Usng, Error> {
        let utm = value.with_precision(precision);
        format_usng(&utm, precision.digit_count())?;

        Ok(Usng { utm })
    }

    pub fn to_utmups(&self) -> UtmUps {
        self.utm
    }

    pub fn zone(&self) -> i32 {
        self.utm.zone
    }

    pub fn is_north(&self) -> bool {
        self.utm.northp
    }

    pub fn precision(&self) -> PrecisionLevel {
        self.utm.precision
    }

    /// South-west corner of the referenced cell.
    ///
    /// # Errors
    ///
    /// See [`UtmUps::to_latlon`].
    pub fn to_latlon(&self) -> Result<LatLon, Error> {
        self.utm.to_latlon()
    }

    /// The area covered by the referenced cell.
    ///
    /// # Errors
    ///
    /// See [`UtmUps::to_bounding_box`].
    pub fn to_bounding_box(&self) -> Result<BoundingBox, Error> {
        self.utm.to_bounding_box()
    }

    /// Writes the reference with single spaces between its parts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfProjectionDomain`] if the coordinate lies outside
    /// the grid or its latitude disagrees with its 100 km square. References
    /// built by [`Usng::parse_str`] or [`Usng::from_utmups`] have already
    /// passed this check.
    pub fn format(&self) -> Result<String, Error> {
        format_usng(&self.utm, self.utm.precision.digit_count())
    }
}

fn utm_row(band_idx: i32, col_idx: i32, row_idx: i32) -> i32 {
    let c = 100.0 * (8.0 * f64::from(band_idx) + 4.0) / f64::from(dms::QD);
    let northp = band_idx >= 0;
    // These are safe bounds on the rows
    //  band_idx  minrow maxrow
    //   -10      -90    -81
    //    -9      -80    -72
    //    -8      -71    -63
    //    -7      -63    -54
    //    -6      -54    -45
    //    -5      -45    -36
    //    -4      -36    -27
    //    -3      -27    -18
    //    -2      -18     -9
    //    -1       -9     -1
    //     0        0      8
    //     1        8     17
    //     2       17     26
    //     3       26     35
    //     4       35     44
    //     5       44     53
    //     6       53     62
    //     7       62     70
    //     8       71     79
    //     9       80     94

    #[allow(clippy::cast_possible_truncation)]
    let min_row = if band_idx > -10 {
        (c - 4.3 - 0.1 * f64::from(u8::from(northp))).floor() as i32
    } else {
        -90
    };

    #[allow(clippy::cast_possible_truncation)]
    let max_row = if band_idx < 9 {
        (c + 4.4 - 0.1 * f64::from(u8::from(northp))).floor() as i32
    } else {
        94
    };

    let base_row = (min_row + max_row) / 2 - UTM_ROW_PERIOD / 2;
    // Offset row_idx by the multiple of UTM_ROW_PERIOD which brings it as close as
    // possible to the center of the latitude band, (min_row + max_row) / 2.
    // (Add MAXUTM_S_ROW = 5 * UTM_ROW_PERIOD to ensure operand is positive.)
    let mut row_idx = (row_idx - base_row + MAXUTM_S_ROW) % UTM_ROW_PERIOD + base_row;

    if !(row_idx >= min_row && row_idx <= max_row) {
        // Outside the safe bounds, so need to check...
        // Northing = 71e5 and 80e5 intersect band boundaries
        //   y = 71e5 in scol = 2 (x = [3e5,4e5] and x = [6e5,7e5])
        //   y = 80e5 in scol = 1 (x = [2e5,3e5] and x = [7e5,8e5])
        // This holds for all the ellipsoids given in NGA.SIG.0012_2.0.0_UTMUPS.
        // The following deals with these special cases.

        // Fold [-10,-1] -> [9,0]
        let safe_band = (band_idx >= 0).ternary(band_idx, -band_idx - 1);
        // Fold [-90,-1] -> [89,0]
        let safe_row = (row_idx >= 0).ternary(row_idx, -row_idx - 1);
        // Fold [4,7] -> [3,0]
        let safe_col = (col_idx < 4).ternary(col_idx, -col_idx + 7);

        if !(
            (safe_row == 70 && safe_band == 8 && safe_col >= 2) ||
            (safe_row == 71 && safe_band == 7 && safe_col <= 2) ||
            (safe_row == 79 && safe_band == 9 && safe_col >= 1) ||
            (safe_row == 80 && safe_band == 8 && safe_col <= 1)
        ) {
            row_idx = MAXUTM_S_ROW;
        }
    }

    row_idx
}

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn letter_index(set: &str, letter: u8) -> Option<i32> {
    set.find(letter as char).map(|i| i as i32)
}

impl FromStr for Usng {
    type Err = Error;

    #[allow(clippy::too_many_lines)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Digit groups written apart must be the same length
        let groups = s.split_whitespace().collect::<Vec<_>>();
        if let [.., east, north] = groups.as_slice() {
            let all_digits = |g: &str| g.bytes().all(|b| b.is_ascii_digit());
            if all_digits(east) && all_digits(north) && east.len() != north.len() {
                return Err(Error::MalformedInput(
                    format!("Easting {east} and northing {north} differ in precision")
                ));
            }
        }

        let value = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_uppercase();
        if !value.is_ascii() {
            return Err(Error::MalformedInput(format!("Non-ASCII character in '{value}'")));
        }
        let mut p = 0;
        let len = value.len();
        let chars = value.as_bytes();

        let mut zone = 0i32;
        while p < len && chars[p].is_ascii_digit() {
            zone = 10 * zone + i32::from(chars[p] - b'0');
            p += 1;
        }

        if p > 2 {
            return Err(Error::MalformedInput(format!(
                "More than 2 digits at start of USNG {}",
                &value[..p],
            )));
        }

        // Check if zone is within valid range
        if p > 0 && !(MINUTMZONE..=MAXUTMZONE).contains(&zone) {
            return Err(Error::MalformedInput(format!("Zone {zone} not in [1,60]")));
        }

        if len - p < 1 {
            return Err(Error::MalformedInput(format!("Too short: '{value}'")));
        }

        let utmp = zone != UPS;
        let zonem = zone - 1;

        let band_letter = chars[p] as char;
        let letter = utmp
            .ternary_lazy(
                || LatitudeBand::from_letter(band_letter).map(ZoneLetter::Band),
                || PolarZone::from_letter(band_letter).map(ZoneLetter::Polar),
            )
            .ok_or_else(|| {
                let label = utmp.ternary("UTM latitude band", "UPS zone");
                Error::MalformedInput(format!("{band_letter} is not a valid {label} letter"))
            })?;

        p += 1;

        let northp = letter.hemisphere().is_north();

        if p == len { // Grid zone only
            // Approx length of a degree of meridian arc in units of tile
            let deg = (f64::from(UTM_N_SHIFT)) / f64::from(dms::QD * TILE);
            let (x, y) = match letter {
                ZoneLetter::Band(band) => {
                    // Pick central meridian except for 31V
                    let central = (zone == 31 && band.letter() == 'V').ternary(4.0, 5.0);
                    let x = f64::from(TILE) * central;
                    let y_add = northp.ternary(0.0, f64::from(UTM_N_SHIFT));
                    let rows = (8.0 * (f64::from(band.index()) + 0.5) * deg + 0.5).floor();
                    let y = rows * f64::from(TILE) + y_add;

                    (x, y)
                },
                ZoneLetter::Polar(polar) => {
                    let x_cond = polar.is_east().ternary(1.0, -1.0);
                    let cols = x_cond * (4.0 * deg + 0.5).floor() + f64::from(UPSEASTING);
                    let x = cols * f64::from(TILE);
                    let y = f64::from(UPSEASTING * TILE);
                    (x, y)
                },
            };

            return Ok(Usng {
                utm: UtmUps::new(zone, northp, x, y, letter, PrecisionLevel::GridZone),
            });
        } else if len - p < 2 {
            return Err(Error::MalformedInput(format!("Missing row letter in '{value}'")));
        }

        #[allow(clippy::cast_sign_loss)]
        let col = match letter {
            ZoneLetter::Band(_) => UTMCOLS[(zonem % 3) as usize],
            ZoneLetter::Polar(polar) => UPSCOLS[polar.index()],
        };
        let row = utmp.ternary_lazy(|| UTMROW, || UPSROWS[usize::from(northp)]);

        let mut col_idx = letter_index(col, chars[p])
            .ok_or_else(|| {
                let label = if utmp {
                    format!("zone {zone}{}", letter.letter())
                } else {
                    format!("UPS zone {}", letter.letter())
                };
                let found = chars[p] as char;
                Error::MalformedInput(format!("Column letter {found} not in {label} set {col}"))
            })?;

        p += 1;

        let mut row_idx = letter_index(row, chars[p])
            .ok_or_else(|| {
                let label = if utmp {
                    "UTM".to_string()
                } else {
                    format!("UPS {}", letter.hemisphere().letter())
                };
                let found = chars[p] as char;
                Error::MalformedInput(format!("Row letter {found} not in {label} set {row}"))
            })?;

        p += 1;

        match letter {
            ZoneLetter::Band(band) => {
                if zonem.is_odd() {
                    row_idx = (row_idx + UTM_ROW_PERIOD - UTM_EVEN_ROW_SHIFT) % UTM_ROW_PERIOD;
                }

                row_idx = utm_row(band.index(), col_idx, row_idx);
                if row_idx == MAXUTM_S_ROW {
                    return Err(Error::MalformedInput(format!(
                        "Block {} not in zone/band {}",
                        &value[p-2..p],
                        &value[0..p-2],
                    )));
                }

                row_idx = northp.ternary_lazy(|| row_idx, || row_idx + 100);
                col_idx += MINUTMCOL;
            },
            ZoneLetter::Polar(polar) => {
                let min_ind = northp.ternary(MINUPS_N_IND, MINUPS_S_IND);
                col_idx += polar.is_east().ternary(UPSEASTING, min_ind);
                row_idx += min_ind;
            },
        }

        let remaining = &value[p..];
        if !remaining.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::MalformedInput(format!("Encountered a non-digit in {remaining}")));
        }

        if remaining.len() % 2 == 1 {
            return Err(Error::MalformedInput(format!(
                "Not an even number of digits in {remaining}"
            )));
        }

        let digits = remaining.len() / 2;
        let precision = PrecisionLevel::from_digit_count(digits)
            .ok_or_else(|| {
                let max = 2 * PrecisionLevel::MAX_DIGITS;
                Error::MalformedInput(format!("More than {max} digits in {remaining}"))
            })?;

        let mut unit = 1;
        let mut x = col_idx;
        let mut y = row_idx;

        let (east, north) = remaining.as_bytes().split_at(digits);
        for (x_digit, y_digit) in east.iter().zip(north) {
            unit *= BASE;
            x = BASE * x + i32::from(x_digit - b'0');
            y = BASE * y + i32::from(y_digit - b'0');
        }

        let x = (f64::from(TILE) * f64::from(x)) / f64::from(unit);
        let y = (f64::from(TILE) * f64::from(y)) / f64::from(unit);

        let utm = UtmUps::new(zone, northp, x, y, letter, precision);
        format_usng(&utm, precision.digit_count())?;

        Ok(Self { utm })
    }
}

impl TryFrom<UtmUps> for Usng {
    type Error = Error;

    fn try_from(value: UtmUps) -> Result<Self, Self::Error> {
        Usng::from_utmups(&value, value.precision())
    }
}

impl From<Usng> for UtmUps {
    fn from(value: Usng) -> Self {
        value.utm
    }
}

impl ParseCoord for Usng {
    fn parse_coord(value: &str) -> Result<Self, Error> {
        Self::from_str(value)
    }
}

/// Checks that a point lies on the grid, nudging points sitting exactly on
/// an open upper edge back inside. Also folds UTM northings into the
/// hemisphere they belong to. Returns the adjusted `(northp, x, y)`.
fn check_coords(utmp: bool, northp: bool, x: f64, y: f64) -> Result<(bool, f64, f64), Error> {
    #[allow(clippy::cast_possible_truncation)]
    let x_int = (x / f64::from(TILE)).floor() as i32;
    #[allow(clippy::cast_possible_truncation)]
    let y_int = (y / f64::from(TILE)).floor() as i32;
    let ind = utmp.ternary(2, 0) + northp.ternary(1, 0);

    let mut x_new = x;
    let mut y_new = y;

    if !(MIN_EASTING[ind]..MAX_EASTING[ind]).contains(&x_int) {
        if x_int == MAX_EASTING[ind] && x.eps_eq(f64::from(MAX_EASTING[ind] * TILE)) {
            x_new -= *EPS;
        } else {
            return Err(Error::OutOfProjectionDomain(
                format!(
                    "Easting {:.2}km not in USNG/{} range for {} hemisphere [{}km, {}km)",
                    x / 1000.0,
                    utmp.ternary("UTM", "UPS"),
                    northp.ternary("N", "S"),
                    MIN_EASTING[ind] * (TILE / 1000),
                    MAX_EASTING[ind] * (TILE / 1000),
                )
            ));
        }
    }

    if !(MIN_NORTHING[ind]..MAX_NORTHING[ind]).contains(&y_int) {
        if y_int == MAX_NORTHING[ind] && y.eps_eq(f64::from(MAX_NORTHING[ind] * TILE)) {
            y_new -= *EPS;
        } else {
            return Err(Error::OutOfProjectionDomain(
                format!(
                    "Northing {:.2}km not in USNG/{} range for {} hemisphere [{}km, {}km)",
                    y / 1000.0,
                    utmp.ternary("UTM", "UPS"),
                    northp.ternary("N", "S"),
                    MIN_NORTHING[ind] * (TILE / 1000),
                    MAX_NORTHING[ind] * (TILE / 1000),
                )
            ));
        }
    }

    let (northp_new, y_new) = if utmp {
        if northp && y_int < MINUTM_N_ROW {
            (false, y_new + f64::from(UTM_N_SHIFT))
        } else if !northp && y_int >= MAXUTM_S_ROW {
            if y.eps_eq(f64::from(MAXUTM_S_ROW * TILE)) {
                // On the equator, stay in the southern hemisphere
                (northp, y_new - *EPS)
            } else {
                (true, y_new - f64::from(UTM_N_SHIFT))
            }
        } else {
            (northp, y_new)
        }
    } else {
        (northp, y_new)
    };

    Ok((northp_new, x_new, y_new))
}

/// Writes `utm` as a USNG reference with `digits` digits per axis, or just
/// its grid zone designation when `digits` is `None`.
#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
pub(crate) fn format_usng(utm: &UtmUps, digits: Option<usize>) -> Result<String, Error> {
    let utmp = utm.is_utm();
    let mut usng_str = String::with_capacity(8 + 2 * PrecisionLevel::MAX_DIGITS);

    if utmp {
        write!(usng_str, "{}", utm.zone).ok();
    }

    let Some(digits) = digits else {
        usng_str.push(utm.letter.letter());
        return Ok(usng_str);
    };
    let digits = digits.min(PrecisionLevel::MAX_DIGITS);

    let (northp, easting, northing) = check_coords(utmp, utm.northp, utm.easting, utm.northing)?;

    let ix = easting.floor() as i64;
    let iy = northing.floor() as i64;
    let m = i64::from(TILE);

    let xh = (ix / m) as i32;
    let yh = (iy / m) as i32;

    if utmp {
        let zone = utm.zone - 1;
        let lat = utm::inverse(utm.zone, northp, easting, northing).latitude;
        // Correct fuzziness in latitude near equator
        let band_idx = (lat.abs() < *ANG_EPS)
            .ternary_lazy(|| northp.ternary(0, -1), || LatitudeBand::from_latitude(lat).index());
        let col_idx = xh - MINUTMCOL;
        let row_idx = utm_row(band_idx, col_idx, yh % UTM_ROW_PERIOD);

        if row_idx != yh - northp.ternary(MINUTM_N_ROW, MAXUTM_S_ROW) {
            return Err(Error::OutOfProjectionDomain(
                format!("Latitude {lat:.5} is inconsistent with UTM coordinates {}", utm)
            ));
        }

        usng_str.push(LatitudeBand::from_index(band_idx).letter());
        usng_str.push(' ');
        usng_str.push(UTMCOLS[(zone % 3) as usize].as_bytes()[col_idx as usize] as char);
        let idx = (yh + zone.is_odd().ternary(UTM_EVEN_ROW_SHIFT, 0)) % UTM_ROW_PERIOD;
        usng_str.push(UTMROW.as_bytes()[idx as usize] as char);
    } else {
        let eastp = xh >= UPSEASTING;
        let polar = PolarZone::from_position(northp, eastp);
        usng_str.push(polar.letter());
        usng_str.push(' ');
        let idx = xh - eastp.ternary(UPSEASTING, northp.ternary(MINUPS_N_IND, MINUPS_S_IND));
        usng_str.push(UPSCOLS[polar.index()].as_bytes()[idx as usize] as char);
        let idx = yh - northp.ternary(MINUPS_N_IND, MINUPS_S_IND);
        usng_str.push(UPSROWS[usize::from(northp)].as_bytes()[idx as usize] as char);
    }

    if digits > 0 {
        let d = i64::from(BASE).pow((PrecisionLevel::MAX_DIGITS - digits) as u32);
        let ix = (ix - m * i64::from(xh)) / d;
        let iy = (iy - m * i64::from(yh)) / d;

        write!(usng_str, " {ix:0digits$} {iy:0digits$}").ok();
    }

    Ok(usng_str)
}

impl Display for Usng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Every constructor has already formatted the reference once
        let usng_str = self.format().map_err(|_| std::fmt::Error)?;
        write!(f, "{usng_str}")
    }
}
