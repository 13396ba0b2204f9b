//! Decides the hemisphere and zone letter of a parsed projected coordinate.

use tracing::debug;

use crate::{
    band::{Hemisphere, LatitudeBand, PolarZone, ZoneLetter},
    coords::utm::{band_in_hemisphere, check_coords, meridian_latitude, zonespec, UtmUps},
    parser::Tokens,
    precision::PrecisionLevel,
    Error,
};

/// The letter found right after the zone number, or in place of it for UPS.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Qualifier {
    /// A latitude band letter that can only be a band
    Band(LatitudeBand),
    /// `N` or `S`, which may be either a band or a hemisphere
    Hemisphere(Hemisphere),
    Polar(PolarZone),
    Absent,
}

impl Qualifier {
    /// Classifies a letter following a UTM zone number.
    pub(crate) fn from_utm_letter(letter: char) -> Option<Qualifier> {
        match letter.to_ascii_uppercase() {
            'N' => Some(Qualifier::Hemisphere(Hemisphere::North)),
            'S' => Some(Qualifier::Hemisphere(Hemisphere::South)),
            other => LatitudeBand::from_letter(other).map(Qualifier::Band),
        }
    }
}

/// Turns tokens into a coordinate known to [`PrecisionLevel::GridZone`].
pub(crate) fn resolve(tokens: &Tokens) -> Result<UtmUps, Error> {
    let (hemisphere, band) = match (tokens.qualifier, tokens.trailing) {
        (Qualifier::Polar(zone), _) => {
            debug!(letter = %zone.letter(), "polar zone letter decides hemisphere");
            return Ok(UtmUps::new(
                zonespec::UPS,
                zone.hemisphere().is_north(),
                tokens.easting,
                tokens.northing,
                ZoneLetter::Polar(zone),
                PrecisionLevel::GridZone,
            ));
        }
        (Qualifier::Band(band), _) => (band.hemisphere(), Some(band)),
        (Qualifier::Hemisphere(_) | Qualifier::Absent, Some(trailing)) => (trailing, None),
        (Qualifier::Hemisphere(_), None) => (Hemisphere::North, None),
        (Qualifier::Absent, None) => {
            return Err(Error::MalformedInput(format!(
                "Zone {} has neither a band letter nor a hemisphere",
                tokens.zone,
            )));
        }
    };

    let northp = hemisphere.is_north();
    let band = match band {
        Some(band) => band,
        None => {
            check_coords(true, northp, tokens.easting, tokens.northing)?;
            let lat = meridian_latitude(northp, tokens.northing);
            band_in_hemisphere(northp, lat)
        }
    };

    debug!(
        zone = tokens.zone,
        hemisphere = %hemisphere.letter(),
        band = %band,
        "resolved grid zone"
    );

    Ok(UtmUps::new(
        tokens.zone,
        northp,
        tokens.easting,
        tokens.northing,
        ZoneLetter::Band(band),
        PrecisionLevel::GridZone,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(qualifier: Qualifier, northing: f64, trailing: Option<Hemisphere>) -> Tokens {
        Tokens {
            zone: 13,
            qualifier,
            easting: 234_789.,
            northing,
            trailing,
        }
    }

    fn band(letter: char) -> LatitudeBand {
        LatitudeBand::from_letter(letter).unwrap()
    }

    #[test]
    fn classifies_utm_letters() {
        assert_eq!(Qualifier::from_utm_letter('n'), Some(Qualifier::Hemisphere(Hemisphere::North)));
        assert_eq!(Qualifier::from_utm_letter('S'), Some(Qualifier::Hemisphere(Hemisphere::South)));
        assert_eq!(Qualifier::from_utm_letter('C'), Some(Qualifier::Band(band('C'))));
        assert_eq!(Qualifier::from_utm_letter('A'), None);
        assert_eq!(Qualifier::from_utm_letter('I'), None);
    }

    #[test]
    fn band_letter_beats_trailing_indicator() {
        for trailing in [None, Some(Hemisphere::North), Some(Hemisphere::South)] {
            let coord = resolve(&tokens(Qualifier::Band(band('C')), 234_789., trailing)).unwrap();
            assert_eq!(coord.zone_letter(), ZoneLetter::Band(band('C')));
            assert_eq!(coord.hemisphere(), Hemisphere::South);
        }
    }

    #[test]
    fn ambiguous_letter_defaults_north() {
        let n = resolve(&tokens(Qualifier::Hemisphere(Hemisphere::North), 234_789., None)).unwrap();
        let s = resolve(&tokens(Qualifier::Hemisphere(Hemisphere::South), 234_789., None)).unwrap();
        assert_eq!(n, s);
        assert_eq!(n.hemisphere(), Hemisphere::North);
        assert_eq!(n.zone_letter(), ZoneLetter::Band(band('N')));
    }

    #[test]
    fn ambiguous_letter_gives_way_to_trailing() {
        let coord = resolve(&tokens(
            Qualifier::Hemisphere(Hemisphere::North),
            2_100_000.,
            Some(Hemisphere::South),
        ))
        .unwrap();
        assert_eq!(coord.hemisphere(), Hemisphere::South);
        assert_eq!(coord.zone_letter(), ZoneLetter::Band(band('D')));
    }

    #[test]
    fn trailing_decides_without_letter() {
        let south = tokens(Qualifier::Absent, 2_100_000., Some(Hemisphere::South));
        let coord = resolve(&south).unwrap();
        assert_eq!(coord.zone_letter(), ZoneLetter::Band(band('D')));
        assert_eq!(coord.precision(), PrecisionLevel::GridZone);
    }

    #[test]
    fn no_letter_no_trailing_is_malformed() {
        let err = resolve(&tokens(Qualifier::Absent, 234_789., None));
        assert!(matches!(err, Err(Error::MalformedInput(_))));
    }

    #[test]
    fn southern_northing_out_of_range() {
        let err = resolve(&tokens(Qualifier::Absent, 234_789., Some(Hemisphere::South)));
        assert!(matches!(err, Err(Error::OutOfProjectionDomain(_))));
    }

    #[test]
    fn polar_letter_ignores_trailing() {
        let mut toks = tokens(Qualifier::Polar(PolarZone::A), 2_347_891., Some(Hemisphere::North));
        toks.zone = zonespec::UPS;
        toks.easting = 2_347_891.;
        let north = resolve(&toks).unwrap();
        toks.trailing = Some(Hemisphere::South);
        let south = resolve(&toks).unwrap();
        assert_eq!(north, south);
        assert!(!north.is_north());
        assert!(!north.is_utm());
    }
}
