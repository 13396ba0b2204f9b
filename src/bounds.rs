//! Maps a coordinate's precision to the geographic region it stands for.

use tracing::trace;

use crate::{
    band::ZoneLetter,
    constants::{EQUATOR_BAND_SOUTH, UPS_FALSE_ORIGIN, UTM_FALSE_EASTING, UTM_MAX_LAT, UTM_MIN_LAT},
    coords::{bbox::BoundingBox, latlon::LatLon, utm::{self, UtmUps}},
    precision::PrecisionLevel,
    utility::{dms, GeoMath},
    Error, ThisOrThat,
};

pub(crate) fn to_bounding_box(coord: &UtmUps) -> Result<BoundingBox, Error> {
    let precision = coord.precision();

    let bbox = match precision.cell_size() {
        None if precision == PrecisionLevel::ZoneHemisphere => zone_strip(coord),
        None => grid_zone_cell(coord),
        Some(_) if precision.is_point() => BoundingBox::from_point(&coord.to_latlon()?),
        Some(size) => grid_square(coord, size)?,
    };

    trace!(%coord, %precision, %bbox, "bounding box");

    Ok(bbox)
}

/// Zone strip over one hemisphere (UTM) or the whole cap (UPS).
fn zone_strip(coord: &UtmUps) -> BoundingBox {
    let northp = coord.is_north();

    if coord.is_utm() {
        let lon0 = utm::central_meridian(coord.zone());
        let (north, south) = northp.ternary((UTM_MAX_LAT, EQUATOR_BAND_SOUTH), (0., UTM_MIN_LAT));
        BoundingBox::new(north, south, lon0 + 3., lon0 - 3.)
    } else {
        let hd = f64::from(dms::HD);
        let qd = f64::from(dms::QD);
        let (north, south) = northp.ternary((qd, UTM_MAX_LAT), (UTM_MIN_LAT, -qd));
        BoundingBox::new(north, south, hd, -hd)
    }
}

/// The zone/band cell, or the half of the polar cap named by the letter.
fn grid_zone_cell(coord: &UtmUps) -> BoundingBox {
    match coord.zone_letter() {
        ZoneLetter::Band(band) => {
            let (west, east) = band.zone_longitudes(coord.zone());
            let south = (band.index() == 0).ternary(EQUATOR_BAND_SOUTH, band.south());
            BoundingBox::new(band.north(), south, east, west)
        }
        ZoneLetter::Polar(zone) => {
            let (west, east) = zone.longitudes();
            let qd = f64::from(dms::QD);
            let (north, south) = zone
                .hemisphere()
                .is_north()
                .ternary((qd, UTM_MAX_LAT), (UTM_MIN_LAT, -qd));
            BoundingBox::new(north, south, east, west)
        }
    }
}

/// Reprojects the square `[e, e + size] × [n, n + size]`.
fn grid_square(coord: &UtmUps, size: f64) -> Result<BoundingBox, Error> {
    let utmp = coord.is_utm();
    let northp = coord.is_north();
    let (e0, n0) = (coord.easting(), coord.northing());
    let (e1, n1) = (e0 + size, n0 + size);

    utm::check_coords(utmp, northp, e0, n0)?;
    utm::check_coords(utmp, northp, e1, n1)?;

    let mut samples = vec![(e0, n0), (e0, n1), (e1, n1), (e1, n0)];

    // Latitude peaks where an edge is nearest the central meridian (UTM) or
    // the pole (UPS); longitude only ever peaks at a corner.
    if utmp {
        let xc = UTM_FALSE_EASTING.clamp(e0, e1);
        samples.push((xc, n0));
        samples.push((xc, n1));
    } else if (e0..=e1).contains(&UPS_FALSE_ORIGIN) && (n0..=n1).contains(&UPS_FALSE_ORIGIN) {
        return Ok(polar_square(coord.zone(), northp, &samples));
    } else {
        samples.push((UPS_FALSE_ORIGIN.clamp(e0, e1), UPS_FALSE_ORIGIN.clamp(n0, n1)));
    }

    let points = samples
        .iter()
        .map(|&(x, y)| utm::inverse(coord.zone(), northp, x, y))
        .collect::<Vec<_>>();

    let reference = if utmp {
        utm::central_meridian(coord.zone())
    } else {
        utm::inverse(coord.zone(), northp, (e0 + e1) / 2., (n0 + n1) / 2.).longitude
    };

    Ok(enclose(&points, reference))
}

/// A square around the pole covers every longitude.
fn polar_square(zone: i32, northp: bool, corners: &[(f64, f64)]) -> BoundingBox {
    let hd = f64::from(dms::HD);
    let qd = f64::from(dms::QD);

    let lats = corners
        .iter()
        .map(|&(x, y)| utm::inverse(zone, northp, x, y).latitude);

    if northp {
        let south = lats.fold(qd, f64::min);
        BoundingBox::new(qd, south, hd, -hd)
    } else {
        let north = lats.fold(-qd, f64::max);
        BoundingBox::new(north, -qd, hd, -hd)
    }
}

/// Smallest box around `points`, measuring longitudes from `reference` so a
/// box across the antimeridian keeps west > east.
fn enclose(points: &[LatLon], reference: f64) -> BoundingBox {
    let (mut north, mut south) = (f64::NEG_INFINITY, f64::INFINITY);
    let (mut east, mut west) = (f64::NEG_INFINITY, f64::INFINITY);

    for point in points {
        north = north.max(point.latitude);
        south = south.min(point.latitude);

        let offset = reference.ang_diff(point.longitude);
        east = east.max(offset);
        west = west.min(offset);
    }

    BoundingBox::new(
        north,
        south,
        (reference + east).ang_normalize(),
        (reference + west).ang_normalize(),
    )
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::band::{LatitudeBand, PolarZone};

    fn band(letter: char) -> ZoneLetter {
        ZoneLetter::Band(LatitudeBand::from_letter(letter).unwrap())
    }

    #[test]
    fn grid_zone_cells() {
        let coord = UtmUps::new(13, true, 234_789., 234_789., band('N'), PrecisionLevel::GridZone);
        let bbox = to_bounding_box(&coord).unwrap();
        assert_eq!(bbox, BoundingBox::new(8., 0.01, -102., -108.));

        let coord =
            UtmUps::new(32, true, 500_000., 6_700_000., band('V'), PrecisionLevel::GridZone);
        let bbox = to_bounding_box(&coord).unwrap();
        assert_eq!(bbox, BoundingBox::new(64., 56., 12., 3.));

        let coord = UtmUps::new(
            0, false, 2_347_891., 2_347_891.,
            ZoneLetter::Polar(PolarZone::A),
            PrecisionLevel::GridZone,
        );
        let bbox = to_bounding_box(&coord).unwrap();
        assert_eq!(bbox, BoundingBox::new(-80., -90., 0., -180.));
    }

    #[test]
    fn zone_strips() {
        let coord =
            UtmUps::new(13, false, 234_789., 2_100_000., band('D'), PrecisionLevel::ZoneHemisphere);
        assert_eq!(to_bounding_box(&coord).unwrap(), BoundingBox::new(0., -80., -102., -108.));

        let coord = UtmUps::new(
            0, true, 2_000_000., 2_000_000.,
            ZoneLetter::Polar(PolarZone::Z),
            PrecisionLevel::ZoneHemisphere,
        );
        assert_eq!(to_bounding_box(&coord).unwrap(), BoundingBox::new(90., 84., 180., -180.));
    }

    #[test]
    fn kilometre_square_contains_its_corner() {
        let coord = UtmUps::create(18, true, 585_000., 4_511_000.)
            .unwrap()
            .with_precision(PrecisionLevel::Kilometer);
        let bbox = to_bounding_box(&coord).unwrap();
        let corner = coord.to_latlon().unwrap();

        assert!(bbox.contains(&corner));
        assert!(bbox.north() - bbox.south() < 0.01);
        assert!(bbox.east() - bbox.west() < 0.015);
        assert!(!bbox.crosses_antimeridian());
    }

    #[test]
    fn square_across_central_meridian_reaches_its_peak() {
        let coord = UtmUps::create(13, true, 450_000., 7_000_000.)
            .unwrap()
            .with_precision(PrecisionLevel::HundredKilometer);
        let bbox = to_bounding_box(&coord).unwrap();

        let top_middle = utm::inverse(13, true, 500_000., 7_100_000.);
        assert_abs_diff_eq!(bbox.north(), top_middle.latitude, epsilon = 1e-12);
        assert!(bbox.west() < -105. && bbox.east() > -105.);
    }

    #[test]
    fn square_at_antimeridian_wraps() {
        // East edge of zone 60 spills over 180°
        let coord = UtmUps::create(60, true, 800_000., 1_000_000.)
            .unwrap()
            .with_precision(PrecisionLevel::HundredKilometer);
        let bbox = to_bounding_box(&coord).unwrap();

        assert!(bbox.crosses_antimeridian(), "{bbox}");
        assert!(bbox.west() > 179.);
        assert!(bbox.east() < -179.);
    }

    #[test]
    fn square_around_pole_spans_all_longitudes() {
        let coord = UtmUps::new(
            0, true, 1_900_000., 1_900_000.,
            ZoneLetter::Polar(PolarZone::Y),
            PrecisionLevel::HundredKilometer,
        );
        let bbox = to_bounding_box(&coord).unwrap();

        assert_abs_diff_eq!(bbox.north(), 90.);
        assert_abs_diff_eq!(bbox.west(), -180.);
        assert_abs_diff_eq!(bbox.east(), 180.);
        assert!(bbox.south() > 88. && bbox.south() < 90.);
    }

    #[test]
    fn polar_square_stays_below_pole() {
        let coord = UtmUps::new(
            0, false, 2_100_000., 1_500_000.,
            ZoneLetter::Polar(PolarZone::B),
            PrecisionLevel::TenKilometer,
        );
        let bbox = to_bounding_box(&coord).unwrap();

        assert!(bbox.south() > -90.);
        assert!(bbox.north() < -80.);
        assert!(bbox.west() >= 0. && bbox.east() <= 180.);
    }

    #[test]
    fn exact_collapses_to_point() {
        let coord = UtmUps::create(18, true, 585_664.121, 4_511_315.422).unwrap();
        let bbox = to_bounding_box(&coord).unwrap();

        assert!(bbox.is_point());
        assert_abs_diff_eq!(bbox.north(), 40.748_333, epsilon = 1e-6);
        assert_abs_diff_eq!(bbox.west(), -73.985_278, epsilon = 1e-6);
    }

    #[test]
    fn square_outside_envelope_fails() {
        let coord =
            UtmUps::new(13, true, 2_000_000., 1_000_000., band('Q'), PrecisionLevel::Kilometer);
        assert!(matches!(to_bounding_box(&coord), Err(Error::OutOfProjectionDomain(_))));
    }
}
