//! Property tests for the projection round trip and the grid reference
//! formatter.

use proptest::prelude::*;
use usngconvert::{
    from_geographic_point, to_bounding_box, to_geographic_point, GridSystem, LatLon,
    PrecisionLevel, Usng, ZoneHint,
};

/// Longitude difference folded into [-180, 180)
fn lon_diff(a: f64, b: f64) -> f64 {
    (a - b + 540.0).rem_euclid(360.0) - 180.0
}

fn assert_round_trip(lat: f64, lon: f64, system: GridSystem) -> Result<(), TestCaseError> {
    let point = LatLon::create(lat, lon).unwrap();
    let coord = from_geographic_point(&point, None).unwrap();
    prop_assert_eq!(coord.system(), system);

    let back = to_geographic_point(&coord).unwrap();
    prop_assert!((back.latitude() - lat).abs() <= 1e-9, "latitude {} -> {}", lat, back.latitude());
    prop_assert!(
        lon_diff(back.longitude(), lon).abs() <= 1e-9,
        "longitude {} -> {}",
        lon,
        back.longitude()
    );

    Ok(())
}

proptest! {
    #[test]
    fn utm_round_trip(lat in -80.0..84.0f64, lon in -180.0..180.0f64) {
        assert_round_trip(lat, lon, GridSystem::Utm)?;
    }

    #[test]
    fn ups_north_round_trip(lat in 84.0..89.9f64, lon in -180.0..180.0f64) {
        assert_round_trip(lat, lon, GridSystem::Ups)?;
    }

    #[test]
    fn ups_south_round_trip(lat in -89.9..-80.0f64, lon in -180.0..180.0f64) {
        assert_round_trip(lat, lon, GridSystem::Ups)?;
    }

    /// Points just across a zone's eastern edge still project into it.
    #[test]
    fn neighbouring_zone_round_trip(
        lat in -80.0..84.0f64,
        zone in 1..=60i32,
        offset in -0.5..0.5f64,
    ) {
        let mut lon = f64::from(6 * zone - 180) + offset;
        if lon > 180.0 {
            lon -= 360.0;
        }
        let point = LatLon::create(lat, lon).unwrap();

        let coord = from_geographic_point(&point, Some(ZoneHint::Zone(zone))).unwrap();
        prop_assert_eq!(coord.zone(), zone);
        let back = to_geographic_point(&coord).unwrap();
        prop_assert!((back.latitude() - lat).abs() <= 1e-9);
        prop_assert!(lon_diff(back.longitude(), lon).abs() <= 1e-9);
    }

    /// A metre-precision reference names the square holding the point.
    #[test]
    fn usng_reference_round_trip(lat in -79.9..83.9f64, lon in -180.0..180.0f64) {
        let point = LatLon::create(lat, lon).unwrap();
        let coord = from_geographic_point(&point, None).unwrap();

        let text = coord.to_usng(PrecisionLevel::Meter).unwrap().to_string();
        let parsed = Usng::parse_str(&text).unwrap().to_utmups();

        prop_assert_eq!(parsed.zone(), coord.zone());
        prop_assert_eq!(parsed.is_north(), coord.is_north());
        prop_assert_eq!(parsed.easting(), coord.easting().floor());
        prop_assert_eq!(parsed.northing(), coord.northing().floor());
        prop_assert_eq!(parsed.precision(), PrecisionLevel::Meter);
    }

    /// The kilometre square around a point contains it.
    #[test]
    fn square_contains_point(lat in -79.0..83.0f64, lon in -180.0..180.0f64) {
        let point = LatLon::create(lat, lon).unwrap();
        let coord = from_geographic_point(&point, None).unwrap();

        let text = coord.to_usng(PrecisionLevel::Kilometer).unwrap().to_string();
        let square = Usng::parse_str(&text).unwrap().to_utmups();
        let bbox = to_bounding_box(&square).unwrap();

        prop_assert!(bbox.contains(&point), "{} not in {}", point, bbox);
    }
}
