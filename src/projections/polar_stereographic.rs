use crate::{
    ThisOrThat,
    constants::{WGS84_A, WGS84_F, UPS_K0},
    utility::{GeoMath, dms},
    coords::latlon::LatLon,
};

const F: f64 = WGS84_F;
const E2: f64 = F * (2. - F);

/// Polar stereographic projection centred on either pole.
pub(crate) struct PolarStereographic {
    a: f64,
    k0: f64,
    es: f64,
    c: f64,
}

impl PolarStereographic {
    pub fn ups() -> PolarStereographic {
        let es = (F < 0.).ternary(-1., 1.) * E2.abs().sqrt();
        let c = (1. - F) * 1_f64.eatanhe(es).exp();

        Self {
            a: WGS84_A,
            k0: UPS_K0,
            es,
            c,
        }
    }

    /// Returns `(x, y)` relative to the pole, no false origin applied.
    pub fn from_latlon(&self, northp: bool, lat: f64, lon: f64) -> (f64, f64) {
        let lat = lat * northp.ternary(1., -1.);

        let tau = lat.to_radians().tan();
        let taup = tau.taupf(self.es);
        let mut rho = 1_f64.hypot(taup) + taup.abs();
        rho = (taup >= 0.).ternary_lazy(
            || (lat.eps_eq(f64::from(dms::QD))).ternary_lazy(|| 0., || 1. / rho),
            || rho,
        );
        rho *= 2. * self.k0 * self.a / self.c;

        let (x, y) = lon.to_radians().sin_cos();

        (x * rho, y * northp.ternary(-rho, rho))
    }

    pub fn to_latlon(&self, northp: bool, x: f64, y: f64) -> LatLon {
        let rho = x.hypot(y);
        let t = (rho != 0.)
            .ternary_lazy(
                || rho / (2. * self.k0 * self.a / self.c),
                || f64::EPSILON.powi(2)
            );
        let taup = (1. / t - t) / 2.;
        let tau = taup.tauf(self.es);

        let lat = northp.ternary(1., -1.) * tau.atan().to_degrees();
        let lon = x.atan2(northp.ternary(-y, y)).to_degrees();

        LatLon::new(lat, lon)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn pole_is_origin() {
        let ps = PolarStereographic::ups();
        let (x, y) = ps.from_latlon(true, 90., 45.);
        assert_abs_diff_eq!(x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(y, 0.0, epsilon = 1e-9);

        let back = ps.to_latlon(false, 0., 0.);
        assert_abs_diff_eq!(back.latitude(), -90.0, epsilon = 1e-9);
    }

    #[test]
    fn north_cap_grid_north_points_away_from_greenwich() {
        // On the north cap the Greenwich meridian runs down the negative y axis
        let ps = PolarStereographic::ups();
        let (x, y) = ps.from_latlon(true, 85., 0.);
        assert_abs_diff_eq!(x, 0.0, epsilon = 1e-6);
        assert!(y < 0.);

        let (x, y) = ps.from_latlon(false, -85., 0.);
        assert_abs_diff_eq!(x, 0.0, epsilon = 1e-6);
        assert!(y > 0.);
    }

    #[test]
    fn inverse_undoes_forward() {
        let ps = PolarStereographic::ups();
        let points = [
            (true, 84.5, 120.),
            (true, 89.9, -45.),
            (false, -80.5, -170.),
            (false, -87., 3.),
        ];
        for (northp, lat, lon) in points {
            let (x, y) = ps.from_latlon(northp, lat, lon);
            let back = ps.to_latlon(northp, x, y);
            assert_abs_diff_eq!(back.latitude(), lat, epsilon = 1e-9);
            assert_abs_diff_eq!(back.longitude(), lon, epsilon = 1e-9);
        }
    }
}
