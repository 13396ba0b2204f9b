use std::fmt::Display;

/// How precisely a [`UtmUps`](crate::UtmUps) coordinate pins down a location,
/// coarsest first.
///
/// Every level owns the size of the cell it describes, so the parser and the
/// bounding-box calculator agree on what a digit count means.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PrecisionLevel {
    /// Zone number and hemisphere only
    ZoneHemisphere,
    /// Grid zone designation: zone number and latitude band (or polar zone)
    GridZone,
    HundredKilometer,
    TenKilometer,
    Kilometer,
    HundredMeter,
    TenMeter,
    Meter,
    /// An exact projected point
    Exact,
}

impl PrecisionLevel {
    /// Largest number of digits per axis in a USNG reference
    pub const MAX_DIGITS: usize = 5;

    /// Level described by `digits` easting (and northing) digits in a USNG
    /// reference following the 100 km square letters.
    ///
    /// ```
    /// use usngconvert::PrecisionLevel;
    ///
    /// assert_eq!(PrecisionLevel::from_digit_count(0), Some(PrecisionLevel::HundredKilometer));
    /// assert_eq!(PrecisionLevel::from_digit_count(5), Some(PrecisionLevel::Meter));
    /// assert_eq!(PrecisionLevel::from_digit_count(6), None);
    /// ```
    pub fn from_digit_count(digits: usize) -> Option<PrecisionLevel> {
        match digits {
            0 => Some(PrecisionLevel::HundredKilometer),
            1 => Some(PrecisionLevel::TenKilometer),
            2 => Some(PrecisionLevel::Kilometer),
            3 => Some(PrecisionLevel::HundredMeter),
            4 => Some(PrecisionLevel::TenMeter),
            5 => Some(PrecisionLevel::Meter),
            _ => None,
        }
    }

    /// Digits per axis needed to write this level in a USNG reference, or
    /// `None` for levels coarser than a 100 km square.
    pub fn digit_count(self) -> Option<usize> {
        match self {
            PrecisionLevel::ZoneHemisphere | PrecisionLevel::GridZone => None,
            PrecisionLevel::HundredKilometer => Some(0),
            PrecisionLevel::TenKilometer => Some(1),
            PrecisionLevel::Kilometer => Some(2),
            PrecisionLevel::HundredMeter => Some(3),
            PrecisionLevel::TenMeter => Some(4),
            PrecisionLevel::Meter | PrecisionLevel::Exact => Some(Self::MAX_DIGITS),
        }
    }

    /// Side of the square grid cell in metres. `None` means the cell is a
    /// geographic zone/band cell rather than a square in the projection
    /// plane; `Some(0.0)` means a single point.
    ///
    /// ```
    /// use usngconvert::PrecisionLevel;
    ///
    /// assert_eq!(PrecisionLevel::GridZone.cell_size(), None);
    /// assert_eq!(PrecisionLevel::Kilometer.cell_size(), Some(1000.0));
    /// assert_eq!(PrecisionLevel::Exact.cell_size(), Some(0.0));
    /// ```
    pub fn cell_size(self) -> Option<f64> {
        match self {
            PrecisionLevel::ZoneHemisphere | PrecisionLevel::GridZone => None,
            PrecisionLevel::HundredKilometer => Some(100_000.),
            PrecisionLevel::TenKilometer => Some(10_000.),
            PrecisionLevel::Kilometer => Some(1_000.),
            PrecisionLevel::HundredMeter => Some(100.),
            PrecisionLevel::TenMeter => Some(10.),
            PrecisionLevel::Meter => Some(1.),
            PrecisionLevel::Exact => Some(0.),
        }
    }

    /// Whether a coordinate at this level names a point rather than a region.
    pub fn is_point(self) -> bool {
        self == PrecisionLevel::Exact
    }
}

impl Display for PrecisionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            PrecisionLevel::ZoneHemisphere => "zone/hemisphere",
            PrecisionLevel::GridZone => "grid zone",
            PrecisionLevel::HundredKilometer => "100 km",
            PrecisionLevel::TenKilometer => "10 km",
            PrecisionLevel::Kilometer => "1 km",
            PrecisionLevel::HundredMeter => "100 m",
            PrecisionLevel::TenMeter => "10 m",
            PrecisionLevel::Meter => "1 m",
            PrecisionLevel::Exact => "exact",
        };
        write!(f, "{label}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_ordered_coarse_to_fine() {
        assert!(PrecisionLevel::ZoneHemisphere < PrecisionLevel::GridZone);
        assert!(PrecisionLevel::GridZone < PrecisionLevel::HundredKilometer);
        assert!(PrecisionLevel::Meter < PrecisionLevel::Exact);
    }

    #[test]
    fn digit_counts_round_trip_through_levels() {
        for digits in 0..=PrecisionLevel::MAX_DIGITS {
            let level = PrecisionLevel::from_digit_count(digits).unwrap();
            assert_eq!(level.digit_count(), Some(digits));
        }
    }

    #[test]
    fn cell_sizes_shrink_by_ten() {
        let sizes = (0..=PrecisionLevel::MAX_DIGITS)
            .filter_map(PrecisionLevel::from_digit_count)
            .filter_map(PrecisionLevel::cell_size)
            .collect::<Vec<_>>();
        assert_eq!(sizes, vec![100_000., 10_000., 1_000., 100., 10., 1.]);
        assert!(!PrecisionLevel::Meter.is_point());
        assert!(PrecisionLevel::Exact.is_point());
    }
}
