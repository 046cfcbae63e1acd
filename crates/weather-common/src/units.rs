//! Physical units attached to value series.

use serde::{Deserialize, Serialize};

/// Unit of a decoded or derived series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiUnit {
    Celsius,
    MetrePerSecond,
    Percent,
    Pascal,
    Hectopascal,
    KiloPascal,
    Millimetre,
    Centimetre,
    WattPerSquareMetre,
    CubicMetrePerCubicMetre,
    DegreeDirection,
    /// WMO weather interpretation code
    WmoCode,
}

impl SiUnit {
    /// Display symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Celsius => "°C",
            Self::MetrePerSecond => "m/s",
            Self::Percent => "%",
            Self::Pascal => "Pa",
            Self::Hectopascal => "hPa",
            Self::KiloPascal => "kPa",
            Self::Millimetre => "mm",
            Self::Centimetre => "cm",
            Self::WattPerSquareMetre => "W/m²",
            Self::CubicMetrePerCubicMetre => "m³/m³",
            Self::DegreeDirection => "°",
            Self::WmoCode => "wmo code",
        }
    }

    /// Multiplicative factor converting a value in `self` into `target`.
    ///
    /// Only dimensionally compatible pairs convert; everything else is `None`.
    pub fn conversion_factor(&self, target: SiUnit) -> Option<f32> {
        use SiUnit::*;
        if *self == target {
            return Some(1.0);
        }
        let factor = match (self, target) {
            (Pascal, Hectopascal) => 0.01,
            (Pascal, KiloPascal) => 0.001,
            (Hectopascal, Pascal) => 100.0,
            (Hectopascal, KiloPascal) => 0.1,
            (KiloPascal, Pascal) => 1000.0,
            (KiloPascal, Hectopascal) => 10.0,
            (Millimetre, Centimetre) => 0.1,
            (Centimetre, Millimetre) => 10.0,
            _ => return None,
        };
        Some(factor)
    }
}

impl std::fmt::Display for SiUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pressure_conversions() {
        assert_eq!(SiUnit::Pascal.conversion_factor(SiUnit::Hectopascal), Some(0.01));
        assert_eq!(SiUnit::KiloPascal.conversion_factor(SiUnit::Pascal), Some(1000.0));
        assert_eq!(SiUnit::Pascal.conversion_factor(SiUnit::Pascal), Some(1.0));
    }

    #[test]
    fn test_incompatible_units() {
        assert_eq!(SiUnit::Celsius.conversion_factor(SiUnit::Percent), None);
        assert_eq!(SiUnit::Millimetre.conversion_factor(SiUnit::Pascal), None);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&SiUnit::WattPerSquareMetre).unwrap();
        assert_eq!(json, "\"watt_per_square_metre\"");
    }
}
