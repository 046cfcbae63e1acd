//! Value series passed between the reader, the derivation engine and the mixer.

use serde::{Deserialize, Serialize};
use weather_common::SiUnit;

use crate::error::{ReaderError, Result};

/// A time series of values with a unit. Missing timesteps are NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueSeries {
    pub data: Vec<f32>,
    pub unit: SiUnit,
}

impl ValueSeries {
    pub fn new(data: Vec<f32>, unit: SiUnit) -> Self {
        Self { data, unit }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Fail unless the series is in `unit`.
    pub fn expect_unit(&self, unit: SiUnit) -> Result<&Self> {
        if self.unit != unit {
            return Err(ReaderError::UnitMismatch {
                expected: unit,
                actual: self.unit,
            });
        }
        Ok(self)
    }

    /// Convert into `target`, scaling the values.
    pub fn convert(mut self, target: SiUnit) -> Result<Self> {
        let factor = self
            .unit
            .conversion_factor(target)
            .ok_or(ReaderError::UnitMismatch {
                expected: target,
                actual: self.unit,
            })?;
        if factor != 1.0 {
            self.data.iter_mut().for_each(|v| *v *= factor);
        }
        self.unit = target;
        Ok(self)
    }

    /// Apply `f` to every value, producing a series in `unit`.
    pub fn map(&self, unit: SiUnit, f: impl Fn(f32) -> f32) -> Self {
        Self::new(self.data.iter().map(|&v| f(v)).collect(), unit)
    }

    /// Combine two series of the same unit element-wise.
    pub fn zip_with(
        &self,
        other: &Self,
        unit: SiUnit,
        f: impl Fn(f32, f32) -> f32,
    ) -> Result<Self> {
        other.expect_unit(self.unit)?;
        self.check_len(other)?;
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(&a, &b)| f(a, b))
            .collect();
        Ok(Self::new(data, unit))
    }

    /// Whether any timestep is missing.
    pub fn has_missing(&self) -> bool {
        self.data.iter().any(|v| v.is_nan())
    }

    /// Index of the first missing timestep.
    pub fn first_missing(&self) -> Option<usize> {
        self.data.iter().position(|v| v.is_nan())
    }

    /// Replace missing timesteps with values from `other`.
    ///
    /// Returns the number of timesteps filled.
    pub fn fill_missing_from(&mut self, other: &Self) -> Result<usize> {
        other.expect_unit(self.unit)?;
        self.check_len(other)?;
        let mut filled = 0;
        for (v, &o) in self.data.iter_mut().zip(&other.data) {
            if v.is_nan() && !o.is_nan() {
                *v = o;
                filled += 1;
            }
        }
        Ok(filled)
    }

    fn check_len(&self, other: &Self) -> Result<()> {
        if self.len() != other.len() {
            return Err(ReaderError::invalid_configuration(format!(
                "series length mismatch: {} vs {}",
                self.len(),
                other.len()
            )));
        }
        Ok(())
    }
}

/// Element-wise combination of several equally long slices.
pub(crate) fn zip_n<const N: usize>(
    inputs: [&[f32]; N],
    f: impl Fn([f32; N]) -> f32,
) -> Vec<f32> {
    let len = inputs.iter().map(|s| s.len()).min().unwrap_or(0);
    (0..len)
        .map(|i| f(std::array::from_fn(|k| inputs[k][i])))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zip_with_checks_units() {
        let precip = ValueSeries::new(vec![1.0, 2.0], SiUnit::Millimetre);
        let temp = ValueSeries::new(vec![1.0, 2.0], SiUnit::Celsius);
        assert!(matches!(
            precip.zip_with(&temp, SiUnit::Millimetre, |a, b| a - b),
            Err(ReaderError::UnitMismatch { .. })
        ));

        let swe = ValueSeries::new(vec![0.5, 3.0], SiUnit::Millimetre);
        let diff = precip.zip_with(&swe, SiUnit::Millimetre, |a, b| a - b).unwrap();
        assert_eq!(diff.data, vec![0.5, -1.0]);
    }

    #[test]
    fn test_fill_missing_from() {
        let mut primary = ValueSeries::new(vec![1.0, f32::NAN, f32::NAN], SiUnit::Celsius);
        let fallback = ValueSeries::new(vec![9.0, 2.0, f32::NAN], SiUnit::Celsius);

        assert_eq!(primary.fill_missing_from(&fallback).unwrap(), 1);
        assert_eq!(primary.data[..2], [1.0, 2.0]);
        assert_eq!(primary.first_missing(), Some(2));
    }

    #[test]
    fn test_convert() {
        let pressure = ValueSeries::new(vec![101_300.0], SiUnit::Pascal);
        let hpa = pressure.convert(SiUnit::Hectopascal).unwrap();
        assert!((hpa.data[0] - 1013.0).abs() < 1e-3);
        assert!(hpa.convert(SiUnit::Celsius).is_err());
    }

    #[test]
    fn test_zip_n() {
        let a = [1.0, 2.0];
        let b = [10.0, 20.0];
        let c = [100.0, 200.0];
        let sum = zip_n([a.as_slice(), b.as_slice(), c.as_slice()], |[x, y, z]| x + y + z);
        assert_eq!(sum, vec![111.0, 222.0]);
    }
}
