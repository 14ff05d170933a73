use crate::errors::ForecastError;

/// Min-max scaling fitted over one price series.
///
/// Fit once per forecast request and dropped with it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleParameters {
    min: f64,
    max: f64,
}

impl ScaleParameters {
    /// Scans `prices` for the minimum and maximum.
    ///
    /// A constant series has no usable range and is rejected rather than
    /// divided by zero later on.
    pub fn fit(prices: &[f64]) -> Result<Self, ForecastError> {
        if prices.is_empty() {
            return Err(ForecastError::NumericDegeneracy(
                "cannot fit scaling on an empty series".to_string(),
            ));
        }
        if let Some(bad) = prices.iter().find(|p| !p.is_finite()) {
            return Err(ForecastError::NumericDegeneracy(format!(
                "series contains non-finite price {}",
                bad
            )));
        }

        let (min, max) = prices
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &p| {
                (lo.min(p), hi.max(p))
            });

        Self::new(min, max)
    }

    pub fn new(min: f64, max: f64) -> Result<Self, ForecastError> {
        if !(max > min) {
            return Err(ForecastError::NumericDegeneracy(format!(
                "scaling range is empty (min {}, max {})",
                min, max
            )));
        }
        Ok(Self { min, max })
    }

    pub fn forward(&self, value: f64) -> f64 {
        (value - self.min) / (self.max - self.min)
    }

    pub fn inverse(&self, normalized: f64) -> f64 {
        normalized * (self.max - self.min) + self.min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_finds_range() {
        let params = ScaleParameters::fit(&[12.0, 8.5, 30.25, 19.0]).unwrap();
        assert_eq!(params, ScaleParameters::new(8.5, 30.25).unwrap());
        assert_eq!(params.forward(8.5), 0.0);
        assert_eq!(params.forward(30.25), 1.0);
    }

    #[test]
    fn test_round_trip_within_tolerance() {
        let params = ScaleParameters::new(101.37, 3478.91).unwrap();
        for x in [-50.0, 0.0, 101.37, 512.123456, 3478.91, 10_000.5] {
            let back = params.inverse(params.forward(x));
            assert!((back - x).abs() < 1e-6, "{} came back as {}", x, back);
        }
    }

    #[test]
    fn test_constant_series_is_degenerate() {
        let err = ScaleParameters::fit(&[42.0; 150]).unwrap_err();
        assert!(matches!(err, ForecastError::NumericDegeneracy(_)));
    }

    #[test]
    fn test_empty_and_non_finite_are_degenerate() {
        assert!(matches!(
            ScaleParameters::fit(&[]),
            Err(ForecastError::NumericDegeneracy(_))
        ));
        assert!(matches!(
            ScaleParameters::fit(&[1.0, f64::NAN, 3.0]),
            Err(ForecastError::NumericDegeneracy(_))
        ));
    }

    #[test]
    fn test_new_rejects_inverted_range() {
        assert!(ScaleParameters::new(5.0, 1.0).is_err());
    }
}
