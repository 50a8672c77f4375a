use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Linear mapping from a value domain onto a vertical pixel span.
///
/// `origin_px` is where `domain_min` lands and `end_px` is where `domain_max`
/// lands; on screen `end_px` is usually above (smaller than) `origin_px`.
/// A flat domain (`min == max`) is allowed and maps every value onto the
/// origin with a zero unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueScale {
    domain_min: f64,
    domain_max: f64,
    origin_px: f64,
    end_px: f64,
}

impl ValueScale {
    pub fn new(domain_min: f64, domain_max: f64, origin_px: f64, end_px: f64) -> ChartResult<Self> {
        if !domain_min.is_finite() || !domain_max.is_finite() {
            return Err(ChartError::InvalidData(
                "scale domain must be finite".to_owned(),
            ));
        }
        if domain_max < domain_min {
            return Err(ChartError::InvalidData(
                "scale domain max must be >= min".to_owned(),
            ));
        }
        if !origin_px.is_finite() || !end_px.is_finite() {
            return Err(ChartError::InvalidData(
                "scale pixel span must be finite".to_owned(),
            ));
        }

        Ok(Self {
            domain_min,
            domain_max,
            origin_px,
            end_px,
        })
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_min, self.domain_max)
    }

    #[must_use]
    pub fn domain_span(self) -> f64 {
        self.domain_max - self.domain_min
    }

    #[must_use]
    pub fn is_flat(self) -> bool {
        self.domain_span() == 0.0
    }

    /// Pixels per domain unit, `0.0` for a flat domain.
    #[must_use]
    pub fn unit(self) -> f64 {
        if self.is_flat() {
            return 0.0;
        }
        (self.origin_px - self.end_px).abs() / self.domain_span()
    }

    /// Fraction of the domain covered by `value`, `0.0` for a flat domain.
    #[must_use]
    pub fn ratio(self, value: f64) -> f64 {
        if self.is_flat() {
            return 0.0;
        }
        (value - self.domain_min) / self.domain_span()
    }

    pub fn value_to_pixel(self, value: f64) -> ChartResult<f64> {
        if !value.is_finite() {
            return Err(ChartError::InvalidData("value must be finite".to_owned()));
        }
        let extent = (self.origin_px - self.end_px).abs();
        Ok(self.origin_px - self.ratio(value) * extent)
    }

    pub fn pixel_to_value(self, pixel: f64) -> ChartResult<f64> {
        if !pixel.is_finite() {
            return Err(ChartError::InvalidData("pixel must be finite".to_owned()));
        }
        let extent = (self.origin_px - self.end_px).abs();
        if self.is_flat() || extent == 0.0 {
            return Ok(self.domain_min);
        }
        let normalized = (self.origin_px - pixel) / extent;
        Ok(self.domain_min + normalized * self.domain_span())
    }
}
