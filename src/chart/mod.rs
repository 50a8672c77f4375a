//! Chart engines.
//!
//! Every engine owns one immutable data snapshot plus a `RedrawRequest`, and
//! recomputes its whole layout from the viewport on each `paint` call.

pub mod bar;
pub mod gauge;
pub mod line;
pub mod pie;
pub mod radar;

pub use bar::{BarChart, BarChartData, BarChartStyle};
pub use gauge::{GaugeChart, GaugeData, GaugeStyle};
pub use line::{
    GraphLine, GridPositions, LineChart, LineChartData, LineChartStyle, MAX_GRID_STEPS,
};
pub use pie::{PieChart, PieChartData, PieChartStyle, PieSlice, SliceGeometry, pie_slices};
pub use radar::{
    MAX_SCORE_LAYERS, RadarChart, RadarChartData, RadarChartStyle, RadarPalette, RadarSubject,
    adjust_label_position, polygon_vertices,
};

use crate::api::RedrawRequest;
use crate::core::{TextMeasurer, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::render::LayeredRenderFrame;

/// Shared contract between chart engines and the host facade.
pub trait ChartPainter {
    /// Builds the draw commands for one pass over `viewport`.
    fn paint(
        &self,
        viewport: Viewport,
        measurer: &dyn TextMeasurer,
    ) -> ChartResult<LayeredRenderFrame>;

    fn redraw_request(&self) -> &RedrawRequest;

    fn redraw_request_mut(&mut self) -> &mut RedrawRequest;

    /// Display density (device pixels per density-independent pixel).
    fn density(&self) -> f64;

    fn set_density(&mut self, density: f64) -> ChartResult<()>;

    /// Advances time-driven state; returns `true` when a redraw was requested.
    fn advance(&mut self, _delta_seconds: f64) -> bool {
        false
    }
}

pub(crate) fn validate_density(density: f64) -> ChartResult<()> {
    if !density.is_finite() || density <= 0.0 {
        return Err(ChartError::InvalidData(
            "display density must be finite and > 0".to_owned(),
        ));
    }
    Ok(())
}

/// Formats a sample for display: integral values without a fraction.
#[must_use]
pub fn format_value(value: f64) -> String {
    // `+ 0.0` folds negative zero.
    format!("{}", value + 0.0)
}

/// Decimal places needed to write `value` exactly, capped at ten.
#[must_use]
pub(crate) fn decimal_places(value: f64) -> i32 {
    let mut scale = 1.0;
    for places in 0..10 {
        let scaled = value.abs() * scale;
        if (scaled - scaled.round()).abs() <= 1e-6 {
            return places;
        }
        scale *= 10.0;
    }
    10
}

/// Rounds `value` to `places` decimals.
#[must_use]
pub(crate) fn round_to_places(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
