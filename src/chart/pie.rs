//! Pie chart: filled wedges clockwise from 12 o'clock.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::api::{InvalidationTopic, RedrawRequest};
use crate::core::{Coordinate, TextMeasurer, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::render::{
    ArcPrimitive, CanvasLayerKind, Color, LayeredRenderFrame, PaintStyle, TextHAlign,
    TextPrimitive,
};

use super::{ChartPainter, validate_density};

/// Angle of the first wedge's leading edge (12 o'clock).
pub const PIE_START_DEGREES: f64 = -90.0;

/// One wedge; `value` is a fraction of the whole circle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PieSlice {
    pub value: f64,
    pub color: Color,
}

impl PieSlice {
    #[must_use]
    pub const fn new(value: f64, color: Color) -> Self {
        Self { value, color }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PieChartData {
    pub slices: Vec<PieSlice>,
}

impl PieChartData {
    #[must_use]
    pub fn new(slices: Vec<PieSlice>) -> Self {
        Self { slices }
    }

    pub fn validate(&self) -> ChartResult<()> {
        for slice in &self.slices {
            if !slice.value.is_finite() || slice.value < 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "pie slice value must be finite and >= 0, got {}",
                    slice.value
                )));
            }
            slice.color.validate()?;
        }
        Ok(())
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        self.slices.iter().map(|slice| slice.value).sum()
    }
}

/// Angular extent of one wedge plus its percentage label, if it gets one.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceGeometry {
    pub start_degrees: f64,
    pub sweep_degrees: f64,
    pub color: Color,
    pub label: Option<String>,
}

impl SliceGeometry {
    #[must_use]
    pub fn mid_degrees(&self) -> f64 {
        self.start_degrees + self.sweep_degrees / 2.0
    }

    /// Point on the wedge bisector at `distance` from `center`.
    #[must_use]
    pub fn bisector_point(&self, center: &Coordinate, distance: f64) -> Coordinate {
        let angle = self.mid_degrees().to_radians();
        Coordinate::new(
            center.x + angle.cos() * distance,
            center.y + angle.sin() * distance,
        )
    }
}

/// Lays wedges out back to back starting at 12 o'clock.
///
/// Slices whose value exceeds `label_threshold` get a `"{:.1}%"` label.
#[must_use]
pub fn pie_slices(data: &PieChartData, label_threshold: f64) -> Vec<SliceGeometry> {
    let mut start = PIE_START_DEGREES;
    data.slices
        .iter()
        .map(|slice| {
            let sweep = 360.0 * slice.value;
            let geometry = SliceGeometry {
                start_degrees: start,
                sweep_degrees: sweep,
                color: slice.color,
                label: (slice.value > label_threshold)
                    .then(|| format!("{:.1}%", slice.value * 100.0)),
            };
            start += sweep;
            geometry
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PieChartStyle {
    pub label_font_size: f64,
    pub label_threshold: f64,
    pub radius_factor: f64,
    pub label_radius_factor: f64,
    pub label_color: Color,
}

impl Default for PieChartStyle {
    fn default() -> Self {
        Self {
            label_font_size: 10.0,
            label_threshold: 0.001,
            radius_factor: 0.9,
            label_radius_factor: 0.6,
            label_color: Color::argb8(138, 0, 0, 0),
        }
    }
}

impl PieChartStyle {
    #[must_use]
    pub fn with_label_threshold(mut self, label_threshold: f64) -> Self {
        self.label_threshold = label_threshold;
        self
    }

    #[must_use]
    pub fn with_label_color(mut self, label_color: Color) -> Self {
        self.label_color = label_color;
        self
    }
}

#[derive(Debug, Clone)]
pub struct PieChart {
    style: PieChartStyle,
    density: f64,
    data: Option<PieChartData>,
    redraw: RedrawRequest,
}

impl Default for PieChart {
    fn default() -> Self {
        Self::new(PieChartStyle::default())
    }
}

impl PieChart {
    #[must_use]
    pub fn new(style: PieChartStyle) -> Self {
        Self {
            style,
            density: 1.0,
            data: None,
            redraw: RedrawRequest::default(),
        }
    }

    #[must_use]
    pub fn style(&self) -> PieChartStyle {
        self.style
    }

    pub fn set_style(&mut self, style: PieChartStyle) {
        self.style = style;
        self.redraw.request(InvalidationTopic::Style);
    }

    #[must_use]
    pub fn data(&self) -> Option<&PieChartData> {
        self.data.as_ref()
    }

    pub fn set_data(&mut self, data: PieChartData) -> ChartResult<()> {
        data.validate()?;
        let total = data.total();
        if total > 1.0 + 1e-9 {
            warn!(total, "pie slices exceed a full circle");
        }
        debug!(slices = data.slices.len(), total, "set pie chart data");
        self.data = Some(data);
        self.redraw.request(InvalidationTopic::Data);
        Ok(())
    }

    /// Center and radius for `viewport`.
    #[must_use]
    pub fn geometry(&self, viewport: Viewport) -> (Coordinate, f64) {
        let center = Coordinate::new(
            f64::from(viewport.width / 2),
            f64::from(viewport.height / 2),
        );
        let radius = center.x.min(center.y) * self.style.radius_factor;
        (center, radius)
    }
}

impl ChartPainter for PieChart {
    fn paint(
        &self,
        viewport: Viewport,
        measurer: &dyn TextMeasurer,
    ) -> ChartResult<LayeredRenderFrame> {
        let viewport = viewport.ensure_valid()?;
        let mut frame = LayeredRenderFrame::canonical(viewport);
        let Some(data) = self.data.as_ref() else {
            return Ok(frame);
        };

        let (center, radius) = self.geometry(viewport);
        let font = self.style.label_font_size * self.density;
        let slices = pie_slices(data, self.style.label_threshold);
        for slice in &slices {
            frame.push(
                CanvasLayerKind::Series,
                ArcPrimitive {
                    center_x: center.x,
                    center_y: center.y,
                    radius,
                    start_degrees: slice.start_degrees,
                    sweep_degrees: slice.sweep_degrees,
                    use_center: true,
                    style: PaintStyle::Fill(slice.color),
                },
            );
            let Some(label) = slice.label.as_ref() else {
                continue;
            };
            let anchor = slice.bisector_point(&center, radius * self.style.label_radius_factor);
            let bounds = measurer.measure(label, font);
            frame.push(
                CanvasLayerKind::Labels,
                TextPrimitive::new(
                    label.clone(),
                    anchor.x,
                    anchor.y + bounds.height * 0.5,
                    font,
                    self.style.label_color,
                    TextHAlign::Center,
                ),
            );
        }

        trace!(slices = slices.len(), radius, "painted pie chart");
        Ok(frame)
    }

    fn redraw_request(&self) -> &RedrawRequest {
        &self.redraw
    }

    fn redraw_request_mut(&mut self) -> &mut RedrawRequest {
        &mut self.redraw
    }

    fn density(&self) -> f64 {
        self.density
    }

    fn set_density(&mut self, density: f64) -> ChartResult<()> {
        validate_density(density)?;
        self.density = density;
        self.redraw.request(InvalidationTopic::Style);
        Ok(())
    }
}
