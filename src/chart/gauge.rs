//! Circular progress gauge: a light base ring with a value arc on top.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::api::{InvalidationTopic, RedrawRequest};
use crate::core::{Coordinate, TextMeasurer, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::render::{
    ArcPrimitive, CanvasLayerKind, CirclePrimitive, Color, LayeredRenderFrame, PaintStyle,
    TextHAlign, TextPrimitive,
};

use super::{ChartPainter, format_value, validate_density};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaugeData {
    pub value: f64,
    pub max: f64,
    #[serde(default)]
    pub unit: Option<String>,
}

impl GaugeData {
    #[must_use]
    pub fn new(value: f64, max: f64) -> Self {
        Self {
            value,
            max,
            unit: None,
        }
    }

    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.value.is_finite() || !self.max.is_finite() {
            return Err(ChartError::InvalidData(
                "gauge value and max must be finite".to_owned(),
            ));
        }
        Ok(())
    }

    /// Filled share of the ring in `[0, 1]`; zero for a non-positive max.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        if self.max <= 0.0 {
            return 0.0;
        }
        (self.value / self.max).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaugeStyle {
    pub base_color: Color,
    pub value_color: Color,
    /// Value arc stroke relative to the base ring stroke.
    pub value_stroke_ratio: f64,
    pub value_font_size: f64,
    pub unit_font_size: f64,
    pub text_color: Color,
}

impl Default for GaugeStyle {
    fn default() -> Self {
        Self {
            base_color: Color::rgb8(242, 242, 242),
            value_color: Color::rgb8(74, 144, 226),
            value_stroke_ratio: 0.7,
            value_font_size: 24.0,
            unit_font_size: 12.0,
            text_color: Color::argb8(222, 0, 0, 0),
        }
    }
}

impl GaugeStyle {
    #[must_use]
    pub fn with_value_color(mut self, value_color: Color) -> Self {
        self.value_color = value_color;
        self
    }

    #[must_use]
    pub fn with_base_color(mut self, base_color: Color) -> Self {
        self.base_color = base_color;
        self
    }
}

/// Ring geometry derived from the viewport width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingGeometry {
    pub center_x: f64,
    pub center_y: f64,
    pub stroke_width: f64,
    /// Radius of the stroke's center line.
    pub radius: f64,
}

impl RingGeometry {
    #[must_use]
    pub fn for_viewport(viewport: Viewport) -> Self {
        let width = viewport.width_px();
        let stroke_width = width / 4.0;
        let inner = width / 2.0 - stroke_width;
        Self {
            center_x: width / 2.0,
            center_y: viewport.height_px() / 2.0,
            stroke_width,
            radius: inner + stroke_width / 2.0,
        }
    }

    #[must_use]
    pub fn center(&self) -> Coordinate {
        Coordinate::new(self.center_x, self.center_y)
    }
}

#[derive(Debug, Clone)]
pub struct GaugeChart {
    style: GaugeStyle,
    density: f64,
    data: Option<GaugeData>,
    redraw: RedrawRequest,
}

impl Default for GaugeChart {
    fn default() -> Self {
        Self::new(GaugeStyle::default())
    }
}

impl GaugeChart {
    #[must_use]
    pub fn new(style: GaugeStyle) -> Self {
        Self {
            style,
            density: 1.0,
            data: None,
            redraw: RedrawRequest::default(),
        }
    }

    #[must_use]
    pub fn style(&self) -> GaugeStyle {
        self.style
    }

    pub fn set_style(&mut self, style: GaugeStyle) {
        self.style = style;
        self.redraw.request(InvalidationTopic::Style);
    }

    #[must_use]
    pub fn data(&self) -> Option<&GaugeData> {
        self.data.as_ref()
    }

    pub fn set_data(&mut self, data: GaugeData) -> ChartResult<()> {
        data.validate()?;
        debug!(value = data.value, max = data.max, "set gauge data");
        self.data = Some(data);
        self.redraw.request(InvalidationTopic::Data);
        Ok(())
    }
}

impl ChartPainter for GaugeChart {
    fn paint(
        &self,
        viewport: Viewport,
        measurer: &dyn TextMeasurer,
    ) -> ChartResult<LayeredRenderFrame> {
        let viewport = viewport.ensure_valid()?;
        let mut frame = LayeredRenderFrame::canonical(viewport);
        let ring = RingGeometry::for_viewport(viewport);

        frame.push(
            CanvasLayerKind::Background,
            CirclePrimitive::new(
                ring.center_x,
                ring.center_y,
                ring.radius,
                PaintStyle::stroke(self.style.base_color, ring.stroke_width),
            ),
        );

        let Some(data) = self.data.as_ref() else {
            return Ok(frame);
        };

        let sweep = 360.0 * data.fraction();
        if sweep > 0.0 {
            frame.push(
                CanvasLayerKind::Series,
                ArcPrimitive {
                    center_x: ring.center_x,
                    center_y: ring.center_y,
                    radius: ring.radius,
                    start_degrees: -90.0,
                    sweep_degrees: sweep,
                    use_center: false,
                    style: PaintStyle::stroke(
                        self.style.value_color,
                        ring.stroke_width * self.style.value_stroke_ratio,
                    ),
                },
            );
        }

        let value_font = self.style.value_font_size * self.density;
        let unit_font = self.style.unit_font_size * self.density;
        let value_text = format_value(data.value);
        let value_height = measurer.measure(&value_text, value_font).height;
        let unit = data.unit.as_deref().filter(|unit| !unit.is_empty());
        let unit_height = unit.map_or(0.0, |unit| measurer.measure(unit, unit_font).height);

        // The value/unit block is centered as a whole.
        let value_baseline = ring.center_y + (value_height - unit_height) / 2.0;
        frame.push(
            CanvasLayerKind::Labels,
            TextPrimitive::new(
                value_text,
                ring.center_x,
                value_baseline,
                value_font,
                self.style.text_color,
                TextHAlign::Center,
            ),
        );
        if let Some(unit) = unit {
            frame.push(
                CanvasLayerKind::Labels,
                TextPrimitive::new(
                    unit,
                    ring.center_x,
                    value_baseline + unit_height,
                    unit_font,
                    self.style.text_color,
                    TextHAlign::Center,
                ),
            );
        }

        trace!(sweep, "painted gauge");
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
