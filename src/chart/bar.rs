//! Stacked bar chart built on the shared axis layout calculator.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::api::{InvalidationTopic, RedrawRequest};
use crate::core::{
    AxisLabel, LayoutInput, LayoutMetrics, LayoutOutcome, LayoutStyle, TextMeasurer, Viewport,
    YAxisTick, compute_layout,
};
use crate::error::{ChartError, ChartResult};
use crate::render::{
    CanvasLayerKind, Color, LayeredRenderFrame, LinePrimitive, RectPrimitive, TextHAlign,
    TextPrimitive,
};

use super::{ChartPainter, validate_density};

/// Stacked bars: `values[i]` holds the segments of category `i`, bottom first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChartData {
    pub x_axis: Vec<AxisLabel>,
    pub y_axis: Vec<YAxisTick>,
    pub values: Vec<Vec<f64>>,
    /// Label block drawn above each stack; lines listed top to bottom.
    pub labels: Vec<AxisLabel>,
    /// Segment colors, cycled by stack position.
    pub colors: Vec<Color>,
    pub y_max: f64,
}

impl BarChartData {
    #[must_use]
    pub fn category_count(&self) -> usize {
        self.x_axis.len()
    }

    pub fn validate(&self) -> ChartResult<()> {
        let categories = self.category_count();
        if self.values.len() != categories {
            return Err(ChartError::InvalidData(format!(
                "bar chart has {} stacks for {} categories",
                self.values.len(),
                categories
            )));
        }
        if !self.labels.is_empty() && self.labels.len() != categories {
            return Err(ChartError::InvalidData(format!(
                "bar chart has {} label blocks for {} categories",
                self.labels.len(),
                categories
            )));
        }
        if !self.y_max.is_finite() || self.y_max < 0.0 {
            return Err(ChartError::InvalidData(
                "bar chart y_max must be finite and >= 0".to_owned(),
            ));
        }
        if self.values.iter().flatten().any(|value| !value.is_finite()) {
            return Err(ChartError::InvalidData(
                "bar chart values must be finite".to_owned(),
            ));
        }
        if self.values.iter().any(|stack| !stack.is_empty()) && self.colors.is_empty() {
            return Err(ChartError::InvalidData(
                "bar chart needs at least one segment color".to_owned(),
            ));
        }
        for color in &self.colors {
            color.validate()?;
        }
        for label in self.x_axis.iter().chain(&self.labels) {
            label.validate()?;
        }
        if self.y_axis.iter().any(|tick| !tick.value.is_finite()) {
            return Err(ChartError::InvalidData(
                "bar chart y ticks must be finite".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Bar chart dimensions in density-independent pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarChartStyle {
    pub axis_margin: f64,
    pub label_margin: f64,
    pub outline_width: f64,
    pub font_size: f64,
    pub outline_color: Color,
    pub axis_label_color: Color,
    pub label_color: Color,
}

impl Default for BarChartStyle {
    fn default() -> Self {
        Self {
            axis_margin: 8.0,
            label_margin: 4.0,
            outline_width: 1.0,
            font_size: 12.0,
            outline_color: Color::argb8(138, 0, 0, 0),
            axis_label_color: Color::argb8(138, 0, 0, 0),
            label_color: Color::argb8(222, 0, 0, 0),
        }
    }
}

impl BarChartStyle {
    #[must_use]
    pub fn with_label_color(mut self, label_color: Color) -> Self {
        self.label_color = label_color;
        self
    }

    #[must_use]
    pub fn with_outline_color(mut self, outline_color: Color) -> Self {
        self.outline_color = outline_color;
        self
    }

    #[must_use]
    pub fn layout_style(&self, density: f64) -> LayoutStyle {
        LayoutStyle {
            axis_margin: self.axis_margin * density,
            label_margin: self.label_margin * density,
            font_size_px: self.font_size * density,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BarChart {
    style: BarChartStyle,
    density: f64,
    data: Option<BarChartData>,
    redraw: RedrawRequest,
}

impl Default for BarChart {
    fn default() -> Self {
        Self::new(BarChartStyle::default())
    }
}

impl BarChart {
    #[must_use]
    pub fn new(style: BarChartStyle) -> Self {
        Self {
            style,
            density: 1.0,
            data: None,
            redraw: RedrawRequest::default(),
        }
    }

    #[must_use]
    pub fn style(&self) -> BarChartStyle {
        self.style
    }

    pub fn set_style(&mut self, style: BarChartStyle) {
        self.style = style;
        self.redraw.request(InvalidationTopic::Style);
    }

    #[must_use]
    pub fn data(&self) -> Option<&BarChartData> {
        self.data.as_ref()
    }

    pub fn set_data(&mut self, data: BarChartData) -> ChartResult<()> {
        data.validate()?;
        debug!(categories = data.category_count(), "set bar chart data");
        self.data = Some(data);
        self.redraw.request(InvalidationTopic::Data);
        Ok(())
    }

    /// Layout the next draw pass would use; `InsufficientData` without data.
    pub fn layout(
        &self,
        viewport: Viewport,
        measurer: &dyn TextMeasurer,
    ) -> ChartResult<LayoutOutcome> {
        let Some(data) = self.data.as_ref() else {
            viewport.ensure_valid()?;
            return Ok(LayoutOutcome::InsufficientData);
        };
        let input = LayoutInput {
            x_labels: &data.x_axis,
            y_ticks: &data.y_axis,
            value_labels: &data.labels,
            y_min: 0.0,
            y_max: data.y_max,
        };
        compute_layout(
            viewport,
            &input,
            measurer,
            &self.style.layout_style(self.density),
        )
    }

    fn draw_stacks(
        &self,
        data: &BarChartData,
        metrics: &LayoutMetrics,
        measurer: &dyn TextMeasurer,
        frame: &mut LayeredRenderFrame,
    ) {
        let font = self.style.font_size * self.density;
        let label_margin = self.style.label_margin * self.density;

        for (index, stack) in data.values.iter().enumerate() {
            let left = metrics.bar_left_x(index);
            let mut top = metrics.y_zero;
            for (position, value) in stack.iter().enumerate() {
                let color = data.colors[position % data.colors.len()];
                let height = metrics.y_unit * value;
                let next_top = top - height;
                frame.push(
                    CanvasLayerKind::Series,
                    RectPrimitive::new(
                        left,
                        next_top.min(top),
                        metrics.bar_width,
                        height.abs(),
                        color,
                    ),
                );
                top = next_top;
            }

            let Some(label) = data.labels.get(index) else {
                continue;
            };
            let center_x = metrics.slot_center_x(index);
            let mut baseline = top - label_margin;
            for line in label.lines().iter().rev().filter(|line| !line.is_empty()) {
                frame.push(
                    CanvasLayerKind::Labels,
                    TextPrimitive::new(
                        line.clone(),
                        center_x,
                        baseline,
                        font,
                        self.style.label_color,
                        TextHAlign::Center,
                    ),
                );
                baseline -= measurer.measure(line, font).height;
            }
        }
    }

    fn draw_axes(
        &self,
        data: &BarChartData,
        metrics: &LayoutMetrics,
        viewport: Viewport,
        measurer: &dyn TextMeasurer,
        frame: &mut LayeredRenderFrame,
    ) {
        let style = &self.style;
        let font = style.font_size * self.density;
        let axis_margin = style.axis_margin * self.density;
        let outline_width = style.outline_width * self.density;

        frame.push(
            CanvasLayerKind::Grid,
            LinePrimitive::new(
                metrics.plot_left,
                0.0,
                metrics.plot_left,
                viewport.height_px() - metrics.x_axis_height,
                outline_width,
                style.outline_color,
            ),
        );
        for tick in &data.y_axis {
            let y = metrics.value_to_y(tick.value);
            frame.push(
                CanvasLayerKind::Grid,
                LinePrimitive::new(
                    metrics.y_axis_width,
                    y,
                    viewport.width_px(),
                    y,
                    outline_width,
                    style.outline_color,
                ),
            );
        }

        for (index, label) in data.x_axis.iter().enumerate() {
            let center_x = metrics.slot_center_x(index);
            let mut baseline = metrics.y_zero + axis_margin;
            for (_, line) in label.visible_lines() {
                baseline += measurer.measure(line, font).height;
                frame.push(
                    CanvasLayerKind::Labels,
                    TextPrimitive::new(
                        line,
                        center_x,
                        baseline,
                        font,
                        style.axis_label_color,
                        TextHAlign::Center,
                    ),
                );
            }
        }

        for tick in data.y_axis.iter().filter(|tick| !tick.label.is_empty()) {
            let bounds = measurer.measure(&tick.label, font);
            frame.push(
                CanvasLayerKind::Labels,
                TextPrimitive::new(
                    tick.label.clone(),
                    metrics.y_axis_width,
                    metrics.value_to_y(tick.value) + bounds.height / 2.0,
                    font,
                    style.axis_label_color,
                    TextHAlign::Right,
                ),
            );
        }
    }
}

impl ChartPainter for BarChart {
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
        let Some(metrics) = self.layout(viewport, measurer)?.metrics() else {
            return Ok(frame);
        };

        self.draw_stacks(data, &metrics, measurer, &mut frame);
        self.draw_axes(data, &metrics, viewport, measurer, &mut frame);

        trace!(y_unit = metrics.y_unit, "painted bar chart");
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
