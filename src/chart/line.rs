//! Multi-series line chart.
//!
//! A draw pass runs in two steps. The background step lays out the grid and
//! hands back `GridPositions`; the series step places samples exactly on
//! those grid coordinates, so both steps always agree on geometry.

use indexmap::IndexSet;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::api::{InvalidationTopic, RedrawRequest};
use crate::core::{AxisLabel, Coordinate, TextMeasurer, ValueScale, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::render::{
    CanvasLayerKind, CirclePrimitive, Color, LayeredRenderFrame, LinePrimitive, PaintStyle,
    PathPrimitive, TextHAlign, TextPrimitive,
};

use super::{ChartPainter, decimal_places, format_value, round_to_places, validate_density};

/// Upper bound on horizontal grid rows, `(y_max - y_min) / y_step`.
pub const MAX_GRID_STEPS: f64 = 1_000.0;

/// One named series; `values[i]` belongs to category `i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphLine {
    pub key: String,
    pub color: Color,
    pub values: Vec<Option<f64>>,
}

impl GraphLine {
    #[must_use]
    pub fn new(key: impl Into<String>, color: Color, values: Vec<Option<f64>>) -> Self {
        Self {
            key: key.into(),
            color,
            values,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineChartData {
    pub x_axis_labels: Vec<AxisLabel>,
    pub y_min: f64,
    pub y_max: f64,
    pub y_step: f64,
    pub lines: Vec<GraphLine>,
}

impl LineChartData {
    #[must_use]
    pub fn y_delta(&self) -> f64 {
        self.y_max - self.y_min
    }

    #[must_use]
    pub fn category_count(&self) -> usize {
        self.x_axis_labels.len()
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.y_min.is_finite() || !self.y_max.is_finite() || self.y_max < self.y_min {
            return Err(ChartError::InvalidData(
                "line chart y range must be finite with y_max >= y_min".to_owned(),
            ));
        }
        if !self.y_step.is_finite() || self.y_step <= 0.0 {
            return Err(ChartError::InvalidData(
                "line chart y step must be finite and > 0".to_owned(),
            ));
        }
        let steps = self.y_delta() / self.y_step;
        if steps > MAX_GRID_STEPS {
            return Err(ChartError::InvalidData(format!(
                "line chart y range spans {steps} steps, more than {MAX_GRID_STEPS}"
            )));
        }
        for label in &self.x_axis_labels {
            label.validate()?;
        }

        let categories = self.category_count();
        for line in &self.lines {
            if line.values.len() != categories {
                return Err(ChartError::InvalidData(format!(
                    "graph line `{}` has {} values for {} categories",
                    line.key,
                    line.values.len(),
                    categories
                )));
            }
            if line.values.iter().flatten().any(|value| !value.is_finite()) {
                return Err(ChartError::InvalidData(format!(
                    "graph line `{}` contains a non-finite value",
                    line.key
                )));
            }
            line.color.validate()?;
        }
        Ok(())
    }
}

/// Line chart dimensions in density-independent pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineChartStyle {
    pub margin: f64,
    pub x_axis_area: f64,
    pub y_axis_area: f64,
    pub axis_margin: f64,
    pub point_radius: f64,
    pub bold_point_radius: f64,
    pub axis_font_size: f64,
    pub point_font_size: f64,
    pub thin_stroke_width: f64,
    pub bold_stroke_width: f64,
    pub halo_width: f64,
    pub grid_line_width: f64,
    pub grid_color: Color,
    pub text_color: Color,
    /// Narrowest category track before the chart asks for extra width.
    pub min_track_width: f64,
    /// Horizontal space reserved outside the tracks when sizing the chart.
    pub track_reserve: f64,
}

impl Default for LineChartStyle {
    fn default() -> Self {
        Self {
            margin: 25.0,
            x_axis_area: 55.0,
            y_axis_area: 35.0,
            axis_margin: 4.0,
            point_radius: 2.0,
            bold_point_radius: 4.0,
            axis_font_size: 12.0,
            point_font_size: 10.0,
            thin_stroke_width: 1.0,
            bold_stroke_width: 3.0,
            halo_width: 3.0,
            grid_line_width: 1.0,
            grid_color: Color::rgb8(216, 216, 216),
            text_color: Color::argb8(138, 0, 0, 0),
            min_track_width: 50.0,
            track_reserve: 60.0,
        }
    }
}

impl LineChartStyle {
    #[must_use]
    pub fn with_grid_color(mut self, grid_color: Color) -> Self {
        self.grid_color = grid_color;
        self
    }

    #[must_use]
    pub fn with_text_color(mut self, text_color: Color) -> Self {
        self.text_color = text_color;
        self
    }

    #[must_use]
    pub fn with_min_track_width(mut self, min_track_width: f64) -> Self {
        self.min_track_width = min_track_width;
        self
    }

    /// Copy of the style converted to device pixels.
    #[must_use]
    pub fn scaled(&self, density: f64) -> Self {
        Self {
            margin: self.margin * density,
            x_axis_area: self.x_axis_area * density,
            y_axis_area: self.y_axis_area * density,
            axis_margin: self.axis_margin * density,
            point_radius: self.point_radius * density,
            bold_point_radius: self.bold_point_radius * density,
            axis_font_size: self.axis_font_size * density,
            point_font_size: self.point_font_size * density,
            thin_stroke_width: self.thin_stroke_width * density,
            bold_stroke_width: self.bold_stroke_width * density,
            halo_width: self.halo_width * density,
            min_track_width: self.min_track_width * density,
            track_reserve: self.track_reserve * density,
            ..*self
        }
    }
}

/// Grid intersections shared by the background and series passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridPositions {
    /// Center of each category track.
    pub x_positions: Vec<f64>,
    /// One row per y step, from `y_min` (the origin) upwards.
    pub y_positions: Vec<f64>,
    pub origin_x: f64,
    pub origin_y: f64,
}

impl GridPositions {
    /// Topmost grid row, i.e. the smallest pixel row.
    #[must_use]
    pub fn top_y(&self) -> f64 {
        self.y_positions
            .iter()
            .copied()
            .map(OrderedFloat)
            .min()
            .map_or(self.origin_y, |top| top.0)
    }

    /// Height available to samples between the origin and the top row.
    #[must_use]
    pub fn score_area_height(&self) -> f64 {
        (self.top_y() - self.origin_y).abs()
    }

    pub fn value_scale(&self, y_min: f64, y_max: f64) -> ChartResult<ValueScale> {
        ValueScale::new(y_min, y_max, self.origin_y, self.top_y())
    }
}

#[derive(Debug, Clone)]
pub struct LineChart {
    style: LineChartStyle,
    density: f64,
    data: Option<LineChartData>,
    selected_keys: IndexSet<String>,
    redraw: RedrawRequest,
}

impl Default for LineChart {
    fn default() -> Self {
        Self::new(LineChartStyle::default())
    }
}

impl LineChart {
    #[must_use]
    pub fn new(style: LineChartStyle) -> Self {
        Self {
            style,
            density: 1.0,
            data: None,
            selected_keys: IndexSet::new(),
            redraw: RedrawRequest::default(),
        }
    }

    #[must_use]
    pub fn style(&self) -> LineChartStyle {
        self.style
    }

    pub fn set_style(&mut self, style: LineChartStyle) {
        self.style = style;
        self.redraw.request(InvalidationTopic::Style);
    }

    #[must_use]
    pub fn data(&self) -> Option<&LineChartData> {
        self.data.as_ref()
    }

    /// Validates and replaces the dataset. Rejected data leaves the previous
    /// dataset in place.
    pub fn set_data(&mut self, data: LineChartData) -> ChartResult<()> {
        data.validate()?;
        debug!(
            categories = data.category_count(),
            lines = data.lines.len(),
            "set line chart data"
        );
        self.data = Some(data);
        self.redraw.request(InvalidationTopic::Data);
        Ok(())
    }

    pub fn clear_data(&mut self) {
        self.data = None;
        self.redraw.request(InvalidationTopic::Data);
    }

    #[must_use]
    pub fn selected_keys(&self) -> &IndexSet<String> {
        &self.selected_keys
    }

    #[must_use]
    pub fn is_selected(&self, key: &str) -> bool {
        self.selected_keys.contains(key)
    }

    pub fn set_selected_keys<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_keys = keys.into_iter().map(Into::into).collect();
        self.redraw.request(InvalidationTopic::Selection);
    }

    pub fn select_key(&mut self, key: impl Into<String>) -> bool {
        let inserted = self.selected_keys.insert(key.into());
        if inserted {
            self.redraw.request(InvalidationTopic::Selection);
        }
        inserted
    }

    pub fn deselect_key(&mut self, key: &str) -> bool {
        let removed = self.selected_keys.shift_remove(key);
        if removed {
            self.redraw.request(InvalidationTopic::Selection);
        }
        removed
    }

    pub fn clear_selected_keys(&mut self) {
        if self.selected_keys.is_empty() {
            return;
        }
        self.selected_keys.clear();
        self.redraw.request(InvalidationTopic::Selection);
    }

    /// Width in device pixels the host should give the chart so each category
    /// keeps at least `min_track_width`.
    ///
    /// `display_width_px` is the natural screen width. Returns `None` for an
    /// empty category axis.
    #[must_use]
    pub fn preferred_width(&self, display_width_px: u32, category_count: usize) -> Option<u32> {
        if category_count == 0 {
            return None;
        }
        let density = self.density;
        let display_width_dp = (f64::from(display_width_px) / density).round();
        let count = category_count as f64;
        let track = (display_width_dp - self.style.track_reserve) / count;

        let width_dp = if track < self.style.min_track_width {
            self.style.track_reserve + count * self.style.min_track_width
        } else {
            display_width_dp - 2.0
        };
        Some((width_dp * density).round().max(0.0) as u32)
    }

    /// Grid layout for the current data, or `None` when there is nothing to
    /// lay out.
    pub fn grid_positions(&self, viewport: Viewport) -> ChartResult<Option<GridPositions>> {
        let viewport = viewport.ensure_valid()?;
        let Some(data) = self.data.as_ref() else {
            return Ok(None);
        };
        if data.category_count() == 0 {
            return Ok(None);
        }
        Ok(Some(compute_grid(
            data,
            viewport,
            &self.style.scaled(self.density),
        )))
    }

    /// Pixel coordinates of the present samples of `line`, labeled with their
    /// formatted value; absent samples are skipped.
    pub fn line_coordinates(
        &self,
        line: &GraphLine,
        grid: &GridPositions,
    ) -> ChartResult<Vec<Coordinate>> {
        let Some(data) = self.data.as_ref() else {
            return Ok(Vec::new());
        };
        line_to_coordinates(data, line, grid)
    }

    fn draw_background(
        &self,
        data: &LineChartData,
        grid: &GridPositions,
        viewport: Viewport,
        measurer: &dyn TextMeasurer,
        style: &LineChartStyle,
        frame: &mut LayeredRenderFrame,
    ) {
        let width = viewport.width_px();
        let font = style.axis_font_size;
        let places = decimal_places(data.y_step).max(decimal_places(data.y_min));

        for (index, y) in grid.y_positions.iter().enumerate() {
            frame.push(
                CanvasLayerKind::Grid,
                LinePrimitive::new(
                    grid.origin_x,
                    *y,
                    width,
                    *y,
                    style.grid_line_width,
                    style.grid_color,
                ),
            );

            let value = round_to_places(data.y_min + data.y_step * index as f64, places);
            let text = format_value(value);
            let bounds = measurer.measure(&text, font);
            frame.push(
                CanvasLayerKind::Grid,
                TextPrimitive::new(
                    text,
                    grid.origin_x - style.axis_margin,
                    y + bounds.height / 2.0,
                    font,
                    style.text_color,
                    TextHAlign::Right,
                ),
            );
        }

        let axis_y = viewport.height_px() - style.x_axis_area;
        for (label, x) in data.x_axis_labels.iter().zip(&grid.x_positions) {
            frame.push(
                CanvasLayerKind::Grid,
                LinePrimitive::new(
                    *x,
                    0.0,
                    *x,
                    axis_y,
                    style.grid_line_width,
                    style.grid_color,
                ),
            );

            // Each line sits below the previous ones; empty lines take no
            // height but keep their margin slot.
            let mut stacked_height = 0.0;
            for (slot, line) in label.lines().iter().enumerate() {
                if line.is_empty() {
                    continue;
                }
                stacked_height += measurer.measure(line, font).height;
                frame.push(
                    CanvasLayerKind::Grid,
                    TextPrimitive::new(
                        line.clone(),
                        *x,
                        axis_y + stacked_height + style.axis_margin * (slot + 1) as f64,
                        font,
                        style.text_color,
                        TextHAlign::Center,
                    ),
                );
            }
        }
    }

    fn draw_series(
        &self,
        data: &LineChartData,
        grid: &GridPositions,
        style: &LineChartStyle,
        frame: &mut LayeredRenderFrame,
    ) -> ChartResult<()> {
        for line in data.lines.iter().filter(|line| !self.is_selected(&line.key)) {
            let coordinates = line_to_coordinates(data, line, grid)?;
            if coordinates.is_empty() {
                continue;
            }
            frame.push(
                CanvasLayerKind::Series,
                PathPrimitive::open(
                    path_points(&coordinates),
                    PaintStyle::stroke(line.color, style.thin_stroke_width),
                ),
            );
            for coordinate in &coordinates {
                frame.push(
                    CanvasLayerKind::Series,
                    CirclePrimitive::new(
                        coordinate.x,
                        coordinate.y,
                        style.point_radius,
                        PaintStyle::Fill(line.color),
                    ),
                );
            }
        }

        for line in data.lines.iter().filter(|line| self.is_selected(&line.key)) {
            let coordinates = line_to_coordinates(data, line, grid)?;
            if coordinates.is_empty() {
                continue;
            }
            let stroke = PaintStyle::stroke(line.color, style.bold_stroke_width);
            frame.push(
                CanvasLayerKind::Emphasis,
                PathPrimitive::open(path_points(&coordinates), stroke),
            );
            for coordinate in &coordinates {
                frame.push(
                    CanvasLayerKind::Emphasis,
                    CirclePrimitive::new(
                        coordinate.x,
                        coordinate.y,
                        style.bold_point_radius,
                        PaintStyle::Fill(Color::WHITE),
                    ),
                );
                frame.push(
                    CanvasLayerKind::Emphasis,
                    CirclePrimitive::new(
                        coordinate.x,
                        coordinate.y,
                        style.bold_point_radius,
                        stroke,
                    ),
                );
            }

            for coordinate in &coordinates {
                let Some(label) = coordinate.label.as_deref() else {
                    continue;
                };
                let x = coordinate.x + style.axis_margin;
                let y = coordinate.y - style.axis_margin;
                frame.push(
                    CanvasLayerKind::Labels,
                    TextPrimitive::new(
                        label,
                        x,
                        y,
                        style.point_font_size,
                        Color::WHITE,
                        TextHAlign::Left,
                    )
                    .with_outline(style.halo_width),
                );
                frame.push(
                    CanvasLayerKind::Labels,
                    TextPrimitive::new(
                        label,
                        x,
                        y,
                        style.point_font_size,
                        line.color,
                        TextHAlign::Left,
                    ),
                );
            }
        }
        Ok(())
    }
}

impl ChartPainter for LineChart {
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
        if data.category_count() == 0 {
            warn!("line chart has no categories; drawing nothing");
            return Ok(frame);
        }

        let style = self.style.scaled(self.density);
        let grid = compute_grid(data, viewport, &style);
        self.draw_background(data, &grid, viewport, measurer, &style, &mut frame);
        self.draw_series(data, &grid, &style, &mut frame)?;

        trace!(
            width = viewport.width,
            height = viewport.height,
            selected = self.selected_keys.len(),
            "painted line chart"
        );
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

fn compute_grid(data: &LineChartData, viewport: Viewport, style: &LineChartStyle) -> GridPositions {
    let width = viewport.width_px();
    let height = viewport.height_px();
    let origin_x = style.y_axis_area;
    let origin_y = height - style.x_axis_area - style.margin;

    let delta = data.y_delta();
    let (steps, unit) = if delta > 0.0 {
        // Tolerance keeps `y_max` on the grid despite float rounding.
        let steps = (delta / data.y_step + 1e-9).floor() as usize;
        (steps, (origin_y - style.margin) / delta)
    } else {
        (0, 0.0)
    };
    let y_positions = (0..=steps)
        .map(|index| origin_y - data.y_step * index as f64 * unit)
        .collect();

    let count = data.category_count();
    let track = (width - origin_x) / count as f64;
    let x_positions = (0..count)
        .map(|index| origin_x + track / 2.0 + track * index as f64)
        .collect();

    GridPositions {
        x_positions,
        y_positions,
        origin_x,
        origin_y,
    }
}

fn line_to_coordinates(
    data: &LineChartData,
    line: &GraphLine,
    grid: &GridPositions,
) -> ChartResult<Vec<Coordinate>> {
    let scale = grid.value_scale(data.y_min, data.y_max)?;
    let mut coordinates = Vec::with_capacity(line.values.len());
    for (value, x) in line.values.iter().zip(&grid.x_positions) {
        let Some(value) = value else {
            continue;
        };
        let y = scale.value_to_pixel(*value)?;
        coordinates.push(Coordinate::new(*x, y).with_label(format_value(*value)));
    }
    Ok(coordinates)
}

fn path_points(coordinates: &[Coordinate]) -> Vec<(f64, f64)> {
    coordinates
        .iter()
        .map(|coordinate| (coordinate.x, coordinate.y))
        .collect()
}
