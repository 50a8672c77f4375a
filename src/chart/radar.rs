//! Radar (spider) chart with a grow-in reveal animation.
//!
//! Geometry is built around a center point: concentric score rings, one spoke
//! per subject and a closed score polygon whose vertex distance is scaled by
//! the animation progress.

use std::f64::consts::TAU;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::api::{InvalidationTopic, RedrawRequest};
use crate::core::{Coordinate, Easing, ProgressAnimation, TextBounds, TextMeasurer, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::render::{
    CanvasLayerKind, CirclePrimitive, Color, LayeredRenderFrame, LinePrimitive, PaintStyle,
    PathPrimitive, RectPrimitive, TextHAlign, TextPrimitive,
};

use super::{ChartPainter, format_value, validate_density};

/// Upper bound on background rings between the innermost and outermost one.
pub const MAX_SCORE_LAYERS: usize = 1_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarSubject {
    pub label: String,
    pub score: f64,
}

impl RadarSubject {
    #[must_use]
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RadarChartData {
    pub subjects: Vec<RadarSubject>,
}

impl RadarChartData {
    #[must_use]
    pub fn new(subjects: Vec<RadarSubject>) -> Self {
        Self { subjects }
    }

    pub fn validate(&self) -> ChartResult<()> {
        if let Some(subject) = self.subjects.iter().find(|s| !s.score.is_finite()) {
            return Err(ChartError::InvalidData(format!(
                "radar subject `{}` has a non-finite score",
                subject.label
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.subjects.iter().map(|s| s.label.clone()).collect()
    }

    /// Smallest and largest score, `None` without subjects.
    #[must_use]
    pub fn score_range(&self) -> Option<(f64, f64)> {
        let min = self.subjects.iter().map(|s| OrderedFloat(s.score)).min()?;
        let max = self.subjects.iter().map(|s| OrderedFloat(s.score)).max()?;
        Some((min.0, max.0))
    }

    /// Ring values from `floor` to `ceiling` every `step`, widened so the
    /// actual minimum and maximum score are always the innermost and
    /// outermost rings.
    #[must_use]
    pub fn score_layers(&self, step: f64, floor: f64, ceiling: f64) -> Vec<f64> {
        let (lowest, highest) = match self.score_range() {
            Some((min, max)) => (floor.min(min), ceiling.max(max)),
            None => (floor, ceiling),
        };
        let mut layers = vec![lowest];
        if step > 0.0 && step.is_finite() {
            let mut index = (lowest / step).floor() + 1.0;
            while index * step < highest && layers.len() <= MAX_SCORE_LAYERS {
                layers.push(index * step);
                index += 1.0;
            }
        }
        if highest > lowest {
            layers.push(highest);
        }
        layers
    }

    /// Number of `step` intervals the rings span once widened to the scores.
    #[must_use]
    pub fn layer_span(&self, step: f64, floor: f64, ceiling: f64) -> f64 {
        let (lowest, highest) = match self.score_range() {
            Some((min, max)) => (floor.min(min), ceiling.max(max)),
            None => (floor, ceiling),
        };
        (highest - lowest) / step
    }

    /// Per-subject fraction of the `[min, max]` ring span.
    #[must_use]
    pub fn ratios(&self, min: f64, max: f64) -> Vec<f64> {
        let span = max - min;
        self.subjects
            .iter()
            .map(|s| if span > 0.0 { (s.score - min) / span } else { 0.0 })
            .collect()
    }

    /// Vertex labels: whole numbers for raw scores, one decimal otherwise.
    #[must_use]
    pub fn score_labels(&self, whole_numbers: bool) -> Vec<String> {
        self.subjects
            .iter()
            .map(|s| {
                if whole_numbers {
                    format!("{:.0}", s.score)
                } else {
                    format!("{:.1}", s.score)
                }
            })
            .collect()
    }
}

/// Stroke and fill colors of the score polygon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadarPalette {
    pub line: Color,
    pub fill: Color,
}

impl RadarPalette {
    #[must_use]
    pub fn raw_score() -> Self {
        Self {
            line: Color::argb8(150, 170, 213, 94),
            fill: Color::argb8(50, 170, 213, 94),
        }
    }

    #[must_use]
    pub fn deviation_score() -> Self {
        Self {
            line: Color::argb8(150, 74, 144, 226),
            fill: Color::argb8(50, 73, 143, 225),
        }
    }

    #[must_use]
    pub fn for_mode(use_deviation: bool) -> Self {
        if use_deviation {
            Self::deviation_score()
        } else {
            Self::raw_score()
        }
    }
}

/// Radar dimensions; lengths in density-independent pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarChartStyle {
    pub label_font_size: f64,
    pub threshold_font_size: f64,
    /// Extra width added around a subject label before collision checks.
    pub label_collision_margin: f64,
    /// Fraction of the free square used by the outer ring.
    pub radius_factor: f64,
    /// Subject labels sit at this multiple of the outer ring radius.
    pub label_distance: f64,
    pub layer_step: f64,
    pub midline_value: f64,
    pub raw_score_range: (f64, f64),
    pub deviation_score_range: (f64, f64),
    pub ring_width: f64,
    pub midline_ring_width: f64,
    pub polygon_stroke_width: f64,
    pub grid_color: Color,
    pub subject_label_color: Color,
    pub score_label_color: Color,
    pub label_background: Color,
    pub not_enough_subjects_message: String,
    pub animation_start: f64,
    pub animation_seconds: f64,
    pub animation_easing: Easing,
}

impl Default for RadarChartStyle {
    fn default() -> Self {
        Self {
            label_font_size: 10.0,
            threshold_font_size: 8.0,
            label_collision_margin: 30.0,
            radius_factor: 0.8,
            label_distance: 1.1,
            layer_step: 10.0,
            midline_value: 50.0,
            raw_score_range: (0.0, 100.0),
            deviation_score_range: (20.0, 80.0),
            ring_width: 1.0,
            midline_ring_width: 3.0,
            polygon_stroke_width: 3.0,
            grid_color: Color::argb8(200, 100, 100, 100),
            subject_label_color: Color::argb8(250, 158, 158, 158),
            score_label_color: Color::BLACK,
            label_background: Color::argb8(255, 250, 250, 250),
            not_enough_subjects_message: "Not enough subjects to draw a radar chart".to_owned(),
            animation_start: 0.5,
            animation_seconds: 1.0,
            animation_easing: Easing::Bounce,
        }
    }
}

impl RadarChartStyle {
    #[must_use]
    pub fn with_not_enough_subjects_message(mut self, message: impl Into<String>) -> Self {
        self.not_enough_subjects_message = message.into();
        self
    }

    /// Reveal animation from `start` to full progress over `seconds`.
    #[must_use]
    pub fn with_animation(mut self, start: f64, seconds: f64, easing: Easing) -> Self {
        self.animation_start = start;
        self.animation_seconds = seconds;
        self.animation_easing = easing;
        self
    }
}

/// Vertices of a polygon with one axis per ratio.
///
/// Axis `i` sits at `i * 2pi / N` from 12 o'clock. Its raw point is
/// `(cx - r sin, cy + r cos)` with `r = radius * ratio * progress`; that point
/// is reflected through `center` and the reflection is what gets drawn.
/// `labels[i]` is attached to vertex `i`.
pub fn polygon_vertices(
    center: &Coordinate,
    radius: f64,
    ratios: &[f64],
    labels: &[String],
    progress: f64,
) -> ChartResult<Vec<Coordinate>> {
    if ratios.len() != labels.len() {
        return Err(ChartError::InvalidData(format!(
            "radar polygon needs one label per ratio: {} ratios, {} labels",
            ratios.len(),
            labels.len()
        )));
    }
    if ratios.is_empty() {
        return Ok(Vec::new());
    }

    let angle = TAU / ratios.len() as f64;
    let vertices = ratios
        .iter()
        .zip(labels)
        .enumerate()
        .map(|(index, (ratio, label))| {
            let length = radius * ratio * progress;
            let theta = angle * index as f64;
            Coordinate::new(
                center.x - length * theta.sin(),
                center.y + length * theta.cos(),
            )
            .inverse(center)
            .with_label(label.clone())
        })
        .collect();
    Ok(vertices)
}

/// Pushes a subject label away from the chart when its box reaches past
/// the ring.
///
/// Only labels whose nearest edge lies outside the ring move, and they move
/// by exactly the overlap. Labels already inside the ring keep their anchor.
///
/// The label box is `bounds` widened by `margin` and centered on `anchor`.
/// With `delta` the distance from `center` to the nearest point of that box
/// minus `radius`, the anchor is unchanged for `delta <= 0` and otherwise
/// moved outward along the center ray by exactly `delta`.
#[must_use]
pub fn adjust_label_position(
    anchor: &Coordinate,
    center: &Coordinate,
    radius: f64,
    bounds: TextBounds,
    margin: f64,
) -> Coordinate {
    let closest = anchor.closest_point_on_rect(center, bounds.width + margin, bounds.height);
    let delta = closest.distance(center) - radius;
    if delta > 0.0 {
        anchor.stretch(center, delta)
    } else {
        anchor.clone()
    }
}

#[derive(Debug, Clone)]
pub struct RadarChart {
    style: RadarChartStyle,
    density: f64,
    data: Option<RadarChartData>,
    use_deviation: bool,
    palette: RadarPalette,
    progress: f64,
    animation: Option<ProgressAnimation>,
    redraw: RedrawRequest,
}

impl Default for RadarChart {
    fn default() -> Self {
        Self::new(RadarChartStyle::default())
    }
}

impl RadarChart {
    #[must_use]
    pub fn new(style: RadarChartStyle) -> Self {
        Self {
            style,
            density: 1.0,
            data: None,
            use_deviation: false,
            palette: RadarPalette::raw_score(),
            progress: 0.0,
            animation: None,
            redraw: RedrawRequest::default(),
        }
    }

    #[must_use]
    pub fn style(&self) -> &RadarChartStyle {
        &self.style
    }

    pub fn set_style(&mut self, style: RadarChartStyle) {
        self.style = style;
        self.redraw.request(InvalidationTopic::Style);
    }

    #[must_use]
    pub fn data(&self) -> Option<&RadarChartData> {
        self.data.as_ref()
    }

    #[must_use]
    pub fn use_deviation(&self) -> bool {
        self.use_deviation
    }

    #[must_use]
    pub fn palette(&self) -> RadarPalette {
        self.palette
    }

    #[must_use]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some_and(ProgressAnimation::is_running)
    }

    /// Replaces the dataset, resets progress to 0 and restarts the reveal
    /// animation; a running animation is cancelled.
    pub fn set_data(&mut self, data: RadarChartData, use_deviation: bool) -> ChartResult<()> {
        data.validate()?;
        let (floor, ceiling) = if use_deviation {
            self.style.deviation_score_range
        } else {
            self.style.raw_score_range
        };
        let span = data.layer_span(self.style.layer_step, floor, ceiling);
        if self.style.layer_step > 0.0 && span > MAX_SCORE_LAYERS as f64 {
            return Err(ChartError::InvalidData(format!(
                "radar scores span {span} rings, more than {MAX_SCORE_LAYERS}"
            )));
        }
        let mut animation = ProgressAnimation::new(
            self.style.animation_start,
            1.0,
            self.style.animation_seconds,
            self.style.animation_easing,
        )?;
        animation.start();

        debug!(
            subjects = data.subjects.len(),
            use_deviation, "set radar chart data"
        );
        self.data = Some(data);
        self.use_deviation = use_deviation;
        self.palette = RadarPalette::for_mode(use_deviation);
        self.progress = 0.0;
        self.animation = Some(animation);
        self.redraw.request(InvalidationTopic::Data);
        Ok(())
    }

    /// Sets progress directly, stopping the running animation.
    pub fn set_progress(&mut self, progress: f64) {
        if let Some(animation) = self.animation.as_mut() {
            animation.cancel();
        }
        self.progress = if progress.is_finite() {
            progress.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.redraw.request(InvalidationTopic::Animation);
    }

    /// Outer ring radius and center for `viewport`.
    #[must_use]
    pub fn geometry(&self, viewport: Viewport) -> (Coordinate, f64) {
        let width = viewport.width_px();
        let height = viewport.height_px();
        let text = self.style.label_font_size * self.density;
        let radius = (width - text * 8.0).min(height - text * 2.0) / 2.0 * self.style.radius_factor;
        (Coordinate::new(width / 2.0, height / 2.0), radius)
    }

    fn score_bounds(&self) -> (f64, f64) {
        if self.use_deviation {
            self.style.deviation_score_range
        } else {
            self.style.raw_score_range
        }
    }

    /// Draws rings, spokes and labels; returns the innermost and outermost
    /// ring value, or `None` when there are too few subjects for a polygon.
    fn draw_background(
        &self,
        data: &RadarChartData,
        center: &Coordinate,
        radius: f64,
        measurer: &dyn TextMeasurer,
        frame: &mut LayeredRenderFrame,
    ) -> ChartResult<Option<(f64, f64)>> {
        let style = &self.style;
        let (floor, ceiling) = self.score_bounds();
        let layers = data.score_layers(style.layer_step, floor, ceiling);
        let ring_ratio = |index: usize| {
            if layers.len() > 1 {
                index as f64 / (layers.len() - 1) as f64
            } else {
                1.0
            }
        };

        for (index, layer) in layers.iter().enumerate() {
            let width = if *layer == style.midline_value {
                style.midline_ring_width
            } else {
                style.ring_width
            };
            frame.push(
                CanvasLayerKind::Background,
                CirclePrimitive::new(
                    center.x,
                    center.y,
                    radius * ring_ratio(index),
                    PaintStyle::stroke(style.grid_color, width),
                ),
            );
        }

        let labels = data.labels();
        let subject_font = style.label_font_size * self.density;
        if labels.len() < 3 {
            warn!(subjects = labels.len(), "radar chart needs at least 3 subjects");
            self.draw_label(
                &style.not_enough_subjects_message,
                center,
                subject_font,
                style.subject_label_color,
                measurer,
                CanvasLayerKind::Labels,
                frame,
            );
            return Ok(None);
        }

        let outer = polygon_vertices(center, radius, &vec![1.0; labels.len()], &labels, 1.0)?;
        for vertex in &outer {
            frame.push(
                CanvasLayerKind::Grid,
                LinePrimitive::new(
                    center.x,
                    center.y,
                    vertex.x,
                    vertex.y,
                    style.ring_width,
                    style.grid_color,
                ),
            );
        }

        // Ring values go on top of the spokes so they stay readable.
        let threshold_font = style.threshold_font_size * self.density;
        let last = layers.len() - 1;
        for (index, layer) in layers.iter().enumerate() {
            if index == 0 || index == last || *layer == style.midline_value {
                let anchor = Coordinate::new(center.x, center.y - radius * ring_ratio(index));
                self.draw_label(
                    &format_value(*layer),
                    &anchor,
                    threshold_font,
                    style.grid_color,
                    measurer,
                    CanvasLayerKind::Grid,
                    frame,
                );
            }
        }

        let label_ratios = vec![style.label_distance; labels.len()];
        let margin = style.label_collision_margin * self.density;
        for vertex in polygon_vertices(center, radius, &label_ratios, &labels, 1.0)? {
            let text = vertex.label.clone().unwrap_or_default();
            let bounds = measurer.measure(&text, subject_font);
            let adjusted = adjust_label_position(&vertex, center, radius, bounds, margin);
            self.draw_label(
                &text,
                &adjusted,
                subject_font,
                style.subject_label_color,
                measurer,
                CanvasLayerKind::Labels,
                frame,
            );
        }

        let lowest = layers.first().copied().unwrap_or(floor);
        let highest = layers.last().copied().unwrap_or(ceiling);
        Ok(Some((lowest, highest)))
    }

    fn draw_score_polygon(
        &self,
        data: &RadarChartData,
        center: &Coordinate,
        radius: f64,
        (min, max): (f64, f64),
        measurer: &dyn TextMeasurer,
        frame: &mut LayeredRenderFrame,
    ) -> ChartResult<()> {
        let vertices = polygon_vertices(
            center,
            radius,
            &data.ratios(min, max),
            &data.score_labels(!self.use_deviation),
            self.progress,
        )?;
        if vertices.len() < 3 {
            return Ok(());
        }

        let font = self.style.label_font_size * self.density;
        for vertex in &vertices {
            if let Some(label) = vertex.label.as_deref() {
                self.draw_label(
                    label,
                    vertex,
                    font,
                    self.style.score_label_color,
                    measurer,
                    CanvasLayerKind::Series,
                    frame,
                );
            }
        }

        let points: Vec<(f64, f64)> = vertices.iter().map(|v| (v.x, v.y)).collect();
        frame.push(
            CanvasLayerKind::Series,
            PathPrimitive::closed(
                points.clone(),
                PaintStyle::stroke(self.palette.line, self.style.polygon_stroke_width),
            ),
        );
        frame.push(
            CanvasLayerKind::Series,
            PathPrimitive::closed(points, PaintStyle::Fill(self.palette.fill)),
        );
        Ok(())
    }

    /// Text centered on `anchor` over a filled background box.
    #[allow(clippy::too_many_arguments)]
    fn draw_label(
        &self,
        text: &str,
        anchor: &Coordinate,
        font_size: f64,
        color: Color,
        measurer: &dyn TextMeasurer,
        layer: CanvasLayerKind,
        frame: &mut LayeredRenderFrame,
    ) {
        if text.is_empty() {
            return;
        }
        let bounds = measurer.measure(text, font_size);
        let x = anchor.x - bounds.width / 2.0;
        let baseline = anchor.y + bounds.height / 2.0;
        frame.push(
            layer,
            RectPrimitive::new(
                x,
                baseline - bounds.height,
                bounds.width,
                bounds.height,
                self.style.label_background,
            ),
        );
        frame.push(
            layer,
            TextPrimitive::new(text, x, baseline, font_size, color, TextHAlign::Left),
        );
    }
}

impl ChartPainter for RadarChart {
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
        if !radius.is_finite() || radius <= 0.0 {
            warn!(
                width = viewport.width,
                height = viewport.height,
                "viewport too small for radar chart"
            );
            return Ok(frame);
        }

        if let Some(bounds) = self.draw_background(data, &center, radius, measurer, &mut frame)? {
            self.draw_score_polygon(data, &center, radius, bounds, measurer, &mut frame)?;
        }

        trace!(progress = self.progress, radius, "painted radar chart");
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

    fn advance(&mut self, delta_seconds: f64) -> bool {
        let Some(value) = self.animation.as_mut().and_then(|a| a.advance(delta_seconds)) else {
            return false;
        };
        self.progress = value.clamp(0.0, 1.0);
        self.redraw.request(InvalidationTopic::Animation);
        trace!(progress = self.progress, "radar animation tick");
        true
    }
}
