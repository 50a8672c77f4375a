//! Axis-space reservation for category charts.
//!
//! The calculator measures every axis label through the injected
//! `TextMeasurer`, reserves the left/bottom margins those labels need and
//! derives the per-category slot grid plus the value-to-pixel unit.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{TextMeasurer, Viewport};
use crate::error::{ChartError, ChartResult};

/// Up to three stacked lines of text attached to one category.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AxisLabel {
    lines: SmallVec<[String; 3]>,
}

impl AxisLabel {
    pub const MAX_LINES: usize = 3;

    pub fn new<I, S>(lines: I) -> ChartResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let label = Self {
            lines: lines.into_iter().map(Into::into).collect(),
        };
        label.validate()?;
        Ok(label)
    }

    #[must_use]
    pub fn single(text: impl Into<String>) -> Self {
        let mut lines = SmallVec::new();
        lines.push(text.into());
        Self { lines }
    }

    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Non-empty lines with their original slot index.
    pub fn visible_lines(&self) -> impl Iterator<Item = (usize, &str)> {
        self.lines
            .iter()
            .enumerate()
            .filter(|(_, line)| !line.is_empty())
            .map(|(index, line)| (index, line.as_str()))
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.lines.len() > Self::MAX_LINES {
            return Err(ChartError::InvalidData(format!(
                "axis label supports at most {} lines, got {}",
                Self::MAX_LINES,
                self.lines.len()
            )));
        }
        Ok(())
    }
}

/// One labeled reference value on the Y axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YAxisTick {
    pub label: String,
    pub value: f64,
}

impl YAxisTick {
    #[must_use]
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Summed height of the non-empty lines of `label`.
#[must_use]
pub fn label_block_height(label: &AxisLabel, measurer: &dyn TextMeasurer, font_size_px: f64) -> f64 {
    label
        .visible_lines()
        .map(|(_, line)| measurer.measure(line, font_size_px).height)
        .sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutStyle {
    pub axis_margin: f64,
    pub label_margin: f64,
    pub font_size_px: f64,
}

impl Default for LayoutStyle {
    fn default() -> Self {
        Self {
            axis_margin: 8.0,
            label_margin: 4.0,
            font_size_px: 12.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LayoutInput<'a> {
    pub x_labels: &'a [AxisLabel],
    pub y_ticks: &'a [YAxisTick],
    /// Per-category label blocks drawn above the data; reserves headroom.
    pub value_labels: &'a [AxisLabel],
    pub y_min: f64,
    pub y_max: f64,
}

/// Derived layout for one draw pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutMetrics {
    pub category_count: usize,
    pub y_axis_width: f64,
    pub x_axis_height: f64,
    pub value_label_height: f64,
    /// Left edge of the plot area.
    pub plot_left: f64,
    /// Pixel row of `y_min`.
    pub y_zero: f64,
    /// Pixels per value unit; `0.0` for a flat range.
    pub y_unit: f64,
    pub y_min: f64,
    pub slot_width: f64,
    pub bar_width: f64,
}

impl LayoutMetrics {
    #[must_use]
    pub fn slot_center_x(&self, index: usize) -> f64 {
        self.plot_left + self.slot_width * index as f64 + self.slot_width * 0.5
    }

    #[must_use]
    pub fn bar_left_x(&self, index: usize) -> f64 {
        self.slot_center_x(index) - self.bar_width * 0.5
    }

    #[must_use]
    pub fn value_to_y(&self, value: f64) -> f64 {
        self.y_zero - self.y_unit * (value - self.y_min)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayoutOutcome {
    Ready(LayoutMetrics),
    /// No categories to lay out; renderers draw nothing.
    InsufficientData,
}

impl LayoutOutcome {
    #[must_use]
    pub fn metrics(self) -> Option<LayoutMetrics> {
        match self {
            Self::Ready(metrics) => Some(metrics),
            Self::InsufficientData => None,
        }
    }
}

pub fn compute_layout(
    viewport: Viewport,
    input: &LayoutInput<'_>,
    measurer: &dyn TextMeasurer,
    style: &LayoutStyle,
) -> ChartResult<LayoutOutcome> {
    let viewport = viewport.ensure_valid()?;
    let category_count = input.x_labels.len();
    if category_count == 0 {
        return Ok(LayoutOutcome::InsufficientData);
    }

    let font = style.font_size_px;
    let x_axis_height = input
        .x_labels
        .iter()
        .map(|label| label_block_height(label, measurer, font))
        .fold(0.0_f64, f64::max);
    let y_axis_width = input
        .y_ticks
        .iter()
        .map(|tick| measurer.measure(&tick.label, font).width)
        .fold(0.0_f64, f64::max);
    let value_label_height = input
        .value_labels
        .iter()
        .map(|label| label_block_height(label, measurer, font))
        .fold(0.0_f64, f64::max);

    let y_zero = viewport.height_px() - (x_axis_height + style.axis_margin);
    let range = input.y_max - input.y_min;
    let y_unit = if range > 0.0 && range.is_finite() {
        (y_zero - value_label_height - style.label_margin).max(0.0) / range
    } else {
        0.0
    };

    let plot_left = y_axis_width + style.axis_margin;
    let slot_width = (viewport.width_px() - plot_left).max(0.0) / category_count as f64;

    Ok(LayoutOutcome::Ready(LayoutMetrics {
        category_count,
        y_axis_width,
        x_axis_height,
        value_label_height,
        plot_left,
        y_zero,
        y_unit,
        y_min: if input.y_min.is_finite() { input.y_min } else { 0.0 },
        slot_width,
        bar_width: slot_width * 0.5,
    }))
}
