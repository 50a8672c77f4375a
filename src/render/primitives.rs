use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);

    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    /// Builds a color from 8-bit `argb` channels.
    #[must_use]
    pub fn argb8(alpha: u8, red: u8, green: u8, blue: u8) -> Self {
        Self::rgba(
            f64::from(red) / 255.0,
            f64::from(green) / 255.0,
            f64::from(blue) / 255.0,
            f64::from(alpha) / 255.0,
        )
    }

    #[must_use]
    pub fn rgb8(red: u8, green: u8, blue: u8) -> Self {
        Self::argb8(255, red, green, blue)
    }

    pub fn validate(self) -> ChartResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ChartError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

/// How a closed shape is painted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PaintStyle {
    Fill(Color),
    Stroke { color: Color, width: f64 },
}

impl PaintStyle {
    #[must_use]
    pub const fn stroke(color: Color, width: f64) -> Self {
        Self::Stroke { color, width }
    }

    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Self::Fill(color) | Self::Stroke { color, .. } => color,
        }
    }

    #[must_use]
    pub const fn stroke_width(self) -> Option<f64> {
        match self {
            Self::Fill(_) => None,
            Self::Stroke { width, .. } => Some(width),
        }
    }

    pub fn validate(self) -> ChartResult<()> {
        if let Self::Stroke { width, .. } = self {
            if !width.is_finite() || width <= 0.0 {
                return Err(ChartError::InvalidData(
                    "stroke width must be finite and > 0".to_owned(),
                ));
            }
        }
        self.color().validate()
    }
}

fn ensure_finite(values: &[f64], what: &str) -> ChartResult<()> {
    if values.iter().all(|value| value.is_finite()) {
        Ok(())
    } else {
        Err(ChartError::InvalidData(format!("{what} must be finite")))
    }
}

/// Draw command for one line segment in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinePrimitive {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke_width: f64,
    pub color: Color,
}

impl LinePrimitive {
    #[must_use]
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64, stroke_width: f64, color: Color) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            stroke_width,
            color,
        }
    }

    pub fn validate(self) -> ChartResult<()> {
        ensure_finite(&[self.x1, self.y1, self.x2, self.y2], "line coordinates")?;
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(ChartError::InvalidData(
                "line stroke width must be finite and > 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}

/// Filled axis-aligned rectangle; `y` is the top edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectPrimitive {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill_color: Color,
}

impl RectPrimitive {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64, fill_color: Color) -> Self {
        Self {
            x,
            y,
            width,
            height,
            fill_color,
        }
    }

    pub fn validate(self) -> ChartResult<()> {
        ensure_finite(&[self.x, self.y, self.width, self.height], "rect geometry")?;
        if self.width < 0.0 || self.height < 0.0 {
            return Err(ChartError::InvalidData(
                "rect size must be >= 0".to_owned(),
            ));
        }
        self.fill_color.validate()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CirclePrimitive {
    pub center_x: f64,
    pub center_y: f64,
    pub radius: f64,
    pub style: PaintStyle,
}

impl CirclePrimitive {
    #[must_use]
    pub const fn new(center_x: f64, center_y: f64, radius: f64, style: PaintStyle) -> Self {
        Self {
            center_x,
            center_y,
            radius,
            style,
        }
    }

    pub fn validate(self) -> ChartResult<()> {
        ensure_finite(&[self.center_x, self.center_y, self.radius], "circle geometry")?;
        if self.radius < 0.0 {
            return Err(ChartError::InvalidData(
                "circle radius must be >= 0".to_owned(),
            ));
        }
        self.style.validate()
    }
}

/// Circular arc; angles in degrees, clockwise from 3 o'clock (screen space).
///
/// With `use_center` the arc is closed through the center, producing a pie
/// wedge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcPrimitive {
    pub center_x: f64,
    pub center_y: f64,
    pub radius: f64,
    pub start_degrees: f64,
    pub sweep_degrees: f64,
    pub use_center: bool,
    pub style: PaintStyle,
}

impl ArcPrimitive {
    pub fn validate(self) -> ChartResult<()> {
        ensure_finite(
            &[
                self.center_x,
                self.center_y,
                self.radius,
                self.start_degrees,
                self.sweep_degrees,
            ],
            "arc geometry",
        )?;
        if self.radius < 0.0 {
            return Err(ChartError::InvalidData(
                "arc radius must be >= 0".to_owned(),
            ));
        }
        self.style.validate()
    }
}

/// Polyline or polygon through `points`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathPrimitive {
    pub points: Vec<(f64, f64)>,
    pub closed: bool,
    pub style: PaintStyle,
}

impl PathPrimitive {
    #[must_use]
    pub fn open(points: Vec<(f64, f64)>, style: PaintStyle) -> Self {
        Self {
            points,
            closed: false,
            style,
        }
    }

    #[must_use]
    pub fn closed(points: Vec<(f64, f64)>, style: PaintStyle) -> Self {
        Self {
            points,
            closed: true,
            style,
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.points.is_empty() {
            return Err(ChartError::InvalidData(
                "path must contain at least one point".to_owned(),
            ));
        }
        for (x, y) in &self.points {
            ensure_finite(&[*x, *y], "path points")?;
        }
        self.style.validate()
    }
}

/// Horizontal text alignment relative to `TextPrimitive::x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextHAlign {
    Left,
    Center,
    Right,
}

/// Draw command for one label; `y` is the text baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPrimitive {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font_size_px: f64,
    pub color: Color,
    pub h_align: TextHAlign,
    /// Stroke width of an outline painted with the glyphs, used for halos.
    #[serde(default)]
    pub outline_width: f64,
}

impl TextPrimitive {
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        x: f64,
        y: f64,
        font_size_px: f64,
        color: Color,
        h_align: TextHAlign,
    ) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            font_size_px,
            color,
            h_align,
            outline_width: 0.0,
        }
    }

    #[must_use]
    pub fn with_outline(mut self, outline_width: f64) -> Self {
        self.outline_width = outline_width;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.text.is_empty() {
            return Err(ChartError::InvalidData(
                "text primitive must not be empty".to_owned(),
            ));
        }
        ensure_finite(&[self.x, self.y], "text coordinates")?;
        if !self.font_size_px.is_finite() || self.font_size_px <= 0.0 {
            return Err(ChartError::InvalidData(
                "font size must be finite and > 0".to_owned(),
            ));
        }
        if !self.outline_width.is_finite() || self.outline_width < 0.0 {
            return Err(ChartError::InvalidData(
                "text outline width must be finite and >= 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}

/// One ordered draw call emitted by a chart engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    Line(LinePrimitive),
    Rect(RectPrimitive),
    Circle(CirclePrimitive),
    Arc(ArcPrimitive),
    Path(PathPrimitive),
    Text(TextPrimitive),
}

impl DrawCommand {
    pub fn validate(&self) -> ChartResult<()> {
        match self {
            Self::Line(line) => line.validate(),
            Self::Rect(rect) => rect.validate(),
            Self::Circle(circle) => circle.validate(),
            Self::Arc(arc) => arc.validate(),
            Self::Path(path) => path.validate(),
            Self::Text(text) => text.validate(),
        }
    }
}

impl From<LinePrimitive> for DrawCommand {
    fn from(value: LinePrimitive) -> Self {
        Self::Line(value)
    }
}

impl From<RectPrimitive> for DrawCommand {
    fn from(value: RectPrimitive) -> Self {
        Self::Rect(value)
    }
}

impl From<CirclePrimitive> for DrawCommand {
    fn from(value: CirclePrimitive) -> Self {
        Self::Circle(value)
    }
}

impl From<ArcPrimitive> for DrawCommand {
    fn from(value: ArcPrimitive) -> Self {
        Self::Arc(value)
    }
}

impl From<PathPrimitive> for DrawCommand {
    fn from(value: PathPrimitive) -> Self {
        Self::Path(value)
    }
}

impl From<TextPrimitive> for DrawCommand {
    fn from(value: TextPrimitive) -> Self {
        Self::Text(value)
    }
}
