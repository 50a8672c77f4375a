use cairo::{Context, Format, ImageSurface};
use pango::FontDescription;
use std::fmt;

use crate::core::{TextBounds, TextMeasurer};
use crate::error::{ChartError, ChartResult};
use crate::render::{
    ArcPrimitive, Color, DrawCommand, PaintStyle, PathPrimitive, RenderFrame, Renderer,
    TextHAlign, TextPrimitive,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CairoRenderStats {
    pub lines_drawn: usize,
    pub rects_drawn: usize,
    pub circles_drawn: usize,
    pub arcs_drawn: usize,
    pub paths_drawn: usize,
    pub texts_drawn: usize,
}

/// Extension for renderers that can paint into a host-owned Cairo context.
pub trait CairoContextRenderer {
    fn render_on_cairo_context(
        &mut self,
        context: &Context,
        frame: &RenderFrame,
    ) -> ChartResult<()>;
}

/// Cairo + Pango renderer backend.
///
/// Renders offscreen into an image surface through `Renderer::render`, or
/// in place on an external context through `CairoContextRenderer`.
#[derive(Debug)]
pub struct CairoRenderer {
    surface: ImageSurface,
    clear_color: Color,
    last_stats: CairoRenderStats,
}

impl CairoRenderer {
    pub fn new(width: i32, height: i32) -> ChartResult<Self> {
        if width <= 0 || height <= 0 {
            return Err(ChartError::InvalidData(
                "cairo surface size must be > 0".to_owned(),
            ));
        }

        let surface = ImageSurface::create(Format::ARgb32, width, height)
            .map_err(|err| map_backend_error("failed to create cairo surface", err))?;
        Ok(Self {
            surface,
            clear_color: Color::WHITE,
            last_stats: CairoRenderStats::default(),
        })
    }

    #[must_use]
    pub fn surface(&self) -> &ImageSurface {
        &self.surface
    }

    pub fn set_clear_color(&mut self, color: Color) -> ChartResult<()> {
        color.validate()?;
        self.clear_color = color;
        Ok(())
    }

    #[must_use]
    pub fn last_stats(&self) -> CairoRenderStats {
        self.last_stats
    }

    fn render_with_context(&mut self, context: &Context, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;

        apply_color(context, self.clear_color);
        context
            .paint()
            .map_err(|err| map_backend_error("failed to clear surface", err))?;

        let mut stats = CairoRenderStats::default();
        for command in &frame.commands {
            match command {
                DrawCommand::Line(line) => {
                    context.new_path();
                    context.move_to(line.x1, line.y1);
                    context.line_to(line.x2, line.y2);
                    finish_shape(context, PaintStyle::stroke(line.color, line.stroke_width))?;
                    stats.lines_drawn += 1;
                }
                DrawCommand::Rect(rect) => {
                    context.new_path();
                    context.rectangle(rect.x, rect.y, rect.width, rect.height);
                    finish_shape(context, PaintStyle::Fill(rect.fill_color))?;
                    stats.rects_drawn += 1;
                }
                DrawCommand::Circle(circle) => {
                    context.new_path();
                    context.arc(
                        circle.center_x,
                        circle.center_y,
                        circle.radius,
                        0.0,
                        std::f64::consts::TAU,
                    );
                    finish_shape(context, circle.style)?;
                    stats.circles_drawn += 1;
                }
                DrawCommand::Arc(arc) => {
                    append_arc(context, arc);
                    finish_shape(context, arc.style)?;
                    stats.arcs_drawn += 1;
                }
                DrawCommand::Path(path) => {
                    append_path(context, path);
                    finish_shape(context, path.style)?;
                    stats.paths_drawn += 1;
                }
                DrawCommand::Text(text) => {
                    draw_text(context, text)?;
                    stats.texts_drawn += 1;
                }
            }
        }

        self.last_stats = stats;
        Ok(())
    }
}

impl Renderer for CairoRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        let context = Context::new(&self.surface)
            .map_err(|err| map_backend_error("failed to create cairo context", err))?;
        self.render_with_context(&context, frame)
    }
}

impl CairoContextRenderer for CairoRenderer {
    fn render_on_cairo_context(
        &mut self,
        context: &Context,
        frame: &RenderFrame,
    ) -> ChartResult<()> {
        self.render_with_context(context, frame)
    }
}

/// Pango-backed text measurement sharing the renderer's font setup.
pub struct PangoTextMeasurer {
    context: Context,
}

impl PangoTextMeasurer {
    pub fn new() -> ChartResult<Self> {
        let surface = ImageSurface::create(Format::ARgb32, 1, 1)
            .map_err(|err| map_backend_error("failed to create measuring surface", err))?;
        let context = Context::new(&surface)
            .map_err(|err| map_backend_error("failed to create measuring context", err))?;
        Ok(Self { context })
    }
}

impl fmt::Debug for PangoTextMeasurer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PangoTextMeasurer").finish_non_exhaustive()
    }
}

impl TextMeasurer for PangoTextMeasurer {
    fn measure(&self, text: &str, font_size_px: f64) -> TextBounds {
        if text.is_empty() {
            return TextBounds::default();
        }
        let layout = create_layout(&self.context, text, font_size_px);
        let (width, height) = layout.pixel_size();
        TextBounds::new(f64::from(width), f64::from(height))
    }
}

fn create_layout(context: &Context, text: &str, font_size_px: f64) -> pango::Layout {
    let layout = pangocairo::functions::create_layout(context);
    let mut font_description = FontDescription::from_string("Sans");
    font_description.set_absolute_size(font_size_px * f64::from(pango::SCALE));
    layout.set_font_description(Some(&font_description));
    layout.set_text(text);
    layout
}

fn draw_text(context: &Context, text: &TextPrimitive) -> ChartResult<()> {
    let layout = create_layout(context, &text.text, text.font_size_px);
    let (text_width, _) = layout.pixel_size();
    let x = match text.h_align {
        TextHAlign::Left => text.x,
        TextHAlign::Center => text.x - f64::from(text_width) / 2.0,
        TextHAlign::Right => text.x - f64::from(text_width),
    };
    let baseline = f64::from(layout.baseline()) / f64::from(pango::SCALE);

    apply_color(context, text.color);
    context.new_path();
    context.move_to(x, text.y - baseline);
    if text.outline_width > 0.0 {
        pangocairo::functions::layout_path(context, &layout);
        context.set_line_width(text.outline_width);
        context
            .stroke_preserve()
            .map_err(|err| map_backend_error("failed to stroke text outline", err))?;
        context
            .fill()
            .map_err(|err| map_backend_error("failed to fill text outline", err))?;
    } else {
        pangocairo::functions::show_layout(context, &layout);
    }
    Ok(())
}

fn append_arc(context: &Context, arc: &ArcPrimitive) {
    let start = arc.start_degrees.to_radians();
    let end = (arc.start_degrees + arc.sweep_degrees).to_radians();
    context.new_path();
    if arc.use_center {
        context.move_to(arc.center_x, arc.center_y);
    }
    if arc.sweep_degrees >= 0.0 {
        context.arc(arc.center_x, arc.center_y, arc.radius, start, end);
    } else {
        context.arc_negative(arc.center_x, arc.center_y, arc.radius, start, end);
    }
    if arc.use_center {
        context.close_path();
    }
}

fn append_path(context: &Context, path: &PathPrimitive) {
    context.new_path();
    let mut points = path.points.iter();
    if let Some((x, y)) = points.next() {
        context.move_to(*x, *y);
    }
    for (x, y) in points {
        context.line_to(*x, *y);
    }
    if path.closed {
        context.close_path();
    }
}

fn finish_shape(context: &Context, style: PaintStyle) -> ChartResult<()> {
    apply_color(context, style.color());
    match style {
        PaintStyle::Fill(_) => context
            .fill()
            .map_err(|err| map_backend_error("failed to fill shape", err)),
        PaintStyle::Stroke { width, .. } => {
            context.set_line_width(width);
            context
                .stroke()
                .map_err(|err| map_backend_error("failed to stroke shape", err))
        }
    }
}

fn apply_color(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> ChartError {
    ChartError::Backend(format!("{prefix}: {err}"))
}
