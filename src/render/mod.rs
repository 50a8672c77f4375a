mod frame;
mod layer_stack;
mod layered_frame;
mod null_renderer;
mod primitives;

pub use frame::RenderFrame;
pub use layer_stack::{CanvasLayerKind, ChartLayerStack};
pub use layered_frame::{LayerCommands, LayeredRenderFrame};
pub use null_renderer::{NullRenderer, RecordingRenderer};
pub use primitives::{
    ArcPrimitive, CirclePrimitive, Color, DrawCommand, LinePrimitive, PaintStyle, PathPrimitive,
    RectPrimitive, TextHAlign, TextPrimitive,
};

pub use crate::core::{MonospaceTextMeasurer, TextMeasurer};

use crate::error::ChartResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully materialized, ordered `RenderFrame`, so drawing
/// code stays isolated from chart geometry.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()>;
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoContextRenderer, CairoRenderStats, CairoRenderer, PangoTextMeasurer};
