use tracing::{debug, trace};

use crate::chart::ChartPainter;
use crate::core::{MonospaceTextMeasurer, TextMeasurer, Viewport};
use crate::error::ChartResult;
use crate::render::{RenderFrame, Renderer};

use super::{ChartEngineConfig, InvalidationMask, InvalidationTopic};

#[cfg(feature = "cairo-backend")]
use crate::render::CairoContextRenderer;

/// Host-facing facade around one chart engine.
///
/// The host reports canvas size changes, feeds animation time through
/// `tick`, and asks for a draw when `needs_redraw` says one is pending.
/// Every draw recomputes the chart's layout from the current viewport.
pub struct ChartEngine<C: ChartPainter, R: Renderer, M: TextMeasurer = MonospaceTextMeasurer> {
    chart: C,
    renderer: R,
    measurer: M,
    viewport: Viewport,
    frames_rendered: u64,
}

impl<C: ChartPainter, R: Renderer> ChartEngine<C, R> {
    /// Builds an engine that measures text with the monospace approximation.
    pub fn with_monospace_text(
        chart: C,
        renderer: R,
        config: ChartEngineConfig,
    ) -> ChartResult<Self> {
        Self::new(chart, renderer, MonospaceTextMeasurer::default(), config)
    }
}

impl<C: ChartPainter, R: Renderer, M: TextMeasurer> ChartEngine<C, R, M> {
    pub fn new(
        mut chart: C,
        renderer: R,
        measurer: M,
        config: ChartEngineConfig,
    ) -> ChartResult<Self> {
        config.validate()?;
        chart.set_density(config.density)?;
        chart
            .redraw_request_mut()
            .request(InvalidationTopic::Viewport);
        debug!(
            width = config.viewport.width,
            height = config.viewport.height,
            density = config.density,
            "chart engine created"
        );
        Ok(Self {
            chart,
            renderer,
            measurer,
            viewport: config.viewport,
            frames_rendered: 0,
        })
    }

    #[must_use]
    pub fn chart(&self) -> &C {
        &self.chart
    }

    /// Mutable access for data, selection and style updates; each setter
    /// records its own redraw request.
    pub fn chart_mut(&mut self) -> &mut C {
        &mut self.chart
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn config(&self) -> ChartEngineConfig {
        ChartEngineConfig::new(self.viewport).with_density(self.chart.density())
    }

    #[must_use]
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    pub fn set_viewport(&mut self, viewport: Viewport) -> ChartResult<()> {
        let viewport = viewport.ensure_valid()?;
        if viewport == self.viewport {
            return Ok(());
        }
        self.viewport = viewport;
        self.chart
            .redraw_request_mut()
            .request(InvalidationTopic::Viewport);
        Ok(())
    }

    pub fn set_density(&mut self, density: f64) -> ChartResult<()> {
        self.chart.set_density(density)
    }

    /// Feeds elapsed time to the chart's animation state.
    ///
    /// Returns `true` when the chart requested a redraw.
    pub fn tick(&mut self, delta_seconds: f64) -> bool {
        let requested = self.chart.advance(delta_seconds);
        if requested {
            trace!(delta_seconds, "tick requested redraw");
        }
        requested
    }

    #[must_use]
    pub fn needs_redraw(&self) -> bool {
        self.chart.redraw_request().is_pending()
    }

    #[must_use]
    pub fn pending_invalidation(&self) -> InvalidationMask {
        self.chart.redraw_request().pending()
    }

    /// Flattened draw commands for the current state, without rendering.
    pub fn build_render_frame(&self) -> ChartResult<RenderFrame> {
        let frame = self
            .chart
            .paint(self.viewport, &self.measurer)?
            .into_frame();
        frame.validate()?;
        Ok(frame)
    }

    /// Draws unconditionally and clears any pending redraw request.
    pub fn render(&mut self) -> ChartResult<()> {
        let frame = self.build_render_frame()?;
        self.renderer.render(&frame)?;
        self.finish_pass(frame.len());
        Ok(())
    }

    /// Draws only when a redraw is pending; returns whether a pass ran.
    pub fn render_if_needed(&mut self) -> ChartResult<bool> {
        if !self.needs_redraw() {
            return Ok(false);
        }
        self.render()?;
        Ok(true)
    }

    /// Renders the frame into an external cairo context.
    #[cfg(feature = "cairo-backend")]
    pub fn render_on_cairo_context(&mut self, context: &cairo::Context) -> ChartResult<()>
    where
        R: CairoContextRenderer,
    {
        let frame = self.build_render_frame()?;
        self.renderer.render_on_cairo_context(context, &frame)?;
        self.finish_pass(frame.len());
        Ok(())
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    fn finish_pass(&mut self, command_count: usize) {
        let mask = self.chart.redraw_request_mut().take();
        self.frames_rendered = self.frames_rendered.saturating_add(1);
        trace!(
            level = ?mask.level(),
            commands = command_count,
            frames = self.frames_rendered,
            "chart rendered"
        );
    }
}
