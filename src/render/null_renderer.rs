use crate::error::ChartResult;
use crate::render::{RenderFrame, Renderer};

/// No-op renderer used by tests and headless hosts.
///
/// It still validates frame content so invalid geometry (NaN or infinite
/// coordinates) is caught without a real backend.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub frames_rendered: usize,
    pub last_command_count: usize,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        self.frames_rendered += 1;
        self.last_command_count = frame.len();
        Ok(())
    }
}

/// Renderer that keeps a copy of every validated frame it receives.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub frames: Vec<RenderFrame>,
}

impl RecordingRenderer {
    #[must_use]
    pub fn last_frame(&self) -> Option<&RenderFrame> {
        self.frames.last()
    }
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        self.frames.push(frame.clone());
        Ok(())
    }
}
