use crate::core::Viewport;
use crate::error::ChartResult;
use crate::render::{
    ArcPrimitive, CirclePrimitive, DrawCommand, LinePrimitive, PathPrimitive, RectPrimitive,
    TextPrimitive,
};

/// Backend-agnostic, ordered scene for one chart draw pass.
///
/// Commands are painted in order, so later commands cover earlier ones.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub commands: Vec<DrawCommand>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            commands: Vec::new(),
        }
    }

    pub fn push(&mut self, command: impl Into<DrawCommand>) {
        self.commands.push(command.into());
    }

    #[must_use]
    pub fn with_command(mut self, command: impl Into<DrawCommand>) -> Self {
        self.push(command);
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        self.viewport.ensure_valid()?;
        for command in &self.commands {
            command.validate()?;
        }
        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn lines(&self) -> impl Iterator<Item = &LinePrimitive> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Line(line) => Some(line),
            _ => None,
        })
    }

    pub fn rects(&self) -> impl Iterator<Item = &RectPrimitive> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Rect(rect) => Some(rect),
            _ => None,
        })
    }

    pub fn circles(&self) -> impl Iterator<Item = &CirclePrimitive> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Circle(circle) => Some(circle),
            _ => None,
        })
    }

    pub fn arcs(&self) -> impl Iterator<Item = &ArcPrimitive> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Arc(arc) => Some(arc),
            _ => None,
        })
    }

    pub fn paths(&self) -> impl Iterator<Item = &PathPrimitive> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Path(path) => Some(path),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextPrimitive> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text(text) => Some(text),
            _ => None,
        })
    }
}
