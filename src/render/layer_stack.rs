use serde::{Deserialize, Serialize};

/// Paint layers of one chart, listed bottom to top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CanvasLayerKind {
    Background,
    Grid,
    Series,
    Emphasis,
    Labels,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartLayerStack {
    pub layers: Vec<CanvasLayerKind>,
}

impl ChartLayerStack {
    #[must_use]
    pub fn canonical() -> Self {
        Self {
            layers: vec![
                CanvasLayerKind::Background,
                CanvasLayerKind::Grid,
                CanvasLayerKind::Series,
                CanvasLayerKind::Emphasis,
                CanvasLayerKind::Labels,
            ],
        }
    }
}

impl Default for ChartLayerStack {
    fn default() -> Self {
        Self::canonical()
    }
}
