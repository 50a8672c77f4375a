pub mod animation;
pub mod geometry;
pub mod layout;
pub mod scale;
pub mod text;
pub mod types;

pub use animation::{Easing, ProgressAnimation};
pub use geometry::{Coordinate, PixelRect};
pub use layout::{
    AxisLabel, LayoutInput, LayoutMetrics, LayoutOutcome, LayoutStyle, YAxisTick, compute_layout,
    label_block_height,
};
pub use scale::ValueScale;
pub use text::{MonospaceTextMeasurer, TextMeasurer};
pub use types::{TextBounds, Viewport};
