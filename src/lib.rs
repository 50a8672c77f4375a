//! jasper-charts: chart geometry and rendering engine.
//!
//! Line, stacked bar, pie, radar and circular gauge charts turn immutable data
//! snapshots into ordered draw commands for a pluggable `Renderer`. The crate
//! keeps a strict split between pure math (`core`), chart engines (`chart`),
//! the host facade (`api`) and backends (`render`).

pub mod api;
pub mod chart;
pub mod core;
pub mod error;
pub mod render;
pub mod telemetry;

pub use api::{ChartEngine, ChartEngineConfig};
pub use chart::ChartPainter;
pub use error::{ChartError, ChartResult};
