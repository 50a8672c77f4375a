//! Host-facing facade: engine lifecycle, configuration, redraw gating and
//! JSON data contracts.

mod engine;
mod engine_config;
mod invalidation;
mod json_contract;

pub use engine::ChartEngine;
pub use engine_config::ChartEngineConfig;
pub use invalidation::{
    InvalidationLevel, InvalidationMask, InvalidationTopic, InvalidationTopics, RedrawRequest,
};
pub use json_contract::{
    CHART_DATA_JSON_SCHEMA_V1, ChartDataJsonContractV1, ChartDataSnapshot, SnapshotChart,
};
