use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chart::{
    BarChart, BarChartData, ChartPainter, GaugeChart, GaugeData, LineChart, LineChartData,
    PieChart, PieChartData, RadarChart, RadarChartData,
};
use crate::core::TextMeasurer;
use crate::error::{ChartError, ChartResult};
use crate::render::Renderer;

use super::ChartEngine;

pub const CHART_DATA_JSON_SCHEMA_V1: u32 = 1;

/// Data snapshot for any supported chart kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartDataSnapshot {
    Line {
        data: LineChartData,
        #[serde(default)]
        selected_keys: Vec<String>,
    },
    Bar {
        data: BarChartData,
    },
    Pie {
        data: PieChartData,
    },
    Radar {
        data: RadarChartData,
        #[serde(default)]
        use_deviation: bool,
    },
    Gauge {
        data: GaugeData,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDataJsonContractV1 {
    pub schema_version: u32,
    pub snapshot: ChartDataSnapshot,
}

impl ChartDataSnapshot {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Line { .. } => "line",
            Self::Bar { .. } => "bar",
            Self::Pie { .. } => "pie",
            Self::Radar { .. } => "radar",
            Self::Gauge { .. } => "gauge",
        }
    }

    pub fn to_json_contract_v1_pretty(&self) -> ChartResult<String> {
        let payload = ChartDataJsonContractV1 {
            schema_version: CHART_DATA_JSON_SCHEMA_V1,
            snapshot: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize chart data contract v1: {e}"))
        })
    }

    /// Accepts either a bare snapshot or a versioned v1 payload.
    pub fn from_json_compat_str(input: &str) -> ChartResult<Self> {
        if let Ok(snapshot) = serde_json::from_str::<ChartDataSnapshot>(input) {
            return Ok(snapshot);
        }
        let payload: ChartDataJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidData(format!("failed to parse chart data json payload: {e}"))
        })?;
        if payload.schema_version != CHART_DATA_JSON_SCHEMA_V1 {
            return Err(ChartError::InvalidData(format!(
                "unsupported chart data schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.snapshot)
    }
}

/// Charts whose dataset can be exported to and restored from a snapshot.
pub trait SnapshotChart {
    fn data_snapshot(&self) -> Option<ChartDataSnapshot>;

    /// Replaces the dataset; a snapshot of another chart kind is rejected.
    fn apply_snapshot(&mut self, snapshot: ChartDataSnapshot) -> ChartResult<()>;
}

fn kind_mismatch(expected: &str, snapshot: &ChartDataSnapshot) -> ChartError {
    ChartError::InvalidData(format!(
        "cannot apply `{}` snapshot to a {expected} chart",
        snapshot.kind()
    ))
}

impl SnapshotChart for LineChart {
    fn data_snapshot(&self) -> Option<ChartDataSnapshot> {
        Some(ChartDataSnapshot::Line {
            data: self.data()?.clone(),
            selected_keys: self.selected_keys().iter().cloned().collect(),
        })
    }

    fn apply_snapshot(&mut self, snapshot: ChartDataSnapshot) -> ChartResult<()> {
        match snapshot {
            ChartDataSnapshot::Line {
                data,
                selected_keys,
            } => {
                self.set_data(data)?;
                self.set_selected_keys(selected_keys);
                Ok(())
            }
            other => Err(kind_mismatch("line", &other)),
        }
    }
}

impl SnapshotChart for BarChart {
    fn data_snapshot(&self) -> Option<ChartDataSnapshot> {
        Some(ChartDataSnapshot::Bar {
            data: self.data()?.clone(),
        })
    }

    fn apply_snapshot(&mut self, snapshot: ChartDataSnapshot) -> ChartResult<()> {
        match snapshot {
            ChartDataSnapshot::Bar { data } => self.set_data(data),
            other => Err(kind_mismatch("bar", &other)),
        }
    }
}

impl SnapshotChart for PieChart {
    fn data_snapshot(&self) -> Option<ChartDataSnapshot> {
        Some(ChartDataSnapshot::Pie {
            data: self.data()?.clone(),
        })
    }

    fn apply_snapshot(&mut self, snapshot: ChartDataSnapshot) -> ChartResult<()> {
        match snapshot {
            ChartDataSnapshot::Pie { data } => self.set_data(data),
            other => Err(kind_mismatch("pie", &other)),
        }
    }
}

impl SnapshotChart for RadarChart {
    fn data_snapshot(&self) -> Option<ChartDataSnapshot> {
        Some(ChartDataSnapshot::Radar {
            data: self.data()?.clone(),
            use_deviation: self.use_deviation(),
        })
    }

    fn apply_snapshot(&mut self, snapshot: ChartDataSnapshot) -> ChartResult<()> {
        match snapshot {
            ChartDataSnapshot::Radar {
                data,
                use_deviation,
            } => self.set_data(data, use_deviation),
            other => Err(kind_mismatch("radar", &other)),
        }
    }
}

impl SnapshotChart for GaugeChart {
    fn data_snapshot(&self) -> Option<ChartDataSnapshot> {
        Some(ChartDataSnapshot::Gauge {
            data: self.data()?.clone(),
        })
    }

    fn apply_snapshot(&mut self, snapshot: ChartDataSnapshot) -> ChartResult<()> {
        match snapshot {
            ChartDataSnapshot::Gauge { data } => self.set_data(data),
            other => Err(kind_mismatch("gauge", &other)),
        }
    }
}

impl<C, R, M> ChartEngine<C, R, M>
where
    C: ChartPainter + SnapshotChart,
    R: Renderer,
    M: TextMeasurer,
{
    /// Serializes the chart's current dataset; `None` before any data is set.
    pub fn data_json_contract_v1_pretty(&self) -> ChartResult<Option<String>> {
        self.chart()
            .data_snapshot()
            .map(|snapshot| snapshot.to_json_contract_v1_pretty())
            .transpose()
    }

    pub fn import_data_json(&mut self, input: &str) -> ChartResult<()> {
        let snapshot = ChartDataSnapshot::from_json_compat_str(input)?;
        debug!(kind = snapshot.kind(), "importing chart data json");
        self.chart_mut().apply_snapshot(snapshot)
    }
}
