use serde::Serialize;

use crate::input::conditions::ConditionMap;
use crate::model::events::EventTables;
use crate::model::summary::SummaryShape;
use crate::pipeline::stage4_metrics::NamedSummary;

/// Contents of `summary.json`. Holds no timestamps, so identical inputs give
/// identical bytes.
#[derive(Debug, Clone, Serialize)]
pub struct RunManifest {
    pub tool: String,
    pub version: String,
    pub plate: String,
    pub minutes_recorded: u32,
    pub conditions: Vec<ManifestCondition>,
    pub input_rows: InputRows,
    pub summaries: Vec<ManifestSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ManifestCondition {
    pub name: String,
    pub wells: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InputRows {
    pub spikes: usize,
    pub bursts: usize,
    pub net_bursts: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ManifestSummary {
    pub file: String,
    pub title: String,
    pub shape: SummaryShape,
    pub rows: usize,
    pub columns: usize,
}

impl RunManifest {
    pub fn new(
        plate: &str,
        minutes_recorded: u32,
        conditions: &ConditionMap,
        tables: &EventTables,
        summaries: &[NamedSummary],
    ) -> Self {
        RunManifest {
            tool: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            plate: plate.to_string(),
            minutes_recorded,
            conditions: conditions
                .groups
                .iter()
                .map(|g| ManifestCondition {
                    name: g.name.clone(),
                    wells: g.wells.clone(),
                })
                .collect(),
            input_rows: InputRows {
                spikes: tables.spikes.len(),
                bursts: tables.bursts.len(),
                net_bursts: tables.net_bursts.len(),
            },
            summaries: summaries
                .iter()
                .map(|s| ManifestSummary {
                    file: format!("{}.xlsx", s.name),
                    title: s.table.title.clone(),
                    shape: s.table.shape,
                    rows: s.table.n_rows(),
                    columns: s.table.n_cols(),
                })
                .collect(),
        }
    }

    pub fn render(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/manifest.rs"]
mod tests;
