use std::path::{Path, PathBuf};

pub mod conditions;
pub mod open;
pub mod tables;

use conditions::ConditionMap;
use tables::{load_bursts, load_net_bursts, load_spikes};

use crate::error::PipelineError;
use crate::model::events::EventTables;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputPaths {
    pub base_dir: PathBuf,
    pub conditions: PathBuf,
    pub spikes: PathBuf,
    pub bursts: PathBuf,
    pub net_bursts: PathBuf,
}

#[derive(Debug, Clone)]
pub struct InputBundle {
    pub conditions: ConditionMap,
    pub tables: EventTables,
}

/// Joins the file names onto `base_dir` and checks that everything exists
/// before anything is read.
pub fn resolve_inputs(
    base_dir: &Path,
    conditions: &Path,
    spikes: &Path,
    bursts: &Path,
    net_bursts: &Path,
) -> Result<InputPaths, PipelineError> {
    if !base_dir.is_dir() {
        return Err(PipelineError::PathNotFound {
            path: base_dir.to_path_buf(),
            kind: "directory",
        });
    }
    let paths = InputPaths {
        base_dir: base_dir.to_path_buf(),
        conditions: base_dir.join(conditions),
        spikes: base_dir.join(spikes),
        bursts: base_dir.join(bursts),
        net_bursts: base_dir.join(net_bursts),
    };
    for path in [&paths.conditions, &paths.spikes, &paths.bursts, &paths.net_bursts] {
        if !path.is_file() {
            return Err(PipelineError::PathNotFound {
                path: path.clone(),
                kind: "file",
            });
        }
    }
    Ok(paths)
}

/// Plate name is the spikes file name without its last `_`-separated token,
/// e.g. `plate7_2024_spikes.csv` -> `plate7_2024`.
pub fn plate_name(spikes: &Path) -> String {
    let file_name = spikes
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match file_name.rsplit_once('_') {
        Some((plate, _)) => plate.to_string(),
        None => String::new(),
    }
}

pub fn load_inputs(paths: &InputPaths) -> Result<InputBundle, PipelineError> {
    let conditions = ConditionMap::load(&paths.conditions)?;
    let tables = EventTables {
        spikes: load_spikes(&paths.spikes)?,
        bursts: load_bursts(&paths.bursts)?,
        net_bursts: load_net_bursts(&paths.net_bursts)?,
    };
    tracing::info!(
        spikes = tables.spikes.len(),
        bursts = tables.bursts.len(),
        net_bursts = tables.net_bursts.len(),
        conditions = conditions.groups.len(),
        wells = conditions.n_wells(),
        "data loaded"
    );
    if conditions.is_empty() {
        tracing::warn!(
            "conditions file {} declares no conditions; summaries will have no wells",
            paths.conditions.display()
        );
    }
    Ok(InputBundle { conditions, tables })
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
