use std::fs;
use std::path::{Path, PathBuf};

use crate::error::PipelineError;
use crate::pipeline::stage4_metrics::NamedSummary;
use crate::report::manifest::RunManifest;
use crate::report::xlsx::{render_workbook, save_workbook};

pub const MANIFEST_FILE: &str = "summary.json";

/// `{out_base}/{plate}`; an empty plate name writes straight into `out_base`.
pub fn plate_output_dir(out_base: &Path, plate: &str) -> PathBuf {
    if plate.is_empty() {
        out_base.to_path_buf()
    } else {
        out_base.join(plate)
    }
}

pub fn summary_path(out_dir: &Path, name: &str) -> PathBuf {
    out_dir.join(format!("{name}.xlsx"))
}

/// Writes one spreadsheet per summary, overwriting existing files, then the
/// manifest if one is given. Everything is rendered before the first file is
/// touched. Returns the written paths in order.
pub fn write_reports(
    summaries: &[NamedSummary],
    out_dir: &Path,
    manifest: Option<&RunManifest>,
) -> Result<Vec<PathBuf>, PipelineError> {
    let mut workbooks = Vec::with_capacity(summaries.len());
    for summary in summaries {
        let path = summary_path(out_dir, summary.name);
        let workbook = render_workbook(&summary.table).map_err(|source| PipelineError::Xlsx {
            path: path.clone(),
            source,
        })?;
        workbooks.push((summary, path, workbook));
    }
    let manifest_json = manifest.map(RunManifest::render).transpose()?;

    fs::create_dir_all(out_dir).map_err(|e| PipelineError::io(out_dir, e))?;

    let mut written = Vec::with_capacity(workbooks.len() + 1);
    for (summary, path, mut workbook) in workbooks {
        save_workbook(&mut workbook, &path)?;
        tracing::debug!(
            rows = summary.table.n_rows(),
            columns = summary.table.n_cols(),
            "wrote {}",
            path.display()
        );
        written.push(path);
    }

    if let Some(json) = manifest_json {
        let path = out_dir.join(MANIFEST_FILE);
        fs::write(&path, json).map_err(|e| PipelineError::io(&path, e))?;
        written.push(path);
    }

    tracing::info!("{} files written to {}", written.len(), out_dir.display());
    Ok(written)
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage5_report.rs"]
mod tests;
