mod error;
mod input;
mod logging;
mod model;
mod pipeline;
mod report;

use std::path::PathBuf;

use clap::Parser;

use crate::error::PipelineError;
use crate::input::{load_inputs, plate_name, resolve_inputs};
use crate::pipeline::stage1_timing::{TrainKey, derive_timing};
use crate::pipeline::stage2_labels::relabel_tables;
use crate::pipeline::stage3_aggregate::LabelDomain;
use crate::pipeline::stage4_metrics::build_summaries;
use crate::pipeline::stage5_report::{plate_output_dir, write_reports};
use crate::report::manifest::RunManifest;

/// Summarizes MCS Multiwell MEA spike, burst and network burst exports per
/// condition and channel, one spreadsheet per metric.
#[derive(Debug, Parser)]
#[command(
    name = "mea-burstqc",
    version,
    after_help = "Example conditions file:\n\n{\n    'K2_16': ['A1', 'A2', 'B1', 'B2'],\n    'P7_3': ['A3', 'A4'],\n    'empty': ['D4', 'D6'],\n}"
)]
struct Args {
    /// Base directory holding the exports (e.g. /mnt/data/multiwell/csv/)
    base_dir: PathBuf,
    /// Conditions file, relative to the base directory
    conditions_file: PathBuf,
    /// Minutes recorded
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    mins_recorded: u32,
    /// Spikes table, relative to the base directory
    spikes_file: PathBuf,
    /// Bursts table, relative to the base directory
    bursts_file: PathBuf,
    /// Network bursts table, relative to the base directory
    net_bursts_file: PathBuf,
    /// Write the plate folder here instead of into the base directory
    #[arg(long)]
    out_dir: Option<PathBuf>,
    /// Do not write summary.json
    #[arg(long)]
    no_manifest: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct RunConfig {
    base_dir: PathBuf,
    conditions_file: PathBuf,
    spikes_file: PathBuf,
    bursts_file: PathBuf,
    net_bursts_file: PathBuf,
    minutes_recorded: u32,
    out_base: PathBuf,
    write_manifest: bool,
}

impl From<Args> for RunConfig {
    fn from(args: Args) -> Self {
        RunConfig {
            out_base: args.out_dir.unwrap_or_else(|| args.base_dir.clone()),
            base_dir: args.base_dir,
            conditions_file: args.conditions_file,
            spikes_file: args.spikes_file,
            bursts_file: args.bursts_file,
            net_bursts_file: args.net_bursts_file,
            minutes_recorded: args.mins_recorded,
            write_manifest: !args.no_manifest,
        }
    }
}

#[derive(Debug)]
struct RunOutcome {
    out_dir: PathBuf,
    written: Vec<PathBuf>,
}

fn main() {
    logging::init_logging();
    let config = RunConfig::from(Args::parse());
    match run(&config) {
        Ok(outcome) => tracing::info!(
            "done: {} files in {}",
            outcome.written.len(),
            outcome.out_dir.display()
        ),
        Err(err) => {
            tracing::error!("{err}");
            std::process::exit(1);
        }
    }
}

fn run(config: &RunConfig) -> Result<RunOutcome, PipelineError> {
    let paths = resolve_inputs(
        &config.base_dir,
        &config.conditions_file,
        &config.spikes_file,
        &config.bursts_file,
        &config.net_bursts_file,
    )?;

    let plate = plate_name(&paths.spikes);
    let out_dir = plate_output_dir(&config.out_base, &plate);
    tracing::info!("plate name is {plate} in {}", paths.base_dir.display());
    tracing::info!("output folder is {}", out_dir.display());

    let bundle = load_inputs(&paths)?;
    let tables = &bundle.tables;

    let bursts = derive_timing(&tables.bursts, TrainKey::Channel);
    let net_bursts = derive_timing(&tables.net_bursts, TrainKey::Well);
    tracing::info!("end timestamps and inter-burst intervals computed");

    let labeled = relabel_tables(&tables.spikes, &bursts, &net_bursts, &bundle.conditions);
    tracing::info!("conditions assigned to wells");

    let domain = LabelDomain::from_spikes(&labeled.spikes, bundle.conditions.condition_labels());
    let burst_channels_outside = labeled
        .bursts
        .iter()
        .filter_map(|b| b.burst.channel.as_deref())
        .filter(|c| !domain.channels.iter().any(|d| d == c))
        .count();
    if burst_channels_outside > 0 {
        tracing::warn!(
            "{burst_channels_outside} burst rows are on channels with no spikes and are left out of the channel summaries"
        );
    }

    let summaries = build_summaries(&labeled, &domain, config.minutes_recorded);
    tracing::info!(
        channels = domain.channels.len(),
        wells = domain.wells.len(),
        "{} summaries computed",
        summaries.len()
    );

    let manifest = config.write_manifest.then(|| {
        RunManifest::new(
            &plate,
            config.minutes_recorded,
            &bundle.conditions,
            tables,
            &summaries,
        )
    });
    let written = write_reports(&summaries, &out_dir, manifest.as_ref())?;

    Ok(RunOutcome { out_dir, written })
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
