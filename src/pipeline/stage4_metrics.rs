use crate::model::events::ValueColumn;
use crate::model::summary::SummaryTable;
use crate::pipeline::stage2_labels::LabeledTables;
use crate::pipeline::stage3_aggregate::{GroupKeys, LabelDomain, count, mean_of, std_of, sum};

/// A finished summary and the file stem it is written under.
#[derive(Debug, Clone)]
pub struct NamedSummary {
    pub name: &'static str,
    pub table: SummaryTable,
}

impl NamedSummary {
    fn new(name: &'static str, title: &str, table: SummaryTable) -> Self {
        NamedSummary {
            name,
            table: table.with_title(title),
        }
    }
}

pub fn per_minute(counts: &SummaryTable, minutes: u32) -> SummaryTable {
    let minutes = f64::from(minutes);
    counts.map(|v| v / minutes)
}

/// Spikes that were not part of any burst.
pub fn spontaneous_count(
    spike_counts: &SummaryTable,
    burst_spike_counts: &SummaryTable,
) -> SummaryTable {
    spike_counts.zip_with(burst_spike_counts, |spikes, in_bursts| spikes - in_bursts)
}

/// Percentage of spontaneous spikes; 0 where the channel has no spikes.
pub fn spontaneous_ratio(spontaneous: &SummaryTable, spike_counts: &SummaryTable) -> SummaryTable {
    spontaneous.zip_with(spike_counts, |spont, spikes| {
        let ratio = spont / spikes * 100.0;
        if spikes == 0.0 || ratio.is_nan() { 0.0 } else { ratio }
    })
}

/// `std / mean`; undefined where either is undefined or the mean is 0.
pub fn coefficient_of_variation(std: &SummaryTable, mean: &SummaryTable) -> SummaryTable {
    std.zip_with(mean, |s, m| if m == 0.0 { f64::NAN } else { s / m })
}

/// Builds every summary in output order.
pub fn build_summaries(
    tables: &LabeledTables,
    domain: &LabelDomain,
    minutes: u32,
) -> Vec<NamedSummary> {
    let mut out = Vec::with_capacity(16);
    out.extend(channel_summaries(tables, domain, minutes));
    out.extend(network_summaries(tables, domain, minutes));
    out
}

fn channel_summaries(
    tables: &LabeledTables,
    domain: &LabelDomain,
    minutes: u32,
) -> Vec<NamedSummary> {
    let keys = GroupKeys::ChannelWell;
    let bursts = &tables.bursts;

    let spike_counts = count(&tables.spikes, keys, domain);
    let burst_counts = count(bursts, keys, domain);
    // A channel without bursts has no spikes inside bursts.
    let burst_spike_counts = sum(bursts, keys, ValueColumn::SpikeCount, domain).fill_undefined(0.0);
    let spont = spontaneous_count(&spike_counts, &burst_spike_counts);
    let spont_ratio = spontaneous_ratio(&spont, &spike_counts);
    let spike_counts_per_min = per_minute(&spike_counts, minutes);
    let burst_counts_per_min = per_minute(&burst_counts, minutes);

    vec![
        NamedSummary::new("spike_counts", "Spike Count per Well and Channel", spike_counts),
        NamedSummary::new(
            "spike_counts_per_min",
            "Spike Counts per min [1/min] per Well and Channel",
            spike_counts_per_min,
        ),
        NamedSummary::new("burst_counts", "Burst Counts per Well and Channel", burst_counts),
        NamedSummary::new(
            "burst_counts_per_min",
            "Burst Counts per min [1/min] per Well and Channel",
            burst_counts_per_min,
        ),
        NamedSummary::new(
            "spont_spike_counts",
            "Spontaneous Spike Counts per Well and Channel",
            spont,
        ),
        NamedSummary::new(
            "spont_spike_ratio",
            "Spontaneous Spike Ratio [%] per Well and Channel",
            spont_ratio,
        ),
        NamedSummary::new(
            "avg_burst_duration",
            "Burst Average Duration [µs] per Well and Channel",
            mean_of(bursts, keys, ValueColumn::Duration, domain),
        ),
        NamedSummary::new(
            "avg_spike_freq_per_burst",
            "Burst Average Spike Frequency [Hz] per Well and Channel",
            mean_of(bursts, keys, ValueColumn::SpikeFrequency, domain),
        ),
        NamedSummary::new(
            "avg_spike_count_per_burst",
            "Burst Average Spike Count per Well and Channel",
            mean_of(bursts, keys, ValueColumn::SpikeCount, domain),
        ),
        NamedSummary::new(
            "avg_inter_burst_interval",
            "Average Inter-Burst Interval [µs] per Well and Channel",
            mean_of(bursts, keys, ValueColumn::InterBurstInterval, domain),
        ),
    ]
}

fn network_summaries(
    tables: &LabeledTables,
    domain: &LabelDomain,
    minutes: u32,
) -> Vec<NamedSummary> {
    let keys = GroupKeys::Well;
    let net = &tables.net_bursts;

    let avg_ibi = mean_of(net, keys, ValueColumn::InterBurstInterval, domain);
    let std_ibi = std_of(net, keys, ValueColumn::InterBurstInterval, domain);
    let ibi_cv = coefficient_of_variation(&std_ibi, &avg_ibi);

    vec![
        NamedSummary::new(
            "net_bursts_count_per_min",
            "Network Burst Count per Well",
            per_minute(&count(net, keys, domain), minutes),
        ),
        NamedSummary::new(
            "net_bursts_avg_duration",
            "Network Burst Average Duration [µs] per Well",
            mean_of(net, keys, ValueColumn::Duration, domain),
        ),
        NamedSummary::new(
            "net_bursts_spike_count_per_min",
            "Network Burst Average Spike Count per Well",
            mean_of(net, keys, ValueColumn::SpikeCount, domain),
        ),
        NamedSummary::new(
            "net_bursts_spike_freq",
            "Network Burst Average Spike Frequency [Hz] per Well",
            mean_of(net, keys, ValueColumn::SpikeFrequency, domain),
        ),
        NamedSummary::new(
            "net_bursts_avg_ibi",
            "Network Average Inter-Burst Interval [µs] per Well",
            avg_ibi,
        ),
        NamedSummary::new(
            "net_bursts_ibi_coef_of_var",
            "Network Inter-Burst Interval Coefficient of Variation per Well",
            ibi_cv,
        ),
    ]
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage4_metrics.rs"]
mod tests;
