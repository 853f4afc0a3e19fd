use super::*;
use crate::input::conditions::ConditionMap;
use crate::model::events::{BurstRecord, SpikeRecord};
use crate::pipeline::stage1_timing::{TrainKey, derive_timing};
use crate::pipeline::stage2_labels::relabel_tables;

fn spike(channel: &str, well: &str) -> SpikeRecord {
    SpikeRecord {
        channel: channel.to_string(),
        well: well.to_string(),
    }
}

fn burst(channel: Option<&str>, well: &str, start: i64, duration: i64, spikes: u32) -> BurstRecord {
    BurstRecord {
        channel: channel.map(str::to_string),
        well: well.to_string(),
        start_timestamp: start,
        duration,
        spike_count: spikes,
        spike_frequency: 25.0,
    }
}

fn run(
    conditions: &str,
    spikes: &[SpikeRecord],
    bursts: &[BurstRecord],
    net: &[BurstRecord],
    minutes: u32,
) -> Vec<NamedSummary> {
    let map = ConditionMap::parse(conditions).unwrap();
    let labeled = relabel_tables(
        spikes,
        &derive_timing(bursts, TrainKey::Channel),
        &derive_timing(net, TrainKey::Well),
        &map,
    );
    let domain = LabelDomain::from_spikes(&labeled.spikes, map.condition_labels());
    build_summaries(&labeled, &domain, minutes)
}

fn table<'a>(summaries: &'a [NamedSummary], name: &str) -> &'a SummaryTable {
    &summaries
        .iter()
        .find(|s| s.name == name)
        .unwrap_or_else(|| panic!("missing summary {name}"))
        .table
}

fn plate() -> Vec<NamedSummary> {
    let spikes = vec![
        spike("11", "W1"),
        spike("11", "W1"),
        spike("11", "W1"),
        spike("11", "W1"),
        spike("12", "W1"),
        spike("21", "W2"),
    ];
    let bursts = vec![
        burst(Some("11"), "W1", 0, 100, 2),
        burst(Some("11"), "W1", 300, 50, 1),
    ];
    let net = vec![
        burst(None, "W1", 0, 100, 10),
        burst(None, "W1", 300, 100, 20),
        burst(None, "W1", 1000, 100, 30),
    ];
    run("{'A': ['W1'], 'B': ['W2', 'W3']}", &spikes, &bursts, &net, 2)
}

#[test]
fn test_summary_names_in_output_order() {
    let names: Vec<&str> = plate().iter().map(|s| s.name).collect();
    assert_eq!(
        names,
        vec![
            "spike_counts",
            "spike_counts_per_min",
            "burst_counts",
            "burst_counts_per_min",
            "spont_spike_counts",
            "spont_spike_ratio",
            "avg_burst_duration",
            "avg_spike_freq_per_burst",
            "avg_spike_count_per_burst",
            "avg_inter_burst_interval",
            "net_bursts_count_per_min",
            "net_bursts_avg_duration",
            "net_bursts_spike_count_per_min",
            "net_bursts_spike_freq",
            "net_bursts_avg_ibi",
            "net_bursts_ibi_coef_of_var",
        ]
    );
}

#[test]
fn test_single_condition_spike_count() {
    let spikes = vec![spike("11", "W1"), spike("11", "W1"), spike("11", "W1")];
    let out = run("{'A': ['W1']}", &spikes, &[], &[], 5);
    let counts = table(&out, "spike_counts");
    assert_eq!(counts.column_labels, vec!["A_W1"]);
    assert_eq!(counts.values, vec![vec![3.0]]);
    assert_eq!(counts.title, "Spike Count per Well and Channel");
}

#[test]
fn test_counts_cover_every_declared_label() {
    let out = plate();
    let counts = table(&out, "spike_counts");
    assert_eq!(counts.row_labels, vec!["11", "12", "21"]);
    assert_eq!(counts.column_labels, vec!["A_W1", "B_W2", "B_W3"]);
    assert_eq!(counts.get("11", "A_W1"), Some(4.0));
    assert_eq!(counts.get("21", "B_W2"), Some(1.0));
    assert_eq!(counts.get("21", "B_W3"), Some(0.0));
    for row in &counts.values {
        assert!(row.iter().all(|&v| v >= 0.0 && v.fract() == 0.0));
    }
    assert_eq!(table(&out, "spike_counts_per_min").get("11", "A_W1"), Some(2.0));
    assert_eq!(table(&out, "burst_counts").get("11", "A_W1"), Some(2.0));
    assert_eq!(table(&out, "burst_counts").get("12", "A_W1"), Some(0.0));
}

#[test]
fn test_spontaneous_plus_burst_spikes_equals_spikes() {
    let out = plate();
    let spikes = table(&out, "spike_counts");
    let spont = table(&out, "spont_spike_counts");
    assert_eq!(spont.get("11", "A_W1"), Some(1.0));
    assert_eq!(spont.get("12", "A_W1"), Some(1.0));
    assert_eq!(spont.get("21", "B_W3"), Some(0.0));
    for (r, row) in spont.values.iter().enumerate() {
        for (c, v) in row.iter().enumerate() {
            assert!(!v.is_nan());
            assert!(*v <= spikes.values[r][c]);
        }
    }
}

#[test]
fn test_spontaneous_ratio_bounded_and_never_nan() {
    let out = plate();
    let ratio = table(&out, "spont_spike_ratio");
    assert_eq!(ratio.get("11", "A_W1"), Some(25.0));
    assert_eq!(ratio.get("12", "A_W1"), Some(100.0));
    assert_eq!(ratio.get("11", "B_W2"), Some(0.0));
    for row in &ratio.values {
        assert!(row.iter().all(|&v| (0.0..=100.0).contains(&v)));
    }
}

#[test]
fn test_spontaneous_ratio_zero_when_no_spikes() {
    let wells = vec!["A_W1".to_string()];
    let channels = vec!["11".to_string()];
    let spikes = SummaryTable::channel_by_well(&channels, &wells, vec![vec![0.0]]);
    let spont = SummaryTable::channel_by_well(&channels, &wells, vec![vec![-2.0]]);
    assert_eq!(spontaneous_ratio(&spont, &spikes).values, vec![vec![0.0]]);
}

#[test]
fn test_burst_means_and_interval() {
    let out = plate();
    assert_eq!(table(&out, "avg_burst_duration").get("11", "A_W1"), Some(75.0));
    assert_eq!(table(&out, "avg_spike_count_per_burst").get("11", "A_W1"), Some(1.5));
    assert_eq!(table(&out, "avg_spike_freq_per_burst").get("11", "A_W1"), Some(25.0));
    assert_eq!(table(&out, "avg_inter_burst_interval").get("11", "A_W1"), Some(200.0));
    assert!(table(&out, "avg_burst_duration").get("12", "A_W1").unwrap().is_nan());
}

#[test]
fn test_network_tables_indexed_by_condition_labels() {
    let out = plate();
    let rate = table(&out, "net_bursts_count_per_min");
    assert_eq!(rate.row_labels, vec!["A_W1", "B_W2", "B_W3"]);
    assert_eq!(rate.well_value("A_W1"), Some(1.5));
    assert_eq!(rate.well_value("B_W3"), Some(0.0));

    assert_eq!(table(&out, "net_bursts_avg_duration").well_value("A_W1"), Some(100.0));
    assert_eq!(table(&out, "net_bursts_spike_count_per_min").well_value("A_W1"), Some(20.0));
    assert!(table(&out, "net_bursts_spike_freq").well_value("B_W2").unwrap().is_nan());

    // Intervals 300 - 100 and 1000 - 400.
    assert_eq!(table(&out, "net_bursts_avg_ibi").well_value("A_W1"), Some(400.0));
    let cv = table(&out, "net_bursts_ibi_coef_of_var").well_value("A_W1").unwrap();
    let expected = 80000.0f64.sqrt() / 400.0;
    assert!((cv - expected).abs() < 1e-12);
    assert!(table(&out, "net_bursts_ibi_coef_of_var").well_value("B_W2").unwrap().is_nan());
}

#[test]
fn test_coefficient_of_variation_zero_mean_is_undefined() {
    let wells = vec!["A_W1".to_string(), "A_W2".to_string()];
    let std = SummaryTable::per_well(&wells, vec![1.0, 2.0]);
    let mean = SummaryTable::per_well(&wells, vec![0.0, 4.0]);
    let cv = coefficient_of_variation(&std, &mean);
    assert!(cv.well_value("A_W1").unwrap().is_nan());
    assert_eq!(cv.well_value("A_W2"), Some(0.5));
}
