use super::*;
use crate::model::events::{BurstRecord, TimedBurst};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn spike(channel: &str, well: &str) -> SpikeRecord {
    SpikeRecord {
        channel: channel.to_string(),
        well: well.to_string(),
    }
}

fn burst(channel: Option<&str>, well: &str, duration: i64, ibi: Option<i64>) -> TimedBurst {
    TimedBurst {
        burst: BurstRecord {
            channel: channel.map(str::to_string),
            well: well.to_string(),
            start_timestamp: 0,
            duration,
            spike_count: 2,
            spike_frequency: 10.0,
        },
        end_timestamp: duration,
        inter_burst_interval: ibi,
    }
}

#[test]
fn test_domain_channels_in_first_appearance_order() {
    let spikes = vec![spike("21", "A_W1"), spike("11", "A_W1"), spike("21", "B_W2")];
    let domain = LabelDomain::from_spikes(&spikes, strings(&["A_W1", "B_W2"]));
    assert_eq!(domain.channels, strings(&["21", "11"]));
}

#[test]
fn test_expand_to_domain_fills_and_orders() {
    let mut observed = HashMap::new();
    observed.insert("b", 2.0);
    observed.insert("z", 9.0);
    let out = expand_to_domain(&observed, ["a", "b", "c"], 0.0);
    assert_eq!(out, vec![0.0, 2.0, 0.0]);
}

#[test]
fn test_count_includes_declared_but_empty_wells() {
    let spikes = vec![spike("11", "A_W1"), spike("11", "A_W1"), spike("11", "A_W1")];
    let domain = LabelDomain::from_spikes(&spikes, strings(&["A_W1", "A_W2"]));
    let counts = count(&spikes, GroupKeys::ChannelWell, &domain);
    assert_eq!(counts.values, vec![vec![3.0, 0.0]]);
    assert_eq!(counts.column_labels, strings(&["A_W1", "A_W2"]));
}

#[test]
fn test_rows_outside_domain_are_ignored() {
    let spikes = vec![spike("11", "A_W1"), spike("11", "W9"), spike("99", "A_W1")];
    let domain = LabelDomain {
        channels: strings(&["11"]),
        wells: strings(&["A_W1"]),
    };
    let counts = count(&spikes, GroupKeys::ChannelWell, &domain);
    assert_eq!(counts.values, vec![vec![1.0]]);
}

#[test]
fn test_mean_missing_is_nan_not_zero() {
    let bursts = vec![burst(Some("11"), "A_W1", 100, None), burst(Some("11"), "A_W1", 50, Some(200))];
    let domain = LabelDomain {
        channels: strings(&["11", "12"]),
        wells: strings(&["A_W1", "A_W2"]),
    };
    let avg = mean_of(&bursts, GroupKeys::ChannelWell, ValueColumn::Duration, &domain);
    assert_eq!(avg.get("11", "A_W1"), Some(75.0));
    assert!(avg.get("11", "A_W2").unwrap().is_nan());
    assert!(avg.get("12", "A_W1").unwrap().is_nan());

    let ibi = mean_of(&bursts, GroupKeys::ChannelWell, ValueColumn::InterBurstInterval, &domain);
    assert_eq!(ibi.get("11", "A_W1"), Some(200.0));
}

#[test]
fn test_sum_missing_is_nan_until_filled() {
    let bursts = vec![burst(Some("11"), "A_W1", 100, None)];
    let domain = LabelDomain {
        channels: strings(&["11"]),
        wells: strings(&["A_W1", "A_W2"]),
    };
    let total = sum(&bursts, GroupKeys::ChannelWell, ValueColumn::SpikeCount, &domain);
    assert_eq!(total.values[0][0], 2.0);
    assert!(total.values[0][1].is_nan());
    assert_eq!(total.fill_undefined(0.0).values, vec![vec![2.0, 0.0]]);
}

#[test]
fn test_well_grouping_uses_full_well_domain() {
    let net = vec![burst(None, "A_W1", 10, None), burst(None, "A_W1", 30, Some(5))];
    let domain = LabelDomain {
        channels: Vec::new(),
        wells: strings(&["A_W1", "B_W2"]),
    };
    let n = count(&net, GroupKeys::Well, &domain);
    assert_eq!(n.row_labels, strings(&["A_W1", "B_W2"]));
    assert_eq!(n.well_value("A_W1"), Some(2.0));
    assert_eq!(n.well_value("B_W2"), Some(0.0));
    let d = mean_of(&net, GroupKeys::Well, ValueColumn::Duration, &domain);
    assert_eq!(d.well_value("A_W1"), Some(20.0));
    assert!(d.well_value("B_W2").unwrap().is_nan());
}

#[test]
fn test_channel_grouping_skips_rows_without_channel() {
    let net = vec![burst(None, "A_W1", 10, None)];
    let domain = LabelDomain {
        channels: strings(&["11"]),
        wells: strings(&["A_W1"]),
    };
    assert_eq!(count(&net, GroupKeys::ChannelWell, &domain).values, vec![vec![0.0]]);
}

#[test]
fn test_sample_std() {
    assert!(sample_std(&[]).is_nan());
    assert!(sample_std(&[4.0]).is_nan());
    assert_eq!(sample_std(&[2.0, 4.0]), 2.0f64.sqrt());
    let std = std_of(
        &[burst(None, "A_W1", 0, Some(100)), burst(None, "A_W1", 0, Some(300))],
        GroupKeys::Well,
        ValueColumn::InterBurstInterval,
        &LabelDomain {
            channels: Vec::new(),
            wells: strings(&["A_W1"]),
        },
    );
    assert_eq!(std.well_value("A_W1"), Some(20000.0f64.sqrt()));
}
