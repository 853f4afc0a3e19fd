use std::collections::HashMap;
use std::hash::Hash;

use crate::model::events::{Event, SpikeRecord, ValueColumn};
use crate::model::summary::SummaryTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKeys {
    /// One cell per (channel, composite well label).
    ChannelWell,
    /// One cell per composite well label.
    Well,
}

/// The declared label universe every summary is expanded to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelDomain {
    pub channels: Vec<String>,
    pub wells: Vec<String>,
}

impl LabelDomain {
    /// Channels are the distinct spike channels in order of first appearance.
    pub fn from_spikes(spikes: &[SpikeRecord], wells: Vec<String>) -> Self {
        let mut channels: Vec<String> = Vec::new();
        for spike in spikes {
            if !channels.contains(&spike.channel) {
                channels.push(spike.channel.clone());
            }
        }
        LabelDomain { channels, wells }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reducer {
    Count,
    Sum,
    Mean,
    Std,
}

impl Reducer {
    /// Fill for cells with no rows: counts are zero, statistics undefined.
    pub fn missing_fill(self) -> f64 {
        match self {
            Reducer::Count => 0.0,
            Reducer::Sum | Reducer::Mean | Reducer::Std => f64::NAN,
        }
    }

    fn reduce(self, group: &Group) -> f64 {
        match self {
            Reducer::Count => group.rows as f64,
            Reducer::Sum => group.values.iter().sum(),
            Reducer::Mean => mean(&group.values),
            Reducer::Std => sample_std(&group.values),
        }
    }
}

#[derive(Debug, Default)]
struct Group {
    rows: usize,
    values: Vec<f64>,
}

type GroupKey<'a> = (Option<&'a str>, &'a str);

fn collect_groups<'a, E: Event>(
    rows: &'a [E],
    keys: GroupKeys,
    column: Option<ValueColumn>,
) -> HashMap<GroupKey<'a>, Group> {
    let mut groups: HashMap<GroupKey<'a>, Group> = HashMap::new();
    for row in rows {
        let key = match keys {
            GroupKeys::ChannelWell => match row.channel() {
                Some(channel) => (Some(channel), row.well()),
                None => continue,
            },
            GroupKeys::Well => (None, row.well()),
        };
        let group = groups.entry(key).or_default();
        group.rows += 1;
        if let Some(v) = column.and_then(|c| row.value(c)) {
            group.values.push(v);
        }
    }
    groups
}

/// Looks every domain key up in `observed`, using `fill` for absent keys.
/// The result follows domain order exactly.
pub fn expand_to_domain<K, I>(observed: &HashMap<K, f64>, domain: I, fill: f64) -> Vec<f64>
where
    K: Eq + Hash,
    I: IntoIterator<Item = K>,
{
    domain
        .into_iter()
        .map(|key| observed.get(&key).copied().unwrap_or(fill))
        .collect()
}

/// Groups `rows`, reduces each group, and expands the result over `domain`.
pub fn aggregate<E: Event>(
    rows: &[E],
    keys: GroupKeys,
    reducer: Reducer,
    column: Option<ValueColumn>,
    domain: &LabelDomain,
) -> SummaryTable {
    let observed: HashMap<GroupKey<'_>, f64> = collect_groups(rows, keys, column)
        .iter()
        .map(|(key, group)| (*key, reducer.reduce(group)))
        .collect();
    let fill = reducer.missing_fill();
    match keys {
        GroupKeys::ChannelWell => {
            let values = domain
                .channels
                .iter()
                .map(|channel| {
                    let cells = domain
                        .wells
                        .iter()
                        .map(|well| (Some(channel.as_str()), well.as_str()));
                    expand_to_domain(&observed, cells, fill)
                })
                .collect();
            SummaryTable::channel_by_well(&domain.channels, &domain.wells, values)
        }
        GroupKeys::Well => {
            let cells = domain.wells.iter().map(|well| (None, well.as_str()));
            SummaryTable::per_well(&domain.wells, expand_to_domain(&observed, cells, fill))
        }
    }
}

pub fn count<E: Event>(rows: &[E], keys: GroupKeys, domain: &LabelDomain) -> SummaryTable {
    aggregate(rows, keys, Reducer::Count, None, domain)
}

pub fn sum<E: Event>(
    rows: &[E],
    keys: GroupKeys,
    column: ValueColumn,
    domain: &LabelDomain,
) -> SummaryTable {
    aggregate(rows, keys, Reducer::Sum, Some(column), domain)
}

pub fn mean_of<E: Event>(
    rows: &[E],
    keys: GroupKeys,
    column: ValueColumn,
    domain: &LabelDomain,
) -> SummaryTable {
    aggregate(rows, keys, Reducer::Mean, Some(column), domain)
}

pub fn std_of<E: Event>(
    rows: &[E],
    keys: GroupKeys,
    column: ValueColumn,
    domain: &LabelDomain,
) -> SummaryTable {
    aggregate(rows, keys, Reducer::Std, Some(column), domain)
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Standard deviation with the n - 1 denominator; NaN below two values.
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage3_aggregate.rs"]
mod tests;
