use crate::input::conditions::{ConditionMap, composite_label};
use crate::model::events::{Event, SpikeRecord, TimedBurst};

#[derive(Debug, Clone)]
pub struct LabeledTables {
    pub spikes: Vec<SpikeRecord>,
    pub bursts: Vec<TimedBurst>,
    pub net_bursts: Vec<TimedBurst>,
}

/// Well label of one row after applying every condition in map order.
///
/// Each condition tests the label as rewritten by the conditions before it,
/// so with overlapping well lists the first matching condition wins, and a
/// later list naming an already prefixed label prefixes it again.
pub fn relabel_well(well: &str, conditions: &ConditionMap) -> String {
    let mut label = well.to_string();
    for group in &conditions.groups {
        if group.wells.iter().any(|w| *w == label) {
            label = composite_label(&group.name, &label);
        }
    }
    label
}

pub fn relabel<E: Event>(rows: &[E], conditions: &ConditionMap) -> Vec<E> {
    rows.iter()
        .map(|row| row.with_well(relabel_well(row.well(), conditions)))
        .collect()
}

pub fn relabel_tables(
    spikes: &[SpikeRecord],
    bursts: &[TimedBurst],
    net_bursts: &[TimedBurst],
    conditions: &ConditionMap,
) -> LabeledTables {
    let labeled = LabeledTables {
        spikes: relabel(spikes, conditions),
        bursts: relabel(bursts, conditions),
        net_bursts: relabel(net_bursts, conditions),
    };
    let domain = conditions.condition_labels();
    for (table, unassigned) in [
        ("spikes", count_unassigned(&labeled.spikes, &domain)),
        ("bursts", count_unassigned(&labeled.bursts, &domain)),
        ("net_bursts", count_unassigned(&labeled.net_bursts, &domain)),
    ] {
        if unassigned > 0 {
            tracing::warn!(
                "{unassigned} {table} rows belong to wells without a condition and are left out of the summaries"
            );
        }
    }
    labeled
}

fn count_unassigned<E: Event>(rows: &[E], domain: &[String]) -> usize {
    rows.iter()
        .filter(|row| !domain.iter().any(|label| label == row.well()))
        .count()
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage2_labels.rs"]
mod tests;
