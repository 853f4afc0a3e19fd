use crate::model::events::{BurstRecord, TimedBurst};

/// Grouping key that decides whether two adjacent rows belong to the same train.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainKey {
    /// Bursts: consecutive rows on the same channel.
    Channel,
    /// Network bursts: consecutive rows in the same well.
    Well,
}

impl TrainKey {
    fn same_train(self, a: &BurstRecord, b: &BurstRecord) -> bool {
        match self {
            TrainKey::Channel => a.channel.is_some() && a.channel == b.channel,
            TrainKey::Well => a.well == b.well,
        }
    }
}

/// Adds `end = start + duration` and the interval to the previous burst.
///
/// Precondition: rows of one group are contiguous and ordered by start
/// timestamp, as the MEA export writes them. Only the immediately preceding
/// row is compared, so the first row of every run of equal keys has no
/// interval. Tables with fewer than two rows have no intervals at all.
pub fn derive_timing(bursts: &[BurstRecord], key: TrainKey) -> Vec<TimedBurst> {
    let mut out: Vec<TimedBurst> = Vec::with_capacity(bursts.len());
    for (i, burst) in bursts.iter().enumerate() {
        // Loaded rows are checked for overflow; saturate for any others.
        let end_timestamp = burst.start_timestamp.saturating_add(burst.duration);
        let inter_burst_interval = match i.checked_sub(1).map(|p| &out[p]) {
            Some(prev) if key.same_train(&prev.burst, burst) => {
                Some(burst.start_timestamp.saturating_sub(prev.end_timestamp))
            }
            _ => None,
        };
        out.push(TimedBurst {
            burst: burst.clone(),
            end_timestamp,
            inter_burst_interval,
        });
    }
    out
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage1_timing.rs"]
mod tests;
