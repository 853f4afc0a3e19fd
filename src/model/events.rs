#[derive(Debug, Clone, PartialEq)]
pub struct SpikeRecord {
    pub channel: String,
    pub well: String,
}

/// One row of the bursts or network bursts table. Network bursts carry no channel.
#[derive(Debug, Clone, PartialEq)]
pub struct BurstRecord {
    pub channel: Option<String>,
    pub well: String,
    pub start_timestamp: i64,
    pub duration: i64,
    pub spike_count: u32,
    pub spike_frequency: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimedBurst {
    pub burst: BurstRecord,
    pub end_timestamp: i64,
    pub inter_burst_interval: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct EventTables {
    pub spikes: Vec<SpikeRecord>,
    pub bursts: Vec<BurstRecord>,
    pub net_bursts: Vec<BurstRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueColumn {
    Duration,
    SpikeCount,
    SpikeFrequency,
    InterBurstInterval,
}

/// Row access shared by the grouping and relabeling stages.
pub trait Event: Sized {
    fn channel(&self) -> Option<&str>;
    fn well(&self) -> &str;
    /// `None` when the row has no defined value for `column`.
    fn value(&self, column: ValueColumn) -> Option<f64>;
    fn with_well(&self, well: String) -> Self;
}

impl Event for SpikeRecord {
    fn channel(&self) -> Option<&str> {
        Some(&self.channel)
    }

    fn well(&self) -> &str {
        &self.well
    }

    fn value(&self, _column: ValueColumn) -> Option<f64> {
        None
    }

    fn with_well(&self, well: String) -> Self {
        SpikeRecord {
            channel: self.channel.clone(),
            well,
        }
    }
}

impl Event for BurstRecord {
    fn channel(&self) -> Option<&str> {
        self.channel.as_deref()
    }

    fn well(&self) -> &str {
        &self.well
    }

    fn value(&self, column: ValueColumn) -> Option<f64> {
        let v = match column {
            ValueColumn::Duration => self.duration as f64,
            ValueColumn::SpikeCount => self.spike_count as f64,
            ValueColumn::SpikeFrequency => self.spike_frequency,
            ValueColumn::InterBurstInterval => return None,
        };
        (!v.is_nan()).then_some(v)
    }

    fn with_well(&self, well: String) -> Self {
        BurstRecord {
            well,
            ..self.clone()
        }
    }
}

impl Event for TimedBurst {
    fn channel(&self) -> Option<&str> {
        self.burst.channel()
    }

    fn well(&self) -> &str {
        self.burst.well()
    }

    fn value(&self, column: ValueColumn) -> Option<f64> {
        match column {
            ValueColumn::InterBurstInterval => self.inter_burst_interval.map(|v| v as f64),
            other => self.burst.value(other),
        }
    }

    fn with_well(&self, well: String) -> Self {
        TimedBurst {
            burst: self.burst.with_well(well),
            ..self.clone()
        }
    }
}
