use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::error::PipelineError;
use crate::input::open::open_maybe_gz;
use crate::model::columns::{
    CHANNEL_LABEL, DROPPED, DURATION, SPIKE_COUNT, SPIKE_FREQUENCY, START_TIMESTAMP, WELL_LABEL,
};
use crate::model::events::{BurstRecord, SpikeRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Spikes,
    Bursts,
    NetBursts,
}

impl TableKind {
    pub fn name(self) -> &'static str {
        match self {
            TableKind::Spikes => "spikes",
            TableKind::Bursts => "bursts",
            TableKind::NetBursts => "net_bursts",
        }
    }

    pub fn required_columns(self) -> &'static [&'static str] {
        match self {
            TableKind::Spikes => &[CHANNEL_LABEL, WELL_LABEL],
            TableKind::Bursts => &[
                CHANNEL_LABEL,
                WELL_LABEL,
                START_TIMESTAMP,
                DURATION,
                SPIKE_COUNT,
                SPIKE_FREQUENCY,
            ],
            TableKind::NetBursts => &[
                WELL_LABEL,
                START_TIMESTAMP,
                DURATION,
                SPIKE_COUNT,
                SPIKE_FREQUENCY,
            ],
        }
    }
}

pub fn load_spikes(path: &Path) -> Result<Vec<SpikeRecord>, PipelineError> {
    parse_spikes(open_maybe_gz(path)?)
}

pub fn load_bursts(path: &Path) -> Result<Vec<BurstRecord>, PipelineError> {
    parse_bursts(open_maybe_gz(path)?, TableKind::Bursts)
}

pub fn load_net_bursts(path: &Path) -> Result<Vec<BurstRecord>, PipelineError> {
    parse_bursts(open_maybe_gz(path)?, TableKind::NetBursts)
}

pub fn parse_spikes<R: Read>(reader: R) -> Result<Vec<SpikeRecord>, PipelineError> {
    let kind = TableKind::Spikes;
    let mut reader = csv_reader(reader);
    let columns = ColumnIndex::resolve(&mut reader, kind)?;
    let channel = columns.require(CHANNEL_LABEL)?;
    let well = columns.require(WELL_LABEL)?;

    let mut out = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(|source| PipelineError::Csv {
            table: kind.name(),
            source,
        })?;
        let cells = Cells::new(&record, kind, i + 1);
        out.push(SpikeRecord {
            channel: cells.required_text(channel, CHANNEL_LABEL)?,
            well: cells.text(well),
        });
    }
    Ok(out)
}

pub fn parse_bursts<R: Read>(reader: R, kind: TableKind) -> Result<Vec<BurstRecord>, PipelineError> {
    let mut reader = csv_reader(reader);
    let columns = ColumnIndex::resolve(&mut reader, kind)?;
    let channel = columns.find(CHANNEL_LABEL);
    let well = columns.require(WELL_LABEL)?;
    let start = columns.require(START_TIMESTAMP)?;
    let duration = columns.require(DURATION)?;
    let spike_count = columns.require(SPIKE_COUNT)?;
    let spike_frequency = columns.require(SPIKE_FREQUENCY)?;

    let mut out = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(|source| PipelineError::Csv {
            table: kind.name(),
            source,
        })?;
        let cells = Cells::new(&record, kind, i + 1);
        let spike_count_raw = cells.integer(spike_count, SPIKE_COUNT)?;
        let start_timestamp = cells.integer(start, START_TIMESTAMP)?;
        let duration_us = cells.integer(duration, DURATION)?;
        // The burst end must stay representable.
        if start_timestamp.checked_add(duration_us).is_none() {
            return Err(cells.invalid(duration, DURATION));
        }
        out.push(BurstRecord {
            channel: match kind {
                TableKind::NetBursts => None,
                _ => channel.and_then(|idx| cells.optional_text(idx)),
            },
            well: cells.text(well),
            start_timestamp,
            duration: duration_us,
            spike_count: u32::try_from(spike_count_raw)
                .map_err(|_| cells.invalid(spike_count, SPIKE_COUNT))?,
            spike_frequency: cells.float(spike_frequency, SPIKE_FREQUENCY)?,
        });
    }
    Ok(out)
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader)
}

struct ColumnIndex {
    headers: StringRecord,
    kind: TableKind,
}

impl ColumnIndex {
    /// Checks the required and metadata columns. The metadata columns are
    /// dropped here: their presence is enforced but they are never read.
    fn resolve<R: Read>(reader: &mut csv::Reader<R>, kind: TableKind) -> Result<Self, PipelineError> {
        let headers = reader
            .headers()
            .map_err(|source| PipelineError::Csv {
                table: kind.name(),
                source,
            })?
            .clone();
        let index = ColumnIndex { headers, kind };
        for &column in kind.required_columns().iter().chain(DROPPED.iter()) {
            index.require(column)?;
        }
        Ok(index)
    }

    fn find(&self, column: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}') == column)
    }

    fn require(&self, column: &'static str) -> Result<usize, PipelineError> {
        self.find(column).ok_or(PipelineError::MissingColumn {
            table: self.kind.name(),
            column,
        })
    }
}

struct Cells<'r> {
    record: &'r StringRecord,
    kind: TableKind,
    row: usize,
}

impl<'r> Cells<'r> {
    fn new(record: &'r StringRecord, kind: TableKind, row: usize) -> Self {
        Cells { record, kind, row }
    }

    fn raw(&self, idx: usize) -> &'r str {
        self.record.get(idx).unwrap_or("")
    }

    fn text(&self, idx: usize) -> String {
        self.raw(idx).to_string()
    }

    /// Blank cells are missing labels.
    fn optional_text(&self, idx: usize) -> Option<String> {
        let raw = self.raw(idx);
        (!raw.is_empty()).then(|| raw.to_string())
    }

    fn required_text(&self, idx: usize, column: &'static str) -> Result<String, PipelineError> {
        self.optional_text(idx).ok_or_else(|| self.invalid(idx, column))
    }

    fn invalid(&self, idx: usize, column: &'static str) -> PipelineError {
        PipelineError::InvalidValue {
            table: self.kind.name(),
            row: self.row,
            column,
            value: self.raw(idx).to_string(),
        }
    }

    /// Non-negative integer; exports occasionally write `1200.0`.
    fn integer(&self, idx: usize, column: &'static str) -> Result<i64, PipelineError> {
        let raw = self.raw(idx);
        let value = match raw.parse::<i64>() {
            Ok(v) => v,
            Err(_) => match raw.parse::<f64>() {
                Ok(v) if v.is_finite() && v.fract() == 0.0 => v as i64,
                _ => return Err(self.invalid(idx, column)),
            },
        };
        if value < 0 {
            return Err(self.invalid(idx, column));
        }
        Ok(value)
    }

    fn float(&self, idx: usize, column: &'static str) -> Result<f64, PipelineError> {
        let raw = self.raw(idx);
        if raw.is_empty() {
            return Ok(f64::NAN);
        }
        match raw.parse::<f64>() {
            Ok(v) if v.is_nan() || v >= 0.0 => Ok(v),
            _ => Err(self.invalid(idx, column)),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tables.rs"]
mod tests;
