use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryShape {
    /// Rows are channel labels, columns are `condition_well` composite labels.
    ChannelByWell,
    /// Rows are composite labels, one value column.
    PerWell,
}

/// Dense, fully expanded summary matrix. Undefined cells hold NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryTable {
    pub title: String,
    pub shape: SummaryShape,
    pub row_labels: Vec<String>,
    pub column_labels: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl SummaryTable {
    pub fn channel_by_well(channels: &[String], wells: &[String], values: Vec<Vec<f64>>) -> Self {
        debug_assert_eq!(values.len(), channels.len());
        SummaryTable {
            title: String::new(),
            shape: SummaryShape::ChannelByWell,
            row_labels: channels.to_vec(),
            column_labels: wells.to_vec(),
            values,
        }
    }

    pub fn per_well(wells: &[String], values: Vec<f64>) -> Self {
        SummaryTable {
            title: String::new(),
            shape: SummaryShape::PerWell,
            row_labels: wells.to_vec(),
            column_labels: Vec::new(),
            values: values.into_iter().map(|v| vec![v]).collect(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn n_rows(&self) -> usize {
        self.row_labels.len()
    }

    pub fn n_cols(&self) -> usize {
        match self.shape {
            SummaryShape::ChannelByWell => self.column_labels.len(),
            SummaryShape::PerWell => 1,
        }
    }

    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        SummaryTable {
            values: self
                .values
                .iter()
                .map(|row| row.iter().map(|&v| f(v)).collect())
                .collect(),
            ..self.clone()
        }
    }

    /// Elementwise combination; both tables must be expanded over the same domain.
    pub fn zip_with(&self, other: &SummaryTable, f: impl Fn(f64, f64) -> f64) -> Self {
        debug_assert_eq!(self.row_labels, other.row_labels);
        debug_assert_eq!(self.column_labels, other.column_labels);
        SummaryTable {
            values: self
                .values
                .iter()
                .zip(&other.values)
                .map(|(a, b)| a.iter().zip(b).map(|(&x, &y)| f(x, y)).collect())
                .collect(),
            ..self.clone()
        }
    }

    pub fn fill_undefined(&self, fill: f64) -> Self {
        self.map(|v| if v.is_nan() { fill } else { v })
    }
}

#[cfg(test)]
impl SummaryTable {
    pub fn get(&self, row: &str, column: &str) -> Option<f64> {
        let r = self.row_labels.iter().position(|l| l == row)?;
        let c = self.column_labels.iter().position(|l| l == column)?;
        Some(self.values[r][c])
    }

    /// Value of a well in a [`SummaryShape::PerWell`] table.
    pub fn well_value(&self, well: &str) -> Option<f64> {
        let r = self.row_labels.iter().position(|l| l == well)?;
        self.values[r].first().copied()
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/summary.rs"]
mod tests;
