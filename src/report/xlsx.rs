use std::path::Path;

use rust_xlsxwriter::{DocProperties, ExcelDateTime, Format, FormatBorder, Workbook, XlsxError};

use crate::error::PipelineError;
use crate::model::summary::{SummaryShape, SummaryTable};

/// Lays a summary out the way a pandas `to_excel` of the same frame does:
/// labels down column A, one header row, undefined cells left blank.
///
/// The creation date is fixed so identical tables give identical files.
pub fn render_workbook(table: &SummaryTable) -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let created = ExcelDateTime::from_ymd(2000, 1, 1)?;
    workbook.set_properties(&DocProperties::new().set_creation_datetime(&created));
    let header = Format::new().set_bold().set_border(FormatBorder::Thin);
    let sheet = workbook.add_worksheet();

    match table.shape {
        SummaryShape::ChannelByWell => {
            sheet.write_string_with_format(0, 0, &table.title, &header)?;
            for (c, label) in table.column_labels.iter().enumerate() {
                sheet.write_string_with_format(0, col_num(c + 1), label, &header)?;
            }
        }
        SummaryShape::PerWell => {
            sheet.write_string_with_format(0, 1, &table.title, &header)?;
        }
    }

    for (r, (label, values)) in table.row_labels.iter().zip(&table.values).enumerate() {
        let row = row_num(r + 1);
        sheet.write_string_with_format(row, 0, label, &header)?;
        for (c, &v) in values.iter().enumerate() {
            if v.is_finite() {
                sheet.write_number(row, col_num(c + 1), v)?;
            }
        }
    }

    Ok(workbook)
}

/// Saves to `path`, replacing any existing file.
pub fn save_workbook(workbook: &mut Workbook, path: &Path) -> Result<(), PipelineError> {
    workbook.save(path).map_err(|source| PipelineError::Xlsx {
        path: path.to_path_buf(),
        source,
    })
}

// Out-of-range indices saturate; the writer rejects them against Excel's limits.
fn row_num(idx: usize) -> u32 {
    u32::try_from(idx).unwrap_or(u32::MAX)
}

fn col_num(idx: usize) -> u16 {
    u16::try_from(idx).unwrap_or(u16::MAX)
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/xlsx.rs"]
mod tests;
