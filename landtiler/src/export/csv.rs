//! CSV grid persistence.
//!
//! One line per raster row, north first, integers separated by commas, no
//! header.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use tracing::debug;

use super::error::ExportError;
use crate::raster::{ClassCode, RasterBuffer};

/// Writes `raster` as a headerless comma-separated grid.
pub fn write_csv<W: Write>(raster: &RasterBuffer, out: W) -> Result<(), ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(out);

    for row in raster.rows() {
        writer.write_record(row.iter().map(ClassCode::to_string))?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes `raster` to a CSV file at `path`.
pub fn save_csv(raster: &RasterBuffer, path: &Path) -> Result<(), ExportError> {
    let file = File::create(path)?;
    write_csv(raster, BufWriter::new(file))?;
    debug!(path = %path.display(), width = raster.width(), height = raster.height(), "Saved CSV");
    Ok(())
}

/// Parses a headerless comma-separated grid.
///
/// Blank lines are ignored and whitespace around values is trimmed. Every
/// row must have as many values as the first one.
pub fn read_csv<R: Read>(input: R) -> Result<RasterBuffer, ExportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let mut width = None;
    let mut height = 0;
    let mut cells = Vec::new();

    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let expected = *width.get_or_insert(record.len());
        if record.len() != expected {
            return Err(ExportError::RaggedRow {
                row,
                expected,
                found: record.len(),
            });
        }

        for (col, value) in record.iter().enumerate() {
            let code = value.parse::<ClassCode>().map_err(|_| ExportError::Parse {
                row,
                col,
                value: value.to_string(),
            })?;
            cells.push(code);
        }
        height += 1;
    }

    let width = width.unwrap_or(0);
    RasterBuffer::from_cells(width, height, cells).ok_or(ExportError::UnrenderableSize {
        width,
        height,
    })
}

/// Reads a CSV grid from `path`.
pub fn load_csv(path: &Path) -> Result<RasterBuffer, ExportError> {
    let file = File::open(path)?;
    read_csv(BufReader::new(file))
}
