//! CSV export for the sizing load table.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use thiserror::Error;

use crate::sizing::LoadLine;

/// Column header for the load table export.
const HEADER: &str = "kind,id,name,wattage_w,quantity,total_w";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot write export file: {0}")]
    Io(#[from] io::Error),
    #[error("cannot encode CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Exports load lines to a CSV file at the given path.
///
/// Writes a header row followed by one row per active load line, in the
/// order of [`crate::sizing::SizingResult::load_lines`]. Produces
/// deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `ExportError` if file creation or writing fails.
pub fn export_csv(lines: &[LoadLine], path: &Path) -> Result<(), ExportError> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(lines, buf)
}

/// Writes load lines as CSV to any writer.
///
/// # Errors
///
/// Returns an `ExportError` if writing fails.
pub fn write_csv(lines: &[LoadLine], writer: impl Write) -> Result<(), ExportError> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(','))?;
    for line in lines {
        wtr.write_record(&[
            line.kind.as_str().to_string(),
            line.id.clone(),
            line.name.clone(),
            format!("{:.1}", line.wattage_w),
            line.quantity.to_string(),
            format!("{:.1}", line.total_w),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sizing::LoadSource;

    fn line(id: &str, name: &str, wattage_w: f64, quantity: u32) -> LoadLine {
        LoadLine {
            kind: LoadSource::Appliance,
            id: id.to_string(),
            name: name.to_string(),
            wattage_w,
            surge: 1.0,
            quantity,
            total_w: wattage_w * f64::from(quantity),
        }
    }

    fn render(lines: &[LoadLine]) -> String {
        let mut buf = Vec::new();
        write_csv(lines, &mut buf).ok();
        String::from_utf8(buf).unwrap_or_default()
    }

    #[test]
    fn header_matches_schema() {
        let output = render(&[line("laptop", "Laptop", 65.0, 1)]);
        assert_eq!(
            output.lines().next(),
            Some("kind,id,name,wattage_w,quantity,total_w")
        );
    }

    #[test]
    fn one_row_per_line() {
        let lines: Vec<LoadLine> = (1..=4).map(|q| line("laptop", "Laptop", 65.0, q)).collect();
        assert_eq!(render(&lines).lines().count(), 5);
    }

    #[test]
    fn names_with_quotes_and_commas_are_escaped() {
        let output = render(&[line("tv_43", "LED TV 43\"", 80.0, 2)]);
        let mut rdr = csv::ReaderBuilder::new().from_reader(output.as_bytes());
        let rec = rdr.records().next().and_then(Result::ok);
        assert_eq!(rec.as_ref().map(|r| &r[2]), Some("LED TV 43\""));
        assert_eq!(rec.as_ref().map(|r| &r[5]), Some("160.0"));
        assert_eq!(rec.as_ref().map(|r| &r[0]), Some("appliance"));
    }

    #[test]
    fn deterministic_output() {
        let lines = vec![line("a", "A", 10.0, 1), line("b", "B, large", 20.0, 3)];
        assert_eq!(render(&lines), render(&lines));
    }
}
