//! CSV datasets: step-test records in, simulated responses out
//!
//! # Input format
//!
//! ```csv
//! time [s],input,output
//! 0.0,5.0,20.1
//! 0.5,5.0,20.1
//! ...
//! ```
//!
//! Columns are matched by the first word of their header, case-insensitively, so `time`,
//! `Time [s]` and `TIME (s)` all name the time column. `time` and `output` are required.
//! `input` is optional; its mean is used as the step amplitude when none is given.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use log::{debug, info};

use crate::error::DatasetError;
use crate::signal::StepTestRecord;

fn column_key(header: &str) -> String {
    header
        .split(|c: char| c.is_whitespace() || c == '[' || c == '(')
        .next()
        .unwrap_or("")
        .to_lowercase()
}

fn find_column(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| column_key(h) == name)
}

fn parse_cell(
    row: &csv::StringRecord,
    index: usize,
    row_number: usize,
    column: &'static str,
) -> Result<f64, DatasetError> {
    let value = row.get(index).unwrap_or("");
    value.parse::<f64>().map_err(|_| DatasetError::Parse {
        row: row_number,
        column,
        value: value.to_string(),
    })
}

/// Read a step-test record from headed CSV
///
/// `step_amplitude` overrides the amplitude; without it the mean of the `input` column is
/// used. Rows are numbered from 1 (the first data row) in parse errors.
pub fn read_record<R: Read>(
    reader: R,
    step_amplitude: Option<f64>,
) -> Result<StepTestRecord, DatasetError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let time_col = find_column(&headers, "time").ok_or(DatasetError::MissingColumn("time"))?;
    let output_col =
        find_column(&headers, "output").ok_or(DatasetError::MissingColumn("output"))?;
    let input_col = find_column(&headers, "input");

    let mut time = Vec::new();
    let mut output = Vec::new();
    let mut input = Vec::new();

    for (i, row) in rdr.records().enumerate() {
        let row = row?;
        let row_number = i + 1;
        time.push(parse_cell(&row, time_col, row_number, "time")?);
        output.push(parse_cell(&row, output_col, row_number, "output")?);
        if let Some(col) = input_col {
            input.push(parse_cell(&row, col, row_number, "input")?);
        }
    }

    let amplitude = match step_amplitude {
        Some(amplitude) => amplitude,
        None if !input.is_empty() => input.iter().sum::<f64>() / input.len() as f64,
        None => return Err(DatasetError::MissingStepAmplitude),
    };

    debug!("read {} samples, step amplitude {amplitude}", time.len());
    Ok(StepTestRecord::new(amplitude, time, output)?)
}

/// Load a step-test record from a CSV file
pub fn load_record<P: AsRef<Path>>(
    path: P,
    step_amplitude: Option<f64>,
) -> Result<StepTestRecord, DatasetError> {
    let path = path.as_ref();
    let record = read_record(File::open(path)?, step_amplitude)?;
    info!("loaded {} samples from {}", record.len(), path.display());
    Ok(record)
}

/// Write labeled responses sharing one time axis as CSV
///
/// ```csv
/// time [s],measured,model
/// 0,0,0
/// ...
/// ```
///
/// Columns shorter than `time` leave their trailing cells empty.
pub fn write_responses<W: Write>(
    writer: W,
    time: &[f64],
    columns: &[(&str, &[f64])],
) -> Result<(), DatasetError> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec!["time [s]".to_string()];
    header.extend(columns.iter().map(|(label, _)| label.to_string()));
    wtr.write_record(&header)?;

    for (i, t) in time.iter().enumerate() {
        let mut record = vec![t.to_string()];
        record.extend(
            columns
                .iter()
                .map(|(_, values)| values.get(i).map(|v| v.to_string()).unwrap_or_default()),
        );
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write labeled responses to a CSV file
pub fn save_responses<P: AsRef<Path>>(
    path: P,
    time: &[f64],
    columns: &[(&str, &[f64])],
) -> Result<(), DatasetError> {
    write_responses(File::create(path)?, time, columns)
}
