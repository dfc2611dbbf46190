//! Export helpers for CSV and JSON flight logs.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use lander_descent::{DescentReport, LandingOutcome, Telemetry};
use serde::Serialize;
use thiserror::Error;

/// Errors raised while writing flight logs.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write flight log: {0}")]
    Io(#[from] io::Error),
    #[error("failed to write telemetry CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to encode flight summary: {0}")]
    Json(#[from] serde_json::Error),
}

/// CSV row emitted for each turn.
#[derive(Debug, Clone, Serialize)]
struct Record {
    turn: usize,
    elapsed_s: f64,
    altitude_miles: f64,
    altitude_feet: f64,
    speed_mph: f64,
    fuel_lbs: f64,
}

impl From<&Telemetry> for Record {
    fn from(t: &Telemetry) -> Self {
        Self {
            turn: t.turn,
            elapsed_s: t.elapsed_s,
            altitude_miles: t.altitude_miles,
            altitude_feet: t.altitude_feet,
            speed_mph: t.speed_mph,
            fuel_lbs: t.fuel_lbs,
        }
    }
}

/// JSON document written next to the telemetry CSV.
#[derive(Debug, Clone, Serialize)]
pub struct FlightSummary<'a> {
    pub generated_at: DateTime<Utc>,
    pub turns: usize,
    pub fuel_exhausted_at_s: Option<f64>,
    pub outcome: &'a LandingOutcome,
}

impl<'a> FlightSummary<'a> {
    pub fn new(report: &'a DescentReport, generated_at: DateTime<Utc>) -> Self {
        Self {
            generated_at,
            turns: report.telemetry.len(),
            fuel_exhausted_at_s: report.fuel_exhausted_at_s,
            outcome: &report.outcome,
        }
    }
}

/// Create a buffered file writer, creating parent directories as needed.
pub fn writer_for_path(path: &Path) -> io::Result<BufWriter<File>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(BufWriter::new(File::create(path)?))
}

/// Write one CSV row per turn, with a header.
pub fn write_telemetry<W: Write>(writer: W, telemetry: &[Telemetry]) -> Result<(), ExportError> {
    let mut csv = csv::Writer::from_writer(writer);
    for snapshot in telemetry {
        csv.serialize(Record::from(snapshot))?;
    }
    csv.flush()?;
    Ok(())
}

/// Write the pretty-printed JSON summary of a finished descent.
pub fn write_summary<W: Write>(
    mut writer: W,
    summary: &FlightSummary<'_>,
) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(&mut writer, summary)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Path of the JSON summary that accompanies a telemetry CSV.
pub fn summary_path(csv_path: &Path) -> PathBuf {
    if csv_path.extension().map(|ext| ext == "json").unwrap_or(false) {
        csv_path.with_extension("summary.json")
    } else {
        csv_path.with_extension("json")
    }
}

/// Write `<path>` (CSV) and its JSON sibling for `report`. Returns the summary path.
pub fn write_flight_log(
    path: &Path,
    report: &DescentReport,
    generated_at: DateTime<Utc>,
) -> Result<PathBuf, ExportError> {
    write_telemetry(writer_for_path(path)?, &report.telemetry)?;
    let json_path = summary_path(path);
    write_summary(
        writer_for_path(&json_path)?,
        &FlightSummary::new(report, generated_at),
    )?;
    Ok(json_path)
}
