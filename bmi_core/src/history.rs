//! CSV-backed history of BMI entries.
//!
//! The backing file holds one row per entry with the columns
//! `Date, Height, Weight, BMI, Status`. Appends carry no header; a full
//! overwrite writes the header first. Rows are kept as raw text because
//! imported rows are stored verbatim.

use crate::{engine, BmiRecord, Error, HistoryRow, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Default number of rows shown in the history table
pub const DEFAULT_RECENT_LIMIT: usize = 50;

/// Default number of rows plotted in the trend chart
pub const DEFAULT_TREND_LIMIT: usize = 20;

/// One point of the BMI trend
#[derive(Clone, Debug, PartialEq)]
pub struct TrendPoint {
    pub date: String,
    pub bmi: f64,
}

/// Outcome of building the trend series
#[derive(Clone, Debug, PartialEq)]
pub enum Trend {
    /// Fewer than two entries in the history
    NotEnoughData,
    /// Oldest first
    Series(Vec<TrendPoint>),
}

/// How imported rows are checked before appending
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ImportMode {
    /// Append every row after the header as-is
    #[default]
    Verbatim,
    /// Append only rows that pass the same checks as manual entry
    Validated,
}

/// Counts reported after an import
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub appended: usize,
    pub skipped: usize,
}

/// History store backed by a single CSV file
#[derive(Clone, Debug)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    /// Create a store for the given path; the file is created on first write
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure the parent directory exists
    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }

    /// Append one computed record
    pub fn append(&self, record: &BmiRecord) -> Result<()> {
        self.append_rows(&[record.to_row()])?;
        tracing::debug!("Appended {} entry to {:?}", record.timestamp, self.path);
        Ok(())
    }

    /// Append raw rows, creating the file if missing
    pub fn append_rows(&self, rows: &[HistoryRow]) -> Result<usize> {
        if rows.is_empty() {
            return Ok(0);
        }
        self.ensure_parent_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.lock_exclusive()?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_writer(&file);
        for row in rows {
            writer.write_record(row.fields())?;
        }
        writer.flush()?;
        drop(writer);

        file.unlock()?;
        Ok(rows.len())
    }

    /// Read every data row with its 1-based line number, oldest first
    ///
    /// A missing file is an empty history. Rows equal to the header are
    /// dropped.
    fn read_numbered(&self) -> Result<Vec<(u64, HistoryRow)>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        file.lock_shared()?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(&file);

        let mut rows = Vec::new();
        let mut record = csv::StringRecord::new();
        while reader.read_record(&mut record)? {
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            let row = HistoryRow::from(&record);
            if !row.is_header() {
                rows.push((line, row));
            }
        }

        file.unlock()?;
        tracing::debug!("Read {} rows from {:?}", rows.len(), self.path);
        Ok(rows)
    }

    /// Read every data row, oldest first
    pub fn read_all(&self) -> Result<Vec<HistoryRow>> {
        Ok(self
            .read_numbered()?
            .into_iter()
            .map(|(_, row)| row)
            .collect())
    }

    /// Last `n` rows, newest first
    pub fn load_recent(&self, n: usize) -> Result<Vec<HistoryRow>> {
        let rows = self.read_all()?;
        let start = rows.len().saturating_sub(n);
        Ok(rows[start..].iter().rev().cloned().collect())
    }

    /// Replace the whole file with the header followed by `rows`
    ///
    /// Writes to a temp file in the same directory and renames it over
    /// the original.
    pub fn overwrite(&self, rows: &[HistoryRow]) -> Result<()> {
        write_table(&self.path, rows)?;
        tracing::info!("Rewrote {:?} with {} rows", self.path, rows.len());
        Ok(())
    }

    /// Append the rows of an external CSV file, discarding its first row
    pub fn import(&self, source: &Path, mode: ImportMode) -> Result<ImportSummary> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(source)?;

        let mut summary = ImportSummary::default();
        let mut accepted = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let record = result?;
            if index == 0 {
                continue;
            }
            let row = HistoryRow::from(&record);
            match mode {
                ImportMode::Verbatim => accepted.push(row),
                ImportMode::Validated => match check_row(&row) {
                    Ok(()) => accepted.push(row),
                    Err(e) => {
                        tracing::warn!("Skipping imported row {}: {}", index + 1, e);
                        summary.skipped += 1;
                    }
                },
            }
        }

        summary.appended = self.append_rows(&accepted)?;
        tracing::info!(
            "Imported {} rows from {:?} ({} skipped)",
            summary.appended,
            source,
            summary.skipped
        );
        Ok(summary)
    }

    /// Dates and BMI values of the last `n` rows, oldest first
    ///
    /// Any row in the window with a non-numeric BMI fails the whole series.
    pub fn trend_series(&self, n: usize) -> Result<Trend> {
        let rows = self.read_numbered()?;
        if rows.len() < 2 {
            return Ok(Trend::NotEnoughData);
        }

        let start = rows.len().saturating_sub(n);
        let mut points = Vec::with_capacity(rows.len() - start);
        for (line, row) in &rows[start..] {
            let raw = row.bmi_field().unwrap_or("");
            let bmi = raw
                .trim()
                .parse::<f64>()
                .map_err(|_| Error::MalformedRecord {
                    line: *line as usize,
                    value: raw.to_string(),
                })?;
            points.push(TrendPoint {
                date: row.date().unwrap_or("").to_string(),
                bmi,
            });
        }

        Ok(Trend::Series(points))
    }
}

/// Write the header and `rows` to `path`, replacing any existing file
pub fn write_table(path: &Path, rows: &[HistoryRow]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let temp = NamedTempFile::new_in(dir)?;
    temp.as_file().lock_exclusive()?;

    {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_writer(temp.as_file());
        writer.write_record(HistoryRow::header().fields())?;
        for row in rows {
            writer.write_record(row.fields())?;
        }
        writer.flush()?;
    }

    temp.as_file().sync_all()?;
    temp.as_file().unlock()?;

    temp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}

/// Check an imported row the way manual entry is checked
fn check_row(row: &HistoryRow) -> Result<()> {
    if row.fields().len() != 5 {
        return Err(Error::Other(format!(
            "expected 5 fields, found {}",
            row.fields().len()
        )));
    }

    let height = parse_field("height", row.field(1))?;
    let weight = parse_field("weight", row.field(2))?;
    engine::validate(height, weight)?;

    let stored = parse_field("BMI", row.bmi_field())?;
    let expected = engine::bmi(height, weight);
    if (stored - expected).abs() > 0.1 + f64::EPSILON {
        return Err(Error::Other(format!(
            "BMI {} does not match height and weight (expected {})",
            stored, expected
        )));
    }

    let status = row.status().unwrap_or("");
    if status != engine::classify(stored).label() {
        return Err(Error::Other(format!("status {:?} does not match BMI {}", status, stored)));
    }

    Ok(())
}

fn parse_field(field: &'static str, value: Option<&str>) -> Result<f64> {
    let input = value.unwrap_or("");
    input.trim().parse::<f64>().map_err(|_| Error::Parse {
        field,
        input: input.to_string(),
    })
}
