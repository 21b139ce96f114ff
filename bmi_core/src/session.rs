//! Presentation-owned session state.
//!
//! A [`Session`] holds the current unit system and the full history as an
//! in-memory ordered table. Every mutation is synced to the backing file
//! before returning, so the table and the file never drift apart.

use crate::history::{write_table, ImportMode, ImportSummary, Trend};
use crate::{engine, BmiReading, BmiRecord, Error, HistoryRow, HistoryStore, Result, UnitSystem};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// Result of one successful calculation
#[derive(Clone, Debug)]
pub struct Calculation {
    pub reading: BmiReading,
    pub record: BmiRecord,
    /// Units the raw input was interpreted in
    pub units: UnitSystem,
}

impl Calculation {
    pub fn advice(&self) -> &'static str {
        engine::advice(self.reading.classification)
    }
}

pub struct Session {
    store: HistoryStore,
    units: UnitSystem,
    recent_limit: usize,
    /// Oldest first
    table: Vec<HistoryRow>,
}

impl Session {
    /// Open a session and load the current history
    pub fn open(store: HistoryStore, units: UnitSystem, recent_limit: usize) -> Result<Self> {
        let table = store.read_all()?;
        tracing::debug!("Session opened with {} rows", table.len());
        Ok(Self {
            store,
            units,
            recent_limit,
            table,
        })
    }

    pub fn units(&self) -> UnitSystem {
        self.units
    }

    /// Switch between metric and imperial input; returns the new mode
    pub fn toggle_units(&mut self) -> UnitSystem {
        self.units = self.units.toggled();
        tracing::debug!("Units switched to {:?}", self.units);
        self.units
    }

    pub fn set_units(&mut self, units: UnitSystem) {
        self.units = units;
        tracing::debug!("Units set to {:?}", self.units);
    }

    pub fn store(&self) -> &HistoryStore {
        &self.store
    }

    /// Number of stored rows
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Reload the table from disk
    pub fn refresh(&mut self) -> Result<()> {
        self.table = self.store.read_all()?;
        Ok(())
    }

    /// The displayed table: most recent rows, newest first
    pub fn displayed(&self) -> Vec<&HistoryRow> {
        self.table.iter().rev().take(self.recent_limit).collect()
    }

    /// Compute BMI from raw input and record it now
    pub fn calculate(&mut self, height: &str, weight: &str) -> Result<Calculation> {
        self.calculate_at(height, weight, Local::now())
    }

    /// Compute BMI from raw input and record it with the given timestamp
    pub fn calculate_at(
        &mut self,
        height: &str,
        weight: &str,
        at: DateTime<Local>,
    ) -> Result<Calculation> {
        let reading = engine::compute_from_input(height, weight, self.units)?;
        let record = BmiRecord::new(reading, at);

        self.store.append(&record)?;
        self.table.push(record.to_row());

        tracing::info!(
            "Recorded BMI {:.1} ({}) at {}",
            record.bmi,
            record.classification,
            record.timestamp
        );

        Ok(Calculation {
            reading,
            record,
            units: self.units,
        })
    }

    /// Delete rows by their 1-based position in the displayed table
    ///
    /// The remaining history is written back in full. Returns the number
    /// of rows removed; an empty selection leaves the file untouched.
    pub fn delete_displayed(&mut self, positions: &[usize]) -> Result<usize> {
        if positions.is_empty() {
            return Ok(0);
        }

        let shown = self.table.len().min(self.recent_limit);
        let mut indices = Vec::with_capacity(positions.len());
        for &position in positions {
            if position == 0 || position > shown {
                return Err(Error::Other(format!(
                    "No row {} in the displayed history (1-{})",
                    position, shown
                )));
            }
            indices.push(self.table.len() - position);
        }
        indices.sort_unstable();
        indices.dedup();

        for &index in indices.iter().rev() {
            self.table.remove(index);
        }

        self.store.overwrite(&self.table)?;
        tracing::info!("Deleted {} rows", indices.len());
        Ok(indices.len())
    }

    /// Write the full history, oldest first, with header to `path` or the backing file
    pub fn export(&self, path: Option<&Path>) -> Result<PathBuf> {
        match path {
            Some(path) if path != self.store.path() => {
                write_table(path, &self.table)?;
                tracing::info!("Exported {} rows to {:?}", self.table.len(), path);
                Ok(path.to_path_buf())
            }
            _ => {
                self.store.overwrite(&self.table)?;
                Ok(self.store.path().to_path_buf())
            }
        }
    }

    /// Append rows from an external CSV and reload the table
    pub fn import(&mut self, source: &Path, mode: ImportMode) -> Result<ImportSummary> {
        let summary = self.store.import(source, mode)?;
        self.refresh()?;
        Ok(summary)
    }

    /// Trend series over the last `n` stored rows
    pub fn trend(&self, n: usize) -> Result<Trend> {
        self.store.trend_series(n)
    }
}
