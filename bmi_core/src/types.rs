//! Core domain types for the BMI tracker.
//!
//! This module defines the fundamental types used throughout the system:
//! - Unit systems and raw measurements
//! - Classification bands
//! - Computed readings and persisted records
//! - Raw history rows as stored on disk

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Timestamp format used for the `Date` column
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Header row written on overwrite and expected on import
pub const HISTORY_HEADER: [&str; 5] = ["Date", "Height", "Weight", "BMI", "Status"];

// ============================================================================
// Units and Measurements
// ============================================================================

/// How raw height/weight input is interpreted
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnitSystem {
    /// Meters and kilograms
    #[default]
    Metric,
    /// Inches and pounds
    Imperial,
}

impl UnitSystem {
    /// The other unit system
    pub fn toggled(self) -> Self {
        match self {
            UnitSystem::Metric => UnitSystem::Imperial,
            UnitSystem::Imperial => UnitSystem::Metric,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            UnitSystem::Metric => "Metric (m/kg)",
            UnitSystem::Imperial => "Imperial (inches/lb)",
        }
    }

    /// Short unit suffix shown next to a result
    pub fn suffix(self) -> &'static str {
        match self {
            UnitSystem::Metric => "(m/kg)",
            UnitSystem::Imperial => "(inches/lb)",
        }
    }
}

impl FromStr for UnitSystem {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "metric" | "m" => Ok(UnitSystem::Metric),
            "imperial" | "i" => Ok(UnitSystem::Imperial),
            other => Err(crate::Error::Config(format!("Unknown unit system: {}", other))),
        }
    }
}

/// A height/weight pair in the units of `units`
///
/// Transient: exists only for the duration of one computation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Measurement {
    pub height: f64,
    pub weight: f64,
    pub units: UnitSystem,
}

// ============================================================================
// Classification
// ============================================================================

/// BMI classification band
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Classification {
    Underweight,
    #[serde(rename = "Normal weight")]
    NormalWeight,
    Overweight,
    Obese,
}

impl Classification {
    pub const ALL: [Classification; 4] = [
        Classification::Underweight,
        Classification::NormalWeight,
        Classification::Overweight,
        Classification::Obese,
    ];

    /// Label as written to the `Status` column
    pub fn label(self) -> &'static str {
        match self {
            Classification::Underweight => "Underweight",
            Classification::NormalWeight => "Normal weight",
            Classification::Overweight => "Overweight",
            Classification::Obese => "Obese",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Classification {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        Classification::ALL
            .into_iter()
            .find(|c| c.label() == s.trim())
            .ok_or_else(|| crate::Error::Other(format!("Unknown classification: {}", s)))
    }
}

// ============================================================================
// Readings and Records
// ============================================================================

/// Output of one successful engine computation (metric units)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BmiReading {
    pub height_m: f64,
    pub weight_kg: f64,
    pub bmi: f64,
    pub classification: Classification,
}

/// A timestamped reading, ready to be appended to the history
#[derive(Clone, Debug, PartialEq)]
pub struct BmiRecord {
    pub timestamp: String,
    pub height_m: f64,
    pub weight_kg: f64,
    pub bmi: f64,
    pub classification: Classification,
}

impl BmiRecord {
    pub fn new(reading: BmiReading, at: DateTime<Local>) -> Self {
        Self {
            timestamp: at.format(TIMESTAMP_FORMAT).to_string(),
            height_m: reading.height_m,
            weight_kg: reading.weight_kg,
            bmi: reading.bmi,
            classification: reading.classification,
        }
    }

    /// Serialize to the on-disk column layout
    pub fn to_row(&self) -> HistoryRow {
        HistoryRow::new(vec![
            self.timestamp.clone(),
            format!("{:.2}", self.height_m),
            format!("{:.1}", self.weight_kg),
            format!("{:.1}", self.bmi),
            self.classification.label().to_string(),
        ])
    }
}

// ============================================================================
// History Rows
// ============================================================================

/// One row of the history file, kept as raw text fields
///
/// Imported rows are stored verbatim, so rows are not required to have
/// five fields or numeric values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryRow {
    fields: Vec<String>,
}

impl HistoryRow {
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    pub fn header() -> Self {
        Self::new(HISTORY_HEADER.iter().map(|s| s.to_string()).collect())
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    pub fn date(&self) -> Option<&str> {
        self.field(0)
    }

    pub fn bmi_field(&self) -> Option<&str> {
        self.field(3)
    }

    pub fn status(&self) -> Option<&str> {
        self.field(4)
    }

    /// True if this row is exactly the fixed header row
    pub fn is_header(&self) -> bool {
        self.fields.len() == HISTORY_HEADER.len()
            && self
                .fields
                .iter()
                .zip(HISTORY_HEADER.iter())
                .all(|(a, b)| a == b)
    }
}

impl From<&csv::StringRecord> for HistoryRow {
    fn from(record: &csv::StringRecord) -> Self {
        Self::new(record.iter().map(str::to_string).collect())
    }
}
