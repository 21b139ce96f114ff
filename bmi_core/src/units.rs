//! Unit conversion from raw input to metric.

use crate::{Measurement, UnitSystem};

/// Inches per meter (approximation)
pub const INCHES_PER_METER: f64 = 39.37;

/// Pounds per kilogram (approximation)
pub const POUNDS_PER_KILOGRAM: f64 = 2.205;

/// Convert a measurement to metric `(height_m, weight_kg)`
///
/// Metric input passes through unchanged.
pub fn to_metric(measurement: &Measurement) -> (f64, f64) {
    match measurement.units {
        UnitSystem::Metric => (measurement.height, measurement.weight),
        UnitSystem::Imperial => (
            measurement.height / INCHES_PER_METER,
            measurement.weight / POUNDS_PER_KILOGRAM,
        ),
    }
}
