//! BMI engine: parsing, validation, computation and classification.
//!
//! The flow for one calculation is:
//! 1. Parse raw text into a [`Measurement`]
//! 2. Convert to metric
//! 3. Check the realistic range (0.5-3.0 m, 10-500 kg)
//! 4. Compute `weight / height²` rounded to one decimal
//! 5. Classify into one of four bands

use crate::units::to_metric;
use crate::{BmiReading, Classification, Error, Measurement, Result, UnitSystem};

pub const MIN_HEIGHT_M: f64 = 0.5;
pub const MAX_HEIGHT_M: f64 = 3.0;
pub const MIN_WEIGHT_KG: f64 = 10.0;
pub const MAX_WEIGHT_KG: f64 = 500.0;

const FALLBACK_ADVICE: &str = "Keep tracking your progress!";

/// Parse raw height/weight text in the given unit system
pub fn parse_measurement(height: &str, weight: &str, units: UnitSystem) -> Result<Measurement> {
    Ok(Measurement {
        height: parse_number("height", height)?,
        weight: parse_number("weight", weight)?,
        units,
    })
}

fn parse_number(field: &'static str, input: &str) -> Result<f64> {
    match input.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(Error::Parse {
            field,
            input: input.to_string(),
        }),
    }
}

/// Check metric height and weight against the realistic range
pub fn validate(height_m: f64, weight_kg: f64) -> Result<()> {
    if !(MIN_HEIGHT_M..=MAX_HEIGHT_M).contains(&height_m) {
        return Err(Error::Validation {
            field: "height",
            value: height_m,
        });
    }
    if !(MIN_WEIGHT_KG..=MAX_WEIGHT_KG).contains(&weight_kg) {
        return Err(Error::Validation {
            field: "weight",
            value: weight_kg,
        });
    }
    Ok(())
}

/// BMI rounded once to one decimal place
pub fn bmi(height_m: f64, weight_kg: f64) -> f64 {
    round_to_tenth(weight_kg / (height_m * height_m))
}

/// Round the stored binary value to one decimal, so 24.9499.. gives 24.9
fn round_to_tenth(value: f64) -> f64 {
    format!("{:.1}", value).parse().unwrap_or(value)
}

/// Classify a BMI value; each threshold belongs to the upper band
pub fn classify(bmi: f64) -> Classification {
    if bmi < 18.5 {
        Classification::Underweight
    } else if bmi < 25.0 {
        Classification::NormalWeight
    } else if bmi < 30.0 {
        Classification::Overweight
    } else {
        Classification::Obese
    }
}

/// Fixed advisory text for a classification
pub fn advice(classification: Classification) -> &'static str {
    match classification {
        Classification::Underweight => {
            "Consider consulting a nutritionist for healthy weight gain strategies."
        }
        Classification::NormalWeight => "Excellent! Maintain balance with diet and regular exercise.",
        Classification::Overweight => {
            "Focus on portion control, daily walks, and healthy food choices."
        }
        Classification::Obese => {
            "Professional guidance recommended for sustainable weight management."
        }
    }
}

/// Advice for a raw status label, falling back for unknown labels
pub fn advice_for_label(label: &str) -> &'static str {
    label
        .parse::<Classification>()
        .map(advice)
        .unwrap_or(FALLBACK_ADVICE)
}

/// Convert, validate, compute and classify one measurement
pub fn compute(measurement: &Measurement) -> Result<BmiReading> {
    let (height_m, weight_kg) = to_metric(measurement);
    validate(height_m, weight_kg)?;

    let bmi = bmi(height_m, weight_kg);
    let classification = classify(bmi);

    tracing::debug!(
        "Computed BMI {:.1} ({}) from {:.2} m / {:.1} kg",
        bmi,
        classification,
        height_m,
        weight_kg
    );

    Ok(BmiReading {
        height_m,
        weight_kg,
        bmi,
        classification,
    })
}

/// Parse and compute in one step from raw text input
pub fn compute_from_input(height: &str, weight: &str, units: UnitSystem) -> Result<BmiReading> {
    let measurement = parse_measurement(height, weight, units)?;
    compute(&measurement)
}
