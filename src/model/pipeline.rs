//! The prediction pipeline: raw form fields in, crop label out.
//!
//! Parse -> normalize -> classify -> label lookup. Field parsing reports
//! every offending field at once; anything past parsing is an internal model
//! error, kept distinct so the web layer can render the two differently.

use std::collections::HashMap;

use thiserror::Error;
use tracing::warn;

use super::crops;
use super::{CropModel, ModelError, FEATURE_COUNT};

/// The seven form fields, in submission naming.
pub const FEATURE_FIELDS: [&str; FEATURE_COUNT] = [
    "Nitrogen",
    "Phosphorus",
    "Potassium",
    "Temperature",
    "Humidity",
    "pH",
    "Rainfall",
];

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("Invalid or missing value for: {}", .0.join(", "))]
    InvalidFields(Vec<&'static str>),
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// One parsed measurement set.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub ph: f64,
    pub rainfall: f64,
}

impl FeatureVector {
    /// Parse the seven fields out of a raw form submission. All missing or
    /// non-numeric fields are reported together.
    pub fn parse(fields: &HashMap<String, String>) -> Result<Self, PredictError> {
        let mut invalid: Vec<&'static str> = Vec::new();
        let mut value = |name: &'static str| -> f64 {
            let raw = fields.get(name).map(|s| s.trim()).unwrap_or("");
            match raw.parse::<f64>() {
                Ok(v) if v.is_finite() => v,
                _ => {
                    invalid.push(name);
                    0.0
                }
            }
        };

        let vector = Self {
            nitrogen: value("Nitrogen"),
            phosphorus: value("Phosphorus"),
            potassium: value("Potassium"),
            temperature: value("Temperature"),
            humidity: value("Humidity"),
            ph: value("pH"),
            rainfall: value("Rainfall"),
        };

        if invalid.is_empty() {
            Ok(vector)
        } else {
            Err(PredictError::InvalidFields(invalid))
        }
    }

    /// Fixed feature order: [N, P, K, temperature, humidity, pH, rainfall].
    /// The scalers and classifier were fitted against exactly this order.
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.nitrogen,
            self.phosphorus,
            self.potassium,
            self.temperature,
            self.humidity,
            self.ph,
            self.rainfall,
        ]
    }
}

/// A completed prediction, ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub crop: String,
    pub image: String,
}

/// Run a raw form submission through the loaded model.
pub fn predict(
    model: &CropModel,
    fields: &HashMap<String, String>,
) -> Result<Outcome, PredictError> {
    let vector = FeatureVector::parse(fields)?;
    let normalized = model.normalize(vector.to_array());
    let code = model.classify(normalized)?;

    let crop = crops::label_for_code(code);
    if crop == crops::UNKNOWN_CROP {
        // Lenient degradation is deliberate, but an out-of-table code likely
        // means the artifact and the label table disagree
        warn!(code, "classifier returned a code outside the crop table");
    }

    Ok(Outcome {
        crop: crop.to_string(),
        image: crops::image_file(crop),
    })
}
