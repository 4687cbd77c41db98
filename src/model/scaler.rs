//! Pre-fitted feature scalers.
//!
//! Both scalers are per-feature affine maps whose parameters come from the
//! training run that produced the classifier. They are applied in the order
//! they were fitted: min-max first, then z-score. Changing that order would
//! feed the classifier values it was never trained on.

use serde::Deserialize;

use super::{Normalizer, FEATURE_COUNT};

/// Linear rescaling to the range the training data spanned.
#[derive(Debug, Clone, Deserialize)]
pub struct MinMaxScaler {
    min: [f64; FEATURE_COUNT],
    max: [f64; FEATURE_COUNT],
}

impl MinMaxScaler {
    pub fn new(min: [f64; FEATURE_COUNT], max: [f64; FEATURE_COUNT]) -> Self {
        Self { min, max }
    }

    pub fn transform(&self, features: [f64; FEATURE_COUNT]) -> [f64; FEATURE_COUNT] {
        let mut out = features;
        for i in 0..FEATURE_COUNT {
            let range = self.max[i] - self.min[i];
            // A constant training column leaves the feature untouched
            if range != 0.0 {
                out[i] = (features[i] - self.min[i]) / range;
            }
        }
        out
    }
}

/// Zero-mean / unit-variance rescaling.
#[derive(Debug, Clone, Deserialize)]
pub struct StandardScaler {
    mean: [f64; FEATURE_COUNT],
    std: [f64; FEATURE_COUNT],
}

impl StandardScaler {
    pub fn new(mean: [f64; FEATURE_COUNT], std: [f64; FEATURE_COUNT]) -> Self {
        Self { mean, std }
    }

    pub fn transform(&self, features: [f64; FEATURE_COUNT]) -> [f64; FEATURE_COUNT] {
        let mut out = features;
        for i in 0..FEATURE_COUNT {
            if self.std[i] != 0.0 {
                out[i] = (features[i] - self.mean[i]) / self.std[i];
            } else {
                out[i] = features[i] - self.mean[i];
            }
        }
        out
    }
}

/// The fitted transformation stack: min-max, then standard.
pub struct ScalerStack {
    minmax: MinMaxScaler,
    standard: StandardScaler,
}

impl ScalerStack {
    pub fn new(minmax: MinMaxScaler, standard: StandardScaler) -> Self {
        Self { minmax, standard }
    }
}

impl Normalizer for ScalerStack {
    fn normalize(&self, features: [f64; FEATURE_COUNT]) -> [f64; FEATURE_COUNT] {
        self.standard.transform(self.minmax.transform(features))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn minmax_maps_bounds_to_unit_interval() {
        let scaler = MinMaxScaler::new([0.0; 7], [10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0]);
        let out = scaler.transform([0.0, 10.0, 5.0, 2.5, 7.5, 10.0, 0.0]);
        assert!(close(out[0], 0.0));
        assert!(close(out[1], 1.0));
        assert!(close(out[2], 0.5));
        assert!(close(out[3], 0.25));
    }

    #[test]
    fn minmax_passes_through_constant_column() {
        let scaler = MinMaxScaler::new([3.0; 7], [3.0; 7]);
        let out = scaler.transform([42.0; 7]);
        assert!(close(out[0], 42.0));
    }

    #[test]
    fn standard_centers_and_scales() {
        let scaler = StandardScaler::new([1.0; 7], [2.0; 7]);
        let out = scaler.transform([5.0; 7]);
        assert!(close(out[0], 2.0));
    }

    #[test]
    fn standard_only_centers_on_zero_variance() {
        let scaler = StandardScaler::new([1.0; 7], [0.0; 7]);
        let out = scaler.transform([5.0; 7]);
        assert!(close(out[0], 4.0));
    }

    #[test]
    fn stack_applies_minmax_before_standard() {
        let minmax = MinMaxScaler::new([0.0; 7], [10.0; 7]);
        let standard = StandardScaler::new([0.5; 7], [0.25; 7]);
        let stack = ScalerStack::new(minmax, standard);

        // 7.5 -> minmax 0.75 -> z-score (0.75 - 0.5) / 0.25 = 1.0
        let out = stack.normalize([7.5; 7]);
        assert!(close(out[0], 1.0));
    }
}
