//! Feature standardization
//!
//! Per-column mean-centering and unit-variance scaling, fitted offline
//! and applied unchanged at serving time.

use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Scaler failures.
#[derive(Error, Debug)]
pub enum ScalerError {
    #[error("scaler has not been fitted")]
    NotFitted,

    #[error("cannot fit scaler on an empty matrix")]
    EmptyFit,

    #[error("scaler was fitted on {expected} columns, input has {got}")]
    ShapeMismatch { expected: usize, got: usize },
}

/// Z-score standardization: `(x - mean) / std` per column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Option<Array1<f64>>,
    std: Option<Array1<f64>>,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self {
            mean: None,
            std: None,
        }
    }

    /// Number of columns the scaler was fitted on.
    pub fn dim(&self) -> Option<usize> {
        self.mean.as_ref().map(|m| m.len())
    }

    /// Fit the per-column mean and standard deviation.
    pub fn fit(&mut self, data: &Array2<f64>) -> Result<(), ScalerError> {
        let mean = data.mean_axis(Axis(0)).ok_or(ScalerError::EmptyFit)?;
        self.std = Some(data.std_axis(Axis(0), 0.0));
        self.mean = Some(mean);
        Ok(())
    }

    /// Transform data using the fitted parameters.
    ///
    /// Column count must match the fitted dimension; a silent mismatch
    /// would scale every column with the wrong factors.
    pub fn transform(&self, data: &Array2<f64>) -> Result<Array2<f64>, ScalerError> {
        let mean = self.mean.as_ref().ok_or(ScalerError::NotFitted)?;
        let std = self.std.as_ref().ok_or(ScalerError::NotFitted)?;

        if data.ncols() != mean.len() {
            return Err(ScalerError::ShapeMismatch {
                expected: mean.len(),
                got: data.ncols(),
            });
        }

        let mut result = data.clone();
        for (i, mut col) in result.columns_mut().into_iter().enumerate() {
            // Constant columns scale by 1.0 instead of dividing by ~0.
            let s = if std[i] > 1e-10 { std[i] } else { 1.0 };
            col.mapv_inplace(|x| (x - mean[i]) / s);
        }
        Ok(result)
    }

    /// Fit and transform in one step.
    pub fn fit_transform(&mut self, data: &Array2<f64>) -> Result<Array2<f64>, ScalerError> {
        self.fit(data)?;
        self.transform(data)
    }
}

impl Default for StandardScaler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_fit_transform_zero_mean_unit_variance() {
        let data = array![[1.0, 10.0], [2.0, 20.0], [3.0, 30.0]];
        let mut scaler = StandardScaler::new();

        let scaled = scaler.fit_transform(&data).unwrap();
        let mean = scaled.mean_axis(Axis(0)).unwrap();
        let std = scaled.std_axis(Axis(0), 0.0);

        for j in 0..2 {
            assert!(mean[j].abs() < 1e-10);
            assert!((std[j] - 1.0).abs() < 1e-10);
        }
    }

    #[test]
    fn test_transform_unfitted_fails() {
        let scaler = StandardScaler::new();
        let data = array![[1.0, 2.0]];
        assert!(matches!(
            scaler.transform(&data),
            Err(ScalerError::NotFitted)
        ));
    }

    #[test]
    fn test_shape_mismatch_detected() {
        let mut scaler = StandardScaler::new();
        scaler.fit(&array![[1.0, 2.0], [3.0, 4.0]]).unwrap();

        let narrow = array![[1.0]];
        assert!(matches!(
            scaler.transform(&narrow),
            Err(ScalerError::ShapeMismatch {
                expected: 2,
                got: 1
            })
        ));
    }

    #[test]
    fn test_constant_column_does_not_blow_up() {
        let data = array![[5.0, 1.0], [5.0, 2.0], [5.0, 3.0]];
        let mut scaler = StandardScaler::new();
        let scaled = scaler.fit_transform(&data).unwrap();

        for i in 0..3 {
            assert!(scaled[[i, 0]].is_finite());
            assert_eq!(scaled[[i, 0]], 0.0);
        }
    }

    #[test]
    fn test_serde_round_trip() {
        let mut scaler = StandardScaler::new();
        scaler.fit(&array![[1.0, 10.0], [3.0, 20.0]]).unwrap();

        let json = serde_json::to_string(&scaler).unwrap();
        let restored: StandardScaler = serde_json::from_str(&json).unwrap();

        let data = array![[2.0, 15.0]];
        assert_eq!(
            scaler.transform(&data).unwrap(),
            restored.transform(&data).unwrap()
        );
    }
}
