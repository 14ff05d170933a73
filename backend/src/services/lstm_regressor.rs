//! Stacked-LSTM regressor evaluated from exported weights.
//!
//! The network is trained elsewhere; its weights are exported to JSON in the
//! Keras layout (LSTM gates ordered input, forget, cell, output; kernels are
//! `[inputs][outputs]`). Only the forward pass lives here.
//!
//! Expected file layout:
//!
//! ```json
//! {
//!   "window": 100,
//!   "lstm":  [{ "kernel": [[..]], "recurrent_kernel": [[..]], "bias": [..] }, ..],
//!   "dense": [{ "kernel": [[..]], "bias": [..], "activation": "linear" }, ..]
//! }
//! ```
//!
//! To produce it from a saved Keras `.h5` model, load it with
//! `keras.models.load_model`, then for each `LSTM` layer in order write
//! `layer.get_weights()` (kernel, recurrent kernel, bias) as nested lists, and
//! do the same for each `Dense` layer (kernel, bias) together with
//! `layer.activation.__name__`. Dropout layers carry no weights and are skipped.
//! `window` is the model's input length, `model.input_shape[1]`.

use std::path::Path;

use ndarray::{s, Array1, Array2};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::services::regressor::{RegressorError, SequenceRegressor, Window};

#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("failed to read model file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse model weights: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid model shape: {0}")]
    Shape(String),
}

#[derive(Debug, Deserialize)]
struct ModelWeights {
    window: usize,
    lstm: Vec<LstmWeights>,
    dense: Vec<DenseWeights>,
}

#[derive(Debug, Deserialize)]
struct LstmWeights {
    kernel: Vec<Vec<f64>>,
    recurrent_kernel: Vec<Vec<f64>>,
    bias: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct DenseWeights {
    kernel: Vec<Vec<f64>>,
    bias: Vec<f64>,
    #[serde(default)]
    activation: Activation,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Activation {
    #[default]
    Linear,
    Relu,
}

#[derive(Debug)]
struct LstmLayer {
    units: usize,
    kernel: Array2<f64>,
    recurrent: Array2<f64>,
    bias: Array1<f64>,
}

#[derive(Debug)]
struct DenseLayer {
    kernel: Array2<f64>,
    bias: Array1<f64>,
    activation: Activation,
}

/// Read-only after loading, so concurrent `predict_one` calls are safe.
#[derive(Debug)]
pub struct LstmRegressor {
    window: usize,
    lstm: Vec<LstmLayer>,
    dense: Vec<DenseLayer>,
}

impl LstmRegressor {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ModelLoadError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let model = Self::from_json(&raw)?;
        info!(
            "Loaded LSTM regressor from {} ({} LSTM layers, {} dense layers, window {})",
            path.display(),
            model.lstm.len(),
            model.dense.len(),
            model.window
        );
        Ok(model)
    }

    pub fn from_json(raw: &str) -> Result<Self, ModelLoadError> {
        let weights: ModelWeights = serde_json::from_str(raw)?;
        Self::from_weights(weights)
    }

    pub fn window(&self) -> usize {
        self.window
    }

    fn from_weights(weights: ModelWeights) -> Result<Self, ModelLoadError> {
        if weights.window == 0 {
            return Err(ModelLoadError::Shape("window must be positive".into()));
        }
        if weights.lstm.is_empty() || weights.dense.is_empty() {
            return Err(ModelLoadError::Shape(
                "need at least one LSTM layer and one dense layer".into(),
            ));
        }

        // one feature per time step
        let mut inputs = 1;
        let mut lstm = Vec::with_capacity(weights.lstm.len());
        for (idx, layer) in weights.lstm.into_iter().enumerate() {
            let name = format!("lstm[{}]", idx);
            let kernel = to_array2(layer.kernel, &name)?;
            let recurrent = to_array2(layer.recurrent_kernel, &name)?;
            let units = recurrent.nrows();

            if kernel.dim() != (inputs, 4 * units)
                || recurrent.dim() != (units, 4 * units)
                || layer.bias.len() != 4 * units
            {
                return Err(ModelLoadError::Shape(format!(
                    "{}: expected kernel {}x{}, recurrent {}x{}, bias {}",
                    name,
                    inputs,
                    4 * units,
                    units,
                    4 * units,
                    4 * units
                )));
            }

            lstm.push(LstmLayer {
                units,
                kernel,
                recurrent,
                bias: Array1::from(layer.bias),
            });
            inputs = units;
        }

        let mut dense = Vec::with_capacity(weights.dense.len());
        for (idx, layer) in weights.dense.into_iter().enumerate() {
            let name = format!("dense[{}]", idx);
            let kernel = to_array2(layer.kernel, &name)?;
            if kernel.nrows() != inputs || layer.bias.len() != kernel.ncols() {
                return Err(ModelLoadError::Shape(format!(
                    "{}: expected {} input rows and bias matching {} outputs",
                    name,
                    inputs,
                    kernel.ncols()
                )));
            }
            inputs = kernel.ncols();
            dense.push(DenseLayer {
                kernel,
                bias: Array1::from(layer.bias),
                activation: layer.activation,
            });
        }

        if inputs != 1 {
            return Err(ModelLoadError::Shape(format!(
                "final layer must produce a single value, produces {}",
                inputs
            )));
        }

        Ok(Self {
            window: weights.window,
            lstm,
            dense,
        })
    }
}

fn to_array2(rows: Vec<Vec<f64>>, name: &str) -> Result<Array2<f64>, ModelLoadError> {
    let nrows = rows.len();
    let ncols = rows.first().map_or(0, Vec::len);
    if rows.iter().any(|r| r.len() != ncols) {
        return Err(ModelLoadError::Shape(format!("{}: ragged matrix", name)));
    }
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((nrows, ncols), flat)
        .map_err(|e| ModelLoadError::Shape(format!("{}: {}", name, e)))
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

impl LstmLayer {
    fn run(&self, inputs: &[Array1<f64>]) -> Vec<Array1<f64>> {
        let u = self.units;
        let mut h = Array1::<f64>::zeros(u);
        let mut c = Array1::<f64>::zeros(u);
        let mut outputs = Vec::with_capacity(inputs.len());

        for x in inputs {
            let z = x.dot(&self.kernel) + h.dot(&self.recurrent) + &self.bias;

            let i = z.slice(s![0..u]).mapv(sigmoid);
            let f = z.slice(s![u..2 * u]).mapv(sigmoid);
            let g = z.slice(s![2 * u..3 * u]).mapv(f64::tanh);
            let o = z.slice(s![3 * u..4 * u]).mapv(sigmoid);

            c = &f * &c + &i * &g;
            h = &o * &c.mapv(f64::tanh);
            outputs.push(h.clone());
        }

        outputs
    }
}

impl DenseLayer {
    fn apply(&self, x: &Array1<f64>) -> Array1<f64> {
        let y = x.dot(&self.kernel) + &self.bias;
        match self.activation {
            Activation::Linear => y,
            Activation::Relu => y.mapv(|v| v.max(0.0)),
        }
    }
}

impl SequenceRegressor for LstmRegressor {
    fn predict_one(&self, window: &Window) -> Result<f64, RegressorError> {
        if window.len() != self.window {
            return Err(RegressorError::WindowLength {
                expected: self.window,
                actual: window.len(),
            });
        }

        let mut sequence: Vec<Array1<f64>> = window
            .as_slice()
            .iter()
            .map(|&v| Array1::from_elem(1, v))
            .collect();

        for layer in &self.lstm {
            sequence = layer.run(&sequence);
        }

        let mut out = sequence
            .pop()
            .ok_or_else(|| RegressorError::Inference("empty sequence".into()))?;
        for layer in &self.dense {
            out = layer.apply(&out);
        }

        out.get(0)
            .copied()
            .ok_or_else(|| RegressorError::Inference("model produced no output".into()))
    }
}
