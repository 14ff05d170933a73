use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegressorError {
    #[error("window has {actual} values, model expects {expected}")]
    WindowLength { expected: usize, actual: usize },
    #[error("inference failed: {0}")]
    Inference(String),
}

/// Fixed-length run of normalized values, oldest first.
///
/// Windows are snapshots: advancing produces a new window and leaves the
/// previous one untouched, so a window handed to a model can never change
/// under it.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    values: Arc<[f64]>,
}

impl Window {
    /// Takes the trailing `len` values of `series`, or `None` when it is too short.
    pub fn trailing(series: &[f64], len: usize) -> Option<Self> {
        if len == 0 || series.len() < len {
            return None;
        }
        Some(Self {
            values: Arc::from(&series[series.len() - len..]),
        })
    }

    /// Drops the oldest value and appends `next`.
    pub fn advance(&self, next: f64) -> Self {
        let values: Arc<[f64]> = self.values[1..]
            .iter()
            .copied()
            .chain(std::iter::once(next))
            .collect();
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn last(&self) -> f64 {
        self.values[self.values.len() - 1]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

/// A pre-trained model mapping a window to the next normalized value.
///
/// Loaded once at startup and shared by every request, so implementations
/// must tolerate concurrent calls. Models that cannot should be wrapped in
/// [`InferenceGate`].
pub trait SequenceRegressor: Send + Sync {
    fn predict_one(&self, window: &Window) -> Result<f64, RegressorError>;
}

/// Serializes calls into a regressor that is not reentrant.
pub struct InferenceGate<R> {
    inner: Mutex<R>,
}

impl<R> InferenceGate<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner: Mutex::new(inner),
        }
    }
}

impl<R: SequenceRegressor> SequenceRegressor for InferenceGate<R> {
    fn predict_one(&self, window: &Window) -> Result<f64, RegressorError> {
        self.inner.lock().predict_one(window)
    }
}
