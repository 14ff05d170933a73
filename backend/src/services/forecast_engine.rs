use tracing::debug;

use crate::errors::ForecastError;
use crate::services::regressor::{SequenceRegressor, Window};

/// Runs the regressor autoregressively for `steps` steps.
///
/// Each prediction is appended to the output and fed back as the newest
/// value of the next window; ground truth is never consulted again, so errors
/// compound over the horizon. Steps are strictly sequential.
///
/// A failed or non-finite prediction aborts the whole run.
pub fn forecast<R>(
    initial: Window,
    steps: usize,
    regressor: &R,
) -> Result<Vec<f64>, ForecastError>
where
    R: SequenceRegressor + ?Sized,
{
    let width = initial.len();
    let mut window = initial;
    let mut output = Vec::with_capacity(steps);

    for step in 0..steps {
        debug_assert_eq!(window.len(), width);

        let yhat = regressor
            .predict_one(&window)
            .map_err(|e| ForecastError::ModelInference(format!("step {}: {}", step + 1, e)))?;

        if !yhat.is_finite() {
            return Err(ForecastError::ModelInference(format!(
                "step {}: model returned non-finite value {}",
                step + 1,
                yhat
            )));
        }

        output.push(yhat);
        window = window.advance(yhat);
    }

    debug!("Forecast engine produced {} steps over a {}-value window", output.len(), width);
    Ok(output)
}
