use crate::error::{Error, Result};

pub struct MseLoss;

impl MseLoss {
    /// Per-output squared error `(expected - actual)^2`.
    ///
    /// Kept unreduced so the individual costs can be summed or averaged by the
    /// caller as needed.
    pub fn individual(actual: &[f64], expected: &[f64]) -> Result<Vec<f64>> {
        check_lengths(actual, expected)?;
        Ok(actual.iter().zip(expected)
            .map(|(a, e)| (e - a).powi(2))
            .collect())
    }

    /// Scalar MSE: mean((actual - expected)^2). Zero for empty slices.
    pub fn loss(actual: &[f64], expected: &[f64]) -> Result<f64> {
        let costs = MseLoss::individual(actual, expected)?;
        if costs.is_empty() {
            return Ok(0.0);
        }
        Ok(costs.iter().sum::<f64>() / costs.len() as f64)
    }
}

fn check_lengths(actual: &[f64], expected: &[f64]) -> Result<()> {
    if actual.len() != expected.len() {
        return Err(Error::shape(format!(
            "{} outputs compared against {} targets",
            actual.len(), expected.len()
        )));
    }
    Ok(())
}
