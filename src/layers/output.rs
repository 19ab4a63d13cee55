use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::activation::ActivationFunction;
use crate::error::{Error, Result};

/// Terminal layer of a network: applies its activation elementwise.
///
/// Biases are allocated and persisted with the model but evaluation does not
/// add them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputLayer {
    input_width: usize,
    biases: Vec<f64>,
    activation: ActivationFunction,
}

impl OutputLayer {
    pub fn build(width: usize, activation: ActivationFunction) -> OutputLayer {
        OutputLayer::build_with_rng(width, activation, &mut rand::thread_rng())
    }

    pub fn build_with_rng<R: Rng + ?Sized>(
        width: usize,
        activation: ActivationFunction,
        rng: &mut R,
    ) -> OutputLayer {
        let biases = (0..width).map(|_| rng.gen::<f64>()).collect();
        OutputLayer { input_width: width, biases, activation }
    }

    pub(crate) fn from_parts(activation: ActivationFunction, biases: Vec<f64>) -> OutputLayer {
        OutputLayer { input_width: biases.len(), biases, activation }
    }

    pub fn input_shape(&self) -> usize {
        self.input_width
    }

    pub fn biases(&self) -> &[f64] {
        &self.biases
    }

    pub fn activation(&self) -> ActivationFunction {
        self.activation
    }

    pub fn is_ready(&self) -> Result<()> {
        if self.biases.len() != self.input_width {
            return Err(Error::shape(format!(
                "output layer input shape {} does not match {} biases",
                self.input_width, self.biases.len()
            )));
        }
        Ok(())
    }

    pub fn evaluate(&self, input: &[f64]) -> Result<Vec<f64>> {
        if input.len() != self.input_width {
            return Err(Error::shape(format!(
                "input does not match input shape: expected {}, got {}",
                self.input_width, input.len()
            )));
        }
        Ok(input.iter().map(|&x| self.activation.eval(x)).collect())
    }
}
