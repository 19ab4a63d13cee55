use crate::activation::ActivationFunction;
use crate::error::Result;
use crate::layers::{hidden::HiddenLayer, output::OutputLayer};

/// Borrowed view over one position of a network chain.
///
/// The set of variants is closed: zero or more hidden layers followed by
/// exactly one output layer.
#[derive(Debug, Clone, Copy)]
pub enum Layer<'a> {
    Hidden(&'a HiddenLayer),
    Output(&'a OutputLayer),
}

impl Layer<'_> {
    pub fn input_shape(&self) -> usize {
        match self {
            Layer::Hidden(l) => l.input_shape(),
            Layer::Output(l) => l.input_shape(),
        }
    }

    pub fn is_ready(&self) -> Result<()> {
        match self {
            Layer::Hidden(l) => l.is_ready(),
            Layer::Output(l) => l.is_ready(),
        }
    }

    pub fn evaluate(&self, input: &[f64]) -> Result<Vec<f64>> {
        match self {
            Layer::Hidden(l) => l.evaluate(input),
            Layer::Output(l) => l.evaluate(input),
        }
    }

    pub fn activation(&self) -> ActivationFunction {
        match self {
            Layer::Hidden(l) => l.activation(),
            Layer::Output(l) => l.activation(),
        }
    }

    pub fn biases(&self) -> &[f64] {
        match self {
            Layer::Hidden(l) => l.biases(),
            Layer::Output(l) => l.biases(),
        }
    }

    pub fn is_output(&self) -> bool {
        matches!(self, Layer::Output(_))
    }
}
