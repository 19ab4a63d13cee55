use std::fmt;

use rand::Rng;
use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::activation::ActivationFunction;
use crate::error::{Error, Result};
use crate::layers::layer::Layer;
use crate::math::Matrix;

/// Non-owning link from a hidden layer to the next layer in its network.
///
/// `index` is the successor's position in the network chain; `input_shape`
/// is the successor's width captured when the link was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Successor {
    pub index: usize,
    pub input_shape: usize,
}

/// A layer that owns its biases, its activation, and the weight matrix
/// projecting its activated output into the successor's input space.
///
/// Evaluation applies the activation to `input + bias` first and only then
/// takes the weighted sum, so the weights stored here belong to the edges
/// leaving this layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HiddenLayer {
    input_width: usize,
    biases: Vec<f64>,
    out_weights: Option<Matrix>,
    activation: ActivationFunction,
    successor: Option<Successor>,
    pub(crate) initialized: bool,
}

impl HiddenLayer {
    /// Builds an unlinked layer of `width` neurons with biases uniform in `[0, 1)`.
    pub fn build(width: usize, activation: ActivationFunction) -> HiddenLayer {
        HiddenLayer::build_with_rng(width, activation, &mut rand::thread_rng())
    }

    pub fn build_with_rng<R: Rng + ?Sized>(
        width: usize,
        activation: ActivationFunction,
        rng: &mut R,
    ) -> HiddenLayer {
        let biases = (0..width).map(|_| rng.gen::<f64>()).collect();
        HiddenLayer {
            input_width: width,
            biases,
            out_weights: None,
            activation,
            successor: None,
            initialized: false,
        }
    }

    /// Reassembles an already linked layer, e.g. from a decoded model.
    /// The result is not validated; call `is_ready()` on it.
    pub(crate) fn from_parts(
        activation: ActivationFunction,
        biases: Vec<f64>,
        out_weights: Matrix,
        successor: Successor,
    ) -> HiddenLayer {
        HiddenLayer {
            input_width: biases.len(),
            biases,
            out_weights: Some(out_weights),
            activation,
            successor: Some(successor),
            initialized: true,
        }
    }

    /// Allocates the outgoing weights against `successor`'s width.
    ///
    /// `index` is the successor's position in the chain. Linking an already
    /// initialized layer does nothing.
    pub fn link(&mut self, index: usize, successor: Layer<'_>) {
        self.link_with_rng(index, successor, &mut rand::thread_rng());
    }

    pub fn link_with_rng<R: Rng + ?Sized>(&mut self, index: usize, successor: Layer<'_>, rng: &mut R) {
        if self.initialized {
            return;
        }

        let next_width = successor.input_shape();
        self.out_weights = Some(Matrix::uniform(self.input_width, next_width, rng));
        self.successor = Some(Successor { index, input_shape: next_width });
        self.initialized = true;
        debug!(width = self.input_width, next_width, successor = index, "linked hidden layer");
    }

    pub fn input_shape(&self) -> usize {
        self.input_width
    }

    pub fn biases(&self) -> &[f64] {
        &self.biases
    }

    /// `None` until the layer has been linked.
    pub fn out_weights(&self) -> Option<&Matrix> {
        self.out_weights.as_ref()
    }

    pub fn activation(&self) -> ActivationFunction {
        self.activation
    }

    pub fn successor(&self) -> Option<Successor> {
        self.successor
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Checks that biases, successor, and weight shape agree.
    /// The first failing check is reported.
    pub fn is_ready(&self) -> Result<()> {
        if self.biases.is_empty() {
            return Err(Error::shape("hidden layer has no biases / neurons"));
        }
        if self.biases.len() != self.input_width {
            return Err(Error::shape(format!(
                "hidden layer input shape {} does not match {} biases",
                self.input_width, self.biases.len()
            )));
        }

        let state = if self.initialized {
            "hidden layer is labeled as initialized but"
        } else {
            "hidden layer is un-initialized and"
        };

        let successor = self.successor
            .ok_or_else(|| Error::shape(format!("{state} has no successor")))?;
        let weights = self.out_weights.as_ref()
            .ok_or_else(|| Error::shape(format!("{state} has no outgoing weights")))?;
        if !self.initialized {
            return Err(Error::shape("hidden layer has weights but was never linked"));
        }

        if weights.data.len() != self.input_width {
            return Err(Error::shape(format!(
                "incorrect weight input shape: {} neurons, {} weight rows",
                self.input_width, weights.data.len()
            )));
        }
        if let Some((i, row)) = weights.data.iter().enumerate()
            .find(|(_, row)| row.len() != successor.input_shape)
        {
            return Err(Error::shape(format!(
                "incorrect output shape: successor expects {}, weight row {i} has {}",
                successor.input_shape, row.len()
            )));
        }

        Ok(())
    }

    /// Activates `input + biases`, then projects through the outgoing weights.
    /// Returns a vector of the successor's width.
    pub fn evaluate(&self, input: &[f64]) -> Result<Vec<f64>> {
        self.is_ready()?;
        if input.len() != self.input_width {
            return Err(Error::shape(format!(
                "input does not match input shape: expected {}, got {}",
                self.input_width, input.len()
            )));
        }

        // Both are present once is_ready() has passed.
        let (Some(weights), Some(successor)) = (&self.out_weights, self.successor) else {
            return Err(Error::shape("hidden layer is not linked"));
        };

        let activated: Vec<f64> = input.iter().zip(&self.biases)
            .map(|(x, b)| self.activation.eval(x + b))
            .collect();

        let mut output = vec![0.0; successor.input_shape];
        for (a, row) in activated.iter().zip(&weights.data) {
            for (out, w) in output.iter_mut().zip(row) {
                *out += a * w;
            }
        }
        Ok(output)
    }
}

impl fmt::Display for HiddenLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (rows, cols) = self.out_weights.as_ref().map_or((0, 0), |w| (w.rows, w.cols));
        writeln!(f, "Summary:")?;
        writeln!(f, "\tinput_shape: {}", self.input_width)?;
        writeln!(f, "\tweight matrix: {rows}x{cols}")?;
        writeln!(f, "\tbiases: {}", self.biases.len())?;
        match self.successor {
            Some(s) => writeln!(f, "\tnext layer input shape: {}", s.input_shape)?,
            None => writeln!(f, "\tnext layer input shape: unlinked")?,
        }
        writeln!(f, "\tinitialized: {}", self.initialized)?;

        if let Some(weights) = &self.out_weights {
            writeln!(f, "\nweight summary:")?;
            for (i, node) in weights.data.iter().enumerate() {
                writeln!(f, "\tnode #{i} outputs")?;
                for (j, w) in node.iter().enumerate() {
                    writeln!(f, "\t\tweight #{j} : {w}")?;
                }
            }
        }
        Ok(())
    }
}
