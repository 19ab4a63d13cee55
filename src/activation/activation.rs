use serde::{Serialize, Deserialize};

/// Scalar activation applied by a layer to each of its neurons.
///
/// `derivative` is always the analytic derivative of `eval`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationFunction {
    /// Logistic function `1 / (1 + e^-x)`, range `(0, 1)`.
    #[default]
    Sigmoid,
    Tanh,
    #[serde(rename = "relu")]
    ReLU,
    Identity,
}

impl ActivationFunction {
    pub fn eval(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            ActivationFunction::Tanh => x.tanh(),
            ActivationFunction::ReLU => if x > 0.0 { x } else { 0.0 },
            ActivationFunction::Identity => x,
        }
    }

    pub fn derivative(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => {
                let fx = self.eval(x);
                fx * (1.0 - fx)
            }
            ActivationFunction::Tanh => {
                let t = x.tanh();
                1.0 - t * t
            }
            ActivationFunction::ReLU => if x > 0.0 { 1.0 } else { 0.0 },
            ActivationFunction::Identity => 1.0,
        }
    }

    /// One-byte tag identifying the activation in the binary model header.
    pub fn tag(&self) -> u8 {
        match self {
            ActivationFunction::Sigmoid => 0,
            ActivationFunction::Tanh => 1,
            ActivationFunction::ReLU => 2,
            ActivationFunction::Identity => 3,
        }
    }

    pub fn from_tag(tag: u8) -> Option<ActivationFunction> {
        match tag {
            0 => Some(ActivationFunction::Sigmoid),
            1 => Some(ActivationFunction::Tanh),
            2 => Some(ActivationFunction::ReLU),
            3 => Some(ActivationFunction::Identity),
            _ => None,
        }
    }
}
