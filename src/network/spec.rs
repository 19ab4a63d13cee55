use rand::{rngs::StdRng, SeedableRng};
use serde::{Serialize, Deserialize};

use crate::activation::ActivationFunction;
use crate::error::Result;
use crate::network::network::Network;

/// Describes one layer in a network specification.
///
/// Fields:
/// - `width`      — number of neurons in this layer
/// - `activation` — activation applied to this layer's neurons
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub width: usize,
    #[serde(default)]
    pub activation: ActivationFunction,
}

impl LayerSpec {
    pub fn new(width: usize, activation: ActivationFunction) -> LayerSpec {
        LayerSpec { width, activation }
    }
}

/// A serializable description of a network architecture.
///
/// A spec can be stored as JSON and turned into a linked, ready `Network`
/// with `build()`. When `seed` is set the initial parameters are
/// reproducible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// Human-readable name, used as the model file stem by callers.
    pub name: String,
    /// Hidden layers in chain order.
    pub hidden: Vec<LayerSpec>,
    /// The terminal output layer.
    pub output: LayerSpec,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl NetworkSpec {
    /// All-sigmoid spec, matching what `Network::init` builds.
    pub fn sigmoid(name: &str, hidden_widths: &[usize], output_width: usize) -> NetworkSpec {
        let act = ActivationFunction::Sigmoid;
        NetworkSpec {
            name: name.to_string(),
            hidden: hidden_widths.iter().map(|&w| LayerSpec::new(w, act)).collect(),
            output: LayerSpec::new(output_width, act),
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> NetworkSpec {
        self.seed = Some(seed);
        self
    }

    /// Builds, links and validates the described network.
    pub fn build(&self) -> Result<Network> {
        let hidden: Vec<_> = self.hidden.iter().map(|l| (l.width, l.activation)).collect();
        let output = (self.output.width, self.output.activation);
        match self.seed {
            Some(seed) => Network::build_with_rng(&hidden, output, &mut StdRng::seed_from_u64(seed)),
            None => Network::build_with_rng(&hidden, output, &mut rand::thread_rng()),
        }
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a `NetworkSpec` from a JSON file.
    pub fn load_json(path: &str) -> Result<NetworkSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
