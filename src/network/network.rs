use std::path::Path;

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Serialize, Deserialize};
use tracing::{debug, info};

use crate::activation::ActivationFunction;
use crate::codec;
use crate::error::{Error, Result};
use crate::layers::{HiddenLayer, Layer, OutputLayer};

/// A chain of hidden layers terminated by exactly one output layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    hidden: Vec<HiddenLayer>,
    output: OutputLayer,
}

impl Network {
    /// Builds one sigmoid hidden layer per width and a sigmoid output layer,
    /// links them, and checks readiness.
    pub fn init(hidden_widths: &[usize], output_width: usize) -> Result<Network> {
        Network::init_with_rng(hidden_widths, output_width, &mut rand::thread_rng())
    }

    /// Same as `init`, with every bias and weight drawn from a seeded RNG.
    pub fn init_seeded(hidden_widths: &[usize], output_width: usize, seed: u64) -> Result<Network> {
        Network::init_with_rng(hidden_widths, output_width, &mut StdRng::seed_from_u64(seed))
    }

    pub fn init_with_rng<R: Rng + ?Sized>(
        hidden_widths: &[usize],
        output_width: usize,
        rng: &mut R,
    ) -> Result<Network> {
        let act = ActivationFunction::Sigmoid;
        let specs: Vec<_> = hidden_widths.iter().map(|&w| (w, act)).collect();
        Network::build_with_rng(&specs, (output_width, act), rng)
    }

    /// Builds, links and validates a chain with per-layer activations.
    pub(crate) fn build_with_rng<R: Rng + ?Sized>(
        hidden: &[(usize, ActivationFunction)],
        output: (usize, ActivationFunction),
        rng: &mut R,
    ) -> Result<Network> {
        if let Some(pos) = hidden.iter().position(|&(w, _)| w == 0) {
            return Err(Error::shape(format!("hidden layer {pos} has zero width")));
        }
        if output.0 == 0 {
            return Err(Error::shape("output layer has zero width"));
        }

        let layers = hidden.iter()
            .map(|&(width, act)| HiddenLayer::build_with_rng(width, act, rng))
            .collect();
        let out = OutputLayer::build_with_rng(output.0, output.1, rng);

        let mut network = Network::from_layers(layers, out)?;
        network.link_with_rng(rng);
        match network.is_ready() {
            Ok(()) => {}
            Err(Error::NotReady { reason, .. }) => return Err(*reason),
            Err(e) => return Err(e),
        }

        info!(widths = ?network.widths(), "initialized network");
        Ok(network)
    }

    /// Assembles pre-built layers without linking them; call `link()` next.
    pub fn from_layers(hidden: Vec<HiddenLayer>, output: OutputLayer) -> Result<Network> {
        if hidden.is_empty() {
            return Err(Error::shape("a network needs at least one hidden layer"));
        }
        Ok(Network { hidden, output })
    }

    /// Links hidden layer `i` to `i + 1` and the last hidden layer to the
    /// output layer. Already linked layers are left untouched.
    pub fn link(&mut self) {
        self.link_with_rng(&mut rand::thread_rng());
    }

    pub fn link_with_rng<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for i in 0..self.hidden.len() {
            let (head, tail) = self.hidden.split_at_mut(i + 1);
            let next = match tail.first() {
                Some(h) => Layer::Hidden(h),
                None => Layer::Output(&self.output),
            };
            head[i].link_with_rng(i + 1, next, rng);
        }
    }

    /// Validates every layer in chain order, reporting the first failure as
    /// `Error::NotReady` with that layer's index.
    pub fn is_ready(&self) -> Result<()> {
        let not_ready = |layer: usize, reason: Error| {
            debug!(layer, %reason, "layer not ready");
            Error::NotReady { layer, reason: Box::new(reason) }
        };

        for (i, layer) in self.hidden.iter().enumerate() {
            layer.is_ready().map_err(|e| not_ready(i, e))?;

            // is_ready() guarantees a successor here.
            if let Some(succ) = layer.successor() {
                let actual = self.layer(i + 1).map(|l| l.input_shape());
                if succ.index != i + 1 || actual != Some(succ.input_shape) {
                    return Err(not_ready(i, Error::shape(format!(
                        "linked to layer {} of width {}, but layer {} has width {:?}",
                        succ.index, succ.input_shape, i + 1, actual
                    ))));
                }
            }
        }
        self.output.is_ready().map_err(|e| not_ready(self.hidden.len(), e))
    }

    /// Runs `input` through every hidden layer and then the output layer.
    pub fn evaluate(&self, input: &[f64]) -> Result<Vec<f64>> {
        if input.len() != self.input_shape() {
            return Err(Error::shape(format!(
                "network expects {} inputs, got {}",
                self.input_shape(), input.len()
            )));
        }

        self.is_ready()?;

        let mut current = input.to_vec();
        for layer in &self.hidden {
            current = layer.evaluate(&current)?;
        }
        self.output.evaluate(&current)
    }

    pub fn input_shape(&self) -> usize {
        self.hidden.first().map_or(0, |l| l.input_shape())
    }

    pub fn output_shape(&self) -> usize {
        self.output.input_shape()
    }

    /// Width of every layer in chain order, output layer last.
    pub fn widths(&self) -> Vec<usize> {
        self.layers().map(|l| l.input_shape()).collect()
    }

    pub fn hidden_layers(&self) -> &[HiddenLayer] {
        &self.hidden
    }

    pub fn output_layer(&self) -> &OutputLayer {
        &self.output
    }

    /// Layer at `index` in chain order; `hidden_layers().len()` is the output layer.
    pub fn layer(&self, index: usize) -> Option<Layer<'_>> {
        match index.cmp(&self.hidden.len()) {
            std::cmp::Ordering::Less => Some(Layer::Hidden(&self.hidden[index])),
            std::cmp::Ordering::Equal => Some(Layer::Output(&self.output)),
            std::cmp::Ordering::Greater => None,
        }
    }

    pub fn layers(&self) -> impl Iterator<Item = Layer<'_>> {
        self.hidden.iter().map(Layer::Hidden)
            .chain(std::iter::once(Layer::Output(&self.output)))
    }

    /// Encodes the network in the binary model format.
    pub fn to_binary(&self) -> Result<Vec<u8>> {
        codec::encode(self)
    }

    pub fn from_binary(bytes: &[u8]) -> Result<Network> {
        codec::decode(bytes)
    }

    pub fn save_binary<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = self.to_binary()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    pub fn load_binary<P: AsRef<Path>>(path: P) -> Result<Network> {
        let bytes = std::fs::read(path)?;
        Network::from_binary(&bytes)
    }

    /// Serializes the network to a pretty-printed JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.is_ready()?;
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a network written by `save_json`, rejecting files whose
    /// shapes do not line up.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Network> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let network: Network = serde_json::from_reader(reader)?;
        if network.hidden.is_empty() {
            return Err(Error::shape("a network needs at least one hidden layer"));
        }
        network.is_ready()?;
        Ok(network)
    }
}
