//! Binary model format.
//!
//! Layout, all integers and floats little endian:
//!
//! ```text
//! header     u32 layer count, then per layer: u32 width, u8 activation tag
//! terminator b'|'
//! weights    every hidden layer's outgoing weights, row-major, f64 each
//! separator  f64 420.0
//! biases     every layer's biases in chain order, f64 each
//! ```
//!
//! The output layer is the last header entry. Section lengths are derived
//! from the header widths, so decoding needs no other framing.

use tracing::{info, warn};

use crate::activation::ActivationFunction;
use crate::error::{Error, Result};
use crate::layers::{HiddenLayer, OutputLayer, Successor};
use crate::math::Matrix;
use crate::network::Network;

pub const HEADER_TERMINATOR: u8 = b'|';
pub const PARAM_SEPARATOR: f64 = 420.0;

const F64_LEN: usize = 8;
const LAYER_HEADER_LEN: usize = 5;

pub fn f64_to_bytes(value: f64) -> [u8; 8] {
    value.to_bits().to_le_bytes()
}

/// Reads one `f64` from the first 8 bytes of `bytes`.
pub fn bytes_to_f64(bytes: &[u8]) -> Result<f64> {
    let raw: [u8; 8] = bytes.get(..F64_LEN)
        .and_then(|b| b.try_into().ok())
        .ok_or_else(|| Error::encoding(format!(
            "need {F64_LEN} bytes for a float, got {}", bytes.len()
        )))?;
    Ok(f64::from_bits(u64::from_le_bytes(raw)))
}

/// Serializes a ready network. Fails with `Error::NotReady` otherwise.
pub fn encode(network: &Network) -> Result<Vec<u8>> {
    network.is_ready()?;

    let widths = network.widths();
    let weight_count: usize = network.hidden_layers().iter()
        .filter_map(|l| l.out_weights())
        .map(|w| w.len())
        .sum();
    let bias_count: usize = widths.iter().sum();

    let mut bytes = Vec::with_capacity(
        4 + widths.len() * LAYER_HEADER_LEN + 1 + (weight_count + 1 + bias_count) * F64_LEN,
    );

    bytes.extend_from_slice(&to_u32(widths.len(), "layer count")?.to_le_bytes());
    for layer in network.layers() {
        bytes.extend_from_slice(&to_u32(layer.input_shape(), "layer width")?.to_le_bytes());
        bytes.push(layer.activation().tag());
    }
    bytes.push(HEADER_TERMINATOR);

    for weights in network.hidden_layers().iter().filter_map(|l| l.out_weights()) {
        for w in weights.iter() {
            bytes.extend_from_slice(&f64_to_bytes(w));
        }
    }

    bytes.extend_from_slice(&f64_to_bytes(PARAM_SEPARATOR));

    for layer in network.layers() {
        for &b in layer.biases() {
            bytes.extend_from_slice(&f64_to_bytes(b));
        }
    }

    info!(layers = widths.len(), weights = weight_count, biases = bias_count, len = bytes.len(), "encoded network");
    Ok(bytes)
}

/// Rebuilds a linked, ready network from bytes produced by `encode`.
pub fn decode(bytes: &[u8]) -> Result<Network> {
    match decode_inner(bytes) {
        Ok(network) => {
            info!(widths = ?network.widths(), len = bytes.len(), "decoded network");
            Ok(network)
        }
        Err(err) => {
            warn!(%err, len = bytes.len(), "rejected model buffer");
            Err(err)
        }
    }
}

fn decode_inner(bytes: &[u8]) -> Result<Network> {
    let mut reader = Reader::new(bytes);

    let count = reader.read_u32()? as usize;
    if count < 2 {
        return Err(Error::encoding(format!(
            "header lists {count} layers; need at least one hidden and one output layer"
        )));
    }
    if count.saturating_mul(LAYER_HEADER_LEN) > reader.remaining() {
        return Err(Error::encoding(format!("header for {count} layers is truncated")));
    }

    let mut layers = Vec::with_capacity(count);
    for i in 0..count {
        let width = reader.read_u32()? as usize;
        if width == 0 {
            return Err(Error::encoding(format!("layer {i} has zero width")));
        }
        let tag = reader.read_u8()?;
        let activation = ActivationFunction::from_tag(tag)
            .ok_or_else(|| Error::encoding(format!("layer {i} has unknown activation tag {tag}")))?;
        layers.push((width, activation));
    }

    let terminator = reader.read_u8()?;
    if terminator != HEADER_TERMINATOR {
        return Err(Error::encoding(format!(
            "expected header terminator {HEADER_TERMINATOR:#04x}, found {terminator:#04x}"
        )));
    }

    let mut weights = Vec::with_capacity(count - 1);
    for pair in layers.windows(2) {
        let (rows, cols) = (pair[0].0, pair[1].0);
        let n = rows.checked_mul(cols)
            .ok_or_else(|| Error::encoding("weight matrix size overflows"))?;
        let flat = reader.read_f64s(n)?;
        weights.push(Matrix::from_flat(rows, cols, &flat).map_err(|e| Error::encoding(e.to_string()))?);
    }

    let separator = reader.read_f64()?;
    if separator.to_bits() != PARAM_SEPARATOR.to_bits() {
        return Err(Error::encoding(format!(
            "expected parameter separator {PARAM_SEPARATOR}, found {separator}"
        )));
    }

    let mut biases = Vec::with_capacity(count);
    for &(width, _) in &layers {
        biases.push(reader.read_f64s(width)?);
    }

    if reader.remaining() != 0 {
        return Err(Error::encoding(format!("{} trailing bytes after biases", reader.remaining())));
    }

    let mut biases = biases.into_iter();
    let mut hidden = Vec::with_capacity(count - 1);
    for (i, w) in weights.into_iter().enumerate() {
        let b = biases.next().ok_or_else(|| Error::encoding("missing hidden biases"))?;
        let successor = Successor { index: i + 1, input_shape: layers[i + 1].0 };
        hidden.push(HiddenLayer::from_parts(layers[i].1, b, w, successor));
    }
    let out_biases = biases.next().ok_or_else(|| Error::encoding("missing output biases"))?;
    let output = OutputLayer::from_parts(layers[count - 1].1, out_biases);

    let network = Network::from_layers(hidden, output)?;
    network.is_ready()?;
    Ok(network)
}

fn to_u32(value: usize, what: &str) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| Error::encoding(format!("{what} {value} does not fit in a u32")))
}

/// Forward-only cursor over a model buffer.
struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Reader { bytes, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(Error::encoding(format!(
                "buffer truncated at offset {}: need {n} bytes, {} left",
                self.pos, self.remaining()
            )));
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn read_u32(&mut self) -> Result<u32> {
        let raw = self.take(4)?;
        Ok(u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]))
    }

    fn read_f64(&mut self) -> Result<f64> {
        bytes_to_f64(self.take(F64_LEN)?)
    }

    fn read_f64s(&mut self, n: usize) -> Result<Vec<f64>> {
        let len = n.checked_mul(F64_LEN)
            .ok_or_else(|| Error::encoding("parameter section size overflows"))?;
        let raw = self.take(len)?;
        raw.chunks_exact(F64_LEN).map(bytes_to_f64).collect()
    }
}
