pub mod error;
pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod codec;
pub mod loss;

// Convenience re-exports
pub use error::{Error, Result};
pub use math::matrix::Matrix;
pub use activation::activation::ActivationFunction;
pub use layers::{HiddenLayer, Layer, OutputLayer, Successor};
pub use network::network::Network;
pub use network::spec::{LayerSpec, NetworkSpec};
pub use loss::mse::MseLoss;
