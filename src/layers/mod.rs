pub mod hidden;
pub mod layer;
pub mod output;

pub use hidden::{HiddenLayer, Successor};
pub use layer::Layer;
pub use output::OutputLayer;
