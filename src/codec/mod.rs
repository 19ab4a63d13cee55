pub mod binary;

pub use binary::{bytes_to_f64, decode, encode, f64_to_bytes};
