// Demonstration driver: builds a network, evaluates it on an all-ones input,
// and round-trips it through the binary model format.
//
//   cargo run                    # built-in [3,5,7,5,3,3] -> 3 sigmoid network
//   cargo run -- spec.json       # architecture from a NetworkSpec JSON file
//
// Set PERCEPTRON_LOG=debug to see per-layer linking.

use std::str::FromStr;

use perceptron::{Network, NetworkSpec};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

fn main() {
    let level = std::env::var("PERCEPTRON_LOG")
        .ok()
        .and_then(|s| Level::from_str(&s).ok())
        .unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default subscriber failed");

    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> perceptron::Result<()> {
    let spec = match std::env::args().nth(1) {
        Some(path) => NetworkSpec::load_json(&path)?,
        None => NetworkSpec::sigmoid("demo", &[3, 5, 7, 5, 3, 3], 3),
    };
    info!(name = %spec.name, "building network");

    let network = spec.build()?;
    let input = vec![1.0; network.input_shape()];
    let output = network.evaluate(&input)?;
    for (index, out) in output.iter().enumerate() {
        println!("index {index}: {out}");
    }

    let bytes = network.to_binary()?;
    let restored = Network::from_binary(&bytes)?;
    println!(
        "encoded {} bytes; round trip {}",
        bytes.len(),
        if restored == network { "matches" } else { "differs" }
    );
    Ok(())
}
