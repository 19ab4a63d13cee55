// Tests for network construction, linking, readiness, and forward evaluation.

use approx::assert_relative_eq;
use perceptron::{
    ActivationFunction, Error, HiddenLayer, Layer, Network, NetworkSpec, OutputLayer,
};
use rand::{rngs::StdRng, SeedableRng};

#[test]
fn test_init_is_ready_for_positive_widths() {
    for (widths, out) in [(vec![1], 1), (vec![3], 3), (vec![4, 8, 2], 5), (vec![300, 257], 256)] {
        let net = Network::init(&widths, out).unwrap();
        assert!(net.is_ready().is_ok(), "{widths:?} -> {out}");
    }
}

#[test]
fn test_init_reference_architecture() {
    let net = Network::init(&[9, 6, 13, 25, 6, 1], 6).unwrap();
    assert_eq!(net.input_shape(), 9);
    assert_eq!(net.hidden_layers()[0].input_shape(), 9);
    assert_eq!(net.output_layer().input_shape(), 6);
    assert_eq!(net.widths(), vec![9, 6, 13, 25, 6, 1, 6]);
}

#[test]
fn test_post_link_wiring() {
    let net = Network::init_seeded(&[4, 7, 2], 5, 17).unwrap();
    let widths = net.widths();
    for (i, layer) in net.hidden_layers().iter().enumerate() {
        let succ = layer.successor().unwrap();
        assert_eq!(succ.index, i + 1);
        assert_eq!(succ.input_shape, widths[i + 1]);

        let w = layer.out_weights().unwrap();
        assert_eq!(w.data.len(), widths[i]);
        assert!(w.data.iter().all(|row| row.len() == widths[i + 1]));
        assert!(w.iter().all(|x| (0.0..1.0).contains(&x)));
    }
}

#[test]
fn test_link_is_idempotent() {
    let mut net = Network::init_seeded(&[3, 4], 2, 8).unwrap();
    let before = net.clone();
    net.link();
    net.link();
    assert_eq!(net, before);
}

#[test]
fn test_manual_chain_links_in_order() {
    let mut rng = StdRng::seed_from_u64(21);
    let hidden = vec![
        HiddenLayer::build_with_rng(2, ActivationFunction::Tanh, &mut rng),
        HiddenLayer::build_with_rng(4, ActivationFunction::ReLU, &mut rng),
    ];
    let out = OutputLayer::build_with_rng(3, ActivationFunction::Identity, &mut rng);
    let mut net = Network::from_layers(hidden, out).unwrap();

    assert!(matches!(net.is_ready(), Err(Error::NotReady { layer: 0, .. })));
    net.link_with_rng(&mut rng);
    assert!(net.is_ready().is_ok());
    assert_eq!(net.evaluate(&[0.3, -0.2]).unwrap().len(), 3);
}

#[test]
fn test_evaluate_single_hidden_layer_range() {
    let net = Network::init(&[3], 3).unwrap();
    let out = net.evaluate(&[1.0, 1.0, 1.0]).unwrap();
    assert_eq!(out.len(), 3);
    assert!(out.iter().all(|&y| y > 0.0 && y < 1.0), "{out:?}");
}

#[test]
fn test_evaluate_matches_hand_computation() {
    let net = Network::init_seeded(&[2, 3], 2, 99).unwrap();
    let input = [0.25, -0.75];
    let s = ActivationFunction::Sigmoid;

    let mut current = input.to_vec();
    for layer in net.hidden_layers() {
        let w = layer.out_weights().unwrap();
        let activated: Vec<f64> = current.iter().zip(layer.biases())
            .map(|(x, b)| s.eval(x + b))
            .collect();
        current = (0..w.cols)
            .map(|j| activated.iter().enumerate().map(|(i, a)| a * w.data[i][j]).sum())
            .collect();
    }
    let expected: Vec<f64> = current.iter().map(|&x| s.eval(x)).collect();

    let out = net.evaluate(&input).unwrap();
    assert_eq!(out.len(), expected.len());
    for (a, b) in out.iter().zip(&expected) {
        assert_relative_eq!(*a, *b, epsilon = 1e-12);
    }
}

#[test]
fn test_evaluate_wrong_length_is_shape_error() {
    let net = Network::init(&[4, 2], 1).unwrap();
    for len in [0, 3, 5, 100] {
        let err = net.evaluate(&vec![0.5; len]).unwrap_err();
        assert!(matches!(err, Error::Shape(_)), "len {len}: {err}");
    }
}

#[test]
fn test_layers_view_covers_chain() {
    let net = Network::init_seeded(&[5, 4], 3, 2).unwrap();
    let views: Vec<Layer<'_>> = net.layers().collect();
    assert_eq!(views.len(), net.widths().len());
    assert!(views[..2].iter().all(|l| !l.is_output()));
    assert!(views[2].is_output());
    assert!(views.iter().all(|l| l.is_ready().is_ok()));
    assert_eq!(views[2].evaluate(&[0.0; 3]).unwrap(), vec![0.5; 3]);
}

#[test]
fn test_shared_network_evaluates_across_threads() {
    let net = Network::init_seeded(&[6, 3], 2, 4).unwrap();
    let expected = net.evaluate(&[1.0; 6]).unwrap();
    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| assert_eq!(net.evaluate(&[1.0; 6]).unwrap(), expected));
        }
    });
}

#[test]
fn test_json_round_trip_through_file() {
    let net = NetworkSpec::sigmoid("json", &[3, 2], 2).with_seed(12).build().unwrap();
    let path = std::env::temp_dir().join(format!("perceptron-net-{}.json", std::process::id()));

    net.save_json(&path).unwrap();
    let loaded = Network::load_json(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded, net);
}

#[test]
fn test_spec_round_trip_through_file() {
    let spec = NetworkSpec::sigmoid("spec", &[4], 1).with_seed(3);
    let path = std::env::temp_dir().join(format!("perceptron-spec-{}.json", std::process::id()));
    let path = path.to_str().unwrap().to_string();

    spec.save_json(&path).unwrap();
    let loaded = NetworkSpec::load_json(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded, spec);
}

#[test]
fn test_load_json_rejects_unlinked_flag() {
    let net = Network::init_seeded(&[3, 2], 2, 1).unwrap();
    let mut value = serde_json::to_value(&net).unwrap();
    value["hidden"][0]["initialized"] = serde_json::Value::Bool(false);

    let path = std::env::temp_dir().join(format!("perceptron-unlinked-{}.json", std::process::id()));
    std::fs::write(&path, serde_json::to_vec(&value).unwrap()).unwrap();
    let loaded = Network::load_json(&path);
    std::fs::remove_file(&path).ok();

    match loaded {
        Err(Error::NotReady { layer: 0, reason }) => assert!(reason.is_shape()),
        other => panic!("expected layer 0 to be rejected, got {other:?}"),
    }
}
