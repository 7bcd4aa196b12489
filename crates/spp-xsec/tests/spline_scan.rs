
use std::sync::Arc;

use fixtures::{binding_with, numu_n_cc_p_pi0, simpson, ConstantIntegrator, TableModel};
use spp_core::{Resonance, SppChannel};
use spp_xsec::{
    scan_energies, Binding, BreitWignerParams, BreitWignerResonanceModel, ReinSeghalSppXSec,
    ResonanceList, XSecSpline,
};

fn constant_engine(value: f64, wcut: Option<f64>) -> ReinSeghalSppXSec {
    let mut binding =
        binding_with(&[Resonance::P33_1232], Arc::new(TableModel::constant(1.0))).with_wcut(wcut);
    binding.integrator = Arc::new(ConstantIntegrator(value));
    ReinSeghalSppXSec::bound(binding).expect("bind")
}

#[test]
fn knots_are_sorted_deduplicated_and_zero_below_threshold() {
    let engine = constant_engine(2.0, None);
    let spline = scan_energies(&engine, &numu_n_cc_p_pi0(5.0), &[3.0, 0.1, 1.0, 1.0, 2.0])
        .expect("scan");

    let energies: Vec<f64> = spline.knots.iter().map(|knot| knot.energy).collect();
    assert_eq!(energies, vec![0.1, 1.0, 2.0, 3.0]);
    let values: Vec<f64> = spline.knots.iter().map(|knot| knot.xsec).collect();
    assert_eq!(values, vec![0.0, 2.0, 2.0, 2.0]);
    assert_eq!(spline.channel, Some(SppChannel::NuNCcPPiZero));
    assert_eq!(spline.engine_fingerprint, engine.fingerprint().expect("bound"));
}

#[test]
fn evaluation_interpolates_linearly_and_clamps() {
    let engine = constant_engine(2.0, None);
    let spline =
        scan_energies(&engine, &numu_n_cc_p_pi0(1.0), &[0.1, 1.0, 3.0]).expect("scan");

    assert_eq!(spline.evaluate(0.05), 0.0);
    assert!((spline.evaluate(0.55) - 1.0).abs() < 1e-12);
    assert_eq!(spline.evaluate(2.0), 2.0);
    assert_eq!(spline.evaluate(30.0), 2.0);

    let empty = scan_energies(&engine, &numu_n_cc_p_pi0(1.0), &[]).expect("empty scan");
    assert!(empty.knots.is_empty());
    assert_eq!(empty.evaluate(1.0), 0.0);
}

#[test]
fn invalid_energies_are_rejected_before_integration() {
    let engine = constant_engine(1.0, None);
    for bad in [f64::NAN, -1.0, f64::INFINITY] {
        let err = scan_energies(&engine, &numu_n_cc_p_pi0(1.0), &[1.0, bad])
            .expect_err("bad energy");
        assert_eq!(err.code(), "invalid-energy");
    }
}

#[test]
fn spline_hash_is_stable_and_tracks_the_engine() {
    let interaction = numu_n_cc_p_pi0(1.0);
    let grid = [0.5, 1.0, 1.5];
    let a = scan_energies(&constant_engine(1.0, None), &interaction, &grid).expect("a");
    let b = scan_energies(&constant_engine(1.0, None), &interaction, &grid).expect("b");
    let cut = scan_energies(&constant_engine(1.0, Some(1.6)), &interaction, &grid).expect("cut");
    assert_eq!(a.spline_hash, b.spline_hash);
    assert_eq!(a.spline_hash.len(), 64);
    assert_ne!(a.spline_hash, cut.spline_hash);
}

#[test]
fn spline_survives_json_roundtrip() {
    let spline = scan_energies(&constant_engine(1.5, None), &numu_n_cc_p_pi0(1.0), &[0.5, 1.0])
        .expect("scan");
    let text = serde_json::to_string(&spline).expect("serialize");
    let back: XSecSpline = serde_json::from_str(&text).expect("deserialize");
    assert_eq!(back, spline);
}

#[test]
fn unbound_engine_cannot_scan() {
    let engine = ReinSeghalSppXSec::new();
    let err = scan_energies(&engine, &numu_n_cc_p_pi0(1.0), &[1.0]).expect_err("unbound");
    assert_eq!(err.code(), "unbound");
}

#[test]
fn reference_delta_scan_rises_above_threshold() {
    let engine = ReinSeghalSppXSec::bound(Binding::new(
        ResonanceList::from_resonances([Resonance::P33_1232]),
        Arc::new(BreitWignerResonanceModel::new(BreitWignerParams::default()).expect("model")),
        simpson(),
    ))
    .expect("bind");
    let spline =
        scan_energies(&engine, &numu_n_cc_p_pi0(1.0), &[0.2, 0.6, 1.0, 2.0]).expect("scan");
    let values: Vec<f64> = spline.knots.iter().map(|knot| knot.xsec).collect();
    assert_eq!(values[0], 0.0);
    assert!(values.windows(2).all(|pair| pair[1] > pair[0]), "{values:?}");
}
