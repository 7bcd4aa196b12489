
use std::sync::Arc;
use std::thread;

use fixtures::{at_point, binding_with, numu_n_cc_p_pi0, simpson, TableModel};
use spp_core::{KinePhaseSpace, Resonance, SppError};
use spp_xsec::{
    Binding, BreitWignerParams, BreitWignerResonanceModel, ReinSeghalSppXSec, ResonanceList,
};

#[test]
fn second_bind_is_rejected_and_configuration_stays_frozen() {
    fixtures::init_tracing();
    let first = Arc::new(TableModel::constant(1.0));
    let second = Arc::new(TableModel::constant(100.0));
    let engine = ReinSeghalSppXSec::bound(binding_with(&[Resonance::P33_1232], first.clone()))
        .expect("first bind");
    let fingerprint = engine.fingerprint().expect("bound").to_string();

    let err = engine
        .bind(binding_with(&Resonance::ALL, second.clone()))
        .expect_err("re-bind rejected");
    assert!(matches!(err, SppError::Binding(_)));
    assert_eq!(err.code(), "already-bound");
    assert!(err.info().hint.is_some());

    assert_eq!(engine.fingerprint().expect("bound"), fingerprint);
    assert_eq!(engine.catalog().expect("bound").len(), 1);
    engine
        .xsec(&at_point(&numu_n_cc_p_pi0(1.0)), KinePhaseSpace::WQ2)
        .expect("xsec");
    assert_eq!(first.calls(), 1);
    assert_eq!(second.calls(), 0);
}

#[test]
fn unbound_engine_reports_binding_error() {
    let engine = ReinSeghalSppXSec::new();
    assert!(!engine.is_bound());
    let interaction = numu_n_cc_p_pi0(1.0);

    let err = engine
        .xsec(&at_point(&interaction), KinePhaseSpace::WQ2)
        .expect_err("unbound");
    assert_eq!(err.code(), "unbound");
    assert_eq!(engine.integral(&interaction).expect_err("unbound").code(), "unbound");
    assert_eq!(engine.fingerprint().expect_err("unbound").code(), "unbound");
    // Classification needs no collaborators.
    assert!(engine.valid_process(&interaction));
}

#[test]
fn empty_catalog_is_rejected_and_engine_stays_unbound() {
    let engine = ReinSeghalSppXSec::new();
    let err = engine
        .bind(Binding::new(
            ResonanceList::new(),
            Arc::new(TableModel::constant(1.0)),
            simpson(),
        ))
        .expect_err("empty catalog");
    assert_eq!(err.code(), "empty-catalog");
    assert!(!engine.is_bound());

    engine
        .bind(binding_with(&[Resonance::P33_1232], Arc::new(TableModel::constant(1.0))))
        .expect("a valid binding still succeeds");
    assert!(engine.is_bound());
}

#[test]
fn non_positive_or_non_finite_w_cut_is_rejected() {
    for wcut in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        let err = ReinSeghalSppXSec::bound(
            binding_with(&[Resonance::P33_1232], Arc::new(TableModel::constant(1.0)))
                .with_wcut(Some(wcut)),
        )
        .expect_err("invalid wcut");
        assert_eq!(err.code(), "invalid-wcut");
    }
}

#[test]
fn fingerprint_tracks_configuration() {
    let model = Arc::new(TableModel::constant(1.0));
    let a = ReinSeghalSppXSec::bound(binding_with(&Resonance::ALL, model.clone())).expect("a");
    let b = ReinSeghalSppXSec::bound(binding_with(&Resonance::ALL, model.clone())).expect("b");
    let c = ReinSeghalSppXSec::bound(binding_with(&Resonance::ALL, model).with_wcut(Some(2.0)))
        .expect("c");
    assert_eq!(a.fingerprint().expect("a"), b.fingerprint().expect("b"));
    assert_ne!(a.fingerprint().expect("a"), c.fingerprint().expect("c"));
    assert_eq!(a.fingerprint().expect("a").len(), 64);
}

#[test]
fn concurrent_evaluation_is_consistent() {
    let model =
        Arc::new(BreitWignerResonanceModel::new(BreitWignerParams::default()).expect("model"));
    let engine = ReinSeghalSppXSec::bound(binding_with(&Resonance::ALL, model)).expect("bind");
    let base = numu_n_cc_p_pi0(1.0);
    let expected = engine
        .xsec(&at_point(&base), KinePhaseSpace::WQ2)
        .expect("reference");

    thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    (0..50)
                        .map(|_| engine.xsec(&at_point(&base), KinePhaseSpace::WQ2))
                        .collect::<Result<Vec<f64>, SppError>>()
                })
            })
            .collect();
        for handle in handles {
            let values = handle.join().expect("thread").expect("xsec");
            assert!(values.iter().all(|value| *value == expected));
        }
    });
}

#[test]
fn racing_binds_have_exactly_one_winner() {
    let engine = ReinSeghalSppXSec::new();
    let outcomes: Vec<Result<(), SppError>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|idx| {
                let engine = &engine;
                scope.spawn(move || {
                    let model = Arc::new(TableModel::constant(idx as f64 + 1.0));
                    engine.bind(binding_with(&[Resonance::P33_1232], model))
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("thread"))
            .collect()
    });
    assert_eq!(outcomes.iter().filter(|outcome| outcome.is_ok()).count(), 1);
    for outcome in outcomes.iter().filter_map(|outcome| outcome.as_ref().err()) {
        assert_eq!(outcome.code(), "already-bound");
    }
    assert!(engine.is_bound());
}
