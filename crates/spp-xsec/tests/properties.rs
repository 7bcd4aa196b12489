
use std::sync::Arc;

use fixtures::{approx_eq, binding_with, TableModel};
use proptest::prelude::*;
use spp_core::{
    Interaction, InteractionType, KinePhaseSpace, Kinematics, Nucleon, Probe, Resonance,
    SppChannel, Target,
};
use spp_xsec::{BreitWignerParams, BreitWignerResonanceModel, ReinSeghalSppXSec, ResonanceList};

fn channel_interaction(channel: SppChannel, energy: f64) -> Interaction {
    let probe = if channel.to_string().starts_with("nubar") {
        Probe::NuMuBar
    } else {
        Probe::NuMu
    };
    let target = match channel.initial_nucleon() {
        Nucleon::Proton => Target::free_proton(),
        Nucleon::Neutron => Target::free_neutron(),
    };
    let current = if channel.is_charged_current() {
        InteractionType::WeakCC
    } else {
        InteractionType::WeakNC
    };
    Interaction::resonant_spp(
        probe,
        energy,
        target,
        current,
        channel.final_nucleon(),
        channel.final_pion(),
    )
}

fn reference_engine() -> ReinSeghalSppXSec {
    let model = BreitWignerResonanceModel::new(BreitWignerParams::default()).expect("model");
    ReinSeghalSppXSec::bound(binding_with(&Resonance::ALL, Arc::new(model))).expect("bind")
}

proptest! {
    #[test]
    fn differential_xsec_is_nonnegative_and_zero_outside_the_region(
        channel_idx in 0usize..SppChannel::ALL.len(),
        energy in 0.1f64..10.0,
        w in 0.8f64..3.5,
        q2 in 0.0f64..6.0,
    ) {
        let engine = reference_engine();
        let channel = SppChannel::ALL[channel_idx];
        let point = channel_interaction(channel, energy).with_kinematics(Kinematics::wq2(w, q2));
        let value = engine.xsec(&point, KinePhaseSpace::WQ2).unwrap();
        prop_assert!(value.is_finite());
        prop_assert!(value >= 0.0);
        if !engine.valid_kinematics(&point) {
            prop_assert_eq!(value, 0.0);
        }
    }

    #[test]
    fn catalog_permutations_give_the_same_sum(
        order in Just(Resonance::ALL.to_vec()).prop_shuffle(),
        values in proptest::collection::vec(0.0f64..10.0, Resonance::ALL.len()),
        channel_idx in 0usize..SppChannel::ALL.len(),
    ) {
        let model = Resonance::ALL
            .iter()
            .zip(values.iter())
            .fold(TableModel::constant(0.0), |model, (res, value)| {
                model.with_value(*res, *value)
            });
        let model = Arc::new(model);
        let canonical =
            ReinSeghalSppXSec::bound(binding_with(&Resonance::ALL, model.clone())).unwrap();
        let shuffled = ReinSeghalSppXSec::bound(binding_with(&order, model)).unwrap();

        let point = channel_interaction(SppChannel::ALL[channel_idx], 2.0)
            .with_kinematics(Kinematics::wq2(1.3, 0.4));
        let a = canonical.xsec(&point, KinePhaseSpace::WQ2).unwrap();
        let b = shuffled.xsec(&point, KinePhaseSpace::WQ2).unwrap();
        prop_assert!(approx_eq(a, b, 1e-12) || (a == 0.0 && b == 0.0), "{} vs {}", a, b);
    }

    #[test]
    fn catalogs_keep_first_occurrences(
        indices in proptest::collection::vec(0usize..Resonance::ALL.len(), 0..40)
    ) {
        let input: Vec<Resonance> = indices.iter().map(|idx| Resonance::ALL[*idx]).collect();
        let list = ResonanceList::from_resonances(input.iter().copied());
        let mut expected = Vec::new();
        for res in input {
            if !expected.contains(&res) {
                expected.push(res);
            }
        }
        prop_assert_eq!(list.as_slice(), expected.as_slice());
    }
}
