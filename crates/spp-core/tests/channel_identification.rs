use spp_core::{
    Interaction, InteractionType, Nucleon, Pion, Probe, ScatteringType, SppChannel, Target,
};

fn spp(
    probe: Probe,
    target: Target,
    current: InteractionType,
    n: Nucleon,
    pi: Pion,
) -> Interaction {
    Interaction::resonant_spp(probe, 2.0, target, current, n, pi)
}

#[test]
fn every_channel_is_recovered_from_its_interaction() {
    for channel in SppChannel::ALL {
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
        let interaction = spp(
            probe,
            target,
            current,
            channel.final_nucleon(),
            channel.final_pion(),
        );
        assert_eq!(SppChannel::from_interaction(&interaction), Some(channel));
    }
}

#[test]
fn channels_conserve_charge() {
    for channel in SppChannel::ALL {
        let anti = channel.to_string().starts_with("nubar");
        let lepton_charge = match (channel.is_charged_current(), anti) {
            (false, _) => 0,
            (true, false) => -1,
            (true, true) => 1,
        };
        let initial = channel.initial_nucleon().charge();
        let fin = channel.final_nucleon().charge() + channel.final_pion().charge() + lepton_charge;
        assert_eq!(initial, fin, "{channel}");
    }
}

#[test]
fn charge_violating_final_state_has_no_channel() {
    let interaction = spp(
        Probe::NuMu,
        Target::free_neutron(),
        InteractionType::WeakCC,
        Nucleon::Proton,
        Pion::PiPlus,
    );
    assert_eq!(SppChannel::from_interaction(&interaction), None);
}

#[test]
fn charged_lepton_and_em_processes_have_no_channel() {
    let electron = spp(
        Probe::Electron,
        Target::free_proton(),
        InteractionType::EM,
        Nucleon::Proton,
        Pion::PiZero,
    );
    assert_eq!(SppChannel::from_interaction(&electron), None);

    let mut untagged = spp(
        Probe::NuE,
        Target::free_proton(),
        InteractionType::WeakCC,
        Nucleon::Proton,
        Pion::PiPlus,
    );
    untagged.final_state = None;
    untagged.process.scattering = ScatteringType::Resonant;
    assert_eq!(SppChannel::from_interaction(&untagged), None);
}
