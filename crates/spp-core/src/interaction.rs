//! Immutable description of a scattering event context.

use serde::{Deserialize, Serialize};

use crate::constants::{
    CHARGED_PION_MASS, ELECTRON_MASS, MUON_MASS, NEUTRAL_PION_MASS, NEUTRON_MASS, PROTON_MASS,
    TAU_MASS,
};

/// Incoming probe species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Probe {
    /// Electron neutrino.
    NuE,
    /// Electron antineutrino.
    NuEBar,
    /// Muon neutrino.
    NuMu,
    /// Muon antineutrino.
    NuMuBar,
    /// Tau neutrino.
    NuTau,
    /// Tau antineutrino.
    NuTauBar,
    /// Electron.
    Electron,
    /// Positron.
    Positron,
    /// Negative muon.
    Muon,
    /// Positive muon.
    AntiMuon,
}

impl Probe {
    /// Returns true for neutrinos (not antineutrinos).
    pub fn is_neutrino(&self) -> bool {
        matches!(self, Probe::NuE | Probe::NuMu | Probe::NuTau)
    }

    /// Returns true for antineutrinos.
    pub fn is_antineutrino(&self) -> bool {
        matches!(self, Probe::NuEBar | Probe::NuMuBar | Probe::NuTauBar)
    }

    /// Mass of the probe itself.
    pub fn mass(&self) -> f64 {
        match self {
            Probe::Electron | Probe::Positron => ELECTRON_MASS,
            Probe::Muon | Probe::AntiMuon => MUON_MASS,
            _ => 0.0,
        }
    }

    /// Mass of the charged lepton emerging from a charged-current reaction.
    pub fn charged_partner_mass(&self) -> f64 {
        match self {
            Probe::NuE | Probe::NuEBar | Probe::Electron | Probe::Positron => ELECTRON_MASS,
            Probe::NuMu | Probe::NuMuBar | Probe::Muon | Probe::AntiMuon => MUON_MASS,
            Probe::NuTau | Probe::NuTauBar => TAU_MASS,
        }
    }
}

/// Nucleon species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Nucleon {
    /// Proton.
    Proton,
    /// Neutron.
    Neutron,
}

impl Nucleon {
    /// Electric charge in units of e.
    pub fn charge(&self) -> i32 {
        match self {
            Nucleon::Proton => 1,
            Nucleon::Neutron => 0,
        }
    }

    /// Rest mass.
    pub fn mass(&self) -> f64 {
        match self {
            Nucleon::Proton => PROTON_MASS,
            Nucleon::Neutron => NEUTRON_MASS,
        }
    }
}

/// Pion species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pion {
    /// Positive pion.
    PiPlus,
    /// Neutral pion.
    PiZero,
    /// Negative pion.
    PiMinus,
}

impl Pion {
    /// Electric charge in units of e.
    pub fn charge(&self) -> i32 {
        match self {
            Pion::PiPlus => 1,
            Pion::PiZero => 0,
            Pion::PiMinus => -1,
        }
    }

    /// Rest mass.
    pub fn mass(&self) -> f64 {
        match self {
            Pion::PiZero => NEUTRAL_PION_MASS,
            _ => CHARGED_PION_MASS,
        }
    }
}

/// Struck target. A free nucleon has `a == 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target {
    /// Atomic number.
    pub z: u32,
    /// Mass number.
    pub a: u32,
    /// Nucleon participating in the hard scattering.
    pub hit_nucleon: Option<Nucleon>,
}

impl Target {
    /// Free proton target with the hit nucleon already selected.
    pub fn free_proton() -> Self {
        Self {
            z: 1,
            a: 1,
            hit_nucleon: Some(Nucleon::Proton),
        }
    }

    /// Free neutron target with the hit nucleon already selected.
    pub fn free_neutron() -> Self {
        Self {
            z: 0,
            a: 1,
            hit_nucleon: Some(Nucleon::Neutron),
        }
    }

    /// Bound nucleus target with an optional hit nucleon.
    pub fn nucleus(z: u32, a: u32, hit_nucleon: Option<Nucleon>) -> Self {
        Self { z, a, hit_nucleon }
    }

    /// Returns true for a single free nucleon.
    pub fn is_free_nucleon(&self) -> bool {
        self.a == 1
    }

    /// Checks that the hit nucleon can exist inside this target.
    pub fn hit_nucleon_is_consistent(&self) -> bool {
        let Some(nucleon) = self.hit_nucleon else {
            return false;
        };
        if self.a == 0 || self.z > self.a {
            return false;
        }
        match nucleon {
            Nucleon::Proton => self.z >= 1,
            Nucleon::Neutron => self.a - self.z >= 1,
        }
    }
}

/// Interaction classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionType {
    /// Weak charged current.
    #[serde(rename = "weak_cc")]
    WeakCC,
    /// Weak neutral current.
    #[serde(rename = "weak_nc")]
    WeakNC,
    /// Electromagnetic.
    #[serde(rename = "em")]
    EM,
}

/// Scattering classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScatteringType {
    /// Baryon resonance production.
    Resonant,
    /// Quasi-elastic scattering.
    QuasiElastic,
    /// Deep inelastic scattering.
    DeepInelastic,
    /// Coherent scattering off the whole nucleus.
    Coherent,
}

/// Process classification attached to an [`Interaction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProcessInfo {
    /// Interaction family.
    pub interaction: InteractionType,
    /// Scattering family.
    pub scattering: ScatteringType,
}

impl ProcessInfo {
    /// Returns true for charged or neutral current processes.
    pub fn is_weak(&self) -> bool {
        matches!(
            self.interaction,
            InteractionType::WeakCC | InteractionType::WeakNC
        )
    }

    /// Returns true for resonant scattering.
    pub fn is_resonant(&self) -> bool {
        self.scattering == ScatteringType::Resonant
    }
}

/// Exclusive hadronic final state of a single-pion reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FinalState {
    /// Outgoing nucleon.
    pub nucleon: Nucleon,
    /// Outgoing pion.
    pub pion: Pion,
}

/// Kinematic variables; unset entries are left unspecified.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Kinematics {
    /// Hadronic invariant mass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub w: Option<f64>,
    /// Momentum transfer squared (positive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q2: Option<f64>,
    /// Bjorken x.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    /// Inelasticity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

impl Kinematics {
    /// Kinematic point fixed in the (W, Q²) basis.
    pub fn wq2(w: f64, q2: f64) -> Self {
        Self {
            w: Some(w),
            q2: Some(q2),
            ..Self::default()
        }
    }

    /// Kinematic point fixed in the (x, y) basis.
    pub fn xy(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    /// Returns true when no variable is set.
    pub fn is_empty(&self) -> bool {
        self.w.is_none() && self.q2.is_none() && self.x.is_none() && self.y.is_none()
    }
}

/// Variable set in which a differential cross section is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KinePhaseSpace {
    /// d²σ/dW dQ².
    #[serde(rename = "wq2")]
    WQ2,
    /// d²σ/dx dy.
    #[serde(rename = "xy")]
    XY,
}

/// Scattering event context. The engine reads it and never mutates it;
/// evaluating at another kinematic point means building a new value with
/// [`Interaction::with_kinematics`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    /// Incoming probe.
    pub probe: Probe,
    /// Probe energy in the target rest frame (GeV).
    pub probe_energy: f64,
    /// Target description.
    pub target: Target,
    /// Process classification.
    pub process: ProcessInfo,
    /// Exclusive final state, if tagged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_state: Option<FinalState>,
    /// Kinematic point, possibly partially specified.
    #[serde(default)]
    pub kinematics: Kinematics,
}

impl Interaction {
    /// Resonant single-pion interaction with an exclusive final state and no
    /// kinematics fixed yet.
    pub fn resonant_spp(
        probe: Probe,
        probe_energy: f64,
        target: Target,
        current: InteractionType,
        nucleon: Nucleon,
        pion: Pion,
    ) -> Self {
        Self {
            probe,
            probe_energy,
            target,
            process: ProcessInfo {
                interaction: current,
                scattering: ScatteringType::Resonant,
            },
            final_state: Some(FinalState { nucleon, pion }),
            kinematics: Kinematics::default(),
        }
    }

    /// Returns a copy evaluated at the given kinematic point.
    pub fn with_kinematics(&self, kinematics: Kinematics) -> Self {
        Self {
            kinematics,
            ..self.clone()
        }
    }

    /// Returns a copy with a different probe energy.
    pub fn with_energy(&self, probe_energy: f64) -> Self {
        Self {
            probe_energy,
            ..self.clone()
        }
    }

    /// Mass of the outgoing lepton for this process.
    pub fn final_lepton_mass(&self) -> f64 {
        match self.process.interaction {
            InteractionType::WeakCC => self.probe.charged_partner_mass(),
            InteractionType::WeakNC | InteractionType::EM => self.probe.mass(),
        }
    }

    /// Mass of the struck nucleon, falling back to the proton mass when the
    /// hit nucleon is not set.
    pub fn hit_nucleon_mass(&self) -> f64 {
        self.target
            .hit_nucleon
            .map(|nucleon| nucleon.mass())
            .unwrap_or(PROTON_MASS)
    }
}
