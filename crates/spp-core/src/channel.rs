//! Exclusive weak single-pion channels.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::interaction::{FinalState, Interaction, InteractionType, Nucleon, Pion};

/// Exclusive weak single-pion channel, named after the incoming probe
/// (`nu` / `nubar`), the hit nucleon, the current and the outgoing
/// nucleon/pion pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SppChannel {
    /// ν p → l⁻ p π⁺
    NuPCcPPiPlus,
    /// ν n → l⁻ p π⁰
    NuNCcPPiZero,
    /// ν n → l⁻ n π⁺
    NuNCcNPiPlus,
    /// ν p → ν p π⁰
    NuPNcPPiZero,
    /// ν p → ν n π⁺
    NuPNcNPiPlus,
    /// ν n → ν n π⁰
    NuNNcNPiZero,
    /// ν n → ν p π⁻
    NuNNcPPiMinus,
    /// ν̄ n → l⁺ n π⁻
    NuBarNCcNPiMinus,
    /// ν̄ p → l⁺ n π⁰
    NuBarPCcNPiZero,
    /// ν̄ p → l⁺ p π⁻
    NuBarPCcPPiMinus,
    /// ν̄ p → ν̄ p π⁰
    NuBarPNcPPiZero,
    /// ν̄ p → ν̄ n π⁺
    NuBarPNcNPiPlus,
    /// ν̄ n → ν̄ n π⁰
    NuBarNNcNPiZero,
    /// ν̄ n → ν̄ p π⁻
    NuBarNNcPPiMinus,
}

impl SppChannel {
    /// Every channel in canonical order.
    pub const ALL: [SppChannel; 14] = [
        SppChannel::NuPCcPPiPlus,
        SppChannel::NuNCcPPiZero,
        SppChannel::NuNCcNPiPlus,
        SppChannel::NuPNcPPiZero,
        SppChannel::NuPNcNPiPlus,
        SppChannel::NuNNcNPiZero,
        SppChannel::NuNNcPPiMinus,
        SppChannel::NuBarNCcNPiMinus,
        SppChannel::NuBarPCcNPiZero,
        SppChannel::NuBarPCcPPiMinus,
        SppChannel::NuBarPNcPPiZero,
        SppChannel::NuBarPNcNPiPlus,
        SppChannel::NuBarNNcNPiZero,
        SppChannel::NuBarNNcPPiMinus,
    ];

    /// Identifies the channel implied by an interaction. Returns `None` for
    /// non-weak processes, charged-lepton probes, missing hit nucleon or
    /// exclusive tag, and charge-violating final states.
    pub fn from_interaction(interaction: &Interaction) -> Option<Self> {
        let anti = if interaction.probe.is_neutrino() {
            false
        } else if interaction.probe.is_antineutrino() {
            true
        } else {
            return None;
        };
        let hit = interaction.target.hit_nucleon?;
        let FinalState { nucleon, pion } = interaction.final_state?;
        let current = interaction.process.interaction;
        Self::ALL
            .iter()
            .copied()
            .find(|channel| channel.signature() == (anti, hit, current, nucleon, pion))
    }

    fn signature(&self) -> (bool, Nucleon, InteractionType, Nucleon, Pion) {
        use InteractionType::{WeakCC as CC, WeakNC as NC};
        use Nucleon::{Neutron as N, Proton as P};
        use Pion::{PiMinus, PiPlus, PiZero};
        match self {
            SppChannel::NuPCcPPiPlus => (false, P, CC, P, PiPlus),
            SppChannel::NuNCcPPiZero => (false, N, CC, P, PiZero),
            SppChannel::NuNCcNPiPlus => (false, N, CC, N, PiPlus),
            SppChannel::NuPNcPPiZero => (false, P, NC, P, PiZero),
            SppChannel::NuPNcNPiPlus => (false, P, NC, N, PiPlus),
            SppChannel::NuNNcNPiZero => (false, N, NC, N, PiZero),
            SppChannel::NuNNcPPiMinus => (false, N, NC, P, PiMinus),
            SppChannel::NuBarNCcNPiMinus => (true, N, CC, N, PiMinus),
            SppChannel::NuBarPCcNPiZero => (true, P, CC, N, PiZero),
            SppChannel::NuBarPCcPPiMinus => (true, P, CC, P, PiMinus),
            SppChannel::NuBarPNcPPiZero => (true, P, NC, P, PiZero),
            SppChannel::NuBarPNcNPiPlus => (true, P, NC, N, PiPlus),
            SppChannel::NuBarNNcNPiZero => (true, N, NC, N, PiZero),
            SppChannel::NuBarNNcPPiMinus => (true, N, NC, P, PiMinus),
        }
    }

    /// Hit nucleon of the channel.
    pub fn initial_nucleon(&self) -> Nucleon {
        self.signature().1
    }

    /// Outgoing nucleon of the channel.
    pub fn final_nucleon(&self) -> Nucleon {
        self.signature().3
    }

    /// Outgoing pion of the channel.
    pub fn final_pion(&self) -> Pion {
        self.signature().4
    }

    /// Returns true for charged-current channels.
    pub fn is_charged_current(&self) -> bool {
        self.signature().2 == InteractionType::WeakCC
    }
}

impl Display for SppChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (anti, hit, current, nucleon, pion) = self.signature();
        let nuc = |n: Nucleon| match n {
            Nucleon::Proton => "p",
            Nucleon::Neutron => "n",
        };
        let pi = match pion {
            Pion::PiPlus => "pi+",
            Pion::PiZero => "pi0",
            Pion::PiMinus => "pi-",
        };
        let cur = if current == InteractionType::WeakCC {
            "cc"
        } else {
            "nc"
        };
        let probe = if anti { "nubar" } else { "nu" };
        write!(f, "{probe} {} {cur} -> {} {pi}", nuc(hit), nuc(nucleon))
    }
}
