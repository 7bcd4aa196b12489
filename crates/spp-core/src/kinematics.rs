//! Physical-region limits and variable changes for resonant single-pion
//! production off a nucleon at rest.

use serde::{Deserialize, Serialize};

use crate::channel::SppChannel;
use crate::interaction::{Interaction, KinePhaseSpace, Kinematics};

/// Closed interval of a kinematic variable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range1D {
    /// Lower edge.
    pub min: f64,
    /// Upper edge.
    pub max: f64,
}

impl Range1D {
    /// Creates a new interval.
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns true when the interval has positive length.
    pub fn is_open(&self) -> bool {
        self.max > self.min
    }

    /// Returns true when the value lies inside the interval.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Interval length, zero when empty.
    pub fn width(&self) -> f64 {
        (self.max - self.min).max(0.0)
    }
}

/// Hadronic mass of the channel's final nucleon-pion pair at rest.
fn hadronic_threshold_mass(interaction: &Interaction) -> f64 {
    match SppChannel::from_interaction(interaction) {
        Some(channel) => channel.final_nucleon().mass() + channel.final_pion().mass(),
        None => match interaction.final_state {
            Some(fs) => fs.nucleon.mass() + fs.pion.mass(),
            None => interaction.hit_nucleon_mass(),
        },
    }
}

/// Centre-of-mass energy squared.
pub fn mandelstam_s(interaction: &Interaction) -> f64 {
    let m = interaction.hit_nucleon_mass();
    let ml_in = interaction.probe.mass();
    m * m + ml_in * ml_in + 2.0 * m * interaction.probe_energy
}

/// Lowest probe energy at which the exclusive final state can be produced.
pub fn energy_threshold(interaction: &Interaction) -> f64 {
    let m = interaction.hit_nucleon_mass();
    let ml = interaction.final_lepton_mass();
    let total = hadronic_threshold_mass(interaction) + ml;
    ((total * total - m * m) / (2.0 * m)).max(0.0)
}

/// Allowed hadronic invariant mass range, clipped from above by `wcut` when
/// given.
pub fn w_limits(interaction: &Interaction, wcut: Option<f64>) -> Range1D {
    let w_min = hadronic_threshold_mass(interaction);
    let mut w_max = mandelstam_s(interaction).sqrt() - interaction.final_lepton_mass();
    if let Some(cut) = wcut {
        if cut > 0.0 {
            w_max = w_max.min(cut);
        }
    }
    Range1D::new(w_min, w_max)
}

/// Allowed Q² range at fixed W.
pub fn q2_limits_w(interaction: &Interaction, w: f64) -> Range1D {
    let m = interaction.hit_nucleon_mass();
    let ml = interaction.final_lepton_mass();
    let s = mandelstam_s(interaction);
    let sqrt_s = s.sqrt();
    if !(w > 0.0) || sqrt_s <= 0.0 {
        return Range1D::new(0.0, 0.0);
    }
    let e_probe_cm = (s - m * m) / (2.0 * sqrt_s);
    let e_lepton_cm = (s + ml * ml - w * w) / (2.0 * sqrt_s);
    let p_lepton_cm = (e_lepton_cm * e_lepton_cm - ml * ml).max(0.0).sqrt();
    let q2_min = -ml * ml + 2.0 * e_probe_cm * (e_lepton_cm - p_lepton_cm);
    let q2_max = -ml * ml + 2.0 * e_probe_cm * (e_lepton_cm + p_lepton_cm);
    Range1D::new(q2_min.max(0.0), q2_max.max(0.0))
}

/// Converts (x, y) into (W, Q²). Returns `None` when W² is not positive.
pub fn xy_to_wq2(interaction: &Interaction, x: f64, y: f64) -> Option<(f64, f64)> {
    let m = interaction.hit_nucleon_mass();
    let e = interaction.probe_energy;
    let q2 = 2.0 * m * e * x * y;
    let w2 = m * m + 2.0 * m * e * y * (1.0 - x);
    (w2 > 0.0).then(|| (w2.sqrt(), q2))
}

/// Converts (W, Q²) into (x, y). Returns `None` for a vanishing energy
/// transfer.
pub fn wq2_to_xy(interaction: &Interaction, w: f64, q2: f64) -> Option<(f64, f64)> {
    let m = interaction.hit_nucleon_mass();
    let e = interaction.probe_energy;
    let nu = (w * w - m * m + q2) / (2.0 * m);
    if nu <= 0.0 || e <= 0.0 {
        return None;
    }
    Some((q2 / (2.0 * m * nu), nu / e))
}

/// |∂(W, Q²)/∂(x, y)|, the factor turning d²σ/dW dQ² into d²σ/dx dy.
pub fn jacobian_wq2_to_xy(interaction: &Interaction, w: f64, y: f64) -> f64 {
    let m = interaction.hit_nucleon_mass();
    let e = interaction.probe_energy;
    if w <= 0.0 {
        return 0.0;
    }
    2.0 * m * m * e * e * y / w
}

/// Resolves the (W, Q²) point implied by the interaction's kinematics in
/// the requested basis.
pub fn resolve_wq2(interaction: &Interaction, kps: KinePhaseSpace) -> Option<(f64, f64)> {
    let Kinematics { w, q2, x, y } = interaction.kinematics;
    match kps {
        KinePhaseSpace::WQ2 => Some((w?, q2?)),
        KinePhaseSpace::XY => xy_to_wq2(interaction, x?, y?),
    }
}

/// Checks that every kinematic variable present lies inside the physical
/// region for the interaction. An empty kinematic record is accepted.
pub fn in_physical_region(interaction: &Interaction, wcut: Option<f64>) -> bool {
    let kin = interaction.kinematics;
    if kin.is_empty() {
        return true;
    }
    let finite = [kin.w, kin.q2, kin.x, kin.y]
        .iter()
        .flatten()
        .all(|value| value.is_finite());
    if !finite {
        return false;
    }
    if let Some(x) = kin.x {
        if !(x > 0.0 && x < 1.0) {
            return false;
        }
    }
    if let Some(y) = kin.y {
        if !(y > 0.0 && y < 1.0) {
            return false;
        }
    }
    let (w, q2) = match (kin.w, kin.q2, kin.x, kin.y) {
        (Some(w), q2, _, _) => (w, q2),
        (None, _, Some(x), Some(y)) => match xy_to_wq2(interaction, x, y) {
            Some((w, q2)) => (w, Some(q2)),
            None => return false,
        },
        _ => return true,
    };
    if !w_limits(interaction, wcut).contains(w) {
        return false;
    }
    match q2 {
        Some(q2) => q2_limits_w(interaction, w).contains(q2),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::{InteractionType, Nucleon, Pion, Probe, Target};

    fn numu_p(energy: f64) -> Interaction {
        Interaction::resonant_spp(
            Probe::NuMu,
            energy,
            Target::free_proton(),
            InteractionType::WeakCC,
            Nucleon::Proton,
            Pion::PiPlus,
        )
    }

    #[test]
    fn xy_and_wq2_are_inverse() {
        let interaction = numu_p(2.0);
        let (w, q2) = xy_to_wq2(&interaction, 0.3, 0.4).unwrap();
        let (x, y) = wq2_to_xy(&interaction, w, q2).unwrap();
        assert!((x - 0.3).abs() < 1e-12);
        assert!((y - 0.4).abs() < 1e-12);
    }

    #[test]
    fn q2_window_shrinks_towards_w_max() {
        let interaction = numu_p(1.5);
        let w_range = w_limits(&interaction, None);
        let low = q2_limits_w(&interaction, w_range.min + 0.01);
        let high = q2_limits_w(&interaction, w_range.max - 0.01);
        assert!(low.width() > high.width());
    }
}
