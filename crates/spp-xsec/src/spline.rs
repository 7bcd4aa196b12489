use serde::{Deserialize, Serialize};
use spp_core::errors::{ErrorInfo, SppError};
use spp_core::{Interaction, SppChannel};
use tracing::debug;

use crate::codec::{round_f64, stable_hash};
use crate::engine::ReinSeghalSppXSec;

/// Integrated cross section at one probe energy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplineKnot {
    /// Probe energy (GeV).
    pub energy: f64,
    /// Integrated cross section.
    pub xsec: f64,
}

/// Integrated cross section tabulated against probe energy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XSecSpline {
    /// Channel the spline was computed for.
    pub channel: Option<SppChannel>,
    /// Knots sorted by energy.
    pub knots: Vec<SplineKnot>,
    /// Fingerprint of the engine configuration.
    pub engine_fingerprint: String,
    /// Stable hash of the knots and the engine fingerprint.
    pub spline_hash: String,
}

impl XSecSpline {
    /// Linear interpolation between knots. Zero below the first knot, the
    /// last value beyond the final knot.
    pub fn evaluate(&self, energy: f64) -> f64 {
        let (Some(first), Some(last)) = (self.knots.first(), self.knots.last()) else {
            return 0.0;
        };
        if energy < first.energy {
            return 0.0;
        }
        if energy >= last.energy {
            return last.xsec;
        }
        let upper = self.knots.partition_point(|knot| knot.energy <= energy);
        let lo = self.knots[upper - 1];
        let hi = self.knots[upper];
        let t = (energy - lo.energy) / (hi.energy - lo.energy);
        lo.xsec + t * (hi.xsec - lo.xsec)
    }
}

/// Integrates the engine at every requested energy. Energies are sorted and
/// deduplicated; the interaction's own energy and kinematics are ignored.
pub fn scan_energies(
    engine: &ReinSeghalSppXSec,
    interaction: &Interaction,
    energies: &[f64],
) -> Result<XSecSpline, SppError> {
    if let Some(bad) = energies.iter().find(|e| !e.is_finite() || **e < 0.0) {
        return Err(SppError::Config(
            ErrorInfo::new("invalid-energy", "scan energies must be finite and nonnegative")
                .with_context("energy", bad.to_string()),
        ));
    }
    let mut grid = energies.to_vec();
    grid.sort_by(f64::total_cmp);
    grid.dedup();

    let template = interaction.with_kinematics(Default::default());
    let mut knots = Vec::with_capacity(grid.len());
    for energy in grid {
        let xsec = engine.integral(&template.with_energy(energy))?;
        debug!(energy, xsec, "spline knot");
        knots.push(SplineKnot { energy, xsec });
    }

    let engine_fingerprint = engine.fingerprint()?.to_string();
    let channel = SppChannel::from_interaction(interaction);
    let rounded: Vec<(f64, f64)> = knots
        .iter()
        .map(|knot| (round_f64(knot.energy), round_f64(knot.xsec)))
        .collect();
    let spline_hash = stable_hash(&(&engine_fingerprint, channel, &rounded))?;
    Ok(XSecSpline {
        channel,
        knots,
        engine_fingerprint,
        spline_hash,
    })
}
