use serde::{Deserialize, Serialize};
use spp_core::errors::{ErrorInfo, SppError};
use spp_core::kinematics::{in_physical_region, jacobian_wq2_to_xy, resolve_wq2};
use spp_core::{Interaction, KinePhaseSpace, Resonance, SingleResonanceXSec};

fn default_norm() -> f64 {
    1.0
}

fn default_axial_mass() -> f64 {
    1.12
}

/// Parameters of [`BreitWignerResonanceModel`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BreitWignerParams {
    /// Overall normalisation.
    #[serde(default = "default_norm")]
    pub norm: f64,
    /// Axial mass of the dipole form factor (GeV).
    #[serde(default = "default_axial_mass")]
    pub axial_mass: f64,
}

impl Default for BreitWignerParams {
    fn default() -> Self {
        Self {
            norm: default_norm(),
            axial_mass: default_axial_mass(),
        }
    }
}

/// Reference single-resonance model: `norm · BW(W) · G_D(Q²)²` in the
/// (W, Q²) basis. It is a Breit–Wigner-weighted placeholder for a full
/// helicity-amplitude calculation and lets the summation pipeline run end to
/// end.
#[derive(Debug, Clone, PartialEq)]
pub struct BreitWignerResonanceModel {
    params: BreitWignerParams,
}

impl BreitWignerResonanceModel {
    /// Creates a model after validating its parameters.
    pub fn new(params: BreitWignerParams) -> Result<Self, SppError> {
        if !params.norm.is_finite() || params.norm < 0.0 {
            return Err(SppError::Config(
                ErrorInfo::new("invalid-norm", "normalisation must be finite and nonnegative")
                    .with_context("norm", params.norm.to_string()),
            ));
        }
        if !params.axial_mass.is_finite() || params.axial_mass <= 0.0 {
            return Err(SppError::Config(
                ErrorInfo::new("invalid-axial-mass", "axial mass must be positive")
                    .with_context("axial_mass", params.axial_mass.to_string()),
            ));
        }
        Ok(Self { params })
    }

    /// Model parameters.
    pub fn params(&self) -> BreitWignerParams {
        self.params
    }

    fn dipole(&self, q2: f64) -> f64 {
        let ma2 = self.params.axial_mass * self.params.axial_mass;
        1.0 / ((1.0 + q2 / ma2) * (1.0 + q2 / ma2))
    }
}

impl SingleResonanceXSec for BreitWignerResonanceModel {
    fn name(&self) -> &str {
        "breit-wigner"
    }

    fn xsec(
        &self,
        interaction: &Interaction,
        resonance: Resonance,
        kps: KinePhaseSpace,
    ) -> Result<f64, SppError> {
        let Some((w, q2)) = resolve_wq2(interaction, kps) else {
            return Err(SppError::Model(
                ErrorInfo::new(
                    "missing-kinematics",
                    "kinematic point is not fixed in the requested phase space",
                )
                .with_context("phase_space", format!("{kps:?}"))
                .with_context("resonance", resonance.name()),
            ));
        };
        if !in_physical_region(interaction, None) {
            return Ok(0.0);
        }
        let form_factor = self.dipole(q2);
        let d2xsec_dwdq2 = self.params.norm * resonance.breit_wigner(w) * form_factor * form_factor;
        let value = match kps {
            KinePhaseSpace::WQ2 => d2xsec_dwdq2,
            KinePhaseSpace::XY => {
                let y = interaction.kinematics.y.unwrap_or(0.0);
                d2xsec_dwdq2 * jacobian_wq2_to_xy(interaction, w, y)
            }
        };
        Ok(value.max(0.0))
    }
}
