#![deny(missing_docs)]
#![doc = "Core data model, capability traits and kinematics for resonant single-pion production cross sections."]

pub mod channel;
pub mod constants;
pub mod errors;
pub mod interaction;
pub mod kinematics;
pub mod resonance;
pub mod rng;

pub use channel::SppChannel;
pub use errors::{ErrorInfo, SppError};
pub use interaction::{
    FinalState, Interaction, InteractionType, KinePhaseSpace, Kinematics, Nucleon, Pion,
    ProcessInfo, Probe, ScatteringType, Target,
};
pub use kinematics::Range1D;
pub use resonance::{IsospinClass, Resonance};
pub use rng::{derive_substream_seed, RngHandle};

/// Breit–Wigner-weighted differential cross section for one named resonance.
///
/// Implementations must be pure, return nonnegative values, and accept the
/// phase-space tag they were asked to compute in (or fail with
/// [`SppError::Model`]).
pub trait SingleResonanceXSec: Send + Sync {
    /// Registry name of the model.
    fn name(&self) -> &str;

    /// Differential cross section for producing `resonance` at the
    /// interaction's kinematic point.
    fn xsec(
        &self,
        interaction: &Interaction,
        resonance: Resonance,
        kps: KinePhaseSpace,
    ) -> Result<f64, SppError>;
}

/// Differential cross section over a kinematic point, the integrand handed
/// to a [`XSecIntegrator`].
pub trait DifferentialXSec: Send + Sync {
    /// Differential cross section at the interaction's kinematic point.
    fn xsec(&self, interaction: &Interaction, kps: KinePhaseSpace) -> Result<f64, SppError>;

    /// Returns true when the interaction is applicable at all.
    fn valid_process(&self, interaction: &Interaction) -> bool;

    /// Upper cut on the hadronic invariant mass applied by the integrand.
    fn w_cut(&self) -> Option<f64> {
        None
    }
}

/// Reduces a differential cross section to a scalar over the physically
/// allowed region of an interaction.
pub trait XSecIntegrator: Send + Sync {
    /// Registry name of the integrator.
    fn name(&self) -> &str;

    /// Integrates `integrand` over the allowed region of `interaction`.
    fn integrate(
        &self,
        integrand: &dyn DifferentialXSec,
        interaction: &Interaction,
    ) -> Result<f64, SppError>;
}
