use std::fmt;
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};
use spp_core::errors::{ErrorInfo, SppError};
use spp_core::kinematics::{energy_threshold, in_physical_region};
use spp_core::{
    DifferentialXSec, Interaction, KinePhaseSpace, Resonance, SingleResonanceXSec, SppChannel,
    XSecIntegrator,
};
use tracing::{debug, info};

use crate::catalog::ResonanceList;
use crate::codec::{round_f64, stable_hash};
use crate::weights::{ChannelTables, ChannelWeight};

fn binding_error(code: &str, message: impl Into<String>) -> SppError {
    SppError::Binding(ErrorInfo::new(code, message.into()))
}

/// Collaborators attached to an engine once, at bind time.
#[derive(Clone)]
pub struct Binding {
    /// Resonances to sum, in summation order.
    pub catalog: ResonanceList,
    /// Single-resonance differential model.
    pub model: Arc<dyn SingleResonanceXSec>,
    /// Phase-space integrator used by [`ReinSeghalSppXSec::integral`].
    pub integrator: Arc<dyn XSecIntegrator>,
    /// Isospin and branching-ratio tables.
    pub tables: Arc<ChannelTables>,
    /// Optional upper cut on the hadronic invariant mass.
    pub wcut: Option<f64>,
}

impl Binding {
    /// Binding with the shared standard weight tables and no W cut.
    pub fn new(
        catalog: ResonanceList,
        model: Arc<dyn SingleResonanceXSec>,
        integrator: Arc<dyn XSecIntegrator>,
    ) -> Self {
        Self {
            catalog,
            model,
            integrator,
            tables: ChannelTables::shared_standard(),
            wcut: None,
        }
    }

    /// Replaces the weight tables.
    pub fn with_tables(mut self, tables: Arc<ChannelTables>) -> Self {
        self.tables = tables;
        self
    }

    /// Sets the W cut.
    pub fn with_wcut(mut self, wcut: Option<f64>) -> Self {
        self.wcut = wcut;
        self
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("catalog", &self.catalog.to_string())
            .field("model", &self.model.name())
            .field("integrator", &self.integrator.name())
            .field("wcut", &self.wcut)
            .finish_non_exhaustive()
    }
}

/// Contribution of one resonance to the differential cross section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResonanceContribution {
    /// Contributing resonance.
    pub resonance: Resonance,
    /// Channel weight applied to the raw cross section.
    pub weight: ChannelWeight,
    /// Raw Breit–Wigner-weighted cross section; `None` when the resonance was
    /// skipped because its weight is known to vanish.
    pub raw: Option<f64>,
    /// Weighted contribution.
    pub value: f64,
}

#[derive(Serialize)]
struct FingerprintPayload<'a> {
    catalog: &'a ResonanceList,
    model: &'a str,
    integrator: &'a str,
    tables: crate::weights::WeightTableSpec,
    wcut: Option<f64>,
}

struct BoundState {
    binding: Binding,
    fingerprint: String,
}

/// Rein–Seghal exclusive single-pion production cross section: an
/// incoherent sum of single-resonance cross sections weighted by isospin
/// Clebsch–Gordan coefficients and Nπ branching ratios.
///
/// The engine is created unbound and bound exactly once; a second
/// [`bind`](Self::bind) is rejected, so the configuration is frozen for the
/// lifetime of the instance and concurrent read-only use needs no locking.
#[derive(Default)]
pub struct ReinSeghalSppXSec {
    state: OnceLock<BoundState>,
}

impl fmt::Debug for ReinSeghalSppXSec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.state.get() {
            Some(state) => f
                .debug_struct("ReinSeghalSppXSec")
                .field("binding", &state.binding)
                .field("fingerprint", &state.fingerprint)
                .finish(),
            None => f.write_str("ReinSeghalSppXSec(unbound)"),
        }
    }
}

impl ReinSeghalSppXSec {
    /// Creates an unbound engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine and binds it in one step.
    pub fn bound(binding: Binding) -> Result<Self, SppError> {
        let engine = Self::new();
        engine.bind(binding)?;
        Ok(engine)
    }

    /// Attaches the catalog, model, integrator and tables. Fails when the
    /// binding is incomplete or the engine is already bound.
    pub fn bind(&self, binding: Binding) -> Result<(), SppError> {
        if self.state.get().is_some() {
            return Err(already_bound());
        }
        if binding.catalog.is_empty() {
            return Err(binding_error(
                "empty-catalog",
                "resonance catalog must list at least one resonance",
            ));
        }
        if let Some(wcut) = binding.wcut {
            if !wcut.is_finite() || wcut <= 0.0 {
                return Err(SppError::Binding(
                    ErrorInfo::new("invalid-wcut", "W cut must be finite and positive")
                        .with_context("wcut", wcut.to_string()),
                ));
            }
        }
        let fingerprint = stable_hash(&FingerprintPayload {
            catalog: &binding.catalog,
            model: binding.model.name(),
            integrator: binding.integrator.name(),
            tables: binding.tables.to_spec(),
            wcut: binding.wcut.map(round_f64),
        })?;
        info!(
            resonances = binding.catalog.len(),
            model = binding.model.name(),
            integrator = binding.integrator.name(),
            fingerprint = %fingerprint,
            "binding rein-seghal spp engine"
        );
        self.state
            .set(BoundState {
                binding,
                fingerprint,
            })
            .map_err(|_| already_bound())
    }

    /// Returns true once [`bind`](Self::bind) succeeded.
    pub fn is_bound(&self) -> bool {
        self.state.get().is_some()
    }

    fn bound_state(&self) -> Result<&BoundState, SppError> {
        self.state.get().ok_or_else(|| {
            SppError::Binding(
                ErrorInfo::new("unbound", "engine used before binding")
                    .with_hint("call bind() or configure() first"),
            )
        })
    }

    /// The bound resonance catalog.
    pub fn catalog(&self) -> Result<&ResonanceList, SppError> {
        Ok(&self.bound_state()?.binding.catalog)
    }

    /// Stable hash of the bound configuration.
    pub fn fingerprint(&self) -> Result<&str, SppError> {
        Ok(&self.bound_state()?.fingerprint)
    }

    /// Checks that the interaction belongs to the weak resonant single-pion
    /// family with a supported probe and a consistent nucleon target, and
    /// names its exclusive channel. The error code says which check failed.
    pub fn require_process(&self, interaction: &Interaction) -> Result<SppChannel, SppError> {
        let process = interaction.process;
        let reject = |code: &str, message: &str| {
            SppError::InvalidProcess(
                ErrorInfo::new(code, message)
                    .with_context("probe", format!("{:?}", interaction.probe))
                    .with_context("process", format!("{:?}", process)),
            )
        };
        if !process.is_weak() {
            return Err(reject("not-weak", "only weak CC and NC processes are handled"));
        }
        if !process.is_resonant() {
            return Err(reject("not-resonant", "only resonant scattering is handled"));
        }
        let probe = interaction.probe;
        if !probe.is_neutrino() && !probe.is_antineutrino() {
            return Err(reject("unsupported-probe", "probe must be a neutrino or antineutrino"));
        }
        if !interaction.target.hit_nucleon_is_consistent() {
            return Err(reject(
                "inconsistent-target",
                "hit nucleon is missing or cannot exist in the target",
            ));
        }
        SppChannel::from_interaction(interaction).ok_or_else(|| {
            reject(
                "no-channel",
                "final state is not an exclusive single-pion channel of this probe",
            )
        })
    }

    /// Returns true when [`require_process`](Self::require_process) accepts
    /// the interaction. Not applicable is not an error here.
    pub fn valid_process(&self, interaction: &Interaction) -> bool {
        self.require_process(interaction).is_ok()
    }

    /// Returns true when the probe energy is above threshold and any fixed
    /// kinematic variable lies inside the physical region.
    pub fn valid_kinematics(&self, interaction: &Interaction) -> bool {
        let energy = interaction.probe_energy;
        if !energy.is_finite() || energy <= energy_threshold(interaction) {
            return false;
        }
        let wcut = self.state.get().and_then(|state| state.binding.wcut);
        in_physical_region(interaction, wcut)
    }

    /// Differential cross section in the requested phase space. Returns zero
    /// for inapplicable processes and for points outside the physical region.
    pub fn xsec(&self, interaction: &Interaction, kps: KinePhaseSpace) -> Result<f64, SppError> {
        let state = self.bound_state()?;
        let Some(channel) = self.applicable_channel(interaction) else {
            return Ok(0.0);
        };
        if let Some(res) = state.binding.catalog.single() {
            return Ok(contribution(state, interaction, kps, channel, res)?.value);
        }
        let mut sum = 0.0;
        for res in state.binding.catalog.iter() {
            sum += contribution(state, interaction, kps, channel, res)?.value;
        }
        Ok(sum)
    }

    /// Per-resonance breakdown of [`xsec`](Self::xsec) in catalog order;
    /// empty when the interaction is not applicable.
    pub fn contributions(
        &self,
        interaction: &Interaction,
        kps: KinePhaseSpace,
    ) -> Result<Vec<ResonanceContribution>, SppError> {
        let state = self.bound_state()?;
        let Some(channel) = self.applicable_channel(interaction) else {
            return Ok(Vec::new());
        };
        state
            .binding
            .catalog
            .iter()
            .map(|res| contribution(state, interaction, kps, channel, res))
            .collect()
    }

    /// Cross section integrated over the physical region by the bound
    /// integrator. Inapplicable processes and sub-threshold energies give
    /// zero; integrator failures are returned unchanged.
    pub fn integral(&self, interaction: &Interaction) -> Result<f64, SppError> {
        let state = self.bound_state()?;
        if !self.valid_process(interaction) {
            return Ok(0.0);
        }
        let energy = interaction.probe_energy;
        if !energy.is_finite() || energy <= energy_threshold(interaction) {
            return Ok(0.0);
        }
        let value = state.binding.integrator.integrate(self, interaction)?;
        if !value.is_finite() || value < 0.0 {
            return Err(SppError::Integration(
                ErrorInfo::new(
                    "invalid-result",
                    "integrator returned a negative or non-finite value",
                )
                .with_context("integrator", state.binding.integrator.name())
                .with_context("value", value.to_string()),
            ));
        }
        debug!(
            energy,
            value,
            integrator = state.binding.integrator.name(),
            "integrated spp cross section"
        );
        Ok(value)
    }

    fn applicable_channel(&self, interaction: &Interaction) -> Option<SppChannel> {
        let channel = self.require_process(interaction).ok()?;
        self.valid_kinematics(interaction).then_some(channel)
    }
}

fn already_bound() -> SppError {
    SppError::Binding(
        ErrorInfo::new(
            "already-bound",
            "engine configuration is frozen after the first bind",
        )
        .with_hint("create a new engine to use a different configuration"),
    )
}

fn contribution(
    state: &BoundState,
    interaction: &Interaction,
    kps: KinePhaseSpace,
    channel: SppChannel,
    res: Resonance,
) -> Result<ResonanceContribution, SppError> {
    let weight = state
        .binding
        .tables
        .weight(res, channel)
        .map_err(|err| err.with_context("channel", channel))?;
    if weight.is_forbidden() {
        return Ok(ResonanceContribution {
            resonance: res,
            weight,
            raw: None,
            value: 0.0,
        });
    }
    let raw = state.binding.model.xsec(interaction, res, kps)?;
    if !raw.is_finite() || raw < 0.0 {
        return Err(SppError::Model(
            ErrorInfo::new(
                "invalid-output",
                "single-resonance model returned a negative or non-finite value",
            )
            .with_context("model", state.binding.model.name())
            .with_context("resonance", res.name())
            .with_context("value", raw.to_string()),
        ));
    }
    let value = raw * weight.value();
    debug!(resonance = %res, raw, weight = weight.value(), value, "resonance contribution");
    Ok(ResonanceContribution {
        resonance: res,
        weight,
        raw: Some(raw),
        value,
    })
}

impl DifferentialXSec for ReinSeghalSppXSec {
    fn xsec(&self, interaction: &Interaction, kps: KinePhaseSpace) -> Result<f64, SppError> {
        ReinSeghalSppXSec::xsec(self, interaction, kps)
    }

    fn valid_process(&self, interaction: &Interaction) -> bool {
        ReinSeghalSppXSec::valid_process(self, interaction)
    }

    fn w_cut(&self) -> Option<f64> {
        self.state.get().and_then(|state| state.binding.wcut)
    }
}
