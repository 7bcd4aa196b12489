use serde::{Deserialize, Serialize};
use spp_core::errors::{ErrorInfo, SppError};
use spp_core::kinematics::{q2_limits_w, w_limits};
use spp_core::{
    DifferentialXSec, Interaction, KinePhaseSpace, Kinematics, Range1D, RngHandle,
    XSecIntegrator,
};
use tracing::{debug, warn};

fn integration_error(code: &str, message: impl Into<String>) -> SppError {
    SppError::Integration(ErrorInfo::new(code, message.into()))
}

fn config_error(code: &str, message: impl Into<String>) -> SppError {
    SppError::Config(ErrorInfo::new(code, message.into()))
}

fn default_w_intervals() -> usize {
    128
}

fn default_q2_intervals() -> usize {
    32
}

fn default_simpson_tolerance() -> f64 {
    5e-3
}

fn default_w_scale() -> f64 {
    0.1
}

fn default_q2_scale() -> f64 {
    0.5
}

fn default_samples() -> usize {
    100_000
}

fn default_seed() -> u64 {
    0x5eed
}

fn default_mc_tolerance() -> f64 {
    0.05
}

fn evaluate_wq2(
    integrand: &dyn DifferentialXSec,
    interaction: &Interaction,
    w: f64,
    q2: f64,
) -> Result<f64, SppError> {
    let point = interaction.with_kinematics(Kinematics::wq2(w, q2));
    integrand.xsec(&point, KinePhaseSpace::WQ2)
}

/// Parameters of [`SimpsonIntegrator`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimpsonParams {
    /// Number of W sub-intervals (multiple of 4).
    #[serde(default = "default_w_intervals")]
    pub w_intervals: usize,
    /// Number of Q² sub-intervals per W node (multiple of 4).
    #[serde(default = "default_q2_intervals")]
    pub q2_intervals: usize,
    /// Relative agreement required between the full and half resolution
    /// estimates.
    #[serde(default = "default_simpson_tolerance")]
    pub rel_tolerance: f64,
    /// Offset of the logarithmic W map (GeV).
    #[serde(default = "default_w_scale")]
    pub w_scale: f64,
    /// Offset of the logarithmic Q² map (GeV²).
    #[serde(default = "default_q2_scale")]
    pub q2_scale: f64,
}

impl Default for SimpsonParams {
    fn default() -> Self {
        Self {
            w_intervals: default_w_intervals(),
            q2_intervals: default_q2_intervals(),
            rel_tolerance: default_simpson_tolerance(),
            w_scale: default_w_scale(),
            q2_scale: default_q2_scale(),
        }
    }
}

/// Deterministic nested composite Simpson quadrature over the physical
/// (W, Q²) region, on logarithmically mapped axes.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpsonIntegrator {
    params: SimpsonParams,
}

fn simpson_coefficient(idx: usize, intervals: usize) -> f64 {
    if idx == 0 || idx == intervals {
        1.0
    } else if idx % 2 == 1 {
        4.0
    } else {
        2.0
    }
}

impl SimpsonIntegrator {
    /// Creates an integrator after validating its parameters.
    pub fn new(params: SimpsonParams) -> Result<Self, SppError> {
        for (label, value) in [
            ("w_intervals", params.w_intervals),
            ("q2_intervals", params.q2_intervals),
        ] {
            // The convergence check reruns at half resolution, which must
            // itself be an even count.
            if value < 4 || value % 4 != 0 {
                return Err(config_error(
                    "invalid-intervals",
                    format!("{label} must be a positive multiple of 4, got {value}"),
                ));
            }
        }
        if !params.rel_tolerance.is_finite() || params.rel_tolerance <= 0.0 {
            return Err(config_error(
                "invalid-tolerance",
                "relative tolerance must be positive",
            ));
        }
        for (label, value) in [("w_scale", params.w_scale), ("q2_scale", params.q2_scale)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(config_error(
                    "invalid-scale",
                    format!("{label} must be positive, got {value}"),
                ));
            }
        }
        Ok(Self { params })
    }

    /// Integrator parameters.
    pub fn params(&self) -> SimpsonParams {
        self.params
    }

    fn estimate(
        &self,
        integrand: &dyn DifferentialXSec,
        interaction: &Interaction,
        w_intervals: usize,
        q2_intervals: usize,
    ) -> Result<f64, SppError> {
        let w_range = w_limits(interaction, integrand.w_cut());
        if !w_range.is_open() {
            return Ok(0.0);
        }
        let w_axis = LogAxis::new(w_range, self.params.w_scale, w_intervals);
        let mut outer = 0.0;
        for i in 0..=w_intervals {
            let (w, dw_du) = w_axis.node(i);
            let q2_range = q2_limits_w(interaction, w);
            if !q2_range.is_open() {
                continue;
            }
            let q2_axis = LogAxis::new(q2_range, self.params.q2_scale, q2_intervals);
            let mut inner = 0.0;
            for j in 0..=q2_intervals {
                let (q2, dq2_dv) = q2_axis.node(j);
                inner += simpson_coefficient(j, q2_intervals)
                    * evaluate_wq2(integrand, interaction, w, q2)?
                    * dq2_dv;
            }
            outer += simpson_coefficient(i, w_intervals) * dw_du * inner * q2_axis.step / 3.0;
        }
        Ok(outer * w_axis.step / 3.0)
    }
}

/// Uniform grid in `u = ln(x - min + scale)`, which concentrates nodes near
/// the lower edge where resonance peaks and form-factor fall-off live.
struct LogAxis {
    range: Range1D,
    scale: f64,
    start: f64,
    step: f64,
    intervals: usize,
}

impl LogAxis {
    fn new(range: Range1D, scale: f64, intervals: usize) -> Self {
        let start = scale.ln();
        let end = (range.width() + scale).ln();
        Self {
            range,
            scale,
            start,
            step: (end - start) / intervals as f64,
            intervals,
        }
    }

    /// Node position and dx/du at node `idx`.
    fn node(&self, idx: usize) -> (f64, f64) {
        if idx == self.intervals {
            return (self.range.max, self.range.width() + self.scale);
        }
        let exp_u = (self.start + idx as f64 * self.step).exp();
        let x = (self.range.min - self.scale + exp_u).clamp(self.range.min, self.range.max);
        (x, exp_u)
    }
}

impl XSecIntegrator for SimpsonIntegrator {
    fn name(&self) -> &str {
        "simpson"
    }

    fn integrate(
        &self,
        integrand: &dyn DifferentialXSec,
        interaction: &Interaction,
    ) -> Result<f64, SppError> {
        let fine = self.estimate(
            integrand,
            interaction,
            self.params.w_intervals,
            self.params.q2_intervals,
        )?;
        if !fine.is_finite() {
            return Err(integration_error(
                "non-finite",
                "quadrature produced a non-finite value",
            ));
        }
        let coarse = self.estimate(
            integrand,
            interaction,
            self.params.w_intervals / 2,
            self.params.q2_intervals / 2,
        )?;
        if fine == 0.0 && coarse == 0.0 {
            return Ok(0.0);
        }
        let rel = (fine - coarse).abs() / fine.abs().max(coarse.abs());
        debug!(fine, coarse, rel, "simpson estimate");
        if rel > self.params.rel_tolerance {
            warn!(
                rel,
                tolerance = self.params.rel_tolerance,
                energy = interaction.probe_energy,
                "simpson quadrature did not converge"
            );
            return Err(SppError::Integration(
                ErrorInfo::new(
                    "not-converged",
                    "full and half resolution estimates disagree",
                )
                .with_context("relative_difference", rel.to_string())
                .with_context("energy", interaction.probe_energy.to_string())
                .with_hint("increase w_intervals / q2_intervals"),
            ));
        }
        Ok(fine)
    }
}

/// Parameters of [`MonteCarloIntegrator`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MonteCarloParams {
    /// Number of phase-space samples.
    #[serde(default = "default_samples")]
    pub samples: usize,
    /// Master seed; each probe energy draws from its own substream.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Maximum accepted relative standard error.
    #[serde(default = "default_mc_tolerance")]
    pub rel_tolerance: f64,
}

impl Default for MonteCarloParams {
    fn default() -> Self {
        Self {
            samples: default_samples(),
            seed: default_seed(),
            rel_tolerance: default_mc_tolerance(),
        }
    }
}

/// Plain Monte Carlo integration with uniform sampling of W and of Q² inside
/// the W-dependent window.
#[derive(Debug, Clone, PartialEq)]
pub struct MonteCarloIntegrator {
    params: MonteCarloParams,
}

impl MonteCarloIntegrator {
    /// Creates an integrator after validating its parameters.
    pub fn new(params: MonteCarloParams) -> Result<Self, SppError> {
        if params.samples < 2 {
            return Err(config_error(
                "invalid-samples",
                "at least two samples are required",
            ));
        }
        if !params.rel_tolerance.is_finite() || params.rel_tolerance <= 0.0 {
            return Err(config_error(
                "invalid-tolerance",
                "relative tolerance must be positive",
            ));
        }
        Ok(Self { params })
    }

    /// Integrator parameters.
    pub fn params(&self) -> MonteCarloParams {
        self.params
    }
}

impl XSecIntegrator for MonteCarloIntegrator {
    fn name(&self) -> &str {
        "monte-carlo"
    }

    fn integrate(
        &self,
        integrand: &dyn DifferentialXSec,
        interaction: &Interaction,
    ) -> Result<f64, SppError> {
        let w_range = w_limits(interaction, integrand.w_cut());
        if !w_range.is_open() {
            return Ok(0.0);
        }
        let mut rng = RngHandle::substream(self.params.seed, interaction.probe_energy.to_bits());
        let n = self.params.samples as f64;
        let mut sum = 0.0;
        let mut sum_sq = 0.0;
        for _ in 0..self.params.samples {
            let w = rng.uniform(w_range.min, w_range.max);
            let q2_range = q2_limits_w(interaction, w);
            let q2 = rng.uniform(q2_range.min, q2_range.max);
            let volume = w_range.width() * q2_range.width();
            let sample = evaluate_wq2(integrand, interaction, w, q2)? * volume;
            sum += sample;
            sum_sq += sample * sample;
        }
        let mean = sum / n;
        if !mean.is_finite() {
            return Err(integration_error(
                "non-finite",
                "sampling produced a non-finite value",
            ));
        }
        if mean == 0.0 {
            return Ok(0.0);
        }
        let variance = (sum_sq / n - mean * mean).max(0.0);
        let rel_error = (variance / (n - 1.0)).sqrt() / mean.abs();
        debug!(mean, rel_error, samples = self.params.samples, "monte carlo estimate");
        if rel_error > self.params.rel_tolerance {
            warn!(
                rel_error,
                tolerance = self.params.rel_tolerance,
                "monte carlo integration did not converge"
            );
            return Err(SppError::Integration(
                ErrorInfo::new("not-converged", "relative standard error above tolerance")
                    .with_context("relative_error", rel_error.to_string())
                    .with_context("samples", self.params.samples.to_string())
                    .with_hint("increase samples"),
            ));
        }
        Ok(mean)
    }
}
