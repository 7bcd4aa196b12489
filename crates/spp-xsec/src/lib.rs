#![deny(missing_docs)]
#![doc = "Rein-Seghal resonance-summation engine for exclusive single-pion production: catalog, channel weighting, late-bound collaborators, reference model and integrators, energy scans."]

/// Ordered, duplicate-free resonance catalogs.
pub mod catalog;
/// JSON/YAML codecs and stable hashing.
pub mod codec;
/// Engine configuration and the algorithm registry.
pub mod config;
/// Resonance-summation engine.
pub mod engine;
/// Reference phase-space integrators.
pub mod integrate;
/// Reference single-resonance model.
pub mod model;
/// Integrated cross sections tabulated in probe energy.
pub mod spline;
/// Isospin and branching-ratio weight tables.
pub mod weights;

pub use catalog::ResonanceList;
pub use codec::{stable_hash, Format};
pub use config::{decode_params, AlgorithmRegistry, AlgorithmSpec, EngineConfig};
pub use engine::{Binding, ReinSeghalSppXSec, ResonanceContribution};
pub use integrate::{MonteCarloIntegrator, MonteCarloParams, SimpsonIntegrator, SimpsonParams};
pub use model::{BreitWignerParams, BreitWignerResonanceModel};
pub use spline::{scan_energies, SplineKnot, XSecSpline};
pub use weights::{BranchingEntry, ChannelTables, ChannelWeight, IsospinEntry, WeightTableSpec};
