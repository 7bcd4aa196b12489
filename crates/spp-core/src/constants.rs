//! Particle masses in GeV.

/// Proton mass.
pub const PROTON_MASS: f64 = 0.938_272;
/// Neutron mass.
pub const NEUTRON_MASS: f64 = 0.939_565;
/// Charged pion mass.
pub const CHARGED_PION_MASS: f64 = 0.139_570;
/// Neutral pion mass.
pub const NEUTRAL_PION_MASS: f64 = 0.134_977;
/// Electron mass.
pub const ELECTRON_MASS: f64 = 0.000_511;
/// Muon mass.
pub const MUON_MASS: f64 = 0.105_658;
/// Tau mass.
pub const TAU_MASS: f64 = 1.776_86;
