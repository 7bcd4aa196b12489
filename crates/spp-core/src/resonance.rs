//! Baryon resonance identifiers and their tabulated properties.

use std::f64::consts::PI;
use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::{ErrorInfo, SppError};

/// Isospin family of a baryon resonance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IsospinClass {
    /// I = 3/2 (Δ resonances).
    Delta,
    /// I = 1/2 (N* resonances).
    Nucleon,
}

/// Baryon resonances entering the Rein–Seghal sum.
///
/// Identity is a plain tag; mass, width, isospin and the Nπ branching ratio
/// are looked up from a static table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Resonance {
    /// Δ(1232).
    P33_1232,
    /// N(1535).
    S11_1535,
    /// N(1520).
    D13_1520,
    /// N(1650).
    S11_1650,
    /// N(1700).
    D13_1700,
    /// N(1675).
    D15_1675,
    /// Δ(1620).
    S31_1620,
    /// Δ(1700).
    D33_1700,
    /// N(1440), the Roper.
    P11_1440,
    /// Δ(1600).
    P33_1600,
    /// N(1720).
    P13_1720,
    /// N(1680).
    F15_1680,
    /// Δ(1910).
    P31_1910,
    /// Δ(1920).
    P33_1920,
    /// Δ(1905).
    F35_1905,
    /// Δ(1950).
    F37_1950,
    /// N(1710).
    P11_1710,
    /// N(1990).
    F17_1970,
}

struct ResonanceData {
    name: &'static str,
    mass: f64,
    width: f64,
    isospin: IsospinClass,
    branching_npi: f64,
}

const fn data(
    name: &'static str,
    mass: f64,
    width: f64,
    isospin: IsospinClass,
    branching_npi: f64,
) -> ResonanceData {
    ResonanceData {
        name,
        mass,
        width,
        isospin,
        branching_npi,
    }
}

impl Resonance {
    /// Every resonance known to the table, in canonical order.
    pub const ALL: [Resonance; 18] = [
        Resonance::P33_1232,
        Resonance::S11_1535,
        Resonance::D13_1520,
        Resonance::S11_1650,
        Resonance::D13_1700,
        Resonance::D15_1675,
        Resonance::S31_1620,
        Resonance::D33_1700,
        Resonance::P11_1440,
        Resonance::P33_1600,
        Resonance::P13_1720,
        Resonance::F15_1680,
        Resonance::P31_1910,
        Resonance::P33_1920,
        Resonance::F35_1905,
        Resonance::F37_1950,
        Resonance::P11_1710,
        Resonance::F17_1970,
    ];

    fn data(&self) -> ResonanceData {
        use IsospinClass::{Delta, Nucleon};
        match self {
            Resonance::P33_1232 => data("P33(1232)", 1.232, 0.120, Delta, 0.994),
            Resonance::S11_1535 => data("S11(1535)", 1.535, 0.150, Nucleon, 0.450),
            Resonance::D13_1520 => data("D13(1520)", 1.520, 0.120, Nucleon, 0.550),
            Resonance::S11_1650 => data("S11(1650)", 1.650, 0.150, Nucleon, 0.720),
            Resonance::D13_1700 => data("D13(1700)", 1.700, 0.100, Nucleon, 0.100),
            Resonance::D15_1675 => data("D15(1675)", 1.675, 0.150, Nucleon, 0.450),
            Resonance::S31_1620 => data("S31(1620)", 1.620, 0.150, Delta, 0.250),
            Resonance::D33_1700 => data("D33(1700)", 1.700, 0.300, Delta, 0.150),
            Resonance::P11_1440 => data("P11(1440)", 1.440, 0.350, Nucleon, 0.650),
            Resonance::P33_1600 => data("P33(1600)", 1.600, 0.350, Delta, 0.175),
            Resonance::P13_1720 => data("P13(1720)", 1.720, 0.150, Nucleon, 0.150),
            Resonance::F15_1680 => data("F15(1680)", 1.680, 0.130, Nucleon, 0.650),
            Resonance::P31_1910 => data("P31(1910)", 1.910, 0.250, Delta, 0.225),
            Resonance::P33_1920 => data("P33(1920)", 1.920, 0.200, Delta, 0.125),
            Resonance::F35_1905 => data("F35(1905)", 1.905, 0.350, Delta, 0.100),
            Resonance::F37_1950 => data("F37(1950)", 1.950, 0.300, Delta, 0.400),
            Resonance::P11_1710 => data("P11(1710)", 1.710, 0.100, Nucleon, 0.150),
            Resonance::F17_1970 => data("F17(1970)", 1.970, 0.325, Nucleon, 0.100),
        }
    }

    /// Canonical name, e.g. `P33(1232)`.
    pub fn name(&self) -> &'static str {
        self.data().name
    }

    /// Pole mass in GeV.
    pub fn mass(&self) -> f64 {
        self.data().mass
    }

    /// Total width in GeV.
    pub fn width(&self) -> f64 {
        self.data().width
    }

    /// Isospin family.
    pub fn isospin(&self) -> IsospinClass {
        self.data().isospin
    }

    /// Returns true for I = 3/2 resonances.
    pub fn is_delta(&self) -> bool {
        self.isospin() == IsospinClass::Delta
    }

    /// Tabulated branching ratio into a nucleon and a single pion.
    pub fn branching_ratio_npi(&self) -> f64 {
        self.data().branching_npi
    }

    /// Relativistic Breit–Wigner line shape in W, normalised to unit area
    /// over the full W axis in the narrow-width limit.
    pub fn breit_wigner(&self, w: f64) -> f64 {
        let mass = self.mass();
        let width = self.width();
        if !w.is_finite() || w <= 0.0 {
            return 0.0;
        }
        let delta = w * w - mass * mass;
        let norm = 2.0 * w * mass * width / PI;
        norm / (delta * delta + mass * mass * width * width)
    }
}

impl Display for Resonance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Resonance {
    type Err = SppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let needle = raw.trim();
        Resonance::ALL
            .iter()
            .copied()
            .find(|res| {
                res.name().eq_ignore_ascii_case(needle)
                    || format!("{res:?}").eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| {
                SppError::Config(
                    ErrorInfo::new("unknown-resonance", format!("unknown resonance '{needle}'"))
                        .with_hint("use names such as P33(1232) or S11(1535)"),
                )
            })
    }
}

impl Serialize for Resonance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Resonance {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
