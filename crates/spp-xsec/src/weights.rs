use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};
use spp_core::errors::{ErrorInfo, SppError};
use spp_core::{IsospinClass, Resonance, SppChannel};

fn table_error(code: &str, message: impl Into<String>) -> SppError {
    SppError::Config(ErrorInfo::new(code, message.into()))
}

/// Weight of one resonance in one exclusive channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelWeight {
    /// Squared isospin Clebsch–Gordan coefficient.
    pub isospin: f64,
    /// Branching ratio into the nucleon-pion final state.
    pub branching: f64,
}

impl ChannelWeight {
    /// Combined weight.
    pub fn value(&self) -> f64 {
        self.isospin * self.branching
    }

    /// A known, legitimately vanishing weight (isospin-forbidden or zero
    /// branching ratio).
    pub fn is_forbidden(&self) -> bool {
        self.value() == 0.0
    }
}

/// Isospin coefficient entry in list form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IsospinEntry {
    /// Isospin family of the resonance.
    pub isospin: IsospinClass,
    /// Exclusive channel.
    pub channel: SppChannel,
    /// Squared Clebsch–Gordan coefficient.
    pub coefficient: f64,
}

/// Branching ratio entry in list form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BranchingEntry {
    /// Decaying resonance.
    pub resonance: Resonance,
    /// Fraction of decays into a nucleon and one pion.
    pub ratio: f64,
}

/// Serializable form of the weight tables.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WeightTableSpec {
    /// Isospin coefficients keyed by (isospin family, channel).
    #[serde(default)]
    pub isospin: Vec<IsospinEntry>,
    /// Branching ratios keyed by resonance.
    #[serde(default)]
    pub branching: Vec<BranchingEntry>,
}

const THIRD: f64 = 1.0 / 3.0;
const TWO_THIRDS: f64 = 2.0 / 3.0;

/// Charge pattern of a single-pion final state relative to its initial state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChargeClass {
    /// pπ+ from p or nπ− from n; only I = 3/2 reaches it.
    Doubly,
    /// Neutral pion with the nucleon charge unchanged.
    NeutralPion,
    /// Charged pion with the nucleon charge exchanged.
    ChargedPion,
}

fn charge_class(channel: SppChannel) -> ChargeClass {
    use SppChannel::*;
    match channel {
        NuPCcPPiPlus | NuBarNCcNPiMinus => ChargeClass::Doubly,
        NuNCcPPiZero | NuPNcPPiZero | NuNNcNPiZero | NuBarPCcNPiZero | NuBarPNcPPiZero
        | NuBarNNcNPiZero => ChargeClass::NeutralPion,
        NuNCcNPiPlus | NuPNcNPiPlus | NuNNcPPiMinus | NuBarPCcPPiMinus | NuBarPNcNPiPlus
        | NuBarNNcPPiMinus => ChargeClass::ChargedPion,
    }
}

// I = 1/2 cannot reach the doubly charged channels; elsewhere the Δ
// coefficients swap between the two charge states.
fn standard_isospin(class: IsospinClass, channel: SppChannel) -> f64 {
    match (class, charge_class(channel)) {
        (IsospinClass::Delta, ChargeClass::Doubly) => 1.0,
        (IsospinClass::Delta, ChargeClass::NeutralPion) => TWO_THIRDS,
        (IsospinClass::Delta, ChargeClass::ChargedPion) => THIRD,
        (IsospinClass::Nucleon, ChargeClass::Doubly) => 0.0,
        (IsospinClass::Nucleon, ChargeClass::NeutralPion) => THIRD,
        (IsospinClass::Nucleon, ChargeClass::ChargedPion) => TWO_THIRDS,
    }
}

/// Read-only isospin and branching-ratio lookup tables.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelTables {
    isospin: BTreeMap<(IsospinClass, SppChannel), f64>,
    branching: BTreeMap<Resonance, f64>,
}

impl ChannelTables {
    /// Rein–Seghal isospin coefficients and the tabulated Nπ branching
    /// ratios of every known resonance.
    pub fn standard() -> Self {
        let mut isospin = BTreeMap::new();
        for class in [IsospinClass::Delta, IsospinClass::Nucleon] {
            for channel in SppChannel::ALL {
                isospin.insert((class, channel), standard_isospin(class, channel));
            }
        }
        let branching = Resonance::ALL
            .iter()
            .map(|res| (*res, res.branching_ratio_npi()))
            .collect();
        Self { isospin, branching }
    }

    /// Process-wide standard tables, initialised on first use.
    pub fn shared_standard() -> Arc<ChannelTables> {
        static STANDARD: OnceLock<Arc<ChannelTables>> = OnceLock::new();
        STANDARD.get_or_init(|| Arc::new(Self::standard())).clone()
    }

    /// Tables with no entries at all.
    pub fn empty() -> Self {
        Self {
            isospin: BTreeMap::new(),
            branching: BTreeMap::new(),
        }
    }

    /// Builds validated tables from their list form.
    pub fn from_spec(spec: &WeightTableSpec) -> Result<Self, SppError> {
        let mut tables = Self::empty();
        for entry in &spec.isospin {
            check_unit_interval(entry.coefficient, "isospin coefficient")?;
            if tables
                .isospin
                .insert((entry.isospin, entry.channel), entry.coefficient)
                .is_some()
            {
                return Err(table_error(
                    "duplicate-isospin-entry",
                    format!(
                        "isospin entry for {:?} / {} repeated",
                        entry.isospin, entry.channel
                    ),
                ));
            }
        }
        for entry in &spec.branching {
            check_unit_interval(entry.ratio, "branching ratio")?;
            if tables.branching.insert(entry.resonance, entry.ratio).is_some() {
                return Err(table_error(
                    "duplicate-branching-entry",
                    format!("branching entry for {} repeated", entry.resonance),
                ));
            }
        }
        Ok(tables)
    }

    /// List form of the tables, ordered by key.
    pub fn to_spec(&self) -> WeightTableSpec {
        WeightTableSpec {
            isospin: self
                .isospin
                .iter()
                .map(|(&(isospin, channel), &coefficient)| IsospinEntry {
                    isospin,
                    channel,
                    coefficient,
                })
                .collect(),
            branching: self
                .branching
                .iter()
                .map(|(&resonance, &ratio)| BranchingEntry { resonance, ratio })
                .collect(),
        }
    }

    /// Returns a copy with one branching ratio replaced or added.
    pub fn with_branching_ratio(mut self, res: Resonance, ratio: f64) -> Result<Self, SppError> {
        check_unit_interval(ratio, "branching ratio")?;
        self.branching.insert(res, ratio);
        Ok(self)
    }

    /// Returns a copy with one isospin coefficient replaced or added.
    pub fn with_isospin_coefficient(
        mut self,
        class: IsospinClass,
        channel: SppChannel,
        coefficient: f64,
    ) -> Result<Self, SppError> {
        check_unit_interval(coefficient, "isospin coefficient")?;
        self.isospin.insert((class, channel), coefficient);
        Ok(self)
    }

    /// Returns a copy without the branching ratio of `res`.
    pub fn without_branching_ratio(mut self, res: Resonance) -> Self {
        self.branching.remove(&res);
        self
    }

    /// Squared isospin coefficient for an isospin family in a channel.
    pub fn isospin_coefficient(
        &self,
        class: IsospinClass,
        channel: SppChannel,
    ) -> Result<f64, SppError> {
        self.isospin.get(&(class, channel)).copied().ok_or_else(|| {
            SppError::UnknownChannel(
                ErrorInfo::new(
                    "missing-isospin-entry",
                    "no isospin coefficient for channel",
                )
                .with_context("isospin", format!("{class:?}"))
                .with_context("channel", channel.to_string()),
            )
        })
    }

    /// Nucleon-pion branching ratio of a resonance.
    pub fn branching_ratio(&self, res: Resonance) -> Result<f64, SppError> {
        self.branching.get(&res).copied().ok_or_else(|| {
            SppError::UnknownChannel(
                ErrorInfo::new("missing-branching-entry", "no branching ratio for resonance")
                    .with_context("resonance", res.name()),
            )
        })
    }

    /// Weight of `res` in `channel`. A missing entry is an error, never a
    /// silent zero.
    pub fn weight(&self, res: Resonance, channel: SppChannel) -> Result<ChannelWeight, SppError> {
        let isospin = self
            .isospin_coefficient(res.isospin(), channel)
            .map_err(|err| err.with_context("resonance", res.name()))?;
        let branching = self.branching_ratio(res)?;
        Ok(ChannelWeight { isospin, branching })
    }
}

fn check_unit_interval(value: f64, what: &str) -> Result<(), SppError> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(SppError::Config(
            ErrorInfo::new("weight-out-of-range", format!("{what} must lie in [0, 1]"))
                .with_context("value", value.to_string()),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_coefficients_sum_to_one_per_initial_state() {
        // For a fixed probe, target and current the open charge states of
        // each isospin family exhaust the decay.
        let tables = ChannelTables::standard();
        let pairs = [
            (SppChannel::NuNCcPPiZero, SppChannel::NuNCcNPiPlus),
            (SppChannel::NuPNcPPiZero, SppChannel::NuPNcNPiPlus),
            (SppChannel::NuBarPCcNPiZero, SppChannel::NuBarPCcPPiMinus),
        ];
        for class in [IsospinClass::Delta, IsospinClass::Nucleon] {
            for (a, b) in pairs {
                let sum = tables.isospin_coefficient(class, a).unwrap()
                    + tables.isospin_coefficient(class, b).unwrap();
                assert!((sum - 1.0).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn standard_coefficients_follow_charge_class() {
        let tables = ChannelTables::standard();
        for channel in SppChannel::ALL {
            let delta = tables.isospin_coefficient(IsospinClass::Delta, channel).unwrap();
            let nucleon = tables.isospin_coefficient(IsospinClass::Nucleon, channel).unwrap();
            let (want_delta, want_nucleon) = match charge_class(channel) {
                ChargeClass::Doubly => (1.0, 0.0),
                ChargeClass::NeutralPion => (TWO_THIRDS, THIRD),
                ChargeClass::ChargedPion => (THIRD, TWO_THIRDS),
            };
            assert_eq!((delta, nucleon), (want_delta, want_nucleon), "{channel:?}");
        }
        assert_eq!(charge_class(SppChannel::NuPCcPPiPlus), ChargeClass::Doubly);
        assert_eq!(charge_class(SppChannel::NuBarNCcNPiMinus), ChargeClass::Doubly);
        assert_eq!(charge_class(SppChannel::NuNNcPPiMinus), ChargeClass::ChargedPion);
        assert_eq!(charge_class(SppChannel::NuBarPNcPPiZero), ChargeClass::NeutralPion);
    }

    #[test]
    fn list_form_roundtrip_preserves_tables() {
        let tables = ChannelTables::standard();
        assert_eq!(ChannelTables::from_spec(&tables.to_spec()).unwrap(), tables);
    }
}
