use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use spp_core::errors::{ErrorInfo, SppError};
use spp_core::Resonance;
use tracing::warn;

/// Ordered, duplicate-free list of resonances to be summed.
///
/// Insertion order is kept because it fixes the summation order; the first
/// occurrence of a repeated resonance wins.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Resonance>", into = "Vec<Resonance>")]
pub struct ResonanceList {
    resonances: Vec<Resonance>,
}

impl ResonanceList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// The full Rein–Seghal resonance set in canonical order.
    pub fn rein_seghal() -> Self {
        Self::from_resonances(Resonance::ALL)
    }

    /// Builds a list, dropping repeated entries.
    pub fn from_resonances(resonances: impl IntoIterator<Item = Resonance>) -> Self {
        let mut list = Self::new();
        for res in resonances {
            if !list.push(res) {
                warn!(resonance = %res, "dropping duplicate resonance from catalog");
            }
        }
        list
    }

    /// Parses a comma separated name list such as `P33(1232),S11(1535)`.
    pub fn parse_names(names: &str) -> Result<Self, SppError> {
        let parsed = names
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| {
                name.parse::<Resonance>().map_err(|err| {
                    SppError::Config(
                        ErrorInfo::new("catalog-parse", err.info().message.clone())
                            .with_context("list", names),
                    )
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_resonances(parsed))
    }

    /// Appends a resonance; returns false when it was already present.
    pub fn push(&mut self, res: Resonance) -> bool {
        if self.resonances.contains(&res) {
            return false;
        }
        self.resonances.push(res);
        true
    }

    /// Number of resonances.
    pub fn len(&self) -> usize {
        self.resonances.len()
    }

    /// Returns true when the list holds no resonance.
    pub fn is_empty(&self) -> bool {
        self.resonances.is_empty()
    }

    /// Returns true when the resonance is listed.
    pub fn contains(&self, res: Resonance) -> bool {
        self.resonances.contains(&res)
    }

    /// The sole resonance when the list has exactly one entry.
    pub fn single(&self) -> Option<Resonance> {
        match self.resonances.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    /// Resonances in summation order.
    pub fn as_slice(&self) -> &[Resonance] {
        &self.resonances
    }

    /// Iterates in summation order.
    pub fn iter(&self) -> impl Iterator<Item = Resonance> + '_ {
        self.resonances.iter().copied()
    }
}

impl From<Vec<Resonance>> for ResonanceList {
    fn from(resonances: Vec<Resonance>) -> Self {
        Self::from_resonances(resonances)
    }
}

impl From<ResonanceList> for Vec<Resonance> {
    fn from(list: ResonanceList) -> Self {
        list.resonances
    }
}

impl FromIterator<Resonance> for ResonanceList {
    fn from_iter<I: IntoIterator<Item = Resonance>>(iter: I) -> Self {
        Self::from_resonances(iter)
    }
}

impl Display for ResonanceList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, res) in self.resonances.iter().enumerate() {
            if idx > 0 {
                f.write_str(",")?;
            }
            write!(f, "{res}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_keep_first_position() {
        let list = ResonanceList::from_resonances([
            Resonance::S11_1535,
            Resonance::P33_1232,
            Resonance::S11_1535,
        ]);
        assert_eq!(
            list.as_slice(),
            &[Resonance::S11_1535, Resonance::P33_1232]
        );
    }

    #[test]
    fn parse_and_display_agree() {
        let list = ResonanceList::parse_names("P33(1232), D13(1520),,S11(1535)").unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list.to_string(), "P33(1232),D13(1520),S11(1535)");
        assert!(ResonanceList::parse_names("P33(1232),X99(2000)").is_err());
    }

    #[test]
    fn single_only_for_one_entry() {
        assert_eq!(ResonanceList::new().single(), None);
        let one = ResonanceList::from_resonances([Resonance::P33_1232]);
        assert_eq!(one.single(), Some(Resonance::P33_1232));
        assert_eq!(ResonanceList::rein_seghal().single(), None);
    }
}
