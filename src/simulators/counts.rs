//! Measurement tallies

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Observed count per basis-state label, ordered by label
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Counts {
    counts: BTreeMap<String, usize>,
}

impl Counts {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, label: String) {
        *self.counts.entry(label).or_insert(0) += 1;
    }

    /// Count for `label`, zero if never observed
    pub fn get(&self, label: &str) -> usize {
        self.counts.get(label).copied().unwrap_or(0)
    }

    /// Total number of shots
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Number of distinct outcomes observed
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// The outcome with the highest count; ties go to the smallest label
    pub fn most_frequent(&self) -> Option<(&str, usize)> {
        self.iter()
            .fold(None, |best: Option<(&str, usize)>, (label, count)| match best {
                Some((_, c)) if c >= count => best,
                _ => Some((label, count)),
            })
    }

    /// Relative frequency of each observed outcome
    pub fn frequencies(&self) -> BTreeMap<String, f64> {
        let total = self.total().max(1) as f64;
        self.counts
            .iter()
            .map(|(k, &v)| (k.clone(), v as f64 / total))
            .collect()
    }

    pub fn as_map(&self) -> &BTreeMap<String, usize> {
        &self.counts
    }
}

impl FromIterator<(String, usize)> for Counts {
    fn from_iter<T: IntoIterator<Item = (String, usize)>>(iter: T) -> Self {
        Counts {
            counts: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Counts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (label, count)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "'{}': {}", label, count)?;
        }
        write!(f, "}}")
    }
}
