//! Naming functions - pluggable disambiguation
//!
//! A naming function turns one proposed name into `count` distinct names
//! that avoid a forbidden set. Entities sharing a naming function and a
//! proposal are disambiguated together in a single call.

use std::collections::HashSet;
use std::fmt;

use crate::{Error, Result};

/// Produces distinct legal names from a single proposal
pub trait Namer: fmt::Debug + Send + Sync {
    /// Return exactly `count` pairwise distinct names, none of them in
    /// `forbidden`. Must be deterministic for the same inputs.
    fn name(&self, proposed: &str, forbidden: &HashSet<String>, count: usize) -> Result<Vec<String>>;
}

/// Disambiguates by appending a run of filler characters and, for batches,
/// an index.
///
/// A single name tries `Foo`, `Foo_`, `Foo__`, … A batch of three tries
/// `Foo0 Foo1 Foo2`, then `Foo_0 Foo_1 Foo_2`, … with one filler length
/// shared by the whole batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountingNamer {
    filler: char,
}

impl CountingNamer {
    pub const DEFAULT_FILLER: char = '_';

    pub fn new(filler: char) -> Self {
        Self { filler }
    }

    pub fn filler(&self) -> char {
        self.filler
    }

    fn batch(&self, proposed: &str, fill: &str, count: usize) -> Vec<String> {
        if count == 1 {
            return vec![format!("{proposed}{fill}")];
        }
        (0..count).map(|i| format!("{proposed}{fill}{i}")).collect()
    }
}

impl Default for CountingNamer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_FILLER)
    }
}

impl Namer for CountingNamer {
    fn name(&self, proposed: &str, forbidden: &HashSet<String>, count: usize) -> Result<Vec<String>> {
        if count == 0 {
            return Err(Error::InvalidRequest(format!(
                "asked for zero names for `{proposed}`"
            )));
        }

        let mut fill = String::new();
        loop {
            let names = self.batch(proposed, &fill, count);
            if !names.iter().any(|name| forbidden.contains(name)) {
                return Ok(names);
            }
            fill.push(self.filler);
        }
    }
}
