//! Ordered breakpoint tables for tiered thresholds
//!
//! A table is a list of `(bound, value)` pairs checked in order. The first
//! bound that admits the input wins; inputs past every bound (including NaN,
//! which no comparison admits) fall through to `otherwise`.

/// Upper bound of a single tier
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    /// Admits inputs `<= limit`
    AtMost(f64),
    /// Admits inputs `< limit`
    Below(f64),
}

impl Bound {
    pub fn admits(&self, value: f64) -> bool {
        match *self {
            Bound::AtMost(limit) => value <= limit,
            Bound::Below(limit) => value < limit,
        }
    }
}

/// Immutable ordered breakpoint table
#[derive(Debug, Clone, Copy)]
pub struct Breakpoints<T: Copy + 'static> {
    tiers: &'static [(Bound, T)],
    otherwise: T,
}

impl<T: Copy + 'static> Breakpoints<T> {
    pub const fn new(tiers: &'static [(Bound, T)], otherwise: T) -> Self {
        Self { tiers, otherwise }
    }

    /// Value of the first tier admitting `value`
    pub fn lookup(&self, value: f64) -> T {
        self.tiers
            .iter()
            .find(|(bound, _)| bound.admits(value))
            .map(|(_, tier)| *tier)
            .unwrap_or(self.otherwise)
    }
}
