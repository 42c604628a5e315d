//! StatValue - The triple modifier container (Flat → Increased → More)

use serde::{Deserialize, Serialize};

/// A stat that follows the Flat → Increased → More model
///
/// Final value is calculated as:
/// `(base + flat) × (1 + increased) × Π(1 + more)`
///
/// - `base`: value before any source (derived coefficient, enemy template)
/// - `flat`: sum of flat additions from gear, talents, sets and prestige
/// - `increased`: sum of increased% (as decimal, e.g., 0.40 = 40%)
/// - `more`: more% multipliers (as decimal, each multiplies the result)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatValue {
    pub base: f64,
    pub flat: f64,
    pub increased: f64,
    pub more: Vec<f64>,
}

impl StatValue {
    pub fn with_base(base: f64) -> Self {
        StatValue {
            base,
            flat: 0.0,
            increased: 0.0,
            more: Vec::new(),
        }
    }

    /// Calculate final value: (base + flat) × (1 + increased) × Π(1 + more)
    pub fn compute(&self) -> f64 {
        self.total_flat() * self.total_increased_multiplier() * self.total_more_multiplier()
    }

    pub fn add_flat(&mut self, value: f64) {
        self.flat += value;
    }

    /// Add an increased% bonus (as decimal, e.g., 0.40 for 40%)
    pub fn add_increased(&mut self, value: f64) {
        self.increased += value;
    }

    /// Add a more% multiplier (as decimal, e.g., 0.20 for 20% more)
    pub fn add_more(&mut self, value: f64) {
        self.more.push(value);
    }

    /// Get the total flat value (base + flat additions)
    pub fn total_flat(&self) -> f64 {
        self.base + self.flat
    }

    pub fn total_increased_multiplier(&self) -> f64 {
        1.0 + self.increased
    }

    pub fn total_more_multiplier(&self) -> f64 {
        self.more.iter().map(|m| 1.0 + m).product()
    }
}
