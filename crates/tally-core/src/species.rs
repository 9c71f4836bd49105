//! Per-species count and kinetic-energy statistics.

/// Count, energy sum, and energy extrema for one particle species observed
/// at one tally location.
///
/// A `ParticleStats` is always constructed from its first sample
/// ([`from_sample`](ParticleStats::from_sample)), so the extrema are backed
/// by at least one real observation: there is no "empty" state and no
/// sentinel values. The mean is computed on demand and never stored, which
/// is what keeps [`merge`](ParticleStats::merge) a plain sum.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleStats {
    count: u64,
    energy_sum: f64,
    energy_min: f64,
    energy_max: f64,
}

impl ParticleStats {
    /// Statistics for a single observation with kinetic energy `energy`.
    pub fn from_sample(energy: f64) -> Self {
        Self {
            count: 1,
            energy_sum: energy,
            energy_min: energy,
            energy_max: energy,
        }
    }

    /// Fold one more observation in. Extrema move only on strict
    /// comparison.
    pub fn record(&mut self, energy: f64) {
        self.count += 1;
        self.energy_sum += energy;
        if energy < self.energy_min {
            self.energy_min = energy;
        }
        if energy > self.energy_max {
            self.energy_max = energy;
        }
    }

    /// Combine another species' statistics into this one: counts and sums
    /// add, extrema widen. Commutative and associative.
    pub fn merge(&mut self, other: &ParticleStats) {
        self.count += other.count;
        self.energy_sum += other.energy_sum;
        if other.energy_min < self.energy_min {
            self.energy_min = other.energy_min;
        }
        if other.energy_max > self.energy_max {
            self.energy_max = other.energy_max;
        }
    }

    /// Number of observations.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Sum of the kinetic energies of all observations.
    pub fn energy_sum(&self) -> f64 {
        self.energy_sum
    }

    /// Smallest observed kinetic energy.
    pub fn energy_min(&self) -> f64 {
        self.energy_min
    }

    /// Largest observed kinetic energy.
    pub fn energy_max(&self) -> f64 {
        self.energy_max
    }

    /// Mean kinetic energy over all observations.
    ///
    /// `count` is at least 1 by construction, so this never divides by
    /// zero.
    pub fn mean_energy(&self) -> f64 {
        self.energy_sum / self.count as f64
    }
}
