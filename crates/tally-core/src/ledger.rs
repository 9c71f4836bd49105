//! Per-location particle bookkeeping.
//!
//! A run tracks the particle population at `N + 1` places: each of the
//! `N` absorber layers (secondaries created there) and one extra slot
//! for particles emerging from the downstream face of the whole stack.
//! [`Location`] names the place; [`ParticleLedger`] owns one
//! species-keyed table of [`ParticleStats`] per place.

use indexmap::IndexMap;

use crate::error::TallyError;
use crate::species::ParticleStats;

/// Where a particle was observed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Location {
    /// Emerging from the downstream face of the whole stack.
    Emerged,
    /// Created inside absorber layer `i` (1-based).
    Layer(u32),
}

/// Species-keyed particle statistics for every location in a stack.
///
/// Iteration within a slot follows first-observation order
/// ([`IndexMap`] storage); report generation sorts by species name so
/// merged output never depends on which worker saw a species first.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleLedger {
    /// Slot 0 holds the emerged population; slot `i` holds layer `i`.
    slots: Vec<IndexMap<String, ParticleStats>>,
}

impl ParticleLedger {
    /// A ledger for a stack of `layers` absorber layers, all slots empty.
    pub fn new(layers: u32) -> Self {
        Self {
            slots: vec![IndexMap::new(); layers as usize + 1],
        }
    }

    /// Number of absorber layers this ledger was sized for.
    pub fn layer_count(&self) -> u32 {
        self.slots.len() as u32 - 1
    }

    fn slot_index(&self, location: Location) -> Result<usize, TallyError> {
        match location {
            Location::Emerged => Ok(0),
            Location::Layer(layer) => {
                if layer == 0 || layer > self.layer_count() {
                    Err(TallyError::LayerOutOfRange {
                        layer,
                        layers: self.layer_count(),
                    })
                } else {
                    Ok(layer as usize)
                }
            }
        }
    }

    /// Record one particle of `species` with kinetic energy `energy` at
    /// `location`: starts a fresh [`ParticleStats`] on first observation,
    /// folds the sample in afterwards.
    pub fn record(
        &mut self,
        location: Location,
        species: &str,
        energy: f64,
    ) -> Result<(), TallyError> {
        let slot = self.slot_index(location)?;
        let table = &mut self.slots[slot];
        if let Some(stats) = table.get_mut(species) {
            stats.record(energy);
        } else {
            table.insert(species.to_owned(), ParticleStats::from_sample(energy));
        }
        Ok(())
    }

    /// Statistics for `species` at `location`, if any were recorded.
    pub fn stats(&self, location: Location, species: &str) -> Option<&ParticleStats> {
        let slot = self.slot_index(location).ok()?;
        self.slots[slot].get(species)
    }

    /// Iterate `(species, stats)` at `location` in first-observation order.
    pub fn species_at(
        &self,
        location: Location,
    ) -> Result<impl Iterator<Item = (&str, &ParticleStats)>, TallyError> {
        let slot = self.slot_index(location)?;
        Ok(self.slots[slot]
            .iter()
            .map(|(name, stats)| (name.as_str(), stats)))
    }

    /// `true` if no particle has been recorded anywhere.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|table| table.is_empty())
    }

    /// Fold another ledger into this one slot by slot: shared species
    /// merge their statistics, new species are inserted as-is.
    pub fn merge(&mut self, other: &ParticleLedger) -> Result<(), TallyError> {
        if self.layer_count() != other.layer_count() {
            return Err(TallyError::LayerCountMismatch {
                target: self.layer_count(),
                source: other.layer_count(),
            });
        }
        for (mine, theirs) in self.slots.iter_mut().zip(other.slots.iter()) {
            for (species, stats) in theirs {
                if let Some(existing) = mine.get_mut(species) {
                    existing.merge(stats);
                } else {
                    mine.insert(species.clone(), stats.clone());
                }
            }
        }
        Ok(())
    }

    /// Empty every slot, keeping the slot structure itself. Used by the
    /// end-of-run volatile reset.
    pub fn clear(&mut self) {
        for table in &mut self.slots {
            table.clear();
        }
    }
}
