//! The per-worker run accumulator.
//!
//! # Ownership model
//!
//! Exactly one [`RunTally`] exists per worker thread, created before the
//! event loop starts and owned exclusively by that worker until the run
//! ends. Every update is a plain `&mut self` call; there is no locking,
//! no atomics, no sharing. At end of run each worker moves (or sends) its
//! tally to the reducing thread, which folds them with [`RunTally::merge`].
//! The type is `Send` to make that handoff possible; it never needs to be
//! shared.
//!
//! # What is durable, what is volatile
//!
//! Generating a report clears the process and particle tables (they are
//! per-report listings in the summary), while event counts, deposit sums,
//! outcome counters, and the primary description survive for cumulative
//! reporting. [`RunTally::reset`] wipes everything back to construction
//! state for an independent run.

use tally_core::{
    DepositTable, Location, OutcomeCounts, ParticleLedger, PrimaryFate, ProcessCounter, TallyError,
};

// ── Primary ────────────────────────────────────────────────────────

/// The configured primary beam: species name and kinetic energy.
#[derive(Clone, Debug, PartialEq)]
pub struct Primary {
    /// Species name as it should appear in reports.
    pub species: String,
    /// Kinetic energy in internal energy units.
    pub kinetic_energy: f64,
}

// ── RunTally ───────────────────────────────────────────────────────

/// Statistics accumulated by one thread over one run.
///
/// Sized at construction for a fixed number of absorber layers; every
/// layer-indexed operation validates against that count and merging two
/// tallies sized for different stacks is an error. The geometry itself is
/// not held here (only the layer count), so the full stack description
/// is supplied again at report time.
///
/// All sums are raw: nothing in this type ever divides by the event
/// count. Per-event quantities are computed by
/// [`RunReport::generate`](crate::report::RunReport::generate) into the
/// report snapshot, leaving the accumulated state intact.
#[derive(Clone, Debug, PartialEq)]
pub struct RunTally {
    events: u64,
    primary: Option<Primary>,
    deposits: DepositTable,
    outcomes: OutcomeCounts,
    processes: ProcessCounter,
    particles: ParticleLedger,
}

// Compile-time assertion: RunTally is Send, so a worker can move its
// finished tally to the reducing thread.
const _: () = {
    #[allow(dead_code)]
    fn assert_send<T: Send>() {}
    #[allow(dead_code)]
    fn check() {
        assert_send::<RunTally>();
    }
};

impl RunTally {
    /// An empty tally sized for a stack of `layers` absorber layers.
    pub fn new(layers: u32) -> Self {
        Self {
            events: 0,
            primary: None,
            deposits: DepositTable::new(layers),
            outcomes: OutcomeCounts::new(),
            processes: ProcessCounter::new(),
            particles: ParticleLedger::new(layers),
        }
    }

    /// Number of layers this tally was sized for.
    pub fn layer_count(&self) -> u32 {
        self.deposits.layer_count()
    }

    /// Events recorded so far (via [`record_event`](Self::record_event)
    /// and merge).
    pub fn events(&self) -> u64 {
        self.events
    }

    /// The configured primary, if any.
    pub fn primary(&self) -> Option<&Primary> {
        self.primary.as_ref()
    }

    // ── Event-time updates ─────────────────────────────────────────

    /// Describe the primary beam. Unconditional overwrite: with one
    /// primary per run this is set once; if set again, the last writer
    /// wins.
    pub fn set_primary(&mut self, species: impl Into<String>, kinetic_energy: f64) {
        self.primary = Some(Primary {
            species: species.into(),
            kinetic_energy,
        });
    }

    /// Count one completed event. The event loop calls this exactly once
    /// per event; nothing here infers event counts from other statistics.
    pub fn record_event(&mut self) {
        self.events += 1;
    }

    /// Add an energy deposit in `layer` (1-based). Non-positive values
    /// are ignored after the layer index is validated.
    pub fn add_edep(&mut self, layer: u32, value: f64) -> Result<(), TallyError> {
        self.deposits.record(layer, value)
    }

    /// Add an energy deposit to the whole-stack tally. Same positivity
    /// rule as [`add_edep`](Self::add_edep).
    pub fn add_stack_edep(&mut self, value: f64) {
        self.deposits.record_stack(value);
    }

    /// Count one event whose primary ended in `fate`.
    pub fn record_outcome(&mut self, fate: PrimaryFate) {
        self.outcomes.record(fate);
    }

    /// Count one invocation of the physics process `name`.
    pub fn count_process(&mut self, name: &str) {
        self.processes.count(name);
    }

    /// Record one particle of `species` with kinetic energy `energy`
    /// observed at `location`.
    pub fn count_particle(
        &mut self,
        location: Location,
        species: &str,
        energy: f64,
    ) -> Result<(), TallyError> {
        self.particles.record(location, species, energy)
    }

    // ── Read access ────────────────────────────────────────────────

    /// Per-layer and whole-stack deposit tallies.
    pub fn deposits(&self) -> &DepositTable {
        &self.deposits
    }

    /// Primary-fate counters.
    pub fn outcomes(&self) -> &OutcomeCounts {
        &self.outcomes
    }

    /// Process call counters.
    pub fn processes(&self) -> &ProcessCounter {
        &self.processes
    }

    /// Per-location particle statistics.
    pub fn particles(&self) -> &ParticleLedger {
        &self.particles
    }

    // ── Merge ──────────────────────────────────────────────────────

    /// Fold another tally into this one.
    ///
    /// Counts and sums add; extrema widen; process and particle tables
    /// merge add-or-insert; the primary is taken from `other` when it has
    /// one. Merging a freshly constructed tally is a no-op, which makes
    /// the fold well-defined for any number of workers in any order.
    ///
    /// Tallies sized for different stacks do not merge:
    /// [`TallyError::LayerCountMismatch`]. That is a configuration error
    /// on the caller's side and nothing is clamped to make it fit.
    pub fn merge(&mut self, other: &RunTally) -> Result<(), TallyError> {
        if self.layer_count() != other.layer_count() {
            return Err(TallyError::LayerCountMismatch {
                target: self.layer_count(),
                source: other.layer_count(),
            });
        }
        if let Some(primary) = &other.primary {
            self.primary = Some(primary.clone());
        }
        self.events += other.events;
        self.deposits.merge(&other.deposits)?;
        self.outcomes.merge(&other.outcomes);
        self.processes.merge(&other.processes);
        self.particles.merge(&other.particles)?;
        Ok(())
    }

    // ── Lifecycle ──────────────────────────────────────────────────

    /// Clear the per-report tables (processes, particles), keeping
    /// events, deposits, outcomes, and the primary. Called by report
    /// generation after a non-empty report.
    pub(crate) fn clear_volatile(&mut self) {
        self.processes.clear();
        self.particles.clear();
    }

    /// Restore construction state (same layer count, everything empty)
    /// for an independent run.
    pub fn reset(&mut self) {
        *self = RunTally::new(self.layer_count());
    }
}
