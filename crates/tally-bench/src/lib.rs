//! Benchmark profiles and utilities for the Tally run-statistics crates.
//!
//! Provides pre-built accumulation scenarios for benchmarking:
//!
//! - [`reference_stack`]: 5-layer lead-tungstate absorber stack
//! - [`reference_worker`]: worker tally with 10K deterministic events
//! - [`filled_worker`]: worker tally with a caller-chosen event count

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use tally_core::units::{CM, G_PER_CM3};
use tally_core::{Location, PrimaryFate};
use tally_run::RunTally;
use tally_stack::{LayerSpec, StackProfile};

/// Layer count shared by all reference scenarios.
pub const LAYERS: u32 = 5;

/// Event count of [`reference_worker`].
pub const REFERENCE_EVENTS: u64 = 10_000;

/// Build the reference absorber stack: 5 x 1 cm of lead tungstate.
pub fn reference_stack() -> StackProfile {
    StackProfile::uniform(LAYERS, LayerSpec::new(1.0 * CM, "PbWO4", 8.28 * G_PER_CM3)).unwrap()
}

/// Build a reference worker tally: [`REFERENCE_EVENTS`] deterministic events.
pub fn reference_worker(seed: u64) -> RunTally {
    filled_worker(seed, REFERENCE_EVENTS)
}

/// Fill a worker tally with `events` deterministic events.
///
/// Event content is derived from a cheap integer hash of `(seed, event)`,
/// so there is no generator state to carry and any single event is
/// reproducible in isolation. Energies are multiples of 1/256 in (0, 2].
pub fn filled_worker(seed: u64, events: u64) -> RunTally {
    const PROCESSES: [&str; 6] = ["msc", "eIoni", "eBrem", "compt", "phot", "annihil"];
    const SPECIES: [&str; 3] = ["gamma", "e-", "e+"];

    let mut tally = RunTally::new(LAYERS);
    tally.set_primary("e-", 1000.0);
    for n in 0..events {
        let word = seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(n.wrapping_mul(1442695040888963407));
        tally.record_event();

        let mut stack_total = 0.0;
        for layer in 1..=LAYERS {
            let bits = word.rotate_right(8 * layer);
            let edep = ((bits % 512) + 1) as f64 / 256.0;
            tally.add_edep(layer, edep).unwrap();
            stack_total += edep;
        }
        tally.add_stack_edep(stack_total);

        tally.record_outcome(PrimaryFate::ALL[(word % 3) as usize]);
        tally.count_process(PROCESSES[((word >> 3) % 6) as usize]);
        tally.count_process(PROCESSES[((word >> 6) % 6) as usize]);

        let species = SPECIES[((word >> 9) % 3) as usize];
        let layer = ((word >> 12) % u64::from(LAYERS) + 1) as u32;
        let energy = (((word >> 16) % 512) + 1) as f64 / 256.0;
        tally
            .count_particle(Location::Layer(layer), species, energy)
            .unwrap();
        tally
            .count_particle(Location::Emerged, species, energy)
            .unwrap();
    }
    tally
}
