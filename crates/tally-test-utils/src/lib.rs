//! Test utilities and mock types for Tally development.
//!
//! Provides mock [`AnalysisSink`] implementations ([`RecordingSink`],
//! [`FailingSink`]) and deterministic seeded worker fixtures for merge
//! and benchmark scenarios.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use tally_core::{Location, PrimaryFate};
use tally_hist::{AnalysisSink, HistError, HistId};
use tally_run::RunTally;

/// Process names a fixture worker draws from.
pub const PROCESS_NAMES: [&str; 6] = ["msc", "eIoni", "eBrem", "compt", "phot", "annihil"];

/// Species names a fixture worker draws from.
pub const SPECIES_NAMES: [&str; 3] = ["gamma", "e-", "e+"];

/// Mock [`AnalysisSink`] that answers a fixed axis and records every
/// scale request.
///
/// Inspect [`scale_calls`](RecordingSink::scale_calls) after the code
/// under test ran to see which histograms were rescaled and by what.
#[derive(Clone, Debug)]
pub struct RecordingSink {
    /// Bin width reported for every id.
    pub width: f64,
    /// Axis unit reported for every id.
    pub unit: f64,
    /// Every `(id, factor)` passed to [`AnalysisSink::scale`], in order.
    pub scale_calls: Vec<(HistId, f64)>,
}

impl RecordingSink {
    pub fn new(width: f64, unit: f64) -> Self {
        Self {
            width,
            unit,
            scale_calls: Vec::new(),
        }
    }
}

impl AnalysisSink for RecordingSink {
    fn bin_width(&self, _id: HistId) -> Result<f64, HistError> {
        Ok(self.width)
    }

    fn unit_scale(&self, _id: HistId) -> Result<f64, HistError> {
        Ok(self.unit)
    }

    fn scale(&mut self, id: HistId, factor: f64) -> Result<(), HistError> {
        self.scale_calls.push((id, factor));
        Ok(())
    }
}

/// Mock [`AnalysisSink`] that rejects every id, for error-path tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct FailingSink;

impl AnalysisSink for FailingSink {
    fn bin_width(&self, id: HistId) -> Result<f64, HistError> {
        Err(HistError::UnknownHistogram { id })
    }

    fn unit_scale(&self, id: HistId) -> Result<f64, HistError> {
        Err(HistError::UnknownHistogram { id })
    }

    fn scale(&mut self, id: HistId, _factor: f64) -> Result<(), HistError> {
        Err(HistError::UnknownHistogram { id })
    }
}

/// A dyadic-rational energy in `(0, 2]`: `k / 256` for `k` in `1..=512`.
///
/// Sums of dyadic rationals are exact in `f64`, so fixtures built from
/// these can be asserted with `==` after any number of merges.
pub fn dyadic_energy(rng: &mut ChaCha8Rng) -> f64 {
    f64::from(rng.random_range(1..=512u32)) / 256.0
}

/// Build a deterministic worker tally: `events` simulated events over a
/// `layers`-layer stack, all statistics drawn from a ChaCha8 stream
/// seeded with `seed`.
///
/// Identical arguments produce an identical tally, so merge results are
/// reproducible across runs and across machines. Energies are dyadic
/// rationals (see [`dyadic_energy`]).
pub fn seeded_worker(seed: u64, layers: u32, events: u64) -> RunTally {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut tally = RunTally::new(layers);
    tally.set_primary("e-", 1000.0);
    for _ in 0..events {
        tally.record_event();

        let mut stack_total = 0.0;
        for layer in 1..=layers {
            let edep = dyadic_energy(&mut rng);
            tally.add_edep(layer, edep).unwrap();
            stack_total += edep;
        }
        if layers > 0 {
            tally.add_stack_edep(stack_total);
        }

        let fate = PrimaryFate::ALL[rng.random_range(0..PrimaryFate::ALL.len())];
        tally.record_outcome(fate);

        for _ in 0..rng.random_range(1..4u32) {
            let name = PROCESS_NAMES[rng.random_range(0..PROCESS_NAMES.len())];
            tally.count_process(name);
        }

        for layer in 1..=layers {
            let species = SPECIES_NAMES[rng.random_range(0..SPECIES_NAMES.len())];
            tally
                .count_particle(Location::Layer(layer), species, dyadic_energy(&mut rng))
                .unwrap();
        }
        let species = SPECIES_NAMES[rng.random_range(0..SPECIES_NAMES.len())];
        tally
            .count_particle(Location::Emerged, species, dyadic_energy(&mut rng))
            .unwrap();
    }
    tally
}
