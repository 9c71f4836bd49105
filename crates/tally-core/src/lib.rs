//! Statistic primitives for the Tally run-accumulation framework.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! building blocks a run accumulator is assembled from (energy-deposit
//! tallies, per-species counters, process counters, primary-fate counters)
//! together with the numeric unit conventions used when statistics are
//! rendered for people.
//!
//! Every type here obeys the same merge discipline: combining two tallies
//! adds counts and sums, takes the min of mins and the max of maxes, and
//! never divides by an event count. Division happens exactly once, at report
//! time, in `tally-run`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod edep;
pub mod error;
pub mod ledger;
pub mod outcome;
pub mod process;
pub mod species;
pub mod units;

pub use edep::{DepositTable, EdepTally, Extrema};
pub use error::TallyError;
pub use ledger::{Location, ParticleLedger};
pub use outcome::{OutcomeCounts, PrimaryFate};
pub use process::ProcessCounter;
pub use species::ParticleStats;
pub use units::{Density, Energy, Length};
