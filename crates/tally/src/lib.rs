//! Tally: run statistics for layered-absorber particle transport.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Tally sub-crates. For most users, adding `tally` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use tally::prelude::*;
//! use tally::units::{G_PER_CM3, MM};
//!
//! // Accumulate two events' worth of observables on a worker.
//! let mut worker = RunTally::new(2);
//! worker.set_primary("e-", 1000.0);
//! for _ in 0..2 {
//!     worker.record_event();
//!     worker.add_edep(1, 1.25).unwrap();
//!     worker.record_outcome(PrimaryFate::Transmitted);
//! }
//!
//! // Reduce into a master.
//! let mut master = RunTally::new(2);
//! merge_all(&mut master, [worker]).unwrap();
//!
//! // Describe the stack and render the end-of-run summary.
//! let profile = StackProfile::uniform(
//!     2,
//!     LayerSpec::new(10.0 * MM, "Si", 2.33 * G_PER_CM3),
//! )
//! .unwrap();
//! let mut book = HistogramBook::new();
//! let report =
//!     RunReport::generate(&mut master, &profile, &mut book, &ReportOptions::default()).unwrap();
//! assert_eq!(report.events, 2);
//! assert_eq!(report.deposits[0].mean, 1.25);
//! println!("{report}");
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the
//! prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `tally-core` | Accumulator building blocks, units, errors |
//! | [`stack`] | `tally-stack` | Absorber stack description |
//! | [`hist`] | `tally-hist` | Histogram booking and the analysis sink trait |
//! | [`run`] | `tally-run` | Per-run accumulator, reduction, report generation |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Accumulator building blocks, units, and errors (`tally-core`).
///
/// Contains the per-observable accumulators ([`types::DepositTable`],
/// [`types::OutcomeCounts`], [`types::ProcessCounter`],
/// [`types::ParticleLedger`]), the unit constants, and [`types::TallyError`].
pub use tally_core as types;

/// Units of measure (`tally-core`'s [`types::units`] module).
///
/// Constants such as [`units::MEV`], [`units::CM`], and
/// [`units::G_PER_CM3`], plus the display newtypes.
pub use tally_core::units;

/// Absorber stack description (`tally-stack`).
///
/// Build a [`stack::StackProfile`] from [`stack::LayerSpec`] entries; the
/// report renders geometry from it.
pub use tally_stack as stack;

/// Histogram booking and normalization (`tally-hist`).
///
/// [`hist::HistogramBook`] is the bundled backend; the
/// [`hist::AnalysisSink`] trait is the seam for external analysis
/// frameworks.
pub use tally_hist as hist;

/// Per-run accumulation, reduction, and reporting (`tally-run`).
///
/// [`run::RunTally`] accumulates, [`run::merge_all`] and
/// [`run::merge_from_channel`] reduce, [`run::RunReport`] normalizes and
/// renders.
pub use tally_run as run;

/// Common imports for typical Tally usage.
///
/// ```rust
/// use tally::prelude::*;
/// ```
///
/// This imports the most frequently used types: the run accumulator, the
/// reduction functions, the stack and histogram types, and the error types.
pub mod prelude {
    // Accumulators
    pub use tally_core::{
        DepositTable, EdepTally, Extrema, Location, OutcomeCounts, ParticleLedger, ParticleStats,
        PrimaryFate, ProcessCounter,
    };

    // Errors
    pub use tally_core::TallyError;
    pub use tally_hist::HistError;
    pub use tally_run::ReportError;
    pub use tally_stack::StackError;

    // Display newtypes
    pub use tally_core::{Density, Energy, Length};

    // Stack description
    pub use tally_stack::{LayerSpec, StackProfile};

    // Histograms
    pub use tally_hist::{AnalysisSink, HistId, Histogram1D, HistogramBook};

    // Run accumulation and reduction
    pub use tally_run::{
        merge_all, merge_from_channel, Primary, ReportOptions, RunReport, RunTally,
    };
}
