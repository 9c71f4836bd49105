//! Run accumulation, reduction, and reporting.
//!
//! The center of this crate is [`RunTally`]: one lives on each worker
//! thread, fed by the event loop through plain `&mut self` calls with no
//! synchronization anywhere. When the run ends, the workers' tallies are
//! folded into a master tally ([`reduce`] has the helpers for both the
//! iterator and the channel shape of that fold) and
//! [`RunReport::generate`] turns the merged state into a printable summary,
//! normalizing per-event quantities into the report snapshot without
//! touching the raw sums.
//!
//! Merging is commutative and associative, so neither the number of
//! workers nor the order they finish in changes any reported number.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod reduce;
pub mod report;
pub mod run;

pub use reduce::{merge_all, merge_from_channel};
pub use report::{DepositRow, ProcessRow, ReportError, ReportOptions, RunReport, SpeciesRow};
pub use run::{Primary, RunTally};
